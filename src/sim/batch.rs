/*!
# Batch kernel

Per-batch weighted move sampling: recompute sums, decide each owned rat's
move, and classify it as a stayer or an emigrant.
*/

use std::collections::HashMap;

use crate::graph::Graph;
use crate::prng::RatPrng;
use crate::zone_setup::ZoneTopology;

use super::state::SimState;

/// A rat crossing into another zone this batch: `(rat_id, target_node,
/// prng_seed)`, the exact triple `exchange_rats` ships.
pub type EmigrantTriple = (u32, u32, u32);

/// Per-peer outgoing rat buffers, cleared and refilled every batch.
#[derive(Debug, Default)]
pub struct ExportBuffers {
    pub buffers: HashMap<u32, Vec<EmigrantTriple>>,
}

impl ExportBuffers {
    pub fn new(peers: &[u32], capacity: usize) -> Self {
        let buffers = peers
            .iter()
            .map(|&z| (z, Vec::with_capacity(capacity)))
            .collect();
        ExportBuffers { buffers }
    }

    pub fn clear(&mut self) {
        for buf in self.buffers.values_mut() {
            buf.clear();
        }
    }
}

/// Recomputes `sum_weight` and `neighbor_accum_weight` for every owned node.
/// Requires `node_weight` to be current at every owned node and every
/// neighbor of an owned node.
pub fn find_all_sums(state: &mut SimState, graph: &Graph, topology: &ZoneTopology) {
    for &n in &topology.local_node_list {
        let start = graph.neighbor_start[n as usize] as usize;
        let end = graph.neighbor_start[n as usize + 1] as usize;
        let mut running = 0.0;
        for (offset, &m) in graph.neighbor[start..end].iter().enumerate() {
            running += state.node_weight[m as usize];
            state.neighbor_accum_weight[start + offset] = running;
        }
        state.sum_weight[n as usize] = running;
    }
}

/// Smallest `i` with `t < a[i]`, for a strictly non-decreasing `a` and
/// `t < a[a.len() - 1]`. Binary search narrows to a window of at most 4
/// before falling back to a linear scan.
pub fn locate_value(target: f64, a: &[f64]) -> usize {
    let mut lo = 0usize;
    let mut hi = a.len();
    while hi - lo > 4 {
        let mid = lo + (hi - lo) / 2;
        if target < a[mid] {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    for i in lo..hi {
        if target < a[i] {
            return i;
        }
    }
    hi - 1
}

/// Processes rats `[bstart, bstart + bcount)` in ascending id order (this
/// order is semantically significant for reproducibility), moving
/// stayers in place and filling `exports` with emigrant triples.
///
/// Assumes `find_all_sums` has already been run for this batch.
pub fn run_batch(
    state: &mut SimState,
    graph: &Graph,
    bstart: usize,
    bcount: usize,
    exports: &mut ExportBuffers,
) {
    exports.clear();

    for r in bstart..bstart + bcount {
        if !state.zone_rat_bitvector[r] {
            continue;
        }

        let cur = state.rat_position[r];
        let start = graph.neighbor_start[cur as usize] as usize;
        let end = graph.neighbor_start[cur as usize + 1] as usize;
        let sum = state.sum_weight[cur as usize];

        let mut prng = RatPrng::new(state.rat_seed[r]);
        let target = prng.next_float(sum);
        state.rat_seed[r] = prng.0;

        let k = locate_value(target, &state.neighbor_accum_weight[start..end]);
        let new_node = graph.neighbor[start + k];
        let new_zone = graph.zone_id[new_node as usize];

        if new_zone == state.this_zone {
            state.rat_position[r] = new_node;
            state.rat_count[cur as usize] -= 1;
            state.rat_count[new_node as usize] += 1;
        } else {
            state.rat_count[cur as usize] -= 1;
            state.zone_rat_bitvector[r] = false;
            exports
                .buffers
                .entry(new_zone)
                .or_default()
                .push((r as u32, new_node, state.rat_seed[r]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_value_finds_smallest_strictly_greater_index() {
        let a = [1.0, 3.0, 3.0, 6.0, 10.0];
        assert_eq!(locate_value(0.0, &a), 0);
        assert_eq!(locate_value(0.999, &a), 0);
        assert_eq!(locate_value(1.0, &a), 1);
        assert_eq!(locate_value(2.999, &a), 1);
        // Tie: equal cumulative weights route to the earlier index.
        assert_eq!(locate_value(3.0, &a), 3);
        assert_eq!(locate_value(9.999, &a), 4);
    }

    #[test]
    fn handles_arrays_longer_than_the_binary_search_threshold() {
        let a: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        for t in 0..20 {
            let expected = a.iter().position(|&v| (t as f64) < v).unwrap();
            assert_eq!(locate_value(t as f64, &a), expected);
        }
    }

    #[test]
    fn single_element_array() {
        assert_eq!(locate_value(0.5, &[1.0]), 0);
    }

    fn tiny_graph() -> Graph {
        // 0 -- 1, both with self-edges.
        Graph {
            width: 2,
            height: 1,
            neighbor_start: vec![0, 2, 4],
            neighbor: vec![0, 1, 1, 0],
            zone_id: vec![0, 0],
            regions: vec![],
        }
    }

    #[test]
    fn neighbor_accum_weight_is_a_running_prefix_sum() {
        let graph = tiny_graph();
        let topo = ZoneTopology {
            local_node_list: vec![0, 1],
            local_edge_count: 4,
            import: Default::default(),
            export: Default::default(),
        };
        let mut state = SimState::new(&graph, 1, &[0], 0);
        state.node_weight[0] = 2.0;
        state.node_weight[1] = 3.0;
        find_all_sums(&mut state, &graph, &topo);
        assert_eq!(state.neighbor_accum_weight, vec![2.0, 5.0, 3.0, 5.0]);
        assert_eq!(state.sum_weight[0], 5.0);
        assert_eq!(state.sum_weight[1], 5.0);
    }

    #[test]
    fn rat_that_moves_within_zone_stays_conserved() {
        let graph = tiny_graph();
        let topo = ZoneTopology {
            local_node_list: vec![0, 1],
            local_edge_count: 4,
            import: Default::default(),
            export: Default::default(),
        };
        let mut state = SimState::new(&graph, 1, &[0], 0);
        state.node_weight[0] = 1.0;
        state.node_weight[1] = 1.0;
        state.take_census(&topo);
        find_all_sums(&mut state, &graph, &topo);

        let mut exports = ExportBuffers::new(&[], 4);
        run_batch(&mut state, &graph, 0, 1, &mut exports);

        assert!(state.zone_rat_bitvector[0]);
        assert_eq!(state.rat_count[0] + state.rat_count[1], 1);
    }
}
