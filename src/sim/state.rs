/*!
# Simulation state and batch sizing

Per-zone mutable state: rat positions and PRNG seeds, per-node rat counts
and weights, neighbor cumulative-weight arrays, and the zone-membership
bitvector.
*/

use crate::graph::Graph;
use crate::mathkernel::{imbalance, mweight};
use crate::prng::{init_rat_seed, RatPrng};
use crate::zone_setup::ZoneTopology;

/// Batch size `B = max(floor(0.02 * R), floor(sqrt(R)))`.
pub fn batch_size(total_rats: u32) -> u32 {
    let r = total_rats as f64;
    (0.02 * r).floor().max(r.sqrt().floor()) as u32
}

/// Ideal load factor per node: `1.75 + 0.5 * mean_neighbor_imbalance`, where
/// the neighbor imbalance of a node is taken between its lower-id and
/// higher-id neighbors (excluding the self-edge) — the only topology-derived
/// quantity available without further input.
pub fn ideal_load_factors(graph: &Graph) -> Vec<f64> {
    (0..graph.node_count())
        .map(|n| {
            let neighbors = graph.neighbors(n);
            let (mut lower, mut higher) = (0u32, 0u32);
            for &m in &neighbors[1..] {
                if m < n {
                    lower += 1;
                } else {
                    higher += 1;
                }
            }
            1.75 + 0.5 * imbalance(lower as f64, higher as f64)
        })
        .collect()
}

/// One zone's full mutable simulation state.
pub struct SimState {
    pub this_zone: u32,
    /// Indexed by rat id, `0..R`; only meaningful where
    /// `zone_rat_bitvector[r]` is set, except immediately after migration
    /// when a just-received rat's fields are current.
    pub rat_position: Vec<u32>,
    pub rat_seed: Vec<u32>,
    pub zone_rat_bitvector: Vec<bool>,

    /// Indexed by global node id; populated for owned nodes and every
    /// import node.
    pub rat_count: Vec<u32>,
    pub node_weight: Vec<f64>,
    /// Indexed by global node id; populated for owned nodes only.
    pub sum_weight: Vec<f64>,
    /// Parallel to `graph.neighbor`; populated for owned nodes only.
    pub neighbor_accum_weight: Vec<f64>,

    pub ideal_load_factor: Vec<f64>,
}

impl SimState {
    pub fn new(graph: &Graph, global_seed: u32, initial_positions: &[u32], this_zone: u32) -> Self {
        let r = initial_positions.len();
        let mut rat_position = Vec::with_capacity(r);
        let mut rat_seed = Vec::with_capacity(r);
        let mut zone_rat_bitvector = Vec::with_capacity(r);

        for (rat_id, &pos) in initial_positions.iter().enumerate() {
            rat_position.push(pos);
            let prng: RatPrng = init_rat_seed(global_seed, rat_id as u32);
            rat_seed.push(prng.0);
            zone_rat_bitvector.push(graph.zone_id[pos as usize] == this_zone);
        }

        let node_count = graph.node_count() as usize;
        SimState {
            this_zone,
            rat_position,
            rat_seed,
            zone_rat_bitvector,
            rat_count: vec![0; node_count],
            node_weight: vec![0.0; node_count],
            sum_weight: vec![0.0; node_count],
            neighbor_accum_weight: vec![0.0; graph.neighbor.len()],
            ideal_load_factor: ideal_load_factors(graph),
        }
    }

    /// Recomputes `rat_count` for every owned node from `rat_position` and
    /// `zone_rat_bitvector`. Idempotent, and exact once this zone's
    /// in-flight imports/exports for the step have settled.
    pub fn take_census(&mut self, topology: &ZoneTopology) {
        for &n in &topology.local_node_list {
            self.rat_count[n as usize] = 0;
        }
        for r in 0..self.rat_position.len() {
            if self.zone_rat_bitvector[r] {
                let n = self.rat_position[r] as usize;
                self.rat_count[n] += 1;
            }
        }
    }

    /// Recomputes `node_weight` for a set of nodes (owned and/or imported)
    /// from their current `rat_count` and `ideal_load_factor`.
    pub fn compute_weights(&mut self, nodes: impl IntoIterator<Item = u32>) {
        for n in nodes {
            let idx = n as usize;
            self.node_weight[idx] = mweight(self.rat_count[idx] as f64, self.ideal_load_factor[idx]);
        }
    }

    /// Recomputes weights for every node meaningful to this zone: owned
    /// nodes and all import nodes from every peer. Used for the initial
    /// `compute_all_weights` call before the first batch of a step.
    pub fn compute_all_weights(&mut self, topology: &ZoneTopology) {
        let nodes: Vec<u32> = topology
            .local_node_list
            .iter()
            .copied()
            .chain(topology.import.values().flatten().copied())
            .collect();
        self.compute_weights(nodes);
    }
}
