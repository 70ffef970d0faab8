/*!
# Zone setup

Two-pass derivation of the local node set, local edge count, and the
per-peer import/export boundary lists for one zone.
*/

use std::collections::{HashMap, HashSet};

use crate::graph::Graph;

/// Per-zone topology derived from the graph: which nodes this zone owns,
/// and which nodes it must exchange with each peer.
#[derive(Debug, Clone, Default)]
pub struct ZoneTopology {
    /// Sorted ascending.
    pub local_node_list: Vec<u32>,
    pub local_edge_count: u64,
    /// peer zone -> sorted ascending import list (external nodes this zone
    /// observes but does not own).
    pub import: HashMap<u32, Vec<u32>>,
    /// peer zone -> sorted ascending export list (owned nodes this zone must
    /// ship to that peer).
    pub export: HashMap<u32, Vec<u32>>,
}

impl ZoneTopology {
    pub fn peers(&self) -> Vec<u32> {
        let mut peers: Vec<u32> = self
            .import
            .keys()
            .chain(self.export.keys())
            .copied()
            .collect::<HashSet<u32>>()
            .into_iter()
            .collect();
        peers.sort_unstable();
        peers
    }
}

/// Builds [`ZoneTopology`] for `this_zone` against `graph`.
pub fn build_zone_topology(graph: &Graph, this_zone: u32) -> ZoneTopology {
    // Pass 1: local node set, local edge count, and per-peer import sizing.
    let mut local_node_list = Vec::new();
    let mut local_edge_count = 0u64;
    let mut import_count: HashMap<u32, u32> = HashMap::new();
    let mut seen_import: HashSet<u32> = HashSet::new();

    for n in 0..graph.node_count() {
        if graph.zone_id[n as usize] != this_zone {
            continue;
        }
        local_node_list.push(n);
        local_edge_count += graph.degree(n) as u64;

        for &m in graph.neighbors(n) {
            let mz = graph.zone_id[m as usize];
            if mz != this_zone && seen_import.insert(m) {
                *import_count.entry(mz).or_insert(0) += 1;
            }
        }
    }

    // Pass 2: fill import/export lists with exact capacities.
    let mut import: HashMap<u32, Vec<u32>> = import_count
        .iter()
        .map(|(&z, &count)| (z, Vec::with_capacity(count as usize)))
        .collect();
    let mut export: HashMap<u32, Vec<u32>> = HashMap::new();
    seen_import.clear();

    for &n in &local_node_list {
        let mut exported_peers_this_node: HashSet<u32> = HashSet::new();
        for &m in graph.neighbors(n) {
            let mz = graph.zone_id[m as usize];
            if mz == this_zone {
                continue;
            }
            if seen_import.insert(m) {
                import.entry(mz).or_default().push(m);
            }
            if exported_peers_this_node.insert(mz) {
                export.entry(mz).or_default().push(n);
            }
        }
    }

    for list in import.values_mut() {
        list.sort_unstable();
        list.shrink_to_fit();
    }
    for list in export.values_mut() {
        list.shrink_to_fit();
    }

    ZoneTopology {
        local_node_list,
        local_edge_count,
        import,
        export,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Region;

    /// A 1x4 strip split into two zones of two nodes each: 0-1 | 2-3.
    fn strip_graph() -> Graph {
        let width = 4;
        let height = 1;
        let node_count = width * height;
        let mut degree = vec![1u32; node_count as usize];
        for n in 0..node_count - 1 {
            degree[n as usize] += 1;
            degree[n as usize + 1] += 1;
        }
        let mut neighbor_start = vec![0u32; node_count as usize + 1];
        for n in 0..node_count as usize {
            neighbor_start[n + 1] = neighbor_start[n] + degree[n];
        }
        let mut neighbor = vec![0u32; neighbor_start[node_count as usize] as usize];
        let mut cursor = neighbor_start.clone();
        for n in 0..node_count {
            neighbor[cursor[n as usize] as usize] = n;
            cursor[n as usize] += 1;
        }
        for n in 0..node_count - 1 {
            neighbor[cursor[n as usize] as usize] = n + 1;
            cursor[n as usize] += 1;
            neighbor[cursor[n as usize + 1] as usize] = n;
            cursor[n as usize + 1] += 1;
        }
        Graph {
            width,
            height,
            neighbor_start,
            neighbor,
            zone_id: vec![0, 0, 1, 1],
            regions: vec![
                Region { x: 0, y: 0, w: 2, h: 1, node_count: 2, edge_count: 0, zone_id: 0 },
                Region { x: 2, y: 0, w: 2, h: 1, node_count: 2, edge_count: 0, zone_id: 1 },
            ],
        }
    }

    #[test]
    fn local_node_list_sorted_and_correct() {
        let graph = strip_graph();
        let z0 = build_zone_topology(&graph, 0);
        assert_eq!(z0.local_node_list, vec![0, 1]);
        let z1 = build_zone_topology(&graph, 1);
        assert_eq!(z1.local_node_list, vec![2, 3]);
    }

    #[test]
    fn import_export_symmetry_across_the_one_boundary_edge() {
        let graph = strip_graph();
        let z0 = build_zone_topology(&graph, 0);
        let z1 = build_zone_topology(&graph, 1);

        assert_eq!(z0.export.get(&1), Some(&vec![1]));
        assert_eq!(z0.import.get(&1), Some(&vec![2]));
        assert_eq!(z1.export.get(&0), Some(&vec![2]));
        assert_eq!(z1.import.get(&0), Some(&vec![1]));

        // import(a, b) as a set equals export(b, a) as a set.
        assert_eq!(z0.import.get(&1), z1.export.get(&0));
        assert_eq!(z1.import.get(&0), z0.export.get(&1));
    }

    #[test]
    fn no_node_appears_twice_in_any_export_list() {
        let graph = strip_graph();
        let z0 = build_zone_topology(&graph, 0);
        for list in z0.export.values() {
            let unique: HashSet<_> = list.iter().collect();
            assert_eq!(unique.len(), list.len());
        }
    }

    #[test]
    fn local_edge_count_sums_adjacency_lengths() {
        let graph = strip_graph();
        let z0 = build_zone_topology(&graph, 0);
        // node 0: self + edge to 1 = 2; node 1: self + edges to 0,2 = 3.
        assert_eq!(z0.local_edge_count, 5);
    }
}
