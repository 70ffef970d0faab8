/*!
# Worker run loop

Per-zone orchestration: one call to `take_census`, then per step
`compute_all_weights` followed by the batch loop (`find_all_sums` ->
move decisions -> `exchange_rats` -> `exchange_node_counts` -> recompute
boundary weights -> `exchange_node_weights`), with an optional display
gather on the configured interval.
*/

use tracing::{info, instrument};

use crate::error::RatwalkError;
use crate::graph::Graph;
use crate::zone_setup::build_zone_topology;

use super::batch::{find_all_sums, run_batch, ExportBuffers};
use super::exchange::{exchange_node_counts, exchange_node_weights, exchange_rats, gather_for_display};
use super::state::{batch_size, SimState};
use super::transport::Transport;

pub struct WorkerConfig {
    pub this_zone: u32,
    pub global_seed: u32,
    pub step_count: u32,
    pub display_interval: u32,
    pub quiet: bool,
}

/// Runs one zone's worker to completion, invoking `on_display` with zone 0's
/// gathered `(node_id, count)` snapshot on every display tick it produces.
///
/// Any `Err` returned here means the caller must still emit `DONE` before
/// propagating the failure.
#[instrument(skip(graph, rat_positions, config, transport, on_display), fields(zone = config.this_zone))]
pub fn run_worker(
    graph: &Graph,
    rat_positions: &[u32],
    config: &WorkerConfig,
    transport: &dyn Transport,
    mut on_display: impl FnMut(&[(u32, u32)]),
) -> Result<(), RatwalkError> {
    let topology = build_zone_topology(graph, config.this_zone);
    let mut state = SimState::new(graph, config.global_seed, rat_positions, config.this_zone);
    let total_rats = rat_positions.len() as u32;
    let b = batch_size(total_rats);
    let peers = topology.peers();

    info!(local_nodes = topology.local_node_list.len(), "zone setup complete");
    state.take_census(&topology);

    for step in 0..config.step_count {
        state.compute_all_weights(&topology);
        let mut exports = ExportBuffers::new(&peers, b.max(1) as usize);

        let mut bstart = 0usize;
        while bstart < total_rats as usize {
            let bcount = (b as usize).min(total_rats as usize - bstart);

            find_all_sums(&mut state, graph, &topology);
            run_batch(&mut state, graph, bstart, bcount, &mut exports);

            exchange_rats(&mut state, &topology, &exports, transport)?;
            exchange_node_counts(&mut state, &topology, transport)?;

            let boundary_nodes: Vec<u32> = topology
                .local_node_list
                .iter()
                .copied()
                .chain(topology.import.values().flatten().copied())
                .collect();
            state.compute_weights(boundary_nodes);

            exchange_node_weights(&mut state, &topology, transport)?;

            bstart += bcount;
        }

        let is_display_tick = !config.quiet
            && config.display_interval > 0
            && (step + 1) % config.display_interval == 0;
        if is_display_tick {
            if let Some(snapshot) = gather_for_display(&mut state, &topology, transport)? {
                on_display(&snapshot);
            }
        }
    }

    info!("zone finished all steps");
    Ok(())
}
