/*!
# Boundary exchanges

`exchange_rats`, `exchange_node_counts`, `exchange_node_weights`, and the
display-tick gather to zone 0.

Every exchange here sends a (possibly empty) message to every peer in
[`ZoneTopology::peers`] and receives one back from each, rather than
skipping peers with nothing to say. Wire-level elision of empty messages
would only pay off on a transport where posting a send has a real cost;
over [`super::transport::ChannelTransport`] an empty `Vec<u8>` send is
free, so always-send/always-receive keeps the ordering argument (deadlock
freedom, no cross-talk) just as simple without the added bookkeeping.
*/

use crate::error::RatwalkError;
use crate::zone_setup::ZoneTopology;

use super::batch::ExportBuffers;
use super::state::SimState;
use super::transport::Transport;

const TAG_STRIDE: u32 = 1 << 16;

#[derive(Debug, Clone, Copy)]
enum ExchangeKind {
    Rats,
    Counts,
    Weights,
    Display,
}

fn tag(kind: ExchangeKind, sender_rank: u32) -> u32 {
    (kind as u32) * TAG_STRIDE + sender_rank
}

fn encode_u32(data: &[u32]) -> Vec<u8> {
    data.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_u32(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
        .collect()
}

fn encode_f64(data: &[f64]) -> Vec<u8> {
    data.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_f64(bytes: &[u8]) -> Vec<f64> {
    bytes
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
        .collect()
}

/// Ships emigrant `(rat_id, target_node, seed)` triples and folds incoming
/// ones into `state`.
pub fn exchange_rats(
    state: &mut SimState,
    topology: &ZoneTopology,
    exports: &ExportBuffers,
    transport: &dyn Transport,
) -> Result<(), RatwalkError> {
    let peers = topology.peers();
    let my_rank = transport.rank();

    let mut handles = Vec::with_capacity(peers.len());
    for &peer in &peers {
        let empty = Vec::new();
        let triples = exports.buffers.get(&peer).unwrap_or(&empty);
        let flat: Vec<u32> = triples.iter().flat_map(|&(r, n, s)| [r, n, s]).collect();
        handles.push(transport.isend(peer, tag(ExchangeKind::Rats, my_rank), encode_u32(&flat))?);
    }

    for &peer in &peers {
        let bytes = transport.recv(peer, tag(ExchangeKind::Rats, peer))?;
        let flat = decode_u32(&bytes);
        for chunk in flat.chunks_exact(3) {
            let (r, n, seed) = (chunk[0], chunk[1], chunk[2]);
            state.rat_position[r as usize] = n;
            state.rat_count[n as usize] += 1;
            state.rat_seed[r as usize] = seed;
            state.zone_rat_bitvector[r as usize] = true;
        }
    }

    for h in handles {
        transport.wait(h)?;
    }
    Ok(())
}

/// Ships `rat_count` at each export-list node, in export-list order, and
/// overwrites the matching import-list positions on receipt.
pub fn exchange_node_counts(
    state: &mut SimState,
    topology: &ZoneTopology,
    transport: &dyn Transport,
) -> Result<(), RatwalkError> {
    let peers = topology.peers();
    let my_rank = transport.rank();

    let mut handles = Vec::with_capacity(peers.len());
    for &peer in &peers {
        let empty = Vec::new();
        let export_list = topology.export.get(&peer).unwrap_or(&empty);
        let payload: Vec<u32> = export_list.iter().map(|&n| state.rat_count[n as usize]).collect();
        handles.push(transport.isend(peer, tag(ExchangeKind::Counts, my_rank), encode_u32(&payload))?);
    }

    for &peer in &peers {
        let bytes = transport.recv(peer, tag(ExchangeKind::Counts, peer))?;
        let values = decode_u32(&bytes);
        let empty = Vec::new();
        let import_list = topology.import.get(&peer).unwrap_or(&empty);
        for (&n, &v) in import_list.iter().zip(values.iter()) {
            state.rat_count[n as usize] = v;
        }
    }

    for h in handles {
        transport.wait(h)?;
    }
    Ok(())
}

/// Identical shape to [`exchange_node_counts`] but carries typed
/// `node_weight` (`f64`) payloads rather than reinterpreting them as
/// integers.
pub fn exchange_node_weights(
    state: &mut SimState,
    topology: &ZoneTopology,
    transport: &dyn Transport,
) -> Result<(), RatwalkError> {
    let peers = topology.peers();
    let my_rank = transport.rank();

    let mut handles = Vec::with_capacity(peers.len());
    for &peer in &peers {
        let empty = Vec::new();
        let export_list = topology.export.get(&peer).unwrap_or(&empty);
        let payload: Vec<f64> = export_list.iter().map(|&n| state.node_weight[n as usize]).collect();
        handles.push(transport.isend(peer, tag(ExchangeKind::Weights, my_rank), encode_f64(&payload))?);
    }

    for &peer in &peers {
        let bytes = transport.recv(peer, tag(ExchangeKind::Weights, peer))?;
        let values = decode_f64(&bytes);
        let empty = Vec::new();
        let import_list = topology.import.get(&peer).unwrap_or(&empty);
        for (&n, &v) in import_list.iter().zip(values.iter()) {
            state.node_weight[n as usize] = v;
        }
    }

    for h in handles {
        transport.wait(h)?;
    }
    Ok(())
}

/// Before a display tick, every non-zero zone ships its owned
/// `(node_id, count)` pairs to zone 0. Zone 0 folds them into its own
/// `rat_count` and returns the full per-node snapshot; every other zone
/// returns `None`.
pub fn gather_for_display(
    state: &mut SimState,
    topology: &ZoneTopology,
    transport: &dyn Transport,
) -> Result<Option<Vec<(u32, u32)>>, RatwalkError> {
    let my_rank = transport.rank();

    if my_rank != 0 {
        let payload: Vec<u32> = topology
            .local_node_list
            .iter()
            .flat_map(|&n| [n, state.rat_count[n as usize]])
            .collect();
        let handle = transport.isend(0, tag(ExchangeKind::Display, my_rank), encode_u32(&payload))?;
        transport.wait(handle)?;
        return Ok(None);
    }

    let mut snapshot: Vec<(u32, u32)> = topology
        .local_node_list
        .iter()
        .map(|&n| (n, state.rat_count[n as usize]))
        .collect();

    for peer in 1..transport.peer_count() {
        let bytes = transport.recv(peer, tag(ExchangeKind::Display, peer))?;
        let flat = decode_u32(&bytes);
        for chunk in flat.chunks_exact(2) {
            let (n, count) = (chunk[0], chunk[1]);
            state.rat_count[n as usize] = count;
            snapshot.push((n, count));
        }
    }

    snapshot.sort_unstable_by_key(|&(n, _)| n);
    Ok(Some(snapshot))
}
