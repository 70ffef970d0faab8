/*!
# Transport

The message-passing capability used by the boundary exchanges: an
`isend`/`probe`/`recv`/`wait`/`broadcast` surface in the shape of an MPI
point-to-point API. [`ChannelTransport`] realizes it over
`std::sync::mpsc`, with one OS thread standing in for each zone's worker
process.
*/

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::error::RatwalkError;

/// A non-blocking send handle. `ChannelTransport`'s sends complete
/// synchronously (an unbounded channel's `send` never blocks), so `wait`
/// on it is a no-op; the handle exists so callers write the same
/// post-all-sends-then-wait-all sequence a real async transport would need.
pub struct SendHandle;

/// The message-passing capability isolating the simulator from its binding.
pub trait Transport {
    fn rank(&self) -> u32;
    fn peer_count(&self) -> u32;

    /// Posts a non-blocking send of `bytes` to `peer` tagged `tag`.
    fn isend(&self, peer: u32, tag: u32, bytes: Vec<u8>) -> Result<SendHandle, RatwalkError>;

    /// Blocks until a message from `peer` tagged `tag` is available and
    /// returns its length without consuming it.
    fn probe(&self, peer: u32, tag: u32) -> Result<usize, RatwalkError>;

    /// Blocks until a message from `peer` tagged `tag` is available and
    /// consumes it.
    fn recv(&self, peer: u32, tag: u32) -> Result<Vec<u8>, RatwalkError>;

    /// Waits for a previously posted send to complete.
    fn wait(&self, handle: SendHandle) -> Result<(), RatwalkError>;

    /// Zone `root` sends `bytes` to every other zone; every zone (including
    /// `root`) returns the broadcast payload.
    fn broadcast(&self, root: u32, bytes: Option<Vec<u8>>, tag: u32) -> Result<Vec<u8>, RatwalkError>;
}

struct WireMessage {
    from: u32,
    tag: u32,
    bytes: Vec<u8>,
}

/// An `mpsc`-channel realization of [`Transport`]: one receiver owned by
/// this zone, one sender per peer (including a self-sender, used only by
/// `broadcast`'s root).
pub struct ChannelTransport {
    rank: u32,
    senders: Vec<Sender<WireMessage>>,
    receiver: Receiver<WireMessage>,
    /// Messages received out of the order a caller asked for them, keyed by
    /// `(from, tag)`, buffered until the matching `probe`/`recv` call.
    pending: RefCell<HashMap<(u32, u32), VecDeque<Vec<u8>>>>,
}

/// Builds one [`ChannelTransport`] per zone, fully interconnected.
pub fn make_transports(z_count: u32) -> Vec<ChannelTransport> {
    let mut senders = Vec::with_capacity(z_count as usize);
    let mut receivers = Vec::with_capacity(z_count as usize);
    for _ in 0..z_count {
        let (tx, rx) = mpsc::channel();
        senders.push(tx);
        receivers.push(rx);
    }
    receivers
        .into_iter()
        .enumerate()
        .map(|(rank, receiver)| ChannelTransport {
            rank: rank as u32,
            senders: senders.clone(),
            receiver,
            pending: RefCell::new(HashMap::new()),
        })
        .collect()
}

impl ChannelTransport {
    /// Pulls from the channel, buffering mismatches, until a message
    /// matching `(from, tag)` is at the front of its queue.
    fn fill_until_available(&self, from: u32, tag: u32) -> Result<(), RatwalkError> {
        loop {
            if self
                .pending
                .borrow()
                .get(&(from, tag))
                .is_some_and(|q| !q.is_empty())
            {
                return Ok(());
            }
            let msg = self.receiver.recv().map_err(|_| {
                RatwalkError::transport_failure(format!(
                    "zone {} channel closed while awaiting ({}, {})",
                    self.rank, from, tag
                ))
            })?;
            self.pending
                .borrow_mut()
                .entry((msg.from, msg.tag))
                .or_default()
                .push_back(msg.bytes);
        }
    }
}

impl Transport for ChannelTransport {
    fn rank(&self) -> u32 {
        self.rank
    }

    fn peer_count(&self) -> u32 {
        self.senders.len() as u32
    }

    fn isend(&self, peer: u32, tag: u32, bytes: Vec<u8>) -> Result<SendHandle, RatwalkError> {
        self.senders[peer as usize]
            .send(WireMessage {
                from: self.rank,
                tag,
                bytes,
            })
            .map_err(|_| {
                RatwalkError::transport_failure(format!(
                    "zone {} send to {} failed: peer channel closed",
                    self.rank, peer
                ))
            })?;
        Ok(SendHandle)
    }

    fn probe(&self, peer: u32, tag: u32) -> Result<usize, RatwalkError> {
        self.fill_until_available(peer, tag)?;
        let pending = self.pending.borrow();
        Ok(pending[&(peer, tag)].front().unwrap().len())
    }

    fn recv(&self, peer: u32, tag: u32) -> Result<Vec<u8>, RatwalkError> {
        self.fill_until_available(peer, tag)?;
        let mut pending = self.pending.borrow_mut();
        let queue = pending.get_mut(&(peer, tag)).unwrap();
        Ok(queue.pop_front().unwrap())
    }

    fn wait(&self, _handle: SendHandle) -> Result<(), RatwalkError> {
        Ok(())
    }

    fn broadcast(&self, root: u32, bytes: Option<Vec<u8>>, tag: u32) -> Result<Vec<u8>, RatwalkError> {
        if self.rank == root {
            let payload = bytes.ok_or_else(|| {
                RatwalkError::invariant_violation("broadcast root called without a payload")
            })?;
            let mut handles = Vec::new();
            for peer in 0..self.peer_count() {
                if peer != self.rank {
                    handles.push(self.isend(peer, tag, payload.clone())?);
                }
            }
            for h in handles {
                self.wait(h)?;
            }
            Ok(payload)
        } else {
            self.recv(root, tag)
        }
    }
}
