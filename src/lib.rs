//! Distributed biased-random-walk simulation over a partitioned grid graph.
//!
//! The graph is split into disjoint zones, one per worker; workers exchange
//! boundary state (migrating rats, node counts, node weights) every batch
//! through the [`sim::transport::Transport`] capability. See `DESIGN.md`
//! for design rationale behind each module.

pub mod cli;
pub mod error;
pub mod graph;
pub mod mathkernel;
pub mod partition;
pub mod prng;
pub mod rats;
pub mod settings;
pub mod sim;
pub mod zone_assigner;
pub mod zone_setup;
