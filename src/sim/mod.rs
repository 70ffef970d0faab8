//! Per-zone simulation: state, transport, batch kernel, exchanges, worker loop.

pub mod batch;
pub mod exchange;
pub mod state;
pub mod transport;
pub mod worker;
