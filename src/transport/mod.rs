//! Transport Module
//!
//! The boundary to the cross-frame message channel, plus an in-process
//! implementation used by tests and the simulator.

// Internal modules - all access should go through api module
pub(crate) mod error;
pub(crate) mod loopback;
pub(crate) mod traits;
pub(crate) mod types;

pub mod api;
