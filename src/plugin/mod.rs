//! Plugin Module
//!
//! The roster of plugins the host knows about, and the embedded API a plugin
//! document uses on its side of the frame boundary.

// Internal modules - all access should go through api module
pub(crate) mod embedded;
pub(crate) mod error;
pub(crate) mod roster;
pub(crate) mod types;

pub mod api;
