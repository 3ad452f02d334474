//! Listener Registry
//!
//! In-process pub/sub used by the host and by each embedded plugin API to
//! expose lifecycle events to application code without touching the transport.

// Internal modules - all access should go through api module
pub(crate) mod catalog;
pub(crate) mod envelope;
pub(crate) mod error;
pub(crate) mod registry;

pub mod api;

#[cfg(test)]
mod tests;
