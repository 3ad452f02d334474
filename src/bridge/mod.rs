//! Bridge Module
//!
//! The host's half of the plugin protocol: readiness-gated directed sends,
//! sequential event fan-out, inbound message authorization and the core
//! message handlers.

// Internal modules - all access should go through api module
pub(crate) mod dispatcher;
pub(crate) mod error;
pub(crate) mod handlers;
pub(crate) mod host;
pub(crate) mod inbound;
pub(crate) mod sender;
pub(crate) mod settings;

pub mod api;

#[cfg(test)]
mod tests;
