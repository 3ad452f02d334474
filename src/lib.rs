//! framebridge
//!
//! Messaging bridge between a host document and plugin documents living in
//! isolated frames: per-event listener registries on both sides, sequential
//! event fan-out from the host, and readiness-gated directed sends.

pub mod app;
pub mod bridge;
pub mod core;
pub mod listeners;
pub mod plugin;
pub mod transport;
