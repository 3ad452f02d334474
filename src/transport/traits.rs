//! Transport trait
//!
//! The cross-frame message channel. Implementations post messages into plugin
//! frames, correlate replies with requests, and call bound handlers for
//! messages posted by frames.

use crate::transport::error::TransportResult;
use crate::transport::types::{FrameId, InboundHandler, OutboundMessage};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Whether a frame element with this id exists in the page
    fn has_frame(&self, frame: &FrameId) -> bool;

    /// Post a message into its target frame and wait for the reply
    async fn send(&self, message: OutboundMessage) -> TransportResult<Value>;

    /// Route inbound messages of `kind` to `handler`, replacing any previous one
    fn bind(&self, kind: &str, handler: InboundHandler);
}
