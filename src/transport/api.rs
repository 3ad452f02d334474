//! Public API for the transport layer
//!
//! External modules should import from here rather than directly from
//! internal modules.

pub use crate::transport::error::{TransportError, TransportResult};
pub use crate::transport::loopback::LoopbackTransport;
pub use crate::transport::traits::Transport;
pub use crate::transport::types::{
    FrameId, InboundHandler, InboundMessage, OutboundMessage, Reply, SourceFrame, ANY_ORIGIN,
    EVENT_MESSAGE_KIND,
};
