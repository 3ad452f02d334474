//! Transport Error Types

use crate::transport::types::FrameId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Frame {frame} is closed")]
    FrameClosed { frame: FrameId },

    #[error("Frame {frame} does not answer '{kind}' messages")]
    NoHandler { frame: FrameId, kind: String },

    #[error("Host does not handle '{kind}' messages")]
    Unbound { kind: String },

    #[error("Request '{kind}' was dropped without a reply")]
    ReplyDropped { kind: String },
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

impl crate::core::error_handling::ContextualError for TransportError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}
