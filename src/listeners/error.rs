//! Listener Registry Error Types

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListenerError {
    #[error("Invalid listener registration for '{event}': {reason}")]
    InvalidArgument { event: String, reason: String },
}

/// Result type for listener registry operations
pub type ListenerResult<T> = Result<T, ListenerError>;

impl crate::core::error_handling::ContextualError for ListenerError {
    // A malformed registration is a defect in the registering caller
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ListenerError::InvalidArgument { reason, .. } => Some(reason),
        }
    }
}
