//! Directed send error types
//!
//! None of these abort a broadcast; the dispatcher records them per plugin.

use crate::transport::api::TransportError;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SendError {
    /// No frame for the plugin, or the plugin never finished its handshake.
    /// The message text is the fixed sentinel plugins and callers match on.
    #[error("plugin not loaded")]
    PluginNotLoaded { plugin_name: String },

    /// Directed event to a plugin the roster does not list as loaded;
    /// hands the undelivered payload back to the caller
    #[error("plugin {plugin_name} is not loaded, event not delivered")]
    Unavailable { plugin_name: String, payload: Value },

    #[error("delivery to plugin {plugin_name} failed: {source}")]
    Transport {
        plugin_name: String,
        #[source]
        source: TransportError,
    },
}

impl SendError {
    pub fn plugin_name(&self) -> &str {
        match self {
            SendError::PluginNotLoaded { plugin_name }
            | SendError::Unavailable { plugin_name, .. }
            | SendError::Transport { plugin_name, .. } => plugin_name,
        }
    }
}

/// Result type for directed sends
pub type SendResult<T> = Result<T, SendError>;

impl crate::core::error_handling::ContextualError for SendError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}
