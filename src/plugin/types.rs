//! Type definitions for plugin records

use serde::{Deserialize, Serialize};

/// What the bridge knows about one plugin.
///
/// `is_loaded` means the plugin's frame is in the page; `is_ready` means the
/// plugin finished its authentication handshake with the host. The roster
/// owns these records, the bridge only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub name: String,
    #[serde(default)]
    pub is_loaded: bool,
    #[serde(default)]
    pub is_ready: bool,
}

impl PluginDescriptor {
    /// A registered plugin whose frame has not been created yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_loaded: false,
            is_ready: false,
        }
    }

    /// A plugin with a frame that completed its handshake
    pub fn ready(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_loaded: true,
            is_ready: true,
        }
    }

    pub fn with_loaded(mut self, loaded: bool) -> Self {
        self.is_loaded = loaded;
        self
    }

    pub fn with_ready(mut self, ready: bool) -> Self {
        self.is_ready = ready;
        self
    }
}
