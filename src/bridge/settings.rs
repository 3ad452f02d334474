//! Bridge settings
//!
//! Loaded from the `[bridge]` table of the configuration file; every field
//! has a default so an empty table is valid.

use crate::listeners::api::LifecycleEvent;
use crate::transport::api::{FrameId, ANY_ORIGIN};
use serde::Deserialize;

pub const DEFAULT_FRAME_PREFIX: &str = "plugin-";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeSettings {
    /// Prefix joining a plugin name to its frame element id
    pub frame_prefix: String,

    /// Target origin attached to every outbound message
    pub target_origin: String,

    /// Events whose fan-out completion is not logged
    pub quiet_events: Vec<String>,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            frame_prefix: DEFAULT_FRAME_PREFIX.to_string(),
            target_origin: ANY_ORIGIN.to_string(),
            // Sent on every keystroke
            quiet_events: vec![LifecycleEvent::ModifiedContent.name().to_string()],
        }
    }
}

impl BridgeSettings {
    pub fn frame_for(&self, plugin: &str) -> FrameId {
        FrameId::for_plugin(&self.frame_prefix, plugin)
    }

    pub fn is_quiet(&self, event: &str) -> bool {
        self.quiet_events.iter().any(|quiet| quiet == event)
    }
}
