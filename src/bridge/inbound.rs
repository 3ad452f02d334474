//! Inbound message authorization
//!
//! A message posted to the host claims its sender in the `src_plugin` field.
//! It is only accepted when it arrived on that plugin's own frame and the
//! plugin has completed its handshake.

use crate::bridge::settings::BridgeSettings;
use crate::plugin::api::PluginRoster;
use crate::transport::api::SourceFrame;
use serde_json::Value;
use std::sync::Arc;

/// Payload field naming the plugin that posted a message
pub const SOURCE_PLUGIN_FIELD: &str = "src_plugin";

#[derive(Clone)]
pub struct InboundGate {
    roster: Arc<dyn PluginRoster>,
    settings: Arc<BridgeSettings>,
}

impl InboundGate {
    pub fn new(roster: Arc<dyn PluginRoster>, settings: Arc<BridgeSettings>) -> Self {
        Self { roster, settings }
    }

    /// Whether a message with `data` posted from `source` may reach a handler.
    /// Rejections are logged here.
    pub async fn verify(&self, data: &Value, source: &SourceFrame) -> bool {
        let claimed = data.get(SOURCE_PLUGIN_FIELD).and_then(Value::as_str);

        if let Some(plugin) = claimed {
            if source.id == self.settings.frame_for(plugin).as_str() {
                let ready = self
                    .roster
                    .get(plugin)
                    .await
                    .is_some_and(|descriptor| descriptor.is_ready);
                if ready {
                    return true;
                }
            }
        }

        log::warn!(
            "Unauthenticated plugin {} attempted to use API (frame {})",
            claimed.unwrap_or("<unnamed>"),
            source.id
        );
        false
    }
}
