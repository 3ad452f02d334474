//! Directed send with readiness gating
//!
//! Decides whether a message may reach a single plugin at all before handing
//! it to the transport: the plugin's frame must exist and the plugin must
//! have completed its readiness handshake.

use crate::bridge::error::{SendError, SendResult};
use crate::bridge::settings::BridgeSettings;
use crate::plugin::api::PluginRoster;
use crate::transport::api::{OutboundMessage, Transport, EVENT_MESSAGE_KIND};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Plugins already warned about for not being ready.
///
/// Keeps a caller that retries a not-yet-ready plugin in a loop from
/// flooding the log. Entries are never removed.
#[derive(Debug, Default)]
pub struct NotReadyWarnings {
    warned: Mutex<HashSet<String>>,
}

impl NotReadyWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `plugin`; true only the first time it is seen
    pub fn first_warning(&self, plugin: &str) -> bool {
        self.warned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(plugin.to_string())
    }

    pub fn has_warned(&self, plugin: &str) -> bool {
        self.warned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(plugin)
    }

    pub fn len(&self) -> usize {
        self.warned.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct DirectedSender {
    roster: Arc<dyn PluginRoster>,
    transport: Arc<dyn Transport>,
    settings: Arc<BridgeSettings>,
    warnings: Arc<NotReadyWarnings>,
}

impl std::fmt::Debug for DirectedSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectedSender")
            .field("settings", &self.settings)
            .field("warnings", &self.warnings)
            .finish()
    }
}

impl DirectedSender {
    pub fn new(
        roster: Arc<dyn PluginRoster>,
        transport: Arc<dyn Transport>,
        settings: Arc<BridgeSettings>,
        warnings: Arc<NotReadyWarnings>,
    ) -> Self {
        Self {
            roster,
            transport,
            settings,
            warnings,
        }
    }

    pub fn warnings(&self) -> &Arc<NotReadyWarnings> {
        &self.warnings
    }

    /// Send a message of `kind` to `plugin` and wait for its reply.
    ///
    /// Fails fast with [`SendError::PluginNotLoaded`] when the plugin has no
    /// frame or is not ready; the transport is not touched in either case.
    pub async fn send(&self, plugin: &str, kind: &str, payload: Value) -> SendResult<Value> {
        if kind != EVENT_MESSAGE_KIND {
            log::info!("Sending {} signal to plugin {}", kind, plugin);
        }

        let target = self.settings.frame_for(plugin);
        if !self.transport.has_frame(&target) {
            log::warn!(
                "Plugin {} does not have a frame, and thus cannot be contacted",
                plugin
            );
            return Err(SendError::PluginNotLoaded {
                plugin_name: plugin.to_string(),
            });
        }

        let is_ready = self
            .roster
            .get(plugin)
            .await
            .is_some_and(|descriptor| descriptor.is_ready);
        if !is_ready {
            if self.warnings.first_warning(plugin) {
                log::warn!("Could not notify {}: plugin not authenticated", plugin);
            }
            return Err(SendError::PluginNotLoaded {
                plugin_name: plugin.to_string(),
            });
        }

        let message = OutboundMessage {
            target,
            kind: kind.to_string(),
            data: payload,
            origin: self.settings.target_origin.clone(),
            hash: false,
        };

        self.transport
            .send(message)
            .await
            .map_err(|source| SendError::Transport {
                plugin_name: plugin.to_string(),
                source,
            })
    }

    /// Send lifecycle `event` to one plugin as `{"type": event, "data": payload}`.
    ///
    /// A plugin the roster does not know or does not list as loaded gets
    /// [`SendError::Unavailable`] carrying the payload back.
    pub async fn directed_send(
        &self,
        plugin: &str,
        event: &str,
        payload: Value,
    ) -> SendResult<Value> {
        let loaded = self
            .roster
            .get(plugin)
            .await
            .is_some_and(|descriptor| descriptor.is_loaded);
        if !loaded {
            log::debug!("Skipping {} for plugin {}: not loaded", event, plugin);
            return Err(SendError::Unavailable {
                plugin_name: plugin.to_string(),
                payload,
            });
        }

        self.send(
            plugin,
            EVENT_MESSAGE_KIND,
            json!({ "type": event, "data": payload }),
        )
        .await
    }
}
