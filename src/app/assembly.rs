//! Bridge assembly from configuration
//!
//! Builds the roster, the loopback transport with one embedded plugin per
//! loaded entry, and the host on top of them.

use crate::app::config::BridgeConfig;
use crate::app::error::AppResult;
use crate::bridge::api::BridgeHost;
use crate::plugin::api::{EmbeddedPluginApi, PluginDescriptor, PluginRoster, SharedPluginRoster};
use crate::transport::api::{LoopbackTransport, Transport};
use serde_json::Value;
use std::sync::Arc;

/// A host wired to in-process plugins
#[derive(Debug)]
pub struct AssembledBridge {
    pub host: BridgeHost,
    pub roster: Arc<SharedPluginRoster>,
    pub transport: Arc<LoopbackTransport>,
    pub plugins: Vec<Arc<EmbeddedPluginApi>>,
}

pub async fn assemble_bridge(config: &BridgeConfig) -> AppResult<AssembledBridge> {
    let roster = Arc::new(SharedPluginRoster::new());
    let transport = Arc::new(LoopbackTransport::new());
    let mut plugins = Vec::new();

    for entry in &config.plugins {
        roster
            .register(
                PluginDescriptor::new(entry.name.as_str())
                    .with_loaded(entry.loaded)
                    .with_ready(entry.loaded && entry.ready),
            )
            .await?;

        if !entry.loaded {
            log::debug!("Plugin {} is configured but not loaded", entry.name);
            continue;
        }

        let api = Arc::new(EmbeddedPluginApi::new(entry.name.as_str()));
        for event in &entry.veto {
            let plugin = entry.name.clone();
            api.on(event, move |_: &Value| {
                log::info!("Plugin {} objects to the event", plugin);
                false
            })?;
        }
        transport.attach(config.bridge.frame_for(&entry.name), Arc::clone(&api));
        plugins.push(api);
    }

    let host = BridgeHost::new(
        Arc::clone(&roster) as Arc<dyn PluginRoster>,
        Arc::clone(&transport) as Arc<dyn Transport>,
        config.bridge.clone(),
    );
    log::debug!(
        "Assembled bridge with {} plugins ({} loaded)",
        config.plugins.len(),
        plugins.len()
    );

    Ok(AssembledBridge {
        host,
        roster,
        transport,
        plugins,
    })
}
