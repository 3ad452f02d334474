//! Common test utilities and helpers
//!
//! Builds a host and in-process plugins wired together over the loopback
//! transport.

#![allow(dead_code)]

use framebridge::bridge::api::{BridgeHost, BridgeSettings};
use framebridge::plugin::api::{
    EmbeddedPluginApi, PluginDescriptor, PluginRoster, SharedPluginRoster,
};
use framebridge::transport::api::{LoopbackTransport, SourceFrame, Transport, TransportResult};
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;

pub struct TestBridge {
    pub host: BridgeHost,
    pub roster: Arc<SharedPluginRoster>,
    pub transport: Arc<LoopbackTransport>,
    pub settings: BridgeSettings,
}

impl TestBridge {
    pub fn new() -> Self {
        let settings = BridgeSettings::default();
        let roster = Arc::new(SharedPluginRoster::new());
        let transport = Arc::new(LoopbackTransport::new());
        let host = BridgeHost::new(
            Arc::clone(&roster) as Arc<dyn PluginRoster>,
            Arc::clone(&transport) as Arc<dyn Transport>,
            settings.clone(),
        );
        Self {
            host,
            roster,
            transport,
            settings,
        }
    }

    /// Register a plugin and attach its frame; it still has to become ready
    pub async fn load_plugin(&self, name: &str) -> Arc<EmbeddedPluginApi> {
        self.roster
            .register(PluginDescriptor::new(name).with_loaded(true))
            .await
            .unwrap();
        let api = Arc::new(EmbeddedPluginApi::new(name));
        self.transport
            .attach(self.settings.frame_for(name), Arc::clone(&api));
        api
    }

    /// Complete the readiness handshake for `name`
    pub async fn make_ready(&self, name: &str) {
        self.roster.mark_ready(name, true).await.unwrap();
    }

    /// Post a request from `name`'s own frame, claiming to be `name`
    pub async fn post_as(&self, name: &str, kind: &str, mut data: Value) -> TransportResult<Value> {
        if let Some(fields) = data.as_object_mut() {
            fields.insert("src_plugin".to_string(), Value::String(name.to_string()));
        }
        self.transport
            .post_from_frame(
                SourceFrame::new(self.settings.frame_for(name).as_str()),
                kind,
                data,
            )
            .await
    }
}

/// Write `contents` to a temporary TOML file
pub fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}
