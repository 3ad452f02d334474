//! Plugin Roster
//!
//! The ordered set of plugins the host knows about. The bridge reads it
//! through the [`PluginRoster`] trait; the frame lifecycle owner writes to
//! the concrete [`SharedPluginRoster`].

use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::types::PluginDescriptor;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Read access to the plugin roster
#[async_trait]
pub trait PluginRoster: Send + Sync {
    /// Look up a plugin by name
    async fn get(&self, name: &str) -> Option<PluginDescriptor>;

    /// Snapshot of all plugins in registration order
    async fn list(&self) -> Vec<PluginDescriptor>;
}

/// Ordered in-memory roster
#[derive(Debug, Default, Clone)]
pub struct RosterTable {
    plugins: Vec<PluginDescriptor>,
}

impl RosterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin; names are unique
    pub fn register(&mut self, descriptor: PluginDescriptor) -> PluginResult<()> {
        if self.position(&descriptor.name).is_some() {
            return Err(PluginError::AlreadyRegistered {
                plugin_name: descriptor.name,
            });
        }
        self.plugins.push(descriptor);
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> PluginResult<PluginDescriptor> {
        let index = self.position_or_err(name)?;
        Ok(self.plugins.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&PluginDescriptor> {
        self.plugins.iter().find(|plugin| plugin.name == name)
    }

    /// Record whether the plugin's frame exists
    pub fn mark_loaded(&mut self, name: &str, loaded: bool) -> PluginResult<()> {
        let index = self.position_or_err(name)?;
        let plugin = &mut self.plugins[index];
        plugin.is_loaded = loaded;
        if !loaded {
            // A torn down frame has to authenticate again
            plugin.is_ready = false;
        }
        Ok(())
    }

    /// Record the outcome of the readiness handshake
    pub fn mark_ready(&mut self, name: &str, ready: bool) -> PluginResult<()> {
        let index = self.position_or_err(name)?;
        self.plugins[index].is_ready = ready;
        Ok(())
    }

    pub fn list(&self) -> &[PluginDescriptor] {
        &self.plugins
    }

    pub fn names(&self) -> Vec<String> {
        self.plugins.iter().map(|plugin| plugin.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.plugins.iter().position(|plugin| plugin.name == name)
    }

    fn position_or_err(&self, name: &str) -> PluginResult<usize> {
        self.position(name).ok_or_else(|| PluginError::PluginNotFound {
            plugin_name: name.to_string(),
        })
    }
}

/// Thread-safe shared roster
#[derive(Debug, Clone, Default)]
pub struct SharedPluginRoster {
    inner: Arc<RwLock<RosterTable>>,
}

impl SharedPluginRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from descriptors, keeping their order
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = PluginDescriptor>,
    ) -> PluginResult<Self> {
        let mut table = RosterTable::new();
        for descriptor in descriptors {
            table.register(descriptor)?;
        }
        Ok(Self {
            inner: Arc::new(RwLock::new(table)),
        })
    }

    pub async fn register(&self, descriptor: PluginDescriptor) -> PluginResult<()> {
        self.inner.write().await.register(descriptor)
    }

    pub async fn unregister(&self, name: &str) -> PluginResult<PluginDescriptor> {
        self.inner.write().await.unregister(name)
    }

    pub async fn mark_loaded(&self, name: &str, loaded: bool) -> PluginResult<()> {
        self.inner.write().await.mark_loaded(name, loaded)
    }

    pub async fn mark_ready(&self, name: &str, ready: bool) -> PluginResult<()> {
        self.inner.write().await.mark_ready(name, ready)
    }

    pub async fn names(&self) -> Vec<String> {
        self.inner.read().await.names()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[async_trait]
impl PluginRoster for SharedPluginRoster {
    async fn get(&self, name: &str) -> Option<PluginDescriptor> {
        self.inner.read().await.get(name).cloned()
    }

    async fn list(&self) -> Vec<PluginDescriptor> {
        self.inner.read().await.list().to_vec()
    }
}
