//! Plugin-side embedded API
//!
//! The object a plugin document uses to talk to the host. Events the host
//! pushes arrive as `{"type": <event>, "data": <payload>}`; application code
//! subscribes with [`EmbeddedPluginApi::on`] and sees only the payload.
//! Request/response calls from the host go to handlers registered with
//! [`EmbeddedPluginApi::handle`].

use crate::listeners::api::{ListenerRegistry, ListenerResult, Verdict};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

/// Handler for a request kind sent by the host
pub type CallHandler = Arc<dyn Fn(Value) -> BoxFuture<'static, Value> + Send + Sync>;

pub struct EmbeddedPluginApi {
    name: String,
    listeners: ListenerRegistry,
    handlers: RwLock<HashMap<String, CallHandler>>,
}

impl std::fmt::Debug for EmbeddedPluginApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        let mut kinds: Vec<&String> = handlers.keys().collect();
        kinds.sort();
        f.debug_struct("EmbeddedPluginApi")
            .field("name", &self.name)
            .field("listeners", &self.listeners)
            .field("handlers", &kinds)
            .finish()
    }
}

impl EmbeddedPluginApi {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            listeners: ListenerRegistry::new(),
            handlers: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subscribe to a host event
    pub fn on<F, R>(&self, event: impl AsRef<str>, callback: F) -> ListenerResult<usize>
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        self.listeners.add(event, callback)
    }

    pub fn off(&self, event: impl AsRef<str>, index: usize) {
        self.listeners.remove(event, index);
    }

    pub fn off_all(&self, event: Option<&str>) {
        self.listeners.remove_all(event);
    }

    /// Deliver a host event message to local listeners.
    ///
    /// Returns the veto aggregate, which becomes the reply to the host.
    /// A message without a `type` is ignored and does not object.
    pub fn receive_event(&self, message: &Value) -> bool {
        match message.get("type").and_then(Value::as_str) {
            Some(event) => self.listeners.notify(event, message),
            None => {
                log::warn!("Plugin {} received an event without a type", self.name);
                true
            }
        }
    }

    /// Answer requests of `kind` from the host
    pub fn handle<F, Fut>(&self, kind: impl Into<String>, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        let handler: CallHandler = Arc::new(move |data| handler(data).boxed());
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind.into(), handler);
    }

    /// Run the handler for `kind`, or `None` if the plugin does not answer it
    pub async fn answer(&self, kind: &str, data: Value) -> Option<Value> {
        let handler = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(kind)
            .cloned()?;
        Some(handler(data).await)
    }
}
