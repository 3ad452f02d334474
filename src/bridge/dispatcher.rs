//! Event fan-out
//!
//! Delivers one event to every plugin in the roster, one plugin at a time
//! and in roster order. A plugin that cannot be reached or is not ready is
//! recorded and skipped; it never stops delivery to the plugins after it.
//! Once every plugin has been attempted the host's local listeners are
//! notified and the broadcast completes with the original payload.

use crate::bridge::error::SendError;
use crate::bridge::sender::DirectedSender;
use crate::bridge::settings::BridgeSettings;
use crate::listeners::api::ListenerRegistry;
use crate::plugin::api::PluginRoster;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryStatus {
    /// The plugin replied
    Delivered(Value),
    /// The send failed and was absorbed
    Failed(SendError),
}

/// Outcome of one plugin's directed send
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub plugin: String,
    pub status: DeliveryStatus,
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self.status, DeliveryStatus::Delivered(_))
    }
}

/// Result of a finished broadcast.
///
/// `payload` is always the payload the broadcast started with; plugin
/// replies are only recorded in `deliveries`.
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastOutcome {
    pub event: String,
    pub payload: Value,
    /// Roster size when the broadcast started
    pub attempted: usize,
    /// Plugins whose send finished, successfully or not
    pub completed: usize,
    pub deliveries: Vec<Delivery>,
    /// False if a local listener vetoed the event
    pub proceed: bool,
}

impl BroadcastOutcome {
    pub fn delivered_count(&self) -> usize {
        self.deliveries.iter().filter(|d| d.is_delivered()).count()
    }

    pub fn failed_plugins(&self) -> Vec<&str> {
        self.deliveries
            .iter()
            .filter(|d| !d.is_delivered())
            .map(|d| d.plugin.as_str())
            .collect()
    }

    /// JSON summary for reports
    pub fn to_json(&self) -> Value {
        let deliveries: Vec<Value> = self
            .deliveries
            .iter()
            .map(|delivery| match &delivery.status {
                DeliveryStatus::Delivered(reply) => json!({
                    "plugin": delivery.plugin,
                    "status": "delivered",
                    "reply": reply,
                }),
                DeliveryStatus::Failed(error) => json!({
                    "plugin": delivery.plugin,
                    "status": "failed",
                    "error": error.to_string(),
                }),
            })
            .collect();

        json!({
            "event": self.event,
            "payload": self.payload,
            "attempted": self.attempted,
            "completed": self.completed,
            "proceed": self.proceed,
            "deliveries": deliveries,
        })
    }
}

/// Working state of one broadcast call
struct DispatchSession {
    event: String,
    payload: Value,
    total: usize,
    completed: usize,
    deliveries: Vec<Delivery>,
}

impl DispatchSession {
    fn new(event: &str, payload: Value, total: usize) -> Self {
        Self {
            event: event.to_string(),
            payload,
            total,
            completed: 0,
            deliveries: Vec::with_capacity(total),
        }
    }

    fn record(&mut self, plugin: String, status: DeliveryStatus) {
        self.completed += 1;
        self.deliveries.push(Delivery { plugin, status });
    }

    fn finish(self, proceed: bool) -> BroadcastOutcome {
        BroadcastOutcome {
            event: self.event,
            payload: self.payload,
            attempted: self.total,
            completed: self.completed,
            deliveries: self.deliveries,
            proceed,
        }
    }
}

pub struct EventDispatcher {
    roster: Arc<dyn PluginRoster>,
    sender: Arc<DirectedSender>,
    listeners: Arc<ListenerRegistry>,
    settings: Arc<BridgeSettings>,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("sender", &self.sender)
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl EventDispatcher {
    pub fn new(
        roster: Arc<dyn PluginRoster>,
        sender: Arc<DirectedSender>,
        listeners: Arc<ListenerRegistry>,
        settings: Arc<BridgeSettings>,
    ) -> Self {
        Self {
            roster,
            sender,
            listeners,
            settings,
        }
    }

    /// Deliver `event` to every plugin, then to local listeners.
    ///
    /// Never fails: per-plugin errors are recorded in the outcome. Plugin
    /// `i + 1` is not contacted before plugin `i`'s send has resolved.
    pub async fn broadcast(&self, event: impl AsRef<str>, payload: Value) -> BroadcastOutcome {
        let event = event.as_ref();
        let roster = self.roster.list().await;
        let mut session = DispatchSession::new(event, payload, roster.len());

        if roster.is_empty() {
            log::info!("No plugins loaded, and thus event {} is ignored", event);
        }

        for plugin in roster {
            let status = match self
                .sender
                .directed_send(&plugin.name, event, session.payload.clone())
                .await
            {
                Ok(reply) => DeliveryStatus::Delivered(reply),
                Err(error) => {
                    log::debug!("Event {} not delivered to {}: {}", event, plugin.name, error);
                    DeliveryStatus::Failed(error)
                }
            };
            session.record(plugin.name, status);
        }

        if session.total > 0 && !self.settings.is_quiet(event) {
            log::info!("All plugins notified of {} ({})", event, session.total);
        }

        let proceed = self.listeners.notify(event, &session.payload);
        session.finish(proceed)
    }

    /// [`broadcast`](Self::broadcast), then call `on_complete` once with the
    /// original payload
    pub async fn broadcast_then<F>(
        &self,
        event: impl AsRef<str>,
        payload: Value,
        on_complete: F,
    ) -> BroadcastOutcome
    where
        F: FnOnce(Value),
    {
        let outcome = self.broadcast(event, payload).await;
        on_complete(outcome.payload.clone());
        outcome
    }
}
