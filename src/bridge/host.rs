//! Host side of the bridge
//!
//! Ties the roster, the transport, the host's own listener registry and the
//! dispatch components together. Application code on the host uses this to
//! broadcast events, call single plugins, subscribe to events locally, and
//! answer messages plugins post to the host.

use crate::bridge::dispatcher::{BroadcastOutcome, EventDispatcher};
use crate::bridge::error::SendResult;
use crate::bridge::inbound::InboundGate;
use crate::bridge::sender::{DirectedSender, NotReadyWarnings};
use crate::bridge::settings::BridgeSettings;
use crate::listeners::api::{ListenerRegistry, ListenerResult, Verdict};
use crate::plugin::api::PluginRoster;
use crate::transport::api::{InboundHandler, InboundMessage, Reply, Transport};
use futures::FutureExt;
use serde_json::Value;
use std::sync::Arc;

pub struct BridgeHost {
    roster: Arc<dyn PluginRoster>,
    transport: Arc<dyn Transport>,
    settings: Arc<BridgeSettings>,
    listeners: Arc<ListenerRegistry>,
    sender: Arc<DirectedSender>,
    dispatcher: EventDispatcher,
    gate: InboundGate,
}

impl std::fmt::Debug for BridgeHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeHost")
            .field("settings", &self.settings)
            .field("listeners", &self.listeners)
            .field("warnings", self.sender.warnings())
            .finish()
    }
}

impl BridgeHost {
    pub fn new(
        roster: Arc<dyn PluginRoster>,
        transport: Arc<dyn Transport>,
        settings: BridgeSettings,
    ) -> Self {
        Self::with_warnings(roster, transport, settings, Arc::new(NotReadyWarnings::new()))
    }

    /// Build a host sharing an existing not-ready warning set
    pub fn with_warnings(
        roster: Arc<dyn PluginRoster>,
        transport: Arc<dyn Transport>,
        settings: BridgeSettings,
        warnings: Arc<NotReadyWarnings>,
    ) -> Self {
        let settings = Arc::new(settings);
        let listeners = Arc::new(ListenerRegistry::new());
        let sender = Arc::new(DirectedSender::new(
            Arc::clone(&roster),
            Arc::clone(&transport),
            Arc::clone(&settings),
            warnings,
        ));
        let dispatcher = EventDispatcher::new(
            Arc::clone(&roster),
            Arc::clone(&sender),
            Arc::clone(&listeners),
            Arc::clone(&settings),
        );
        let gate = InboundGate::new(Arc::clone(&roster), Arc::clone(&settings));

        Self {
            roster,
            transport,
            settings,
            listeners,
            sender,
            dispatcher,
            gate,
        }
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    pub fn roster(&self) -> &Arc<dyn PluginRoster> {
        &self.roster
    }

    pub fn warnings(&self) -> &Arc<NotReadyWarnings> {
        self.sender.warnings()
    }

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

    /// Drop the listeners of one event, or of every event with `None`
    pub fn off_all(&self, event: Option<&str>) {
        self.listeners.remove_all(event);
    }

    pub async fn broadcast(&self, event: impl AsRef<str>, payload: Value) -> BroadcastOutcome {
        self.dispatcher.broadcast(event, payload).await
    }

    pub async fn broadcast_then<F>(
        &self,
        event: impl AsRef<str>,
        payload: Value,
        on_complete: F,
    ) -> BroadcastOutcome
    where
        F: FnOnce(Value),
    {
        self.dispatcher
            .broadcast_then(event, payload, on_complete)
            .await
    }

    /// Request/response call to one plugin
    pub async fn send(&self, plugin: &str, kind: &str, payload: Value) -> SendResult<Value> {
        self.sender.send(plugin, kind, payload).await
    }

    /// Lifecycle event to one plugin
    pub async fn directed_send(
        &self,
        plugin: &str,
        event: &str,
        payload: Value,
    ) -> SendResult<Value> {
        self.sender.directed_send(plugin, event, payload).await
    }

    /// Answer messages of `kind` posted by authenticated plugins with the
    /// handler's return value
    pub fn bind<F>(&self, kind: &str, handler: F)
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.bind_with_reply(kind, move |data: Value, reply: Reply| {
            reply.send(handler(data));
        });
    }

    /// Like [`bind`](Self::bind), but the handler decides when to reply
    pub fn bind_with_reply<F>(&self, kind: &str, handler: F)
    where
        F: Fn(Value, Reply) + Send + Sync + 'static,
    {
        let gate = self.gate.clone();
        let handler = Arc::new(handler);

        let raw: InboundHandler = Arc::new(move |message: InboundMessage| {
            let gate = gate.clone();
            let handler = Arc::clone(&handler);
            async move {
                let InboundMessage {
                    kind,
                    data,
                    source,
                    reply,
                } = message;
                // Rejected messages are dropped without a reply
                if gate.verify(&data, &source).await {
                    log::debug!("Handling {} from frame {}", kind, source.id);
                    handler(data, reply);
                }
            }
            .boxed()
        });

        self.transport.bind(kind, raw);
    }
}
