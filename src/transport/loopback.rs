//! In-process transport
//!
//! Routes host messages straight into [`EmbeddedPluginApi`] instances
//! attached under a frame id, and plugin messages straight into the host's
//! bound handlers. Every outbound message is journaled.

use crate::plugin::api::EmbeddedPluginApi;
use crate::transport::error::{TransportError, TransportResult};
use crate::transport::traits::Transport;
use crate::transport::types::{
    FrameId, InboundHandler, InboundMessage, OutboundMessage, Reply, SourceFrame,
    EVENT_MESSAGE_KIND,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

#[derive(Default)]
pub struct LoopbackTransport {
    frames: RwLock<HashMap<FrameId, Arc<EmbeddedPluginApi>>>,
    bindings: RwLock<HashMap<String, InboundHandler>>,
    journal: Mutex<Vec<OutboundMessage>>,
}

impl std::fmt::Debug for LoopbackTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let frames = self.frames.read().unwrap_or_else(PoisonError::into_inner);
        let bindings = self.bindings.read().unwrap_or_else(PoisonError::into_inner);
        let mut frame_ids: Vec<&FrameId> = frames.keys().collect();
        frame_ids.sort();
        let mut kinds: Vec<&String> = bindings.keys().collect();
        kinds.sort();
        f.debug_struct("LoopbackTransport")
            .field("frames", &frame_ids)
            .field("bindings", &kinds)
            .finish()
    }
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a plugin document into a frame
    pub fn attach(&self, frame: FrameId, api: Arc<EmbeddedPluginApi>) {
        log::debug!("Attaching plugin {} to frame {}", api.name(), frame);
        self.frames
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(frame, api);
    }

    /// Remove a frame from the page
    pub fn detach(&self, frame: &FrameId) -> Option<Arc<EmbeddedPluginApi>> {
        self.frames
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(frame)
    }

    /// Messages sent so far, oldest first
    pub fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_bound(&self, kind: &str) -> bool {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(kind)
    }

    /// Post a message from a frame to the host and wait for the reply.
    ///
    /// A handler that drops its reply (for example after rejecting an
    /// unauthenticated sender) surfaces here as [`TransportError::ReplyDropped`].
    pub async fn post_from_frame(
        &self,
        source: SourceFrame,
        kind: &str,
        data: Value,
    ) -> TransportResult<Value> {
        let handler = self
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(kind)
            .cloned()
            .ok_or_else(|| TransportError::Unbound {
                kind: kind.to_string(),
            })?;

        let (reply, receiver) = Reply::channel();
        handler(InboundMessage {
            kind: kind.to_string(),
            data,
            source,
            reply,
        })
        .await;

        receiver.await.map_err(|_| TransportError::ReplyDropped {
            kind: kind.to_string(),
        })
    }

    fn frame(&self, frame: &FrameId) -> Option<Arc<EmbeddedPluginApi>> {
        self.frames
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(frame)
            .cloned()
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    fn has_frame(&self, frame: &FrameId) -> bool {
        self.frames
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(frame)
    }

    async fn send(&self, message: OutboundMessage) -> TransportResult<Value> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());

        let api = self
            .frame(&message.target)
            .ok_or_else(|| TransportError::FrameClosed {
                frame: message.target.clone(),
            })?;

        if message.kind == EVENT_MESSAGE_KIND {
            return Ok(Value::Bool(api.receive_event(&message.data)));
        }

        let answer = api.answer(&message.kind, message.data).await;
        answer.ok_or(TransportError::NoHandler {
            frame: message.target,
            kind: message.kind,
        })
    }

    fn bind(&self, kind: &str, handler: InboundHandler) {
        self.bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind.to_string(), handler);
    }
}
