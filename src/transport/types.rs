//! Message types exchanged with plugin frames

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Message kind used for host lifecycle events
pub const EVENT_MESSAGE_KIND: &str = "event";

/// Target origin accepting any frame origin
pub const ANY_ORIGIN: &str = "*";

/// Identifier of a plugin frame element, e.g. `plugin-gallery`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FrameId(String);

impl FrameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The frame a plugin named `plugin` lives in
    pub fn for_plugin(prefix: &str, plugin: &str) -> Self {
        Self(format!("{}{}", prefix, plugin))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message handed to the transport for delivery into a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub target: FrameId,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Value,
    pub origin: String,
    pub hash: bool,
}

/// The frame an inbound message was posted from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFrame {
    pub id: String,
}

impl SourceFrame {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// One-shot reply path back to the frame that sent a request.
///
/// Dropping a `Reply` without sending leaves the request unanswered.
#[derive(Debug)]
pub struct Reply {
    sender: Option<oneshot::Sender<Value>>,
}

impl Reply {
    pub fn channel() -> (Self, oneshot::Receiver<Value>) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// A reply nobody waits for (fire-and-forget messages)
    pub fn detached() -> Self {
        Self { sender: None }
    }

    /// Send the reply; false if the requester is gone or nobody waits
    pub fn send(mut self, value: Value) -> bool {
        match self.sender.take() {
            Some(sender) => sender.send(value).is_ok(),
            None => false,
        }
    }
}

/// A message posted by a plugin frame to the host
#[derive(Debug)]
pub struct InboundMessage {
    pub kind: String,
    pub data: Value,
    pub source: SourceFrame,
    pub reply: Reply,
}

/// Raw handler the transport calls for a bound message kind
pub type InboundHandler = Arc<dyn Fn(InboundMessage) -> BoxFuture<'static, ()> + Send + Sync>;
