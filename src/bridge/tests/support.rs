//! Shared fixtures for bridge tests

use crate::plugin::api::{PluginDescriptor, SharedPluginRoster};
use crate::transport::api::{
    FrameId, InboundHandler, OutboundMessage, Transport, TransportError, TransportResult,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Transport that records the order in which sends start and finish
#[derive(Default)]
pub struct ScriptedTransport {
    frames: Mutex<HashSet<FrameId>>,
    replies: Mutex<HashMap<FrameId, TransportResult<Value>>>,
    pub messages: Mutex<Vec<OutboundMessage>>,
    pub timeline: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub bound: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn with_frames(frames: &[&str]) -> Self {
        Self {
            frames: Mutex::new(frames.iter().map(|f| FrameId::new(*f)).collect()),
            ..Self::default()
        }
    }

    /// Make every send take `delay` so overlapping sends would be visible
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn reply_with(&self, frame: &str, reply: TransportResult<Value>) {
        self.replies
            .lock()
            .unwrap()
            .insert(FrameId::new(frame), reply);
    }

    pub fn send_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn timeline(&self) -> Vec<String> {
        self.timeline.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn has_frame(&self, frame: &FrameId) -> bool {
        self.frames.lock().unwrap().contains(frame)
    }

    async fn send(&self, message: OutboundMessage) -> TransportResult<Value> {
        let target = message.target.clone();
        self.messages.lock().unwrap().push(message);
        self.timeline.lock().unwrap().push(format!("start:{}", target));

        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.timeline.lock().unwrap().push(format!("end:{}", target));

        self.replies
            .lock()
            .unwrap()
            .get(&target)
            .cloned()
            .unwrap_or(Ok(Value::Bool(true)))
    }

    fn bind(&self, kind: &str, _handler: InboundHandler) {
        self.bound.lock().unwrap().push(kind.to_string());
    }
}

/// Roster from `(name, loaded, ready)` triples
pub fn roster(plugins: &[(&str, bool, bool)]) -> Arc<SharedPluginRoster> {
    let descriptors = plugins.iter().map(|(name, loaded, ready)| {
        PluginDescriptor::new(*name)
            .with_loaded(*loaded)
            .with_ready(*ready)
    });
    Arc::new(SharedPluginRoster::from_descriptors(descriptors).expect("unique plugin names"))
}

pub fn frame_closed(frame: &str) -> TransportError {
    TransportError::FrameClosed {
        frame: FrameId::new(frame),
    }
}

/// Process-wide `log` backend that keeps every record for inspection.
///
/// Tests share it, so assertions should filter on names unique to the test.
struct CapturedLog {
    records: Mutex<Vec<(log::Level, String)>>,
}

static CAPTURED_LOG: CapturedLog = CapturedLog {
    records: Mutex::new(Vec::new()),
};

impl log::Log for CapturedLog {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let message = record.args().to_string();
        self.records.lock().unwrap().push((record.level(), message));
    }

    fn flush(&self) {}
}

/// Route `log` output to the capture buffer for the rest of the test run
pub fn capture_logs() {
    static INSTALL: std::sync::Once = std::sync::Once::new();
    INSTALL.call_once(|| {
        if log::set_logger(&CAPTURED_LOG).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
}

/// Captured messages at `level` that contain `needle`
pub fn captured(level: log::Level, needle: &str) -> Vec<String> {
    CAPTURED_LOG
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(record_level, message)| *record_level == level && message.contains(needle))
        .map(|(_, message)| message.clone())
        .collect()
}
