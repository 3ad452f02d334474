//! Tests for directed send gating and not-ready warnings

use crate::bridge::api::{BridgeSettings, DirectedSender, NotReadyWarnings, SendError};
use crate::bridge::tests::support::{capture_logs, captured, roster, ScriptedTransport};
use crate::transport::api::{FrameId, Transport};
use serde_json::json;
use std::sync::Arc;

fn sender(
    plugins: &[(&str, bool, bool)],
    transport: &Arc<ScriptedTransport>,
    warnings: &Arc<NotReadyWarnings>,
) -> DirectedSender {
    let transport: Arc<dyn Transport> = Arc::clone(transport) as Arc<dyn Transport>;
    DirectedSender::new(
        roster(plugins),
        transport,
        Arc::new(BridgeSettings::default()),
        Arc::clone(warnings),
    )
}

#[tokio::test]
async fn test_missing_frame_fails_without_transport_call() {
    let transport = Arc::new(ScriptedTransport::default());
    let warnings = Arc::new(NotReadyWarnings::new());
    let sender = sender(&[("gallery", true, true)], &transport, &warnings);

    let error = sender
        .send("gallery", "get-selection", json!({}))
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "plugin not loaded");
    assert_eq!(error.plugin_name(), "gallery");
    assert_eq!(transport.send_count(), 0);
    assert!(warnings.is_empty());
}

#[tokio::test]
async fn test_not_ready_plugin_is_warned_about_once() {
    let transport = Arc::new(ScriptedTransport::with_frames(&["plugin-gallery"]));
    let warnings = Arc::new(NotReadyWarnings::new());
    let sender = sender(&[("gallery", true, false)], &transport, &warnings);

    for _ in 0..3 {
        let result = sender.send("gallery", "event", json!(null)).await;
        assert_eq!(
            result,
            Err(SendError::PluginNotLoaded {
                plugin_name: "gallery".to_string()
            })
        );
    }

    assert_eq!(transport.send_count(), 0);
    assert_eq!(warnings.len(), 1);
    assert!(warnings.has_warned("gallery"));
    assert!(!warnings.first_warning("gallery"));
}

#[tokio::test]
async fn test_warnings_are_per_host() {
    let transport = Arc::new(ScriptedTransport::with_frames(&["plugin-gallery"]));
    let first = Arc::new(NotReadyWarnings::new());
    let second = Arc::new(NotReadyWarnings::new());

    let _ = sender(&[("gallery", true, false)], &transport, &first)
        .send("gallery", "event", json!(null))
        .await;

    assert!(first.has_warned("gallery"));
    assert!(second.is_empty());
}

#[tokio::test]
async fn test_ready_plugin_gets_message_for_any_origin() {
    let transport = Arc::new(ScriptedTransport::with_frames(&["plugin-gallery"]));
    transport.reply_with("plugin-gallery", Ok(json!(["img-1"])));
    let warnings = Arc::new(NotReadyWarnings::new());
    let sender = sender(&[("gallery", true, true)], &transport, &warnings);

    let reply = sender
        .send("gallery", "get-selection", json!({"limit": 1}))
        .await
        .unwrap();

    assert_eq!(reply, json!(["img-1"]));
    let messages = transport.messages.lock().unwrap();
    assert_eq!(messages[0].target, FrameId::new("plugin-gallery"));
    assert_eq!(messages[0].kind, "get-selection");
    assert_eq!(messages[0].data, json!({"limit": 1}));
    assert_eq!(messages[0].origin, "*");
    assert!(!messages[0].hash);
}

#[tokio::test]
async fn test_directed_send_to_unknown_plugin_returns_payload() {
    let transport = Arc::new(ScriptedTransport::with_frames(&["plugin-gallery"]));
    let warnings = Arc::new(NotReadyWarnings::new());
    let sender = sender(&[("gallery", false, false)], &transport, &warnings);

    for plugin in ["gallery", "nobody"] {
        let error = sender
            .directed_send(plugin, "afterSave", json!({"id": 5}))
            .await
            .unwrap_err();
        assert_eq!(
            error,
            SendError::Unavailable {
                plugin_name: plugin.to_string(),
                payload: json!({"id": 5}),
            }
        );
    }
    assert_eq!(transport.send_count(), 0);
}

#[tokio::test]
async fn test_directed_send_wraps_event() {
    let transport = Arc::new(ScriptedTransport::with_frames(&["plugin-gallery"]));
    let warnings = Arc::new(NotReadyWarnings::new());
    let sender = sender(&[("gallery", true, true)], &transport, &warnings);

    let reply = sender
        .directed_send("gallery", "beforeSave", json!("draft"))
        .await
        .unwrap();

    assert_eq!(reply, json!(true));
    let messages = transport.messages.lock().unwrap();
    assert_eq!(messages[0].kind, "event");
    assert_eq!(messages[0].data, json!({"type": "beforeSave", "data": "draft"}));
}

#[tokio::test]
async fn test_custom_frame_prefix() {
    let transport = Arc::new(ScriptedTransport::with_frames(&["app-gallery"]));
    let settings = BridgeSettings {
        frame_prefix: "app-".to_string(),
        ..BridgeSettings::default()
    };
    let dyn_transport: Arc<dyn Transport> = Arc::clone(&transport) as Arc<dyn Transport>;
    let sender = DirectedSender::new(
        roster(&[("gallery", true, true)]),
        dyn_transport,
        Arc::new(settings),
        Arc::new(NotReadyWarnings::new()),
    );

    assert!(sender.send("gallery", "ping", json!(null)).await.is_ok());
    assert_eq!(transport.send_count(), 1);
}

#[tokio::test]
async fn test_repeated_not_ready_sends_log_one_warning() {
    capture_logs();
    let transport = Arc::new(ScriptedTransport::with_frames(&["plugin-slowpoke"]));
    let warnings = Arc::new(NotReadyWarnings::new());
    let sender = sender(&[("slowpoke", true, false)], &transport, &warnings);

    for _ in 0..5 {
        let _ = sender.send("slowpoke", "event", json!({})).await;
    }

    assert_eq!(
        captured(log::Level::Warn, "Could not notify slowpoke"),
        vec!["Could not notify slowpoke: plugin not authenticated"]
    );
}

#[tokio::test]
async fn test_missing_frame_warns_on_every_attempt() {
    capture_logs();
    let transport = Arc::new(ScriptedTransport::default());
    let warnings = Arc::new(NotReadyWarnings::new());
    let sender = sender(&[("frameless", true, true)], &transport, &warnings);

    for _ in 0..2 {
        let _ = sender.send("frameless", "event", json!({})).await;
    }

    assert_eq!(
        captured(log::Level::Warn, "Plugin frameless does not have a frame").len(),
        2
    );
}
