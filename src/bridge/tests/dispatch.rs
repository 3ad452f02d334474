//! Tests for sequential fan-out, completion and local listener notification

use crate::bridge::api::{BridgeSettings, DeliveryStatus, NotReadyWarnings, SendError};
use crate::bridge::host::BridgeHost;
use crate::bridge::tests::support::{frame_closed, roster, ScriptedTransport};
use crate::transport::api::Transport;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn host(
    plugins: &[(&str, bool, bool)],
    transport: &Arc<ScriptedTransport>,
) -> BridgeHost {
    let transport: Arc<dyn Transport> = Arc::clone(transport) as Arc<dyn Transport>;
    BridgeHost::new(roster(plugins), transport, BridgeSettings::default())
}

#[tokio::test]
async fn test_skips_unready_plugin_and_completes_once() {
    let transport = Arc::new(ScriptedTransport::with_frames(&[
        "plugin-a", "plugin-b", "plugin-c",
    ]));
    let host = host(&[("a", true, true), ("b", true, false), ("c", true, true)], &transport);

    let completions = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&completions);
    let outcome = host
        .broadcast_then("afterSave", json!({"id": 7}), move |payload| {
            sink.lock().unwrap().push(payload);
        })
        .await;

    assert_eq!(outcome.attempted, 3);
    assert_eq!(outcome.completed, 3);
    assert_eq!(outcome.delivered_count(), 2);
    assert_eq!(outcome.failed_plugins(), vec!["b"]);
    assert_eq!(
        outcome.deliveries[1].status,
        DeliveryStatus::Failed(SendError::PluginNotLoaded {
            plugin_name: "b".to_string()
        })
    );
    assert_eq!(*completions.lock().unwrap(), vec![json!({"id": 7})]);

    assert_eq!(
        transport.timeline(),
        vec!["start:plugin-a", "end:plugin-a", "start:plugin-c", "end:plugin-c"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_never_more_than_one_send_in_flight() {
    let transport = Arc::new(
        ScriptedTransport::with_frames(&["plugin-a", "plugin-b", "plugin-c", "plugin-d"])
            .with_delay(Duration::from_millis(5)),
    );
    let host = host(
        &[
            ("a", true, true),
            ("b", true, true),
            ("c", true, true),
            ("d", true, true),
        ],
        &transport,
    );

    let outcome = host.broadcast("beforeSave", json!({})).await;

    assert_eq!(outcome.completed, 4);
    assert_eq!(transport.max_in_flight.load(Ordering::SeqCst), 1);
    let timeline = transport.timeline();
    for pair in timeline.chunks(2) {
        assert!(pair[0].starts_with("start:"));
        assert_eq!(pair[1], pair[0].replacen("start:", "end:", 1));
    }
}

#[tokio::test]
async fn test_empty_roster_completes_without_sends() {
    let transport = Arc::new(ScriptedTransport::default());
    let host = host(&[], &transport);
    let completed = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&completed);

    let outcome = host
        .broadcast_then("afterLoad", json!("payload"), move |payload| {
            assert_eq!(payload, json!("payload"));
            *counter.lock().unwrap() += 1;
        })
        .await;

    assert_eq!(outcome.attempted, 0);
    assert_eq!(outcome.completed, 0);
    assert!(outcome.proceed);
    assert_eq!(transport.send_count(), 0);
    assert_eq!(*completed.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_failures_do_not_stop_later_plugins() {
    let transport = Arc::new(ScriptedTransport::with_frames(&["plugin-a", "plugin-c"]));
    transport.reply_with("plugin-a", Err(frame_closed("plugin-a")));
    let host = host(
        &[("a", true, true), ("ghost", false, false), ("c", true, true)],
        &transport,
    );

    let outcome = host.broadcast("afterPublish", json!({"rev": 3})).await;

    assert_eq!(outcome.completed, 3);
    assert_eq!(outcome.failed_plugins(), vec!["a", "ghost"]);
    assert!(matches!(
        &outcome.deliveries[1].status,
        DeliveryStatus::Failed(SendError::Unavailable { payload, .. }) if *payload == json!({"rev": 3})
    ));
    assert!(outcome.deliveries[2].is_delivered());
    assert_eq!(transport.send_count(), 2);
}

#[tokio::test]
async fn test_completion_gets_original_payload_not_replies() {
    let transport = Arc::new(ScriptedTransport::with_frames(&["plugin-a"]));
    transport.reply_with("plugin-a", Ok(json!({"rewritten": true})));
    let host = host(&[("a", true, true)], &transport);

    let outcome = host.broadcast("beforeSave", json!({"body": "x"})).await;

    assert_eq!(outcome.payload, json!({"body": "x"}));
    assert_eq!(
        outcome.deliveries[0].status,
        DeliveryStatus::Delivered(json!({"rewritten": true}))
    );
}

#[tokio::test]
async fn test_events_go_out_wrapped_with_event_kind() {
    let transport = Arc::new(ScriptedTransport::with_frames(&["plugin-a"]));
    let host = host(&[("a", true, true)], &transport);

    host.broadcast("afterSave", json!([1, 2])).await;

    let messages = transport.messages.lock().unwrap();
    assert_eq!(messages[0].kind, "event");
    assert_eq!(messages[0].data, json!({"type": "afterSave", "data": [1, 2]}));
}

#[tokio::test]
async fn test_local_listeners_run_after_fan_out() {
    let transport = Arc::new(ScriptedTransport::with_frames(&["plugin-a", "plugin-b"]));
    let host = host(&[("a", true, true), ("b", true, true)], &transport);

    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);
    let journal = Arc::clone(&transport);
    host.on("afterSave", move |payload: &Value| {
        sink.lock()
            .unwrap()
            .push((payload.clone(), journal.send_count()));
    })
    .unwrap();

    let outcome = host.broadcast("afterSave", json!({"id": 1})).await;

    assert!(outcome.proceed);
    assert_eq!(*observed.lock().unwrap(), vec![(json!({"id": 1}), 2)]);
}

#[tokio::test]
async fn test_local_veto_is_reported() {
    let transport = Arc::new(ScriptedTransport::default());
    let host = host(&[], &transport);
    host.on("beforePublish", |_: &Value| false).unwrap();
    host.on("beforePublish", |_: &Value| true).unwrap();

    assert!(!host.broadcast("beforePublish", json!({})).await.proceed);
    assert!(host.broadcast("afterPublish", json!({})).await.proceed);
}

#[tokio::test]
async fn test_removed_local_listener_is_not_called() {
    let transport = Arc::new(ScriptedTransport::default());
    let host = host(&[], &transport);
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let index = host
        .on("afterSave", move |_: &Value| {
            *counter.lock().unwrap() += 1;
        })
        .unwrap();

    host.broadcast("afterSave", Value::Null).await;
    host.off("afterSave", index);
    host.broadcast("afterSave", Value::Null).await;

    assert_eq!(*calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_outcome_json_summary() {
    let transport = Arc::new(ScriptedTransport::with_frames(&["plugin-a"]));
    let host = host(&[("a", true, true), ("b", true, false)], &transport);

    let summary = host.broadcast("afterSave", json!(1)).await.to_json();

    assert_eq!(summary["event"], "afterSave");
    assert_eq!(summary["completed"], 2);
    assert_eq!(summary["deliveries"][0]["status"], "delivered");
    assert_eq!(summary["deliveries"][1]["status"], "failed");
    assert_eq!(summary["deliveries"][1]["error"], "plugin not loaded");
}

#[tokio::test]
async fn test_off_all_clears_local_listeners() {
    let transport = Arc::new(ScriptedTransport::default());
    let host = host(&[], &transport);
    host.on("beforeSave", |_: &Value| false).unwrap();
    host.on("beforeDelete", |_: &Value| false).unwrap();

    host.off_all(Some("beforeSave"));
    assert!(host.broadcast("beforeSave", Value::Null).await.proceed);
    assert!(!host.broadcast("beforeDelete", Value::Null).await.proceed);

    host.off_all(None);
    assert!(host.broadcast("beforeDelete", Value::Null).await.proceed);
}

#[tokio::test]
async fn test_hosts_can_share_warning_set() {
    let transport = Arc::new(ScriptedTransport::with_frames(&["plugin-a"]));
    let shared = Arc::new(NotReadyWarnings::new());
    let make_host = || {
        let transport: Arc<dyn Transport> = Arc::clone(&transport) as Arc<dyn Transport>;
        BridgeHost::with_warnings(
            roster(&[("a", true, false)]),
            transport,
            BridgeSettings::default(),
            Arc::clone(&shared),
        )
    };

    make_host().broadcast("afterSave", Value::Null).await;
    make_host().broadcast("afterSave", Value::Null).await;

    assert_eq!(shared.len(), 1);
    assert!(make_host().warnings().has_warned("a"));
}
