//! Core host handlers
//!
//! The message kinds every host answers. Each handler reads its fields off
//! the inbound payload and performs one action through [`DomainActions`];
//! request kinds reply with a value, fire-and-forget kinds reply `true`.
//! A message missing a required field is answered with `false` and the
//! action is not performed.

use crate::bridge::host::BridgeHost;
use serde_json::{json, Value};
use std::sync::Arc;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};

pub const CREATE_TAG: &str = "create-tag";
pub const GET_CATEGORIES: &str = "get-categories";
pub const GET_TAG_TYPE: &str = "get-tag-type";
pub const GET_TAG_TYPES: &str = "get-tag-types";
pub const LOAD_REVISION: &str = "load-revision";
pub const PLUGIN_RELOAD: &str = "plugin-reload";
pub const PLUGIN_START: &str = "plugin-start";
pub const PLUGIN_STOP: &str = "plugin-stop";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum MessageLevel {
    Error,
    Info,
    Warning,
}

impl MessageLevel {
    /// Message kind that shows a message of this level
    pub fn message_kind(self) -> String {
        format!("show-message-{}", self)
    }
}

/// Host-owned domain operations reachable from plugins
pub trait DomainActions: Send + Sync {
    fn create_tag(&self, tag: &str);

    /// All categories of the host
    fn categories(&self) -> Value;

    /// All tag types, or `Value::Null` if none are loaded yet
    fn tag_types(&self) -> Value;

    fn load_revision(&self, revision: i64);

    fn start_plugin(&self, plugin: &str, options: Option<&Value>);

    fn stop_plugin(&self, plugin: &str);

    /// Forget a stopped plugin so it can be started from scratch
    fn remove_plugin(&self, plugin: &str);

    fn show_message(&self, level: MessageLevel, message: &str);
}

/// Bind every core message kind on `host`
pub fn register_core_handlers(host: &BridgeHost, actions: Arc<dyn DomainActions>) {
    let domain = Arc::clone(&actions);
    host.bind(CREATE_TAG, move |data| match str_field(&data, "tag") {
        Some(tag) => {
            domain.create_tag(tag);
            Value::Bool(true)
        }
        None => missing_field(CREATE_TAG, "tag"),
    });

    let domain = Arc::clone(&actions);
    host.bind(GET_CATEGORIES, move |_data| domain.categories());

    let domain = Arc::clone(&actions);
    host.bind(GET_TAG_TYPE, move |data| {
        let id = data.get("id").cloned().unwrap_or(Value::Null);
        find_tag_type(&domain.tag_types(), &id)
    });

    let domain = Arc::clone(&actions);
    host.bind(GET_TAG_TYPES, move |_data| domain.tag_types());

    let domain = Arc::clone(&actions);
    host.bind(LOAD_REVISION, move |data| {
        match data.get("revision").and_then(leading_integer) {
            Some(revision) => {
                domain.load_revision(revision);
                Value::Bool(true)
            }
            None => missing_field(LOAD_REVISION, "revision"),
        }
    });

    let domain = Arc::clone(&actions);
    host.bind(PLUGIN_RELOAD, move |data| match str_field(&data, "plugin") {
        Some(plugin) => {
            domain.stop_plugin(plugin);
            domain.remove_plugin(plugin);
            domain.start_plugin(plugin, None);
            Value::Bool(true)
        }
        None => missing_field(PLUGIN_RELOAD, "plugin"),
    });

    let domain = Arc::clone(&actions);
    host.bind(PLUGIN_START, move |data| match str_field(&data, "plugin") {
        Some(plugin) => {
            domain.start_plugin(plugin, data.get("options"));
            Value::Bool(true)
        }
        None => missing_field(PLUGIN_START, "plugin"),
    });

    let domain = Arc::clone(&actions);
    host.bind(PLUGIN_STOP, move |data| match str_field(&data, "plugin") {
        Some(plugin) => {
            domain.stop_plugin(plugin);
            Value::Bool(true)
        }
        None => missing_field(PLUGIN_STOP, "plugin"),
    });

    for level in MessageLevel::iter() {
        let domain = Arc::clone(&actions);
        let kind = level.message_kind();
        let handled_kind = kind.clone();
        host.bind(&kind, move |data| match str_field(&data, "message") {
            Some(message) => {
                domain.show_message(level, message);
                Value::Bool(true)
            }
            None => missing_field(&handled_kind, "message"),
        });
    }
}

/// Pick the tag type matching `id` from `tag_types`.
///
/// A positive numeric id (or numeric string) matches on `id`, any string
/// matches on `name`. Answers `{}` when nothing matches or no tag types are
/// loaded.
pub fn find_tag_type(tag_types: &Value, id: &Value) -> Value {
    let Some(tag_types) = tag_types.as_array() else {
        return json!({});
    };

    let numeric_id = leading_integer(id).filter(|n| *n > 0);
    let name = id.as_str();

    tag_types
        .iter()
        .find(|tag_type| {
            let id_matches = numeric_id.is_some_and(|wanted| {
                tag_type.get("id").and_then(leading_integer) == Some(wanted)
            });
            let name_matches = name.is_some_and(|wanted| {
                tag_type.get("name").and_then(Value::as_str) == Some(wanted)
            });
            id_matches || name_matches
        })
        .cloned()
        .unwrap_or_else(|| json!({}))
}

/// Integer value of a number, or of the leading digits of a string
fn leading_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float.trunc() as i64)),
        Value::String(text) => {
            let trimmed = text.trim_start();
            let digits_end = trimmed
                .char_indices()
                .find(|&(index, c)| !(c.is_ascii_digit() || (index == 0 && (c == '-' || c == '+'))))
                .map_or(trimmed.len(), |(index, _)| index);
            trimmed[..digits_end].parse().ok()
        }
        _ => None,
    }
}

fn str_field<'a>(data: &'a Value, field: &str) -> Option<&'a str> {
    data.get(field).and_then(Value::as_str)
}

fn missing_field(kind: &str, field: &str) -> Value {
    log::warn!("Ignoring {} message without '{}'", kind, field);
    Value::Bool(false)
}
