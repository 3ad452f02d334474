//! Event payload envelope
//!
//! Events travel either as a bare value or wrapped as `{"data": value, ...}`.
//! Listeners always receive the inner value; the distinction is resolved once
//! per notification.

use serde_json::Value;

/// A payload as it arrives at the registry boundary
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    /// The payload is the value listeners receive
    Direct(T),
    /// The payload carried a `data` field; listeners receive only that field
    Wrapped { data: T },
}

impl<T> Envelope<T> {
    pub fn wrap(data: T) -> Self {
        Envelope::Wrapped { data }
    }

    /// The value handed to listeners
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Direct(value) => value,
            Envelope::Wrapped { data } => data,
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, Envelope::Wrapped { .. })
    }
}

impl Envelope<Value> {
    /// Classify a borrowed payload, cloning only the part listeners will see.
    ///
    /// An object with a `data` key is wrapped even when `data` is `null`.
    pub fn resolve(payload: &Value) -> Self {
        match payload.as_object().and_then(|fields| fields.get("data")) {
            Some(data) => Envelope::Wrapped { data: data.clone() },
            None => Envelope::Direct(payload.clone()),
        }
    }
}

impl From<Value> for Envelope<Value> {
    fn from(payload: Value) -> Self {
        match payload {
            Value::Object(mut fields) => match fields.remove("data") {
                Some(data) => Envelope::Wrapped { data },
                None => Envelope::Direct(Value::Object(fields)),
            },
            other => Envelope::Direct(other),
        }
    }
}
