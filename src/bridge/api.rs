//! Public API for the bridge
//!
//! External modules should import from here rather than directly from
//! internal modules.

pub use crate::bridge::dispatcher::{BroadcastOutcome, Delivery, DeliveryStatus, EventDispatcher};
pub use crate::bridge::error::{SendError, SendResult};
pub use crate::bridge::handlers::{
    find_tag_type, register_core_handlers, DomainActions, MessageLevel, CREATE_TAG,
    GET_CATEGORIES, GET_TAG_TYPE, GET_TAG_TYPES, LOAD_REVISION, PLUGIN_RELOAD, PLUGIN_START,
    PLUGIN_STOP,
};
pub use crate::bridge::host::BridgeHost;
pub use crate::bridge::inbound::{InboundGate, SOURCE_PLUGIN_FIELD};
pub use crate::bridge::sender::{DirectedSender, NotReadyWarnings};
pub use crate::bridge::settings::{BridgeSettings, DEFAULT_FRAME_PREFIX};
