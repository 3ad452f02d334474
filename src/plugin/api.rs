//! Public API for the plugin roster and the plugin-side embedded API
//!
//! External modules should import from here rather than directly from
//! internal modules.

pub use crate::plugin::embedded::{CallHandler, EmbeddedPluginApi};
pub use crate::plugin::error::{PluginError, PluginResult};
pub use crate::plugin::roster::{PluginRoster, RosterTable, SharedPluginRoster};
pub use crate::plugin::types::PluginDescriptor;
