//! Public API for the listener registry
//!
//! External modules should import from here rather than directly from
//! internal modules.

pub use crate::listeners::catalog::{is_vetoable_event, LifecycleEvent};
pub use crate::listeners::envelope::Envelope;
pub use crate::listeners::error::{ListenerError, ListenerResult};
pub use crate::listeners::registry::{Listener, ListenerRegistry, Verdict};
