//! Listener Registry
//!
//! Per-scope table of event name to ordered listener slots. The host and
//! every embedded plugin API own one each. A removed listener leaves an empty
//! slot behind so indices handed out by `add` stay valid for later removal.

use crate::listeners::envelope::Envelope;
use crate::listeners::error::{ListenerError, ListenerResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// What a listener says about the pending action.
///
/// Only `Veto` changes the outcome of a notification; it is how subscribers
/// of `before*` events stop the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    #[default]
    Abstain,
    Proceed,
    Veto,
}

impl From<bool> for Verdict {
    fn from(proceed: bool) -> Self {
        if proceed {
            Verdict::Proceed
        } else {
            Verdict::Veto
        }
    }
}

impl From<()> for Verdict {
    fn from(_: ()) -> Self {
        Verdict::Abstain
    }
}

impl From<Option<bool>> for Verdict {
    fn from(proceed: Option<bool>) -> Self {
        proceed.map_or(Verdict::Abstain, Verdict::from)
    }
}

/// A registered callback
pub type Listener = Arc<dyn Fn(&Value) -> Verdict + Send + Sync>;

type Slot = Option<Listener>;

/// Event name to listener slots
#[derive(Default)]
pub struct ListenerRegistry {
    slots: RwLock<HashMap<String, Vec<Slot>>>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.read_slots();
        let mut events: Vec<(&String, usize)> = slots
            .iter()
            .map(|(event, list)| (event, list.iter().flatten().count()))
            .collect();
        events.sort();
        f.debug_struct("ListenerRegistry")
            .field("events", &events)
            .finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `event` and return its slot index.
    ///
    /// The callback may return `bool`, `()`, `Option<bool>` or a [`Verdict`].
    /// A blank event name is the only registration rejected with
    /// [`ListenerError::InvalidArgument`]; any other name is accepted.
    pub fn add<F, R>(&self, event: impl AsRef<str>, callback: F) -> ListenerResult<usize>
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        let listener: Listener = Arc::new(move |payload| callback(payload).into());
        self.add_listener(event, listener)
    }

    /// Register an already type-erased listener
    pub fn add_listener(&self, event: impl AsRef<str>, listener: Listener) -> ListenerResult<usize> {
        let event = event.as_ref();
        if event.trim().is_empty() {
            return Err(ListenerError::InvalidArgument {
                event: event.to_string(),
                reason: "Listener event name must not be blank.".to_string(),
            });
        }

        let mut slots = self.write_slots();
        let list = slots.entry(event.to_string()).or_default();
        list.push(Some(listener));
        let index = list.len() - 1;
        log::trace!("Added listener {} for {}", index, event);
        Ok(index)
    }

    /// Empty the slot at `index`; unknown events or indices are ignored
    pub fn remove(&self, event: impl AsRef<str>, index: usize) {
        let mut slots = self.write_slots();
        if let Some(slot) = slots
            .get_mut(event.as_ref())
            .and_then(|list| list.get_mut(index))
        {
            *slot = None;
        }
    }

    /// Drop every listener of `event`, or of all events when `None`.
    ///
    /// The event starts over with a fresh slot list, so the next `add` returns 0.
    pub fn remove_all(&self, event: Option<&str>) {
        let mut slots = self.write_slots();
        match event {
            Some(event) => {
                slots.insert(event.to_string(), Vec::new());
            }
            None => slots.clear(),
        }
    }

    /// Call every live listener of `event` in registration order.
    ///
    /// Returns `false` if any listener vetoed. All listeners run regardless.
    /// An event nobody listens to returns `true`. A listener removed by an
    /// earlier one in the same pass is skipped; listeners added during the
    /// pass wait for the next notification.
    pub fn notify(&self, event: impl AsRef<str>, payload: &Value) -> bool {
        let event = event.as_ref();

        let slot_count = match self.read_slots().get(event) {
            Some(list) => list.len(),
            None => return true,
        };

        let listener_payload = Envelope::resolve(payload).into_inner();
        log::trace!("Notifying up to {} listeners of {}", slot_count, event);

        let mut proceed = true;
        for index in 0..slot_count {
            // No lock is held while the listener runs, so it may re-enter
            let Some(listener) = self.live_listener(event, index) else {
                continue;
            };
            if listener(&listener_payload) == Verdict::Veto {
                proceed = false;
            }
        }

        if !proceed {
            log::debug!("A listener vetoed {}", event);
        }
        proceed
    }

    /// Number of live listeners for `event`
    pub fn listener_count(&self, event: impl AsRef<str>) -> usize {
        self.read_slots()
            .get(event.as_ref())
            .map_or(0, |list| list.iter().flatten().count())
    }

    /// Number of slots, live or removed, for `event`
    pub fn slot_count(&self, event: impl AsRef<str>) -> usize {
        self.read_slots().get(event.as_ref()).map_or(0, Vec::len)
    }

    pub fn has_listeners(&self, event: impl AsRef<str>) -> bool {
        self.listener_count(event) > 0
    }

    /// Events with a slot list, sorted
    pub fn events(&self) -> Vec<String> {
        let mut events: Vec<String> = self.read_slots().keys().cloned().collect();
        events.sort();
        events
    }

    fn live_listener(&self, event: &str, index: usize) -> Option<Listener> {
        self.read_slots()
            .get(event)
            .and_then(|list| list.get(index))
            .and_then(Option::clone)
    }

    fn read_slots(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<Slot>>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_slots(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<Slot>>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }
}
