//! State-change listeners.
//!
//! Listeners are called once after every successful engine mutation with a
//! read-only view of the new state. They cannot reach the engine from inside
//! the callback, so re-entrant actions are ruled out by the borrow checker.
//! A listener that wants to stop receiving updates returns
//! [`ListenerControl::Unsubscribe`]; it is dropped without disturbing the
//! rest of the notification pass.

use std::fmt;

use crate::core::RoundState;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// What a listener wants after handling a notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListenerControl {
    #[default]
    Keep,
    Unsubscribe,
}

type Callback = Box<dyn FnMut(&RoundState) -> ListenerControl>;

/// Ordered listener list.
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(ListenerId, Callback)>,
    next_id: u64,
}

impl Listeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it is called after listeners registered earlier.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&RoundState) -> ListenerControl + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Call every listener in registration order.
    pub fn notify(&mut self, state: &RoundState) {
        self.entries
            .retain_mut(|(_, callback)| callback(state) == ListenerControl::Keep);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
