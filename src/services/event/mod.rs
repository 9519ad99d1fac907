//! Calendar event service entry point.
//! Holds the in-memory event list shown by the grid and keeps it in sync
//! with a [`RemoteCalendar`], with operations organized across focused
//! submodules.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::event::Event;

pub mod crud;
pub mod queries;
pub mod recurrence;
pub mod remote;
pub mod scope;
pub mod sync;

pub use remote::{EventPatch, EventPayload, RemoteCalendar, RemoteError, RemoteEvent};
pub use scope::{delete_recurring_scope, DeleteScope, ScopeRequest};
pub use sync::{SyncError, SyncOperation, UpdateOutcome};

/// Callback invoked with the full event list after every change.
pub type Listener = Arc<dyn Fn(&[Event]) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct StoreState {
    events: Vec<Event>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    /// Series master id to its first rule, `None` when the master has none
    master_rules: HashMap<String, Option<String>>,
}

/// Shared, observable list of events backed by a remote calendar.
///
/// Cloning is cheap and every clone sees the same events. All mutations go
/// through the store so that subscribers are notified and remote failures
/// can be rolled back.
#[derive(Clone)]
pub struct EventStore {
    state: Arc<Mutex<StoreState>>,
    remote: Arc<dyn RemoteCalendar>,
}

impl EventStore {
    pub fn new(remote: Arc<dyn RemoteCalendar>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            remote,
        }
    }

    pub fn remote(&self) -> &dyn RemoteCalendar {
        self.remote.as_ref()
    }

    /// Register a listener. It is not called for the current state.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&[Event]) + Send + Sync + 'static,
    {
        let mut state = self.state();
        let id = SubscriptionId(state.next_subscription);
        state.next_subscription += 1;
        state.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state();
        let before = state.listeners.len();
        state.listeners.retain(|(existing, _)| *existing != id);
        state.listeners.len() != before
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        // Every mutation leaves the list consistent before it can panic
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Call every listener with a snapshot. The lock is released first so
    /// listeners may read from the store.
    fn notify(&self) {
        let (snapshot, listeners) = {
            let state = self.state();
            let listeners: Vec<Listener> = state
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            (state.events.clone(), listeners)
        };
        for listener in listeners {
            listener(&snapshot);
        }
    }
}
