//! Optimistic updates: apply locally, push to the remote, roll back on failure.

use std::fmt;

use thiserror::Error;

use super::remote::{EventPatch, RemoteError};
use super::EventStore;
use crate::models::event::{Event, EventError, EventId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    Create,
    Update,
    Delete,
    Fetch,
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncOperation::Create => "create",
            SyncOperation::Update => "update",
            SyncOperation::Delete => "delete",
            SyncOperation::Fetch => "fetch",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to {operation} remote event: {source}")]
    Remote {
        operation: SyncOperation,
        #[source]
        source: RemoteError,
    },
    #[error("Invalid event: {0}")]
    InvalidEvent(#[from] EventError),
    #[error("Event {0} already exists")]
    DuplicateId(EventId),
}

impl SyncError {
    pub(crate) fn remote(operation: SyncOperation) -> impl FnOnce(RemoteError) -> Self {
        move |source| SyncError::Remote { operation, source }
    }
}

/// What happened to an update that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No event with that id; nothing changed
    Missing,
    /// Applied locally; the event is not linked to a remote event
    LocalOnly,
    Synced,
}

impl EventStore {
    /// Replace an event with `event` (matched by id) and sync it.
    ///
    /// Timestamps are truncated to milliseconds. The local list and
    /// subscribers see the change before the remote call. If the remote call
    /// fails the previous value is put back, unless something else changed
    /// the event in the meantime. There is no retry.
    pub async fn update_event(&self, event: Event) -> Result<UpdateOutcome, SyncError> {
        let updated = event.normalized();
        updated.validate()?;

        let previous = {
            let mut state = self.state();
            match state.events.iter_mut().find(|e| e.id == updated.id) {
                Some(slot) => std::mem::replace(slot, updated.clone()),
                None => {
                    log::debug!("Update for unknown event {} ignored", updated.id);
                    return Ok(UpdateOutcome::Missing);
                }
            }
        };
        self.notify();

        let Some(remote_id) = updated.remote_id.clone() else {
            return Ok(UpdateOutcome::LocalOnly);
        };

        let patch = EventPatch::between(&previous, &updated);
        match self.remote.update_event(&remote_id, &patch).await {
            Ok(_) => {
                log::info!("Synced event {} ({})", updated.id, remote_id);
                Ok(UpdateOutcome::Synced)
            }
            Err(source) => {
                log::error!(
                    "Failed to update remote event {}: {}; rolling back",
                    remote_id,
                    source
                );
                if self.restore(&updated, previous) {
                    self.notify();
                }
                Err(SyncError::remote(SyncOperation::Update)(source))
            }
        }
    }

    /// Put `previous` back if the stored event still equals `expected`.
    fn restore(&self, expected: &Event, previous: Event) -> bool {
        let mut state = self.state();
        match state.events.iter_mut().find(|e| e.id == previous.id) {
            Some(slot) if *slot == *expected => {
                *slot = previous;
                true
            }
            Some(_) => {
                log::warn!(
                    "Event {} changed while syncing; keeping the newer value",
                    previous.id
                );
                false
            }
            None => false,
        }
    }
}
