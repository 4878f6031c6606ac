//! The confirmation registry: in-flight confirmable requests.
//!
//! Holds at most one pending entry per action identifier and guarantees the
//! check-and-insert in [`ConfirmationRegistry::begin`] is a single atomic
//! step under concurrent access. The registry is the only shared mutable
//! resource in the system; a single mutex over the map serializes
//! begin/resolve/remove (contention is low, hold times are short, and no
//! await ever happens under the lock).

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// The terminal input to a pending confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A user pressed the confirm button (or a duplicate trigger
    /// auto-confirmed on their behalf).
    Confirmed { user: String },
    /// A user pressed the cancel button.
    Cancelled { user: String },
    /// The waiting window elapsed with no user input.
    TimedOut,
}

impl Resolution {
    /// Whether this resolution lets the action's success effect run.
    /// Timeout is fail-open: it proceeds as if confirmed.
    pub fn approved(&self) -> bool {
        !matches!(self, Resolution::Cancelled { .. })
    }
}

/// The live record tracking one in-flight confirmable action.
struct PendingConfirmation {
    tx: mpsc::Sender<Resolution>,
    created_at: DateTime<Utc>,
}

/// Outcome of [`ConfirmationRegistry::begin`].
pub enum Begin {
    /// No entry existed; one was created and the caller now owns the
    /// resolution receiver for its workflow.
    New(mpsc::Receiver<Resolution>),
    /// An entry already exists for this identifier. The caller must route
    /// its confirmation into the existing entry instead of opening a
    /// second dialog.
    AlreadyPending,
}

/// Registry of in-flight confirmable requests, keyed by action identifier.
///
/// Between `begin` returning [`Begin::New`] and the matching `remove`,
/// exactly one entry exists for that identifier.
pub struct ConfirmationRegistry {
    pending: Mutex<HashMap<String, PendingConfirmation>>,
}

impl Default for ConfirmationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmationRegistry {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Atomically check for an existing entry and create one if absent.
    pub fn begin(&self, action_id: &str) -> Begin {
        let mut pending = self.pending.lock().unwrap();
        if pending.contains_key(action_id) {
            return Begin::AlreadyPending;
        }
        // Capacity 1: the workflow consumes exactly one resolution; a
        // second concurrent sender loses the race and its vote is dropped.
        let (tx, rx) = mpsc::channel(1);
        pending.insert(
            action_id.to_string(),
            PendingConfirmation {
                tx,
                created_at: Utc::now(),
            },
        );
        Begin::New(rx)
    }

    /// Deliver a resolution to the entry's waiting workflow.
    ///
    /// Returns `false` if no entry exists for the identifier. That is
    /// expected when a resolution arrives after the timeout already fired,
    /// and is logged rather than escalated.
    pub fn resolve(&self, action_id: &str, resolution: Resolution) -> bool {
        let tx = {
            let pending = self.pending.lock().unwrap();
            match pending.get(action_id) {
                Some(entry) => entry.tx.clone(),
                None => {
                    tracing::debug!(action_id, "Stale resolution dropped; no pending entry");
                    return false;
                }
            }
        };
        // Send outside the lock. A full channel means another resolution
        // already won the race; the workflow only acts on the first one.
        if let Err(e) = tx.try_send(resolution) {
            tracing::debug!(action_id, error = %e, "Resolution lost the delivery race");
        }
        true
    }

    /// Delete the entry. Invoked exactly once by the owning workflow on its
    /// terminal transition.
    pub fn remove(&self, action_id: &str) {
        let mut pending = self.pending.lock().unwrap();
        if let Some(entry) = pending.remove(action_id) {
            let waited = Utc::now().signed_duration_since(entry.created_at);
            tracing::debug!(
                action_id,
                waited_ms = waited.num_milliseconds(),
                "Pending confirmation removed"
            );
        }
    }

    /// Number of in-flight entries.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}
