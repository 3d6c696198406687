//! Fallback deadline timers for month transitions.
//!
//! The controller never sleeps itself: it asks a [`TransitionScheduler`] to
//! report back when a transition's deadline has passed. The tokio scheduler
//! spawns one sleeping task per armed deadline; the manual scheduler only
//! records what was armed so a host (or a test) can fire deadlines itself.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::types::TransitionId;

/// Arms and disarms transition deadlines.
pub trait TransitionScheduler: Send {
    /// Arrange for the deadline of `id` to be reported after `after`.
    fn arm(&mut self, id: TransitionId, after: Duration);

    /// Disarm the deadline of `id`. Unknown or already fired ids are ignored.
    fn cancel(&mut self, id: TransitionId);
}

type DeadlineHook = Arc<dyn Fn(TransitionId) + Send + Sync>;

/// Scheduler backed by tokio timers.
///
/// Must be armed from within a tokio runtime. Cancelling aborts the sleeping
/// task, so a cancelled deadline is never reported.
pub struct TokioScheduler {
    on_deadline: DeadlineHook,
    timers: HashMap<TransitionId, JoinHandle<()>>,
}

impl TokioScheduler {
    /// Create a scheduler that calls `on_deadline` when a deadline passes.
    pub fn new(on_deadline: impl Fn(TransitionId) + Send + Sync + 'static) -> Self {
        Self {
            on_deadline: Arc::new(on_deadline),
            timers: HashMap::new(),
        }
    }
}

impl TransitionScheduler for TokioScheduler {
    fn arm(&mut self, id: TransitionId, after: Duration) {
        self.timers.retain(|_, timer| !timer.is_finished());

        let hook = Arc::clone(&self.on_deadline);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            hook(id);
        });

        if let Some(previous) = self.timers.insert(id, timer) {
            previous.abort();
        }
        debug!("Armed transition deadline {} in {:?}", id, after);
    }

    fn cancel(&mut self, id: TransitionId) {
        if let Some(timer) = self.timers.remove(&id) {
            timer.abort();
            debug!("Cancelled transition deadline {}", id);
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
    }
}

impl std::fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct ManualState {
    armed: BTreeMap<TransitionId, Duration>,
    cancelled: Vec<TransitionId>,
}

/// Scheduler that records deadlines without any clock.
///
/// Clones share state, so a host can keep one handle while the picker owns
/// another, then fire deadlines by feeding them back to the picker.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ManualState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Deadlines armed and not cancelled, in id order.
    #[must_use]
    pub fn armed(&self) -> Vec<(TransitionId, Duration)> {
        self.with_state(|s| s.armed.iter().map(|(id, after)| (*id, *after)).collect())
    }

    #[must_use]
    pub fn is_armed(&self, id: TransitionId) -> bool {
        self.with_state(|s| s.armed.contains_key(&id))
    }

    /// Drain the ids cancelled while armed since the last call.
    pub fn take_cancelled(&self) -> Vec<TransitionId> {
        self.with_state(|s| std::mem::take(&mut s.cancelled))
    }

    /// Remove and return every armed deadline, as if their time had come.
    pub fn expire_all(&self) -> Vec<TransitionId> {
        self.with_state(|s| std::mem::take(&mut s.armed).into_keys().collect())
    }
}

impl TransitionScheduler for ManualScheduler {
    fn arm(&mut self, id: TransitionId, after: Duration) {
        self.with_state(|s| {
            s.armed.insert(id, after);
        });
    }

    fn cancel(&mut self, id: TransitionId) {
        self.with_state(|s| {
            if s.armed.remove(&id).is_some() {
                s.cancelled.push(id);
            }
        });
    }
}
