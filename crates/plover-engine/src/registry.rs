//! Task registry: at most one in-flight notification task per user.
//!
//! The registry owns every scheduled unit of work. Scheduling for a user who
//! already has a task aborts the old one first (last-writer-wins: the newest
//! scheduling intent supersedes any prior pending send), and cancelling a
//! missing task is a no-op. All map access goes through a single lock, which
//! serializes schedule/cancel operations for the same user; operations on
//! different users are independent.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tracing::{debug, error};

use plover_core::UserId;

use crate::error::EngineResult;

/// One registered unit of work. The generation guards against a stale
/// completion evicting a newer task for the same user.
struct ScheduledTask {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Registry of in-flight birthday notification tasks.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: Mutex<HashMap<UserId, ScheduledTask>>,
    generation: AtomicU64,
}

impl TaskRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, ScheduledTask>> {
        // The lock is never held across an await, so poisoning can only
        // come from a panicking task; the map itself stays consistent.
        self.tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cancels any existing task for `user`, then registers and starts
    /// `work` as the new task.
    ///
    /// The work's error outcome is logged when it completes; an aborted task
    /// produces no outcome at all. The entry removes itself on natural
    /// completion.
    pub fn schedule<F>(self: &Arc<Self>, user: UserId, work: F)
    where
        F: Future<Output = EngineResult<()>> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let registry = Arc::clone(self);

        // Hold the lock across the spawn so the new task cannot observe the
        // map before its own entry is inserted.
        let mut tasks = self.lock();
        let handle = tokio::spawn(async move {
            if let Err(e) = work.await {
                error!(user = %user, error = %e, "Birthday notification task failed");
            }
            registry.remove_if_current(user, generation);
        });
        if let Some(previous) = tasks.insert(user, ScheduledTask { generation, handle }) {
            debug!(user = %user, "Replacing existing birthday task");
            previous.handle.abort();
        }
    }

    /// Cancels and removes the task for `user` if present; no-op otherwise.
    pub fn cancel(&self, user: UserId) {
        if let Some(task) = self.lock().remove(&user) {
            debug!(user = %user, "Cancelling birthday task");
            task.handle.abort();
        }
    }

    /// True when a task is currently registered for `user`.
    pub fn is_scheduled(&self, user: UserId) -> bool {
        self.lock().contains_key(&user)
    }

    /// Number of currently registered tasks.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no tasks are registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn remove_if_current(&self, user: UserId, generation: u64) {
        let mut tasks = self.lock();
        if tasks
            .get(&user)
            .is_some_and(|task| task.generation == generation)
        {
            tasks.remove(&user);
        }
    }
}
