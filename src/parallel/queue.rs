use crate::tasks::FileTask;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Shared FIFO of pending tasks
///
/// Populated once before any worker starts, then drained concurrently. Every
/// pop happens under the same lock, so each task is handed to exactly one
/// worker.
#[derive(Debug, Default)]
pub struct WorkQueue {
    pending: Mutex<VecDeque<FileTask>>,
    dequeued: AtomicUsize,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append all tasks. Called from the coordinating thread only.
    pub fn enqueue_all<I>(&self, tasks: I)
    where
        I: IntoIterator<Item = FileTask>,
    {
        self.lock().extend(tasks);
    }

    /// Take the next task, or `None` once the queue is drained
    pub fn try_dequeue(&self) -> Option<FileTask> {
        let task = self.lock().pop_front();
        if task.is_some() {
            self.dequeued.fetch_add(1, Ordering::Relaxed);
        }
        task
    }

    /// Number of successful dequeues so far
    pub fn dequeued(&self) -> usize {
        self.dequeued.load(Ordering::Relaxed)
    }

    /// Number of tasks still waiting
    pub fn remaining(&self) -> usize {
        self.lock().len()
    }

    // The guarded deque stays consistent even if a holder panicked: push and
    // pop either complete or never start.
    fn lock(&self) -> MutexGuard<'_, VecDeque<FileTask>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
