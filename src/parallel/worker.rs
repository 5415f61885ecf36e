use super::accumulator::Accumulator;
use super::queue::WorkQueue;
use crate::error::Result;
use crate::input::TaskReader;
use crate::tasks::FileTask;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress callback: (completed, total, worker_id)
pub type ProgressFn = dyn Fn(usize, usize, usize) + Send + Sync;

const NOT_RAISED: usize = usize::MAX;

/// Shared stop flag for one run
///
/// Remembers the worker that raised it first, so the coordinator can surface
/// the earliest failure rather than the one with the lowest worker id.
#[derive(Debug)]
pub struct AbortSignal {
    raised_by: AtomicUsize,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self {
            raised_by: AtomicUsize::new(NOT_RAISED),
        }
    }

    /// Raise the signal; returns false if another worker got there first
    pub fn raise(&self, worker_id: usize) -> bool {
        self.raised_by
            .compare_exchange(NOT_RAISED, worker_id, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_raised(&self) -> bool {
        self.raised_by.load(Ordering::Acquire) != NOT_RAISED
    }

    /// Worker that raised the signal first, if any
    pub fn raised_by(&self) -> Option<usize> {
        match self.raised_by.load(Ordering::Acquire) {
            NOT_RAISED => None,
            worker_id => Some(worker_id),
        }
    }
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a worker borrows from the coordinator for one run
pub struct WorkerContext<'a> {
    pub worker_id: usize,
    pub queue: &'a WorkQueue,
    pub accumulator: &'a Accumulator,
    pub reader: &'a dyn TaskReader,
    /// Raised by the first worker that fails; the others stop dequeuing
    pub abort: &'a AbortSignal,
    pub progress_counter: &'a AtomicUsize,
    pub total_items: usize,
    pub progress_reporter: Option<&'a ProgressFn>,
}

/// What a worker did before the queue ran dry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub tasks_processed: usize,
}

/// One thread's dequeue/reduce/accumulate loop
pub struct Worker<'a> {
    ctx: WorkerContext<'a>,
}

impl<'a> Worker<'a> {
    pub fn new(ctx: WorkerContext<'a>) -> Self {
        Self { ctx }
    }

    /// Drain the queue until it is empty or another worker has failed
    pub fn run(self) -> Result<WorkerReport> {
        let ctx = &self.ctx;
        let _guard = AbortOnPanic {
            abort: ctx.abort,
            worker_id: ctx.worker_id,
        };
        let mut tasks_processed = 0;

        loop {
            if ctx.abort.is_raised() {
                tracing::debug!("worker-{}: run aborted, stopping", ctx.worker_id);
                break;
            }

            let Some(task) = ctx.queue.try_dequeue() else {
                break;
            };

            let partial = match self.process(&task) {
                Ok(partial) => partial,
                Err(e) => {
                    ctx.abort.raise(ctx.worker_id);
                    tracing::error!("worker-{}: {}", ctx.worker_id, e);
                    return Err(e);
                }
            };

            ctx.accumulator.add(partial);
            tasks_processed += 1;
            self.report_progress();
        }

        tracing::debug!(
            "worker-{}: finished after {} tasks",
            ctx.worker_id,
            tasks_processed
        );
        Ok(WorkerReport {
            worker_id: ctx.worker_id,
            tasks_processed,
        })
    }

    fn process(&self, task: &FileTask) -> Result<f64> {
        let parsed = self.ctx.reader.read(task)?;
        let partial = parsed.reduce();
        tracing::debug!(
            "worker-{}: {} -> {} of {} numbers = {}",
            self.ctx.worker_id,
            task,
            parsed.operation,
            parsed.numbers.len(),
            partial
        );
        Ok(partial)
    }

    fn report_progress(&self) {
        let ctx = &self.ctx;
        let current = ctx.progress_counter.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(reporter) = ctx.progress_reporter {
            reporter(current, ctx.total_items, ctx.worker_id);
        }
    }
}

/// Raises the abort signal if the worker unwinds, so a panic stops the pool too
struct AbortOnPanic<'a> {
    abort: &'a AbortSignal,
    worker_id: usize,
}

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.abort.raise(self.worker_id);
        }
    }
}
