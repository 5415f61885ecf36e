//! Parallel reduction pipeline
//!
//! A fixed pool of worker threads drains a shared queue of task files, reduces
//! each file and folds the partial results into one shared total.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   enqueue_all   ┌─────────────┐  try_dequeue  ┌──────────┐
//! │ Coordinator  │────────────────▶│  WorkQueue  │◀──────────────│ Worker×N │
//! │              │                 │ Mutex<Deque>│               │          │
//! │ spawn / join │                 └─────────────┘               │ read     │
//! │              │                 ┌─────────────┐     add       │ reduce   │
//! │ into_total() │◀────────────────│ Accumulator │◀──────────────│          │
//! └──────────────┘                 │ Mutex<f64>  │               └──────────┘
//!                                  └─────────────┘
//! ```
//!
//! - **Population**: the queue is filled once, before any worker starts.
//! - **Draining**: each pop happens under the queue lock, so every task is
//!   processed by exactly one worker.
//! - **Accumulation**: workers only add; the total is read by consuming the
//!   accumulator after every worker has been joined.
//! - **Failure**: the first worker error raises a shared abort signal, the other
//!   workers stop taking tasks, and the run returns that first error with no
//!   total.
//!
//! Workers are `crossbeam` scoped threads, so they borrow the queue, the
//! accumulator and the reader straight from the coordinator's stack.
//!
//! # Example
//!
//! ```rust,no_run
//! use parsum::input::DirectoryReader;
//! use parsum::parallel::Coordinator;
//! use parsum::tasks::{TaskNaming, TaskSet};
//!
//! let tasks = TaskSet::numbered(&TaskNaming::default());
//! let coordinator = Coordinator::new(DirectoryReader::new("data"));
//! let summary = coordinator.run(&tasks, 4)?;
//! println!("total = {}", summary.total);
//! # Ok::<(), parsum::ReduceError>(())
//! ```

pub mod accumulator;
pub mod coordinator;
pub mod progress;
pub mod queue;
pub mod sizing;
pub mod worker;

pub use accumulator::Accumulator;
pub use coordinator::{Coordinator, RunSummary};
pub use progress::TaskProgress;
pub use queue::WorkQueue;
pub use sizing::resolve_worker_count;
pub use worker::{AbortSignal, Worker, WorkerContext, WorkerReport};
