use super::accumulator::Accumulator;
use super::queue::WorkQueue;
use super::worker::{AbortSignal, ProgressFn, Worker, WorkerContext, WorkerReport};
use crate::error::{ReduceError, Result};
use crate::input::TaskReader;
use crate::tasks::TaskSet;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::time::Instant;

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total: f64,
    pub tasks_processed: usize,
    pub workers: usize,
    /// Tasks handled by each worker, indexed by worker id
    pub per_worker: Vec<usize>,
    pub duration_ms: u64,
}

/// Runs a fixed pool of workers over a task set and returns the total
pub struct Coordinator<R> {
    reader: R,
    progress_reporter: Option<Arc<ProgressFn>>,
}

impl<R: TaskReader> Coordinator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            progress_reporter: None,
        }
    }

    /// Call `reporter(completed, total, worker_id)` after each finished task
    pub fn with_progress<P>(mut self, reporter: P) -> Self
    where
        P: Fn(usize, usize, usize) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(reporter));
        self
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Process every task on `worker_count` threads
    ///
    /// Blocks until every worker has terminated. If any worker fails, the
    /// first error is returned and no total is produced.
    pub fn run(&self, tasks: &TaskSet, worker_count: usize) -> Result<RunSummary> {
        if worker_count == 0 {
            return Err(ReduceError::invalid_config(
                "worker count must be positive",
            ));
        }

        let start_time = Instant::now();
        let total_items = tasks.len();

        let queue = WorkQueue::new();
        queue.enqueue_all(tasks.iter().cloned());
        let accumulator = Accumulator::new();
        let abort = AbortSignal::new();
        let progress_counter = AtomicUsize::new(0);

        tracing::info!(
            "Processing {} tasks with {} workers",
            total_items,
            worker_count
        );

        let mut outcomes = crossbeam::thread::scope(|s| {
            let handles: Vec<_> = (0..worker_count)
                .map(|worker_id| {
                    let ctx = WorkerContext {
                        worker_id,
                        queue: &queue,
                        accumulator: &accumulator,
                        reader: &self.reader,
                        abort: &abort,
                        progress_counter: &progress_counter,
                        total_items,
                        progress_reporter: self.progress_reporter.as_deref(),
                    };
                    s.spawn(move |_| Worker::new(ctx).run())
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or(Err(ReduceError::WorkerPanicked)))
                .collect::<Vec<Result<WorkerReport>>>()
        })
        .map_err(|_| ReduceError::WorkerPanicked)?;

        // The worker that raised the abort signal failed first
        if let Some(failed) = abort.raised_by() {
            if outcomes.get(failed).is_some_and(Result::is_err) {
                outcomes.swap_remove(failed)?;
            }
        }

        let mut per_worker = vec![0; worker_count];
        for outcome in outcomes {
            let report = outcome?;
            per_worker[report.worker_id] = report.tasks_processed;
        }

        let tasks_processed: usize = per_worker.iter().sum();
        // Every worker drained until empty, so each task was dequeued once
        debug_assert_eq!(tasks_processed, queue.dequeued());
        debug_assert_eq!(tasks_processed, total_items);

        let summary = RunSummary {
            total: accumulator.into_total(),
            tasks_processed,
            workers: worker_count,
            per_worker,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        tracing::info!(
            "Processed {} tasks in {}ms, total = {}",
            summary.tasks_processed,
            summary.duration_ms,
            summary.total
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ParsedInput, parse_content};
    use crate::tasks::FileTask;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory reader that counts how often each task is read
    struct CountingReader {
        files: HashMap<String, String>,
        reads: Mutex<HashMap<String, usize>>,
    }

    impl CountingReader {
        fn new(files: Vec<(String, String)>) -> Self {
            Self {
                files: files.into_iter().collect(),
                reads: Mutex::new(HashMap::new()),
            }
        }

        fn reads(&self) -> HashMap<String, usize> {
            self.reads.lock().unwrap().clone()
        }
    }

    impl TaskReader for CountingReader {
        fn read(&self, task: &FileTask) -> Result<ParsedInput> {
            *self
                .reads
                .lock()
                .unwrap()
                .entry(task.name().to_string())
                .or_default() += 1;
            let content = self.files.get(task.name()).ok_or_else(|| {
                ReduceError::file_access(
                    task.name(),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                )
            })?;
            parse_content(task.name(), content)
        }
    }

    fn scenario_a() -> (CountingReader, TaskSet) {
        let files = vec![
            ("in_1.dat".to_string(), "1 1 2 3".to_string()),
            ("in_2.dat".to_string(), "2 2 2 2".to_string()),
            ("in_3.dat".to_string(), "3 1 2 3".to_string()),
        ];
        let tasks = files.iter().map(|(name, _)| FileTask::new(name.clone())).collect();
        (CountingReader::new(files), tasks)
    }

    /// Many tasks with operands chosen so each partial is exact in f64
    fn many_tasks(count: usize) -> (CountingReader, TaskSet, f64) {
        let mut files = Vec::new();
        let mut expected = 0.0;
        for i in 0..count {
            let code = i % 3 + 1;
            let numbers: Vec<f64> = (0..(i % 5)).map(|j| (j + i % 7) as f64 * 0.5).collect();
            let kind = crate::operation::resolve(code as i64, "t").unwrap();
            expected += kind.reduce(&numbers);
            let body: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
            files.push((format!("in_{}.dat", i + 1), format!("{} {}", code, body.join(" "))));
        }
        let tasks = files.iter().map(|(name, _)| FileTask::new(name.clone())).collect();
        (CountingReader::new(files), tasks, expected)
    }

    #[test]
    fn test_scenario_a_any_worker_count() {
        for workers in [1, 2, 3, 8] {
            let (reader, tasks) = scenario_a();
            let summary = Coordinator::new(reader).run(&tasks, workers).unwrap();
            assert!((summary.total - 28.0).abs() < 1e-6);
            assert_eq!(summary.tasks_processed, 3);
            assert_eq!(summary.workers, workers);
            assert_eq!(summary.per_worker.len(), workers);
        }
    }

    #[test]
    fn test_exactly_once_per_task() {
        for workers in [1, 2, 4, 8, 16] {
            let (reader, tasks, _) = many_tasks(200);
            let coordinator = Coordinator::new(reader);
            let summary = coordinator.run(&tasks, workers).unwrap();

            assert_eq!(summary.tasks_processed, 200);
            assert_eq!(summary.per_worker.iter().sum::<usize>(), 200);
            let reads = coordinator.reader().reads();
            assert_eq!(reads.len(), 200);
            assert!(reads.values().all(|&n| n == 1));
        }
    }

    #[test]
    fn test_total_independent_of_worker_count() {
        let mut totals = Vec::new();
        for workers in [1, 2, 8] {
            let (reader, tasks, expected) = many_tasks(120);
            let summary = Coordinator::new(reader).run(&tasks, workers).unwrap();
            assert!((summary.total - expected).abs() < 1e-6);
            totals.push(summary.total);
        }
        assert!((totals[0] - totals[1]).abs() < 1e-6);
        assert!((totals[0] - totals[2]).abs() < 1e-6);
    }

    #[test]
    fn test_empty_task_set() {
        let reader = CountingReader::new(Vec::new());
        let summary = Coordinator::new(reader).run(&TaskSet::default(), 4).unwrap();
        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.tasks_processed, 0);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let (reader, tasks) = scenario_a();
        let coordinator = Coordinator::new(reader);
        let result = coordinator.run(&tasks, 0);
        assert!(matches!(result, Err(ReduceError::InvalidConfiguration { .. })));
        assert!(coordinator.reader().reads().is_empty());
    }

    #[test]
    fn test_bad_code_fails_whole_run() {
        let files = vec![
            ("in_1.dat".to_string(), "1 1 2 3".to_string()),
            ("in_2.dat".to_string(), "5 1 2 3".to_string()),
            ("in_3.dat".to_string(), "3 1 2 3".to_string()),
        ];
        for workers in [1, 3] {
            let tasks = files.iter().map(|(n, _)| FileTask::new(n.clone())).collect();
            let reader = CountingReader::new(files.clone());
            let result = Coordinator::new(reader).run(&tasks, workers);
            match result {
                Err(ReduceError::InvalidOperationCode { code, task }) => {
                    assert_eq!(code, "5");
                    assert_eq!(task, "in_2.dat");
                }
                other => panic!("expected InvalidOperationCode, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_file_fails_whole_run() {
        let (reader, _) = scenario_a();
        let tasks: TaskSet = ["in_1.dat", "in_9.dat"].map(FileTask::new).into_iter().collect();
        let result = Coordinator::new(reader).run(&tasks, 2);
        assert!(matches!(result, Err(ReduceError::FileAccess { .. })));
    }

    #[test]
    fn test_progress_reports_every_task() {
        let (reader, tasks, _) = many_tasks(50);
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_reporter = seen.clone();
        let coordinator = Coordinator::new(reader).with_progress(move |current, total, _| {
            assert!(current <= total);
            seen_in_reporter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        });
        coordinator.run(&tasks, 4).unwrap();
        assert_eq!(seen.load(std::sync::atomic::Ordering::Relaxed), 50);
    }

    /// Panics on "boom", otherwise reads a one-operand sum
    struct PanicReader;

    impl TaskReader for PanicReader {
        fn read(&self, task: &FileTask) -> Result<ParsedInput> {
            if task.name() == "boom" {
                panic!("cannot read {task}");
            }
            parse_content(task.name(), "1 1")
        }
    }

    #[test]
    fn test_panicking_worker_fails_run() {
        for workers in [1, 2, 4] {
            let tasks: TaskSet = ["a", "boom", "b", "c"].map(FileTask::new).into_iter().collect();
            let result = Coordinator::new(PanicReader).run(&tasks, workers);
            assert!(
                matches!(result, Err(ReduceError::WorkerPanicked)),
                "workers={workers}: {result:?}"
            );
        }
    }

    /// "slow" fails late with a bad code, "fast" fails at once as missing
    struct StaggeredReader;

    impl TaskReader for StaggeredReader {
        fn read(&self, task: &FileTask) -> Result<ParsedInput> {
            match task.name() {
                "slow" => {
                    std::thread::sleep(std::time::Duration::from_millis(300));
                    parse_content("slow", "7 1")
                }
                _ => Err(ReduceError::file_access(
                    task.name(),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                )),
            }
        }
    }

    #[test]
    fn test_earliest_failure_is_reported() {
        // Whichever worker id picks up "fast", its error lands first
        let tasks: TaskSet = ["slow", "fast"].map(FileTask::new).into_iter().collect();
        let result = Coordinator::new(StaggeredReader).run(&tasks, 2);
        assert!(matches!(result, Err(ReduceError::FileAccess { .. })), "{result:?}");
    }
}
