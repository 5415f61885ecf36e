use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar over the tasks of one run
///
/// Cloning shares the same bar, so a clone can be moved into the coordinator's
/// progress callback while the caller keeps one to finish it.
#[derive(Clone)]
pub struct TaskProgress {
    bar: ProgressBar,
}

impl TaskProgress {
    pub fn new(total_tasks: usize, workers: usize) -> Self {
        let bar = ProgressBar::new(total_tasks as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} tasks {msg}",
        ) {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(format!("({workers} workers)"));
        Self { bar }
    }

    /// A bar that draws nothing, for quiet runs and tests
    pub fn hidden(total_tasks: usize) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total_tasks as u64), ProgressDrawTarget::hidden());
        Self { bar }
    }

    /// Record one more completed task
    ///
    /// Matches the coordinator's progress callback. Workers may report their
    /// counts out of order, so the bar counts calls instead of trusting
    /// `_current`.
    pub fn update(&self, _current: usize, _total: usize, _worker_id: usize) {
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
