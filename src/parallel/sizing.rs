/// Resolve the configured worker count
///
/// A non-zero `configured` count is used as-is. Zero means auto: take
/// `thread_percentage` percent of the available cores, never fewer than one.
///
/// ```text
/// configured > 0  → configured
/// configured == 0 → max(1, num_cpus::get() * thread_percentage / 100)
/// ```
pub fn resolve_worker_count(configured: usize, thread_percentage: u8) -> usize {
    if configured > 0 {
        return configured;
    }

    let available_cores = num_cpus::get();
    let workers = std::cmp::max(1, (available_cores * thread_percentage as usize) / 100);
    tracing::debug!(
        "Auto-sized pool: {} workers ({}% of {} cores)",
        workers,
        thread_percentage,
        available_cores
    );
    workers
}
