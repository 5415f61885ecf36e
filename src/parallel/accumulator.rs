use std::sync::Mutex;

/// Shared running total
///
/// Workers can only add to it. The final value is read by consuming the
/// accumulator, which the borrow checker only allows once every worker's
/// borrow has ended.
#[derive(Debug, Default)]
pub struct Accumulator {
    total: Mutex<f64>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, delta: f64) {
        // A poisoned total is still a valid f64; each add either applied or not.
        let mut total = self.total.lock().unwrap_or_else(|p| p.into_inner());
        *total += delta;
    }

    pub fn into_total(self) -> f64 {
        self.total.into_inner().unwrap_or_else(|p| p.into_inner())
    }
}
