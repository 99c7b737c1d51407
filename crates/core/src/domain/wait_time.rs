// Wait-Time Estimation

/// Fixed per-person service time used for wait estimates (minutes)
pub const AVERAGE_SERVICE_MINUTES: i64 = 5;

/// Converts a queue position into a human-facing wait estimate.
///
/// Intentionally a simple linear model: no historical adaptation, no
/// per-queue customization. The number is displayed directly to end users,
/// so the linear contract (`position * minutes_per_position`) must hold.
#[derive(Debug, Clone, Copy)]
pub struct WaitTimeEstimator {
    minutes_per_position: i64,
}

impl Default for WaitTimeEstimator {
    fn default() -> Self {
        Self::new(AVERAGE_SERVICE_MINUTES)
    }
}

impl WaitTimeEstimator {
    pub fn new(minutes_per_position: i64) -> Self {
        Self {
            minutes_per_position,
        }
    }

    /// Estimated wait in minutes for the given 1-based position.
    ///
    /// Total for all positions >= 0 and returns 0 at position 0.
    pub fn estimate(&self, position: i64) -> i64 {
        position.max(0) * self.minutes_per_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_contract() {
        let estimator = WaitTimeEstimator::default();
        for p in 0..=100 {
            assert_eq!(estimator.estimate(p), 5 * p);
        }
    }

    #[test]
    fn test_zero_position() {
        let estimator = WaitTimeEstimator::default();
        assert_eq!(estimator.estimate(0), 0);
    }

    #[test]
    fn test_monotone_non_decreasing() {
        let estimator = WaitTimeEstimator::default();
        let mut last = estimator.estimate(0);
        for p in 1..=1000 {
            let next = estimator.estimate(p);
            assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn test_custom_service_time() {
        let estimator = WaitTimeEstimator::new(3);
        assert_eq!(estimator.estimate(4), 12);
    }
}
