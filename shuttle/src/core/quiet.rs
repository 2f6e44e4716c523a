//! Quiet-time accumulator for the quiescence detector.

use std::time::Duration;

use crate::core::types::Point;

/// Displacement at or above this many pixels counts as human movement.
pub const STILL_THRESHOLD_PX: f64 = 1.0;

/// Tracks how long the pointer has stayed put.
///
/// Each sample either extends the quiet streak by the poll interval or, if the
/// pointer moved at least [`STILL_THRESHOLD_PX`] from the reference position,
/// resets the streak and adopts the new position as reference.
#[derive(Debug, Clone, PartialEq)]
pub struct QuietTracker {
    reference: Point,
    quiet: Duration,
    required: Duration,
}

impl QuietTracker {
    pub fn new(reference: Point, required: Duration) -> Self {
        Self {
            reference,
            quiet: Duration::ZERO,
            required,
        }
    }

    /// Record a sample taken `interval` after the previous one.
    ///
    /// Returns true once the streak has reached the required duration.
    pub fn observe(&mut self, sample: Point, interval: Duration) -> bool {
        if self.reference.distance(sample) < STILL_THRESHOLD_PX {
            self.quiet += interval;
        } else {
            self.quiet = Duration::ZERO;
            self.reference = sample;
        }
        self.is_quiet()
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet >= self.required
    }

    pub fn quiet_for(&self) -> Duration {
        self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLL: Duration = Duration::from_millis(50);

    #[test]
    fn zero_requirement_is_immediately_quiet() {
        let tracker = QuietTracker::new(Point::new(5, 5), Duration::ZERO);
        assert!(tracker.is_quiet());
    }

    #[test]
    fn still_samples_accumulate() {
        let mut tracker = QuietTracker::new(Point::new(5, 5), Duration::from_millis(200));
        assert!(!tracker.observe(Point::new(5, 5), POLL));
        assert!(!tracker.observe(Point::new(5, 5), POLL));
        assert!(!tracker.observe(Point::new(5, 5), POLL));
        assert!(tracker.observe(Point::new(5, 5), POLL));
    }

    #[test]
    fn movement_resets_streak() {
        let mut tracker = QuietTracker::new(Point::new(5, 5), Duration::from_millis(100));
        assert!(!tracker.observe(Point::new(5, 5), POLL));
        assert!(!tracker.observe(Point::new(6, 5), POLL));
        assert_eq!(tracker.quiet_for(), Duration::ZERO);
        assert!(!tracker.observe(Point::new(6, 5), POLL));
        assert!(tracker.observe(Point::new(6, 5), POLL));
    }
}
