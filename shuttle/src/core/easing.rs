//! Eased point-to-point path planning.
//!
//! The plan is pure: it yields, for each step, the whole-pixel position the
//! pointer should occupy and the time since traversal start at which it
//! should be there. Pacing and drift checks happen in [`crate::motion`].

use std::f64::consts::PI;
use std::time::Duration;

use crate::core::types::Point;

/// Shortest traversal the planner will schedule.
const MIN_TRAVEL: Duration = Duration::from_millis(1);

/// Cosine ease-in-out: fraction of distance covered at normalized time `t`.
///
/// `t` is clamped to `[0, 1]`.
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    0.5 - 0.5 * (PI * t).cos()
}

/// One scheduled sample along the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStep {
    /// 1-indexed step number.
    pub index: u32,
    pub position: Point,
    /// Intended time since traversal start.
    pub at: Duration,
}

/// Step schedule for a single traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionPlan {
    start: Point,
    target: Point,
    total: Duration,
    steps: u32,
}

impl MotionPlan {
    /// Plan a move from `start` to `target` over `travel`, sampled every `step_interval`.
    ///
    /// Always schedules at least one step; a zero `travel` collapses to a single
    /// step that lands on `target`.
    pub fn new(start: Point, target: Point, travel: Duration, step_interval: Duration) -> Self {
        let total = travel.max(MIN_TRAVEL);
        let steps = if step_interval.is_zero() {
            1
        } else {
            let ratio = total.as_secs_f64() / step_interval.as_secs_f64();
            // Float noise can leave an exact multiple just below the next integer.
            let floored = (ratio + 1e-9).floor();
            floored.clamp(1.0, f64::from(u32::MAX)) as u32
        };
        Self {
            start,
            target,
            total,
            steps,
        }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn target(&self) -> Point {
        self.target
    }

    /// Sample for step `index` in `1..=steps`.
    pub fn step(&self, index: u32) -> PathStep {
        let index = index.clamp(1, self.steps);
        if index == self.steps {
            return PathStep {
                index,
                position: self.target,
                at: self.total,
            };
        }
        let t = f64::from(index) / f64::from(self.steps);
        let eased = ease_in_out(t);
        PathStep {
            index,
            position: Point::new(
                lerp(self.start.x, self.target.x, eased),
                lerp(self.start.y, self.target.y, eased),
            ),
            at: self.total.mul_f64(t),
        }
    }

    /// All steps in order.
    pub fn iter(&self) -> impl Iterator<Item = PathStep> + '_ {
        (1..=self.steps).map(|index| self.step(index))
    }
}

fn lerp(from: i32, to: i32, fraction: f64) -> i32 {
    let value = f64::from(from) + (f64::from(to) - f64::from(from)) * fraction;
    value.round() as i32
}
