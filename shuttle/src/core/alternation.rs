//! Endpoint-alternation state transitions.
//!
//! Pure bookkeeping for the controller loop: which endpoint comes next, which
//! button to click there, and how many round trips have completed.

use crate::core::geometry::Geometry;
use crate::core::types::{Button, Endpoint, Point, TravelOutcome};

/// Direction and cycle count for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shuttle {
    heading: Endpoint,
    cycles_completed: u32,
    interruptions: u32,
}

impl Default for Shuttle {
    fn default() -> Self {
        Self {
            heading: Endpoint::B,
            cycles_completed: 0,
            interruptions: 0,
        }
    }
}

impl Shuttle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(&self) -> Endpoint {
        self.heading
    }

    pub fn going_to_b(&self) -> bool {
        self.heading == Endpoint::B
    }

    /// Full A→B→A round trips, counted on return to A.
    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    pub fn interruptions(&self) -> u32 {
        self.interruptions
    }

    /// Target point and click button for the current heading.
    pub fn next_leg(&self, geometry: &Geometry) -> (Point, Button) {
        let point = match self.heading {
            Endpoint::A => geometry.a,
            Endpoint::B => geometry.b,
        };
        (point, self.heading.button())
    }

    /// Apply a traversal result.
    ///
    /// Arrival flips the heading; landing back on "toward B" completes a cycle.
    /// Interruption leaves heading and cycles untouched so the same leg is retried.
    /// Returns true when this transition completed a cycle.
    pub fn record(&mut self, outcome: &TravelOutcome) -> bool {
        match outcome {
            TravelOutcome::Arrived => {
                self.heading = match self.heading {
                    Endpoint::A => Endpoint::B,
                    Endpoint::B => Endpoint::A,
                };
                if self.heading == Endpoint::B {
                    self.cycles_completed += 1;
                    return true;
                }
                false
            }
            TravelOutcome::Interrupted { .. } => {
                self.interruptions += 1;
                false
            }
        }
    }
}
