//! Shared deterministic types for the motion core.
//!
//! These types define the contracts between the geometry resolver, the motion
//! generator, and the alternation controller. They carry no I/O.

use serde::Serialize;

/// Integer pixel coordinate in screen space (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in pixels.
    pub fn distance(self, other: Point) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        dx.hypot(dy)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Round a backend coordinate to whole pixels, saturating at the `i32` range.
///
/// NaN maps to 0.
pub fn round_px(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Screen resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl ScreenSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Mouse button issued at an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Left,
    Right,
}

impl std::fmt::Display for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Button::Left => f.write_str("left"),
            Button::Right => f.write_str("right"),
        }
    }
}

/// Which endpoint the pointer is currently travelling toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    A,
    B,
}

impl Endpoint {
    /// Button clicked on arrival: right at B, left at A.
    pub fn button(self) -> Button {
        match self {
            Endpoint::A => Button::Left,
            Endpoint::B => Button::Right,
        }
    }
}

/// Result of one cooperative traversal attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TravelOutcome {
    /// All steps completed within tolerance; the click was issued.
    Arrived,
    /// The human took over: actual position strayed beyond tolerance.
    Interrupted {
        expected: Point,
        actual: Point,
        deviation: f64,
    },
}

impl TravelOutcome {
    pub fn arrived(&self) -> bool {
        matches!(self, TravelOutcome::Arrived)
    }
}
