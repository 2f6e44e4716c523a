//! Endpoint geometry derived from screen size and requested offsets.

use serde::Serialize;

use crate::core::types::{Point, ScreenSize};

/// Resolved run geometry: screen center and the two endpoints around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Geometry {
    pub screen: ScreenSize,
    pub center: Point,
    /// Left-click endpoint (`center - offset`).
    pub a: Point,
    /// Right-click endpoint (`center + offset`).
    pub b: Point,
    /// Offsets after clamping.
    pub offset_x: i32,
    pub offset_y: i32,
    /// Offsets as requested by configuration.
    pub requested_x: i32,
    pub requested_y: i32,
}

/// A clamp applied to one axis so endpoints stay on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub axis: char,
    pub requested: i32,
    pub applied: i32,
}

impl Geometry {
    /// Axes whose requested offset was changed by clamping.
    pub fn adjustments(&self) -> Vec<Adjustment> {
        let mut out = Vec::new();
        if self.offset_x != self.requested_x {
            out.push(Adjustment {
                axis: 'x',
                requested: self.requested_x,
                applied: self.offset_x,
            });
        }
        if self.offset_y != self.requested_y {
            out.push(Adjustment {
                axis: 'y',
                requested: self.requested_y,
                applied: self.offset_y,
            });
        }
        out
    }
}

/// Integer screen center.
pub fn screen_center(screen: ScreenSize) -> Point {
    Point::new(screen.width / 2, screen.height / 2)
}

/// Clamp a half-distance so `center ± offset` stays `margin` pixels inside `[0, extent]`.
///
/// Negative requests clamp to zero.
pub fn clamp_offset(center: i32, extent: i32, requested: i32, margin: i32) -> i32 {
    requested
        .min(center - margin)
        .min(extent - margin - center)
        .max(0)
}

/// Derive center and endpoints `A`/`B` for the given screen.
pub fn resolve_geometry(
    screen: ScreenSize,
    offset_x: i32,
    offset_y: i32,
    margin: i32,
) -> Geometry {
    let center = screen_center(screen);
    let dx = clamp_offset(center.x, screen.width, offset_x, margin);
    let dy = clamp_offset(center.y, screen.height, offset_y, margin);
    Geometry {
        screen,
        center,
        a: center.offset(-dx, -dy),
        b: center.offset(dx, dy),
        offset_x: dx,
        offset_y: dy,
        requested_x: offset_x,
        requested_y: offset_y,
    }
}
