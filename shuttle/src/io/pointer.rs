//! Pointer abstraction for the host input-automation backend.
//!
//! The [`Pointer`] trait decouples the motion engine from the platform API
//! that actually reads and drives the cursor. Tests use a simulated desk that
//! tracks a virtual pointer without touching the real one.

use anyhow::Result;

use crate::core::types::{Button, Point, ScreenSize};

/// Pointer primitives consumed by the motion engine.
pub trait Pointer {
    /// Current pointer position.
    fn position(&self) -> Result<Point>;
    /// Place the pointer instantly; callers supply their own pacing.
    fn move_to(&self, point: Point) -> Result<()>;
    /// Press and release `button` at the current position.
    fn click(&self, button: Button) -> Result<()>;
    /// Resolution of the main screen.
    fn screen_size(&self) -> Result<ScreenSize>;
}

impl<P: Pointer + ?Sized> Pointer for &P {
    fn position(&self) -> Result<Point> {
        (**self).position()
    }

    fn move_to(&self, point: Point) -> Result<()> {
        (**self).move_to(point)
    }

    fn click(&self, button: Button) -> Result<()> {
        (**self).click(button)
    }

    fn screen_size(&self) -> Result<ScreenSize> {
        (**self).screen_size()
    }
}

impl<P: Pointer + ?Sized> Pointer for Box<P> {
    fn position(&self) -> Result<Point> {
        (**self).position()
    }

    fn move_to(&self, point: Point) -> Result<()> {
        (**self).move_to(point)
    }

    fn click(&self, button: Button) -> Result<()> {
        (**self).click(button)
    }

    fn screen_size(&self) -> Result<ScreenSize> {
        (**self).screen_size()
    }
}

/// Pointer backend for the current platform.
#[cfg(target_os = "macos")]
pub fn system_pointer() -> Result<Box<dyn Pointer>> {
    Ok(Box::new(crate::io::macos::CoreGraphicsPointer::new()?))
}

/// Pointer backend for the current platform.
#[cfg(not(target_os = "macos"))]
pub fn system_pointer() -> Result<Box<dyn Pointer>> {
    anyhow::bail!(
        "no pointer backend for {} (supported: macos)",
        std::env::consts::OS
    )
}
