//! CoreGraphics pointer backend.

use anyhow::{Result, anyhow};
use core_graphics::display::CGDisplay;
use core_graphics::event::{CGEvent, CGEventTapLocation, CGEventType, CGMouseButton};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;
use tracing::{debug, instrument};

use crate::core::types::{Button, Point, ScreenSize, round_px};
use crate::io::pointer::Pointer;

/// Reads and drives the system cursor through synthetic HID events.
///
/// Coordinates are in global display points, origin at the top-left of the
/// main display. Posting events requires the Accessibility permission.
pub struct CoreGraphicsPointer {
    source: CGEventSource,
}

impl CoreGraphicsPointer {
    pub fn new() -> Result<Self> {
        let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
            .map_err(|()| anyhow!("create CoreGraphics event source"))?;
        Ok(Self { source })
    }

    fn post_mouse(&self, kind: CGEventType, at: CGPoint, button: CGMouseButton) -> Result<()> {
        let event = CGEvent::new_mouse_event(self.source.clone(), kind, at, button)
            .map_err(|()| anyhow!("create mouse event"))?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }

    fn current_location(&self) -> Result<CGPoint> {
        let event =
            CGEvent::new(self.source.clone()).map_err(|()| anyhow!("query pointer location"))?;
        Ok(event.location())
    }
}

impl Pointer for CoreGraphicsPointer {
    fn position(&self) -> Result<Point> {
        let location = self.current_location()?;
        Ok(Point::new(round_px(location.x), round_px(location.y)))
    }

    fn move_to(&self, point: Point) -> Result<()> {
        self.post_mouse(
            CGEventType::MouseMoved,
            CGPoint::new(f64::from(point.x), f64::from(point.y)),
            CGMouseButton::Left,
        )
    }

    #[instrument(skip(self))]
    fn click(&self, button: Button) -> Result<()> {
        let at = self.current_location()?;
        let (down, up, cg_button) = match button {
            Button::Left => (
                CGEventType::LeftMouseDown,
                CGEventType::LeftMouseUp,
                CGMouseButton::Left,
            ),
            Button::Right => (
                CGEventType::RightMouseDown,
                CGEventType::RightMouseUp,
                CGMouseButton::Right,
            ),
        };
        self.post_mouse(down, at, cg_button)?;
        self.post_mouse(up, at, cg_button)?;
        debug!(x = at.x, y = at.y, "click posted");
        Ok(())
    }

    fn screen_size(&self) -> Result<ScreenSize> {
        let bounds = CGDisplay::main().bounds();
        Ok(ScreenSize::new(
            round_px(bounds.size.width),
            round_px(bounds.size.height),
        ))
    }
}
