//! Test-only simulated desk: a virtual pointer, a virtual clock, and a
//! scripted human who grabs the mouse at fixed times.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::core::settings::Settings;
use crate::core::types::{Button, Point, ScreenSize};
use crate::io::abort::AbortSignal;
use crate::io::clock::Clock;
use crate::io::pointer::Pointer;

/// Something the simulated human does at a scheduled time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HumanAction {
    /// Place the pointer at an absolute position.
    MoveTo(Point),
    /// Shift the pointer relative to wherever it currently is.
    Nudge { dx: i32, dy: i32 },
    /// Press Ctrl+C.
    Interrupt,
}

/// A click observed by the desk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedClick {
    pub at: Duration,
    pub button: Button,
    pub position: Point,
}

/// Deterministic [`Pointer`] + [`Clock`] pair.
///
/// Time only advances through [`Clock::sleep`]; scripted human actions fire as
/// soon as virtual time reaches them, before the next read.
pub struct SimDesk {
    origin: Instant,
    elapsed: Cell<Duration>,
    position: Cell<Point>,
    screen: ScreenSize,
    script: RefCell<VecDeque<(Duration, HumanAction)>>,
    moves: RefCell<Vec<Point>>,
    clicks: RefCell<Vec<RecordedClick>>,
    signal: AbortSignal,
}

impl SimDesk {
    pub fn new(screen: ScreenSize, start: Point) -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
            position: Cell::new(start),
            screen,
            script: RefCell::new(VecDeque::new()),
            moves: RefCell::new(Vec::new()),
            clicks: RefCell::new(Vec::new()),
            signal: AbortSignal::new(),
        }
    }

    /// Schedule human actions; entries are sorted by time.
    pub fn with_script(self, mut actions: Vec<(Duration, HumanAction)>) -> Self {
        actions.sort_by_key(|(at, _)| *at);
        self.script.borrow_mut().extend(actions);
        self
    }

    /// Signal raised by [`HumanAction::Interrupt`].
    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    pub fn set_position(&self, point: Point) {
        self.position.set(point);
    }

    /// Virtual time since the desk was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }

    pub fn moves(&self) -> Vec<Point> {
        self.moves.borrow().clone()
    }

    pub fn clicks(&self) -> Vec<RecordedClick> {
        self.clicks.borrow().clone()
    }

    fn apply_due(&self) {
        let now = self.elapsed.get();
        let mut script = self.script.borrow_mut();
        while script.front().is_some_and(|(at, _)| *at <= now) {
            let Some((_, action)) = script.pop_front() else {
                break;
            };
            match action {
                HumanAction::MoveTo(point) => self.position.set(point),
                HumanAction::Nudge { dx, dy } => {
                    self.position.set(self.position.get().offset(dx, dy));
                }
                HumanAction::Interrupt => self.signal.raise(),
            }
        }
    }
}

impl Pointer for SimDesk {
    fn position(&self) -> Result<Point> {
        self.apply_due();
        Ok(self.position.get())
    }

    fn move_to(&self, point: Point) -> Result<()> {
        self.apply_due();
        self.moves.borrow_mut().push(point);
        self.position.set(point);
        Ok(())
    }

    fn click(&self, button: Button) -> Result<()> {
        self.apply_due();
        self.clicks.borrow_mut().push(RecordedClick {
            at: self.elapsed.get(),
            button,
            position: self.position.get(),
        });
        Ok(())
    }

    fn screen_size(&self) -> Result<ScreenSize> {
        Ok(self.screen)
    }
}

impl Clock for SimDesk {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }

    fn sleep(&self, duration: Duration) -> Result<()> {
        self.signal.check()?;
        self.elapsed.set(self.elapsed.get() + duration);
        self.apply_due();
        self.signal.check()
    }
}

/// Settings for simulated runs: no countdown, no idle wait, no pause.
pub fn sim_settings(duration_secs: f64, move_duration_secs: f64) -> Settings {
    Settings {
        duration_secs,
        move_duration_secs,
        pause_between_secs: 0.0,
        idle_secs: 0.0,
        drift_tolerance_px: 25.0,
        countdown_secs: 0,
        ..Settings::default()
    }
}

/// 1920x1080 desk with the pointer resting at the screen center.
pub fn hd_desk() -> SimDesk {
    SimDesk::new(ScreenSize::new(1920, 1080), Point::new(960, 540))
}
