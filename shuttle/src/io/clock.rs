//! Time source and abortable sleeping.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};

use crate::io::abort::AbortSignal;

/// Longest uninterrupted sleep; bounds how late an interrupt is noticed.
pub const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Monotonic clock with cooperative sleeping.
pub trait Clock {
    fn now(&self) -> Instant;
    /// Suspend for `duration`. Fails with an abort if one is requested meanwhile.
    fn sleep(&self, duration: Duration) -> Result<()>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) -> Result<()> {
        (**self).sleep(duration)
    }
}

/// Wall clock backed by `Instant` and `thread::sleep`.
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    signal: AbortSignal,
}

impl SystemClock {
    pub fn new(signal: AbortSignal) -> Self {
        Self { signal }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> Result<()> {
        let deadline = Instant::now()
            .checked_add(duration)
            .ok_or_else(|| anyhow!("sleep of {duration:?} is out of range"))?;
        loop {
            self.signal.check()?;
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(());
            }
            thread::sleep(remaining.min(SLEEP_SLICE));
        }
    }
}

/// Time left until `deadline`, zero once it has passed.
pub fn remaining(clock: &impl Clock, deadline: Instant) -> Duration {
    deadline.saturating_duration_since(clock.now())
}
