//! Abort channels: the reserved-corner convention and explicit interrupts.
//!
//! Aborts travel as an [`AbortError`] inside `anyhow::Error`, so they unwind
//! out of whichever sleep or pointer call is active. The controller recognises
//! them with `downcast_ref` and turns them into a clean run stop.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::core::types::{Button, Point, ScreenSize};
use crate::io::pointer::Pointer;

/// Reserved corner that aborts the run when the pointer reaches it.
pub const ABORT_CORNER: Point = Point::new(0, 0);

/// Why a run was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortCause {
    /// Pointer parked in the reserved top-left corner.
    Corner,
    /// Explicit user interrupt (Ctrl+C).
    Interrupt,
}

impl fmt::Display for AbortCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortCause::Corner => write!(f, "pointer moved to corner {ABORT_CORNER}"),
            AbortCause::Interrupt => f.write_str("user interrupt (Ctrl+C)"),
        }
    }
}

/// Terminal abort request surfaced by a pointer call or sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbortError {
    pub cause: AbortCause,
}

impl AbortError {
    pub fn corner() -> Self {
        Self {
            cause: AbortCause::Corner,
        }
    }

    pub fn interrupt() -> Self {
        Self {
            cause: AbortCause::Interrupt,
        }
    }
}

impl fmt::Display for AbortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aborted: {}", self.cause)
    }
}

impl std::error::Error for AbortError {}

/// Return the abort cause if `err` (or anything in its chain) is an abort.
pub fn abort_cause(err: &anyhow::Error) -> Option<AbortCause> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<AbortError>())
        .map(|abort| abort.cause)
}

/// Shared flag raised by the interrupt listener.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    raised: Arc<AtomicBool>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Fail with an interrupt abort if the flag is raised.
    pub fn check(&self) -> Result<()> {
        if self.is_raised() {
            return Err(AbortError::interrupt().into());
        }
        Ok(())
    }
}

/// Raise `signal` when the process receives Ctrl+C.
///
/// The listener runs on its own thread with a single-threaded runtime and
/// exits after the first signal.
pub fn install_interrupt_handler(signal: AbortSignal) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()
        .context("build signal runtime")?;
    thread::Builder::new()
        .name("shuttle-interrupt".to_string())
        .spawn(move || {
            runtime.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        debug!("interrupt received");
                        signal.raise();
                    }
                    Err(err) => warn!(error = %err, "interrupt listener failed"),
                }
            });
        })
        .context("spawn interrupt listener")?;
    Ok(())
}

/// Pointer decorator enforcing both abort channels on every call.
///
/// An observed position equal to [`ABORT_CORNER`] yields a corner abort; a
/// raised [`AbortSignal`] yields an interrupt abort. Ordinary reads never carry
/// an abort silently.
pub struct CornerGuard<P> {
    inner: P,
    signal: AbortSignal,
}

impl<P: Pointer> CornerGuard<P> {
    pub fn new(inner: P, signal: AbortSignal) -> Self {
        Self { inner, signal }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }

    fn guarded_position(&self) -> Result<Point> {
        self.signal.check()?;
        let position = self.inner.position()?;
        if position == ABORT_CORNER {
            return Err(AbortError::corner().into());
        }
        Ok(position)
    }
}

impl<P: Pointer> Pointer for CornerGuard<P> {
    fn position(&self) -> Result<Point> {
        self.guarded_position()
    }

    fn move_to(&self, point: Point) -> Result<()> {
        self.guarded_position()?;
        self.inner.move_to(point)
    }

    fn click(&self, button: Button) -> Result<()> {
        self.guarded_position()?;
        self.inner.click(button)
    }

    fn screen_size(&self) -> Result<ScreenSize> {
        self.signal.check()?;
        self.inner.screen_size()
    }
}
