//! Endpoint-alternation controller for `shuttle run`.

use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use tracing::{debug, info, instrument, warn};

use crate::core::alternation::Shuttle;
use crate::core::geometry::{Geometry, resolve_geometry};
use crate::core::settings::Settings;
use crate::core::types::{Button, Endpoint, Point, TravelOutcome};
use crate::io::abort::{AbortCause, abort_cause};
use crate::io::clock::{Clock, remaining};
use crate::io::pointer::Pointer;
use crate::motion::{move_and_click, wait_until_quiet};

/// Reason why `run_shuttle` stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStop {
    /// The wall-clock deadline passed.
    Finished,
    /// An abort signal ended the run early.
    Aborted(AbortCause),
}

/// Summary of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Full A→B→A round trips.
    pub cycles_completed: u32,
    /// Traversals abandoned because the human took over.
    pub interruptions: u32,
    /// Resolved geometry; `None` if the run stopped during the countdown.
    pub geometry: Option<Geometry>,
    /// Time from the start of the countdown to the stop.
    pub elapsed: Duration,
    pub stop: RunStop,
}

/// Progress notifications emitted while the run is live.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunEvent {
    /// One countdown tick; `remaining` seconds before motion starts.
    Countdown { remaining: i64 },
    /// Countdown over and geometry resolved; motion starts next.
    Started { geometry: Geometry },
    /// Arrived at `endpoint` and clicked.
    Arrived {
        endpoint: Endpoint,
        point: Point,
        button: Button,
    },
    /// A full round trip just completed.
    CycleCompleted { cycles: u32 },
    /// The human took over; waiting for quiet before retrying `target`.
    Interrupted {
        target: Point,
        expected: Point,
        actual: Point,
        deviation: f64,
    },
}

struct Progress {
    shuttle: Shuttle,
    geometry: Option<Geometry>,
    started_at: Option<Instant>,
}

/// Shuttle the pointer between A and B until the deadline or an abort.
///
/// Fixes the deadline, runs the countdown (which counts against the
/// deadline), resolves geometry once from the current screen size, then
/// loops: wait for quiet, glide to the current endpoint, click. Human
/// interruptions are retried indefinitely for the same endpoint. Abort errors
/// from the pointer or clock become `RunStop::Aborted`; any other error is
/// returned as-is.
#[instrument(skip_all, fields(duration_secs = settings.duration_secs))]
pub fn run_shuttle<P: Pointer, C: Clock, F: FnMut(&RunEvent)>(
    pointer: &P,
    clock: &C,
    settings: &Settings,
    mut on_event: F,
) -> Result<RunOutcome> {
    settings.validate()?;

    let mut progress = Progress {
        shuttle: Shuttle::new(),
        geometry: None,
        started_at: None,
    };

    let stop = match drive(pointer, clock, settings, &mut progress, &mut on_event) {
        Ok(()) => RunStop::Finished,
        Err(err) => match abort_cause(&err) {
            Some(cause) => {
                warn!(%cause, "run aborted");
                RunStop::Aborted(cause)
            }
            None => return Err(err),
        },
    };

    let elapsed = progress
        .started_at
        .map(|at| clock.now().saturating_duration_since(at))
        .unwrap_or_default();
    let outcome = RunOutcome {
        cycles_completed: progress.shuttle.cycles_completed(),
        interruptions: progress.shuttle.interruptions(),
        geometry: progress.geometry,
        elapsed,
        stop,
    };
    info!(
        cycles = outcome.cycles_completed,
        interruptions = outcome.interruptions,
        elapsed_ms = outcome.elapsed.as_millis(),
        stop = ?outcome.stop,
        "run stopped"
    );
    Ok(outcome)
}

fn drive<P: Pointer, C: Clock, F: FnMut(&RunEvent)>(
    pointer: &P,
    clock: &C,
    settings: &Settings,
    progress: &mut Progress,
    on_event: &mut F,
) -> Result<()> {
    // The countdown is part of the configured run time.
    let started_at = clock.now();
    let deadline = started_at
        .checked_add(settings.run_time())
        .ok_or_else(|| anyhow!("run deadline is out of range"))?;
    progress.started_at = Some(started_at);

    countdown(clock, settings.countdown_secs, on_event)?;

    let screen = pointer.screen_size()?;
    let geometry = resolve_geometry(
        screen,
        settings.offset_x,
        settings.offset_y,
        settings.margin_px,
    );
    progress.geometry = Some(geometry);
    info!(%screen, a = %geometry.a, b = %geometry.b, "run started");
    on_event(&RunEvent::Started { geometry });

    while clock.now() < deadline {
        let endpoint = progress.shuttle.heading();
        let (target, button) = progress.shuttle.next_leg(&geometry);

        wait_until_quiet(pointer, clock, settings)?;
        let outcome = move_and_click(pointer, clock, target, button, settings)?;
        let completed = progress.shuttle.record(&outcome);

        match outcome {
            TravelOutcome::Arrived => {
                debug!(
                    ?endpoint,
                    x = target.x,
                    y = target.y,
                    %button,
                    remaining_ms = remaining(clock, deadline).as_millis(),
                    "arrived"
                );
                on_event(&RunEvent::Arrived {
                    endpoint,
                    point: target,
                    button,
                });
                if completed {
                    on_event(&RunEvent::CycleCompleted {
                        cycles: progress.shuttle.cycles_completed(),
                    });
                }
            }
            TravelOutcome::Interrupted {
                expected,
                actual,
                deviation,
            } => {
                info!(?endpoint, deviation, "interrupted by user, waiting for idle");
                on_event(&RunEvent::Interrupted {
                    target,
                    expected,
                    actual,
                    deviation,
                });
            }
        }
    }
    Ok(())
}

/// Count down `secs` seconds, one event per second.
fn countdown<C: Clock, F: FnMut(&RunEvent)>(
    clock: &C,
    secs: i64,
    on_event: &mut F,
) -> Result<()> {
    for remaining in (1..=secs).rev() {
        on_event(&RunEvent::Countdown { remaining });
        clock.sleep(Duration::from_secs(1))?;
    }
    Ok(())
}
