//! Quiescence detection and cooperative point-to-point motion.
//!
//! Both routines are explicit sampling loops over [`Pointer`] reads, paced by
//! a [`Clock`]. Any abort raised by either seam propagates unchanged.

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, instrument, trace};

use crate::core::easing::MotionPlan;
use crate::core::quiet::QuietTracker;
use crate::core::settings::Settings;
use crate::core::types::{Button, Point, TravelOutcome};
use crate::io::clock::Clock;
use crate::io::pointer::Pointer;

/// Block until the pointer has stayed within 1 px for `settings.idle_secs`.
///
/// Samples every `settings.poll_interval`. Returns immediately when no idle
/// time is required. Returns the total time spent waiting.
#[instrument(skip_all, fields(idle_secs = settings.idle_secs))]
pub fn wait_until_quiet<P: Pointer, C: Clock>(
    pointer: &P,
    clock: &C,
    settings: &Settings,
) -> Result<Duration> {
    let required = settings.idle_time();
    if required.is_zero() {
        return Ok(Duration::ZERO);
    }

    let started = clock.now();
    let mut tracker = QuietTracker::new(pointer.position()?, required);
    while !tracker.is_quiet() {
        clock.sleep(settings.poll_interval)?;
        let sample = pointer.position()?;
        tracker.observe(sample, settings.poll_interval);
        trace!(
            x = sample.x,
            y = sample.y,
            quiet_ms = tracker.quiet_for().as_millis(),
            "idle sample"
        );
    }

    let waited = clock.now().saturating_duration_since(started);
    debug!(waited_ms = waited.as_millis(), "pointer quiet");
    Ok(waited)
}

/// Move along an eased path to `target`, yielding to the human on drift.
///
/// Before every move the actual position is compared with the last commanded
/// path position (the start point before the first step), not with the
/// intended position of the step about to be issued. At the moment of the
/// check the pointer can only be where it was last put; comparing with the
/// upcoming position would count the step length itself as drift, so a leg
/// with steps longer than the tolerance could never arrive. After the last
/// step the position is compared with `target` once more before any click,
/// which is the only check for a zero-length move. A deviation above
/// `settings.drift_tolerance_px` abandons the traversal with no further
/// commands. Pacing sleeps only the slack between real and intended elapsed
/// time, so per-step overhead does not slow the traversal.
#[instrument(skip_all, fields(x = target.x, y = target.y))]
pub fn glide<P: Pointer, C: Clock>(
    pointer: &P,
    clock: &C,
    target: Point,
    settings: &Settings,
) -> Result<TravelOutcome> {
    let start = pointer.position()?;
    let plan = MotionPlan::new(
        start,
        target,
        settings.travel_time(),
        settings.step_interval,
    );
    let started = clock.now();
    let mut expected = start;

    for step in plan.iter() {
        let actual = pointer.position()?;
        if let Some(outcome) = check_drift(expected, actual, settings.drift_tolerance_px) {
            debug!(step = step.index, steps = plan.steps(), "human took over");
            return Ok(outcome);
        }

        pointer.move_to(step.position)?;
        expected = step.position;

        let elapsed = clock.now().saturating_duration_since(started);
        if let Some(slack) = step.at.checked_sub(elapsed) {
            if !slack.is_zero() {
                clock.sleep(slack)?;
            }
        }
    }

    let actual = pointer.position()?;
    if let Some(outcome) = check_drift(target, actual, settings.drift_tolerance_px) {
        debug!("human took over before click");
        return Ok(outcome);
    }
    Ok(TravelOutcome::Arrived)
}

/// Glide to `target`, then click `button` and settle for `pause_between`.
///
/// No click is issued unless the traversal arrived.
pub fn move_and_click<P: Pointer, C: Clock>(
    pointer: &P,
    clock: &C,
    target: Point,
    button: Button,
    settings: &Settings,
) -> Result<TravelOutcome> {
    let outcome = glide(pointer, clock, target, settings)?;
    if !outcome.arrived() {
        return Ok(outcome);
    }
    pointer.click(button)?;
    clock.sleep(settings.pause_between())?;
    Ok(outcome)
}

fn check_drift(expected: Point, actual: Point, tolerance: f64) -> Option<TravelOutcome> {
    let deviation = expected.distance(actual);
    if deviation > tolerance {
        return Some(TravelOutcome::Interrupted {
            expected,
            actual,
            deviation,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ScreenSize;
    use crate::io::abort::{AbortCause, AbortSignal, CornerGuard, abort_cause};
    use crate::test_support::{HumanAction, SimDesk, hd_desk, sim_settings};

    fn idle_settings(idle_secs: f64) -> Settings {
        Settings {
            idle_secs,
            ..sim_settings(60.0, 1.0)
        }
    }

    #[test]
    fn quiet_wait_returns_immediately_without_idle_requirement() {
        let desk = hd_desk();
        let waited = wait_until_quiet(&desk, &desk, &idle_settings(0.0)).expect("wait");
        assert_eq!(waited, Duration::ZERO);
        assert_eq!(desk.elapsed(), Duration::ZERO);
    }

    #[test]
    fn quiet_wait_restarts_on_every_human_move() {
        let desk = hd_desk().with_script(vec![
            (Duration::from_millis(100), HumanAction::Nudge { dx: 5, dy: 0 }),
            (Duration::from_millis(300), HumanAction::Nudge { dx: 0, dy: 3 }),
        ]);
        let waited = wait_until_quiet(&desk, &desk, &idle_settings(0.5)).expect("wait");
        assert_eq!(waited, Duration::from_millis(800));
    }

    #[test]
    fn quiet_wait_on_still_pointer_takes_exactly_idle_time() {
        let desk = hd_desk();
        let waited = wait_until_quiet(&desk, &desk, &idle_settings(0.2)).expect("wait");
        assert_eq!(waited, Duration::from_millis(200));
    }

    #[test]
    fn custom_sampling_intervals_pace_both_loops() {
        let desk = hd_desk();
        let settings = Settings {
            step_interval: Duration::from_millis(100),
            poll_interval: Duration::from_millis(200),
            ..idle_settings(0.5)
        };

        let waited = wait_until_quiet(&desk, &desk, &settings).expect("wait");
        assert_eq!(waited, Duration::from_millis(600));

        let outcome = glide(&desk, &desk, Point::new(1260, 540), &settings).expect("glide");
        assert_eq!(outcome, TravelOutcome::Arrived);
        assert_eq!(desk.moves().len(), 10);
    }

    #[test]
    fn glide_without_drift_arrives_on_schedule() {
        let desk = hd_desk();
        let target = Point::new(1260, 540);
        let settings = sim_settings(60.0, 1.0);

        let outcome = glide(&desk, &desk, target, &settings).expect("glide");

        assert_eq!(outcome, TravelOutcome::Arrived);
        let moves = desk.moves();
        assert_eq!(moves.len(), 50);
        assert_eq!(moves.last(), Some(&target));
        let drift = desk.elapsed().abs_diff(Duration::from_secs(1));
        assert!(drift <= settings.step_interval, "elapsed {:?}", desk.elapsed());
        assert!(desk.clicks().is_empty());
    }

    #[test]
    fn glide_concedes_when_human_moves_beyond_tolerance() {
        let desk = hd_desk().with_script(vec![(
            Duration::from_millis(510),
            HumanAction::Nudge { dx: 0, dy: 40 },
        )]);
        let settings = sim_settings(60.0, 1.0);

        let outcome =
            move_and_click(&desk, &desk, Point::new(1260, 540), Button::Right, &settings)
                .expect("glide");

        let TravelOutcome::Interrupted { deviation, .. } = outcome else {
            panic!("expected interruption, got {outcome:?}");
        };
        assert!((deviation - 40.0).abs() < 1e-9);
        assert!(desk.clicks().is_empty());
        let moves_after = desk.moves().len();
        assert!(moves_after < 50);
        assert!(desk.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn glide_tolerates_small_jitter() {
        let desk = hd_desk().with_script(vec![(
            Duration::from_millis(300),
            HumanAction::Nudge { dx: 10, dy: 10 },
        )]);
        let outcome = glide(&desk, &desk, Point::new(1260, 540), &sim_settings(60.0, 1.0))
            .expect("glide");
        assert_eq!(outcome, TravelOutcome::Arrived);
    }

    #[test]
    fn zero_duration_move_is_one_step_then_click() {
        let desk = hd_desk();
        let settings = Settings {
            pause_between_secs: 0.25,
            ..sim_settings(60.0, 0.0)
        };
        let target = Point::new(660, 540);

        let outcome =
            move_and_click(&desk, &desk, target, Button::Left, &settings).expect("move");

        assert_eq!(outcome, TravelOutcome::Arrived);
        assert_eq!(desk.moves(), vec![target]);
        let clicks = desk.clicks();
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0].button, Button::Left);
        assert_eq!(clicks[0].position, target);
        assert!(desk.elapsed() >= Duration::from_millis(250));
    }

    #[test]
    fn grab_after_last_step_skips_click() {
        let desk = SimDesk::new(ScreenSize::new(1920, 1080), Point::new(960, 540)).with_script(
            vec![(Duration::from_millis(1), HumanAction::Nudge { dx: 0, dy: -60 })],
        );
        let settings = sim_settings(60.0, 0.0);

        let outcome = move_and_click(&desk, &desk, Point::new(1260, 540), Button::Right, &settings)
            .expect("move");

        assert!(!outcome.arrived());
        assert!(desk.clicks().is_empty());
    }

    #[test]
    fn corner_abort_escapes_mid_glide() {
        let desk = hd_desk().with_script(vec![(
            Duration::from_millis(400),
            HumanAction::MoveTo(Point::new(0, 0)),
        )]);
        let guard = CornerGuard::new(&desk, AbortSignal::new());

        let err = glide(&guard, &desk, Point::new(1260, 540), &sim_settings(60.0, 1.0))
            .expect_err("abort");

        assert_eq!(abort_cause(&err), Some(AbortCause::Corner));
        assert!(desk.clicks().is_empty());
    }

    #[test]
    fn interrupt_escapes_quiet_wait() {
        let desk = hd_desk().with_script(vec![
            (Duration::from_millis(50), HumanAction::Nudge { dx: 3, dy: 0 }),
            (Duration::from_millis(200), HumanAction::Interrupt),
        ]);
        let guard = CornerGuard::new(&desk, desk.signal());

        let err = wait_until_quiet(&guard, &desk, &idle_settings(5.0)).expect_err("abort");

        assert_eq!(abort_cause(&err), Some(AbortCause::Interrupt));
        assert_eq!(desk.elapsed(), Duration::from_millis(200));
    }
}
