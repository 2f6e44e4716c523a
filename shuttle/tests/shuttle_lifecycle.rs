//! Run-level tests for the full shuttle lifecycle.
//!
//! These tests drive `run_shuttle` on a simulated desk (virtual clock plus a
//! scripted human) to verify end-to-end behavior: endpoint alternation, cycle
//! counting, yielding to the human, deadline handling, and aborts.

use std::time::Duration;

use shuttle::core::settings::Settings;
use shuttle::core::types::{Button, Endpoint, Point};
use shuttle::io::abort::{AbortCause, CornerGuard};
use shuttle::run::{RunEvent, RunOutcome, RunStop, run_shuttle};
use shuttle::test_support::{HumanAction, SimDesk, hd_desk, sim_settings};

const A: Point = Point::new(660, 540);
const B: Point = Point::new(1260, 540);

fn run_on(desk: &SimDesk, settings: &Settings) -> (RunOutcome, Vec<RunEvent>) {
    let guard = CornerGuard::new(desk, desk.signal());
    let mut events = Vec::new();
    let outcome =
        run_shuttle(&guard, desk, settings, |event| events.push(*event)).expect("run_shuttle");
    (outcome, events)
}

fn arrivals(events: &[RunEvent]) -> Vec<Endpoint> {
    events
        .iter()
        .filter_map(|event| match event {
            RunEvent::Arrived { endpoint, .. } => Some(*endpoint),
            _ => None,
        })
        .collect()
}

/// 20 s run, 5 s legs, no pauses, nobody touching the mouse: two full cycles.
#[test]
fn uninterrupted_run_completes_two_cycles_in_twenty_seconds() {
    let desk = hd_desk();
    let settings = sim_settings(20.0, 5.0);

    let (outcome, events) = run_on(&desk, &settings);

    assert_eq!(outcome.stop, RunStop::Finished);
    assert_eq!(outcome.cycles_completed, 2);
    assert_eq!(outcome.interruptions, 0);
    assert!(outcome.elapsed.abs_diff(Duration::from_secs(20)) <= settings.step_interval);

    let geometry = outcome.geometry.expect("geometry resolved");
    assert_eq!((geometry.a, geometry.b), (A, B));

    let clicks: Vec<(Button, Point)> = desk
        .clicks()
        .iter()
        .map(|click| (click.button, click.position))
        .collect();
    assert_eq!(
        clicks,
        vec![
            (Button::Right, B),
            (Button::Left, A),
            (Button::Right, B),
            (Button::Left, A),
        ]
    );
    assert_eq!(
        arrivals(&events),
        vec![Endpoint::B, Endpoint::A, Endpoint::B, Endpoint::A]
    );
    let cycle_marks: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            RunEvent::CycleCompleted { cycles } => Some(*cycles),
            _ => None,
        })
        .collect();
    assert_eq!(cycle_marks, vec![1, 2]);
}

/// Completed cycles follow floor(available / (2 * move + 2 * pause)).
#[test]
fn cycle_count_matches_leg_budget() {
    for (duration, pause, expected) in [(22.0, 0.5, 2), (60.0, 0.0, 6), (44.0, 0.5, 4)] {
        let desk = hd_desk();
        let settings = Settings {
            pause_between_secs: pause,
            ..sim_settings(duration, 5.0)
        };

        let (outcome, _) = run_on(&desk, &settings);

        let leg = 5.0 + pause;
        let predicted = (duration / (2.0 * leg)).floor() as u32;
        assert_eq!(predicted, expected);
        assert_eq!(outcome.cycles_completed, expected, "duration {duration}");
        assert_eq!(outcome.stop, RunStop::Finished);
    }
}

/// A 40 px shove mid-leg (tolerance 25 px) abandons that leg without a click,
/// waits for quiet, then retries the same endpoint.
#[test]
fn human_shove_pauses_and_retries_same_endpoint() {
    let desk = hd_desk().with_script(vec![(
        Duration::from_millis(2510),
        HumanAction::Nudge { dx: 0, dy: 40 },
    )]);
    let settings = Settings {
        idle_secs: 0.3,
        ..sim_settings(20.0, 5.0)
    };

    let (outcome, events) = run_on(&desk, &settings);

    let first_interrupt = events
        .iter()
        .position(|event| matches!(event, RunEvent::Interrupted { .. }))
        .expect("interruption reported");
    let RunEvent::Interrupted {
        target, deviation, ..
    } = events[first_interrupt]
    else {
        unreachable!();
    };
    assert_eq!(target, B);
    assert!(deviation > settings.drift_tolerance_px);

    // Nothing arrived before the shove; the retry still heads to B.
    assert!(arrivals(&events[..first_interrupt]).is_empty());
    assert_eq!(arrivals(&events[first_interrupt..])[0], Endpoint::B);

    let clicks = desk.clicks();
    assert_eq!(clicks[0].button, Button::Right);
    assert_eq!(clicks[0].position, B);
    assert!(clicks[0].at > Duration::from_millis(2510) + settings.idle_time());

    assert_eq!(outcome.interruptions, 1);
    assert_eq!(outcome.cycles_completed, 2);
    assert_eq!(outcome.stop, RunStop::Finished);
}

/// Repeated grabs are retried indefinitely and never count as cycles.
#[test]
fn repeated_interruptions_never_count_cycles() {
    let desk = hd_desk().with_script(vec![
        (Duration::from_millis(1010), HumanAction::Nudge { dx: 50, dy: 0 }),
        (Duration::from_millis(2010), HumanAction::Nudge { dx: 0, dy: -50 }),
        (Duration::from_millis(3010), HumanAction::Nudge { dx: -50, dy: 0 }),
    ]);
    let settings = sim_settings(8.0, 5.0);

    let (outcome, events) = run_on(&desk, &settings);

    // Third retry starts near 3.02 s, lands on B past the 8 s deadline.
    assert_eq!(outcome.interruptions, 3);
    assert_eq!(outcome.cycles_completed, 0);
    assert_eq!(arrivals(&events), vec![Endpoint::B]);
    assert_eq!(desk.clicks().len(), 1);
    assert_eq!(outcome.stop, RunStop::Finished);
}

/// The deadline ends the run even halfway through a cycle.
#[test]
fn deadline_abandons_half_cycle() {
    let desk = hd_desk();
    let settings = sim_settings(5.0, 5.0);

    let (outcome, events) = run_on(&desk, &settings);

    assert_eq!(outcome.stop, RunStop::Finished);
    assert_eq!(outcome.cycles_completed, 0);
    assert_eq!(arrivals(&events), vec![Endpoint::B]);
}

/// Parking the pointer in the reserved corner aborts mid-leg and keeps the tally.
#[test]
fn corner_aborts_mid_leg() {
    let desk = hd_desk().with_script(vec![(
        Duration::from_secs(12),
        HumanAction::MoveTo(Point::new(0, 0)),
    )]);
    let settings = sim_settings(60.0, 5.0);

    let (outcome, _) = run_on(&desk, &settings);

    assert_eq!(outcome.stop, RunStop::Aborted(AbortCause::Corner));
    assert_eq!(outcome.cycles_completed, 1);
    assert_eq!(desk.clicks().len(), 2);
    assert!(desk.elapsed() < Duration::from_secs(13));
}

/// Ctrl+C during the post-click pause unwinds out of the sleep.
#[test]
fn interrupt_aborts_during_pause() {
    let desk = hd_desk().with_script(vec![(Duration::from_secs(6), HumanAction::Interrupt)]);
    let settings = Settings {
        pause_between_secs: 2.0,
        ..sim_settings(60.0, 5.0)
    };

    let (outcome, _) = run_on(&desk, &settings);

    assert_eq!(outcome.stop, RunStop::Aborted(AbortCause::Interrupt));
    assert_eq!(outcome.cycles_completed, 0);
    assert_eq!(desk.clicks().len(), 1);
    assert_eq!(desk.elapsed(), Duration::from_secs(7));
}

/// Ctrl+C while waiting for the human to let go.
#[test]
fn interrupt_aborts_during_quiet_wait() {
    let mut script: Vec<(Duration, HumanAction)> = (1..=20)
        .map(|i| {
            (
                Duration::from_millis(100 * i),
                HumanAction::Nudge { dx: 2, dy: 0 },
            )
        })
        .collect();
    script.push((Duration::from_millis(1500), HumanAction::Interrupt));
    let desk = hd_desk().with_script(script);
    let settings = Settings {
        idle_secs: 1.0,
        ..sim_settings(60.0, 5.0)
    };

    let (outcome, events) = run_on(&desk, &settings);

    assert_eq!(outcome.stop, RunStop::Aborted(AbortCause::Interrupt));
    assert!(arrivals(&events).is_empty());
    assert!(desk.moves().is_empty());
}
