//! Validated run settings consumed by the motion core.

use std::time::Duration;

use anyhow::{Result, bail};
use serde::Serialize;

/// Longest span any single time setting may take (one year).
pub const MAX_SPAN_SECS: f64 = 366.0 * 24.0 * 3600.0;

/// Immutable configuration for one run.
///
/// Built once at startup (see [`crate::io::config::ShuttleConfig::resolve`]) and
/// passed by reference into the controller. Times are in seconds, distances in
/// pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Total wall-clock run time.
    pub duration_secs: f64,
    /// Half-distance between endpoints, relative to screen center.
    pub offset_x: i32,
    pub offset_y: i32,
    /// Time budgeted for one endpoint-to-endpoint traversal.
    pub move_duration_secs: f64,
    /// Settle time after each click.
    pub pause_between_secs: f64,
    /// Required human-motionless time before automated motion resumes.
    pub idle_secs: f64,
    /// Deviation from the path that counts as a human takeover.
    pub drift_tolerance_px: f64,
    /// Pre-run grace period.
    pub countdown_secs: i64,
    /// Minimum distance between an endpoint and any screen edge.
    pub margin_px: i32,
    /// Motion sampling interval.
    #[serde(serialize_with = "as_millis")]
    pub step_interval: Duration,
    /// Quiescence polling interval.
    #[serde(serialize_with = "as_millis")]
    pub poll_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            duration_secs: 8.0 * 3600.0,
            offset_x: 300,
            offset_y: 0,
            move_duration_secs: 5.0,
            pause_between_secs: 0.10,
            idle_secs: 0.8,
            drift_tolerance_px: 25.0,
            countdown_secs: 3,
            margin_px: 10,
            step_interval: Duration::from_millis(20),
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl Settings {
    /// Reject the whole configuration if any bound is violated.
    pub fn validate(&self) -> Result<()> {
        let errors = settings_violations(self);
        if !errors.is_empty() {
            bail!("invalid configuration:\n- {}", errors.join("\n- "));
        }
        Ok(())
    }

    pub fn run_time(&self) -> Duration {
        secs_to_duration(self.duration_secs)
    }

    pub fn travel_time(&self) -> Duration {
        secs_to_duration(self.move_duration_secs)
    }

    pub fn pause_between(&self) -> Duration {
        secs_to_duration(self.pause_between_secs)
    }

    pub fn idle_time(&self) -> Duration {
        secs_to_duration(self.idle_secs)
    }
}

/// Saturating conversion; out-of-range input never panics.
fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Collect every bound violation. Empty means valid.
pub fn settings_violations(settings: &Settings) -> Vec<String> {
    let mut errors = Vec::new();

    if !settings.duration_secs.is_finite() || settings.duration_secs <= 0.0 {
        errors.push(format!(
            "duration must be > 0 s (got {})",
            settings.duration_secs
        ));
    } else if settings.duration_secs > MAX_SPAN_SECS {
        errors.push(format!(
            "duration must be at most {MAX_SPAN_SECS} s (got {})",
            settings.duration_secs
        ));
    }
    for (name, value) in [
        ("move_duration", settings.move_duration_secs),
        ("pause_between", settings.pause_between_secs),
        ("idle_seconds", settings.idle_secs),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!("{name} must be a non-negative number (got {value})"));
        } else if value > MAX_SPAN_SECS {
            errors.push(format!(
                "{name} must be at most {MAX_SPAN_SECS} s (got {value})"
            ));
        }
    }
    let drift = settings.drift_tolerance_px;
    if !drift.is_finite() || drift < 0.0 {
        errors.push(format!(
            "drift_tolerance must be a non-negative number (got {drift})"
        ));
    }
    if settings.countdown_secs < 0 {
        errors.push(format!(
            "countdown must not be negative (got {})",
            settings.countdown_secs
        ));
    }
    if settings.margin_px < 0 {
        errors.push(format!(
            "margin must not be negative (got {})",
            settings.margin_px
        ));
    }
    for (name, interval) in [
        ("step_interval", settings.step_interval),
        ("poll_interval", settings.poll_interval),
    ] {
        if interval.is_zero() {
            errors.push(format!("{name} must be > 0"));
        } else if interval.as_secs_f64() > MAX_SPAN_SECS {
            errors.push(format!(
                "{name} must be at most {MAX_SPAN_SECS} s (got {} ms)",
                interval.as_millis()
            ));
        }
    }

    errors
}

fn as_millis<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
}
