//! Shuttle configuration stored in `shuttle.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::duration::parse_duration_secs;
use crate::core::settings::Settings;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "shuttle.toml";

/// Run length used when neither the config file nor `--for` names one.
pub const DEFAULT_DURATION: &str = "8h";

/// Shuttle configuration (TOML).
///
/// Edited by humans; missing fields default to the values below. The
/// `duration` field takes the same forms as `--for` (`"45s"`, `"1h30m"`,
/// `"600"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ShuttleConfig {
    /// Total run time, human-readable.
    pub duration: String,
    /// Horizontal half-distance between endpoints (px).
    pub offset_x: i32,
    /// Vertical half-distance between endpoints (px).
    pub offset_y: i32,
    /// Seconds per endpoint-to-endpoint leg.
    pub move_duration_secs: f64,
    /// Pause after each click (s).
    pub pause_between_secs: f64,
    /// Human idle time required before resuming (s).
    pub idle_secs: f64,
    /// Path deviation treated as a human takeover (px).
    pub drift_tolerance_px: f64,
    /// Countdown before the first move (s).
    pub countdown_secs: i64,
    /// Minimum endpoint distance from screen edges (px).
    pub margin_px: i32,
    /// Motion sampling interval (ms).
    pub step_interval_ms: u64,
    /// Idle polling interval (ms).
    pub poll_interval_ms: u64,
}

impl Default for ShuttleConfig {
    fn default() -> Self {
        let base = Settings::default();
        Self {
            duration: DEFAULT_DURATION.to_string(),
            offset_x: base.offset_x,
            offset_y: base.offset_y,
            move_duration_secs: base.move_duration_secs,
            pause_between_secs: base.pause_between_secs,
            idle_secs: base.idle_secs,
            drift_tolerance_px: base.drift_tolerance_px,
            countdown_secs: base.countdown_secs,
            margin_px: base.margin_px,
            step_interval_ms: 20,
            poll_interval_ms: 50,
        }
    }
}

impl ShuttleConfig {
    /// Parse the duration and validate every field, producing run settings.
    pub fn resolve(&self) -> Result<Settings> {
        let duration_secs = parse_duration_secs(&self.duration)?;
        let settings = Settings {
            duration_secs: duration_secs as f64,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            move_duration_secs: self.move_duration_secs,
            pause_between_secs: self.pause_between_secs,
            idle_secs: self.idle_secs,
            drift_tolerance_px: self.drift_tolerance_px,
            countdown_secs: self.countdown_secs,
            margin_px: self.margin_px,
            step_interval: Duration::from_millis(self.step_interval_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        };
        settings.validate()?;
        Ok(settings)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ShuttleConfig::default()`.
pub fn load_config(path: &Path) -> Result<ShuttleConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        return Ok(ShuttleConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ShuttleConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    debug!(path = %path.display(), "config loaded");
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ShuttleConfig) -> Result<()> {
    cfg.resolve()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
