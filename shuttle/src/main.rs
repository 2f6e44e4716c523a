//! Cooperative pointer shuttle CLI.
//!
//! Glides the pointer between two points around the screen center, clicking
//! at each end, and backs off whenever the human takes the mouse. Moving the
//! pointer to the top-left corner or pressing Ctrl+C aborts the run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use shuttle::core::duration::format_duration_secs;
use shuttle::core::geometry::{Geometry, resolve_geometry};
use shuttle::core::settings::Settings;
use shuttle::core::types::ScreenSize;
use shuttle::exit_codes;
use shuttle::io::abort::{
    ABORT_CORNER, AbortCause, AbortSignal, CornerGuard, install_interrupt_handler,
};
use shuttle::io::clock::SystemClock;
use shuttle::io::config::{CONFIG_FILE, ShuttleConfig, load_config, write_config};
use shuttle::io::pointer::{Pointer, system_pointer};
use shuttle::logging;
use shuttle::run::{RunEvent, RunStop, run_shuttle};

#[derive(Parser)]
#[command(
    name = "shuttle",
    version,
    about = "Cooperative pointer shuttle that yields to the human"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count down, then shuttle the pointer between A and B until the duration elapses.
    Run {
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Validate configuration and print the resolved endpoints without moving the pointer.
    Check {
        /// Screen size as WIDTHxHEIGHT instead of querying the display.
        #[arg(long, value_parser = parse_screen)]
        screen: Option<ScreenSize>,
        /// Print settings and geometry as JSON.
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Write a default config file if missing.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
        /// Destination path.
        #[arg(long, default_value = CONFIG_FILE)]
        config: PathBuf,
    },
}

/// Config file location plus per-field overrides.
#[derive(Args, Debug, Clone)]
struct Overrides {
    /// Config file (TOML); a missing file means built-in defaults.
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,
    /// Total run time, e.g. 45s, 10m, 2h, 1h30m, 600.
    #[arg(long = "for", value_name = "DURATION")]
    for_duration: Option<String>,
    /// Horizontal distance from center to each endpoint (px).
    #[arg(long, allow_negative_numbers = true)]
    offset_x: Option<i32>,
    /// Vertical distance from center to each endpoint (px).
    #[arg(long, allow_negative_numbers = true)]
    offset_y: Option<i32>,
    /// Seconds per leg (A->B or B->A).
    #[arg(long, allow_negative_numbers = true)]
    move_duration: Option<f64>,
    /// Pause after each click (s).
    #[arg(long, allow_negative_numbers = true)]
    pause: Option<f64>,
    /// Countdown before the first move (s).
    #[arg(long, allow_negative_numbers = true)]
    countdown: Option<i64>,
    /// Seconds without human movement before resuming.
    #[arg(long, allow_negative_numbers = true)]
    idle_seconds: Option<f64>,
    /// Drift tolerance (px) before yielding to the human.
    #[arg(long, allow_negative_numbers = true)]
    drift: Option<f64>,
    /// Minimum endpoint distance from screen edges (px).
    #[arg(long, allow_negative_numbers = true)]
    margin: Option<i32>,
}

impl Overrides {
    /// Load the config file and apply command-line overrides on top.
    fn load(&self) -> Result<ShuttleConfig> {
        let mut cfg = load_config(&self.config)?;
        self.apply(&mut cfg);
        Ok(cfg)
    }

    fn apply(&self, cfg: &mut ShuttleConfig) {
        if let Some(duration) = &self.for_duration {
            cfg.duration = duration.clone();
        }
        if let Some(value) = self.offset_x {
            cfg.offset_x = value;
        }
        if let Some(value) = self.offset_y {
            cfg.offset_y = value;
        }
        if let Some(value) = self.move_duration {
            cfg.move_duration_secs = value;
        }
        if let Some(value) = self.pause {
            cfg.pause_between_secs = value;
        }
        if let Some(value) = self.countdown {
            cfg.countdown_secs = value;
        }
        if let Some(value) = self.idle_seconds {
            cfg.idle_secs = value;
        }
        if let Some(value) = self.drift {
            cfg.drift_tolerance_px = value;
        }
        if let Some(value) = self.margin {
            cfg.margin_px = value;
        }
    }
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Run { overrides } => cmd_run(&overrides),
        Command::Check {
            screen,
            json,
            overrides,
        } => cmd_check(screen, json, &overrides),
        Command::Init { force, config } => cmd_init(force, &config),
    }
}

fn cmd_run(overrides: &Overrides) -> Result<i32> {
    let settings = overrides.load()?.resolve()?;

    let signal = AbortSignal::new();
    install_interrupt_handler(signal.clone())?;
    let pointer = CornerGuard::new(system_pointer()?, signal.clone());
    let clock = SystemClock::new(signal);

    if settings.countdown_secs > 0 {
        println!(
            "Starting in {}... (abort: move the pointer to {} or press Ctrl+C)",
            settings.countdown_secs, ABORT_CORNER
        );
    }

    let outcome = run_shuttle(&pointer, &clock, &settings, |event| {
        print_event(event, &settings);
    })?;

    match outcome.stop {
        RunStop::Finished => {
            println!("Finished. Cycles completed: {}", outcome.cycles_completed);
            Ok(exit_codes::OK)
        }
        RunStop::Aborted(AbortCause::Corner) => {
            println!(
                "Aborted: pointer reached {}. Cycles completed: {}",
                ABORT_CORNER, outcome.cycles_completed
            );
            Ok(exit_codes::ABORTED)
        }
        RunStop::Aborted(AbortCause::Interrupt) => {
            println!(
                "Aborted by user (Ctrl+C). Cycles completed: {}",
                outcome.cycles_completed
            );
            Ok(exit_codes::ABORTED)
        }
    }
}

#[derive(Serialize)]
struct CheckReport<'a> {
    settings: &'a Settings,
    geometry: &'a Geometry,
}

fn cmd_check(screen: Option<ScreenSize>, json: bool, overrides: &Overrides) -> Result<i32> {
    let settings = overrides.load()?.resolve()?;
    let screen = match screen {
        Some(screen) => screen,
        None => system_pointer()?
            .screen_size()
            .context("query screen size")?,
    };
    let geometry = resolve_geometry(
        screen,
        settings.offset_x,
        settings.offset_y,
        settings.margin_px,
    );

    if json {
        let report = CheckReport {
            settings: &settings,
            geometry: &geometry,
        };
        let payload = serde_json::to_string_pretty(&report).context("serialize check report")?;
        println!("{payload}");
    } else {
        print_plan(&settings, &geometry);
    }
    Ok(exit_codes::OK)
}

fn cmd_init(force: bool, path: &Path) -> Result<i32> {
    if !force && path.exists() {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    write_config(path, &ShuttleConfig::default())?;
    println!("wrote {}", path.display());
    Ok(exit_codes::OK)
}

fn print_event(event: &RunEvent, settings: &Settings) {
    match event {
        RunEvent::Countdown { remaining } => println!("{remaining}"),
        RunEvent::Started { geometry } => print_plan(settings, geometry),
        RunEvent::Interrupted { deviation, .. } => println!(
            "Interrupted by user (drift {deviation:.0}px). Pausing until the pointer is idle..."
        ),
        RunEvent::Arrived { .. } | RunEvent::CycleCompleted { .. } => {}
    }
}

fn print_plan(settings: &Settings, geometry: &Geometry) {
    for adjustment in geometry.adjustments() {
        println!(
            "[info] offset_{} adjusted {} -> {} to keep endpoints on screen",
            adjustment.axis, adjustment.requested, adjustment.applied
        );
    }
    println!(
        "Center={}  A={}  B={}",
        geometry.center, geometry.a, geometry.b
    );
    println!(
        "Duration: {}  Leg: {:.2}s  Idle: {}s  Drift: {}px",
        format_duration_secs(settings.duration_secs as u64),
        settings.move_duration_secs,
        settings.idle_secs,
        settings.drift_tolerance_px
    );
}

fn parse_screen(value: &str) -> Result<ScreenSize, String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let width: i32 = w
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{w}'"))?;
    let height: i32 = h
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{h}'"))?;
    if width <= 0 || height <= 0 {
        return Err(format!("screen size must be positive, got '{value}'"));
    }
    Ok(ScreenSize::new(width, height))
}
