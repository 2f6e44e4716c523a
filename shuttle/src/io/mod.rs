//! I/O seams for the shuttle: pointer backend, clock, abort channels, config.

pub mod abort;
pub mod clock;
pub mod config;
#[cfg(target_os = "macos")]
pub mod macos;
pub mod pointer;
