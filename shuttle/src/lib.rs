//! Cooperative pointer shuttle.
//!
//! Moves the pointer back and forth between two points around the screen
//! center, clicking at each end, for a fixed wall-clock duration. Whenever a
//! human grabs the mouse the shuttle backs off, waits for the pointer to go
//! quiet, and retries the same leg. The architecture enforces a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (geometry, easing, quiet-time
//!   accounting, alternation state, settings validation). No I/O.
//! - **[`io`]**: Side-effecting seams (pointer backend, clock, abort channels,
//!   config file). Trait-based so tests run on a simulated desk.
//!
//! Orchestration modules ([`motion`], [`run`]) coordinate core logic with I/O
//! to implement the `shuttle run` loop.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod motion;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
