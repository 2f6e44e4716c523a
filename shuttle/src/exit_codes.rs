//! Stable exit codes for shuttle CLI commands.

/// Command succeeded; for `run`, the deadline passed normally.
pub const OK: i32 = 0;
/// Invalid configuration, missing pointer backend, or another error.
pub const INVALID: i32 = 1;
/// `shuttle run` was aborted by the reserved corner or Ctrl+C.
pub const ABORTED: i32 = 2;
