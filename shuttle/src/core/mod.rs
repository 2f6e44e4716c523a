//! Deterministic, pure logic for the cooperative motion engine.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return deterministic outputs suitable for tests.

pub mod alternation;
pub mod duration;
pub mod easing;
pub mod geometry;
pub mod quiet;
pub mod settings;
pub mod types;
