//! Shared utilities for slsdist.
//!
//! This crate provides cross-cutting concerns used by all other slsdist crates:
//! the unified error type, atomic filesystem helpers, unified line diffs, and
//! Cargo-style terminal status lines.

pub mod diff;
pub mod errors;
pub mod fs;
pub mod progress;
