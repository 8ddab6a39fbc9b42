//! Error types and error handling for the middle end.
//!
//! This module defines the single error type surfaced by both passes:
//!
//! - Error structures with source position information
//! - One variant per semantic failure, plus internal consistency failures
//! - Error names and suggestions used when rendering diagnostics
//!
//! Analysis is fail-fast, so a pass returns the first error it meets.

pub mod errors;
