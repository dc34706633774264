//! Error handling and batch statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, lookup, check)
//! - Conversion of resolver failures into the lookup taxonomy
//! - Per-outcome statistics over a batch of domains
//!
//! Lookup errors are always recovered where they happen. Only
//! [`CheckError`] reaches the caller of a domain check.

mod stats;
mod types;

// Re-export public API
pub use stats::CheckStats;
pub use types::{CheckError, CheckOutcome, InitializationError, LookupError};
