//! Batch driver helpers.
//!
//! This module provides input loading, verdict rendering, and statistics
//! printing used by the batch run.

pub mod input;
pub mod output;
pub mod statistics;

// Re-export public API
pub use input::{parse_parent_domains, read_parent_domains};
pub use output::{render_failure, render_verdict};
pub use statistics::print_check_statistics;
