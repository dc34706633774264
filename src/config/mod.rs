//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, wire limits, fallback resolvers)
//! - The static resolver pool
//! - CLI option types and parsing

mod constants;
mod resolvers;
mod types;

// Re-export all constants
pub use constants::*;
pub use resolvers::{resolver_pool, ResolverEntry};
pub use types::{CheckInput, Config, FailOn, LogFormat, LogLevel, Opt, OutputFormat};
