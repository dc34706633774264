//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger (plain or JSON)
//! - The production decision engine (resolver pool discovery, fallback
//!   hostname resolution, direct UDP probes)

mod logger;
mod resolver;

// Re-export public API
pub use logger::init_logger_with;
pub use resolver::{init_checker, init_hostname_resolver, init_ns_aggregator};
