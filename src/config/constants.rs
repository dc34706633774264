//! Configuration constants.
//!
//! This module defines the constants used throughout the checker, including
//! timeouts, wire-format limits and the fixed resolver addresses used outside
//! the main resolver pool.

use std::net::Ipv4Addr;
use std::time::Duration;

/// Standard DNS port for plain UDP queries.
pub const DNS_PORT: u16 = 53;

/// Default per-query timeout.
///
/// Applies to every single exchange: one pool resolver NS lookup, one hostname
/// resolution, or one direct probe. There is no retry after it expires.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default per-query timeout in milliseconds (CLI default).
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5_000;

/// Resolver queried by the baseline probe when no target is given.
pub const DEFAULT_PROBE_TARGET: Ipv4Addr = Ipv4Addr::new(8, 8, 8, 8);

/// String form of [`DEFAULT_PROBE_TARGET`] for CLI defaults.
pub const DEFAULT_PROBE_TARGET_STR: &str = "8.8.8.8";

/// Resolvers used only to turn a name server hostname into an address.
///
/// Kept apart from the resolver pool so that discovery and hostname
/// translation never share a failure domain.
pub const FALLBACK_RESOLVERS: [Ipv4Addr; 2] = [
    Ipv4Addr::new(114, 114, 114, 114),
    Ipv4Addr::new(8, 8, 8, 8),
];

/// UDP payload size advertised in the EDNS(0) OPT record of a direct probe.
///
/// 1232 bytes avoids IP fragmentation on virtually every path (DNS Flag Day 2020).
pub const EDNS_MAX_PAYLOAD: u16 = 1232;

/// Receive buffer for a UDP response.
pub const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// Separator printed between domains in plain batch output.
pub const REPORT_SEPARATOR: &str = "--------------------------------------";
