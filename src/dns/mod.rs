//! DNS discovery and probing.
//!
//! This module provides the protocol side of the checker:
//! - Hostname resolution through the fallback resolvers (A records)
//! - NS discovery fanned out over the resolver pool (`hickory-resolver`)
//! - Direct NS probes built and decoded with `hickory-proto` over raw UDP
//! - Extended DNS Error (RFC 8914) decoding
//!
//! Each network-facing piece sits behind a trait so the decision engine can
//! be exercised without touching the network.

mod ede;
mod hostname;
mod nameservers;
mod probe;
mod transport;

// Re-export public API
pub use ede::{extract_extended_errors, EdeInfoCode, ExtendedDnsError, EDE_OPTION_CODE};
pub use hostname::{FallbackHostnameResolver, HostnameResolver};
pub use nameservers::{NameServerDiscovery, NsAggregator, NsLookup, PoolNsLookup};
pub use probe::{
    build_ns_query, classify_response, read_response, DirectProbe, InvalidProbeTarget, ProbeTarget,
    Prober,
};
pub use transport::{DnsTransport, UdpTransport};
