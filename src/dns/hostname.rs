//! Name server hostname resolution.
//!
//! NS records name hosts, but a direct probe needs an address. This module
//! turns a hostname into IPv4 addresses using the fallback resolvers, which
//! are kept separate from the discovery pool.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{
    NameServerConfig, NameServerConfigGroup, Protocol, ResolverConfig, ResolverOpts,
};
use hickory_resolver::TokioAsyncResolver;

use crate::config::{DNS_PORT, FALLBACK_RESOLVERS};
use crate::error_handling::LookupError;

/// Resolves a hostname to its IPv4 addresses.
#[async_trait]
pub trait HostnameResolver: Send + Sync {
    /// Returns the A records of `hostname` in answer order.
    ///
    /// NXDOMAIN and "no answer" yield `Ok` with an empty vector. Any other
    /// failure is an error that callers treat as an empty result.
    async fn resolve_a(&self, hostname: &str) -> Result<Vec<Ipv4Addr>, LookupError>;
}

/// [`HostnameResolver`] backed by the fixed fallback resolvers.
pub struct FallbackHostnameResolver {
    resolver: TokioAsyncResolver,
}

impl FallbackHostnameResolver {
    /// Creates a resolver pointed at [`FALLBACK_RESOLVERS`].
    pub fn new(timeout: Duration) -> Self {
        let servers: Vec<SocketAddr> = FALLBACK_RESOLVERS
            .iter()
            .map(|&ip| SocketAddr::new(IpAddr::V4(ip), DNS_PORT))
            .collect();
        Self::with_servers(&servers, timeout)
    }

    /// Creates a resolver pointed at the given servers, tried in order.
    pub fn with_servers(servers: &[SocketAddr], timeout: Duration) -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(clear_config(servers), uncached_opts(timeout)),
        }
    }
}

/// Plain-DNS resolver config for `servers`, UDP first with TCP as fallback.
pub(crate) fn clear_config(servers: &[SocketAddr]) -> ResolverConfig {
    let mut group = NameServerConfigGroup::new();
    for protocol in [Protocol::Udp, Protocol::Tcp] {
        group.extend(
            servers
                .iter()
                .map(|&addr| NameServerConfig::new(addr, protocol)),
        );
    }
    ResolverConfig::from_parts(None, vec![], group)
}

/// Resolver options for single-shot lookups: one attempt, no cache, no search list.
pub(crate) fn uncached_opts(timeout: Duration) -> ResolverOpts {
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 1;
    opts.ndots = 0;
    opts.cache_size = 0;
    opts.edns0 = true;
    opts
}

#[async_trait]
impl HostnameResolver for FallbackHostnameResolver {
    async fn resolve_a(&self, hostname: &str) -> Result<Vec<Ipv4Addr>, LookupError> {
        match self.resolver.ipv4_lookup(hostname).await {
            Ok(lookup) => {
                let ips: Vec<Ipv4Addr> = lookup.iter().map(|a| a.0).collect();
                log::debug!("{hostname} resolved to {ips:?}");
                Ok(ips)
            }
            Err(e) => match LookupError::from(e) {
                LookupError::NxDomain => {
                    log::info!("The DNS query name does not exist: {hostname}");
                    Ok(Vec::new())
                }
                LookupError::NoAnswer => {
                    log::info!(
                        "The DNS response does not contain an answer to the question: {hostname}"
                    );
                    Ok(Vec::new())
                }
                other => {
                    log::warn!("Failed to resolve {hostname}: {other}");
                    Err(other)
                }
            },
        }
    }
}

