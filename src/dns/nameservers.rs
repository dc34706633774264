//! Multi-resolver NS discovery.
//!
//! One NS query per pool resolver, all in flight at once. Failures are
//! swallowed per resolver; the answers that do arrive are merged into a
//! single [`NameServerSet`] after every task has finished.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;
use log::{debug, warn};
use tokio::task::AbortHandle;

use super::hostname::{clear_config, uncached_opts};
use crate::config::{ResolverEntry, DNS_PORT};
use crate::error_handling::LookupError;
use crate::models::NameServerSet;

/// Asks one resolver for the NS targets of a domain.
#[async_trait]
pub trait NsLookup: Send + Sync {
    /// Returns the NS targets `resolver` reports for `domain`, as received.
    async fn lookup_ns(
        &self,
        resolver: ResolverEntry,
        domain: &str,
    ) -> Result<Vec<String>, LookupError>;
}

/// Produces the NS set the decision engine probes.
#[async_trait]
pub trait NameServerDiscovery: Send + Sync {
    /// Returns every name server found for `domain`; empty when none was.
    async fn query_ns(&self, domain: &str) -> NameServerSet;
}

/// [`NsLookup`] that builds a throwaway single-server resolver per query.
///
/// Nothing is cached between calls, so every check sees fresh answers.
#[derive(Debug, Clone)]
pub struct PoolNsLookup {
    timeout: Duration,
    port: u16,
}

impl PoolNsLookup {
    /// Creates a lookup that queries pool resolvers on the standard DNS port.
    pub fn new(timeout: Duration) -> Self {
        Self::with_port(timeout, DNS_PORT)
    }

    /// Creates a lookup that queries pool resolvers on `port`.
    pub fn with_port(timeout: Duration, port: u16) -> Self {
        Self { timeout, port }
    }

    fn resolver_for(&self, entry: ResolverEntry) -> TokioAsyncResolver {
        let addr = SocketAddr::new(IpAddr::V4(entry.address), self.port);
        TokioAsyncResolver::tokio(clear_config(&[addr]), uncached_opts(self.timeout))
    }
}

#[async_trait]
impl NsLookup for PoolNsLookup {
    async fn lookup_ns(
        &self,
        resolver: ResolverEntry,
        domain: &str,
    ) -> Result<Vec<String>, LookupError> {
        let lookup = self
            .resolver_for(resolver)
            .lookup(domain, RecordType::NS)
            .await
            .map_err(LookupError::from)?;
        let nameservers = lookup
            .iter()
            .filter_map(|rdata| {
                if let RData::NS(ns) = rdata {
                    Some(ns.to_utf8())
                } else {
                    None
                }
            })
            .collect();
        Ok(nameservers)
    }
}

/// Fans an NS query out over the whole resolver pool.
pub struct NsAggregator {
    pool: Vec<ResolverEntry>,
    lookup: Arc<dyn NsLookup>,
}

/// Aborts the tasks it holds when dropped, so a cancelled discovery does
/// not leave lookups running.
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

impl NsAggregator {
    /// Creates an aggregator over `pool`, querying each entry through `lookup`.
    pub fn new(pool: impl Into<Vec<ResolverEntry>>, lookup: Arc<dyn NsLookup>) -> Self {
        Self {
            pool: pool.into(),
            lookup,
        }
    }

    /// The resolvers every discovery fans out to.
    pub fn pool(&self) -> &[ResolverEntry] {
        &self.pool
    }

    /// Returns the union of every resolver's NS answer for `domain`.
    ///
    /// Spawns one task per pool entry and waits for all of them; a resolver
    /// that fails contributes nothing. Never returns an error: a total
    /// outage yields an empty set.
    pub async fn query_ns(&self, domain: &str) -> NameServerSet {
        let mut tasks = FuturesUnordered::new();
        // dropped on return or cancellation
        let mut guard = AbortOnDrop(Vec::with_capacity(self.pool.len()));
        for &entry in &self.pool {
            let lookup = Arc::clone(&self.lookup);
            let domain = domain.to_string();
            let handle = tokio::spawn(async move {
                let result = lookup.lookup_ns(entry, &domain).await;
                (entry, result)
            });
            guard.0.push(handle.abort_handle());
            tasks.push(handle);
        }

        let mut nameservers = NameServerSet::new();
        let mut failures = 0usize;
        while let Some(joined) = tasks.next().await {
            match joined {
                Ok((entry, Ok(hosts))) => {
                    debug!("{entry} returned {} NS record(s) for {domain}", hosts.len());
                    nameservers.extend(hosts);
                }
                Ok((entry, Err(e))) => {
                    failures += 1;
                    if e.is_negative_answer() {
                        debug!("{entry} has no NS records for {domain}: {e}");
                    } else {
                        warn!("NS lookup for {domain} via {entry} failed: {e}");
                    }
                }
                Err(e) => {
                    failures += 1;
                    warn!("NS lookup task for {domain} did not complete: {e}");
                }
            }
        }

        debug!(
            "NS discovery for {domain}: {} unique name server(s), {failures}/{} resolver(s) failed",
            nameservers.len(),
            self.pool.len()
        );
        nameservers
    }
}

#[async_trait]
impl NameServerDiscovery for NsAggregator {
    async fn query_ns(&self, domain: &str) -> NameServerSet {
        NsAggregator::query_ns(self, domain).await
    }
}
