//! DNS component initialization.
//!
//! Wires the production lookup components into a [`Checker`] using the
//! configured timeouts and baseline target.

use std::sync::Arc;
use std::time::Duration;

use crate::checker::{CheckPolicy, Checker};
use crate::config::{resolver_pool, Config};
use crate::dns::{DirectProbe, FallbackHostnameResolver, HostnameResolver, NsAggregator, PoolNsLookup};

/// Initializes the hostname resolver used to address discovered name servers.
pub fn init_hostname_resolver(timeout: Duration) -> Arc<dyn HostnameResolver> {
    Arc::new(FallbackHostnameResolver::new(timeout))
}

/// Initializes NS discovery over the full resolver pool.
///
/// Each pool query gets its own uncached, single-attempt resolver bounded by
/// `timeout`.
pub fn init_ns_aggregator(timeout: Duration) -> Arc<NsAggregator> {
    Arc::new(NsAggregator::new(
        resolver_pool(),
        Arc::new(PoolNsLookup::new(timeout)),
    ))
}

/// Builds the production decision engine from `config`.
pub fn init_checker(config: &Config) -> Checker {
    let hostnames = init_hostname_resolver(config.query_timeout);
    let prober = Arc::new(DirectProbe::new(hostnames, config.query_timeout));
    let policy = CheckPolicy {
        baseline_target: config.probe_target.clone(),
        silent_nameserver_is_vulnerable: config.silent_nameserver_vulnerable,
    };
    Checker::new(init_ns_aggregator(config.query_timeout), prober, policy)
}
