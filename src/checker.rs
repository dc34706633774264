//! Vulnerability decision engine.
//!
//! Combines NS discovery with direct probes into a verdict:
//!
//! 1. Discover the NS set through the resolver pool (always reported).
//! 2. Probe the baseline resolver; a positive signal ends the check.
//! 3. Probe every discovered name server until one gives a positive signal.
//!
//! The baseline and per-nameserver stages read silence differently. A
//! baseline resolver that never answers counts as vulnerable, while a silent
//! name server only does under [`CheckPolicy::silent_nameserver_is_vulnerable`].
//! A hostname with no address counts as vulnerable at either stage, even
//! though for the baseline it may only mean the fallback resolvers were down.

use std::sync::Arc;

use log::{debug, info};

use crate::dns::{NameServerDiscovery, ProbeTarget, Prober};
use crate::domain::normalize_domain;
use crate::error_handling::CheckError;
use crate::models::{NameServerSet, ProbeResult, VerdictReport, VulnerabilityReason};

/// Knobs of the decision engine.
#[derive(Debug, Clone, Default)]
pub struct CheckPolicy {
    /// Server probed in stage 2
    pub baseline_target: ProbeTarget,
    /// Count a discovered name server that never answers as vulnerable
    pub silent_nameserver_is_vulnerable: bool,
}

/// Runs domain checks against a discovery source and a prober.
pub struct Checker {
    discovery: Arc<dyn NameServerDiscovery>,
    prober: Arc<dyn Prober>,
    policy: CheckPolicy,
}

impl Checker {
    /// Creates a checker from its discovery source, prober and policy.
    pub fn new(
        discovery: Arc<dyn NameServerDiscovery>,
        prober: Arc<dyn Prober>,
        policy: CheckPolicy,
    ) -> Self {
        Self {
            discovery,
            prober,
            policy,
        }
    }

    /// The policy this checker applies.
    pub fn policy(&self) -> &CheckPolicy {
        &self.policy
    }

    /// Checks one domain for a lame or dangling delegation.
    ///
    /// Nothing is cached between calls: each check runs its own discovery.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::InvalidInput` if `domain` is not a valid DNS name.
    /// Lookup and probe failures never surface as errors.
    pub async fn check(&self, domain: &str) -> Result<VerdictReport, CheckError> {
        let domain = normalize_domain(domain)?;

        let nameservers = self.discovery.query_ns(&domain).await;
        info!("{domain} NS records: {nameservers}");

        let baseline = self
            .prober
            .probe(&domain, &self.policy.baseline_target)
            .await?;
        if let Some(reason) = baseline_signal(&baseline) {
            info!("{domain} is vulnerable: {reason}");
            return Ok(vulnerable(domain, nameservers, reason, &baseline));
        }

        let mut positive = None;
        for nameserver in nameservers.iter() {
            let target = ProbeTarget::Host(nameserver.to_string());
            let result = self.prober.probe(&domain, &target).await?;
            if let Some(reason) = self.nameserver_signal(nameserver, &result) {
                positive = Some((reason, result));
                break;
            }
            debug!("{nameserver} answered {} for {domain}", result.response_code);
        }

        match positive {
            Some((reason, result)) => {
                info!("{domain} is vulnerable: {reason}");
                Ok(vulnerable(domain, nameservers, reason, &result))
            }
            None => Ok(VerdictReport::not_vulnerable(domain, nameservers)),
        }
    }

    fn nameserver_signal(
        &self,
        nameserver: &str,
        result: &ProbeResult,
    ) -> Option<VulnerabilityReason> {
        let nameserver = nameserver.to_string();
        if result.target_unresolved {
            return Some(VulnerabilityReason::NameServerUnresolvable { nameserver });
        }
        if !result.responded {
            return self
                .policy
                .silent_nameserver_is_vulnerable
                .then_some(VulnerabilityReason::NameServerSilent { nameserver });
        }
        result
            .response_code
            .is_error_signal()
            .then_some(VulnerabilityReason::NameServerRcode {
                nameserver,
                code: result.response_code,
            })
    }
}

fn baseline_signal(result: &ProbeResult) -> Option<VulnerabilityReason> {
    if result.target_unresolved {
        Some(VulnerabilityReason::BaselineUnresolvable)
    } else if !result.responded {
        Some(VulnerabilityReason::BaselineSilent)
    } else if result.response_code.is_error_signal() {
        Some(VulnerabilityReason::BaselineRcode {
            code: result.response_code,
        })
    } else {
        None
    }
}

fn vulnerable(
    domain: String,
    nameservers: NameServerSet,
    reason: VulnerabilityReason,
    result: &ProbeResult,
) -> VerdictReport {
    VerdictReport::vulnerable(
        domain,
        nameservers,
        reason,
        result.extended_error_text.clone(),
    )
}
