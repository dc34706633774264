//! Data model shared by discovery, probing and the decision engine.

use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;

use hickory_proto::op::ResponseCode;
use serde::Serialize;

use crate::dns::ExtendedDnsError;

/// De-duplicated set of name server hostnames for one domain.
///
/// Hostnames are lower-cased and stored without the trailing root dot, so the
/// same server reported by different resolvers collapses to one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameServerSet(BTreeSet<String>);

impl NameServerSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a hostname after normalisation. Returns `false` if it was
    /// already present or normalises to nothing.
    pub fn insert(&mut self, hostname: &str) -> bool {
        match normalize_hostname(hostname) {
            Some(host) => self.0.insert(host),
            None => false,
        }
    }

    /// Returns `true` if the normalised `hostname` is in the set.
    pub fn contains(&self, hostname: &str) -> bool {
        normalize_hostname(hostname).is_some_and(|host| self.0.contains(&host))
    }

    /// Number of distinct name servers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no resolver reported any name server.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates hostnames in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> Extend<S> for NameServerSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for host in iter {
            self.insert(host.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for NameServerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = NameServerSet::new();
        set.extend(iter);
        set
    }
}

impl fmt::Display for NameServerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NULL");
        }
        let joined = self.iter().collect::<Vec<_>>().join(", ");
        write!(f, "{{{joined}}}")
    }
}

fn normalize_hostname(hostname: &str) -> Option<String> {
    let host = hostname.trim().trim_end_matches('.');
    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}

/// Response code of a direct probe, reduced to what the verdict needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseClass {
    /// NOERROR
    NoError,
    /// SERVFAIL
    ServFail,
    /// REFUSED
    Refused,
    /// Any other code, or no code at all when nothing answered
    Other,
}

impl ResponseClass {
    /// SERVFAIL and REFUSED are the lame-delegation signal.
    pub fn is_error_signal(self) -> bool {
        matches!(self, ResponseClass::ServFail | ResponseClass::Refused)
    }
}

impl From<ResponseCode> for ResponseClass {
    fn from(code: ResponseCode) -> Self {
        match code {
            ResponseCode::NoError => ResponseClass::NoError,
            ResponseCode::ServFail => ResponseClass::ServFail,
            ResponseCode::Refused => ResponseClass::Refused,
            _ => ResponseClass::Other,
        }
    }
}

impl fmt::Display for ResponseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResponseClass::NoError => "NOERROR",
            ResponseClass::ServFail => "SERVFAIL",
            ResponseClass::Refused => "REFUSED",
            ResponseClass::Other => "OTHER",
        })
    }
}

/// Result of one direct NS probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    /// A well-formed response came back before the timeout
    pub responded: bool,
    /// Response code of the reply, `Other` when there was none
    pub response_code: ResponseClass,
    /// Text of a network-error Extended DNS Error, when the server sent one
    pub extended_error_text: Option<String>,
    /// Every Extended DNS Error option found in the response
    pub extended_errors: Vec<ExtendedDnsError>,
    /// Address the query was sent to
    pub server: Option<IpAddr>,
    /// The target was a hostname that resolved to no address
    pub target_unresolved: bool,
}

impl ProbeResult {
    /// The target hostname could not be turned into an address.
    pub fn unresolved() -> Self {
        Self {
            responded: false,
            response_code: ResponseClass::Other,
            extended_error_text: None,
            extended_errors: Vec::new(),
            server: None,
            target_unresolved: true,
        }
    }

    /// The query was sent but nothing usable came back.
    pub fn silent(server: IpAddr) -> Self {
        Self {
            responded: false,
            response_code: ResponseClass::Other,
            extended_error_text: None,
            extended_errors: Vec::new(),
            server: Some(server),
            target_unresolved: false,
        }
    }

    /// The server answered with `response_code`.
    pub fn answered(
        server: IpAddr,
        response_code: ResponseClass,
        extended_errors: Vec<ExtendedDnsError>,
    ) -> Self {
        let extended_error_text = extended_errors
            .iter()
            .find(|ede| ede.is_network_error())
            .and_then(|ede| ede.text.clone());
        Self {
            responded: true,
            response_code,
            extended_error_text,
            extended_errors,
            server: Some(server),
            target_unresolved: false,
        }
    }
}

/// Which signal made a domain vulnerable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VulnerabilityReason {
    /// The baseline resolver answered SERVFAIL or REFUSED
    BaselineRcode { code: ResponseClass },
    /// The baseline resolver never answered
    BaselineSilent,
    /// The baseline target hostname resolved to no address
    BaselineUnresolvable,
    /// A discovered name server answered SERVFAIL or REFUSED
    NameServerRcode { nameserver: String, code: ResponseClass },
    /// A discovered name server hostname resolved to no address
    NameServerUnresolvable { nameserver: String },
    /// A discovered name server never answered
    NameServerSilent { nameserver: String },
}

impl fmt::Display for VulnerabilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VulnerabilityReason::BaselineRcode { code } => {
                write!(f, "baseline resolver answered {code}")
            }
            VulnerabilityReason::BaselineSilent => f.write_str("baseline resolver did not answer"),
            VulnerabilityReason::BaselineUnresolvable => {
                f.write_str("baseline target has no address")
            }
            VulnerabilityReason::NameServerRcode { nameserver, code } => {
                write!(f, "name server {nameserver} answered {code}")
            }
            VulnerabilityReason::NameServerUnresolvable { nameserver } => {
                write!(f, "name server {nameserver} has no address")
            }
            VulnerabilityReason::NameServerSilent { nameserver } => {
                write!(f, "name server {nameserver} did not answer")
            }
        }
    }
}

/// Verdict for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerdictReport {
    /// Normalised domain that was checked
    pub domain: String,
    /// Always present, possibly empty
    pub discovered_nameservers: NameServerSet,
    /// Whether any stage produced a positive signal
    pub vulnerable: bool,
    /// The first positive signal, when vulnerable
    pub reason: Option<VulnerabilityReason>,
    /// Network-error EDE text seen on the probe that decided the verdict
    pub extended_error_text: Option<String>,
}

impl VerdictReport {
    /// Builds the report for a domain that passed every stage.
    pub fn not_vulnerable(domain: String, discovered_nameservers: NameServerSet) -> Self {
        Self {
            domain,
            discovered_nameservers,
            vulnerable: false,
            reason: None,
            extended_error_text: None,
        }
    }

    /// Builds the report for a domain with a positive signal.
    pub fn vulnerable(
        domain: String,
        discovered_nameservers: NameServerSet,
        reason: VulnerabilityReason,
        extended_error_text: Option<String>,
    ) -> Self {
        Self {
            domain,
            discovered_nameservers,
            vulnerable: true,
            reason: Some(reason),
            extended_error_text,
        }
    }
}
