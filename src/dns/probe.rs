//! Direct NS probe.
//!
//! Sends one raw NS query, with EDNS and the RD and AD flags set, straight to
//! a chosen server and classifies the response code. SERVFAIL and REFUSED are
//! the lame-delegation signal.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RecordType};
use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use super::ede::extract_extended_errors;
use super::hostname::HostnameResolver;
use super::transport::{DnsTransport, UdpTransport};
use crate::config::{DEFAULT_PROBE_TARGET, DNS_PORT, EDNS_MAX_PAYLOAD};
use crate::error_handling::{CheckError, LookupError};
use crate::models::{ProbeResult, ResponseClass};

/// Server a probe is sent to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ProbeTarget {
    /// A literal address, queried directly
    Ip(IpAddr),
    /// A hostname, resolved through the fallback resolvers first
    Host(String),
}

impl Default for ProbeTarget {
    fn default() -> Self {
        ProbeTarget::Ip(IpAddr::V4(DEFAULT_PROBE_TARGET))
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeTarget::Ip(ip) => write!(f, "{ip}"),
            ProbeTarget::Host(host) => f.write_str(host),
        }
    }
}

/// Rejected `--probe-target` value.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("probe target must be an IP address or hostname, got {0:?}")]
pub struct InvalidProbeTarget(String);

impl FromStr for ProbeTarget {
    type Err = InvalidProbeTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(ProbeTarget::Ip(ip));
        }
        let host = s.trim_end_matches('.');
        if host.is_empty() || host.chars().any(char::is_whitespace) {
            return Err(InvalidProbeTarget(s.to_string()));
        }
        Ok(ProbeTarget::Host(host.to_ascii_lowercase()))
    }
}

/// Probes one server for a domain's NS record.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Queries `target` for the NS record of `domain`.
    ///
    /// Network failures are folded into the returned [`ProbeResult`]; only a
    /// query that cannot be built is an error.
    async fn probe(&self, domain: &str, target: &ProbeTarget) -> Result<ProbeResult, CheckError>;
}

/// [`Prober`] that speaks raw DNS over a [`DnsTransport`].
pub struct DirectProbe<T = UdpTransport> {
    transport: T,
    hostnames: Arc<dyn HostnameResolver>,
    timeout: Duration,
}

impl DirectProbe<UdpTransport> {
    /// Creates a probe that sends over UDP.
    pub fn new(hostnames: Arc<dyn HostnameResolver>, timeout: Duration) -> Self {
        Self::with_transport(UdpTransport, hostnames, timeout)
    }
}

impl<T: DnsTransport> DirectProbe<T> {
    /// Creates a probe over a custom transport.
    pub fn with_transport(
        transport: T,
        hostnames: Arc<dyn HostnameResolver>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            hostnames,
            timeout,
        }
    }

    /// Turns the target into an address; `None` when a hostname has no A record.
    async fn resolve_target(&self, target: &ProbeTarget) -> Option<IpAddr> {
        match target {
            ProbeTarget::Ip(ip) => Some(*ip),
            ProbeTarget::Host(host) => match self.hostnames.resolve_a(host).await {
                // several addresses: only the first is probed
                Ok(ips) => ips.first().copied().map(IpAddr::V4),
                Err(e) => {
                    debug!("Treating failed resolution of {host} as empty: {e}");
                    None
                }
            },
        }
    }
}

#[async_trait]
impl<T: DnsTransport> Prober for DirectProbe<T> {
    async fn probe(&self, domain: &str, target: &ProbeTarget) -> Result<ProbeResult, CheckError> {
        let name = Name::from_ascii(domain)
            .map_err(|e| CheckError::invalid(domain, e.to_string()))?;
        let query = build_ns_query(name, rand::random());
        let bytes = query
            .to_vec()
            .map_err(|e| CheckError::invalid(domain, format!("cannot encode query: {e}")))?;

        let Some(ip) = self.resolve_target(target).await else {
            warn!("NS target {target} for {domain} does not resolve to any address");
            return Ok(ProbeResult::unresolved());
        };
        let server = SocketAddr::new(ip, DNS_PORT);

        let reply = match self.transport.exchange(server, &bytes, self.timeout).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("No response from {target} ({ip}) for {domain}: {e}");
                return Ok(ProbeResult::silent(ip));
            }
        };

        match read_response(&reply, query.id()) {
            Ok(response) => {
                let result = classify_response(ip, &response);
                debug!(
                    "{target} ({ip}) answered {} for {domain}",
                    result.response_code
                );
                if let Some(text) = &result.extended_error_text {
                    warn!("{target} ({ip}) reported a network error for {domain}: {text}");
                }
                Ok(result)
            }
            Err(e) => {
                warn!("Unusable response from {target} ({ip}) for {domain}: {e}");
                Ok(ProbeResult::silent(ip))
            }
        }
    }
}

/// Builds an NS query with EDNS(0) and the RD and AD flags.
pub fn build_ns_query(name: Name, id: u16) -> Message {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .set_authentic_data(true);
    message.add_query(Query::query(name, RecordType::NS));

    let mut edns = Edns::new();
    edns.set_version(0);
    edns.set_max_payload(EDNS_MAX_PAYLOAD);
    message.set_edns(edns);
    message
}

/// Decodes a reply and checks it answers the query with `expected_id`.
pub fn read_response(bytes: &[u8], expected_id: u16) -> Result<Message, LookupError> {
    let response =
        Message::from_vec(bytes).map_err(|e| LookupError::Malformed(e.to_string()))?;
    if response.id() != expected_id {
        return Err(LookupError::Malformed(format!(
            "response id {} does not match query id {expected_id}",
            response.id()
        )));
    }
    if response.message_type() != MessageType::Response {
        return Err(LookupError::Malformed("reply is not a response".to_string()));
    }
    Ok(response)
}

/// Maps a decoded response onto a [`ProbeResult`].
pub fn classify_response(server: IpAddr, response: &Message) -> ProbeResult {
    let code = ResponseClass::from(response.response_code());
    let extended_errors = if code.is_error_signal() {
        extract_extended_errors(response)
    } else {
        Vec::new()
    };
    ProbeResult::answered(server, code, extended_errors)
}
