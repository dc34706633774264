//! Error type definitions.
//!
//! This module defines the error taxonomy of the checker and the outcome
//! categories counted over a batch.

use std::time::Duration;

use hickory_proto::op::ResponseCode;
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// A single lookup or exchange that failed.
///
/// Always recovered locally: the aggregate it belongs to treats it as an
/// empty result. Never aborts a check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The server answered but had no records of the requested type.
    #[error("no answer for the requested record type")]
    NoAnswer,

    /// The queried name does not exist.
    #[error("name does not exist (NXDOMAIN)")]
    NxDomain,

    /// The server answered with an error code such as SERVFAIL or REFUSED.
    #[error("server answered {0}")]
    ErrorResponse(ResponseCode),

    /// No configured server could be used to answer.
    #[error("no working name server available")]
    NoNameservers,

    /// No response before the query timeout.
    #[error("query timed out")]
    Timeout,

    /// Socket-level failure (bind, send, receive).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response could not be decoded or did not match the query.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Any other resolver failure.
    #[error("lookup failed: {0}")]
    Other(String),
}

impl LookupError {
    /// Returns `true` for the "empty but valid" outcomes (NXDOMAIN, no answer).
    pub fn is_negative_answer(&self) -> bool {
        matches!(self, LookupError::NoAnswer | LookupError::NxDomain)
    }
}

impl From<ResolveError> for LookupError {
    fn from(e: ResolveError) -> Self {
        match e.kind() {
            ResolveErrorKind::NoRecordsFound { response_code, .. }
                if *response_code == ResponseCode::NXDomain =>
            {
                LookupError::NxDomain
            }
            ResolveErrorKind::NoRecordsFound { response_code, .. }
                if *response_code == ResponseCode::NoError =>
            {
                LookupError::NoAnswer
            }
            ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                LookupError::ErrorResponse(*response_code)
            }
            ResolveErrorKind::NoConnections => LookupError::NoNameservers,
            ResolveErrorKind::Timeout => LookupError::Timeout,
            ResolveErrorKind::Io(io) => LookupError::Transport(io.to_string()),
            _ => LookupError::Other(e.to_string()),
        }
    }
}

/// Errors that end a domain check without a verdict.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// The domain cannot be turned into a DNS query.
    #[error("invalid domain {domain:?}: {reason}")]
    InvalidInput {
        /// The rejected input
        domain: String,
        /// Why it was rejected
        reason: String,
    },

    /// The per-domain deadline expired before a verdict was reached.
    #[error("check for {domain} did not finish within {}s", timeout.as_secs_f64())]
    DeadlineExceeded {
        /// Domain under test
        domain: String,
        /// Configured deadline
        timeout: Duration,
    },
}

impl CheckError {
    /// Builds an [`CheckError::InvalidInput`].
    pub fn invalid(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        CheckError::InvalidInput {
            domain: domain.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of one domain in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum CheckOutcome {
    /// Verdict reached: vulnerable
    Vulnerable,
    /// Verdict reached: not vulnerable
    NotVulnerable,
    /// No resolver in the pool returned any NS record
    EmptyNameServerSet,
    /// Rejected before any query was sent
    InvalidInput,
    /// Per-domain deadline expired
    DeadlineExceeded,
}

impl CheckOutcome {
    /// Human-readable label for statistics output.
    pub fn label(self) -> &'static str {
        match self {
            CheckOutcome::Vulnerable => "vulnerable",
            CheckOutcome::NotVulnerable => "not vulnerable",
            CheckOutcome::EmptyNameServerSet => "empty NS set",
            CheckOutcome::InvalidInput => "invalid input",
            CheckOutcome::DeadlineExceeded => "deadline exceeded",
        }
    }
}

impl From<&CheckError> for CheckOutcome {
    fn from(e: &CheckError) -> Self {
        match e {
            CheckError::InvalidInput { .. } => CheckOutcome::InvalidInput,
            CheckError::DeadlineExceeded { .. } => CheckOutcome::DeadlineExceeded,
        }
    }
}
