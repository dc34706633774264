//! Extended DNS Errors (RFC 8914).
//!
//! EDE is carried as EDNS option 15: a 16-bit INFO-CODE followed by optional
//! UTF-8 EXTRA-TEXT. The resolver stack does not model the option, so it is
//! decoded here from the raw option payload.

use std::fmt;

use hickory_proto::op::Message;
use hickory_proto::rr::rdata::opt::{EdnsCode, EdnsOption};
use serde::Serialize;

use crate::error_handling::LookupError;

/// EDNS option code assigned to Extended DNS Errors.
pub const EDE_OPTION_CODE: u16 = 15;

/// INFO-CODE values registered in RFC 8914 §4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u16")]
pub enum EdeInfoCode {
    /// 0: none of the other codes apply
    OtherError,
    /// 1
    UnsupportedDnskeyAlgorithm,
    /// 2
    UnsupportedDsDigestType,
    /// 3: answered from stale cache data
    StaleAnswer,
    /// 4
    ForgedAnswer,
    /// 5
    DnssecIndeterminate,
    /// 6: DNSSEC validation failed
    DnssecBogus,
    /// 7
    SignatureExpired,
    /// 8
    SignatureNotYetValid,
    /// 9
    DnskeyMissing,
    /// 10
    RrsigsMissing,
    /// 11
    NoZoneKeyBitSet,
    /// 12
    NsecMissing,
    /// 13: a cached SERVFAIL or similar was returned
    CachedError,
    /// 14
    NotReady,
    /// 15: blocked by the operator's policy
    Blocked,
    /// 16
    Censored,
    /// 17
    Filtered,
    /// 18: the client is not allowed to query this server
    Prohibited,
    /// 19
    StaleNxdomainAnswer,
    /// 20: the server is not authoritative and does not recurse
    NotAuthoritative,
    /// 21
    NotSupported,
    /// 22: no authoritative server could be reached
    NoReachableAuthority,
    /// 23: an upstream server failed at the network level
    NetworkError,
    /// 24
    InvalidData,
    /// Any code not listed above
    Unknown(u16),
}

impl From<u16> for EdeInfoCode {
    fn from(code: u16) -> Self {
        match code {
            0 => EdeInfoCode::OtherError,
            1 => EdeInfoCode::UnsupportedDnskeyAlgorithm,
            2 => EdeInfoCode::UnsupportedDsDigestType,
            3 => EdeInfoCode::StaleAnswer,
            4 => EdeInfoCode::ForgedAnswer,
            5 => EdeInfoCode::DnssecIndeterminate,
            6 => EdeInfoCode::DnssecBogus,
            7 => EdeInfoCode::SignatureExpired,
            8 => EdeInfoCode::SignatureNotYetValid,
            9 => EdeInfoCode::DnskeyMissing,
            10 => EdeInfoCode::RrsigsMissing,
            11 => EdeInfoCode::NoZoneKeyBitSet,
            12 => EdeInfoCode::NsecMissing,
            13 => EdeInfoCode::CachedError,
            14 => EdeInfoCode::NotReady,
            15 => EdeInfoCode::Blocked,
            16 => EdeInfoCode::Censored,
            17 => EdeInfoCode::Filtered,
            18 => EdeInfoCode::Prohibited,
            19 => EdeInfoCode::StaleNxdomainAnswer,
            20 => EdeInfoCode::NotAuthoritative,
            21 => EdeInfoCode::NotSupported,
            22 => EdeInfoCode::NoReachableAuthority,
            23 => EdeInfoCode::NetworkError,
            24 => EdeInfoCode::InvalidData,
            other => EdeInfoCode::Unknown(other),
        }
    }
}

impl From<EdeInfoCode> for u16 {
    fn from(code: EdeInfoCode) -> Self {
        match code {
            EdeInfoCode::OtherError => 0,
            EdeInfoCode::UnsupportedDnskeyAlgorithm => 1,
            EdeInfoCode::UnsupportedDsDigestType => 2,
            EdeInfoCode::StaleAnswer => 3,
            EdeInfoCode::ForgedAnswer => 4,
            EdeInfoCode::DnssecIndeterminate => 5,
            EdeInfoCode::DnssecBogus => 6,
            EdeInfoCode::SignatureExpired => 7,
            EdeInfoCode::SignatureNotYetValid => 8,
            EdeInfoCode::DnskeyMissing => 9,
            EdeInfoCode::RrsigsMissing => 10,
            EdeInfoCode::NoZoneKeyBitSet => 11,
            EdeInfoCode::NsecMissing => 12,
            EdeInfoCode::CachedError => 13,
            EdeInfoCode::NotReady => 14,
            EdeInfoCode::Blocked => 15,
            EdeInfoCode::Censored => 16,
            EdeInfoCode::Filtered => 17,
            EdeInfoCode::Prohibited => 18,
            EdeInfoCode::StaleNxdomainAnswer => 19,
            EdeInfoCode::NotAuthoritative => 20,
            EdeInfoCode::NotSupported => 21,
            EdeInfoCode::NoReachableAuthority => 22,
            EdeInfoCode::NetworkError => 23,
            EdeInfoCode::InvalidData => 24,
            EdeInfoCode::Unknown(other) => other,
        }
    }
}

/// One decoded Extended DNS Error option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendedDnsError {
    /// INFO-CODE field
    pub info_code: EdeInfoCode,
    /// EXTRA-TEXT field, when present and non-empty
    pub text: Option<String>,
}

impl ExtendedDnsError {
    /// Creates an error with the given code and optional text.
    pub fn new(info_code: EdeInfoCode, text: Option<String>) -> Self {
        Self { info_code, text }
    }

    /// Decodes the option payload (without the option code/length header).
    ///
    /// Invalid UTF-8 in EXTRA-TEXT is replaced rather than rejected; a
    /// payload shorter than the INFO-CODE is malformed.
    pub fn decode(data: &[u8]) -> Result<Self, LookupError> {
        let (code, text) = match data {
            [hi, lo, rest @ ..] => (u16::from_be_bytes([*hi, *lo]), rest),
            _ => {
                return Err(LookupError::Malformed(format!(
                    "EDE option too short ({} bytes)",
                    data.len()
                )))
            }
        };
        // some servers NUL-terminate EXTRA-TEXT
        let text = String::from_utf8_lossy(text)
            .trim_end_matches('\0')
            .to_string();
        Ok(Self {
            info_code: EdeInfoCode::from(code),
            text: (!text.is_empty()).then_some(text),
        })
    }

    /// Encodes the option payload.
    pub fn encode(&self) -> Vec<u8> {
        let mut data = u16::from(self.info_code).to_be_bytes().to_vec();
        if let Some(text) = &self.text {
            data.extend_from_slice(text.as_bytes());
        }
        data
    }

    /// Returns `true` for INFO-CODE 23 (Network Error).
    pub fn is_network_error(&self) -> bool {
        self.info_code == EdeInfoCode::NetworkError
    }
}

impl fmt::Display for ExtendedDnsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = u16::from(self.info_code);
        match &self.text {
            Some(text) => write!(f, "EDE {code} ({:?}): {text}", self.info_code),
            None => write!(f, "EDE {code} ({:?})", self.info_code),
        }
    }
}

/// Collects the Extended DNS Errors carried by a response.
///
/// A malformed option is logged and skipped; it never fails the probe.
pub fn extract_extended_errors(message: &Message) -> Vec<ExtendedDnsError> {
    let Some(edns) = message.extensions().as_ref() else {
        return Vec::new();
    };
    let mut errors = Vec::new();
    if let Some(EdnsOption::Unknown(_, data)) = edns.option(EdnsCode::from(EDE_OPTION_CODE)) {
        match ExtendedDnsError::decode(data) {
            Ok(ede) => errors.push(ede),
            Err(e) => log::debug!("Ignoring unreadable EDE option: {e}"),
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::op::Edns;

    #[test]
    fn test_decode_with_text() {
        let mut data = vec![0x00, 0x17];
        data.extend_from_slice(b"1.2.3.4:53 timed out");
        let ede = ExtendedDnsError::decode(&data).unwrap();
        assert_eq!(ede.info_code, EdeInfoCode::NetworkError);
        assert_eq!(ede.text.as_deref(), Some("1.2.3.4:53 timed out"));
        assert!(ede.is_network_error());
    }

    #[test]
    fn test_decode_without_text() {
        let ede = ExtendedDnsError::decode(&[0x00, 0x16]).unwrap();
        assert_eq!(ede.info_code, EdeInfoCode::NoReachableAuthority);
        assert!(ede.text.is_none());
        assert!(!ede.is_network_error());
    }

    #[test]
    fn test_decode_strips_nul_terminator() {
        let ede = ExtendedDnsError::decode(b"\x00\x14lame\0").unwrap();
        assert_eq!(ede.info_code, EdeInfoCode::NotAuthoritative);
        assert_eq!(ede.text.as_deref(), Some("lame"));
    }

    #[test]
    fn test_decode_rejects_short_payload() {
        assert!(matches!(
            ExtendedDnsError::decode(&[0x17]),
            Err(LookupError::Malformed(_))
        ));
    }

    #[test]
    fn test_unknown_info_code_is_preserved() {
        let ede = ExtendedDnsError::decode(&[0x01, 0x00]).unwrap();
        assert_eq!(ede.info_code, EdeInfoCode::Unknown(256));
        assert_eq!(u16::from(ede.info_code), 256);
    }

    #[test]
    fn test_extract_from_message() {
        let ede = ExtendedDnsError::new(EdeInfoCode::NetworkError, Some("upstream refused".into()));
        let mut edns = Edns::new();
        edns.options_mut()
            .insert(EdnsOption::Unknown(EDE_OPTION_CODE, ede.encode()));
        let mut message = Message::new();
        message.set_edns(edns);

        assert_eq!(extract_extended_errors(&message), vec![ede]);
    }

    #[test]
    fn test_extract_without_edns() {
        assert!(extract_extended_errors(&Message::new()).is_empty());
    }

    #[test]
    fn test_display() {
        let ede = ExtendedDnsError::new(EdeInfoCode::NetworkError, Some("boom".into()));
        assert_eq!(ede.to_string(), "EDE 23 (NetworkError): boom");
    }
}
