//! Verdict rendering.

use anyhow::Result;

use crate::config::OutputFormat;
use crate::error_handling::CheckError;
use crate::models::VerdictReport;

/// Renders one verdict for stdout.
///
/// Plain output lists the discovered NS set (or `NULL`) followed by the
/// verdict line; JSON output is a single line per domain.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub fn render_verdict(report: &VerdictReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(report)?),
        OutputFormat::Plain => {
            let mut out = format!(
                "{} NS Record Values:\n{}\n",
                report.domain, report.discovered_nameservers
            );
            if report.vulnerable {
                out.push_str(&format!("!!! {} is vulnerable.", report.domain));
                if let Some(reason) = &report.reason {
                    out.push_str(&format!(" ({reason})"));
                }
                if let Some(text) = &report.extended_error_text {
                    out.push_str(&format!("\n    {text}"));
                }
            } else {
                out.push_str(&format!("{} is not vulnerable.", report.domain));
            }
            Ok(out)
        }
    }
}

/// Renders a check that ended without a verdict.
pub fn render_failure(domain: &str, error: &CheckError, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::json!({
            "domain": domain,
            "error": error.to_string(),
        })
        .to_string(),
        OutputFormat::Plain => format!("??? {domain} could not be checked: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NameServerSet, ResponseClass, VulnerabilityReason};

    #[test]
    fn test_render_plain_not_vulnerable() {
        let report = VerdictReport::not_vulnerable(
            "example.com".into(),
            ["ns1.example.com", "ns2.example.com"].into_iter().collect(),
        );
        let out = render_verdict(&report, OutputFormat::Plain).unwrap();
        assert_eq!(
            out,
            "example.com NS Record Values:\n{ns1.example.com, ns2.example.com}\nexample.com is not vulnerable."
        );
    }

    #[test]
    fn test_render_plain_vulnerable_with_empty_set() {
        let report = VerdictReport::vulnerable(
            "example.com".into(),
            NameServerSet::new(),
            VulnerabilityReason::BaselineRcode {
                code: ResponseClass::ServFail,
            },
            Some("192.0.2.1:53 timed out".into()),
        );
        let out = render_verdict(&report, OutputFormat::Plain).unwrap();
        assert!(out.contains("\nNULL\n"));
        assert!(out.contains("!!! example.com is vulnerable. (baseline resolver answered SERVFAIL)"));
        assert!(out.ends_with("    192.0.2.1:53 timed out"));
    }

    #[test]
    fn test_render_json_is_single_line() {
        let report = VerdictReport::not_vulnerable("example.com".into(), NameServerSet::new());
        let out = render_verdict(&report, OutputFormat::Json).unwrap();
        assert!(!out.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["vulnerable"], false);
        assert_eq!(value["discovered_nameservers"], serde_json::json!([]));
    }

    #[test]
    fn test_render_failure() {
        let err = CheckError::invalid("bad..name", "domain has an empty label");
        assert_eq!(
            render_failure("bad..name", &err, OutputFormat::Plain),
            "??? bad..name could not be checked: invalid domain \"bad..name\": domain has an empty label"
        );
        let json: serde_json::Value =
            serde_json::from_str(&render_failure("bad..name", &err, OutputFormat::Json)).unwrap();
        assert_eq!(json["domain"], "bad..name");
    }
}
