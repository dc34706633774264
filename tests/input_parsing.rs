//! Batch driver tests: domain list loading and output.

mod helpers;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use helpers::{answered, checker, FixedDiscovery, ScriptedProber};
use ns_checker::dns::NameServerDiscovery;
use ns_checker::{
    read_parent_domains, run_check_with, CheckInput, CheckPolicy, Checker, Config, FailOn,
    NameServerSet, OutputFormat, ResponseClass,
};
use tempfile::NamedTempFile;

fn domain_file(lines: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(lines.as_bytes())
        .expect("Failed to write temp file");
    file
}

#[tokio::test]
async fn test_read_parent_domains_from_file() {
    let file = domain_file("www.example.com\napi.example.com\n\n# comment\ncdn.example.org\n");
    let parents = read_parent_domains(file.path()).await.unwrap();
    let parents: Vec<String> = parents.into_iter().collect();
    assert_eq!(parents, vec!["example.com", "example.org"]);
}

#[tokio::test]
async fn test_read_parent_domains_missing_file() {
    let result = read_parent_domains(std::path::Path::new("/nonexistent/domains.txt")).await;
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read domain list"));
}

#[tokio::test]
async fn test_batch_plain_output() {
    let file = domain_file("www.example.com\nmail.example.com\nwww.example.org\n");
    let prober = Arc::new(ScriptedProber::new());
    let checker = checker(
        Arc::new(FixedDiscovery::new(&["ns1.example.net"])),
        prober.clone(),
    );
    let config = Config {
        input: CheckInput::File(file.path().to_path_buf()),
        ..Default::default()
    };

    let mut out = Vec::new();
    let report = run_check_with(&checker, &config, &mut out).await.unwrap();
    let out = String::from_utf8(out).unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.not_vulnerable, 2);
    assert_eq!(report.exit_code(FailOn::Any), 0);
    assert_eq!(
        out,
        "example.com NS Record Values:\n{ns1.example.net}\nexample.com is not vulnerable.\n\
         --------------------------------------\n\
         example.org NS Record Values:\n{ns1.example.net}\nexample.org is not vulnerable.\n"
    );
}

#[tokio::test]
async fn test_batch_json_output_and_failures() {
    let file = domain_file("www.example.com\nbad..entry.example.com\n");
    let prober = Arc::new(ScriptedProber::new().on("8.8.8.8", answered(ResponseClass::Refused)));
    let checker = checker(Arc::new(FixedDiscovery::new(&[])), prober);
    let config = Config {
        input: CheckInput::File(file.path().to_path_buf()),
        output: OutputFormat::Json,
        ..Default::default()
    };

    let mut out = Vec::new();
    let report = run_check_with(&checker, &config, &mut out).await.unwrap();
    let out = String::from_utf8(out).unwrap();
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is JSON"))
        .collect();

    assert_eq!(report.total, 2);
    assert_eq!(report.vulnerable, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.exit_code(FailOn::Vulnerable), 2);
    assert_eq!(lines.len(), 2);
    let failure = lines
        .iter()
        .find(|v| v.get("error").is_some())
        .expect("invalid entry reported");
    assert!(failure["error"].as_str().unwrap().contains("invalid domain"));
    let verdict = lines
        .iter()
        .find(|v| v["domain"] == "example.com")
        .expect("example.com checked");
    assert_eq!(verdict["vulnerable"], true);
}

#[tokio::test]
async fn test_single_domain_is_checked_as_given() {
    let prober = Arc::new(ScriptedProber::new());
    let checker = checker(Arc::new(FixedDiscovery::new(&[])), prober);
    let config = Config {
        input: CheckInput::Domain("www.example.com".into()),
        ..Default::default()
    };

    let mut out = Vec::new();
    let report = run_check_with(&checker, &config, &mut out).await.unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.verdicts[0].domain, "www.example.com");
}

/// Discovery that never finishes.
struct HangingDiscovery;

#[async_trait]
impl NameServerDiscovery for HangingDiscovery {
    async fn query_ns(&self, _domain: &str) -> NameServerSet {
        std::future::pending::<()>().await;
        NameServerSet::new()
    }
}

#[tokio::test]
async fn test_check_deadline() {
    let checker = Checker::new(
        Arc::new(HangingDiscovery),
        Arc::new(ScriptedProber::new()),
        CheckPolicy::default(),
    );
    let config = Config {
        input: CheckInput::Domain("example.com".into()),
        check_timeout: Some(Duration::from_millis(50)),
        ..Default::default()
    };

    let mut out = Vec::new();
    let report = run_check_with(&checker, &config, &mut out).await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.exit_code(FailOn::Any), 3);
    assert!(String::from_utf8(out).unwrap().contains("did not finish within"));
}
