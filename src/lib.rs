//! ns_checker library: lame and dangling NS delegation detection
//!
//! A delegation is lame when a domain's NS records point at servers that no
//! longer answer for the zone, which is a common subdomain-takeover
//! precursor. For each domain the checker:
//!
//! 1. asks a fixed pool of ~30 public resolvers for the NS set, concurrently;
//! 2. sends a raw NS query to a baseline resolver;
//! 3. sends the same query to every discovered name server;
//!
//! and reports the domain as vulnerable on the first SERVFAIL/REFUSED (or
//! otherwise broken) answer.
//!
//! # Example
//!
//! ```no_run
//! use ns_checker::{init_checker, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let checker = init_checker(&Config::default());
//! let report = checker.check("example.com").await?;
//! println!("{} vulnerable: {}", report.domain, report.vulnerable);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod app;
mod checker;
pub mod config;
pub mod dns;
mod domain;
mod error_handling;
pub mod initialization;
mod models;

// Re-export public API
pub use app::{parse_parent_domains, read_parent_domains};
pub use checker::{CheckPolicy, Checker};
pub use config::{CheckInput, Config, FailOn, LogFormat, LogLevel, Opt, OutputFormat};
pub use domain::{normalize_domain, parent_domain};
pub use error_handling::{CheckError, CheckOutcome, CheckStats, LookupError};
pub use initialization::init_checker;
pub use models::{NameServerSet, ProbeResult, ResponseClass, VerdictReport, VulnerabilityReason};
pub use run::{run_check, run_check_with, CheckRunReport};

// Internal run module (contains the batch driver)
mod run {
    use std::collections::BTreeSet;
    use std::io::Write;
    use std::time::Instant;

    use anyhow::{Context, Result};
    use log::{info, warn};

    use crate::app::{print_check_statistics, read_parent_domains, render_failure, render_verdict};
    use crate::checker::Checker;
    use crate::config::{CheckInput, Config, FailOn, OutputFormat, REPORT_SEPARATOR};
    use crate::error_handling::{CheckError, CheckOutcome, CheckStats};
    use crate::initialization::init_checker;
    use crate::models::VerdictReport;

    /// Results of a batch run.
    #[derive(Debug, Clone)]
    pub struct CheckRunReport {
        /// Number of domains attempted
        pub total: usize,
        /// Domains found vulnerable
        pub vulnerable: usize,
        /// Domains found not vulnerable
        pub not_vulnerable: usize,
        /// Domains that ended without a verdict
        pub failed: usize,
        /// Every verdict reached, in check order
        pub verdicts: Vec<VerdictReport>,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    impl CheckRunReport {
        /// Process exit code under the given policy.
        ///
        /// `0` when the policy is satisfied, `2` when a vulnerable domain was
        /// found, `3` when (under [`FailOn::Any`]) a domain could not be checked.
        pub fn exit_code(&self, fail_on: FailOn) -> i32 {
            match fail_on {
                FailOn::Never => 0,
                FailOn::Vulnerable if self.vulnerable > 0 => 2,
                FailOn::Vulnerable => 0,
                FailOn::Any if self.vulnerable > 0 => 2,
                FailOn::Any if self.failed > 0 => 3,
                FailOn::Any => 0,
            }
        }
    }

    /// Runs the checks described by `config` with the production DNS stack,
    /// printing verdicts to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain list cannot be read or stdout cannot be
    /// written. Individual domain failures are reported and counted instead.
    pub async fn run_check(config: Config) -> Result<CheckRunReport> {
        let checker = init_checker(&config);
        let mut out = std::io::stdout();
        run_check_with(&checker, &config, &mut out).await
    }

    /// Runs the checks described by `config` with the given checker, writing
    /// verdicts to `out`.
    ///
    /// A single domain is checked as given; a file is reduced to the parent
    /// domain of each line first. Domains are checked one after another.
    pub async fn run_check_with<W: Write>(
        checker: &Checker,
        config: &Config,
        out: &mut W,
    ) -> Result<CheckRunReport> {
        let start_time = Instant::now();
        let domains: BTreeSet<String> = match &config.input {
            CheckInput::Domain(domain) => BTreeSet::from([domain.trim().to_string()]),
            CheckInput::File(path) => read_parent_domains(path).await?,
        };

        let stats = CheckStats::new();
        let mut verdicts = Vec::with_capacity(domains.len());
        for (i, domain) in domains.iter().enumerate() {
            if i > 0 && config.output == OutputFormat::Plain {
                writeln!(out, "{REPORT_SEPARATOR}").context("Failed to write output")?;
            }

            let line = match check_one(checker, config, domain).await {
                Ok(report) => {
                    stats.record(if report.vulnerable {
                        CheckOutcome::Vulnerable
                    } else {
                        CheckOutcome::NotVulnerable
                    });
                    if report.discovered_nameservers.is_empty() {
                        stats.record(CheckOutcome::EmptyNameServerSet);
                    }
                    let line = render_verdict(&report, config.output)?;
                    verdicts.push(report);
                    line
                }
                Err(e) => {
                    warn!("Skipping {domain}: {e}");
                    stats.record(CheckOutcome::from(&e));
                    render_failure(domain, &e, config.output)
                }
            };
            writeln!(out, "{line}").context("Failed to write output")?;
        }
        out.flush().context("Failed to flush output")?;

        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        print_check_statistics(&stats, elapsed_seconds);

        let report = CheckRunReport {
            total: domains.len(),
            vulnerable: stats.count(CheckOutcome::Vulnerable),
            not_vulnerable: stats.count(CheckOutcome::NotVulnerable),
            failed: stats.total_failures(),
            verdicts,
            elapsed_seconds,
        };
        info!(
            "Run complete: {} vulnerable out of {} domain(s)",
            report.vulnerable, report.total
        );
        Ok(report)
    }

    async fn check_one(
        checker: &Checker,
        config: &Config,
        domain: &str,
    ) -> Result<VerdictReport, CheckError> {
        match config.check_timeout {
            Some(timeout) => tokio::time::timeout(timeout, checker.check(domain))
                .await
                .map_err(|_| CheckError::DeadlineExceeded {
                    domain: domain.to_string(),
                    timeout,
                })?,
            None => checker.check(domain).await,
        }
    }

}
