//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgGroup, Parser, ValueEnum};

use crate::config::constants::{DEFAULT_PROBE_TARGET_STR, DEFAULT_QUERY_TIMEOUT_MS};
use crate::dns::ProbeTarget;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Format of the verdicts printed to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report per domain
    Plain,
    /// One JSON object per domain (JSON Lines)
    Json,
}

/// When the process should exit with a non-zero status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    /// Always exit 0 once the batch completes
    Never,
    /// Exit 2 if any domain is vulnerable
    Vulnerable,
    /// Exit 2 if any domain is vulnerable, 3 if any check failed
    Any,
}

/// What the checker should run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInput {
    /// A single domain, checked as given
    Domain(String),
    /// A file of subdomains whose parent domains are checked (`-` for stdin)
    File(PathBuf),
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically, or built from parsed [`Opt`].
///
/// # Examples
///
/// ```no_run
/// use ns_checker::{CheckInput, Config};
///
/// let config = Config {
///     input: CheckInput::Domain("example.com".to_string()),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Domain or domain list to check
    pub input: CheckInput,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Verdict output format
    pub output: OutputFormat,

    /// Timeout for each individual DNS exchange
    pub query_timeout: Duration,

    /// Server queried by the baseline probe
    pub probe_target: ProbeTarget,

    /// Optional wall-clock limit for one domain check
    pub check_timeout: Option<Duration>,

    /// Treat a discovered name server that never answers as vulnerable
    pub silent_nameserver_vulnerable: bool,

    /// Exit-code policy
    pub fail_on: FailOn,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: CheckInput::File(PathBuf::from("domains.txt")),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            output: OutputFormat::Plain,
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
            probe_target: ProbeTarget::default(),
            check_timeout: None,
            silent_nameserver_vulnerable: false,
            fail_on: FailOn::Never,
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Check a single domain
/// ns_checker example.com
///
/// # Check the parent domains of every subdomain in a file
/// ns_checker -r subdomains.txt
///
/// # JSON output, fail the build when anything is vulnerable
/// ns_checker -r subdomains.txt --output json --fail-on vulnerable
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "ns_checker",
    version,
    about = "Detects lame or dangling NS delegations that allow subdomain takeover."
)]
#[command(group(ArgGroup::new("input").required(true).args(["domain", "read"])))]
pub struct Opt {
    /// Domain to check
    pub domain: Option<String>,

    /// File of subdomains; the parent domain of each line is checked ("-" reads stdin)
    #[arg(short = 'r', long = "read", value_name = "FILE")]
    pub read: Option<PathBuf>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Verdict output format: plain|json
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub output: OutputFormat,

    /// Timeout for each DNS query in milliseconds
    #[arg(long, default_value_t = DEFAULT_QUERY_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Server (IP or hostname) used for the baseline NS probe
    #[arg(long, default_value = DEFAULT_PROBE_TARGET_STR)]
    pub probe_target: ProbeTarget,

    /// Abandon a single domain check after this many seconds
    #[arg(long)]
    pub check_timeout_secs: Option<u64>,

    /// Treat discovered name servers that never answer as vulnerable
    #[arg(long)]
    pub silent_nameserver_vulnerable: bool,

    /// Exit-code policy: never|vulnerable|any
    #[arg(long, value_enum, default_value_t = FailOn::Never)]
    pub fail_on: FailOn,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        // clap's input group guarantees exactly one of the two is present
        let input = match (opt.read, opt.domain) {
            (Some(path), _) => CheckInput::File(path),
            (None, Some(domain)) => CheckInput::Domain(domain),
            (None, None) => CheckInput::File(PathBuf::from("-")),
        };
        Self {
            input,
            log_level: opt.log_level,
            log_format: opt.log_format,
            output: opt.output,
            query_timeout: Duration::from_millis(opt.timeout_ms),
            probe_target: opt.probe_target,
            check_timeout: opt.check_timeout_secs.map(Duration::from_secs),
            silent_nameserver_vulnerable: opt.silent_nameserver_vulnerable,
            fail_on: opt.fail_on,
        }
    }
}
