//! Domain list loading.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::domain::parent_domain;

/// Reduces a list of subdomains to the set of their parent domains.
///
/// Blank lines and `#` comments are skipped. Parents are lower-cased and
/// de-duplicated; malformed names are kept so the check can report them.
pub fn parse_parent_domains(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| parent_domain(line).to_ascii_lowercase())
        .filter(|parent| !parent.is_empty())
        .collect()
}

/// Reads a subdomain list from `path` (`-` for stdin) and returns the parent domains.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub async fn read_parent_domains(path: &Path) -> Result<BTreeSet<String>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read domain list from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read domain list {}", path.display()))?
    };
    let parents = parse_parent_domains(&content);
    log::info!(
        "Loaded {} parent domain(s) from {}",
        parents.len(),
        path.display()
    );
    Ok(parents)
}
