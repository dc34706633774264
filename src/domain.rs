use std::sync::LazyLock;

use regex::Regex;

use crate::error_handling::CheckError;

/// Maximum length of a domain name in presentation form, without the root dot.
const MAX_DOMAIN_LEN: usize = 253;
/// Maximum length of one label.
const MAX_LABEL_LEN: usize = 63;

// Letters, digits, hyphens inside, underscores allowed for service labels
static LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9_](?:[a-z0-9_-]*[a-z0-9_])?$").expect("label pattern is valid")
});

/// Validates a domain and returns it lower-cased without the trailing root dot.
///
/// # Errors
///
/// Returns `CheckError::InvalidInput` if the name is empty, too long, or has
/// an empty or malformed label.
pub fn normalize_domain(input: &str) -> Result<String, CheckError> {
    let domain = input.trim().trim_end_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return Err(CheckError::invalid(input, "domain is empty"));
    }
    if domain.len() > MAX_DOMAIN_LEN {
        return Err(CheckError::invalid(
            input,
            format!("domain is longer than {MAX_DOMAIN_LEN} characters"),
        ));
    }
    for label in domain.split('.') {
        if label.is_empty() {
            return Err(CheckError::invalid(input, "domain has an empty label"));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(CheckError::invalid(
                input,
                format!("label {label:?} is longer than {MAX_LABEL_LEN} characters"),
            ));
        }
        if !LABEL_PATTERN.is_match(label) {
            return Err(CheckError::invalid(
                input,
                format!("label {label:?} contains invalid characters"),
            ));
        }
    }
    Ok(domain)
}

/// Returns the parent of a name by dropping its leftmost label.
///
/// A single-label name is its own parent. Leading/trailing whitespace and the
/// root dot are ignored.
pub fn parent_domain(name: &str) -> String {
    let name = name.trim().trim_end_matches('.');
    match name.split_once('.') {
        Some((_, parent)) if !parent.is_empty() => parent.to_string(),
        _ => name.to_string(),
    }
}
