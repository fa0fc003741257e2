//! Input validation utilities

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::constants::{FALLBACK_USERNAME_DIGITS, MAX_PULL_REQUEST_URL_LENGTH};

static PULL_REQUEST_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://github\.com/[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+/pull/[0-9]+/?$").unwrap()
});

/// Validate that a URL points at a GitHub pull request
pub fn validate_pull_request_url(url: &str) -> Result<(), &'static str> {
    let url = url.trim();
    if url.is_empty() {
        return Err("Pull request URL is required");
    }
    if url.len() as u64 > MAX_PULL_REQUEST_URL_LENGTH {
        return Err("Pull request URL is too long");
    }
    if !PULL_REQUEST_URL.is_match(url) {
        return Err("Must be a GitHub pull request URL");
    }
    Ok(())
}

/// Username for a first sign-in: the display name lower-cased with all
/// whitespace removed, or `user` followed by the trailing digits of the
/// current epoch milliseconds when there is no usable display name.
pub fn synthesize_username(display_name: Option<&str>, now: DateTime<Utc>) -> String {
    let from_name: String = display_name
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    if !from_name.is_empty() {
        return from_name;
    }

    let millis = now.timestamp_millis().unsigned_abs().to_string();
    let tail = &millis[millis.len().saturating_sub(FALLBACK_USERNAME_DIGITS)..];
    format!("user{tail}")
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}
