//! Format predicates shared by every widget. All of them are total: any
//! input, including the empty string, yields a plain `bool`.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9._%+\-]+@[a-z0-9](?:[a-z0-9\-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9\-]*[a-z0-9])?)*\.[a-z]{2,}$")
        .expect("email pattern")
});

// 3-3-4 grouping, optional parentheses around the area code, optional
// `-`, `.` or space separators and an optional +1 country prefix.
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+?1[\s.\-]?)?(?:\(\d{3}\)|\d{3})[\s.\-]?\d{3}[\s.\-]?\d{4}$")
        .expect("phone pattern")
});

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z][a-z0-9+.\-]*://").expect("scheme pattern"));

static HOST_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9](?:[a-z0-9\-]*[a-z0-9])?$").expect("host label pattern")
});

const DEFAULT_SCHEME: &str = "https://";

pub fn is_valid_email(input: &str) -> bool {
    let candidate = input.trim();
    !candidate.is_empty() && EMAIL.is_match(candidate)
}

pub fn is_valid_phone(input: &str) -> bool {
    PHONE.is_match(input.trim())
}

/// Renders ten-digit input as `(XXX) XXX-XXXX`; anything else comes back
/// unchanged. This is formatting, not validation.
pub fn normalize_phone(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        input.to_string()
    }
}

/// Accepts anything that parses to a dotted host, and also bare local
/// hostnames such as `localhost` or an unqualified intranet name.
pub fn is_valid_url(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return false;
    }
    let with_scheme;
    let candidate = if SCHEME.is_match(trimmed) {
        trimmed
    } else {
        with_scheme = format!("{DEFAULT_SCHEME}{trimmed}");
        with_scheme.as_str()
    };
    match extract_host(candidate) {
        Some(host) => is_valid_host(host),
        None => false,
    }
}

pub fn is_required_present(input: &str) -> bool {
    !input.trim().is_empty()
}

fn extract_host(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map(|(_, host)| host)
        .unwrap_or(authority);
    let host = match host_port.rsplit_once(':') {
        Some((host, port)) => {
            if port.is_empty() || !port.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            host
        }
        None => host_port,
    };
    if host.is_empty() { None } else { Some(host) }
}

fn is_valid_host(host: &str) -> bool {
    host.split('.').all(|label| HOST_LABEL.is_match(label))
}
