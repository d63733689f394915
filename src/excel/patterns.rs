use once_cell::sync::Lazy;
use regex::Regex;

/// Scheme prepended to bare domains
pub const DEFAULT_SCHEME: &str = "https://";

const KNOWN_SCHEMES: [&str; 3] = ["http://", "https://", "ftp://"];

static SCHEME_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:https?|ftp)://[^\s/?#]+\S*$").expect("valid scheme regex"));

static BARE_DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:www\.)?[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.[a-z]{2,}(?::\d{1,5})?(?:[/?#]\S*)?$")
        .expect("valid domain regex")
});

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// True if the text is a link: either scheme-prefixed or a bare domain with optional path.
///
/// Email addresses are never links, even on link-like domains (`jane@linkedin.com`).
pub fn is_url(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || text.chars().any(char::is_whitespace) || is_email(text) {
        return false;
    }

    SCHEME_URL.is_match(text) || BARE_DOMAIN.is_match(text) || is_linkedin(text)
}

/// True for `local@domain.tld` addresses.
pub fn is_email(text: &str) -> bool {
    EMAIL.is_match(text.trim())
}

/// LinkedIn profile links are links even when their shape is odd (`linkedin.com/in/x`).
fn is_linkedin(text: &str) -> bool {
    text.to_ascii_lowercase().contains("linkedin.com")
}

fn has_scheme(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    KNOWN_SCHEMES.iter().any(|s| lower.starts_with(s))
}

/// Link target for a website cell. Adds `https://` to domain-like text without a scheme;
/// anything else is returned trimmed but otherwise untouched.
pub fn normalize_url(text: &str) -> String {
    let text = text.trim();

    if has_scheme(text) || !text.contains('.') || text.chars().any(char::is_whitespace) {
        return text.to_string();
    }

    format!("{}{}", DEFAULT_SCHEME, text)
}

/// Link target for an email cell.
pub fn mailto(text: &str) -> String {
    format!("mailto:{}", text.trim())
}
