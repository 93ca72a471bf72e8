//! PII redaction for log fields.
//!
//! An authentication service logs two kinds of sensitive material: email
//! addresses and token strings. Both get masked before they reach a log
//! line.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b")
            .expect("hardcoded regex compiles")
    });
    &EMAIL_REGEX
}

fn token_regex() -> &'static Regex {
    // Long base64/base64url runs, which covers JWT segments and most
    // opaque credentials.
    static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"[A-Za-z0-9_/+-]{20,}={0,2}").expect("hardcoded regex compiles")
    });
    &TOKEN_REGEX
}

/// Redacts sensitive information from a string.
///
/// - Emails: keeps the first character of the local part and the domain
/// - Token material: replaces long credential-shaped runs with
///   `[REDACTED_TOKEN]`
///
/// Emails are handled first so the token pass never eats a long local
/// part.
pub fn redact(input: &str) -> String {
    let email_redacted = email_regex().replace_all(input, |caps: &regex::Captures| {
        let full_match = &caps[0];
        match full_match.find('@') {
            Some(at_pos) if at_pos > 0 => {
                let first_char = &full_match[..1];
                let domain = &full_match[at_pos..];
                format!("{first_char}***{domain}")
            }
            _ => full_match.to_string(),
        }
    });

    token_regex()
        .replace_all(&email_redacted, "[REDACTED_TOKEN]")
        .to_string()
}

/// A wrapper that automatically redacts sensitive strings when displayed.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}
