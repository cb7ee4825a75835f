use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Regexes used to scrub log text.
struct PiiPatterns {
    email: Regex,
    bearer: Regex,
    query_secret: Regex,
    opaque_token: Regex,
}

#[allow(clippy::unwrap_used)]
static PATTERNS: LazyLock<PiiPatterns> = LazyLock::new(|| PiiPatterns {
    email: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap(),
    bearer: Regex::new(r"(?i)\bbearer\s+[A-Za-z0-9._~+/=-]+").unwrap(),
    query_secret: Regex::new(r"(?i)([?&](?:api_?key|token|key|signature|sig)=)[^&\s]+")
        .unwrap(),
    // UUID-ish ids are dashed, so they survive this.
    opaque_token: Regex::new(r"\b[A-Za-z0-9+/_]{24,}={0,2}").unwrap(),
});

/// Mask emails, bearer credentials, secret query parameters and long opaque tokens.
///
/// Emails keep their first character and domain so logs stay useful
/// for correlating reports.
pub fn redact(input: &str) -> String {
    let p = &*PATTERNS;

    let out = p.email.replace_all(input, |caps: &regex::Captures| {
        let full = &caps[0];
        match full.split_once('@') {
            Some((local, domain)) if !local.is_empty() => {
                format!("{}***@{domain}", &local[..1])
            }
            _ => full.to_string(),
        }
    });
    let out = p.bearer.replace_all(&out, "Bearer [REDACTED]");
    let out = p.query_secret.replace_all(&out, "${1}[REDACTED]");
    p.opaque_token
        .replace_all(&out, "[REDACTED_TOKEN]")
        .into_owned()
}

/// Display wrapper that applies [`redact`] when formatted.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
