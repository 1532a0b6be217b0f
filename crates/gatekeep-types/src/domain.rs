//! Domain normalization — turns URLs and raw user input into comparable
//! domain keys.
//!
//! The normalized form (lower-cased hostname, no scheme, no path, no leading
//! `www.`) is the sole matching key everywhere else in the engine.

use url::Url;

/// Normalize arbitrary user input (a URL, a bare domain, a domain with a
/// pasted-in path) into a domain key.
///
/// Never fails: malformed input yields an empty string or a best-effort
/// partial result. Callers must treat an empty result as non-normalizable
/// and skip matching.
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return String::new();
    }

    // Absolute URLs: only the hostname matters.
    if let Ok(parsed) = Url::parse(&trimmed) {
        if let Some(host) = parsed.host_str() {
            return strip_www(host).to_string();
        }
    }

    // Bare domain, possibly with a scheme or path fragment glued on.
    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .unwrap_or(&trimmed);
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    strip_www(host).to_string()
}

/// Extract the normalized domain from an absolute URL.
///
/// Unlike [`normalize`] this does not guess at bare-domain input: anything
/// that fails strict URL parsing (or has no host) yields `None`, which the
/// decision layer maps to its explicit fail-open variant.
pub fn host_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(strip_www(&host.to_lowercase()).to_string())
}

/// Strip a single leading `www.` label.
fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
