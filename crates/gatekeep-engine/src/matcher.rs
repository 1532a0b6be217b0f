//! Blocklist matcher — exact and subdomain-suffix matching.

use gatekeep_types::BlockedSite;

/// True when `candidate` is `blocked` itself or a subdomain of it:
/// `mail.example.com` matches a blocked `example.com`, `notexample.com`
/// does not.
pub fn domain_matches(candidate: &str, blocked: &str) -> bool {
    if candidate.is_empty() || blocked.is_empty() {
        return false;
    }
    candidate == blocked
        || candidate
            .strip_suffix(blocked)
            .is_some_and(|rest| rest.ends_with('.'))
}

/// First blocklist entry matching the (normalized) candidate domain.
///
/// Entries are tested in store order and the first match wins, so when both
/// `a.b.com` and `b.com` are blocked, whichever was added earlier is the one
/// reported. Order dependence is a deliberate simplicity trade-off.
pub fn find_blocked<'a>(candidate: &str, sites: &'a [BlockedSite]) -> Option<&'a BlockedSite> {
    if candidate.is_empty() {
        return None;
    }
    sites.iter().find(|site| {
        let blocked = site.domain.to_lowercase();
        domain_matches(candidate, &blocked)
    })
}
