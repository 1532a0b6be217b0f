//! Temporary allow registry — TTL-pruned, bounded exception grants.
//!
//! Pruning happens on every read rather than on a timer: the host may
//! suspend the process between navigations, so nothing here depends on a
//! running clock surviving suspension.

use crate::matcher::domain_matches;
use chrono::{DateTime, Utc};
use gatekeep_types::TemporaryAllow;

/// Upper bound on live-or-recent grants kept in the registry.
pub const MAX_ALLOWS: usize = 100;

fn is_live(allow: &TemporaryAllow, now: DateTime<Utc>) -> bool {
    // Strict: a grant expiring exactly now is already dead.
    allow.expires_at > now
}

/// Drop expired grants and cap the registry at the last [`MAX_ALLOWS`]
/// entries, earliest dropped first. Returns the surviving grants and whether
/// anything changed, so callers can decide whether to persist.
pub fn prune(
    allows: Vec<TemporaryAllow>,
    now: DateTime<Utc>,
) -> (Vec<TemporaryAllow>, bool) {
    let before = allows.len();
    let mut live: Vec<TemporaryAllow> =
        allows.into_iter().filter(|a| is_live(a, now)).collect();
    if live.len() > MAX_ALLOWS {
        live.drain(..live.len() - MAX_ALLOWS);
    }
    let changed = live.len() != before;
    (live, changed)
}

/// Is the candidate domain covered by a live grant?
///
/// When `hint` carries the blocked domain that matched this navigation, a
/// live grant for exactly that domain wins immediately — a pass granted for
/// `example.com` is honored even when the navigating hostname is
/// `shop.example.com`. Without a hint hit, falls back to the subdomain rule
/// between the candidate and each grant's domain.
pub fn is_allowed(
    allows: &[TemporaryAllow],
    candidate: &str,
    hint: Option<&str>,
    now: DateTime<Utc>,
) -> bool {
    let hint = hint.map(str::to_lowercase);
    allows.iter().filter(|a| is_live(a, now)).any(|a| {
        let allow_domain = a.domain.to_lowercase();
        if allow_domain.is_empty() {
            return false;
        }
        if hint.as_deref() == Some(allow_domain.as_str()) {
            return true;
        }
        domain_matches(candidate, &allow_domain)
    })
}

/// Append a validated grant to the pruned registry, keeping the bound.
pub fn issue(
    allows: Vec<TemporaryAllow>,
    grant: TemporaryAllow,
    now: DateTime<Utc>,
) -> Vec<TemporaryAllow> {
    let (mut live, _) = prune(allows, now);
    live.push(grant);
    if live.len() > MAX_ALLOWS {
        live.drain(..live.len() - MAX_ALLOWS);
    }
    live
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn allow(domain: &str, created: DateTime<Utc>, ttl_ms: i64) -> TemporaryAllow {
        TemporaryAllow {
            domain: domain.to_string(),
            created_at: created,
            expires_at: created + Duration::milliseconds(ttl_ms),
            reason: "because I really do need this one".to_string(),
            target_url: None,
        }
    }

    #[test]
    fn prune_drops_expired() {
        let t0 = Utc::now();
        let allows = vec![allow("a.com", t0, 1_000), allow("b.com", t0, 60_000)];
        let (live, changed) = prune(allows, t0 + Duration::milliseconds(30_000));
        assert!(changed);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].domain, "b.com");
    }

    #[test]
    fn prune_unchanged_when_all_live() {
        let t0 = Utc::now();
        let allows = vec![allow("a.com", t0, 60_000)];
        let (live, changed) = prune(allows, t0);
        assert!(!changed);
        assert_eq!(live.len(), 1);
    }

    #[test]
    fn expiry_boundary_is_strict() {
        let t0 = Utc::now();
        let a = allow("a.com", t0, 60_000);
        let expires_at = a.expires_at;
        // One ms before expiry: live. At expiry: dead.
        assert!(is_allowed(&[a.clone()], "a.com", None, expires_at - Duration::milliseconds(1)));
        assert!(!is_allowed(&[a], "a.com", None, expires_at));
    }

    #[test]
    fn issuing_150_grants_keeps_last_100() {
        let t0 = Utc::now();
        let mut allows = Vec::new();
        for i in 0..150 {
            allows = issue(allows, allow(&format!("site{i}.com"), t0, 600_000), t0);
        }
        assert_eq!(allows.len(), MAX_ALLOWS);
        assert_eq!(allows[0].domain, "site50.com");
        assert_eq!(allows[99].domain, "site149.com");
    }

    #[test]
    fn allowed_by_exact_domain() {
        let t0 = Utc::now();
        let allows = vec![allow("reddit.com", t0, 60_000)];
        assert!(is_allowed(&allows, "reddit.com", None, t0));
    }

    #[test]
    fn allowed_by_subdomain_of_grant() {
        let t0 = Utc::now();
        let allows = vec![allow("example.com", t0, 60_000)];
        assert!(is_allowed(&allows, "mail.example.com", None, t0));
        assert!(!is_allowed(&allows, "notexample.com", None, t0));
    }

    #[test]
    fn hint_matches_grant_exactly() {
        let t0 = Utc::now();
        // Grant for the blocked apex; navigation hostname is a subdomain
        // that wouldn't match the candidate rule if the grant were for a
        // sibling. The hint (the matched blocked domain) carries it.
        let allows = vec![allow("example.com", t0, 60_000)];
        assert!(is_allowed(&allows, "shop.example.com", Some("example.com"), t0));
    }

    #[test]
    fn hint_without_exact_grant_falls_back_to_candidate_rule() {
        let t0 = Utc::now();
        let allows = vec![allow("example.com", t0, 60_000)];
        // Matched blocked domain is the more specific "shop.example.com":
        // no grant for it exactly, so the hint path does not fire, but the
        // candidate still subdomain-matches the apex grant.
        assert!(is_allowed(&allows, "shop.example.com", Some("shop.example.com"), t0));
        // A hint that matches no grant exactly cannot allow an unrelated
        // candidate on its own.
        assert!(!is_allowed(&allows, "other.net", Some("shop.other.net"), t0));
    }

    #[test]
    fn hint_comparison_is_case_insensitive() {
        let t0 = Utc::now();
        let a = allow("Example.COM", t0, 60_000);
        assert!(is_allowed(&[a], "unrelated.org", Some("example.com"), t0));
    }

    #[test]
    fn expired_grants_never_match() {
        let t0 = Utc::now();
        let allows = vec![allow("reddit.com", t0, 1_000)];
        let later = t0 + Duration::milliseconds(2_000);
        assert!(!is_allowed(&allows, "reddit.com", Some("reddit.com"), later));
    }

    #[test]
    fn empty_registry_allows_nothing() {
        assert!(!is_allowed(&[], "reddit.com", Some("reddit.com"), Utc::now()));
    }
}
