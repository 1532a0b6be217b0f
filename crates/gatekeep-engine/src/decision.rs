//! The navigation interception decision.
//!
//! `decide` is the top of the engine: given one navigation event and the
//! current policy, produce `Allowed` or `Redirected`. Pure — persisting
//! prunes and performing the redirect are the caller's job.

use crate::{allows, matcher};
use chrono::{DateTime, Utc};
use gatekeep_types::domain;
use gatekeep_types::PolicyState;

/// Schemes that are structurally exempt from interception: browser-internal
/// pages and our own interception pages.
const INTERNAL_SCHEMES: [&str; 4] = ["about", "chrome", "chrome-extension", "gatekeep"];

/// Why a navigation was let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowKind {
    /// Sub-frame or internal scheme; policy was never consulted.
    Exempt,
    /// Focus mode is off.
    FocusOff,
    /// No blocklist entry matched.
    NoMatch,
    /// The URL's hostname could not be extracted. Fail-open: unparseable
    /// input never blocks.
    Unparseable,
    /// A blocklist entry matched but a live temporary pass covers it.
    TemporaryPass,
}

/// Terminal outcome for one navigation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed(AllowKind),
    Redirected {
        blocked_domain: String,
        category: String,
        original_url: String,
    },
}

impl Decision {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Decision::Redirected { .. })
    }
}

fn is_internal(url: &str) -> bool {
    match url.split_once(':') {
        Some((scheme, _)) => INTERNAL_SCHEMES
            .iter()
            .any(|s| scheme.eq_ignore_ascii_case(s)),
        None => false,
    }
}

/// Decide one navigation event against the current policy.
///
/// Deterministic for fixed `policy` and `now`.
pub fn decide(
    url: &str,
    top_frame: bool,
    policy: &PolicyState,
    now: DateTime<Utc>,
) -> Decision {
    if !top_frame || is_internal(url) {
        return Decision::Allowed(AllowKind::Exempt);
    }

    if !policy.focus_mode {
        return Decision::Allowed(AllowKind::FocusOff);
    }

    let Some(candidate) = domain::host_domain(url) else {
        return Decision::Allowed(AllowKind::Unparseable);
    };

    let Some(site) = matcher::find_blocked(&candidate, &policy.blocked_sites) else {
        return Decision::Allowed(AllowKind::NoMatch);
    };

    if allows::is_allowed(&policy.temporary_allows, &candidate, Some(&site.domain), now) {
        return Decision::Allowed(AllowKind::TemporaryPass);
    }

    Decision::Redirected {
        blocked_domain: site.domain.clone(),
        category: site.category.clone(),
        original_url: url.to_string(),
    }
}
