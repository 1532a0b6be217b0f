//! Grant validator — the "intentional friction" gate in front of the
//! temporary allow registry.

use chrono::{DateTime, Duration, Utc};
use gatekeep_types::domain;
use gatekeep_types::{GrantError, TemporaryAllow};

/// Shortest pass a user can request: one minute.
pub const MIN_PASS_MS: i64 = 60_000;
/// Longest pass: thirty minutes.
pub const MAX_PASS_MS: i64 = 1_800_000;
/// Fallback when no usable duration was supplied: five minutes.
pub const DEFAULT_PASS_MS: i64 = 300_000;
/// The justification must carry at least this many words. The friction is
/// intentional: granting an exception should require genuine reflection.
pub const MIN_REASON_WORDS: usize = 5;

/// A validated, not-yet-issued grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantRequest {
    pub domain: String,
    pub reason: String,
    pub expires_at: DateTime<Utc>,
    pub target_url: Option<String>,
}

impl GrantRequest {
    /// Stamp the request into a registry entry.
    pub fn into_allow(self, now: DateTime<Utc>) -> TemporaryAllow {
        TemporaryAllow {
            domain: self.domain,
            created_at: now,
            expires_at: self.expires_at,
            reason: self.reason,
            target_url: self.target_url,
        }
    }
}

/// Validate a grant request.
///
/// The domain is normalized and must be non-empty; the reason must carry at
/// least [`MIN_REASON_WORDS`] whitespace-delimited words. The duration is
/// clamped into `[MIN_PASS_MS, MAX_PASS_MS]` — out-of-range requests are
/// silently adjusted, never rejected — and absent or non-finite input falls
/// back to [`DEFAULT_PASS_MS`].
pub fn validate(
    domain_raw: &str,
    reason_raw: &str,
    duration_ms: Option<f64>,
    target_url: Option<String>,
    now: DateTime<Utc>,
) -> Result<GrantRequest, GrantError> {
    let domain = domain::normalize(domain_raw);
    if domain.is_empty() {
        return Err(GrantError::MissingDomain);
    }

    let reason = reason_raw.trim();
    if reason.split_whitespace().count() < MIN_REASON_WORDS {
        return Err(GrantError::InsufficientJustification);
    }

    let clamped = match duration_ms {
        Some(ms) if ms.is_finite() => (ms as i64).clamp(MIN_PASS_MS, MAX_PASS_MS),
        _ => DEFAULT_PASS_MS,
    };

    Ok(GrantRequest {
        domain,
        reason: reason.to_string(),
        expires_at: now + Duration::milliseconds(clamped),
        target_url,
    })
}
