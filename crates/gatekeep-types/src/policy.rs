//! Policy data model: the blocklist, categories and temporary allows.
//!
//! `PolicyState` is the single source of truth for every decision. It is
//! owned by the persistent store; the engine never caches it across calls.
//! Wire/storage field names are camelCase with epoch-millisecond timestamps,
//! so state files written by earlier builds keep loading.

use crate::domain;
use crate::error::PolicyError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Categories seeded into a fresh policy.
pub const DEFAULT_CATEGORIES: [&str; 5] =
    ["Social Media", "News", "Entertainment", "Shopping", "Gaming"];

/// A single blocklist record. Created by explicit user add, removed by
/// explicit user delete, never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedSite {
    pub id: Uuid,
    /// Normalized domain key; unique across the blocklist.
    pub domain: String,
    pub category: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_added: DateTime<Utc>,
}

/// A time-boxed exception grant. Created only through the grant validator;
/// never mutated; dropped by expiry-driven pruning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryAllow {
    pub domain: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
}

/// The whole persisted policy. Field defaults double as the backfill values
/// for state files written before a key existed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyState {
    #[serde(default)]
    pub focus_mode: bool,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub blocked_sites: Vec<BlockedSite>,
    #[serde(default)]
    pub temporary_allows: Vec<TemporaryAllow>,
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect()
}

impl Default for PolicyState {
    fn default() -> Self {
        Self {
            focus_mode: false,
            categories: default_categories(),
            blocked_sites: Vec::new(),
            temporary_allows: Vec::new(),
        }
    }
}

impl PolicyState {
    /// Add a domain to the blocklist. The domain is normalized first;
    /// duplicates are rejected against the normalized form, so
    /// `"Example.com"` and `"www.example.com"` collide.
    pub fn add_site(
        &mut self,
        domain_raw: &str,
        category: &str,
        now: DateTime<Utc>,
    ) -> Result<&BlockedSite, PolicyError> {
        let domain = domain::normalize(domain_raw);
        if domain.is_empty() {
            return Err(PolicyError::EmptyDomain);
        }
        let category = category.trim();
        if category.is_empty() {
            return Err(PolicyError::EmptyCategory);
        }
        if self.blocked_sites.iter().any(|s| s.domain == domain) {
            return Err(PolicyError::DuplicateSite { domain });
        }

        self.blocked_sites.push(BlockedSite {
            id: Uuid::new_v4(),
            domain,
            category: category.to_string(),
            date_added: now,
        });
        Ok(self.blocked_sites.last().unwrap())
    }

    /// Remove a blocklist record by id, returning the removed record.
    pub fn remove_site(&mut self, id: Uuid) -> Result<BlockedSite, PolicyError> {
        let idx = self
            .blocked_sites
            .iter()
            .position(|s| s.id == id)
            .ok_or(PolicyError::SiteNotFound { id })?;
        Ok(self.blocked_sites.remove(idx))
    }

    /// Look up a blocklist record by (raw) domain.
    pub fn site_by_domain(&self, domain_raw: &str) -> Option<&BlockedSite> {
        let domain = domain::normalize(domain_raw);
        self.blocked_sites.iter().find(|s| s.domain == domain)
    }

    pub fn add_category(&mut self, name: &str) -> Result<(), PolicyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PolicyError::EmptyCategory);
        }
        if self.categories.iter().any(|c| c == name) {
            return Err(PolicyError::DuplicateCategory {
                name: name.to_string(),
            });
        }
        self.categories.push(name.to_string());
        Ok(())
    }

    pub fn remove_category(&mut self, name: &str) -> Result<(), PolicyError> {
        let idx = self
            .categories
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PolicyError::CategoryNotFound {
                name: name.to_string(),
            })?;
        self.categories.remove(idx);
        Ok(())
    }

    /// Blocklist grouped by category, for display.
    pub fn sites_by_category(&self) -> BTreeMap<&str, Vec<&BlockedSite>> {
        let mut grouped: BTreeMap<&str, Vec<&BlockedSite>> = BTreeMap::new();
        for site in &self.blocked_sites {
            grouped.entry(site.category.as_str()).or_default().push(site);
        }
        grouped
    }

    pub fn set_focus(&mut self, enabled: bool) {
        self.focus_mode = enabled;
    }

    /// Flip focus mode, returning the new value.
    pub fn toggle_focus(&mut self) -> bool {
        self.focus_mode = !self.focus_mode;
        self.focus_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn add_site_normalizes_domain() {
        let mut state = PolicyState::default();
        let site = state.add_site("https://WWW.Reddit.com/r/foo", "Social Media", now()).unwrap();
        assert_eq!(site.domain, "reddit.com");
        assert_eq!(site.category, "Social Media");
    }

    #[test]
    fn add_site_rejects_duplicate_after_normalization() {
        let mut state = PolicyState::default();
        state.add_site("Example.com", "News", now()).unwrap();
        let err = state.add_site("www.example.com", "News", now()).unwrap_err();
        assert_eq!(
            err,
            PolicyError::DuplicateSite {
                domain: "example.com".into()
            }
        );
        assert_eq!(state.blocked_sites.len(), 1);
    }

    #[test]
    fn add_site_rejects_empty_domain() {
        let mut state = PolicyState::default();
        assert_eq!(
            state.add_site("   ", "News", now()).unwrap_err(),
            PolicyError::EmptyDomain
        );
    }

    #[test]
    fn add_site_rejects_empty_category() {
        let mut state = PolicyState::default();
        assert_eq!(
            state.add_site("example.com", "  ", now()).unwrap_err(),
            PolicyError::EmptyCategory
        );
    }

    #[test]
    fn remove_site_by_id() {
        let mut state = PolicyState::default();
        let id = state.add_site("example.com", "News", now()).unwrap().id;
        let removed = state.remove_site(id).unwrap();
        assert_eq!(removed.domain, "example.com");
        assert!(state.blocked_sites.is_empty());
    }

    #[test]
    fn remove_site_unknown_id() {
        let mut state = PolicyState::default();
        let id = Uuid::new_v4();
        assert_eq!(
            state.remove_site(id).unwrap_err(),
            PolicyError::SiteNotFound { id }
        );
    }

    #[test]
    fn site_by_domain_matches_normalized() {
        let mut state = PolicyState::default();
        state.add_site("reddit.com", "Social Media", now()).unwrap();
        assert!(state.site_by_domain("https://www.reddit.com").is_some());
        assert!(state.site_by_domain("twitter.com").is_none());
    }

    #[test]
    fn category_add_remove() {
        let mut state = PolicyState::default();
        state.add_category("Work").unwrap();
        assert!(state.categories.contains(&"Work".to_string()));

        assert_eq!(
            state.add_category("Work").unwrap_err(),
            PolicyError::DuplicateCategory { name: "Work".into() }
        );
        assert_eq!(state.add_category("  ").unwrap_err(), PolicyError::EmptyCategory);

        state.remove_category("Work").unwrap();
        assert_eq!(
            state.remove_category("Work").unwrap_err(),
            PolicyError::CategoryNotFound { name: "Work".into() }
        );
    }

    #[test]
    fn default_categories_are_seeded() {
        let state = PolicyState::default();
        assert_eq!(state.categories.len(), DEFAULT_CATEGORIES.len());
        assert_eq!(state.categories[0], "Social Media");
    }

    #[test]
    fn sites_group_by_category() {
        let mut state = PolicyState::default();
        state.add_site("reddit.com", "Social Media", now()).unwrap();
        state.add_site("twitter.com", "Social Media", now()).unwrap();
        state.add_site("cnn.com", "News", now()).unwrap();

        let grouped = state.sites_by_category();
        assert_eq!(grouped["Social Media"].len(), 2);
        assert_eq!(grouped["News"].len(), 1);
    }

    #[test]
    fn toggle_focus_flips() {
        let mut state = PolicyState::default();
        assert!(!state.focus_mode);
        assert!(state.toggle_focus());
        assert!(!state.toggle_focus());
    }

    #[test]
    fn state_serializes_with_wire_field_names() {
        let mut state = PolicyState::default();
        state.add_site("reddit.com", "Social Media", now()).unwrap();
        let json = serde_json::to_value(&state).unwrap();

        assert!(json.get("focusMode").is_some());
        assert!(json.get("blockedSites").is_some());
        assert!(json.get("temporaryAllows").is_some());
        assert!(json["blockedSites"][0]["dateAdded"].is_i64());
    }

    #[test]
    fn state_deserializes_with_missing_keys_backfilled() {
        let state: PolicyState = serde_json::from_str(r#"{"focusMode": true}"#).unwrap();
        assert!(state.focus_mode);
        assert_eq!(state.categories.len(), DEFAULT_CATEGORIES.len());
        assert!(state.blocked_sites.is_empty());
        assert!(state.temporary_allows.is_empty());
    }
}
