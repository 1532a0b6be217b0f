//! Request/response protocol consumed from UI collaborators.
//!
//! A closed, tagged enum per action: unknown actions fail to deserialize
//! instead of being silently ignored.

use crate::policy::BlockedSite;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An incoming request, tagged by its `action` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Read the current policy (focus mode, blocklist, categories).
    GetState,

    /// Ask for a time-boxed exception to a blocked domain.
    #[serde(rename_all = "camelCase")]
    GrantTemporaryPass {
        domain: String,
        /// Milliseconds; clamped by the validator. Absent or non-finite
        /// values fall back to the default duration.
        #[serde(default)]
        duration_ms: Option<f64>,
        #[serde(default)]
        reason: String,
        #[serde(default)]
        target_url: Option<String>,
    },

    SetFocusMode { enabled: bool },

    AddSite { domain: String, category: String },

    RemoveSite { id: Uuid },

    AddCategory { name: String },

    RemoveCategory { name: String },
}

/// Reply shapes. Serialized untagged so each variant matches the wire
/// contract exactly (`{"success":true,"expiresAt":...}` and friends).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    /// Reply to `getState`: the policy verbatim, minus the allow registry.
    #[serde(rename_all = "camelCase")]
    State {
        focus_mode: bool,
        blocked_sites: Vec<BlockedSite>,
        categories: Vec<String>,
    },

    /// A granted temporary pass.
    #[serde(rename_all = "camelCase")]
    Granted { success: bool, expires_at: i64 },

    /// A failed request; `error` is user-facing.
    Failed { success: bool, error: String },

    /// A successful mutation with nothing else to report.
    Done { success: bool },
}

impl Response {
    pub fn granted(expires_at_ms: i64) -> Self {
        Response::Granted {
            success: true,
            expires_at: expires_at_ms,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Response::Failed {
            success: false,
            error: error.into(),
        }
    }

    pub fn done() -> Self {
        Response::Done { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_request_deserializes() {
        let req: Request = serde_json::from_str(
            r#"{
                "action": "grantTemporaryPass",
                "domain": "reddit.com",
                "durationMs": 120000,
                "reason": "I need this for a research project right now",
                "targetUrl": "https://reddit.com/r/rust"
            }"#,
        )
        .unwrap();
        match req {
            Request::GrantTemporaryPass {
                domain,
                duration_ms,
                reason,
                target_url,
            } => {
                assert_eq!(domain, "reddit.com");
                assert_eq!(duration_ms, Some(120000.0));
                assert_eq!(reason, "I need this for a research project right now");
                assert_eq!(target_url.as_deref(), Some("https://reddit.com/r/rust"));
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn grant_request_optional_fields_default() {
        let req: Request = serde_json::from_str(
            r#"{"action": "grantTemporaryPass", "domain": "reddit.com"}"#,
        )
        .unwrap();
        match req {
            Request::GrantTemporaryPass {
                duration_ms,
                reason,
                target_url,
                ..
            } => {
                assert_eq!(duration_ms, None);
                assert!(reason.is_empty());
                assert!(target_url.is_none());
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn get_state_deserializes() {
        let req: Request = serde_json::from_str(r#"{"action": "getState"}"#).unwrap();
        assert!(matches!(req, Request::GetState));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let result = serde_json::from_str::<Request>(r#"{"action": "updateRules"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn granted_response_wire_shape() {
        let json = serde_json::to_value(Response::granted(1_700_000_000_000)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["expiresAt"], 1_700_000_000_000i64);
    }

    #[test]
    fn failed_response_wire_shape() {
        let json = serde_json::to_value(Response::failure("Missing domain")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Missing domain");
    }

    #[test]
    fn state_response_wire_shape() {
        let resp = Response::State {
            focus_mode: true,
            blocked_sites: Vec::new(),
            categories: vec!["News".into()],
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["focusMode"], true);
        assert!(json["blockedSites"].as_array().unwrap().is_empty());
        assert_eq!(json["categories"][0], "News");
    }
}
