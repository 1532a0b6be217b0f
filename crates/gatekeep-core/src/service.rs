//! The Gatekeep service: protocol dispatch and navigation handling.

use crate::redirect;
use chrono::Utc;
use gatekeep_engine::{allows, decide, grant, AllowKind, Decision};
use gatekeep_store::{PolicyStore, StoreError};
use gatekeep_types::{PolicyError, PolicyState, Request, Response};
use thiserror::Error;

/// Generic failure string for storage problems; the real error goes to the
/// log, not the requester.
const GENERIC_FAILURE: &str = "Unexpected error";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid block page URL: {0}")]
    BlockPageUrl(#[from] url::ParseError),
}

/// What the navigation adapter should do with one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Let the navigation proceed.
    Proceed(AllowKind),
    /// Send the tab to the interception page instead.
    Redirect {
        to: String,
        blocked_domain: String,
        category: String,
    },
}

/// Owns the store and the interception-page base URL. Every decision
/// re-reads current policy; nothing is cached across calls.
pub struct Service {
    store: PolicyStore,
    block_page_url: String,
}

impl Service {
    pub fn new(store: PolicyStore, block_page_url: impl Into<String>) -> Self {
        Self {
            store,
            block_page_url: block_page_url.into(),
        }
    }

    /// Decide one navigation event and translate it for the adapter.
    ///
    /// Persists registry prunes as a side effect when the registry was
    /// consulted (i.e. a blocklist entry matched) and pruning changed it.
    pub async fn on_navigation(
        &self,
        url: &str,
        top_frame: bool,
    ) -> Result<NavigationOutcome, ServiceError> {
        let mut state = self.store.load().await?;
        let now = Utc::now();
        let decision = decide(url, top_frame, &state, now);

        if matches!(
            decision,
            Decision::Redirected { .. } | Decision::Allowed(AllowKind::TemporaryPass)
        ) {
            let (live, changed) = allows::prune(std::mem::take(&mut state.temporary_allows), now);
            state.temporary_allows = live;
            if changed {
                self.store.save(&state).await?;
            }
        }

        match decision {
            Decision::Allowed(kind) => {
                tracing::debug!(url, ?kind, "navigation allowed");
                Ok(NavigationOutcome::Proceed(kind))
            }
            Decision::Redirected {
                blocked_domain,
                category,
                original_url,
            } => {
                tracing::info!(url, matched = %blocked_domain, "blocking navigation");
                let to = redirect::block_page_url(
                    &self.block_page_url,
                    &blocked_domain,
                    &category,
                    &original_url,
                )?;
                Ok(NavigationOutcome::Redirect {
                    to,
                    blocked_domain,
                    category,
                })
            }
        }
    }

    /// Handle one protocol request. Never fails: every failure mode maps to
    /// a `Response` with a user-facing error string.
    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::GetState => self.get_state().await,
            Request::GrantTemporaryPass {
                domain,
                duration_ms,
                reason,
                target_url,
            } => self.grant_pass(&domain, &reason, duration_ms, target_url).await,
            Request::SetFocusMode { enabled } => {
                self.mutate(|state| {
                    state.set_focus(enabled);
                    Ok(())
                })
                .await
            }
            Request::AddSite { domain, category } => {
                self.mutate(|state| {
                    state.add_site(&domain, &category, Utc::now())?;
                    Ok(())
                })
                .await
            }
            Request::RemoveSite { id } => {
                self.mutate(|state| {
                    state.remove_site(id)?;
                    Ok(())
                })
                .await
            }
            Request::AddCategory { name } => self.mutate(|state| state.add_category(&name)).await,
            Request::RemoveCategory { name } => {
                self.mutate(|state| state.remove_category(&name)).await
            }
        }
    }

    async fn get_state(&self) -> Response {
        match self.store.load().await {
            Ok(state) => Response::State {
                focus_mode: state.focus_mode,
                blocked_sites: state.blocked_sites,
                categories: state.categories,
            },
            Err(e) => {
                tracing::error!(error = %e, "policy load failed");
                Response::failure(GENERIC_FAILURE)
            }
        }
    }

    async fn grant_pass(
        &self,
        domain: &str,
        reason: &str,
        duration_ms: Option<f64>,
        target_url: Option<String>,
    ) -> Response {
        let now = Utc::now();
        let request = match grant::validate(domain, reason, duration_ms, target_url, now) {
            Ok(request) => request,
            // Validation failures go back verbatim; they are the user's to fix.
            Err(e) => return Response::failure(e.to_string()),
        };

        let mut state = match self.store.load().await {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(error = %e, "policy load failed");
                return Response::failure(GENERIC_FAILURE);
            }
        };

        let expires_at = request.expires_at;
        state.temporary_allows = allows::issue(
            std::mem::take(&mut state.temporary_allows),
            request.into_allow(now),
            now,
        );

        if let Err(e) = self.store.save(&state).await {
            tracing::error!(error = %e, "policy save failed");
            return Response::failure(GENERIC_FAILURE);
        }

        tracing::info!(domain, expires_at = %expires_at, "temporary pass granted");
        Response::granted(expires_at.timestamp_millis())
    }

    async fn mutate<F>(&self, apply: F) -> Response
    where
        F: FnOnce(&mut PolicyState) -> Result<(), PolicyError>,
    {
        let mut state = match self.store.load().await {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(error = %e, "policy load failed");
                return Response::failure(GENERIC_FAILURE);
            }
        };

        if let Err(e) = apply(&mut state) {
            return Response::failure(e.to_string());
        }

        if let Err(e) = self.store.save(&state).await {
            tracing::error!(error = %e, "policy save failed");
            return Response::failure(GENERIC_FAILURE);
        }
        Response::done()
    }

    /// Read-only access to current policy, for display frontends.
    pub async fn policy(&self) -> Result<PolicyState, ServiceError> {
        Ok(self.store.load().await?)
    }
}
