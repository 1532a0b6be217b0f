//! Error hierarchy for Gatekeep.

use thiserror::Error;
use uuid::Uuid;

/// Rejections from the grant validator. User-correctable; the display
/// strings are the exact wire messages returned to the requester.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrantError {
    #[error("Missing domain")]
    MissingDomain,

    #[error("Reason must be at least 5 words")]
    InsufficientJustification,
}

/// Errors from blocklist and category mutations. The policy state is
/// unchanged whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("Domain cannot be empty")]
    EmptyDomain,

    #[error("Site already blocked: {domain}")]
    DuplicateSite { domain: String },

    #[error("Site not found: {id}")]
    SiteNotFound { id: Uuid },

    #[error("Category name cannot be empty")]
    EmptyCategory,

    #[error("Category already exists: {name}")]
    DuplicateCategory { name: String },

    #[error("Category not found: {name}")]
    CategoryNotFound { name: String },
}
