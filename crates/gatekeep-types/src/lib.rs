//! Shared types and error hierarchy for Gatekeep.

pub mod domain;
pub mod error;
pub mod policy;
pub mod protocol;

pub use error::{GrantError, PolicyError};
pub use policy::{BlockedSite, PolicyState, TemporaryAllow, DEFAULT_CATEGORIES};
pub use protocol::{Request, Response};
