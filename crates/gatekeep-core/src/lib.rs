//! Service orchestration for Gatekeep.
//!
//! The engine is pure; this crate is the thin adapter around it: it loads
//! the policy for every decision, dispatches protocol requests, persists
//! registry prunes, and builds the interception-page redirect URL.

mod redirect;
mod service;

pub use redirect::block_page_url;
pub use service::{NavigationOutcome, Service, ServiceError};
