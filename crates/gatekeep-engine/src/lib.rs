//! Policy evaluation and exception-lifecycle engine for Gatekeep.
//!
//! Everything in this crate is pure: decisions are deterministic for a fixed
//! policy state and clock. All I/O — reading the policy, persisting prunes,
//! actually redirecting a tab — belongs to the callers in `gatekeep-core`.

pub mod allows;
pub mod decision;
pub mod grant;
pub mod matcher;

pub use allows::{is_allowed, issue, prune, MAX_ALLOWS};
pub use decision::{decide, AllowKind, Decision};
pub use grant::{validate, GrantRequest};
pub use matcher::{domain_matches, find_blocked};
