//! # civica-proto
//!
//! Shared types and error definitions for the Civica complaint triage engine.
//!
//! This crate provides the foundational abstractions used across all Civica
//! crates, including:
//! - The closed `Category` and `Authority` enums used for routing
//! - `TriageInput` and `TriageResult` for the triage pipeline
//! - `ComplaintStatus` and its legal-transition table
//! - Identity-consent types (`ConsentRequest`, `ConsentToken`, outcomes)
//! - Common error types

mod authority;
mod category;
mod complaint;
mod consent;
mod error;
mod status;

pub use authority::{Authority, AuthorityId};
pub use category::Category;
pub use complaint::{Sentiment, TriageInput, TriageResult, TrustClass, UrgencyLevel};
pub use consent::{
    CitizenIdentity, ConsentDecision, ConsentOutcome, ConsentRequest, ConsentStatus, ConsentToken,
};
pub use error::{Error, Result};
pub use status::ComplaintStatus;
