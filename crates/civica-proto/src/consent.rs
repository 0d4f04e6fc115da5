//! Identity-consent types.
//!
//! An authority handling an anonymous complaint may request that the citizen
//! reveal their identity. The request carries a single-use, time-limited
//! token; the citizen approves or declines while the token is live.

use crate::AuthorityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single-use consent token.
///
/// Token values are minted from a cryptographically secure source and are
/// never reused across requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsentToken(String);

impl ConsentToken {
    /// Wraps an already-minted token value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the token value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConsentToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Status of an identity-consent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentStatus {
    /// No request has been made.
    NotRequested,
    /// A request is open and awaiting the citizen's decision.
    Requested,
    /// The citizen agreed to reveal their identity.
    Approved,
    /// The citizen refused; identity stays hidden.
    Declined,
}

impl std::fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConsentStatus::NotRequested => "not_requested",
            ConsentStatus::Requested => "requested",
            ConsentStatus::Approved => "approved",
            ConsentStatus::Declined => "declined",
        };
        write!(f, "{}", s)
    }
}

/// An open or settled identity-consent request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentRequest {
    /// The single-use token the citizen must present.
    pub token: ConsentToken,

    /// The authority account that asked for the reveal.
    pub requested_by: AuthorityId,

    /// When the request was opened.
    pub requested_at: DateTime<Utc>,

    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,

    /// Current status of the request.
    pub status: ConsentStatus,
}

impl ConsentRequest {
    /// True once the citizen has decided either way.
    ///
    /// A consumed token cannot authorize a second decision.
    pub fn is_consumed(&self) -> bool {
        matches!(self.status, ConsentStatus::Approved | ConsentStatus::Declined)
    }

    /// True when the token's validity window has passed.
    ///
    /// Expiry is checked lazily at consumption time; there is no sweeper.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// True while the request still awaits a decision and has not expired.
    ///
    /// A complaint holds at most one active request at a time.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == ConsentStatus::Requested && !self.is_expired(now)
    }
}

/// Identity fields revealed to an authority on approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitizenIdentity {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// The citizen's decision on an identity request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentDecision {
    Approve,
    Decline,
}

/// Outcome of a citizen decision.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsentOutcome {
    /// The identity fields are released to the requesting authority.
    Approved { identity: CitizenIdentity },
    /// Identity stays hidden; the complaint remains anonymous.
    Declined,
}
