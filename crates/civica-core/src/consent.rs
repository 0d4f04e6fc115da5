//! Identity-consent workflow.
//!
//! An authority handling an anonymous complaint may ask the citizen to
//! reveal their identity. The request mints a single-use token with a fixed
//! validity window; the citizen's approve/decline consumes it. Expiry is
//! checked lazily when the token is presented; there is no sweeper.

use crate::config::ConsentSettings;
use chrono::{DateTime, Duration, Utc};
use civica_proto::{
    AuthorityId, CitizenIdentity, ConsentDecision, ConsentOutcome, ConsentRequest, ConsentStatus,
    ConsentToken, Error, Result,
};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::info;

/// Token length in random bytes (hex-encoded to twice this length).
const TOKEN_BYTES: usize = 32;

/// The identity-consent state machine.
#[derive(Debug, Clone)]
pub struct ConsentWorkflow {
    ttl: Duration,
}

impl ConsentWorkflow {
    /// Creates a workflow with the configured token validity window.
    pub fn new(settings: &ConsentSettings) -> Self {
        Self {
            ttl: Duration::hours(settings.ttl_hours),
        }
    }

    /// Opens an identity request against an anonymous complaint.
    ///
    /// Rejected when the complaint is not anonymous, or when another
    /// request is still active (a complaint holds at most one). An expired
    /// or consumed prior request does not block; the fresh request mints a
    /// new token, never reusing a value.
    pub fn request_identity(
        &self,
        existing: Option<&ConsentRequest>,
        complaint_is_anonymous: bool,
        requested_by: AuthorityId,
        now: DateTime<Utc>,
    ) -> Result<ConsentRequest> {
        if !complaint_is_anonymous {
            return Err(Error::ConsentNotApplicable);
        }
        if let Some(request) = existing {
            if request.is_active(now) {
                return Err(Error::ConsentAlreadyActive);
            }
        }

        let request = ConsentRequest {
            token: mint_token(),
            requested_by: requested_by.clone(),
            requested_at: now,
            expires_at: now + self.ttl,
            status: ConsentStatus::Requested,
        };
        info!(
            "identity request opened by {requested_by}, expires {}",
            request.expires_at.to_rfc3339()
        );
        Ok(request)
    }

    /// Processes the citizen's decision on an open request.
    ///
    /// Only the complaint's owner may respond; the presented token must
    /// match; a consumed token cannot authorize a second decision; an
    /// expired token is rejected even when otherwise valid. On approval
    /// the stored identity is released to the requesting authority; on
    /// decline it stays hidden.
    pub fn respond(
        &self,
        request: &mut ConsentRequest,
        presented: &ConsentToken,
        responder_is_owner: bool,
        decision: ConsentDecision,
        identity: &CitizenIdentity,
        now: DateTime<Utc>,
    ) -> Result<ConsentOutcome> {
        if !responder_is_owner {
            return Err(Error::Forbidden);
        }
        if request.is_consumed() {
            return Err(Error::TokenInvalid);
        }
        if presented != &request.token {
            return Err(Error::TokenInvalid);
        }
        if request.is_expired(now) {
            return Err(Error::TokenExpired);
        }

        match decision {
            ConsentDecision::Approve => {
                request.status = ConsentStatus::Approved;
                info!("identity revealed to {}", request.requested_by);
                Ok(ConsentOutcome::Approved {
                    identity: identity.clone(),
                })
            }
            ConsentDecision::Decline => {
                request.status = ConsentStatus::Declined;
                info!("identity request declined, complaint stays anonymous");
                Ok(ConsentOutcome::Declined)
            }
        }
    }
}

impl Default for ConsentWorkflow {
    fn default() -> Self {
        Self::new(&ConsentSettings::default())
    }
}

/// Mints a fresh token from the OS entropy source.
fn mint_token() -> ConsentToken {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    ConsentToken::new(hex::encode(bytes))
}
