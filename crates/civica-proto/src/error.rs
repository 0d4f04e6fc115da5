//! Common error types for the Civica crates.

use crate::ComplaintStatus;

/// Result type alias using the Civica error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Domain errors surfaced to callers.
///
/// Consent failures are deliberately distinct variants (expired vs invalid
/// vs forbidden) so the embedding layer can show the citizen and the
/// authority different, accurate messages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A status transition outside the legal-transition table.
    #[error("invalid status transition {current} -> {requested}; allowed next: [{allowed}]")]
    InvalidTransition {
        current: ComplaintStatus,
        requested: ComplaintStatus,
        /// Comma-joined legal next statuses, for the error message.
        allowed: String,
    },

    /// Identity reveal requested on a complaint that is not anonymous.
    #[error("identity consent is only applicable to anonymous complaints")]
    ConsentNotApplicable,

    /// A second request while one is still active.
    #[error("an identity request is already active for this complaint")]
    ConsentAlreadyActive,

    /// The presented token's validity window has passed.
    #[error("consent token has expired")]
    TokenExpired,

    /// The presented token is unknown or was already consumed.
    #[error("consent token is invalid")]
    TokenInvalid,

    /// A responder who does not own the complaint.
    #[error("only the complaint owner may respond to an identity request")]
    Forbidden,
}

impl Error {
    /// Builds an `InvalidTransition` error with the allowed-next list
    /// rendered for display.
    pub fn invalid_transition(current: ComplaintStatus, requested: ComplaintStatus) -> Self {
        let allowed = current
            .allowed_next()
            .iter()
            .map(ComplaintStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        Error::InvalidTransition {
            current,
            requested,
            allowed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_message_names_statuses() {
        let err = Error::invalid_transition(ComplaintStatus::Resolved, ComplaintStatus::Seen);
        let msg = err.to_string();
        assert!(msg.contains("resolved"));
        assert!(msg.contains("seen"));
        assert!(msg.contains("allowed next: []"));
    }

    #[test]
    fn test_invalid_transition_lists_allowed() {
        let err = Error::invalid_transition(
            ComplaintStatus::InProgress,
            ComplaintStatus::Pending,
        );
        assert!(err.to_string().contains("resolved, seen"));
    }

    #[test]
    fn test_consent_errors_are_distinct() {
        assert_ne!(Error::TokenExpired.to_string(), Error::TokenInvalid.to_string());
        assert_ne!(Error::TokenInvalid.to_string(), Error::Forbidden.to_string());
    }
}
