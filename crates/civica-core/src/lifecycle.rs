//! Complaint status lifecycle.
//!
//! Enforces the legal-transition table after triage. The caller owns the
//! complaint record and applies the returned change; serializing writes to
//! a record is the embedding layer's job.

use chrono::{DateTime, Utc};
use civica_proto::{ComplaintStatus, Error, Result};
use tracing::info;

/// The effect of a status transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// The status after the request.
    pub status: ComplaintStatus,
    /// Resolution timestamp, set exactly once on entering `resolved`.
    pub resolved_at: Option<DateTime<Utc>>,
    /// False for same-state no-op requests.
    pub changed: bool,
}

/// Applies a status transition request.
///
/// A same-state request is a no-op success. Any transition outside the
/// legal table is rejected with an error naming the current status and the
/// allowed next statuses; nothing is auto-corrected. Entering `resolved`
/// stamps the resolution timestamp; because `resolved` has no outbound
/// transitions, the stamp can only happen once.
pub fn transition(
    current: ComplaintStatus,
    requested: ComplaintStatus,
    now: DateTime<Utc>,
) -> Result<StatusChange> {
    if current == requested {
        return Ok(StatusChange {
            status: current,
            resolved_at: None,
            changed: false,
        });
    }

    if !current.can_transition_to(requested) {
        return Err(Error::invalid_transition(current, requested));
    }

    let resolved_at = (requested == ComplaintStatus::Resolved).then_some(now);
    info!("status transition {current} -> {requested}");

    Ok(StatusChange {
        status: requested,
        resolved_at,
        changed: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_full_forward_path() {
        let t = now();
        let mut status = ComplaintStatus::Pending;
        for next in [
            ComplaintStatus::Seen,
            ComplaintStatus::InProgress,
            ComplaintStatus::Resolved,
        ] {
            let change = transition(status, next, t).unwrap();
            assert!(change.changed);
            status = change.status;
        }
        assert_eq!(status, ComplaintStatus::Resolved);
    }

    #[test]
    fn test_resolution_timestamp_stamped_on_resolve_only() {
        let t = now();
        let change = transition(ComplaintStatus::InProgress, ComplaintStatus::Resolved, t).unwrap();
        assert_eq!(change.resolved_at, Some(t));

        let change = transition(ComplaintStatus::Pending, ComplaintStatus::Seen, t).unwrap();
        assert_eq!(change.resolved_at, None);
    }

    #[test]
    fn test_same_state_is_noop_success() {
        let t = now();
        for status in [
            ComplaintStatus::Pending,
            ComplaintStatus::Seen,
            ComplaintStatus::InProgress,
            ComplaintStatus::Resolved,
        ] {
            let change = transition(status, status, t).unwrap();
            assert_eq!(change.status, status);
            assert!(!change.changed);
            assert_eq!(change.resolved_at, None);
        }
    }

    #[test]
    fn test_backward_allowance() {
        let t = now();
        let change = transition(ComplaintStatus::InProgress, ComplaintStatus::Seen, t).unwrap();
        assert_eq!(change.status, ComplaintStatus::Seen);
    }

    #[test]
    fn test_resolved_rejects_everything_but_itself() {
        let t = now();
        for requested in [
            ComplaintStatus::Pending,
            ComplaintStatus::Seen,
            ComplaintStatus::InProgress,
        ] {
            let err = transition(ComplaintStatus::Resolved, requested, t).unwrap_err();
            assert!(matches!(err, Error::InvalidTransition { .. }));
        }
    }

    #[test]
    fn test_skipping_states_rejected_with_named_statuses() {
        let t = now();
        let err = transition(ComplaintStatus::Pending, ComplaintStatus::Resolved, t).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("pending"));
        assert!(msg.contains("resolved"));
        assert!(msg.contains("seen"));
    }
}
