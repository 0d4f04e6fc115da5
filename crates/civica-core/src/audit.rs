//! Audit trail for sensitive events.
//!
//! Identity-reveal requests, citizen decisions, and status transitions are
//! appended to AuditLog.md. Best-effort: a failed write is logged and
//! swallowed, never surfaced to the caller.

use chrono::Utc;
use civica_proto::{AuthorityId, ComplaintStatus, ConsentStatus};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Logs consent and lifecycle events to AuditLog.md.
pub struct AuditLogger {
    path: PathBuf,
}

impl AuditLogger {
    /// Creates a new AuditLogger writing under the given directory.
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join("AuditLog.md"),
        }
    }

    /// Logs one audit event.
    pub fn log_event(&self, event_type: &str, details: &str) {
        let timestamp = Utc::now().to_rfc3339();
        let entry = format!("| {} | {} | {} |", timestamp, event_type, details);

        // Ensure file exists with header if needed
        if !self.path.exists() {
            if let Err(e) = fs::write(
                &self.path,
                "# Audit Log\n\n| Timestamp | Event | Details |\n| --- | --- | --- |\n",
            ) {
                warn!("failed to create audit log: {e}");
                return;
            }
        }

        match fs::OpenOptions::new().append(true).open(&self.path) {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, "{}", entry) {
                    warn!("failed to append audit entry: {e}");
                }
            }
            Err(e) => warn!("failed to open audit log: {e}"),
        }
    }

    /// Logs a status transition.
    pub fn log_status_change(
        &self,
        complaint_id: &str,
        from: ComplaintStatus,
        to: ComplaintStatus,
    ) {
        self.log_event(
            "STATUS_CHANGED",
            &format!("complaint {complaint_id}: {from} -> {to}"),
        );
    }

    /// Logs an identity-reveal request.
    pub fn log_consent_requested(&self, complaint_id: &str, requested_by: &AuthorityId) {
        self.log_event(
            "IDENTITY_REQUESTED",
            &format!("complaint {complaint_id}: requested by {requested_by}"),
        );
    }

    /// Logs the citizen's decision on an identity request.
    pub fn log_consent_decision(&self, complaint_id: &str, status: ConsentStatus) {
        self.log_event(
            "IDENTITY_DECISION",
            &format!("complaint {complaint_id}: {status}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let logger = AuditLogger::new(dir.path());
        logger.log_event("TEST", "first");
        logger.log_event("TEST", "second");

        let content = fs::read_to_string(dir.path().join("AuditLog.md")).unwrap();
        assert_eq!(content.matches("# Audit Log").count(), 1);
        assert!(content.contains("| TEST | first |"));
        assert!(content.contains("| TEST | second |"));
    }

    #[test]
    fn test_typed_events() {
        let dir = tempfile::tempdir().unwrap();
        let logger = AuditLogger::new(dir.path());
        logger.log_status_change("c-42", ComplaintStatus::Pending, ComplaintStatus::Seen);
        logger.log_consent_requested("c-42", &AuthorityId::from("officer-1"));
        logger.log_consent_decision("c-42", ConsentStatus::Declined);

        let content = fs::read_to_string(dir.path().join("AuditLog.md")).unwrap();
        assert!(content.contains("STATUS_CHANGED"));
        assert!(content.contains("pending -> seen"));
        assert!(content.contains("IDENTITY_REQUESTED"));
        assert!(content.contains("officer-1"));
        assert!(content.contains("IDENTITY_DECISION"));
        assert!(content.contains("declined"));
    }
}
