//! Complaint status and the legal-transition table.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a complaint record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    /// Initial status on submission.
    Pending,
    /// An authority has viewed the complaint.
    Seen,
    /// Work is underway.
    InProgress,
    /// Terminal status; no outbound transitions.
    Resolved,
}

impl ComplaintStatus {
    /// Returns the statuses this status may legally transition to.
    ///
    /// `in_progress -> seen` is an explicit backward allowance (work can be
    /// deprioritized back to the queue). `resolved` is terminal.
    pub fn allowed_next(&self) -> &'static [ComplaintStatus] {
        match self {
            ComplaintStatus::Pending => &[ComplaintStatus::Seen],
            ComplaintStatus::Seen => &[ComplaintStatus::InProgress],
            ComplaintStatus::InProgress => {
                &[ComplaintStatus::Resolved, ComplaintStatus::Seen]
            }
            ComplaintStatus::Resolved => &[],
        }
    }

    /// Checks whether a transition to `next` is legal.
    ///
    /// Same-state requests are not transitions; the lifecycle treats them
    /// as no-op successes.
    pub fn can_transition_to(&self, next: ComplaintStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Returns the status as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::Seen => "seen",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Resolved => "resolved",
        }
    }

    /// Parses a status from its wire string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(ComplaintStatus::Pending),
            "seen" => Some(ComplaintStatus::Seen),
            "in_progress" => Some(ComplaintStatus::InProgress),
            "resolved" => Some(ComplaintStatus::Resolved),
            _ => None,
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
