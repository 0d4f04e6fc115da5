//! Triage input and result types.

use crate::{Authority, Category};
use serde::{Deserialize, Serialize};

/// Trust classification of the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustClass {
    /// Submitter chose not to attach an identity.
    Anonymous,
    /// Submitter has a registered, verified account.
    Registered,
}

impl std::fmt::Display for TrustClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TrustClass::Anonymous => "anonymous",
            TrustClass::Registered => "registered",
        };
        write!(f, "{}", s)
    }
}

/// Sentiment label assigned to complaint text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Parses a sentiment from a classifier label (case-insensitive).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        };
        write!(f, "{}", s)
    }
}

/// Urgency band derived from the urgency score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Normal,
    Urgent,
    Critical,
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UrgencyLevel::Normal => "normal",
            UrgencyLevel::Urgent => "urgent",
            UrgencyLevel::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// One complaint submission handed to the triage pipeline.
///
/// Request-scoped and immutable; the pipeline never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageInput {
    /// Raw complaint text.
    pub text: String,

    /// Trust classification of the submitter.
    pub trust: TrustClass,

    /// Optional caller-supplied category label that overrides classification.
    pub category_override: Option<String>,
}

impl TriageInput {
    /// Creates a new triage input.
    pub fn new(text: impl Into<String>, trust: TrustClass) -> Self {
        Self {
            text: text.into(),
            trust,
            category_override: None,
        }
    }

    /// Sets a caller-supplied category label that bypasses classification.
    #[must_use]
    pub fn with_category_override(mut self, label: impl Into<String>) -> Self {
        self.category_override = Some(label.into());
        self
    }
}

/// The result of triaging one complaint.
///
/// Produced once per submission and never mutated afterwards; the caller
/// persists it alongside the complaint record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    /// The determined category, or `None` when undetermined.
    pub category: Option<Category>,

    /// Confidence in the category, in [0, 1]. Zero when undetermined.
    pub category_confidence: f32,

    /// Sentiment label for the complaint text.
    pub sentiment: Sentiment,

    /// Score of the winning sentiment label, in [0, 1].
    pub sentiment_score: f32,

    /// Tier-weighted hazard keyword score, in [0, 1].
    pub hazard_score: f32,

    /// Combined urgency score, in [0, 1].
    pub urgency_score: f32,

    /// Urgency band derived from the urgency score.
    pub urgency_level: UrgencyLevel,

    /// Trust score used in the urgency formula.
    pub trust_score: f32,

    /// The authority the complaint is routed to. Routing never fails.
    pub assigned_authority: Authority,

    /// True when no category could be determined and the caller should
    /// prompt for manual selection.
    pub needs_manual_category: bool,

    /// Human-readable detail when `needs_manual_category` is set.
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_builder() {
        let input = TriageInput::new("pothole on main street", TrustClass::Registered)
            .with_category_override("road issue");
        assert_eq!(input.trust, TrustClass::Registered);
        assert_eq!(input.category_override.as_deref(), Some("road issue"));
    }

    #[test]
    fn test_sentiment_parse() {
        assert_eq!(Sentiment::parse("NEGATIVE"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::parse(" neutral "), Some(Sentiment::Neutral));
        assert_eq!(Sentiment::parse("angry"), None);
    }

    #[test]
    fn test_urgency_level_ordering() {
        assert!(UrgencyLevel::Critical > UrgencyLevel::Urgent);
        assert!(UrgencyLevel::Urgent > UrgencyLevel::Normal);
    }

    #[test]
    fn test_result_serialization() {
        let result = TriageResult {
            category: Some(Category::WaterIssue),
            category_confidence: 0.9,
            sentiment: Sentiment::Negative,
            sentiment_score: 0.95,
            hazard_score: 0.2,
            urgency_score: 0.74,
            urgency_level: UrgencyLevel::Urgent,
            trust_score: 0.3,
            assigned_authority: Authority::WaterSupply,
            needs_manual_category: false,
            error: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: TriageResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
