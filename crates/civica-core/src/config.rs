//! Triage configuration.
//!
//! Keyword tables, weights, thresholds, and classifier settings live in one
//! immutable `TriageConfig` loaded once at process start and passed by
//! reference into the stateless scoring components. The built-in defaults
//! are complete; a YAML file can overlay any section.

use civica_proto::Category;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Hazard keyword tiers.
///
/// Matching is case-insensitive substring, no stemming. The bare word
/// "hazard" is deliberately absent: it names the signal, not a danger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTables {
    /// Weight-3 keywords: immediate physical danger.
    pub critical: Vec<String>,
    /// Weight-2 keywords: serious but not immediately life-threatening.
    pub high: Vec<String>,
    /// Weight-1 keywords: degraded conditions.
    pub medium: Vec<String>,
    /// Multiplier applied when any critical keyword matched.
    pub critical_boost: f32,
}

impl Default for HazardTables {
    fn default() -> Self {
        Self {
            critical: words(&[
                "burst",
                "fire",
                "gas leak",
                "collapse",
                "electrocution",
                "explosion",
                "flooding",
                "live wire",
                "sinkhole",
            ]),
            high: words(&[
                "overflow",
                "sparking",
                "exposed wire",
                "fallen tree",
                "accident",
                "injury",
                "contaminated",
                "no power",
            ]),
            medium: words(&[
                "pothole",
                "broken",
                "damaged",
                "blocked",
                "leak",
                "smell",
                "stray dog",
                "dark street",
            ]),
            critical_boost: 1.3,
        }
    }
}

/// Tiered keyword lists for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub category: Category,
    /// Weight-3 keywords: strong, near-unambiguous evidence.
    #[serde(default)]
    pub high: Vec<String>,
    /// Weight-2 keywords: supporting evidence.
    #[serde(default)]
    pub medium: Vec<String>,
    /// Weight-1 keywords, counted only when no high/medium keyword matched.
    #[serde(default)]
    pub low: Vec<String>,
}

/// Confidence floors and thresholds for the keyword matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceRules {
    /// Floor for any keyword-based win outside the generic-override branch.
    pub keyword_floor: f32,
    /// Floor when a generic domain overrides a weak specific domain.
    pub generic_override_floor: f32,
    /// Minimum denominator in the score-to-confidence ratio.
    pub min_denominator: f32,
    /// A specific domain at or above this score wins outright.
    pub specific_win_score: u32,
}

impl Default for ConfidenceRules {
    fn default() -> Self {
        Self {
            keyword_floor: 0.7,
            generic_override_floor: 0.6,
            min_denominator: 10.0,
            specific_win_score: 2,
        }
    }
}

/// Weights and banding thresholds for the urgency formula.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyWeights {
    pub sentiment: f32,
    pub category_confidence: f32,
    pub hazard: f32,
    pub trust: f32,
    /// Scores at or above this are labeled critical.
    pub critical_threshold: f32,
    /// Scores at or above this (and below critical) are labeled urgent.
    pub urgent_threshold: f32,
}

impl Default for UrgencyWeights {
    fn default() -> Self {
        Self {
            sentiment: 0.4,
            category_confidence: 0.3,
            hazard: 0.2,
            trust: 0.1,
            critical_threshold: 0.9,
            urgent_threshold: 0.7,
        }
    }
}

/// Fixed trust scores per submitter class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustScores {
    pub anonymous: f32,
    pub registered: f32,
}

impl Default for TrustScores {
    fn default() -> Self {
        Self {
            anonymous: 0.3,
            registered: 0.8,
        }
    }
}

/// External classification service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    /// Sentiment model endpoint.
    pub sentiment_url: String,
    /// Zero-shot classification model endpoint.
    pub zero_shot_url: String,
    /// Bearer token for the inference API, if required.
    pub api_token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Wait before the single model-loading retry, in seconds.
    pub retry_backoff_secs: u64,
    /// Accept the top label outright at or above this score.
    pub accept_score: f32,
    /// Accept the top label at or above this score when it strictly beats
    /// the runner-up.
    pub plurality_score: f32,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            sentiment_url:
                "https://api-inference.huggingface.co/models/cardiffnlp/twitter-roberta-base-sentiment-latest"
                    .to_string(),
            zero_shot_url:
                "https://api-inference.huggingface.co/models/facebook/bart-large-mnli"
                    .to_string(),
            api_token: None,
            timeout_secs: 30,
            retry_backoff_secs: 10,
            accept_score: 0.5,
            plurality_score: 0.3,
        }
    }
}

/// Identity-consent workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentSettings {
    /// Token validity window in hours.
    pub ttl_hours: i64,
}

impl Default for ConsentSettings {
    fn default() -> Self {
        Self { ttl_hours: 24 }
    }
}

/// The complete triage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    pub hazard: HazardTables,
    /// Per-category keyword tables, in tie-break order.
    pub categories: Vec<CategoryKeywords>,
    pub confidence: ConfidenceRules,
    pub urgency: UrgencyWeights,
    pub trust: TrustScores,
    pub classifier: ClassifierSettings,
    pub consent: ConsentSettings,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            hazard: HazardTables::default(),
            categories: default_category_tables(),
            confidence: ConfidenceRules::default(),
            urgency: UrgencyWeights::default(),
            trust: TrustScores::default(),
            classifier: ClassifierSettings::default(),
            consent: ConsentSettings::default(),
        }
    }
}

impl TriageConfig {
    /// Loads configuration from a YAML file, overlaying the defaults.
    ///
    /// Missing sections fall back to their built-in values; present
    /// sections replace the default tables wholesale.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: TriageConfig = serde_yaml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates weights, thresholds, and tables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("urgency.sentiment", self.urgency.sentiment),
            ("urgency.category_confidence", self.urgency.category_confidence),
            ("urgency.hazard", self.urgency.hazard),
            ("urgency.trust", self.urgency.trust),
            ("urgency.critical_threshold", self.urgency.critical_threshold),
            ("urgency.urgent_threshold", self.urgency.urgent_threshold),
            ("trust.anonymous", self.trust.anonymous),
            ("trust.registered", self.trust.registered),
            ("confidence.keyword_floor", self.confidence.keyword_floor),
            (
                "confidence.generic_override_floor",
                self.confidence.generic_override_floor,
            ),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite value in [0, 1], got {value}"
                )));
            }
        }
        if self.urgency.urgent_threshold > self.urgency.critical_threshold {
            return Err(ConfigError::Invalid(
                "urgency.urgent_threshold must not exceed urgency.critical_threshold".into(),
            ));
        }
        if self.hazard.critical_boost < 1.0 || !self.hazard.critical_boost.is_finite() {
            return Err(ConfigError::Invalid(
                "hazard.critical_boost must be a finite value >= 1.0".into(),
            ));
        }
        if self.categories.is_empty() {
            return Err(ConfigError::Invalid("categories table is empty".into()));
        }
        for entry in &self.categories {
            if entry.high.is_empty() && entry.medium.is_empty() && entry.low.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "category '{}' has no keywords",
                    entry.category
                )));
            }
        }
        if self.consent.ttl_hours <= 0 {
            return Err(ConfigError::Invalid(
                "consent.ttl_hours must be positive".into(),
            ));
        }
        Ok(())
    }

    /// The candidate label set for zero-shot classification.
    pub fn candidate_labels(&self) -> Vec<String> {
        Category::ALL.iter().map(|c| c.as_label().to_string()).collect()
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

fn default_category_tables() -> Vec<CategoryKeywords> {
    vec![
        CategoryKeywords {
            category: Category::WaterIssue,
            high: words(&["burst", "water pipe", "flooding"]),
            medium: words(&["water"]),
            low: words(&["tap"]),
        },
        CategoryKeywords {
            category: Category::ElectricityIssue,
            high: words(&["live wire", "power cut", "transformer", "electric shock"]),
            medium: words(&["electricity", "power", "voltage"]),
            low: words(&["meter"]),
        },
        CategoryKeywords {
            category: Category::RoadIssue,
            high: words(&["pothole", "road damaged", "road caved"]),
            medium: words(&["road", "street", "pavement"]),
            low: words(&["traffic"]),
        },
        CategoryKeywords {
            category: Category::GarbageIssue,
            high: words(&["garbage not collected", "garbage dump", "trash pile"]),
            medium: words(&["garbage", "trash", "waste", "litter"]),
            low: words(&["dirty"]),
        },
        CategoryKeywords {
            category: Category::SewageIssue,
            high: words(&["sewage overflow", "open manhole", "blocked drain"]),
            medium: words(&["sewage", "drain", "gutter"]),
            low: words(&["stink"]),
        },
        CategoryKeywords {
            category: Category::StreetlightIssue,
            high: words(&["street light not working", "streetlight broken", "lamp post"]),
            medium: words(&["streetlight", "street light"]),
            low: words(&["dark"]),
        },
        CategoryKeywords {
            category: Category::SafetyHazard,
            high: words(&["unsafe", "dangerous", "accident prone"]),
            medium: words(&["safety", "hazard", "threat"]),
            low: words(&["worried", "scared"]),
        },
        CategoryKeywords {
            category: Category::EnvironmentalIssue,
            high: words(&["pollution", "toxic", "air quality"]),
            medium: words(&["smoke", "dust", "burning"]),
            low: words(&["environment"]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        TriageConfig::default().validate().unwrap();
    }

    #[test]
    fn test_every_category_has_a_table() {
        let config = TriageConfig::default();
        for category in Category::ALL {
            assert!(
                config.categories.iter().any(|e| e.category == category),
                "missing keyword table for {category}"
            );
        }
    }

    #[test]
    fn test_candidate_labels_match_category_set() {
        let labels = TriageConfig::default().candidate_labels();
        assert_eq!(labels.len(), Category::ALL.len());
        assert!(labels.contains(&"water issue".to_string()));
    }

    #[test]
    fn test_yaml_overlay_replaces_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("triage.yml");
        std::fs::write(
            &path,
            "trust:\n  anonymous: 0.2\n  registered: 0.9\nconsent:\n  ttl_hours: 48\n",
        )
        .unwrap();

        let config = TriageConfig::load(&path).unwrap();
        assert_eq!(config.trust.anonymous, 0.2);
        assert_eq!(config.consent.ttl_hours, 48);
        // Untouched sections keep their defaults
        assert_eq!(config.urgency.sentiment, 0.4);
        assert!(!config.categories.is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("triage.yml");
        std::fs::write(&path, "trust: [not, a, map").unwrap();
        assert!(matches!(
            TriageConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_out_of_range_weight_rejected() {
        let mut config = TriageConfig::default();
        config.urgency.sentiment = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut config = TriageConfig::default();
        config.urgency.urgent_threshold = 0.95;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
