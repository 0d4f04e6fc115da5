//! Triage orchestration.
//!
//! Sequences the scorers and classifiers for one complaint submission and
//! assembles the immutable `TriageResult`. Stateless across invocations:
//! each call is independent, so arbitrarily many may run in parallel. The
//! only side effects are the outbound classifier calls; nothing persists.

use crate::classifier::{AiClassifier, ClassifierTransport};
use crate::config::TriageConfig;
use crate::hazard::HazardScorer;
use crate::keywords::KeywordMatcher;
use crate::router::AuthorityRouter;
use crate::trust::{FixedTrustScorer, TrustScorer};
use crate::urgency::UrgencyCalculator;
use civica_proto::{Category, TriageInput, TriageResult};
use std::sync::Arc;
use tracing::{debug, info};

/// Message surfaced when no category could be determined.
const MANUAL_CATEGORY_MESSAGE: &str =
    "category could not be determined; manual selection required";

/// Runs the full triage pipeline for one complaint.
pub struct TriageOrchestrator {
    hazard: HazardScorer,
    keywords: KeywordMatcher,
    classifier: AiClassifier,
    trust: Box<dyn TrustScorer>,
    urgency: UrgencyCalculator,
    router: AuthorityRouter,
}

impl TriageOrchestrator {
    /// Builds the pipeline from configuration and a classifier transport.
    pub fn new(config: &TriageConfig, transport: Arc<dyn ClassifierTransport>) -> Self {
        Self {
            hazard: HazardScorer::new(&config.hazard),
            keywords: KeywordMatcher::new(config),
            classifier: AiClassifier::new(config, transport),
            trust: Box::new(FixedTrustScorer::new(&config.trust)),
            urgency: UrgencyCalculator::new(&config.urgency),
            router: AuthorityRouter::new(),
        }
    }

    /// Replaces the trust scorer.
    #[must_use]
    pub fn with_trust_scorer(mut self, trust: Box<dyn TrustScorer>) -> Self {
        self.trust = trust;
        self
    }

    /// Triages one complaint and returns the assembled result.
    ///
    /// The local scorers run first; the two classifier calls run
    /// concurrently, and urgency is computed only once every signal is in.
    /// Final category precedence: caller override, then keyword match,
    /// then AI classification, then an explicit abstention.
    pub async fn triage(&self, input: &TriageInput) -> TriageResult {
        debug!("triaging complaint ({} chars)", input.text.len());

        let hazard_score = self.hazard.score(&input.text);
        let keyword_match = self.keywords.classify(&input.text);

        let (sentiment, ai_category) = tokio::join!(
            self.classifier.sentiment(&input.text),
            self.classifier.classify(&input.text),
        );

        let override_label = input
            .category_override
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty());

        // (routing label, closed-set category, confidence)
        let (category_label, category, category_confidence) = if let Some(label) = override_label {
            // Caller picked the category; deterministic, full confidence.
            // An off-list label still routes by substring but is not forced
            // into the closed set.
            (Some(label.to_string()), Category::parse(label), 1.0)
        } else if let Some(matched) = keyword_match {
            (
                Some(matched.category.as_label().to_string()),
                Some(matched.category),
                matched.confidence,
            )
        } else if let Some(ai) = ai_category.category {
            (
                Some(ai.as_label().to_string()),
                Some(ai),
                ai_category.confidence,
            )
        } else {
            (None, None, 0.0)
        };

        let needs_manual_category = category_label.is_none();
        let error = if needs_manual_category {
            Some(
                ai_category
                    .error
                    .map_or(MANUAL_CATEGORY_MESSAGE.to_string(), |detail| {
                        format!("{MANUAL_CATEGORY_MESSAGE} ({detail})")
                    }),
            )
        } else {
            None
        };

        let trust_score = self.trust.trust_score(input.trust);
        let urgency_score = self.urgency.score(
            sentiment.score,
            category_confidence,
            hazard_score,
            trust_score,
        );
        let urgency_level = self.urgency.level(urgency_score);
        let assigned_authority = self.router.route(category_label.as_deref());

        info!(
            "triage: category={} urgency={:.2} ({urgency_level}) authority={assigned_authority}",
            category_label.as_deref().unwrap_or("undetermined"),
            urgency_score,
        );

        TriageResult {
            category,
            category_confidence,
            sentiment: sentiment.sentiment,
            sentiment_score: sentiment.score,
            hazard_score,
            urgency_score,
            urgency_level,
            trust_score,
            assigned_authority,
            needs_manual_category,
            error,
        }
    }
}
