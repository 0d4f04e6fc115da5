//! Deterministic keyword category matcher.
//!
//! Scores complaint text against per-category tiered keyword tables and
//! applies the specific-over-generic precedence rule. Keyword evidence is
//! treated as higher-trust than a low-confidence AI guess, which is why the
//! confidence floors here sit above the classifier's acceptance bar.

use crate::config::{CategoryKeywords, ConfidenceRules, TriageConfig};
use civica_proto::Category;
use tracing::debug;

/// Weight of a high-tier keyword match.
pub const HIGH_WEIGHT: u32 = 3;
/// Weight of a medium-tier keyword match.
pub const MEDIUM_WEIGHT: u32 = 2;
/// Weight of a low-tier keyword match.
pub const LOW_WEIGHT: u32 = 1;

/// A category determined from keyword evidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordMatch {
    pub category: Category,
    /// Confidence in [0, 1], already floored.
    pub confidence: f32,
    /// The raw weighted score, kept for logging and tie-break inspection.
    pub score: u32,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    category: Category,
    score: u32,
    max_possible: u32,
}

/// Matches complaint text against the category keyword tables.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    tables: Vec<CategoryKeywords>,
    rules: ConfidenceRules,
}

impl KeywordMatcher {
    /// Creates a matcher over the configured tables.
    pub fn new(config: &TriageConfig) -> Self {
        Self {
            tables: config.categories.clone(),
            rules: config.confidence.clone(),
        }
    }

    /// Classifies the text, or returns `None` when no keyword matched.
    ///
    /// Precedence: the best specific domain wins outright at score >=
    /// `specific_win_score`; below that, a strictly-higher-scoring generic
    /// domain wins with the lower confidence floor. Equal scores resolve
    /// to the earlier table entry.
    pub fn classify(&self, text: &str) -> Option<KeywordMatch> {
        let lower = text.to_lowercase();

        let mut best_specific: Option<Candidate> = None;
        let mut best_generic: Option<Candidate> = None;

        for entry in &self.tables {
            let score = score_entry(&lower, entry);
            if score == 0 {
                continue;
            }
            let candidate = Candidate {
                category: entry.category,
                score,
                max_possible: max_possible(entry),
            };
            let slot = if entry.category.is_specific() {
                &mut best_specific
            } else {
                &mut best_generic
            };
            // Strict comparison keeps the first entry on ties
            if slot.map_or(true, |c| candidate.score > c.score) {
                *slot = Some(candidate);
            }
        }

        let (winner, floor) = match (best_specific, best_generic) {
            (Some(s), _) if s.score >= self.rules.specific_win_score => {
                (s, self.rules.keyword_floor)
            }
            (Some(s), Some(g)) if g.score > s.score => {
                (g, self.rules.generic_override_floor)
            }
            (Some(s), _) => (s, self.rules.keyword_floor),
            (None, Some(g)) => (g, self.rules.keyword_floor),
            (None, None) => return None,
        };

        let denominator = (winner.max_possible as f32).max(self.rules.min_denominator);
        let confidence = (winner.score as f32 / denominator).min(1.0).max(floor);

        debug!(
            "keyword match: category={} score={} confidence={:.2}",
            winner.category, winner.score, confidence
        );

        Some(KeywordMatch {
            category: winner.category,
            confidence,
            score: winner.score,
        })
    }
}

/// Weighted score of one category table against lowercased text.
///
/// Low-tier keywords are a last-resort signal: they count only when no
/// high- or medium-tier keyword of the same category matched.
fn score_entry(lower_text: &str, entry: &CategoryKeywords) -> u32 {
    let hits = |keywords: &[String], weight: u32| -> u32 {
        keywords
            .iter()
            .filter(|kw| lower_text.contains(kw.to_lowercase().as_str()))
            .count() as u32
            * weight
    };

    let strong = hits(&entry.high, HIGH_WEIGHT) + hits(&entry.medium, MEDIUM_WEIGHT);
    if strong > 0 {
        strong
    } else {
        hits(&entry.low, LOW_WEIGHT)
    }
}

fn max_possible(entry: &CategoryKeywords) -> u32 {
    HIGH_WEIGHT * entry.high.len() as u32
        + MEDIUM_WEIGHT * entry.medium.len() as u32
        + LOW_WEIGHT * entry.low.len() as u32
}
