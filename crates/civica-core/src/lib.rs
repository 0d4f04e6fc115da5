//! # civica-core
//!
//! Core triage functionality for the Civica complaint engine.
//!
//! This crate provides:
//! - The triage pipeline: hazard scoring, keyword category matching,
//!   AI classification with bounded retry, urgency calculation, and
//!   authority routing
//! - The complaint-status lifecycle state machine
//! - The identity-consent workflow with single-use, time-limited tokens
//! - Configuration loading into one immutable structure
//! - An audit trail for consent and lifecycle events

pub mod audit;
pub mod classifier;
pub mod config;
pub mod consent;
pub mod hazard;
pub mod keywords;
pub mod lifecycle;
pub mod orchestrator;
pub mod router;
pub mod trust;
pub mod urgency;

pub use audit::AuditLogger;
pub use classifier::{
    AiClassifier, CategorySignal, ClassifierTransport, HttpClassifierTransport, LabelScore,
    SentimentSignal, TransportError,
};
pub use config::{
    CategoryKeywords, ClassifierSettings, ConfidenceRules, ConfigError, ConsentSettings,
    HazardTables, TriageConfig, TrustScores, UrgencyWeights,
};
pub use consent::ConsentWorkflow;
pub use hazard::HazardScorer;
pub use keywords::{KeywordMatch, KeywordMatcher};
pub use lifecycle::{transition, StatusChange};
pub use orchestrator::TriageOrchestrator;
pub use router::AuthorityRouter;
pub use trust::{FixedTrustScorer, TrustScorer};
pub use urgency::UrgencyCalculator;
