//! External AI classification glue.
//!
//! Two independent signals come from the external text-classification
//! service: a sentiment label and a zero-shot category guess. Transport is
//! behind a trait so tests never touch the network. Both calls share the
//! same retry rule: a "model is loading" error earns exactly one retry
//! after a fixed backoff; everything else falls back immediately.
//!
//! Fallbacks are asymmetric on purpose. Sentiment only influences urgency,
//! so it silently degrades to neutral. Category determines routing, so it
//! must abstain rather than guess.

use crate::config::TriageConfig;
use async_trait::async_trait;
use civica_proto::{Category, Sentiment};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One label/score pair returned by the classification service.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Transport-level classification failures.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The service is still loading the model and asked us to retry later.
    #[error("model is loading")]
    ModelLoading,

    /// Any other failure: network, HTTP status, malformed body.
    #[error("classifier request failed: {0}")]
    Failed(String),
}

/// Raw access to the external classification service.
#[async_trait]
pub trait ClassifierTransport: Send + Sync {
    /// Sentiment classification: graded label/score pairs.
    async fn sentiment(&self, text: &str) -> Result<Vec<LabelScore>, TransportError>;

    /// Zero-shot classification of `text` against `labels`.
    async fn zero_shot(
        &self,
        text: &str,
        labels: &[String],
    ) -> Result<Vec<LabelScore>, TransportError>;
}

/// Sentiment signal fed into the urgency formula. Never fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentSignal {
    pub sentiment: Sentiment,
    pub score: f32,
    /// True when the service failed and the neutral default was used.
    pub degraded: bool,
}

impl SentimentSignal {
    /// The deterministic fallback used after classification failure.
    pub fn neutral_fallback() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            score: 0.5,
            degraded: true,
        }
    }
}

/// Category signal from the zero-shot classifier.
///
/// An abstention carries no category and zero confidence; the caller
/// surfaces it as a request for manual selection.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySignal {
    pub category: Option<Category>,
    pub confidence: f32,
    pub error: Option<String>,
}

impl CategorySignal {
    fn abstain(reason: impl Into<String>) -> Self {
        Self {
            category: None,
            confidence: 0.0,
            error: Some(reason.into()),
        }
    }
}

/// The retry/interpretation layer over a classification transport.
pub struct AiClassifier {
    transport: Arc<dyn ClassifierTransport>,
    labels: Vec<String>,
    backoff: Duration,
    accept_score: f32,
    plurality_score: f32,
}

impl AiClassifier {
    /// Creates a classifier from configuration and a transport.
    pub fn new(config: &TriageConfig, transport: Arc<dyn ClassifierTransport>) -> Self {
        Self {
            transport,
            labels: config.candidate_labels(),
            backoff: Duration::from_secs(config.classifier.retry_backoff_secs),
            accept_score: config.classifier.accept_score,
            plurality_score: config.classifier.plurality_score,
        }
    }

    /// Classifies sentiment, degrading to the neutral default on failure.
    pub async fn sentiment(&self, text: &str) -> SentimentSignal {
        let outcome = match self.transport.sentiment(text).await {
            Err(TransportError::ModelLoading) => {
                info!(
                    "sentiment model loading, retrying once in {}s",
                    self.backoff.as_secs()
                );
                tokio::time::sleep(self.backoff).await;
                self.transport.sentiment(text).await
            }
            other => other,
        };

        match outcome {
            Ok(pairs) => interpret_sentiment(&pairs).unwrap_or_else(|| {
                warn!("sentiment response had no recognizable label, using neutral default");
                SentimentSignal::neutral_fallback()
            }),
            Err(err) => {
                warn!("sentiment classification failed ({err}), using neutral default");
                SentimentSignal::neutral_fallback()
            }
        }
    }

    /// Classifies the category, abstaining on failure or low confidence.
    pub async fn classify(&self, text: &str) -> CategorySignal {
        let outcome = match self.transport.zero_shot(text, &self.labels).await {
            Err(TransportError::ModelLoading) => {
                info!(
                    "zero-shot model loading, retrying once in {}s",
                    self.backoff.as_secs()
                );
                tokio::time::sleep(self.backoff).await;
                self.transport.zero_shot(text, &self.labels).await
            }
            other => other,
        };

        match outcome {
            Ok(pairs) => interpret_category(&pairs, self.accept_score, self.plurality_score),
            Err(err) => {
                warn!("zero-shot classification failed: {err}");
                CategorySignal::abstain(format!("classification service unavailable: {err}"))
            }
        }
    }
}

/// Picks the winning sentiment label, or `None` if nothing parses.
fn interpret_sentiment(pairs: &[LabelScore]) -> Option<SentimentSignal> {
    let top = top_pair(pairs)?;
    let sentiment = Sentiment::parse(&top.label)?;
    Some(SentimentSignal {
        sentiment,
        score: top.score.clamp(0.0, 1.0),
        degraded: false,
    })
}

/// Applies the acceptance rule to a zero-shot label distribution.
///
/// The top label is accepted at `accept_score` outright, or at
/// `plurality_score` when it strictly beats the runner-up. Anything else
/// is an abstention so the caller can ask for manual selection.
fn interpret_category(pairs: &[LabelScore], accept_score: f32, plurality_score: f32) -> CategorySignal {
    let Some(top) = top_pair(pairs) else {
        return CategorySignal::abstain("classifier returned no labels");
    };
    let second_best = pairs
        .iter()
        .filter(|p| !std::ptr::eq(*p, top))
        .map(|p| p.score)
        .fold(0.0_f32, f32::max);

    let accepted = top.score >= accept_score
        || (top.score >= plurality_score && top.score > second_best);
    if !accepted {
        debug!(
            "zero-shot abstained: top='{}' ({:.2}) second={:.2}",
            top.label, top.score, second_best
        );
        return CategorySignal::abstain(format!(
            "classifier confidence too low ({:.2} for '{}')",
            top.score, top.label
        ));
    }

    match Category::parse(&top.label) {
        Some(category) => CategorySignal {
            category: Some(category),
            confidence: top.score.clamp(0.0, 1.0),
            error: None,
        },
        None => CategorySignal::abstain(format!("classifier returned unknown label '{}'", top.label)),
    }
}

fn top_pair(pairs: &[LabelScore]) -> Option<&LabelScore> {
    pairs
        .iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
}

/// HTTP transport for inference-API style classification endpoints.
///
/// A "model is loading" reply (HTTP 503 with an `estimated_time` body) is
/// surfaced as `TransportError::ModelLoading` so the caller can apply its
/// single-retry rule.
pub struct HttpClassifierTransport {
    client: reqwest::Client,
    sentiment_url: String,
    zero_shot_url: String,
    api_token: Option<String>,
}

impl HttpClassifierTransport {
    /// Builds the transport from classifier settings.
    pub fn new(settings: &crate::config::ClassifierSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| TransportError::Failed(e.to_string()))?;
        Ok(Self {
            client,
            sentiment_url: settings.sentiment_url.clone(),
            zero_shot_url: settings.zero_shot_url.clone(),
            api_token: settings.api_token.clone(),
        })
    }

    /// The configured sentiment endpoint.
    pub fn sentiment_url(&self) -> &str {
        &self.sentiment_url
    }

    /// The configured zero-shot endpoint.
    pub fn zero_shot_url(&self) -> &str {
        &self.zero_shot_url
    }

    /// Checks that an endpoint answers HTTP at all.
    ///
    /// Any HTTP status counts as reachable (503 means the model is cold,
    /// not that the service is down); only connection-level failures error.
    pub async fn ping(&self, url: &str) -> Result<(), TransportError> {
        self.client
            .get(url)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| TransportError::Failed(e.to_string()))
    }

    async fn post_json(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError> {
        let mut request = self.client.post(url).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Failed(e.to_string()))?;

        let status = response.status();
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TransportError::Failed(e.to_string()))?;

        if is_model_loading(status, &payload) {
            return Err(TransportError::ModelLoading);
        }
        if !status.is_success() {
            let detail = payload
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("unknown error");
            return Err(TransportError::Failed(format!("HTTP {status}: {detail}")));
        }

        Ok(payload)
    }
}

#[async_trait]
impl ClassifierTransport for HttpClassifierTransport {
    async fn sentiment(&self, text: &str) -> Result<Vec<LabelScore>, TransportError> {
        let payload = self
            .post_json(&self.sentiment_url, json!({ "inputs": text }))
            .await?;

        // Graded classification responds with a nested array of
        // {label, score} objects; take the first prediction set.
        let predictions = payload
            .as_array()
            .and_then(|outer| outer.first())
            .and_then(|inner| inner.as_array())
            .ok_or_else(|| TransportError::Failed("unexpected sentiment response shape".into()))?;

        let pairs = predictions
            .iter()
            .filter_map(|entry| {
                let label = entry.get("label")?.as_str()?;
                let score = entry.get("score")?.as_f64()?;
                Some(LabelScore::new(label, score as f32))
            })
            .collect();
        Ok(pairs)
    }

    async fn zero_shot(
        &self,
        text: &str,
        labels: &[String],
    ) -> Result<Vec<LabelScore>, TransportError> {
        let payload = self
            .post_json(
                &self.zero_shot_url,
                json!({
                    "inputs": text,
                    "parameters": { "candidate_labels": labels },
                }),
            )
            .await?;

        // Zero-shot responds with parallel `labels` and `scores` arrays.
        let label_list = payload
            .get("labels")
            .and_then(|l| l.as_array())
            .ok_or_else(|| TransportError::Failed("zero-shot response missing labels".into()))?;
        let score_list = payload
            .get("scores")
            .and_then(|s| s.as_array())
            .ok_or_else(|| TransportError::Failed("zero-shot response missing scores".into()))?;

        let pairs = label_list
            .iter()
            .zip(score_list.iter())
            .filter_map(|(label, score)| {
                Some(LabelScore::new(label.as_str()?, score.as_f64()? as f32))
            })
            .collect();
        Ok(pairs)
    }
}

fn is_model_loading(status: reqwest::StatusCode, payload: &serde_json::Value) -> bool {
    if status != reqwest::StatusCode::SERVICE_UNAVAILABLE {
        return false;
    }
    payload.get("estimated_time").is_some()
        || payload
            .get("error")
            .and_then(|e| e.as_str())
            .is_some_and(|msg| msg.to_lowercase().contains("loading"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TriageConfig;
    use std::sync::Mutex;

    /// Scripted transport: each call pops the next canned outcome.
    struct ScriptedTransport {
        sentiment: Mutex<Vec<Result<Vec<LabelScore>, TransportError>>>,
        zero_shot: Mutex<Vec<Result<Vec<LabelScore>, TransportError>>>,
    }

    impl ScriptedTransport {
        fn new(
            sentiment: Vec<Result<Vec<LabelScore>, TransportError>>,
            zero_shot: Vec<Result<Vec<LabelScore>, TransportError>>,
        ) -> Self {
            Self {
                sentiment: Mutex::new(sentiment),
                zero_shot: Mutex::new(zero_shot),
            }
        }
    }

    #[async_trait]
    impl ClassifierTransport for ScriptedTransport {
        async fn sentiment(&self, _text: &str) -> Result<Vec<LabelScore>, TransportError> {
            let mut queue = self.sentiment.lock().unwrap();
            if queue.is_empty() {
                return Err(TransportError::Failed("script exhausted".into()));
            }
            queue.remove(0)
        }

        async fn zero_shot(
            &self,
            _text: &str,
            _labels: &[String],
        ) -> Result<Vec<LabelScore>, TransportError> {
            let mut queue = self.zero_shot.lock().unwrap();
            if queue.is_empty() {
                return Err(TransportError::Failed("script exhausted".into()));
            }
            queue.remove(0)
        }
    }

    fn classifier(transport: ScriptedTransport) -> AiClassifier {
        let mut config = TriageConfig::default();
        config.classifier.retry_backoff_secs = 0;
        AiClassifier::new(&config, Arc::new(transport))
    }

    #[tokio::test]
    async fn test_sentiment_picks_top_label() {
        let transport = ScriptedTransport::new(
            vec![Ok(vec![
                LabelScore::new("negative", 0.92),
                LabelScore::new("neutral", 0.06),
                LabelScore::new("positive", 0.02),
            ])],
            vec![],
        );
        let signal = classifier(transport).sentiment("the drain stinks").await;
        assert_eq!(signal.sentiment, Sentiment::Negative);
        assert!((signal.score - 0.92).abs() < 1e-6);
        assert!(!signal.degraded);
    }

    #[tokio::test]
    async fn test_sentiment_retries_once_on_model_loading() {
        let transport = ScriptedTransport::new(
            vec![
                Err(TransportError::ModelLoading),
                Ok(vec![LabelScore::new("positive", 0.8)]),
            ],
            vec![],
        );
        let signal = classifier(transport).sentiment("lovely new park").await;
        assert_eq!(signal.sentiment, Sentiment::Positive);
        assert!(!signal.degraded);
    }

    #[tokio::test]
    async fn test_sentiment_falls_back_after_second_loading_error() {
        let transport = ScriptedTransport::new(
            vec![
                Err(TransportError::ModelLoading),
                Err(TransportError::ModelLoading),
            ],
            vec![],
        );
        let signal = classifier(transport).sentiment("whatever").await;
        assert_eq!(signal, SentimentSignal::neutral_fallback());
    }

    #[tokio::test]
    async fn test_sentiment_does_not_retry_other_errors() {
        // A single non-loading failure, then a would-be success that must
        // never be reached: no retry for plain failures.
        let transport = ScriptedTransport::new(
            vec![
                Err(TransportError::Failed("boom".into())),
                Ok(vec![LabelScore::new("positive", 0.9)]),
            ],
            vec![],
        );
        let signal = classifier(transport).sentiment("whatever").await;
        assert!(signal.degraded);
        assert_eq!(signal.sentiment, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn test_classify_accepts_clear_winner() {
        let transport = ScriptedTransport::new(
            vec![],
            vec![Ok(vec![
                LabelScore::new("water issue", 0.81),
                LabelScore::new("sewage issue", 0.12),
            ])],
        );
        let signal = classifier(transport).classify("pipe burst").await;
        assert_eq!(signal.category, Some(Category::WaterIssue));
        assert!(signal.error.is_none());
    }

    #[tokio::test]
    async fn test_classify_accepts_moderate_plurality() {
        let transport = ScriptedTransport::new(
            vec![],
            vec![Ok(vec![
                LabelScore::new("road issue", 0.42),
                LabelScore::new("garbage issue", 0.30),
            ])],
        );
        let signal = classifier(transport).classify("something about the street").await;
        assert_eq!(signal.category, Some(Category::RoadIssue));
    }

    #[tokio::test]
    async fn test_classify_abstains_on_ambiguous_distribution() {
        // Top label below 0.5 and tied with the runner-up: no clear plurality.
        let transport = ScriptedTransport::new(
            vec![],
            vec![Ok(vec![
                LabelScore::new("road issue", 0.34),
                LabelScore::new("garbage issue", 0.34),
            ])],
        );
        let signal = classifier(transport).classify("unclear").await;
        assert_eq!(signal.category, None);
        assert_eq!(signal.confidence, 0.0);
        assert!(signal.error.is_some());
    }

    #[tokio::test]
    async fn test_classify_abstains_below_plurality_bar() {
        let transport = ScriptedTransport::new(
            vec![],
            vec![Ok(vec![
                LabelScore::new("road issue", 0.25),
                LabelScore::new("garbage issue", 0.10),
            ])],
        );
        let signal = classifier(transport).classify("unclear").await;
        assert_eq!(signal.category, None);
    }

    #[tokio::test]
    async fn test_classify_abstains_after_transport_failure() {
        let transport = ScriptedTransport::new(
            vec![],
            vec![Err(TransportError::Failed("503".into()))],
        );
        let signal = classifier(transport).classify("whatever").await;
        assert_eq!(signal.category, None);
        assert!(signal.error.unwrap().contains("unavailable"));
    }

    #[tokio::test]
    async fn test_classify_retries_once_then_succeeds() {
        let transport = ScriptedTransport::new(
            vec![],
            vec![
                Err(TransportError::ModelLoading),
                Ok(vec![LabelScore::new("garbage issue", 0.9)]),
            ],
        );
        let signal = classifier(transport).classify("trash pile").await;
        assert_eq!(signal.category, Some(Category::GarbageIssue));
    }

    #[test]
    fn test_model_loading_detection() {
        let loading = serde_json::json!({ "error": "Model is currently loading", "estimated_time": 12.5 });
        assert!(is_model_loading(
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
            &loading
        ));
        let plain_error = serde_json::json!({ "error": "rate limited" });
        assert!(!is_model_loading(
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
            &plain_error
        ));
        assert!(!is_model_loading(reqwest::StatusCode::OK, &loading));
    }

    #[test]
    fn test_interpret_category_unknown_label_abstains() {
        let pairs = vec![LabelScore::new("parking violation", 0.9)];
        let signal = interpret_category(&pairs, 0.5, 0.3);
        assert_eq!(signal.category, None);
        assert!(signal.error.unwrap().contains("unknown label"));
    }
}
