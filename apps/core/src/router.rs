//! Intent router: classify, override, dispatch.
//!
//! Every message that reaches [`IntentRouter::route`] gets a well-formed
//! envelope back. Degradable failures (classification, image generation)
//! never escape: they turn into the safest route or into textual content.
//! Input validation is the caller's job; the router assumes a non-empty
//! message.

use crate::brain::{Intent, IntentClassifier, OverrideEngine};
use crate::capabilities::ImageGenerator;
use crate::corpus::Corpus;
use crate::retrieval::SimilarityRetriever;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Fixed help text for the `aide` route.
pub const HELP_TEXT: &str = "Voici la FAQ ou l'aide du chatbot. (Réponse simulée)";
/// Fixed generic text for the `simple` route.
pub const SIMPLE_TEXT: &str = "Réponse simple locale.";
/// Fixed message when retrieval finds nothing relevant.
pub const NO_DOCUMENT_TEXT: &str = "Aucun document pertinent trouvé pour votre question.";

/// Payload kind of a routed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Text,
    Image,
}

/// Observability metadata attached to every response.
///
/// `intent` is the RAW classifier output and `router_decision` the FINAL
/// post-override decision; both are kept so override behavior stays auditable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub user_id: String,
    pub intent: Intent,
    pub router_decision: String,
    pub request_id: Uuid,
    /// Which classifier implementation produced the raw intent.
    pub classifier: String,
    pub routing_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Structured envelope returned to the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterResponse {
    pub response: String,
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    pub metadata: ResponseMetadata,
}

/// Process-lifetime routing counters.
#[derive(Debug, Default)]
pub struct RouterMetrics {
    total_requests: AtomicU64,
    image: AtomicU64,
    document: AtomicU64,
    aide: AtomicU64,
    simple: AtomicU64,
}

impl RouterMetrics {
    fn record(&self, decision: Intent) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        let counter = match decision {
            Intent::Image => &self.image,
            Intent::Document => &self.document,
            Intent::Aide => &self.aide,
            Intent::Simple => &self.simple,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            image: self.image.load(Ordering::Relaxed),
            document: self.document.load(Ordering::Relaxed),
            aide: self.aide.load(Ordering::Relaxed),
            simple: self.simple.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the routing counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub image: u64,
    pub document: u64,
    pub aide: u64,
    pub simple: u64,
}

/// Orchestrates classifier → overrides → dispatch.
///
/// All collaborators are injected at construction; the router holds only
/// read-only shared state and can serve concurrent requests.
pub struct IntentRouter {
    classifier: Arc<dyn IntentClassifier>,
    overrides: OverrideEngine,
    retriever: SimilarityRetriever,
    corpus: Corpus,
    image: Arc<dyn ImageGenerator>,
    metrics: RouterMetrics,
}

impl IntentRouter {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        overrides: OverrideEngine,
        retriever: SimilarityRetriever,
        corpus: Corpus,
        image: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            classifier,
            overrides,
            retriever,
            corpus,
            image,
            metrics: RouterMetrics::default(),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Routes one message and always returns a well-formed envelope.
    pub async fn route(&self, message: &str, user_id: &str) -> RouterResponse {
        let started = Instant::now();
        let request_id = Uuid::new_v4();

        // Classification failure is non-fatal: degrade to the simple route.
        let raw_intent = match self.classifier.classify(message).await {
            Ok(classification) => classification.intent,
            Err(e) => {
                warn!(%request_id, "Classification failed, falling back to simple: {}", e);
                Intent::Simple
            }
        };

        let decision = self.overrides.apply(message, raw_intent);

        let (response, kind) = match decision {
            Intent::Image => match self.image.generate(message).await {
                Ok(reference) => (reference, ResponseKind::Image),
                // Generation failures are content, never transport errors.
                Err(e) => (
                    format!("Erreur lors de la génération d'image : {}", e),
                    ResponseKind::Image,
                ),
            },
            Intent::Document => {
                let text = match self.retriever.retrieve(message, &self.corpus) {
                    Some(hit) => format!(
                        "Réponse extraite du document '{}' : {}",
                        hit.document_id, hit.excerpt
                    ),
                    None => NO_DOCUMENT_TEXT.to_string(),
                };
                (text, ResponseKind::Text)
            }
            Intent::Aide => (HELP_TEXT.to_string(), ResponseKind::Text),
            Intent::Simple => (SIMPLE_TEXT.to_string(), ResponseKind::Text),
        };

        self.metrics.record(decision);
        info!(
            %request_id,
            user_id,
            message,
            raw_intent = raw_intent.label(),
            decision = decision.decision(),
            "Router decision"
        );

        RouterResponse {
            response,
            kind,
            metadata: ResponseMetadata {
                user_id: user_id.to_string(),
                intent: raw_intent,
                router_decision: decision.decision().to_string(),
                request_id,
                classifier: self.classifier.name().to_string(),
                routing_ms: started.elapsed().as_millis() as u64,
                timestamp: Utc::now(),
            },
        }
    }
}
