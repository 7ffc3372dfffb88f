//! Integration Tests
//!
//! Full pipeline runs: corpus loaded from disk, zero-shot classification and
//! image generation answered by mocked HTTP collaborators.

use crate::brain::{OverrideEngine, ZeroShotClassifier};
use crate::capabilities::{NoopTranslator, StabilityImageClient};
use crate::corpus::Corpus;
use crate::retrieval::SimilarityRetriever;
use crate::router::{IntentRouter, ResponseKind, SIMPLE_TEXT};
use serde_json::json;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_corpus(dir: &std::path::Path) {
    fs::write(
        dir.join("historique.txt"),
        "La Croix-Rouge a été fondée en 1863 par Henry Dunant après la bataille de Solférino.",
    )
    .unwrap();
    fs::write(
        dir.join("missions.txt"),
        "Les missions de la Croix-Rouge : secourir, protéger, former et accompagner.",
    )
    .unwrap();
}

async fn classification_mock(server: &MockServer, top_label: &str) {
    Mock::given(method("POST"))
        .and(path("/classify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "labels": [top_label, "simple"],
            "scores": [0.82, 0.18],
        })))
        .mount(server)
        .await;
}

fn pipeline_router(server: &MockServer, corpus: Corpus) -> IntentRouter {
    let classifier = Arc::new(ZeroShotClassifier::new(
        format!("{}/classify", server.uri()),
        None,
        Duration::from_secs(2),
    ));
    let image = Arc::new(StabilityImageClient::new(
        format!("{}/generate", server.uri()),
        "sk-test".to_string(),
        Duration::from_secs(2),
        Arc::new(NoopTranslator),
    ));
    IntentRouter::new(
        classifier,
        OverrideEngine::default(),
        SimilarityRetriever::new(),
        corpus,
        image,
    )
}

#[tokio::test]
async fn test_document_question_end_to_end() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_corpus(dir.path());
    let corpus = Corpus::load(dir.path()).expect("corpus should load");

    let server = MockServer::start().await;
    classification_mock(&server, "document").await;
    let router = pipeline_router(&server, corpus);

    let envelope = router
        .route("Quelle est l'histoire de la Croix-Rouge ?", "user-7")
        .await;

    assert_eq!(envelope.kind, ResponseKind::Text);
    assert!(envelope
        .response
        .starts_with("Réponse extraite du document 'historique.txt'"));
    assert_eq!(envelope.metadata.router_decision, "rag_search");
    assert_eq!(envelope.metadata.classifier, "zero_shot");
}

#[tokio::test]
async fn test_image_request_end_to_end() {
    let server = MockServer::start().await;
    classification_mock(&server, "image").await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"image": "https://cdn.example/chat.png"})),
        )
        .mount(&server)
        .await;

    let router = pipeline_router(&server, Corpus::default());
    let envelope = router.route("génère une image de chat roux", "user-7").await;

    assert_eq!(envelope.kind, ResponseKind::Image);
    assert_eq!(envelope.response, "https://cdn.example/chat.png");
    assert_eq!(envelope.metadata.router_decision, "image_generation");
}

#[tokio::test]
async fn test_classifier_outage_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let router = pipeline_router(&server, Corpus::default());
    let envelope = router.route("bonjour", "user-7").await;

    // Outage degrades to the simple route, with a complete envelope.
    assert_eq!(envelope.response, SIMPLE_TEXT);
    assert_eq!(envelope.metadata.intent.label(), "simple");
    assert_eq!(envelope.metadata.router_decision, "simple_local_response");
}

#[tokio::test]
async fn test_override_beats_statistical_classifier_end_to_end() {
    let server = MockServer::start().await;
    // The capability misclassifies the short phrase as simple.
    classification_mock(&server, "simple").await;

    let router = pipeline_router(&server, Corpus::default());
    let envelope = router.route("comment ça fonctionne", "user-7").await;

    assert_eq!(envelope.metadata.intent.label(), "simple");
    assert_eq!(envelope.metadata.router_decision, "help_faq");
}

#[tokio::test]
async fn test_empty_corpus_directory_end_to_end() {
    let dir = tempdir().expect("Failed to create temp dir");
    let corpus = Corpus::load(dir.path()).expect("empty corpus should load");
    assert!(corpus.is_empty());

    let server = MockServer::start().await;
    classification_mock(&server, "document").await;
    let router = pipeline_router(&server, corpus);

    let envelope = router.route("parle-moi des documents", "user-7").await;
    assert_eq!(
        envelope.response,
        "Aucun document pertinent trouvé pour votre question."
    );
}
