// CRF Chatbot Routing Core entry point.
// Thin glue: configuration, corpus load, dependency injection, stdin loop.

mod brain;
mod capabilities;
mod config;
mod corpus;
mod error;
mod retrieval;
mod router;
#[cfg(test)]
mod tests;

use anyhow::Context;
use brain::{IntentClassifier, KeywordClassifier, OverrideEngine, ZeroShotClassifier};
use capabilities::{
    HttpTranslator, ImageGenerator, NoopTranslator, StabilityImageClient, Translator,
    UnconfiguredImageGenerator,
};
use config::AppConfig;
use corpus::Corpus;
use retrieval::SimilarityRetriever;
use router::IntentRouter;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

fn init_tracing() {
    use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Log records go to stderr; stdout carries only response envelopes.
    let formatting_layer = BunyanFormattingLayer::new("crfbot-core".to_string(), std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
        .init();
}

fn build_router(config: &AppConfig, corpus: Corpus) -> Result<IntentRouter, error::AppError> {
    let classifier: Arc<dyn IntentClassifier> = match &config.classifier_endpoint {
        Some(endpoint) => Arc::new(ZeroShotClassifier::new(
            endpoint.clone(),
            config.classifier_api_token.clone(),
            config.classifier_timeout(),
        )),
        None => {
            info!("CLASSIFIER_ENDPOINT not set, using the keyword classifier");
            Arc::new(KeywordClassifier::new())
        }
    };

    let overrides = match &config.override_rules_path {
        Some(path) => OverrideEngine::from_file(path)?,
        None => OverrideEngine::default(),
    };

    let translator: Arc<dyn Translator> = match &config.translate_endpoint {
        Some(endpoint) => Arc::new(HttpTranslator::new(
            endpoint.clone(),
            config.translate_timeout(),
        )),
        None => Arc::new(NoopTranslator),
    };

    let image: Arc<dyn ImageGenerator> = match &config.stability_api_key {
        Some(api_key) => Arc::new(StabilityImageClient::new(
            config.stability_endpoint.clone(),
            api_key.clone(),
            config.image_timeout(),
            translator,
        )),
        None => {
            info!("STABILITY_API_KEY not set, image requests will answer with a configuration message");
            Arc::new(UnconfiguredImageGenerator)
        }
    };

    Ok(IntentRouter::new(
        classifier,
        overrides,
        SimilarityRetriever::new(),
        corpus,
        image,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let corpus = Corpus::load(&config.corpus_dir)
        .with_context(|| format!("cannot load corpus from {}", config.corpus_dir.display()))?;
    let router = build_router(&config, corpus).context("cannot assemble router")?;

    let user_id = std::env::var("CHAT_USER_ID").unwrap_or_else(|_| "local".to_string());

    // One message per line on stdin, one JSON envelope per line on stdout.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let message = line.trim();
        // Empty input is rejected here, before the router.
        if message.is_empty() {
            continue;
        }
        let response = router.route(message, &user_id).await;
        println!("{}", serde_json::to_string(&response)?);
    }

    let metrics = router.metrics();
    info!(
        total_requests = metrics.total_requests,
        image = metrics.image,
        document = metrics.document,
        aide = metrics.aide,
        simple = metrics.simple,
        "Shutting down"
    );
    Ok(())
}
