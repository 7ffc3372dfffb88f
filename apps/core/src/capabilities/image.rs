//! Stability.ai image generation client.
//!
//! Prompts are translated to English before being sent; a translation failure
//! degrades to the original prompt, never to an error. Generation failures
//! are capability errors that the router turns into user-facing text.

use crate::capabilities::{ImageGenerator, Translator};
use crate::error::AppError;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

/// Client for the Stability.ai image endpoint.
pub struct StabilityImageClient {
    client: Client,
    endpoint: String,
    api_key: String,
    request_timeout: Duration,
    translator: Arc<dyn Translator>,
}

impl StabilityImageClient {
    pub fn new(
        endpoint: String,
        api_key: String,
        request_timeout: Duration,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
            request_timeout,
            translator,
        }
    }

    async fn anglicized(&self, prompt: &str) -> String {
        match self.translator.translate(prompt, "en").await {
            Ok(translated) => translated,
            Err(e) => {
                warn!("Prompt translation failed, sending original prompt: {}", e);
                prompt.to_string()
            }
        }
    }
}

#[async_trait]
impl ImageGenerator for StabilityImageClient {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let prompt_en = self.anglicized(prompt).await;

        let form = Form::new()
            .text("prompt", prompt_en)
            .text("output_format", "png");
        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .multipart(form);

        let response = timeout(self.request_timeout, request.send()).await??;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        // The endpoint may answer with the raw image despite the Accept header.
        if status.is_success() && content_type.starts_with("image/") {
            let bytes = response.bytes().await?;
            return Ok(format!("data:image/png;base64,{}", BASE64.encode(&bytes)));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            AppError::Capability(format!("image endpoint returned {}: {}", status, e))
        })?;

        if !status.is_success() {
            let detail = body
                .get("message")
                .and_then(|value| value.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| body.to_string());
            return Err(AppError::Capability(format!("Stability.ai: {}", detail)));
        }

        if let Some(reference) = body.get("image").and_then(|value| value.as_str()) {
            return Ok(reference.to_string());
        }
        if let Some(url) = body.pointer("/artifacts/0/url").and_then(|value| value.as_str()) {
            return Ok(url.to_string());
        }
        Err(AppError::Capability(
            "image endpoint returned no image reference".to_string(),
        ))
    }
}

/// Stand-in used when no API key is configured. Always fails with a
/// configuration message; the router surfaces it as content.
pub struct UnconfiguredImageGenerator;

#[async_trait]
impl ImageGenerator for UnconfiguredImageGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, AppError> {
        Err(AppError::Config(
            "clé API Stability.ai non trouvée (variable d'environnement STABILITY_API_KEY)"
                .to_string(),
        ))
    }
}
