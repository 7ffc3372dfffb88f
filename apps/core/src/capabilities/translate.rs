//! Translation capability client.

use crate::capabilities::Translator;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'static str,
    target: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Client for an HTTP translation endpoint (LibreTranslate-style contract).
pub struct HttpTranslator {
    client: Client,
    endpoint: String,
    request_timeout: Duration,
}

impl HttpTranslator {
    pub fn new(endpoint: String, request_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            request_timeout,
        }
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, AppError> {
        let payload = TranslateRequest {
            q: text,
            source: "auto",
            target: target_lang,
        };
        let response = timeout(
            self.request_timeout,
            self.client.post(&self.endpoint).json(&payload).send(),
        )
        .await??;

        if !response.status().is_success() {
            return Err(AppError::Capability(format!(
                "translation endpoint returned {}",
                response.status()
            )));
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Capability(format!("unreadable translation: {}", e)))?;
        Ok(body.translated_text)
    }
}

/// Identity translator used when no endpoint is configured.
pub struct NoopTranslator;

#[async_trait]
impl Translator for NoopTranslator {
    async fn translate(&self, text: &str, _target_lang: &str) -> Result<String, AppError> {
        Ok(text.to_string())
    }
}
