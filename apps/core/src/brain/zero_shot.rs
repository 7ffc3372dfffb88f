//! Statistical intent classification via an external zero-shot endpoint.
//!
//! The capability receives the message, the fixed label set and a task
//! instruction, and answers with a ranked label list. Any failure — transport,
//! timeout, non-2xx status, unusable ranking — surfaces as
//! [`AppError::Classification`]; the router owns the fallback to `simple`.

use crate::brain::intent::{Classification, Intent, INTENT_LABELS};
use crate::brain::IntentClassifier;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Task instruction sent alongside the label set.
pub const INSTRUCTION: &str = "Classifie le message utilisateur dans l'une des catégories \
suivantes : image, document, aide, simple. Réponds uniquement par le label correspondant.";

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    text: &'a str,
    labels: Vec<&'static str>,
    instruction: &'static str,
}

/// Ranked answer: `labels[0]` is the top candidate, `scores` is parallel.
#[derive(Debug, Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
    scores: Vec<f32>,
}

/// Client for the zero-shot classification capability.
pub struct ZeroShotClassifier {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
    request_timeout: Duration,
}

impl ZeroShotClassifier {
    pub fn new(endpoint: String, api_token: Option<String>, request_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_token,
            request_timeout,
        }
    }
}

#[async_trait]
impl IntentClassifier for ZeroShotClassifier {
    async fn classify(&self, message: &str) -> Result<Classification, AppError> {
        let payload = ZeroShotRequest {
            text: message,
            labels: INTENT_LABELS.iter().map(Intent::label).collect(),
            instruction: INSTRUCTION,
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = timeout(self.request_timeout, request.send())
            .await
            .map_err(|_| {
                AppError::Classification(format!(
                    "zero-shot endpoint did not answer within {:?}",
                    self.request_timeout
                ))
            })?
            .map_err(|e| AppError::Classification(format!("zero-shot request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Classification(format!(
                "zero-shot endpoint returned {}",
                response.status()
            )));
        }

        let body: ZeroShotResponse = response
            .json()
            .await
            .map_err(|e| AppError::Classification(format!("unreadable ranking: {}", e)))?;

        let top = body
            .labels
            .first()
            .ok_or_else(|| AppError::Classification("empty label ranking".to_string()))?;
        let intent = Intent::from_label(top)
            .ok_or_else(|| AppError::Classification(format!("unknown label '{}'", top)))?;

        let scores: HashMap<Intent, f32> = body
            .labels
            .iter()
            .zip(body.scores.iter())
            .filter_map(|(label, score)| Intent::from_label(label).map(|i| (i, *score)))
            .collect();

        debug!(%intent, "zero-shot classification");
        Ok(Classification {
            intent,
            scores: Some(scores),
        })
    }

    fn name(&self) -> &'static str {
        "zero_shot"
    }
}
