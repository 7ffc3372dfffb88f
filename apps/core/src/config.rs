//! Environment-driven configuration.
//!
//! All settings come from environment variables (a `.env` file is honored
//! via `dotenv` in `main`). Optional endpoints select which capability
//! implementation gets wired in at startup: no classifier endpoint means
//! the keyword classifier, no Stability key means image requests answer
//! with a configuration message.

use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default Stability.ai endpoint (Stable Diffusion 3).
pub const DEFAULT_STABILITY_ENDPOINT: &str =
    "https://api.stability.ai/v2beta/stable-image/generate/sd3";

const DEFAULT_CORPUS_DIR: &str = "documents";
const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 10;
const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 60;
const DEFAULT_TRANSLATE_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration assembled from the process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory scanned for `.txt` corpus documents at startup.
    pub corpus_dir: PathBuf,
    /// Zero-shot classification endpoint. Absent selects the keyword classifier.
    pub classifier_endpoint: Option<String>,
    /// Optional bearer token for the classification endpoint.
    pub classifier_api_token: Option<String>,
    pub classifier_timeout_secs: u64,
    /// Stability.ai API key. Absent degrades image requests to a configuration message.
    pub stability_api_key: Option<String>,
    pub stability_endpoint: String,
    pub image_timeout_secs: u64,
    /// Translation endpoint used to anglicize image prompts. Optional.
    pub translate_endpoint: Option<String>,
    pub translate_timeout_secs: u64,
    /// Optional JSON file overriding the built-in routing override rules.
    pub override_rules_path: Option<PathBuf>,
}

impl AppConfig {
    /// Builds the configuration from the current environment.
    ///
    /// Fails only on structural misconfiguration: malformed endpoint URLs
    /// or non-numeric timeouts. Missing optional values select fallbacks.
    pub fn from_env() -> Result<Self, AppError> {
        let corpus_dir = PathBuf::from(
            env::var("CORPUS_DIR").unwrap_or_else(|_| DEFAULT_CORPUS_DIR.to_string()),
        );

        let stability_endpoint = env::var("STABILITY_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_STABILITY_ENDPOINT.to_string());
        Url::parse(&stability_endpoint).map_err(|e| {
            AppError::Config(format!("STABILITY_ENDPOINT is not a valid URL: {}", e))
        })?;

        Ok(Self {
            corpus_dir,
            classifier_endpoint: optional_endpoint("CLASSIFIER_ENDPOINT")?,
            classifier_api_token: non_empty_var("CLASSIFIER_API_TOKEN"),
            classifier_timeout_secs: timeout_secs(
                "CLASSIFIER_TIMEOUT_SECS",
                DEFAULT_CLASSIFIER_TIMEOUT_SECS,
            )?,
            stability_api_key: non_empty_var("STABILITY_API_KEY"),
            stability_endpoint,
            image_timeout_secs: timeout_secs("IMAGE_TIMEOUT_SECS", DEFAULT_IMAGE_TIMEOUT_SECS)?,
            translate_endpoint: optional_endpoint("TRANSLATE_ENDPOINT")?,
            translate_timeout_secs: timeout_secs(
                "TRANSLATE_TIMEOUT_SECS",
                DEFAULT_TRANSLATE_TIMEOUT_SECS,
            )?,
            override_rules_path: non_empty_var("OVERRIDE_RULES_PATH").map(PathBuf::from),
        })
    }

    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_secs(self.classifier_timeout_secs)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_secs)
    }

    pub fn translate_timeout(&self) -> Duration {
        Duration::from_secs(self.translate_timeout_secs)
    }
}

fn non_empty_var(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn optional_endpoint(var: &str) -> Result<Option<String>, AppError> {
    match non_empty_var(var) {
        Some(value) => {
            Url::parse(&value)
                .map_err(|e| AppError::Config(format!("{} is not a valid URL: {}", var, e)))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

fn timeout_secs(var: &str, default: u64) -> Result<u64, AppError> {
    match non_empty_var(var) {
        Some(value) => value
            .parse()
            .map_err(|e| AppError::Config(format!("{} must be an integer: {}", var, e))),
        None => Ok(default),
    }
}
