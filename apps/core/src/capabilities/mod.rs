//! Outbound collaborators.
//!
//! Thin clients for the paid/external capabilities the router dispatches to.
//! Each trait is the contract the router depends on; concrete clients are
//! injected at startup so tests can substitute stubs.

pub mod image;
pub mod translate;

pub use image::{StabilityImageClient, UnconfiguredImageGenerator};
pub use translate::{HttpTranslator, NoopTranslator};

use crate::error::AppError;
use async_trait::async_trait;

/// Generates an image for a prompt and returns a reference to it
/// (a URL or a `data:image/png;base64,...` payload).
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AppError>;
}

/// Translates text into a target language.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, AppError>;
}
