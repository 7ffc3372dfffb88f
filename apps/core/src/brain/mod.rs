//! # Brain Module
//!
//! Intent resolution for incoming messages.
//!
//! ## Components
//! - `intent`: the closed intent label set and classification output
//! - `zero_shot`: statistical classification via an external zero-shot endpoint
//! - `keyword`: trivial pattern-based classification, no external dependency
//! - `overrides`: deterministic keyword rules correcting classifier mistakes

pub mod intent;
pub mod keyword;
pub mod overrides;
pub mod zero_shot;

pub use intent::{Classification, Intent};
pub use keyword::KeywordClassifier;
pub use overrides::{OverrideEngine, OverrideRule};
pub use zero_shot::ZeroShotClassifier;

use crate::error::AppError;
use async_trait::async_trait;

/// Maps a message to one of the fixed intent labels.
///
/// Both the statistical and the trivial variant satisfy this contract and are
/// interchangeable; the router depends only on the trait. Failure is part of
/// the contract (`Err`), so the fallback to [`Intent::Simple`] is an explicit
/// branch in the caller rather than a swallowed exception.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, message: &str) -> Result<Classification, AppError>;

    /// Short implementation name, recorded in response metadata.
    fn name(&self) -> &'static str;
}
