//! Intent label set and classification output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Handling intent for an incoming message. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Image generation request.
    Image,
    /// Documentary question answered from the local corpus.
    Document,
    /// Help / FAQ request.
    Aide,
    /// Anything else: plain local response. Also the degraded default.
    Simple,
}

/// All labels, in the order handed to the zero-shot capability.
pub const INTENT_LABELS: [Intent; 4] =
    [Intent::Image, Intent::Document, Intent::Aide, Intent::Simple];

impl Intent {
    /// Wire label, as exchanged with the classification capability.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Image => "image",
            Intent::Document => "document",
            Intent::Aide => "aide",
            Intent::Simple => "simple",
        }
    }

    /// Parses a wire label back into an intent.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "image" => Some(Intent::Image),
            "document" => Some(Intent::Document),
            "aide" => Some(Intent::Aide),
            "simple" => Some(Intent::Simple),
            _ => None,
        }
    }

    /// Router decision name recorded in response metadata.
    pub fn decision(&self) -> &'static str {
        match self {
            Intent::Image => "image_generation",
            Intent::Document => "rag_search",
            Intent::Aide => "help_faq",
            Intent::Simple => "simple_local_response",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of intent classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Top-ranked intent.
    pub intent: Intent,
    /// Raw confidence per label, when the capability produced a ranking.
    pub scores: Option<HashMap<Intent, f32>>,
}

impl Classification {
    /// Classification without confidence scores (trivial variant, fallbacks).
    pub fn from_intent(intent: Intent) -> Self {
        Self {
            intent,
            scores: None,
        }
    }
}
