//! Trivial intent classification using regex patterns.
//!
//! Direct keyword matching over the fixed label set, FR and EN. No external
//! dependency, never fails. Used when no zero-shot endpoint is configured,
//! and as the test stand-in for the statistical variant.

use crate::brain::intent::{Classification, Intent};
use crate::brain::IntentClassifier;
use crate::error::AppError;
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

// Compile patterns once at startup.
static IMAGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(image|photo|dessin|illustration|picture|visuel)\b")
            .expect("Invalid regex: image nouns"),
        Regex::new(r"(?i)\b(dessine|draw|génère|génére|generate)\b")
            .expect("Invalid regex: image verbs"),
    ]
});

static DOCUMENT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(document|documents|documentation)\b")
            .expect("Invalid regex: document nouns"),
        Regex::new(r"(?i)\b(histoire|historique|origine|fondateur|mission|missions)\b")
            .expect("Invalid regex: French topic words"),
        Regex::new(r"(?i)\b(présentation|presentation|contact)\b")
            .expect("Invalid regex: presentation words"),
    ]
});

static AIDE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(aide|aidez|faq|help)\b").expect("Invalid regex: help words"),
        Regex::new(r"(?i)\b(assistance|support|guide|tutoriel|tutorial)\b")
            .expect("Invalid regex: assistance words"),
    ]
});

/// Pattern-based classifier over the fixed label set.
pub struct KeywordClassifier {
    groups: Vec<(Intent, Vec<Regex>)>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordClassifier {
    /// Creates a classifier with the built-in FR/EN patterns.
    ///
    /// Groups are checked in order; the first group with any match wins,
    /// everything else falls through to [`Intent::Simple`].
    pub fn new() -> Self {
        let groups = vec![
            (Intent::Image, IMAGE_PATTERNS.clone()),
            (Intent::Document, DOCUMENT_PATTERNS.clone()),
            (Intent::Aide, AIDE_PATTERNS.clone()),
        ];
        Self { groups }
    }

    fn match_intent(&self, message: &str) -> Intent {
        for (intent, patterns) in &self.groups {
            if patterns.iter().any(|pattern| pattern.is_match(message)) {
                return *intent;
            }
        }
        Intent::Simple
    }
}

#[async_trait]
impl IntentClassifier for KeywordClassifier {
    async fn classify(&self, message: &str) -> Result<Classification, AppError> {
        Ok(Classification::from_intent(self.match_intent(message)))
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn classify(message: &str) -> Intent {
        KeywordClassifier::new()
            .classify(message)
            .await
            .expect("keyword classifier never fails")
            .intent
    }

    #[tokio::test]
    async fn test_image_detection() {
        assert_eq!(classify("Génère une image de chat").await, Intent::Image);
        assert_eq!(classify("dessine-moi un mouton").await, Intent::Image);
        assert_eq!(classify("draw a picture of a boat").await, Intent::Image);
    }

    #[tokio::test]
    async fn test_document_detection() {
        assert_eq!(classify("Quelle est l'histoire de la CRF ?").await, Intent::Document);
        assert_eq!(classify("cherche dans les documents").await, Intent::Document);
        assert_eq!(classify("quelles sont vos missions").await, Intent::Document);
    }

    #[tokio::test]
    async fn test_aide_detection() {
        assert_eq!(classify("j'ai besoin d'aide").await, Intent::Aide);
        assert_eq!(classify("où est la FAQ ?").await, Intent::Aide);
    }

    #[tokio::test]
    async fn test_fallback_to_simple() {
        assert_eq!(classify("bonjour, comment vas-tu ?").await, Intent::Simple);
        assert_eq!(classify("merci beaucoup").await, Intent::Simple);
    }

    #[tokio::test]
    async fn test_image_wins_over_later_groups() {
        // "image" and "aide" both present: the image group is checked first.
        assert_eq!(classify("aide-moi à créer une image").await, Intent::Image);
    }

    #[tokio::test]
    async fn test_scores_are_absent() {
        let result = KeywordClassifier::new()
            .classify("une image")
            .await
            .unwrap();
        assert!(result.scores.is_none());
    }
}
