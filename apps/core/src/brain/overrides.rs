//! Deterministic keyword overrides applied after classification.
//!
//! The statistical classifier is unreliable on short domain-specific phrases
//! ("comment ça fonctionne" lands on `simple` instead of `aide`). These rules
//! are a precision patch on top of it, not a replacement: they are data-driven
//! so keyword sets and priorities can be tuned without touching classification
//! logic, and they never second-guess a confident `image` classification.

use crate::brain::intent::Intent;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use validator::Validate;

/// One override rule: if any keyword appears in the message, reroute to `target`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OverrideRule {
    /// Matched as case-insensitive substrings of the message.
    #[validate(length(min = 1))]
    pub keywords: Vec<String>,
    pub target: Intent,
    /// Higher priority rules are evaluated first.
    #[serde(default)]
    pub priority: i32,
}

/// Ordered rule set with first-match-wins semantics.
#[derive(Debug, Clone)]
pub struct OverrideEngine {
    rules: Vec<OverrideRule>,
}

impl Default for OverrideEngine {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl OverrideEngine {
    /// Builds an engine from rules, ordering them by descending priority.
    /// Rules with equal priority keep their given order.
    pub fn new(mut rules: Vec<OverrideRule>) -> Self {
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { rules }
    }

    /// Loads and validates rules from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read override rules {}: {}", path.display(), e))
        })?;
        let rules: Vec<OverrideRule> = serde_json::from_str(&raw)?;
        for rule in &rules {
            rule.validate()?;
        }
        Ok(Self::new(rules))
    }

    /// Applies the rules to a raw classification.
    ///
    /// An `image` classification is never overridden. Otherwise the first rule
    /// with any keyword contained in the lowercased message wins; without a
    /// match, the raw intent passes through unchanged.
    pub fn apply(&self, message: &str, raw_intent: Intent) -> Intent {
        if raw_intent == Intent::Image {
            return raw_intent;
        }
        let message_lower = message.to_lowercase();
        for rule in &self.rules {
            if rule
                .keywords
                .iter()
                .any(|keyword| message_lower.contains(&keyword.to_lowercase()))
            {
                return rule.target;
            }
        }
        raw_intent
    }

    #[allow(dead_code)]
    pub fn rules(&self) -> &[OverrideRule] {
        &self.rules
    }
}

/// Built-in rules: help/FAQ keywords take precedence over document keywords.
pub fn default_rules() -> Vec<OverrideRule> {
    vec![
        OverrideRule {
            keywords: ["aide", "faq", "fonctionne", "assistance", "help"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            target: Intent::Aide,
            priority: 20,
        },
        OverrideRule {
            keywords: [
                "document",
                "histoire",
                "historique",
                "origine",
                "fondateur",
                "mission",
                "présentation",
                "contact",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            target: Intent::Document,
            priority: 10,
        },
    ]
}
