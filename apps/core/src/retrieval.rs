//! Contextual retrieval over the local corpus.
//!
//! Scores the query against every document with a sequence-similarity ratio
//! and returns an excerpt of the best match. A linear scan over raw content
//! is fine at this scale (tens of documents); the retriever sits behind a
//! narrow API so an embedding-backed index can replace it as the corpus grows.

use crate::corpus::{Corpus, Document};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum similarity (exclusive) for a document to count as relevant.
pub const SCORE_THRESHOLD: f32 = 0.1;

/// Maximum excerpt length, in characters.
pub const EXCERPT_LIMIT: usize = 200;

/// Best-matching excerpt for a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub document_id: String,
    /// First [`EXCERPT_LIMIT`] characters of the document content.
    pub excerpt: String,
    /// Similarity ratio in `[0, 1]`.
    pub score: f32,
}

/// Similarity-based retriever with an optional keyword-biased pre-step.
#[derive(Debug, Clone)]
pub struct SimilarityRetriever {
    /// Ordered `(trigger, document id)` pairs. The first trigger contained in
    /// the query selects a preferred document that is scored before the rest
    /// of the corpus.
    keyword_hints: Vec<(String, String)>,
}

impl Default for SimilarityRetriever {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityRetriever {
    /// Creates a retriever with the built-in French topic hints.
    pub fn new() -> Self {
        Self {
            keyword_hints: default_keyword_hints(),
        }
    }

    /// Creates a retriever with custom hints (empty disables the pre-step).
    #[allow(dead_code)]
    pub fn with_hints(keyword_hints: Vec<(String, String)>) -> Self {
        Self { keyword_hints }
    }

    /// Returns the most relevant document excerpt for `query`, or `None` when
    /// nothing clears the threshold. A miss is a valid outcome, not an error.
    ///
    /// If a keyword hint designates a preferred document and that document
    /// clears the threshold, it is returned without scoring the rest of the
    /// corpus. This is a priority short-circuit: the score is still the plain
    /// similarity ratio, never boosted.
    ///
    /// Equal top scores resolve to the first document in corpus order.
    pub fn retrieve(&self, query: &str, corpus: &Corpus) -> Option<RetrievalResult> {
        if corpus.is_empty() {
            return None;
        }
        let query_lower = query.to_lowercase();

        if let Some(doc) = self.preferred_document(&query_lower, corpus) {
            let score = sequence_ratio(&query_lower, &doc.content.to_lowercase());
            if score > SCORE_THRESHOLD {
                debug!(document_id = %doc.id, score, "keyword hint short-circuit");
                return Some(to_result(doc, score));
            }
        }

        let mut best: Option<(&Document, f32)> = None;
        for doc in corpus.iter() {
            let score = sequence_ratio(&query_lower, &doc.content.to_lowercase());
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((doc, score)),
            }
        }

        let (doc, score) = best?;
        if score > SCORE_THRESHOLD {
            Some(to_result(doc, score))
        } else {
            None
        }
    }

    fn preferred_document<'a>(&self, query_lower: &str, corpus: &'a Corpus) -> Option<&'a Document> {
        self.keyword_hints
            .iter()
            .find(|(trigger, id)| query_lower.contains(trigger.as_str()) && corpus.get(id).is_some())
            .and_then(|(_, id)| corpus.get(id))
    }
}

fn to_result(doc: &Document, score: f32) -> RetrievalResult {
    RetrievalResult {
        document_id: doc.id.clone(),
        excerpt: doc.content.chars().take(EXCERPT_LIMIT).collect(),
        score,
    }
}

/// Built-in mapping from French topic words to corpus files.
fn default_keyword_hints() -> Vec<(String, String)> {
    [
        ("histoire", "historique.txt"),
        ("historique", "historique.txt"),
        ("origine", "historique.txt"),
        ("création", "historique.txt"),
        ("fondateur", "historique.txt"),
        ("mission", "missions.txt"),
        ("missions", "missions.txt"),
        ("but", "missions.txt"),
        ("objectif", "missions.txt"),
        ("présentation", "crf_presentation.txt"),
        ("presentation", "crf_presentation.txt"),
        ("contact", "contact.txt"),
    ]
    .into_iter()
    .map(|(trigger, id)| (trigger.to_string(), id.to_string()))
    .collect()
}

/// Sequence-similarity ratio between two strings.
///
/// Ratcliff/Obershelp: sums the lengths of recursively matched longest common
/// blocks and normalizes by the total length (`2 * M / (len_a + len_b)`).
/// Symmetric, 1.0 for identical strings, 0.0 for strings sharing no character.
pub fn sequence_ratio(a: &str, b: &str) -> f32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_total(&a, &b) as f32 / total as f32
}

/// Total length of all matching blocks, iteratively (an explicit work list
/// keeps long documents from blowing the stack).
fn matching_total(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![((0, a.len()), (0, b.len()))];
    while let Some(((a_lo, a_hi), (b_lo, b_hi))) = pending.pop() {
        if a_lo >= a_hi || b_lo >= b_hi {
            continue;
        }
        let (start_a, start_b, len) = longest_match(a, b, a_lo, a_hi, b_lo, b_hi);
        if len == 0 {
            continue;
        }
        total += len;
        pending.push(((a_lo, start_a), (b_lo, start_b)));
        pending.push(((start_a + len, a_hi), (start_b + len, b_hi)));
    }
    total
}

/// Longest common block within the given windows, earliest occurrence first.
fn longest_match(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let width = b_hi - b_lo;
    let mut best = (a_lo, b_lo, 0);
    let mut prev = vec![0usize; width + 1];
    for i in a_lo..a_hi {
        let mut current = vec![0usize; width + 1];
        for (offset, j) in (b_lo..b_hi).enumerate() {
            if a[i] == b[j] {
                let len = prev[offset] + 1;
                current[offset + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        prev = current;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;

    fn corpus_of(docs: &[(&str, &str)]) -> Corpus {
        Corpus::from_documents(
            docs.iter()
                .map(|(id, content)| Document {
                    id: id.to_string(),
                    content: content.to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_ratio_identical_strings() {
        assert!((sequence_ratio("la croix-rouge", "la croix-rouge") - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_ratio_disjoint_strings() {
        assert_eq!(sequence_ratio("xyz", "abc"), 0.0);
    }

    #[test]
    fn test_ratio_is_symmetric() {
        // Crossed blocks: only one of "abc"/"xyz" can be counted.
        let forward = sequence_ratio("abc xyz", "xyz abc");
        let backward = sequence_ratio("xyz abc", "abc xyz");
        assert!((forward - backward).abs() < 1e-6);
        assert!((forward - 6.0 / 14.0).abs() < 1e-6);
    }

    #[test]
    fn test_ratio_partial_overlap() {
        // "abcd" vs "bcde": block "bcd" matches, ratio = 2*3/8.
        assert!((sequence_ratio("abcd", "bcde") - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_identical_content_scores_one() {
        let corpus = corpus_of(&[("doc.txt", "la fondation de la croix-rouge")]);
        let retriever = SimilarityRetriever::with_hints(vec![]);

        let hit = retriever
            .retrieve("la fondation de la croix-rouge", &corpus)
            .expect("identical content should match");
        assert_eq!(hit.document_id, "doc.txt");
        assert!((hit.score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_disjoint_query_returns_none() {
        let corpus = corpus_of(&[("doc.txt", "aaaa bbbb cccc")]);
        let retriever = SimilarityRetriever::with_hints(vec![]);

        assert!(retriever.retrieve("zzzz", &corpus).is_none());
    }

    #[test]
    fn test_empty_corpus_returns_none() {
        let retriever = SimilarityRetriever::new();
        assert!(retriever.retrieve("peu importe", &Corpus::default()).is_none());
    }

    #[test]
    fn test_excerpt_is_bounded_and_char_safe() {
        let content = "é".repeat(300);
        let corpus = corpus_of(&[("long.txt", content.as_str())]);
        let retriever = SimilarityRetriever::with_hints(vec![]);

        let hit = retriever
            .retrieve(&"é".repeat(150), &corpus)
            .expect("shared prefix should clear the threshold");
        assert_eq!(hit.excerpt.chars().count(), EXCERPT_LIMIT);
    }

    #[test]
    fn test_tie_breaks_on_first_document() {
        let corpus = corpus_of(&[("premier.txt", "même contenu"), ("second.txt", "même contenu")]);
        let retriever = SimilarityRetriever::with_hints(vec![]);

        let hit = retriever
            .retrieve("même contenu", &corpus)
            .expect("both documents match");
        assert_eq!(hit.document_id, "premier.txt");
    }

    #[test]
    fn test_croix_rouge_history_scenario() {
        let corpus = corpus_of(&[(
            "historique.txt",
            "La Croix-Rouge a été fondée en 1863 par Henry Dunant après la bataille de Solférino.",
        )]);
        let retriever = SimilarityRetriever::new();

        let hit = retriever
            .retrieve("Quelle est l'histoire de la Croix-Rouge ?", &corpus)
            .expect("history document should be relevant");
        assert_eq!(hit.document_id, "historique.txt");
        assert!(hit.excerpt.starts_with("La Croix-Rouge a été fondée en 1863"));
        assert!(hit.score > SCORE_THRESHOLD);
    }

    #[test]
    fn test_keyword_hint_short_circuits_full_scan() {
        // The second document matches the query better, but the "histoire"
        // hint designates the first and it clears the threshold.
        let query = "raconte-moi l'histoire de la fondation";
        let corpus = corpus_of(&[
            ("historique.txt", "l'histoire de la fondation de la croix-rouge en 1863"),
            ("copie.txt", "raconte-moi l'histoire de la fondation"),
        ]);
        let retriever = SimilarityRetriever::new();

        let hit = retriever.retrieve(query, &corpus).expect("hint should match");
        assert_eq!(hit.document_id, "historique.txt");
        assert!(hit.score < 1.0);
    }

    #[test]
    fn test_keyword_hint_falls_back_when_below_threshold() {
        let filler = "z".repeat(4000);
        let corpus = corpus_of(&[
            ("historique.txt", filler.as_str()),
            ("autre.txt", "quelle est l'histoire"),
        ]);
        let retriever = SimilarityRetriever::new();

        let hit = retriever
            .retrieve("quelle est l'histoire", &corpus)
            .expect("fallback scan should find the other document");
        assert_eq!(hit.document_id, "autre.txt");
    }
}
