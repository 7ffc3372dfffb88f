//! Document corpus loaded from a directory of text files.
//!
//! The corpus is read once at startup and immutable afterwards: there is no
//! writer past initialization, so shared read access needs no locking.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// A single corpus document. Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier within the corpus (the file name, e.g. `historique.txt`).
    pub id: String,
    /// Full UTF-8 content of the file.
    pub content: String,
}

/// An in-memory collection of documents, in directory listing order.
///
/// The order is whatever the filesystem yields and carries no meaning:
/// retrieval scans the whole corpus.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Loads every `.txt` file of `dir` fully into memory.
    ///
    /// A missing or unreadable directory is fatal. Individual files that
    /// cannot be read (I/O error, invalid UTF-8) are skipped with a warning
    /// so a single bad file never takes the corpus down. An empty directory
    /// yields an empty corpus.
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let entries = fs::read_dir(dir).map_err(|e| {
            AppError::CorpusLoad(format!("cannot read corpus directory {}: {}", dir.display(), e))
        })?;

        let mut documents = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
                continue;
            }
            let id = match path.file_name().and_then(|name| name.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            match fs::read_to_string(&path) {
                Ok(content) => documents.push(Document { id, content }),
                Err(e) => warn!("Skipping unreadable document {}: {}", path.display(), e),
            }
        }

        info!(
            "Loaded {} document(s) from {}",
            documents.len(),
            dir.display()
        );
        Ok(Self { documents })
    }

    /// Builds a corpus from pre-made documents. Mainly used by tests.
    #[allow(dead_code)]
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Looks a document up by id.
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }
}
