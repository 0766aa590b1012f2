//! In-memory vector index over (chunk, embedding) pairs.
//!
//! Brute-force cosine similarity over all stored vectors; built once per
//! processing action and immutable until replaced wholesale by the next
//! one. No persistence.

use crate::embedding::cosine_similarity;
use crate::error::PipelineError;
use crate::models::SourceChunk;

#[derive(Debug)]
struct IndexEntry {
    text: String,
    vector: Vec<f32>,
}

/// Immutable nearest-neighbor index for one processed document batch.
#[derive(Debug)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Build an index from parallel chunk and vector lists.
    pub fn build(chunks: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<Self, PipelineError> {
        if chunks.len() != vectors.len() {
            return Err(PipelineError::IndexBuild(format!(
                "got {} chunks but {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }
        if chunks.is_empty() {
            return Err(PipelineError::IndexBuild("no chunks to index".into()));
        }
        let entries = chunks
            .into_iter()
            .zip(vectors)
            .map(|(text, vector)| IndexEntry { text, vector })
            .collect();
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-k most similar chunks for a query vector, best first. Ties break
    /// on insertion order, so results are deterministic.
    pub fn query(&self, query: &[f32], k: usize) -> Vec<SourceChunk> {
        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, cosine_similarity(query, &entry.vector)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(i, score)| SourceChunk {
                text: self.entries[i].text.clone(),
                score,
            })
            .collect()
    }
}
