//! Processing pipeline orchestration: extract → chunk → embed → index.
//!
//! One call per upload batch. Per-document extraction failures are
//! collected as warnings; every later failure is fatal to the request and
//! no partial index survives it.

use tracing::info;

use crate::chunk::split_text;
use crate::config::Config;
use crate::embedding::Embedder;
use crate::error::PipelineError;
use crate::extract::extract_batch;
use crate::index::VectorIndex;
use crate::models::DocumentInput;

/// What happened during a successful processing run.
#[derive(Debug)]
pub struct ProcessReport {
    pub extracted_chars: usize,
    pub chunk_count: usize,
    /// Per-document extraction failures that did not stop the batch.
    pub warnings: Vec<PipelineError>,
}

/// Run the full pipeline over one document batch and build the index.
pub async fn build_index(
    config: &Config,
    embedder: &dyn Embedder,
    docs: &[DocumentInput],
) -> Result<(VectorIndex, ProcessReport), PipelineError> {
    let (blob, warnings) = extract_batch(docs)?;
    info!(
        documents = docs.len(),
        skipped = warnings.len(),
        chars = blob.len(),
        "extracted batch"
    );

    let chunks = split_text(
        &blob,
        config.chunking.max_chars,
        config.chunking.overlap_chars,
    )?;
    if chunks.is_empty() {
        return Err(PipelineError::NoExtractableText);
    }
    info!(chunks = chunks.len(), "split text into chunks");

    let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(chunks.len());
    for batch in chunks.chunks(config.embedding.batch_size) {
        let embedded = embedder
            .embed_batch(batch)
            .await
            .map_err(|e| PipelineError::IndexBuild(e.to_string()))?;
        vectors.extend(embedded);
    }
    info!(
        model = embedder.model_name(),
        vectors = vectors.len(),
        "embedded chunks"
    );

    let report = ProcessReport {
        extracted_chars: blob.len(),
        chunk_count: chunks.len(),
        warnings,
    };
    let index = VectorIndex::build(chunks, vectors)?;
    Ok((index, report))
}
