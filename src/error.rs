//! Error taxonomy for the processing and answering pipeline.
//!
//! Every fallible operation surfaces one of these kinds so callers can
//! distinguish a recoverable per-document failure from a fatal one, and a
//! user mistake (asking before processing) from a collaborator outage.
//! Collaborator transport errors are wrapped at the boundary of the
//! operation they occurred in, tagged with the [`Stage`] that failed.

use thiserror::Error;

/// Stage of a conversation turn that a collaborator call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Condense,
    Retrieve,
    Generate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Condense => write!(f, "condense"),
            Stage::Retrieve => write!(f, "retrieve"),
            Stage::Generate => write!(f, "generate"),
        }
    }
}

/// All failure kinds produced by the document QA pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The service API key is absent. Fatal for processing and answering;
    /// extraction and chunk inspection do not need it.
    #[error("GOOGLE_API_KEY is not set; export it or add it to a .env file")]
    MissingCredential,

    /// One document could not be extracted. Recoverable: the batch
    /// continues with the remaining documents.
    #[error("failed to extract text from {document}: {reason}")]
    Extraction { document: String, reason: String },

    /// No document in the batch yielded any text. Fatal to the batch.
    #[error("no extractable text found in any uploaded document")]
    NoExtractableText,

    /// Splitting the extracted text failed. Fatal to the processing request.
    #[error("failed to split text into chunks: {0}")]
    Chunking(String),

    /// Embedding or index construction failed. Fatal to the processing
    /// request; no partial index is kept.
    #[error("failed to build the vector index: {0}")]
    IndexBuild(String),

    /// A question was asked before any documents were processed.
    #[error("no documents have been processed yet; load and process PDFs first")]
    Precondition,

    /// A collaborator call failed during a conversation turn. Fatal to that
    /// turn only; chat history is left unchanged and the session stays usable.
    #[error("{stage} stage failed: {reason}")]
    Collaborator { stage: Stage, reason: String },

    /// A prompt template failed validation or rendering.
    #[error("prompt template {name}: {reason}")]
    Template { name: String, reason: String },
}

impl PipelineError {
    pub fn collaborator(stage: Stage, err: impl std::fmt::Display) -> Self {
        PipelineError::Collaborator {
            stage,
            reason: err.to_string(),
        }
    }
}
