//! Core data types that flow through the processing and answering pipeline.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded document: raw bytes plus the filename used in error reports.
/// Ephemeral; supplied per batch and never persisted.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DocumentInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a document from disk, using the file name for reporting.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatRole::User => write!(f, "User"),
            ChatRole::Assistant => write!(f, "Assistant"),
        }
    }
}

/// One turn in the conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            at: Utc::now(),
        }
    }
}

/// A retrieved chunk cited by an answer, with its similarity score.
#[derive(Debug, Clone)]
pub struct SourceChunk {
    pub text: String,
    pub score: f32,
}

/// Result of one successful `answer` call.
#[derive(Debug, Clone)]
pub struct Answer {
    /// Generated answer text.
    pub text: String,
    /// The question as actually used for retrieval (rephrased standalone
    /// form when chat history was non-empty).
    pub standalone_question: String,
    /// Chunks the answer was generated from, best match first.
    pub sources: Vec<SourceChunk>,
}
