//! Conversation engine: session-scoped index and chat history.
//!
//! A [`Session`] is NOT_READY until a document batch has been processed
//! successfully, then READY until reprocessed. Reprocessing is a
//! destructive overwrite: the old index and the chat history are discarded
//! before the new batch is built. `answer` runs condense → retrieve →
//! generate; a failure at any stage aborts the turn without touching the
//! history, so the session stays usable.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;
use crate::embedding::Embedder;
use crate::error::{PipelineError, Stage};
use crate::index::VectorIndex;
use crate::llm::Generator;
use crate::models::{Answer, ChatTurn, DocumentInput};
use crate::pipeline::{build_index, ProcessReport};
use crate::prompts;

/// One user's conversation over one processed document batch.
pub struct Session {
    config: Config,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    index: Option<VectorIndex>,
    history: Vec<ChatTurn>,
}

impl Session {
    pub fn new(config: Config, embedder: Arc<dyn Embedder>, generator: Arc<dyn Generator>) -> Self {
        Self {
            config,
            embedder,
            generator,
            index: None,
            history: Vec::new(),
        }
    }

    /// True once a document batch has been processed successfully.
    pub fn is_ready(&self) -> bool {
        self.index.is_some()
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Process a document batch, replacing any previous index and clearing
    /// the chat history. On failure the session is left NOT_READY: partial
    /// indexes are never kept.
    pub async fn process(&mut self, docs: &[DocumentInput]) -> Result<ProcessReport, PipelineError> {
        self.index = None;
        self.history.clear();

        let (index, report) = build_index(&self.config, self.embedder.as_ref(), docs).await?;
        info!(chunks = index.len(), "session ready");
        self.index = Some(index);
        Ok(report)
    }

    /// Answer a question against the processed documents.
    ///
    /// With non-empty history the question is first condensed into a
    /// standalone form; retrieval and generation then use that form. The
    /// history is extended only after generation succeeds.
    pub async fn answer(&mut self, question: &str) -> Result<Answer, PipelineError> {
        let index = self.index.as_ref().ok_or(PipelineError::Precondition)?;
        let question = question.trim();

        let standalone = if self.history.is_empty() {
            question.to_string()
        } else {
            let history = render_history(&self.history);
            let prompt = prompts::CONDENSE_QUESTION
                .render(&[("chat_history", history.as_str()), ("question", question)])?;
            let rephrased = self
                .generator
                .generate(&prompt)
                .await
                .map_err(|e| PipelineError::collaborator(Stage::Condense, e))?;
            let rephrased = rephrased.trim();
            if rephrased.is_empty() {
                question.to_string()
            } else {
                rephrased.to_string()
            }
        };
        debug!(standalone = %standalone, "resolved query");

        let query_vec = self
            .embedder
            .embed_query(&standalone)
            .await
            .map_err(|e| PipelineError::collaborator(Stage::Retrieve, e))?;
        let mut sources = index.query(&query_vec, self.config.retrieval.top_k);
        sources.retain(|s| s.score >= self.config.retrieval.min_score);
        debug!(retrieved = sources.len(), "retrieved context chunks");

        let context = sources
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");
        let prompt = prompts::GROUNDED_ANSWER
            .render(&[("context", context.as_str()), ("question", standalone.as_str())])?;
        let text = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| PipelineError::collaborator(Stage::Generate, e))?;

        self.history.push(ChatTurn::user(question));
        self.history.push(ChatTurn::assistant(text.clone()));

        Ok(Answer {
            text,
            standalone_question: standalone,
            sources,
        })
    }
}

/// Flatten the transcript into the `User:`/`Assistant:` form the condense
/// template expects.
fn render_history(history: &[ChatTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}
