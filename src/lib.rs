//! # docchat
//!
//! Conversational question answering over local PDF documents.
//!
//! docchat extracts text from a batch of PDFs, splits it into overlapping
//! chunks, embeds the chunks through the Gemini API into an in-memory
//! vector index, and answers natural-language questions by retrieving the
//! most similar chunks and asking the model for a grounded answer with
//! citations. Follow-up questions are condensed into standalone form using
//! the chat history before retrieval.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌─────────┐   ┌───────────────┐   ┌─────────────┐
//! │  PDFs    │──▶│ Extract │──▶│ Chunk (1500/  │──▶│ Embed+Index │
//! │ (batch)  │   │ by page │   │  150 overlap) │   │ (in-memory) │
//! └──────────┘   └─────────┘   └───────────────┘   └──────┬──────┘
//!                                                         │
//!              ┌──────────────────────────────────────────┘
//!              ▼
//!   question ──▶ condense ──▶ retrieve top-k ──▶ generate ──▶ answer
//!                (history)                        (LLM)       + sources
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and credential lookup |
//! | [`models`] | Core data types |
//! | [`extract`] | Page-by-page PDF text extraction |
//! | [`chunk`] | Separator-priority chunker with overlap |
//! | [`embedding`] | Embedding collaborator (Gemini) and cosine similarity |
//! | [`llm`] | Language-model collaborator (Gemini) |
//! | [`index`] | In-memory vector index |
//! | [`prompts`] | Versioned prompt templates |
//! | [`pipeline`] | Extract → chunk → embed → index orchestration |
//! | [`session`] | Conversation engine (condense → retrieve → generate) |
//! | [`error`] | Error taxonomy |

pub mod ask;
pub mod chat;
pub mod chunk;
pub mod config;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod index;
pub mod inspect;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod session;
