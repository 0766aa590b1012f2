//! One-shot question command: process a batch, answer a single question,
//! print the answer and its sources.

use std::path::PathBuf;

use anyhow::Result;

use crate::chat::{build_session, process_paths, render_answer};
use crate::config::Config;

pub async fn run_ask(config: &Config, paths: &[PathBuf], question: &str) -> Result<()> {
    let mut session = build_session(config)?;
    process_paths(&mut session, paths).await?;

    let answer = session.answer(question).await?;
    render_answer(&answer, true);
    Ok(())
}
