//! Interactive chat command: process a PDF batch, then answer questions
//! in a read-eval loop.
//!
//! Status and prompts go to stderr; the transcript goes to stdout so output
//! stays pipeable.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::{self, Config};
use crate::embedding::GeminiEmbedder;
use crate::error::PipelineError;
use crate::llm::GeminiGenerator;
use crate::models::{Answer, ChatTurn, DocumentInput};
use crate::prompts;
use crate::session::Session;

/// Wire a session to the real Gemini collaborators. Fails fast when the
/// credential is missing or a prompt template is broken.
pub(crate) fn build_session(config: &Config) -> Result<Session> {
    let api_key = config::api_key()?;
    prompts::validate_registry()?;

    let embedder = Arc::new(GeminiEmbedder::new(&config.embedding, api_key.clone())?);
    let generator = Arc::new(GeminiGenerator::new(&config.llm, api_key)?);
    Ok(Session::new(config.clone(), embedder, generator))
}

/// Read a batch from disk and process it, reporting progress on stderr.
pub(crate) async fn process_paths(session: &mut Session, paths: &[PathBuf]) -> Result<()> {
    let docs = paths
        .iter()
        .map(|p| DocumentInput::from_path(p))
        .collect::<Result<Vec<_>>>()?;

    eprintln!("processing {} document(s)...", docs.len());
    let report = session.process(&docs).await?;
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    eprintln!(
        "ready: {} chunks indexed from {} characters",
        report.chunk_count, report.extracted_chars
    );
    Ok(())
}

pub(crate) fn render_answer(answer: &Answer, show_sources: bool) {
    println!("\n{}", answer.text.trim());
    if show_sources && !answer.sources.is_empty() {
        println!("\nSources:");
        for (i, source) in answer.sources.iter().enumerate() {
            println!("  {}. [{:.2}] {}", i + 1, source.score, excerpt(&source.text, 240));
        }
    }
    println!();
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Timestamped transcript of the conversation so far.
fn render_transcript(history: &[ChatTurn]) -> String {
    history
        .iter()
        .map(|turn| {
            format!(
                "[{}] {}: {}\n",
                turn.at.format("%H:%M:%S"),
                turn.role,
                turn.content.trim()
            )
        })
        .collect()
}

/// Arguments of a `/load <pdf>...` command, or None if `line` is not one.
/// `/loadfoo` is not a load command.
fn parse_load(line: &str) -> Option<Vec<PathBuf>> {
    match line.strip_prefix("/load") {
        Some("") => Some(Vec::new()),
        Some(rest) if rest.starts_with(' ') => {
            Some(rest.split_whitespace().map(PathBuf::from).collect())
        }
        _ => None,
    }
}

pub async fn run_chat(config: &Config, paths: &[PathBuf]) -> Result<()> {
    let mut session = build_session(config)?;
    process_paths(&mut session, paths).await?;

    eprintln!("ask a question, or /help for commands");
    let mut show_sources = true;
    let stdin = std::io::stdin();

    loop {
        eprint!("> ");
        std::io::stderr().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/help" => {
                eprintln!("  /load <pdf>...   process a new batch (clears the conversation)");
                eprintln!("  /history         print the conversation so far");
                eprintln!("  /sources         toggle source display (currently {})", on_off(show_sources));
                eprintln!("  /quit            exit");
            }
            "/sources" => {
                show_sources = !show_sources;
                eprintln!("source display {}", on_off(show_sources));
            }
            "/history" => {
                if session.history().is_empty() {
                    eprintln!("no conversation yet");
                } else {
                    print!("{}", render_transcript(session.history()));
                }
            }
            line => {
                if let Some(new_paths) = parse_load(line) {
                    if new_paths.is_empty() {
                        eprintln!("usage: /load <pdf>...");
                        continue;
                    }
                    if let Err(err) = process_paths(&mut session, &new_paths).await {
                        eprintln!("error: {err:#}");
                    }
                } else if line.starts_with('/') {
                    eprintln!("unknown command: {line} (try /help)");
                } else {
                    match session.answer(line).await {
                        Ok(answer) => render_answer(&answer, show_sources),
                        Err(err @ PipelineError::Precondition) => eprintln!("{err}"),
                        Err(err) => eprintln!("error: {err}"),
                    }
                }
            }
        }
    }

    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_flattens_and_truncates() {
        let text = "line one\nline   two\nline three";
        assert_eq!(excerpt(text, 240), "line one line two line three");

        let long = "word ".repeat(100);
        let short = excerpt(&long, 20);
        assert!(short.ends_with("..."));
        assert!(short.chars().count() <= 23);
    }

    #[test]
    fn load_requires_a_space_before_its_arguments() {
        assert_eq!(
            parse_load("/load a.pdf b.pdf"),
            Some(vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")])
        );
        assert_eq!(parse_load("/load"), Some(Vec::new()));
        // A run-together word is not a load command.
        assert_eq!(parse_load("/loadfoo"), None);
        assert_eq!(parse_load("load a.pdf"), None);
    }

    #[test]
    fn transcript_carries_role_and_timestamp() {
        let turns = vec![
            ChatTurn::user("What is the refund policy?"),
            ChatTurn::assistant("Refunds take 30 days."),
        ];
        let transcript = render_transcript(&turns);
        let lines: Vec<&str> = transcript.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("User: What is the refund policy?"));
        assert!(lines[1].contains("Assistant: Refunds take 30 days."));
        let stamp = format!("[{}]", turns[0].at.format("%H:%M:%S"));
        assert!(lines[0].starts_with(&stamp));
    }
}
