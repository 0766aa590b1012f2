//! Credential-free inspection commands: dump extracted text, preview the
//! chunking of a batch.

use std::path::PathBuf;

use anyhow::Result;

use crate::chunk::split_text;
use crate::config::Config;
use crate::extract::extract_batch;
use crate::models::DocumentInput;

fn load_documents(paths: &[PathBuf]) -> Result<Vec<DocumentInput>> {
    paths.iter().map(|p| DocumentInput::from_path(p)).collect()
}

/// Print the extracted, blank-line-joined text blob for a batch.
pub fn run_extract(paths: &[PathBuf]) -> Result<()> {
    let docs = load_documents(paths)?;
    let (blob, warnings) = extract_batch(&docs)?;
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }
    println!("{blob}");
    Ok(())
}

/// Print chunking statistics and per-chunk previews for a batch.
pub fn run_chunks(config: &Config, paths: &[PathBuf]) -> Result<()> {
    let docs = load_documents(paths)?;
    let (blob, warnings) = extract_batch(&docs)?;
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    let chunks = split_text(
        &blob,
        config.chunking.max_chars,
        config.chunking.overlap_chars,
    )?;

    println!(
        "{} chunks from {} characters (max {}, overlap {})",
        chunks.len(),
        blob.len(),
        config.chunking.max_chars,
        config.chunking.overlap_chars
    );
    for (i, chunk) in chunks.iter().enumerate() {
        println!("{:>4}  {:>5} chars  {}", i, chunk.len(), preview(chunk));
    }
    Ok(())
}

fn preview(chunk: &str) -> String {
    let flat = chunk.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= 60 {
        flat
    } else {
        flat.chars().take(60).collect::<String>() + "..."
    }
}
