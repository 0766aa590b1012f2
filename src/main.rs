//! # docchat CLI
//!
//! Conversational question answering over local PDF documents.
//!
//! ## Usage
//!
//! ```bash
//! docchat --config ./docchat.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docchat chat <pdf>...` | Process PDFs, then chat interactively |
//! | `docchat ask <pdf>... -q "<question>"` | Process PDFs and answer one question |
//! | `docchat extract <pdf>...` | Print the extracted text (no credential needed) |
//! | `docchat chunks <pdf>...` | Preview the chunking (no credential needed) |
//!
//! The `chat` and `ask` commands require `GOOGLE_API_KEY` in the
//! environment or a local `.env` file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use docchat::{ask, chat, config, inspect};

/// docchat — chat with your PDF documents.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; a missing file falls back to built-in defaults. See
/// `config/docchat.example.toml` for every setting.
#[derive(Parser)]
#[command(
    name = "docchat",
    about = "docchat — conversational question answering over local PDF documents",
    version,
    long_about = "docchat extracts text from PDF files, chunks and embeds it into an \
    in-memory vector index, and answers questions about the documents through a \
    retrieval-augmented LLM call, with source citations and follow-up condensing."
)]
struct Cli {
    /// Path to configuration file (TOML). Missing file uses defaults.
    #[arg(long, global = true, default_value = "./docchat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a batch of PDFs, then chat about them interactively.
    ///
    /// Inside the chat: `/load <pdf>...` processes a new batch (and clears
    /// the conversation), `/history` prints the timestamped transcript,
    /// `/sources` toggles citation display, `/quit` exits.
    Chat {
        /// PDF files to process.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Process a batch of PDFs and answer a single question.
    Ask {
        /// PDF files to process.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// The question to answer.
        #[arg(long, short)]
        question: String,
    },

    /// Extract and print the text of a batch without indexing it.
    Extract {
        /// PDF files to extract.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show how a batch would be split into chunks.
    Chunks {
        /// PDF files to inspect.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Chat { files } => {
            chat::run_chat(&cfg, &files).await?;
        }
        Commands::Ask { files, question } => {
            ask::run_ask(&cfg, &files, &question).await?;
        }
        Commands::Extract { files } => {
            inspect::run_extract(&files)?;
        }
        Commands::Chunks { files } => {
            inspect::run_chunks(&cfg, &files)?;
        }
    }

    Ok(())
}
