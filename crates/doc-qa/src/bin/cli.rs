//! doc-qa command line
//!
//! Run with: cargo run -p doc-qa --bin doc-qa -- ask notes.pdf --question "What is it about?"

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use doc_qa::{config::QaConfig, QaPipeline};

/// Ask questions about a PDF, Markdown or HTML document
#[derive(Parser, Debug)]
#[command(name = "doc-qa", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer a question about a document
    Ask {
        /// Document to read
        file: PathBuf,

        /// Question to ask
        #[arg(short, long)]
        question: String,

        /// Also save the extracted text
        #[arg(long)]
        save: bool,

        /// Directory for saved text
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Maximum chunk size in characters
        #[arg(long)]
        max_chunk_chars: Option<usize>,

        /// Ollama model name
        #[arg(long)]
        model: Option<String>,
    },
    /// Extract a document's text and save it
    Extract {
        /// Document to read
        file: PathBuf,

        /// Directory for saved text
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the answer
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("doc_qa=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = QaConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Ask {
            file,
            question,
            save,
            output_dir,
            max_chunk_chars,
            model,
        } => {
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            if let Some(max_chars) = max_chunk_chars {
                config.chunking.max_chars = max_chars;
            }
            if let Some(model) = model {
                config.llm.model = model;
            }
            let save = save || config.output.save_extracted;

            let pipeline = QaPipeline::from_config(&config)?.with_save_extracted(save);
            let report = pipeline
                .ask_file(&file, &question)
                .await
                .with_context(|| format!("Could not answer question about {}", file.display()))?;

            if let Some(path) = &report.saved_to {
                println!("Saved parsed text to: {}", path.display());
            }
            println!("Q: {}", question);
            println!("A: {}", report.answer.text);
        }
        Command::Extract { file, output_dir } => {
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }

            let pipeline = QaPipeline::from_config(&config)?;
            let text = pipeline
                .extract(&file)
                .await
                .with_context(|| format!("Could not extract text from {}", file.display()))?;

            println!("Parsed text length: {}", text.char_count());
            let path = pipeline.save_extracted(&text)?;
            println!("Saved parsed text to: {}", path.display());
        }
    }

    Ok(())
}
