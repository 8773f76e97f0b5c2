use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use offchat_cli::{init_tracing, load_settings, run_query, NO_ANSWER};
use offchat_core::chunk_text;
use offchat_core::ingest::DirectoryIngest;
use offchat_pipeline::run_build;
use offchat_store::write_chunks;

#[derive(Parser)]
#[command(name = "offchat", version, about = "Chunk documents, build the vector store and query it")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split one text file into chunks.json
    Chunk { input: PathBuf },
    /// Chunk every .txt, .md and .json file under a directory into chunks.json
    Ingest { dir: PathBuf },
    /// Embed chunks.json and overwrite the vector store
    Embed { chunks: Option<PathBuf> },
    /// Rank stored chunks against a query
    Query {
        query: String,
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = load_settings()?;
    match cli.command {
        Command::Chunk { input } => {
            let text = fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
            let chunks = chunk_text(&text, settings.chunking.size)?;
            let out = settings.paths.chunks_file();
            write_chunks(&out, &chunks)?;
            println!("Chunked {} into {} chunks at {}", input.display(), chunks.len(), out.display());
        }
        Command::Ingest { dir } => {
            let chunks = DirectoryIngest::new(settings.chunking.size).process_directory(&dir)?;
            let out = settings.paths.chunks_file();
            write_chunks(&out, &chunks)?;
            println!("Ingested {} into {} chunks at {}", dir.display(), chunks.len(), out.display());
        }
        Command::Embed { chunks } => {
            let chunks_file = chunks.unwrap_or_else(|| settings.paths.chunks_file());
            let report = run_build(&settings, &chunks_file)?;
            println!("Embedded {} chunks (dim {}), skipped {}", report.embedded, report.dim, report.skipped.len());
            if !report.skipped.is_empty() {
                println!("Skipped chunk positions: {:?}", report.skipped);
            }
        }
        Command::Query { query, top_k } => {
            let top_k = top_k.unwrap_or(settings.search.top_k);
            let hits = tokio::runtime::Runtime::new()?.block_on(run_query(&settings, &query, top_k))?;
            if hits.is_empty() {
                println!("{}", NO_ANSWER);
            }
            for (i, hit) in hits.iter().enumerate() {
                println!("\n  {}. score={:.4}  index={}", i + 1, hit.score, hit.index);
                println!("     {}", hit.text);
            }
        }
    }
    Ok(())
}
