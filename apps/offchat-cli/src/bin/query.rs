use anyhow::Result;
use clap::Parser;

use offchat_cli::{init_tracing, load_settings, run_query, single_line};

/// Prints the matched chunk texts, one per line, best first.
#[derive(Parser)]
#[command(name = "offchat-query", version)]
struct Args {
    query: String,
    top_k: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let settings = load_settings()?;
    let top_k = args.top_k.unwrap_or(settings.search.top_k);
    for hit in run_query(&settings, &args.query, top_k).await? {
        println!("{}", single_line(&hit.text));
    }
    Ok(())
}
