use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::files;
use retriever_core::cache::VectorCache;
use retriever_core::config;
use retriever_core::pipeline::{self, RetrievalOptions, Retriever};
use retriever_core::report;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "doc-retriever")]
#[command(about = "Embedding-based semantic document retrieval", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank corpus documents against a query and write the reports
    Retrieve {
        /// Corpus file, one document per line
        #[arg(long, default_value = "documents.txt")]
        documents: PathBuf,
        /// Query file, read as a single text blob
        #[arg(long, default_value = "query.txt")]
        query: PathBuf,
        /// Number of results; overrides the configured top_k
        #[arg(short = 'k', long)]
        topk: Option<usize>,
        /// Where to write the JSON report
        #[arg(long, default_value = "retrieved_context.json")]
        json_out: PathBuf,
        /// Where to write the human-readable report
        #[arg(long, default_value = "retrieved_context.txt")]
        text_out: PathBuf,
        /// Print the JSON payload to stdout
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Retrieve {
            documents,
            query,
            topk,
            json_out,
            text_out,
            json,
        } => {
            let corpus = files::load_corpus(&documents)?;
            let query = files::load_query(&query)?;

            let registry = pipeline::build_registry(&cfg);
            let provider = registry.embedding(None)?;

            let mut options = RetrievalOptions::from_config(&cfg);
            if let Some(k) = topk {
                options.top_k = k;
            }

            let retriever = Retriever::new(provider, Arc::new(VectorCache::new()), options);
            let result = retriever.retrieve(corpus, &query).await?;

            files::write_outputs(&result, &json_out, &text_out)?;
            info!(
                results = result.results.len(),
                skipped = result.skipped.len(),
                "retrieval complete"
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&report::to_json(&result))?);
            } else {
                println!(
                    "Document retrieval completed: {} results, {} skipped.",
                    result.results.len(),
                    result.skipped.len()
                );
            }
            Ok(())
        }
    }
}
