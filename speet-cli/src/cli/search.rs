use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use speet::corpus;
use speet::search::{search, SearchHit, SearchMode};
use speet::ScaledMinHash;
use tracing::debug;

use crate::cli::OutputFormat;

#[derive(Args)]
pub struct SearchArgs {
    /// Query sketch
    pub query: PathBuf,

    /// Subject sketches to rank
    #[arg(required = true)]
    pub subjects: Vec<PathBuf>,
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    mode: SearchMode,
    hits: &'a [SearchHit],
}

pub fn run(args: SearchArgs, mode: SearchMode, format: OutputFormat) -> anyhow::Result<()> {
    let query = ScaledMinHash::load_from_path(&args.query)
        .with_context(|| format!("Failed to load query sketch {}", args.query.display()))?;
    let subjects = corpus::load_sketches(args.subjects.as_slice())
        .context("Failed to load subject sketches")?;

    debug!("{} against {} subjects: {}", query, subjects.len(), mode);
    let hits = search(&query, &subjects, mode)?;

    match format {
        OutputFormat::Text => {
            for hit in &hits {
                println!("{:.3} {}", hit.score, hit.label);
            }
        }
        OutputFormat::Json => {
            let output = SearchOutput { query: query.name(), mode, hits: &hits };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
