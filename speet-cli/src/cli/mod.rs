//! Command-line interface for speet.
//!
//! - **sketch**: sketch one text file
//! - **sketchall**: sketch every text file under a directory
//! - **search**: rank sketches by Jaccard similarity to a query sketch
//! - **contained_by**: rank sketches by how much of the query they contain
//! - **fragment_query**: find where the pieces of a long document come from
//!
//! ## Usage
//!
//! ```text
//! # Sketch a corpus; writes <file>.sketch next to each file
//! speet sketchall corpus/
//!
//! # Which documents is essay.txt built from?
//! speet fragment_query essay.txt corpus/ --fragment-size 2000
//!
//! # Compare sketches directly
//! speet sketch essay.txt essay.sketch
//! speet search essay.sketch corpus/*.sketch
//! ```

use clap::{Args, Parser, Subcommand};
use speet::minhash::{SketchParams, DEFAULT_KSIZE, DEFAULT_SCALED};

pub mod fragment_query;
pub mod search;
pub mod sketch;

#[derive(Parser)]
#[command(name = "speet")]
#[command(version)]
#[command(about = "Compare text documents with Scaled MinHash sketches")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a sketch for a text file
    Sketch(sketch::SketchArgs),

    /// Create sketches for every text file under a directory
    Sketchall(sketch::SketchallArgs),

    /// Find Jaccard similarities between a query and subject sketches
    Search(search::SearchArgs),

    /// Find containment of a query in subject sketches
    #[command(name = "contained_by", alias = "contained-by")]
    ContainedBy(search::SearchArgs),

    /// Fragment a query text and find the fragments in a directory of sketches
    #[command(name = "fragment_query", alias = "fragment-query")]
    FragmentQuery(fragment_query::FragmentQueryArgs),
}

/// Parameters that must match for sketches to be compared.
#[derive(Args, Clone, Copy, Debug)]
pub struct SketchParamArgs {
    /// Keep roughly one in SCALED k-mer hashes
    #[arg(long, default_value_t = DEFAULT_SCALED)]
    pub scaled: u64,

    /// K-mer length in characters
    #[arg(long, default_value_t = DEFAULT_KSIZE)]
    pub ksize: usize,
}

impl From<SketchParamArgs> for SketchParams {
    fn from(args: SketchParamArgs) -> Self {
        SketchParams::new(args.scaled, args.ksize)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
