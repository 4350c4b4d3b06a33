use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use speet::corpus;
use speet::search::fragment::{DEFAULT_FRAGMENT_SIZE, DEFAULT_NUM_TO_REPORT, DEFAULT_THRESHOLD};
use speet::search::{fragment_text, FragmentQuery, FragmentReport};
use tracing::debug;

use crate::cli::{OutputFormat, SketchParamArgs};

#[derive(Args)]
pub struct FragmentQueryArgs {
    /// Text file to fragment
    pub query: PathBuf,

    /// Directory of subject sketches
    pub directory: PathBuf,

    /// Size (in characters) of query fragments
    #[arg(long, default_value_t = DEFAULT_FRAGMENT_SIZE)]
    pub fragment_size: usize,

    /// Fraction of a query fragment a subject must contain to match
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Matches to report per fragment
    #[arg(long, default_value_t = DEFAULT_NUM_TO_REPORT)]
    pub num_to_report: usize,

    #[command(flatten)]
    pub params: SketchParamArgs,
}

#[derive(Serialize)]
struct FragmentQueryOutput<'a> {
    query: String,
    fragment_size: usize,
    threshold: f64,
    subjects: usize,
    fragments: &'a [FragmentReport],
}

pub fn run(args: FragmentQueryArgs, format: OutputFormat) -> anyhow::Result<()> {
    let fragment_query = FragmentQuery::new()
        .with_params(args.params.into())
        .with_fragment_size(args.fragment_size)
        .with_threshold(args.threshold)
        .with_num_to_report(args.num_to_report);
    fragment_query.validate()?;
    debug!(
        "fragment size {}, threshold {}, reporting {}, scaled {}, ksize {}",
        args.fragment_size,
        args.threshold,
        args.num_to_report,
        args.params.scaled,
        args.params.ksize
    );

    let text = std::fs::read_to_string(&args.query)
        .with_context(|| format!("Failed to read {}", args.query.display()))?;
    let query_name = args.query.display().to_string();
    let num_fragments = fragment_text(&text, args.fragment_size).len();
    if format == OutputFormat::Text {
        println!(
            "got {} fragments of size {} from {}",
            num_fragments,
            args.fragment_size,
            query_name
        );
    }

    let subjects = corpus::load_sketch_dir(&args.directory)
        .with_context(|| format!("Failed to load sketches from {}", args.directory.display()))?;
    if format == OutputFormat::Text {
        println!("loaded {} sketches from {}", subjects.len(), args.directory.display());
    }

    let reports = fragment_query.run(&query_name, &text, &subjects)?;

    match format {
        OutputFormat::Text => {
            for report in &reports {
                print_report(report);
            }
        }
        OutputFormat::Json => {
            let output = FragmentQueryOutput {
                query: query_name,
                fragment_size: args.fragment_size,
                threshold: args.threshold,
                subjects: subjects.len(),
                fragments: &reports,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn print_report(report: &FragmentReport) {
    if report.suppressed {
        println!("found {} in 90% or more; not reporting", report.name);
        return;
    }
    if report.match_count == 0 {
        return;
    }

    println!("found {} matches to {}", report.match_count, report.name);
    for hit in &report.top_matches {
        println!("   {:.1}% {}", hit.score * 100.0, hit.label);
    }
}
