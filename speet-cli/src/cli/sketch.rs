use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use speet::corpus;
use speet::ScaledMinHash;

use crate::cli::{OutputFormat, SketchParamArgs};

#[derive(Args)]
pub struct SketchArgs {
    /// Text file to sketch
    pub textfile: PathBuf,

    /// Where to write the sketch
    pub output: PathBuf,

    #[command(flatten)]
    pub params: SketchParamArgs,
}

#[derive(Args)]
pub struct SketchallArgs {
    /// Directory to sketch recursively
    pub directory: PathBuf,

    #[command(flatten)]
    pub params: SketchParamArgs,
}

#[derive(Serialize)]
struct SketchSummary<'a> {
    name: &'a str,
    chars: usize,
    hashes: usize,
    scaled: u64,
    ksize: usize,
    output: String,
}

pub fn run(args: SketchArgs, format: OutputFormat) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.textfile)
        .with_context(|| format!("Failed to read {}", args.textfile.display()))?;

    let name = args.textfile.display().to_string();
    let mut sketch = ScaledMinHash::with_params(args.params.into(), name.as_str())?;
    sketch.add_text(&text);
    sketch
        .save_to_path(&args.output)
        .with_context(|| format!("Failed to write sketch to {}", args.output.display()))?;

    let chars = text.chars().count();
    match format {
        OutputFormat::Text => println!(
            "read {}, hashed to {}, saved into {}",
            chars,
            sketch.len(),
            args.output.display()
        ),
        OutputFormat::Json => {
            let summary = SketchSummary {
                name: sketch.name(),
                chars,
                hashes: sketch.len(),
                scaled: sketch.scaled(),
                ksize: sketch.ksize(),
                output: args.output.display().to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

pub fn run_all(args: SketchallArgs, format: OutputFormat) -> anyhow::Result<()> {
    let count = corpus::sketch_directory(&args.directory, args.params.into())
        .with_context(|| format!("Failed to sketch {}", args.directory.display()))?;

    match format {
        OutputFormat::Text => println!("sketched {}", count),
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "sketched": count }));
        }
    }

    Ok(())
}
