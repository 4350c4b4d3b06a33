use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Logs go to stderr, reports to stdout
    let filter = if cli.verbose {
        EnvFilter::new("speet=debug,info")
    } else {
        EnvFilter::new("speet=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Sketch(args) => {
            cli::sketch::run(args, cli.format)?;
        }
        cli::Commands::Sketchall(args) => {
            cli::sketch::run_all(args, cli.format)?;
        }
        cli::Commands::Search(args) => {
            cli::search::run(args, speet::search::SearchMode::Similarity, cli.format)?;
        }
        cli::Commands::ContainedBy(args) => {
            cli::search::run(args, speet::search::SearchMode::Containment, cli.format)?;
        }
        cli::Commands::FragmentQuery(args) => {
            cli::fragment_query::run(args, cli.format)?;
        }
    }

    Ok(())
}
