use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod concat;
mod core;
mod matching;
mod parsing;
mod remote;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("phylobuilder=debug,info")
    } else {
        EnvFilter::new("phylobuilder=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(utils::progress::LogWriter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Fetch(args) => {
            cli::fetch::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Align(args) => {
            cli::align::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Concat(args) => {
            cli::concat::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
