use clap::Parser;
use tracing_subscriber::EnvFilter;

use violation_tracker::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("violation_tracker=debug,info")
    } else {
        EnvFilter::new("violation_tracker=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Track(args) => {
            cli::track::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Checksums(args) => {
            cli::checksums::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Diff(args) => {
            cli::diff::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
