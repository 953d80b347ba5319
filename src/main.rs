use clap::Parser;
use tracing_subscriber::EnvFilter;

use motifscan::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("motifscan=debug,info")
    } else {
        EnvFilter::new("motifscan=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Patmatch(args) => {
            cli::patmatch::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Restrict(args) => {
            cli::restrict::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Pscan(args) => {
            cli::pscan::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
