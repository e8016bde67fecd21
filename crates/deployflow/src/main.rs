mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use deployflow_provider::ProviderError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deployflow")]
#[command(about = "Deploy applications from CI to hosting platforms", long_about = None)]
struct Cli {
    /// Print the commands that would run instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy to Google App Engine
    Gae(commands::gae::GaeArgs),
    /// Show version information
    Version,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Version => {
            println!("deployflow {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Gae(args) => {
            init_logging(cli.verbose);
            commands::gae::handle(args, cli.dry_run).await
        }
    };

    match result {
        Ok(()) => {
            println!("{}", "✓ Deployment finished".green());
            Ok(())
        }
        Err(e) => {
            match e.downcast_ref::<ProviderError>() {
                Some(err) => eprintln!("{} {}: {}", "Error:".red().bold(), err.phase(), err),
                None => eprintln!("{} {:#}", "Error:".red().bold(), e),
            }
            std::process::exit(1);
        }
    }
}
