mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod ui;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone()) {
        ui::error(format!("Failed to initialize logging: {}", e));
        std::process::exit(1);
    }

    if let Err(e) = run_app(cli).await {
        error!("Command failed: {}", e);
        ui::error(&e);
        std::process::exit(e.exit_code());
    }
}

async fn run_app(cli: Cli) -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("biorun v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let runtime = cli.runtime;
    match cli.command {
        Commands::Colabfold(args) => {
            info!("Dispatching to 'colabfold' command.");
            commands::colabfold::run(args, &runtime).await
        }
        Commands::Foldseek(args) => {
            info!("Dispatching to 'foldseek' command.");
            commands::foldseek::run(args, &runtime).await
        }
        Commands::Proteinmpnn(args) => {
            info!("Dispatching to 'proteinmpnn' command.");
            commands::proteinmpnn::run(args, &runtime).await
        }
        Commands::ProteinmpnnBench(args) => {
            info!("Dispatching to 'proteinmpnn-bench' command.");
            commands::benchmark::run(args, &runtime).await
        }
    }
}
