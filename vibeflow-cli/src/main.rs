use std::process;
mod cli;
mod commands;
mod error;
mod exit_codes;
mod logging;

use clap::Parser;
use cli::Cli;
use error::{handle_cli_result, CliResult};
use exit_codes::{EXIT_ERROR, EXIT_SUCCESS};
use vibeflow_board::{BoardConfig, FileStorage};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_ERROR } else { EXIT_SUCCESS };
            let _ = e.print();
            process::exit(code);
        }
    };

    logging::configure_logging(cli.verbose, cli.debug, cli.quiet);

    process::exit(handle_cli_result(run(cli)));
}

/// Load configuration, open the board under its storage lock and run one command
fn run(cli: Cli) -> CliResult<()> {
    let mut config = BoardConfig::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(actor) = cli.actor {
        config.actor = Some(actor);
    }
    tracing::debug!(snapshot = %config.snapshot_path().display(), "using board snapshot");

    let _lock = FileStorage::new(&config.data_dir).lock()?;
    let mut store = config.open_store();

    let output = commands::run(&mut store, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
