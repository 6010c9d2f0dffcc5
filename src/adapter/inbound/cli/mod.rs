//! CLI module graph.

pub mod check;
pub mod command;
pub mod output;
pub mod paths;
pub mod run;
pub mod scan;

use command::{CheckCommand, Cli, Commands};
use output::OutputConfig;

use crate::error::Result;

/// Apply the global flags and run the selected subcommand.
pub async fn execute(cli: Cli) -> Result<()> {
    cli.color.apply();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    match cli.command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Scan(args) => scan::execute(&args).await,
        Commands::Check(CheckCommand::Config(arg)) => check::execute_config(&arg.config),
        Commands::Check(CheckCommand::Notify(arg)) => check::execute_notify(&arg.config).await,
    }
}
