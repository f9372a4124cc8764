//! CLI entry point - the composition root.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use shelldl_cli::handlers;
use shelldl_cli::{Cli, CliConfig, CliError, Commands, load_settings};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let settings = load_settings(&CliConfig::new(cli.config))?;

    match command {
        Commands::Resolve {
            suggested_filename,
            mime_type,
            directory,
            filename,
            save_as,
        } => {
            let args = handlers::resolve::ResolveArgs {
                suggested_filename,
                mime_type,
                directory,
                filename,
                save_as,
            };
            handlers::resolve::execute(&settings, args)?;
        }
        Commands::Replay { scenario } => {
            handlers::replay::execute(settings, &scenario).await?;
        }
        Commands::Settings => {
            handlers::settings::execute(&settings)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            eprintln!("Error: {err}");
            let code = u8::try_from(err.exit_code()).unwrap_or(1);
            Ok(ExitCode::from(code))
        }
    }
}
