use clap::Parser;
use sqldesk::cli::{parse_params, Cli, CliCommand};
use sqldesk::config::{resolve_config, Config};
use sqldesk::console::{Console, ExecuteRequest, SchemaResponse};
use sqldesk::core::db::seed::initialize_database;
use sqldesk::core::db::SqliteConnector;
use sqldesk::core::Result;
use sqldesk::{logging, protocol, repl};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match resolve_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    cli.apply_overrides(&mut config);

    logging::init_stderr_logging(&config.logging.level);
    info!("Starting sqldesk with database {}", config.database.path.display());

    match run(&cli, &config) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &Config) -> Result<ExitCode> {
    if config.database.seed {
        initialize_database(&config.database.path)?;
    }
    let console: Console<SqliteConnector> = Console::new(config.database.connector());

    let stdout = io::stdout();
    match cli.selected_command() {
        CliCommand::Repl => {
            repl::run_repl(&console, io::stdin().lock(), stdout.lock())?;
        }
        CliCommand::Exec { sql, params } => {
            let request = ExecuteRequest::new(sql).with_params(parse_params(&params));
            let envelope = console.execute(&request);
            print_json(&envelope)?;
            if !envelope.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        CliCommand::Schema => {
            let response = console.schema();
            print_json(&response)?;
            if let SchemaResponse::Failure(_) = response {
                return Ok(ExitCode::FAILURE);
            }
        }
        CliCommand::Examples => print_json(&console.examples())?,
        CliCommand::Serve => protocol::serve(&console, io::stdin().lock(), stdout.lock())?,
    }

    Ok(ExitCode::SUCCESS)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
