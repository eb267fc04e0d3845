//! Command-line argument parsing.

use crate::config::Config;
use crate::core::db::Value;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A small ad-hoc SQL console for a local SQLite database.
#[derive(Parser, Debug)]
#[command(name = "sqldesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Database file (overrides the config file)
    #[arg(short = 'd', long, value_name = "PATH", global = true)]
    pub database: Option<PathBuf>,

    /// Config file path
    #[arg(short = 'c', long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Do not create the sample tables on start
    #[arg(long, global = true)]
    pub no_seed: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Interactive shell (default)
    Repl,
    /// Execute one statement and print the result as JSON
    Exec {
        /// SQL statement
        sql: String,
        /// Positional parameter; `null`, integers and reals are typed, anything else is text
        #[arg(short = 'p', long = "param", value_name = "VALUE")]
        params: Vec<String>,
    },
    /// Print the table/column schema as JSON
    Schema,
    /// Print the example queries as JSON
    Examples,
    /// Answer JSON-lines requests on stdin
    Serve,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.database {
            config.database.path = path.clone();
        }
        if self.no_seed {
            config.database.seed = false;
        }
    }

    pub fn selected_command(&self) -> CliCommand {
        self.command.clone().unwrap_or(CliCommand::Repl)
    }
}

/// Parses `--param` values into bindable values.
pub fn parse_params(raw: &[String]) -> Vec<Value> {
    raw.iter().map(|p| Value::parse_literal(p)).collect()
}
