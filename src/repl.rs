use crate::catalog::{self, EXAMPLES};
use crate::console::{Console, SchemaResponse};
use crate::core::db::{ConnectionFactory, ResultEnvelope};
use crate::core::Result;
use std::io::{BufRead, Write};

/// Represents a parsed REPL command.
#[derive(Debug, PartialEq)]
pub enum Command {
    Sql(String),
    Schema,
    Examples,
    Example(usize),
    Help,
    Quit,
    Unknown(String),
}

/// Parses a user input string into a corresponding `Command`.
///
/// If the input starts with a colon (`:`), it is interpreted as a command.
/// Otherwise, it is treated as a SQL query.
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let Some(trimmed) = input.strip_prefix(':') else {
        return Command::Sql(input.to_string());
    };
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    match parts.as_slice() {
        ["schema"] | ["tables"] => Command::Schema,
        ["examples"] => Command::Examples,
        ["example", n] => match n.parse::<usize>() {
            Ok(n) => Command::Example(n),
            Err(_) => Command::Unknown(input.to_string()),
        },
        ["help"] => Command::Help,
        ["quit"] | ["q"] => Command::Quit,
        _ => Command::Unknown(input.to_string()),
    }
}

/// Renders an envelope as plain text.
pub fn render_envelope(envelope: &ResultEnvelope) -> String {
    match envelope {
        ResultEnvelope::Rows { rows, columns } => {
            let header = columns.join(" | ");
            let mut out = format!("{}\n{}\n", header, "-".repeat(header.chars().count()));
            for row in rows {
                let cells: Vec<String> = row.iter().map(|(_, value)| value.to_string()).collect();
                out.push_str(&cells.join(" | "));
                out.push('\n');
            }
            out.push_str(&format!("({} rows)", rows.len()));
            out
        }
        ResultEnvelope::Affected {
            affected_row_count,
            message,
        } => format!("{} ({} rows affected)", message, affected_row_count),
        ResultEnvelope::Failure { error_message } => format!("Error: {}", error_message),
    }
}

/// Renders the schema route's response as plain text.
pub fn render_schema(response: &SchemaResponse) -> String {
    match response {
        SchemaResponse::Success(schema) if schema.tables.is_empty() => "No tables.".to_string(),
        SchemaResponse::Success(schema) => {
            let mut out = String::new();
            for table in &schema.tables {
                out.push_str(&format!("{}\n", table.name));
                for column in &table.columns {
                    let mut flags = Vec::new();
                    if column.primary_key {
                        flags.push("PK");
                    }
                    if !column.nullable {
                        flags.push("NOT NULL");
                    }
                    out.push_str(&format!("  {} {}", column.name, column.type_name));
                    if !flags.is_empty() {
                        out.push_str(&format!(" [{}]", flags.join(", ")));
                    }
                    out.push('\n');
                }
            }
            out.trim_end().to_string()
        }
        SchemaResponse::Failure(error) => format!("Error getting schema: {}", error),
    }
}

const HELP: &str = "\
Available commands:
  :help - List all available commands
  :schema - Show tables and columns (alias :tables)
  :examples - List example queries
  :example <n> - Run example query number n
  :quit - Exit

Or enter SQL queries directly without any prefix.";

/// Runs the REPL, reading lines from `input` until EOF or `:quit`.
pub fn run_repl<F, R, W>(console: &Console<F>, input: R, mut output: W) -> Result<()>
where
    F: ConnectionFactory,
    R: BufRead,
    W: Write,
{
    writeln!(output, "Welcome to the sqldesk REPL! Type :help for commands, :quit to exit.")?;
    let mut lines = input.lines();

    loop {
        write!(output, "> ")?;
        output.flush()?;
        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Command::Quit => break,
            Command::Help => writeln!(output, "{}", HELP)?,
            Command::Schema => writeln!(output, "{}", render_schema(&console.schema()))?,
            Command::Examples => {
                for (i, example) in EXAMPLES.iter().enumerate() {
                    writeln!(output, "{:>2}. {}", i + 1, example.title)?;
                }
            }
            Command::Example(n) => match catalog::example(n) {
                Some(example) => {
                    writeln!(output, "{}", example.query)?;
                    writeln!(output, "{}", render_envelope(&console.execute_sql(example.query)))?;
                }
                None => writeln!(output, "No example number {} (1-{})", n, EXAMPLES.len())?,
            },
            Command::Sql(sql) => writeln!(output, "{}", render_envelope(&console.execute_sql(&sql)))?,
            Command::Unknown(cmd) => writeln!(output, "Unknown command: {} (try :help)", cmd)?,
        }
    }

    Ok(())
}
