//! JSON-lines transport.
//!
//! One request object per input line, one response object per output line:
//!
//! ```text
//! {"route": "execute", "query": "SELECT * FROM usuarios"}
//! {"route": "schema"}
//! {"route": "examples"}
//! ```

use crate::console::{Console, ExecuteRequest};
use crate::core::db::ConnectionFactory;
use crate::core::Result;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

/// A decoded request line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "route", rename_all = "lowercase")]
pub enum Request {
    Execute(ExecuteRequest),
    Schema,
    Examples,
}

/// Response for lines that could not be routed.
#[derive(Debug, Serialize)]
struct RoutingError {
    success: bool,
    error: String,
}

/// Answers one input line. Blank lines produce no response.
pub fn handle_line<F: ConnectionFactory>(console: &Console<F>, line: &str) -> Result<Option<String>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let response = match serde_json::from_str::<Request>(line) {
        Ok(Request::Execute(request)) => serde_json::to_string(&console.execute(&request))?,
        Ok(Request::Schema) => serde_json::to_string(&console.schema())?,
        Ok(Request::Examples) => serde_json::to_string(&console.examples())?,
        Err(e) => {
            warn!("Unroutable request line: {}", e);
            serde_json::to_string(&RoutingError {
                success: false,
                error: format!("Invalid request: {}", e),
            })?
        }
    };
    Ok(Some(response))
}

/// Serves requests from `reader` until EOF, writing responses to `writer`.
pub fn serve<F, R, W>(console: &Console<F>, reader: R, mut writer: W) -> Result<()>
where
    F: ConnectionFactory,
    R: BufRead,
    W: Write,
{
    info!("Serving JSON-lines requests");
    let mut handled = 0usize;
    for line in reader.lines() {
        let line = line?;
        if let Some(response) = handle_line(console, &line)? {
            writeln!(writer, "{}", response)?;
            writer.flush()?;
            handled += 1;
        }
    }
    debug!("Input closed after {} requests", handled);
    Ok(())
}
