//! JSON output for one-shot commands
//!
//! Each command prints a single JSON object on stdout.

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&mut io::stdout(), &response_json(data))
}

fn response_json(data: Value) -> Value {
    serde_json::json!({
        "status": "ok",
        "data": data
    })
}

fn write_line<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_envelope() {
        let mut out = Vec::new();
        write_line(&mut out, &response_json(serde_json::json!({"live": 2}))).unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(
            serde_json::from_str::<Value>(line.trim()).unwrap(),
            serde_json::json!({"status": "ok", "data": {"live": 2}})
        );
    }
}
