//! Newline-delimited JSON transport.
//!
//! Each message is one compact JSON-RPC object followed by `\n`. Messages
//! never contain embedded newlines, so a line is always a whole message.

use std::io::{BufRead, BufReader, Stdin, Stdout, Write};

use crate::FructResult;

use super::protocol::JsonRpcResponse;

/// Line-oriented transport over any reader/writer pair.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
}

/// Transport bound to the process's stdin and stdout.
pub type StdioTransport = LineTransport<BufReader<Stdin>, Stdout>;

impl StdioTransport {
    pub fn stdio() -> Self {
        LineTransport::new(BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> LineTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Reads the next non-blank line, or `None` at end of input.
    ///
    /// The line is returned unparsed so the caller can answer malformed
    /// JSON with a parse error instead of dropping the connection.
    pub fn read_line(&mut self) -> FructResult<Option<String>> {
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
    }

    /// Writes one response as a single line and flushes.
    pub fn write_response(&mut self, response: &JsonRpcResponse) -> FructResult<()> {
        let body = serde_json::to_string(response)?;

        self.writer.write_all(body.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        tracing::debug!(id = ?response.id, is_error = response.is_error(), "sent response");
        Ok(())
    }

    /// Gives back the writer, e.g. to inspect captured output.
    pub fn into_writer(self) -> W {
        self.writer
    }
}
