//! Newline-delimited JSON input and output
//!
//! Reads one JSON record per line from any async reader and encodes output
//! records back into single lines for a sink.

use crate::app::models::OutputRecord;
use crate::config::OutputStyle;
use crate::{Error, Result};
use futures::stream::{self, Stream};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Decode a single input line; `line` is 1-based and only used for errors
///
/// Bytes that are not UTF-8 are reported the same way as malformed JSON.
pub fn decode_line(bytes: &[u8], line: usize) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|source| Error::invalid_json(line, source))
}

/// Stream the JSON records of an NDJSON reader in order
///
/// Lines are split on `\n` as raw bytes with any trailing `\r` removed. Blank
/// lines are skipped when `skip_blank_lines` is set and reported as invalid
/// JSON otherwise. Read failures are yielded as [`Error::Io`].
pub fn read_values<R>(reader: R, skip_blank_lines: bool) -> impl Stream<Item = Result<Value>>
where
    R: AsyncBufRead + Unpin,
{
    stream::unfold(
        (reader.split(b'\n'), 0usize),
        move |(mut segments, mut line)| async move {
            loop {
                line += 1;
                match segments.next_segment().await {
                    Ok(Some(mut bytes)) => {
                        if bytes.last() == Some(&b'\r') {
                            bytes.pop();
                        }
                        if skip_blank_lines && bytes.iter().all(u8::is_ascii_whitespace) {
                            continue;
                        }
                        let item = decode_line(&bytes, line);
                        return Some((item, (segments, line)));
                    }
                    Ok(None) => return None,
                    Err(source) => {
                        let error = Error::io(format!("Failed to read input line {}", line), source);
                        return Some((Err(error), (segments, line)));
                    }
                }
            }
        },
    )
}

/// Encode an output record as a single line, without the trailing newline
///
/// Pretty output spans several lines and is meant for people, not parsers.
pub fn encode_record(record: &OutputRecord, style: OutputStyle) -> Result<String> {
    let text = match style {
        OutputStyle::Compact => serde_json::to_string(record)?,
        OutputStyle::Pretty => serde_json::to_string_pretty(record)?,
    };
    Ok(text)
}
