//! Line-oriented parsing of completion streams.
//!
//! The completions endpoint answers with newline-delimited text that mixes
//! three kinds of lines on one stream:
//!
//! - `event: <name>` markers, which carry no content,
//! - `data: <payload>` lines, whose payload is either a JSON [`StreamChunk`]
//!   or an opaque job identifier,
//! - bare JSON chunk lines from transports that omit the `data:` framing.
//!
//! [`StreamParser`] is the line-level state machine. [`parse_reader`] and
//! [`process_stream`] drive it from a reader or a byte stream. A line that
//! fails to decode never aborts the response; only a read failure does, and
//! then the text reconstructed so far travels with the error.

use std::io;
use std::time::Instant;

use bytes::Bytes;
use futures::Stream;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::io::StreamReader;

use crate::error::{Error, Result};
use crate::observability::{
    STREAM_CHUNKS, STREAM_DURATION, STREAM_EVENTS, STREAM_JOB_IDS, STREAM_LINES,
    STREAM_READ_ERRORS, STREAM_SKIPPED_LINES,
};
use crate::types::{StreamChunk, StreamResponse};

const EVENT_PREFIX: &str = "event:";
const DATA_PREFIX: &str = "data:";

/// Options controlling how a stream is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Report events, job ids and metadata lines at info level instead of debug.
    ///
    /// Lines that should have been chunks but fail to decode are logged at
    /// warn level regardless.
    pub verbose: bool,
}

impl ParseOptions {
    /// Options with verbose diagnostics enabled or disabled.
    pub fn verbose(verbose: bool) -> Self {
        Self { verbose }
    }
}

/// Classification of a single line of a completion stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// An empty separator line.
    Blank,
    /// An `event:` marker with its trimmed name.
    Event(&'a str),
    /// A `data:` line with its trimmed payload.
    Data(&'a str),
    /// Any other non-empty line.
    Bare(&'a str),
}

impl<'a> Line<'a> {
    /// Classify one line; a trailing carriage return is ignored.
    pub fn classify(line: &'a str) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            Line::Blank
        } else if let Some(name) = line.strip_prefix(EVENT_PREFIX) {
            Line::Event(name.trim())
        } else if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
            Line::Data(payload.trim())
        } else {
            Line::Bare(line)
        }
    }
}

/// Accumulates a [`StreamResponse`] one line at a time.
#[derive(Debug, Clone, Default)]
pub struct StreamParser {
    options: ParseOptions,
    response: StreamResponse,
}

impl StreamParser {
    /// Creates a parser with the given options.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            response: StreamResponse::default(),
        }
    }

    /// Feeds one raw line, without its newline.
    ///
    /// Lines that are not valid UTF-8 cannot be chunks and are skipped.
    pub fn push_bytes(&mut self, line: &[u8]) {
        match std::str::from_utf8(line) {
            Ok(line) => self.push_line(line),
            Err(_) => {
                STREAM_LINES.click();
                self.discard("invalid UTF-8 line", &String::from_utf8_lossy(line));
            }
        }
    }

    /// Feeds one line of text, without its newline.
    pub fn push_line(&mut self, line: &str) {
        STREAM_LINES.click();
        match Line::classify(line) {
            Line::Blank => {}
            Line::Event(name) => {
                STREAM_EVENTS.click();
                self.response.events += 1;
                self.report("event", name);
            }
            Line::Data(payload) => match StreamChunk::decode(payload) {
                Some(chunk) => self.append(chunk),
                None if self.response.job_id.is_none() && !payload.is_empty() => {
                    STREAM_JOB_IDS.click();
                    self.report("job id", payload);
                    self.response.job_id = Some(payload.to_string());
                }
                None => self.skip("metadata", payload),
            },
            Line::Bare(line) => match StreamChunk::decode(line) {
                Some(chunk) => self.append(chunk),
                None => self.discard("unparseable line", line),
            },
        }
    }

    /// The response reconstructed so far.
    pub fn response(&self) -> &StreamResponse {
        &self.response
    }

    /// Consumes the parser and returns the reconstructed response.
    pub fn finish(self) -> StreamResponse {
        self.response
    }

    fn append(&mut self, chunk: StreamChunk) {
        STREAM_CHUNKS.click();
        self.response.chunks += 1;
        self.response.text.push_str(chunk.content());
        if chunk.done {
            self.response.done = true;
        }
    }

    fn skip(&mut self, what: &str, line: &str) {
        STREAM_SKIPPED_LINES.click();
        self.response.skipped += 1;
        self.report(what, line);
    }

    /// Skips a line that should have been a chunk; always visible at warn.
    fn discard(&mut self, what: &str, line: &str) {
        STREAM_SKIPPED_LINES.click();
        self.response.skipped += 1;
        tracing::warn!(kind = what, line, "could not parse stream line as a chunk");
    }

    fn report(&self, what: &str, value: &str) {
        if self.options.verbose {
            tracing::info!(kind = what, value, "stream line");
        } else {
            tracing::debug!(kind = what, value, "stream line");
        }
    }
}

/// Parses every line of `reader` until end of input.
///
/// A read failure returns [`Error::StreamRead`] carrying the partial response.
pub async fn parse_reader<R>(reader: R, options: ParseOptions) -> Result<StreamResponse>
where
    R: AsyncBufRead + Unpin,
{
    let start = Instant::now();
    let mut lines = reader.split(b'\n');
    let mut parser = StreamParser::new(options);
    loop {
        match lines.next_segment().await {
            Ok(Some(line)) => parser.push_bytes(&line),
            Ok(None) => break,
            Err(err) => {
                STREAM_READ_ERRORS.click();
                let partial = parser.finish();
                tracing::warn!(
                    error = %err,
                    partial_len = partial.text.len(),
                    "completion stream failed"
                );
                return Err(Error::stream_read(
                    err.to_string(),
                    partial,
                    Some(Box::new(err)),
                ));
            }
        }
    }
    STREAM_DURATION.add(start.elapsed().as_secs_f64());
    let response = parser.finish();
    tracing::debug!(
        chunks = response.chunks,
        events = response.events,
        skipped = response.skipped,
        done = response.done,
        "completion stream finished"
    );
    Ok(response)
}

/// Parses a byte stream, such as an HTTP response body.
pub async fn process_stream<S, E>(byte_stream: S, options: ParseOptions) -> Result<StreamResponse>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: Into<io::Error>,
{
    parse_reader(StreamReader::new(byte_stream), options).await
}
