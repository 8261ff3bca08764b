//! Record decoder.
//!
//! Turns a byte stream of newline-delimited JSON objects into a lazy stream
//! of records, one decode step per line. Lines are split on raw bytes, so
//! content that is not valid UTF-8 is a decode failure of that line rather
//! than a read failure.

use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures::Stream;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_stream::wrappers::SplitStream;

use crate::errors::IngestError;
use typesense_indexer_shared::Record;

/// Lazy stream of records decoded from a reader.
///
/// Blank lines are skipped. The first malformed line yields a
/// [`IngestError::DecodeError`] and ends the stream; the reader is dropped as
/// soon as the stream ends, whether by exhaustion or by failure.
pub struct RecordDecoder<R> {
    lines: Option<SplitStream<BufReader<R>>>,
    line_number: u64,
}

impl<R: AsyncRead + Unpin> RecordDecoder<R> {
    /// Create a decoder over `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: Some(SplitStream::new(BufReader::new(reader).split(b'\n'))),
            line_number: 0,
        }
    }

    /// Number of source lines consumed so far.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Whether the underlying reader has been released.
    pub fn is_closed(&self) -> bool {
        self.lines.is_none()
    }

    fn close(&mut self) {
        self.lines = None;
    }
}

/// Decode one line into a record.
fn decode_line(line: &[u8], line_number: u64) -> Result<Record, IngestError> {
    match serde_json::from_slice::<Value>(line) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(IngestError::decode(
            line_number,
            format!("expected a JSON object, found {}", json_kind(&other)),
        )),
        Err(e) => Err(IngestError::decode(line_number, e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<R: AsyncRead + Unpin> Stream for RecordDecoder<R> {
    type Item = Result<Record, IngestError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        loop {
            let Some(lines) = this.lines.as_mut() else {
                return Poll::Ready(None);
            };

            match ready!(Pin::new(lines).poll_next(cx)) {
                Some(Ok(line)) => {
                    this.line_number += 1;
                    if line.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    let item = decode_line(&line, this.line_number);
                    if item.is_err() {
                        this.close();
                    }
                    return Poll::Ready(Some(item));
                }
                Some(Err(e)) => {
                    this.close();
                    return Poll::Ready(Some(Err(IngestError::storage(format!(
                        "Failed to read source after line {}: {}",
                        this.line_number, e
                    )))));
                }
                None => {
                    this.close();
                    return Poll::Ready(None);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn decoder(input: &'static str) -> RecordDecoder<&'static [u8]> {
        RecordDecoder::new(input.as_bytes())
    }

    #[tokio::test]
    async fn test_decodes_records_in_order() {
        let mut records = decoder(
            "{\"id\":\"0\",\"countryName\":\"France\"}\n{\"id\":\"1\",\"countryName\":\"Germany\"}\n",
        );

        let first = records.next().await.unwrap().unwrap();
        assert_eq!(first["countryName"], "France");
        let second = records.next().await.unwrap().unwrap();
        assert_eq!(second["countryName"], "Germany");
        assert!(records.next().await.is_none());
        assert!(records.is_closed());
    }

    #[tokio::test]
    async fn test_skips_blank_lines_and_missing_trailing_newline() {
        let records: Vec<_> = decoder("\n{\"id\":\"0\"}\n   \n{\"id\":\"1\"}")
            .collect()
            .await;
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(Result::is_ok));
    }

    #[tokio::test]
    async fn test_empty_source() {
        let mut records = decoder("");
        assert!(records.next().await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_line_terminates_stream() {
        let mut records = decoder("{\"id\":\"0\"}\n{\"id\": oops}\n{\"id\":\"2\"}\n");

        assert!(records.next().await.unwrap().is_ok());
        match records.next().await.unwrap() {
            Err(IngestError::DecodeError { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected item: {other:?}"),
        }
        assert!(records.is_closed());
        assert!(records.next().await.is_none());
        assert_eq!(records.line_number(), 2);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_decode_error_on_its_line() {
        let input: &'static [u8] = b"{\"id\":\"0\"}\n{\"id\":\"\xff\xfe\"}\n{\"id\":\"2\"}\n";
        let mut records = RecordDecoder::new(input);

        assert!(records.next().await.unwrap().is_ok());
        match records.next().await.unwrap() {
            Err(IngestError::DecodeError { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected item: {other:?}"),
        }
        assert!(records.is_closed());
        assert!(records.next().await.is_none());
    }

    #[tokio::test]
    async fn test_crlf_line_endings() {
        let records: Vec<_> = decoder("{\"id\":\"0\"}\r\n{\"id\":\"1\"}\r\n\r\n")
            .collect()
            .await;
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(Result::is_ok));
    }

    #[tokio::test]
    async fn test_non_object_is_decode_error() {
        let mut records = decoder("[1, 2, 3]\n");
        let err = records.next().await.unwrap().unwrap_err();
        assert!(err.to_string().contains("an array"));
    }
}
