//! Line reader
//!
//! Reads protocol lines with the line ending stripped. When built with a
//! shutdown signal, a pending read is abandoned as soon as the signal fires so
//! that closing a connection always unblocks a concurrent reader.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;

use crate::error::{DictError, Result};
use crate::protocol::responses::TERMINATOR;
use crate::protocol::status::StatusLine;

pub struct LineReader<R> {
    inner: R,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            shutdown: None,
        }
    }

    /// Reads fail with `NotConnected` once `shutdown` holds `true`.
    pub fn with_shutdown(inner: R, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            inner,
            shutdown: Some(shutdown),
        }
    }

    /// Next line without its line ending, or `None` at end of stream.
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();

        let n = match self.shutdown.as_mut() {
            Some(shutdown) => {
                tokio::select! {
                    read = self.inner.read_until(b'\n', &mut buf) => read?,
                    _ = shutdown.wait_for(|closed| *closed) => {
                        return Err(DictError::NotConnected);
                    }
                }
            }
            None => self.inner.read_until(b'\n', &mut buf).await?,
        };

        if n == 0 {
            return Ok(None);
        }

        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Next line of a reply body; end of stream here means the server hung up mid-reply.
    pub async fn expect_line(&mut self) -> Result<String> {
        self.next_line().await?.ok_or_else(|| {
            DictError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed in the middle of a reply",
            ))
        })
    }

    /// Next body line, or `None` once the lone `.` terminator is read.
    pub async fn body_line(&mut self) -> Result<Option<String>> {
        let line = self.expect_line().await?;
        if line == TERMINATOR {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }

    pub async fn read_status(&mut self) -> Result<StatusLine> {
        match self.next_line().await? {
            Some(line) => StatusLine::parse(&line),
            None => Err(DictError::MalformedStatus(
                "end of stream where a status line was expected".to_string(),
            )),
        }
    }

    /// Reads a status line and requires its code to be `expected`.
    pub async fn expect_status(&mut self, expected: u16) -> Result<StatusLine> {
        self.read_status().await?.expect(expected)
    }
}
