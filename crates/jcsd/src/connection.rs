//! One request/response exchange on an accepted connection.
//!
//! A connection moves through `Accepted → Decoding → Dispatching → Responding
//! → Closed` exactly once:
//!
//! - **Decoding** reads bytes until one complete JSON object has arrived. The
//!   client does not have to half-close its side; anything after the object is
//!   ignored. A malformed envelope skips dispatch and is answered with
//!   `invalid JSON`.
//! - **Dispatching** runs the op against the engine ([`protocol::dispatch`]).
//! - **Responding** writes the envelope plus `\n` and shuts down the write side.
//!
//! [`serve_connection`] is generic over the stream so it can be driven by an
//! in-memory duplex in tests.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::protocol::{self, Request, Response, INVALID_JSON, REQUEST_TOO_LARGE};

const READ_CHUNK: usize = 8 * 1024;

/// Serve a single exchange and close the stream.
///
/// Errors returned here are ones that prevented a response from being
/// delivered; failures that were reported to the client return `Ok`.
pub async fn serve_connection<S>(mut stream: S, config: &ServerConfig) -> Result<(), ServerError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let response = match read_request(&mut stream, config.max_request_bytes).await {
        Ok(request) => {
            let response = protocol::dispatch(&request, config.limits);
            if let Some(message) = response.error_message() {
                warn!(op = %request.op, error = %message, "request failed");
            }
            response
        }
        Err(ServerError::RequestTooLarge { limit }) => {
            warn!(limit, "request too large");
            Response::error(REQUEST_TOO_LARGE)
        }
        Err(e) => {
            warn!(error = %e, "decode error");
            Response::error(INVALID_JSON)
        }
    };

    write_response(&mut stream, &response).await?;
    debug!(ok = response.is_ok(), "response sent");
    Ok(())
}

/// Read until one complete request object has been received.
pub async fn read_request<S>(stream: &mut S, max_bytes: usize) -> Result<Request, ServerError>
where
    S: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];
    let mut framer = ObjectFramer::default();

    loop {
        match framer.scan(&buf) {
            Frame::Complete(end) => {
                return serde_json::from_slice(&buf[..end])
                    .map_err(|e| ServerError::Decode(e.to_string()));
            }
            Frame::NotAnObject => {
                return Err(ServerError::Decode(
                    "request is not a JSON object".to_string(),
                ));
            }
            Frame::Incomplete if buf.len() > max_bytes => {
                return Err(ServerError::RequestTooLarge { limit: max_bytes });
            }
            Frame::Incomplete => {}
        }

        let n = stream.read(&mut chunk).await.map_err(ServerError::Input)?;
        if n == 0 {
            return Err(ServerError::Input(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed before a complete request",
            )));
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Serialize `response`, append a newline, write it and shut down the write side.
pub async fn write_response<S>(stream: &mut S, response: &Response) -> Result<(), ServerError>
where
    S: AsyncWrite + Unpin,
{
    let mut body =
        serde_json::to_vec(response).map_err(|e| ServerError::Encode(e.into()))?;
    body.push(b'\n');
    stream.write_all(&body).await.map_err(ServerError::Encode)?;
    stream.flush().await.map_err(ServerError::Encode)?;
    stream.shutdown().await.map_err(ServerError::Encode)
}

/// Outcome of scanning the buffered bytes for a top-level object.
#[derive(Debug, PartialEq, Eq)]
enum Frame {
    /// No complete object yet.
    Incomplete,
    /// A top-level object ends just before this offset.
    Complete(usize),
    /// The first significant byte is not `{`.
    NotAnObject,
}

/// Incremental scanner finding where the first top-level `{...}` ends.
///
/// Tracks string/escape state and bracket depth only; it does not validate
/// JSON. Scanning resumes where it left off, so total work is linear in the
/// request size.
#[derive(Debug, Default)]
struct ObjectFramer {
    pos: usize,
    depth: usize,
    started: bool,
    in_string: bool,
    escaped: bool,
}

impl ObjectFramer {
    fn scan(&mut self, buf: &[u8]) -> Frame {
        while let Some(&b) = buf.get(self.pos) {
            self.pos += 1;

            if !self.started {
                match b {
                    b' ' | b'\t' | b'\n' | b'\r' => continue,
                    b'{' => {
                        self.started = true;
                        self.depth = 1;
                        continue;
                    }
                    _ => return Frame::NotAnObject,
                }
            }

            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if b == b'\\' {
                    self.escaped = true;
                } else if b == b'"' {
                    self.in_string = false;
                }
                continue;
            }

            match b {
                b'"' => self.in_string = true,
                b'{' | b'[' => self.depth += 1,
                b'}' | b']' => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        return Frame::Complete(self.pos);
                    }
                }
                _ => {}
            }
        }
        Frame::Incomplete
    }
}
