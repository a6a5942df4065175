//! Error types for the socket service.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that end a connection or prevent the server from starting.
///
/// Every variant is terminal to the connection it occurred on; nothing is
/// retried.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listening socket could not be bound. Fatal at startup.
    #[error("failed to bind {}: {source}", .path.display())]
    Bind {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading from the connection failed, or it closed before a full
    /// request arrived.
    #[error("failed to read request: {0}")]
    Input(#[source] io::Error),

    /// The request bytes were not a valid request envelope.
    #[error("malformed request: {0}")]
    Decode(String),

    /// The request grew past the configured size bound before completing.
    #[error("request exceeds {limit} bytes")]
    RequestTooLarge { limit: usize },

    /// Writing the response failed (e.g. the peer hung up).
    #[error("failed to write response: {0}")]
    Encode(#[source] io::Error),

    /// The exchange did not finish within the configured I/O timeout.
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),
}

/// A request named an operation this server does not implement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported op: {0:?}")]
pub struct UnsupportedOp(pub String);
