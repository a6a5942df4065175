//! Minimal client for the socket protocol.

use std::path::Path;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

use crate::error::ServerError;
use crate::protocol::{Request, Response};

/// Send one request and wait for the server to answer and close.
pub async fn send(socket_path: impl AsRef<Path>, request: &Request) -> Result<Response, ServerError> {
    let mut stream = UnixStream::connect(socket_path.as_ref())
        .await
        .map_err(ServerError::Input)?;

    let body = serde_json::to_vec(request).map_err(|e| ServerError::Encode(e.into()))?;
    stream.write_all(&body).await.map_err(ServerError::Encode)?;

    let mut reply = Vec::new();
    stream
        .read_to_end(&mut reply)
        .await
        .map_err(ServerError::Input)?;
    serde_json::from_slice(&reply).map_err(|e| ServerError::Decode(e.to_string()))
}

/// Canonicalize `source` through the server at `socket_path`.
///
/// The outer error is a transport failure; the inner one is the server's
/// error message.
pub async fn canonicalize(
    socket_path: impl AsRef<Path>,
    source: impl Into<String>,
) -> Result<Result<String, String>, ServerError> {
    let response = send(socket_path, &Request::canon(source)).await?;
    Ok(response.into_result())
}
