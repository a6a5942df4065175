//! Socket setup and the accept loop.

use std::future::Future;
use std::io;
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::Path;
use std::sync::Arc;

use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn, Instrument};

use crate::config::ServerConfig;
use crate::connection::serve_connection;
use crate::error::ServerError;

/// A bound, not-yet-running server.
///
/// The listener is the only object shared across connections; each accepted
/// connection gets its own task holding a clone of the immutable config.
#[derive(Debug)]
pub struct Server {
    listener: UnixListener,
    config: Arc<ServerConfig>,
    permits: Option<Arc<Semaphore>>,
    /// `(dev, ino)` of the socket file this server created.
    socket_id: Option<(u64, u64)>,
}

impl Server {
    /// Remove a stale socket left at the configured path and bind a new one.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let path = config.socket_path.as_path();
        remove_stale_socket(path);

        let listener = UnixListener::bind(path).map_err(|source| ServerError::Bind {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            max_connections = ?config.max_connections,
            io_timeout = ?config.io_timeout,
            "listening"
        );

        let socket_id = file_id(path);

        let permits = config
            .max_connections
            .map(|n| Arc::new(Semaphore::new(n.max(1))));

        Ok(Self {
            listener,
            config: Arc::new(config),
            permits,
            socket_id,
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.config.socket_path
    }

    /// Serve connections until `shutdown` completes, then remove the socket
    /// file if it is still the one this server bound. Connections already
    /// accepted run to completion on their own tasks.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut next_id: u64 = 0;

        loop {
            let permit = match &self.permits {
                Some(permits) => tokio::select! {
                    _ = &mut shutdown => break,
                    permit = Arc::clone(permits).acquire_owned() => match permit {
                        Ok(permit) => Some(permit),
                        Err(_) => break,
                    },
                },
                None => None,
            };

            tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, _addr)) => {
                        next_id += 1;
                        let config = Arc::clone(&self.config);
                        let span = tracing::debug_span!("conn", id = next_id);
                        tokio::spawn(
                            async move {
                                let _permit = permit;
                                handle(stream, &config).await;
                            }
                            .instrument(span),
                        );
                    }
                    // Transient (e.g. EMFILE); keep accepting.
                    Err(e) => warn!(error = %e, "accept failed"),
                },
            }
        }

        let Self {
            listener,
            config,
            socket_id,
            ..
        } = self;
        drop(listener);
        remove_own_socket(&config.socket_path, socket_id);
        info!("stopped");
    }
}

/// Run one exchange under the configured timeout and log how it ended.
async fn handle(stream: UnixStream, config: &ServerConfig) {
    debug!("accepted");
    let outcome = match config.io_timeout {
        Some(limit) => tokio::time::timeout(limit, serve_connection(stream, config))
            .await
            .unwrap_or_else(|_| Err(ServerError::Timeout(limit))),
        None => serve_connection(stream, config).await,
    };

    match outcome {
        Ok(()) => debug!("closed"),
        Err(e) => warn!(error = %e, "connection dropped"),
    }
}

/// Identity of the file at `path`, if any.
fn file_id(path: &Path) -> Option<(u64, u64)> {
    std::fs::symlink_metadata(path)
        .ok()
        .map(|meta| (meta.dev(), meta.ino()))
}

/// Remove the socket file on shutdown unless another server has since
/// replaced it at the same path.
fn remove_own_socket(path: &Path, socket_id: Option<(u64, u64)>) {
    let current = file_id(path);
    if current.is_none() {
        return;
    }
    if current != socket_id {
        info!(path = %path.display(), "socket path was taken over, leaving it in place");
        return;
    }
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed socket"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove socket"),
    }
}

/// Delete a socket file left behind by an unclean shutdown.
///
/// Only sockets are removed; any other file at the path is left alone so the
/// subsequent bind fails loudly instead of destroying data.
fn remove_stale_socket(path: &Path) {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_socket() => match std::fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "removed stale socket"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove stale socket"),
        },
        Ok(_) => warn!(path = %path.display(), "path exists and is not a socket"),
        Err(_) => {}
    }
}
