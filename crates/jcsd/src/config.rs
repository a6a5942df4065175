//! Server configuration.
//!
//! All settings live in one immutable [`ServerConfig`] handed to
//! [`Server::bind`](crate::Server::bind); nothing is read from the
//! environment after startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use jcs_core::Limits;

/// Socket path used when none is configured.
pub const DEFAULT_SOCKET_PATH: &str = "/run/rezn-jcsd/jcs.sock";

/// Environment variable overriding the socket path.
pub const SOCKET_ENV: &str = "REZN_JCSD_SOCKET";

/// Default bound on a single request envelope (16 MiB).
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Filesystem path of the Unix socket.
    pub socket_path: PathBuf,
    /// Limits applied when decoding the `source` document.
    pub limits: Limits,
    /// Largest request envelope accepted, in bytes.
    pub max_request_bytes: usize,
    /// Cap on concurrently served connections; `None` is unbounded.
    pub max_connections: Option<usize>,
    /// Deadline for one whole exchange; `None` waits forever.
    pub io_timeout: Option<Duration>,
}

impl ServerConfig {
    pub fn new(socket_path: impl AsRef<Path>) -> Self {
        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
            limits: Limits::default(),
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            max_connections: None,
            io_timeout: None,
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_max_request_bytes(mut self, max_request_bytes: usize) -> Self {
        self.max_request_bytes = max_request_bytes;
        self
    }

    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = Some(max_connections);
        self
    }

    pub fn with_io_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout = Some(io_timeout);
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SOCKET_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_path, PathBuf::from("/run/rezn-jcsd/jcs.sock"));
        assert_eq!(config.max_request_bytes, 16 * 1024 * 1024);
        assert_eq!(config.max_connections, None);
        assert_eq!(config.io_timeout, None);
        assert_eq!(config.limits, Limits::default());
    }

    #[test]
    fn builders_override_fields() {
        let config = ServerConfig::new("/tmp/x.sock")
            .with_max_connections(4)
            .with_io_timeout(Duration::from_secs(2))
            .with_max_request_bytes(10)
            .with_limits(Limits::new().with_max_depth(8));
        assert_eq!(config.max_connections, Some(4));
        assert_eq!(config.io_timeout, Some(Duration::from_secs(2)));
        assert_eq!(config.max_request_bytes, 10);
        assert_eq!(config.limits.max_depth, 8);
    }
}
