//! `jcsd`: serve RFC 8785 canonicalization on a local Unix socket.
//!
//! ## Usage
//!
//! ```sh
//! # Listen on the default socket (/run/rezn-jcsd/jcs.sock)
//! jcsd
//!
//! # Listen elsewhere, with hardening limits
//! REZN_JCSD_SOCKET=/tmp/jcs.sock jcsd --max-connections 256 --io-timeout-secs 10
//!
//! # Talk to it
//! printf '{"op":"canon","source":"{\\"b\\":1,\\"a\\":2}"}' | nc -U /tmp/jcs.sock
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `jcsd=info`).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use jcs_core::limits::DEFAULT_MAX_DEPTH;
use jcs_core::Limits;
use jcsd::config::{DEFAULT_MAX_REQUEST_BYTES, DEFAULT_SOCKET_PATH, SOCKET_ENV};
use jcsd::{Server, ServerConfig};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "jcsd",
    version,
    about = "JSON Canonicalization Scheme (RFC 8785) socket service"
)]
struct Cli {
    /// Path of the Unix socket to listen on
    #[arg(long, env = SOCKET_ENV, default_value = DEFAULT_SOCKET_PATH)]
    socket: PathBuf,

    /// Maximum number of connections served at once (unbounded if omitted)
    #[arg(long, env = "JCSD_MAX_CONNECTIONS")]
    max_connections: Option<usize>,

    /// Drop a connection whose exchange takes longer than this many seconds
    #[arg(long, env = "JCSD_IO_TIMEOUT_SECS")]
    io_timeout_secs: Option<u64>,

    /// Largest request envelope accepted, in bytes
    #[arg(long, env = "JCSD_MAX_REQUEST_BYTES", default_value_t = DEFAULT_MAX_REQUEST_BYTES)]
    max_request_bytes: usize,

    /// Maximum array/object nesting depth of submitted documents
    #[arg(long, env = "JCSD_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig::new(&self.socket)
            .with_max_request_bytes(self.max_request_bytes)
            .with_limits(Limits::new().with_max_depth(self.max_depth));
        if let Some(n) = self.max_connections {
            config = config.with_max_connections(n);
        }
        if let Some(secs) = self.io_timeout_secs {
            config = config.with_io_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jcsd=info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Cli::parse().into_config();
    let server = Server::bind(config).context("Failed to start jcsd")?;
    server.run_until(shutdown_signal()).await;
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = interrupt => {}
        _ = terminate => {}
    }
    info!("shutdown requested");
}
