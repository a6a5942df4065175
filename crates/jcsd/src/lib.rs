//! # jcsd
//!
//! Local Unix-socket service exposing the JSON Canonicalization Scheme
//! (RFC 8785) engine from [`jcs_core`].
//!
//! Each connection carries exactly one exchange:
//!
//! ```text
//! client → {"op":"canon","source":"<json text>"}
//! server → {"result":"<canonical json text>"}\n      (or {"error":"<message>"}\n)
//! ```
//!
//! after which the server closes the connection. Connections are served
//! concurrently, one task each; nothing mutable is shared between them.
//!
//! ## Modules
//!
//! - [`config`]: immutable [`ServerConfig`] injected at bind time
//! - [`protocol`]: request/response envelopes and op dispatch
//! - [`connection`]: the per-connection read → dispatch → respond sequence
//! - [`server`]: socket setup and the accept loop
//! - [`client`]: a minimal client for the same protocol
//! - [`error`]: error types

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod protocol;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, UnsupportedOp};
pub use protocol::{Op, Request, Response};
pub use server::Server;
