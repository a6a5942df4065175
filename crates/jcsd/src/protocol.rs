//! Request/response envelopes and operation dispatch.
//!
//! Envelopes are plain JSON objects serialized with `serde_json`:
//!
//! - request: `{"op":"canon","source":"<json text>"}`
//! - response: `{"result":"<canonical text>"}` or `{"error":"<message>"}`
//!
//! A missing `op` or `source` reads as the empty string, so a request without
//! an `op` is answered with `unsupported op` rather than `invalid JSON`.

use std::fmt;
use std::str::FromStr;

use jcs_core::Limits;
use serde::{Deserialize, Serialize};

use crate::error::UnsupportedOp;

/// Error text for a request that is not a well-formed envelope.
pub const INVALID_JSON: &str = "invalid JSON";
/// Error text for a request naming an unknown operation.
pub const UNSUPPORTED_OP: &str = "unsupported op";
/// Error text for a request larger than the configured bound.
pub const REQUEST_TOO_LARGE: &str = "request too large";

/// Operations the server implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Canonicalize `source` with RFC 8785.
    Canon,
}

impl Op {
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Canon => "canon",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Op {
    type Err = UnsupportedOp;

    /// Exact, case-sensitive match; there is no default operation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "canon" => Ok(Op::Canon),
            other => Err(UnsupportedOp(other.to_string())),
        }
    }
}

/// Request envelope as received on the wire.
///
/// `op` is kept as text so that an unknown operation is distinguishable from
/// a malformed envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub op: String,
    #[serde(default)]
    pub source: String,
}

impl Request {
    /// A `canon` request for `source`.
    pub fn canon(source: impl Into<String>) -> Self {
        Self {
            op: Op::Canon.to_string(),
            source: source.into(),
        }
    }

    pub fn op(&self) -> Result<Op, UnsupportedOp> {
        self.op.parse()
    }
}

/// Response envelope. Exactly one of `result` / `error` is set; the
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Response {
    pub fn ok(result: impl Into<String>) -> Self {
        Self {
            result: Some(result.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(message.into()),
        }
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }

    /// Convert into a `Result`, treating a response with neither field set
    /// (only possible when deserialized from a foreign peer) as an error.
    pub fn into_result(self) -> Result<String, String> {
        match (self.result, self.error) {
            (Some(result), None) => Ok(result),
            (_, Some(error)) => Err(error),
            (None, None) => Err("empty response".to_string()),
        }
    }
}

/// Run one request against the engine.
pub fn dispatch(request: &Request, limits: Limits) -> Response {
    match request.op() {
        Ok(Op::Canon) => match jcs_core::transform_with_limits(request.source.as_bytes(), limits) {
            Ok(canonical) => Response::ok(canonical),
            Err(e) => Response::error(e.to_string()),
        },
        Err(_) => Response::error(UNSUPPORTED_OP),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_parsing_is_exact() {
        assert_eq!("canon".parse::<Op>(), Ok(Op::Canon));
        assert!("Canon".parse::<Op>().is_err());
        assert!("".parse::<Op>().is_err());
        assert_eq!(
            "bogus".parse::<Op>(),
            Err(UnsupportedOp("bogus".to_string()))
        );
    }

    #[test]
    fn response_serializes_one_field() {
        let ok = serde_json::to_string(&Response::ok("{}")).unwrap();
        assert_eq!(ok, r#"{"result":"{}"}"#);
        let err = serde_json::to_string(&Response::error(UNSUPPORTED_OP)).unwrap();
        assert_eq!(err, r#"{"error":"unsupported op"}"#);
    }

    #[test]
    fn request_fields_default_to_empty() {
        let req: Request = serde_json::from_str(r#"{"source":"1"}"#).unwrap();
        assert_eq!(req.op, "");
        assert!(req.op().is_err());
        let req: Request = serde_json::from_str(r#"{"op":"canon"}"#).unwrap();
        assert_eq!(req.source, "");
    }

    #[test]
    fn dispatch_canon() {
        let resp = dispatch(&Request::canon(r#"{"b":1,"a":2}"#), Limits::default());
        assert_eq!(resp.result(), Some(r#"{"a":2,"b":1}"#));
        assert_eq!(resp.error_message(), None);
    }

    #[test]
    fn dispatch_unknown_op() {
        let req = Request {
            op: "bogus".into(),
            source: "{}".into(),
        };
        let resp = dispatch(&req, Limits::default());
        assert_eq!(resp, Response::error("unsupported op"));
    }

    #[test]
    fn dispatch_reports_engine_errors() {
        let resp = dispatch(&Request::canon("{"), Limits::default());
        let message = resp.into_result().unwrap_err();
        assert!(message.contains("JSON parse error at byte 1"), "{message}");
    }

    #[test]
    fn dispatch_applies_limits() {
        let resp = dispatch(&Request::canon("[[1]]"), Limits::new().with_max_depth(1));
        assert!(!resp.is_ok());
    }
}
