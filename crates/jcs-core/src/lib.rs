//! # jcs-core
//!
//! Pure-Rust implementation of the **JSON Canonicalization Scheme (JCS, RFC 8785)**.
//!
//! JCS gives every JSON document a single byte-exact serialization, so that
//! semantically identical documents can be hashed, signed and compared as bytes.
//! The transform is a strict decode into a [`Value`] tree followed by a pure
//! serialization pass:
//!
//! - numbers are rendered with the ECMAScript `Number.prototype.toString` algorithm
//!   (shortest round-trip digits, exponent outside `[1e-6, 1e21)`)
//! - strings escape only `"`, `\` and C0 controls
//! - object keys are sorted by UTF-16 code units
//! - no insignificant whitespace is emitted
//!
//! ## Quick start
//!
//! ```rust
//! use jcs_core::transform;
//!
//! let input = r#"{"b": 1.0, "a": [true, null, "é"]}"#;
//! let canonical = transform(input.as_bytes()).unwrap();
//! assert_eq!(canonical, r#"{"a":[true,null,"é"],"b":1}"#);
//! ```
//!
//! ## Modules
//!
//! - [`decoder`]: raw bytes → [`Value`] (strict RFC 8259, no extensions)
//! - [`canonicalizer`]: [`Value`] → canonical text
//! - [`number`]: ECMAScript number-to-string for IEEE-754 doubles
//! - [`limits`]: nesting depth and input size bounds
//! - [`error`]: parse and format errors
//! - [`types`]: the [`Value`] tree

pub mod canonicalizer;
pub mod decoder;
pub mod error;
pub mod limits;
pub mod number;
pub mod types;

pub use canonicalizer::{canonicalize, compare_keys_utf16};
pub use decoder::{parse, parse_with_limits};
pub use error::{JcsError, Result};
pub use limits::Limits;
pub use number::format_number;
pub use types::Value;

/// Canonicalize raw JSON bytes using the default [`Limits`].
///
/// This is the engine entry point shared by the CLI and the socket service.
/// It holds no state and may be called from any number of threads at once.
pub fn transform(input: &[u8]) -> Result<String> {
    transform_with_limits(input, Limits::default())
}

/// Canonicalize raw JSON bytes under explicit [`Limits`].
pub fn transform_with_limits(input: &[u8], limits: Limits) -> Result<String> {
    let value = parse_with_limits(input, limits)?;
    canonicalize(&value)
}

/// Returns `true` when `input` is already byte-identical to its canonical form.
///
/// Malformed input is an error, not `false`.
pub fn is_canonical(input: &[u8]) -> Result<bool> {
    let canonical = transform(input)?;
    Ok(canonical.as_bytes() == input)
}
