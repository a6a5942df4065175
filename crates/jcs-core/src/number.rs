//! ECMAScript number serialization (RFC 8785 §3.2.2.3).
//!
//! JCS renders every number exactly as `Number.prototype.toString` would for
//! the same IEEE-754 double: the shortest digit string that reads back as the
//! same double, ties between two equally close candidates going to the even
//! digit, laid out in plain notation when the decimal exponent `n` satisfies
//! `-6 < n <= 21` and in exponential notation (`1e+21`, `1.5e-7`) otherwise.
//!
//! Both steps are done by `ryu-js`, a port of Ryū that emits the ECMAScript
//! layout. This module adds the JSON-specific parts: non-finite values are
//! errors and negative zero is `0`.

use crate::error::{JcsError, Result};

/// Format a double the way ECMAScript's `Number.prototype.toString` does.
///
/// Negative zero renders as `0`; integral values never carry a decimal point.
/// Fails only for NaN and the infinities, which have no JSON representation.
pub fn format_number(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(JcsError::Format(format!(
            "{value} has no JSON representation"
        )));
    }
    if value == 0.0 {
        return Ok("0".to_string());
    }

    let mut buffer = ryu_js::Buffer::new();
    Ok(buffer.format_finite(value).to_string())
}
