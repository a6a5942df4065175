//! Strict JSON decoder: raw bytes into a [`Value`] tree.
//!
//! Accepts exactly RFC 8259 JSON and nothing else: no comments, no trailing
//! commas, no unquoted keys, no `NaN`/`Infinity`, no leading `+` or leading
//! zeros, no bare trailing `.`. Parsing is all-or-nothing; the first problem
//! aborts with a [`JcsError::Parse`] carrying the byte offset where it was found.
//!
//! # Key design decisions
//!
//! - **UTF-8 up front**: the whole input is validated once, so the scanner can
//!   slice `&str` runs straight out of the input without re-checking.
//! - **Numbers go through `str::parse::<f64>`** after the grammar has been
//!   checked here. That conversion is correctly rounded, so every literal maps
//!   to the nearest double; literals that overflow to infinity are rejected.
//! - **Duplicate keys**: the last occurrence wins.
//! - **Depth guard**: every `[`/`{` increments a depth counter checked against
//!   [`Limits::max_depth`] before recursing.

use std::collections::BTreeMap;

use crate::error::{JcsError, Result};
use crate::limits::Limits;
use crate::types::Value;

/// Parse JSON bytes with the default [`Limits`].
pub fn parse(input: &[u8]) -> Result<Value> {
    parse_with_limits(input, Limits::default())
}

/// Parse JSON bytes with explicit [`Limits`].
pub fn parse_with_limits(input: &[u8], limits: Limits) -> Result<Value> {
    if let Some(max) = limits.max_input_size {
        if input.len() > max {
            return Err(JcsError::parse(
                0,
                format!("input of {} bytes exceeds limit of {max}", input.len()),
            ));
        }
    }

    let text = std::str::from_utf8(input)
        .map_err(|e| JcsError::parse(e.valid_up_to(), "invalid UTF-8"))?;

    let mut decoder = Decoder::new(text, limits);
    let value = decoder.parse_value()?;
    decoder.skip_whitespace();
    if decoder.pos < decoder.bytes.len() {
        return Err(decoder.error("trailing characters after top-level value"));
    }
    Ok(value)
}

/// Recursive-descent scanner over validated UTF-8 text.
struct Decoder<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    limits: Limits,
}

impl<'a> Decoder<'a> {
    fn new(text: &'a str, limits: Limits) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            depth: 0,
            limits,
        }
    }

    fn error(&self, message: impl Into<String>) -> JcsError {
        JcsError::parse(self.pos, message)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Consume `expected` or fail with a message naming it.
    fn expect(&mut self, expected: u8) -> Result<()> {
        match self.peek() {
            Some(b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.error(format!("expected '{}'", expected as char))),
            None => Err(self.error(format!(
                "unexpected end of input, expected '{}'",
                expected as char
            ))),
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => Ok(Value::String(self.parse_string()?)),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(b't') => self.parse_literal("true", Value::Bool(true)),
            Some(b'f') => self.parse_literal("false", Value::Bool(false)),
            Some(b'n') => self.parse_literal("null", Value::Null),
            Some(b'+') => Err(self.error("numbers may not start with '+'")),
            Some(b'.') => Err(self.error("numbers must have a digit before '.'")),
            Some(b'N' | b'I') => Err(self.error("NaN and Infinity are not valid JSON")),
            Some(_) => Err(self.error("unexpected character")),
        }
    }

    fn parse_literal(&mut self, literal: &str, value: Value) -> Result<Value> {
        if self.bytes[self.pos..].starts_with(literal.as_bytes()) {
            self.pos += literal.len();
            Ok(value)
        } else {
            Err(self.error(format!("invalid literal, expected '{literal}'")))
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.limits.max_depth {
            return Err(self.error(format!(
                "nesting depth exceeds limit of {}",
                self.limits.max_depth
            )));
        }
        Ok(())
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.enter()?;
        self.pos += 1; // '['

        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Value::Array(items));
        }

        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.peek() == Some(b']') {
                        return Err(self.error("trailing comma in array"));
                    }
                }
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.error("expected ',' or ']' in array")),
                None => return Err(self.error("unterminated array")),
            }
        }

        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.enter()?;
        self.pos += 1; // '{'

        let mut map = BTreeMap::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Value::Object(map));
        }

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'"') => {}
                Some(b'}') => return Err(self.error("trailing comma in object")),
                Some(_) => return Err(self.error("object keys must be strings")),
                None => return Err(self.error("unterminated object")),
            }
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect(b':')?;
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.error("expected ',' or '}' in object")),
                None => return Err(self.error("unterminated object")),
            }
        }

        self.depth -= 1;
        Ok(Value::Object(map))
    }

    /// Scan a number per the RFC 8259 grammar, then convert the literal.
    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;

        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                if let Some(b'0'..=b'9') = self.peek() {
                    return Err(self.error("leading zeros are not allowed"));
                }
            }
            Some(b'1'..=b'9') => self.skip_digits(),
            Some(b'I') => return Err(self.error("NaN and Infinity are not valid JSON")),
            _ => return Err(self.error("expected digit")),
        }

        if self.peek() == Some(b'.') {
            self.pos += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error("expected digit after decimal point"));
            }
            self.skip_digits();
        }

        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error("expected digit in exponent"));
            }
            self.skip_digits();
        }

        let literal = &self.text[start..self.pos];
        let value: f64 = literal
            .parse()
            .map_err(|_| JcsError::parse(start, format!("invalid number '{literal}'")))?;
        if !value.is_finite() {
            return Err(JcsError::parse(
                start,
                format!("number out of range '{literal}'"),
            ));
        }
        Ok(Value::Number(value))
    }

    fn skip_digits(&mut self) {
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
    }

    /// Scan a string literal starting at its opening quote, returning the
    /// unescaped contents.
    fn parse_string(&mut self) -> Result<String> {
        let open = self.pos;
        self.pos += 1; // '"'

        let mut out = String::new();
        let mut run_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(JcsError::parse(open, "unterminated string")),
                Some(b'"') => {
                    out.push_str(&self.text[run_start..self.pos]);
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(&self.text[run_start..self.pos]);
                    self.pos += 1;
                    out.push(self.parse_escape()?);
                    run_start = self.pos;
                }
                Some(b) if b < 0x20 => {
                    return Err(self.error("unescaped control character in string"));
                }
                // Multi-byte UTF-8 continuation bytes are all >= 0x80, so
                // stepping bytewise never splits a run at a non-boundary.
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Decode the escape following a backslash.
    fn parse_escape(&mut self) -> Result<char> {
        let escape_start = self.pos - 1;
        let c = match self.peek() {
            Some(b'"') => '"',
            Some(b'\\') => '\\',
            Some(b'/') => '/',
            Some(b'b') => '\u{0008}',
            Some(b'f') => '\u{000C}',
            Some(b'n') => '\n',
            Some(b'r') => '\r',
            Some(b't') => '\t',
            Some(b'u') => {
                self.pos += 1;
                return self.parse_unicode_escape(escape_start);
            }
            Some(_) => return Err(self.error("invalid escape sequence")),
            None => return Err(self.error("unterminated string")),
        };
        self.pos += 1;
        Ok(c)
    }

    /// Decode `XXXX` after `\u`, combining a following `\uXXXX` low surrogate
    /// when the first unit is a high surrogate.
    fn parse_unicode_escape(&mut self, escape_start: usize) -> Result<char> {
        let unit = self.read_hex4()?;
        match unit {
            0xD800..=0xDBFF => {
                if !self.bytes[self.pos..].starts_with(b"\\u") {
                    return Err(JcsError::parse(escape_start, "unpaired high surrogate"));
                }
                self.pos += 2;
                let low = self.read_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(JcsError::parse(escape_start, "unpaired high surrogate"));
                }
                let scalar =
                    0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                char::from_u32(scalar)
                    .ok_or_else(|| JcsError::parse(escape_start, "invalid surrogate pair"))
            }
            0xDC00..=0xDFFF => Err(JcsError::parse(escape_start, "unpaired low surrogate")),
            _ => char::from_u32(u32::from(unit))
                .ok_or_else(|| JcsError::parse(escape_start, "invalid unicode escape")),
        }
    }

    fn read_hex4(&mut self) -> Result<u16> {
        let bytes = self.bytes;
        let hex = bytes
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.error("truncated unicode escape"))?;
        let mut unit: u16 = 0;
        for &b in hex {
            let nibble = match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                b'A'..=b'F' => b - b'A' + 10,
                _ => return Err(self.error("invalid hex digit in unicode escape")),
            };
            unit = (unit << 4) | u16::from(nibble);
        }
        self.pos += 4;
        Ok(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset_of(input: &str) -> usize {
        parse(input.as_bytes())
            .unwrap_err()
            .offset()
            .expect("parse error carries an offset")
    }

    #[test]
    fn scalars() {
        assert_eq!(parse(b"null").unwrap(), Value::Null);
        assert_eq!(parse(b" true ").unwrap(), Value::Bool(true));
        assert_eq!(parse(b"false").unwrap(), Value::Bool(false));
        assert_eq!(parse(b"-12.5e1").unwrap(), Value::Number(-125.0));
        assert_eq!(parse(br#""hi""#).unwrap(), Value::String("hi".into()));
    }

    #[test]
    fn error_offsets() {
        assert_eq!(offset_of("[1,]"), 3);
        assert_eq!(offset_of("01"), 1);
        assert_eq!(offset_of("1."), 2);
        assert_eq!(offset_of("null x"), 5);
        assert_eq!(offset_of(r#""abc"#), 0);
    }

    #[test]
    fn invalid_utf8_offset() {
        let err = parse(b"\"a\xff\"").unwrap_err();
        assert_eq!(err.offset(), Some(2));
    }

    #[test]
    fn surrogate_pair_combines() {
        let v = parse(br#""\ud83d\ude00""#).unwrap();
        assert_eq!(v, Value::String("\u{1F600}".into()));
    }

    #[test]
    fn lone_surrogates_rejected() {
        assert!(parse(br#""\ud83d""#).is_err());
        assert!(parse(br#""\ud83dx""#).is_err());
        assert!(parse(br#""\ude00""#).is_err());
        assert!(parse(br#""\ud83d\u0041""#).is_err());
    }

    #[test]
    fn depth_limit() {
        let limits = Limits::new().with_max_depth(2);
        assert!(parse_with_limits(b"[[1]]", limits).is_ok());
        let err = parse_with_limits(b"[[[1]]]", limits).unwrap_err();
        assert_eq!(err.offset(), Some(2));
    }

    #[test]
    fn input_size_limit() {
        let limits = Limits::new().with_max_input_size(4);
        assert!(parse_with_limits(b"null", limits).is_ok());
        assert!(parse_with_limits(b"[1,2]", limits).is_err());
    }
}
