//! RFC 8785 canonical serialization of a [`Value`] tree.
//!
//! The output contains no insignificant whitespace. Object members are
//! emitted in ascending UTF-16 code-unit order of their keys, array elements
//! in their original order. Every value kind is handled by an exhaustive
//! `match`, so there is no "unsupported value" path.

use std::cmp::Ordering;

use crate::error::Result;
use crate::number::format_number;
use crate::types::Value;

/// Serialize a value tree to its canonical JSON text.
///
/// Pure and reentrant. Fails only if the tree holds a non-finite number,
/// which the decoder never produces; nothing is returned on failure, so
/// callers never observe partial output.
pub fn canonicalize(value: &Value) -> Result<String> {
    let mut out = String::new();
    write_value(value, &mut out)?;
    Ok(out)
}

/// Compare two keys by their UTF-16 code units.
///
/// This differs from `str`'s byte ordering for characters above U+FFFF:
/// they encode as surrogates `0xD800..=0xDFFF`, which sort *before*
/// BMP characters in `0xE000..=0xFFFF` even though their code points are larger.
pub fn compare_keys_utf16(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

fn write_value(value: &Value, out: &mut String) -> Result<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => out.push_str(&format_number(*n)?),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut members: Vec<(&String, &Value)> = map.iter().collect();
            members.sort_by(|(a, _), (b, _)| compare_keys_utf16(a, b));

            out.push('{');
            for (i, (key, member)) in members.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_value(member, out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

/// Emit a quoted string, escaping only `"`, `\` and C0 controls.
fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{000C}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            c if c < '\u{0020}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}
