//! Rust literal rendering

use std::fmt::Write;

use serde_json::Value;

/// Render a string as a Rust string literal
pub fn str_literal(s: &str) -> String {
    format!("{s:?}")
}

/// Render bytes as a Rust byte string literal.
///
/// Every byte outside printable ASCII is written as `\xNN`, so the
/// literal evaluates to exactly the input bytes.
pub fn bytes_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 3);
    out.push_str("b\"");
    for &byte in bytes {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "\\x{byte:02x}");
            }
        }
    }
    out.push('"');
    out
}

/// Largest JSON value, counted in nodes, rendered through `serde_json::json!`.
///
/// The macro recurses once per element; past this size values are parsed
/// from a raw string literal instead so the output stays under rustc's
/// default recursion limit.
pub const JSON_MACRO_MAX_NODES: usize = 16;

/// Render a string as a Rust raw string literal with enough `#`s
pub fn raw_str_literal(s: &str) -> String {
    let mut longest = 0;
    let mut run = None;
    for c in s.chars() {
        run = match (c, run) {
            ('"', _) => Some(0),
            ('#', Some(n)) => Some(n + 1),
            _ => None,
        };
        if let Some(n) = run {
            longest = longest.max(n);
        }
    }

    let hashes = "#".repeat(longest + 1);
    format!("r{hashes}\"{s}\"{hashes}")
}

/// Render a JSON value as a Rust expression evaluating to a `serde_json::Value`
pub fn json_literal(value: &Value) -> String {
    if json_nodes(value) > JSON_MACRO_MAX_NODES {
        return format!(
            "serde_json::from_str::<serde_json::Value>({}).unwrap()",
            raw_str_literal(&value.to_string())
        );
    }

    let mut out = String::from("serde_json::json!(");
    write_json(&mut out, value);
    out.push(')');
    out
}

fn json_nodes(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(json_nodes).sum::<usize>(),
        Value::Object(map) => 1 + map.values().map(json_nodes).sum::<usize>(),
        _ => 1,
    }
}

fn write_json(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(&str_literal(s)),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_json(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&str_literal(key));
                out.push_str(": ");
                write_json(out, item);
            }
            out.push('}');
        }
    }
}
