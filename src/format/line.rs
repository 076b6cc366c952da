//! `key=value` line format.
//!
//! Renders the record's ordered fields as space-separated tokens:
//!
//! ```text
//! method=GET path=/users/1 format=html controller=UsersController action=show status=200 duration=15.2 view=2.1 db=0.5
//! ```
//!
//! Values containing whitespace are double-quoted. Nested values (params)
//! render as compact JSON. The runtime fields use the short keys `view` and
//! `db` in this format only.

use serde_json::Value;

use crate::format::FormatSerializer;
use crate::record::Record;

pub struct LineFormat;

impl FormatSerializer for LineFormat {
    fn serialize(&self, record: &Record) -> String {
        let mut tokens = Vec::with_capacity(record.payload().len() + 1);
        for (key, value) in record.fields() {
            let key = match key {
                "view_runtime" => "view",
                "db_runtime" => "db",
                other => other,
            };
            tokens.push(format!("{}={}", key, render(&value)));
        }
        tokens.join(" ")
    }
}

fn render(value: &Value) -> String {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // Nested structures keep their JSON shape inside the token
        nested => nested.to_string(),
    };
    if raw.chars().any(char::is_whitespace) {
        format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        raw
    }
}
