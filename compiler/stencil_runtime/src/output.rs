use std::fmt::Write;

use crate::Value;

/// Render output sink.
#[derive(Clone, Debug, Default)]
pub struct Output {
    buf: String,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_str(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Write a value as-is (output of safe functions).
    pub fn write_value(&mut self, value: &Value) {
        let _ = write!(self.buf, "{value}");
    }

    /// Write a value with HTML special characters escaped.
    pub fn write_escaped(&mut self, value: &Value) {
        match value {
            Value::String(s) => escape_html_into(s, &mut self.buf),
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) => {
                self.write_value(value);
            }
            other => escape_html_into(&other.to_string(), &mut self.buf),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

fn escape_html_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}
