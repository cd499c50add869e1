//! Value tree → record text.

use std::fmt::Write;

use super::value::{Key, Table, Value};
use super::{DEPTH_EXCEEDED, INF_SENTINEL, NAN_SENTINEL, NEG_INF_SENTINEL};

/// Encoder tunables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Fractional digits rendered for every float.
    pub float_precision: usize,
    /// Deepest table nesting rendered; the top-level value is depth 1.
    pub max_depth: usize,
}

impl EncodeOptions {
    pub const DEFAULT_FLOAT_PRECISION: usize = 2;
    pub const DEFAULT_MAX_DEPTH: usize = 10;
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            float_precision: Self::DEFAULT_FLOAT_PRECISION,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Encodes with default options.
pub fn encode(value: &Value) -> String {
    encode_with(value, EncodeOptions::default())
}

/// Encodes with explicit options. Never fails: over-deep substructure and
/// non-finite floats are replaced with sentinels.
pub fn encode_with(value: &Value, options: EncodeOptions) -> String {
    let mut out = String::with_capacity(256);
    Encoder {
        out: &mut out,
        options,
    }
    .value(value, 1);
    out
}

struct Encoder<'a> {
    out: &'a mut String,
    options: EncodeOptions,
}

impl Encoder<'_> {
    fn value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Nil => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Int(i) => {
                let _ = write!(self.out, "{}", i);
            }
            Value::Float(f) => self.float(*f),
            Value::Str(s) => self.string(s),
            Value::Table(table) => {
                if depth > self.options.max_depth {
                    self.string(DEPTH_EXCEEDED);
                } else {
                    self.table(table, depth);
                }
            }
        }
    }

    fn float(&mut self, f: f64) {
        if f.is_nan() {
            self.string(NAN_SENTINEL);
        } else if f.is_infinite() {
            self.string(if f > 0.0 { INF_SENTINEL } else { NEG_INF_SENTINEL });
        } else {
            let _ = write!(self.out, "{:.*}", self.options.float_precision, f);
        }
    }

    fn table(&mut self, table: &Table, depth: usize) {
        if let Some(items) = table.as_dense_sequence() {
            self.out.push('[');
            for (i, item) in items.into_iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.value(item, depth + 1);
            }
            self.out.push(']');
            return;
        }

        self.out.push('{');
        for (i, (key, item)) in table.entries().iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            match key {
                Key::Name(name) => self.string(name),
                Key::Index(index) => {
                    let _ = write!(self.out, "\"{}\"", index);
                }
            }
            self.out.push(':');
            self.value(item, depth + 1);
        }
        self.out.push('}');
    }

    fn string(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                '\u{08}' => self.out.push_str("\\b"),
                '\u{0c}' => self.out.push_str("\\f"),
                c if c.is_control() => {
                    let _ = write!(self.out, "\\u{:04x}", c as u32);
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_use_fixed_precision() {
        assert_eq!(encode(&Value::Float(1.0)), "1.00");
        assert_eq!(encode(&Value::Float(-2.256)), "-2.26");
        assert_eq!(encode(&Value::Float(1e-9)), "0.00");

        let three = EncodeOptions {
            float_precision: 3,
            ..EncodeOptions::default()
        };
        assert_eq!(encode_with(&Value::Float(0.5), three), "0.500");
    }

    #[test]
    fn non_finite_floats_become_quoted_sentinels() {
        assert_eq!(encode(&Value::Float(f64::NAN)), "\"nan\"");
        assert_eq!(encode(&Value::Float(f64::INFINITY)), "\"inf\"");
        assert_eq!(encode(&Value::Float(f64::NEG_INFINITY)), "\"-inf\"");
    }

    #[test]
    fn strings_are_escaped() {
        let s = Value::from("a\"b\\c\nd\u{01}");
        assert_eq!(encode(&s), r#""a\"b\\c\nd\u0001""#);
    }

    #[test]
    fn dense_tables_render_as_arrays() {
        let seq = Value::Table(Table::sequence([1, 2, 3]));
        assert_eq!(encode(&seq), "[1,2,3]");
        assert_eq!(encode(&Value::Table(Table::new())), "[]");
    }

    #[test]
    fn sparse_or_named_tables_render_as_objects() {
        let mut sparse = Table::new();
        sparse.insert(1_i64, true);
        sparse.insert(5_i64, false);
        assert_eq!(encode(&Value::Table(sparse)), r#"{"1":true,"5":false}"#);

        let named = Table::new().field("x", 1.5).field("ok", Value::Nil);
        assert_eq!(encode(&Value::Table(named)), r#"{"x":1.50,"ok":null}"#);
    }

    #[test]
    fn over_deep_tables_are_replaced_not_fatal() {
        let mut value = Value::Table(Table::new().field("leaf", 1));
        for _ in 0..4 {
            value = Value::Table(Table::new().field("child", value));
        }
        let opts = EncodeOptions {
            max_depth: 3,
            ..EncodeOptions::default()
        };
        assert_eq!(
            encode_with(&value, opts),
            r#"{"child":{"child":{"child":"<depth exceeded>"}}}"#
        );
        // Within the default cap the whole tree is rendered.
        assert!(encode(&value).contains(r#""leaf":1"#));
    }
}
