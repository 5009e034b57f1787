// Bean serialization contract
//
// Beans are plain records whose fields are all independently nullable. Decode
// treats a missing key and an explicit `null` the same way (field unset);
// encode always writes every declared field, in declaration order, emitting
// `null` for unset ones so that round trips are stable.

use crate::error::{BridgeError, Result};
use serde_json::{Map, Value};

/// A value that can appear as a bean field, a list element or a positional
/// request parameter.
pub trait WireValue: Sized {
    /// Append the JSON encoding of `self` to `out`.
    fn write_json(&self, out: &mut String);

    /// Convert a parsed JSON value. `null` is never passed for optional bean
    /// fields; required parameters see it and reject it.
    fn read_json(value: &Value) -> Result<Self>;
}

/// A named record type with a stable wire name.
pub trait Bean: WireValue + Default {
    /// Name of the type on the web side (`Namespace.<TYPE_NAME>.toObject`).
    const TYPE_NAME: &'static str;

    fn to_json(&self) -> String {
        let mut out = String::with_capacity(64);
        self.write_json(&mut out);
        out
    }

    fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::read_json(&value)
    }
}

/// Encode any wire value to a standalone JSON fragment.
pub fn to_json<T: WireValue>(value: &T) -> String {
    let mut out = String::new();
    value.write_json(&mut out);
    out
}

/// Parse and convert a standalone JSON fragment.
pub fn from_json<T: WireValue>(json: &str) -> Result<T> {
    let value: Value = serde_json::from_str(json)?;
    T::read_json(&value)
}

/// Writes `{ "a": 1, "b": null }` one field at a time.
#[derive(Debug)]
pub struct ObjectWriter<'a> {
    out: &'a mut String,
    first: bool,
}

impl<'a> ObjectWriter<'a> {
    pub fn begin(out: &'a mut String) -> Self {
        out.push_str("{ ");
        ObjectWriter { out, first: true }
    }

    pub fn field<T: WireValue>(&mut self, key: &str, value: &Option<T>) {
        if !self.first {
            self.out.push_str(", ");
        }
        self.first = false;

        write_json_string(self.out, key);
        self.out.push_str(": ");
        match value {
            Some(value) => value.write_json(self.out),
            None => self.out.push_str("null"),
        }
    }

    pub fn end(self) {
        self.out.push_str(" }");
    }
}

/// Reads declared fields out of a JSON object, ignoring undeclared keys.
#[derive(Debug)]
pub struct ObjectReader<'a> {
    bean: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> ObjectReader<'a> {
    pub fn new(bean: &'static str, value: &'a Value) -> Result<Self> {
        let map = value.as_object().ok_or(BridgeError::InvalidBean(bean))?;
        Ok(ObjectReader { bean, map })
    }

    pub fn field<T: WireValue>(&self, key: &'static str) -> Result<Option<T>> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::read_json(value)
                .map(Some)
                .map_err(|e| e.in_field(self.bean, key)),
        }
    }
}

/// Append `s` as a quoted JSON string literal.
///
/// The output is also a valid JavaScript string literal: U+2028 and U+2029
/// are escaped as well.
pub fn write_json_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(expected: &'static str, value: &Value) -> BridgeError {
    BridgeError::InvalidValue {
        expected,
        found: kind_of(value),
    }
}

impl WireValue for String {
    fn write_json(&self, out: &mut String) {
        write_json_string(out, self);
    }

    fn read_json(value: &Value) -> Result<Self> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch("string", value))
    }
}

impl WireValue for char {
    fn write_json(&self, out: &mut String) {
        let mut buf = [0u8; 4];
        write_json_string(out, self.encode_utf8(&mut buf));
    }

    fn read_json(value: &Value) -> Result<Self> {
        let s = value.as_str().ok_or_else(|| mismatch("character", value))?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(BridgeError::InvalidValue {
                expected: "character",
                found: "string",
            }),
        }
    }
}

impl WireValue for bool {
    fn write_json(&self, out: &mut String) {
        out.push_str(if *self { "true" } else { "false" });
    }

    fn read_json(value: &Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| mismatch("boolean", value))
    }
}

impl WireValue for i64 {
    fn write_json(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }

    fn read_json(value: &Value) -> Result<Self> {
        value.as_i64().ok_or_else(|| mismatch("64-bit integer", value))
    }
}

impl WireValue for i32 {
    fn write_json(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }

    fn read_json(value: &Value) -> Result<Self> {
        value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| mismatch("32-bit integer", value))
    }
}

impl WireValue for u8 {
    fn write_json(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }

    fn read_json(value: &Value) -> Result<Self> {
        value
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(|| mismatch("byte", value))
    }
}

impl WireValue for f64 {
    fn write_json(&self, out: &mut String) {
        match serde_json::Number::from_f64(*self) {
            Some(n) => out.push_str(&n.to_string()),
            None => out.push_str("null"),
        }
    }

    fn read_json(value: &Value) -> Result<Self> {
        value.as_f64().ok_or_else(|| mismatch("number", value))
    }
}

impl<T: WireValue> WireValue for Vec<T> {
    fn write_json(&self, out: &mut String) {
        out.push('[');
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            item.write_json(out);
        }
        out.push(']');
    }

    fn read_json(value: &Value) -> Result<Self> {
        value
            .as_array()
            .ok_or_else(|| mismatch("array", value))?
            .iter()
            .map(T::read_json)
            .collect()
    }
}
