use crate::bean::{kind_of, write_json_string};
use crate::error::{BridgeError, Result};
use serde_json::Value;

/// A closed set of named values carried on the wire as `{ "value": "Name" }`.
///
/// Every wire enum has an `Unknown` member that absorbs names this side does
/// not recognise, so a newer web client never breaks decoding.
pub trait WireEnum: Copy + Sized + 'static {
    const TYPE_NAME: &'static str;
    const UNKNOWN: Self;

    fn as_wire(&self) -> &'static str;

    /// Recognised names only; see [`WireEnum::from_wire_or_unknown`].
    fn from_wire(name: &str) -> Option<Self>;

    fn from_wire_or_unknown(name: &str) -> Self {
        Self::from_wire(name).unwrap_or(Self::UNKNOWN)
    }
}

pub fn write_enum<E: WireEnum>(value: &E, out: &mut String) {
    out.push_str("{ \"value\": ");
    write_json_string(out, value.as_wire());
    out.push_str(" }");
}

/// Lenient decode: `{ "value": "X" }` or a bare `"X"`. A missing or
/// unrecognised name becomes `Unknown`; only a non-textual shape fails.
pub fn read_enum<E: WireEnum>(value: &Value) -> Result<E> {
    match value {
        Value::String(name) => Ok(E::from_wire_or_unknown(name)),
        Value::Object(map) => match map.get("value") {
            Some(Value::String(name)) => Ok(E::from_wire_or_unknown(name)),
            Some(Value::Null) | None => Ok(E::UNKNOWN),
            Some(other) => Err(BridgeError::InvalidValue {
                expected: "enum name",
                found: kind_of(other),
            }),
        },
        other => Err(BridgeError::InvalidValue {
            expected: E::TYPE_NAME,
            found: kind_of(other),
        }),
    }
}
