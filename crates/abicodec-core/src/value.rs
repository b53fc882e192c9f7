//! The decoded value model.
//!
//! Every decode produces [`Value`]s and every encode consumes them.
//! Integers are 256-bit and never lossy; addresses and byte values render
//! as `0x`-prefixed lowercase hex; tuples keep their fields in declaration
//! order under the field names (or positional `field{i}` names where the
//! ABI omits them).

use crate::util;
use alloy_primitives::{I256, U256};
use serde::{Serialize, Serializer};
use std::fmt;

/// A decoded, typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Uint(U256),
    Int(I256),
    Bool(bool),
    /// Variable-length byte payload.
    Bytes(Vec<u8>),
    /// `bytesN` payload, exactly N bytes.
    FixedBytes(Vec<u8>),
    String(String),
    /// `0x` + 40 lowercase hex chars.
    Address(String),
    Array(Vec<Value>),
    /// Ordered fields, keyed by declaration name.
    Tuple(Vec<(String, Value)>),
}

impl Value {
    /// Short kind name used in type-mismatch diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Uint(_) => "uint",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Bytes(_) => "bytes",
            Value::FixedBytes(_) => "fixed bytes",
            Value::String(_) => "string",
            Value::Address(_) => "address",
            Value::Array(_) => "array",
            Value::Tuple(_) => "tuple",
        }
    }

    pub fn as_uint(&self) -> Option<&U256> {
        match self {
            Value::Uint(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&I256> {
        match self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) | Value::FixedBytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&str> {
        match self {
            Value::Address(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Tuple(f) => Some(f),
            _ => None,
        }
    }

    /// Tuple field lookup by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_tuple()?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Plain JSON rendering: integers as decimal strings, byte payloads
    /// and addresses as lowercase `0x` hex, tuples as objects in
    /// declaration order.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Uint(u) => serde_json::Value::String(u.to_string()),
            Value::Int(i) => serde_json::Value::String(i.to_string()),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Bytes(b) | Value::FixedBytes(b) => {
                serde_json::Value::String(util::to_hex(b))
            }
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Address(a) => serde_json::Value::String(a.clone()),
            Value::Array(vals) => {
                serde_json::Value::Array(vals.iter().map(Value::to_json).collect())
            }
            Value::Tuple(fields) => {
                let mut map = serde_json::Map::with_capacity(fields.len());
                for (name, v) in fields {
                    map.insert(name.clone(), v.to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(ser)
    }
}

/// Serde adapter for `Vec<(String, Value)>` fields: serialized as a JSON
/// object in declaration order.
pub fn serialize_named_pairs<S: Serializer>(
    pairs: &[(String, Value)],
    ser: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;
    let mut map = ser.serialize_map(Some(pairs.len()))?;
    for (name, v) in pairs {
        map.serialize_entry(name, v)?;
    }
    map.end()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Uint(u) => write!(f, "{u}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Bytes(b) | Value::FixedBytes(b) => write!(f, "{}", util::to_hex(b)),
            Value::String(s) => write!(f, "{s}"),
            Value::Address(a) => write!(f, "{a}"),
            Value::Array(vals) => {
                let parts: Vec<_> = vals.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Tuple(fields) => {
                let parts: Vec<_> = fields.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_serialize_as_decimal_strings() {
        let v = Value::Uint(U256::MAX);
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            serde_json::Value::String(
                "115792089237316195423570985008687907853269984665640564039457584007913129639935"
                    .into()
            )
        );
        let v = Value::Int(I256::MINUS_ONE);
        assert_eq!(serde_json::to_value(&v).unwrap(), serde_json::json!("-1"));
    }

    #[test]
    fn bytes_serialize_as_hex() {
        let v = Value::Bytes(vec![0xde, 0xad]);
        assert_eq!(serde_json::to_value(&v).unwrap(), serde_json::json!("0xdead"));
    }

    #[test]
    fn tuple_field_lookup() {
        let v = Value::Tuple(vec![
            ("to".into(), Value::Address("0xabc".into())),
            ("amount".into(), Value::Uint(U256::from(7u64))),
        ]);
        assert!(v.field("to").is_some());
        assert!(v.field("missing").is_none());
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(
            Value::Array(vec![Value::Uint(U256::from(1u64)), Value::Uint(U256::from(2u64))])
                .to_string(),
            "[1, 2]"
        );
    }
}
