//! JSON-to-typed-value coercion.
//!
//! Callers that hold loosely-typed `serde_json::Value` arguments (an RPC
//! payload, a fixture file, a config) convert them into typed [`Value`]s
//! under an expected [`AbiType`] before encoding. Integer inputs accept
//! decimal strings, `0x`-hex strings, and plain JSON numbers; range
//! enforcement is the encoder's job.

use crate::error::CodecError;
use crate::types::AbiType;
use crate::util;
use crate::value::Value;
use alloy_primitives::{I256, U256};

/// Coerce a JSON value into a typed [`Value`] for `ty`. `index` is the
/// position of the enclosing top-level argument, used in diagnostics.
pub fn value_from_json(
    json: &serde_json::Value,
    ty: &AbiType,
    index: usize,
) -> Result<Value, CodecError> {
    let mismatch = |got: &str| CodecError::TypeMismatch {
        index,
        expected: ty.canonical(),
        got: got.to_string(),
    };

    match ty {
        AbiType::Uint(_) => match json {
            serde_json::Value::String(s) => util::parse_u256(s)
                .map(Value::Uint)
                .ok_or_else(|| mismatch(&format!("unparseable integer '{s}'"))),
            serde_json::Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Ok(Value::Uint(U256::from(u)))
                } else {
                    Err(mismatch(&format!("non-integer number {n}")))
                }
            }
            other => Err(mismatch(json_kind(other))),
        },
        AbiType::Int(_) => match json {
            serde_json::Value::String(s) => util::parse_i256(s)
                .map(Value::Int)
                .ok_or_else(|| mismatch(&format!("unparseable integer '{s}'"))),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(I256::try_from(i).expect("i64 fits in I256")))
                } else {
                    Err(mismatch(&format!("non-integer number {n}")))
                }
            }
            other => Err(mismatch(json_kind(other))),
        },
        AbiType::Bool => match json {
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            other => Err(mismatch(json_kind(other))),
        },
        AbiType::Address => match json {
            serde_json::Value::String(s) => Ok(Value::Address(s.clone())),
            other => Err(mismatch(json_kind(other))),
        },
        AbiType::FixedBytes(_) | AbiType::Bytes => match json {
            serde_json::Value::String(s) => {
                let bytes = util::hex_to_bytes(s)
                    .map_err(|e| mismatch(&format!("bad hex '{s}': {e}")))?;
                Ok(match ty {
                    AbiType::Bytes => Value::Bytes(bytes),
                    _ => Value::FixedBytes(bytes),
                })
            }
            other => Err(mismatch(json_kind(other))),
        },
        AbiType::String => match json {
            serde_json::Value::String(s) => Ok(Value::String(s.clone())),
            other => Err(mismatch(json_kind(other))),
        },
        AbiType::Array(elem) => match json {
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| value_from_json(item, elem, index))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Err(mismatch(json_kind(other))),
        },
        AbiType::FixedArray(elem, len) => match json {
            serde_json::Value::Array(items) => {
                if items.len() != *len {
                    return Err(CodecError::Range {
                        index,
                        reason: format!(
                            "fixed array expects {len} elements, got {}",
                            items.len()
                        ),
                    });
                }
                items
                    .iter()
                    .map(|item| value_from_json(item, elem, index))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            other => Err(mismatch(json_kind(other))),
        },
        AbiType::Tuple(fields) => match json {
            // Objects match by field name; arrays match positionally.
            serde_json::Value::Object(map) => {
                let mut out = Vec::with_capacity(fields.len());
                for (name, fty) in fields {
                    let item = map
                        .get(name)
                        .ok_or_else(|| mismatch(&format!("object missing field '{name}'")))?;
                    out.push((name.clone(), value_from_json(item, fty, index)?));
                }
                Ok(Value::Tuple(out))
            }
            serde_json::Value::Array(items) => {
                if items.len() != fields.len() {
                    return Err(CodecError::ArityMismatch {
                        expected: fields.len(),
                        got: items.len(),
                    });
                }
                let mut out = Vec::with_capacity(fields.len());
                for ((name, fty), item) in fields.iter().zip(items) {
                    out.push((name.clone(), value_from_json(item, fty, index)?));
                }
                Ok(Value::Tuple(out))
            }
            other => Err(mismatch(json_kind(other))),
        },
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
