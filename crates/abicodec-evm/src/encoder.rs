//! Head/tail layout encoder.
//!
//! A sequence of values encodes as a fixed-size head followed by the tails
//! of its dynamic members. Static values sit in the head in full; each
//! dynamic value contributes one 32-byte offset word pointing at its tail.
//! Offsets are measured from the start of the sequence's own region, so a
//! dynamic container nested inside another value restarts the measurement
//! at its own first byte. The encoder threads that region through
//! recursion; nothing ever measures from the outer blob.

use abicodec_core::{error::CodecError, types::AbiType, value::Value};
use alloy_primitives::{I256, U256};

/// Encode `values` against `types` into the head/tail layout.
///
/// Fails with [`CodecError::ArityMismatch`], [`CodecError::TypeMismatch`]
/// or [`CodecError::Range`]; on failure nothing is returned. The `index`
/// carried by errors is the position of the top-level argument at fault.
pub fn encode(types: &[AbiType], values: &[Value]) -> Result<Vec<u8>, CodecError> {
    if types.len() != values.len() {
        return Err(CodecError::ArityMismatch {
            expected: types.len(),
            got: values.len(),
        });
    }
    let items: Vec<(usize, &AbiType, &Value)> = types
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (t, v))| (i, t, v))
        .collect();
    encode_sequence(&items)
}

/// Encode one region: heads left to right, then tails in the order their
/// dynamic values appeared. Offsets are relative to the region start.
fn encode_sequence(items: &[(usize, &AbiType, &Value)]) -> Result<Vec<u8>, CodecError> {
    let head_size: usize = items.iter().map(|(_, t, _)| t.head_size()).sum();
    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for &(index, ty, value) in items {
        if ty.is_dynamic() {
            head.extend_from_slice(&offset_word(head_size + tail.len()));
            tail.extend_from_slice(&encode_tail(index, ty, value)?);
        } else {
            encode_static(&mut head, index, ty, value)?;
        }
    }

    head.extend_from_slice(&tail);
    Ok(head)
}

/// The tail of a dynamic value: its full encoding, 32-byte aligned.
fn encode_tail(index: usize, ty: &AbiType, value: &Value) -> Result<Vec<u8>, CodecError> {
    match ty {
        AbiType::Bytes => {
            let bytes = match value {
                Value::Bytes(b) | Value::FixedBytes(b) => b.as_slice(),
                other => return Err(mismatch(index, ty, other)),
            };
            Ok(length_prefixed(bytes))
        }
        AbiType::String => {
            let s = match value {
                Value::String(s) => s,
                other => return Err(mismatch(index, ty, other)),
            };
            Ok(length_prefixed(s.as_bytes()))
        }
        AbiType::Array(elem) => {
            let elems = match value {
                Value::Array(v) => v,
                other => return Err(mismatch(index, ty, other)),
            };
            let items: Vec<(usize, &AbiType, &Value)> =
                elems.iter().map(|v| (index, elem.as_ref(), v)).collect();
            let mut out = offset_word(elems.len()).to_vec();
            out.extend_from_slice(&encode_sequence(&items)?);
            Ok(out)
        }
        AbiType::FixedArray(elem, len) => {
            let elems = expect_fixed_array(index, ty, value, *len)?;
            let items: Vec<(usize, &AbiType, &Value)> =
                elems.iter().map(|v| (index, elem.as_ref(), v)).collect();
            encode_sequence(&items)
        }
        AbiType::Tuple(fields) => {
            let values = expect_tuple(index, ty, value, fields.len())?;
            let items: Vec<(usize, &AbiType, &Value)> = fields
                .iter()
                .zip(values)
                .map(|((_, t), (_, v))| (index, t, v))
                .collect();
            encode_sequence(&items)
        }
        // Static types never reach the tail path.
        _ => Err(mismatch(index, ty, value)),
    }
}

/// Append the full static encoding of a static value to `out`.
fn encode_static(
    out: &mut Vec<u8>,
    index: usize,
    ty: &AbiType,
    value: &Value,
) -> Result<(), CodecError> {
    match ty {
        AbiType::Uint(bits) => {
            let u = match value {
                Value::Uint(u) => u,
                other => return Err(mismatch(index, ty, other)),
            };
            if u.bit_len() > *bits as usize {
                return Err(CodecError::Range {
                    index,
                    reason: format!("{u} does not fit in uint{bits}"),
                });
            }
            out.extend_from_slice(&u.to_be_bytes::<32>());
        }
        AbiType::Int(bits) => {
            let i = match value {
                Value::Int(i) => i,
                other => return Err(mismatch(index, ty, other)),
            };
            if !int_in_range(i, *bits) {
                return Err(CodecError::Range {
                    index,
                    reason: format!("{i} does not fit in int{bits}"),
                });
            }
            // into_raw() is the 256-bit two's complement: negatives come
            // out sign-extended across the full word.
            out.extend_from_slice(&i.into_raw().to_be_bytes::<32>());
        }
        AbiType::Bool => {
            let b = match value {
                Value::Bool(b) => *b,
                other => return Err(mismatch(index, ty, other)),
            };
            let mut word = [0u8; 32];
            word[31] = b as u8;
            out.extend_from_slice(&word);
        }
        AbiType::Address => {
            let s = match value {
                Value::Address(s) => s,
                other => return Err(mismatch(index, ty, other)),
            };
            let hex_part = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"));
            let bytes = hex_part
                .filter(|h| h.len() == 40)
                .and_then(|h| hex::decode(h).ok())
                .ok_or_else(|| CodecError::TypeMismatch {
                    index,
                    expected: "address (0x + 40 hex digits)".into(),
                    got: format!("'{s}'"),
                })?;
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(&bytes);
            out.extend_from_slice(&word);
        }
        AbiType::FixedBytes(len) => {
            let bytes = match value {
                Value::FixedBytes(b) | Value::Bytes(b) => b,
                other => return Err(mismatch(index, ty, other)),
            };
            if bytes.len() != *len as usize {
                return Err(CodecError::Range {
                    index,
                    reason: format!("bytes{len} expects {len} bytes, got {}", bytes.len()),
                });
            }
            let mut word = [0u8; 32];
            word[..bytes.len()].copy_from_slice(bytes);
            out.extend_from_slice(&word);
        }
        AbiType::FixedArray(elem, len) => {
            let elems = expect_fixed_array(index, ty, value, *len)?;
            for v in elems {
                encode_static(out, index, elem, v)?;
            }
        }
        AbiType::Tuple(fields) => {
            let values = expect_tuple(index, ty, value, fields.len())?;
            for ((_, t), (_, v)) in fields.iter().zip(values) {
                encode_static(out, index, t, v)?;
            }
        }
        // Dynamic types never reach the static path.
        _ => return Err(mismatch(index, ty, value)),
    }
    Ok(())
}

fn expect_fixed_array<'v>(
    index: usize,
    ty: &AbiType,
    value: &'v Value,
    len: usize,
) -> Result<&'v [Value], CodecError> {
    let elems = match value {
        Value::Array(v) => v,
        other => return Err(mismatch(index, ty, other)),
    };
    if elems.len() != len {
        return Err(CodecError::Range {
            index,
            reason: format!("fixed array expects {len} elements, got {}", elems.len()),
        });
    }
    Ok(elems)
}

fn expect_tuple<'v>(
    index: usize,
    ty: &AbiType,
    value: &'v Value,
    arity: usize,
) -> Result<&'v [(String, Value)], CodecError> {
    let fields = match value {
        Value::Tuple(f) => f,
        other => return Err(mismatch(index, ty, other)),
    };
    if fields.len() != arity {
        return Err(CodecError::ArityMismatch {
            expected: arity,
            got: fields.len(),
        });
    }
    Ok(fields)
}

fn mismatch(index: usize, ty: &AbiType, value: &Value) -> CodecError {
    CodecError::TypeMismatch {
        index,
        expected: ty.canonical(),
        got: value.kind().to_string(),
    }
}

/// 32-byte big-endian word holding a length or an offset.
fn offset_word(n: usize) -> [u8; 32] {
    U256::from(n).to_be_bytes::<32>()
}

/// Length word plus the payload, zero-padded on the right to the next
/// 32-byte boundary.
fn length_prefixed(bytes: &[u8]) -> Vec<u8> {
    let padded = bytes.len().div_ceil(32) * 32;
    let mut out = Vec::with_capacity(32 + padded);
    out.extend_from_slice(&offset_word(bytes.len()));
    out.extend_from_slice(bytes);
    out.resize(32 + padded, 0);
    out
}

/// A signed value fits in `bits` iff its magnitude stays within the
/// two's-complement bounds: `-2^(bits-1) ..= 2^(bits-1) - 1`.
fn int_in_range(v: &I256, bits: u16) -> bool {
    if bits == 256 {
        return true;
    }
    let half = U256::from(1u8) << (bits as usize - 1);
    let mag = v.unsigned_abs();
    if v.is_negative() {
        mag <= half
    } else {
        mag < half
    }
}
