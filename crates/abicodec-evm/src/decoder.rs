//! Head/tail layout decoder.
//!
//! Walks the same type tree the encoder walks, with the same region
//! discipline: every dynamic container decodes against a sub-slice that
//! starts at the container's own first byte, so the offsets read inside it
//! are relative to that slice. Every read is bounds-checked against the
//! current region and every claimed length is bounded by the bytes that
//! are actually present.

use abicodec_core::{error::CodecError, types::AbiType, value::Value};
use alloy_primitives::{I256, U256};

/// Decode `data` against `types`.
///
/// Fails with [`CodecError::Truncated`], [`CodecError::OffsetOutOfRange`],
/// [`CodecError::Range`] or [`CodecError::InvalidUtf8`]; on failure no
/// partial result is returned. `string` payloads are decoded as strict
/// UTF-8.
pub fn decode(types: &[AbiType], data: &[u8]) -> Result<Vec<Value>, CodecError> {
    let refs: Vec<&AbiType> = types.iter().collect();
    decode_sequence(&refs, data)
}

/// Decode a single value; convenience over [`decode`] for one-column data
/// such as an indexed topic word.
pub fn decode_one(ty: &AbiType, data: &[u8]) -> Result<Value, CodecError> {
    let mut values = decode_sequence(&[ty], data)?;
    Ok(values.pop().expect("sequence of one decodes to one value"))
}

/// Decode one region. The slice starts at the region base: offsets read
/// here are measured from `region[0]`.
fn decode_sequence(types: &[&AbiType], region: &[u8]) -> Result<Vec<Value>, CodecError> {
    let head_size: usize = types.iter().map(|t| t.head_size()).sum();
    if region.len() < head_size {
        return Err(CodecError::Truncated {
            offset: 0,
            needed: head_size,
            len: region.len(),
        });
    }

    let mut values = Vec::with_capacity(types.len());
    let mut cursor = 0usize;
    for &ty in types {
        if ty.is_dynamic() {
            let offset = read_offset(region, cursor, head_size)?;
            values.push(decode_tail(ty, &region[offset..])?);
            cursor += 32;
        } else {
            values.push(decode_static(ty, region, &mut cursor)?);
        }
    }
    Ok(values)
}

/// Decode a dynamic value whose region starts at `region[0]`.
fn decode_tail(ty: &AbiType, region: &[u8]) -> Result<Value, CodecError> {
    match ty {
        AbiType::Bytes | AbiType::String => {
            let len = read_length(region)?;
            let payload = &region[32..32 + len];
            if let AbiType::String = ty {
                match std::str::from_utf8(payload) {
                    Ok(s) => Ok(Value::String(s.to_string())),
                    Err(e) => Err(CodecError::InvalidUtf8 {
                        valid_up_to: e.valid_up_to(),
                    }),
                }
            } else {
                Ok(Value::Bytes(payload.to_vec()))
            }
        }
        AbiType::Array(elem) => {
            let len = read_length_word(region)?;
            // Each element occupies at least one head word; a length claim
            // that could not fit in the remaining bytes is rejected before
            // any allocation.
            let needed = len
                .checked_mul(elem.head_size())
                .ok_or(CodecError::OffsetOutOfRange {
                    offset: len,
                    len: region.len(),
                })?;
            if needed > region.len().saturating_sub(32) {
                return Err(CodecError::Truncated {
                    offset: 32,
                    needed,
                    len: region.len().saturating_sub(32),
                });
            }
            let types: Vec<&AbiType> = std::iter::repeat(elem.as_ref()).take(len).collect();
            Ok(Value::Array(decode_sequence(&types, &region[32..])?))
        }
        AbiType::FixedArray(elem, len) => {
            let types: Vec<&AbiType> = std::iter::repeat(elem.as_ref()).take(*len).collect();
            Ok(Value::Array(decode_sequence(&types, region)?))
        }
        AbiType::Tuple(fields) => {
            let types: Vec<&AbiType> = fields.iter().map(|(_, t)| t).collect();
            let values = decode_sequence(&types, region)?;
            Ok(Value::Tuple(
                fields
                    .iter()
                    .map(|(n, _)| n.clone())
                    .zip(values)
                    .collect(),
            ))
        }
        // Static types never reach the tail path.
        _ => unreachable!("static type in dynamic position"),
    }
}

/// Decode a static value at `region[*cursor..]`, advancing the cursor.
fn decode_static(
    ty: &AbiType,
    region: &[u8],
    cursor: &mut usize,
) -> Result<Value, CodecError> {
    match ty {
        AbiType::Uint(bits) => {
            let word = read_word(region, *cursor)?;
            *cursor += 32;
            let u = U256::from_be_slice(word);
            if u.bit_len() > *bits as usize {
                return Err(CodecError::Range {
                    index: *cursor / 32 - 1,
                    reason: format!("word has bits above uint{bits}"),
                });
            }
            Ok(Value::Uint(u))
        }
        AbiType::Int(bits) => {
            let word = read_word(region, *cursor)?;
            *cursor += 32;
            let raw = U256::from_be_slice(word);
            if *bits < 256 && sign_extend(raw, *bits) != raw {
                return Err(CodecError::Range {
                    index: *cursor / 32 - 1,
                    reason: format!("word is not a sign-extended int{bits}"),
                });
            }
            Ok(Value::Int(I256::from_raw(raw)))
        }
        AbiType::Bool => {
            let word = read_word(region, *cursor)?;
            *cursor += 32;
            // Lenient: any nonzero word reads as true, matching on-chain
            // behavior.
            Ok(Value::Bool(word.iter().any(|&b| b != 0)))
        }
        AbiType::Address => {
            let word = read_word(region, *cursor)?;
            *cursor += 32;
            Ok(Value::Address(format!("0x{}", hex::encode(&word[12..]))))
        }
        AbiType::FixedBytes(len) => {
            let word = read_word(region, *cursor)?;
            *cursor += 32;
            Ok(Value::FixedBytes(word[..*len as usize].to_vec()))
        }
        AbiType::FixedArray(elem, len) => {
            let mut out = Vec::with_capacity(*len);
            for _ in 0..*len {
                out.push(decode_static(elem, region, cursor)?);
            }
            Ok(Value::Array(out))
        }
        AbiType::Tuple(fields) => {
            let mut out = Vec::with_capacity(fields.len());
            for (name, t) in fields {
                out.push((name.clone(), decode_static(t, region, cursor)?));
            }
            Ok(Value::Tuple(out))
        }
        // Dynamic types never reach the static path.
        _ => unreachable!("dynamic type in static position"),
    }
}

fn read_word<'a>(region: &'a [u8], offset: usize) -> Result<&'a [u8], CodecError> {
    let end = offset.checked_add(32).ok_or(CodecError::OffsetOutOfRange {
        offset,
        len: region.len(),
    })?;
    if end > region.len() {
        return Err(CodecError::Truncated {
            offset,
            needed: 32,
            len: region.len(),
        });
    }
    Ok(&region[offset..end])
}

/// Read a dynamic value's offset word. The offset must land inside the
/// region and past the head it was read from; anything else is a
/// malformed pointer, not a short buffer.
fn read_offset(region: &[u8], cursor: usize, head_size: usize) -> Result<usize, CodecError> {
    let word = read_word(region, cursor)?;
    let offset = word_to_usize(word).ok_or(CodecError::OffsetOutOfRange {
        offset: usize::MAX,
        len: region.len(),
    })?;
    if offset > region.len() || offset < head_size {
        return Err(CodecError::OffsetOutOfRange {
            offset,
            len: region.len(),
        });
    }
    Ok(offset)
}

/// Read a `bytes`/`string` length and check the payload it claims is
/// actually present.
fn read_length(region: &[u8]) -> Result<usize, CodecError> {
    let len = read_length_word(region)?;
    if len > region.len().saturating_sub(32) {
        return Err(CodecError::Truncated {
            offset: 32,
            needed: len,
            len: region.len().saturating_sub(32),
        });
    }
    Ok(len)
}

fn read_length_word(region: &[u8]) -> Result<usize, CodecError> {
    let word = read_word(region, 0)?;
    word_to_usize(word).ok_or(CodecError::OffsetOutOfRange {
        offset: usize::MAX,
        len: region.len(),
    })
}

fn word_to_usize(word: &[u8]) -> Option<usize> {
    let value = U256::from_be_slice(word);
    u64::try_from(value).ok().and_then(|v| usize::try_from(v).ok())
}

/// Extend the sign bit of a `bits`-wide value across the full word.
fn sign_extend(raw: U256, bits: u16) -> U256 {
    let bits = bits as usize;
    if raw.bit(bits - 1) {
        raw | (U256::MAX << bits)
    } else {
        raw & (U256::MAX >> (256 - bits))
    }
}
