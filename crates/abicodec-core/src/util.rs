//! Hex and big-integer string primitives shared across the codec.

use alloy_primitives::{I256, U256};

/// Strip an optional `0x`/`0X` prefix.
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

/// Decode a hex string (with or without `0x`) into bytes.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(strip_hex_prefix(s))
}

/// Encode bytes as a `0x`-prefixed lowercase hex string.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse an unsigned 256-bit integer from a decimal or `0x`-hex string.
pub fn parse_u256(s: &str) -> Option<U256> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        U256::from_str_radix(hex, 16).ok()
    } else {
        U256::from_str_radix(s, 10).ok()
    }
}

/// Parse a signed 256-bit integer from a decimal string (optionally with a
/// leading `-`) or a `0x`-hex magnitude. Hex input is treated as a
/// non-negative magnitude and must fit in `I256::MAX`.
pub fn parse_i256(s: &str) -> Option<I256> {
    let s = s.trim();
    if s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).is_some() {
        let mag = parse_u256(s)?;
        return I256::try_from(mag).ok();
    }
    I256::from_dec_str(s).ok()
}

/// Serde adapter: `Vec<u8>` as a `0x`-prefixed hex string on the wire.
pub mod serde_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&super::to_hex(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        super::hex_to_bytes(&s).map_err(serde::de::Error::custom)
    }
}
