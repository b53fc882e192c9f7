//! Selector and topic computation.
//!
//! A function selector is the first 4 bytes of the Keccak-256 hash of the
//! canonical signature; an event topic is the full 32 bytes, e.g.:
//!   keccak256("Transfer(address,address,uint256)")
//!   -> 0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef
//!
//! Hashing is memoized per cache instance, keyed by the signature string.
//! The cache is transparent: a hit and a miss return equal values, and it
//! is bounded; once full, new entries are simply not retained.

use crate::keccak::keccak256;
use abicodec_core::{
    abi::{CustomError, Event, Function},
    error::AbiParseError,
};
use alloy_primitives::B256;
use std::collections::HashMap;
use std::sync::RwLock;

/// Hash a canonical signature string into a 32-byte topic.
pub fn signature_hash(signature: &str) -> B256 {
    B256::new(keccak256(signature.as_bytes()))
}

/// 4-byte selector for a function.
pub fn function_selector(f: &Function) -> Result<[u8; 4], AbiParseError> {
    let hash = signature_hash(&f.signature()?);
    Ok(truncate4(&hash))
}

/// 32-byte topic for an event. Anonymous events have one too; it just
/// never appears as `topics[0]` on chain.
pub fn event_topic(e: &Event) -> Result<B256, AbiParseError> {
    Ok(signature_hash(&e.signature()?))
}

/// 4-byte selector for a custom error entry; revert payloads are prefixed
/// with it the same way calldata is prefixed with a function selector.
pub fn error_selector(e: &CustomError) -> Result<[u8; 4], AbiParseError> {
    let hash = signature_hash(&e.signature()?);
    Ok(truncate4(&hash))
}

fn truncate4(hash: &B256) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

/// Bounded signature-hash memo. One per codec instance; never global.
#[derive(Debug)]
pub struct SignatureCache {
    entries: RwLock<HashMap<String, B256>>,
    capacity: usize,
}

impl SignatureCache {
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Memoized [`signature_hash`]. Inserts are dropped once the cache is
    /// full; correctness never depends on what stays resident.
    pub fn hash(&self, signature: &str) -> B256 {
        if let Some(hit) = self.entries.read().expect("cache lock").get(signature) {
            return *hit;
        }
        let hash = signature_hash(signature);
        let mut entries = self.entries.write().expect("cache lock");
        if entries.len() < self.capacity {
            entries.insert(signature.to_string(), hash);
        }
        hash
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.read().expect("cache lock").len()
    }
}

impl Default for SignatureCache {
    fn default() -> Self {
        Self::new()
    }
}
