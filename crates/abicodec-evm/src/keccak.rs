//! Keccak-256 facade.
//!
//! The codec treats the hash as an opaque `keccak256(bytes) -> 32 bytes`
//! primitive. Note this is Ethereum's Keccak, not NIST SHA-3: the padding
//! differs.

use tiny_keccak::{Hasher, Keccak};

/// Hash arbitrary bytes with Keccak-256.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}
