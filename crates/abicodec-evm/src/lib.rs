//! # abicodec-evm
//!
//! The EVM ABI codec: selector and topic computation, head/tail encoding
//! of call arguments, decoding of return data and event logs, and
//! receipt-level log demultiplexing.
//!
//! ## Implementation notes
//! - The layout engine tracks a region base per recursion level: offsets
//!   inside a nested dynamic container are relative to that container's
//!   own start, never to the outer blob.
//! - `topics[0]` is the event topic for non-anonymous events and is never
//!   decoded as a value. Indexed reference types come back as the raw
//!   32-byte topic hash; the preimage is unrecoverable.
//! - `string` payloads decode as strict UTF-8; failures surface as
//!   `CodecError::InvalidUtf8`, never as a silently altered value.
//! - The codec is purely functional after construction and safe to share
//!   across threads; the only interior state is a bounded, transparent
//!   signature-hash cache.

pub mod batch;
pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod keccak;
pub mod selector;

pub use batch::{decode_logs, parallel_decode_logs};
pub use codec::{ContractCodec, DecodedCall, EventEntry, EventParam, FunctionEntry};
pub use decoder::decode;
pub use encoder::encode;
pub use keccak::keccak256;
pub use selector::{event_topic, function_selector, signature_hash, SignatureCache};

// Re-export the core surface so downstream users need a single import.
pub use abicodec_core::{
    Abi, AbiEntry, AbiParseError, AbiType, CodecError, DecodedLog, RawLog, Value,
};
