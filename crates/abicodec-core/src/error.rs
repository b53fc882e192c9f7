//! Error types for the abicodec encode/decode pipeline.

use thiserror::Error;

/// Errors raised while parsing an ABI definition or a type expression.
/// These are construction-time failures: a `ContractCodec` built from a
/// well-formed ABI never produces them afterwards.
#[derive(Debug, Error)]
pub enum AbiParseError {
    #[error("invalid ABI JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid type expression '{expr}': {reason}")]
    InvalidTypeExpression { expr: String, reason: String },

    #[error("invalid integer width {bits} in '{expr}'")]
    InvalidIntWidth { expr: String, bits: u16 },

    #[error("invalid fixed-bytes length {len} in '{expr}'")]
    InvalidBytesLength { expr: String, len: usize },

    #[error("zero-length fixed array in '{expr}'")]
    ZeroLengthArray { expr: String },

    #[error("empty tuple in '{expr}'")]
    EmptyTuple { expr: String },

    #[error("type nesting exceeds {max} levels in '{expr}'")]
    NestingTooDeep { expr: String, max: usize },
}

/// Errors raised while encoding values, decoding payloads, or looking up
/// functions and events in a codec index.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("function not found: {key}")]
    UnknownFunction { key: String },

    #[error("event not found: {key}")]
    UnknownEvent { key: String },

    #[error("no error entry matches selector 0x{selector}")]
    UnknownErrorSelector { selector: String },

    #[error("argument count mismatch: expected {expected}, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("type mismatch for argument {index}: expected {expected}, got {got}")]
    TypeMismatch {
        index: usize,
        expected: String,
        got: String,
    },

    #[error("value out of range for argument {index}: {reason}")]
    Range { index: usize, reason: String },

    #[error("input truncated: need {needed} bytes at offset {offset}, have {len}")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("offset {offset} out of range for region of {len} bytes")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("string payload is not valid UTF-8 (first invalid byte at {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("log is missing topic {index}")]
    MissingTopic { index: usize },

    #[error("malformed topic {index}: {reason}")]
    InvalidTopic { index: usize, reason: String },

    #[error(transparent)]
    Abi(#[from] AbiParseError),
}
