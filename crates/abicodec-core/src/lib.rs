//! # abicodec-core
//!
//! Core types shared across the abicodec crates: the ABI JSON model, the
//! resolved type grammar, the decoded value model, the log records, and
//! the error taxonomy. The encode/decode engine itself lives in
//! `abicodec-evm` and is built entirely on the interfaces defined here.

pub mod abi;
pub mod error;
pub mod json;
pub mod log;
pub mod parser;
pub mod types;
pub mod util;
pub mod value;

pub use abi::{Abi, AbiEntry, Constructor, CustomError, Event, Function, Param, StateMutability};
pub use error::{AbiParseError, CodecError};
pub use json::value_from_json;
pub use log::{DecodedLog, RawLog};
pub use parser::parse_type;
pub use types::{AbiType, MAX_NESTING};
pub use value::Value;
