//! Raw and decoded event log records.

use crate::value::{serialize_named_pairs, Value};
use serde::{Deserialize, Serialize};

/// An undecoded log as received from a node or a stored receipt. The codec
/// consumes only `topics` and `data`; everything else is passthrough
/// metadata copied onto the decoded result unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLog {
    /// Contract address that emitted the log.
    #[serde(default)]
    pub address: String,
    /// 1 to 4 topics, each a 32-byte `0x` hex string. `topics[0]` is the
    /// event topic for non-anonymous events.
    pub topics: Vec<String>,
    /// ABI-encoded non-indexed parameters, `0x` hex on the wire.
    #[serde(with = "crate::util::serde_hex")]
    pub data: Vec<u8>,
    #[serde(default)]
    pub block_number: u64,
    #[serde(default)]
    pub tx_hash: String,
    #[serde(default)]
    pub log_index: u32,
    #[serde(default)]
    pub removed: bool,
}

impl RawLog {
    pub fn new(topics: Vec<String>, data: Vec<u8>) -> Self {
        Self {
            topics,
            data,
            ..Default::default()
        }
    }

    /// `topics[0]`, if present.
    pub fn topic0(&self) -> Option<&str> {
        self.topics.first().map(|s| s.as_str())
    }
}

/// A decoded log: event name, arguments in declaration order, and the raw
/// log's metadata copied through.
#[derive(Debug, Clone, Serialize)]
pub struct DecodedLog {
    pub name: String,
    #[serde(serialize_with = "serialize_named_pairs")]
    pub args: Vec<(String, Value)>,
    pub address: String,
    pub block_number: u64,
    pub tx_hash: String,
    pub log_index: u32,
    pub removed: bool,
}

impl DecodedLog {
    /// Argument lookup by name.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}
