//! Receipt-level log demultiplexing.
//!
//! A receipt carries logs from every contract the transaction touched;
//! most of them belong to ABIs this codec has never seen. The batch paths
//! therefore skip rather than fail: a log whose `topics[0]` is not
//! registered is dropped silently, a log that fails to decode is dropped
//! with a `tracing` event, and the output order always matches the input
//! order.

use crate::codec::ContractCodec;
use abicodec_core::log::{DecodedLog, RawLog};
use rayon::prelude::*;
use tracing::debug;

/// Decode a slice of logs sequentially, skipping unknown and undecodable
/// entries.
pub fn decode_logs(codec: &ContractCodec, logs: &[RawLog]) -> Vec<DecodedLog> {
    logs.iter()
        .enumerate()
        .filter_map(|(idx, raw)| decode_or_skip(codec, idx, raw))
        .collect()
}

/// Decode a slice of logs in parallel with rayon. Same skip semantics and
/// the same output order as [`decode_logs`]; the indexed collect keeps
/// results in input order regardless of which worker finishes first.
pub fn parallel_decode_logs(codec: &ContractCodec, logs: &[RawLog]) -> Vec<DecodedLog> {
    logs.par_iter()
        .enumerate()
        .map(|(idx, raw)| decode_or_skip(codec, idx, raw))
        .collect::<Vec<Option<DecodedLog>>>()
        .into_iter()
        .flatten()
        .collect()
}

fn decode_or_skip(codec: &ContractCodec, idx: usize, raw: &RawLog) -> Option<DecodedLog> {
    let topic0 = match raw.topic0() {
        Some(t) => t,
        None => {
            debug!(index = idx, "skipping log with no topics");
            return None;
        }
    };
    if codec.event(topic0).is_err() {
        // Foreign log in the same receipt; not an error.
        return None;
    }
    match codec.decode_log_by_topic0(raw) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            debug!(index = idx, topic0, %err, "skipping undecodable log");
            None
        }
    }
}
