//! `ContractCodec`: binds an ABI to a selector/topic index and exposes
//! the encode/decode operations.
//!
//! The index is built once at construction (validating every parameter
//! type eagerly) and is immutable afterwards: the codec is purely
//! functional and safe to share across threads. Functions are keyed by
//! name and 4-byte selector, events by name and 32-byte topic. Overloaded
//! names resolve to the first declared overload; callers that care about
//! overloads address them by selector or topic.

use crate::decoder;
use crate::encoder;
use crate::selector::SignatureCache;
use abicodec_core::{
    abi::{Abi, Event, Function, StateMutability},
    error::{AbiParseError, CodecError},
    json::value_from_json,
    log::{DecodedLog, RawLog},
    types::AbiType,
    util,
    value::Value,
};
use alloy_primitives::B256;
use std::collections::HashMap;

/// A function with its parameters resolved and its selector computed.
#[derive(Debug, Clone)]
pub struct FunctionEntry {
    pub name: String,
    pub selector: [u8; 4],
    pub inputs: Vec<(String, AbiType)>,
    pub outputs: Vec<(String, AbiType)>,
    pub state_mutability: StateMutability,
}

/// One event parameter: declaration name, resolved type, indexed flag.
#[derive(Debug, Clone)]
pub struct EventParam {
    pub name: String,
    pub ty: AbiType,
    pub indexed: bool,
}

/// An event with its parameters resolved and its topic computed.
#[derive(Debug, Clone)]
pub struct EventEntry {
    pub name: String,
    pub topic: B256,
    pub anonymous: bool,
    pub params: Vec<EventParam>,
}

/// A custom error entry with its revert selector.
#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub name: String,
    pub selector: [u8; 4],
    pub inputs: Vec<(String, AbiType)>,
}

/// Result of decoding calldata or a revert payload.
#[derive(Debug, Clone)]
pub struct DecodedCall {
    pub name: String,
    pub selector: [u8; 4],
    /// Decoded arguments in declaration order.
    pub args: Vec<(String, Value)>,
}

impl DecodedCall {
    /// Argument lookup by name.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// The codec facade. Construct once per ABI, then share freely.
#[derive(Debug)]
pub struct ContractCodec {
    functions: Vec<FunctionEntry>,
    events: Vec<EventEntry>,
    errors: Vec<ErrorEntry>,
    constructor_inputs: Option<Vec<(String, AbiType)>>,
    fn_by_selector: HashMap<[u8; 4], usize>,
    fn_by_name: HashMap<String, usize>,
    ev_by_topic: HashMap<B256, usize>,
    ev_by_name: HashMap<String, usize>,
    err_by_selector: HashMap<[u8; 4], usize>,
    cache: SignatureCache,
}

impl ContractCodec {
    /// Build a codec from a standard ABI JSON array. The whole ABI is
    /// validated here; a malformed type expression fails construction,
    /// never a later encode.
    pub fn from_json(json: &str) -> Result<Self, AbiParseError> {
        Self::from_abi(&Abi::from_json(json)?)
    }

    /// Build a codec from an already-parsed ABI.
    pub fn from_abi(abi: &Abi) -> Result<Self, AbiParseError> {
        let cache = SignatureCache::new();

        let mut functions = Vec::new();
        let mut fn_by_selector = HashMap::new();
        let mut fn_by_name = HashMap::new();
        for f in abi.functions() {
            let entry = FunctionEntry {
                selector: compute_selector(&cache, f)?,
                inputs: resolve_params(&f.inputs)?,
                outputs: resolve_params(&f.outputs)?,
                name: f.name.clone(),
                state_mutability: f.state_mutability,
            };
            let idx = functions.len();
            fn_by_selector.insert(entry.selector, idx);
            // First declared overload wins the bare name.
            fn_by_name.entry(entry.name.clone()).or_insert(idx);
            functions.push(entry);
        }

        let mut events = Vec::new();
        let mut ev_by_topic = HashMap::new();
        let mut ev_by_name = HashMap::new();
        for e in abi.events() {
            let entry = EventEntry {
                topic: compute_topic(&cache, e)?,
                anonymous: e.anonymous,
                params: e
                    .inputs
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        Ok(EventParam {
                            name: if p.name.is_empty() {
                                format!("arg{i}")
                            } else {
                                p.name.clone()
                            },
                            ty: p.resolve()?,
                            indexed: p.indexed,
                        })
                    })
                    .collect::<Result<_, AbiParseError>>()?,
                name: e.name.clone(),
            };
            let idx = events.len();
            // Anonymous topics never appear as topics[0]; indexing them
            // would only produce false matches.
            if !entry.anonymous {
                ev_by_topic.insert(entry.topic, idx);
            }
            ev_by_name.entry(entry.name.clone()).or_insert(idx);
            events.push(entry);
        }

        let mut errors = Vec::new();
        let mut err_by_selector = HashMap::new();
        for e in abi.errors() {
            let entry = ErrorEntry {
                selector: {
                    let hash = cache.hash(&e.signature()?);
                    [hash[0], hash[1], hash[2], hash[3]]
                },
                inputs: resolve_params(&e.inputs)?,
                name: e.name.clone(),
            };
            err_by_selector.insert(entry.selector, errors.len());
            errors.push(entry);
        }

        let constructor_inputs = abi
            .constructor()
            .map(|c| resolve_params(&c.inputs))
            .transpose()?;

        Ok(Self {
            functions,
            events,
            errors,
            constructor_inputs,
            fn_by_selector,
            fn_by_name,
            ev_by_topic,
            ev_by_name,
            err_by_selector,
            cache,
        })
    }

    // ── Lookup ──────────────────────────────────────────────────────────

    /// Resolve a function by bare name or `0x`-prefixed 4-byte selector.
    pub fn function(&self, key: &str) -> Result<&FunctionEntry, CodecError> {
        let idx = if let Some(hex_part) = key.strip_prefix("0x") {
            parse_selector(hex_part).and_then(|sel| self.fn_by_selector.get(&sel).copied())
        } else {
            self.fn_by_name.get(key).copied()
        };
        idx.map(|i| &self.functions[i])
            .ok_or_else(|| CodecError::UnknownFunction {
                key: key.to_string(),
            })
    }

    /// Resolve an event by bare name or `0x`-prefixed 32-byte topic.
    pub fn event(&self, key: &str) -> Result<&EventEntry, CodecError> {
        let idx = if let Some(hex_part) = key.strip_prefix("0x") {
            parse_topic(hex_part).and_then(|t| self.ev_by_topic.get(&t).copied())
        } else {
            self.ev_by_name.get(key).copied()
        };
        idx.map(|i| &self.events[i])
            .ok_or_else(|| CodecError::UnknownEvent {
                key: key.to_string(),
            })
    }

    /// Topics of every non-anonymous event registered in this codec, in
    /// declaration order.
    pub fn known_event_topics(&self) -> Vec<B256> {
        self.events
            .iter()
            .filter(|e| !e.anonymous)
            .map(|e| e.topic)
            .collect()
    }

    /// 4-byte selector of a named function, if present.
    pub fn selector_of(&self, name: &str) -> Option<[u8; 4]> {
        self.fn_by_name.get(name).map(|&i| self.functions[i].selector)
    }

    /// Topic of a named event, if present.
    pub fn topic_of(&self, name: &str) -> Option<B256> {
        self.ev_by_name.get(name).map(|&i| self.events[i].topic)
    }

    // ── Functions ───────────────────────────────────────────────────────

    /// Encode a call: the 4-byte selector followed by the head/tail
    /// encoding of `args` against the function's inputs. An empty-argument
    /// call yields exactly 4 bytes.
    pub fn encode_function(&self, key: &str, args: &[Value]) -> Result<Vec<u8>, CodecError> {
        let f = self.function(key)?;
        let types: Vec<AbiType> = f.inputs.iter().map(|(_, t)| t.clone()).collect();
        let mut out = f.selector.to_vec();
        out.extend_from_slice(&encoder::encode(&types, args)?);
        Ok(out)
    }

    /// [`encode_function`](Self::encode_function) with loosely-typed JSON
    /// arguments: integers accept decimal or hex strings, tuples accept
    /// objects or positional arrays.
    pub fn encode_function_json(
        &self,
        key: &str,
        args: &[serde_json::Value],
    ) -> Result<Vec<u8>, CodecError> {
        let f = self.function(key)?;
        if args.len() != f.inputs.len() {
            return Err(CodecError::ArityMismatch {
                expected: f.inputs.len(),
                got: args.len(),
            });
        }
        let values: Vec<Value> = f
            .inputs
            .iter()
            .zip(args)
            .enumerate()
            .map(|(i, ((_, t), a))| value_from_json(a, t, i))
            .collect::<Result<_, _>>()?;
        self.encode_function(key, &values)
    }

    /// Decode calldata against the inputs of the function named by `key`.
    /// The leading 4 bytes are the selector and are stripped, not decoded.
    pub fn decode_function(&self, key: &str, data: &[u8]) -> Result<DecodedCall, CodecError> {
        let f = self.function(key)?;
        if data.len() < 4 {
            return Err(CodecError::Truncated {
                offset: 0,
                needed: 4,
                len: data.len(),
            });
        }
        self.decode_inputs(f, &data[4..])
    }

    /// Decode calldata by its leading selector alone.
    pub fn decode_call(&self, data: &[u8]) -> Result<DecodedCall, CodecError> {
        if data.len() < 4 {
            return Err(CodecError::Truncated {
                offset: 0,
                needed: 4,
                len: data.len(),
            });
        }
        let selector: [u8; 4] = data[..4].try_into().expect("4-byte slice");
        let f = self
            .fn_by_selector
            .get(&selector)
            .map(|&i| &self.functions[i])
            .ok_or_else(|| CodecError::UnknownFunction {
                key: util::to_hex(&selector),
            })?;
        self.decode_inputs(f, &data[4..])
    }

    fn decode_inputs(&self, f: &FunctionEntry, data: &[u8]) -> Result<DecodedCall, CodecError> {
        let types: Vec<AbiType> = f.inputs.iter().map(|(_, t)| t.clone()).collect();
        let values = decoder::decode(&types, data)?;
        Ok(DecodedCall {
            name: f.name.clone(),
            selector: f.selector,
            args: pair_names(&f.inputs, values),
        })
    }

    /// Decode return data against the outputs of the function named by
    /// `key`. Empty data decodes to an empty result.
    pub fn decode_function_result(
        &self,
        key: &str,
        data: &[u8],
    ) -> Result<Vec<(String, Value)>, CodecError> {
        let f = self.function(key)?;
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let types: Vec<AbiType> = f.outputs.iter().map(|(_, t)| t.clone()).collect();
        let values = decoder::decode(&types, data)?;
        Ok(pair_names(&f.outputs, values))
    }

    /// Decode constructor arguments (no selector prefix).
    pub fn decode_constructor(&self, data: &[u8]) -> Result<Vec<(String, Value)>, CodecError> {
        let inputs = self
            .constructor_inputs
            .as_ref()
            .ok_or_else(|| CodecError::UnknownFunction {
                key: "constructor".to_string(),
            })?;
        let types: Vec<AbiType> = inputs.iter().map(|(_, t)| t.clone()).collect();
        let values = decoder::decode(&types, data)?;
        Ok(pair_names(inputs, values))
    }

    /// Decode a revert payload against the ABI's `error` entries by its
    /// leading 4-byte selector.
    pub fn decode_error(&self, data: &[u8]) -> Result<DecodedCall, CodecError> {
        if data.len() < 4 {
            return Err(CodecError::Truncated {
                offset: 0,
                needed: 4,
                len: data.len(),
            });
        }
        let selector: [u8; 4] = data[..4].try_into().expect("4-byte slice");
        let e = self
            .err_by_selector
            .get(&selector)
            .map(|&i| &self.errors[i])
            .ok_or_else(|| CodecError::UnknownErrorSelector {
                selector: hex::encode(selector),
            })?;
        let types: Vec<AbiType> = e.inputs.iter().map(|(_, t)| t.clone()).collect();
        let values = decoder::decode(&types, &data[4..])?;
        Ok(DecodedCall {
            name: e.name.clone(),
            selector,
            args: pair_names(&e.inputs, values),
        })
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// Decode a single log against the event named or topic-keyed by
    /// `key`.
    ///
    /// Indexed parameters consume topics in declaration order, starting
    /// at `topics[1]` (`topics[0]` for anonymous events). An indexed
    /// parameter of reference type (string, bytes, array, tuple) is
    /// stored on chain as the keccak256 of its encoding; the raw 32-byte
    /// topic is returned for it, never a recovered preimage. Non-indexed
    /// parameters decode from `data` with the function-call layout.
    /// Metadata fields are copied through unchanged.
    pub fn decode_log(&self, key: &str, raw: &RawLog) -> Result<DecodedLog, CodecError> {
        let event = self.event(key)?;
        let mut topic_cursor = if event.anonymous { 0 } else { 1 };

        // Decode the non-indexed payload first, in one pass.
        let data_types: Vec<AbiType> = event
            .params
            .iter()
            .filter(|p| !p.indexed)
            .map(|p| p.ty.clone())
            .collect();
        let mut data_values = decoder::decode(&data_types, &raw.data)?.into_iter();

        let mut args = Vec::with_capacity(event.params.len());
        for param in &event.params {
            if param.indexed {
                let topic = raw
                    .topics
                    .get(topic_cursor)
                    .ok_or(CodecError::MissingTopic {
                        index: topic_cursor,
                    })?;
                args.push((param.name.clone(), decode_topic(topic, topic_cursor, &param.ty)?));
                topic_cursor += 1;
            } else {
                // The iterator is in declaration order for non-indexed
                // params, so this zip cannot misalign.
                let value = data_values.next().ok_or(CodecError::Truncated {
                    offset: 0,
                    needed: 32,
                    len: raw.data.len(),
                })?;
                args.push((param.name.clone(), value));
            }
        }

        Ok(DecodedLog {
            name: event.name.clone(),
            args,
            address: raw.address.clone(),
            block_number: raw.block_number,
            tx_hash: raw.tx_hash.clone(),
            log_index: raw.log_index,
            removed: raw.removed,
        })
    }

    /// Decode a batch of logs, skipping anything this codec does not
    /// recognize. See [`crate::batch`] for the contract and the parallel
    /// variant.
    pub fn decode_logs(&self, logs: &[RawLog]) -> Vec<DecodedLog> {
        crate::batch::decode_logs(self, logs)
    }

    /// Decode one log by its `topics[0]`, if registered. Used by the
    /// batch paths.
    pub(crate) fn decode_log_by_topic0(&self, raw: &RawLog) -> Result<DecodedLog, CodecError> {
        let topic0 = raw.topic0().ok_or(CodecError::MissingTopic { index: 0 })?;
        self.decode_log(topic0, raw)
    }

    /// Memoized Keccak-256 of an ad-hoc canonical signature, through this
    /// codec's bounded cache. Equal to
    /// [`selector::signature_hash`](crate::selector::signature_hash) on
    /// hit and miss alike.
    pub fn signature_hash(&self, signature: &str) -> B256 {
        self.cache.hash(signature)
    }
}

fn resolve_params(
    params: &[abicodec_core::abi::Param],
) -> Result<Vec<(String, AbiType)>, AbiParseError> {
    params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let name = if p.name.is_empty() {
                format!("arg{i}")
            } else {
                p.name.clone()
            };
            Ok((name, p.resolve()?))
        })
        .collect()
}

fn compute_selector(cache: &SignatureCache, f: &Function) -> Result<[u8; 4], AbiParseError> {
    let hash = cache.hash(&f.signature()?);
    Ok([hash[0], hash[1], hash[2], hash[3]])
}

fn compute_topic(cache: &SignatureCache, e: &Event) -> Result<B256, AbiParseError> {
    Ok(cache.hash(&e.signature()?))
}

fn pair_names(params: &[(String, AbiType)], values: Vec<Value>) -> Vec<(String, Value)> {
    params
        .iter()
        .map(|(n, _)| n.clone())
        .zip(values)
        .collect()
}

fn parse_selector(hex_part: &str) -> Option<[u8; 4]> {
    if hex_part.len() != 8 {
        return None;
    }
    let bytes = hex::decode(hex_part).ok()?;
    bytes.try_into().ok()
}

fn parse_topic(hex_part: &str) -> Option<B256> {
    if hex_part.len() != 64 {
        return None;
    }
    let bytes = hex::decode(hex_part).ok()?;
    Some(B256::from_slice(&bytes))
}

/// Decode one indexed topic against its declared type.
///
/// Value types (uint, int, bool, address, bytesN) are stored directly,
/// padded to the word; reference types are stored as the keccak256 of
/// their encoding and come back as the raw 32-byte hash.
fn decode_topic(topic: &str, index: usize, ty: &AbiType) -> Result<Value, CodecError> {
    let bytes = util::hex_to_bytes(topic).map_err(|e| CodecError::InvalidTopic {
        index,
        reason: e.to_string(),
    })?;
    if bytes.len() != 32 {
        return Err(CodecError::InvalidTopic {
            index,
            reason: format!("expected 32 bytes, got {}", bytes.len()),
        });
    }
    match ty {
        AbiType::String
        | AbiType::Bytes
        | AbiType::Array(_)
        | AbiType::FixedArray(..)
        | AbiType::Tuple(_) => Ok(Value::FixedBytes(bytes)),
        _ => decoder::decode_one(ty, &bytes),
    }
}
