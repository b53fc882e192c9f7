//! Serde model of the Solidity ABI v2 JSON format.
//!
//! An ABI document is an array of tagged entries. Only `function` and
//! `event` entries participate in the codec index; `constructor` and
//! `error` entries get their own decode paths, and `fallback`/`receive`
//! are carried through for completeness.

use crate::error::AbiParseError;
use crate::parser::parse_type;
use crate::types::AbiType;
use serde::{Deserialize, Serialize};

/// A single ABI entry, tagged by its `type` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AbiEntry {
    Function(Function),
    Event(Event),
    Constructor(Constructor),
    Fallback(Fallback),
    Receive(Receive),
    Error(CustomError),
}

/// A function or event parameter descriptor. Descriptors form a tree:
/// a tuple's `components` are themselves descriptors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Events only; ignored elsewhere.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub indexed: bool,
    /// Present iff the type is a tuple or (nested) array of tuples.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Param>,
    /// Source-language type name; carried through but never interpreted.
    #[serde(
        default,
        rename = "internalType",
        skip_serializing_if = "Option::is_none"
    )]
    pub internal_type: Option<String>,
}

impl Param {
    /// Resolve the descriptor into a validated type tree.
    ///
    /// When `components` are present they are authoritative and the
    /// `type` string only contributes its array suffixes; otherwise the
    /// expression is parsed in full.
    pub fn resolve(&self) -> Result<AbiType, AbiParseError> {
        if self.components.is_empty() {
            return parse_type(&self.ty);
        }

        let mut fields = Vec::with_capacity(self.components.len());
        for (i, c) in self.components.iter().enumerate() {
            let name = if c.name.is_empty() {
                format!("field{i}")
            } else {
                c.name.clone()
            };
            fields.push((name, c.resolve()?));
        }
        let mut ty = AbiType::Tuple(fields);

        // `type` must read `tuple` followed by zero or more array
        // suffixes; each suffix wraps the tuple, innermost first.
        let mut rest = self.ty.strip_prefix("tuple").ok_or_else(|| {
            AbiParseError::InvalidTypeExpression {
                expr: self.ty.clone(),
                reason: "components present but type is not a tuple".into(),
            }
        })?;
        while !rest.is_empty() {
            let inner = rest
                .strip_prefix('[')
                .and_then(|r| r.find(']').map(|i| (&r[..i], &r[i + 1..])));
            let (len_str, tail) = inner.ok_or_else(|| AbiParseError::InvalidTypeExpression {
                expr: self.ty.clone(),
                reason: format!("bad array suffix '{rest}'"),
            })?;
            ty = if len_str.is_empty() {
                AbiType::Array(Box::new(ty))
            } else {
                let len: usize = len_str.parse().map_err(|_| {
                    AbiParseError::InvalidTypeExpression {
                        expr: self.ty.clone(),
                        reason: format!("bad array length '{len_str}'"),
                    }
                })?;
                if len == 0 {
                    return Err(AbiParseError::ZeroLengthArray {
                        expr: self.ty.clone(),
                    });
                }
                AbiType::FixedArray(Box::new(ty), len)
            };
            rest = tail;
        }

        ty.validate(&self.ty)?;
        Ok(ty)
    }
}

/// Mutability marker carried through from the ABI; the codec itself never
/// branches on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    #[default]
    Nonpayable,
    Payable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Param>,
    #[serde(default)]
    pub outputs: Vec<Param>,
    #[serde(default, rename = "stateMutability")]
    pub state_mutability: StateMutability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Param>,
    #[serde(default)]
    pub anonymous: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constructor {
    #[serde(default)]
    pub inputs: Vec<Param>,
    #[serde(default, rename = "stateMutability")]
    pub state_mutability: StateMutability,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fallback {
    #[serde(default, rename = "stateMutability")]
    pub state_mutability: StateMutability,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Receive {
    #[serde(default, rename = "stateMutability")]
    pub state_mutability: StateMutability,
}

/// A custom `error` entry. Revert payloads carry its 4-byte selector like
/// a function call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomError {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Param>,
}

fn render_signature(name: &str, inputs: &[Param]) -> Result<String, AbiParseError> {
    let types: Vec<String> = inputs
        .iter()
        .map(|p| p.resolve().map(|t| t.canonical()))
        .collect::<Result<_, _>>()?;
    Ok(format!("{name}({})", types.join(",")))
}

impl Function {
    /// Canonical signature, e.g. `transfer(address,uint256)`. Parameter
    /// names never appear.
    pub fn signature(&self) -> Result<String, AbiParseError> {
        render_signature(&self.name, &self.inputs)
    }
}

impl Event {
    pub fn signature(&self) -> Result<String, AbiParseError> {
        render_signature(&self.name, &self.inputs)
    }
}

impl CustomError {
    pub fn signature(&self) -> Result<String, AbiParseError> {
        render_signature(&self.name, &self.inputs)
    }
}

/// A parsed ABI document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Abi {
    pub entries: Vec<AbiEntry>,
}

impl Abi {
    /// Parse a standard ABI JSON array.
    pub fn from_json(json: &str) -> Result<Self, AbiParseError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.entries.iter().filter_map(|e| match e {
            AbiEntry::Function(f) => Some(f),
            _ => None,
        })
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter().filter_map(|e| match e {
            AbiEntry::Event(ev) => Some(ev),
            _ => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &CustomError> {
        self.entries.iter().filter_map(|e| match e {
            AbiEntry::Error(err) => Some(err),
            _ => None,
        })
    }

    pub fn constructor(&self) -> Option<&Constructor> {
        self.entries.iter().find_map(|e| match e {
            AbiEntry::Constructor(c) => Some(c),
            _ => None,
        })
    }
}
