//! The resolved ABI type tree.
//!
//! Every parameter of a function or event resolves to an [`AbiType`]. The
//! tree drives both sides of the codec: the encoder walks it to lay values
//! out in the head/tail format, and the decoder walks it to take them apart
//! again. Canonical signature rendering (the string that gets hashed into a
//! selector) is the `Display` impl.

use crate::error::AbiParseError;
use std::fmt;

/// Maximum tuple/array nesting accepted at construction time. Deeper ABIs
/// are rejected so the recursive encoder and decoder cannot blow the stack.
pub const MAX_NESTING: usize = 32;

/// A resolved ABI type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbiType {
    /// Unsigned integer. Width in bits, multiple of 8, in `8..=256`.
    Uint(u16),
    /// Signed two's-complement integer. Width as for `Uint`.
    Int(u16),
    /// Boolean, one word.
    Bool,
    /// 20-byte account address, right-aligned in its word.
    Address,
    /// Fixed-size byte array `bytes1..=bytes32`, left-aligned in its word.
    FixedBytes(u8),
    /// Variable-length byte array. Dynamic.
    Bytes,
    /// UTF-8 string. Dynamic.
    String,
    /// Variable-length array. Dynamic.
    Array(Box<AbiType>),
    /// Fixed-length array. Dynamic iff the element type is dynamic.
    FixedArray(Box<AbiType>, usize),
    /// Tuple with named fields. Dynamic iff any field is dynamic.
    /// Field names take no part in canonical rendering.
    Tuple(Vec<(String, AbiType)>),
}

impl AbiType {
    /// A type is dynamic iff its encoded length depends on the value:
    /// `bytes`, `string`, dynamic arrays, or any container holding a
    /// dynamic type.
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiType::Bytes | AbiType::String | AbiType::Array(_) => true,
            AbiType::FixedArray(elem, _) => elem.is_dynamic(),
            AbiType::Tuple(fields) => fields.iter().any(|(_, t)| t.is_dynamic()),
            _ => false,
        }
    }

    /// Encoded size of a static type, always a multiple of 32. For dynamic
    /// types this is the size of the offset slot they occupy in a head.
    pub fn static_size(&self) -> usize {
        match self {
            AbiType::FixedArray(elem, len) if !self.is_dynamic() => len * elem.static_size(),
            AbiType::Tuple(fields) if !self.is_dynamic() => {
                fields.iter().map(|(_, t)| t.static_size()).sum()
            }
            _ => 32,
        }
    }

    /// Bytes this type contributes to the head of an encoded sequence:
    /// 32 (an offset word) if dynamic, the full static size otherwise.
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            32
        } else {
            self.static_size()
        }
    }

    /// Canonical form as hashed into selectors: `uint`/`int` widened to
    /// 256 by the parser, tuples rendered as parenthesized lists, no
    /// parameter names.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// Depth of the type tree; elementary types are depth 1.
    pub fn depth(&self) -> usize {
        match self {
            AbiType::Array(elem) | AbiType::FixedArray(elem, _) => 1 + elem.depth(),
            AbiType::Tuple(fields) => {
                1 + fields.iter().map(|(_, t)| t.depth()).max().unwrap_or(0)
            }
            _ => 1,
        }
    }

    /// Validate a tree built outside the expression parser (e.g. from ABI
    /// JSON `components`). `expr` is only used for error context.
    pub fn validate(&self, expr: &str) -> Result<(), AbiParseError> {
        if self.depth() > MAX_NESTING {
            return Err(AbiParseError::NestingTooDeep {
                expr: expr.to_string(),
                max: MAX_NESTING,
            });
        }
        self.validate_node(expr)
    }

    fn validate_node(&self, expr: &str) -> Result<(), AbiParseError> {
        match self {
            AbiType::Uint(bits) | AbiType::Int(bits) => {
                if *bits == 0 || *bits > 256 || bits % 8 != 0 {
                    return Err(AbiParseError::InvalidIntWidth {
                        expr: expr.to_string(),
                        bits: *bits,
                    });
                }
            }
            AbiType::FixedBytes(len) => {
                if *len == 0 || *len > 32 {
                    return Err(AbiParseError::InvalidBytesLength {
                        expr: expr.to_string(),
                        len: *len as usize,
                    });
                }
            }
            AbiType::Array(elem) => elem.validate_node(expr)?,
            AbiType::FixedArray(elem, len) => {
                if *len == 0 {
                    return Err(AbiParseError::ZeroLengthArray {
                        expr: expr.to_string(),
                    });
                }
                elem.validate_node(expr)?;
            }
            AbiType::Tuple(fields) => {
                if fields.is_empty() {
                    return Err(AbiParseError::EmptyTuple {
                        expr: expr.to_string(),
                    });
                }
                for (_, t) in fields {
                    t.validate_node(expr)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Uint(bits) => write!(f, "uint{bits}"),
            AbiType::Int(bits) => write!(f, "int{bits}"),
            AbiType::Bool => write!(f, "bool"),
            AbiType::Address => write!(f, "address"),
            AbiType::FixedBytes(len) => write!(f, "bytes{len}"),
            AbiType::Bytes => write!(f, "bytes"),
            AbiType::String => write!(f, "string"),
            AbiType::Array(elem) => write!(f, "{elem}[]"),
            AbiType::FixedArray(elem, len) => write!(f, "{elem}[{len}]"),
            AbiType::Tuple(fields) => {
                write!(f, "(")?;
                for (i, (_, t)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(fields: Vec<AbiType>) -> AbiType {
        AbiType::Tuple(
            fields
                .into_iter()
                .enumerate()
                .map(|(i, t)| (format!("field{i}"), t))
                .collect(),
        )
    }

    #[test]
    fn canonical_rendering() {
        assert_eq!(AbiType::Uint(256).canonical(), "uint256");
        assert_eq!(
            AbiType::Array(Box::new(AbiType::Address)).canonical(),
            "address[]"
        );
        assert_eq!(
            AbiType::FixedArray(Box::new(AbiType::FixedBytes(8)), 4).canonical(),
            "bytes8[4]"
        );
        assert_eq!(
            tuple(vec![AbiType::Uint(256), AbiType::Bytes]).canonical(),
            "(uint256,bytes)"
        );
    }

    #[test]
    fn canonical_ignores_field_names() {
        let a = AbiType::Tuple(vec![
            ("amount".into(), AbiType::Uint(256)),
            ("payload".into(), AbiType::Bytes),
        ]);
        let b = tuple(vec![AbiType::Uint(256), AbiType::Bytes]);
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn dynamism() {
        assert!(!AbiType::Uint(8).is_dynamic());
        assert!(!AbiType::FixedBytes(32).is_dynamic());
        assert!(AbiType::Bytes.is_dynamic());
        assert!(AbiType::String.is_dynamic());
        assert!(AbiType::Array(Box::new(AbiType::Bool)).is_dynamic());
        // Fixed array of a static type stays static.
        assert!(!AbiType::FixedArray(Box::new(AbiType::Uint(256)), 3).is_dynamic());
        // Fixed array of a dynamic type is dynamic.
        assert!(AbiType::FixedArray(Box::new(AbiType::String), 2).is_dynamic());
        // A tuple is dynamic iff any field is.
        assert!(!tuple(vec![AbiType::Bool, AbiType::Address]).is_dynamic());
        assert!(tuple(vec![AbiType::Bool, AbiType::Bytes]).is_dynamic());
    }

    #[test]
    fn static_sizes() {
        assert_eq!(AbiType::Uint(8).static_size(), 32);
        assert_eq!(AbiType::Address.static_size(), 32);
        assert_eq!(
            AbiType::FixedArray(Box::new(AbiType::Uint(256)), 3).static_size(),
            96
        );
        let t = tuple(vec![
            AbiType::Bool,
            AbiType::FixedArray(Box::new(AbiType::Uint(256)), 2),
        ]);
        assert_eq!(t.static_size(), 96);
    }

    #[test]
    fn head_size_of_dynamic_is_one_word() {
        assert_eq!(AbiType::Bytes.head_size(), 32);
        assert_eq!(AbiType::Array(Box::new(AbiType::Uint(256))).head_size(), 32);
        assert_eq!(
            AbiType::FixedArray(Box::new(AbiType::Uint(256)), 4).head_size(),
            128
        );
    }

    #[test]
    fn validate_rejects_bad_widths() {
        assert!(AbiType::Uint(0).validate("uint0").is_err());
        assert!(AbiType::Uint(12).validate("uint12").is_err());
        assert!(AbiType::Int(264).validate("int264").is_err());
        assert!(AbiType::FixedBytes(0).validate("bytes0").is_err());
        assert!(AbiType::FixedBytes(33).validate("bytes33").is_err());
        assert!(AbiType::Tuple(vec![]).validate("()").is_err());
        assert!(AbiType::FixedArray(Box::new(AbiType::Bool), 0)
            .validate("bool[0]")
            .is_err());
    }

    #[test]
    fn validate_rejects_deep_nesting() {
        let mut t = AbiType::Uint(256);
        for _ in 0..MAX_NESTING {
            t = AbiType::Array(Box::new(t));
        }
        assert!(t.validate("deep").is_err());
    }
}
