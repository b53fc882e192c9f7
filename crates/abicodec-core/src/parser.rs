//! Type-expression parser.
//!
//! Turns strings like `uint256`, `bytes32[4]`, `(uint256,address)[]` or
//! `tuple(uint256 amount, bytes data)` into [`AbiType`] trees. Array
//! suffixes are stripped from the right (the rightmost suffix is the
//! outermost dimension), tuple fields are split at depth-0 commas, and
//! whitespace inside a tuple field separates the type from an optional
//! parameter name.

use crate::error::AbiParseError;
use crate::types::{AbiType, MAX_NESTING};

/// Parse a type expression into a validated [`AbiType`].
pub fn parse_type(expr: &str) -> Result<AbiType, AbiParseError> {
    parse_inner(expr.trim(), expr, 0)
}

fn err(root: &str, reason: impl Into<String>) -> AbiParseError {
    AbiParseError::InvalidTypeExpression {
        expr: root.to_string(),
        reason: reason.into(),
    }
}

fn parse_inner(s: &str, root: &str, depth: usize) -> Result<AbiType, AbiParseError> {
    if depth >= MAX_NESTING {
        return Err(AbiParseError::NestingTooDeep {
            expr: root.to_string(),
            max: MAX_NESTING,
        });
    }
    let s = s.trim();
    if s.is_empty() {
        return Err(err(root, "empty type"));
    }

    // Rightmost `[..]` suffix first: it is the outermost array dimension.
    if let Some(body) = s.strip_suffix(']') {
        let open = body
            .rfind('[')
            .ok_or_else(|| err(root, "unmatched ']'"))?;
        let elem = parse_inner(&body[..open], root, depth + 1)?;
        let len_str = &body[open + 1..];
        if len_str.is_empty() {
            return Ok(AbiType::Array(Box::new(elem)));
        }
        let len: usize = len_str
            .parse()
            .map_err(|_| err(root, format!("bad array length '{len_str}'")))?;
        if len == 0 {
            return Err(AbiParseError::ZeroLengthArray {
                expr: root.to_string(),
            });
        }
        return Ok(AbiType::FixedArray(Box::new(elem), len));
    }

    // Tuple forms: `tuple(...)` or bare `(...)`.
    let tuple_body = if let Some(rest) = s.strip_prefix("tuple(") {
        Some(
            rest.strip_suffix(')')
                .ok_or_else(|| err(root, "unterminated tuple"))?,
        )
    } else if let Some(rest) = s.strip_prefix('(') {
        Some(
            rest.strip_suffix(')')
                .ok_or_else(|| err(root, "unterminated tuple"))?,
        )
    } else {
        None
    };
    if let Some(body) = tuple_body {
        let parts = split_top_level(body, root)?;
        if parts.is_empty() {
            return Err(AbiParseError::EmptyTuple {
                expr: root.to_string(),
            });
        }
        let mut fields = Vec::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            let (ty_expr, name) = split_field_name(part);
            let name = match name {
                Some(n) => n.to_string(),
                None => format!("field{i}"),
            };
            fields.push((name, parse_inner(ty_expr, root, depth + 1)?));
        }
        return Ok(AbiType::Tuple(fields));
    }

    parse_elementary(s, root)
}

fn parse_elementary(s: &str, root: &str) -> Result<AbiType, AbiParseError> {
    match s {
        "bool" => return Ok(AbiType::Bool),
        "address" => return Ok(AbiType::Address),
        "string" => return Ok(AbiType::String),
        "bytes" => return Ok(AbiType::Bytes),
        // Bare forms appear in ABI JSON only; they widen to 256 here and
        // never reach an emitted signature un-widened.
        "uint" => return Ok(AbiType::Uint(256)),
        "int" => return Ok(AbiType::Int(256)),
        "tuple" => return Err(err(root, "tuple type requires components")),
        _ => {}
    }
    if let Some(width) = s.strip_prefix("uint") {
        return int_width(width, root).map(AbiType::Uint);
    }
    if let Some(width) = s.strip_prefix("int") {
        return int_width(width, root).map(AbiType::Int);
    }
    if let Some(len_str) = s.strip_prefix("bytes") {
        let len: usize = len_str
            .parse()
            .map_err(|_| err(root, format!("unknown type '{s}'")))?;
        if len == 0 || len > 32 {
            return Err(AbiParseError::InvalidBytesLength {
                expr: root.to_string(),
                len,
            });
        }
        return Ok(AbiType::FixedBytes(len as u8));
    }
    Err(err(root, format!("unknown type '{s}'")))
}

fn int_width(width: &str, root: &str) -> Result<u16, AbiParseError> {
    let bits: u16 = width.parse().map_err(|_| {
        err(root, format!("bad integer width '{width}'"))
    })?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(AbiParseError::InvalidIntWidth {
            expr: root.to_string(),
            bits,
        });
    }
    Ok(bits)
}

/// Split `s` at depth-0 commas, tracking `(`/`)` and `[`/`]` nesting.
/// Returns an empty vec for an all-whitespace input.
fn split_top_level<'a>(s: &'a str, root: &str) -> Result<Vec<&'a str>, AbiParseError> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth -= 1;
                if depth < 0 {
                    return Err(err(root, "unbalanced brackets"));
                }
            }
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(err(root, "unbalanced brackets"));
    }
    let last = &s[start..];
    if !(parts.is_empty() && last.trim().is_empty()) {
        parts.push(last);
    }
    Ok(parts)
}

/// Split a tuple field into its type expression and an optional trailing
/// parameter name. The name, when present, follows the last depth-0
/// whitespace run.
fn split_field_name(field: &str) -> (&str, Option<&str>) {
    let field = field.trim();
    let mut depth = 0i32;
    let mut split_at = None;
    for (i, c) in field.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            c if c.is_whitespace() && depth == 0 => split_at = Some(i),
            _ => {}
        }
    }
    match split_at {
        Some(i) => {
            let name = field[i..].trim();
            if name.is_empty() {
                (field, None)
            } else {
                (field[..i].trim_end(), Some(name))
            }
        }
        None => (field, None),
    }
}
