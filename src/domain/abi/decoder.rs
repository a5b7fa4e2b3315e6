//! ABI argument decoding over the 32-byte word layout.
//!
//! The argument block is a sequence of 32-byte head words, one per
//! parameter. Static types live directly in their head word; dynamic types
//! (string, bytes, arrays) store an offset into a tail region holding a
//! length word followed by the payload. Every read is bounds-checked and
//! every failure is a typed error: decoding is all-or-nothing, a partial
//! result is never returned.

use alloy_primitives::{Address, I256, U256};

use super::registry::{FunctionSchema, ParamSpec, ParamType};

/// Size of one encoded word in bytes
pub const WORD_SIZE: usize = 32;

/// A decode failure for a single parameter. Any one of these fails the
/// whole call decode.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("value for `{param}` does not fit in {bits} bits")]
    IntegerRange { param: String, bits: usize },
    #[error("boolean word for `{param}` is neither 0 nor 1")]
    InvalidBooleanEncoding { param: String },
    #[error(
        "`{param}`: read at offset {offset} of {length} bytes exceeds argument block of {block} bytes"
    )]
    OutOfBounds {
        param: String,
        offset: u64,
        length: u64,
        block: usize,
    },
    #[error("string payload for `{param}` is not valid UTF-8")]
    InvalidUtf8 { param: String },
}

/// A decoded argument value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unsigned integer with its declared bit width
    Uint(U256, usize),
    /// Signed integer with its declared bit width
    Int(I256, usize),
    Address(Address),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
}

impl Value {
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Value::Uint(value, _) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }
}

/// Decoded arguments of one call, in the schema's declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedArguments {
    entries: Vec<(String, Value)>,
}

impl DecodedArguments {
    /// Look up a value by parameter name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

/// Decode an argument block against a function schema.
///
/// `block` is the call data with the 4-byte selector already stripped;
/// dynamic offsets are relative to its start.
pub fn decode_arguments(
    schema: &FunctionSchema,
    block: &[u8],
) -> Result<DecodedArguments, DecodeError> {
    let values = decode_block(&schema.inputs, block)?;
    let entries = schema
        .inputs
        .iter()
        .map(|p| p.name.clone())
        .zip(values)
        .collect();
    Ok(DecodedArguments { entries })
}

fn decode_block(params: &[ParamSpec], block: &[u8]) -> Result<Vec<Value>, DecodeError> {
    params
        .iter()
        .enumerate()
        .map(|(index, param)| decode_value(&param.name, &param.ty, block, index))
        .collect()
}

fn decode_value(
    name: &str,
    ty: &ParamType,
    block: &[u8],
    index: usize,
) -> Result<Value, DecodeError> {
    match ty {
        ParamType::Uint(bits) => {
            let value = U256::from_be_slice(head_word(name, block, index)?);
            if *bits < 256 && value >> *bits != U256::ZERO {
                return Err(DecodeError::IntegerRange {
                    param: name.to_string(),
                    bits: *bits,
                });
            }
            Ok(Value::Uint(value, *bits))
        }
        ParamType::Int(bits) => {
            let raw = U256::from_be_slice(head_word(name, block, index)?);
            if *bits < 256 {
                // The upper bits must be a sign extension: all zeros for a
                // non-negative value, all ones (including the sign bit)
                // for a negative one.
                let upper = raw >> (*bits - 1);
                if upper != U256::ZERO && upper != U256::MAX >> (*bits - 1) {
                    return Err(DecodeError::IntegerRange {
                        param: name.to_string(),
                        bits: *bits,
                    });
                }
            }
            Ok(Value::Int(I256::from_raw(raw), *bits))
        }
        ParamType::Address => {
            // Lower 20 bytes of the word; dirty upper bytes are ignored
            // per the encoding convention.
            let word = head_word(name, block, index)?;
            Ok(Value::Address(Address::from_slice(&word[12..])))
        }
        ParamType::Bool => {
            let value = U256::from_be_slice(head_word(name, block, index)?);
            if value == U256::ZERO {
                Ok(Value::Bool(false))
            } else if value == U256::ONE {
                Ok(Value::Bool(true))
            } else {
                Err(DecodeError::InvalidBooleanEncoding {
                    param: name.to_string(),
                })
            }
        }
        ParamType::String => {
            let offset = head_offset(name, block, index)?;
            let payload = read_payload(name, block, offset)?;
            String::from_utf8(payload)
                .map(Value::String)
                .map_err(|_| DecodeError::InvalidUtf8 {
                    param: name.to_string(),
                })
        }
        ParamType::Bytes => {
            let offset = head_offset(name, block, index)?;
            Ok(Value::Bytes(read_payload(name, block, offset)?))
        }
        ParamType::Array(element) => {
            let offset = head_offset(name, block, index)?;
            decode_array(name, element, block, offset)
        }
    }
}

fn decode_array(
    name: &str,
    element: &ParamType,
    block: &[u8],
    offset: usize,
) -> Result<Value, DecodeError> {
    let count = tail_length(name, block, offset)?;

    // Offsets inside the array are relative to the start of its element
    // block, right after the length word.
    let elements = block.get(offset + WORD_SIZE..).unwrap_or_default();

    // Each element consumes at least one head word; reject absurd counts
    // before allocating.
    let head_bytes = count.checked_mul(WORD_SIZE);
    if head_bytes.map_or(true, |need| need > elements.len()) {
        return Err(DecodeError::OutOfBounds {
            param: name.to_string(),
            offset: (offset as u64).saturating_add(WORD_SIZE as u64),
            length: (count as u64).saturating_mul(WORD_SIZE as u64),
            block: block.len(),
        });
    }

    let mut values = Vec::with_capacity(count);
    for index in 0..count {
        values.push(decode_value(
            &format!("{name}[{index}]"),
            element,
            elements,
            index,
        )?);
    }
    Ok(Value::Array(values))
}

/// Head word of parameter `index`, or `OutOfBounds` when the block is too
/// short.
fn head_word<'b>(name: &str, block: &'b [u8], index: usize) -> Result<&'b [u8], DecodeError> {
    let out_of_bounds = |start: usize| DecodeError::OutOfBounds {
        param: name.to_string(),
        offset: start as u64,
        length: WORD_SIZE as u64,
        block: block.len(),
    };
    let start = index
        .checked_mul(WORD_SIZE)
        .ok_or_else(|| out_of_bounds(usize::MAX))?;
    let end = start
        .checked_add(WORD_SIZE)
        .ok_or_else(|| out_of_bounds(start))?;
    block.get(start..end).ok_or_else(|| out_of_bounds(start))
}

/// Head word of a dynamic parameter, interpreted as a tail offset.
fn head_offset(name: &str, block: &[u8], index: usize) -> Result<usize, DecodeError> {
    let word = U256::from_be_slice(head_word(name, block, index)?);
    u64::try_from(word)
        .ok()
        .and_then(|value| usize::try_from(value).ok())
        .ok_or_else(|| DecodeError::OutOfBounds {
            param: name.to_string(),
            offset: u64::MAX,
            length: 0,
            block: block.len(),
        })
}

/// Length word at the start of a dynamic tail.
fn tail_length(name: &str, block: &[u8], offset: usize) -> Result<usize, DecodeError> {
    let out_of_bounds = |length: u64| DecodeError::OutOfBounds {
        param: name.to_string(),
        offset: offset as u64,
        length,
        block: block.len(),
    };
    let end = offset
        .checked_add(WORD_SIZE)
        .ok_or_else(|| out_of_bounds(WORD_SIZE as u64))?;
    let word = block
        .get(offset..end)
        .ok_or_else(|| out_of_bounds(WORD_SIZE as u64))?;
    let length = u64::try_from(U256::from_be_slice(word)).map_err(|_| out_of_bounds(u64::MAX))?;
    usize::try_from(length).map_err(|_| out_of_bounds(length))
}

/// Payload of a string/bytes tail: length word, then exactly that many
/// bytes.
fn read_payload(name: &str, block: &[u8], offset: usize) -> Result<Vec<u8>, DecodeError> {
    let length = tail_length(name, block, offset)?;
    let out_of_bounds = || DecodeError::OutOfBounds {
        param: name.to_string(),
        offset: offset as u64,
        length: length as u64,
        block: block.len(),
    };
    let start = offset + WORD_SIZE;
    let end = start.checked_add(length).ok_or_else(out_of_bounds)?;
    block
        .get(start..end)
        .map(|payload| payload.to_vec())
        .ok_or_else(out_of_bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::registry::compute_selector;

    fn schema(signature_name: &str, params: &[(&str, ParamType)]) -> FunctionSchema {
        let inputs: Vec<ParamSpec> = params
            .iter()
            .map(|(name, ty)| ParamSpec {
                name: name.to_string(),
                ty: ty.clone(),
            })
            .collect();
        let signature = format!(
            "{}({})",
            signature_name,
            inputs
                .iter()
                .map(|p| p.ty.canonical())
                .collect::<Vec<_>>()
                .join(",")
        );
        FunctionSchema {
            selector: compute_selector(&signature),
            name: signature_name.to_string(),
            signature,
            inputs,
        }
    }

    fn word_u64(value: u64) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[24..].copy_from_slice(&value.to_be_bytes());
        word
    }

    fn encode_dynamic(payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&word_u64(payload.len() as u64));
        out.extend_from_slice(payload);
        out.resize(out.len() + (32 - payload.len() % 32) % 32, 0);
        out
    }

    #[test]
    fn test_decode_static_params() {
        let schema = schema(
            "f",
            &[("id", ParamType::Uint(256)), ("choice", ParamType::Uint(8))],
        );
        let mut block = Vec::new();
        block.extend_from_slice(&word_u64(42));
        block.extend_from_slice(&word_u64(1));

        let args = decode_arguments(&schema, &block).unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args.get("id"), Some(&Value::Uint(U256::from(42u64), 256)));
        assert_eq!(args.get("choice"), Some(&Value::Uint(U256::ONE, 8)));
        assert_eq!(args.get("missing"), None);
    }

    #[test]
    fn test_decode_string() {
        let schema = schema("f", &[("reason", ParamType::String)]);
        let mut block = Vec::new();
        block.extend_from_slice(&word_u64(32));
        block.extend_from_slice(&encode_dynamic(b"LGTM"));

        let args = decode_arguments(&schema, &block).unwrap();
        assert_eq!(args.get("reason").and_then(Value::as_str), Some("LGTM"));
    }

    #[test]
    fn test_decode_bytes() {
        let schema = schema("f", &[("data", ParamType::Bytes)]);
        let mut block = Vec::new();
        block.extend_from_slice(&word_u64(32));
        block.extend_from_slice(&encode_dynamic(&[0xde, 0xad, 0xbe, 0xef]));

        let args = decode_arguments(&schema, &block).unwrap();
        assert_eq!(
            args.get("data"),
            Some(&Value::Bytes(vec![0xde, 0xad, 0xbe, 0xef]))
        );
    }

    #[test]
    fn test_uint_range_violation() {
        let schema = schema("f", &[("choice", ParamType::Uint(8))]);
        let block = word_u64(256);

        let err = decode_arguments(&schema, &block).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::IntegerRange { ref param, bits: 8 } if param == "choice"
        ));
    }

    #[test]
    fn test_int_sign_extension() {
        let schema = schema("f", &[("delta", ParamType::Int(8))]);

        // -1 encodes as all ones
        let block = [0xff; 32];
        let args = decode_arguments(&schema, &block).unwrap();
        assert_eq!(args.get("delta"), Some(&Value::Int(I256::MINUS_ONE, 8)));

        // 255 is not a valid int8: upper bits are neither all zeros nor a
        // sign extension
        let block = word_u64(255);
        let err = decode_arguments(&schema, &block).unwrap_err();
        assert!(matches!(err, DecodeError::IntegerRange { bits: 8, .. }));
    }

    #[test]
    fn test_bool_encodings() {
        let schema = schema("f", &[("flag", ParamType::Bool)]);

        let args = decode_arguments(&schema, &word_u64(0)).unwrap();
        assert_eq!(args.get("flag"), Some(&Value::Bool(false)));

        let args = decode_arguments(&schema, &word_u64(1)).unwrap();
        assert_eq!(args.get("flag"), Some(&Value::Bool(true)));

        let err = decode_arguments(&schema, &word_u64(2)).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidBooleanEncoding { ref param } if param == "flag"
        ));
    }

    #[test]
    fn test_address_ignores_upper_bytes() {
        let schema = schema("f", &[("who", ParamType::Address)]);
        let mut block = [0xaa; 32];
        block[12..].copy_from_slice(&[0x11; 20]);

        let args = decode_arguments(&schema, &block).unwrap();
        assert_eq!(
            args.get("who"),
            Some(&Value::Address(Address::from_slice(&[0x11; 20])))
        );
    }

    #[test]
    fn test_missing_head_word() {
        let schema = schema(
            "f",
            &[("a", ParamType::Uint(256)), ("b", ParamType::Uint(256))],
        );
        let block = word_u64(1);

        let err = decode_arguments(&schema, &block).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::OutOfBounds { ref param, .. } if param == "b"
        ));
    }

    #[test]
    fn test_offset_past_buffer() {
        let schema = schema("f", &[("reason", ParamType::String)]);
        let block = word_u64(4096);

        let err = decode_arguments(&schema, &block).unwrap_err();
        assert!(matches!(err, DecodeError::OutOfBounds { .. }));
    }

    #[test]
    fn test_length_past_buffer() {
        let schema = schema("f", &[("reason", ParamType::String)]);
        let mut block = Vec::new();
        block.extend_from_slice(&word_u64(32));
        // Length word claims 1000 bytes, but only one padded word follows
        block.extend_from_slice(&word_u64(1000));
        block.extend_from_slice(&[0u8; 32]);

        let err = decode_arguments(&schema, &block).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::OutOfBounds { length: 1000, .. }
        ));
    }

    #[test]
    fn test_invalid_utf8_string() {
        let schema = schema("f", &[("reason", ParamType::String)]);
        let mut block = Vec::new();
        block.extend_from_slice(&word_u64(32));
        block.extend_from_slice(&encode_dynamic(&[0xff, 0xfe]));

        let err = decode_arguments(&schema, &block).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidUtf8 { ref param } if param == "reason"
        ));
    }

    #[test]
    fn test_decode_uint_array() {
        let schema = schema(
            "f",
            &[("ids", ParamType::Array(Box::new(ParamType::Uint(256))))],
        );
        let mut block = Vec::new();
        block.extend_from_slice(&word_u64(32)); // offset to the tail
        block.extend_from_slice(&word_u64(3)); // element count
        block.extend_from_slice(&word_u64(7));
        block.extend_from_slice(&word_u64(8));
        block.extend_from_slice(&word_u64(9));

        let args = decode_arguments(&schema, &block).unwrap();
        assert_eq!(
            args.get("ids"),
            Some(&Value::Array(vec![
                Value::Uint(U256::from(7u64), 256),
                Value::Uint(U256::from(8u64), 256),
                Value::Uint(U256::from(9u64), 256),
            ]))
        );
    }

    #[test]
    fn test_array_count_past_buffer() {
        let schema = schema(
            "f",
            &[("ids", ParamType::Array(Box::new(ParamType::Uint(256))))],
        );
        let mut block = Vec::new();
        block.extend_from_slice(&word_u64(32));
        // Claims 1 << 40 elements with no element block behind it
        block.extend_from_slice(&word_u64(1 << 40));

        let err = decode_arguments(&schema, &block).unwrap_err();
        assert!(matches!(err, DecodeError::OutOfBounds { .. }));
    }

    #[test]
    fn test_round_trip_known_values() {
        // Hand-encoded (uint256 42, bool true, string "hello vote") block
        let schema = schema(
            "f",
            &[
                ("id", ParamType::Uint(256)),
                ("flag", ParamType::Bool),
                ("note", ParamType::String),
            ],
        );
        let mut block = Vec::new();
        block.extend_from_slice(&word_u64(42));
        block.extend_from_slice(&word_u64(1));
        block.extend_from_slice(&word_u64(96)); // 3 head words
        block.extend_from_slice(&encode_dynamic(b"hello vote"));

        let args = decode_arguments(&schema, &block).unwrap();
        assert_eq!(args.get("id"), Some(&Value::Uint(U256::from(42u64), 256)));
        assert_eq!(args.get("flag"), Some(&Value::Bool(true)));
        assert_eq!(
            args.get("note"),
            Some(&Value::String("hello vote".to_string()))
        );
    }

    #[test]
    fn test_empty_params_empty_block() {
        let schema = schema("f", &[]);
        let args = decode_arguments(&schema, &[]).unwrap();
        assert!(args.is_empty());
    }
}
