//! Selector extraction and schema matching for raw call data

use super::registry::{AbiRegistry, FunctionSchema};

/// Leading bytes of call data that carry the function selector
pub const SELECTOR_SIZE: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// The call data cannot even hold a selector. Invalid input.
    #[error("call data is {length} bytes, need at least 4 for a selector")]
    Truncated { length: usize },
    /// The selector resolves to no known function. Expected for
    /// transactions invoking functions outside the registry; callers
    /// treat this as a skip, not a failure.
    #[error("no known function for selector 0x{}", hex::encode(.selector))]
    UnknownSelector { selector: [u8; 4] },
}

/// Split call data into its 4-byte selector and the argument block.
pub fn split_selector(data: &[u8]) -> Result<([u8; 4], &[u8]), MatchError> {
    if data.len() < SELECTOR_SIZE {
        return Err(MatchError::Truncated { length: data.len() });
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&data[..SELECTOR_SIZE]);
    Ok((selector, &data[SELECTOR_SIZE..]))
}

/// Resolve call data to a registered function schema.
///
/// Matching depends only on the first 4 bytes; the remaining bytes are
/// returned untouched for the argument decoder.
pub fn match_function<'r, 'd>(
    data: &'d [u8],
    registry: &'r AbiRegistry,
) -> Result<(&'r FunctionSchema, &'d [u8]), MatchError> {
    let (selector, tail) = split_selector(data)?;
    let schema = registry
        .lookup(selector)
        .ok_or(MatchError::UnknownSelector { selector })?;
    Ok((schema, tail))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOTE_ABI: &str = r#"[{ "type": "function", "name": "castVoteWithReason", "inputs": [
        { "name": "proposalId", "type": "uint256" },
        { "name": "support", "type": "uint8" },
        { "name": "reason", "type": "string" }
    ] }]"#;

    #[test]
    fn test_truncated_call_data() {
        let registry = AbiRegistry::parse(VOTE_ABI).unwrap();
        for length in 0..4 {
            let data = vec![0x7bu8; length];
            let err = match_function(&data, &registry).unwrap_err();
            assert!(matches!(err, MatchError::Truncated { length: l } if l == length));
        }
    }

    #[test]
    fn test_unknown_selector() {
        let registry = AbiRegistry::parse(VOTE_ABI).unwrap();
        let err = match_function(&[0xde, 0xad, 0xbe, 0xef], &registry).unwrap_err();
        assert!(matches!(
            err,
            MatchError::UnknownSelector { selector: [0xde, 0xad, 0xbe, 0xef] }
        ));
    }

    #[test]
    fn test_match_depends_only_on_prefix() {
        let registry = AbiRegistry::parse(VOTE_ABI).unwrap();

        let mut short = vec![0x7b, 0x3c, 0x71, 0xd3];
        let mut long = short.clone();
        short.extend_from_slice(&[0u8; 32]);
        long.extend_from_slice(&[0xffu8; 96]);

        let (schema_a, tail_a) = match_function(&short, &registry).unwrap();
        let (schema_b, tail_b) = match_function(&long, &registry).unwrap();
        assert_eq!(schema_a.signature, schema_b.signature);
        assert_eq!(tail_a.len(), 32);
        assert_eq!(tail_b.len(), 96);
    }

    #[test]
    fn test_exactly_four_bytes_matches_with_empty_tail() {
        let registry = AbiRegistry::parse(VOTE_ABI).unwrap();
        let (_, tail) = match_function(&[0x7b, 0x3c, 0x71, 0xd3], &registry).unwrap();
        assert!(tail.is_empty());
    }
}
