//! Destination-address filtering
//!
//! Addresses arrive in mixed casings (checksummed from configuration,
//! lowercase from the provider), so comparison happens on normalized
//! lowercase hex. Checksummed forms are accepted, not validated.

/// Normalize an address to lowercase `0x`-prefixed hex.
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    format!("0x{}", payload.to_lowercase())
}

/// Whether a transaction's destination is the target contract.
///
/// Pure predicate; a record with no destination never matches.
pub fn matches_target(to: Option<&str>, target: &str) -> bool {
    match to {
        Some(to) => normalize_address(to) == normalize_address(target),
        None => false,
    }
}
