//! Vote extraction - projects decoded call data into vote records

use tracing::debug;

use crate::domain::abi::{
    decode_arguments, match_function, AbiRegistry, DecodeError, FunctionSchema, MatchError,
    ParamType, Value,
};
use crate::domain::transaction::TransactionRecord;

/// One decoded governance vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    /// Transaction hash the vote was cast in
    pub transaction_id: String,
    /// Proposal identifier as a decimal string (arbitrary precision)
    pub proposal_id: String,
    /// Vote choice code (0 = against, 1 = for, 2 = abstain)
    pub support: u8,
    /// Free-text reason attached to the vote
    pub reason: String,
    /// First transfer event's amount in wei, when the record carries one
    pub value_transferred: Option<i64>,
    /// Seconds since epoch
    pub timestamp: i64,
}

/// Successful extraction: either a vote, or a transaction that targeted
/// the contract but called some other function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteExtraction {
    Vote(VoteRecord),
    Skipped { selector: [u8; 4] },
}

/// Per-record extraction failures. All recoverable: callers report them
/// and move on to the next record.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("call data truncated: {length} bytes")]
    Truncated { length: usize },
    #[error("decoding `{signature}` failed: {source}")]
    Decode {
        signature: String,
        #[source]
        source: DecodeError,
    },
    #[error("`{signature}` is not a vote cast: {detail}")]
    SchemaMismatch { signature: String, detail: String },
}

/// Decode one transaction's call data into a vote record.
///
/// Runs the selector matcher, then the argument decoder, then projects
/// the decoded arguments onto the vote fields. An unknown selector is a
/// `Skipped` outcome, not an error; everything else that goes wrong is a
/// typed `ExtractError` scoped to this record.
pub fn extract(
    tx: &TransactionRecord,
    call_data: &[u8],
    registry: &AbiRegistry,
) -> Result<VoteExtraction, ExtractError> {
    let (schema, block) = match match_function(call_data, registry) {
        Ok(matched) => matched,
        Err(MatchError::Truncated { length }) => return Err(ExtractError::Truncated { length }),
        Err(MatchError::UnknownSelector { selector }) => {
            return Ok(VoteExtraction::Skipped { selector })
        }
    };
    debug!(tx = %tx.id, selector = %schema.selector_hex(), function = %schema.name, "matched call data");

    require_vote_shape(schema)?;

    let args =
        decode_arguments(schema, block).map_err(|source| ExtractError::Decode {
            signature: schema.signature.clone(),
            source,
        })?;

    let mismatch = |detail: &str| ExtractError::SchemaMismatch {
        signature: schema.signature.clone(),
        detail: detail.to_string(),
    };
    let proposal_id = match args.get("proposalId") {
        Some(Value::Uint(value, _)) => value.to_string(),
        _ => return Err(mismatch("`proposalId` did not decode to an unsigned integer")),
    };
    let support = match args.get("support") {
        Some(Value::Uint(value, _)) => u8::try_from(*value)
            .map_err(|_| mismatch("`support` does not fit in a vote code"))?,
        _ => return Err(mismatch("`support` did not decode to an unsigned integer")),
    };
    let reason = match args.get("reason") {
        Some(Value::String(value)) => value.clone(),
        _ => return Err(mismatch("`reason` did not decode to a string")),
    };

    if tx.events.len() > 1 {
        // The provider does not identify which event is the native
        // transfer; the first is reported as-is.
        debug!(tx = %tx.id, events = tx.events.len(), "multiple transfer events, reporting the first");
    }

    Ok(VoteExtraction::Vote(VoteRecord {
        transaction_id: tx.id.clone(),
        proposal_id,
        support,
        reason,
        value_transferred: tx.first_event_amount(),
        timestamp: tx.timestamp,
    }))
}

/// Check that a matched schema carries exactly the three vote fields: a
/// proposal identifier (unsigned integer of any width), a `uint8` vote
/// code, and a free-text reason. Anything else shares the selector by
/// coincidence and is reported as a mismatch, never decoded into a vote.
fn require_vote_shape(schema: &FunctionSchema) -> Result<(), ExtractError> {
    let mismatch = |detail: String| ExtractError::SchemaMismatch {
        signature: schema.signature.clone(),
        detail,
    };

    if schema.inputs.len() != 3 {
        return Err(mismatch(format!(
            "expected 3 parameters, found {}",
            schema.inputs.len()
        )));
    }
    match schema.param("proposalId") {
        Some(param) if matches!(param.ty, ParamType::Uint(_)) => {}
        Some(param) => {
            return Err(mismatch(format!(
                "`proposalId` is {}, expected an unsigned integer",
                param.ty.canonical()
            )))
        }
        None => return Err(mismatch("no `proposalId` parameter".to_string())),
    }
    match schema.param("support") {
        Some(param) if param.ty == ParamType::Uint(8) => {}
        Some(param) => {
            return Err(mismatch(format!(
                "`support` is {}, expected uint8",
                param.ty.canonical()
            )))
        }
        None => return Err(mismatch("no `support` parameter".to_string())),
    }
    match schema.param("reason") {
        Some(param) if param.ty == ParamType::String => {}
        Some(param) => {
            return Err(mismatch(format!(
                "`reason` is {}, expected string",
                param.ty.canonical()
            )))
        }
        None => return Err(mismatch("no `reason` parameter".to_string())),
    }
    Ok(())
}
