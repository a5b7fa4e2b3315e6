//! Batch pipeline: list transactions, filter by destination, fetch call
//! data, extract votes.
//!
//! Records are independent, so call-data fetches run concurrently with
//! bounded parallelism; `buffered` keeps outcomes in input order. Decoding
//! itself is synchronous and shares only the read-only registry.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::domain::abi::AbiRegistry;
use crate::domain::filter;
use crate::domain::transaction::TransactionRecord;
use crate::domain::vote::{self, VoteExtraction, VoteRecord};
use crate::infrastructure::provider::{CallDataFetcher, TransactionLister};

const FETCH_CONCURRENCY: usize = 8;

/// Per-transaction result of the pipeline, in input order.
#[derive(Debug)]
pub enum VoteOutcome {
    /// The transaction cast a vote and decoded cleanly
    Decoded(VoteRecord),
    /// The transaction targeted the contract but called another function
    Skipped {
        transaction_id: String,
        selector: [u8; 4],
    },
    /// Fetch or decode failed for this record; the batch continued
    Failed {
        transaction_id: String,
        reason: String,
    },
}

/// Run the full pipeline for one wallet and contract.
///
/// Transactions addressed elsewhere are dropped before any call-data
/// fetch or decode. A failure listing transactions is fatal; everything
/// after that is per-record.
pub async fn collect_votes(
    lister: &dyn TransactionLister,
    fetcher: &dyn CallDataFetcher,
    registry: &AbiRegistry,
    wallet: &str,
    contract: &str,
    from: u64,
    to: u64,
) -> Result<Vec<VoteOutcome>> {
    let transactions = lister.list_transactions(wallet, from, to).await?;
    debug!(count = transactions.len(), "listed transactions");

    let addressed: Vec<TransactionRecord> = transactions
        .into_iter()
        .filter(|tx| filter::matches_target(tx.to.as_deref(), contract))
        .collect();
    debug!(count = addressed.len(), "transactions addressed to the contract");

    let fetched: Vec<(TransactionRecord, Result<Vec<u8>>)> = stream::iter(addressed)
        .map(|tx| {
            let id = tx.id.clone();
            async move {
                let data = fetcher.call_data(&id).await;
                (tx, data)
            }
        })
        .buffered(FETCH_CONCURRENCY)
        .collect()
        .await;

    Ok(fetched
        .into_iter()
        .map(|(tx, data)| outcome_for(&tx, data, registry))
        .collect())
}

fn outcome_for(
    tx: &TransactionRecord,
    data: Result<Vec<u8>>,
    registry: &AbiRegistry,
) -> VoteOutcome {
    let data = match data {
        Ok(data) => data,
        Err(err) => {
            warn!(tx = %tx.id, "call data fetch failed: {err:#}");
            return VoteOutcome::Failed {
                transaction_id: tx.id.clone(),
                reason: format!("call data fetch failed: {err:#}"),
            };
        }
    };

    match vote::extract(tx, &data, registry) {
        Ok(VoteExtraction::Vote(record)) => VoteOutcome::Decoded(record),
        Ok(VoteExtraction::Skipped { selector }) => {
            warn!(tx = %tx.id, selector = %format!("0x{}", hex::encode(selector)), "not a vote cast, skipping");
            VoteOutcome::Skipped {
                transaction_id: tx.id.clone(),
                selector,
            }
        }
        Err(err) => {
            warn!(tx = %tx.id, "skipping: {err}");
            VoteOutcome::Failed {
                transaction_id: tx.id.clone(),
                reason: err.to_string(),
            }
        }
    }
}
