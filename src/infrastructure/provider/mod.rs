//! Provider abstractions for transaction listing and call-data fetching
//!
//! The traits model the two blocking operations the pipeline depends on;
//! the decoding core only runs once their data is in memory.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::transaction::TransactionRecord;

mod blockdaemon;

pub use blockdaemon::BlockdaemonClient;

/// Lists a wallet's transactions within a time range.
///
/// Completeness is the implementor's responsibility; the pipeline assumes
/// it receives the full relevant set.
#[async_trait]
pub trait TransactionLister: Send + Sync {
    async fn list_transactions(
        &self,
        wallet: &str,
        from: u64,
        to: u64,
    ) -> Result<Vec<TransactionRecord>>;
}

/// Fetches a transaction's raw input data by id.
#[async_trait]
pub trait CallDataFetcher: Send + Sync {
    async fn call_data(&self, transaction_id: &str) -> Result<Vec<u8>>;
}
