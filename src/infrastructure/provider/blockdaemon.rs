//! Blockdaemon client: Universal API for transaction listings, native
//! JSON-RPC endpoint for raw call data. Both authenticate with the same
//! `X-API-Key` header.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{CallDataFetcher, TransactionLister};
use crate::domain::transaction::{TransactionRecord, TransferEvent};

const PAGE_SIZE: usize = 100;
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

// Wire shape of the account-transactions listing
#[derive(Debug, Deserialize)]
struct TxPage {
    #[serde(default)]
    total: usize,
    #[serde(default)]
    data: Vec<ApiTransaction>,
}

#[derive(Debug, Deserialize)]
struct ApiTransaction {
    id: String,
    #[serde(default)]
    block_id: String,
    #[serde(default)]
    date: i64,
    #[serde(default)]
    status: String,
    #[serde(default)]
    meta: ApiMeta,
    #[serde(default)]
    events: Vec<ApiEvent>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiMeta {
    #[serde(default)]
    to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiEvent {
    #[serde(default)]
    amount: i64,
}

// Wire shape of the eth_getTransactionByHash response
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<RpcTransaction>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcTransaction {
    input: String,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// HTTP client for both provider endpoints.
pub struct BlockdaemonClient {
    http: reqwest::Client,
    api_base: String,
    rpc_url: String,
}

impl BlockdaemonClient {
    pub fn new(api_base: &str, rpc_url: &str, api_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-API-Key",
            HeaderValue::from_str(api_key).context("API key is not a valid header value")?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            rpc_url: rpc_url.to_string(),
        })
    }
}

#[async_trait]
impl TransactionLister for BlockdaemonClient {
    async fn list_transactions(
        &self,
        wallet: &str,
        from: u64,
        to: u64,
    ) -> Result<Vec<TransactionRecord>> {
        let url = format!(
            "{}/account/{}/txs?from={}&to={}&order=asc&page_size={}",
            self.api_base, wallet, from, to, PAGE_SIZE
        );
        debug!(%url, "listing transactions");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("transaction list request failed")?;
        if !response.status().is_success() {
            bail!("transaction list request returned {}", response.status());
        }
        let page: TxPage = response
            .json()
            .await
            .context("failed to parse transaction list")?;

        if page.total > page.data.len() {
            warn!(
                total = page.total,
                fetched = page.data.len(),
                "result set exceeds one page; remainder not fetched"
            );
        }

        Ok(page
            .data
            .into_iter()
            .map(|tx| TransactionRecord {
                id: tx.id,
                block_id: tx.block_id,
                timestamp: tx.date,
                status: tx.status,
                to: tx.meta.to,
                events: tx
                    .events
                    .into_iter()
                    .map(|event| TransferEvent {
                        amount: event.amount,
                    })
                    .collect(),
            })
            .collect())
    }
}

#[async_trait]
impl CallDataFetcher for BlockdaemonClient {
    async fn call_data(&self, transaction_id: &str) -> Result<Vec<u8>> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_getTransactionByHash",
            "params": [transaction_id],
        });

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .context("transaction lookup request failed")?;
        if !response.status().is_success() {
            bail!("transaction lookup returned {}", response.status());
        }
        let rpc: RpcResponse = response
            .json()
            .await
            .context("failed to parse transaction lookup")?;

        if let Some(error) = rpc.error {
            bail!("node returned error {}: {}", error.code, error.message);
        }
        let tx = rpc
            .result
            .ok_or_else(|| anyhow!("transaction {transaction_id} not found"))?;
        decode_input_hex(&tx.input)
    }
}

fn decode_input_hex(input: &str) -> Result<Vec<u8>> {
    let payload = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(payload).context("transaction input is not valid hex")
}
