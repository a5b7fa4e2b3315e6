//! Transaction records as reported by the data provider

/// One value-transfer event attached to a transaction, denominated in the
/// chain's smallest unit (wei).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferEvent {
    pub amount: i64,
}

/// One on-chain transaction as listed by the provider. Raw call data is
/// not part of the listing; it is fetched separately by transaction id.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    /// Transaction hash
    pub id: String,
    /// Hash of the containing block
    pub block_id: String,
    /// Seconds since epoch
    pub timestamp: i64,
    /// Provider-reported status (e.g. "completed")
    pub status: String,
    /// Destination address; `None` for contract creations
    pub to: Option<String>,
    /// Value-transfer events, in provider order
    pub events: Vec<TransferEvent>,
}

impl TransactionRecord {
    /// Amount of the first transfer event, when one exists.
    ///
    /// The provider does not say which event, if any, is the native
    /// transfer; callers treat this as reported data rather than a
    /// verified amount.
    pub fn first_event_amount(&self) -> Option<i64> {
        self.events.first().map(|event| event.amount)
    }
}
