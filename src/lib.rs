//! votetrail: decode a wallet's on-chain governance votes
//!
//! Lists a wallet's transactions from a data provider, keeps those
//! addressed to one governance contract, and decodes each call's
//! ABI-encoded arguments into a readable vote ledger.

pub mod app;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod report;
