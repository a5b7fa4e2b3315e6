//! Console rendering for decoded votes

use chrono::{DateTime, Utc};

use crate::app::VoteOutcome;
use crate::domain::vote::VoteRecord;

const WEI_PER_ETHER: f64 = 1e18;

/// Totals across one pipeline run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub decoded: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub fn summarize(outcomes: &[VoteOutcome]) -> Summary {
    let mut summary = Summary::default();
    for outcome in outcomes {
        match outcome {
            VoteOutcome::Decoded(_) => summary.decoded += 1,
            VoteOutcome::Skipped { .. } => summary.skipped += 1,
            VoteOutcome::Failed { .. } => summary.failed += 1,
        }
    }
    summary
}

/// Print one pipeline outcome. Skips and failures are already logged as
/// warnings when they arise; only decoded votes reach stdout.
pub fn print_outcome(outcome: &VoteOutcome) {
    if let VoteOutcome::Decoded(record) = outcome {
        print_vote(record);
    }
}

pub fn print_summary(summary: &Summary) {
    println!(
        "{} votes decoded, {} transactions skipped, {} failed",
        summary.decoded, summary.skipped, summary.failed
    );
}

fn print_vote(record: &VoteRecord) {
    println!("txId: {}", record.transaction_id);
    match record.value_transferred {
        Some(amount) => println!("value: {} ETH", format_ether(amount)),
        None => println!("value: n/a"),
    }
    println!("date: {}", format_timestamp(record.timestamp));
    println!("proposalId: {}", record.proposal_id);
    println!("reason: {}", record.reason);
    println!("support: {}", record.support);
    println!();
}

/// Render a wei amount in ether. Display only; the f64 rounding is fine
/// at ledger resolution.
pub fn format_ether(wei: i64) -> String {
    format!("{}", wei as f64 / WEI_PER_ETHER)
}

pub fn format_timestamp(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(date) => date.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("epoch {timestamp}"),
    }
}
