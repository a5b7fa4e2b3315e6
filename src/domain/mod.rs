//! Domain layer - the decoding core
//!
//! Pure, synchronous logic: ABI schema parsing and call-data decoding,
//! destination filtering, and vote extraction. All I/O lives in the
//! infrastructure layer.

pub mod abi;
pub mod filter;
pub mod transaction;
pub mod vote;
