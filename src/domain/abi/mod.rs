//! ABI schema parsing, selector matching, and call-data decoding
//!
//! The registry is built once from the contract interface description and
//! passed by reference to the matcher and decoder; nothing in here keeps
//! global state.

mod calldata;
mod decoder;
pub(crate) mod registry;

pub use calldata::{match_function, split_selector, MatchError, SELECTOR_SIZE};
pub use decoder::{decode_arguments, DecodeError, DecodedArguments, Value, WORD_SIZE};
pub use registry::{
    compute_selector, AbiRegistry, FunctionSchema, ParamSpec, ParamType, SchemaParseError,
};
