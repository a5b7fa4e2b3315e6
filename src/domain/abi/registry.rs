//! ABI registry - parses the contract interface description and indexes
//! function schemas by selector

use std::collections::{HashMap, HashSet};

use alloy_primitives::keccak256;
use serde::Deserialize;

/// Errors raised while parsing an interface description.
///
/// These are startup errors: a registry is built once from a fixed
/// description, so any of these aborts construction.
#[derive(Debug, thiserror::Error)]
pub enum SchemaParseError {
    #[error("interface description is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("function entry #{index} has no name")]
    MissingName { index: usize },
    #[error("unknown type token `{token}` in function `{function}`")]
    UnknownType { function: String, token: String },
    #[error("duplicate function signature `{signature}`")]
    DuplicateSignature { signature: String },
}

/// Parameter type, restricted to the tokens the decoder understands.
///
/// Widths are in bits, a multiple of 8 in 8..=256. `T[]` composes any of
/// the other types into a dynamic array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Uint(usize),
    Int(usize),
    Address,
    Bool,
    String,
    Bytes,
    Array(Box<ParamType>),
}

impl ParamType {
    /// Parse a Solidity type token (e.g. "uint256", "string", "uint8[]").
    ///
    /// Returns `None` for anything outside the supported grammar; the
    /// registry maps that to `SchemaParseError::UnknownType`.
    pub fn parse(token: &str) -> Option<ParamType> {
        let token = token.trim();
        if let Some(element) = token.strip_suffix("[]") {
            return ParamType::parse(element).map(|e| ParamType::Array(Box::new(e)));
        }
        match token {
            "address" => Some(ParamType::Address),
            "bool" => Some(ParamType::Bool),
            "string" => Some(ParamType::String),
            "bytes" => Some(ParamType::Bytes),
            // Bare aliases canonicalize to the full width
            "uint" => Some(ParamType::Uint(256)),
            "int" => Some(ParamType::Int(256)),
            _ => {
                if let Some(width) = token.strip_prefix("uint") {
                    parse_width(width).map(ParamType::Uint)
                } else if let Some(width) = token.strip_prefix("int") {
                    parse_width(width).map(ParamType::Int)
                } else {
                    None
                }
            }
        }
    }

    /// Canonical token as it appears in the function signature.
    pub fn canonical(&self) -> String {
        match self {
            ParamType::Uint(bits) => format!("uint{bits}"),
            ParamType::Int(bits) => format!("int{bits}"),
            ParamType::Address => "address".to_string(),
            ParamType::Bool => "bool".to_string(),
            ParamType::String => "string".to_string(),
            ParamType::Bytes => "bytes".to_string(),
            ParamType::Array(element) => format!("{}[]", element.canonical()),
        }
    }
}

fn parse_width(token: &str) -> Option<usize> {
    let width: usize = token.parse().ok()?;
    (width % 8 == 0 && (8..=256).contains(&width)).then_some(width)
}

/// A function parameter specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name (`arg{n}` when the description leaves it empty)
    pub name: String,
    /// Declared type
    pub ty: ParamType,
}

/// One callable contract function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSchema {
    /// 4-byte function selector
    pub selector: [u8; 4],
    /// Function name
    pub name: String,
    /// Canonical signature string (e.g. "transfer(address,uint256)")
    pub signature: String,
    /// Input parameters, in declared order
    pub inputs: Vec<ParamSpec>,
}

impl FunctionSchema {
    /// Get selector as hex string
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }

    /// Look up a parameter by name
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.inputs.iter().find(|p| p.name == name)
    }
}

/// Compute the 4-byte function selector from a canonical signature
pub fn compute_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

// Wire shape of the interface description. Unknown fields (outputs,
// stateMutability, indexed, ...) are ignored.
#[derive(Debug, Deserialize)]
struct AbiEntry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<AbiInput>,
}

#[derive(Debug, Deserialize)]
struct AbiInput {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

/// Registry of function schemas indexed by selector.
///
/// Built once at startup and immutable thereafter; components receive a
/// shared reference rather than consulting any global state.
#[derive(Debug, Default, Clone)]
pub struct AbiRegistry {
    functions: HashMap<[u8; 4], FunctionSchema>,
}

impl AbiRegistry {
    /// Parse a JSON interface description into a registry.
    ///
    /// Entries other than functions (events, constructors, fallback) are
    /// skipped. When two distinct signatures hash to the same selector the
    /// first one wins; re-declaring the exact same signature is an error.
    pub fn parse(description: &str) -> Result<Self, SchemaParseError> {
        let entries: Vec<AbiEntry> = serde_json::from_str(description)?;

        let mut functions = HashMap::new();
        let mut signatures = HashSet::new();

        for (index, entry) in entries.into_iter().enumerate() {
            if entry.kind != "function" {
                continue;
            }

            let name = entry
                .name
                .filter(|n| !n.trim().is_empty())
                .ok_or(SchemaParseError::MissingName { index })?;

            let mut inputs = Vec::with_capacity(entry.inputs.len());
            for (position, input) in entry.inputs.into_iter().enumerate() {
                let ty = ParamType::parse(&input.ty).ok_or_else(|| {
                    SchemaParseError::UnknownType {
                        function: name.clone(),
                        token: input.ty.clone(),
                    }
                })?;
                let param_name = if input.name.trim().is_empty() {
                    format!("arg{position}")
                } else {
                    input.name
                };
                inputs.push(ParamSpec {
                    name: param_name,
                    ty,
                });
            }

            let signature = format!(
                "{}({})",
                name,
                inputs
                    .iter()
                    .map(|p| p.ty.canonical())
                    .collect::<Vec<_>>()
                    .join(",")
            );
            if !signatures.insert(signature.clone()) {
                return Err(SchemaParseError::DuplicateSignature { signature });
            }

            let selector = compute_selector(&signature);
            functions.entry(selector).or_insert(FunctionSchema {
                selector,
                name,
                signature,
                inputs,
            });
        }

        Ok(Self { functions })
    }

    /// Look up a function by selector
    pub fn lookup(&self, selector: [u8; 4]) -> Option<&FunctionSchema> {
        self.functions.get(&selector)
    }

    /// Get the number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Get all functions
    pub fn functions(&self) -> impl Iterator<Item = &FunctionSchema> {
        self.functions.values()
    }
}
