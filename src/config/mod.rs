use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Governance contract watched when none is configured.
pub const DEFAULT_CONTRACT: &str = "0xed8Bdb5895B8B7f9Fdb3C087628FD8410E853D48";

/// Account-transactions listing endpoint.
pub const DEFAULT_API_BASE: &str = "https://svc.blockdaemon.com/universal/v1/ethereum/mainnet";

/// Native JSON-RPC endpoint for raw transaction lookups.
pub const DEFAULT_RPC_URL: &str = "https://svc.blockdaemon.com/ethereum/mainnet/native";

/// Interface description of the governor's vote function. Used to build
/// the registry unless an ABI file is configured.
pub const GOVERNOR_ABI: &str = r#"[
    {
        "constant": false,
        "inputs": [
            {
                "name": "proposalId",
                "type": "uint256"
            },
            {
                "name": "support",
                "type": "uint8"
            },
            {
                "name": "reason",
                "type": "string"
            }
        ],
        "name": "castVoteWithReason",
        "outputs": [],
        "payable": false,
        "stateMutability": "nonpayable",
        "type": "function"
    }
]"#;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_base: Option<String>,

    #[serde(default)]
    pub rpc_url: Option<String>,

    #[serde(default)]
    pub contract: Option<String>,

    #[serde(default)]
    pub abi_path: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,
}

/// Load the config file when one exists. A missing file yields defaults;
/// a malformed one is a startup error.
pub fn load() -> Result<Config> {
    let Some(path) = config_path() else {
        return Ok(Config::default());
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Ok(Config::default()),
    };
    toml::from_str::<Config>(&content)
        .with_context(|| format!("malformed config file {}", path.display()))
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("VOTETRAIL_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("votetrail").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("votetrail").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "votetrail", "votetrail")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
