use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use votetrail::domain::abi::AbiRegistry;
use votetrail::infrastructure::provider::BlockdaemonClient;
use votetrail::{app, config, report};

#[derive(Debug, Parser)]
#[command(
    name = "votetrail",
    version,
    about = "Decode governance votes cast by a wallet"
)]
struct Args {
    /// Wallet address whose transaction history is scanned
    wallet: String,

    /// Start of the time range (seconds since epoch)
    #[arg(long)]
    from: u64,

    /// End of the time range (seconds since epoch)
    #[arg(long)]
    to: u64,

    /// Data provider API key (falls back to VOTETRAIL_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Governance contract address (defaults to the embedded governor)
    #[arg(long)]
    contract: Option<String>,

    /// Contract interface description file (defaults to the embedded ABI)
    #[arg(long)]
    abi: Option<PathBuf>,

    /// Transaction listing API base URL
    #[arg(long)]
    api: Option<String>,

    /// Native JSON-RPC endpoint for call-data lookups
    #[arg(long)]
    rpc: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = config::load()?;

    let api_key = args
        .api_key
        .or_else(|| std::env::var("VOTETRAIL_API_KEY").ok())
        .or(config.api_key)
        .context("no API key: pass --api-key or set VOTETRAIL_API_KEY")?;

    let abi_path = args.abi.or(config.abi_path.map(PathBuf::from));
    let abi_text = match &abi_path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read ABI file {}", path.display()))?,
        None => config::GOVERNOR_ABI.to_string(),
    };
    let registry =
        AbiRegistry::parse(&abi_text).context("failed to parse contract interface description")?;

    let contract = args
        .contract
        .or(config.contract)
        .unwrap_or_else(|| config::DEFAULT_CONTRACT.to_string());
    let api_base = args
        .api
        .or(config.api_base)
        .unwrap_or_else(|| config::DEFAULT_API_BASE.to_string());
    let rpc_url = args
        .rpc
        .or(config.rpc_url)
        .unwrap_or_else(|| config::DEFAULT_RPC_URL.to_string());

    let client = BlockdaemonClient::new(&api_base, &rpc_url, &api_key)?;

    let outcomes = app::collect_votes(
        &client,
        &client,
        &registry,
        &args.wallet,
        &contract,
        args.from,
        args.to,
    )
    .await?;

    for outcome in &outcomes {
        report::print_outcome(outcome);
    }
    report::print_summary(&report::summarize(&outcomes));

    Ok(())
}
