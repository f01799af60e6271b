//! CLI entry point for the deployment pipeline.
//!
//! Wires configuration, endpoint, wallet, and pipeline together, runs one
//! deployment, prints the record, and maps the outcome to the process exit
//! code: 0 on a confirmed deployment, 1 on any unrecovered failure.

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::{utils::format_ether, U256};
use clap::Parser;

use contract_deployer::config::loader::load_config;
use contract_deployer::config::validation::validate_config;
use contract_deployer::config::DeployerConfig;
use contract_deployer::lifecycle::CancelBroadcast;
use contract_deployer::observability::init_logging;
use contract_deployer::pipeline::{
    ContractArtifact, DeploymentPipeline, DeploymentRecord, DeploymentRequest, GasPolicy,
    NonceAllocator,
};
use contract_deployer::{Endpoint, RetryPolicy, RpcClient, Wallet};

#[derive(Parser)]
#[command(name = "contract-deployer")]
#[command(about = "Deploy a compiled contract artifact to an EVM chain", long_about = None)]
struct Args {
    /// Path to the compiled artifact JSON (Hardhat/Foundry format).
    #[arg(long)]
    artifact: PathBuf,

    /// Constructor argument, repeatable; coerced against the ABI.
    #[arg(long = "ctor-arg", value_name = "VALUE")]
    ctor_args: Vec<String>,

    /// Path to the deployer TOML config.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RPC endpoint URL override.
    #[arg(long)]
    rpc_url: Option<String>,

    /// Chain ID override.
    #[arg(long)]
    chain_id: Option<u64>,

    /// Hex private key of the deploying account.
    #[arg(long, env = "DEPLOYER_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,

    /// Gas limit override.
    #[arg(long)]
    gas_limit: Option<u64>,

    /// Max fee per gas override, in gwei.
    #[arg(long)]
    max_fee_gwei: Option<u64>,

    /// Max priority fee per gas override, in gwei.
    #[arg(long)]
    max_priority_fee_gwei: Option<u64>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging();

    std::process::exit(run(args).await);
}

async fn run(args: Args) -> i32 {
    // Configuration: file (or defaults), then CLI overrides, then re-validate.
    let mut config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to load configuration");
                return 1;
            }
        },
        None => DeployerConfig::default(),
    };
    if let Some(url) = args.rpc_url {
        config.rpc.url = url;
    }
    if let Some(chain_id) = args.chain_id {
        config.rpc.chain_id = chain_id;
    }
    if let Err(errors) = validate_config(&config) {
        for e in &errors {
            tracing::error!(field = %e.field, message = %e.message, "invalid configuration");
        }
        return 1;
    }

    tracing::info!(
        rpc_url = %config.rpc.url,
        chain_id = config.rpc.chain_id,
        max_attempts = config.retry.max_attempts,
        "Configuration loaded"
    );

    let artifact = match ContractArtifact::from_file(&args.artifact) {
        Ok(artifact) => artifact,
        Err(e) => {
            tracing::error!(path = %args.artifact.display(), error = %e, "failed to load artifact");
            return 1;
        }
    };
    let constructor_args = match artifact.coerce_args(&args.ctor_args) {
        Ok(values) => values,
        Err(e) => {
            tracing::error!(error = %e, "invalid constructor arguments");
            return 1;
        }
    };

    let client = match RpcClient::connect(&config.rpc).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to RPC endpoint");
            return 1;
        }
    };
    let wallet = match Wallet::from_private_key(&args.private_key, config.rpc.chain_id) {
        Ok(wallet) => wallet,
        Err(e) => {
            tracing::error!(error = %e, "failed to load signing key");
            return 1;
        }
    };

    let starting_balance = match client.account_state(wallet.address()).await {
        Ok(account) => {
            tracing::info!(
                deployer = %wallet.address(),
                balance = %format_ether(account.balance),
                "Deployer account"
            );
            account.balance
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not read deployer balance");
            U256::ZERO
        }
    };

    let gas = GasPolicy {
        max_fee_per_gas: args
            .max_fee_gwei
            .map(|g| g as u128 * 1_000_000_000)
            .or_else(|| config.gas.max_fee_per_gas_wei()),
        max_priority_fee_per_gas: args
            .max_priority_fee_gwei
            .map(|g| g as u128 * 1_000_000_000)
            .or_else(|| config.gas.max_priority_fee_per_gas_wei()),
        gas_limit: args.gas_limit.or(config.gas.gas_limit),
        fallback_gas_limit: config.gas.fallback_gas_limit,
    };

    // Ctrl-C aborts the run; the pipeline still resolves to an outcome.
    let cancel = CancelBroadcast::new();
    let mut handle = cancel.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling deployment");
            cancel.cancel();
        }
    });

    let contract_name = artifact.name.clone();
    let deployer = wallet.address();
    let pipeline = DeploymentPipeline::new(
        Arc::new(client),
        wallet,
        Arc::new(NonceAllocator::new()),
        RetryPolicy::from_config(&config.retry, &config.gas),
        config.confirmation.clone(),
    );

    let request = DeploymentRequest {
        artifact,
        constructor_args,
        gas,
    };
    let outcome = pipeline.deploy(request, &mut handle).await;

    let record = DeploymentRecord::new(contract_name, deployer, starting_balance, outcome);
    record.log();
    match record.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!(error = %e, "failed to serialize deployment record"),
    }

    if record.outcome.is_confirmed() {
        0
    } else {
        1
    }
}
