use std::env;
use std::str::FromStr;

use anyhow::Context;
use sentinel_core::TransactionHash;
use sentinel_reentrancy::{ReentrancyConfig, ReentrancyDetector};
use sentinel_rpc::{RpcConfig, SentinelRpcClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Uso: {} <RPC_ENDPOINT> <LENDING_POOL> <TX_HASH>...", args[0]);
        std::process::exit(1);
    }

    let rpc_config = RpcConfig { endpoint: args[1].clone(), ..Default::default() };
    let client = SentinelRpcClient::new(rpc_config)
        .await
        .context("falha ao conectar no node")?;

    let config = ReentrancyConfig::new(args[2].as_str());
    let detector = ReentrancyDetector::with_lending_pool_interface(config)?;

    let tx_hashes = args[3..]
        .iter()
        .map(|hash| TransactionHash::from_str(hash.trim_start_matches("0x")))
        .collect::<Result<Vec<_>, _>>()
        .context("hash de transação inválido")?;

    println!("🔍 Analisando {} transações...", tx_hashes.len());
    for (tx_hash, findings) in detector.analyze_batch(&client, &tx_hashes).await {
        if findings.is_empty() {
            println!("{tx_hash:?}: nenhuma reentrância");
        }
        for finding in findings {
            println!("{tx_hash:?}: {finding}");
        }
    }

    Ok(())
}
