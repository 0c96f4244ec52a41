use std::env;
use std::fs;

use anyhow::Context;
use sentinel_reentrancy::{
    publish_all, RateLimitedNotifier, RawTrace, ReentrancyConfig, ReentrancyDetector,
    TracingNotifier,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Uso: {} <CONFIG_JSON> <TRACES_JSON>", args[0]);
        std::process::exit(1);
    }

    let config =
        ReentrancyConfig::from_json_file(&args[1]).context("falha ao carregar configuração")?;
    let limit = config.max_findings.unwrap_or(usize::MAX);
    let detector = ReentrancyDetector::with_lending_pool_interface(config)?;

    let raw = fs::read_to_string(&args[2]).with_context(|| format!("falha ao ler {}", args[2]))?;
    let traces: Vec<RawTrace> = serde_json::from_str(&raw).context("traces inválidos")?;
    info!("{} chamadas carregadas", traces.len());

    let findings = detector.handle_traces(&traces);
    if findings.is_empty() {
        println!("Nenhuma reentrância detectada.");
        return Ok(());
    }

    let notifier = RateLimitedNotifier::new(TracingNotifier, limit);
    publish_all(&notifier, &findings).await?;

    for finding in &findings {
        println!("{}", finding);
    }

    Ok(())
}
