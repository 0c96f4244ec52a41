use crate::config::ReentrancyConfig;
use crate::emitter::create_finding;
use crate::resolver::Interface;
use crate::scanner::{BlacklistSet, ReentrancyAlert, SubtreeScanner};
use crate::trace::{flatten_call_trace, normalize_traces, CallSequence, CallTrace, RawTrace};
use async_trait::async_trait;
use ethereum_types::Address;
use sentinel_core::traits::TraceProvider;
use sentinel_core::{utils::format_address, Error, Finding, Result, TransactionHash};
use tracing::{debug, info, warn};

/// Detector de padrões em traces de uma transação
#[async_trait]
pub trait TraceDetector: Send + Sync {
    /// Nome do detector
    fn name(&self) -> &str;

    /// Detecta padrões nos traces planos de uma transação
    async fn detect(&self, traces: &[RawTrace]) -> Result<Vec<Finding>>;
}

/// Detector de reentrância em um contrato monitorado
pub struct ReentrancyDetector {
    config: ReentrancyConfig,
    monitored: Address,
    blacklist: BlacklistSet,
    interface: Interface,
}

impl ReentrancyDetector {
    pub fn new(config: ReentrancyConfig, interface: Interface) -> Result<Self> {
        let monitored = config.monitored_address()?;
        let blacklist = config.blacklist();

        debug!(
            monitored = %format_address(&monitored),
            blacklisted = blacklist.len(),
            functions = interface.len(),
            "detector de reentrância configurado"
        );

        Ok(Self {
            config,
            monitored,
            blacklist,
            interface,
        })
    }

    /// Usa a interface padrão de LendingPool
    pub fn with_lending_pool_interface(config: ReentrancyConfig) -> Result<Self> {
        Self::new(config, Interface::lending_pool()?)
    }

    pub fn config(&self) -> &ReentrancyConfig {
        &self.config
    }

    pub fn monitored_address(&self) -> Address {
        self.monitored
    }

    pub fn scan(&self, calls: &CallSequence) -> Vec<ReentrancyAlert> {
        SubtreeScanner::new(self.monitored, &self.blacklist, &self.interface).scan(calls)
    }

    /// Traces planos do indexador → findings
    pub fn handle_traces(&self, traces: &[RawTrace]) -> Vec<Finding> {
        self.findings_for(&normalize_traces(traces))
    }

    /// Frame do `callTracer` → findings
    pub fn handle_call_trace(&self, trace: &CallTrace) -> Vec<Finding> {
        self.findings_for(&flatten_call_trace(trace))
    }

    fn findings_for(&self, calls: &CallSequence) -> Vec<Finding> {
        self.scan(calls)
            .iter()
            .map(|alert| {
                info!(
                    initiator = %alert.initiator_function,
                    reentered = %alert.reentered_function,
                    "reentrância detectada"
                );
                create_finding(alert, &self.config)
            })
            .collect()
    }

    /// Obtém os traces da transação e aplica o detector
    pub async fn analyze_transaction(
        &self,
        provider: &dyn TraceProvider,
        tx_hash: TransactionHash,
    ) -> Result<Vec<Finding>> {
        let bytes = provider.get_transaction_traces(tx_hash).await?;

        let traces: Vec<RawTrace> = serde_json::from_slice(&bytes)
            .map_err(|e| Error::DecodeError(format!("Falha ao deserializar traces: {}", e)))?;

        debug!(tx = ?tx_hash, calls = traces.len(), "traces obtidos");
        Ok(self.handle_traces(&traces))
    }

    /// Obtém o frame do `callTracer` da transação e aplica o detector.
    /// Usado com nodes Geth, que não expõem o namespace `trace_`.
    pub async fn analyze_call_trace(
        &self,
        provider: &dyn TraceProvider,
        tx_hash: TransactionHash,
    ) -> Result<Vec<Finding>> {
        let bytes = provider.get_transaction_trace(tx_hash).await?;

        let trace: CallTrace = serde_json::from_slice(&bytes)
            .map_err(|e| Error::DecodeError(format!("Falha ao deserializar call trace: {}", e)))?;

        debug!(tx = ?tx_hash, "call trace obtido");
        Ok(self.handle_call_trace(&trace))
    }

    /// Analisa um lote de transações em paralelo; falhas individuais são
    /// registradas e a transação fica fora do resultado.
    pub async fn analyze_batch(
        &self,
        provider: &dyn TraceProvider,
        tx_hashes: &[TransactionHash],
    ) -> Vec<(TransactionHash, Vec<Finding>)> {
        let analyses = futures::future::join_all(
            tx_hashes
                .iter()
                .map(|&tx_hash| self.analyze_transaction(provider, tx_hash)),
        )
        .await;

        tx_hashes
            .iter()
            .zip(analyses)
            .filter_map(|(&tx_hash, analysis)| match analysis {
                Ok(findings) => Some((tx_hash, findings)),
                Err(e) => {
                    warn!(tx = ?tx_hash, error = %e, "erro ao analisar transação");
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl TraceDetector for ReentrancyDetector {
    fn name(&self) -> &str {
        "ReentrancyDetector"
    }

    async fn detect(&self, traces: &[RawTrace]) -> Result<Vec<Finding>> {
        Ok(self.handle_traces(traces))
    }
}
