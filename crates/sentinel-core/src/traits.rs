/*!
 * Sentinel Traits
 *
 * Traits dos colaboradores externos usados em toda a workspace Sentinel
 */

use async_trait::async_trait;
use crate::error::Result;
use crate::types::{Finding, TransactionHash};

/// Fonte de call traces de transações
#[async_trait]
pub trait TraceProvider: Send + Sync {
    /// Obtém os traces planos (`trace_transaction`) serializados em JSON
    async fn get_transaction_traces(&self, tx_hash: TransactionHash) -> Result<Vec<u8>>;

    /// Obtém o frame aninhado do `callTracer` (`debug_traceTransaction`) serializado em JSON
    async fn get_transaction_trace(&self, tx_hash: TransactionHash) -> Result<Vec<u8>>;
}

/// Destino dos findings produzidos pelos detectores
#[async_trait]
pub trait FindingNotifier: Send + Sync {
    /// Publica um finding
    async fn notify(&self, finding: &Finding) -> Result<()>;

    /// Verifica se o notificador ainda aceita findings
    async fn is_available(&self) -> bool;
}
