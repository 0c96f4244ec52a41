/*!
 * Sentinel RPC
 *
 * Cliente RPC para obtenção de call traces em nodes Ethereum
 */

use sentinel_core::{Error, Result, TransactionHash};
use serde_json::Value;
use web3::{
    Web3, Transport,
    transports::{Http, WebSocket},
};
use std::time::Duration;
use async_trait::async_trait;
use tracing::debug;

mod cache;

pub use cache::{CacheStats, TraceCache};

/// Configuração do cliente RPC
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub endpoint: String,
    /// Timeout repassado ao tracer do node
    pub tracer_timeout: Duration,
    pub use_cache: bool,
    pub cache_ttl: Duration,
    /// Número máximo de traces mantidos em cache
    pub cache_capacity: usize,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8545".to_string(),
            tracer_timeout: Duration::from_secs(60),
            use_cache: true,
            cache_ttl: Duration::from_secs(60),
            cache_capacity: 1024,
        }
    }
}

/// Métodos de trace suportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceMethod {
    /// `trace_transaction` (formato Parity/OpenEthereum, traces planos)
    Flat,
    /// `debug_traceTransaction` com `callTracer` (frame aninhado)
    CallTracer,
}

impl TraceMethod {
    pub fn rpc_name(&self) -> &'static str {
        match self {
            TraceMethod::Flat => "trace_transaction",
            TraceMethod::CallTracer => "debug_traceTransaction",
        }
    }

    fn cache_prefix(&self) -> &'static str {
        match self {
            TraceMethod::Flat => "traces",
            TraceMethod::CallTracer => "calltrace",
        }
    }
}

/// Monta os parâmetros JSON-RPC para o método de trace
pub fn trace_params(
    method: TraceMethod,
    tx_hash: TransactionHash,
    tracer_timeout: Duration,
) -> Vec<Value> {
    let hash = Value::String(format!("{:?}", tx_hash));
    match method {
        TraceMethod::Flat => vec![hash],
        TraceMethod::CallTracer => vec![
            hash,
            serde_json::json!({
                "tracer": "callTracer",
                "timeout": format!("{}s", tracer_timeout.as_secs()),
            }),
        ],
    }
}

/// Enum para diferentes tipos de transporte
pub enum TransportType {
    Http(Web3<Http>),
    WebSocket(Web3<WebSocket>),
}

/// Transporte JSON-RPC usado pelo cliente
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn execute(&self, method: &str, params: Vec<Value>) -> Result<Value>;
}

#[async_trait]
impl RpcTransport for TransportType {
    async fn execute(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let result = match self {
            TransportType::Http(web3) => web3.transport().execute(method, params).await,
            TransportType::WebSocket(web3) => web3.transport().execute(method, params).await,
        };
        result.map_err(|e| Error::RpcError(format!("Falha ao executar {}: {}", method, e)))
    }
}

/// Cliente RPC para Ethereum
pub struct SentinelRpcClient {
    transport: Box<dyn RpcTransport>,
    config: RpcConfig,
    cache: TraceCache,
}

impl SentinelRpcClient {
    /// Cria um novo cliente RPC HTTP
    pub async fn new_http(config: RpcConfig) -> Result<Self> {
        let transport = Http::new(&config.endpoint)
            .map_err(|e| Error::RpcError(format!("Falha ao conectar via HTTP: {}", e)))?;

        let web3 = Web3::new(transport);

        // Verifica a conexão
        web3.eth().block_number()
            .await
            .map_err(|e| Error::RpcError(format!("Falha ao conectar ao node Ethereum: {}", e)))?;

        Ok(Self::with_transport(TransportType::Http(web3), config))
    }

    /// Cria um novo cliente RPC WebSocket
    pub async fn new_websocket(config: RpcConfig) -> Result<Self> {
        let transport = WebSocket::new(&config.endpoint)
            .await
            .map_err(|e| Error::RpcError(format!("Falha ao conectar via WebSocket: {}", e)))?;

        let web3 = Web3::new(transport);

        // Verifica a conexão
        web3.eth().block_number()
            .await
            .map_err(|e| Error::RpcError(format!("Falha ao conectar ao node Ethereum: {}", e)))?;

        Ok(Self::with_transport(TransportType::WebSocket(web3), config))
    }

    /// Cria um novo cliente baseado na URL
    pub async fn new(config: RpcConfig) -> Result<Self> {
        if config.endpoint.starts_with("ws") {
            Self::new_websocket(config).await
        } else {
            Self::new_http(config).await
        }
    }

    /// Cria um cliente sobre um transporte já estabelecido
    pub fn with_transport(transport: impl RpcTransport + 'static, config: RpcConfig) -> Self {
        let cache = TraceCache::new(config.cache_capacity, config.cache_ttl);
        Self {
            transport: Box::new(transport),
            config,
            cache,
        }
    }

    /// Executa um método de trace, consultando o cache antes
    pub async fn fetch_trace(
        &self,
        method: TraceMethod,
        tx_hash: TransactionHash,
    ) -> Result<Vec<u8>> {
        let cache_key = format!("{}_{:x}", method.cache_prefix(), tx_hash);

        if self.config.use_cache {
            if let Some(data) = self.cache.get(&cache_key) {
                debug!(key = %cache_key, "trace servido do cache");
                return Ok(data);
            }
        }

        let params = trace_params(method, tx_hash, self.config.tracer_timeout);
        let result = self.transport.execute(method.rpc_name(), params).await?;

        if result.is_null() {
            return Err(Error::NotFound(format!(
                "Trace da transação {:?} não encontrado",
                tx_hash
            )));
        }

        let trace_bytes = serde_json::to_vec(&result)
            .map_err(|e| Error::EncodeError(format!("Falha ao serializar trace: {}", e)))?;

        if self.config.use_cache {
            self.cache.insert(cache_key, trace_bytes.clone());
        }

        Ok(trace_bytes)
    }

    /// Limpa o cache
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Obtém estatísticas do cache
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[async_trait]
impl sentinel_core::traits::TraceProvider for SentinelRpcClient {
    async fn get_transaction_traces(&self, tx_hash: TransactionHash) -> Result<Vec<u8>> {
        self.fetch_trace(TraceMethod::Flat, tx_hash).await
    }

    async fn get_transaction_trace(&self, tx_hash: TransactionHash) -> Result<Vec<u8>> {
        self.fetch_trace(TraceMethod::CallTracer, tx_hash).await
    }
}
