use serde::Deserialize;

/// Trace plano no formato Parity/OpenEthereum (`trace_transaction`), o mesmo
/// entregue pelos indexadores de monitoramento
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrace {
    #[serde(default)]
    pub action: TraceAction,
    /// Posição da chamada entre os filhos de cada ancestral; vazio na chamada raiz
    #[serde(default)]
    pub trace_address: Vec<usize>,
}

/// Ação de um trace plano
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraceAction {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
}

/// Frame aninhado do `callTracer` do Geth (`debug_traceTransaction`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallTrace {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub calls: Option<Vec<CallTrace>>,
}
