use crate::scanner::BlacklistSet;
use ethereum_types::Address;
use sentinel_core::{utils::hex_to_address, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuração do detector de reentrância
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReentrancyConfig {
    /// Endereço do contrato monitorado (checksum opcional)
    pub lending_pool_address: String,
    /// Funções que não podem ser reentradas
    #[serde(default = "default_blacklist")]
    pub reentrancy_blacklist: Vec<String>,
    #[serde(default = "default_alert_id")]
    pub alert_id: String,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Limite global de findings publicados; `None` desativa o limite
    #[serde(default)]
    pub max_findings: Option<usize>,
}

fn default_blacklist() -> Vec<String> {
    [
        "deposit",
        "withdraw",
        "borrow",
        "repay",
        "swapBorrowRateMode",
        "rebalanceStableBorrowRate",
        "setUserUseReserveAsCollateral",
        "liquidationCall",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_alert_id() -> String {
    "LENDING-POOL-REENTRANCY".to_string()
}

fn default_protocol() -> String {
    "umee".to_string()
}

impl ReentrancyConfig {
    pub fn new(lending_pool_address: impl Into<String>) -> Self {
        Self {
            lending_pool_address: lending_pool_address.into(),
            reentrancy_blacklist: default_blacklist(),
            alert_id: default_alert_id(),
            protocol: default_protocol(),
            max_findings: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("Configuração inválida: {}", e)))?;
        config.monitored_address()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Falha ao ler {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Endereço monitorado já normalizado
    pub fn monitored_address(&self) -> Result<Address> {
        hex_to_address(&self.lending_pool_address).ok_or_else(|| {
            Error::ConfigError(format!(
                "Endereço monitorado inválido: {}",
                self.lending_pool_address
            ))
        })
    }

    pub fn blacklist(&self) -> BlacklistSet {
        self.reentrancy_blacklist.iter().cloned().collect()
    }
}
