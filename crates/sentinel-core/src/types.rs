/*!
 * Sentinel Types
 *
 * Tipos comuns usados em toda a workspace Sentinel
 */

use ethereum_types::H256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use ethereum_types::Address;

/// Alias para hash de transação
pub type TransactionHash = H256;

/// Severidade de um finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FindingSeverity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for FindingSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingSeverity::Info => write!(f, "info"),
            FindingSeverity::Low => write!(f, "low"),
            FindingSeverity::Medium => write!(f, "medium"),
            FindingSeverity::High => write!(f, "high"),
            FindingSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Categoria de um finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingType {
    Info,
    Suspicious,
    Exploit,
    Degraded,
}

impl fmt::Display for FindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingType::Info => write!(f, "info"),
            FindingType::Suspicious => write!(f, "suspicious"),
            FindingType::Exploit => write!(f, "exploit"),
            FindingType::Degraded => write!(f, "degraded"),
        }
    }
}

/// Alerta publicado por um detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub name: String,
    pub description: String,
    pub alert_id: String,
    pub protocol: String,
    pub severity: FindingSeverity,
    pub finding_type: FindingType,
    pub metadata: BTreeMap<String, String>,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}/{}): {}",
            self.alert_id, self.name, self.severity, self.finding_type, self.description
        )
    }
}
