/*!
 * Resolução de seletores
 *
 * Traduz os 4 primeiros bytes do call data no nome da função, segundo uma
 * descrição de interface (ABI). Falhas de resolução nunca são erros.
 */

use ethers::abi::{Abi, Function};
use sentinel_core::{utils::selector_of, Error, Result};
use std::collections::HashMap;
use std::fmt;

/// Nome exibido quando o seletor do iniciador não é reconhecido
pub const UNKNOWN_FUNCTION: &str = "(unknown)";

/// Funções do LendingPool (Aave v2 e forks) usadas como interface padrão
pub const LENDING_POOL_SIGNATURES: &[&str] = &[
    "function deposit(address asset, uint256 amount, address onBehalfOf, uint16 referralCode)",
    "function withdraw(address asset, uint256 amount, address to) returns (uint256)",
    "function borrow(address asset, uint256 amount, uint256 interestRateMode, uint16 referralCode, address onBehalfOf)",
    "function repay(address asset, uint256 amount, uint256 rateMode, address onBehalfOf) returns (uint256)",
    "function swapBorrowRateMode(address asset, uint256 rateMode)",
    "function rebalanceStableBorrowRate(address asset, address user)",
    "function setUserUseReserveAsCollateral(address asset, bool useAsCollateral)",
    "function liquidationCall(address collateralAsset, address debtAsset, address user, uint256 debtToCover, bool receiveAToken)",
    "function flashLoan(address receiverAddress, address[] assets, uint256[] amounts, uint256[] modes, address onBehalfOf, bytes params, uint16 referralCode)",
    "function finalizeTransfer(address asset, address from, address to, uint256 amount, uint256 balanceFromBefore, uint256 balanceToBefore)",
    "function getUserAccountData(address user) view returns (uint256 totalCollateralETH, uint256 totalDebtETH, uint256 availableBorrowsETH, uint256 currentLiquidationThreshold, uint256 ltv, uint256 healthFactor)",
    "function getReserveNormalizedIncome(address asset) view returns (uint256)",
    "function getReserveNormalizedVariableDebt(address asset) view returns (uint256)",
    "function paused() view returns (bool)",
];

/// Nome simbólico de uma função resolvida
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FunctionName {
    Known(String),
    Unknown,
}

impl FunctionName {
    pub fn as_str(&self) -> &str {
        match self {
            FunctionName::Known(name) => name,
            FunctionName::Unknown => UNKNOWN_FUNCTION,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, FunctionName::Unknown)
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve call data em nomes de função.
///
/// As duas políticas de falha são distintas: o iniciador de uma reentrância
/// vira [`FunctionName::Unknown`] e continua gerando alerta, enquanto a chamada
/// reentrante sem nome nunca casa com a blacklist.
pub trait SelectorResolver {
    /// Nome da função para o seletor, se conhecido
    fn lookup(&self, selector: [u8; 4]) -> Option<&str>;

    fn resolve_initiator(&self, input: &[u8]) -> FunctionName {
        selector_of(input)
            .and_then(|selector| self.lookup(selector))
            .map(|name| FunctionName::Known(name.to_string()))
            .unwrap_or(FunctionName::Unknown)
    }

    fn resolve_reentrant(&self, input: &[u8]) -> Option<&str> {
        selector_of(input).and_then(|selector| self.lookup(selector))
    }
}

/// Descrição de interface indexada por seletor
#[derive(Debug, Clone, Default)]
pub struct Interface {
    functions: HashMap<[u8; 4], Function>,
}

impl Interface {
    pub fn new(abi: &Abi) -> Self {
        let functions = abi
            .functions()
            .map(|function| (function.short_signature(), function.clone()))
            .collect();
        Self { functions }
    }

    /// Carrega uma ABI no formato JSON padrão do compilador
    pub fn from_json_abi(json: &str) -> Result<Self> {
        let abi: Abi = serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("ABI inválida: {}", e)))?;
        Ok(Self::new(&abi))
    }

    /// Carrega assinaturas legíveis, ex.: `function withdraw(address,uint256,address)`
    pub fn from_signatures(signatures: &[&str]) -> Result<Self> {
        let abi = ethers::abi::parse_abi(signatures)
            .map_err(|e| Error::ConfigError(format!("Assinaturas inválidas: {}", e)))?;
        Ok(Self::new(&abi))
    }

    /// Interface padrão de um LendingPool
    pub fn lending_pool() -> Result<Self> {
        Self::from_signatures(LENDING_POOL_SIGNATURES)
    }

    pub fn function(&self, selector: [u8; 4]) -> Option<&Function> {
        self.functions.get(&selector)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl SelectorResolver for Interface {
    fn lookup(&self, selector: [u8; 4]) -> Option<&str> {
        self.function(selector).map(|function| function.name.as_str())
    }
}
