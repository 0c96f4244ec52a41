/*!
 * Sentinel Reentrancy
 *
 * Detecção de reentrância em um contrato monitorado a partir do call trace
 * de cada transação. Uma chamada ao contrato é considerada reentrada quando,
 * em qualquer ponto da subárvore de chamadas que ela dispara, o mesmo
 * contrato recebe uma chamada a uma função da blacklist.
 */

mod config;
mod detector;
mod emitter;
mod resolver;
mod scanner;
mod trace;

// Re-exportações públicas
pub use config::ReentrancyConfig;
pub use detector::{ReentrancyDetector, TraceDetector};
pub use emitter::{
    create_finding, publish_all, RateLimitedNotifier, TracingNotifier, FINDING_NAME,
};
pub use resolver::{
    FunctionName, Interface, SelectorResolver, LENDING_POOL_SIGNATURES, UNKNOWN_FUNCTION,
};
pub use scanner::{BlacklistSet, ReentrancyAlert, SubtreeScanner};
pub use trace::*;
