/*!
 * Emissão de findings
 *
 * Converte alertas do scanner em findings e os entrega a um
 * [`FindingNotifier`]. Limites globais de volume ficam neste estágio.
 */

use crate::config::ReentrancyConfig;
use crate::scanner::ReentrancyAlert;
use async_trait::async_trait;
use sentinel_core::traits::FindingNotifier;
use sentinel_core::{Finding, FindingSeverity, FindingType, Result};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

pub const FINDING_NAME: &str = "Lending Pool Reentrancy";

/// Cria o finding correspondente a um alerta de reentrância
pub fn create_finding(alert: &ReentrancyAlert, config: &ReentrancyConfig) -> Finding {
    let mut metadata = BTreeMap::new();
    metadata.insert(
        "initiatorFunction".to_string(),
        alert.initiator_function.to_string(),
    );
    metadata.insert(
        "reenteredFunction".to_string(),
        alert.reentered_function.clone(),
    );

    Finding {
        name: FINDING_NAME.to_string(),
        description: format!(
            "A função {} foi reentrada durante a execução de {}",
            alert.reentered_function, alert.initiator_function
        ),
        alert_id: config.alert_id.clone(),
        protocol: config.protocol.clone(),
        severity: FindingSeverity::High,
        finding_type: FindingType::Suspicious,
        metadata,
    }
}

/// Notificador que apenas registra os findings no log
#[derive(Debug, Default)]
pub struct TracingNotifier;

#[async_trait]
impl FindingNotifier for TracingNotifier {
    async fn notify(&self, finding: &Finding) -> Result<()> {
        info!(
            alert_id = %finding.alert_id,
            severity = %finding.severity,
            "{}",
            finding.description
        );
        Ok(())
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// Repassa no máximo `limit` findings ao notificador interno durante toda a
/// sua vida; os excedentes são descartados.
pub struct RateLimitedNotifier<N> {
    inner: N,
    limit: usize,
    sent: AtomicUsize,
}

impl<N: FindingNotifier> RateLimitedNotifier<N> {
    pub fn new(inner: N, limit: usize) -> Self {
        Self {
            inner,
            limit,
            sent: AtomicUsize::new(0),
        }
    }

    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }

    fn try_acquire(&self) -> bool {
        self.sent
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |sent| {
                (sent < self.limit).then_some(sent + 1)
            })
            .is_ok()
    }
}

#[async_trait]
impl<N: FindingNotifier> FindingNotifier for RateLimitedNotifier<N> {
    async fn notify(&self, finding: &Finding) -> Result<()> {
        if !self.try_acquire() {
            warn!(
                alert_id = %finding.alert_id,
                limit = self.limit,
                "limite de findings atingido, finding descartado"
            );
            return Ok(());
        }
        self.inner.notify(finding).await
    }

    async fn is_available(&self) -> bool {
        self.sent() < self.limit && self.inner.is_available().await
    }
}

/// Publica os findings em ordem, parando no primeiro erro
pub async fn publish_all(notifier: &dyn FindingNotifier, findings: &[Finding]) -> Result<usize> {
    for finding in findings {
        notifier.notify(finding).await?;
    }
    Ok(findings.len())
}
