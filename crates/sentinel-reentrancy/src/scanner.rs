/*!
 * Scanner de reentrância por subárvore
 *
 * Percorre a sequência de chamadas em pré-ordem. Cada chamada ao endereço
 * monitorado é um iniciador candidato; sua subárvore é varrida em busca de uma
 * nova chamada ao mesmo endereço cuja função esteja na blacklist.
 */

use crate::resolver::{FunctionName, SelectorResolver};
use crate::trace::CallSequence;
use ethereum_types::Address;
use std::collections::HashSet;

/// Par (iniciador, função reentrada) detectado em uma subárvore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReentrancyAlert {
    pub initiator_function: FunctionName,
    pub reentered_function: String,
}

/// Funções que não podem ser reentradas (comparação exata)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlacklistSet {
    names: HashSet<String>,
}

impl BlacklistSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for BlacklistSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Scanner de uma única transação. Não guarda estado entre chamadas a
/// [`SubtreeScanner::scan`], então pode ser compartilhado entre threads.
pub struct SubtreeScanner<'a, R: ?Sized> {
    monitored: Address,
    blacklist: &'a BlacklistSet,
    resolver: &'a R,
}

impl<'a, R: SelectorResolver + ?Sized> SubtreeScanner<'a, R> {
    pub fn new(monitored: Address, blacklist: &'a BlacklistSet, resolver: &'a R) -> Self {
        Self {
            monitored,
            blacklist,
            resolver,
        }
    }

    /// Alertas na ordem em que seus iniciadores aparecem no trace; no máximo
    /// um por iniciador.
    pub fn scan(&self, calls: &CallSequence) -> Vec<ReentrancyAlert> {
        let mut alerts = Vec::new();
        let mut cursor = 0;

        while let Some(initiator) = self.next_initiator(calls, cursor) {
            if let Some(alert) = self.scan_subtree(calls, initiator) {
                alerts.push(alert);
            }
            // Chamadas monitoradas dentro da subárvore continuam elegíveis
            // como iniciadores, o que cobre reentrâncias aninhadas.
            cursor = initiator + 1;
        }

        alerts
    }

    fn next_initiator(&self, calls: &CallSequence, from: usize) -> Option<usize> {
        (from..calls.len()).find(|&i| calls[i].targets(&self.monitored))
    }

    fn scan_subtree(&self, calls: &CallSequence, initiator: usize) -> Option<ReentrancyAlert> {
        let depth = calls.depth(initiator);
        let initiator_function = self.resolver.resolve_initiator(&calls[initiator].input);
        let mut alert = None;

        let mut position = initiator + 1;
        while position < calls.len() && calls.depth(position) > depth {
            let record = &calls[position];
            if alert.is_none() && record.targets(&self.monitored) {
                let reentered = self
                    .resolver
                    .resolve_reentrant(&record.input)
                    .filter(|name| self.blacklist.contains(name));

                if let Some(name) = reentered {
                    alert = Some(ReentrancyAlert {
                        initiator_function: initiator_function.clone(),
                        reentered_function: name.to_string(),
                    });
                }
            }
            position += 1;
        }

        alert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::CallRecord;
    use std::collections::HashMap;

    struct StaticResolver(HashMap<[u8; 4], &'static str>);

    impl SelectorResolver for StaticResolver {
        fn lookup(&self, selector: [u8; 4]) -> Option<&str> {
            self.0.get(&selector).copied()
        }
    }

    const DEPOSIT: [u8; 4] = [0xaa; 4];
    const WITHDRAW: [u8; 4] = [0xbb; 4];
    const BORROW: [u8; 4] = [0xcc; 4];
    const GET_DATA: [u8; 4] = [0xdd; 4];

    fn resolver() -> StaticResolver {
        StaticResolver(HashMap::from([
            (DEPOSIT, "deposit"),
            (WITHDRAW, "withdraw"),
            (BORROW, "borrow"),
            (GET_DATA, "getUserAccountData"),
        ]))
    }

    fn pool() -> Address {
        Address::from_low_u64_be(0xaa)
    }

    fn attacker() -> Address {
        Address::from_low_u64_be(0x666)
    }

    fn call(path: &[usize], target: Address, selector: &[u8]) -> CallRecord {
        CallRecord::new(path.to_vec(), Some(target), selector.to_vec())
    }

    fn scan(records: Vec<CallRecord>) -> Vec<ReentrancyAlert> {
        let blacklist = BlacklistSet::new(["withdraw", "borrow"]);
        let resolver = resolver();
        SubtreeScanner::new(pool(), &blacklist, &resolver).scan(&records.into())
    }

    fn alert(initiator: &str, reentered: &str) -> ReentrancyAlert {
        ReentrancyAlert {
            initiator_function: FunctionName::Known(initiator.into()),
            reentered_function: reentered.into(),
        }
    }

    #[test]
    fn reentrancy_through_intermediate_contract() {
        let alerts = scan(vec![
            call(&[], pool(), &DEPOSIT),
            call(&[0], attacker(), &[]),
            call(&[0, 0], pool(), &WITHDRAW),
        ]);
        assert_eq!(alerts, vec![alert("deposit", "withdraw")]);
    }

    #[test]
    fn reentrant_call_to_other_contract_is_ignored() {
        let alerts = scan(vec![
            call(&[], pool(), &DEPOSIT),
            call(&[0], attacker(), &[]),
            call(&[0, 0], attacker(), &WITHDRAW),
        ]);
        assert!(alerts.is_empty());
    }

    #[test]
    fn non_blacklisted_reentry_is_ignored() {
        let alerts = scan(vec![
            call(&[], pool(), &DEPOSIT),
            call(&[0], attacker(), &[]),
            call(&[0, 0], pool(), &GET_DATA),
            call(&[0, 1], pool(), &DEPOSIT),
        ]);
        assert!(alerts.is_empty());
    }

    #[test]
    fn subtree_boundary_is_respected() {
        // o withdraw em [1] é irmão do deposit, não descendente
        let alerts = scan(vec![
            call(&[], attacker(), &[]),
            call(&[0], pool(), &DEPOSIT),
            call(&[0, 0], attacker(), &[]),
            call(&[1], pool(), &WITHDRAW),
        ]);
        assert!(alerts.is_empty());
    }

    #[test]
    fn malformed_reentrant_input_never_matches() {
        let alerts = scan(vec![
            call(&[], pool(), &DEPOSIT),
            call(&[0], attacker(), &[]),
            call(&[0, 0], pool(), &[0xbb, 0xbb]),
            call(&[0, 1], pool(), &[0x01, 0x02, 0x03, 0x04]),
        ]);
        assert!(alerts.is_empty());
    }

    #[test]
    fn untargeted_records_are_skipped() {
        let records = vec![
            call(&[], pool(), &DEPOSIT),
            CallRecord::new(vec![0], None, WITHDRAW.to_vec()),
        ];
        assert!(scan(records).is_empty());
    }
}
