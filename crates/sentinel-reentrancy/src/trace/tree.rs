use ethereum_types::Address;
use sentinel_core::utils::selector_of;
use std::ops::{Index, Range};

/// Uma chamada do trace achatado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    /// Índices entre os filhos de cada ancestral; vazio na chamada raiz
    pub path: Vec<usize>,
    /// Destino da chamada; `None` quando ausente ou ilegível
    pub target: Option<Address>,
    /// Call data bruto
    pub input: Vec<u8>,
}

impl CallRecord {
    pub fn new(path: Vec<usize>, target: Option<Address>, input: Vec<u8>) -> Self {
        Self { path, target, input }
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Primeiros 4 bytes do call data, se houver
    pub fn selector(&self) -> Option<[u8; 4]> {
        selector_of(&self.input)
    }

    pub fn targets(&self, address: &Address) -> bool {
        self.target.as_ref() == Some(address)
    }
}

/// Sequência de chamadas de uma transação em pré-ordem.
///
/// A árvore fica implícita nas profundidades: os descendentes de uma chamada
/// são exatamente o trecho contíguo seguinte com profundidade estritamente
/// maior, encerrado pelo primeiro registro de profundidade menor ou igual.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSequence {
    records: Vec<CallRecord>,
}

impl CallSequence {
    pub fn new(records: Vec<CallRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CallRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CallRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CallRecord> {
        self.records.iter()
    }

    pub fn depth(&self, index: usize) -> usize {
        self.records[index].depth()
    }

    /// Posição (exclusiva) onde termina a subárvore de `index`
    pub fn subtree_end(&self, index: usize) -> usize {
        let depth = self.depth(index);
        self.records[index + 1..]
            .iter()
            .position(|record| record.depth() <= depth)
            .map(|offset| index + 1 + offset)
            .unwrap_or(self.records.len())
    }

    /// Intervalo dos descendentes de `index` (a própria chamada não incluída)
    pub fn subtree(&self, index: usize) -> Range<usize> {
        index + 1..self.subtree_end(index)
    }

    pub fn is_ancestor(&self, ancestor: usize, descendant: usize) -> bool {
        self.subtree(ancestor).contains(&descendant)
    }

    /// Registro anterior mais próximo com profundidade menor
    pub fn parent(&self, index: usize) -> Option<usize> {
        let depth = self.depth(index);
        self.records[..index]
            .iter()
            .rposition(|record| record.depth() < depth)
    }

    /// Filhos diretos de `index`, em ordem
    pub fn children(&self, index: usize) -> Vec<usize> {
        let mut children = Vec::new();
        let range = self.subtree(index);
        let mut cursor = range.start;
        while cursor < range.end {
            children.push(cursor);
            cursor = self.subtree_end(cursor);
        }
        children
    }

    pub fn are_siblings(&self, a: usize, b: usize) -> bool {
        a != b && self.parent(a) == self.parent(b)
    }
}

impl Index<usize> for CallSequence {
    type Output = CallRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl From<Vec<CallRecord>> for CallSequence {
    fn from(records: Vec<CallRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a CallSequence {
    type Item = &'a CallRecord;
    type IntoIter = std::slice::Iter<'a, CallRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
