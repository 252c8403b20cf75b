use std::collections::{BTreeMap, BTreeSet};

/// Term weights of a single document.
pub type TermWeights = BTreeMap<String, f64>;

/// Per-document BM25 term weights.
///
/// Only terms that occur in a document are materialized; every other
/// (document, term) pair is implicitly zero. Documents iterate in
/// identifier order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightIndex {
    documents: BTreeMap<String, TermWeights>,
}

impl WeightIndex {
    pub fn insert_document(&mut self, id: String, weights: TermWeights) {
        self.documents.insert(id, weights);
    }

    /// Weights of one document, creating an empty entry on first use.
    pub(crate) fn document_mut(&mut self, id: &str) -> &mut TermWeights {
        self.documents.entry(id.to_string()).or_default()
    }

    pub fn document(&self, id: &str) -> Option<&TermWeights> {
        self.documents.get(id)
    }

    /// Weight of `term` in `doc`, zero when absent.
    pub fn weight(&self, doc: &str, term: &str) -> f64 {
        self.documents
            .get(doc)
            .and_then(|weights| weights.get(term))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn documents(&self) -> impl Iterator<Item = (&str, &TermWeights)> {
        self.documents.iter().map(|(id, w)| (id.as_str(), w))
    }

    pub fn doc_count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Total number of (document, term) entries.
    pub fn entry_count(&self) -> usize {
        self.documents.values().map(BTreeMap::len).sum()
    }

    pub fn vocabulary(&self) -> BTreeSet<&str> {
        self.documents
            .values()
            .flat_map(|weights| weights.keys().map(String::as_str))
            .collect()
    }
}
