//! Collection statistics gathered in a single indexing pass.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;

use crate::{
    analyzer::{Analyzer, StemCache},
    bm25,
    error::{Error, Result},
    walker::SourceDocument,
};

/// Per-document term statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStats {
    pub id: String,
    /// Raw occurrence count of each term in the document.
    pub term_frequencies: BTreeMap<String, u32>,
    /// Number of terms that survived stopword removal.
    pub length: usize,
}

impl DocumentStats {
    fn from_terms(id: String, terms: Vec<String>) -> Self {
        let length = terms.len();
        let mut term_frequencies = BTreeMap::new();
        for term in terms {
            *term_frequencies.entry(term).or_insert(0) += 1;
        }
        Self {
            id,
            term_frequencies,
            length,
        }
    }
}

/// Immutable statistics over a whole document collection.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<DocumentStats>,
    avg_length: f64,
    idf: HashMap<String, f64>,
}

impl Corpus {
    /// Analyze every document and aggregate collection-level statistics.
    ///
    /// Documents are analyzed in parallel, each worker with its own stem
    /// cache. Document frequencies and the average length are reduced
    /// afterwards, then turned into IDF values. The average length is kept
    /// at full precision.
    pub fn build(
        documents: &[SourceDocument],
        analyzer: &Analyzer,
    ) -> Result<Self> {
        if documents.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        if let Some(doc) =
            documents.iter().find(|d| d.id.contains(char::is_whitespace))
        {
            return Err(Error::InvalidDocumentId(doc.id.clone()));
        }

        let stats: Vec<DocumentStats> = documents
            .par_iter()
            .map_init(StemCache::default, |cache, doc| {
                let terms = analyzer.analyze(&doc.text, cache);
                DocumentStats::from_terms(doc.id.clone(), terms)
            })
            .collect();

        let n = stats.len();
        let mut total_length = 0usize;
        let mut document_frequencies: HashMap<&str, usize> = HashMap::new();
        for doc in &stats {
            total_length += doc.length;
            for term in doc.term_frequencies.keys() {
                *document_frequencies.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let avg_length = total_length as f64 / n as f64;
        let idf = document_frequencies
            .into_iter()
            .map(|(term, df)| (term.to_string(), bm25::idf(n, df)))
            .collect::<HashMap<_, _>>();

        tracing::info!(
            documents = n,
            terms = idf.len(),
            avg_length,
            "collected corpus statistics"
        );

        Ok(Self {
            documents: stats,
            avg_length,
            idf,
        })
    }

    pub fn documents(&self) -> &[DocumentStats] {
        &self.documents
    }

    /// Number of documents `N`, including those with no indexable terms.
    pub fn doc_count(&self) -> usize {
        self.documents.len()
    }

    pub fn avg_length(&self) -> f64 {
        self.avg_length
    }

    /// IDF component of `term`, or 0 for a term absent from the corpus.
    pub fn idf(&self, term: &str) -> f64 {
        self.idf.get(term).copied().unwrap_or(0.0)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    /// Number of documents containing `term` at least once.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.documents
            .iter()
            .filter(|doc| doc.term_frequencies.contains_key(term))
            .count()
    }
}
