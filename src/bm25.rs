//! BM25 weighting.
//!
//! ```text
//! idf(t)    = log2(N - df(t) + 0.5) - log2(df(t) + 0.5)
//! norm(d)   = k1 * ((1 - b) + b * len(d) / avg_len)
//! w(t, d)   = f(t, d) * (1 + k1) / (norm(d) + f(t, d)) * idf(t)
//! ```
//!
//! The IDF goes negative once a term appears in more than half of the
//! collection; those weights are kept as-is.

use crate::{corpus::Corpus, index::WeightIndex};

/// BM25 constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term frequency saturation.
    pub k1: f64,
    /// Length normalization strength.
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Bm25Params { k1: 1.0, b: 0.75 }
    }
}

/// Log-odds inverse document frequency of a term.
///
/// * `n` - number of documents in the collection
/// * `df` - number of documents containing the term
pub fn idf(n: usize, df: usize) -> f64 {
    let n = n as f64;
    let df = df as f64;
    (n - df + 0.5).log2() - (df + 0.5).log2()
}

impl Bm25Params {
    /// Per-document divisor shared by all of its terms.
    ///
    /// A zero average length means every document is empty; the ratio is
    /// then taken as 1 so the result stays finite.
    pub fn length_norm(&self, doc_len: usize, avg_len: f64) -> f64 {
        let ratio = if avg_len > 0.0 {
            doc_len as f64 / avg_len
        } else {
            1.0
        };
        self.k1 * ((1.0 - self.b) + self.b * ratio)
    }

    /// Weight of a term occurring `tf` times in a document.
    pub fn weight(&self, tf: u32, length_norm: f64, idf: f64) -> f64 {
        let tf = f64::from(tf);
        (tf * (1.0 + self.k1) / (length_norm + tf)) * idf
    }

    /// Replace every raw term frequency in `corpus` with its BM25 weight.
    ///
    /// Documents without any surviving term have nothing to weigh and are
    /// left out of the result.
    pub fn weigh(&self, corpus: &Corpus) -> WeightIndex {
        let mut index = WeightIndex::default();

        for doc in corpus.documents() {
            if doc.term_frequencies.is_empty() {
                tracing::debug!(
                    doc = %doc.id,
                    "document has no indexable terms"
                );
                continue;
            }

            let norm = self.length_norm(doc.length, corpus.avg_length());
            let weights = doc
                .term_frequencies
                .iter()
                .map(|(term, &tf)| {
                    let weight = self.weight(tf, norm, corpus.idf(term));
                    (term.clone(), weight)
                })
                .collect();
            index.insert_document(doc.id.clone(), weights);
        }

        index
    }
}
