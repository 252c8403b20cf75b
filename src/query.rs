use std::{cmp::Ordering, collections::BTreeMap};

use serde::Serialize;

use crate::{
    analyzer::{Analyzer, StemCache},
    index::WeightIndex,
};

/// Score of every indexed document for one query, keyed by document id.
pub type Scores = BTreeMap<String, f64>;

/// One entry of a ranked result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDocument {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub doc_id: String,
    pub score: f64,
}

/// Sum each document's weights over `terms`.
///
/// Every indexed document receives a score, zero included. Documents with
/// no indexable terms are not in the index and get no score. A term
/// repeated in the query contributes once per occurrence.
pub fn score_terms(index: &WeightIndex, terms: &[String]) -> Scores {
    index
        .documents()
        .map(|(doc, weights)| {
            // Folding from +0.0 keeps unmatched documents at 0 rather than -0.
            let score = terms
                .iter()
                .filter_map(|term| weights.get(term))
                .fold(0.0, |acc, w| acc + w);
            (doc.to_string(), score)
        })
        .collect()
}

/// Order scores descending; equal scores fall back to document id order.
pub fn rank(scores: &Scores) -> Vec<RankedDocument> {
    let mut entries: Vec<(&String, f64)> =
        scores.iter().map(|(doc, &score)| (doc, score)).collect();
    entries.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(b.0),
        other => other,
    });

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (doc, score))| RankedDocument {
            rank: i + 1,
            doc_id: doc.clone(),
            score,
        })
        .collect()
}

/// Answers free-text queries against a loaded index.
///
/// Owns the stem cache for the lifetime of the query session.
#[derive(Debug)]
pub struct QueryEngine {
    index: WeightIndex,
    analyzer: Analyzer,
    cache: StemCache,
}

impl QueryEngine {
    pub fn new(index: WeightIndex, analyzer: Analyzer) -> Self {
        Self {
            index,
            analyzer,
            cache: StemCache::default(),
        }
    }

    pub fn index(&self) -> &WeightIndex {
        &self.index
    }

    /// Normalized query terms, in query order.
    pub fn query_terms(&mut self, text: &str) -> Vec<String> {
        self.analyzer.analyze(text, &mut self.cache)
    }

    pub fn score(&mut self, text: &str) -> Scores {
        let terms = self.query_terms(text);
        tracing::debug!(?terms, "scoring query");
        score_terms(&self.index, &terms)
    }

    /// Score and rank every document, keeping at most `limit` results.
    pub fn search(
        &mut self,
        text: &str,
        limit: Option<usize>,
    ) -> Vec<RankedDocument> {
        let mut ranked = rank(&self.score(text));
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        ranked
    }
}
