//! Text analysis: tokenization, stopword removal and memoized stemming.

use std::collections::HashMap;

use crate::{stemmer::Stemmer, stopwords::Stopwords};

/// Split raw text into lowercase tokens.
///
/// The text is lowercased first; tokens are then the maximal runs of
/// alphabetic characters. Whitespace, punctuation, hyphens and digits all
/// act as separators. Empty tokens are never produced.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + use<> {
    let lowered = text.to_lowercase();
    let tokens: Vec<String> = lowered
        .split(|c: char| !c.is_alphabetic())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    tokens.into_iter()
}

/// Memo of raw token -> stemmed form.
///
/// Lives for one indexing or query run; never persisted or shared.
#[derive(Debug, Default)]
pub struct StemCache {
    stems: HashMap<String, String>,
}

impl StemCache {
    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }
}

/// Stopword filter plus stemmer, shared read-only across workers.
pub struct Analyzer {
    stopwords: Stopwords,
    stemmer: Box<dyn Stemmer>,
}

impl Analyzer {
    pub fn new(stopwords: Stopwords, stemmer: impl Stemmer + 'static) -> Self {
        Self {
            stopwords,
            stemmer: Box::new(stemmer),
        }
    }

    /// Normalize one raw token into a term.
    ///
    /// Returns `None` for stopwords. Stems are computed once per distinct
    /// raw token and served from `cache` afterwards.
    pub fn normalize(
        &self,
        raw: &str,
        cache: &mut StemCache,
    ) -> Option<String> {
        if self.stopwords.contains(raw) {
            return None;
        }
        if let Some(stem) = cache.stems.get(raw) {
            return Some(stem.clone());
        }
        let stem = self.stemmer.stem(raw);
        cache.stems.insert(raw.to_string(), stem.clone());
        Some(stem)
    }

    /// Tokenize and normalize `text`, keeping term order and duplicates.
    pub fn analyze(&self, text: &str, cache: &mut StemCache) -> Vec<String> {
        tokenize(text)
            .filter_map(|raw| self.normalize(&raw, cache))
            .collect()
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("stopwords", &self.stopwords.len())
            .finish_non_exhaustive()
    }
}
