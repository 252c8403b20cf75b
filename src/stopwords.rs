use std::{collections::HashSet, path::Path};

use crate::error::{Error, Result};

/// A flat set of uninformative terms excluded from indexing and queries.
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// Load a whitespace-separated stopword file.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        let stopwords = Self::parse(&content);
        tracing::debug!(
            count = stopwords.len(),
            path = %path.display(),
            "loaded stopwords"
        );
        Ok(stopwords)
    }

    pub fn parse(content: &str) -> Self {
        content.split_whitespace().collect()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for Stopwords {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(str::to_string).collect(),
        }
    }
}
