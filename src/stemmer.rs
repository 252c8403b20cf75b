//! Stemming capability.
//!
//! The engine only needs a deterministic, pure `token -> root` function;
//! any algorithm can be plugged in through [`Stemmer`].

/// Reduces a token to its root form ("running" -> "run").
pub trait Stemmer: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// English Snowball (Porter2) stemmer.
pub struct PorterStemmer {
    inner: rust_stemmers::Stemmer,
}

impl PorterStemmer {
    pub fn new() -> Self {
        Self {
            inner: rust_stemmers::Stemmer::create(
                rust_stemmers::Algorithm::English,
            ),
        }
    }
}

impl Default for PorterStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PorterStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PorterStemmer").finish_non_exhaustive()
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, token: &str) -> String {
        self.inner.stem(token).into_owned()
    }
}

/// Leaves tokens untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, token: &str) -> String {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn porter_merges_morphological_variants() {
        let stemmer = PorterStemmer::new();
        assert_eq!(stemmer.stem("running"), "run");
        assert_eq!(stemmer.stem("runs"), "run");
        assert_eq!(stemmer.stem("cats"), "cat");
    }

    #[test]
    fn porter_is_deterministic() {
        let stemmer = PorterStemmer::new();
        assert_eq!(stemmer.stem("retrieval"), stemmer.stem("retrieval"));
    }

    #[test]
    fn identity_returns_input() {
        assert_eq!(IdentityStemmer.stem("cats"), "cats");
    }
}
