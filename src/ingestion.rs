use std::path::Path;

use crate::{
    analyzer::Analyzer,
    bm25::Bm25Params,
    corpus::Corpus,
    error::Result,
    index::WeightIndex,
    index_store::IndexStore,
    walker::{self, SourceDocument},
};

/// Compute BM25 weights for an in-memory document collection.
pub fn index_documents(
    documents: &[SourceDocument],
    analyzer: &Analyzer,
    params: &Bm25Params,
) -> Result<WeightIndex> {
    let corpus = Corpus::build(documents, analyzer)?;
    Ok(params.weigh(&corpus))
}

/// Read every document under `documents_dir` and weigh it.
pub fn index_directory(
    documents_dir: &Path,
    analyzer: &Analyzer,
    params: &Bm25Params,
) -> Result<WeightIndex> {
    let files = walker::discover_documents(documents_dir)?;
    tracing::info!(
        count = files.len(),
        dir = %documents_dir.display(),
        "indexing documents"
    );
    let documents = walker::read_documents(&files)?;
    index_documents(&documents, analyzer, params)
}

/// Load the persisted index, rebuilding it from `documents_dir` when it is
/// missing or corrupt.
pub fn load_or_index(
    store: &IndexStore,
    documents_dir: &Path,
    analyzer: &Analyzer,
    params: &Bm25Params,
) -> Result<WeightIndex> {
    store.load_or_build(|| index_directory(documents_dir, analyzer, params))
}

/// Rebuild from `documents_dir` unconditionally and persist the result.
pub fn reindex(
    store: &IndexStore,
    documents_dir: &Path,
    analyzer: &Analyzer,
    params: &Bm25Params,
) -> Result<WeightIndex> {
    store.rebuild(|| index_directory(documents_dir, analyzer, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        stemmer::{IdentityStemmer, PorterStemmer},
        stopwords::Stopwords,
    };

    fn write_docs(dir: &Path, docs: &[(&str, &str)]) {
        std::fs::create_dir_all(dir).unwrap();
        for (name, text) in docs {
            std::fs::write(dir.join(name), text).unwrap();
        }
    }

    #[test]
    fn indexing_twice_is_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let docs = tmp.path().join("documents");
        write_docs(
            &docs,
            &[
                ("1", "Experimental investigation of the aerodynamics."),
                ("2", "Simple shear flow past a flat plate."),
                ("3", "The boundary layer in simple shear flow."),
            ],
        );
        let analyzer = Analyzer::new(
            Stopwords::parse("the of in a"),
            PorterStemmer::new(),
        );
        let params = Bm25Params::default();

        let first = index_directory(&docs, &analyzer, &params).unwrap();
        let second = index_directory(&docs, &analyzer, &params).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.doc_count(), 3);
    }

    #[test]
    fn fresh_and_loaded_indexes_agree() {
        let tmp = tempfile::tempdir().unwrap();
        let docs = tmp.path().join("documents");
        write_docs(&docs, &[("1", "cat sat"), ("2", "dog ran"), ("3", "cat")]);
        let analyzer = Analyzer::new(Stopwords::default(), IdentityStemmer);
        let params = Bm25Params::default();
        let store = IndexStore::new(tmp.path().join("index.txt"));

        let built = load_or_index(&store, &docs, &analyzer, &params).unwrap();
        let loaded = load_or_index(&store, &docs, &analyzer, &params).unwrap();

        assert_eq!(built, loaded);
    }

    #[test]
    fn reindex_overwrites_existing_index() {
        let tmp = tempfile::tempdir().unwrap();
        let docs = tmp.path().join("documents");
        write_docs(&docs, &[("1", "cat"), ("2", "dog")]);
        let analyzer = Analyzer::new(Stopwords::default(), IdentityStemmer);
        let params = Bm25Params::default();
        let store = IndexStore::new(tmp.path().join("index.txt"));
        load_or_index(&store, &docs, &analyzer, &params).unwrap();

        write_docs(&docs, &[("3", "bird")]);
        let rebuilt = reindex(&store, &docs, &analyzer, &params).unwrap();

        assert_eq!(rebuilt.doc_count(), 3);
        assert_eq!(store.load().unwrap(), rebuilt);
    }

    #[test]
    fn empty_documents_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let docs = tmp.path().join("documents");
        std::fs::create_dir_all(&docs).unwrap();
        let analyzer = Analyzer::new(Stopwords::default(), IdentityStemmer);

        let err = index_directory(&docs, &analyzer, &Bm25Params::default())
            .unwrap_err();
        assert!(matches!(err, Error::EmptyCorpus));
    }

    #[test]
    fn documents_without_terms_count_but_are_not_scored() {
        let documents = vec![
            SourceDocument::new("1", "cat"),
            SourceDocument::new("2", "the"),
            SourceDocument::new("3", "dog"),
        ];
        let analyzer = Analyzer::new(Stopwords::parse("the"), IdentityStemmer);

        let index =
            index_documents(&documents, &analyzer, &Bm25Params::default())
                .unwrap();
        let scores = crate::query::score_terms(&index, &["cat".to_string()]);

        assert_eq!(index.doc_count(), 2);
        assert!(index.document("2").is_none());
        assert_eq!(scores.keys().collect::<Vec<_>>(), vec!["1", "3"]);
        // N = 3 includes the empty document: log2(2.5) - log2(1.5).
        let expected_idf = 2.5f64.log2() - 1.5f64.log2();
        assert!(index.weight("1", "cat") > 0.0);
        assert!(index.weight("1", "cat") < 2.0 * expected_idf);
    }

    #[test]
    fn common_terms_get_negative_weights() {
        let documents = vec![
            SourceDocument::new("1", "common rare"),
            SourceDocument::new("2", "common"),
            SourceDocument::new("3", "common"),
        ];
        let analyzer = Analyzer::new(Stopwords::default(), IdentityStemmer);

        let index =
            index_documents(&documents, &analyzer, &Bm25Params::default())
                .unwrap();

        assert!(index.weight("1", "common") < 0.0);
        assert!(index.weight("1", "rare") > 0.0);
    }
}
