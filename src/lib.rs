//! docrank - a small BM25 document retrieval engine with IR evaluation.
//!
//! docrank indexes a directory of plain-text documents into per-document
//! BM25 term weights, persists them as a flat text index, answers free-text
//! queries by summing weights, and scores rankings against relevance
//! judgments (precision, recall, P@10, R-precision, MAP, bpref, NDCG@10).
//!
//! # Quick start
//!
//! ```no_run
//! use docrank::{Analyzer, Bm25Params, DataDir, IndexStore, QueryEngine};
//! use docrank::{ingestion, PorterStemmer, Stopwords};
//!
//! let data_dir = DataDir::resolve(None).unwrap();
//! let stopwords = Stopwords::load(&data_dir.stopwords()).unwrap();
//! let analyzer = Analyzer::new(stopwords, PorterStemmer::new());
//! let store = IndexStore::new(data_dir.index_file());
//!
//! let index = ingestion::load_or_index(
//!     &store,
//!     &data_dir.documents_dir(),
//!     &analyzer,
//!     &Bm25Params::default(),
//! )
//! .unwrap();
//!
//! let mut engine = QueryEngine::new(index, analyzer);
//! for r in engine.search("boundary layer flow", Some(15)) {
//!     println!("{} {} {}", r.rank, r.doc_id, r.score);
//! }
//! ```

pub mod analyzer;
pub mod bm25;
pub mod corpus;
pub mod data_dir;
pub mod error;
pub mod evaluation;
pub mod index;
pub mod index_store;
pub mod ingestion;
pub mod metrics;
pub mod query;
pub mod stemmer;
pub mod stopwords;
pub mod topics;
pub mod walker;

pub use analyzer::{Analyzer, StemCache};
pub use bm25::Bm25Params;
pub use corpus::Corpus;
pub use data_dir::DataDir;
pub use error::{Error, Result};
pub use index::WeightIndex;
pub use index_store::IndexStore;
pub use query::{QueryEngine, RankedDocument};
pub use stemmer::{IdentityStemmer, PorterStemmer, Stemmer};
pub use stopwords::Stopwords;
