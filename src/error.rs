use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed index line {line}: {reason}")]
    MalformedIndex { line: usize, reason: String },

    #[error("malformed query line {line}: expected `<id> <text>`")]
    MalformedQuery { line: usize },

    #[error("malformed relevance judgment line {line}: {reason}")]
    MalformedJudgment { line: usize, reason: String },

    #[error("cannot index an empty document collection")]
    EmptyCorpus,

    #[error("document identifier contains whitespace: {0:?}")]
    InvalidDocumentId(String),

    #[error("line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("data directory does not exist and could not be created: {0}")]
    DataDir(PathBuf),
}

impl Error {
    pub(crate) fn read(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
