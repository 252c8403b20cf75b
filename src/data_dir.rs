use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Resolve the data directory from, in order of priority:
    /// 1. An explicit path (from --data-dir)
    /// 2. The DOCRANK_DATA_DIR environment variable
    /// 3. The XDG data directory (~/.local/share/docrank/)
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let root = if let Some(path) = explicit {
            path.to_path_buf()
        } else if let Ok(val) = std::env::var("DOCRANK_DATA_DIR") {
            PathBuf::from(val)
        } else {
            xdg::BaseDirectories::with_prefix("docrank")
                .get_data_home()
                .ok_or_else(|| {
                    Error::Config(
                        "could not determine XDG data home directory".into(),
                    )
                })?
        };

        std::fs::create_dir_all(&root)
            .map_err(|_| Error::DataDir(root.clone()))?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one plain-text file per document.
    pub fn documents_dir(&self) -> PathBuf {
        self.root.join("documents")
    }

    pub fn stopwords(&self) -> PathBuf {
        self.root.join("stopwords.txt")
    }

    pub fn index_file(&self) -> PathBuf {
        self.root.join("index.txt")
    }

    pub fn queries(&self) -> PathBuf {
        self.root.join("queries.txt")
    }

    pub fn qrels(&self) -> PathBuf {
        self.root.join("qrels.txt")
    }

    /// TREC-style run file written by evaluation.
    pub fn run_output(&self) -> PathBuf {
        self.root.join("output.txt")
    }
}
