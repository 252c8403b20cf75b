use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Error, Result};

/// A discovered document file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Document identifier: the file name.
    pub id: String,
    /// Fully resolved path.
    pub path: PathBuf,
}

/// Raw text of one document, keyed by its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub id: String,
    pub text: String,
}

impl SourceDocument {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// List the documents of a collection directory.
///
/// The collection is flat: every regular file directly inside `root` is
/// one document. Hidden files (names starting with `.`) and
/// subdirectories are skipped. Results are sorted by identifier.
pub fn discover_documents(root: &Path) -> Result<Vec<DiscoveredFile>> {
    let entries =
        std::fs::read_dir(root).map_err(|e| Error::read(root, e))?;
    let mut results = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| Error::read(root, e))?;
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        // Follows symlinks; broken links are skipped.
        if !path.is_file() {
            continue;
        }

        results.push(DiscoveredFile {
            id: name.into_owned(),
            path,
        });
    }

    results.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(results)
}

/// Read every discovered file in parallel, preserving order.
///
/// Content is decoded lossily so a stray non-UTF-8 byte does not abort a
/// whole indexing run. Failing to open or read a file is fatal.
pub fn read_documents(files: &[DiscoveredFile]) -> Result<Vec<SourceDocument>> {
    files
        .par_iter()
        .map(|file| {
            let bytes = std::fs::read(&file.path)
                .map_err(|e| Error::read(&file.path, e))?;
            Ok(SourceDocument {
                id: file.id.clone(),
                text: String::from_utf8_lossy(&bytes).into_owned(),
            })
        })
        .collect()
}
