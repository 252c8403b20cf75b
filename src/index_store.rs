//! Persisted weight index.
//!
//! One record per line, `<documentId> <term> <weight>`, fields separated by
//! a single space. Weights use Rust's shortest round-trip float formatting,
//! so reloading reproduces the exact values that were written.

use std::{
    collections::btree_map::Entry,
    ffi::OsString,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result},
    index::WeightIndex,
};

/// Serialize `index` in the line format.
pub fn write_index<W: Write>(
    mut writer: W,
    index: &WeightIndex,
) -> std::io::Result<()> {
    for (doc, weights) in index.documents() {
        for (term, weight) in weights {
            writeln!(writer, "{doc} {term} {weight}")?;
        }
    }
    writer.flush()
}

/// Parse a whole index. Any malformed line fails the entire parse.
pub fn parse_index<R: BufRead>(reader: R) -> Result<WeightIndex> {
    let mut index = WeightIndex::default();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let malformed = |reason: String| Error::MalformedIndex {
            line: line_no,
            reason,
        };
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Err(malformed(format!("invalid UTF-8: {e}")));
            }
            Err(e) => return Err(e.into()),
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        let &[doc, term, weight] = fields.as_slice() else {
            return Err(malformed(format!(
                "expected 3 fields, found {}",
                fields.len()
            )));
        };

        let weight: f64 = weight.parse().map_err(|e| {
            malformed(format!("invalid weight {weight:?}: {e}"))
        })?;
        if !weight.is_finite() {
            return Err(malformed(format!("non-finite weight {weight}")));
        }

        match index.document_mut(doc).entry(term.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(weight);
            }
            Entry::Occupied(_) => {
                return Err(malformed(format!(
                    "duplicate entry for ({doc}, {term})"
                )));
            }
        }
    }

    Ok(index)
}

/// Location of the persisted index and the load / rebuild policy around it.
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the persisted index, failing on the first malformed line.
    pub fn load(&self) -> Result<WeightIndex> {
        let file =
            File::open(&self.path).map_err(|e| Error::read(&self.path, e))?;
        parse_index(BufReader::new(file))
    }

    /// Persist `index`, replacing any previous file.
    ///
    /// Writes a sibling temporary file first and renames it over the
    /// target, so readers never observe a half-written index.
    pub fn save(&self, index: &WeightIndex) -> Result<()> {
        let tmp = self.temp_path();
        let file = File::create(&tmp).map_err(|e| Error::write(&tmp, e))?;
        let written = write_index(BufWriter::new(file), index)
            .map_err(|e| Error::write(&tmp, e))
            .and_then(|()| {
                std::fs::rename(&tmp, &self.path)
                    .map_err(|e| Error::write(&self.path, e))
            });
        if let Err(err) = written {
            let _ = std::fs::remove_file(&tmp);
            return Err(err);
        }

        tracing::info!(
            path = %self.path.display(),
            documents = index.doc_count(),
            entries = index.entry_count(),
            "saved index"
        );
        Ok(())
    }

    /// Load the persisted index, or rebuild and persist it.
    ///
    /// A missing file and a corrupt file are handled the same way: `build`
    /// runs and its result is saved before being returned. Other I/O
    /// failures are propagated.
    pub fn load_or_build<F>(&self, build: F) -> Result<WeightIndex>
    where
        F: FnOnce() -> Result<WeightIndex>,
    {
        if self.exists() {
            match self.load() {
                Ok(index) => {
                    tracing::info!(
                        path = %self.path.display(),
                        documents = index.doc_count(),
                        "loaded index"
                    );
                    return Ok(index);
                }
                Err(err @ Error::MalformedIndex { .. }) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        "index is corrupt ({err}), rebuilding"
                    );
                }
                Err(err) => return Err(err),
            }
        } else {
            tracing::info!(
                path = %self.path.display(),
                "no index found, rebuilding from documents"
            );
        }

        self.rebuild(build)
    }

    /// Build a fresh index and persist it, ignoring any existing file.
    pub fn rebuild<F>(&self, build: F) -> Result<WeightIndex>
    where
        F: FnOnce() -> Result<WeightIndex>,
    {
        let index = build()?;
        self.save(&index)?;
        Ok(index)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use proptest::prelude::*;

    use super::*;

    fn sample() -> WeightIndex {
        let mut index = WeightIndex::default();
        index.insert_document(
            "1".into(),
            [("cat".to_string(), 1.375)].into(),
        );
        index.insert_document(
            "2".into(),
            [("dog".to_string(), -0.25), ("ran".to_string(), 1e-20)].into(),
        );
        index
    }

    fn to_text(index: &WeightIndex) -> String {
        let mut buf = Vec::new();
        write_index(&mut buf, index).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn write_emits_one_line_per_entry() {
        let text = to_text(&sample());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "1 cat 1.375",
                "2 dog -0.25",
                "2 ran 0.00000000000000000001",
            ]
        );
    }

    #[test]
    fn parse_reads_written_index() {
        let index = sample();
        let parsed = parse_index(to_text(&index).as_bytes()).unwrap();
        assert_eq!(parsed, index);
    }

    #[test]
    fn parse_rejects_wrong_field_count() {
        let err = parse_index("1 cat 0.5\n2 dog\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedIndex { line: 2, .. }));
    }

    #[test]
    fn parse_rejects_extra_fields() {
        let err = parse_index("1 cat 0.5 extra\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedIndex { line: 1, .. }));
    }

    #[test]
    fn parse_rejects_bad_weight() {
        let err = parse_index("1 cat abc\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedIndex { line: 1, .. }));

        let err = parse_index("1 cat NaN\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedIndex { line: 1, .. }));
    }

    #[test]
    fn parse_rejects_blank_line() {
        let err =
            parse_index("1 cat 0.5\n\n2 dog 0.1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedIndex { line: 2, .. }));
    }

    #[test]
    fn parse_rejects_duplicate_entries() {
        let err =
            parse_index("1 cat 0.5\n1 cat 0.6\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedIndex { line: 2, .. }));
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let store = IndexStore::new(tmp.path().join("index.txt"));

        store.save(&sample()).unwrap();

        assert!(store.exists());
        assert!(!tmp.path().join("index.txt.tmp").exists());
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn load_or_build_builds_and_persists_when_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = IndexStore::new(tmp.path().join("index.txt"));

        let built = store.load_or_build(|| Ok(sample())).unwrap();

        assert_eq!(built, sample());
        assert_eq!(store.load().unwrap(), built);
    }

    #[test]
    fn load_or_build_prefers_existing_index() {
        let tmp = tempfile::tempdir().unwrap();
        let store = IndexStore::new(tmp.path().join("index.txt"));
        store.save(&sample()).unwrap();

        let called = Cell::new(false);
        let loaded = store
            .load_or_build(|| {
                called.set(true);
                Ok(WeightIndex::default())
            })
            .unwrap();

        assert!(!called.get());
        assert_eq!(loaded, sample());
    }

    #[test]
    fn load_or_build_rebuilds_corrupt_index() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("index.txt");
        std::fs::write(&path, "1 cat\n").unwrap();
        let store = IndexStore::new(&path);

        let rebuilt = store.load_or_build(|| Ok(sample())).unwrap();

        assert_eq!(rebuilt, sample());
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn parse_rejects_invalid_utf8() {
        let bytes: &[u8] = &[b'1', b' ', 0xff, 0xfe, b' ', b'1', b'\n'];
        let err = parse_index(bytes).unwrap_err();
        assert!(matches!(err, Error::MalformedIndex { line: 1, .. }));
    }

    #[test]
    fn load_or_build_rebuilds_non_utf8_index() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("index.txt");
        std::fs::write(&path, [b'1', b' ', 0xff, 0xfe, b' ', b'1', b'\n'])
            .unwrap();
        let store = IndexStore::new(&path);

        let rebuilt = store.load_or_build(|| Ok(sample())).unwrap();

        assert_eq!(rebuilt, sample());
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn failed_save_leaves_no_temporary_file() {
        let tmp = tempfile::tempdir().unwrap();
        // Renaming a file over a non-empty directory fails.
        let target = tmp.path().join("index.txt");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("occupied"), "x").unwrap();
        let store = IndexStore::new(&target);

        let err = store.save(&sample()).unwrap_err();

        assert!(matches!(err, Error::Write { .. }));
        assert!(!tmp.path().join("index.txt.tmp").exists());
    }

    #[test]
    fn load_or_build_propagates_build_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let store = IndexStore::new(tmp.path().join("index.txt"));

        let err = store.load_or_build(|| Err(Error::EmptyCorpus)).unwrap_err();

        assert!(matches!(err, Error::EmptyCorpus));
        assert!(!store.exists());
    }

    fn weight_index() -> impl Strategy<Value = WeightIndex> {
        let weights = prop::collection::btree_map(
            "[a-z]{1,8}",
            prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL,
            1..6,
        );
        prop::collection::btree_map("[a-z0-9.]{1,8}", weights, 0..6).prop_map(
            |docs| {
                let mut index = WeightIndex::default();
                for (id, weights) in docs {
                    index.insert_document(id, weights);
                }
                index
            },
        )
    }

    proptest! {
        #[test]
        fn persisted_weights_are_bit_identical(index in weight_index()) {
            let parsed = parse_index(to_text(&index).as_bytes()).unwrap();
            prop_assert_eq!(parsed.doc_count(), index.doc_count());
            for (doc, weights) in index.documents() {
                for (term, weight) in weights {
                    prop_assert_eq!(
                        parsed.weight(doc, term).to_bits(),
                        weight.to_bits()
                    );
                }
            }
        }
    }
}
