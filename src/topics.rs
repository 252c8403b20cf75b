//! Evaluation inputs: the query list and its relevance judgments (qrels).

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use crate::error::{Error, Result};

/// A query to evaluate, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: String,
    pub text: String,
}

/// Parse `<queryId> <queryText>` lines. Blank lines are skipped.
pub fn parse_queries(content: &str) -> Result<Vec<Topic>> {
    let mut topics = Vec::new();

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((id, text)) = line.split_once(' ') else {
            return Err(Error::MalformedQuery { line: i + 1 });
        };
        if id.is_empty() {
            return Err(Error::MalformedQuery { line: i + 1 });
        }
        topics.push(Topic {
            id: id.to_string(),
            text: text.to_string(),
        });
    }

    Ok(topics)
}

pub fn load_queries(path: &Path) -> Result<Vec<Topic>> {
    let content =
        std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    parse_queries(&content)
}

/// Graded judgments for one query.
///
/// A document is relevant when its grade is positive; unjudged documents
/// are treated as non-relevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Judgment {
    grades: HashMap<String, i32>,
}

impl Judgment {
    pub fn insert(&mut self, doc: impl Into<String>, grade: i32) {
        self.grades.insert(doc.into(), grade);
    }

    pub fn grade(&self, doc: &str) -> i32 {
        self.grades.get(doc).copied().unwrap_or(0)
    }

    pub fn is_relevant(&self, doc: &str) -> bool {
        self.grade(doc) > 0
    }

    /// Number of relevant documents.
    pub fn relevant_count(&self) -> usize {
        self.grades.values().filter(|&&g| g > 0).count()
    }

    /// Positive grades in descending order: the ideal ranking's gains.
    pub fn ideal_gains(&self) -> Vec<f64> {
        let mut gains: Vec<i32> =
            self.grades.values().copied().filter(|&g| g > 0).collect();
        gains.sort_unstable_by(|a, b| b.cmp(a));
        gains.into_iter().map(f64::from).collect()
    }
}

impl<S: Into<String>> FromIterator<(S, i32)> for Judgment {
    fn from_iter<I: IntoIterator<Item = (S, i32)>>(iter: I) -> Self {
        Self {
            grades: iter.into_iter().map(|(d, g)| (d.into(), g)).collect(),
        }
    }
}

/// Relevance judgments for every query, keyed by query id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qrels {
    judgments: BTreeMap<String, Judgment>,
}

impl Qrels {
    pub fn get(&self, query_id: &str) -> Option<&Judgment> {
        self.judgments.get(query_id)
    }

    pub fn len(&self) -> usize {
        self.judgments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.judgments.is_empty()
    }
}

/// Parse `<queryId> <ignored> <documentId> <grade>` rows.
pub fn parse_qrels(content: &str) -> Result<Qrels> {
    let mut qrels = Qrels::default();

    for (i, line) in content.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        let &[query_id, _, doc, grade, ..] = fields.as_slice() else {
            return Err(Error::MalformedJudgment {
                line: i + 1,
                reason: format!(
                    "expected at least 4 fields, found {}",
                    fields.len()
                ),
            });
        };
        let grade: i32 =
            grade.parse().map_err(|e| Error::MalformedJudgment {
                line: i + 1,
                reason: format!("invalid grade {grade:?}: {e}"),
            })?;

        qrels
            .judgments
            .entry(query_id.to_string())
            .or_default()
            .insert(doc, grade);
    }

    Ok(qrels)
}

pub fn load_qrels(path: &Path) -> Result<Qrels> {
    let content =
        std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    parse_qrels(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_split_on_first_space() {
        let topics =
            parse_queries("1 what similarity laws\n\n2 heat transfer\n")
                .unwrap();
        assert_eq!(
            topics,
            vec![
                Topic {
                    id: "1".into(),
                    text: "what similarity laws".into()
                },
                Topic {
                    id: "2".into(),
                    text: "heat transfer".into()
                },
            ]
        );
    }

    #[test]
    fn query_without_text_is_malformed() {
        let err = parse_queries("1 ok\n2\n").unwrap_err();
        assert!(matches!(err, Error::MalformedQuery { line: 2 }));
    }

    #[test]
    fn qrels_group_by_query() {
        let qrels = parse_qrels("1 0 184 2\n1 0 29 4\n2 0 12 1\n\n").unwrap();
        assert_eq!(qrels.len(), 2);

        let judgment = qrels.get("1").unwrap();
        assert_eq!(judgment.grade("184"), 2);
        assert_eq!(judgment.grade("29"), 4);
        assert_eq!(judgment.relevant_count(), 2);
        assert!(qrels.get("3").is_none());
    }

    #[test]
    fn qrels_reject_bad_rows() {
        let err = parse_qrels("1 0 184\n").unwrap_err();
        assert!(matches!(err, Error::MalformedJudgment { line: 1, .. }));

        let err = parse_qrels("1 0 184 high\n").unwrap_err();
        assert!(matches!(err, Error::MalformedJudgment { line: 1, .. }));
    }

    #[test]
    fn non_positive_grades_are_not_relevant() {
        let judgment: Judgment =
            [("a", 3), ("b", 0), ("c", -1), ("d", 1)].into_iter().collect();
        assert!(judgment.is_relevant("a"));
        assert!(!judgment.is_relevant("b"));
        assert!(!judgment.is_relevant("c"));
        assert!(!judgment.is_relevant("unjudged"));
        assert_eq!(judgment.relevant_count(), 2);
        assert_eq!(judgment.ideal_gains(), vec![3.0, 1.0]);
    }
}
