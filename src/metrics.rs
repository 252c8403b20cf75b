//! Ranking quality metrics for a single query.
//!
//! Every metric whose divisor can be zero returns `None` in that case
//! instead of a non-number; callers leave such queries out of averages.

use std::collections::HashSet;

use crate::topics::Judgment;

/// Number of top results evaluated (precision, recall, average precision)
/// and written to run files.
pub const EVAL_DEPTH: usize = 15;

/// Cutoff of the reported NDCG.
pub const NDCG_DEPTH: usize = 10;

/// Documents of `retrieved` judged relevant.
pub fn retrieved_relevant<'a, S: AsRef<str>>(
    retrieved: &'a [S],
    judgment: &Judgment,
) -> HashSet<&'a str> {
    retrieved
        .iter()
        .map(AsRef::as_ref)
        .filter(|doc| judgment.is_relevant(doc))
        .collect()
}

/// `|retRel| / |retTopK|`, where `retrieved` is the evaluated top-K slice.
pub fn precision<S: AsRef<str>>(
    ret_rel: &HashSet<&str>,
    retrieved: &[S],
) -> Option<f64> {
    ratio(ret_rel.len(), retrieved.len())
}

/// `|retRel| / |rel|`.
pub fn recall(ret_rel: &HashSet<&str>, judgment: &Judgment) -> Option<f64> {
    ratio(ret_rel.len(), judgment.relevant_count())
}

/// Relevant documents among the first 10 results, over 10.
///
/// The divisor stays 10 even when fewer than 10 results exist.
pub fn precision_at_10<S: AsRef<str>>(
    retrieved: &[S],
    judgment: &Judgment,
) -> f64 {
    let top = &retrieved[..retrieved.len().min(10)];
    retrieved_relevant(top, judgment).len() as f64 / 10.0
}

/// Precision at rank R, with R the number of relevant documents.
pub fn r_precision<S: AsRef<str>>(
    retrieved: &[S],
    judgment: &Judgment,
) -> Option<f64> {
    let r = judgment.relevant_count();
    let top = &retrieved[..retrieved.len().min(r)];
    ratio(retrieved_relevant(top, judgment).len(), r)
}

/// Average precision over the first [`EVAL_DEPTH`] results.
///
/// Each relevant hit at 1-based position `i` adds `hits / i`, with `hits`
/// counting that hit. The sum is divided by the total number of relevant
/// documents, including those ranked below the cutoff.
pub fn average_precision<S: AsRef<str>>(
    retrieved: &[S],
    judgment: &Judgment,
) -> Option<f64> {
    let mut hits = 0usize;
    let mut sum = 0.0;

    for (i, doc) in retrieved.iter().take(EVAL_DEPTH).enumerate() {
        if judgment.is_relevant(doc.as_ref()) {
            hits += 1;
            sum += hits as f64 / (i + 1) as f64;
        }
    }

    divide(sum, judgment.relevant_count())
}

/// Binary preference.
///
/// Walks the ranking, counting non-relevant documents seen so far. Each
/// relevant hit adds `1 - nonrel / R`. The walk stops as soon as `R`
/// non-relevant documents have been seen, since later hits add nothing.
pub fn bpref<S: AsRef<str>>(
    retrieved: &[S],
    judgment: &Judgment,
) -> Option<f64> {
    let r = judgment.relevant_count();
    if r == 0 {
        return None;
    }

    let mut non_relevant = 0usize;
    let mut sum = 0.0;
    for doc in retrieved {
        if judgment.is_relevant(doc.as_ref()) {
            sum += 1.0 - non_relevant as f64 / r as f64;
        } else {
            non_relevant += 1;
            if non_relevant >= r {
                break;
            }
        }
    }

    divide(sum, r)
}

/// Normalized discounted cumulative gain at `n`.
///
/// The gain at 0-based position `i > 0` is divided by `log2(i + 1)`; the
/// first position is divided by 1. Ranks 1 and 2 therefore both carry full
/// gain. Gains are the positive grades; the ideal ranking is truncated to
/// `min(n, |rel|)` entries.
pub fn ndcg_at_n<S: AsRef<str>>(
    retrieved: &[S],
    judgment: &Judgment,
    n: usize,
) -> Option<f64> {
    let gains = retrieved
        .iter()
        .take(n)
        .map(|doc| f64::from(judgment.grade(doc.as_ref()).max(0)));
    let dcg = discounted_gain(gains);

    let idcg = discounted_gain(judgment.ideal_gains().into_iter().take(n));
    if idcg > 0.0 { Some(dcg / idcg) } else { None }
}

fn discounted_gain(gains: impl Iterator<Item = f64>) -> f64 {
    gains
        .enumerate()
        .map(|(i, gain)| {
            if i == 0 {
                gain
            } else {
                gain / ((i + 1) as f64).log2()
            }
        })
        .sum()
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    divide(numerator as f64, denominator)
}

fn divide(numerator: f64, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator / denominator as f64)
}
