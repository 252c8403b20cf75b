//! Batch evaluation of the engine against relevance judgments.

use std::io::Write;

use serde::Serialize;

use crate::{
    error::Result,
    metrics::{self, EVAL_DEPTH, NDCG_DEPTH},
    query::{QueryEngine, RankedDocument},
    topics::{Judgment, Qrels, Topic},
};

/// Metric values of a single query; `None` where undefined.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryMetrics {
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub p_at_10: Option<f64>,
    pub r_precision: Option<f64>,
    pub average_precision: Option<f64>,
    pub bpref: Option<f64>,
    pub ndcg_at_10: Option<f64>,
}

impl QueryMetrics {
    /// Evaluate a full descending ranking of document ids.
    pub fn compute<S: AsRef<str>>(ranking: &[S], judgment: &Judgment) -> Self {
        let top = &ranking[..ranking.len().min(EVAL_DEPTH)];
        let ret_rel = metrics::retrieved_relevant(top, judgment);

        Self {
            precision: metrics::precision(&ret_rel, top),
            recall: metrics::recall(&ret_rel, judgment),
            p_at_10: Some(metrics::precision_at_10(ranking, judgment)),
            r_precision: metrics::r_precision(ranking, judgment),
            average_precision: metrics::average_precision(ranking, judgment),
            bpref: metrics::bpref(ranking, judgment),
            ndcg_at_10: metrics::ndcg_at_n(ranking, judgment, NDCG_DEPTH),
        }
    }
}

/// Running mean that ignores undefined values.
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    fn value(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Averages over the evaluated queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Queries run, including skipped ones.
    pub queries: usize,
    /// Queries without any relevant judgment, left out of the averages.
    pub skipped: usize,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub p_at_10: Option<f64>,
    pub r_precision: Option<f64>,
    #[serde(rename = "map")]
    pub mean_average_precision: Option<f64>,
    pub bpref: Option<f64>,
    pub ndcg_at_10: Option<f64>,
}

impl Summary {
    fn aggregate(queries: usize, reports: &[QueryReport]) -> Self {
        let mut precision = Mean::default();
        let mut recall = Mean::default();
        let mut p_at_10 = Mean::default();
        let mut r_precision = Mean::default();
        let mut map = Mean::default();
        let mut bpref = Mean::default();
        let mut ndcg = Mean::default();

        for report in reports {
            let m = &report.metrics;
            precision.add(m.precision);
            recall.add(m.recall);
            p_at_10.add(m.p_at_10);
            r_precision.add(m.r_precision);
            map.add(m.average_precision);
            bpref.add(m.bpref);
            ndcg.add(m.ndcg_at_10);
        }

        Self {
            queries,
            skipped: queries - reports.len(),
            precision: precision.value(),
            recall: recall.value(),
            p_at_10: p_at_10.value(),
            r_precision: r_precision.value(),
            mean_average_precision: map.value(),
            bpref: bpref.value(),
            ndcg_at_10: ndcg.value(),
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows = [
            ("Precision:", self.precision),
            ("Recall:", self.recall),
            ("P@10:", self.p_at_10),
            ("R-precision:", self.r_precision),
            ("MAP:", self.mean_average_precision),
            ("bpref:", self.bpref),
            ("NDCG:", self.ndcg_at_10),
        ];

        writeln!(f, "Evaluation results:")?;
        for (label, value) in rows {
            match value {
                Some(v) => writeln!(f, "{label:<14}{v}")?,
                None => writeln!(f, "{label:<14}n/a")?,
            }
        }
        if self.skipped > 0 {
            writeln!(
                f,
                "({} of {} queries had no relevant judgments)",
                self.skipped, self.queries
            )?;
        }
        Ok(())
    }
}

/// Metrics of one evaluated query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryReport {
    pub query_id: String,
    pub metrics: QueryMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub reports: Vec<QueryReport>,
    pub summary: Summary,
}

/// Write the top [`EVAL_DEPTH`] results of a query as TREC run lines:
/// `<queryId> Q0 <documentId> <rank> <score> <runTag>`.
pub fn write_run<W: Write>(
    writer: &mut W,
    query_id: &str,
    ranked: &[RankedDocument],
    run_tag: &str,
) -> std::io::Result<()> {
    for r in ranked.iter().take(EVAL_DEPTH) {
        writeln!(
            writer,
            "{query_id} Q0 {} {} {} {run_tag}",
            r.doc_id, r.rank, r.score
        )?;
    }
    Ok(())
}

/// Run every topic through `engine`, write the run file and score it.
///
/// Topics without a relevant judgment still get run lines but are left out
/// of the averages.
pub fn evaluate<W: Write>(
    engine: &mut QueryEngine,
    topics: &[Topic],
    qrels: &Qrels,
    run: &mut W,
    run_tag: &str,
) -> Result<Evaluation> {
    let mut reports = Vec::with_capacity(topics.len());

    for topic in topics {
        let ranked = engine.search(&topic.text, None);
        write_run(run, &topic.id, &ranked, run_tag)?;

        let Some(judgment) =
            qrels.get(&topic.id).filter(|j| j.relevant_count() > 0)
        else {
            tracing::warn!(
                query = %topic.id,
                "no relevant judgments, skipping from averages"
            );
            continue;
        };

        let ranking: Vec<&str> =
            ranked.iter().map(|r| r.doc_id.as_str()).collect();
        let metrics = QueryMetrics::compute(&ranking, judgment);
        tracing::debug!(query = %topic.id, ?metrics, "evaluated query");

        reports.push(QueryReport {
            query_id: topic.id.clone(),
            metrics,
        });
    }
    run.flush()?;

    let summary = Summary::aggregate(topics.len(), &reports);
    tracing::info!(
        queries = summary.queries,
        skipped = summary.skipped,
        "evaluation finished"
    );

    Ok(Evaluation { reports, summary })
}
