//! Flat report structures built from aggregated results.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use refcomp_core::{Aggregator, FalsePositiveReason};
use refcomp_model::{Category, Journal, PrecisionRecall};

/// Shown in place of an undefined precision or recall.
pub const UNDEFINED_METRIC: &str = "-";

/// Precision or recall with two decimals, or the placeholder.
pub fn format_metric(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED_METRIC.to_string(), |v| format!("{v:.2}"))
}

/// Counters and formatted metrics of one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub gold_positives: usize,
    pub returned: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub precision: String,
    pub recall: String,
}

impl From<PrecisionRecall> for Counts {
    fn from(stats: PrecisionRecall) -> Self {
        Self {
            gold_positives: stats.gold_positives,
            returned: stats.returned,
            true_positives: stats.true_positives,
            false_positives: stats.false_positives(),
            false_negatives: stats.false_negatives(),
            precision: format_metric(stats.precision()),
            recall: format_metric(stats.recall()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub category: String,
    pub display_name: String,
    pub query: String,
    #[serde(flatten)]
    pub counts: Counts,
}

/// Data behind the run summary page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub journal_count: usize,
    pub rows: Vec<SummaryRow>,
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// One row per category in configured order.
pub fn build_run_summary(
    aggregator: &Aggregator<'_>,
    categories: &[Category],
    journal_count: usize,
    generated_at: DateTime<Utc>,
) -> Result<RunSummary> {
    let rows = categories
        .iter()
        .map(|category| -> Result<SummaryRow> {
            let totals = aggregator
                .category_totals(&category.name)
                .with_context(|| format!("summary row for {}", category.name))?;
            Ok(SummaryRow {
                category: category.name.clone(),
                display_name: category.display_name.clone(),
                query: category.query.clone(),
                counts: totals.into(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(RunSummary {
        generated_at: format_timestamp(generated_at),
        journal_count,
        rows,
    })
}

/// How many false positives and negatives a detail page lists per journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailLimits {
    pub max_false_positives: usize,
    pub max_false_negatives: usize,
}

impl Default for DetailLimits {
    fn default() -> Self {
        Self {
            max_false_positives: 50,
            max_false_negatives: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FalsePositiveRow {
    pub doi: String,
    pub title: String,
    pub pub_type: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FalseNegativeRow {
    pub accession: String,
    pub doi: String,
    pub title: String,
    pub authors: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalDetail {
    pub name: String,
    pub source_name: String,
    pub triaged_by: String,
    #[serde(flatten)]
    pub counts: Counts,
    pub false_positives: Vec<FalsePositiveRow>,
    pub false_positive_total: usize,
    pub false_negatives: Vec<FalseNegativeRow>,
    pub false_negative_total: usize,
}

/// Data behind one category page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDetail {
    pub generated_at: String,
    pub summary: SummaryRow,
    pub journals: Vec<JournalDetail>,
}

fn reason_text(reason: &FalsePositiveReason<'_>) -> String {
    match reason {
        FalsePositiveReason::NoIdentifierMatch => reason.label().to_string(),
        FalsePositiveReason::OutsideCategory(gold)
        | FalsePositiveReason::OutsideUnit(gold)
        | FalsePositiveReason::AlreadyClaimed(gold) => format!("{} ({})", reason.label(), gold.accession),
    }
}

pub fn build_category_detail(
    aggregator: &Aggregator<'_>,
    category: &Category,
    journals: &[&Journal],
    limits: DetailLimits,
    generated_at: DateTime<Utc>,
) -> Result<CategoryDetail> {
    let totals = aggregator
        .category_totals(&category.name)
        .with_context(|| format!("detail page for {}", category.name))?;

    let mut details = Vec::with_capacity(journals.len());
    for journal in journals {
        let unit = aggregator
            .unit_result(&category.name, &journal.name)
            .with_context(|| format!("detail page for {}", category.name))?;

        let false_positives = unit
            .false_positive_records()
            .take(limits.max_false_positives)
            .map(|(candidate, reason)| FalsePositiveRow {
                doi: candidate.doi.clone().unwrap_or_default(),
                title: candidate.title.clone(),
                pub_type: candidate.pub_type.clone(),
                reason: reason_text(&reason),
            })
            .collect();
        let false_negatives = unit
            .false_negatives
            .iter()
            .take(limits.max_false_negatives)
            .map(|gold| FalseNegativeRow {
                accession: gold.accession.to_string(),
                doi: gold.doi.clone().unwrap_or_default(),
                title: gold.title.clone(),
                authors: gold.authors.clone(),
            })
            .collect();

        details.push(JournalDetail {
            name: journal.name.clone(),
            source_name: journal.source_name.clone(),
            triaged_by: journal.triaged_by.clone().unwrap_or_default(),
            counts: unit.stats.into(),
            false_positives,
            false_positive_total: unit.false_positives.len(),
            false_negatives,
            false_negative_total: unit.false_negatives.len(),
        });
    }

    Ok(CategoryDetail {
        generated_at: format_timestamp(generated_at),
        summary: SummaryRow {
            category: category.name.clone(),
            display_name: category.display_name.clone(),
            query: category.query.clone(),
            counts: totals.into(),
        },
        journals: details,
    })
}
