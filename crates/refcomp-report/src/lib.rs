//! Report generation for comparison runs.
//!
//! - **HTML**: `index.html` with per-category totals and one detail page per category
//! - **JSON**: the run summary as `summary.json`
//! - **TSV dumps**: every returned record and every false negative

mod data;
mod dump;
mod html;

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};

use refcomp_core::Aggregator;
use refcomp_model::{Category, Journal};

pub use data::{
    CategoryDetail, Counts, DetailLimits, FalseNegativeRow, FalsePositiveRow, JournalDetail,
    RunSummary, SummaryRow, UNDEFINED_METRIC, build_category_detail, build_run_summary,
    format_metric, format_timestamp,
};
pub use dump::{
    FALSE_NEGATIVES_FILE, RESULTS_FILE, SUMMARY_FILE, write_dumps, write_false_negatives,
    write_results, write_summary_json,
};
pub use html::{INDEX_FILE, category_file_name, render_category, render_index, write_html_report};

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub output_dir: PathBuf,
    pub limits: DetailLimits,
    /// Also write the tab-separated dumps.
    pub dump: bool,
    pub results_file: String,
    pub false_negatives_file: String,
}

impl ReportOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            limits: DetailLimits::default(),
            dump: false,
            results_file: RESULTS_FILE.to_string(),
            false_negatives_file: FALSE_NEGATIVES_FILE.to_string(),
        }
    }
}

/// Everything a report run produced.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub summary: RunSummary,
    pub files: Vec<PathBuf>,
}

/// Build and write HTML pages, the JSON summary and optionally the dumps.
pub fn write_report(
    aggregator: &Aggregator<'_>,
    categories: &[Category],
    journals: &[&Journal],
    options: &ReportOptions,
    generated_at: DateTime<Utc>,
) -> Result<ReportOutput> {
    let dir: &Path = &options.output_dir;
    let summary = build_run_summary(aggregator, categories, journals.len(), generated_at)?;
    let details = categories
        .iter()
        .map(|category| build_category_detail(aggregator, category, journals, options.limits, generated_at))
        .collect::<Result<Vec<_>>>()?;

    let mut files = write_html_report(dir, &summary, &details)?;
    let json = dir.join(SUMMARY_FILE);
    write_summary_json(&json, &summary)?;
    files.push(json);
    if options.dump {
        write_dumps(dir, aggregator, &options.results_file, &options.false_negatives_file)?;
        files.push(dir.join(&options.results_file));
        files.push(dir.join(&options.false_negatives_file));
    }
    Ok(ReportOutput { summary, files })
}
