//! Comparison pipeline: load inputs, run every unit, write reports.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use tracing::{info, info_span, warn};

use refcomp_core::{
    Comparison, Evaluator, NonExactJournals, RecordStore, RecordedEntry, RecordedSearch,
};
use refcomp_ingest::{load_gold_table, load_journals, load_recorded_results, select_journals};
use refcomp_model::{Category, FlagSchema, Journal};
use refcomp_report::{RunSummary, write_report};

use crate::config::Config;

/// What a finished comparison produced.
#[derive(Debug)]
pub struct CompareResult {
    pub output_dir: PathBuf,
    pub gold_records: usize,
    pub summary: RunSummary,
    pub files: Vec<PathBuf>,
    pub non_exact: Vec<NonExactJournals>,
}

/// Categories as they will be evaluated. Membership fields are checked
/// against the configuration only; the gold standard is not read.
pub fn resolve_categories(config: &Config) -> Result<Vec<Category>> {
    config.expand_categories(&FlagSchema::new(config.flag_fields()))
}

/// Journals from the journal list, narrowed to the configured selection.
pub fn resolve_journals(config: &Config) -> Result<Vec<Journal>> {
    let path = &config.journals.path;
    let journals = load_journals(path).with_context(|| format!("load journals {}", path.display()))?;
    let (selected, unknown) = select_journals(&journals, &config.journals.only);
    if !unknown.is_empty() {
        bail!("journals not in {}: {}", path.display(), unknown.join(", "));
    }
    if selected.is_empty() {
        warn!(path = %path.display(), "no journals selected");
    }
    Ok(selected.into_iter().cloned().collect())
}

pub fn run_compare(config: &Config) -> Result<CompareResult> {
    let start = Instant::now();

    let gold_path = &config.gold.path;
    let table = info_span!("ingest", path = %gold_path.display())
        .in_scope(|| load_gold_table(gold_path, &config.gold.columns, &config.flag_fields()))
        .with_context(|| format!("load gold standard {}", gold_path.display()))?;
    let categories = config.expand_categories(&table.schema)?;
    let journals = resolve_journals(config)?;
    let journal_refs: Vec<&Journal> = journals.iter().collect();

    let results_path = config
        .search
        .recorded_results
        .as_ref()
        .ok_or_else(|| anyhow!("no search source configured; set search.recorded_results"))?;
    let recorded = load_recorded_results(results_path)
        .with_context(|| format!("load recorded results {}", results_path.display()))?;
    let source = RecordedSearch::new(recorded.into_iter().map(|r| RecordedEntry {
        category: r.category,
        unit: r.unit,
        record: r.record,
    }));

    let gold_records = table.len();
    let store = RecordStore::build(table.records).context("index gold standard")?;
    info!(
        gold_records,
        categories = categories.len(),
        journals = journals.len(),
        recorded = source.len(),
        "inputs loaded"
    );

    let evaluator = Evaluator::by_accession(config.evaluation.duplicate_claims);
    let comparison = Comparison::new(&store, &source, config.search.settings.clone(), evaluator);
    let outcome = comparison
        .run(&categories, &journal_refs)
        .context("comparison aborted")?;

    let options = config.report_options();
    let report = write_report(&outcome.aggregator, &categories, &journal_refs, &options, Utc::now())
        .with_context(|| format!("write report to {}", options.output_dir.display()))?;
    info!(
        files = report.files.len(),
        duration_ms = start.elapsed().as_millis(),
        "comparison complete"
    );

    Ok(CompareResult {
        output_dir: options.output_dir,
        gold_records,
        summary: report.summary,
        files: report.files,
        non_exact: outcome.non_exact,
    })
}
