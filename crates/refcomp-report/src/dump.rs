//! Tab-separated dumps of every returned record and every false negative.
//!
//! The all-results columns are the ones the recorded-results loader reads, so
//! a dump from a live run can be replayed offline. Each row names the journal
//! it was kept for, and a unit that kept nothing writes one row with blank
//! record fields.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use tracing::info;

use refcomp_core::Aggregator;
use refcomp_model::{CandidateRecord, GoldRecord};

use crate::data::RunSummary;

pub const RESULTS_FILE: &str = "results.tsv";
pub const FALSE_NEGATIVES_FILE: &str = "false_negatives.tsv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Tabs and line breaks would split a field; quoting is off in the reader.
fn clean(value: &str) -> String {
    value
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

#[derive(Debug, Default, Serialize)]
struct ResultRow {
    category: String,
    unit: String,
    pubmed: String,
    #[serde(rename = "DOI")]
    doi: String,
    journal: String,
    volume: String,
    #[serde(rename = "startingPage")]
    starting_page: String,
    #[serde(rename = "endingPage")]
    ending_page: String,
    #[serde(rename = "coverDate")]
    cover_date: String,
    #[serde(rename = "pubType")]
    pub_type: String,
    #[serde(rename = "prismType")]
    prism_type: String,
    title: String,
    #[serde(rename = "firstAuthor")]
    first_author: String,
}

impl ResultRow {
    fn new(category: &str, unit: &str, record: &CandidateRecord) -> Self {
        Self {
            pubmed: clean(record.pubmed.as_deref().unwrap_or_default()),
            doi: clean(record.doi.as_deref().unwrap_or_default()),
            journal: clean(&record.journal),
            volume: clean(&record.volume),
            starting_page: clean(&record.starting_page),
            ending_page: clean(&record.ending_page),
            cover_date: clean(&record.cover_date),
            pub_type: clean(&record.pub_type),
            prism_type: clean(&record.prism_type),
            title: clean(&record.title),
            first_author: clean(&record.first_author),
            ..Self::empty(category, unit)
        }
    }

    fn empty(category: &str, unit: &str) -> Self {
        Self {
            category: clean(category),
            unit: clean(unit),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize)]
struct FalseNegativeRow {
    #[serde(rename = "Jnum")]
    accession: String,
    pubmed: String,
    #[serde(rename = "DOI")]
    doi: String,
    year: String,
    journal: String,
    title: String,
}

impl From<&GoldRecord> for FalseNegativeRow {
    fn from(gold: &GoldRecord) -> Self {
        Self {
            accession: clean(gold.accession.as_str()),
            pubmed: clean(gold.pubmed.as_deref().unwrap_or_default()),
            doi: clean(gold.doi.as_deref().unwrap_or_default()),
            year: clean(&gold.year),
            journal: clean(&gold.journal),
            title: clean(&gold.title),
        }
    }
}

fn tsv_writer<W: Write>(out: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .from_writer(out)
}

/// Every returned record of every unit, tagged with its category and journal.
/// Returns the number of records written, not counting empty-unit rows.
pub fn write_results<W: Write>(aggregator: &Aggregator<'_>, out: W) -> Result<usize> {
    let mut writer = tsv_writer(out);
    let mut rows = 0;
    for (category, journal, unit) in aggregator.units() {
        if unit.candidates.is_empty() {
            writer.serialize(ResultRow::empty(category, journal))?;
            continue;
        }
        for record in &unit.candidates {
            writer.serialize(ResultRow::new(category, journal, record))?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

/// Every missed gold record of every unit. Returns the number of rows written.
pub fn write_false_negatives<W: Write>(aggregator: &Aggregator<'_>, out: W) -> Result<usize> {
    let mut writer = tsv_writer(out);
    let mut rows = 0;
    for (_, _, unit) in aggregator.units() {
        for &gold in &unit.false_negatives {
            writer.serialize(FalseNegativeRow::from(gold))?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Write both dumps into `dir` under the given file names.
pub fn write_dumps(
    dir: &Path,
    aggregator: &Aggregator<'_>,
    results_file: &str,
    false_negatives_file: &str,
) -> Result<()> {
    let results = dir.join(results_file);
    let rows = write_results(aggregator, create(&results)?)
        .with_context(|| format!("write {}", results.display()))?;
    info!(path = %results.display(), rows, "wrote results dump");

    let missed = dir.join(false_negatives_file);
    let rows = write_false_negatives(aggregator, create(&missed)?)
        .with_context(|| format!("write {}", missed.display()))?;
    info!(path = %missed.display(), rows, "wrote false negatives dump");
    Ok(())
}

/// Write the run summary as pretty JSON.
pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<()> {
    let mut out = create(path)?;
    serde_json::to_writer_pretty(&mut out, summary)
        .with_context(|| format!("serialize {}", path.display()))?;
    out.write_all(b"\n")?;
    out.flush().with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "wrote summary json");
    Ok(())
}
