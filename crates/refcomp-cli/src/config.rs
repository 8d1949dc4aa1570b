//! Run configuration: a TOML file merged with command-line overrides.
//!
//! ```toml
//! [gold]
//! path = "gold.tsv"
//!
//! [journals]
//! path = "journals.tsv"
//!
//! [search]
//! year = 2024
//! recorded_results = "results.tsv"
//!
//! [[categories]]
//! code = "N"
//! name = "None"
//! display_name = "All references"
//! queries = ["ALL"]
//! ```
//!
//! Relative paths are resolved against the directory of the file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

use refcomp_core::{ClaimPolicy, SearchSettings};
use refcomp_ingest::GoldColumns;
use refcomp_model::{Category, CategoryDefinition, FlagSchema};
use refcomp_report::{DetailLimits, FALSE_NEGATIVES_FILE, RESULTS_FILE, ReportOptions};

pub const DEFAULT_CONFIG_FILE: &str = "refcomp.toml";

/// `--query CODE=-` keeps the configured queries of `CODE`.
pub const KEEP_QUERY: &str = "-";

#[derive(Debug, Clone, Deserialize)]
pub struct GoldConfig {
    pub path: PathBuf,
    #[serde(flatten)]
    pub columns: GoldColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JournalsConfig {
    pub path: PathBuf,
    /// Gold-side journal names to evaluate; triaged journals when empty.
    #[serde(default)]
    pub only: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    #[serde(flatten)]
    pub settings: SearchSettings,
    /// Recorded result file answering every query offline.
    #[serde(default)]
    pub recorded_results: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub max_false_positives: usize,
    pub max_false_negatives: usize,
    pub dump: bool,
    pub all_results_file: String,
    pub false_negatives_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let limits = DetailLimits::default();
        Self {
            dir: PathBuf::from("report"),
            max_false_positives: limits.max_false_positives,
            max_false_negatives: limits.max_false_negatives,
            dump: false,
            all_results_file: RESULTS_FILE.to_string(),
            false_negatives_file: FALSE_NEGATIVES_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub duplicate_claims: ClaimPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub gold: GoldConfig,
    pub journals: JournalsConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    pub categories: Vec<CategoryDefinition>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Category codes to run, in this order.
    pub categories: Vec<String>,
    /// `(code, path)` pairs replacing a category's queries with file contents.
    pub queries: Vec<(String, PathBuf)>,
    pub journals: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub year: Option<i32>,
    pub max_false_positives: Option<usize>,
    pub max_false_negatives: Option<usize>,
    pub dump: bool,
    pub duplicate_claims: Option<ClaimPolicy>,
}

impl Config {
    /// Parse a configuration file and resolve its relative paths.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let mut config: Self = toml::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.gold.path);
        resolve(&mut self.journals.path);
        resolve(&mut self.output.dir);
        if let Some(path) = self.search.recorded_results.as_mut() {
            resolve(path);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            bail!("no categories configured");
        }
        let mut seen = BTreeMap::new();
        for definition in &self.categories {
            if let Some(previous) = seen.insert(definition.code.as_str(), definition.name.as_str()) {
                bail!(
                    "category code {} used by both {previous} and {}",
                    definition.code,
                    definition.name
                );
            }
        }
        Ok(())
    }

    /// Apply command-line overrides. Query files are read here.
    pub fn apply(mut self, overrides: &Overrides) -> Result<Self> {
        if !overrides.categories.is_empty() {
            let mut selected = Vec::with_capacity(overrides.categories.len());
            for code in &overrides.categories {
                let definition = self
                    .categories
                    .iter()
                    .find(|d| d.code == *code)
                    .ok_or_else(|| anyhow!("unknown category code {code}"))?;
                selected.push(definition.clone());
            }
            self.categories = selected;
        }

        let mut replacements: BTreeMap<&str, Vec<&Path>> = BTreeMap::new();
        for (code, path) in &overrides.queries {
            replacements.entry(code.as_str()).or_default().push(path);
        }
        for (code, paths) in replacements {
            let definition = self
                .categories
                .iter_mut()
                .find(|d| d.code == code)
                .ok_or_else(|| anyhow!("query given for unknown category code {code}"))?;
            let mut queries = Vec::with_capacity(paths.len());
            for path in paths {
                if path == Path::new(KEEP_QUERY) {
                    queries.extend(definition.queries.iter().cloned());
                } else {
                    queries.push(read_query(path)?);
                }
            }
            definition.queries = queries;
        }

        if !overrides.journals.is_empty() {
            self.journals.only.clone_from(&overrides.journals);
        }
        if let Some(dir) = &overrides.output_dir {
            self.output.dir.clone_from(dir);
        }
        if let Some(year) = overrides.year {
            self.search.settings.year = Some(year);
        }
        if let Some(max) = overrides.max_false_positives {
            self.output.max_false_positives = max;
        }
        if let Some(max) = overrides.max_false_negatives {
            self.output.max_false_negatives = max;
        }
        self.output.dump |= overrides.dump;
        if let Some(policy) = overrides.duplicate_claims {
            self.evaluation.duplicate_claims = policy;
        }
        Ok(self)
    }

    /// Gold-standard columns named as membership fields, first use first.
    pub fn flag_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        for definition in &self.categories {
            let field = definition.membership_field.trim();
            if !field.is_empty() && !fields.iter().any(|f| f == field) {
                fields.push(field.to_string());
            }
        }
        fields
    }

    /// Expand every category definition into one category per query.
    pub fn expand_categories(&self, schema: &FlagSchema) -> Result<Vec<Category>> {
        let mut categories = Vec::new();
        for definition in &self.categories {
            categories.extend(
                definition
                    .expand(schema)
                    .with_context(|| format!("category {}", definition.code))?,
            );
        }
        Ok(categories)
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            output_dir: self.output.dir.clone(),
            limits: DetailLimits {
                max_false_positives: self.output.max_false_positives,
                max_false_negatives: self.output.max_false_negatives,
            },
            dump: self.output.dump,
            results_file: self.output.all_results_file.clone(),
            false_negatives_file: self.output.false_negatives_file.clone(),
        }
    }
}

fn read_query(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).with_context(|| format!("read query {}", path.display()))?;
    let query = text.trim();
    if query.is_empty() {
        bail!("query file {} is empty", path.display());
    }
    Ok(query.to_string())
}

/// Parse a `CODE=PATH` query override.
pub fn parse_query_override(raw: &str) -> std::result::Result<(String, PathBuf), String> {
    let (code, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=PATH, got {raw:?}"))?;
    let code = code.trim();
    if code.is_empty() || path.is_empty() {
        return Err(format!("expected CODE=PATH, got {raw:?}"));
    }
    Ok((code.to_string(), PathBuf::from(path)))
}
