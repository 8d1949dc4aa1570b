use std::path::Path;

use anyhow::Result;
use tracing::info_span;

use refcomp_cli::config::{Config, Overrides};
use refcomp_cli::pipeline::{CompareResult, resolve_categories, resolve_journals, run_compare};

use crate::cli::{CompareArgs, SelectionArgs};
use crate::summary::{print_categories, print_journals};

fn load_config(path: &Path, overrides: &Overrides) -> Result<Config> {
    Config::load(path)?.apply(overrides)
}

pub fn run_compare_command(args: &CompareArgs) -> Result<CompareResult> {
    let config = load_config(&args.selection.config, &args.overrides())?;
    let span = info_span!("compare", config = %args.selection.config.display());
    let _guard = span.enter();
    run_compare(&config)
}

pub fn run_categories(args: &SelectionArgs) -> Result<()> {
    let config = load_config(&args.config, &args.overrides())?;
    print_categories(&resolve_categories(&config)?);
    Ok(())
}

pub fn run_journals(args: &SelectionArgs) -> Result<()> {
    let config = load_config(&args.config, &args.overrides())?;
    print_journals(&resolve_journals(&config)?);
    Ok(())
}
