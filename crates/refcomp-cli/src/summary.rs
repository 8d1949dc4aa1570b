use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use refcomp_cli::pipeline::CompareResult;
use refcomp_model::{Category, Journal, Membership};
use refcomp_report::UNDEFINED_METRIC;

pub fn print_summary(result: &CompareResult) {
    let summary = &result.summary;
    println!("Generated: {}", summary.generated_at);
    println!("Output: {}", result.output_dir.display());
    println!(
        "Gold records: {}  Journals: {}",
        result.gold_records, summary.journal_count
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Gold"),
        header_cell("Returned"),
        header_cell("TP"),
        header_cell("FP"),
        header_cell("FN"),
        header_cell("Precision"),
        header_cell("Recall"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for row in &summary.rows {
        let counts = &row.counts;
        table.add_row(vec![
            Cell::new(&row.display_name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(counts.gold_positives),
            Cell::new(counts.returned),
            count_cell(counts.true_positives, Color::Green),
            count_cell(counts.false_positives, Color::Red),
            count_cell(counts.false_negatives, Color::Yellow),
            metric_cell(&counts.precision),
            metric_cell(&counts.recall),
        ]);
    }
    println!("{table}");
    print_non_exact(result);
}

fn print_non_exact(result: &CompareResult) {
    if result.non_exact.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Journal"),
        header_cell("Returned venue"),
        header_cell("Records"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for unit in &result.non_exact {
        for (venue, count) in &unit.venues {
            table.add_row(vec![
                Cell::new(&unit.category),
                Cell::new(&unit.journal),
                Cell::new(venue).fg(Color::Yellow),
                Cell::new(count),
            ]);
        }
    }
    println!();
    println!("Non-exact journal names (not evaluated):");
    println!("{table}");
}

pub fn print_categories(categories: &[Category]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Name"),
        header_cell("Display name"),
        header_cell("Filter"),
        header_cell("Query"),
    ]);
    apply_table_style(&mut table);
    for category in categories {
        let filter = match category.membership {
            Membership::All => dim_cell("-"),
            Membership::Flag(_) => Cell::new("flagged"),
        };
        table.add_row(vec![
            Cell::new(&category.code),
            Cell::new(&category.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&category.display_name),
            filter,
            Cell::new(&category.query),
        ]);
    }
    println!("{table}");
}

pub fn print_journals(journals: &[Journal]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Journal"),
        header_cell("Source name"),
        header_cell("Prefix match"),
        header_cell("Triaged by"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for journal in journals {
        let prefix = if journal.prefix_match {
            Cell::new("yes").fg(Color::Green)
        } else {
            dim_cell("no")
        };
        table.add_row(vec![
            Cell::new(&journal.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&journal.source_name),
            prefix,
            journal
                .triaged_by
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn metric_cell(value: &str) -> Cell {
    if value == UNDEFINED_METRIC {
        dim_cell(value)
    } else {
        Cell::new(value).add_attribute(Attribute::Bold)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
