//! HTML pages: `index.html` with the run summary and one
//! `category_<name>.html` per category.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use tracing::info;

use crate::data::{CategoryDetail, Counts, JournalDetail, RunSummary};

pub const INDEX_FILE: &str = "index.html";

const DOI_URL: &str = "https://doi.org";

pub fn category_file_name(category: &str) -> String {
    format!("category_{category}.html")
}

const COUNT_HEADERS: [&str; 7] = [
    "Gold positives",
    "Returned",
    "True positives",
    "False positives",
    "False negatives",
    "Precision",
    "Recall",
];

fn start<W: Write>(xml: &mut Writer<W>, name: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end<W: Write>(xml: &mut Writer<W>, name: &str) -> Result<()> {
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write `<name>text</name>` on one line.
fn text_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    start(xml, name)?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    end(xml, name)
}

fn link<W: Write>(xml: &mut Writer<W>, href: &str, text: &str) -> Result<()> {
    let mut anchor = BytesStart::new("a");
    anchor.push_attribute(("href", href));
    xml.write_event(Event::Start(anchor))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    end(xml, "a")
}

fn linked_cell<W: Write>(xml: &mut Writer<W>, href: &str, text: &str) -> Result<()> {
    start(xml, "td")?;
    link(xml, href, text)?;
    end(xml, "td")
}

fn open_table<W: Write>(xml: &mut Writer<W>, headers: &[&str]) -> Result<()> {
    let mut table = BytesStart::new("table");
    table.push_attribute(("border", "1"));
    xml.write_event(Event::Start(table))?;
    start(xml, "tr")?;
    for header in headers {
        text_element(xml, "th", header)?;
    }
    end(xml, "tr")
}

fn count_cells<W: Write>(xml: &mut Writer<W>, counts: &Counts) -> Result<()> {
    for value in [
        counts.gold_positives.to_string(),
        counts.returned.to_string(),
        counts.true_positives.to_string(),
        counts.false_positives.to_string(),
        counts.false_negatives.to_string(),
        counts.precision.clone(),
        counts.recall.clone(),
    ] {
        text_element(xml, "td", &value)?;
    }
    Ok(())
}

fn open_page<W: Write>(xml: &mut Writer<W>, title: &str) -> Result<()> {
    start(xml, "html")?;
    start(xml, "head")?;
    text_element(xml, "title", title)?;
    end(xml, "head")?;
    start(xml, "body")?;
    text_element(xml, "h1", title)
}

fn close_page<W: Write>(xml: &mut Writer<W>) -> Result<()> {
    end(xml, "body")?;
    end(xml, "html")
}

fn finish(xml: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(xml.into_inner()).context("rendered page is not UTF-8")
}

/// Render the run summary page.
pub fn render_index(summary: &RunSummary) -> Result<String> {
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
    open_page(&mut xml, "Search comparison summary")?;
    text_element(
        &mut xml,
        "p",
        &format!(
            "Generated {}; {} journals",
            summary.generated_at, summary.journal_count
        ),
    )?;

    let mut headers = vec!["Category"];
    headers.extend(COUNT_HEADERS);
    open_table(&mut xml, &headers)?;
    for row in &summary.rows {
        start(&mut xml, "tr")?;
        linked_cell(&mut xml, &category_file_name(&row.category), &row.display_name)?;
        count_cells(&mut xml, &row.counts)?;
        end(&mut xml, "tr")?;
    }
    end(&mut xml, "table")?;

    for row in &summary.rows {
        text_element(&mut xml, "h2", &row.display_name)?;
        text_element(&mut xml, "pre", &row.query)?;
    }
    close_page(&mut xml)?;
    finish(xml)
}

fn journal_section<W: Write>(xml: &mut Writer<W>, journal: &JournalDetail) -> Result<()> {
    xml.write_event(Event::Empty(BytesStart::new("hr")))?;
    let heading = if journal.triaged_by.is_empty() {
        format!("{}; source: {}", journal.name, journal.source_name)
    } else {
        format!(
            "{} ({}); source: {}",
            journal.name, journal.triaged_by, journal.source_name
        )
    };
    text_element(xml, "h2", &heading)?;

    open_table(xml, &COUNT_HEADERS)?;
    start(xml, "tr")?;
    count_cells(xml, &journal.counts)?;
    end(xml, "tr")?;
    end(xml, "table")?;

    if journal.false_positive_total == 0 {
        text_element(xml, "p", "False positives: none")?;
    } else {
        text_element(
            xml,
            "p",
            &format!(
                "False positives: {} of {} (returned by the search but not in the gold standard)",
                journal.false_positives.len(),
                journal.false_positive_total
            ),
        )?;
        open_table(xml, &["DOI", "Title", "Type", "Reason"])?;
        for fp in &journal.false_positives {
            start(xml, "tr")?;
            if fp.doi.is_empty() {
                text_element(xml, "td", "")?;
            } else {
                linked_cell(xml, &format!("{DOI_URL}/{}", fp.doi), &fp.doi)?;
            }
            text_element(xml, "td", &fp.title)?;
            text_element(xml, "td", &fp.pub_type)?;
            text_element(xml, "td", &fp.reason)?;
            end(xml, "tr")?;
        }
        end(xml, "table")?;
    }

    if journal.false_negative_total == 0 {
        text_element(xml, "p", "False negatives: none")?;
    } else {
        text_element(
            xml,
            "p",
            &format!(
                "False negatives: {} of {} (in the gold standard but not returned by the search)",
                journal.false_negatives.len(),
                journal.false_negative_total
            ),
        )?;
        open_table(xml, &["Accession", "DOI", "Title", "Authors"])?;
        for gold in &journal.false_negatives {
            start(xml, "tr")?;
            text_element(xml, "td", &gold.accession)?;
            if gold.doi.is_empty() {
                text_element(xml, "td", "")?;
            } else {
                linked_cell(xml, &format!("{DOI_URL}/{}", gold.doi), &gold.doi)?;
            }
            text_element(xml, "td", &gold.title)?;
            text_element(xml, "td", &gold.authors)?;
            end(xml, "tr")?;
        }
        end(xml, "table")?;
    }
    Ok(())
}

/// Render one category's detail page.
pub fn render_category(detail: &CategoryDetail) -> Result<String> {
    let summary = &detail.summary;
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
    open_page(&mut xml, &format!("Category: {}", summary.display_name))?;

    start(&mut xml, "p")?;
    xml.write_event(Event::Text(BytesText::new(&format!(
        "{} journals; generated {} ",
        detail.journals.len(),
        detail.generated_at
    ))))?;
    link(&mut xml, INDEX_FILE, "back to index")?;
    end(&mut xml, "p")?;

    open_table(&mut xml, &COUNT_HEADERS)?;
    start(&mut xml, "tr")?;
    count_cells(&mut xml, &summary.counts)?;
    end(&mut xml, "tr")?;
    end(&mut xml, "table")?;
    text_element(&mut xml, "pre", &summary.query)?;

    for journal in &detail.journals {
        journal_section(&mut xml, journal)?;
    }
    close_page(&mut xml)?;
    finish(xml)
}

fn write_page(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}

/// Write the index and every category page into `dir`.
pub fn write_html_report(dir: &Path, summary: &RunSummary, details: &[CategoryDetail]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let mut written = Vec::with_capacity(details.len() + 1);

    let index = dir.join(INDEX_FILE);
    write_page(&index, &render_index(summary)?)?;
    info!(path = %index.display(), "wrote run summary");
    written.push(index);

    for detail in details {
        let path = dir.join(category_file_name(&detail.summary.category));
        write_page(&path, &render_category(detail)?)?;
        written.push(path);
    }
    info!(pages = details.len(), "wrote category pages");
    Ok(written)
}
