use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use refcomp_ingest::{
    GoldColumns, IngestError, load_gold_table, load_journals, load_recorded_results,
};
use refcomp_model::IdentifierField::{Doi, Pubmed};
use refcomp_model::Identified;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

const GOLD: &str = "Jnum\tDOI\tpubmed\tjournal\tpgs\ttitle\tyear\tvol\tgo\tap\n\
J:1\t10.1/a\t111\tCell\t87-94\tFirst\t2017\t12\ttrue\tfalse\n\
# retired reference\n\
J:2\tnone\t222\tCell\t5\tSecond\t2017\t12\t\ttrue\n\
J:3\t\t\tGene\te1002\tThird\t2017\t3\tfalse\t\n";

#[test]
fn loads_gold_records_and_flags() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "gold.tsv", GOLD);
    let flags = vec!["go".to_string(), "ap".to_string()];

    let table = load_gold_table(&path, &GoldColumns::default(), &flags).expect("load gold");
    assert_eq!(table.len(), 3);

    let go = table.schema.id_of("go").expect("go flag");
    let ap = table.schema.id_of("ap").expect("ap flag");

    let first = &table.records[0];
    assert_eq!(first.accession.as_str(), "J:1");
    assert_eq!(first.identifier(Doi), Some("10.1/a"));
    assert_eq!(first.pages, "87-94");
    assert_eq!(first.volume, "12");
    assert!(first.is_flagged(go));
    assert!(!first.is_flagged(ap));

    let second = &table.records[1];
    assert_eq!(second.identifier(Doi), None);
    assert_eq!(second.identifier(Pubmed), Some("222"));
    assert!(!second.is_flagged(go));
    assert!(second.is_flagged(ap));

    let third = &table.records[2];
    assert_eq!(third.journal, "Gene");
    assert_eq!(third.identifier(Doi), None);
    assert_eq!(third.identifier(Pubmed), None);
}

#[test]
fn missing_flag_column_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "gold.tsv", GOLD);
    let flags = vec!["tumor".to_string()];

    let err = load_gold_table(&path, &GoldColumns::default(), &flags).unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn { column, .. } if column == "tumor"));
}

#[test]
fn invalid_flag_value_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "gold.tsv",
        "Jnum\tDOI\tpubmed\tjournal\tpgs\tgo\nJ:1\td1\t1\tCell\t1-2\tyes\n",
    );
    let flags = vec!["go".to_string()];

    let err = load_gold_table(&path, &GoldColumns::default(), &flags).unwrap_err();
    match err {
        IngestError::InvalidValue { field, value, line, .. } => {
            assert_eq!(field, "go");
            assert_eq!(value, "yes");
            assert_eq!(line, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn blank_accession_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "gold.tsv",
        "Jnum\tDOI\tpubmed\tjournal\tpgs\n\td1\t1\tCell\t1-2\n",
    );

    let err = load_gold_table(&path, &GoldColumns::default(), &[]).unwrap_err();
    assert!(matches!(err, IngestError::Record { line: 2, .. }));
}

#[test]
fn renamed_columns_are_honoured() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "gold.tsv",
        "acc\tdoi\tpmid\tvenue\tpages\nJ:9\td9\t9\tCell\t3-4\n",
    );
    let columns = GoldColumns {
        accession: "acc".to_string(),
        doi: "doi".to_string(),
        pubmed: "pmid".to_string(),
        journal: "venue".to_string(),
        pages: "pages".to_string(),
        ..GoldColumns::default()
    };

    let table = load_gold_table(&path, &columns, &[]).expect("load gold");
    assert_eq!(table.records[0].accession.as_str(), "J:9");
    assert_eq!(table.records[0].title, "");
}

#[test]
fn missing_file_is_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let err = load_journals(&dir.path().join("absent.tsv")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn loads_journals_with_optional_curator() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "journals.tsv",
        "MGI_Journal_Name\tSource_Name\tPrefix_Match\tTriagedBy\n\
Cell\tCell\tfalse\tjx\n\
# not yet triaged\n\
Methods Enzymol\tMethods in Enzymology\tTrue\n",
    );

    let journals = load_journals(&path).expect("load journals");
    assert_eq!(journals.len(), 2);
    assert!(journals[0].is_triaged());
    assert!(!journals[0].prefix_match);
    assert_eq!(journals[1].source_name, "Methods in Enzymology");
    assert!(journals[1].prefix_match);
    assert!(!journals[1].is_triaged());
}

#[test]
fn short_journal_row_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "journals.tsv", "a\tb\tc\nCell\tCell\n");

    let err = load_journals(&path).unwrap_err();
    assert!(matches!(err, IngestError::ShortRow { expected: 3, found: 2, .. }));
}

#[test]
fn loads_recorded_results() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "recorded.tsv",
        "category\tpubmed\tDOI\tjournal\tvolume\ttitle\n\
None_1\t111\t10.1/a\tCell\t12\tFirst\n\
GO_1\tnone\t10.1/b\tCell Reports\t4\tOther\n",
    );

    let results = load_recorded_results(&path).expect("load results");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].category, "None_1");
    assert_eq!(results[0].unit, None);
    let first = results[0].record.as_ref().expect("record");
    assert_eq!(first.identifier(Pubmed), Some("111"));
    let second = results[1].record.as_ref().expect("record");
    assert_eq!(second.journal, "Cell Reports");
    assert_eq!(second.identifier(Pubmed), None);
    assert_eq!(second.starting_page, "");
}

#[test]
fn recorded_rows_carry_unit_and_empty_queries() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "recorded.tsv",
        "category\tunit\tDOI\tjournal\ttitle\n\
None_1\tCell\td5\tCell Reports\tShared\n\
GO_1\tCell\t\t\t\n",
    );

    let results = load_recorded_results(&path).expect("load results");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].unit.as_deref(), Some("Cell"));
    assert_eq!(results[0].record.as_ref().map(|r| r.journal.as_str()), Some("Cell Reports"));
    assert_eq!(results[1].category, "GO_1");
    assert_eq!(results[1].unit.as_deref(), Some("Cell"));
    assert!(results[1].record.is_none());
}
