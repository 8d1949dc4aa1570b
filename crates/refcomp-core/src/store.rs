//! In-memory indexed gold standard.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use refcomp_model::{Accession, GoldRecord, Identified, IdentifierField, identifier_value};
use tracing::{debug, info};

use crate::error::StoreError;

const ACCESSION_FIELD: &str = "accession";

/// Gold records indexed by identifier, accession and journal.
///
/// Identifier and accession values are unique; the journal index is
/// one-to-many. Built once and read-only afterwards.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<GoldRecord>,
    by_doi: HashMap<String, usize>,
    by_pubmed: HashMap<String, usize>,
    by_accession: HashMap<Accession, usize>,
    by_journal: HashMap<String, Vec<usize>>,
}

impl RecordStore {
    /// Derive page bounds and build every index.
    ///
    /// Fails on the first identifier or accession value shared by two records.
    pub fn build(records: Vec<GoldRecord>) -> Result<Self, StoreError> {
        let mut store = Self {
            records,
            ..Self::default()
        };
        for record in &mut store.records {
            record.derive_page_bounds();
        }

        for (idx, record) in store.records.iter().enumerate() {
            insert_unique(
                &mut store.by_accession,
                record.accession.clone(),
                idx,
                ACCESSION_FIELD,
            )?;
            for field in IdentifierField::FALLBACK_ORDER {
                if let Some(value) = record.identifier(field) {
                    let index = match field {
                        IdentifierField::Doi => &mut store.by_doi,
                        IdentifierField::Pubmed => &mut store.by_pubmed,
                    };
                    insert_unique(index, value.to_string(), idx, field.as_str())?;
                }
            }
            store
                .by_journal
                .entry(record.journal.clone())
                .or_default()
                .push(idx);
        }

        info!(
            records = store.records.len(),
            journals = store.by_journal.len(),
            "gold standard indexed"
        );
        debug!(
            doi = store.by_doi.len(),
            pubmed = store.by_pubmed.len(),
            "identifier index sizes"
        );
        Ok(store)
    }

    /// The record whose identifier `field` equals `value`.
    ///
    /// Absent values, blanks and the `none` placeholder never match.
    pub fn find_by_identifier(&self, field: IdentifierField, value: Option<&str>) -> Option<&GoldRecord> {
        let value = identifier_value(value?)?;
        let index = match field {
            IdentifierField::Doi => &self.by_doi,
            IdentifierField::Pubmed => &self.by_pubmed,
        };
        index.get(&value).map(|&idx| &self.records[idx])
    }

    pub fn find_by_accession(&self, accession: &Accession) -> Option<&GoldRecord> {
        self.by_accession.get(accession).map(|&idx| &self.records[idx])
    }

    /// Records whose journal equals `journal`, in load order.
    pub fn records_in_group(&self, journal: &str) -> Vec<&GoldRecord> {
        self.by_journal
            .get(journal)
            .map(|indices| indices.iter().map(|&idx| &self.records[idx]).collect())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GoldRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn insert_unique<K>(
    index: &mut HashMap<K, usize>,
    key: K,
    idx: usize,
    field: &'static str,
) -> Result<(), StoreError>
where
    K: std::hash::Hash + Eq + ToString,
{
    match index.entry(key) {
        Entry::Occupied(entry) => Err(StoreError::DuplicateKey {
            field,
            value: entry.key().to_string(),
        }),
        Entry::Vacant(entry) => {
            entry.insert(idx);
            Ok(())
        }
    }
}
