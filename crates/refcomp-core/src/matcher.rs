//! Candidate to gold record matching.

use refcomp_model::{GoldRecord, Identified, IdentifierField, MembershipTest};

use crate::store::RecordStore;

/// Identifier lookup over a gold collection.
pub trait GoldLookup {
    fn lookup(&self, field: IdentifierField, value: &str) -> Option<&GoldRecord>;
}

impl GoldLookup for RecordStore {
    fn lookup(&self, field: IdentifierField, value: &str) -> Option<&GoldRecord> {
        self.find_by_identifier(field, Some(value))
    }
}

/// Result of matching one candidate for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchOutcome<'s> {
    /// Identifier matched a gold record that belongs to the category.
    Matched {
        gold: &'s GoldRecord,
        via: IdentifierField,
    },
    /// Identifier matched, but the gold record is not in the category.
    OutsideCategory {
        gold: &'s GoldRecord,
        via: IdentifierField,
    },
    NoMatch,
}

impl<'s> MatchOutcome<'s> {
    pub fn matched(&self) -> Option<&'s GoldRecord> {
        match *self {
            Self::Matched { gold, .. } => Some(gold),
            Self::OutsideCategory { .. } | Self::NoMatch => None,
        }
    }

    /// Gold record the identifier hit, inside the category or not.
    pub fn gold(&self) -> Option<&'s GoldRecord> {
        match *self {
            Self::Matched { gold, .. } | Self::OutsideCategory { gold, .. } => Some(gold),
            Self::NoMatch => None,
        }
    }
}

/// Maps candidates to gold records by identifier with ordered fallback.
///
/// The first identifier scheme that finds a gold record decides the outcome;
/// later schemes are not tried even when the category test then fails.
#[derive(Debug)]
pub struct Matcher<'s, L: ?Sized = RecordStore> {
    lookup: &'s L,
    order: Vec<IdentifierField>,
}

impl<'s, L: GoldLookup + ?Sized> Matcher<'s, L> {
    pub fn new(lookup: &'s L) -> Self {
        Self {
            lookup,
            order: IdentifierField::FALLBACK_ORDER.to_vec(),
        }
    }

    pub fn with_order(mut self, order: Vec<IdentifierField>) -> Self {
        self.order = order;
        self
    }

    /// Category membership as the matcher applies it.
    pub fn in_category<M: MembershipTest + ?Sized>(&self, gold: &GoldRecord, category: &M) -> bool {
        category.admits(gold)
    }

    pub fn match_candidate<C, M>(&self, candidate: &C, category: &M) -> MatchOutcome<'s>
    where
        C: Identified + ?Sized,
        M: MembershipTest + ?Sized,
    {
        for &field in &self.order {
            let Some(value) = candidate.identifier(field) else {
                continue;
            };
            if let Some(gold) = self.lookup.lookup(field, value) {
                return if self.in_category(gold, category) {
                    MatchOutcome::Matched { gold, via: field }
                } else {
                    MatchOutcome::OutsideCategory { gold, via: field }
                };
            }
        }
        MatchOutcome::NoMatch
    }
}
