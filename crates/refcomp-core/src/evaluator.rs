//! Per-unit classification of candidates against gold records.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt::Display;
use std::hash::Hash;

use refcomp_model::{
    Accession, CandidateRecord, GoldRecord, Identified, IdentifierField, MembershipTest,
    PrecisionRecall,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{CoreError, Result};
use crate::matcher::{GoldLookup, MatchOutcome, Matcher};

/// What to do when a gold record is matched by a second candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimPolicy {
    /// Abort with [`CoreError::AlreadyClaimed`].
    #[default]
    #[serde(rename = "fail")]
    FailFast,
    /// Count the candidate as a false positive and log a warning.
    Tolerate,
}

/// Why a candidate is a false positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FalsePositiveReason<'s> {
    NoIdentifierMatch,
    /// Matched a gold record that is not in the category.
    OutsideCategory(&'s GoldRecord),
    /// Matched a category member that belongs to another journal.
    OutsideUnit(&'s GoldRecord),
    /// Matched a gold record already paired with an earlier candidate.
    AlreadyClaimed(&'s GoldRecord),
}

impl FalsePositiveReason<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoIdentifierMatch => "no identifier match",
            Self::OutsideCategory(_) => "outside category",
            Self::OutsideUnit(_) => "outside journal",
            Self::AlreadyClaimed(_) => "already claimed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruePositive<'s> {
    /// Index into [`UnitResult::candidates`].
    pub candidate: usize,
    pub gold: &'s GoldRecord,
    pub via: IdentifierField,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FalsePositive<'s> {
    /// Index into [`UnitResult::candidates`].
    pub candidate: usize,
    pub reason: FalsePositiveReason<'s>,
}

/// Classification of one evaluation unit.
///
/// Every candidate is either a true or a false positive; every gold positive
/// is either paired with exactly one candidate or a false negative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitResult<'s> {
    /// Candidates in the order the source returned them.
    pub candidates: Vec<CandidateRecord>,
    pub true_positives: Vec<TruePositive<'s>>,
    pub false_positives: Vec<FalsePositive<'s>>,
    /// Unclaimed gold positives, in gold order.
    pub false_negatives: Vec<&'s GoldRecord>,
    pub stats: PrecisionRecall,
}

impl<'s> UnitResult<'s> {
    pub fn true_positive_pairs(&self) -> impl Iterator<Item = (&CandidateRecord, &'s GoldRecord)> + '_ {
        self.true_positives
            .iter()
            .map(|tp| (&self.candidates[tp.candidate], tp.gold))
    }

    pub fn false_positive_records(&self) -> impl Iterator<Item = (&CandidateRecord, FalsePositiveReason<'s>)> + '_ {
        self.false_positives
            .iter()
            .map(|fp| (&self.candidates[fp.candidate], fp.reason))
    }
}

/// Key of a gold record: its accession.
pub fn accession_key(gold: &GoldRecord) -> Accession {
    gold.accession.clone()
}

/// Human-readable identifier of a candidate for diagnostics.
pub fn describe_candidate(candidate: &CandidateRecord) -> String {
    IdentifierField::FALLBACK_ORDER
        .iter()
        .find_map(|&field| {
            candidate
                .identifier(field)
                .map(|value| format!("{field} {value}"))
        })
        .unwrap_or_else(|| format!("'{}' without identifiers", candidate.title))
}

/// Classifies the candidates of one unit.
///
/// The keying function must map each gold record of a unit to a distinct
/// key; a collision fails the unit with [`CoreError::DuplicateGoldKey`].
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<F = fn(&GoldRecord) -> Accession> {
    key: F,
    policy: ClaimPolicy,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(accession_key as fn(&GoldRecord) -> Accession, ClaimPolicy::default())
    }
}

impl Evaluator {
    /// Evaluator keyed by accession.
    pub fn by_accession(policy: ClaimPolicy) -> Self {
        Self::new(accession_key, policy)
    }
}

impl<F> Evaluator<F> {
    pub fn new(key: F, policy: ClaimPolicy) -> Self {
        Self { key, policy }
    }

    pub fn policy(&self) -> ClaimPolicy {
        self.policy
    }

    /// Classify `candidates` against the members of `category` among `golds`.
    ///
    /// `golds` are the gold records of the unit's journal. Only those admitted
    /// by the category are gold positives. Candidates are processed in order
    /// and the first one to match a gold positive claims it.
    pub fn evaluate<'s, K, L, M>(
        &self,
        candidates: Vec<CandidateRecord>,
        golds: impl IntoIterator<Item = &'s GoldRecord>,
        category: &M,
        matcher: &Matcher<'s, L>,
    ) -> Result<UnitResult<'s>>
    where
        F: Fn(&GoldRecord) -> K,
        K: Eq + Hash + Display,
        L: GoldLookup + ?Sized,
        M: MembershipTest + ?Sized,
    {
        let positives: Vec<&'s GoldRecord> = golds
            .into_iter()
            .filter(|&gold| matcher.in_category(gold, category))
            .collect();

        let mut positions: HashMap<K, usize> = HashMap::with_capacity(positives.len());
        for (idx, &gold) in positives.iter().enumerate() {
            match positions.entry((self.key)(gold)) {
                Entry::Occupied(entry) => {
                    return Err(CoreError::DuplicateGoldKey {
                        key: entry.key().to_string(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(idx);
                }
            }
        }
        let mut claimed = vec![false; positives.len()];

        let mut result = UnitResult::default();
        result.stats.add_gold_positives(positives.len());

        for (idx, candidate) in candidates.iter().enumerate() {
            result.stats.inc_returned();
            let outcome = matcher.match_candidate(candidate, category);
            trace!(
                candidate = %describe_candidate(candidate),
                gold = outcome.gold().map(|gold| gold.accession.as_str()),
                in_category = outcome.matched().is_some(),
                "candidate matched"
            );
            let reason = match outcome {
                MatchOutcome::Matched { gold, via } => {
                    match positions.get(&(self.key)(gold)).copied() {
                        Some(pos) if !claimed[pos] => {
                            claimed[pos] = true;
                            result.stats.inc_true_positives();
                            result.true_positives.push(TruePositive {
                                candidate: idx,
                                gold,
                                via,
                            });
                            continue;
                        }
                        Some(_) => self.already_claimed(gold, candidate)?,
                        None => FalsePositiveReason::OutsideUnit(gold),
                    }
                }
                MatchOutcome::OutsideCategory { gold, .. } => FalsePositiveReason::OutsideCategory(gold),
                MatchOutcome::NoMatch => FalsePositiveReason::NoIdentifierMatch,
            };
            result.false_positives.push(FalsePositive {
                candidate: idx,
                reason,
            });
        }

        result.false_negatives = positives
            .iter()
            .zip(&claimed)
            .filter(|&(_, &was_claimed)| !was_claimed)
            .map(|(&gold, _)| gold)
            .collect();
        result.candidates = candidates;

        debug!(
            returned = result.stats.returned,
            true_positives = result.stats.true_positives,
            gold_positives = result.stats.gold_positives,
            false_negatives = result.false_negatives.len(),
            "unit evaluated"
        );
        Ok(result)
    }

    fn already_claimed<'s>(
        &self,
        gold: &'s GoldRecord,
        candidate: &CandidateRecord,
    ) -> Result<FalsePositiveReason<'s>> {
        match self.policy {
            ClaimPolicy::FailFast => Err(CoreError::AlreadyClaimed {
                gold: gold.accession.to_string(),
                candidate: describe_candidate(candidate),
            }),
            ClaimPolicy::Tolerate => {
                warn!(
                    gold = %gold.accession,
                    candidate = %describe_candidate(candidate),
                    "gold record matched twice, counting later candidate as false positive"
                );
                Ok(FalsePositiveReason::AlreadyClaimed(gold))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use refcomp_model::Membership;

    use super::*;
    use crate::store::RecordStore;

    fn gold(acc: &str, doi: &str, journal: &str) -> GoldRecord {
        GoldRecord::new(Accession::new(acc).unwrap(), journal).with_doi(doi)
    }

    #[test]
    fn second_claim_fails_fast_by_default() {
        let store = RecordStore::build(vec![gold("J:1", "d1", "Cell")]).unwrap();
        let matcher = Matcher::new(&store);
        let candidates = vec![
            CandidateRecord::new("Cell").with_doi("d1"),
            CandidateRecord::new("Cell").with_doi("d1"),
        ];
        let err = Evaluator::default()
            .evaluate(candidates, store.records_in_group("Cell"), &Membership::All, &matcher)
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::AlreadyClaimed {
                gold: "J:1".to_string(),
                candidate: "DOI d1".to_string()
            }
        );
    }

    #[test]
    fn second_claim_is_false_positive_when_tolerated() {
        let store = RecordStore::build(vec![gold("J:1", "d1", "Cell")]).unwrap();
        let matcher = Matcher::new(&store);
        let candidates = vec![
            CandidateRecord::new("Cell").with_doi("d1"),
            CandidateRecord::new("Cell").with_doi("d1"),
        ];
        let result = Evaluator::by_accession(ClaimPolicy::Tolerate)
            .evaluate(candidates, store.records_in_group("Cell"), &Membership::All, &matcher)
            .unwrap();
        assert_eq!(result.true_positives.len(), 1);
        assert_eq!(result.true_positives[0].candidate, 0);
        assert_eq!(result.false_positives.len(), 1);
        assert!(matches!(
            result.false_positives[0].reason,
            FalsePositiveReason::AlreadyClaimed(g) if g.accession.as_str() == "J:1"
        ));
        assert_eq!(result.stats, PrecisionRecall::new(2, 1, 1));
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn every_candidate_is_traced() {
        let store = RecordStore::build(vec![gold("J:1", "d1", "Cell")]).unwrap();
        let matcher = Matcher::new(&store);
        let candidates = vec![
            CandidateRecord::new("Cell").with_doi("d1"),
            CandidateRecord::new("Cell").with_doi("d9"),
        ];
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            Evaluator::default()
                .evaluate(candidates, store.records_in_group("Cell"), &Membership::All, &matcher)
                .unwrap();
        });

        let text = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let traced: Vec<&str> = text.lines().filter(|l| l.contains("candidate matched")).collect();
        assert_eq!(traced.len(), 2, "{text}");
        assert!(traced[0].contains("DOI d1") && traced[0].contains("J:1"));
        assert!(traced[1].contains("DOI d9") && traced[1].contains("in_category=false"));
    }

    #[test]
    fn match_in_other_journal_is_outside_unit() {
        let store = RecordStore::build(vec![gold("J:1", "d1", "Cell"), gold("J:2", "d2", "Gene")]).unwrap();
        let matcher = Matcher::new(&store);
        let candidates = vec![CandidateRecord::new("Cell").with_doi("d2")];
        let result = Evaluator::default()
            .evaluate(candidates, store.records_in_group("Cell"), &Membership::All, &matcher)
            .unwrap();
        assert!(matches!(result.false_positives[0].reason, FalsePositiveReason::OutsideUnit(_)));
        assert_eq!(result.false_negatives.len(), 1);
    }

    #[test]
    fn colliding_keys_are_rejected() {
        let store = RecordStore::build(vec![gold("J:1", "d1", "Cell"), gold("J:2", "d2", "Cell")]).unwrap();
        let matcher = Matcher::new(&store);
        let evaluator = Evaluator::new(|g: &GoldRecord| g.journal.clone(), ClaimPolicy::FailFast);
        let err = evaluator
            .evaluate(Vec::new(), store.records_in_group("Cell"), &Membership::All, &matcher)
            .unwrap_err();
        assert_eq!(err, CoreError::DuplicateGoldKey { key: "Cell".to_string() });
    }

    #[test]
    fn describes_candidates_by_first_identifier() {
        let candidate = CandidateRecord::new("Cell").with_pubmed("42");
        assert_eq!(describe_candidate(&candidate), "pubmed 42");
        let bare = CandidateRecord::new("Cell").with_title("Editorial");
        assert_eq!(describe_candidate(&bare), "'Editorial' without identifiers");
    }
}
