//! Property tests for unit classification and aggregation.

use std::collections::HashSet;

use proptest::prelude::*;

use refcomp_core::{Aggregator, ClaimPolicy, Evaluator, Matcher, RecordStore};
use refcomp_model::{
    Accession, CandidateRecord, FlagId, FlagSchema, GoldRecord, Membership, MembershipTest,
};

#[derive(Debug, Clone)]
struct GoldShape {
    has_doi: bool,
    has_pubmed: bool,
    flagged: bool,
}

#[derive(Debug, Clone)]
enum Pick {
    Doi(usize),
    Pubmed(usize),
    Unknown(u8),
}

fn gold_shapes() -> impl Strategy<Value = Vec<GoldShape>> {
    prop::collection::vec(
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(has_doi, has_pubmed, flagged)| {
            GoldShape {
                has_doi,
                has_pubmed,
                flagged,
            }
        }),
        0..12,
    )
}

fn picks() -> impl Strategy<Value = Vec<Pick>> {
    prop::collection::vec(
        prop_oneof![
            (0usize..16).prop_map(Pick::Doi),
            (0usize..16).prop_map(Pick::Pubmed),
            any::<u8>().prop_map(Pick::Unknown),
        ],
        0..24,
    )
}

fn flag() -> FlagId {
    FlagSchema::new(["flag"]).id_of("flag").expect("flag id")
}

fn build_golds(journal: &str, shapes: &[GoldShape]) -> Vec<GoldRecord> {
    shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            let mut gold = GoldRecord::new(
                Accession::new(format!("{journal}:{i}")).expect("accession"),
                journal,
            );
            if shape.has_doi {
                gold = gold.with_doi(&format!("{journal}/d{i}"));
            }
            if shape.has_pubmed {
                gold = gold.with_pubmed(&format!("{journal}/p{i}"));
            }
            if shape.flagged {
                gold = gold.with_flag(flag());
            }
            gold
        })
        .collect()
}

fn build_candidates(journal: &str, picks: &[Pick]) -> Vec<CandidateRecord> {
    picks
        .iter()
        .map(|pick| match pick {
            Pick::Doi(i) => CandidateRecord::new(journal).with_doi(&format!("{journal}/d{i}")),
            Pick::Pubmed(i) => CandidateRecord::new(journal).with_pubmed(&format!("{journal}/p{i}")),
            Pick::Unknown(k) => CandidateRecord::new(journal).with_doi(&format!("unknown/{k}")),
        })
        .collect()
}

fn membership(filtered: bool) -> Membership {
    if filtered {
        Membership::Flag(flag())
    } else {
        Membership::All
    }
}

proptest! {
    /// False negatives and claimed golds partition the gold positives.
    #[test]
    fn gold_positives_are_partitioned(shapes in gold_shapes(), picks in picks(), filtered in any::<bool>()) {
        let store = RecordStore::build(build_golds("A", &shapes)).expect("store");
        let membership = membership(filtered);
        let matcher = Matcher::new(&store);
        let result = Evaluator::by_accession(ClaimPolicy::Tolerate)
            .evaluate(build_candidates("A", &picks), store.records_in_group("A"), &membership, &matcher)
            .expect("evaluate");

        let initial: HashSet<&str> = store
            .records_in_group("A")
            .into_iter()
            .filter(|g| membership.admits(g))
            .map(|g| g.accession.as_str())
            .collect();
        let claimed: HashSet<&str> = result.true_positives.iter().map(|tp| tp.gold.accession.as_str()).collect();
        let missed: HashSet<&str> = result.false_negatives.iter().map(|g| g.accession.as_str()).collect();

        prop_assert!(claimed.is_disjoint(&missed));
        let union: HashSet<&str> = claimed.union(&missed).copied().collect();
        prop_assert_eq!(union, initial);
    }

    /// No gold record is paired twice.
    #[test]
    fn gold_claimed_at_most_once(shapes in gold_shapes(), picks in picks(), filtered in any::<bool>()) {
        let store = RecordStore::build(build_golds("A", &shapes)).expect("store");
        let membership = membership(filtered);
        let matcher = Matcher::new(&store);
        let result = Evaluator::by_accession(ClaimPolicy::Tolerate)
            .evaluate(build_candidates("A", &picks), store.records_in_group("A"), &membership, &matcher)
            .expect("evaluate");

        let mut seen = HashSet::new();
        for tp in &result.true_positives {
            prop_assert!(seen.insert(tp.gold.accession.clone()), "claimed twice: {}", tp.gold.accession);
        }
    }

    /// Counters agree with the classification.
    #[test]
    fn counters_match_classification(shapes in gold_shapes(), picks in picks(), filtered in any::<bool>()) {
        let store = RecordStore::build(build_golds("A", &shapes)).expect("store");
        let membership = membership(filtered);
        let matcher = Matcher::new(&store);
        let result = Evaluator::by_accession(ClaimPolicy::Tolerate)
            .evaluate(build_candidates("A", &picks), store.records_in_group("A"), &membership, &matcher)
            .expect("evaluate");

        let stats = result.stats;
        prop_assert_eq!(stats.returned, picks.len());
        prop_assert_eq!(stats.returned, result.true_positives.len() + result.false_positives.len());
        prop_assert_eq!(stats.gold_positives, result.true_positives.len() + result.false_negatives.len());
        prop_assert_eq!(stats.true_positives, result.true_positives.len());
    }

    /// Summing per-journal units equals one pass over the concatenation.
    #[test]
    fn aggregation_is_additive(
        shapes_a in gold_shapes(),
        shapes_b in gold_shapes(),
        picks_a in picks(),
        picks_b in picks(),
        filtered in any::<bool>(),
    ) {
        let mut golds = build_golds("A", &shapes_a);
        golds.extend(build_golds("B", &shapes_b));
        let store = RecordStore::build(golds).expect("store");
        let membership = membership(filtered);
        let matcher = Matcher::new(&store);
        let evaluator = Evaluator::by_accession(ClaimPolicy::Tolerate);

        let mut aggregator = Aggregator::new();
        for (journal, picks) in [("A", &picks_a), ("B", &picks_b)] {
            let result = evaluator
                .evaluate(build_candidates(journal, picks), store.records_in_group(journal), &membership, &matcher)
                .expect("evaluate");
            aggregator.record_unit("cat", journal, result).expect("record");
        }

        let mut all_candidates = build_candidates("A", &picks_a);
        all_candidates.extend(build_candidates("B", &picks_b));
        let combined = evaluator
            .evaluate(all_candidates, store.iter(), &membership, &matcher)
            .expect("evaluate combined");

        prop_assert_eq!(aggregator.category_totals("cat").expect("totals"), combined.stats);
        prop_assert_eq!(aggregator.grand_total(), combined.stats);
    }
}
