use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;

use wellcorr::{
    core::store::PickStore,
    pick::PickKey,
    types::Uwi,
};

const WELLS: [&str; 4] = ["A-1", "B-2", "Torosa 1", "Poseidon North 1"];
const TOPS: [&str; 5] = ["Montara", "Plover", "Jamieson", "Top_X", "Vulcan"];

#[derive(Debug, Clone)]
struct Upsert {
    well: usize,
    top: usize,
    md: Option<f64>,
}

fn upsert_strategy() -> impl Strategy<Value = Upsert> {
    (
        0..WELLS.len(),
        0..TOPS.len(),
        prop_oneof![
            3 => (0.0f64..6000.0).prop_map(Some),
            1 => Just(None),
            1 => Just(Some(f64::NAN)),
        ],
    )
        .prop_map(|(well, top, md)| Upsert { well, top, md })
}

fn apply_all(ops: &[Upsert]) -> PickStore {
    let mut store = PickStore::new();
    for op in ops {
        store.upsert(WELLS[op.well], TOPS[op.top], op.md).expect("upsert");
    }
    store
}

proptest! {
    #[test]
    fn at_most_one_pick_per_well_and_top(ops in prop::collection::vec(upsert_strategy(), 0..120)) {
        let store = apply_all(&ops);
        let all = store.all();
        let keys: BTreeSet<PickKey> = all.iter().map(|p| p.key()).collect();
        prop_assert_eq!(keys.len(), all.len());
        prop_assert_eq!(store.len(), all.len());
    }

    #[test]
    fn last_write_wins(ops in prop::collection::vec(upsert_strategy(), 1..120)) {
        let store = apply_all(&ops);

        let mut expected: HashMap<PickKey, Option<f64>> = HashMap::new();
        for op in &ops {
            let md = op.md.filter(|d| d.is_finite());
            expected.insert(PickKey::new(WELLS[op.well], TOPS[op.top]), md);
        }

        prop_assert_eq!(expected.len(), store.len());
        for (key, md) in expected {
            let pick = store.get(&key.uwi, &key.top_name).expect("pick present");
            prop_assert_eq!(pick.md, md);
        }
    }

    #[test]
    fn version_counts_every_upsert(ops in prop::collection::vec(upsert_strategy(), 0..80)) {
        let store = apply_all(&ops);
        prop_assert_eq!(store.version(), ops.len() as u64);
    }

    #[test]
    fn top_registry_matches_stored_picks(ops in prop::collection::vec(upsert_strategy(), 0..120)) {
        let store = apply_all(&ops);
        let from_picks: BTreeSet<String> = store.all().into_iter().map(|p| p.top_name).collect();
        prop_assert_eq!(store.top_names(), from_picks);
    }

    #[test]
    fn for_well_is_a_partition(ops in prop::collection::vec(upsert_strategy(), 0..120)) {
        let store = apply_all(&ops);
        let mut total = 0;
        for raw in WELLS {
            let uwi = Uwi::new(raw);
            let picks = store.for_well(&uwi);
            prop_assert!(picks.iter().all(|p| p.uwi == uwi));
            total += picks.len();
        }
        prop_assert_eq!(total, store.len());
    }

    #[test]
    fn rows_rebuild_the_same_store(ops in prop::collection::vec(upsert_strategy(), 0..120)) {
        let store = apply_all(&ops);
        let rebuilt = PickStore::from_rows(store.to_rows()).expect("rebuild");
        prop_assert_eq!(rebuilt.all(), store.all());
    }

    #[test]
    fn uwi_spellings_collapse(raw in "[ \t]{0,2}[A-Z]{1,6}([ \t]{1,3}[A-Z0-9]{1,4}){0,3}[ \t]{0,2}") {
        let uwi = Uwi::new(&raw);
        prop_assert!(!uwi.as_str().contains(char::is_whitespace));
        prop_assert_eq!(Uwi::new(uwi.as_str()), uwi.clone());
        prop_assert_eq!(Uwi::new(uwi.as_str().replace('-', " ")), uwi);
    }
}
