use proptest::prelude::*;
use tempfile::tempdir;

use wellcorr::{
    core::store::PickStore,
    persist::{self, PersistError, PickFormat, PickSink, sqlite::SqlitePickSink},
    pick::PickRow,
    types::Uwi,
};

fn sample_store() -> PickStore {
    let mut store = PickStore::new();
    store.upsert("Torosa 1", "Montara", Some(4012.5)).expect("upsert");
    store.upsert("Torosa 1", "Plover", None).expect("upsert");
    store.upsert("Poseidon-1", "Montara", Some(0.0)).expect("upsert");
    store.upsert("Poseidon-1", "Jamieson", Some(3950.0)).expect("upsert");
    store
}

#[test]
fn every_format_keeps_undefined_and_zero_depths() {
    let dir = tempdir().expect("tempdir");
    let store = sample_store();
    let rows = store.to_rows();

    for name in ["picks.csv", "picks.json", "picks.db"] {
        let path = dir.path().join(name);
        persist::save_rows(&path, &rows).expect("save");
        let loaded = persist::load_rows(&path).expect("load");
        let rebuilt = PickStore::from_rows(loaded).expect("rebuild");

        assert_eq!(rebuilt.all(), store.all(), "{name}");
        assert_eq!(
            rebuilt.get(&Uwi::new("Torosa-1"), "Plover").map(|p| p.md),
            Some(None),
            "{name}"
        );
        assert_eq!(
            rebuilt.get(&Uwi::new("Poseidon-1"), "Montara").map(|p| p.md),
            Some(Some(0.0)),
            "{name}"
        );
    }
}

#[test]
fn saving_replaces_the_previous_table() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("picks.sqlite");

    let mut sink = SqlitePickSink::open(&path).expect("open");
    sink.save(&sample_store().to_rows()).expect("first save");
    let second = vec![PickRow {
        uwi: Uwi::new("A-1"),
        pick: "Top_X".into(),
        md: Some(2500.0),
    }];
    sink.save(&second).expect("second save");

    assert_eq!(sink.load().expect("load"), second);
    assert_eq!(sink.save_count().expect("count"), 2);
    assert!(sink.last_saved_ms().expect("ts").is_some());
}

#[test]
fn csv_header_is_the_row_contract() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("picks.csv");
    persist::save_rows(&path, &sample_store().to_rows()).expect("save");

    let text = std::fs::read_to_string(&path).expect("read");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("UWI,PICK,MD"));
    let first = lines.next().expect("first row");
    let md = first.strip_prefix("Poseidon-1,Montara,").expect("row prefix");
    assert_eq!(md.parse::<f64>().expect("md"), 0.0);
    assert!(text.contains("Torosa-1,Plover,\n"));
}

#[test]
fn json_rows_use_column_names() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("picks.json");
    persist::save_rows(&path, &sample_store().to_rows()).expect("save");

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
    let first = &value[0];
    assert_eq!(first["UWI"], "Poseidon-1");
    assert_eq!(first["PICK"], "Montara");
    assert_eq!(first["MD"], 0.0);
    assert!(value[3]["MD"].is_null());
}

#[test]
fn unwritable_destination_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("picks.csv");
    let err = persist::save_rows(&path, &sample_store().to_rows()).unwrap_err();
    assert!(matches!(err, PersistError::Io(_)));
}

#[test]
fn rows_with_empty_uwi_are_rejected_on_load() {
    let rows = persist::csv::decode("UWI,PICK,MD\n  ,Montara,4000\n").expect("decode");
    assert!(PickStore::from_rows(rows).is_err());
}

#[test]
fn format_follows_extension() {
    use std::path::Path;
    assert_eq!(PickFormat::from_path(Path::new("a/picks.CSV")), PickFormat::Csv);
    assert_eq!(PickFormat::from_path(Path::new("picks.json")), PickFormat::Json);
    assert_eq!(PickFormat::from_path(Path::new("picks.sqlite3")), PickFormat::Sqlite);
    assert_eq!(PickFormat::from_path(Path::new("picks")), PickFormat::Csv);
}

#[test]
fn untrimmed_and_multiline_names_survive_every_format() {
    let dir = tempdir().expect("tempdir");
    let mut store = PickStore::new();
    store.upsert("A-1", " Top_X ", Some(1.0)).expect("upsert");
    store.upsert("A-1", "Line\nBreak", Some(2.0)).expect("upsert");
    store.upsert("A-1", "Plover, \"upper\"", None).expect("upsert");

    for name in ["picks.csv", "picks.json", "picks.db"] {
        let path = dir.path().join(name);
        persist::save_rows(&path, &store.to_rows()).expect("save");
        let rebuilt = PickStore::from_rows(persist::load_rows(&path).expect("load"))
            .expect("rebuild");
        assert_eq!(rebuilt.all(), store.all(), "{name}");
    }
}

fn row_strategy() -> impl Strategy<Value = (String, String, Option<f64>)> {
    (
        "[A-Z]{1,4}-[0-9]{1,2}",
        prop_oneof![
            3 => "[ -~]{0,12}",
            1 => "[ a-z,\"\n\r\té]{0,12}",
        ],
        // Quarter-metre depths are exact in every encoding.
        prop::option::of((0u32..40_000).prop_map(|q| f64::from(q) * 0.25)),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn any_stored_pick_survives_every_format(
        picks in prop::collection::vec(row_strategy(), 0..16)
    ) {
        let mut store = PickStore::new();
        for (uwi, top, md) in &picks {
            store.upsert(uwi.as_str(), top.as_str(), *md).expect("upsert");
        }

        let dir = tempdir().expect("tempdir");
        for name in ["picks.csv", "picks.json", "picks.db"] {
            let path = dir.path().join(name);
            persist::save_rows(&path, &store.to_rows()).expect("save");
            let loaded = persist::load_rows(&path).expect("load");
            let rebuilt = PickStore::from_rows(loaded).expect("rebuild");
            prop_assert_eq!(rebuilt.all(), store.all(), "{}", name);
        }
    }
}
