use std::{path::PathBuf, sync::Arc};

use wellcorr::{
    core::store::PickStore,
    protocol::{
        editor::{EditError, Outcome, PickEditor},
        event::EditEvent,
    },
    types::Uwi,
    well::{Curve, Well, WellSet},
};

fn curve(name: &str, top: f64) -> Curve {
    let basis: Vec<f64> = (0..11u32).map(|i| top + f64::from(i) * 50.0).collect();
    let values = basis.iter().map(|d| (d / 10.0) % 150.0).collect();
    Curve::new(name, values, basis).expect("curve")
}

fn wells() -> Arc<WellSet> {
    Arc::new(
        WellSet::new(vec![
            Well::new("A-1", "A-1", vec![curve("GR", 2300.0), curve("RD", 2300.0)]).expect("well"),
            Well::new("B-2", "B-2", vec![curve("DT", 3100.0), curve("NPHI", 3100.0)])
                .expect("well"),
        ])
        .expect("wells"),
    )
}

fn editor() -> PickEditor {
    PickEditor::new(wells(), PickStore::new())
}

#[test]
fn click_places_a_pick_on_the_active_well_only() {
    let mut ed = editor();
    ed.apply(EditEvent::WellSelected { uwi: Uwi::new("A-1") }).expect("select well");
    ed.apply(EditEvent::NewTopRequested { name: "Top_X".into() }).expect("new top");
    ed.apply(EditEvent::TopSelected { name: Some("Top_X".into()) }).expect("select top");
    let outcome = ed.apply(EditEvent::PlotClicked { depth: 2500.0 }).expect("click");

    assert!(matches!(outcome, Outcome::PickPlaced { md, .. } if md == 2500.0));
    let all = ed.store().all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].uwi, Uwi::new("A-1"));
    assert_eq!(all[0].top_name, "Top_X");
    assert_eq!(all[0].md, Some(2500.0));
    assert!(ed.store().for_well(&Uwi::new("B-2")).is_empty());
}

#[test]
fn new_top_is_placed_by_the_next_click() {
    let mut ed = editor();
    ed.apply(EditEvent::WellSelected { uwi: Uwi::new("A-1") }).expect("select well");
    ed.apply(EditEvent::NewTopRequested { name: "Top_X".into() }).expect("new top");
    let outcome = ed.apply(EditEvent::PlotClicked { depth: 2500.0 }).expect("click");

    assert!(matches!(outcome, Outcome::PickPlaced { .. }));
    let all = ed.store().all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].uwi, Uwi::new("A-1"));
    assert_eq!(all[0].top_name, "Top_X");
    assert_eq!(all[0].md, Some(2500.0));
    assert!(ed.store().for_well(&Uwi::new("B-2")).is_empty());
}

#[test]
fn existing_top_name_becomes_active_again() {
    let mut ed = editor();
    ed.apply(EditEvent::NewTopRequested { name: "Montara".into() }).expect("montara");
    ed.apply(EditEvent::NewTopRequested { name: "Plover".into() }).expect("plover");
    assert_eq!(ed.selection().active_top.as_deref(), Some("Plover"));

    let version = ed.store().version();
    ed.apply(EditEvent::NewTopRequested { name: "Montara".into() }).expect("again");
    assert_eq!(ed.selection().active_top.as_deref(), Some("Montara"));
    assert_eq!(ed.store().version(), version);

    ed.apply(EditEvent::TopSelected { name: None }).expect("clear");
    assert_eq!(
        ed.apply(EditEvent::PlotClicked { depth: 2500.0 }).expect("click"),
        Outcome::ClickIgnored
    );
}

#[test]
fn second_click_moves_the_pick() {
    let mut ed = editor();
    ed.apply(EditEvent::NewTopRequested { name: "Top_X".into() }).expect("new top");
    ed.apply(EditEvent::TopSelected { name: Some("Top_X".into()) }).expect("select top");
    ed.apply(EditEvent::PlotClicked { depth: 2500.0 }).expect("click");
    ed.apply(EditEvent::PlotClicked { depth: 2612.5 }).expect("click again");

    let picks = ed.store().for_well(&Uwi::new("A-1"));
    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0].md, Some(2612.5));
}

#[test]
fn repeated_new_top_registers_one_name() {
    let mut ed = editor();
    let first = ed.apply(EditEvent::NewTopRequested { name: "Top_X".into() }).expect("first");
    let second = ed.apply(EditEvent::NewTopRequested { name: " Top_X ".into() }).expect("second");

    assert!(matches!(first, Outcome::TopCreated { .. }));
    assert_eq!(second, Outcome::TopExists { top_name: "Top_X".into() });
    assert_eq!(ed.store().top_names().len(), 1);
    assert_eq!(ed.store().len(), 1);
    assert_eq!(ed.selection().active_top.as_deref(), Some("Top_X"));
}

#[test]
fn new_top_is_placeholder_on_active_well() {
    let mut ed = editor();
    ed.apply(EditEvent::WellSelected { uwi: Uwi::new("B-2") }).expect("select");
    ed.apply(EditEvent::NewTopRequested { name: "Plover".into() }).expect("new top");

    let pick = ed.store().get(&Uwi::new("B-2"), "Plover").expect("placeholder");
    assert_eq!(pick.md, None);
    assert!(ed.store().for_well(&Uwi::new("A-1")).is_empty());
}

#[test]
fn untrimmed_top_request_stores_trimmed_name() {
    let mut ed = editor();
    ed.apply(EditEvent::NewTopRequested { name: "  Top_X\t".into() }).expect("new top");
    assert_eq!(ed.store().top_names().into_iter().collect::<Vec<_>>(), vec!["Top_X"]);
}

#[test]
fn click_without_active_top_changes_nothing() {
    let mut ed = editor();
    let before = ed.store().version();
    let outcome = ed.apply(EditEvent::PlotClicked { depth: 2500.0 }).expect("click");

    assert_eq!(outcome, Outcome::ClickIgnored);
    assert!(ed.store().is_empty());
    assert_eq!(ed.store().version(), before);
}

#[test]
fn rejected_events_leave_state_untouched() {
    let mut ed = editor();
    ed.apply(EditEvent::NewTopRequested { name: "Top_X".into() }).expect("new top");
    ed.apply(EditEvent::TopSelected { name: Some("Top_X".into()) }).expect("select top");
    let store_before = ed.store().snapshot();
    let selection_before = ed.selection().clone();

    let rejected = [
        (
            EditEvent::WellSelected { uwi: Uwi::new("Z-9") },
            EditError::UnknownWell(Uwi::new("Z-9")),
        ),
        (
            EditEvent::CurveSelected { name: "DT".into() },
            EditError::UnknownCurve {
                uwi: Uwi::new("A-1"),
                curve: "DT".into(),
            },
        ),
        (
            EditEvent::TopSelected { name: Some("Nope".into()) },
            EditError::UnknownTop("Nope".into()),
        ),
        (
            EditEvent::NewTopRequested { name: "   ".into() },
            EditError::EmptyTopName,
        ),
        (
            EditEvent::SaveRequested { path: PathBuf::new() },
            EditError::EmptyPath,
        ),
    ];
    for (event, expected) in rejected {
        assert_eq!(ed.apply(event).unwrap_err(), expected);
    }
    assert!(matches!(
        ed.apply(EditEvent::PlotClicked { depth: f64::NAN }),
        Err(EditError::InvalidDepth(_))
    ));

    assert_eq!(ed.store().snapshot(), store_before);
    assert_eq!(ed.selection(), &selection_before);
}

#[test]
fn well_change_resets_curve_to_default() {
    let mut ed = editor();
    assert_eq!(ed.selection().active_curve.as_deref(), Some("GR"));
    ed.apply(EditEvent::CurveSelected { name: "RD".into() }).expect("curve");

    let outcome = ed.apply(EditEvent::WellSelected { uwi: Uwi::new("B-2") }).expect("well");
    // B-2 has no GR, so the first curve by name is used.
    assert_eq!(
        outcome,
        Outcome::WellChanged {
            uwi: Uwi::new("B-2"),
            curves: vec!["DT".into(), "NPHI".into()],
            active_curve: Some("DT".into()),
        }
    );
    assert_eq!(ed.active_curves(), vec!["DT".to_string(), "NPHI".to_string()]);
}

#[test]
fn well_selection_accepts_unnormalized_identifier() {
    let mut ed = editor();
    ed.apply(EditEvent::WellSelected { uwi: Uwi::new("  B   2 ") }).expect("select");
    assert_eq!(ed.selection().active_well, Uwi::new("B-2"));
}

#[test]
fn active_top_is_kept_across_well_changes() {
    let mut ed = editor();
    ed.apply(EditEvent::NewTopRequested { name: "Top_X".into() }).expect("new top");
    ed.apply(EditEvent::TopSelected { name: Some("Top_X".into()) }).expect("select top");
    ed.apply(EditEvent::WellSelected { uwi: Uwi::new("B-2") }).expect("well");
    ed.apply(EditEvent::PlotClicked { depth: 3300.0 }).expect("click");

    assert_eq!(ed.store().get(&Uwi::new("B-2"), "Top_X").and_then(|p| p.md), Some(3300.0));
    assert_eq!(ed.store().get(&Uwi::new("A-1"), "Top_X").and_then(|p| p.md), None);
}

#[test]
fn save_request_resolves_under_save_dir() {
    let mut ed = editor().with_save_dir("data/updates");
    ed.apply(EditEvent::NewTopRequested { name: "Top_X".into() }).expect("new top");

    let Outcome::SaveQueued(job) = ed
        .apply(EditEvent::SaveRequested { path: "picks.csv".into() })
        .expect("save")
    else {
        panic!("expected a queued save");
    };
    assert_eq!(job.path, PathBuf::from("data/updates/picks.csv"));
    assert_eq!(job.rows.len(), 1);
    assert_eq!(job.version, ed.store().version());

    let abs = std::env::temp_dir().join("picks.json");
    let Outcome::SaveQueued(job) = ed
        .apply(EditEvent::SaveRequested { path: abs.clone() })
        .expect("save")
    else {
        panic!("expected a queued save");
    };
    assert_eq!(job.path, abs);
}

#[test]
fn events_replay_from_json_lines() {
    let script = r#"
{"event":"well_selected","uwi":"A 1"}
{"event":"new_top_requested","name":"Montara"}
{"event":"top_selected","name":"Montara"}
{"event":"plot_clicked","depth":2450.0}
{"event":"top_selected"}
{"event":"plot_clicked","depth":2600.0}
"#;
    let mut ed = editor();
    for line in script.lines().filter(|l| !l.trim().is_empty()) {
        let event: EditEvent = serde_json::from_str(line).expect("event json");
        ed.apply(event).expect("apply");
    }
    assert_eq!(ed.selection().active_top, None);
    assert_eq!(
        ed.store().get(&Uwi::new("A-1"), "Montara").and_then(|p| p.md),
        Some(2450.0)
    );
}
