//! End-to-end regression flow tests.
//!
//! Read LEF, read DEF, constrain inputs to the top edge and outputs to the
//! bottom edge, place, write, and compare against the golden.

use std::fs;

use ioplace_common::{Edge, Point};
use ioplace_conformance::{
    fixture, place_fixture, regression_constraints, run_flow, GCD_LIKE_DEF, GCD_LIKE_GOLDEN,
    GCD_LIKE_RANDOM_GOLDEN, TINY_LEF,
};
use ioplace_diagnostics::DiagnosticSink;
use ioplace_diff::{diff_bytes, diff_files};
use ioplace_lef::Technology;
use ioplace_ppl::{check_placement, PlacementMode, PlacerParams, DEFAULT_SEED};

fn tiny_tech() -> Technology {
    ioplace_lef::read_lef(&fixture(TINY_LEF), &DiagnosticSink::new()).unwrap()
}

#[test]
fn fixtures_read_cleanly() {
    let sink = DiagnosticSink::new();
    let tech = ioplace_lef::read_lef(&fixture(TINY_LEF), &sink).unwrap();
    assert_eq!(tech.routing_layers().count(), 3);
    assert!(tech.macro_def("BUF_X1").is_some());

    let design = ioplace_def::read_def(&fixture(GCD_LIKE_DEF), &sink).unwrap();
    assert_eq!(design.pins.len(), 5);
    assert_eq!(design.unplaced_pins().count(), 3);
    assert!(sink.diagnostics().is_empty(), "{:?}", sink.diagnostics());
}

#[test]
fn unplaced_fixture_round_trips_byte_identical() {
    let sink = DiagnosticSink::new();
    let design = ioplace_def::read_def(&fixture(GCD_LIKE_DEF), &sink).unwrap();
    let original = fs::read_to_string(fixture(GCD_LIKE_DEF)).unwrap();
    assert_eq!(design.to_def_string(), original);
}

#[test]
fn min_cost_flow_matches_golden() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results").join("gcd_like.def");
    let result = run_flow(&output, false, 42).unwrap();
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let outcome = diff_files(&fixture(GCD_LIKE_GOLDEN), &output).unwrap();
    assert!(outcome.is_match(), "mismatch: {:?}", outcome.mismatch);
    assert_eq!(outcome.golden_hash, outcome.result_hash);
}

#[test]
fn min_cost_report() {
    let result = place_fixture(&regression_constraints(), PlacerParams::default(), false).unwrap();
    let report = &result.report;
    assert_eq!(report.mode, PlacementMode::MinCost);
    assert_eq!(report.seed, None);
    assert_eq!(report.placed_count(), 3);
    assert_eq!(report.blocked_slots, 1);
    assert_eq!(report.wirelength, 700 + 3100 + 900);

    let in0 = report.pin("in0").unwrap();
    assert_eq!(in0.edge, Edge::Top);
    assert_eq!(in0.layer, "metal2");
    assert_eq!(in0.location, Point::new(1100, 4000));
    assert_eq!(report.pin("out0").unwrap().location, Point::new(3100, 0));

    let groups: Vec<(&str, usize)> = report
        .groups
        .iter()
        .map(|g| (g.constraint.as_str(), g.pins))
        .collect();
    assert_eq!(groups, vec![("INPUT:top:*", 2), ("OUTPUT:bottom:*", 1)]);
}

#[test]
fn random_flow_matches_golden() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results").join("gcd_like.def");
    let result = run_flow(&output, true, DEFAULT_SEED).unwrap();
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let outcome = diff_files(&fixture(GCD_LIKE_RANDOM_GOLDEN), &output).unwrap();
    assert!(outcome.is_match(), "mismatch: {:?}", outcome.mismatch);

    let report = &result.report;
    assert_eq!(report.seed, Some(DEFAULT_SEED));
    assert_eq!(report.pin("in1").unwrap().location, Point::new(3900, 4000));
    assert_eq!(report.pin("in0").unwrap().location, Point::new(2100, 4000));
    assert_eq!(report.pin("out0").unwrap().location, Point::new(100, 0));
    assert_eq!(report.wirelength, 1700 + 3900 + 3900);
}

#[test]
fn random_flow_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.def");
    let second = dir.path().join("second.def");
    let a = run_flow(&first, true, 42).unwrap();
    let b = run_flow(&second, true, 42).unwrap();

    assert_eq!(a.report, b.report);
    assert_eq!(a.report.seed, Some(42));
    let outcome = diff_files(&first, &second).unwrap();
    assert!(outcome.is_match(), "mismatch: {:?}", outcome.mismatch);
}

#[test]
fn random_flow_honors_constraints() {
    let tech = tiny_tech();
    for seed in [1, 7, 42, 1234] {
        let params = PlacerParams {
            seed,
            ..PlacerParams::default()
        };
        let result = place_fixture(&regression_constraints(), params, true).unwrap();
        for pin in &result.report.pins {
            let expected = if pin.name.starts_with("in") {
                Edge::Top
            } else {
                Edge::Bottom
            };
            assert_eq!(pin.edge, expected, "seed {seed}: {}", pin.name);
            assert_eq!(pin.layer, "metal2");
        }
        let violations =
            check_placement(&result.design, Some(&tech), &regression_constraints(), 200).unwrap();
        assert!(violations.is_empty(), "seed {seed}: {violations:?}");
    }
}

#[test]
fn placed_pins_do_not_collide() {
    let params = PlacerParams {
        seed: 3,
        ..PlacerParams::default()
    };
    let result = place_fixture(&[], params, true).unwrap();
    assert_eq!(result.report.placed_count(), 3);
    let mut spots: Vec<(String, Point)> = result
        .design
        .pins
        .iter()
        .filter_map(|p| Some((p.shape.as_ref()?.layer.clone(), p.placement?.location)))
        .collect();
    let total = spots.len();
    spots.sort_by_key(|(layer, p)| (layer.clone(), p.x, p.y));
    spots.dedup();
    assert_eq!(spots.len(), total);
    let violations = check_placement(&result.design, Some(&tiny_tech()), &[], 200).unwrap();
    assert!(violations.is_empty(), "{violations:?}");
}

#[test]
fn edited_golden_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("gcd_like.def");
    run_flow(&output, false, 42).unwrap();

    let golden = fs::read_to_string(fixture(GCD_LIKE_GOLDEN))
        .unwrap()
        .replace("( 1100 4000 )", "( 1300 4000 )");
    let result = fs::read(&output).unwrap();
    let outcome = diff_bytes(golden.as_bytes(), &result);
    let mismatch = outcome.mismatch.unwrap();
    assert_eq!(
        mismatch.expected.as_deref(),
        Some("        + PLACED ( 1300 4000 ) S ;")
    );
    assert_eq!(
        mismatch.actual.as_deref(),
        Some("        + PLACED ( 1100 4000 ) S ;")
    );
    let line = golden
        .lines()
        .position(|l| l.contains("( 1300 4000 )"))
        .unwrap();
    assert_eq!(mismatch.line, line + 1);
}

#[test]
fn placed_output_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("gcd_like.def");
    run_flow(&output, true, 42).unwrap();

    let sink = DiagnosticSink::new();
    let design = ioplace_def::read_def(&output, &sink).unwrap();
    assert_eq!(design.unplaced_pins().count(), 0);
    assert!(!design.pin("VDD").unwrap().is_placed());
    assert_eq!(design.to_def_string(), fs::read_to_string(&output).unwrap());
}
