//! Conformance test helpers for the ioplace toolchain.
//!
//! Provides the checked-in fixtures and a pipeline function that runs the
//! regression flow (read LEF, read DEF, register constraints, place pins,
//! write DEF) and returns structured results for assertion in integration
//! tests.

#![warn(missing_docs)]

use std::error::Error;
use std::path::{Path, PathBuf};

use ioplace_def::Design;
use ioplace_diagnostics::{Diagnostic, DiagnosticSink};
use ioplace_ppl::{Constraint, PinPlacer, PlacementReport, PlacerParams};

/// Technology fixture: three routing layers and two cells.
pub const TINY_LEF: &str = "tiny.lef";
/// Design fixture: two placed cells, three unplaced signal pins, one fixed
/// pin and one power pin.
pub const GCD_LIKE_DEF: &str = "gcd_like.def";
/// Expected output of the deterministic regression flow on [`GCD_LIKE_DEF`].
pub const GCD_LIKE_GOLDEN: &str = "gcd_like_min_cost.defok";
/// Expected output of the randomized regression flow on [`GCD_LIKE_DEF`]
/// with the default seed.
pub const GCD_LIKE_RANDOM_GOLDEN: &str = "gcd_like_random.defok";

/// Result of running the flow on a fixture.
pub struct FlowResult {
    /// The design after placement.
    pub design: Design,
    /// What the placer did.
    pub report: PlacementReport,
    /// All diagnostics emitted while reading and placing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Absolute path of a file in the fixture directory.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// The regression constraints: inputs on top, outputs on the bottom.
pub fn regression_constraints() -> Vec<Constraint> {
    ["INPUT:top:*", "OUTPUT:bottom:*"]
        .iter()
        .filter_map(|text| Constraint::parse(text).ok())
        .collect()
}

/// Reads the fixtures and places pins on `metal3` (horizontal) and `metal2`
/// (vertical).
pub fn place_fixture(
    constraints: &[Constraint],
    params: PlacerParams,
    random: bool,
) -> Result<FlowResult, Box<dyn Error>> {
    place_with_layers(constraints, params, random, &["metal3"], &["metal2"])
}

/// Reads the fixtures and places pins on the given layers.
pub fn place_with_layers(
    constraints: &[Constraint],
    params: PlacerParams,
    random: bool,
    hor_layers: &[&str],
    ver_layers: &[&str],
) -> Result<FlowResult, Box<dyn Error>> {
    let sink = DiagnosticSink::new();
    let tech = ioplace_lef::read_lef(&fixture(TINY_LEF), &sink)?;
    let mut design = ioplace_def::read_def(&fixture(GCD_LIKE_DEF), &sink)?;

    let mut placer = PinPlacer::new(&tech, &sink).with_params(params);
    for c in constraints {
        placer.add_constraint(c.clone());
    }
    let hor: Vec<String> = hor_layers.iter().map(|s| s.to_string()).collect();
    let ver: Vec<String> = ver_layers.iter().map(|s| s.to_string()).collect();
    let report = placer.place_pins(&mut design, &hor, &ver, random)?;

    Ok(FlowResult {
        design,
        report,
        diagnostics: sink.take_all(),
    })
}

/// Runs the regression flow and writes the result to `output`.
pub fn run_flow(output: &Path, random: bool, seed: u64) -> Result<FlowResult, Box<dyn Error>> {
    let params = PlacerParams {
        seed,
        ..PlacerParams::default()
    };
    let result = place_fixture(&regression_constraints(), params, random)?;
    result.design.write_to_file(output)?;
    Ok(result)
}
