//! Shared pipeline helpers for CLI commands.
//!
//! Contains the read-place-write step used by `place` and `run`, constraint
//! and parameter conversion, and diagnostic rendering.

use std::path::Path;

use ioplace_config::{ConstraintEntry, PlacementConfig};
use ioplace_diagnostics::{DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer};
use ioplace_ppl::{Constraint, PinPlacer, PlacementError, PlacementReport, PlacerParams};
use serde::Serialize;

use crate::{GlobalArgs, ReportFormat};

/// Inputs of one placement run.
pub struct PlaceJob<'a> {
    /// Technology LEF file.
    pub lef: &'a Path,
    /// Input DEF file.
    pub def: &'a Path,
    /// Output DEF file.
    pub output: &'a Path,
    /// Horizontal pin layers.
    pub hor_layers: &'a [String],
    /// Vertical pin layers.
    pub ver_layers: &'a [String],
    /// Randomized assignment.
    pub random: bool,
    /// Placement parameters.
    pub params: PlacerParams,
    /// Constraints in registration order.
    pub constraints: Vec<Constraint>,
}

/// Reads the technology and design, places the pins and writes the result.
///
/// Diagnostics are left in `sink` for the caller to render.
pub fn place_design(
    job: &PlaceJob<'_>,
    sink: &DiagnosticSink,
    global: &GlobalArgs,
) -> Result<PlacementReport, Box<dyn std::error::Error>> {
    let progress = global.progress();

    if progress {
        eprintln!("   Loading {}", job.lef.display());
    }
    let tech = ioplace_lef::read_lef(job.lef, sink)?;

    if progress {
        eprintln!("   Loading {}", job.def.display());
    }
    let mut design = ioplace_def::read_def(job.def, sink)?;

    let mut placer = PinPlacer::new(&tech, sink).with_params(job.params.clone());
    for constraint in &job.constraints {
        placer.add_constraint(constraint.clone());
    }
    let report = placer.place_pins(&mut design, job.hor_layers, job.ver_layers, job.random)?;

    if progress {
        if global.verbose {
            for group in &report.groups {
                eprintln!(
                    "   Group {}: {} pin(s) over {} free slot(s)",
                    group.constraint, group.pins, group.free_slots
                );
            }
        }
        eprintln!(
            "   Placed {} pins of {} (wirelength {})",
            report.placed_count(),
            report.design,
            report.wirelength
        );
        eprintln!("   Writing {}", job.output.display());
    }
    design.write_to_file(job.output)?;
    Ok(report)
}

/// Builds placement parameters from the `[placement]` config section.
pub fn placer_params(config: &PlacementConfig) -> PlacerParams {
    PlacerParams {
        seed: config.seed,
        corner_avoidance: config.corner_avoidance,
        min_distance: (config.min_distance > 0).then_some(config.min_distance),
        min_distance_in_tracks: config.min_distance_in_tracks,
        pin_extension: config.pin_extension,
    }
}

/// Parses command-line constraints. Pin list constraints are registered
/// before direction constraints so that a named pin is not captured by a
/// direction rule.
pub fn parse_constraints(
    directions: &[String],
    pin_lists: &[String],
) -> Result<Vec<Constraint>, PlacementError> {
    let mut constraints = Vec::with_capacity(directions.len() + pin_lists.len());
    for text in pin_lists {
        constraints.push(Constraint::parse_pins(text)?);
    }
    for text in directions {
        constraints.push(Constraint::parse(text)?);
    }
    Ok(constraints)
}

/// Converts `[[constraints]]` entries, keeping their order.
pub fn constraints_from_config(
    entries: &[ConstraintEntry],
) -> Result<Vec<Constraint>, PlacementError> {
    entries
        .iter()
        .map(|entry| {
            if entry.is_pin_list() {
                Constraint::parse_pins(&entry.to_arg())
            } else {
                Constraint::parse(&entry.to_arg())
            }
        })
        .collect()
}

/// Renders collected diagnostics to stderr in text mode. With `--quiet`
/// only errors are shown; in JSON mode nothing is printed here.
pub fn render_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs) {
    if global.format != ReportFormat::Text {
        return;
    }
    let renderer = TerminalRenderer::new(global.color);
    for diag in sink.diagnostics() {
        if global.quiet && diag.severity != Severity::Error {
            continue;
        }
        eprint!("{}", renderer.render(&diag));
    }
}

/// Prints the error and warning totals.
pub fn print_summary(sink: &DiagnosticSink, global: &GlobalArgs) {
    if global.progress() {
        eprintln!(
            "   Result: {} error(s), {} warning(s)",
            sink.error_count(),
            sink.warning_count()
        );
    }
}

/// Writes `value` as pretty-printed JSON, creating parent directories.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(value)? + "\n")?;
    Ok(())
}
