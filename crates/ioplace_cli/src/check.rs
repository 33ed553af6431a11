//! `ioplace check`: verifies the pin placement of a written design.

use ioplace_def::Design;
use ioplace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use ioplace_lef::Technology;
use ioplace_ppl::check_placement;

use crate::pipeline::{parse_constraints, print_summary, render_diagnostics};
use crate::{CheckArgs, GlobalArgs, ReportFormat};

const UNKNOWN_PIN_LAYER: DiagnosticCode = DiagnosticCode::new(Category::Placement, 4);

/// Runs the `ioplace check` command.
///
/// Returns exit code 0 when the placement has no violations, 1 otherwise.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let constraints = parse_constraints(&args.constraints, &args.pin_constraints)?;
    let sink = DiagnosticSink::new();

    let tech = match &args.lef {
        Some(lef) => Some(ioplace_lef::read_lef(lef, &sink)?),
        None => None,
    };
    if global.progress() {
        eprintln!("   Checking {}", args.def.display());
    }
    let design = ioplace_def::read_def(&args.def, &sink)?;
    if let Some(tech) = &tech {
        check_pin_layers(&design, tech, &sink);
    }
    let violations = check_placement(&design, tech.as_ref(), &constraints, args.min_distance)?;

    render_diagnostics(&sink, global);
    match global.format {
        ReportFormat::Text => {
            for violation in &violations {
                eprintln!("error: {violation}");
            }
            if global.progress() {
                eprintln!("   Found {} violation(s)", violations.len());
            }
            print_summary(&sink, global);
        }
        ReportFormat::Json => {
            let out = serde_json::json!({
                "diagnostics": sink.diagnostics(),
                "violations": violations,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(if violations.is_empty() && !sink.has_errors() { 0 } else { 1 })
}

/// Reports placed pins whose shape is on a layer that is not a routing
/// layer of `tech`.
fn check_pin_layers(design: &Design, tech: &Technology, sink: &DiagnosticSink) {
    for pin in &design.pins {
        let Some(shape) = &pin.shape else { continue };
        if !tech.layer(&shape.layer).is_some_and(|l| l.is_routing()) {
            sink.emit(Diagnostic::error(
                UNKNOWN_PIN_LAYER,
                format!(
                    "pin `{}` is on `{}`, which is not a routing layer",
                    pin.name, shape.layer
                ),
            ));
        }
    }
}
