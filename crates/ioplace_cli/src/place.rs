//! `ioplace place`: one placement run driven entirely by flags.

use ioplace_diagnostics::DiagnosticSink;
use ioplace_ppl::PlacerParams;

use crate::pipeline::{
    parse_constraints, place_design, print_summary, render_diagnostics, write_json, PlaceJob,
};
use crate::{GlobalArgs, PlaceArgs, ReportFormat};

/// Runs the `ioplace place` command.
///
/// Returns exit code 0 when the pins were placed and written, 1 if any
/// error diagnostic was reported.
pub fn run(args: &PlaceArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let job = PlaceJob {
        lef: &args.lef,
        def: &args.def,
        output: &args.output,
        hor_layers: &args.hor_layers,
        ver_layers: &args.ver_layers,
        random: args.random,
        params: PlacerParams {
            seed: args.seed,
            corner_avoidance: args.corner_avoidance,
            min_distance: (args.min_distance > 0).then_some(args.min_distance),
            min_distance_in_tracks: args.min_distance_in_tracks,
            pin_extension: args.pin_extension,
        },
        constraints: parse_constraints(&args.constraints, &args.pin_constraints)?,
    };

    let sink = DiagnosticSink::new();
    let result = place_design(&job, &sink, global);
    render_diagnostics(&sink, global);
    let report = result?;

    if let Some(path) = &args.report {
        write_json(path, &report)?;
    }
    match global.format {
        ReportFormat::Text => print_summary(&sink, global),
        ReportFormat::Json => {
            let out = serde_json::json!({
                "diagnostics": sink.diagnostics(),
                "placement": report,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(if sink.has_errors() { 1 } else { 0 })
}
