//! `ioplace run`: the configured regression flow.
//!
//! 1. Load `ioplace.toml` and resolve its paths
//! 2. Read the technology LEF and the design DEF
//! 3. Register the configured constraints
//! 4. Place the pins and write the output DEF
//! 5. Diff the output against the golden file, or bless it

use std::path::{Path, PathBuf};

use ioplace_config::{load_config, resolve_run, ResolvedRun};
use ioplace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use ioplace_diff::{bless, diff_files, DiffOutcome};
use ioplace_ppl::PlacementReport;

use crate::diff::report_outcome;
use crate::pipeline::{
    constraints_from_config, place_design, placer_params, print_summary, render_diagnostics,
    write_json, PlaceJob,
};
use crate::{GlobalArgs, ReportFormat, RunArgs};

const NO_GOLDEN: DiagnosticCode = DiagnosticCode::new(Category::Config, 1);

/// What a run produced besides diagnostics.
struct RunOutcome {
    run: ResolvedRun,
    report: PlacementReport,
    diff: Option<DiffOutcome>,
    blessed: bool,
}

/// Runs the `ioplace run` command.
///
/// Returns exit code 0 when the output matches the golden (or was blessed),
/// 1 on a mismatch or when any error diagnostic was reported.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config_path = args.config.clone().unwrap_or_else(|| PathBuf::from("."));
    let sink = DiagnosticSink::new();
    let result = execute(&config_path, args, &sink, global);
    render_diagnostics(&sink, global);
    let outcome = result?;

    if let Some(path) = &args.report {
        write_json(path, &outcome.report)?;
    }

    match global.format {
        ReportFormat::Text => {
            if let (Some(diff), Some(golden)) = (&outcome.diff, &outcome.run.golden) {
                report_outcome(golden, &outcome.run.output, diff, global);
            }
            if outcome.blessed && !global.quiet {
                if let Some(golden) = &outcome.run.golden {
                    eprintln!("   Blessed {}", golden.display());
                }
            }
            print_summary(&sink, global);
        }
        ReportFormat::Json => {
            let out = serde_json::json!({
                "diagnostics": sink.diagnostics(),
                "placement": outcome.report,
                "diff": outcome.diff,
                "blessed": outcome.blessed,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    let matched = outcome.diff.as_ref().map_or(true, DiffOutcome::is_match);
    Ok(if sink.has_errors() || !matched { 1 } else { 0 })
}

fn execute(
    config_path: &Path,
    args: &RunArgs,
    sink: &DiagnosticSink,
    global: &GlobalArgs,
) -> Result<RunOutcome, Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let base_dir = config_dir(config_path);
    let run = resolve_run(&config, &base_dir);

    if global.progress() {
        eprintln!(
            "   Running {} ({} constraint(s))",
            run.def.display(),
            config.constraints.len()
        );
    }

    let job = PlaceJob {
        lef: &run.lef,
        def: &run.def,
        output: &run.output,
        hor_layers: &run.placement.hor_layers,
        ver_layers: &run.placement.ver_layers,
        random: run.placement.random,
        params: placer_params(&run.placement),
        constraints: constraints_from_config(&run.constraints)?,
    };
    let report = place_design(&job, sink, global)?;

    let mut diff = None;
    let mut blessed = false;
    match (&run.golden, args.bless) {
        (Some(golden), true) => {
            bless(golden, &run.output)?;
            blessed = true;
        }
        (Some(golden), false) => diff = Some(diff_files(golden, &run.output)?),
        (None, true) => return Err("`--bless` needs `design.golden` in the configuration".into()),
        (None, false) => sink.emit(
            Diagnostic::note(NO_GOLDEN, "no golden file configured; output was not compared")
                .with_help("set `design.golden` in ioplace.toml"),
        ),
    }

    Ok(RunOutcome {
        run,
        report,
        diff,
        blessed,
    })
}

/// The directory relative config paths are resolved against.
fn config_dir(config_path: &Path) -> PathBuf {
    if config_path.is_dir() {
        return config_path.to_path_buf();
    }
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const LEF: &str = r#"
UNITS
  DATABASE MICRONS 1000 ;
END UNITS
LAYER metal2
  TYPE ROUTING ;
  DIRECTION VERTICAL ;
  PITCH 0.2 ;
  OFFSET 0.1 ;
  WIDTH 0.07 ;
END metal2
LAYER metal3
  TYPE ROUTING ;
  DIRECTION HORIZONTAL ;
  PITCH 0.2 ;
  OFFSET 0.1 ;
  WIDTH 0.07 ;
END metal3
END LIBRARY
"#;

    const DEF: &str = r#"
VERSION 5.8 ;
DESIGN small ;
UNITS DISTANCE MICRONS 1000 ;
DIEAREA ( 0 0 ) ( 4000 4000 ) ;
PINS 4 ;
    - a + NET a + DIRECTION INPUT + USE SIGNAL ;
    - b + NET b + DIRECTION INPUT + USE SIGNAL ;
    - y + NET y + DIRECTION OUTPUT + USE SIGNAL ;
    - z + NET z + DIRECTION OUTPUT + USE SIGNAL ;
END PINS
END DESIGN
"#;

    const CONFIG: &str = r#"
[design]
lef = "small.lef"
def = "small.def"
output = "results/small.def"
golden = "small.defok"

[placement]
hor_layers = "metal3"
ver_layers = "metal2"
random = true

[[constraints]]
direction = "INPUT"
region = "top:*"

[[constraints]]
direction = "OUTPUT"
region = "bottom:*"
"#;

    fn global() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            format: ReportFormat::Text,
        }
    }

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("small.lef"), LEF).unwrap();
        fs::write(dir.path().join("small.def"), DEF).unwrap();
        fs::write(dir.path().join("ioplace.toml"), CONFIG).unwrap();
        dir
    }

    fn args(dir: &Path, bless: bool) -> RunArgs {
        RunArgs {
            config: Some(dir.join("ioplace.toml")),
            bless,
            report: None,
        }
    }

    #[test]
    fn bless_then_match() {
        let dir = project();
        assert_eq!(run(&args(dir.path(), true), &global()).unwrap(), 0);
        assert!(dir.path().join("small.defok").is_file());
        assert_eq!(run(&args(dir.path(), false), &global()).unwrap(), 0);
    }

    #[test]
    fn edited_golden_mismatches() {
        let dir = project();
        run(&args(dir.path(), true), &global()).unwrap();
        let golden = dir.path().join("small.defok");
        let text = fs::read_to_string(&golden).unwrap().replace("DESIGN small", "DESIGN other");
        fs::write(&golden, text).unwrap();
        assert_eq!(run(&args(dir.path(), false), &global()).unwrap(), 1);
    }

    #[test]
    fn missing_golden_is_error() {
        let dir = project();
        assert!(run(&args(dir.path(), false), &global()).is_err());
    }

    #[test]
    fn report_is_written() {
        let dir = project();
        let report = dir.path().join("report.json");
        let args = RunArgs {
            report: Some(report.clone()),
            ..args(dir.path(), true)
        };
        run(&args, &global()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["mode"], "random");
        assert_eq!(json["seed"], 42);
        assert_eq!(json["pins"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn run_without_golden_notes_and_succeeds() {
        let dir = project();
        let config = CONFIG.replace("golden = \"small.defok\"\n", "");
        fs::write(dir.path().join("ioplace.toml"), config).unwrap();
        let sink = DiagnosticSink::new();
        let outcome = execute(
            &dir.path().join("ioplace.toml"),
            &args(dir.path(), false),
            &sink,
            &global(),
        )
        .unwrap();
        assert!(outcome.diff.is_none());
        assert_eq!(sink.diagnostics()[0].code, NO_GOLDEN);
        assert!(dir.path().join("results").join("small.def").is_file());
    }

    #[test]
    fn config_dir_forms() {
        assert_eq!(config_dir(Path::new("ioplace.toml")), PathBuf::from("."));
        assert_eq!(
            config_dir(Path::new("test/ioplace.toml")),
            PathBuf::from("test")
        );
    }
}
