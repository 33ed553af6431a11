//! `ioplace diff`: golden-file comparison.

use std::path::Path;

use ioplace_diff::{diff_files, DiffOutcome};

use crate::{DiffArgs, GlobalArgs, ReportFormat};

/// Runs the `ioplace diff` command.
///
/// Returns exit code 0 when the files are identical, 1 otherwise.
pub fn run(args: &DiffArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let outcome = diff_files(&args.golden, &args.result)?;
    match global.format {
        ReportFormat::Text => report_outcome(&args.golden, &args.result, &outcome, global),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }
    Ok(if outcome.is_match() { 0 } else { 1 })
}

/// Prints a comparison result to stderr. A mismatch is printed even with
/// `--quiet`.
pub fn report_outcome(golden: &Path, result: &Path, outcome: &DiffOutcome, global: &GlobalArgs) {
    let Some(mismatch) = &outcome.mismatch else {
        if !global.quiet {
            eprintln!(
                "   Matched {} ({})",
                golden.display(),
                outcome.golden_hash.short()
            );
        }
        return;
    };
    eprintln!(
        "error: {} differs from {} at line {}",
        result.display(),
        golden.display(),
        mismatch.line
    );
    eprintln!(
        "  expected: {}",
        mismatch.expected.as_deref().unwrap_or("<end of file>")
    );
    eprintln!(
        "  actual:   {}",
        mismatch.actual.as_deref().unwrap_or("<end of file>")
    );
    eprintln!(
        "  hashes:   golden {} result {}",
        outcome.golden_hash.short(),
        outcome.result_hash.short()
    );
}
