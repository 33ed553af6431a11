//! ioplace CLI: the command-line interface for the I/O pin placer.
//!
//! Provides `ioplace place` for one-off placement runs, `ioplace run` for the
//! configured regression flow (read, constrain, place, write, diff),
//! `ioplace diff` for golden comparison and `ioplace check` for verifying an
//! existing placement.

#![warn(missing_docs)]

mod check;
mod diff;
mod pipeline;
mod place;
mod run;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// ioplace: boundary I/O pin placement for DEF designs.
#[derive(Parser, Debug)]
#[command(name = "ioplace", version, about = "I/O pin placer")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print per-group placement detail.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Output format for diagnostics and results.
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Place the unplaced pins of a design and write the result.
    Place(PlaceArgs),
    /// Run the regression flow described by an `ioplace.toml`.
    Run(RunArgs),
    /// Compare a result file against a golden file.
    Diff(DiffArgs),
    /// Verify the pin placement of a design.
    Check(CheckArgs),
}

/// Arguments for the `ioplace place` subcommand.
#[derive(Parser, Debug)]
pub struct PlaceArgs {
    /// Technology LEF file.
    #[arg(long)]
    pub lef: PathBuf,

    /// Input DEF file.
    #[arg(long)]
    pub def: PathBuf,

    /// Output DEF file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Horizontal layers, hosting pins on the left and right edges.
    #[arg(long, num_args = 1..)]
    pub hor_layers: Vec<String>,

    /// Vertical layers, hosting pins on the bottom and top edges.
    #[arg(long, num_args = 1..)]
    pub ver_layers: Vec<String>,

    /// Shuffle pins with a seeded generator instead of minimizing wirelength.
    #[arg(long)]
    pub random: bool,

    /// Seed for `--random`.
    #[arg(long, default_value_t = ioplace_ppl::DEFAULT_SEED)]
    pub seed: u64,

    /// Direction constraints, e.g. `INPUT:top:*`.
    #[arg(long = "constraint", num_args = 1..)]
    pub constraints: Vec<String>,

    /// Pin list constraints, e.g. `clk,reset:left:10-40`.
    #[arg(long = "pin-constraint", num_args = 1..)]
    pub pin_constraints: Vec<String>,

    /// Corner keep-out in database units.
    #[arg(long, default_value_t = 0)]
    pub corner_avoidance: i64,

    /// Minimum distance between same-layer pins; 0 means one track pitch.
    #[arg(long, default_value_t = 0)]
    pub min_distance: i64,

    /// Interpret `--min-distance` as a number of tracks.
    #[arg(long)]
    pub min_distance_in_tracks: bool,

    /// Outward pin shape extension in database units.
    #[arg(long, default_value_t = 0)]
    pub pin_extension: i64,

    /// Write a JSON placement report to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Arguments for the `ioplace run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to `ioplace.toml` or the directory holding it.
    pub config: Option<PathBuf>,

    /// Overwrite the golden file with the result instead of diffing.
    #[arg(long)]
    pub bless: bool,

    /// Write a JSON placement report to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Arguments for the `ioplace diff` subcommand.
#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// The expected file.
    pub golden: PathBuf,

    /// The file to compare against it.
    pub result: PathBuf,
}

/// Arguments for the `ioplace check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Technology LEF file; when given, pin layers and layer spacing rules are
    /// checked against it.
    #[arg(long)]
    pub lef: Option<PathBuf>,

    /// DEF file to check.
    #[arg(long)]
    pub def: PathBuf,

    /// Direction constraints the placement must honor.
    #[arg(long = "constraint", num_args = 1..)]
    pub constraints: Vec<String>,

    /// Pin list constraints the placement must honor.
    #[arg(long = "pin-constraint", num_args = 1..)]
    pub pin_constraints: Vec<String>,

    /// Minimum distance between same-layer pins; 0 checks overlaps only.
    #[arg(long, default_value_t = 0)]
    pub min_distance: i64,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print per-group detail.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Output format.
    pub format: ReportFormat,
}

impl GlobalArgs {
    /// Whether progress lines go to stderr.
    pub fn progress(&self) -> bool {
        !self.quiet && self.format == ReportFormat::Text
    }
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        format: cli.format,
    };

    let result = match cli.command {
        Command::Place(ref args) => place::run(args, &global),
        Command::Run(ref args) => run::run(args, &global),
        Command::Diff(ref args) => diff::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
