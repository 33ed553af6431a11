//! Path resolution: anchoring the configured files at the config directory.

use crate::types::{ConstraintEntry, PlacementConfig, RunConfig};
use std::path::{Path, PathBuf};

/// A run configuration with every path made relative to the working
/// directory instead of the configuration file.
#[derive(Debug, Clone)]
pub struct ResolvedRun {
    /// Technology LEF file.
    pub lef: PathBuf,
    /// Input DEF file.
    pub def: PathBuf,
    /// Output DEF file.
    pub output: PathBuf,
    /// Golden DEF file, if the run is a regression.
    pub golden: Option<PathBuf>,
    /// Placement layers and parameters.
    pub placement: PlacementConfig,
    /// Pin constraints in registration order.
    pub constraints: Vec<ConstraintEntry>,
}

/// Resolves the relative paths of `config` against `base_dir`, normally the
/// directory that holds the configuration file. Absolute paths are kept.
pub fn resolve_run(config: &RunConfig, base_dir: &Path) -> ResolvedRun {
    let anchor = |p: &str| {
        let p = Path::new(p);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            base_dir.join(p)
        }
    };
    ResolvedRun {
        lef: anchor(&config.design.lef),
        def: anchor(&config.design.def),
        output: anchor(&config.design.output),
        golden: config.design.golden.as_deref().map(anchor),
        placement: config.placement.clone(),
        constraints: config.constraints.clone(),
    }
}
