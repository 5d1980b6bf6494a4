use std::fs;
use vibeicon_core::IconError;

use crate::config::resolve_style;
use crate::iconset::{build_iconset, plan, verify, BuildReport};
use crate::logger::{log_error, log_line, log_warn};
use crate::models::Config;
use crate::packer::{pack_iconset, PackOutcome};

#[derive(Debug)]
pub struct RunSummary {
    pub report: BuildReport,
    /// Files that were written but do not match their expected size.
    pub problems: Vec<String>,
    /// `None` when packing was skipped because the iconset is incomplete.
    pub pack: Option<PackOutcome>,
    /// The staging directory was deleted after a successful pack.
    pub iconset_removed: bool,
}

impl RunSummary {
    pub fn succeeded(&self) -> bool {
        self.report.is_complete() && self.problems.is_empty()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.pack.iter().filter_map(|p| p.warning()).collect()
    }
}

/// Render the configured size set into the staging directory, then pack it.
///
/// Errors only for things that stop the whole run: a bad style table, an
/// invalid size list or a staging directory that cannot be used.
pub fn run(cfg: &Config) -> Result<RunSummary, IconError> {
    let style = resolve_style(cfg)?;
    let entries = plan(&cfg.sizes, cfg.retina)?;
    let backend = cfg.backend.build(style, cfg.supersample);

    let report = build_iconset(&cfg.staging_dir, &cfg.sizes, cfg.retina, cfg.parallel, backend.as_ref())?;
    let problems = if report.is_complete() { verify(&cfg.staging_dir, &entries) } else { Vec::new() };

    let mut iconset_removed = false;
    let pack = if report.is_complete() && problems.is_empty() {
        let outcome = pack_iconset(&cfg.packer, &cfg.staging_dir, &cfg.icns_output);
        if outcome.is_packed() && !cfg.keep_iconset {
            match fs::remove_dir_all(&cfg.staging_dir) {
                Ok(()) => {
                    log_line(&format!("removed {}", cfg.staging_dir.display()));
                    iconset_removed = true;
                }
                Err(e) => log_error("removing iconset", &e),
            }
        }
        Some(outcome)
    } else {
        log_warn("iconset incomplete, skipping .icns packaging");
        None
    };

    Ok(RunSummary { report, problems, pack, iconset_removed })
}
