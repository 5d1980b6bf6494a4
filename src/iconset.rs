use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use vibeicon_core::render::{encode_png, write_atomic, PARTIAL_SUFFIX};
use vibeicon_core::{IconError, RenderBackend, MAX_ICON_SIZE};

use crate::logger::{log_error, log_line, log_warn};

/// Largest base size that still gets an `@2x` companion.
pub const MAX_RETINA_BASE: u32 = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconsetEntry {
    pub file_name: String,
    pub pixels: u32,
}

pub fn file_name(size: u32, retina: bool) -> String {
    if retina {
        format!("icon_{size}x{size}@2x.png")
    } else {
        format!("icon_{size}x{size}.png")
    }
}

/// Every file the staging directory should hold for `sizes`, smallest first.
pub fn plan(sizes: &[u32], retina: bool) -> Result<Vec<IconsetEntry>, IconError> {
    let mut unique = BTreeSet::new();
    for &s in sizes {
        if s == 0 || s > MAX_ICON_SIZE {
            return Err(IconError::InvalidSize(s));
        }
        unique.insert(s);
    }
    let mut entries = Vec::new();
    for s in unique {
        entries.push(IconsetEntry { file_name: file_name(s, false), pixels: s });
        if retina && s <= MAX_RETINA_BASE {
            entries.push(IconsetEntry { file_name: file_name(s, true), pixels: s * 2 });
        }
    }
    Ok(entries)
}

#[derive(Debug, Default)]
pub struct BuildReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<(String, String)>,
    pub pruned: Vec<PathBuf>,
}

impl BuildReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

fn is_icon_png(name: &str) -> bool {
    name.starts_with("icon_") && name.ends_with(".png")
}

/// Remove icon files from earlier runs that the current plan no longer produces,
/// plus any half-written temp files.
pub fn prune_stale(dir: &Path, entries: &[IconsetEntry]) -> Result<Vec<PathBuf>, IconError> {
    let keep: BTreeSet<&str> = entries.iter().map(|e| e.file_name.as_str()).collect();
    let mut removed = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| IconError::io(dir, e))? {
        let entry = entry.map_err(|e| IconError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().to_string();
        let stale = (is_icon_png(&name) && !keep.contains(name.as_str()))
            || (name.starts_with('.') && name.ends_with(PARTIAL_SUFFIX));
        if !stale {
            continue;
        }
        let path = entry.path();
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(e) => log_error(&format!("removing stale {}", path.display()), &e),
        }
    }
    Ok(removed)
}

fn render_group(dir: &Path, pixels: u32, names: &[String], backend: &dyn RenderBackend) -> Vec<(String, Result<PathBuf, String>)> {
    let bytes = backend
        .render_rgba(pixels)
        .and_then(|img| encode_png(&img))
        .map_err(|e| format!("{}px render failed: {}", pixels, e));
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            let res = match &bytes {
                Ok(b) => write_atomic(&path, b).map(|_| path).map_err(|e| e.to_string()),
                Err(e) => Err(e.clone()),
            };
            (name.clone(), res)
        })
        .collect()
}

/// Render every planned file into `dir`. Each distinct pixel size is drawn once;
/// a failing size is recorded and the others still get written. Only an unusable
/// staging directory aborts the build.
pub fn build_iconset(
    dir: &Path,
    sizes: &[u32],
    retina: bool,
    parallel: bool,
    backend: &dyn RenderBackend,
) -> Result<BuildReport, IconError> {
    let entries = plan(sizes, retina)?;
    fs::create_dir_all(dir).map_err(|e| IconError::io(dir, e))?;
    let pruned = prune_stale(dir, &entries)?;

    let mut groups: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for e in &entries {
        groups.entry(e.pixels).or_default().push(e.file_name.clone());
    }
    let jobs: Vec<(u32, Vec<String>)> = groups.into_iter().collect();
    log_line(&format!(
        "rendering {} files ({} sizes) into {} with the {} backend",
        entries.len(),
        jobs.len(),
        dir.display(),
        backend.name()
    ));

    let results: Vec<_> = if parallel {
        jobs.par_iter().flat_map_iter(|(px, names)| render_group(dir, *px, names, backend)).collect()
    } else {
        jobs.iter().flat_map(|(px, names)| render_group(dir, *px, names, backend)).collect()
    };

    let mut report = BuildReport { pruned, ..Default::default() };
    for (name, res) in results {
        match res {
            Ok(path) => {
                log_line(&format!("wrote {}", path.display()));
                report.written.push(path);
            }
            Err(e) => {
                log_line(&format!("ERROR: rendering {}: {}", name, e));
                report.failures.push((name, e));
            }
        }
    }
    Ok(report)
}

/// Check that each planned file exists and has the pixel size its name promises.
pub fn verify(dir: &Path, entries: &[IconsetEntry]) -> Vec<String> {
    let mut problems = Vec::new();
    for e in entries {
        let path = dir.join(&e.file_name);
        match image::image_dimensions(&path) {
            Ok((w, h)) if w == e.pixels && h == e.pixels => {}
            Ok((w, h)) => problems.push(format!("{} is {}x{}, expected {}x{}", e.file_name, w, h, e.pixels, e.pixels)),
            Err(err) => problems.push(format!("{}: {}", e.file_name, err)),
        }
    }
    for p in &problems {
        log_warn(p);
    }
    problems
}
