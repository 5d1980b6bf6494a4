use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::logger::{log_command, log_line, log_warn};

/// Result of handing the staging directory to the external icon packer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackOutcome {
    Packed(PathBuf),
    /// The packer program is not installed; the PNGs are still usable.
    Unavailable(String),
    Failed(String),
}

impl PackOutcome {
    pub fn is_packed(&self) -> bool {
        matches!(self, PackOutcome::Packed(_))
    }

    /// Message for the user when packing did not happen. Never fatal.
    pub fn warning(&self) -> Option<String> {
        match self {
            PackOutcome::Packed(_) => None,
            PackOutcome::Unavailable(program) => Some(format!(
                "'{}' not found, skipped .icns packaging; the PNG iconset is still usable",
                program
            )),
            PackOutcome::Failed(msg) => Some(format!("could not create .icns file ({}), but the PNG iconset is still usable", msg)),
        }
    }
}

/// Run `<program> -c icns <iconset_dir> -o <output>`.
pub fn pack_iconset(program: &str, iconset_dir: &Path, output: &Path) -> PackOutcome {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(parent) {
                return PackOutcome::Failed(format!("{}: {}", parent.display(), e));
            }
        }
    }

    // An .icns left from an earlier run must not pass for this run's output.
    match fs::remove_file(output) {
        Ok(()) => log_line(&format!("removed previous {}", output.display())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return PackOutcome::Failed(format!("{}: {}", output.display(), e)),
    }

    let args: Vec<String> = vec![
        "-c".into(),
        "icns".into(),
        iconset_dir.to_string_lossy().to_string(),
        "-o".into(),
        output.to_string_lossy().to_string(),
    ];
    log_command(program, &args);

    let outcome = match Command::new(program).args(&args).output() {
        Err(e) if e.kind() == io::ErrorKind::NotFound => PackOutcome::Unavailable(program.to_string()),
        Err(e) => PackOutcome::Failed(format!("{}: {}", program, e)),
        Ok(out) if !out.status.success() => {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            PackOutcome::Failed(if stderr.is_empty() { format!("{} exited with {}", program, out.status) } else { stderr })
        }
        Ok(_) if !output.is_file() => PackOutcome::Failed(format!("{} reported success but wrote no {}", program, output.display())),
        Ok(_) => PackOutcome::Packed(output.to_path_buf()),
    };

    match &outcome {
        PackOutcome::Packed(p) => log_line(&format!("packed {}", p.display())),
        other => {
            if let Some(w) = other.warning() {
                log_warn(&w);
            }
        }
    }
    outcome
}
