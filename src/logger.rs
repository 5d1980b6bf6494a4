use chrono::Local;
use directories::ProjectDirs;
use once_cell::sync::OnceCell;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

static LOG_PATH: OnceCell<PathBuf> = OnceCell::new();

fn data_dir() -> PathBuf {
    ProjectDirs::from("com", "vibe", "vibeicon")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_log_path() -> PathBuf {
    data_dir().join("vibeicon.log")
}

/// Fix the log destination for this process. Later calls are ignored.
pub fn init(path: Option<PathBuf>) {
    let _ = LOG_PATH.set(path.unwrap_or_else(default_log_path));
}

pub fn log_path() -> PathBuf {
    LOG_PATH.get().cloned().unwrap_or_else(default_log_path)
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

pub fn log_line(line: &str) {
    let path = log_path();
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(f, "[{}] {}", timestamp(), line);
    }
}

pub fn log_warn(line: &str) {
    log_line(&format!("WARN: {}", line));
}

pub fn log_error(prefix: &str, e: &dyn std::error::Error) {
    log_line(&format!("ERROR: {}: {}", prefix, e));
}

pub fn log_command(program: &str, args: &[String]) {
    let joined = args.join(" ");
    log_line(&format!("RUN: {} {}", program, joined));
}
