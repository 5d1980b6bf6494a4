use std::process::ExitCode;

use vibeicon::config::{config_file_path, load_config};
use vibeicon::logger::{self, log_error, log_line};
use vibeicon::pipeline;

fn main() -> ExitCode {
    let cfg = load_config();
    logger::init(cfg.log_file.clone());
    log_line(&format!("vibeicon {} (config {})", env!("CARGO_PKG_VERSION"), config_file_path().display()));

    let summary = match pipeline::run(&cfg) {
        Ok(s) => s,
        Err(e) => {
            log_error("building iconset", &e);
            println!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    for (name, err) in &summary.report.failures {
        println!("❌ {}: {}", name, err);
    }
    for p in &summary.problems {
        println!("❌ {}", p);
    }
    if !summary.report.pruned.is_empty() {
        println!("Removed {} stale file(s) from {}", summary.report.pruned.len(), cfg.staging_dir.display());
    }
    if summary.iconset_removed {
        println!("Removed iconset {} after packing", cfg.staging_dir.display());
    } else {
        println!("Iconset written to {} ({} files)", cfg.staging_dir.display(), summary.report.written.len());
    }

    if !summary.succeeded() {
        println!("Skipped .icns packaging because the iconset is incomplete");
        return ExitCode::FAILURE;
    }
    for w in summary.warnings() {
        println!("⚠️ {}", w);
    }
    if summary.pack.as_ref().is_some_and(|p| p.is_packed()) {
        println!("✅ Icon created: {}", cfg.icns_output.display());
    }
    ExitCode::SUCCESS
}
