use std::fs;
use std::process::ExitCode;
use vibeicon::config::{load_config, resolve_style};
use vibeicon::logger::{self, log_error, log_line};
use vibeicon_core::{render_with, RenderRequest};

// Flat exports for places that want a plain PNG instead of an iconset.
const SIZES: [u32; 4] = [1024, 512, 256, 128];

fn main() -> ExitCode {
    let cfg = load_config();
    logger::init(cfg.log_file.clone());

    let style = match resolve_style(&cfg) {
        Ok(s) => s,
        Err(e) => {
            log_error("loading style", &e);
            println!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };
    let out_dir = &cfg.assets_dir;
    if let Err(e) = fs::create_dir_all(out_dir) {
        log_error("creating assets dir", &e);
        println!("❌ {}: {}", out_dir.display(), e);
        return ExitCode::FAILURE;
    }

    let backend = cfg.backend.build(style, cfg.supersample);
    let mut failed = false;
    for size in SIZES {
        let out = out_dir.join(format!("icon_{}.png", size));
        let res = RenderRequest::new(size, &out).and_then(|req| render_with(backend.as_ref(), &req));
        match res {
            Ok(()) => {
                log_line(&format!("wrote {}", out.display()));
                println!("Wrote {}", out.display());
            }
            Err(e) => {
                log_error(&format!("rendering {}", out.display()), &e);
                println!("❌ {}: {}", out.display(), e);
                failed = true;
            }
        }
    }
    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
