use directories::ProjectDirs;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use vibeicon_core::{IconError, Style, MAX_ICON_SIZE};

use crate::logger::{log_error, log_line, log_warn};
use crate::models::{Config, DEFAULT_SIZES};

const LOCAL_CONFIG: &str = "vibeicon_config.txt";

pub fn config_file_path() -> PathBuf {
    ProjectDirs::from("com", "vibe", "vibeicon")
        .map(|d| d.config_dir().join(LOCAL_CONFIG))
        .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG))
}

pub fn read_config() -> Result<Config, io::Error> {
    // Per-user config dir first, then the working directory.
    let primary = config_file_path();
    let content = match fs::read_to_string(&primary) {
        Ok(s) => s,
        Err(_e) => fs::read_to_string(LOCAL_CONFIG)?,
    };
    Ok(parse_config(&content))
}

/// Like `read_config`, but a missing file just means defaults.
pub fn load_config() -> Config {
    match read_config() {
        Ok(cfg) => cfg,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Config::default(),
        Err(e) => {
            log_error("reading config", &e);
            Config::default()
        }
    }
}

fn parse_flag(v: &str, default: bool) -> bool {
    v.trim().parse::<u8>().map(|n| n != 0).unwrap_or(default)
}

fn opt_path(v: &str) -> Option<PathBuf> {
    let v = v.trim();
    if v.is_empty() { None } else { Some(PathBuf::from(v)) }
}

/// Comma-separated pixel sizes. Zero, negative and fractional entries are errors.
pub fn parse_sizes(v: &str) -> Result<Vec<u32>, String> {
    let mut sizes = Vec::new();
    for part in v.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.parse::<u32>() {
            Ok(0) => return Err("size 0 is not allowed".into()),
            Ok(n) if n > MAX_ICON_SIZE => return Err(format!("size {} exceeds the {} px limit", n, MAX_ICON_SIZE)),
            Ok(n) => sizes.push(n),
            Err(_) => return Err(format!("'{}' is not a positive integer size", part)),
        }
    }
    if sizes.is_empty() {
        return Err("no sizes given".into());
    }
    Ok(sizes)
}

pub fn parse_config(content: &str) -> Config {
    let mut cfg = Config::default();
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            match k.trim() {
                "staging_dir" => if let Some(p) = opt_path(v) { cfg.staging_dir = p },
                "icns_output" => if let Some(p) = opt_path(v) { cfg.icns_output = p },
                "assets_dir" => if let Some(p) = opt_path(v) { cfg.assets_dir = p },
                "packer" => if !v.trim().is_empty() { cfg.packer = v.trim().to_string() },
                "sizes" => match parse_sizes(v) {
                    Ok(s) => cfg.sizes = s,
                    Err(e) => {
                        log_warn(&format!("ignoring sizes={}: {}", v.trim(), e));
                        cfg.sizes = DEFAULT_SIZES.to_vec();
                    }
                },
                "retina" => cfg.retina = parse_flag(v, true),
                "keep_iconset" => cfg.keep_iconset = parse_flag(v, true),
                "parallel" => cfg.parallel = parse_flag(v, true),
                "backend" => match v.parse() {
                    Ok(b) => cfg.backend = b,
                    Err(e) => log_warn(&e),
                },
                "supersample" => {
                    cfg.supersample = v
                        .trim()
                        .parse::<u32>()
                        .unwrap_or(vibeicon_core::DEFAULT_SUPERSAMPLE)
                        .clamp(1, vibeicon_core::canvas::MAX_SUPERSAMPLE)
                }
                "style_file" => cfg.style_file = opt_path(v),
                "log_file" => cfg.log_file = opt_path(v),
                _ => {}
            }
        }
    }
    cfg
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut f = fs::File::create(path)?;
    let sizes: Vec<String> = cfg.sizes.iter().map(|s| s.to_string()).collect();
    writeln!(f, "staging_dir={}", cfg.staging_dir.display())?;
    writeln!(f, "icns_output={}", cfg.icns_output.display())?;
    writeln!(f, "assets_dir={}", cfg.assets_dir.display())?;
    writeln!(f, "packer={}", cfg.packer)?;
    writeln!(f, "sizes={}", sizes.join(","))?;
    writeln!(f, "retina={}", if cfg.retina { 1 } else { 0 })?;
    writeln!(f, "keep_iconset={}", if cfg.keep_iconset { 1 } else { 0 })?;
    writeln!(f, "parallel={}", if cfg.parallel { 1 } else { 0 })?;
    writeln!(f, "backend={}", cfg.backend.as_str())?;
    writeln!(f, "supersample={}", cfg.supersample)?;
    if let Some(p) = &cfg.style_file { writeln!(f, "style_file={}", p.display())?; }
    if let Some(p) = &cfg.log_file { writeln!(f, "log_file={}", p.display())?; }
    Ok(())
}

/// Built-in style unless the config points at a JSON override.
pub fn resolve_style(cfg: &Config) -> Result<Style, IconError> {
    match &cfg.style_file {
        Some(path) => {
            log_line(&format!("loading style from {}", path.display()));
            Style::from_json_file(path)
        }
        None => Ok(Style::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibeicon_core::BackendKind;

    #[test]
    fn empty_config_gives_defaults() {
        assert_eq!(parse_config(""), Config::default());
    }

    #[test]
    fn parses_known_keys_and_skips_the_rest() {
        let cfg = parse_config(
            "# comment\nstaging_dir = out/Vibe.iconset\nsizes=128, 256\nretina=0\nbackend=downscale\nsupersample=99\nbogus=1\nstyle_file=\n",
        );
        assert_eq!(cfg.staging_dir, PathBuf::from("out/Vibe.iconset"));
        assert_eq!(cfg.sizes, vec![128, 256]);
        assert!(!cfg.retina);
        assert_eq!(cfg.backend, BackendKind::Downscale);
        assert_eq!(cfg.supersample, 16);
        assert_eq!(cfg.style_file, None);
    }

    #[test]
    fn bad_sizes_fall_back_to_defaults() {
        assert!(parse_sizes("16,0").is_err());
        assert!(parse_sizes("16,32.5").is_err());
        assert!(parse_sizes("-16").is_err());
        assert!(parse_sizes(" , ").is_err());
        assert!(parse_sizes("16,4294967295").is_err());
        assert_eq!(parse_sizes(&MAX_ICON_SIZE.to_string()), Ok(vec![MAX_ICON_SIZE]));
        assert_eq!(parse_config("sizes=16,abc").sizes, DEFAULT_SIZES.to_vec());
    }

    #[test]
    fn save_then_read_back() {
        let dir = std::env::temp_dir().join(format!("vibeicon-config-{}", std::process::id()));
        let path = dir.join("vibeicon_config.txt");
        let mut cfg = Config::default();
        cfg.sizes = vec![32, 64];
        cfg.parallel = false;
        cfg.style_file = Some(PathBuf::from("style.json"));
        save_config(&cfg, &path).unwrap();
        let back = parse_config(&fs::read_to_string(&path).unwrap());
        assert_eq!(back, cfg);
        fs::remove_dir_all(dir).unwrap();
    }
}
