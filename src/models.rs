use std::path::PathBuf;
use vibeicon_core::BackendKind;

pub const DEFAULT_SIZES: [u32; 7] = [16, 32, 64, 128, 256, 512, 1024];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub staging_dir: PathBuf,      // default icon.iconset
    pub icns_output: PathBuf,      // default inside the app bundle's Resources
    pub assets_dir: PathBuf,       // genicon output
    pub packer: String,            // default iconutil
    pub sizes: Vec<u32>,
    pub retina: bool,              // write @2x variants
    pub keep_iconset: bool,        // keep staging dir after a successful pack
    pub parallel: bool,
    pub backend: BackendKind,
    pub supersample: u32,          // samples per axis, 1..=16
    pub style_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from("icon.iconset"),
            icns_output: PathBuf::from("Vibe Transcribe.app/Contents/Resources/icon.icns"),
            assets_dir: PathBuf::from("assets"),
            packer: "iconutil".to_string(),
            sizes: DEFAULT_SIZES.to_vec(),
            retina: true,
            keep_iconset: true,
            parallel: true,
            backend: BackendKind::Direct,
            supersample: vibeicon_core::DEFAULT_SUPERSAMPLE,
            style_file: None,
            log_file: None,
        }
    }
}
