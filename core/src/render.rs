use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ColorType, ImageEncoder, RgbaImage};
use once_cell::sync::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::canvas::DEFAULT_SUPERSAMPLE;
use crate::error::IconError;
use crate::icon::generate_icon;
use crate::models::{RenderRequest, Style, MAX_ICON_SIZE};

/// Suffix of the sibling file a PNG is written to before it is renamed into place.
pub const PARTIAL_SUFFIX: &str = ".partial";

pub const DEFAULT_MASTER_SIZE: u32 = 1024;

/// Something that turns a pixel size into a finished icon raster.
pub trait RenderBackend: Send + Sync {
    fn name(&self) -> &'static str;
    fn render_rgba(&self, size: u32) -> Result<RgbaImage, IconError>;
}

/// Draws the icon from scratch at every requested size.
pub struct DirectBackend {
    style: Style,
    samples: u32,
}

impl DirectBackend {
    pub fn new(style: Style, samples: u32) -> Self {
        Self { style, samples }
    }
}

impl RenderBackend for DirectBackend {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn render_rgba(&self, size: u32) -> Result<RgbaImage, IconError> {
        generate_icon(size, &self.style, self.samples)
    }
}

/// Draws one master image and resamples it down (Lanczos3) for smaller sizes.
pub struct DownscaleBackend {
    style: Style,
    samples: u32,
    master_size: u32,
    master: OnceCell<RgbaImage>,
}

impl DownscaleBackend {
    pub fn new(style: Style, samples: u32, master_size: u32) -> Self {
        Self { style, samples, master_size, master: OnceCell::new() }
    }

    fn master(&self) -> Result<&RgbaImage, IconError> {
        self.master
            .get_or_try_init(|| generate_icon(self.master_size, &self.style, self.samples))
    }
}

impl RenderBackend for DownscaleBackend {
    fn name(&self) -> &'static str {
        "downscale"
    }

    fn render_rgba(&self, size: u32) -> Result<RgbaImage, IconError> {
        if size == 0 || size > MAX_ICON_SIZE {
            return Err(IconError::InvalidSize(size));
        }
        if size > self.master_size {
            return generate_icon(size, &self.style, self.samples);
        }
        let master = self.master()?;
        if size == self.master_size {
            return Ok(master.clone());
        }
        Ok(imageops::resize(master, size, size, FilterType::Lanczos3))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Direct,
    Downscale,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Direct => "direct",
            BackendKind::Downscale => "downscale",
        }
    }

    pub fn build(self, style: Style, samples: u32) -> Box<dyn RenderBackend> {
        match self {
            BackendKind::Direct => Box::new(DirectBackend::new(style, samples)),
            BackendKind::Downscale => Box::new(DownscaleBackend::new(style, samples, DEFAULT_MASTER_SIZE)),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(BackendKind::Direct),
            "downscale" => Ok(BackendKind::Downscale),
            other => Err(format!("unknown render backend '{}'", other)),
        }
    }
}

/// Render `request.size` with the built-in drawing and write the PNG.
pub fn render(request: &RenderRequest, style: &Style) -> Result<(), IconError> {
    render_with(&DirectBackend::new(style.clone(), DEFAULT_SUPERSAMPLE), request)
}

pub fn render_with(backend: &dyn RenderBackend, request: &RenderRequest) -> Result<(), IconError> {
    if request.size == 0 || request.size > MAX_ICON_SIZE {
        return Err(IconError::InvalidSize(request.size));
    }
    let img = backend.render_rgba(request.size)?;
    let bytes = encode_png(&img)?;
    write_atomic(&request.output_path, &bytes)
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, IconError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)?;
    Ok(buf)
}

pub fn partial_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    path.with_file_name(format!(".{}{}", name, PARTIAL_SUFFIX))
}

/// Write into a sibling temp file and rename it over `path`; on failure nothing is left behind.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), IconError> {
    let tmp = partial_path(path);
    if let Err(e) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(IconError::io(path, e));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(IconError::io(path, e));
    }
    Ok(())
}
