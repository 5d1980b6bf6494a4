mod error;
mod models;
pub mod canvas;
pub mod geometry;
pub mod gradient;
pub mod icon;
pub mod render;

pub use error::IconError;
pub use models::*;

pub use canvas::DEFAULT_SUPERSAMPLE;
pub use gradient::Gradient;
pub use icon::generate_icon;
pub use render::{render, render_with, BackendKind, RenderBackend};
