pub mod config;
pub mod iconset;
pub mod logger;
pub mod models;
pub mod packer;
pub mod pipeline;

pub use models::Config;
