//! High-level model API.
//!
//! - [`GenIFConfig`]: validated fit configuration
//! - [`GenIFModel`]: owned forest plus measure, with fit and score
//! - [`ForestRegistry`], [`ForestHandle`]: handle-based fit / score / release

mod config;
mod genif;
mod registry;

pub use config::GenIFConfig;
pub use genif::GenIFModel;
pub use registry::{ForestHandle, ForestRegistry};
