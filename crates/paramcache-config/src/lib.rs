//! # Paramcache Config
//!
//! Layered settings for paramcache: TOML files, `.env`, and environment
//! variables, with runtime reload.

mod loader;
mod settings;

pub use loader::*;
pub use settings::*;
