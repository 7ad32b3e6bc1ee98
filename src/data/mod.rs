//! Generation presets
//!
//! Run configurations live in external RON files so a level style can be
//! tuned without recompiling.

pub mod config;
pub mod loader;

pub use config::{default_presets, GenerationConfig, GridSettings};
pub use loader::{export_presets, load_config, load_or_default};
pub use crate::world::generation::GenerationMethod;
