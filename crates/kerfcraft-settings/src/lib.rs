//! KerfCraft Settings Crate
//!
//! Loads, validates and saves the configuration shared by the exporters and
//! the demo binary.

pub mod config;
pub mod error;

pub use config::{BoardSettings, Config, ExportSettings, OutputSettings};
pub use error::{SettingsError, SettingsResult};
