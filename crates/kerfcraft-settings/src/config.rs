//! Configuration for KerfCraft
//!
//! Configuration is organized into sections:
//! - Machine profile (colors and line widths per draw mode)
//! - Export options (offsets, DXF version, cut/etch/merge layer sets)
//! - Board rules (net class clearances, trace and via sizes)
//! - Output (directory and file name timestamp)
//!
//! Files are JSON or TOML, chosen by extension.

use kerfcraft_core::constants::{VIA_DRILL, VIA_SIZE};
use kerfcraft_core::MachineProfile;
use kerfcraft_export::{DxfOptions, DxfVersion, KicadOptions, PcbDxfOptions, SvgOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{SettingsError, SettingsResult};

const APP_DIR: &str = "kerfcraft";
const CONFIG_FILE: &str = "config.toml";

/// Offsets, DXF version and layer routing shared by every exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub offset_x: f64,
    pub offset_y: f64,
    pub dxf_version: DxfVersion,
    pub cut_layers: Vec<String>,
    pub etch_layers: Vec<String>,
    pub merge_layers: Vec<String>,
    pub include_traces_etch: bool,
    /// Overrides every SVG stroke width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg_line_width: Option<f64>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        let dxf = PcbDxfOptions::default();
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            dxf_version: dxf.version,
            cut_layers: dxf.cut_layers,
            etch_layers: dxf.etch_layers,
            merge_layers: dxf.merge_layers,
            include_traces_etch: dxf.include_traces_etch,
            svg_line_width: None,
        }
    }
}

/// Design rules of the generated layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub default_clearance: f64,
    pub default_linewidth: f64,
    pub power_clearance: f64,
    pub power_linewidth: f64,
    pub via_size: f64,
    pub via_drill: f64,
}

impl Default for BoardSettings {
    fn default() -> Self {
        let kicad = KicadOptions::default();
        Self {
            default_clearance: kicad.default_clearance,
            default_linewidth: kicad.default_linewidth,
            power_clearance: kicad.power_clearance,
            power_linewidth: kicad.power_linewidth,
            via_size: VIA_SIZE,
            via_drill: VIA_DRILL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: PathBuf,
    /// `chrono` format string prefixed to every output file name.
    pub timestamp_format: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            timestamp_format: "%Y%m%d_%H_%M_%S".to_string(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub machine: MachineProfile,
    pub export: ExportSettings,
    pub board: BoardSettings,
    pub output: OutputSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        _ => Err(SettingsError::UnsupportedFormat(
            path.display().to_string(),
        )),
    }
}

fn check_positive(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, format!("{} must be > 0", value)))
    }
}

fn check_finite(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, format!("{} is not finite", value)))
    }
}

impl Config {
    /// `<platform config dir>/kerfcraft/config.toml`.
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` when it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        for (key, mode) in [
            ("machine.cut", &self.machine.cut),
            ("machine.engrave", &self.machine.engrave),
            ("machine.raster", &self.machine.raster),
        ] {
            check_positive(&format!("{}.line_width", key), mode.line_width)?;
        }

        check_finite("export.offset_x", self.export.offset_x)?;
        check_finite("export.offset_y", self.export.offset_y)?;
        if let Some(width) = self.export.svg_line_width {
            check_positive("export.svg_line_width", width)?;
        }
        for (key, layers) in [
            ("export.cut_layers", &self.export.cut_layers),
            ("export.etch_layers", &self.export.etch_layers),
            ("export.merge_layers", &self.export.merge_layers),
        ] {
            if layers.iter().any(|l| l.trim().is_empty()) {
                return Err(SettingsError::invalid(key, "layer names must not be empty"));
            }
        }

        check_positive("board.default_clearance", self.board.default_clearance)?;
        check_positive("board.default_linewidth", self.board.default_linewidth)?;
        check_positive("board.power_clearance", self.board.power_clearance)?;
        check_positive("board.power_linewidth", self.board.power_linewidth)?;
        check_positive("board.via_size", self.board.via_size)?;
        check_positive("board.via_drill", self.board.via_drill)?;
        if self.board.via_drill >= self.board.via_size {
            return Err(SettingsError::invalid(
                "board.via_drill",
                format!(
                    "drill {} must be smaller than via size {}",
                    self.board.via_drill, self.board.via_size
                ),
            ));
        }

        if self.output.timestamp_format.is_empty() {
            return Err(SettingsError::invalid(
                "output.timestamp_format",
                "must not be empty",
            ));
        }
        Ok(())
    }

    pub fn svg_options(&self) -> SvgOptions {
        SvgOptions {
            offset_x: self.export.offset_x,
            offset_y: self.export.offset_y,
            line_width: self.export.svg_line_width,
        }
    }

    pub fn dxf_options(&self) -> DxfOptions {
        DxfOptions {
            offset_x: self.export.offset_x,
            offset_y: self.export.offset_y,
            version: self.export.dxf_version,
        }
    }

    pub fn pcb_dxf_options(&self) -> PcbDxfOptions {
        PcbDxfOptions {
            cut_layers: self.export.cut_layers.clone(),
            etch_layers: self.export.etch_layers.clone(),
            merge_layers: self.export.merge_layers.clone(),
            include_traces_etch: self.export.include_traces_etch,
            offset_x: self.export.offset_x,
            offset_y: self.export.offset_y,
            version: self.export.dxf_version,
        }
    }

    pub fn kicad_options(&self) -> KicadOptions {
        KicadOptions {
            offset_x: self.export.offset_x,
            offset_y: self.export.offset_y,
            default_clearance: self.board.default_clearance,
            default_linewidth: self.board.default_linewidth,
            power_clearance: self.board.power_clearance,
            power_linewidth: self.board.power_linewidth,
        }
    }
}
