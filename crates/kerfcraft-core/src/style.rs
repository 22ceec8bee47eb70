//! Draw modes and the machine lookup table that turns a mode into a style.
//!
//! A style is a rendering hint only: it never changes geometry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Laser operation a primitive is drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    #[default]
    Cut,
    Engrave,
    Raster,
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cut => write!(f, "cut"),
            Self::Engrave => write!(f, "engrave"),
            Self::Raster => write!(f, "raster"),
        }
    }
}

impl FromStr for DrawMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cut" => Ok(Self::Cut),
            "engrave" => Ok(Self::Engrave),
            "raster" => Ok(Self::Raster),
            _ => Err(format!("Unknown draw mode: {}", s)),
        }
    }
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

impl fmt::Display for Rgb {
    /// SVG functional notation, `rgb(r,g,b)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.0, self.1, self.2)
    }
}

/// Resolved color and stroke width for one primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawStyle {
    pub mode: DrawMode,
    pub color: Rgb,
    /// Stroke width in millimeters.
    pub line_width: f64,
}

/// Per-mode color and line width of a cutter.
///
/// The default profile matches a Universal Laser Systems cutter, which picks
/// the operation from the stroke color and expects hairline (0.001") cuts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineProfile {
    pub name: String,
    pub cut: ModeStyle,
    pub engrave: ModeStyle,
    pub raster: ModeStyle,
}

/// Color/width entry of a [`MachineProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeStyle {
    pub color: Rgb,
    pub line_width: f64,
}

impl MachineProfile {
    pub fn laser_cutter() -> Self {
        Self {
            name: "Universal Laser Cutter".to_string(),
            cut: ModeStyle {
                color: Rgb::RED,
                line_width: 0.0254,
            },
            engrave: ModeStyle {
                color: Rgb::WHITE,
                line_width: 0.0254,
            },
            raster: ModeStyle {
                color: Rgb::WHITE,
                line_width: 1.0,
            },
        }
    }

    pub fn style(&self, mode: DrawMode) -> DrawStyle {
        let entry = match mode {
            DrawMode::Cut => self.cut,
            DrawMode::Engrave => self.engrave,
            DrawMode::Raster => self.raster,
        };
        DrawStyle {
            mode,
            color: entry.color,
            line_width: entry.line_width,
        }
    }
}

impl Default for MachineProfile {
    fn default() -> Self {
        Self::laser_cutter()
    }
}
