//! Error types for the export crate.

use kerfcraft_core::GeometryError;
use std::io;
use thiserror::Error;

/// Errors that can occur while exporting a pattern.
#[derive(Error, Debug)]
pub enum ExportError {
    /// A primitive could not be turned into output geometry.
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// I/O error while writing an output file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The DXF writer rejected a drawing.
    #[error("DXF error: {0}")]
    Dxf(#[from] dxf::DxfError),

    /// Text formatting failed.
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// An export option has an unusable value.
    #[error("Invalid export option '{name}': {reason}")]
    InvalidOption { name: String, reason: String },
}

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Rejects export offsets that would put NaN or infinities into a document.
pub(crate) fn check_offsets(offset_x: f64, offset_y: f64) -> ExportResult<()> {
    for (name, value) in [("offset_x", offset_x), ("offset_y", offset_y)] {
        if !value.is_finite() {
            return Err(ExportError::InvalidOption {
                name: name.to_string(),
                reason: format!("{} is not finite", value),
            });
        }
    }
    Ok(())
}
