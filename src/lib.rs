//! # KerfCraft
//!
//! Laser cutting and PCB fabrication patterns built from primitive shapes,
//! exported as SVG previews, DXF cut/etch documents and KiCad layouts.
//!
//! ## Architecture
//!
//! KerfCraft is organized as a workspace with multiple crates:
//!
//! 1. **kerfcraft-core** - Points, draw styles, fabrication constants, errors
//! 2. **kerfcraft-designer** - Geometry kernel, `Pattern` and `PcbPattern`
//! 3. **kerfcraft-export** - SVG, DXF and KiCad writers, polygon merging
//! 4. **kerfcraft-settings** - JSON/TOML configuration
//! 5. **kerfcraft** - Demo binary that integrates all crates

pub mod demos;

pub use kerfcraft_core::{
    format_mm, mils_to_mm, DrawMode, DrawStyle, GeometryError, GeometryResult, MachineProfile,
    Point, Rgb,
};
pub use kerfcraft_designer::{
    validate_board, validate_pattern, FootprintKind, Kerf, NetClass, NetId, NetTable,
    Participation, Pattern, PcbPattern, ValidationReport,
};
pub use kerfcraft_export::{
    DxfExporter, DxfOptions, ExportError, ExportResult, KicadExporter, KicadOptions,
    PcbDxfOptions, SvgExporter, SvgOptions,
};
pub use kerfcraft_settings::{Config, SettingsError, SettingsResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
