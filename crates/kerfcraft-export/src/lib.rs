//! # KerfCraft Export
//!
//! Writers for laser patterns and boards:
//!
//! - **SVG**: stroke preview of any [`StrokeSource`]
//! - **DXF**: one document for a [`Pattern`](kerfcraft_designer::Pattern),
//!   a cut and an etch document for a
//!   [`PcbPattern`](kerfcraft_designer::PcbPattern)
//! - **KiCad**: `.kicad_pcb` layout text
//!
//! Overlapping copper on merge layers is unioned by [`merge`] before it
//! reaches the DXF documents.

pub mod dxf_export;
pub mod error;
pub mod kicad;
pub mod merge;
pub mod svg;

pub use dxf_export::{DxfExporter, DxfOptions, DxfVersion, PcbDocuments, PcbDxfOptions, DXF_LAYER};
pub use error::{ExportError, ExportResult};
pub use kicad::{BoardCounts, KicadExporter, KicadOptions};
pub use merge::{merge_layers, union_polygons, MergedLayer};
pub use svg::{layer_color, Stroke, StrokeSource, SvgExporter, SvgOptions};
