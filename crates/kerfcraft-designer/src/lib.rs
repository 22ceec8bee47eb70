//! # KerfCraft Designer
//!
//! Geometry kernel and pattern models for laser cutting and PCB fabrication.
//!
//! ## Core Components
//!
//! - **Geometry**: arc discretisation, quadratic Bézier fillets, kerf
//!   compensation, trace offsetting and rounded rectangles
//! - **Pattern**: append-only list of laser primitives with draw styles
//! - **PCB Pattern**: board primitives tagged with layer, net and cut/etch
//!   participation, plus footprints, vias and text
//! - **Validation**: opt-in detection of self-intersecting outlines and
//!   overlapping fillets
//!
//! ## Architecture
//!
//! ```text
//! geometry (pure functions)
//!   ├── Pattern     (laser primitives)
//!   └── PcbPattern  (board primitives, NetTable, footprints)
//!         └── validate (opt-in checks)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kerfcraft_designer::{Kerf, Pattern};
//! use kerfcraft_core::{DrawMode, MachineProfile, Point};
//!
//! let mut pattern = Pattern::new(MachineProfile::laser_cutter());
//! pattern.add_line(
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     Some(Kerf::new(0.1)),
//!     DrawMode::Cut,
//! )?;
//! ```

pub mod geometry;
pub mod pattern;
pub mod pcb;
pub mod validate;

pub use geometry::{
    bezier, discretize_arc, kerf_outline, offset_trace, polygon_area, rectangle, rounded_curve,
    rounded_rectangle, translate, CircularArc, KerfOutline,
};
pub use pattern::{Kerf, Pattern, Primitive, Shape, TextAnchor, TextRecord};
pub use pcb::{
    pad_location, BoardItem, FootprintKind, FootprintPlacement, NetClass, NetId, NetTable,
    Participation, PcbPattern, PcbPrimitive, PcbShape, PcbText, Via,
};
pub use validate::{validate_board, validate_pattern, Finding, ValidationReport};
