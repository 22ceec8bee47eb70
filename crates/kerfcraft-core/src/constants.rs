//! Fabrication constants, in millimeters unless noted.

/// One thousandth of an inch.
pub const MIL_TO_MM: f64 = 0.0254;

/// Default KiCad edge-cut line width.
pub const CUTOUT_WIDTH: f64 = 0.05;

/// Line width used for `gr_line`/`gr_arc` records on graphic layers.
pub const EDGECUT_WIDTH: f64 = CUTOUT_WIDTH;

/// Minimum trace spacing of the board house.
pub const LINESPACE: f64 = 3.0 * MIL_TO_MM;

/// Copper-to-edge clearance of the board house.
pub const BOARD_EDGE_SPACING: f64 = 7.0 * MIL_TO_MM + CUTOUT_WIDTH / 2.0;

/// Copper-to-edge clearance used for layout, with one line space of margin.
pub const BOARD_EDGE_SPACING_EFF: f64 = BOARD_EDGE_SPACING + LINESPACE;

/// Clearance hole for an M2 screw.
pub const M2_HOLE_DIAMETER: f64 = 2.2;

/// Copper ring around a plated M2 hole.
pub const M2_COURTYARD_DIAMETER: f64 = 3.8;

/// 0.1" pin header drill.
pub const PIN_HEADER_DRILL: f64 = 1.0;

/// 0.1" pin header copper pad.
pub const PIN_HEADER_PAD: f64 = 1.7;

/// 0.1" pitch.
pub const PIN_HEADER_SPACING: f64 = 2.54;

/// Default via pad and drill.
pub const VIA_SIZE: f64 = 0.8;
pub const VIA_DRILL: f64 = 0.4;

/// Samples on each kerf end cap.
pub const KERF_CAP_SAMPLES: usize = 4;

/// Samples on a default circle.
pub const CIRCLE_SAMPLES: usize = 6;

/// Samples on a round trace end cap.
pub const TRACE_CAP_SAMPLES: usize = 6;

/// Samples used when an arc is turned into a polygon for merging.
pub const MERGE_ARC_SAMPLES: usize = 10;

/// Samples used when a graphic arc is previewed.
pub const GRAPHIC_ARC_SAMPLES: usize = 5;

/// Angle comparisons (full circle detection).
pub const ANGLE_EPSILON: f64 = 1e-9;
