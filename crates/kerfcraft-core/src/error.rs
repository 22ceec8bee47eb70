//! Error handling for KerfCraft geometry construction.
//!
//! Every invalid input is rejected at the call that introduces it. Nothing
//! is coerced: a NaN coordinate or a zero radius never reaches an output file.

use thiserror::Error;

/// Geometry construction error.
///
/// Raised by the geometry kernel and by every model operation that records
/// a primitive.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A coordinate or scalar was NaN or infinite.
    #[error("Non-finite value for {what}: {value}")]
    NonFinite {
        /// The quantity that was not finite.
        what: &'static str,
        /// The offending value.
        value: f64,
    },

    /// An arc, circle, kerf or fillet radius was zero or negative.
    #[error("Invalid radius: {radius} (must be > 0)")]
    InvalidRadius {
        /// The rejected radius.
        radius: f64,
    },

    /// A segment with identical endpoints.
    #[error("Degenerate segment at ({x}, {y})")]
    DegenerateSegment {
        /// X coordinate of the collapsed segment.
        x: f64,
        /// Y coordinate of the collapsed segment.
        y: f64,
    },

    /// Too few samples requested for a curve.
    #[error("Invalid sample count {count} (need at least {min})")]
    InvalidSampleCount {
        /// The requested count.
        count: usize,
        /// The minimum accepted count.
        min: usize,
    },

    /// A polyline or polygon had too few points for the operation.
    #[error("{operation} needs at least {min} points, got {count}")]
    TooFewPoints {
        /// The operation that was attempted.
        operation: &'static str,
        /// The number of points supplied.
        count: usize,
        /// The minimum number of points.
        min: usize,
    },

    /// A trace width, line width or zone thickness was zero or negative.
    #[error("Invalid width: {width} (must be > 0)")]
    InvalidWidth {
        /// The rejected width.
        width: f64,
    },

    /// A net name was registered twice.
    #[error("Net '{name}' is already defined")]
    DuplicateNet {
        /// The duplicated net name.
        name: String,
    },

    /// A net handle or name is not part of the pattern's net table.
    #[error("Unknown net: {0}")]
    UnknownNet(String),

    /// A footprint placement does not match its footprint kind.
    #[error("Invalid footprint {kind}: {reason}")]
    InvalidFootprint {
        /// The footprint kind.
        kind: String,
        /// Why the placement was rejected.
        reason: String,
    },
}

impl GeometryError {
    /// Reject a non-finite scalar.
    pub fn check_finite(what: &'static str, value: f64) -> GeometryResult<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(GeometryError::NonFinite { what, value })
        }
    }

    /// Reject a radius that is not strictly positive.
    pub fn check_radius(radius: f64) -> GeometryResult<f64> {
        Self::check_finite("radius", radius)?;
        if radius > 0.0 {
            Ok(radius)
        } else {
            Err(GeometryError::InvalidRadius { radius })
        }
    }

    /// Reject a width that is not strictly positive.
    pub fn check_width(width: f64) -> GeometryResult<f64> {
        Self::check_finite("width", width)?;
        if width > 0.0 {
            Ok(width)
        } else {
            Err(GeometryError::InvalidWidth { width })
        }
    }

    /// Reject a sample count below `min`.
    pub fn check_samples(count: usize, min: usize) -> GeometryResult<usize> {
        if count >= min {
            Ok(count)
        } else {
            Err(GeometryError::InvalidSampleCount { count, min })
        }
    }
}

/// Result type alias for geometry construction.
pub type GeometryResult<T> = Result<T, GeometryError>;
