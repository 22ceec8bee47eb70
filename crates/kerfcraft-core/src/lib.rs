//! # KerfCraft Core
//!
//! Core types shared by every KerfCraft crate:
//!
//! - [`Point`]: a finite 2D coordinate in millimeters
//! - [`DrawMode`], [`DrawStyle`] and [`MachineProfile`]: the mode to color/width lookup table
//! - [`GeometryError`]: construction errors raised by the geometry kernel and the models
//! - [`constants`]: fabrication constants for laser cutting and PCB layout

pub mod constants;
pub mod error;
pub mod point;
pub mod style;
pub mod units;

pub use error::{GeometryError, GeometryResult};
pub use point::Point;
pub use style::{DrawMode, DrawStyle, MachineProfile, ModeStyle, Rgb};
pub use units::{format_mm, mils_to_mm};
