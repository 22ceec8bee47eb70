//! Fixed component footprints.
//!
//! Every supported part is a [`FootprintKind`] with a declarative pad table
//! ([`FootprintDef`]). The layout exporter serializes any placement from its
//! table, so adding a part means adding a table, not a formatter.

use kerfcraft_core::constants::{
    M2_COURTYARD_DIAMETER, M2_HOLE_DIAMETER, PIN_HEADER_DRILL, PIN_HEADER_PAD,
};
use kerfcraft_core::{format_mm, GeometryError, GeometryResult, Point};
use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::nets::NetId;

/// The closed set of parts a board can place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FootprintKind {
    /// M2 mounting hole with a plated copper ring.
    M2Plated,
    /// Bare M2 mounting hole.
    M2NonPlated,
    /// `nx × ny` grid of 0.1" header pins, numbered row by row from the
    /// top-left pin, which is the placement origin.
    PinHeader { nx: usize, ny: usize, spacing: f64 },
    /// SMD resistor, 1206 (3216 metric).
    Resistor1206,
    /// STB12NM60N power MOSFET, D²PAK. Pad 1 gate, pad 2 drain, pad 3 source.
    Stb12nm60n,
    /// A05P-5 high voltage DC-DC converter.
    /// Pad 1 Vin+, 2 Vin-, 3 Vout+, 4 Vout-, 5 Vctrl.
    A05p5,
    /// Teensy 4.1, USB towards -x at angle 0.
    Teensy41,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadType {
    Smd,
    ThruHole,
    NpThruHole,
}

impl fmt::Display for PadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadType::Smd => write!(f, "smd"),
            PadType::ThruHole => write!(f, "thru_hole"),
            PadType::NpThruHole => write!(f, "np_thru_hole"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadShape {
    Circle,
    Rect,
    Oval,
}

impl fmt::Display for PadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadShape::Circle => write!(f, "circle"),
            PadShape::Rect => write!(f, "rect"),
            PadShape::Oval => write!(f, "oval"),
        }
    }
}

/// One pad of a footprint, relative to the footprint origin before rotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PadSpec {
    /// Pad number as written in the layout file. Empty for unnumbered holes.
    pub number: String,
    pub offset: Point,
    pub pad_type: PadType,
    pub shape: PadShape,
    pub size: (f64, f64),
    pub drill: Option<f64>,
    pub layers: &'static str,
}

/// Declarative description of a footprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootprintDef {
    /// Library identifier, `Library:Footprint`.
    pub library: String,
    pub reference_offset: Point,
    pub value_offset: Point,
    pub pads: Vec<PadSpec>,
}

const SMD_LAYERS: &str = "F.Cu F.Paste F.Mask";
const THT_LAYERS: &str = "*.Cu *.Mask";

const TEENSY_PINS_PER_SIDE: usize = 24;
const TEENSY_FIRST_PIN_X: f64 = -29.21;
const TEENSY_ROW_Y: f64 = 7.62;

fn smd(number: usize, x: f64, y: f64, size: (f64, f64)) -> PadSpec {
    PadSpec {
        number: number.to_string(),
        offset: Point::new(x, y),
        pad_type: PadType::Smd,
        shape: PadShape::Rect,
        size,
        drill: None,
        layers: SMD_LAYERS,
    }
}

fn tht(number: usize, x: f64, y: f64, shape: PadShape) -> PadSpec {
    PadSpec {
        number: number.to_string(),
        offset: Point::new(x, y),
        pad_type: PadType::ThruHole,
        shape,
        size: (PIN_HEADER_PAD, PIN_HEADER_PAD),
        drill: Some(PIN_HEADER_DRILL),
        layers: THT_LAYERS,
    }
}

impl FootprintKind {
    pub fn name(&self) -> &'static str {
        match self {
            FootprintKind::M2Plated => "M2 plated",
            FootprintKind::M2NonPlated => "M2 non-plated",
            FootprintKind::PinHeader { .. } => "pin header",
            FootprintKind::Resistor1206 => "resistor 1206",
            FootprintKind::Stb12nm60n => "STB12NM60N",
            FootprintKind::A05p5 => "A05P-5",
            FootprintKind::Teensy41 => "Teensy 4.1",
        }
    }

    /// Value written when the caller supplies none.
    pub fn default_value(&self) -> &'static str {
        match self {
            FootprintKind::M2Plated | FootprintKind::M2NonPlated => "MountingHole",
            FootprintKind::PinHeader { .. } => "Conn",
            FootprintKind::Resistor1206 => "R",
            FootprintKind::Stb12nm60n => "STB12NM60N",
            FootprintKind::A05p5 => "A05P-5",
            FootprintKind::Teensy41 => "Teensy4.1",
        }
    }

    /// Number of pads that take a net binding.
    pub fn pad_count(&self) -> usize {
        match self {
            FootprintKind::M2Plated | FootprintKind::M2NonPlated => 0,
            FootprintKind::PinHeader { nx, ny, .. } => nx.saturating_mul(*ny),
            FootprintKind::Resistor1206 => 2,
            FootprintKind::Stb12nm60n => 3,
            FootprintKind::A05p5 => 5,
            FootprintKind::Teensy41 => 2 * TEENSY_PINS_PER_SIDE,
        }
    }

    fn check(&self) -> GeometryResult<()> {
        if let FootprintKind::PinHeader { nx, ny, spacing } = *self {
            if nx == 0 || ny == 0 {
                return Err(self.invalid(format!("empty pin grid {}x{}", nx, ny)));
            }
            if nx.checked_mul(ny).is_none() {
                return Err(self.invalid(format!("pin grid {}x{} is too large", nx, ny)));
            }
            if !(spacing.is_finite() && spacing > 0.0) {
                return Err(self.invalid(format!("pin spacing {} must be > 0", spacing)));
            }
        }
        Ok(())
    }

    pub fn invalid(&self, reason: impl Into<String>) -> GeometryError {
        GeometryError::InvalidFootprint {
            kind: self.name().to_string(),
            reason: reason.into(),
        }
    }

    pub fn definition(&self) -> GeometryResult<FootprintDef> {
        self.check()?;
        let def = match *self {
            FootprintKind::M2Plated => FootprintDef {
                library: "MountingHole:MountingHole_2.2mm_M2_Pad".to_string(),
                reference_offset: Point::new(0.0, -2.9),
                value_offset: Point::new(0.0, 2.9),
                pads: vec![PadSpec {
                    number: "1".to_string(),
                    offset: Point::new(0.0, 0.0),
                    pad_type: PadType::ThruHole,
                    shape: PadShape::Circle,
                    size: (M2_COURTYARD_DIAMETER, M2_COURTYARD_DIAMETER),
                    drill: Some(M2_HOLE_DIAMETER),
                    layers: THT_LAYERS,
                }],
            },
            FootprintKind::M2NonPlated => FootprintDef {
                library: "MountingHole:MountingHole_2.2mm_M2".to_string(),
                reference_offset: Point::new(0.0, -2.9),
                value_offset: Point::new(0.0, 2.9),
                pads: vec![PadSpec {
                    number: String::new(),
                    offset: Point::new(0.0, 0.0),
                    pad_type: PadType::NpThruHole,
                    shape: PadShape::Circle,
                    size: (M2_HOLE_DIAMETER, M2_HOLE_DIAMETER),
                    drill: Some(M2_HOLE_DIAMETER),
                    layers: THT_LAYERS,
                }],
            },
            FootprintKind::PinHeader { nx, ny, spacing } => FootprintDef {
                library: format!(
                    "Connector_PinHeader_2.54mm:PinHeader_{}x{:02}_P{}mm_Vertical",
                    nx,
                    ny,
                    format_mm(spacing)
                ),
                reference_offset: Point::new(-2.25, 0.0),
                value_offset: Point::new(0.0, spacing * ny as f64 + 0.5),
                pads: (0..nx * ny)
                    .map(|n| {
                        let shape = if n == 0 { PadShape::Rect } else { PadShape::Oval };
                        tht(
                            n + 1,
                            spacing * (n % nx) as f64,
                            spacing * (n / nx) as f64,
                            shape,
                        )
                    })
                    .collect(),
            },
            FootprintKind::Resistor1206 => FootprintDef {
                library: "Resistor_SMD:R_1206_3216Metric".to_string(),
                reference_offset: Point::new(0.0, -1.82),
                value_offset: Point::new(0.0, 1.82),
                pads: vec![
                    smd(1, -1.55, 0.0, (1.2, 1.8)),
                    smd(2, 1.55, 0.0, (1.2, 1.8)),
                ],
            },
            FootprintKind::Stb12nm60n => FootprintDef {
                library: "Package_TO_SOT_SMD:TO-263-2".to_string(),
                reference_offset: Point::new(0.0, -6.0),
                value_offset: Point::new(0.0, 13.0),
                pads: vec![
                    smd(1, -2.54, 10.275, (1.6, 3.5)),
                    smd(2, 0.0, 0.0, (10.8, 9.4)),
                    smd(3, 2.54, 10.275, (1.6, 3.5)),
                ],
            },
            FootprintKind::A05p5 => FootprintDef {
                library: "Converter_DCDC:A05P-5".to_string(),
                reference_offset: Point::new(0.0, -5.0),
                value_offset: Point::new(0.0, 5.0),
                pads: vec![
                    tht(1, -10.16, -2.54, PadShape::Rect),
                    tht(2, -10.16, 2.54, PadShape::Circle),
                    tht(3, 10.16, -2.54, PadShape::Circle),
                    tht(4, 10.16, 2.54, PadShape::Circle),
                    tht(5, -10.16, 5.08, PadShape::Circle),
                ],
            },
            FootprintKind::Teensy41 => FootprintDef {
                library: "Teensy:Teensy41".to_string(),
                reference_offset: Point::new(0.0, -10.0),
                value_offset: Point::new(0.0, 10.0),
                pads: (0..2 * TEENSY_PINS_PER_SIDE)
                    .map(|n| {
                        // 1..24 along +y left to right, 25..48 back along -y
                        let (column, y) = if n < TEENSY_PINS_PER_SIDE {
                            (n, TEENSY_ROW_Y)
                        } else {
                            (2 * TEENSY_PINS_PER_SIDE - 1 - n, -TEENSY_ROW_Y)
                        };
                        let shape = if n == 0 { PadShape::Rect } else { PadShape::Circle };
                        tht(
                            n + 1,
                            TEENSY_FIRST_PIN_X + 2.54 * column as f64,
                            y,
                            shape,
                        )
                    })
                    .collect(),
            },
        };
        Ok(def)
    }
}

/// Rotate a footprint-local offset by `angle_deg` (CCW on screen).
///
/// Layout coordinates grow downwards, so a counter-clockwise screen rotation
/// is `(x, y) → (x·cos + y·sin, -x·sin + y·cos)`.
pub fn rotate_offset(offset: Point, angle_deg: f64) -> Point {
    let v = Rotation2::new(-angle_deg.to_radians()) * Vector2::new(offset.x, offset.y);
    Point::new(v.x, v.y)
}

/// Absolute position of pad `pad` of a footprint placed at `center`.
pub fn pad_location(
    kind: &FootprintKind,
    center: Point,
    angle_deg: f64,
    pad: &str,
) -> GeometryResult<Point> {
    let center = center.ensure_finite()?;
    GeometryError::check_finite("footprint angle", angle_deg)?;
    let def = kind.definition()?;
    let spec = def
        .pads
        .iter()
        .find(|p| p.number == pad)
        .ok_or_else(|| kind.invalid(format!("no pad '{}'", pad)))?;
    let offset = rotate_offset(spec.offset, angle_deg);
    Ok(center.offset(offset.x, offset.y))
}

/// A footprint instance on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintPlacement {
    pub kind: FootprintKind,
    pub center: Point,
    /// Degrees, CCW on screen.
    pub angle_deg: f64,
    pub reference: String,
    pub value: String,
    /// Net of each numbered pad, in pad order. Missing trailing entries are
    /// unconnected.
    pub nets: Vec<NetId>,
    /// Overrides the table's reference text position.
    pub reference_offset: Option<Point>,
}

impl FootprintPlacement {
    pub fn new(
        kind: FootprintKind,
        center: Point,
        angle_deg: f64,
        reference: impl Into<String>,
        nets: Vec<NetId>,
    ) -> GeometryResult<Self> {
        kind.check()?;
        let expected = kind.pad_count();
        let exact = !matches!(kind, FootprintKind::PinHeader { .. });
        if nets.len() > expected || (exact && expected > 0 && nets.len() != expected) {
            return Err(kind.invalid(format!(
                "expected {} net bindings, got {}",
                expected,
                nets.len()
            )));
        }
        Ok(Self {
            kind,
            center: center.ensure_finite()?,
            angle_deg: GeometryError::check_finite("footprint angle", angle_deg)?,
            reference: reference.into(),
            value: kind.default_value().to_string(),
            nets,
            reference_offset: None,
        })
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_reference_offset(mut self, offset: Point) -> Self {
        self.reference_offset = Some(offset);
        self
    }

    /// Net bound to the `index`-th pad of the table.
    pub fn pad_net(&self, index: usize) -> NetId {
        self.nets.get(index).copied().unwrap_or(NetId::UNCONNECTED)
    }

    pub fn pad_location(&self, pad: &str) -> GeometryResult<Point> {
        pad_location(&self.kind, self.center, self.angle_deg, pad)
    }
}
