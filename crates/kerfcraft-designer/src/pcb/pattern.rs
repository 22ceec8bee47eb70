//! Layer and net aware board pattern.

use kerfcraft_core::constants::{
    M2_COURTYARD_DIAMETER, M2_HOLE_DIAMETER, PIN_HEADER_DRILL, PIN_HEADER_PAD,
};
use kerfcraft_core::{GeometryError, GeometryResult, Point};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::footprint::{FootprintKind, FootprintPlacement};
use super::nets::{NetId, NetTable};
use crate::geometry::{self, CircularArc};

pub const EDGE_CUTS: &str = "Edge.Cuts";
pub const FRONT_COPPER: &str = "F.Cu";
pub const BACK_COPPER: &str = "B.Cu";
pub const FRONT_SILKSCREEN: &str = "F.SilkS";
pub const FRONT_MASK: &str = "F.Mask";

/// Which of the two DXF documents a primitive may appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Participation {
    pub cut: bool,
    pub etch: bool,
}

impl Participation {
    pub const NONE: Participation = Participation {
        cut: false,
        etch: false,
    };
    pub const CUT: Participation = Participation {
        cut: true,
        etch: false,
    };
    pub const ETCH: Participation = Participation {
        cut: false,
        etch: true,
    };
    pub const BOTH: Participation = Participation {
        cut: true,
        etch: true,
    };

    pub fn new(cut: bool, etch: bool) -> Self {
        Self { cut, etch }
    }

    /// Neither document: the primitive only exists in the layout file.
    pub fn is_visual_only(&self) -> bool {
        !self.cut && !self.etch
    }
}

/// Geometry of a board primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PcbShape {
    /// Copper track centerline.
    Trace {
        points: Vec<Point>,
        width: f64,
        net: NetId,
    },
    /// Filled copper zone, implicitly closed.
    Zone {
        points: Vec<Point>,
        net: NetId,
        min_thickness: f64,
    },
    /// Open polyline on a graphic layer.
    GraphicLine { points: Vec<Point> },
    GraphicArc { arc: CircularArc },
    /// Closed outline on a graphic layer.
    GraphicPolygon { points: Vec<Point>, width: f64 },
    /// Hole or pad outline derived from a footprint or via.
    Circle { arc: CircularArc },
}

impl PcbShape {
    pub fn kind_name(&self) -> &'static str {
        match self {
            PcbShape::Trace { .. } => "trace",
            PcbShape::Zone { .. } => "zone",
            PcbShape::GraphicLine { .. } => "graphic line",
            PcbShape::GraphicArc { .. } => "graphic arc",
            PcbShape::GraphicPolygon { .. } => "graphic polygon",
            PcbShape::Circle { .. } => "circle",
        }
    }

    pub fn net(&self) -> Option<NetId> {
        match self {
            PcbShape::Trace { net, .. } | PcbShape::Zone { net, .. } => Some(*net),
            _ => None,
        }
    }
}

/// One recorded board primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbPrimitive {
    pub shape: PcbShape,
    pub layer: String,
    pub participation: Participation,
    /// False for geometry synthesized from footprints and vias, which the
    /// layout file already describes through its own records.
    pub exact_for_export: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbText {
    pub text: String,
    pub center: Point,
    /// Radians, CCW.
    pub angle: f64,
    pub scale: f64,
    pub thickness: f64,
    pub layer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub center: Point,
    pub size: f64,
    pub drill: f64,
    pub net: NetId,
    pub layers: (String, String),
}

/// Ordered board contents, in the order they were added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoardItem {
    Primitive(PcbPrimitive),
    Text(PcbText),
    Via(Via),
    Footprint(FootprintPlacement),
    /// Verbatim layout text.
    Raw(String),
}

/// A PCB under construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PcbPattern {
    nets: NetTable,
    items: Vec<BoardItem>,
}

impl PcbPattern {
    pub fn new(nets: NetTable) -> Self {
        Self {
            nets,
            items: Vec::new(),
        }
    }

    pub fn nets(&self) -> &NetTable {
        &self.nets
    }

    pub fn items(&self) -> &[BoardItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn primitives(&self) -> impl Iterator<Item = &PcbPrimitive> {
        self.items.iter().filter_map(|item| match item {
            BoardItem::Primitive(p) => Some(p),
            _ => None,
        })
    }

    pub fn footprints(&self) -> impl Iterator<Item = &FootprintPlacement> {
        self.items.iter().filter_map(|item| match item {
            BoardItem::Footprint(f) => Some(f),
            _ => None,
        })
    }

    pub fn vias(&self) -> impl Iterator<Item = &Via> {
        self.items.iter().filter_map(|item| match item {
            BoardItem::Via(v) => Some(v),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &PcbText> {
        self.items.iter().filter_map(|item| match item {
            BoardItem::Text(t) => Some(t),
            _ => None,
        })
    }

    /// Record a copper track and return the recorded centerline.
    pub fn add_trace(
        &mut self,
        points: &[Point],
        width: f64,
        net: NetId,
        layer: &str,
        participation: Participation,
    ) -> GeometryResult<Vec<Point>> {
        let points = finite_points("trace", points, 2)?;
        let width = GeometryError::check_width(width)?;
        let net = self.nets.check(net)?;
        self.push_primitive(
            PcbShape::Trace {
                points: points.clone(),
                width,
                net,
            },
            layer,
            participation,
            true,
        );
        Ok(points)
    }

    /// Record a track whose corners are rounded with Bézier fillets.
    #[allow(clippy::too_many_arguments)]
    pub fn add_trace_rounded(
        &mut self,
        points: &[Point],
        width: f64,
        radius: f64,
        samples: usize,
        net: NetId,
        layer: &str,
        participation: Participation,
    ) -> GeometryResult<Vec<Point>> {
        let rounded = geometry::rounded_curve(points, radius, samples)?;
        self.add_trace(&rounded, width, net, layer, participation)
    }

    /// Record a filled zone and return its outline.
    pub fn add_fill_zone_polygon(
        &mut self,
        points: &[Point],
        net: NetId,
        min_thickness: f64,
        layer: &str,
        participation: Participation,
    ) -> GeometryResult<Vec<Point>> {
        let points = finite_points("fill zone", points, 3)?;
        let min_thickness = GeometryError::check_width(min_thickness)?;
        let net = self.nets.check(net)?;
        self.push_primitive(
            PcbShape::Zone {
                points: points.clone(),
                net,
                min_thickness,
            },
            layer,
            participation,
            true,
        );
        Ok(points)
    }

    pub fn add_fill_zone_rectangle(
        &mut self,
        top_left: Point,
        bottom_right: Point,
        net: NetId,
        min_thickness: f64,
        layer: &str,
        participation: Participation,
    ) -> GeometryResult<Vec<Point>> {
        let points = geometry::rectangle(top_left, bottom_right)?;
        self.add_fill_zone_polygon(&points, net, min_thickness, layer, participation)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_fill_zone_rounded_rectangle(
        &mut self,
        corner_a: Point,
        corner_b: Point,
        radius: f64,
        samples: usize,
        net: NetId,
        min_thickness: f64,
        layer: &str,
        participation: Participation,
    ) -> GeometryResult<Vec<Point>> {
        let points = geometry::rounded_rectangle(corner_a, corner_b, radius, samples)?;
        self.add_fill_zone_polygon(&points, net, min_thickness, layer, participation)
    }

    pub fn add_graphic_line(
        &mut self,
        points: &[Point],
        layer: &str,
        participation: Participation,
    ) -> GeometryResult<()> {
        let points = finite_points("graphic line", points, 2)?;
        self.push_primitive(PcbShape::GraphicLine { points }, layer, participation, true);
        Ok(())
    }

    pub fn add_graphic_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        layer: &str,
        participation: Participation,
    ) -> GeometryResult<()> {
        let arc = CircularArc::new(center, radius, start_angle, end_angle)?;
        self.push_primitive(PcbShape::GraphicArc { arc }, layer, participation, true);
        Ok(())
    }

    pub fn add_graphic_polygon(
        &mut self,
        points: &[Point],
        width: f64,
        layer: &str,
        participation: Participation,
    ) -> GeometryResult<()> {
        let points = finite_points("graphic polygon", points, 3)?;
        let width = GeometryError::check_width(width)?;
        self.push_primitive(
            PcbShape::GraphicPolygon { points, width },
            layer,
            participation,
            true,
        );
        Ok(())
    }

    pub fn add_text(
        &mut self,
        text: impl Into<String>,
        center: Point,
        angle_ccw: f64,
        scale: f64,
        thickness: f64,
        layer: &str,
    ) -> GeometryResult<()> {
        self.items.push(BoardItem::Text(PcbText {
            text: text.into(),
            center: center.ensure_finite()?,
            angle: GeometryError::check_finite("text angle", angle_ccw)?,
            scale: GeometryError::check_width(scale)?,
            thickness: GeometryError::check_width(thickness)?,
            layer: layer.to_string(),
        }));
        Ok(())
    }

    /// Place an M2 mounting hole.
    ///
    /// Adds the hole outline on `Edge.Cuts` for the cut document and, when
    /// plated, the copper ring on both copper layers for the etch document.
    pub fn add_m2_drill(
        &mut self,
        center: Point,
        plated: bool,
        participation: Participation,
    ) -> GeometryResult<()> {
        let kind = if plated {
            FootprintKind::M2Plated
        } else {
            FootprintKind::M2NonPlated
        };
        let placement = FootprintPlacement::new(kind, center, 0.0, "", Vec::new())?;
        let center = placement.center;
        self.items.push(BoardItem::Footprint(placement));

        self.push_circle(
            center,
            M2_HOLE_DIAMETER / 2.0,
            EDGE_CUTS,
            Participation::new(participation.cut, false),
        )?;
        if plated {
            for layer in [FRONT_COPPER, BACK_COPPER] {
                self.push_circle(
                    center,
                    M2_COURTYARD_DIAMETER / 2.0,
                    layer,
                    Participation::new(false, participation.etch),
                )?;
            }
        }
        Ok(())
    }

    /// Place a grid of header pins with its top-left pin at `top_left`.
    ///
    /// Every pin adds its drill outline on `Edge.Cuts` (cut) and its pad
    /// outline on `F.Cu` (etch).
    #[allow(clippy::too_many_arguments)]
    pub fn add_pin_header(
        &mut self,
        top_left: Point,
        nx: usize,
        ny: usize,
        spacing: f64,
        nets: &[NetId],
        reference: &str,
        reference_offset: Option<Point>,
        participation: Participation,
    ) -> GeometryResult<()> {
        for net in nets {
            self.nets.check(*net)?;
        }
        let kind = FootprintKind::PinHeader { nx, ny, spacing };
        let mut placement =
            FootprintPlacement::new(kind, top_left, 0.0, reference, nets.to_vec())?;
        if let Some(offset) = reference_offset {
            placement = placement.with_reference_offset(offset.ensure_finite()?);
        }
        let origin = placement.center;
        self.items.push(BoardItem::Footprint(placement));

        for n in 0..nx * ny {
            let center = origin.offset(spacing * (n % nx) as f64, spacing * (n / nx) as f64);
            self.push_circle(
                center,
                PIN_HEADER_DRILL / 2.0,
                EDGE_CUTS,
                Participation::new(participation.cut, false),
            )?;
            self.push_circle(
                center,
                PIN_HEADER_PAD / 2.0,
                FRONT_COPPER,
                Participation::new(false, participation.etch),
            )?;
        }
        Ok(())
    }

    /// Place a via between `layers`.
    ///
    /// Adds the pad outline on both layers (etch) and the drill outline on
    /// `Edge.Cuts` (cut).
    pub fn add_via(
        &mut self,
        center: Point,
        size: f64,
        drill: f64,
        net: NetId,
        layers: (&str, &str),
        participation: Participation,
    ) -> GeometryResult<()> {
        let center = center.ensure_finite()?;
        let size = GeometryError::check_width(size)?;
        let drill = GeometryError::check_width(drill)?;
        let net = self.nets.check(net)?;
        self.items.push(BoardItem::Via(Via {
            center,
            size,
            drill,
            net,
            layers: (layers.0.to_string(), layers.1.to_string()),
        }));

        let pad = Participation::new(false, participation.etch);
        self.push_circle(center, size / 2.0, layers.0, pad)?;
        self.push_circle(center, size / 2.0, layers.1, pad)?;
        self.push_circle(
            center,
            drill / 2.0,
            EDGE_CUTS,
            Participation::new(participation.cut, false),
        )
    }

    /// Place a fixed component. Components add no cut or etch geometry.
    ///
    /// `nets` binds one net per pad in pad order. `value` falls back to the
    /// part name.
    pub fn add_component(
        &mut self,
        kind: FootprintKind,
        center: Point,
        angle_deg: f64,
        reference: &str,
        value: Option<&str>,
        nets: &[NetId],
    ) -> GeometryResult<()> {
        if matches!(
            kind,
            FootprintKind::M2Plated | FootprintKind::M2NonPlated | FootprintKind::PinHeader { .. }
        ) {
            return Err(kind.invalid("placed through its dedicated operation"));
        }
        for net in nets {
            self.nets.check(*net)?;
        }
        let mut placement =
            FootprintPlacement::new(kind, center, angle_deg, reference, nets.to_vec())?;
        if let Some(value) = value {
            placement = placement.with_value(value);
        }
        debug!("Placing {} {} at {:?}", kind.name(), reference, placement.center);
        self.items.push(BoardItem::Footprint(placement));
        Ok(())
    }

    /// Append verbatim text to the layout body. The text is not offset.
    pub fn add_raw_block(&mut self, text: impl Into<String>) {
        self.items.push(BoardItem::Raw(text.into()));
    }

    fn push_circle(
        &mut self,
        center: Point,
        radius: f64,
        layer: &str,
        participation: Participation,
    ) -> GeometryResult<()> {
        let arc = CircularArc::circle(center, radius)?;
        self.push_primitive(PcbShape::Circle { arc }, layer, participation, false);
        Ok(())
    }

    fn push_primitive(
        &mut self,
        shape: PcbShape,
        layer: &str,
        participation: Participation,
        exact_for_export: bool,
    ) {
        debug!(
            "Board record #{}: {} on {} (cut={}, etch={})",
            self.items.len(),
            shape.kind_name(),
            layer,
            participation.cut,
            participation.etch
        );
        self.items.push(BoardItem::Primitive(PcbPrimitive {
            shape,
            layer: layer.to_string(),
            participation,
            exact_for_export,
        }));
    }
}

fn finite_points(
    operation: &'static str,
    points: &[Point],
    min: usize,
) -> GeometryResult<Vec<Point>> {
    if points.len() < min {
        return Err(GeometryError::TooFewPoints {
            operation,
            count: points.len(),
            min,
        });
    }
    points.iter().map(|p| p.ensure_finite()).collect()
}
