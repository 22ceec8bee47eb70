//! DXF export.
//!
//! A laser [`Pattern`] becomes one document. A [`PcbPattern`] becomes two
//! independent documents, one with the geometry to cut and one with the
//! geometry to etch. All entities go on the single layer `TOP`.

use dxf::entities::{Arc, Circle, Entity, EntityType, Line, Polyline, Vertex};
use dxf::enums::AcadVersion;
use dxf::tables::Layer;
use dxf::Drawing;
use kerfcraft_core::Point;
use kerfcraft_designer::geometry::{offset_trace, open_ring, translate, CircularArc};
use kerfcraft_designer::pattern::{Pattern, Shape};
use kerfcraft_designer::pcb::{PcbPattern, PcbShape, EDGE_CUTS, BACK_COPPER, FRONT_COPPER};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::{check_offsets, ExportError, ExportResult};
use crate::merge::merge_layers;

/// Layer every exported entity is placed on.
pub const DXF_LAYER: &str = "TOP";

/// DXF schema version written to the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DxfVersion {
    R12,
    R2000,
    R2004,
    R2007,
    #[default]
    R2010,
    R2013,
    R2018,
}

impl DxfVersion {
    pub fn acad_version(self) -> AcadVersion {
        match self {
            DxfVersion::R12 => AcadVersion::R12,
            DxfVersion::R2000 => AcadVersion::R2000,
            DxfVersion::R2004 => AcadVersion::R2004,
            DxfVersion::R2007 => AcadVersion::R2007,
            DxfVersion::R2010 => AcadVersion::R2010,
            DxfVersion::R2013 => AcadVersion::R2013,
            DxfVersion::R2018 => AcadVersion::R2018,
        }
    }
}

impl fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DxfVersion::R12 => "R12",
            DxfVersion::R2000 => "R2000",
            DxfVersion::R2004 => "R2004",
            DxfVersion::R2007 => "R2007",
            DxfVersion::R2010 => "R2010",
            DxfVersion::R2013 => "R2013",
            DxfVersion::R2018 => "R2018",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DxfVersion {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "R12" => Ok(DxfVersion::R12),
            "R2000" => Ok(DxfVersion::R2000),
            "R2004" => Ok(DxfVersion::R2004),
            "R2007" => Ok(DxfVersion::R2007),
            "R2010" => Ok(DxfVersion::R2010),
            "R2013" => Ok(DxfVersion::R2013),
            "R2018" => Ok(DxfVersion::R2018),
            _ => Err(ExportError::InvalidOption {
                name: "dxf_version".to_string(),
                reason: format!("unknown version {}", s),
            }),
        }
    }
}

/// Options for single-document export.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DxfOptions {
    pub offset_x: f64,
    pub offset_y: f64,
    pub version: DxfVersion,
}

/// Options for the cut/etch document pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcbDxfOptions {
    /// Layers whose cut-participating primitives go into the cut document.
    pub cut_layers: Vec<String>,
    /// Layers whose etch-participating primitives go into the etch document.
    pub etch_layers: Vec<String>,
    /// Layers whose polygons are unioned before emission.
    pub merge_layers: Vec<String>,
    /// Emit trace outlines into the etch document on non-merge layers.
    pub include_traces_etch: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    pub version: DxfVersion,
}

impl Default for PcbDxfOptions {
    fn default() -> Self {
        Self {
            cut_layers: vec![EDGE_CUTS.to_string()],
            etch_layers: vec![FRONT_COPPER.to_string()],
            merge_layers: vec![FRONT_COPPER.to_string(), BACK_COPPER.to_string()],
            include_traces_etch: false,
            offset_x: 0.0,
            offset_y: 0.0,
            version: DxfVersion::default(),
        }
    }
}

impl PcbDxfOptions {
    pub fn is_cut_layer(&self, layer: &str) -> bool {
        self.cut_layers.iter().any(|l| l == layer)
    }

    pub fn is_etch_layer(&self, layer: &str) -> bool {
        self.etch_layers.iter().any(|l| l == layer)
    }

    pub fn is_merge_layer(&self, layer: &str) -> bool {
        self.merge_layers.iter().any(|l| l == layer)
    }
}

/// The two documents of a board.
#[derive(Debug)]
pub struct PcbDocuments {
    pub cut: Drawing,
    pub etch: Drawing,
}

/// Builds one drawing, applying the export offset to every coordinate.
struct DocumentBuilder {
    drawing: Drawing,
    offset_x: f64,
    offset_y: f64,
    entities: usize,
}

impl DocumentBuilder {
    fn new(version: DxfVersion, offset_x: f64, offset_y: f64) -> Self {
        let mut drawing = Drawing::new();
        drawing.header.version = version.acad_version();
        drawing.add_layer(Layer {
            name: DXF_LAYER.to_string(),
            ..Default::default()
        });
        Self {
            drawing,
            offset_x,
            offset_y,
            entities: 0,
        }
    }

    fn point(&self, p: Point) -> dxf::Point {
        Self::placed(p.offset(self.offset_x, self.offset_y))
    }

    fn placed(p: Point) -> dxf::Point {
        dxf::Point::new(p.x, p.y, 0.0)
    }

    fn add(&mut self, specific: EntityType) {
        let mut entity = Entity::new(specific);
        entity.common.layer = DXF_LAYER.to_string();
        self.drawing.add_entity(entity);
        self.entities += 1;
    }

    fn line(&mut self, p1: Point, p2: Point) {
        let line = Line::new(self.point(p1), self.point(p2));
        self.add(EntityType::Line(line));
    }

    fn lines(&mut self, points: &[Point]) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1]);
        }
    }

    /// `CIRCLE` for a full turn, otherwise a counter-clockwise `ARC` in
    /// degrees. Clockwise sweeps swap their endpoints.
    fn arc(&mut self, arc: &CircularArc) {
        let arc = arc.translated(self.offset_x, self.offset_y);
        let center = Self::placed(arc.center);
        if arc.is_full_circle() {
            self.add(EntityType::Circle(Circle::new(center, arc.radius)));
            return;
        }
        let (start, end) = if arc.sweep() >= 0.0 {
            (arc.start_angle, arc.end_angle)
        } else {
            (arc.end_angle, arc.start_angle)
        };
        let entity = Arc::new(
            center,
            arc.radius,
            start.to_degrees().rem_euclid(360.0),
            end.to_degrees().rem_euclid(360.0),
        );
        self.add(EntityType::Arc(entity));
    }

    /// Closed 2D `POLYLINE` without a repeated closing vertex.
    fn polygon(&mut self, points: &[Point]) {
        let mut polyline = Polyline::default();
        polyline.set_is_closed(true);
        for p in translate(open_ring(points), self.offset_x, self.offset_y) {
            let vertex = Vertex::new(Self::placed(p));
            polyline.add_vertex(&mut self.drawing, vertex);
        }
        self.add(EntityType::Polyline(polyline));
    }

    fn finish(self, name: &str) -> Drawing {
        info!("DXF {} document: {} entities", name, self.entities);
        self.drawing
    }
}

/// DXF exporter for laser patterns and boards.
pub struct DxfExporter;

impl DxfExporter {
    /// Exact primitives of `pattern` as one document. Preview-only records
    /// and text are skipped.
    pub fn pattern_document(pattern: &Pattern, options: &DxfOptions) -> ExportResult<Drawing> {
        check_offsets(options.offset_x, options.offset_y)?;
        let mut doc = DocumentBuilder::new(options.version, options.offset_x, options.offset_y);
        for primitive in pattern.exact_primitives() {
            match &primitive.shape {
                Shape::Segment { p1, p2 } => doc.line(*p1, *p2),
                Shape::Arc { arc, .. } => doc.arc(arc),
                Shape::Polygon { points } => doc.polygon(points),
            }
        }
        Ok(doc.finish("pattern"))
    }

    /// Cut and etch documents of `board`.
    ///
    /// Primitives on merge layers are unioned per layer and emitted as
    /// closed polylines. Everything else is routed by its own participation
    /// flags. Primitives on layers outside both selections are skipped.
    pub fn pcb_documents(board: &PcbPattern, options: &PcbDxfOptions) -> ExportResult<PcbDocuments> {
        check_offsets(options.offset_x, options.offset_y)?;
        let mut cut = DocumentBuilder::new(options.version, options.offset_x, options.offset_y);
        let mut etch = DocumentBuilder::new(options.version, options.offset_x, options.offset_y);

        for primitive in board.primitives() {
            let layer = primitive.layer.as_str();
            if options.is_merge_layer(layer) {
                continue;
            }
            let to_cut = primitive.participation.cut && options.is_cut_layer(layer);
            let to_etch = primitive.participation.etch && options.is_etch_layer(layer);
            if !to_cut && !to_etch {
                continue;
            }
            match &primitive.shape {
                PcbShape::Trace { points, width, .. } => {
                    if to_cut {
                        cut.lines(points);
                    }
                    if to_etch && options.include_traces_etch {
                        etch.polygon(&offset_trace(points, *width, false)?);
                    }
                }
                PcbShape::Zone { points, .. } | PcbShape::GraphicPolygon { points, .. } => {
                    if to_cut {
                        cut.polygon(points);
                    }
                    if to_etch {
                        etch.polygon(points);
                    }
                }
                PcbShape::GraphicLine { points } => {
                    if to_cut {
                        cut.lines(points);
                    }
                    if to_etch {
                        etch.lines(points);
                    }
                }
                PcbShape::GraphicArc { arc } | PcbShape::Circle { arc } => {
                    if to_cut {
                        cut.arc(arc);
                    }
                    if to_etch {
                        etch.arc(arc);
                    }
                }
            }
        }

        for layer in merge_layers(board, options)? {
            debug!(
                "Layer {} merged into {} cut and {} etch regions",
                layer.layer,
                layer.cut.len(),
                layer.etch.len()
            );
            for ring in &layer.cut {
                cut.polygon(ring);
            }
            for ring in &layer.etch {
                etch.polygon(ring);
            }
        }

        Ok(PcbDocuments {
            cut: cut.finish("cut"),
            etch: etch.finish("etch"),
        })
    }

    pub fn write_pattern(
        pattern: &Pattern,
        options: &DxfOptions,
        path: impl AsRef<Path>,
    ) -> ExportResult<()> {
        let drawing = Self::pattern_document(pattern, options)?;
        drawing.save_file(path.as_ref())?;
        info!("Wrote {}", path.as_ref().display());
        Ok(())
    }

    pub fn write_pcb(
        board: &PcbPattern,
        options: &PcbDxfOptions,
        cut_path: impl AsRef<Path>,
        etch_path: impl AsRef<Path>,
    ) -> ExportResult<()> {
        let docs = Self::pcb_documents(board, options)?;
        docs.cut.save_file(cut_path.as_ref())?;
        docs.etch.save_file(etch_path.as_ref())?;
        info!(
            "Wrote {} and {}",
            cut_path.as_ref().display(),
            etch_path.as_ref().display()
        );
        Ok(())
    }
}
