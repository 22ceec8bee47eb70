//! SVG stroke preview.
//!
//! Everything is drawn as `<line>` elements, one per segment, polygon edge
//! or arc chord. The document is a preview: precise output goes through DXF.

use kerfcraft_core::constants::{CUTOUT_WIDTH, GRAPHIC_ARC_SAMPLES, MERGE_ARC_SAMPLES};
use kerfcraft_core::{format_mm, GeometryResult, Point, Rgb};
use kerfcraft_designer::pattern::{closed_edges, Pattern};
use kerfcraft_designer::pcb::{PcbPattern, PcbShape, BACK_COPPER, EDGE_CUTS, FRONT_COPPER};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{check_offsets, ExportError, ExportResult};

/// One line of the preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub from: Point,
    pub to: Point,
    pub color: Rgb,
    pub width: f64,
}

/// Anything that can be previewed as colored strokes.
pub trait StrokeSource {
    fn strokes(&self) -> GeometryResult<Vec<Stroke>>;
}

impl StrokeSource for Pattern {
    /// Every record, exact or not, in its own style.
    fn strokes(&self) -> GeometryResult<Vec<Stroke>> {
        let mut strokes = Vec::new();
        for primitive in self.primitives() {
            for (from, to) in primitive.shape.stroke_segments()? {
                strokes.push(Stroke {
                    from,
                    to,
                    color: primitive.style.color,
                    width: primitive.style.line_width,
                });
            }
        }
        Ok(strokes)
    }
}

/// Preview color of a board layer.
pub fn layer_color(layer: &str) -> Rgb {
    match layer {
        EDGE_CUTS => Rgb(255, 255, 0),
        FRONT_COPPER => Rgb(200, 52, 52),
        BACK_COPPER => Rgb(77, 127, 196),
        _ => Rgb(194, 194, 194),
    }
}

impl StrokeSource for PcbPattern {
    /// Traces at their copper width, everything else as a thin outline.
    fn strokes(&self) -> GeometryResult<Vec<Stroke>> {
        let mut strokes = Vec::new();
        for primitive in self.primitives() {
            let color = layer_color(&primitive.layer);
            let (segments, width) = match &primitive.shape {
                PcbShape::Trace { points, width, .. } => (open_edges(points), *width),
                PcbShape::Zone { points, .. } | PcbShape::GraphicPolygon { points, .. } => {
                    (closed_edges(points), CUTOUT_WIDTH)
                }
                PcbShape::GraphicLine { points } => (open_edges(points), CUTOUT_WIDTH),
                PcbShape::GraphicArc { arc } => {
                    (open_edges(&arc.sample(GRAPHIC_ARC_SAMPLES)?), CUTOUT_WIDTH)
                }
                PcbShape::Circle { arc } => {
                    (open_edges(&arc.sample(MERGE_ARC_SAMPLES)?), CUTOUT_WIDTH)
                }
            };
            strokes.extend(segments.into_iter().map(|(from, to)| Stroke {
                from,
                to,
                color,
                width,
            }));
        }
        Ok(strokes)
    }
}

fn open_edges(points: &[Point]) -> Vec<(Point, Point)> {
    points.windows(2).map(|w| (w[0], w[1])).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SvgOptions {
    pub offset_x: f64,
    pub offset_y: f64,
    /// Replaces every stroke width when set.
    pub line_width: Option<f64>,
}

impl SvgOptions {
    fn check(&self) -> ExportResult<()> {
        if let Some(width) = self.line_width {
            if !(width.is_finite() && width > 0.0) {
                return Err(ExportError::InvalidOption {
                    name: "line_width".to_string(),
                    reason: format!("{} must be > 0", width),
                });
            }
        }
        check_offsets(self.offset_x, self.offset_y)
    }
}

pub struct SvgExporter;

impl SvgExporter {
    pub fn render(source: &impl StrokeSource, options: &SvgOptions) -> ExportResult<String> {
        options.check()?;
        let strokes = source.strokes()?;
        let moved = |p: Point| p.offset(options.offset_x, options.offset_y);

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for stroke in &strokes {
            for p in [moved(stroke.from), moved(stroke.to)] {
                min_x = min_x.min(p.x);
                min_y = min_y.min(p.y);
                max_x = max_x.max(p.x);
                max_y = max_y.max(p.y);
            }
        }
        if strokes.is_empty() {
            (min_x, min_y, max_x, max_y) = (0.0, 0.0, 0.0, 0.0);
        }
        let width = max_x - min_x;
        let height = max_y - min_y;

        let mut svg = String::new();
        write!(
            svg,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<svg width="{}mm" height="{}mm" viewBox="{} {} {} {}" xmlns="http://www.w3.org/2000/svg" version="1.1" baseProfile="tiny">
"#,
            format_mm(width),
            format_mm(height),
            format_mm(min_x),
            format_mm(min_y),
            format_mm(width),
            format_mm(height)
        )?;
        for stroke in &strokes {
            let from = moved(stroke.from);
            let to = moved(stroke.to);
            writeln!(
                svg,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" />"#,
                format_mm(from.x),
                format_mm(from.y),
                format_mm(to.x),
                format_mm(to.y),
                stroke.color,
                format_mm(options.line_width.unwrap_or(stroke.width))
            )?;
        }
        svg.push_str("</svg>\n");
        debug!("SVG preview: {} lines", strokes.len());
        Ok(svg)
    }

    pub fn write_file(
        source: &impl StrokeSource,
        options: &SvgOptions,
        path: impl AsRef<Path>,
    ) -> ExportResult<()> {
        let svg = Self::render(source, options)?;
        fs::write(path.as_ref(), svg)?;
        info!("Wrote {}", path.as_ref().display());
        Ok(())
    }
}
