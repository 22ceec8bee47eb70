//! Polygon merge stage.
//!
//! Copper that overlaps must be etched once. Before the DXF documents are
//! written, every cut or etch polygon of a mergeable layer is unioned with
//! `csgrs`, and only the exterior rings of the result are emitted.
//!
//! Inputs are assumed simple. A self-intersecting trace outline (see
//! `kerfcraft_designer::validate`) gives a wrong union, not an error.

use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use kerfcraft_core::constants::MERGE_ARC_SAMPLES;
use kerfcraft_core::{GeometryResult, Point};
use kerfcraft_designer::geometry::{offset_trace, open_ring};
use kerfcraft_designer::pcb::{PcbPattern, PcbPrimitive, PcbShape};
use tracing::{debug, warn};

use crate::dxf_export::PcbDxfOptions;

const RING_TOLERANCE: f64 = 1e-5;

/// Union of the cut and etch polygons of one layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedLayer {
    pub layer: String,
    /// Exterior rings for the cut document.
    pub cut: Vec<Vec<Point>>,
    /// Exterior rings for the etch document.
    pub etch: Vec<Vec<Point>>,
}

/// Polygon a primitive contributes to a merge.
///
/// Traces use their flat-ended outline, arcs and circles are sampled at
/// [`MERGE_ARC_SAMPLES`] points.
pub fn primitive_polygon(primitive: &PcbPrimitive) -> GeometryResult<Vec<Point>> {
    let ring = match &primitive.shape {
        PcbShape::Trace { points, width, .. } => offset_trace(points, *width, false)?,
        PcbShape::Zone { points, .. }
        | PcbShape::GraphicLine { points }
        | PcbShape::GraphicPolygon { points, .. } => points.clone(),
        PcbShape::GraphicArc { arc } | PcbShape::Circle { arc } => arc.sample(MERGE_ARC_SAMPLES)?,
    };
    Ok(open_ring(&ring).to_vec())
}

/// Union a set of simple polygons into disjoint exterior rings.
///
/// Rings come back without a repeated closing point. Interior rings (holes)
/// of the union are dropped.
pub fn union_polygons(polygons: &[Vec<Point>]) -> Vec<Vec<Point>> {
    let mut sketches = polygons.iter().filter_map(|ring| to_sketch(ring));
    let Some(first) = sketches.next() else {
        return Vec::new();
    };
    let merged = sketches.fold(first, |acc, s| acc.union(&s));
    sketch_to_rings(&merged)
}

/// Gather and union the cut and etch polygons of every merge layer.
///
/// A primitive joins the cut set when it participates in cut and its layer
/// is a cut layer, and likewise for etch. Layers with no polygons in either
/// set are left out.
pub fn merge_layers(
    board: &PcbPattern,
    options: &PcbDxfOptions,
) -> GeometryResult<Vec<MergedLayer>> {
    let mut merged = Vec::new();
    for layer in &options.merge_layers {
        let mut cut = Vec::new();
        let mut etch = Vec::new();
        for primitive in board.primitives().filter(|p| &p.layer == layer) {
            let in_cut = primitive.participation.cut && options.is_cut_layer(layer);
            let in_etch = primitive.participation.etch && options.is_etch_layer(layer);
            if !in_cut && !in_etch {
                continue;
            }
            let polygon = primitive_polygon(primitive)?;
            if in_cut {
                cut.push(polygon.clone());
            }
            if in_etch {
                etch.push(polygon);
            }
        }
        if cut.is_empty() && etch.is_empty() {
            debug!("No polygons to merge on layer {}", layer);
            continue;
        }
        debug!(
            "Merging layer {}: {} cut, {} etch polygons",
            layer,
            cut.len(),
            etch.len()
        );
        merged.push(MergedLayer {
            layer: layer.clone(),
            cut: union_polygons(&cut),
            etch: union_polygons(&etch),
        });
    }
    Ok(merged)
}

fn to_sketch(ring: &[Point]) -> Option<Sketch<()>> {
    let ring = open_ring(ring);
    if ring.len() < 3 {
        warn!("Skipping degenerate merge polygon with {} points", ring.len());
        return None;
    }
    let pts: Vec<[f64; 2]> = ring.iter().map(|p| [p.x, p.y]).collect();
    Some(Sketch::polygon(&pts, None))
}

fn sketch_to_rings(sketch: &Sketch<()>) -> Vec<Vec<Point>> {
    let mut rings = Vec::new();
    let mp = sketch.to_multipolygon();
    for poly in mp.0 {
        let mut ring: Vec<Point> = Vec::new();
        for p in poly.exterior().0.iter() {
            let pt = Point::new(p.x, p.y);
            if ring
                .last()
                .is_some_and(|last| last.distance_to(&pt) < RING_TOLERANCE)
            {
                continue;
            }
            ring.push(pt);
        }
        if ring.len() > 1 && ring[0].distance_to(&ring[ring.len() - 1]) < RING_TOLERANCE {
            ring.pop();
        }
        if !poly.interiors().is_empty() {
            warn!(
                "Merged region has {} interior rings; only the exterior is exported",
                poly.interiors().len()
            );
        }
        if ring.len() >= 3 {
            rings.push(ring);
        } else {
            warn!("Dropping degenerate merged ring with {} points", ring.len());
        }
    }
    rings
}
