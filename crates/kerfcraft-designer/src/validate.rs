//! Opt-in checks for the degenerate output the kernel does not prevent.
//!
//! Sharp trace turns produce self-intersecting outlines and short edges make
//! neighboring fillets overlap. Neither is an error during construction; this
//! module reports them so callers can inspect a pattern before export.

use kerfcraft_core::Point;
use std::fmt;
use tracing::warn;

use crate::geometry::{offset_trace, open_ring};
use crate::pattern::{Pattern, Shape};
use crate::pcb::{PcbPattern, PcbShape};

const INTERSECTION_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    /// Edges `first_edge` and `second_edge` of a closed ring cross at `at`.
    SelfIntersection {
        context: String,
        first_edge: usize,
        second_edge: usize,
        at: Point,
    },
    /// Edge `edge` is shorter than the fillets placed on it.
    FilletOverrun {
        edge: usize,
        length: f64,
        required: f64,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::SelfIntersection {
                context,
                first_edge,
                second_edge,
                at,
            } => write!(
                f,
                "{}: edges {} and {} cross at ({:.4}, {:.4})",
                context, first_edge, second_edge, at.x, at.y
            ),
            Finding::FilletOverrun {
                edge,
                length,
                required,
            } => write!(
                f,
                "edge {} is {:.4} mm long but its fillets need {:.4} mm",
                edge, length, required
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    fn record(&mut self, finding: Finding) {
        warn!("Validation: {}", finding);
        self.findings.push(finding);
    }
}

/// First pair of non-adjacent crossing edges of a closed ring.
///
/// Touches where both edges meet at an endpoint are ignored.
pub fn find_self_intersection(ring: &[Point]) -> Option<(usize, usize, Point)> {
    let ring = open_ring(ring);
    let n = ring.len();
    if n < 4 {
        return None;
    }
    for i in 0..n {
        let a = (ring[i], ring[(i + 1) % n]);
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let b = (ring[j], ring[(j + 1) % n]);
            if let Some((at, t, u)) = segment_intersection(a, b) {
                let t_at_end = t < INTERSECTION_EPSILON || t > 1.0 - INTERSECTION_EPSILON;
                let u_at_end = u < INTERSECTION_EPSILON || u > 1.0 - INTERSECTION_EPSILON;
                if t_at_end && u_at_end {
                    continue;
                }
                return Some((i, j, at));
            }
        }
    }
    None
}

/// Report edges of `points` too short for the fillets `rounded_curve` would
/// place with `radius`.
pub fn check_rounded_curve(points: &[Point], radius: f64) -> ValidationReport {
    let mut report = ValidationReport::default();
    if points.len() < 3 {
        return report;
    }
    let last = points.len() - 2;
    for (edge, pair) in points.windows(2).enumerate() {
        // end edges carry one fillet, interior edges two
        let required = if edge == 0 || edge == last {
            radius
        } else {
            2.0 * radius
        };
        let length = pair[0].distance_to(&pair[1]);
        if length < required {
            report.record(Finding::FilletOverrun {
                edge,
                length,
                required,
            });
        }
    }
    report
}

pub fn check_polygon(context: impl Into<String>, ring: &[Point]) -> ValidationReport {
    let mut report = ValidationReport::default();
    if let Some((first_edge, second_edge, at)) = find_self_intersection(ring) {
        report.record(Finding::SelfIntersection {
            context: context.into(),
            first_edge,
            second_edge,
            at,
        });
    }
    report
}

/// Check every polygon of a laser pattern.
pub fn validate_pattern(pattern: &Pattern) -> ValidationReport {
    let mut report = ValidationReport::default();
    for (index, primitive) in pattern.primitives().iter().enumerate() {
        if let Shape::Polygon { points } = &primitive.shape {
            report
                .findings
                .extend(check_polygon(format!("polygon #{}", index), points).findings);
        }
    }
    report
}

/// Check trace outlines, zones and graphic polygons of a board.
pub fn validate_board(board: &PcbPattern) -> ValidationReport {
    let mut report = ValidationReport::default();
    for (index, primitive) in board.primitives().enumerate() {
        let context = format!(
            "{} #{} on {}",
            primitive.shape.kind_name(),
            index,
            primitive.layer
        );
        let found = match &primitive.shape {
            PcbShape::Trace { points, width, .. } => match offset_trace(points, *width, false) {
                Ok(outline) => check_polygon(context, &outline),
                Err(e) => {
                    warn!("Validation: {} has no outline: {}", context, e);
                    ValidationReport::default()
                }
            },
            PcbShape::Zone { points, .. } | PcbShape::GraphicPolygon { points, .. } => {
                check_polygon(context, points)
            }
            _ => ValidationReport::default(),
        };
        report.findings.extend(found.findings);
    }
    report
}

/// Intersection point of two segments with both segment parameters.
fn segment_intersection(a: (Point, Point), b: (Point, Point)) -> Option<(Point, f64, f64)> {
    let r = (a.1.x - a.0.x, a.1.y - a.0.y);
    let s = (b.1.x - b.0.x, b.1.y - b.0.y);
    let denom = r.0 * s.1 - r.1 * s.0;
    if denom.abs() < INTERSECTION_EPSILON {
        return None;
    }
    let q = (b.0.x - a.0.x, b.0.y - a.0.y);
    let t = (q.0 * s.1 - q.1 * s.0) / denom;
    let u = (q.0 * r.1 - q.1 * r.0) / denom;
    let range = -INTERSECTION_EPSILON..=1.0 + INTERSECTION_EPSILON;
    if range.contains(&t) && range.contains(&u) {
        Some((Point::new(a.0.x + t * r.0, a.0.y + t * r.1), t, u))
    } else {
        None
    }
}
