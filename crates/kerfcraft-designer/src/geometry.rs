//! Geometry kernel: arcs, Bézier fillets, kerf compensation and trace offsets.
//!
//! All functions are pure. Inputs are validated up front and every failure is
//! a [`GeometryError`]; no function returns NaN coordinates.
//!
//! Two constructions here are knowingly naive and are kept that way:
//!
//! - [`rounded_curve`] places fillets at a fixed distance from each vertex.
//!   When an edge is shorter than the radius the fillets of its two ends
//!   overlap and the curve folds back on itself.
//! - [`offset_trace`] translates each vertex along the heading of one
//!   adjacent edge instead of mitering. Turns sharper than roughly 90° give a
//!   self-intersecting outline.
//!
//! Both cases can be flagged with [`crate::validate`].

use std::f64::consts::{FRAC_PI_2, PI};

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use kerfcraft_core::constants::TRACE_CAP_SAMPLES;
use kerfcraft_core::{GeometryError, GeometryResult, Point};
use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

/// A circular arc. Angles in radians, CCW from +x; `end_angle < start_angle`
/// sweeps clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularArc {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl CircularArc {
    pub fn new(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> GeometryResult<Self> {
        Ok(Self {
            center: center.ensure_finite()?,
            radius: GeometryError::check_radius(radius)?,
            start_angle: GeometryError::check_finite("start angle", start_angle)?,
            end_angle: GeometryError::check_finite("end angle", end_angle)?,
        })
    }

    pub fn circle(center: Point, radius: f64) -> GeometryResult<Self> {
        Self::new(center, radius, 0.0, 2.0 * PI)
    }

    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// True when the sweep covers exactly one turn in either direction.
    pub fn is_full_circle(&self) -> bool {
        (self.sweep().abs() - 2.0 * PI).abs() < kerfcraft_core::constants::ANGLE_EPSILON
    }

    pub fn start_point(&self) -> Point {
        self.center.polar(self.radius, self.start_angle)
    }

    pub fn end_point(&self) -> Point {
        self.center.polar(self.radius, self.end_angle)
    }

    pub fn sample(&self, n: usize) -> GeometryResult<Vec<Point>> {
        discretize_arc(self.center, self.radius, self.start_angle, self.end_angle, n)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            center: self.center.offset(dx, dy),
            ..*self
        }
    }
}

/// Sample `n` points (endpoints inclusive) along an arc.
///
/// `n == 2` gives the chord.
pub fn discretize_arc(
    center: Point,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    n: usize,
) -> GeometryResult<Vec<Point>> {
    let center = center.ensure_finite()?;
    GeometryError::check_radius(radius)?;
    GeometryError::check_finite("start angle", start_angle)?;
    GeometryError::check_finite("end angle", end_angle)?;
    GeometryError::check_samples(n, 2)?;

    Ok(linspace(start_angle, end_angle, n)
        .map(|theta| center.polar(radius, theta))
        .collect())
}

/// Evaluate the quadratic Bézier curve from `p0` to `p1` bent towards
/// `control` at `n` evenly spaced parameters.
///
/// `B(t) = (1-t)²·p0 + 2(1-t)t·control + t²·p1`. The first and last samples
/// are exactly `p0` and `p1`.
pub fn bezier(p0: Point, p1: Point, control: Point, n: usize) -> GeometryResult<Vec<Point>> {
    let p0 = p0.ensure_finite()?;
    let p1 = p1.ensure_finite()?;
    let control = control.ensure_finite()?;
    GeometryError::check_samples(n, 2)?;

    Ok(linspace(0.0, 1.0, n)
        .map(|t| {
            let a = (1.0 - t) * (1.0 - t);
            let b = 2.0 * (1.0 - t) * t;
            let c = t * t;
            Point::new(
                a * p0.x + b * control.x + c * p1.x,
                a * p0.y + b * control.y + c * p1.y,
            )
        })
        .collect())
}

/// Outline produced by cutting `p1 → p2` with a tool of kerf radius `k`.
///
/// The finished part edge lies on the original segment; the toolpath runs
/// `k` outside of it on both sides and turns around on two semicircles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KerfOutline {
    /// `p1top → p2top`, offset `+k` perpendicular to the heading.
    pub top: (Point, Point),
    /// `p2bot → p1bot`, offset `-k` perpendicular to the heading.
    pub bottom: (Point, Point),
    /// Semicircle around `p2mid` from `θ+π/2` to `θ-π/2`.
    pub far_cap: CircularArc,
    /// Semicircle around `p1mid` from `θ-π/2` to `θ-3π/2`.
    pub near_cap: CircularArc,
}

impl KerfOutline {
    /// The four offset corners: `p1top, p2top, p1bot, p2bot`.
    pub fn corners(&self) -> [Point; 4] {
        [self.top.0, self.top.1, self.bottom.1, self.bottom.0]
    }
}

/// Build the kerf-compensated outline of the segment `p1 → p2`.
///
/// The corner offsets `(±k, ±k)` are rotated by the heading and added to the
/// endpoints, so each corner sits `k·√2` from its endpoint.
pub fn kerf_outline(p1: Point, p2: Point, kerf: f64) -> GeometryResult<KerfOutline> {
    let (p1, p2) = checked_segment(p1, p2)?;
    let k = GeometryError::check_radius(kerf)?;

    let theta = p1.heading_to(&p2);
    let rot = Rotation2::new(theta);
    let at = |p: Point, dx: f64, dy: f64| {
        let v = rot * Vector2::new(dx, dy);
        Point::new(p.x + v.x, p.y + v.y)
    };

    let p1top = at(p1, k, k);
    let p2top = at(p2, -k, k);
    let p1bot = at(p1, k, -k);
    let p2bot = at(p2, -k, -k);
    let p1mid = at(p1, k, 0.0);
    let p2mid = at(p2, -k, 0.0);

    Ok(KerfOutline {
        top: (p1top, p2top),
        bottom: (p2bot, p1bot),
        far_cap: CircularArc::new(p2mid, k, theta + FRAC_PI_2, theta - FRAC_PI_2)?,
        near_cap: CircularArc::new(p1mid, k, theta - FRAC_PI_2, theta - 3.0 * FRAC_PI_2)?,
    })
}

/// Replace every interior vertex of an open polyline with a Bézier fillet.
///
/// For vertex `i` the fillet starts `radius` before it on the incoming edge,
/// ends `radius` after it on the outgoing edge and uses the vertex as control
/// point. `n` interior samples are generated per fillet. Edges shorter than
/// `radius` (or `2·radius` between two fillets) produce overlapping fillets;
/// this is not corrected.
pub fn rounded_curve(points: &[Point], radius: f64, n: usize) -> GeometryResult<Vec<Point>> {
    if points.len() < 3 {
        return Err(GeometryError::TooFewPoints {
            operation: "rounded curve",
            count: points.len(),
            min: 3,
        });
    }
    let radius = GeometryError::check_radius(radius)?;
    let headings = edge_headings(points)?;

    let mut rounded = Vec::with_capacity(points.len() * (n + 2));
    let mut current = points[0];
    for i in 0..points.len() - 2 {
        let vertex = points[i + 1];
        let entry = vertex.polar(-radius, headings[i]);
        let exit = vertex.polar(radius, headings[i + 1]);

        let fillet = bezier(entry, exit, vertex, n + 2)?;
        rounded.push(current);
        rounded.push(entry);
        rounded.extend_from_slice(&fillet[1..fillet.len() - 1]);
        current = exit;
    }
    rounded.push(current);
    rounded.push(points[points.len() - 1]);
    Ok(rounded)
}

/// Turn a trace centerline into the closed outline of a ribbon of `width`.
///
/// Returns `left + end_cap + reversed(right) + start_cap`. With flat ends the
/// end cap is empty and the start cap is the first left point again, so the
/// ring is explicitly closed. With round ends each cap is a semicircle of
/// [`TRACE_CAP_SAMPLES`] points and radius `width / 2`, both running from
/// the side the outline arrives on to the side it leaves from, so the ring
/// stays simple.
pub fn offset_trace(points: &[Point], width: f64, round_ends: bool) -> GeometryResult<Vec<Point>> {
    if points.len() < 2 {
        return Err(GeometryError::TooFewPoints {
            operation: "trace offset",
            count: points.len(),
            min: 2,
        });
    }
    let half = GeometryError::check_width(width)? / 2.0;
    let headings = edge_headings(points)?;

    let left_of = |p: Point, theta: f64| Point::new(p.x - half * theta.sin(), p.y + half * theta.cos());
    let right_of = |p: Point, theta: f64| Point::new(p.x + half * theta.sin(), p.y - half * theta.cos());

    let mut left = Vec::with_capacity(points.len());
    let mut right = Vec::with_capacity(points.len());
    left.push(left_of(points[0], headings[0]));
    right.push(right_of(points[0], headings[0]));
    for (i, theta) in headings.iter().enumerate() {
        left.push(left_of(points[i + 1], *theta));
        right.push(right_of(points[i + 1], *theta));
    }

    let (start_cap, end_cap) = if round_ends {
        let first = headings[0];
        let last = headings[headings.len() - 1];
        (
            discretize_arc(
                points[0],
                half,
                first + 3.0 * FRAC_PI_2,
                first + FRAC_PI_2,
                TRACE_CAP_SAMPLES,
            )?,
            discretize_arc(
                points[points.len() - 1],
                half,
                last + FRAC_PI_2,
                last - FRAC_PI_2,
                TRACE_CAP_SAMPLES,
            )?,
        )
    } else {
        (vec![left[0]], Vec::new())
    };

    let mut outline = left;
    outline.extend(end_cap);
    outline.extend(right.into_iter().rev());
    outline.extend(start_cap);
    Ok(outline)
}

/// The four corners of an axis-aligned rectangle in the fixed winding
/// `(x1,y1), (x1,y2), (x2,y2), (x2,y1)`.
pub fn rectangle(top_left: Point, bottom_right: Point) -> GeometryResult<Vec<Point>> {
    let a = top_left.ensure_finite()?;
    let b = bottom_right.ensure_finite()?;
    Ok(vec![
        Point::new(a.x, a.y),
        Point::new(a.x, b.y),
        Point::new(b.x, b.y),
        Point::new(b.x, a.y),
    ])
}

/// Closed outline of a rectangle with quarter-circle corners of `radius`,
/// `n` samples per corner.
///
/// Starts at `(x + r, y)` where `(x, y)` is the minimum corner and walks the
/// bottom edge, the `(max x, min y)` corner, the right edge and so on.
pub fn rounded_rectangle(
    corner_a: Point,
    corner_b: Point,
    radius: f64,
    n: usize,
) -> GeometryResult<Vec<Point>> {
    let a = corner_a.ensure_finite()?;
    let b = corner_b.ensure_finite()?;
    let r = GeometryError::check_radius(radius)?;
    GeometryError::check_samples(n, 2)?;

    let (x, y) = (a.x.min(b.x), a.y.min(b.y));
    let (w, h) = ((a.x - b.x).abs(), (a.y - b.y).abs());
    if 2.0 * r > w || 2.0 * r > h {
        return Err(GeometryError::InvalidRadius { radius: r });
    }

    let quarter = || linspace(0.0, FRAC_PI_2, n);
    let mut pts = Vec::with_capacity(4 * (n + 2));

    pts.push(Point::new(x + r, y));
    pts.push(Point::new(x + w - r, y));
    pts.extend(quarter().map(|t| Point::new(x + w - r * (1.0 - t.sin()), y + r * (1.0 - t.cos()))));
    pts.push(Point::new(x + w, y + r));
    pts.push(Point::new(x + w, y + h - r));
    pts.extend(quarter().map(|t| Point::new(x + w - r * (1.0 - t.cos()), y + h - r * (1.0 - t.sin()))));
    pts.push(Point::new(x + w - r, y + h));
    pts.push(Point::new(x + r, y + h));
    pts.extend(quarter().map(|t| Point::new(x + r * (1.0 - t.sin()), y + h - r * (1.0 - t.cos()))));
    pts.push(Point::new(x, y + h - r));
    pts.push(Point::new(x, y + r));
    pts.extend(quarter().map(|t| Point::new(x + r * (1.0 - t.cos()), y + r * (1.0 - t.sin()))));
    Ok(pts)
}

/// Translate every point by `(dx, dy)`.
pub fn translate(points: &[Point], dx: f64, dy: f64) -> Vec<Point> {
    points.iter().map(|p| p.offset(dx, dy)).collect()
}

/// Drop a trailing point that repeats the first one.
pub fn open_ring(points: &[Point]) -> &[Point] {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 && first.approx_eq(last, 1e-9) => {
            &points[..points.len() - 1]
        }
        _ => points,
    }
}

/// Signed area of a closed ring (positive for counter-clockwise).
pub fn polygon_area(points: &[Point]) -> f64 {
    let ring = open_ring(points);
    if ring.len() < 3 {
        return 0.0;
    }
    let mut pline = Polyline::new();
    for p in ring {
        pline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    pline.set_is_closed(true);
    pline.area()
}

/// Reject non-finite or coincident segment endpoints.
pub fn checked_segment(p1: Point, p2: Point) -> GeometryResult<(Point, Point)> {
    let p1 = p1.ensure_finite()?;
    let p2 = p2.ensure_finite()?;
    if p1 == p2 {
        return Err(GeometryError::DegenerateSegment { x: p1.x, y: p1.y });
    }
    Ok((p1, p2))
}

/// Heading of every edge, rejecting zero-length edges.
fn edge_headings(points: &[Point]) -> GeometryResult<Vec<f64>> {
    points
        .windows(2)
        .map(|w| checked_segment(w[0], w[1]).map(|(a, b)| a.heading_to(&b)))
        .collect()
}

/// `n` evenly spaced values from `start` to `end` inclusive. The last value
/// is exactly `end`.
fn linspace(start: f64, end: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { (end - start) / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| if i + 1 == n { end } else { start + step * i as f64 })
}
