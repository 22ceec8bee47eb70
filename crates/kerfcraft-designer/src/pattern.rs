//! Laser cutting pattern model.
//!
//! A [`Pattern`] is an append-only list of [`Primitive`] records. Each record
//! carries its resolved [`DrawStyle`] and an `exact_for_export` flag: exact
//! records are emitted by precise exporters (DXF), all records are emitted by
//! preview exporters (SVG).

use kerfcraft_core::constants::{CIRCLE_SAMPLES, KERF_CAP_SAMPLES};
use kerfcraft_core::{DrawMode, DrawStyle, GeometryError, GeometryResult, MachineProfile, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

use crate::geometry::{self, checked_segment, CircularArc};

/// Kerf compensation for a straight cut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kerf {
    /// Half of the material width removed by the beam, in millimeters.
    pub radius: f64,
    /// Samples on each semicircular end cap.
    pub samples: usize,
}

impl Kerf {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            samples: KERF_CAP_SAMPLES,
        }
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }
}

/// Geometry of a recorded primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Segment { p1: Point, p2: Point },
    /// A circular arc, drawn as `samples` points by preview exporters.
    Arc { arc: CircularArc, samples: usize },
    /// Implicitly closed.
    Polygon { points: Vec<Point> },
}

impl Shape {
    /// Line segments a stroke preview draws for this shape.
    pub fn stroke_segments(&self) -> GeometryResult<Vec<(Point, Point)>> {
        Ok(match self {
            Shape::Segment { p1, p2 } => vec![(*p1, *p2)],
            Shape::Arc { arc, samples } => {
                let pts = arc.sample(*samples)?;
                pts.windows(2).map(|w| (w[0], w[1])).collect()
            }
            Shape::Polygon { points } => closed_edges(points),
        })
    }
}

/// One recorded drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub shape: Shape,
    pub style: DrawStyle,
    /// False for preview-only records that precise exporters must skip.
    pub exact_for_export: bool,
}

/// Text alignment relative to the anchor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAnchor {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    #[default]
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// A text passthrough record. Never converted to paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    pub position: Point,
    pub text: String,
    pub size: f64,
    pub anchor: TextAnchor,
}

/// Ordered collection of laser primitives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pattern {
    profile: MachineProfile,
    primitives: Vec<Primitive>,
    texts: Vec<TextRecord>,
}

impl Pattern {
    pub fn new(profile: MachineProfile) -> Self {
        Self {
            profile,
            primitives: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn profile(&self) -> &MachineProfile {
        &self.profile
    }

    /// Record a straight cut from `p1` to `p2`.
    ///
    /// Without kerf this is a single exact segment. With kerf the cut is
    /// replaced by its compensated outline: both long edges as exact
    /// segments, both semicircular caps as arcs.
    pub fn add_line(
        &mut self,
        p1: Point,
        p2: Point,
        kerf: Option<Kerf>,
        mode: DrawMode,
    ) -> GeometryResult<()> {
        let style = self.profile.style(mode);
        match kerf {
            None => {
                let (p1, p2) = checked_segment(p1, p2)?;
                self.push(Shape::Segment { p1, p2 }, style, true);
            }
            Some(kerf) => {
                GeometryError::check_samples(kerf.samples, 2)?;
                let outline = geometry::kerf_outline(p1, p2, kerf.radius)?;
                self.push(
                    Shape::Segment {
                        p1: outline.top.0,
                        p2: outline.top.1,
                    },
                    style,
                    true,
                );
                self.push(
                    Shape::Arc {
                        arc: outline.far_cap,
                        samples: kerf.samples,
                    },
                    style,
                    true,
                );
                self.push(
                    Shape::Segment {
                        p1: outline.bottom.0,
                        p2: outline.bottom.1,
                    },
                    style,
                    true,
                );
                self.push(
                    Shape::Arc {
                        arc: outline.near_cap,
                        samples: kerf.samples,
                    },
                    style,
                    true,
                );
            }
        }
        Ok(())
    }

    /// Record `add_line` for every consecutive pair of `points`.
    pub fn add_lines(
        &mut self,
        points: &[Point],
        kerf: Option<Kerf>,
        mode: DrawMode,
    ) -> GeometryResult<()> {
        for pair in points.windows(2) {
            self.add_line(pair[0], pair[1], kerf, mode)?;
        }
        Ok(())
    }

    /// Record a segment that only appears in previews.
    pub fn add_visual_line(&mut self, p1: Point, p2: Point, mode: DrawMode) -> GeometryResult<()> {
        let (p1, p2) = checked_segment(p1, p2)?;
        let style = self.profile.style(mode);
        self.push(Shape::Segment { p1, p2 }, style, false);
        Ok(())
    }

    pub fn add_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        samples: usize,
        mode: DrawMode,
    ) -> GeometryResult<()> {
        GeometryError::check_samples(samples, 2)?;
        let arc = CircularArc::new(center, radius, start_angle, end_angle)?;
        let style = self.profile.style(mode);
        self.push(Shape::Arc { arc, samples }, style, true);
        Ok(())
    }

    /// Full circle, `0 → 2π`. `None` uses six samples.
    pub fn add_circle(
        &mut self,
        center: Point,
        radius: f64,
        samples: Option<usize>,
        mode: DrawMode,
    ) -> GeometryResult<()> {
        self.add_arc(
            center,
            radius,
            0.0,
            2.0 * PI,
            samples.unwrap_or(CIRCLE_SAMPLES),
            mode,
        )
    }

    /// Axis-aligned rectangle, recorded as the polygon
    /// `(x1,y1), (x1,y2), (x2,y2), (x2,y1)`.
    pub fn add_rectangle(
        &mut self,
        top_left: Point,
        bottom_right: Point,
        mode: DrawMode,
    ) -> GeometryResult<()> {
        let points = geometry::rectangle(top_left, bottom_right)?;
        let style = self.profile.style(mode);
        self.push(Shape::Polygon { points }, style, true);
        Ok(())
    }

    pub fn add_polygon(&mut self, points: &[Point], mode: DrawMode) -> GeometryResult<()> {
        if points.len() < 3 {
            return Err(GeometryError::TooFewPoints {
                operation: "polygon",
                count: points.len(),
                min: 3,
            });
        }
        let points = points
            .iter()
            .map(|p| p.ensure_finite())
            .collect::<GeometryResult<Vec<_>>>()?;
        let style = self.profile.style(mode);
        self.push(Shape::Polygon { points }, style, true);
        Ok(())
    }

    pub fn add_text(
        &mut self,
        position: Point,
        text: impl Into<String>,
        size: f64,
        anchor: TextAnchor,
    ) -> GeometryResult<()> {
        self.texts.push(TextRecord {
            position: position.ensure_finite()?,
            text: text.into(),
            size: GeometryError::check_width(size)?,
            anchor,
        });
        Ok(())
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn texts(&self) -> &[TextRecord] {
        &self.texts
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Records precise exporters emit.
    pub fn exact_primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(|p| p.exact_for_export)
    }

    fn push(&mut self, shape: Shape, style: DrawStyle, exact_for_export: bool) {
        debug!(
            "Pattern record #{}: {:?} ({})",
            self.primitives.len(),
            shape_name(&shape),
            style.mode
        );
        self.primitives.push(Primitive {
            shape,
            style,
            exact_for_export,
        });
    }
}

fn shape_name(shape: &Shape) -> &'static str {
    match shape {
        Shape::Segment { .. } => "segment",
        Shape::Arc { .. } => "arc",
        Shape::Polygon { .. } => "polygon",
    }
}

/// Edges of an implicitly closed ring, including the closing edge.
pub fn closed_edges(points: &[Point]) -> Vec<(Point, Point)> {
    let ring = geometry::open_ring(points);
    (0..ring.len())
        .map(|i| (ring[i], ring[(i + 1) % ring.len()]))
        .collect()
}
