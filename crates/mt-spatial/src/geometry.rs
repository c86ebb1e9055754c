//! Edge polyline geometry.
//!
//! Each directed edge carries a `geo::LineString` in the graph's planar
//! coordinate system.  Positions along an edge are addressed by a normalized
//! arc-length fraction: `0.0` is the first vertex, `1.0` the last, and
//! intermediate values walk the polyline at constant speed.

use geo::{Coord, Euclidean, InterpolatableLine, Length, LineString};

use mt_core::PlanarPoint;

#[inline]
fn to_coord(p: PlanarPoint) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

#[inline]
fn to_point(c: Coord<f64>) -> PlanarPoint {
    PlanarPoint::new(c.x, c.y)
}

/// A polyline plus its cached Euclidean length.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeGeometry {
    line:     LineString<f64>,
    length_m: f64,
}

impl EdgeGeometry {
    /// Wrap a line string.  Returns `None` if it has fewer than two vertices
    /// or any non-finite coordinate.
    pub fn new(line: LineString<f64>) -> Option<Self> {
        if line.0.len() < 2 || line.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return None;
        }
        let length_m = Euclidean.length(&line);
        Some(Self { line, length_m })
    }

    /// Straight two-vertex segment `a → b`.
    pub fn straight(a: PlanarPoint, b: PlanarPoint) -> Self {
        let line = LineString::new(vec![to_coord(a), to_coord(b)]);
        Self { length_m: Euclidean.length(&line), line }
    }

    /// Build from planar vertices (see [`new`](Self::new) for `None` cases).
    pub fn from_points(points: &[PlanarPoint]) -> Option<Self> {
        Self::new(LineString::new(points.iter().copied().map(to_coord).collect()))
    }

    /// Underlying line string.
    #[inline]
    pub fn line(&self) -> &LineString<f64> {
        &self.line
    }

    /// Total polyline length in metres.
    #[inline]
    pub fn length_m(&self) -> f64 {
        self.length_m
    }

    #[inline]
    pub fn start(&self) -> PlanarPoint {
        to_point(self.line.0[0])
    }

    #[inline]
    pub fn end(&self) -> PlanarPoint {
        to_point(self.line.0[self.line.0.len() - 1])
    }

    /// The same polyline traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            line:     LineString::new(self.line.0.iter().rev().copied().collect()),
            length_m: self.length_m,
        }
    }

    /// Position at normalized arc-length `fraction` (clamped to `[0, 1]`).
    ///
    /// A zero-length polyline always yields its first vertex.
    pub fn interpolate(&self, fraction: f64) -> PlanarPoint {
        let fraction = fraction.clamp(0.0, 1.0);
        if self.length_m <= 0.0 {
            return self.start();
        }
        self.line
            .point_at_ratio_from_start(&Euclidean, fraction)
            .map_or_else(|| self.start(), |p| to_point(p.0))
    }
}
