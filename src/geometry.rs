//! Geometry model: points, rings, polygons, and the containment primitive.
//!
//! # Design
//!
//! Polygons are validated at construction, so an invalid polygon (ring with
//! fewer than three distinct vertices, zero enclosed area, non-finite
//! coordinate) cannot exist inside a dictionary. Area and bounding box are
//! computed once and cached alongside each polygon for fast filtering and
//! tie-breaking without re-walking rings at query time.
//!
//! Containment uses the even-odd ray-casting rule over the outer ring, with
//! each hole's parity combined by exclusive-or. Boundary points, hole edges
//! included, are contained; this is a fixed policy for determinism, not a
//! per-call option.

use crate::error::{DictError, Result};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Compute from a non-empty point slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self::new(first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        Some(bbox)
    }

    /// Smallest box covering both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Check if this box intersects another (boundary touch counts).
    pub fn intersects(&self, other: &BBox) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Check if this box contains a point (boundary inclusive).
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// One closed boundary loop: an outer ring or a hole.
///
/// Stored without a closing duplicate vertex; the edge from the last vertex
/// back to the first is implicit.
#[derive(Debug, Clone)]
pub struct Ring {
    points: Vec<Point>,
}

impl Ring {
    /// Build a ring from a vertex sequence, validating as it goes.
    ///
    /// A trailing vertex equal to the first is accepted and dropped. The ring
    /// must keep at least three vertices and enclose nonzero area.
    pub fn new(mut points: Vec<Point>, polygon_id: u64) -> Result<Self> {
        for p in &points {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(DictError::NonFiniteCoordinate { polygon_id });
            }
        }
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return Err(DictError::RingTooSmall {
                polygon_id,
                vertices: points.len(),
            });
        }
        let ring = Self { points };
        if ring.signed_area() == 0.0 {
            return Err(DictError::DegenerateRing { polygon_id });
        }
        Ok(ring)
    }

    /// Ring vertices, closing edge implicit.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Signed shoelace area. Positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        let mut sum = 0.0;
        for (a, b) in self.edges() {
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    /// Enclosed area, winding-independent.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Iterate the ring's edges, including the implicit closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Even-odd crossing parity of an upward ray from `p`.
    ///
    /// Uses the half-open vertex rule so a ray through a shared vertex counts
    /// exactly one of the two incident edges.
    pub fn crossing_parity(&self, p: Point) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.x <= p.x) != (b.x <= p.x) {
                let y_at = a.y + (b.y - a.y) * (p.x - a.x) / (b.x - a.x);
                if y_at > p.y {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Check if `p` lies on an edge or vertex of this ring.
    pub fn on_boundary(&self, p: Point) -> bool {
        self.edges().any(|(a, b)| point_on_segment(p, a, b))
    }
}

/// Check if `p` lies on the closed segment from `a` to `b`.
pub(crate) fn point_on_segment(p: Point, a: Point, b: Point) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if cross != 0.0 {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// A polygon: one outer ring plus zero or more holes, identified by the
/// corpus row id it came from.
#[derive(Debug, Clone)]
pub struct Polygon {
    id: u64,
    outer: Ring,
    holes: Vec<Ring>,
    area: f64,
    bbox: BBox,
}

impl Polygon {
    /// Build and validate a polygon from vertex sequences, outer ring first.
    pub fn new(id: u64, mut rings: Vec<Vec<Point>>) -> Result<Self> {
        if rings.is_empty() {
            return Err(DictError::RingTooSmall {
                polygon_id: id,
                vertices: 0,
            });
        }
        let outer = Ring::new(rings.remove(0), id)?;
        let holes = rings
            .into_iter()
            .map(|r| Ring::new(r, id))
            .collect::<Result<Vec<_>>>()?;

        let area = outer.area() - holes.iter().map(Ring::area).sum::<f64>();
        let bbox = BBox::from_points(outer.points()).ok_or(DictError::RingTooSmall {
            polygon_id: id,
            vertices: 0,
        })?;
        Ok(Self {
            id,
            outer,
            holes,
            area,
            bbox,
        })
    }

    /// Corpus row id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Outer boundary ring.
    pub fn outer(&self) -> &Ring {
        &self.outer
    }

    /// Hole rings.
    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    /// Enclosed area: outer ring area minus hole areas. Tie-break weight
    /// only, never consulted for containment.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Bounding box of the outer ring.
    pub fn bbox(&self) -> &BBox {
        &self.bbox
    }

    /// Even-odd containment test with holes subtracted. O(vertices).
    ///
    /// Boundary points are contained, hole boundaries included.
    pub fn contains(&self, p: Point) -> bool {
        if !self.bbox.contains_point(p) {
            return false;
        }
        if self.outer.on_boundary(p) || self.holes.iter().any(|h| h.on_boundary(p)) {
            return true;
        }
        let mut inside = self.outer.crossing_parity(p);
        for hole in &self.holes {
            inside ^= hole.crossing_parity(p);
        }
        inside
    }
}
