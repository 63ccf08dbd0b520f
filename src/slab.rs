//! Slab-decomposition index over a fixed polygon set.
//!
//! # Design
//!
//! The x-coordinates of every vertex in the indexed set become slab
//! boundaries. Because boundaries are vertex x's, a non-vertical edge either
//! misses a slab entirely or spans its full width. Within a slab, edges are
//! grouped per polygon and each group is sorted by the edge's y at the slab
//! midpoint; a simple polygon's edges cannot cross inside a slab, so that
//! order is consistent at every x the slab covers and supports binary
//! search. A query binary-searches the slab containing the point's x, then
//! binary-searches each polygon group for the point's y, deriving the
//! group's upward-ray crossing parity from the partition position and
//! catching on-edge hits at the partition point.
//!
//! A point whose x is exactly a slab boundary may sit on edges that only
//! extend into the slab to its left (a local-max-x vertex); crossing parity
//! is unaffected, but edge hits are also probed in the left-adjacent slab.
//! Vertical edges have zero x-span and belong to no slab; they only matter
//! for the boundary-inclusive policy, so they live in a side list sorted by
//! x and are consulted on exact x hits.
//!
//! Build cost is O(E log E) plus the slab filing; queries cost
//! O(log(slabs)) plus O(log(edges-in-group)) per candidate polygon group,
//! where a naive scan is O(vertices) per polygon per query. The structure is
//! immutable once built.

use crate::geometry::{BBox, Point, Polygon};

/// A non-vertical edge filed into one or more slabs.
#[derive(Debug, Clone, Copy)]
struct Edge {
    a: Point,
    b: Point,
}

impl Edge {
    /// y of the edge at the given x. Caller guarantees a.x != b.x.
    fn y_at(&self, x: f64) -> f64 {
        self.a.y + (self.b.y - self.a.y) * (x - self.a.x) / (self.b.x - self.a.x)
    }
}

/// One polygon's edges within one slab: a range of the edge arena, sorted
/// by y at the slab midpoint.
#[derive(Debug, Clone, Copy)]
struct EdgeGroup {
    /// Index into the index's polygon table.
    poly: u32,
    start: u32,
    end: u32,
}

/// A vertical edge, kept aside for boundary hits.
#[derive(Debug, Clone, Copy)]
struct VerticalEdge {
    poly: u32,
    x: f64,
    y_min: f64,
    y_max: f64,
}

/// Per-polygon entry: row id and tie-break weight.
#[derive(Debug, Clone, Copy)]
struct PolyRef {
    id: u64,
    area: f64,
}

/// Vertical-decomposition index over one polygon or a fixed working set.
///
/// Built once, immutable thereafter. Queries return the row id of the
/// smallest-area containing polygon; boundary points count as contained.
#[derive(Debug, Clone)]
pub struct SlabIndex {
    /// Union bounding box of the indexed polygons. None when empty.
    bbox: Option<BBox>,

    /// Sorted, deduplicated vertex x-coordinates.
    boundaries: Vec<f64>,

    /// Edge arena, grouped by slab and polygon.
    edges: Vec<Edge>,

    /// Per-slab polygon groups.
    groups: Vec<EdgeGroup>,

    /// Offsets into `groups`; slab `s` owns `groups[offsets[s]..offsets[s+1]]`.
    offsets: Vec<u32>,

    /// Vertical edges sorted by x.
    verticals: Vec<VerticalEdge>,

    /// Indexed polygons: row id and area, in local index order.
    polys: Vec<PolyRef>,
}

impl SlabIndex {
    /// Build an index over the given polygons.
    ///
    /// Collects every ring vertex's x-coordinate into slab boundaries, files
    /// each edge into the slabs its x-span covers, and sorts each slab's
    /// edges by polygon and by their y at the slab midpoint.
    pub fn build<'a, I>(polygons: I) -> Self
    where
        I: IntoIterator<Item = &'a Polygon>,
    {
        let polygons: Vec<&Polygon> = polygons.into_iter().collect();
        if polygons.is_empty() {
            return Self::empty();
        }

        let polys: Vec<PolyRef> = polygons
            .iter()
            .map(|p| PolyRef {
                id: p.id(),
                area: p.area(),
            })
            .collect();

        let mut bbox = *polygons[0].bbox();
        for p in &polygons[1..] {
            bbox = bbox.union(p.bbox());
        }

        let mut boundaries: Vec<f64> = polygons
            .iter()
            .flat_map(|p| std::iter::once(p.outer()).chain(p.holes().iter()))
            .flat_map(|ring| ring.points().iter().map(|pt| pt.x))
            .collect();
        boundaries.sort_unstable_by(f64::total_cmp);
        boundaries.dedup();

        let slab_count = boundaries.len().saturating_sub(1);
        let mut slabs: Vec<Vec<(u32, Edge)>> = vec![Vec::new(); slab_count];
        let mut verticals: Vec<VerticalEdge> = Vec::new();

        for (poly, polygon) in polygons.iter().enumerate() {
            let poly = poly as u32;
            let rings = std::iter::once(polygon.outer()).chain(polygon.holes().iter());
            for ring in rings {
                for (a, b) in ring.edges() {
                    if a.x == b.x {
                        verticals.push(VerticalEdge {
                            poly,
                            x: a.x,
                            y_min: a.y.min(b.y),
                            y_max: a.y.max(b.y),
                        });
                        continue;
                    }
                    let (lo, hi) = if a.x < b.x { (a.x, b.x) } else { (b.x, a.x) };
                    // lo and hi are themselves boundaries, so this lands on
                    // the first slab the edge covers.
                    let start = boundaries.partition_point(|&x| x < lo);
                    for s in start..slab_count {
                        if boundaries[s + 1] > hi {
                            break;
                        }
                        slabs[s].push((poly, Edge { a, b }));
                    }
                }
            }
        }

        let mut edges = Vec::with_capacity(slabs.iter().map(Vec::len).sum());
        let mut groups: Vec<EdgeGroup> = Vec::new();
        let mut offsets = Vec::with_capacity(slab_count + 1);
        offsets.push(0u32);
        for (s, mut slab) in slabs.into_iter().enumerate() {
            let mid = (boundaries[s] + boundaries[s + 1]) / 2.0;
            slab.sort_unstable_by(|(p1, e1), (p2, e2)| {
                p1.cmp(p2).then(e1.y_at(mid).total_cmp(&e2.y_at(mid)))
            });
            // Groups are contiguous runs of one polygon within the slab.
            let mut run_poly = None;
            for (poly, edge) in slab {
                if run_poly != Some(poly) {
                    groups.push(EdgeGroup {
                        poly,
                        start: edges.len() as u32,
                        end: edges.len() as u32,
                    });
                    run_poly = Some(poly);
                }
                edges.push(edge);
                if let Some(group) = groups.last_mut() {
                    group.end = edges.len() as u32;
                }
            }
            offsets.push(groups.len() as u32);
        }

        verticals.sort_unstable_by(|v1, v2| v1.x.total_cmp(&v2.x));

        Self {
            bbox: Some(bbox),
            boundaries,
            edges,
            groups,
            offsets,
            verticals,
            polys,
        }
    }

    fn empty() -> Self {
        Self {
            bbox: None,
            boundaries: Vec::new(),
            edges: Vec::new(),
            groups: Vec::new(),
            offsets: vec![0],
            verticals: Vec::new(),
            polys: Vec::new(),
        }
    }

    /// Number of indexed polygons.
    pub fn polygon_count(&self) -> usize {
        self.polys.len()
    }

    /// Number of slabs.
    pub fn slab_count(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }

    /// Polygon groups of slab `s`.
    fn slab_groups(&self, s: usize) -> &[EdgeGroup] {
        &self.groups[self.offsets[s] as usize..self.offsets[s + 1] as usize]
    }

    /// Edges of one group, in slab y-order.
    fn group_edges(&self, group: &EdgeGroup) -> &[Edge] {
        &self.edges[group.start as usize..group.end as usize]
    }

    /// Find the smallest-area indexed polygon containing `p`.
    ///
    /// Fails fast for points outside the union bounding box. When several
    /// polygons of exactly equal area contain the point, any qualifying row
    /// id may be returned.
    pub fn query(&self, p: Point) -> Option<u64> {
        let bbox = self.bbox.as_ref()?;
        if !bbox.contains_point(p) {
            return None;
        }

        let mut best: Option<(f64, u64)> = None;
        let mut consider = |local: u32, best: &mut Option<(f64, u64)>| {
            let poly = &self.polys[local as usize];
            match *best {
                Some((area, _)) if area <= poly.area => {}
                _ => *best = Some((poly.area, poly.id)),
            }
        };

        if self.slab_count() > 0 {
            // Points at the right-most boundary clamp to the last slab; no
            // edge straddles them, so only edge hits can match there.
            let slab = self
                .boundaries
                .partition_point(|&x| x <= p.x)
                .saturating_sub(1)
                .min(self.slab_count() - 1);

            for group in self.slab_groups(slab) {
                let edges = self.group_edges(group);
                // Every edge spans the slab, so the group's y-order holds at
                // p.x and the partition is valid.
                let below = edges.partition_point(|e| e.y_at(p.x) < p.y);
                let mut equal = 0;
                while below + equal < edges.len() && edges[below + equal].y_at(p.x) == p.y {
                    equal += 1;
                }
                let above = edges.len() - below - equal;
                if equal > 0 || above % 2 == 1 {
                    consider(group.poly, &mut best);
                }
            }

            // A point exactly on this slab's left boundary may sit on edges
            // that only extend into the slab to the left, such as a polygon's
            // right-most vertex. Parity is unaffected there; only edge hits
            // need the extra probe.
            if slab > 0 && self.boundaries[slab] == p.x {
                for group in self.slab_groups(slab - 1) {
                    let edges = self.group_edges(group);
                    let pos = edges.partition_point(|e| e.y_at(p.x) < p.y);
                    if pos < edges.len() && edges[pos].y_at(p.x) == p.y {
                        consider(group.poly, &mut best);
                    }
                }
            }
        }

        let start = self.verticals.partition_point(|v| v.x < p.x);
        for v in &self.verticals[start..] {
            if v.x != p.x {
                break;
            }
            if p.y >= v.y_min && p.y <= v.y_max {
                consider(v.poly, &mut best);
            }
        }

        best.map(|(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn square(id: u64, lo: f64, hi: f64) -> Polygon {
        Polygon::new(id, vec![pts(&[(lo, lo), (hi, lo), (hi, hi), (lo, hi)])]).unwrap()
    }

    #[test]
    fn single_polygon_queries() {
        let p = square(42, 0.0, 10.0);
        let index = SlabIndex::build(std::iter::once(&p));
        assert_eq!(index.query(Point::new(5.0, 5.0)), Some(42));
        assert_eq!(index.query(Point::new(11.0, 5.0)), None);
        assert_eq!(index.query(Point::new(5.0, -0.1)), None);
    }

    #[test]
    fn boundary_points_hit() {
        let p = square(7, 0.0, 10.0);
        let index = SlabIndex::build(std::iter::once(&p));
        // Corner, horizontal edge, and vertical edge (side-list path).
        assert_eq!(index.query(Point::new(0.0, 0.0)), Some(7));
        assert_eq!(index.query(Point::new(5.0, 10.0)), Some(7));
        assert_eq!(index.query(Point::new(0.0, 5.0)), Some(7));
        assert_eq!(index.query(Point::new(10.0, 5.0)), Some(7));
        assert_eq!(index.query(Point::new(10.0, 10.0)), Some(7));
    }

    #[test]
    fn smaller_area_wins_in_merged_set() {
        let outer = square(0, 0.0, 10.0);
        let inner = square(1, 2.0, 4.0);
        let index = SlabIndex::build([&outer, &inner]);
        assert_eq!(index.query(Point::new(3.0, 3.0)), Some(1));
        assert_eq!(index.query(Point::new(8.0, 8.0)), Some(0));
        assert_eq!(index.query(Point::new(20.0, 20.0)), None);
        // Inner boundary points prefer the inner polygon.
        assert_eq!(index.query(Point::new(2.0, 3.0)), Some(1));
        assert_eq!(index.query(Point::new(4.0, 3.0)), Some(1));
        assert_eq!(index.query(Point::new(3.0, 4.0)), Some(1));
    }

    #[test]
    fn rightmost_vertex_on_interior_slab_boundary() {
        // The triangle's right-most vertex sits at x = 5, which is an
        // interior slab boundary because the square contributes boundaries
        // further right. Both incident edges extend left, so the edge hit
        // must be found in the slab to the left of the vertex.
        let tri = Polygon::new(0, vec![pts(&[(0.0, 0.0), (5.0, 5.0), (0.0, 10.0)])]).unwrap();
        let sq = square(1, 6.0, 10.0);
        let index = SlabIndex::build([&tri, &sq]);
        assert_eq!(index.query(Point::new(5.0, 5.0)), Some(0));
        // Just past the vertex: inside neither polygon.
        assert_eq!(index.query(Point::new(5.5, 5.0)), None);
        // Interior of each polygon is unaffected by the extra probe.
        assert_eq!(index.query(Point::new(1.0, 5.0)), Some(0));
        assert_eq!(index.query(Point::new(8.0, 8.0)), Some(1));
    }

    #[test]
    fn hole_parity_carries_through() {
        let donut = Polygon::new(
            5,
            vec![
                pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
                pts(&[(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]),
            ],
        )
        .unwrap();
        let index = SlabIndex::build(std::iter::once(&donut));
        assert_eq!(index.query(Point::new(5.0, 5.0)), None);
        assert_eq!(index.query(Point::new(2.0, 5.0)), Some(5));
        // Hole boundary is polygon boundary.
        assert_eq!(index.query(Point::new(4.0, 5.0)), Some(5));
    }

    #[test]
    fn triangle_slanted_edges() {
        let tri = Polygon::new(9, vec![pts(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)])]).unwrap();
        let index = SlabIndex::build(std::iter::once(&tri));
        assert_eq!(index.query(Point::new(5.0, 3.0)), Some(9));
        assert_eq!(index.query(Point::new(5.0, 8.0)), Some(9));
        assert_eq!(index.query(Point::new(1.0, 5.0)), None);
        assert_eq!(index.query(Point::new(9.0, 5.0)), None);
    }

    #[test]
    fn empty_index() {
        let index = SlabIndex::build(std::iter::empty());
        assert_eq!(index.query(Point::new(0.0, 0.0)), None);
        assert_eq!(index.polygon_count(), 0);
    }

    #[test]
    fn slab_boundaries_deduplicated() {
        let a = square(0, 0.0, 10.0);
        let b = square(1, 0.0, 10.0);
        let index = SlabIndex::build([&a, &b]);
        assert_eq!(index.slab_count(), 1);
        // Equal areas: either id qualifies.
        let id = index.query(Point::new(5.0, 5.0));
        assert!(id == Some(0) || id == Some(1));
    }
}
