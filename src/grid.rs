//! Recursive grid partitioning the corpus bounding box.
//!
//! # Design
//!
//! The grid is a flat arena of cells addressed by index, with child links
//! stored as indices rather than owning references. This keeps the tree
//! acyclic, cache-friendly, and trivially rebuildable. The root cell covers
//! the union bounding box of every polygon; a cell splits into four
//! quadrants (bisecting both axes) while more than `min_intersections`
//! polygon bounding boxes intersect it and `max_depth` has not been reached.
//! Terminal cells hold a strategy-specific payload: a candidate id bucket,
//! or a slab index built over exactly the polygons intersecting the cell.
//!
//! Descent walks from the root, picking the quadrant containing the point at
//! each level, so a lookup is O(max_depth). Points outside the root box
//! short-circuit to "no match".

use crate::config::GridConfig;
use crate::geometry::{BBox, Point, Polygon};
use crate::slab::SlabIndex;

/// Terminal-cell payload, built from the candidates intersecting the cell.
pub trait LeafPayload: Sized {
    /// Build the payload from candidate corpus indices.
    fn from_candidates(candidates: Vec<u32>, polygons: &[Polygon]) -> Self;
}

/// Candidate bucket: corpus indices of polygons whose bounding box
/// intersects the cell. Used with a side array of per-polygon slab indexes.
#[derive(Debug, Clone)]
pub struct BucketLeaf {
    candidates: Vec<u32>,
}

impl BucketLeaf {
    /// Candidate corpus indices.
    pub fn candidates(&self) -> &[u32] {
        &self.candidates
    }
}

impl LeafPayload for BucketLeaf {
    fn from_candidates(candidates: Vec<u32>, _polygons: &[Polygon]) -> Self {
        Self { candidates }
    }
}

/// Self-contained leaf: a slab index over exactly the polygons intersecting
/// the cell.
#[derive(Debug, Clone)]
pub struct SlabLeaf {
    index: SlabIndex,
}

impl SlabLeaf {
    /// The embedded slab index.
    pub fn index(&self) -> &SlabIndex {
        &self.index
    }
}

impl LeafPayload for SlabLeaf {
    fn from_candidates(candidates: Vec<u32>, polygons: &[Polygon]) -> Self {
        Self {
            index: SlabIndex::build(candidates.iter().map(|&i| &polygons[i as usize])),
        }
    }
}

#[derive(Debug, Clone)]
enum CellKind<L> {
    /// Child cell indices in quadrant order: [SW, SE, NW, NE].
    Branch([u32; 4]),
    Leaf(L),
}

#[derive(Debug, Clone)]
struct Cell<L> {
    bbox: BBox,
    depth: usize,
    kind: CellKind<L>,
}

/// The cell tree. Owns a flat arena; cell 0 is the root.
#[derive(Debug, Clone)]
pub struct GridRoot<L> {
    cells: Vec<Cell<L>>,
    bbox: Option<BBox>,
}

impl<L: LeafPayload> GridRoot<L> {
    /// Build the grid over the whole corpus.
    pub fn build(polygons: &[Polygon], config: &GridConfig) -> Self {
        let bbox = polygons
            .iter()
            .map(Polygon::bbox)
            .fold(None::<BBox>, |acc, b| {
                Some(acc.map_or(*b, |u| u.union(b)))
            });
        let Some(bbox) = bbox else {
            return Self {
                cells: Vec::new(),
                bbox: None,
            };
        };

        let candidates: Vec<u32> = (0..polygons.len() as u32).collect();
        let mut cells = Vec::new();
        build_cell(&mut cells, polygons, config, candidates, bbox, 0);
        Self {
            cells,
            bbox: Some(bbox),
        }
    }
}

impl<L> GridRoot<L> {
    /// Walk from the root to the terminal cell containing `p`.
    ///
    /// Returns None in O(1) for points outside the root bounding box.
    pub fn descend(&self, p: Point) -> Option<&L> {
        let bbox = self.bbox.as_ref()?;
        if !bbox.contains_point(p) {
            return None;
        }
        let mut cell = &self.cells[0];
        loop {
            match &cell.kind {
                CellKind::Leaf(payload) => return Some(payload),
                CellKind::Branch(children) => {
                    let cx = (cell.bbox.min_x + cell.bbox.max_x) / 2.0;
                    let cy = (cell.bbox.min_y + cell.bbox.max_y) / 2.0;
                    let ix = usize::from(p.x > cx);
                    let iy = usize::from(p.y > cy);
                    cell = &self.cells[children[iy * 2 + ix] as usize];
                }
            }
        }
    }

    /// Union bounding box of the corpus, if any polygons exist.
    pub fn bbox(&self) -> Option<&BBox> {
        self.bbox.as_ref()
    }

    /// Total cell count, branches included.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of terminal cells.
    pub fn leaf_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c.kind, CellKind::Leaf(_)))
            .count()
    }

    /// Deepest cell in the tree.
    pub fn depth(&self) -> usize {
        self.cells.iter().map(|c| c.depth).max().unwrap_or(0)
    }

    /// Iterate terminal cells as (bounding box, depth, payload).
    pub fn leaves(&self) -> impl Iterator<Item = (&BBox, usize, &L)> {
        self.cells.iter().filter_map(|c| match &c.kind {
            CellKind::Leaf(payload) => Some((&c.bbox, c.depth, payload)),
            CellKind::Branch(_) => None,
        })
    }
}

/// Recursively build the cell at `bbox`, returning its arena index.
fn build_cell<L: LeafPayload>(
    cells: &mut Vec<Cell<L>>,
    polygons: &[Polygon],
    config: &GridConfig,
    candidates: Vec<u32>,
    bbox: BBox,
    depth: usize,
) -> u32 {
    let index = cells.len() as u32;
    if candidates.len() <= config.min_intersections || depth >= config.max_depth {
        cells.push(Cell {
            bbox,
            depth,
            kind: CellKind::Leaf(L::from_candidates(candidates, polygons)),
        });
        return index;
    }

    // Reserve the branch slot before its children so cell 0 stays the root.
    cells.push(Cell {
        bbox,
        depth,
        kind: CellKind::Branch([0; 4]),
    });

    let cx = (bbox.min_x + bbox.max_x) / 2.0;
    let cy = (bbox.min_y + bbox.max_y) / 2.0;
    let quadrants = [
        BBox::new(bbox.min_x, bbox.min_y, cx, cy),
        BBox::new(cx, bbox.min_y, bbox.max_x, cy),
        BBox::new(bbox.min_x, cy, cx, bbox.max_y),
        BBox::new(cx, cy, bbox.max_x, bbox.max_y),
    ];

    let mut children = [0u32; 4];
    for (slot, qbox) in children.iter_mut().zip(quadrants) {
        let sub: Vec<u32> = candidates
            .iter()
            .copied()
            .filter(|&i| polygons[i as usize].bbox().intersects(&qbox))
            .collect();
        *slot = build_cell(cells, polygons, config, sub, qbox, depth + 1);
    }
    cells[index as usize].kind = CellKind::Branch(children);
    index
}
