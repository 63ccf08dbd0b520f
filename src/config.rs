//! Dictionary configuration types.
//!
//! All parameters are fixed per instance at construction time. Reconfiguring
//! means building a new dictionary; a ready instance is never mutated.

use serde::{Deserialize, Serialize};

/// Configuration for the recursive grid.
///
/// Controls how far the grid subdivides and how large leaf candidate sets
/// may grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// A cell stops subdividing once the number of polygons whose bounding
    /// box intersects it is at most this. Default: 1.
    pub min_intersections: usize,

    /// Hard cap on subdivision depth. Guards against unbounded refinement
    /// when polygons cluster densely. Default: 5.
    pub max_depth: usize,
}

impl GridConfig {
    /// Default candidate threshold below which a cell stops subdividing.
    pub const MIN_INTERSECTIONS_DEFAULT: usize = 1;

    /// Default recursion depth cap.
    pub const MAX_DEPTH_DEFAULT: usize = 5;
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_intersections: Self::MIN_INTERSECTIONS_DEFAULT,
            max_depth: Self::MAX_DEPTH_DEFAULT,
        }
    }
}

/// How ring geometry arrives from the corpus source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputLayout {
    /// Each ring is a list of points.
    RingPoints,

    /// Each ring is a flattened coordinate array.
    FlatCoordinates,
}

/// How individual points are encoded within the input layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointEncoding {
    /// One paired field per point.
    Paired,

    /// Two separate coordinate fields.
    Split,
}

/// Index representation, selected once at construction.
///
/// A closed set: the strategy space is fixed and known, so no open-ended
/// extension point is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexStrategy {
    /// No index. Every query scans all polygons. Zero build cost; best for
    /// small corpora.
    Exhaustive,

    /// Recursive grid whose leaves hold candidate id buckets, plus one slab
    /// index per polygon. Moderate build cost; query cost scales with leaf
    /// bucket size.
    GridBucket,

    /// Recursive grid whose leaves each embed a slab index over exactly the
    /// polygons intersecting that leaf. Highest build cost, fastest query.
    GridMergedLeaf,
}

/// Configuration for building a polygon dictionary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DictConfig {
    /// Index representation to build.
    pub strategy: IndexStrategy,

    /// Grid tunables (ignored by [`IndexStrategy::Exhaustive`]).
    pub grid: GridConfig,

    /// Ring layout expected from the corpus source.
    pub input_layout: InputLayout,

    /// Point encoding expected from the corpus source.
    pub point_encoding: PointEncoding,
}

impl Default for DictConfig {
    fn default() -> Self {
        Self {
            strategy: IndexStrategy::GridBucket,
            grid: GridConfig::default(),
            input_layout: InputLayout::RingPoints,
            point_encoding: PointEncoding::Paired,
        }
    }
}

impl DictConfig {
    /// Create a config for the given strategy with default tunables.
    pub fn new(strategy: IndexStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Set grid tunables.
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Set the expected ring layout.
    pub fn with_input_layout(mut self, layout: InputLayout) -> Self {
        self.input_layout = layout;
        self
    }

    /// Set the expected point encoding.
    pub fn with_point_encoding(mut self, encoding: PointEncoding) -> Self {
        self.point_encoding = encoding;
        self
    }
}
