//! The polygon dictionary: a validated corpus plus one index representation.
//!
//! A dictionary has exactly two states. While the builder runs it is
//! "building"; the value the builder returns is "ready" and never mutates.
//! Reconfiguration or corpus reload always constructs a fresh instance; the
//! old one stays valid and queryable until its last owner drops it, which is
//! a lifetime concern for the caller, not a locking concern here. Since a
//! ready dictionary is all shared immutable data, [`PolygonDictionary::find`]
//! may be called from any number of threads without synchronization.

use crate::builder::BuildStats;
use crate::config::{DictConfig, IndexStrategy};
use crate::geometry::{Point, Polygon};
use crate::grid::{BucketLeaf, GridRoot, SlabLeaf};
use crate::slab::SlabIndex;
use rayon::prelude::*;

/// One of the three index representations. Closed set, chosen at build time.
#[derive(Debug)]
enum IndexRepr {
    /// No acceleration structure; queries scan the corpus.
    Exhaustive,

    /// Grid of candidate buckets plus one slab index per polygon.
    GridBucket {
        grid: GridRoot<BucketLeaf>,
        buckets: Vec<SlabIndex>,
    },

    /// Grid whose leaves embed their own slab index.
    GridMergedLeaf { grid: GridRoot<SlabLeaf> },
}

/// An immutable point-location dictionary over a polygon corpus.
#[derive(Debug)]
pub struct PolygonDictionary {
    config: DictConfig,
    polygons: Vec<Polygon>,
    repr: IndexRepr,
    stats: BuildStats,
}

impl PolygonDictionary {
    /// Assemble a dictionary from an already-validated corpus.
    ///
    /// Cannot fail: every polygon was validated when it was constructed.
    /// Index-shape fields of `stats` are filled in here.
    pub(crate) fn assemble(
        config: DictConfig,
        polygons: Vec<Polygon>,
        mut stats: BuildStats,
    ) -> Self {
        let repr = match config.strategy {
            IndexStrategy::Exhaustive => IndexRepr::Exhaustive,
            IndexStrategy::GridBucket => {
                // Per-polygon slab indexes are independent; build in parallel.
                let buckets: Vec<SlabIndex> = polygons
                    .par_iter()
                    .map(|p| SlabIndex::build(std::iter::once(p)))
                    .collect();
                let grid = GridRoot::build(&polygons, &config.grid);
                stats.grid_cells = grid.cell_count() as u64;
                stats.grid_leaves = grid.leaf_count() as u64;
                stats.slab_indexes = buckets.len() as u64;
                IndexRepr::GridBucket { grid, buckets }
            }
            IndexStrategy::GridMergedLeaf => {
                let grid = GridRoot::build(&polygons, &config.grid);
                stats.grid_cells = grid.cell_count() as u64;
                stats.grid_leaves = grid.leaf_count() as u64;
                stats.slab_indexes = stats.grid_leaves;
                IndexRepr::GridMergedLeaf { grid }
            }
        };

        tracing::debug!(
            strategy = ?config.strategy,
            polygons = polygons.len(),
            grid_cells = stats.grid_cells,
            grid_leaves = stats.grid_leaves,
            slab_indexes = stats.slab_indexes,
            "assembled polygon dictionary"
        );

        Self {
            config,
            polygons,
            repr,
            stats,
        }
    }

    /// Find the polygon containing `p`, returning its row id.
    ///
    /// When several polygons contain the point, the one with the smallest
    /// area wins; on exactly equal areas, any qualifying id may be returned.
    /// Points outside the corpus bounding box answer `None` in O(1). Pure
    /// read: safe to call concurrently from any number of threads.
    pub fn find(&self, p: Point) -> Option<u64> {
        match &self.repr {
            IndexRepr::Exhaustive => self
                .polygons
                .iter()
                .filter(|polygon| polygon.contains(p))
                .min_by(|a, b| a.area().total_cmp(&b.area()))
                .map(Polygon::id),
            IndexRepr::GridBucket { grid, buckets } => {
                let leaf = grid.descend(p)?;
                let mut best: Option<(f64, u64)> = None;
                for &candidate in leaf.candidates() {
                    let Some(id) = buckets[candidate as usize].query(p) else {
                        continue;
                    };
                    let area = self.polygons[candidate as usize].area();
                    match best {
                        Some((best_area, _)) if best_area <= area => {}
                        _ => best = Some((area, id)),
                    }
                }
                best.map(|(_, id)| id)
            }
            IndexRepr::GridMergedLeaf { grid } => grid.descend(p)?.index().query(p),
        }
    }

    /// Build a fresh, fully independent dictionary over the same corpus.
    ///
    /// The new instance shares no state with this one and answers every
    /// query identically; use it for hot-swap reload, handing ownership off
    /// at whatever layer routes queries. Cannot fail: the corpus was
    /// validated when this instance was built.
    pub fn rebuild(&self) -> PolygonDictionary {
        Self::assemble(self.config, self.polygons.clone(), self.stats.clone())
    }

    /// Number of polygons in the corpus.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Check if the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Configuration this dictionary was built with.
    pub fn config(&self) -> &DictConfig {
        &self.config
    }

    /// Build statistics.
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }
}
