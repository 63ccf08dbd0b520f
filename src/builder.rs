//! Dictionary builder: load, validate, index.
//!
//! The builder drives the whole "building" state: it pulls rows from a
//! corpus provider, decodes them under the configured layout flags,
//! validates every polygon, and assembles the selected index
//! representation. Validation is fail-fast: the first bad row aborts the
//! build with a descriptive error and no dictionary is produced, so corpus
//! integrity problems are caller-visible immediately rather than silently
//! dropped.

use crate::config::DictConfig;
use crate::dictionary::PolygonDictionary;
use crate::error::{DictError, Result};
use crate::geometry::Polygon;
use crate::provider::{decode_rings, CorpusProvider};
use rustc_hash::FxHashSet;

/// Statistics collected while building a dictionary.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Rows loaded from the provider.
    pub rows_loaded: u64,

    /// Polygons accepted into the corpus.
    pub polygons: u64,

    /// Total rings, holes included.
    pub rings: u64,

    /// Total ring vertices.
    pub vertices: u64,

    /// Grid cells, branches included. Zero for the exhaustive strategy.
    pub grid_cells: u64,

    /// Terminal grid cells.
    pub grid_leaves: u64,

    /// Slab indexes built (per-polygon buckets or embedded leaf indexes).
    pub slab_indexes: u64,
}

/// Builder for [`PolygonDictionary`] instances.
///
/// Reusable: each [`build`](DictionaryBuilder::build) call produces an
/// independent dictionary.
pub struct DictionaryBuilder {
    config: DictConfig,
}

impl DictionaryBuilder {
    /// Create a builder with the given configuration.
    pub fn new(config: DictConfig) -> Self {
        Self { config }
    }

    /// The configuration every built dictionary will use.
    pub fn config(&self) -> &DictConfig {
        &self.config
    }

    /// Load the corpus from `provider` and build a ready dictionary.
    pub fn build(&self, provider: &dyn CorpusProvider) -> Result<PolygonDictionary> {
        let rows = provider.load_rows()?;
        let mut stats = BuildStats {
            rows_loaded: rows.len() as u64,
            ..BuildStats::default()
        };

        let mut seen_ids: FxHashSet<u64> = FxHashSet::default();
        let mut polygons = Vec::with_capacity(rows.len());
        for row in &rows {
            if !seen_ids.insert(row.id) {
                return Err(DictError::DuplicateRowId { id: row.id });
            }
            let rings = decode_rings(row, self.config.input_layout, self.config.point_encoding)?;
            stats.rings += rings.len() as u64;
            stats.vertices += rings.iter().map(|r| r.len() as u64).sum::<u64>();
            polygons.push(Polygon::new(row.id, rings)?);
        }
        stats.polygons = polygons.len() as u64;

        tracing::debug!(
            rows = stats.rows_loaded,
            rings = stats.rings,
            vertices = stats.vertices,
            "corpus decoded and validated"
        );

        let dict = PolygonDictionary::assemble(self.config, polygons, stats);

        tracing::info!(
            strategy = ?self.config.strategy,
            polygons = dict.stats().polygons,
            grid_cells = dict.stats().grid_cells,
            slab_indexes = dict.stats().slab_indexes,
            "polygon dictionary ready"
        );
        Ok(dict)
    }
}
