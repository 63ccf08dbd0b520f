//! Corpus provider trait and raw-geometry layout decoding.
//!
//! The dictionary consumes polygon rows through [`CorpusProvider`], a narrow
//! seam that keeps real data sources (files, databases, feeds) outside this
//! crate. Row geometry arrives in one of four raw layouts, the cross product
//! of the input-layout and point-encoding flags; both flags are fixed
//! construction-time configuration, and a row delivered in any other layout
//! fails the build.

use crate::config::{InputLayout, PointEncoding};
use crate::error::{DictError, Result};
use crate::geometry::Point;

/// One corpus row: a stable row id and its raw polygon geometry.
#[derive(Debug, Clone)]
pub struct PolygonRow {
    /// Stable identifier, mapped 1:1 to the corpus row.
    pub id: u64,

    /// Geometry in the source's layout, not yet validated.
    pub geometry: RawGeometry,
}

impl PolygonRow {
    /// Create a new row.
    pub fn new(id: u64, geometry: RawGeometry) -> Self {
        Self { id, geometry }
    }
}

/// Raw polygon geometry as delivered by a corpus source.
///
/// One variant per (layout, encoding) pair. The first ring is the outer
/// boundary; any further rings are holes.
#[derive(Debug, Clone)]
pub enum RawGeometry {
    /// Rings as point lists. `(RingPoints, Paired)`.
    RingPoints(Vec<Vec<(f64, f64)>>),

    /// Rings as two parallel coordinate arrays. `(RingPoints, Split)`.
    RingSplit(Vec<(Vec<f64>, Vec<f64>)>),

    /// Rings as flattened interleaved coordinates `[x0, y0, x1, y1, ..]`.
    /// `(FlatCoordinates, Paired)`.
    FlatInterleaved(Vec<Vec<f64>>),

    /// Whole-polygon split coordinate arrays with per-ring lengths.
    /// `(FlatCoordinates, Split)`.
    FlatSplit {
        xs: Vec<f64>,
        ys: Vec<f64>,
        ring_lens: Vec<usize>,
    },
}

/// Source of polygon rows.
///
/// Implementations load the whole corpus in one call; the dictionary never
/// re-reads a provider after construction.
pub trait CorpusProvider {
    /// Load every corpus row.
    fn load_rows(&self) -> Result<Vec<PolygonRow>>;
}

/// In-memory provider, for embedded corpora and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    rows: Vec<PolygonRow>,
}

impl MemoryProvider {
    /// Create a provider over the given rows.
    pub fn new(rows: Vec<PolygonRow>) -> Self {
        Self { rows }
    }

    /// Append a row.
    pub fn push(&mut self, row: PolygonRow) {
        self.rows.push(row);
    }
}

impl CorpusProvider for MemoryProvider {
    fn load_rows(&self) -> Result<Vec<PolygonRow>> {
        Ok(self.rows.clone())
    }
}

/// Human-readable name for a layout/encoding pair, for error messages.
fn layout_name(layout: InputLayout, encoding: PointEncoding) -> &'static str {
    match (layout, encoding) {
        (InputLayout::RingPoints, PointEncoding::Paired) => "ring point lists",
        (InputLayout::RingPoints, PointEncoding::Split) => "rings of split coordinate arrays",
        (InputLayout::FlatCoordinates, PointEncoding::Paired) => "flat interleaved coordinates",
        (InputLayout::FlatCoordinates, PointEncoding::Split) => {
            "flat split coordinate arrays"
        }
    }
}

/// Decode a row's raw geometry into ring vertex lists under the configured
/// layout flags.
pub(crate) fn decode_rings(
    row: &PolygonRow,
    layout: InputLayout,
    encoding: PointEncoding,
) -> Result<Vec<Vec<Point>>> {
    match (layout, encoding, &row.geometry) {
        (InputLayout::RingPoints, PointEncoding::Paired, RawGeometry::RingPoints(rings)) => {
            Ok(rings
                .iter()
                .map(|ring| ring.iter().map(|&(x, y)| Point::new(x, y)).collect())
                .collect())
        }
        (InputLayout::RingPoints, PointEncoding::Split, RawGeometry::RingSplit(rings)) => rings
            .iter()
            .map(|(xs, ys)| {
                if xs.len() != ys.len() {
                    return Err(DictError::MalformedCoordinates {
                        row_id: row.id,
                        detail: format!("{} x values vs {} y values", xs.len(), ys.len()),
                    });
                }
                Ok(xs
                    .iter()
                    .zip(ys)
                    .map(|(&x, &y)| Point::new(x, y))
                    .collect())
            })
            .collect(),
        (
            InputLayout::FlatCoordinates,
            PointEncoding::Paired,
            RawGeometry::FlatInterleaved(rings),
        ) => rings
            .iter()
            .map(|coords| {
                if coords.len() % 2 != 0 {
                    return Err(DictError::MalformedCoordinates {
                        row_id: row.id,
                        detail: format!("odd interleaved length {}", coords.len()),
                    });
                }
                Ok(coords
                    .chunks_exact(2)
                    .map(|pair| Point::new(pair[0], pair[1]))
                    .collect())
            })
            .collect(),
        (
            InputLayout::FlatCoordinates,
            PointEncoding::Split,
            RawGeometry::FlatSplit { xs, ys, ring_lens },
        ) => {
            let total: usize = ring_lens.iter().sum();
            if xs.len() != ys.len() || total != xs.len() {
                return Err(DictError::MalformedCoordinates {
                    row_id: row.id,
                    detail: format!(
                        "ring lengths sum to {total}, got {} x and {} y values",
                        xs.len(),
                        ys.len()
                    ),
                });
            }
            let mut rings = Vec::with_capacity(ring_lens.len());
            let mut offset = 0;
            for &len in ring_lens {
                let ring = xs[offset..offset + len]
                    .iter()
                    .zip(&ys[offset..offset + len])
                    .map(|(&x, &y)| Point::new(x, y))
                    .collect();
                rings.push(ring);
                offset += len;
            }
            Ok(rings)
        }
        _ => Err(DictError::LayoutMismatch {
            row_id: row.id,
            expected: layout_name(layout, encoding).to_string(),
        }),
    }
}
