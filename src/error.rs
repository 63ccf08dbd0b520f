//! Error types for the polygon dictionary.

use thiserror::Error;

/// Polygon dictionary errors.
///
/// All variants are build-time failures: corpus loading, layout decoding, or
/// geometry validation. Queries have no error path; every point has a
/// well-defined answer (found or not found).
#[derive(Error, Debug)]
pub enum DictError {
    /// Ring with fewer than three distinct vertices.
    #[error("polygon {polygon_id}: ring has {vertices} distinct vertices, need at least 3")]
    RingTooSmall { polygon_id: u64, vertices: usize },

    /// Ring enclosing zero area.
    #[error("polygon {polygon_id}: degenerate ring with zero enclosed area")]
    DegenerateRing { polygon_id: u64 },

    /// NaN or infinite coordinate.
    #[error("polygon {polygon_id}: non-finite coordinate")]
    NonFiniteCoordinate { polygon_id: u64 },

    /// Row geometry does not match the configured input layout.
    #[error("row {row_id}: geometry layout does not match configured {expected}")]
    LayoutMismatch { row_id: u64, expected: String },

    /// Coordinate arrays that cannot be paired into points.
    #[error("row {row_id}: malformed coordinates: {detail}")]
    MalformedCoordinates { row_id: u64, detail: String },

    /// The same row id appeared more than once in the corpus.
    #[error("duplicate row id {id}")]
    DuplicateRowId { id: u64 },

    /// Corpus provider failure.
    #[error("corpus provider error: {0}")]
    Provider(String),
}

/// Result type for polygon dictionary operations.
pub type Result<T> = std::result::Result<T, DictError>;
