//! Point-location engine for polygon dictionaries.
//!
//! Given a 2D point, find which polygon from a pre-loaded, possibly
//! overlapping corpus contains it, preferring the smallest-area polygon when
//! several do. This is the computational core of a geo-lookup dictionary
//! that attaches attributes to coordinates ("which administrative region
//! contains this GPS point").
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      PolygonDictionary                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  corpus (validated polygons)  │  one index representation    │
//! └──────────────────────────────────────────────────────────────┘
//!                 │
//!                 │ find(point)
//!                 ▼
//!      Exhaustive ── scan every polygon, even-odd test each
//!      GridBucket ── grid descent → candidate bucket → per-polygon
//!                    slab index per candidate
//!      GridMergedLeaf ── grid descent → leaf's embedded slab index
//!                 │
//!                 ▼
//!      smallest-area containing polygon's row id, or none
//! ```
//!
//! A dictionary is built once from a corpus provider and is immutable
//! thereafter; `find` is a pure read, safe to call from any number of
//! threads. Reload means building a sibling instance (see
//! [`PolygonDictionary::rebuild`]) and swapping which instance queries
//! route to, outside this crate.
//!
//! # Modules
//!
//! - [`config`]: construction-time configuration (strategy, grid tunables,
//!   input layout flags)
//! - [`geometry`]: points, rings, polygons, area, containment primitive
//! - [`slab`]: slab-decomposition index over a fixed polygon set
//! - [`grid`]: recursive grid bounding candidate sets
//! - [`provider`]: corpus provider trait and raw-geometry layouts
//! - [`builder`]: load → validate → index, fail-fast
//! - [`dictionary`]: the query surface
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod provider;
pub mod slab;

mod builder;
mod dictionary;

pub use builder::{BuildStats, DictionaryBuilder};
pub use config::{DictConfig, GridConfig, IndexStrategy, InputLayout, PointEncoding};
pub use dictionary::PolygonDictionary;
pub use error::{DictError, Result};
pub use geometry::{BBox, Point, Polygon, Ring};
pub use provider::{CorpusProvider, MemoryProvider, PolygonRow, RawGeometry};
