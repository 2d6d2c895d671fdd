//! Tile layer.
//!
//! This module maps pixel coordinates onto a grid of square tiles and keeps
//! a bounded set of those tiles in memory.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          FloatImage accessors           │
//! └────────────────────┬────────────────────┘
//!                      │ (x, y) → TileLocation
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │                TileCache                │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  slot pool   │  │   FIFO queue    │  │
//! │  │  + address   │  │  (load order)   │  │
//! │  │    table     │  │                 │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │ misses / write-back
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          TileStore (temp file)          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TileGeometry`]: Tile size and grid derived from the image size and cache budget
//! - [`TileLocation`]: Tile index and in-tile offset of one pixel
//! - [`TileCache`]: Fixed pool of resident tiles with FIFO eviction and write-back
//! - [`CacheStats`]: Hit/load/eviction counters

mod cache;
mod geometry;

pub use cache::{CacheStats, TileCache};
pub use geometry::{TileGeometry, TileLocation, DEFAULT_CACHE_SPACE, MAX_CACHE_SPACE};
