//! In-memory tile cache with FIFO replacement.
//!
//! A fixed pool of tile slots sits in front of a [`TileSource`]. When a tile
//! that is not resident is requested and every slot is taken, the tile that
//! was *loaded* longest ago is evicted, regardless of how recently it was
//! read or written. Hits never reorder anything, so a hit costs one table
//! lookup.
//!
//! # Write-Back
//!
//! Writes go to the resident copy and mark its slot dirty. A dirty tile is
//! written to the source when it is evicted, or when [`TileCache::flush`] is
//! called.

use std::collections::VecDeque;

use tracing::trace;

use crate::error::ImageError;
use crate::io::TileSource;

/// Counters describing cache behaviour since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Tile requests satisfied by a resident tile
    pub hits: u64,
    /// Tiles read from the backing source
    pub loads: u64,
    /// Resident tiles displaced to make room
    pub evictions: u64,
    /// Dirty tiles written back to the source
    pub write_backs: u64,
}

/// FIFO cache of fixed-size tiles over a backing [`TileSource`].
pub struct TileCache<S> {
    /// Backing store consulted on misses
    inner: S,
    /// Pixels per tile
    tile_area: usize,
    /// Maximum number of resident tiles
    capacity: usize,
    /// Slot storage, `capacity * tile_area` pixels
    slots: Vec<f32>,
    /// Slot holding each tile, indexed by tile index
    addresses: Vec<Option<usize>>,
    /// Per-slot dirty flags
    dirty: Vec<bool>,
    /// Slots not holding any tile
    free: Vec<usize>,
    /// Resident tiles and their slots in load order, oldest first
    queue: VecDeque<(usize, usize)>,
    stats: CacheStats,
}

impl<S: TileSource> TileCache<S> {
    /// Create a cache of `capacity` slots for an image of `tile_count` tiles.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` or `tile_area` is zero.
    pub fn new(inner: S, tile_area: usize, capacity: usize, tile_count: usize) -> Self {
        assert!(capacity > 0, "tile cache must hold at least one tile");
        assert!(tile_area > 0, "tile area must be positive");

        Self {
            inner,
            tile_area,
            capacity,
            slots: vec![0.0; capacity * tile_area],
            addresses: vec![None; tile_count],
            dirty: vec![false; capacity],
            free: (0..capacity).rev().collect(),
            queue: VecDeque::with_capacity(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Maximum number of resident tiles.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tiles currently resident.
    pub fn tiles_in_use(&self) -> usize {
        self.queue.len()
    }

    /// Whether `tile_index` is resident, without touching the cache.
    pub fn is_resident(&self, tile_index: usize) -> bool {
        self.addresses[tile_index].is_some()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// The backing source.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Borrow tile `tile_index`, loading it on a miss.
    pub fn tile(&mut self, tile_index: usize) -> Result<&[f32], ImageError> {
        let slot = self.resident_slot(tile_index)?;
        Ok(&self.slots[self.slot_range(slot)])
    }

    /// Mutably borrow tile `tile_index`, loading it on a miss and marking
    /// it dirty.
    pub fn tile_mut(&mut self, tile_index: usize) -> Result<&mut [f32], ImageError> {
        let slot = self.resident_slot(tile_index)?;
        self.dirty[slot] = true;
        let range = self.slot_range(slot);
        Ok(&mut self.slots[range])
    }

    /// Write every dirty resident tile back to the source.
    pub fn flush(&mut self) -> Result<(), ImageError> {
        for &(tile_index, slot) in &self.queue {
            if self.dirty[slot] {
                let range = slot * self.tile_area..(slot + 1) * self.tile_area;
                self.inner.store_tile(tile_index, &self.slots[range])?;
                self.dirty[slot] = false;
                self.stats.write_backs += 1;
            }
        }
        Ok(())
    }

    /// Consume the cache, returning the backing source.
    ///
    /// Dirty tiles are not written back; call [`TileCache::flush`] first if
    /// the source must reflect them.
    pub fn into_inner(self) -> S {
        self.inner
    }

    #[inline]
    fn slot_range(&self, slot: usize) -> std::ops::Range<usize> {
        slot * self.tile_area..(slot + 1) * self.tile_area
    }

    /// Slot holding `tile_index`, loading the tile if it is not resident.
    #[inline]
    fn resident_slot(&mut self, tile_index: usize) -> Result<usize, ImageError> {
        if let Some(slot) = self.addresses[tile_index] {
            self.stats.hits += 1;
            return Ok(slot);
        }
        self.load(tile_index)
    }

    fn load(&mut self, tile_index: usize) -> Result<usize, ImageError> {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => self.evict_oldest()?,
        };

        let range = self.slot_range(slot);
        if let Err(e) = self.inner.load_tile(tile_index, &mut self.slots[range]) {
            self.free.push(slot);
            return Err(e);
        }

        self.addresses[tile_index] = Some(slot);
        self.dirty[slot] = false;
        self.queue.push_back((tile_index, slot));
        self.stats.loads += 1;

        trace!(tile_index, slot, "Loaded tile");
        Ok(slot)
    }

    /// Evict the tile loaded longest ago and return its free slot.
    fn evict_oldest(&mut self) -> Result<usize, ImageError> {
        let (oldest, slot) = self.queue[0];

        // Write back before giving up the slot so a failed write leaves the
        // cache unchanged.
        if self.dirty[slot] {
            let range = self.slot_range(slot);
            self.inner.store_tile(oldest, &self.slots[range])?;
            self.dirty[slot] = false;
            self.stats.write_backs += 1;
        }

        self.queue.pop_front();
        self.addresses[oldest] = None;
        self.stats.evictions += 1;

        trace!(tile_index = oldest, slot, "Evicted tile");
        Ok(slot)
    }
}
