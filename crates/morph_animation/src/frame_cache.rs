//! Bounded frame cache for frame-by-frame animations
//!
//! A frame animation plays a list of pre-rendered frames by mapping the step
//! fraction to a frame index. Frames are loaded on demand through a caller
//! supplied loader and kept in an LRU cache of fixed capacity; the least
//! recently used frame is evicted when the cache is full.
//!
//! Frames are returned by clone, so `F` is normally a shared handle such as
//! `Arc<Image>`.

use crate::values::AnimatedIntValue;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Default number of frames kept in memory
pub const DEFAULT_FRAME_CACHE_CAPACITY: usize = 5;

/// LRU cache of frames keyed by frame index
pub struct FrameCache<F> {
    frames: LruCache<usize, F>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<F: Clone> FrameCache<F> {
    /// Create a cache holding at most `capacity` frames (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            frames: LruCache::new(capacity),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.frames.cap().get()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.frames.contains(&index)
    }

    /// Cached frame, marking it as recently used
    pub fn get(&mut self, index: usize) -> Option<F> {
        self.frames.get(&index).cloned()
    }

    /// Insert a frame, evicting the least recently used one if full
    pub fn insert(&mut self, index: usize, frame: F) {
        if let Some((evicted, _)) = self.frames.push(index, frame) {
            if evicted != index {
                self.evictions += 1;
                tracing::trace!(evicted, inserted = index, "frame evicted");
            }
        }
    }

    /// Cached frame, or load and cache it
    pub fn get_or_load<E, L>(&mut self, index: usize, load: L) -> Result<F, E>
    where
        L: FnOnce(usize) -> Result<F, E>,
    {
        if let Some(frame) = self.frames.get(&index) {
            self.hits += 1;
            return Ok(frame.clone());
        }

        self.misses += 1;
        let frame = load(index)?;
        self.insert(index, frame.clone());
        Ok(frame)
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }
}

impl<F: Clone> Default for FrameCache<F> {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_CACHE_CAPACITY)
    }
}

/// Maps step fractions onto a range of frame indices
#[derive(Clone, Debug)]
pub struct FrameSequence {
    frame_count: usize,
    indices: AnimatedIntValue,
}

impl FrameSequence {
    pub fn new(frame_count: usize) -> Self {
        let last = frame_count.saturating_sub(1) as i32;
        Self {
            frame_count,
            indices: AnimatedIntValue::new(0, last),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Play the frames last to first
    pub fn reverse(&mut self) {
        self.indices.flip();
    }

    /// Frame index at `fraction`, `None` when there are no frames
    pub fn index_at(&self, fraction: f32) -> Option<usize> {
        if self.frame_count == 0 {
            return None;
        }
        let last = self.frame_count as i32 - 1;
        Some(self.indices.lerp(fraction).clamp(0, last) as usize)
    }

    /// Frame at `fraction`, loaded through `cache`
    pub fn frame_at<F, E, L>(
        &self,
        fraction: f32,
        cache: &mut FrameCache<F>,
        load: L,
    ) -> Option<Result<F, E>>
    where
        F: Clone,
        L: FnOnce(usize) -> Result<F, E>,
    {
        let index = self.index_at(fraction)?;
        Some(cache.get_or_load(index, load))
    }
}
