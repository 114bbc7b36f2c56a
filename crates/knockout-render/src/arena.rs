#![forbid(unsafe_code)]

//! Bounded, non-relocating pools backing one recording session.
//!
//! The hot recording path must never allocate: every pool reserves its
//! full capacity up front and refuses to grow past it. Overflow is
//! reported to the caller, which responds by flushing the whole session;
//! `reset()` then recycles the storage in O(1) without releasing it.

use knockout_core::geometry::Point;

/// A pool ran out of slots. Recovered by flushing the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityExceeded;

/// A bounded push-only pool with stable indices.
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<T>,
    capacity: usize,
}

impl<T> Pool<T> {
    /// Create a pool bounded at `capacity` slots, reserved immediately.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a value, handing it back if the pool is full.
    pub fn push(&mut self, value: T) -> Result<u32, T> {
        if self.slots.len() >= self.capacity {
            return Err(value);
        }
        let idx = self.slots.len() as u32;
        self.slots.push(value);
        Ok(idx)
    }

    /// Number of live slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no slots are live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Check if another push would overflow.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// Slots still free.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.slots.len()
    }

    /// Configured bound.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shared access by index.
    #[inline]
    pub fn get(&self, idx: u32) -> &T {
        &self.slots[idx as usize]
    }

    /// Mutable access by index.
    #[inline]
    pub fn get_mut(&mut self, idx: u32) -> &mut T {
        &mut self.slots[idx as usize]
    }

    /// Iterate live slots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    /// Discard all slots, keeping the reserved storage.
    pub fn reset(&mut self) {
        self.slots.clear();
    }
}

/// Span of vertices inside a `CoordPool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordSpan {
    start: u32,
    len: u32,
}

impl CoordSpan {
    /// Number of vertices in the span.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Check if the span holds no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Bounded flat buffer of polygon vertices.
///
/// Vertices are copied in at record time because the caller's buffer is
/// not guaranteed to outlive the session.
#[derive(Debug, Clone)]
pub struct CoordPool {
    points: Vec<Point>,
    capacity: usize,
}

impl CoordPool {
    /// Create a pool bounded at `capacity` vertices.
    pub fn new(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Copy a vertex run into the pool.
    ///
    /// Returns `None` when the run does not fit in the free space.
    pub fn alloc(&mut self, points: &[Point]) -> Option<CoordSpan> {
        if self.points.len() + points.len() > self.capacity {
            return None;
        }
        let start = self.points.len() as u32;
        self.points.extend_from_slice(points);
        Some(CoordSpan {
            start,
            len: points.len() as u32,
        })
    }

    /// Resolve a span back to its vertices.
    #[inline]
    pub fn get(&self, span: CoordSpan) -> &[Point] {
        &self.points[span.start as usize..(span.start + span.len) as usize]
    }

    /// Check if a run of `n` vertices could ever fit, even when empty.
    #[inline]
    pub fn fits(&self, n: usize) -> bool {
        n <= self.capacity
    }

    /// Vertices currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if no vertices are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Discard all vertices, keeping the reserved storage.
    pub fn reset(&mut self) {
        self.points.clear();
    }
}
