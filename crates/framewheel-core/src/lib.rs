//! Framewheel Core - Frame-indexed ring buffer for rollback-style simulations
//!
//! This crate provides the storage primitive a rollback netcode engine is
//! built on: a fixed-capacity circular buffer whose slots are addressable
//! both by relative offset and by an absolute, monotonically increasing
//! frame id.
//!
//! # Features
//!
//! - **Bounded memory**: fixed-size ring buffer, preallocated at construction
//! - **O(1) operations**: put, pop, and frame-id lookup are constant time
//! - **Oldest-frame eviction**: inserting into a full buffer evicts, never rejects
//! - **Gap handling**: out-of-order writes beyond the head reset the window
//!   instead of corrupting the contiguous frame range
//!
//! # Example
//!
//! ```rust
//! use framewheel_core::{FrameRingBuffer, SetOutcome};
//!
//! // Hold the most recent 128 frames of input history
//! let mut buffer: FrameRingBuffer<u64> = FrameRingBuffer::new(128);
//!
//! // Local simulation appends frames in order
//! buffer.put(11);
//! buffer.put(22);
//!
//! // A downsync correction overwrites frame 0 in place
//! let res = buffer.set_by_frame_id(99, 0);
//! assert_eq!(res.outcome, SetOutcome::Consecutive);
//! assert_eq!(buffer.get_by_frame_id(0), Some(&99));
//!
//! // A frame far beyond the head resets the retained window
//! let res = buffer.set_by_frame_id(77, 10);
//! assert_eq!(res.outcome, SetOutcome::NonConsecutive);
//! assert_eq!(buffer.get_by_frame_id(1), None);
//! ```

use std::mem;

/// Monotonically increasing identifier of one simulation tick.
///
/// Frame ids are independent of physical slot positions: the buffer holds
/// exactly the contiguous range `[st_frame_id, ed_frame_id)` at all times.
pub type FrameId = u64;

/// Classification of a [`FrameRingBuffer::set_by_frame_id`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The frame landed inside (or immediately after) the retained window.
    /// Either an in-place overwrite of a live slot or a plain append.
    Consecutive,
    /// The frame landed beyond the head: the window was reset to start at
    /// the new frame and everything previously held was discarded.
    NonConsecutive,
    /// The frame is older than anything retained; the write was rejected
    /// and no state changed.
    Failed,
}

/// Result of [`FrameRingBuffer::set_by_frame_id`].
///
/// Carries the pre-mutation window bounds so callers can diagnose exactly
/// how large a detected gap was and which frames were discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetByFrameIdResult {
    /// How the write was classified.
    pub outcome: SetOutcome,
    /// Oldest retained frame id before the call.
    pub prev_st_frame_id: FrameId,
    /// Next-to-write frame id before the call.
    pub prev_ed_frame_id: FrameId,
}

/// A fixed-capacity ring buffer of per-tick simulation state, addressable
/// by absolute frame id.
///
/// Holds the contiguous frame range `[st_frame_id, ed_frame_id)` with
/// `ed_frame_id - st_frame_id == len()` as an invariant. Inserting past
/// capacity evicts the oldest frame; writing a frame id beyond the head
/// resets the whole window (the resync policy of a rollback netcode).
///
/// The buffer owns its storage exclusively and performs no locking; it is
/// meant to be driven by a single simulation loop.
#[derive(Debug)]
pub struct FrameRingBuffer<T> {
    /// Preallocated backing storage; every slot stays initialized for the
    /// buffer's whole lifetime.
    eles: Box<[T]>,
    /// Write index (open end), always in `[0, capacity)`.
    ed: usize,
    /// Read index (closed end), always in `[0, capacity)`.
    st: usize,
    /// Frame id of the next slot to be written.
    ed_frame_id: FrameId,
    /// Frame id of the oldest slot currently held.
    st_frame_id: FrameId,
    /// Number of live slots; disambiguates empty vs. full when `st == ed`.
    cnt: usize,
}

impl<T: Default> FrameRingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` frames.
    ///
    /// All slots are default-initialized up front; the buffer never
    /// allocates after construction.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        Self {
            eles: (0..capacity).map(|_| T::default()).collect(),
            ed: 0,
            st: 0,
            ed_frame_id: 0,
            st_frame_id: 0,
            cnt: 0,
        }
    }

    /// Append `item` as the newest frame.
    ///
    /// If the buffer is full, the oldest frame is evicted first and handed
    /// back so the caller may recycle it. Insertion itself always succeeds.
    pub fn put(&mut self, item: T) -> Option<T> {
        let evicted = if self.cnt >= self.eles.len() {
            self.pop()
        } else {
            None
        };
        self.eles[self.ed] = item;
        self.advance_ed();
        evicted
    }

    /// Advance the head exactly like [`put`](Self::put), but without
    /// writing a payload.
    ///
    /// The slot keeps whatever value it previously held. Used when the
    /// caller has already written the slot or does not care about the
    /// payload for this tick. Returns the evicted frame, if any.
    pub fn dry_put(&mut self) -> Option<T> {
        let evicted = if self.cnt >= self.eles.len() {
            self.pop()
        } else {
            None
        };
        self.advance_ed();
        evicted
    }

    /// Remove and return the oldest frame, or `None` if the buffer is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.cnt == 0 {
            return None;
        }
        // Taking the value leaves a default in its place, keeping every
        // slot initialized without copying the payload.
        let item = mem::take(&mut self.eles[self.st]);
        self.st_frame_id += 1;
        self.cnt -= 1;
        self.st += 1;
        if self.st >= self.eles.len() {
            self.st -= self.eles.len();
        }
        Some(item)
    }

    /// Write `item` at an absolute frame id, absorbing out-of-order and
    /// gapped frames.
    ///
    /// This is the consistency core of the structure:
    ///
    /// - `frame_id` older than the retained window: rejected outright
    ///   ([`SetOutcome::Failed`]), nothing changes.
    /// - `frame_id` inside the window: the live slot is overwritten in
    ///   place, no bookkeeping changes ([`SetOutcome::Consecutive`]).
    /// - `frame_id` equal to the head: plain append
    ///   ([`SetOutcome::Consecutive`]).
    /// - `frame_id` beyond the head: a gap was detected. The contiguous
    ///   range cannot be preserved, so the window is reset to start at
    ///   `frame_id`, discarding everything previously held, then the item
    ///   is appended ([`SetOutcome::NonConsecutive`]).
    ///
    /// The returned [`SetByFrameIdResult`] carries the pre-call window
    /// bounds so the caller can report how much history a reset dropped.
    pub fn set_by_frame_id(&mut self, item: T, frame_id: FrameId) -> SetByFrameIdResult {
        let prev_st_frame_id = self.st_frame_id;
        let prev_ed_frame_id = self.ed_frame_id;

        if frame_id < prev_st_frame_id {
            return SetByFrameIdResult {
                outcome: SetOutcome::Failed,
                prev_st_frame_id,
                prev_ed_frame_id,
            };
        }
        // By now "st_frame_id <= frame_id"
        if frame_id < prev_ed_frame_id {
            let offset = (frame_id - prev_st_frame_id) as usize;
            if let Some(arr_idx) = self.slot_index_by_offset(offset) {
                self.eles[arr_idx] = item;
                return SetByFrameIdResult {
                    outcome: SetOutcome::Consecutive,
                    prev_st_frame_id,
                    prev_ed_frame_id,
                };
            }
        }

        // By now "ed_frame_id <= frame_id"
        let outcome = if frame_id > prev_ed_frame_id {
            self.st = 0;
            self.ed = 0;
            self.st_frame_id = frame_id;
            self.ed_frame_id = frame_id;
            self.cnt = 0;
            SetOutcome::NonConsecutive
        } else {
            SetOutcome::Consecutive
        };

        // By now "ed_frame_id == frame_id"
        self.put(item);

        SetByFrameIdResult {
            outcome,
            prev_st_frame_id,
            prev_ed_frame_id,
        }
    }

    /// Drain all frames and reset the window back to frame id zero.
    ///
    /// Used at session boundaries, not during steady-state play.
    pub fn clear(&mut self) {
        while self.pop().is_some() {}
        self.st = 0;
        self.ed = 0;
        self.st_frame_id = 0;
        self.ed_frame_id = 0;
    }

    fn advance_ed(&mut self) {
        self.ed_frame_id += 1;
        self.cnt += 1;
        self.ed += 1;
        // Deliberately not using the "%" operator: advances move at most
        // one position past the end, so one subtraction restores [0, N).
        if self.ed >= self.eles.len() {
            self.ed -= self.eles.len();
        }
    }
}

impl<T> FrameRingBuffer<T> {
    /// Translate an offset from the oldest frame into a physical slot
    /// index, honoring wraparound.
    ///
    /// Returns `None` when the buffer is empty or the offset falls outside
    /// `[0, len())`. This is the addressing primitive all other reads
    /// build on; it never mutates state.
    pub fn slot_index_by_offset(&self, offset_from_st: usize) -> Option<usize> {
        if offset_from_st >= self.cnt {
            return None;
        }
        // offset < cnt <= capacity and st < capacity, so a single
        // wraparound subtraction suffices.
        let mut arr_idx = self.st + offset_from_st;
        if arr_idx >= self.eles.len() {
            arr_idx -= self.eles.len();
        }
        Some(arr_idx)
    }

    /// Borrow the frame at `offset_from_st` slots after the oldest frame.
    ///
    /// Returns `None` when the offset is out of range.
    pub fn get_by_offset(&self, offset_from_st: usize) -> Option<&T> {
        self.slot_index_by_offset(offset_from_st)
            .map(|arr_idx| &self.eles[arr_idx])
    }

    /// Borrow the frame with the given absolute frame id.
    ///
    /// Returns `Some` iff `st_frame_id <= frame_id < ed_frame_id`. This is
    /// the primary read path for simulation and rollback code, since frame
    /// ids are the stable addressing scheme of the rest of the system.
    pub fn get_by_frame_id(&self, frame_id: FrameId) -> Option<&T> {
        if frame_id >= self.ed_frame_id || frame_id < self.st_frame_id {
            return None;
        }
        self.get_by_offset((frame_id - self.st_frame_id) as usize)
    }

    /// Iterate over the live frames from oldest to newest as
    /// `(frame_id, &item)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (FrameId, &T)> {
        (0..self.cnt).map(move |offset| {
            let mut arr_idx = self.st + offset;
            if arr_idx >= self.eles.len() {
                arr_idx -= self.eles.len();
            }
            (self.st_frame_id + offset as FrameId, &self.eles[arr_idx])
        })
    }

    /// Maximum number of frames the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.eles.len()
    }

    /// Number of live frames currently held.
    pub fn len(&self) -> usize {
        self.cnt
    }

    /// Whether no frames are held.
    pub fn is_empty(&self) -> bool {
        self.cnt == 0
    }

    /// Whether the next `put` will evict the oldest frame.
    pub fn is_full(&self) -> bool {
        self.cnt >= self.eles.len()
    }

    /// Frame id of the oldest retained frame.
    pub fn st_frame_id(&self) -> FrameId {
        self.st_frame_id
    }

    /// Frame id of the next slot to be written (one past the newest frame).
    pub fn ed_frame_id(&self) -> FrameId {
        self.ed_frame_id
    }

    /// Inclusive frame id range `(oldest, newest)` of the live frames.
    ///
    /// Returns `None` when the buffer is empty.
    pub fn frame_id_range(&self) -> Option<(FrameId, FrameId)> {
        if self.cnt == 0 {
            None
        } else {
            Some((self.st_frame_id, self.ed_frame_id - 1))
        }
    }

    /// Get statistics about the buffer.
    pub fn stats(&self) -> RingStats {
        RingStats {
            capacity: self.eles.len(),
            count: self.cnt,
            st_frame_id: self.st_frame_id,
            ed_frame_id: self.ed_frame_id,
        }
    }
}

impl<T: Default> Default for FrameRingBuffer<T> {
    fn default() -> Self {
        Self::new(128) // Default to 128 frames (~2 seconds at 60fps)
    }
}

/// Statistics about a [`FrameRingBuffer`].
#[derive(Debug, Clone, Copy)]
pub struct RingStats {
    /// Maximum capacity.
    pub capacity: usize,
    /// Current number of live frames.
    pub count: usize,
    /// Oldest retained frame id.
    pub st_frame_id: FrameId,
    /// Next-to-write frame id.
    pub ed_frame_id: FrameId,
}

impl RingStats {
    /// Width of the retained frame id window.
    pub fn frame_span(&self) -> FrameId {
        self.ed_frame_id - self.st_frame_id
    }

    /// Get the fill percentage (0.0 to 1.0).
    pub fn fill_ratio(&self) -> f32 {
        self.count as f32 / self.capacity as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contiguous<T>(buffer: &FrameRingBuffer<T>) {
        assert_eq!(
            buffer.ed_frame_id() - buffer.st_frame_id(),
            buffer.len() as FrameId
        );
        assert!(buffer.len() <= buffer.capacity());
    }

    #[test]
    fn test_new() {
        let buffer: FrameRingBuffer<i32> = FrameRingBuffer::new(64);
        assert_eq!(buffer.capacity(), 64);
        assert_eq!(buffer.len(), 0);
        assert!(buffer.is_empty());
        assert_eq!(buffer.st_frame_id(), 0);
        assert_eq!(buffer.ed_frame_id(), 0);
        assert!(buffer.frame_id_range().is_none());
    }

    #[test]
    #[should_panic(expected = "Capacity must be greater than 0")]
    fn test_zero_capacity_rejected() {
        let _buffer: FrameRingBuffer<i32> = FrameRingBuffer::new(0);
    }

    #[test]
    fn test_put_and_get_by_frame_id() {
        let mut buffer = FrameRingBuffer::new(4);

        buffer.put(100);
        buffer.put(101);
        buffer.put(102);

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.get_by_frame_id(0), Some(&100));
        assert_eq!(buffer.get_by_frame_id(1), Some(&101));
        assert_eq!(buffer.get_by_frame_id(2), Some(&102));
        assert_eq!(buffer.get_by_frame_id(3), None);
        assert_contiguous(&buffer);
    }

    #[test]
    fn test_eviction_keeps_newest_n() {
        // Scenario from the consistency contract: capacity 3, put frames
        // 0..=4, only {2,3,4} must survive.
        let mut buffer = FrameRingBuffer::new(3);

        for v in [10, 11, 12] {
            assert_eq!(buffer.put(v), None);
        }
        assert!(buffer.is_full());
        assert_eq!(buffer.put(13), Some(10));
        assert_eq!(buffer.put(14), Some(11));

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.get_by_frame_id(0), None);
        assert_eq!(buffer.get_by_frame_id(1), None);
        assert_eq!(buffer.get_by_frame_id(2), Some(&12));
        assert_eq!(buffer.get_by_frame_id(3), Some(&13));
        assert_eq!(buffer.get_by_frame_id(4), Some(&14));
        assert_eq!(buffer.st_frame_id(), 2);
        assert_eq!(buffer.ed_frame_id(), 5);
        assert_contiguous(&buffer);
    }

    #[test]
    fn test_pop_fifo_order() {
        let mut buffer = FrameRingBuffer::new(3);
        for v in 0..5 {
            buffer.put(v);
        }

        // Pop yields the smallest held frame first, strictly increasing.
        assert_eq!(buffer.pop(), Some(2));
        assert_eq!(buffer.pop(), Some(3));
        assert_eq!(buffer.pop(), Some(4));
        assert_eq!(buffer.pop(), None);
        assert!(buffer.is_empty());
        assert_contiguous(&buffer);
    }

    #[test]
    fn test_pop_empty() {
        let mut buffer: FrameRingBuffer<i32> = FrameRingBuffer::new(2);
        assert_eq!(buffer.pop(), None);
        assert_eq!(buffer.get_by_frame_id(0), None);
    }

    #[test]
    fn test_slot_index_wraparound() {
        // Force the physical seam: st > ed after eviction.
        let mut buffer = FrameRingBuffer::new(4);
        for v in 0..6 {
            buffer.put(v);
        }
        // Live window is frames [2, 6); st sits at slot 2, ed at slot 2.
        assert_eq!(buffer.st_frame_id(), 2);
        assert_eq!(buffer.slot_index_by_offset(0), Some(2));
        assert_eq!(buffer.slot_index_by_offset(1), Some(3));
        assert_eq!(buffer.slot_index_by_offset(2), Some(0));
        assert_eq!(buffer.slot_index_by_offset(3), Some(1));
        assert_eq!(buffer.slot_index_by_offset(4), None);

        assert_eq!(buffer.get_by_offset(0), Some(&2));
        assert_eq!(buffer.get_by_offset(3), Some(&5));
        assert_eq!(buffer.get_by_offset(4), None);
    }

    #[test]
    fn test_get_by_offset_empty() {
        let buffer: FrameRingBuffer<i32> = FrameRingBuffer::new(4);
        assert_eq!(buffer.slot_index_by_offset(0), None);
        assert_eq!(buffer.get_by_offset(0), None);
    }

    #[test]
    fn test_dry_put_bookkeeping() {
        let mut buffer: FrameRingBuffer<i32> = FrameRingBuffer::new(3);
        buffer.put(7);
        buffer.dry_put();

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.ed_frame_id(), 2);
        // The dry slot holds whatever was there before, here the default.
        assert_eq!(buffer.get_by_frame_id(1), Some(&0));
        assert_contiguous(&buffer);

        // Dry puts evict under pressure just like real puts.
        buffer.dry_put();
        assert_eq!(buffer.dry_put(), Some(7));
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.st_frame_id(), 1);
    }

    #[test]
    fn test_set_by_frame_id_overwrite_in_place() {
        let mut buffer = FrameRingBuffer::new(4);
        buffer.put(100);
        buffer.put(101);
        buffer.put(102);

        let res = buffer.set_by_frame_id(999, 1);
        assert_eq!(res.outcome, SetOutcome::Consecutive);
        assert_eq!(res.prev_st_frame_id, 0);
        assert_eq!(res.prev_ed_frame_id, 3);

        // Only the value at frame 1 changed; bookkeeping did not.
        assert_eq!(buffer.get_by_frame_id(1), Some(&999));
        assert_eq!(buffer.get_by_frame_id(0), Some(&100));
        assert_eq!(buffer.get_by_frame_id(2), Some(&102));
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.st_frame_id(), 0);
        assert_eq!(buffer.ed_frame_id(), 3);
    }

    #[test]
    fn test_set_by_frame_id_append_at_head() {
        let mut buffer = FrameRingBuffer::new(4);
        buffer.put(100);

        let res = buffer.set_by_frame_id(101, 1);
        assert_eq!(res.outcome, SetOutcome::Consecutive);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.get_by_frame_id(1), Some(&101));
        assert_contiguous(&buffer);
    }

    #[test]
    fn test_set_by_frame_id_gap_resets_window() {
        // Scenario from the consistency contract: window {5,6,7}, then a
        // frame for id 10 arrives.
        let mut buffer = FrameRingBuffer::new(3);
        for v in 0..8 {
            buffer.put(v);
        }
        assert_eq!(buffer.frame_id_range(), Some((5, 7)));

        let res = buffer.set_by_frame_id(1000, 10);
        assert_eq!(res.outcome, SetOutcome::NonConsecutive);
        assert_eq!(res.prev_st_frame_id, 5);
        assert_eq!(res.prev_ed_frame_id, 8);

        assert_eq!(buffer.st_frame_id(), 10);
        assert_eq!(buffer.ed_frame_id(), 11);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.get_by_frame_id(10), Some(&1000));
        assert_eq!(buffer.get_by_frame_id(6), None);
        assert_eq!(buffer.get_by_frame_id(7), None);
        assert_contiguous(&buffer);
    }

    #[test]
    fn test_set_by_frame_id_stale_rejected_untouched() {
        let mut buffer = FrameRingBuffer::new(3);
        for v in 0..8 {
            buffer.put(v);
        }
        let before: Vec<_> = buffer.iter().map(|(f, v)| (f, *v)).collect();

        let res = buffer.set_by_frame_id(1000, 2);
        assert_eq!(res.outcome, SetOutcome::Failed);
        assert_eq!(res.prev_st_frame_id, 5);
        assert_eq!(res.prev_ed_frame_id, 8);

        // Nothing moved.
        let after: Vec<_> = buffer.iter().map(|(f, v)| (f, *v)).collect();
        assert_eq!(before, after);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.st_frame_id(), 5);
        assert_eq!(buffer.ed_frame_id(), 8);
    }

    #[test]
    fn test_set_by_frame_id_on_empty_buffer() {
        let mut buffer = FrameRingBuffer::new(4);

        // Frame 0 on a fresh buffer is a plain append.
        let res = buffer.set_by_frame_id(5, 0);
        assert_eq!(res.outcome, SetOutcome::Consecutive);
        assert_eq!(buffer.get_by_frame_id(0), Some(&5));

        // A gap on a fresh window still resets forward.
        let mut buffer = FrameRingBuffer::new(4);
        let res = buffer.set_by_frame_id(5, 42);
        assert_eq!(res.outcome, SetOutcome::NonConsecutive);
        assert_eq!(buffer.st_frame_id(), 42);
        assert_eq!(buffer.get_by_frame_id(42), Some(&5));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut buffer = FrameRingBuffer::new(3);
        for v in 0..7 {
            buffer.put(v);
        }
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.st_frame_id(), 0);
        assert_eq!(buffer.ed_frame_id(), 0);
        assert_eq!(buffer.get_by_frame_id(0), None);

        // The window restarts from frame id zero after a clear.
        buffer.put(50);
        assert_eq!(buffer.get_by_frame_id(0), Some(&50));
        assert_contiguous(&buffer);
    }

    #[test]
    fn test_iter_oldest_to_newest() {
        let mut buffer = FrameRingBuffer::new(3);
        for v in 0..5 {
            buffer.put(v * 10);
        }

        let frames: Vec<_> = buffer.iter().map(|(f, v)| (f, *v)).collect();
        assert_eq!(frames, vec![(2, 20), (3, 30), (4, 40)]);
    }

    #[test]
    fn test_stats() {
        let mut buffer = FrameRingBuffer::new(4);
        for v in 0..6 {
            buffer.put(v);
        }

        let stats = buffer.stats();
        assert_eq!(stats.capacity, 4);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.st_frame_id, 2);
        assert_eq!(stats.ed_frame_id, 6);
        assert_eq!(stats.frame_span(), 4);
        assert_eq!(stats.fill_ratio(), 1.0);
    }

    #[test]
    fn test_contiguity_across_mixed_operations() {
        let mut buffer = FrameRingBuffer::new(4);
        for v in 0..3 {
            buffer.put(v);
            assert_contiguous(&buffer);
        }
        buffer.pop();
        assert_contiguous(&buffer);
        buffer.set_by_frame_id(9, 3);
        assert_contiguous(&buffer);
        buffer.set_by_frame_id(9, 20);
        assert_contiguous(&buffer);
        buffer.dry_put();
        assert_contiguous(&buffer);

        // Every id inside the window resolves, every id outside does not.
        let (oldest, newest) = buffer.frame_id_range().unwrap();
        for frame_id in oldest..=newest {
            assert!(buffer.get_by_frame_id(frame_id).is_some());
        }
        assert!(buffer.get_by_frame_id(oldest - 1).is_none());
        assert!(buffer.get_by_frame_id(newest + 1).is_none());
    }
}
