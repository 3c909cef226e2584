//! Downsync absorption - the producer side of the frame store contract
//!
//! Wraps a [`FrameRingBuffer`] and interprets its set outcomes the way a
//! rollback netcode client must: in-window corrections are applied in
//! place, gapped frames reset the window, stale frames are escalated to
//! the caller instead of being silently dropped.

use framewheel_core::{FrameId, FrameRingBuffer, SetOutcome};
use tracing::warn;

use crate::{Error, Result};

/// How an authoritative frame was absorbed into the local window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absorption {
    /// The frame fit the contiguous window and was stored.
    Applied {
        /// True when an already-held (speculative) frame was overwritten,
        /// false when the frame was a plain append at the head.
        overwrote_speculative: bool,
    },
    /// The frame landed beyond the head; the window was reset to it.
    WindowReset {
        /// Distance between the incoming frame and the previous head.
        gap: FrameId,
        /// Number of live frames discarded by the reset.
        dropped: usize,
    },
}

/// Frame store driven by a network downsync decoder on one side and a
/// local speculative stepper on the other.
///
/// One producer path, one consumer path, single-threaded by contract.
/// Compose one instance per frame kind (one for input frames, one for
/// render frames).
#[derive(Debug)]
pub struct DownsyncBuffer<T> {
    ring: FrameRingBuffer<T>,
    /// Window resets observed since construction or the last `clear`.
    resync_count: u64,
}

impl<T: Default> DownsyncBuffer<T> {
    /// Create a buffer retaining at most `capacity` frames.
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: FrameRingBuffer::new(capacity),
            resync_count: 0,
        }
    }

    /// Absorb an authoritative frame arriving from downsync.
    ///
    /// Returns how the frame was applied, or [`Error::StaleDownsync`] when
    /// it targets a frame id older than the retained window. A stale frame
    /// cannot be applied anymore; the caller must escalate (request a
    /// fuller resync) rather than drop it silently.
    pub fn absorb(&mut self, frame: T, frame_id: FrameId) -> Result<Absorption> {
        let res = self.ring.set_by_frame_id(frame, frame_id);
        match res.outcome {
            SetOutcome::Consecutive => Ok(Absorption::Applied {
                overwrote_speculative: frame_id < res.prev_ed_frame_id,
            }),
            SetOutcome::NonConsecutive => {
                let gap = frame_id - res.prev_ed_frame_id;
                let dropped = (res.prev_ed_frame_id - res.prev_st_frame_id) as usize;
                warn!(
                    frame_id,
                    gap,
                    dropped,
                    prev_window_start = res.prev_st_frame_id,
                    prev_window_end = res.prev_ed_frame_id,
                    "non-consecutive downsync, window reset"
                );
                self.resync_count += 1;
                Ok(Absorption::WindowReset { gap, dropped })
            }
            SetOutcome::Failed => {
                warn!(
                    frame_id,
                    oldest_retained = res.prev_st_frame_id,
                    "stale downsync rejected"
                );
                Err(Error::StaleDownsync {
                    frame_id,
                    oldest_retained: res.prev_st_frame_id,
                })
            }
        }
    }

    /// Append a locally predicted frame at the head of the window.
    ///
    /// Returns the frame id assigned to it. The oldest frame is evicted
    /// when the buffer is full.
    pub fn predict(&mut self, frame: T) -> FrameId {
        let frame_id = self.ring.ed_frame_id();
        self.ring.put(frame);
        frame_id
    }

    /// Advance the head without storing a payload for this tick.
    ///
    /// The placeholder slot keeps its previous value; a later `absorb`
    /// for the same frame id fills it in.
    pub fn predict_placeholder(&mut self) -> FrameId {
        let frame_id = self.ring.ed_frame_id();
        self.ring.dry_put();
        frame_id
    }

    /// Drop all frames and restart the window at frame id zero.
    ///
    /// Session-boundary operation; also resets the resync counter.
    pub fn clear(&mut self) {
        self.ring.clear();
        self.resync_count = 0;
    }
}

impl<T> DownsyncBuffer<T> {
    /// Borrow the frame with the given id, if retained.
    pub fn get(&self, frame_id: FrameId) -> Option<&T> {
        self.ring.get_by_frame_id(frame_id)
    }

    /// Number of window resets absorbed so far.
    pub fn resync_count(&self) -> u64 {
        self.resync_count
    }

    /// Access the underlying ring buffer.
    pub fn ring(&self) -> &FrameRingBuffer<T> {
        &self.ring
    }

    /// Mutable access to the underlying ring buffer.
    pub fn ring_mut(&mut self) -> &mut FrameRingBuffer<T> {
        &mut self.ring
    }
}
