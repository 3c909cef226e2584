//! Rollback planning - the consumer side of the frame store contract
//!
//! The simulation loop steps forward speculatively; when an authoritative
//! frame corrects something already stepped, the affected range must be
//! re-stepped from the correction onward. [`RollbackPlanner`] tracks that
//! obligation as a chase cursor trailing the render cursor.

use framewheel_core::{FrameId, FrameRingBuffer};
use tracing::debug;

use crate::{Error, Result};

/// Checked consumer read: borrow the frame to step from, or report that
/// the simulation must wait or request a resync.
///
/// A missing frame is never a license to step from a default state.
pub fn frame_for_step<T>(ring: &FrameRingBuffer<T>, frame_id: FrameId) -> Result<&T> {
    ring.get_by_frame_id(frame_id)
        .ok_or(Error::FrameNotReady(frame_id))
}

/// Tracks how far re-simulation lags behind rendering.
///
/// Two cursors over the same frame id space: `render_frame_id` is the next
/// frame the display loop will step, `chaser_frame_id` is the next frame
/// whose authoritative contents still need re-stepping. When the chaser
/// falls behind, the frames in between must be rolled back and replayed.
#[derive(Debug, Default)]
pub struct RollbackPlanner {
    /// Next frame to re-step when chasing corrections.
    chaser_frame_id: FrameId,
    /// Next frame the display loop will step.
    render_frame_id: FrameId,
    /// Cumulative count of re-stepped frames, for diagnostics.
    total_rollback_frames: u64,
}

impl RollbackPlanner {
    /// Create a planner with both cursors at frame zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the display loop stepped `frame_id` forward.
    ///
    /// When no correction is pending, the chase cursor rides along with
    /// the render cursor.
    pub fn on_rendered(&mut self, frame_id: FrameId) {
        let next = frame_id + 1;
        if self.chaser_frame_id == self.render_frame_id {
            self.chaser_frame_id = next;
        }
        self.render_frame_id = next;
    }

    /// Record that an authoritative frame overwrote `frame_id`.
    ///
    /// Lowers the chase cursor when the correction lands below it, which
    /// is what creates a rollback obligation.
    pub fn on_authoritative(&mut self, frame_id: FrameId) {
        if frame_id < self.chaser_frame_id {
            debug!(
                frame_id,
                chaser_frame_id = self.chaser_frame_id,
                render_frame_id = self.render_frame_id,
                "authoritative frame below chase cursor, rollback required"
            );
            self.chaser_frame_id = frame_id;
        }
    }

    /// Record a window reset: both cursors jump to the new window start.
    ///
    /// After a reset there is nothing older to chase; speculative frames
    /// were discarded along with the window.
    pub fn on_window_reset(&mut self, frame_id: FrameId) {
        self.chaser_frame_id = frame_id;
        self.render_frame_id = frame_id;
    }

    /// Whether any frames must be re-stepped before normal play resumes.
    pub fn needs_rollback(&self) -> bool {
        self.chaser_frame_id < self.render_frame_id
    }

    /// The half-open frame range `[chaser, render)` to re-step, or `None`
    /// when no rollback is pending.
    pub fn rollback_span(&self) -> Option<(FrameId, FrameId)> {
        if self.needs_rollback() {
            Some((self.chaser_frame_id, self.render_frame_id))
        } else {
            None
        }
    }

    /// Record that frames `[chaser, up_to)` were re-stepped.
    ///
    /// The chase cursor never overtakes the render cursor.
    pub fn on_chased(&mut self, up_to: FrameId) {
        let up_to = up_to.min(self.render_frame_id);
        if up_to > self.chaser_frame_id {
            self.total_rollback_frames += up_to - self.chaser_frame_id;
            self.chaser_frame_id = up_to;
        }
    }

    /// Next frame to re-step when chasing.
    pub fn chaser_frame_id(&self) -> FrameId {
        self.chaser_frame_id
    }

    /// Next frame the display loop will step.
    pub fn render_frame_id(&self) -> FrameId {
        self.render_frame_id
    }

    /// Cumulative number of re-stepped frames.
    pub fn total_rollback_frames(&self) -> u64 {
        self.total_rollback_frames
    }

    /// Reset both cursors and the counters to zero.
    ///
    /// Session-boundary operation, paired with clearing the frame stores.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
