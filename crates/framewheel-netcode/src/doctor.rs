//! Network doctor - session health counters
//!
//! Aggregates the handful of numbers a rollback netcode session is judged
//! by: upsync/downsync throughput, how often the local step was locked
//! waiting for data, and how many frames were re-stepped. Pure counters;
//! where and how they are displayed is the caller's concern.

use serde::{Deserialize, Serialize};

/// Counter block for one battle/session.
///
/// All methods are O(1); sample with [`report`](Self::report) and reset at
/// session boundaries.
#[derive(Debug, Default)]
pub struct NetworkDoctor {
    inputs_sent: u64,
    srv_downsyncs: u64,
    peer_upsyncs: u64,
    steps_locked: u64,
    rollback_frames: u64,
    udp_punched_cnt: u64,
}

impl NetworkDoctor {
    /// Create a doctor with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// An input frame batch was sent upstream.
    pub fn record_input_sent(&mut self) {
        self.inputs_sent += 1;
    }

    /// An authoritative frame arrived from the server.
    pub fn record_srv_downsync(&mut self) {
        self.srv_downsyncs += 1;
    }

    /// An input frame arrived directly from a peer.
    pub fn record_peer_upsync(&mut self) {
        self.peer_upsyncs += 1;
    }

    /// The local step was held back waiting for confirmed data.
    pub fn record_step_locked(&mut self) {
        self.steps_locked += 1;
    }

    /// `n` frames were rolled back and re-stepped.
    pub fn record_rollback_frames(&mut self, n: u64) {
        self.rollback_frames += n;
    }

    /// A UDP hole-punch round trip completed.
    pub fn record_udp_punched(&mut self) {
        self.udp_punched_cnt += 1;
    }

    /// Snapshot the counters as rates over the given elapsed wall time.
    ///
    /// `elapsed_secs` must be positive; a non-positive value yields zero
    /// rates with the raw counters intact.
    pub fn report(&self, elapsed_secs: f32) -> DoctorReport {
        let rate = |count: u64| {
            if elapsed_secs > 0.0 {
                count as f32 / elapsed_secs
            } else {
                0.0
            }
        };
        DoctorReport {
            sending_fps: rate(self.inputs_sent),
            srv_downsync_fps: rate(self.srv_downsyncs),
            peer_upsync_fps: rate(self.peer_upsyncs),
            steps_locked: self.steps_locked,
            rollback_frames: self.rollback_frames,
            udp_punched_cnt: self.udp_punched_cnt,
        }
    }

    /// Zero every counter. Called at battle boundaries.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Point-in-time snapshot produced by [`NetworkDoctor::report`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoctorReport {
    /// Input batches sent per second.
    pub sending_fps: f32,
    /// Authoritative server frames received per second.
    pub srv_downsync_fps: f32,
    /// Peer input frames received per second.
    pub peer_upsync_fps: f32,
    /// Times the local step was locked waiting for data.
    pub steps_locked: u64,
    /// Total frames rolled back and re-stepped.
    pub rollback_frames: u64,
    /// Completed UDP hole-punch round trips.
    pub udp_punched_cnt: u64,
}
