//! Framewheel Netcode - the client contract around the frame store
//!
//! This crate turns the raw consistency semantics of
//! [`framewheel_core::FrameRingBuffer`] into the discipline a rollback
//! netcode client actually follows:
//!
//! - **Downsync absorption**: apply authoritative frames in place, detect
//!   gaps, escalate stale corrections
//! - **Rollback planning**: track which already-rendered frames must be
//!   re-stepped after a correction
//! - **Session diagnostics**: the network doctor counters
//! - **Trigger tables**: read-only shared simulation configuration
//!
//! # Data flow
//!
//! ```text
//!  network decoder ──absorb──▶ ┌────────────────┐ ──frame_for_step──▶ simulation
//!                              │ DownsyncBuffer │
//!  local stepper  ──predict──▶ └────────────────┘ ◀──chase span──── RollbackPlanner
//! ```
//!
//! # Example
//!
//! ```rust
//! use framewheel_netcode::{Absorption, DownsyncBuffer, RollbackPlanner};
//!
//! let mut inputs: DownsyncBuffer<u64> = DownsyncBuffer::new(128);
//! let mut planner = RollbackPlanner::new();
//!
//! // Speculate two frames locally and render them.
//! for _ in 0..2 {
//!     let frame_id = inputs.predict(0);
//!     planner.on_rendered(frame_id);
//! }
//!
//! // The server corrects frame 0: a rollback is now required.
//! match inputs.absorb(42, 0) {
//!     Ok(Absorption::Applied { .. }) => planner.on_authoritative(0),
//!     Ok(Absorption::WindowReset { .. }) => planner.on_window_reset(0),
//!     Err(err) => panic!("escalate: {err}"),
//! }
//! assert_eq!(planner.rollback_span(), Some((0, 2)));
//! ```

mod doctor;
mod downsync;
mod error;
mod rollback;
mod trigger;

pub use doctor::{DoctorReport, NetworkDoctor};
pub use downsync::{Absorption, DownsyncBuffer};
pub use error::{Error, Result};
pub use rollback::{frame_for_step, RollbackPlanner};
pub use trigger::{
    trigger_config_by_species, trigger_configs, TriggerConfig, COLLISION_TRIGGER_INDEX_PREFIX,
    N_SWITCH, P_SWITCH, TRIGGER_MASK_BY_ATK, TRIGGER_MASK_BY_MOVEMENT,
};

// Re-export core types for convenience
pub use framewheel_core::{FrameId, FrameRingBuffer, RingStats, SetByFrameIdResult, SetOutcome};
