//! Error types for framewheel-netcode

use framewheel_core::FrameId;
use thiserror::Error;

/// Netcode error type
#[derive(Debug, Error)]
pub enum Error {
    /// Downsync targeted a frame older than anything retained
    #[error("Downsync for frame {frame_id} is stale, oldest retained is {oldest_retained}")]
    StaleDownsync {
        frame_id: FrameId,
        oldest_retained: FrameId,
    },

    /// Requested frame is outside the retained window
    #[error("Frame {0} not ready, must wait or request resync")]
    FrameNotReady(FrameId),
}

/// Result type for netcode operations
pub type Result<T> = std::result::Result<T, Error>;
