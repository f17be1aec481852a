use crate::FrameOutput;
use rect_tracker_core::{CornerSet, HomographyPair};
use serde::{Deserialize, Serialize};

/// Cross-frame tracker state.
///
/// Only [`TrackerState::commit`] mutates it, once per accepted frame; while a
/// frame is being processed the previous state is read as-is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    /// Corners of the last accepted frame; the baseline for the next one.
    pub last_unobstructed: Option<CornerSet>,
    /// Homographies of the last accepted frame.
    pub homography: Option<HomographyPair>,
    /// Finalized corners of every accepted frame. Diagnostics only.
    pub history: Vec<CornerSet>,
    pub frames_processed: u64,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.last_unobstructed.is_some()
    }

    pub fn commit(&mut self, output: &FrameOutput) {
        self.last_unobstructed = Some(output.corners);
        self.homography = Some(output.homography);
        self.history.push(output.corners);
        self.frames_processed += 1;
    }
}
