use crate::TrackError;
use serde::{Deserialize, Serialize};

/// Height over width of a US letter sheet.
pub const DEFAULT_PAPER_RATIO: f32 = 11.0 / 8.5;

/// Tracker configuration, fixed for the lifetime of a tracker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerParams {
    /// Height divided by width of the tracked rectangle.
    ///
    /// Sets the canonical plane size: `height = width * paper_ratio`.
    pub paper_ratio: f32,
    /// A corner displaced by more than this many pixels since the last
    /// accepted frame counts as moved.
    pub movement_tolerance: f32,
    /// An edge whose length changed by more than this many pixels is
    /// treated as broken by an occluder.
    pub obstruction_tolerance: f32,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            paper_ratio: DEFAULT_PAPER_RATIO,
            movement_tolerance: 1.0,
            obstruction_tolerance: 10.0,
        }
    }
}

impl TrackerParams {
    pub fn validate(&self) -> Result<(), TrackError> {
        if !self.paper_ratio.is_finite() || self.paper_ratio <= 0.0 {
            return Err(TrackError::InvalidParams {
                name: "paper_ratio",
                value: self.paper_ratio,
            });
        }
        for (name, value) in [
            ("movement_tolerance", self.movement_tolerance),
            ("obstruction_tolerance", self.obstruction_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TrackError::InvalidParams { name, value });
            }
        }
        Ok(())
    }
}
