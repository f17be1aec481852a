/// Why a frame's candidate corners could not be used.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DetectionFailure {
    #[error("no candidate corners for this frame")]
    Missing,
    #[error("expected 4 candidate corners, got {found}")]
    WrongCount { found: usize },
    #[error("candidate corners contain non-finite coordinates")]
    NonFinite,
}

/// Internal logic errors. Any of these means a bug, never a runtime condition.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("occluded corner count {count} is outside 0..=4 (flags={flags:?})")]
    OccludedCount { count: usize, flags: [bool; 4] },
    #[error("no cyclic rotation of the candidate corners could be scored")]
    NoRotation,
    #[error("frame {frame}: prior corners exist but no prior homography")]
    MissingHomography { frame: u64 },
}

/// Errors returned by the tracker.
#[derive(thiserror::Error, Debug)]
pub enum TrackError {
    #[error("detection failure: {0}")]
    Detection(#[from] DetectionFailure),
    #[error("homography solve failed for corners {corners:?} (plane width {width})")]
    HomographySolve { corners: [[f32; 2]; 4], width: f32 },
    #[error("invalid tracker parameter `{name}` = {value}")]
    InvalidParams { name: &'static str, value: f32 },
    #[error("invariant violation: {0}")]
    InvariantViolation(#[from] InvariantViolation),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl TrackError {
    /// Fatal errors must stop the frame loop; everything else skips one frame.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TrackError::InvariantViolation(_))
    }
}
