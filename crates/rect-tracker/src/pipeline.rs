use crate::correspondence::{label_corners, resolve};
use crate::gate::{movement_gate, MovementVerdict};
use crate::homography_tracker::HomographyTracker;
use crate::obstruction::classify;
use crate::reconstruct::{reconstruct, DegradeCause};
use crate::{DetectionFailure, InvariantViolation, TrackError, TrackerParams, TrackerState};
use log::{debug, warn};
use nalgebra::Point2;
use rect_tracker_core::{CornerSet, HomographyPair, ObstructionFlags};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// How the finalized corners of a frame were obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameStatus {
    /// First accepted frame; detections taken as-is.
    Initialized,
    /// Movement below tolerance; previous corners reused.
    Stationary,
    /// One corner jumped; it was reset to its previous position.
    SingleCornerReset { index: usize },
    /// Rectangle moved; `occluded` corners were reconstructed.
    Reconstructed { occluded: usize },
    /// Low confidence: the previous corners were kept unchanged.
    Degraded { occluded: usize, cause: DegradeCause },
}

impl FrameStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, FrameStatus::Degraded { .. })
    }
}

/// Result of one processed frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    /// Index among accepted frames.
    pub frame: u64,
    pub corners: CornerSet,
    pub flags: ObstructionFlags,
    pub homography: HomographyPair,
    pub status: FrameStatus,
}

impl FrameOutput {
    pub fn is_degraded(&self) -> bool {
        self.status.is_degraded()
    }
}

fn candidate_corners(candidate: Option<&[Point2<f32>]>) -> Result<CornerSet, DetectionFailure> {
    let points = candidate.ok_or(DetectionFailure::Missing)?;
    let corners = CornerSet::from_slice(points).ok_or(DetectionFailure::WrongCount {
        found: points.len(),
    })?;
    if !corners.is_finite() {
        return Err(DetectionFailure::NonFinite);
    }
    Ok(corners)
}

/// Run one frame against the previous state without modifying it.
///
/// `candidate` holds the detector's corners, clockwise with an arbitrary
/// starting corner; `None` means the detector found nothing. Apply the
/// returned output with [`TrackerState::commit`].
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(state, candidate, params),
        fields(frame = state.frames_processed)
    )
)]
pub fn process_frame(
    state: &TrackerState,
    candidate: Option<&[Point2<f32>]>,
    params: &TrackerParams,
) -> Result<FrameOutput, TrackError> {
    let frame = state.frames_processed;
    let labeled = label_corners(&candidate_corners(candidate)?);
    let homographies = HomographyTracker::new(params.paper_ratio);

    let Some(expected) = state.last_unobstructed else {
        let homography = homographies.update(&labeled)?;
        return Ok(FrameOutput {
            frame,
            corners: labeled,
            flags: ObstructionFlags::default(),
            homography,
            status: FrameStatus::Initialized,
        });
    };
    let previous = state
        .homography
        .ok_or(InvariantViolation::MissingHomography { frame })?;

    let resolved = resolve(&labeled, &expected)?.corners;
    let flags = classify(
        &resolved,
        &expected.edge_lengths(),
        params.obstruction_tolerance,
    );

    let (corners, status) = match movement_gate(&resolved, &expected, params.movement_tolerance) {
        MovementVerdict::Stationary => (expected, FrameStatus::Stationary),
        MovementVerdict::SingleCorner { index } => {
            let mut corners = resolved;
            corners.points[index] = expected.points[index];
            (corners, FrameStatus::SingleCornerReset { index })
        }
        MovementVerdict::Moving => {
            let rec = reconstruct(&resolved, &expected, &flags, &previous)?;
            let occluded = rec.case.occluded();
            debug!("frame={frame} | occluded corners={occluded}");
            let status = match rec.degraded {
                Some(cause) => {
                    warn!("frame={frame} | degraded reconstruction ({cause:?})");
                    FrameStatus::Degraded { occluded, cause }
                }
                None => FrameStatus::Reconstructed { occluded },
            };
            (rec.corners, status)
        }
    };

    let homography = homographies.update(&corners)?;
    Ok(FrameOutput {
        frame,
        corners,
        flags,
        homography,
        status,
    })
}

/// Owns the parameters and state and feeds frames through [`process_frame`] in order.
#[derive(Clone, Debug)]
pub struct RectangleTracker {
    params: TrackerParams,
    state: TrackerState,
}

impl RectangleTracker {
    pub fn new(params: TrackerParams) -> Result<Self, TrackError> {
        params.validate()?;
        Ok(Self {
            params,
            state: TrackerState::new(),
        })
    }

    #[inline]
    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    #[inline]
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn into_state(self) -> TrackerState {
        self.state
    }

    /// Process the next frame. On error the state is left untouched.
    pub fn track(&mut self, candidate: Option<&[Point2<f32>]>) -> Result<FrameOutput, TrackError> {
        let output = match process_frame(&self.state, candidate, &self.params) {
            Ok(output) => output,
            Err(err) => {
                debug!("frame rejected: {err}");
                return Err(err);
            }
        };
        self.state.commit(&output);
        Ok(output)
    }
}
