//! JSON replay of recorded candidate corners.

use crate::{FrameOutput, RectangleTracker, TrackError, TrackerParams};
use log::{info, warn};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Recorded detector output: one entry per video frame, `null` when the
/// detector produced nothing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReplayInput {
    #[serde(default)]
    pub params: TrackerParams,
    pub frames: Vec<Option<Vec<[f32; 2]>>>,
}

impl ReplayInput {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TrackError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplayFrame {
    Tracked { index: usize, output: FrameOutput },
    Skipped { index: usize, reason: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub tracked: usize,
    pub skipped: usize,
    pub degraded: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplayReport {
    pub params: TrackerParams,
    pub frames: Vec<ReplayFrame>,
    pub summary: ReplaySummary,
}

impl ReplayReport {
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TrackError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Feed every recorded frame through a fresh tracker.
///
/// Non-fatal errors skip the frame; a fatal error aborts the replay.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(input), fields(frames = input.frames.len()))
)]
pub fn replay(input: &ReplayInput) -> Result<ReplayReport, TrackError> {
    let mut tracker = RectangleTracker::new(input.params.clone())?;
    let mut frames = Vec::with_capacity(input.frames.len());
    let mut summary = ReplaySummary::default();

    for (index, raw) in input.frames.iter().enumerate() {
        let points: Option<Vec<Point2<f32>>> = raw
            .as_ref()
            .map(|pts| pts.iter().map(|&[x, y]| Point2::new(x, y)).collect());

        match tracker.track(points.as_deref()) {
            Ok(output) => {
                summary.tracked += 1;
                if output.is_degraded() {
                    summary.degraded += 1;
                }
                frames.push(ReplayFrame::Tracked { index, output });
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!("frame {index} skipped: {err}");
                summary.skipped += 1;
                frames.push(ReplayFrame::Skipped {
                    index,
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        "replayed {} frames: tracked={} skipped={} degraded={}",
        input.frames.len(),
        summary.tracked,
        summary.skipped,
        summary.degraded
    );

    Ok(ReplayReport {
        params: input.params.clone(),
        frames,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(dx: f32, dy: f32) -> Vec<[f32; 2]> {
        // clockwise from top-right
        vec![
            [100.0 + dx, 0.0 + dy],
            [100.0 + dx, 100.0 + dy],
            [0.0 + dx, 100.0 + dy],
            [0.0 + dx, 0.0 + dy],
        ]
    }

    #[test]
    fn skips_missing_frames_and_counts() {
        let input = ReplayInput {
            params: TrackerParams::default(),
            frames: vec![
                Some(square(0.0, 0.0)),
                None,
                Some(square(0.0, 0.0)[..3].to_vec()),
                Some(square(5.0, 5.0)),
            ],
        };
        let report = replay(&input).expect("replay");
        assert_eq!(
            report.summary,
            ReplaySummary {
                tracked: 2,
                skipped: 2,
                degraded: 0
            }
        );
        assert!(matches!(report.frames[1], ReplayFrame::Skipped { index: 1, .. }));
        match &report.frames[3] {
            ReplayFrame::Tracked { index, output } => {
                assert_eq!(*index, 3);
                assert_eq!(output.frame, 1);
                assert_eq!(output.corners.points[0], Point2::new(5.0, 5.0));
            }
            other => panic!("unexpected frame {other:?}"),
        }
    }

    #[test]
    fn input_parses_with_default_params() {
        let json = r#"{ "frames": [ [[1,1],[1,9],[9,9],[9,1]], null ] }"#;
        let input: ReplayInput = serde_json::from_str(json).expect("parse");
        assert_eq!(input.params, TrackerParams::default());
        assert_eq!(input.frames.len(), 2);
        assert!(input.frames[1].is_none());
    }

    #[test]
    fn invalid_params_abort_before_tracking() {
        let input = ReplayInput {
            params: TrackerParams {
                paper_ratio: -1.0,
                ..TrackerParams::default()
            },
            frames: vec![Some(square(0.0, 0.0))],
        };
        assert!(matches!(
            replay(&input),
            Err(TrackError::InvalidParams { .. })
        ));
    }
}
