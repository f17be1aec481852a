//! Occlusion-tolerant tracking of the four corners of a planar rectangle.
//!
//! Each frame goes through the same stages:
//! 1. label the detector's clockwise corners as TL, BL, BR, TR,
//! 2. resolve the cyclic correspondence against the previous frame,
//! 3. flag corners whose two adjacent edges changed length,
//! 4. gate on how many corners actually moved,
//! 5. reconstruct hidden corners in the previous frame's canonical plane,
//! 6. solve the new image <-> plane homographies.
//!
//! ## Quickstart
//!
//! ```
//! use nalgebra::Point2;
//! use rect_tracker::{RectangleTracker, TrackerParams};
//!
//! # fn main() -> Result<(), rect_tracker::TrackError> {
//! let mut tracker = RectangleTracker::new(TrackerParams::default())?;
//! let corners = [
//!     Point2::new(300.0, 20.0),
//!     Point2::new(310.0, 400.0),
//!     Point2::new(15.0, 390.0),
//!     Point2::new(20.0, 25.0),
//! ];
//! let out = tracker.track(Some(&corners[..]))?;
//! assert_eq!(out.corners.points[0], Point2::new(20.0, 25.0));
//! # Ok(())
//! # }
//! ```

mod correspondence;
mod error;
mod gate;
mod homography_tracker;
mod io;
mod obstruction;
mod params;
mod pipeline;
mod reconstruct;
mod state;

pub use correspondence::{label_corners, resolve, Correspondence};
pub use error::{DetectionFailure, InvariantViolation, TrackError};
pub use gate::{movement_gate, MovementVerdict};
pub use homography_tracker::HomographyTracker;
pub use io::{replay, ReplayFrame, ReplayInput, ReplayReport, ReplaySummary};
pub use obstruction::{broken_edges, classify};
pub use params::{TrackerParams, DEFAULT_PAPER_RATIO};
pub use pipeline::{process_frame, FrameOutput, FrameStatus, RectangleTracker};
pub use reconstruct::{reconstruct, DegradeCause, OcclusionCase, Reconstruction};
pub use state::TrackerState;

pub use rect_tracker_core as core;
