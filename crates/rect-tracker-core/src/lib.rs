//! Core types and utilities for tracking the four corners of a planar rectangle.
//!
//! This crate is intentionally small and purely geometric. It knows nothing
//! about frames, tracker state or where the candidate corners come from; the
//! `rect-tracker` crate builds the frame-to-frame logic on top of it.

mod affine;
mod corner;
mod geometry;
mod homography;
mod logger;
mod projector;

pub use affine::Affine2;
pub use corner::{CornerIndex, CornerSet, EdgeLengths, ObstructionFlags};
pub use geometry::{distance, edge_lengths, rotation_2d, unit_vector, unsigned_angle};
pub use homography::{homography_from_4pt, Homography};
pub use projector::{HomographyPair, PlaneProjector};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, parse_level};
