//! Frame-to-frame corner correspondence.

use crate::InvariantViolation;
use rect_tracker_core::CornerSet;
use serde::{Deserialize, Serialize};

/// Best cyclic alignment of a candidate cycle to the expected corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    pub corners: CornerSet,
    /// Rotation `r` applied as `out[i] = candidate[(i + r) % 4]`.
    pub rotation: usize,
    /// Sum of per-corner distances to the expected corners.
    pub cost: f32,
}

/// Label a clockwise detector cycle as (TL, BL, BR, TR).
///
/// The top-left corner is the one with minimal `x + y` (first wins on ties);
/// the rest follow by walking the clockwise cycle backwards.
pub fn label_corners(candidate: &CornerSet) -> CornerSet {
    let key = |i: usize| candidate.points[i].x + candidate.points[i].y;
    let start = (1..4).fold(0, |best, i| if key(i) < key(best) { i } else { best });
    CornerSet::new(std::array::from_fn(|k| candidate.points[(start + 4 - k) % 4]))
}

/// Pick the cyclic rotation of `candidate` closest to `expected`.
///
/// Ties resolve to the lowest rotation index.
pub fn resolve(
    candidate: &CornerSet,
    expected: &CornerSet,
) -> Result<Correspondence, InvariantViolation> {
    let mut best: Option<Correspondence> = None;
    for rotation in 0..4 {
        let corners = candidate.rotated(rotation);
        let cost = corners.total_distance(expected);
        if best.as_ref().is_none_or(|b| cost < b.cost) {
            best = Some(Correspondence {
                corners,
                rotation,
                cost,
            });
        }
    }
    best.ok_or(InvariantViolation::NoRotation)
}
