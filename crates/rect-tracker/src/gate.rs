use rect_tracker_core::CornerSet;
use serde::{Deserialize, Serialize};

/// Outcome of comparing resolved corners with the last accepted corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MovementVerdict {
    /// 0, 2 or 3 corners moved: detector jitter, keep the previous corners.
    Stationary,
    /// Exactly one corner moved: reset it to its expected position.
    SingleCorner { index: usize },
    /// All four corners moved: the rectangle moved, run reconstruction.
    Moving,
}

/// A corner moved iff its displacement from `expected` exceeds `tolerance`.
pub fn movement_gate(corners: &CornerSet, expected: &CornerSet, tolerance: f32) -> MovementVerdict {
    let d = corners.displacements(expected);
    match d.iter().filter(|&&x| x > tolerance).count() {
        1 => {
            let index = (1..4).fold(0, |best, i| if d[i] > d[best] { i } else { best });
            MovementVerdict::SingleCorner { index }
        }
        4 => MovementVerdict::Moving,
        _ => MovementVerdict::Stationary,
    }
}
