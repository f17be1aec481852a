//! Stateless geometric helpers shared by the tracking stages.

use crate::{CornerSet, EdgeLengths};
use nalgebra::{Matrix2, Point2, Vector2};

const MIN_VECTOR_NORM: f32 = 1e-6;

#[inline]
pub fn distance(a: Point2<f32>, b: Point2<f32>) -> f32 {
    (a - b).norm()
}

/// Edge lengths of the cycle TL -> BL -> BR -> TR, reported as top, right, bottom, left.
pub fn edge_lengths(corners: &CornerSet) -> EdgeLengths {
    let [tl, bl, br, tr] = corners.points;
    EdgeLengths {
        top: distance(tr, tl),
        right: distance(tr, br),
        bottom: distance(br, bl),
        left: distance(bl, tl),
    }
}

/// Unit vector pointing from `from` to `to`, `None` when the points coincide.
pub fn unit_vector(from: Point2<f32>, to: Point2<f32>) -> Option<Vector2<f32>> {
    let d = to - from;
    let n = d.norm();
    if !n.is_finite() || n < MIN_VECTOR_NORM {
        return None;
    }
    Some(d / n)
}

/// Angle between two unit vectors in `[0, pi]`. The sign is lost.
pub fn unsigned_angle(u: Vector2<f32>, v: Vector2<f32>) -> f32 {
    u.dot(&v).clamp(-1.0, 1.0).acos()
}

/// Counter-clockwise rotation by `angle` radians in a y-up frame.
pub fn rotation_2d(angle: f32) -> Matrix2<f32> {
    let (s, c) = angle.sin_cos();
    Matrix2::new(c, -s, s, c)
}
