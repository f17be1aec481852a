//! Recovery of occluded corners from the visible ones.
//!
//! All estimation happens in the canonical plane of the *previous* frame:
//! while a corner is hidden the rectangle is assumed to stay on the plane it
//! was on, so its motion there is an affine (1 hidden corner) or rigid
//! (2 hidden corners) map estimated from the visible corners.

use crate::InvariantViolation;
use log::debug;
use nalgebra::{Point2, Vector2};
use rect_tracker_core::{
    rotation_2d, unit_vector, unsigned_angle, Affine2, CornerSet, ObstructionFlags, PlaneProjector,
};
use serde::{Deserialize, Serialize};

/// Occlusion situations, keyed by the number of flagged corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OcclusionCase {
    None,
    Single { index: usize },
    Double { indices: [usize; 2] },
    /// Three or four corners hidden; too little left to reconstruct from.
    Severe { count: usize },
}

impl OcclusionCase {
    pub fn from_flags(flags: &ObstructionFlags) -> Result<Self, InvariantViolation> {
        let count = flags.count();
        let violation = InvariantViolation::OccludedCount {
            count,
            flags: flags.0,
        };
        let mut hidden = flags.obstructed();
        match count {
            0 => Ok(Self::None),
            1 => {
                let index = hidden.next().ok_or(violation)?;
                Ok(Self::Single { index })
            }
            2 => match (hidden.next(), hidden.next()) {
                (Some(a), Some(b)) => Ok(Self::Double { indices: [a, b] }),
                _ => Err(violation),
            },
            3 | 4 => Ok(Self::Severe { count }),
            _ => Err(violation),
        }
    }

    pub fn occluded(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Single { .. } => 1,
            Self::Double { .. } => 2,
            Self::Severe { count } => *count,
        }
    }
}

/// Why a reconstruction fell back to the expected corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegradeCause {
    /// Three or four corners were judged occluded.
    TooManyOccluded,
    /// The visible corners did not pin down a plane motion.
    DegenerateGeometry,
}

/// Finalized corners of a reconstruction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reconstruction {
    pub corners: CornerSet,
    pub case: OcclusionCase,
    /// `Some` when `corners` are the unchanged expected corners.
    pub degraded: Option<DegradeCause>,
}

/// Replace occluded corners in `corners` with positions inferred from the
/// visible ones.
///
/// `projector` must hold the previous frame's homographies.
pub fn reconstruct<P: PlaneProjector + ?Sized>(
    corners: &CornerSet,
    expected: &CornerSet,
    flags: &ObstructionFlags,
    projector: &P,
) -> Result<Reconstruction, InvariantViolation> {
    let case = OcclusionCase::from_flags(flags)?;
    let recovered = match case {
        OcclusionCase::None => Some(*corners),
        OcclusionCase::Single { index } => {
            recover_single(corners, expected, index, projector).map(|p| {
                let mut out = *corners;
                out.points[index] = p;
                out
            })
        }
        OcclusionCase::Double { indices } => {
            recover_double(corners, expected, indices, projector).map(|pts| {
                let mut out = *corners;
                for (i, p) in indices.into_iter().zip(pts) {
                    out.points[i] = p;
                }
                out
            })
        }
        OcclusionCase::Severe { count } => {
            debug!("{count} corners obstructed, keeping previous corners");
            return Ok(Reconstruction {
                corners: *expected,
                case,
                degraded: Some(DegradeCause::TooManyOccluded),
            });
        }
    };

    Ok(match recovered {
        Some(corners) => Reconstruction {
            corners,
            case,
            degraded: None,
        },
        None => {
            debug!("degenerate plane geometry for {case:?}, keeping previous corners");
            Reconstruction {
                corners: *expected,
                case,
                degraded: Some(DegradeCause::DegenerateGeometry),
            }
        }
    })
}

fn recover_single<P: PlaneProjector + ?Sized>(
    corners: &CornerSet,
    expected: &CornerSet,
    hidden: usize,
    projector: &P,
) -> Option<Point2<f32>> {
    let visible: [usize; 3] = std::array::from_fn(|k| (hidden + 1 + k) % 4);
    let src = visible.map(|i| projector.to_plane(expected.points[i]));
    let dst = visible.map(|i| projector.to_plane(corners.points[i]));
    let motion = projector.solve_affine(&src, &dst)?;

    let moved = motion.apply(projector.to_plane(expected.points[hidden]));
    finite(projector.to_image(moved))
}

fn recover_double<P: PlaneProjector + ?Sized>(
    corners: &CornerSet,
    expected: &CornerSet,
    hidden: [usize; 2],
    projector: &P,
) -> Option<[Point2<f32>; 2]> {
    let mut visible = (0..4).filter(|i| !hidden.contains(i));
    let (a, b) = (visible.next()?, visible.next()?);

    let p0 = projector.to_plane(expected.points[a]);
    let q0 = projector.to_plane(expected.points[b]);
    let p1 = projector.to_plane(corners.points[a]);
    let q1 = projector.to_plane(corners.points[b]);
    let motion = rigid_motion(p0, unit_vector(p0, q0)?, p1, unit_vector(p1, q1)?);

    let [h0, h1] = hidden.map(|i| projector.to_image(motion.apply(projector.to_plane(expected.points[i]))));
    Some([finite(h0)?, finite(h1)?])
}

/// Translation taking `p0` onto `p1`, then a rotation about `p1` turning `u0` into `u1`.
///
/// `acos` only yields the unsigned angle. Both signs are tried and the one
/// that carries `u0` closest to `u1` wins; this is a nearest-fit choice, so
/// nearly antiparallel vectors can pick either sign.
fn rigid_motion(p0: Point2<f32>, u0: Vector2<f32>, p1: Point2<f32>, u1: Vector2<f32>) -> Affine2 {
    let angle = unsigned_angle(u0, u1);
    let ccw_err = (rotation_2d(angle) * u0 - u1).norm();
    let cw_err = (rotation_2d(-angle) * u0 - u1).norm();
    let signed = if ccw_err <= cw_err { angle } else { -angle };

    let shift = (p1 - p0).cast::<f64>();
    Affine2::translation(shift).then(&Affine2::rotation_about(p1, signed as f64))
}

fn finite(p: Point2<f32>) -> Option<Point2<f32>> {
    (p.x.is_finite() && p.y.is_finite()).then_some(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rect_tracker_core::{homography_from_4pt, HomographyPair};

    /// Projector whose canonical plane coincides with the image.
    struct IdentityProjector;

    impl PlaneProjector for IdentityProjector {
        fn to_plane(&self, p: Point2<f32>) -> Point2<f32> {
            p
        }

        fn to_image(&self, p: Point2<f32>) -> Point2<f32> {
            p
        }
    }

    fn square() -> CornerSet {
        CornerSet::new([
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 100.0),
            Point2::new(100.0, 100.0),
            Point2::new(100.0, 0.0),
        ])
    }

    fn perspective_pair(corners: &CornerSet, w: f32, h: f32) -> HomographyPair {
        let plane = HomographyPair::plane_corners(w, h);
        HomographyPair::new(
            homography_from_4pt(&corners.points, &plane.points).expect("forward"),
            homography_from_4pt(&plane.points, &corners.points).expect("inverse"),
            w,
            h,
        )
    }

    fn assert_close(a: Point2<f32>, b: Point2<f32>, tol: f32) {
        assert!(
            (a - b).norm() < tol,
            "expected ({:.3},{:.3}) ~ ({:.3},{:.3}) within {}",
            a.x,
            a.y,
            b.x,
            b.y,
            tol
        );
    }

    #[test]
    fn case_follows_flag_count() {
        let case = |f: [bool; 4]| OcclusionCase::from_flags(&ObstructionFlags(f)).expect("case");
        assert_eq!(case([false; 4]), OcclusionCase::None);
        assert_eq!(
            case([false, false, true, false]),
            OcclusionCase::Single { index: 2 }
        );
        assert_eq!(
            case([true, false, false, true]),
            OcclusionCase::Double { indices: [0, 3] }
        );
        assert_eq!(
            case([true, true, false, true]),
            OcclusionCase::Severe { count: 3 }
        );
        assert_eq!(case([true; 4]), OcclusionCase::Severe { count: 4 });
        assert_eq!(case([true; 4]).occluded(), 4);
    }

    #[test]
    fn no_occlusion_keeps_detections() {
        let moved = square().translated(Vector2::new(7.0, 3.0));
        let r = reconstruct(
            &moved,
            &square(),
            &ObstructionFlags::default(),
            &IdentityProjector,
        )
        .expect("ok");
        assert_eq!(r.corners, moved);
        assert_eq!(r.degraded, None);
    }

    #[test]
    fn single_occlusion_follows_visible_neighbours() {
        let expected = square();
        let pair = perspective_pair(&expected, 100.0, 100.0);
        let truth = expected.translated(Vector2::new(20.0, 10.0));
        let mut detected = truth;
        detected.points[0] = Point2::new(50.0, 50.0);

        let r = reconstruct(
            &detected,
            &expected,
            &ObstructionFlags([true, false, false, false]),
            &pair,
        )
        .expect("ok");
        assert_eq!(r.case, OcclusionCase::Single { index: 0 });
        assert_eq!(r.degraded, None);
        assert_close(r.corners.points[0], truth.points[0], 2.0);
        for i in 1..4 {
            assert_eq!(r.corners.points[i], detected.points[i]);
        }
    }

    #[test]
    fn single_occlusion_under_perspective() {
        // A tilted quad seen in perspective; the sheet slides inside its plane.
        let expected = CornerSet::new([
            Point2::new(120.0, 80.0),
            Point2::new(95.0, 400.0),
            Point2::new(420.0, 390.0),
            Point2::new(380.0, 95.0),
        ]);
        let pair = perspective_pair(&expected, 300.0, 300.0 * 11.0 / 8.5);
        let plane_shift = Affine2::translation(nalgebra::Vector2::new(12.0, -18.0));
        let truth = CornerSet::new(
            expected
                .points
                .map(|p| pair.to_image(plane_shift.apply(pair.to_plane(p)))),
        );
        let mut detected = truth;
        detected.points[3] += Vector2::new(-40.0, 35.0);

        let r = reconstruct(
            &detected,
            &expected,
            &ObstructionFlags([false, false, false, true]),
            &pair,
        )
        .expect("ok");
        assert_close(r.corners.points[3], truth.points[3], 1.0);
    }

    fn rigidly_moved(corners: &CornerSet, angle: f64, shift: Vector2<f64>) -> CornerSet {
        let motion = Affine2::rotation_about(Point2::new(50.0, 50.0), angle)
            .then(&Affine2::translation(shift));
        CornerSet::new(corners.points.map(|p| motion.apply(p)))
    }

    #[test]
    fn double_occlusion_recovers_both_rotation_directions() {
        let expected = square();
        for angle in [0.2_f64, -0.2, 0.05, -0.6] {
            let truth = rigidly_moved(&expected, angle, Vector2::new(15.0, -5.0));
            let mut detected = truth;
            detected.points[0] += Vector2::new(25.0, 30.0);
            detected.points[3] += Vector2::new(-25.0, 30.0);

            let r = reconstruct(
                &detected,
                &expected,
                &ObstructionFlags([true, false, false, true]),
                &IdentityProjector,
            )
            .expect("ok");
            assert_eq!(r.degraded, None, "angle {angle}");
            assert_close(r.corners.points[0], truth.points[0], 0.5);
            assert_close(r.corners.points[3], truth.points[3], 0.5);
        }
    }

    #[test]
    fn double_occlusion_of_opposite_corners() {
        let expected = square();
        let pair = perspective_pair(&expected, 100.0, 100.0);
        let truth = rigidly_moved(&expected, -0.3, Vector2::new(-8.0, 12.0));
        let mut detected = truth;
        detected.points[1] += Vector2::new(30.0, -20.0);
        detected.points[3] += Vector2::new(-30.0, 20.0);

        let r = reconstruct(
            &detected,
            &expected,
            &ObstructionFlags([false, true, false, true]),
            &pair,
        )
        .expect("ok");
        assert_close(r.corners.points[1], truth.points[1], 1.0);
        assert_close(r.corners.points[3], truth.points[3], 1.0);
    }

    #[test]
    fn severe_occlusion_keeps_expected() {
        let expected = square();
        let detected = expected.translated(Vector2::new(30.0, 30.0));
        for flags in [[true, true, true, false], [true; 4]] {
            let r = reconstruct(
                &detected,
                &expected,
                &ObstructionFlags(flags),
                &IdentityProjector,
            )
            .expect("ok");
            assert_eq!(r.corners, expected);
            assert_eq!(r.degraded, Some(DegradeCause::TooManyOccluded));
        }
    }

    #[test]
    fn coincident_visible_corners_degrade() {
        let expected = square();
        let mut detected = expected.translated(Vector2::new(5.0, 5.0));
        detected.points[2] = detected.points[1];

        let r = reconstruct(
            &detected,
            &expected,
            &ObstructionFlags([true, false, false, true]),
            &IdentityProjector,
        )
        .expect("ok");
        assert_eq!(r.corners, expected);
        assert_eq!(r.degraded, Some(DegradeCause::DegenerateGeometry));
    }
}
