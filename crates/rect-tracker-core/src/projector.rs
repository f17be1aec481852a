use crate::{Affine2, CornerSet, Homography};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Moves points between the image and the canonical rectangle plane.
///
/// The occlusion recovery only ever talks to this trait, so the linear
/// algebra behind it can be swapped without touching the tracking logic.
pub trait PlaneProjector {
    fn to_plane(&self, p: Point2<f32>) -> Point2<f32>;

    fn to_image(&self, p: Point2<f32>) -> Point2<f32>;

    /// Affine map taking `src[k]` onto `dst[k]`; `None` if `src` is degenerate.
    fn solve_affine(&self, src: &[Point2<f32>; 3], dst: &[Point2<f32>; 3]) -> Option<Affine2> {
        Affine2::from_3pt(src, dst)
    }

    fn to_plane_all(&self, pts: &[Point2<f32>]) -> Vec<Point2<f32>> {
        pts.iter().map(|&p| self.to_plane(p)).collect()
    }

    fn to_image_all(&self, pts: &[Point2<f32>]) -> Vec<Point2<f32>> {
        pts.iter().map(|&p| self.to_image(p)).collect()
    }
}

/// Image <-> canonical plane homographies computed for one frame.
///
/// The canonical plane is the rectangle `[0, width] x [0, height]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HomographyPair {
    pub plane_from_image: Homography,
    pub image_from_plane: Homography,
    pub width: f32,
    pub height: f32,
}

impl HomographyPair {
    pub fn new(
        plane_from_image: Homography,
        image_from_plane: Homography,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            plane_from_image,
            image_from_plane,
            width,
            height,
        }
    }

    /// Canonical rectangle corners in [`CornerSet`] order.
    pub fn plane_corners(width: f32, height: f32) -> CornerSet {
        CornerSet::new([
            Point2::new(0.0, 0.0),
            Point2::new(0.0, height),
            Point2::new(width, height),
            Point2::new(width, 0.0),
        ])
    }
}

impl PlaneProjector for HomographyPair {
    #[inline]
    fn to_plane(&self, p: Point2<f32>) -> Point2<f32> {
        self.plane_from_image.apply(p)
    }

    #[inline]
    fn to_image(&self, p: Point2<f32>) -> Point2<f32> {
        self.image_from_plane.apply(p)
    }
}
