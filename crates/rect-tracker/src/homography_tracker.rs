use crate::TrackError;
use rect_tracker_core::{homography_from_4pt, CornerSet, HomographyPair};

/// Computes the image <-> canonical plane homographies for finalized corners.
#[derive(Clone, Copy, Debug)]
pub struct HomographyTracker {
    paper_ratio: f32,
}

impl HomographyTracker {
    pub fn new(paper_ratio: f32) -> Self {
        Self { paper_ratio }
    }

    /// Canonical plane size: the wider of the top and bottom edges' x-extent,
    /// and that width times the paper ratio.
    pub fn plane_size(&self, corners: &CornerSet) -> (f32, f32) {
        let [tl, bl, br, tr] = corners.points;
        let w = (br.x - bl.x).abs().max((tr.x - tl.x).abs());
        (w, w * self.paper_ratio)
    }

    pub fn update(&self, corners: &CornerSet) -> Result<HomographyPair, TrackError> {
        let (w, h) = self.plane_size(corners);
        let failed = || TrackError::HomographySolve {
            corners: corners.to_array(),
            width: w,
        };
        if !w.is_finite() || w <= f32::EPSILON {
            return Err(failed());
        }

        let plane = HomographyPair::plane_corners(w, h);
        let plane_from_image =
            homography_from_4pt(&corners.points, &plane.points).ok_or_else(failed)?;
        let image_from_plane =
            homography_from_4pt(&plane.points, &corners.points).ok_or_else(failed)?;
        Ok(HomographyPair::new(plane_from_image, image_from_plane, w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;
    use rect_tracker_core::PlaneProjector;

    #[test]
    fn width_uses_wider_horizontal_extent() {
        let corners = CornerSet::new([
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 200.0),
            Point2::new(170.0, 210.0),
            Point2::new(150.0, 5.0),
        ]);
        let (w, h) = HomographyTracker::new(2.0).plane_size(&corners);
        assert_eq!(w, 170.0);
        assert_eq!(h, 340.0);
    }

    #[test]
    fn corners_land_on_canonical_rectangle() {
        let corners = CornerSet::new([
            Point2::new(104.0, 61.0),
            Point2::new(90.0, 355.0),
            Point2::new(330.0, 340.0),
            Point2::new(310.0, 70.0),
        ]);
        let pair = HomographyTracker::new(11.0 / 8.5)
            .update(&corners)
            .expect("pair");
        assert_eq!(pair.width, 240.0);
        let plane = HomographyPair::plane_corners(pair.width, pair.height);
        for (img, expected) in corners.points.iter().zip(plane.points) {
            let p = pair.to_plane(*img);
            assert!((p - expected).norm() < 1e-2, "{p:?} vs {expected:?}");
            let back = pair.to_image(p);
            assert!((back - img).norm() < 1e-2, "{back:?} vs {img:?}");
        }
    }

    #[test]
    fn zero_width_is_rejected() {
        let corners = CornerSet::new([Point2::new(4.0, 4.0); 4]);
        let err = HomographyTracker::new(1.0).update(&corners).unwrap_err();
        assert!(matches!(err, TrackError::HomographySolve { width, .. } if width == 0.0));
    }
}
