use rect_tracker_core::{CornerSet, EdgeLengths, ObstructionFlags};

/// Edges whose length drifted by more than `tolerance`, as (top, right, bottom, left).
pub fn broken_edges(current: &EdgeLengths, expected: &EdgeLengths, tolerance: f32) -> [bool; 4] {
    let cur = current.as_array();
    let exp = expected.as_array();
    std::array::from_fn(|i| (cur[i] - exp[i]).abs() > tolerance)
}

/// Flag corners whose *both* adjacent edges are broken.
///
/// `corners` must already be resolved against the previous frame so that
/// the edge indices line up with `expected_edges`.
pub fn classify(
    corners: &CornerSet,
    expected_edges: &EdgeLengths,
    tolerance: f32,
) -> ObstructionFlags {
    let [top, right, bottom, left] = broken_edges(&corners.edge_lengths(), expected_edges, tolerance);
    ObstructionFlags([
        top && left,
        bottom && left,
        bottom && right,
        top && right,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Vector2};

    fn square() -> CornerSet {
        CornerSet::new([
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 100.0),
            Point2::new(100.0, 100.0),
            Point2::new(100.0, 0.0),
        ])
    }

    #[test]
    fn rigid_translation_flags_nothing() {
        let expected = square().edge_lengths();
        let moved = square().translated(Vector2::new(40.0, -25.0));
        assert_eq!(classify(&moved, &expected, 10.0), ObstructionFlags::default());
    }

    #[test]
    fn single_displaced_corner_is_blamed() {
        let expected = square().edge_lengths();
        let mut c = square();
        c.points[2] = Point2::new(70.0, 65.0);
        assert_eq!(
            classify(&c, &expected, 10.0),
            ObstructionFlags([false, false, true, false])
        );
    }

    #[test]
    fn one_broken_edge_alone_blames_no_corner() {
        let expected = square().edge_lengths();
        let mut c = square();
        // Stretch only the top edge by sliding TR along it.
        c.points[3] = Point2::new(130.0, 0.0);
        let broken = broken_edges(&c.edge_lengths(), &expected, 10.0);
        assert!(broken[0]);
        assert!(!broken[2] && !broken[3]);
        let flags = classify(&c, &expected, 10.0);
        assert!(!flags.is_obstructed(rect_tracker_core::CornerIndex::TopLeft));
        assert!(!flags.is_obstructed(rect_tracker_core::CornerIndex::BottomLeft));
    }

    #[test]
    fn tolerance_is_strict() {
        let expected = EdgeLengths {
            top: 110.0,
            right: 100.0,
            bottom: 100.0,
            left: 110.0,
        };
        assert_eq!(classify(&square(), &expected, 10.0).count(), 0);
        assert_eq!(
            classify(&square(), &expected, 9.5),
            ObstructionFlags([true, false, false, false])
        );
    }
}
