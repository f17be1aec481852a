use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Label of a corner inside a [`CornerSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CornerIndex {
    TopLeft = 0,
    BottomLeft = 1,
    BottomRight = 2,
    TopRight = 3,
}

impl CornerIndex {
    pub const ALL: [CornerIndex; 4] = [
        CornerIndex::TopLeft,
        CornerIndex::BottomLeft,
        CornerIndex::BottomRight,
        CornerIndex::TopRight,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }
}

/// Four corners in the order top-left, bottom-left, bottom-right, top-right.
///
/// The order is a *label*: once established on the first frame it is carried
/// forward by correspondence resolution, so index `i` keeps naming the same
/// physical corner even when the rectangle rotates in the image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CornerSet {
    pub points: [Point2<f32>; 4],
}

impl CornerSet {
    pub fn new(points: [Point2<f32>; 4]) -> Self {
        Self { points }
    }

    /// Build from a slice, failing unless it holds exactly four points.
    pub fn from_slice(points: &[Point2<f32>]) -> Option<Self> {
        let points: [Point2<f32>; 4] = points.try_into().ok()?;
        Some(Self::new(points))
    }

    #[inline]
    pub fn get(&self, corner: CornerIndex) -> Point2<f32> {
        self.points[corner.index()]
    }

    /// Cyclic rotation: `out[i] = self[(i + k) % 4]`.
    pub fn rotated(&self, k: usize) -> Self {
        Self::new(std::array::from_fn(|i| self.points[(i + k) % 4]))
    }

    /// Sum of per-corner Euclidean distances to `other`.
    pub fn total_distance(&self, other: &CornerSet) -> f32 {
        self.displacements(other).iter().sum()
    }

    /// Per-corner Euclidean distance to `other`, index aligned.
    pub fn displacements(&self, other: &CornerSet) -> [f32; 4] {
        std::array::from_fn(|i| (self.points[i] - other.points[i]).norm())
    }

    pub fn edge_lengths(&self) -> EdgeLengths {
        crate::geometry::edge_lengths(self)
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
    }

    pub fn translated(&self, offset: Vector2<f32>) -> Self {
        Self::new(self.points.map(|p| p + offset))
    }

    /// Uniform scaling about the image origin.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.points.map(|p| Point2::new(p.x * factor, p.y * factor)))
    }

    pub fn to_array(&self) -> [[f32; 2]; 4] {
        self.points.map(|p| [p.x, p.y])
    }
}

/// Side lengths of a corner cycle, in the order top, right, bottom, left.
///
/// These are image-space lengths and are not perspective invariant; they are
/// only meaningful as a relative change signal between consecutive frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeLengths {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeLengths {
    pub fn as_array(&self) -> [f32; 4] {
        [self.top, self.right, self.bottom, self.left]
    }
}

/// Per-corner occlusion flags, aligned with [`CornerSet`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstructionFlags(pub [bool; 4]);

impl ObstructionFlags {
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    #[inline]
    pub fn is_obstructed(&self, corner: CornerIndex) -> bool {
        self.0[corner.index()]
    }

    pub fn obstructed(&self) -> impl Iterator<Item = usize> + '_ {
        (0..4).filter(|&i| self.0[i])
    }

    pub fn visible(&self) -> impl Iterator<Item = usize> + '_ {
        (0..4).filter(|&i| !self.0[i])
    }
}
