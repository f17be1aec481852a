use nalgebra::{Matrix2, Point2, SMatrix, SVector, Vector2};
use serde::{Deserialize, Serialize};

/// Minimal doubled triangle area for a 3-point affine solve.
const MIN_TRIANGLE_AREA2: f64 = 1e-9;

/// 2D affine transform `p' = linear * p + translation`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Affine2 {
    pub linear: Matrix2<f64>,
    pub translation: Vector2<f64>,
}

impl Affine2 {
    pub fn new(linear: Matrix2<f64>, translation: Vector2<f64>) -> Self {
        Self {
            linear,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Matrix2::identity(), Vector2::zeros())
    }

    pub fn translation(offset: Vector2<f64>) -> Self {
        Self::new(Matrix2::identity(), offset)
    }

    /// Rotation by `angle` radians about `center`: `p' = R (p - c) + c`.
    pub fn rotation_about(center: Point2<f32>, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let r = Matrix2::new(c, -s, s, c);
        let center = Vector2::new(center.x as f64, center.y as f64);
        Self::new(r, center - r * center)
    }

    /// Composition that applies `self` first, then `next`.
    pub fn then(&self, next: &Affine2) -> Affine2 {
        Affine2::new(
            next.linear * self.linear,
            next.linear * self.translation + next.translation,
        )
    }

    /// Unique affine map sending `src[k]` to `dst[k]` for three correspondences.
    ///
    /// Returns `None` when the source points are (nearly) collinear.
    pub fn from_3pt(src: &[Point2<f32>; 3], dst: &[Point2<f32>; 3]) -> Option<Self> {
        let [a, b, c] = src.map(|p| Point2::new(p.x as f64, p.y as f64));
        let area2 = (b - a).perp(&(c - a));
        if !area2.is_finite() || area2.abs() < MIN_TRIANGLE_AREA2 {
            return None;
        }

        // Unknowns: [a11 a12 tx a21 a22 ty]
        let mut m = SMatrix::<f64, 6, 6>::zeros();
        let mut rhs = SVector::<f64, 6>::zeros();
        for k in 0..3 {
            let x = src[k].x as f64;
            let y = src[k].y as f64;

            let r0 = 2 * k;
            m[(r0, 0)] = x;
            m[(r0, 1)] = y;
            m[(r0, 2)] = 1.0;
            rhs[r0] = dst[k].x as f64;

            let r1 = 2 * k + 1;
            m[(r1, 3)] = x;
            m[(r1, 4)] = y;
            m[(r1, 5)] = 1.0;
            rhs[r1] = dst[k].y as f64;
        }

        let x = m.lu().solve(&rhs)?;
        Some(Self::new(
            Matrix2::new(x[0], x[1], x[3], x[4]),
            Vector2::new(x[2], x[5]),
        ))
    }

    #[inline]
    pub fn apply(&self, p: Point2<f32>) -> Point2<f32> {
        let v = self.linear * Vector2::new(p.x as f64, p.y as f64) + self.translation;
        Point2::new(v.x as f32, v.y as f32)
    }

    pub fn inverse(&self) -> Option<Self> {
        let inv = self.linear.try_inverse()?;
        Some(Self::new(inv, -(inv * self.translation)))
    }
}
