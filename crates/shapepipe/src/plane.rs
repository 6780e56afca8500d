//! Cutting plane defined by three points in R³.
//!
//! The plane is picked once on a reference sample's ungroomed geometry and
//! then carried through the grooming transforms so the same anatomical cut
//! applies to every sample's aligned segmentation. All transforms are
//! point-wise and index-aligned: point order never changes.

use nalgebra::{Matrix4, Vector3, Vector4};

/// A plane given by three non-collinear points, in the order they were picked.
///
/// Value-semantic: every transform returns a new plane and leaves the
/// receiver untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CuttingPlane {
    points: [Vector3<f64>; 3],
}

impl CuttingPlane {
    #[inline]
    pub fn new(points: [Vector3<f64>; 3]) -> Self {
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[Vector3<f64>; 3] {
        &self.points
    }

    /// Row-major 3×3 layout (point-major), the shape the external
    /// plane-clipping operation consumes.
    #[inline]
    pub fn flat(&self) -> [f64; 9] {
        let [a, b, c] = self.points;
        [a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z]
    }

    /// Subtract `t` from every point.
    ///
    /// The alignment stages record the offset they moved the sample by, so
    /// undoing them on the plane is a subtraction, not an addition.
    #[inline]
    pub fn translate(&self, t: Vector3<f64>) -> Self {
        Self {
            points: self.points.map(|p| p - t),
        }
    }

    /// Apply a 4×4 affine matrix in homogeneous coordinates: each point
    /// becomes the first three components of `m * (x, y, z, 1)`.
    pub fn transform(&self, m: &Matrix4<f64>) -> Self {
        Self {
            points: self.points.map(|p| {
                let q = m * Vector4::new(p.x, p.y, p.z, 1.0);
                Vector3::new(q.x, q.y, q.z)
            }),
        }
    }

    /// Catch for a flipped vertical axis after rigid alignment.
    ///
    /// If all three points sit below the origin on the Y axis, the alignment
    /// flipped the anatomical "up" direction and we negate Y on all three.
    /// Known limitation: this patches exactly the one observed flip pattern
    /// (see the femur data set) and detects no other flip or rotation
    /// anomaly. A single conditional negation; calling it on an
    /// already-corrected plane whose points are all Y-negative flips again.
    pub fn correct_flipped_height(&self) -> Self {
        if self.points.iter().all(|p| p.y < 0.0) {
            Self {
                points: self.points.map(|p| Vector3::new(p.x, -p.y, p.z)),
            }
        } else {
            *self
        }
    }
}
