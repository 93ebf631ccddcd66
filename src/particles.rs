//! Particle field generation.
//!
//! The field is a flat `[x0, y0, z0, x1, y1, z1, ...]` buffer filled once
//! with coordinates drawn uniformly from `[-half_width, half_width)`.

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// Fixed set of 3D points, stored as a flat buffer of length `3 * len()`
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    positions: Box<[f32]>,
    half_width: f32,
}

impl PointCloud {
    /// Samples `count` points with every component uniform in
    /// `[-half_width, half_width)`.
    ///
    /// A half-width that is not a positive finite number, or whose full
    /// width overflows `f32`, is a degenerate range; every point then sits
    /// at the origin.
    pub fn generate<R: Rng + ?Sized>(count: usize, half_width: f32, rng: &mut R) -> Self {
        let mut positions = vec![0.0f32; count * 3].into_boxed_slice();

        if half_width > 0.0 && (2.0 * half_width).is_finite() {
            let range = Uniform::new(-half_width, half_width);
            for value in positions.iter_mut() {
                *value = range.sample(rng);
            }
        }

        PointCloud {
            positions,
            half_width,
        }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    /// The raw buffer, three components per point
    pub fn as_slice(&self) -> &[f32] {
        &self.positions
    }

    pub fn points(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.as_slice()
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
    }
}
