//! Perspective projection onto a grid of terminal cells.

use crate::config::CameraConfig;

/// Character grid the camera projects onto
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub cols: usize,
    pub rows: usize,
    /// Height of one cell divided by its width
    pub cell_aspect: f64,
}

impl Viewport {
    /// Width over height of the whole grid in physical units
    pub fn aspect(&self) -> f64 {
        if self.rows == 0 {
            return 1.0;
        }
        self.cols as f64 / (self.rows as f64 * self.cell_aspect)
    }
}

/// A point after projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub col: usize,
    pub row: usize,
    /// Distance in front of the camera along the view axis
    pub depth: f64,
    /// Scale from world units to cell heights at this depth
    pub cells_per_unit: f64,
}

/// Pinhole camera at `(0, 0, distance)` looking down -Z, Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    distance: f64,
    /// Cotangent of half the vertical field of view
    focal: f64,
    near: f64,
    far: f64,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Camera {
            distance: config.distance,
            focal: 1.0 / (config.fov.to_radians() * 0.5).tan(),
            near: config.near,
            far: config.far,
        }
    }

    /// Projects a world-space point. Returns `None` for points outside
    /// the view frustum or when the viewport has no cells.
    pub fn project(&self, point: [f64; 3], viewport: &Viewport) -> Option<Projected> {
        if viewport.cols == 0 || viewport.rows == 0 {
            return None;
        }

        let depth = self.distance - point[2];
        if depth < self.near || depth > self.far {
            return None;
        }

        let ndc_x = self.focal / viewport.aspect() * point[0] / depth;
        let ndc_y = self.focal * point[1] / depth;
        if !(-1.0..=1.0).contains(&ndc_x) || !(-1.0..=1.0).contains(&ndc_y) {
            return None;
        }

        let col = ((ndc_x + 1.0) * 0.5 * viewport.cols as f64) as usize;
        let row = ((1.0 - ndc_y) * 0.5 * viewport.rows as f64) as usize;

        Some(Projected {
            col: col.min(viewport.cols - 1),
            row: row.min(viewport.rows - 1),
            depth,
            cells_per_unit: self.focal / depth * viewport.rows as f64 * 0.5,
        })
    }

    /// Cells per world unit for a point at unit depth
    pub fn unit_scale(&self, viewport: &Viewport) -> f64 {
        self.focal * viewport.rows as f64 * 0.5
    }
}
