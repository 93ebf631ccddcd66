//! Time-derived rotation of the whole field.
//!
//! Angles are a pure function of absolute elapsed time, never accumulated
//! frame by frame, so any frame can be reproduced from its timestamp.

use crate::math::{multiply_matrices, rotation_x, rotation_y, Mat3};

/// Angular speed about each axis, in radians per second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationRates {
    pub x: f64,
    pub y: f64,
}

impl Default for RotationRates {
    fn default() -> Self {
        RotationRates { x: 0.05, y: 0.1 }
    }
}

impl RotationRates {
    /// Rotation of the field after `elapsed` seconds
    pub fn at(&self, elapsed: f64) -> Rotation {
        Rotation {
            x: elapsed * self.x,
            y: elapsed * self.y,
        }
    }
}

/// Rotation angles about the X and Y axes, in radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
}

impl Rotation {
    /// Combined matrix for X-then-Y Euler order (`Rx * Ry`)
    pub fn matrix(&self) -> Mat3 {
        multiply_matrices(&rotation_x(self.x), &rotation_y(self.y))
    }
}
