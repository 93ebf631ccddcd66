/// 3x3 matrix, row-major
pub type Mat3 = [[f64; 3]; 3];

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

/// Rotation around the X axis
pub fn rotation_x(angle: f64) -> Mat3 {
    let (sin_a, cos_a) = angle.sin_cos();
    [[1.0, 0.0, 0.0], [0.0, cos_a, -sin_a], [0.0, sin_a, cos_a]]
}

/// Rotation around the Y axis
pub fn rotation_y(angle: f64) -> Mat3 {
    let (sin_a, cos_a) = angle.sin_cos();
    [[cos_a, 0.0, sin_a], [0.0, 1.0, 0.0], [-sin_a, 0.0, cos_a]]
}

/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &Mat3, vector: &[f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Multiplies two 3x3 matrices
pub fn multiply_matrices(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut result = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Scales a colour towards black, as if blended over a black background
pub fn blend_over_black(color: Rgb, alpha: f64) -> Rgb {
    let alpha = alpha.clamp(0.0, 1.0);
    let r = (color.r as f64 * alpha).round().min(255.0) as u8;
    let g = (color.g as f64 * alpha).round().min(255.0) as u8;
    let b = (color.b as f64 * alpha).round().min(255.0) as u8;
    Rgb::new(r, g, b)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    pub const IDENTITY: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    fn assert_close(a: [f64; 3], b: [f64; 3]) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-12, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn identity_leaves_vector_unchanged() {
        let v = [1.5, -2.0, 3.25];
        assert_eq!(multiply_matrix_vector(&IDENTITY, &v), v);
        assert_eq!(multiply_matrices(&IDENTITY, &rotation_x(0.3)), rotation_x(0.3));
    }

    #[test]
    fn quarter_turn_about_x_maps_y_to_z() {
        let v = multiply_matrix_vector(&rotation_x(FRAC_PI_2), &[0.0, 1.0, 0.0]);
        assert_close(v, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn quarter_turn_about_y_maps_z_to_x() {
        let v = multiply_matrix_vector(&rotation_y(FRAC_PI_2), &[0.0, 0.0, 1.0]);
        assert_close(v, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn opposite_rotations_cancel() {
        let m = multiply_matrices(&rotation_y(0.7), &rotation_y(-0.7));
        for (row, expected) in m.iter().zip(IDENTITY.iter()) {
            assert_close(*row, *expected);
        }
    }

    #[test]
    fn blend_scales_channels() {
        let c = Rgb::new(0x6e, 0xe7, 0xb7);
        assert_eq!(blend_over_black(c, 1.0), c);
        assert_eq!(blend_over_black(c, 0.0), Rgb::new(0, 0, 0));
        assert_eq!(blend_over_black(Rgb::new(200, 100, 10), 0.5), Rgb::new(100, 50, 5));
    }
}
