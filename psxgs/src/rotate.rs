//! Vector rotation used to turn sprites.
//!
//! Angles are degrees in fixed point with 12 fractional bits. Only the whole
//! degree is used.

/// cos(d) for d in 0..=90 degrees.
fn cos_quadrant(d: i32) -> f64 {
    match d {
        0 => 1.0,
        90 => 0.0,
        _ => (d as f64).to_radians().cos(),
    }
}

/// Whole degrees in 0..360.
fn degrees(angle: i32) -> i32 {
    (angle >> 12).rem_euclid(360)
}

pub fn cos(angle: i32) -> f64 {
    match degrees(angle) {
        d @ 0..=90 => cos_quadrant(d),
        d @ 91..=180 => -cos_quadrant(180 - d),
        d @ 181..=270 => -cos_quadrant(d - 180),
        d => cos_quadrant(360 - d),
    }
}

pub fn sin(angle: i32) -> f64 {
    match degrees(angle) {
        d @ 0..=90 => cos_quadrant(90 - d),
        d @ 91..=180 => cos_quadrant(d - 90),
        d @ 181..=270 => -cos_quadrant(270 - d),
        d => -cos_quadrant(d - 270),
    }
}

/// Rotate `v` about the X, Y and Z axes by the given angles.
///
/// The Y component of the result is negated, so screen Y (pointing down)
/// comes out of a vector given with Y pointing up.
pub fn rotate_vector(x_angle: i32, y_angle: i32, z_angle: i32, v: [f64; 3]) -> [f64; 3] {
    let k = [cos(x_angle), cos(y_angle), cos(z_angle)];
    let s = [sin(x_angle), sin(y_angle), sin(z_angle)];

    let m = [
        [
            k[1] * k[2],
            (k[0] * s[2]) + (s[0] * s[1] * k[2]),
            (s[0] * s[2]) - (k[0] * s[1] * k[2]),
        ],
        [
            -(k[1] * s[2]),
            (k[0] * k[2]) - (s[0] * s[1] * s[2]),
            (s[0] * k[2]) + (k[0] * s[1] * s[2]),
        ],
        [
            s[1],
            -(s[0] * k[1]),
            k[0] * k[1],
        ],
    ];

    let mut out = m.map(|row| row[0] * v[0] + row[1] * v[1] + row[2] * v[2]);
    out[1] = -out[1];
    out
}

#[cfg(test)]
mod test {
    use super::*;

    const DEG: i32 = 1 << 12;

    #[test]
    fn quadrants() {
        assert_eq!(cos(0), 1.0);
        assert_eq!(cos(90 * DEG), 0.0);
        assert_eq!(cos(180 * DEG), -1.0);
        assert_eq!(sin(90 * DEG), 1.0);
        assert_eq!(sin(270 * DEG), -1.0);
        assert_eq!(sin(-90 * DEG), -1.0);
        assert_eq!(cos(450 * DEG), 0.0);
    }

    #[test]
    fn zero_rotation_flips_y() {
        assert_eq!(rotate_vector(0, 0, 0, [3.0, 4.0, 5.0]), [3.0, -4.0, 5.0]);
    }

    #[test]
    fn quarter_turn_about_z() {
        let [x, y, z] = rotate_vector(0, 0, 90 * DEG, [1.0, 0.0, 0.0]);
        assert_eq!((x, y, z), (0.0, 1.0, 0.0));
    }
}
