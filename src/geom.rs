//! Compass angles and rotation about a pivot, over `kurbo` points.
//!
//! Angles are in degrees measured by `atan2(dy, dx)` and normalized to
//! `[0, 360)`. With document y growing downward, a direction of `(0, -1)` is
//! `270`.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use kurbo::Affine;
pub use kurbo::Point;

/// Wrap any finite angle into `[0, 360)`.
#[must_use]
pub fn normalize_degrees_360(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid of a tiny negative rounds up to exactly 360.0.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Compass angle in degrees from `(cx, cy)` toward `(px, py)`.
///
/// Returns `None` when any coordinate is not finite.
#[must_use]
pub fn calculate_degree(cx: f64, cy: f64, px: f64, py: f64) -> Option<f64> {
    let dx = px - cx;
    let dy = py - cy;
    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }
    Some(normalize_degrees_360(dy.atan2(dx).to_degrees()))
}

/// Compass angle of a raw direction vector.
#[must_use]
pub fn direction_degree(dx: f64, dy: f64) -> Option<f64> {
    calculate_degree(0.0, 0.0, dx, dy)
}

/// Rotate `p` around `center` by `angle_deg`.
#[must_use]
pub fn rotate_point(center: Point, angle_deg: f64, p: Point) -> Point {
    Affine::rotate_about(angle_deg.to_radians(), center) * p
}
