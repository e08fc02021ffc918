use crate::core::models::structure::SimBox;
use nalgebra::{Point3, Vector3};

/// Applies the minimum-image convention to a displacement along one box axis.
///
/// If the displacement exceeds half of the box length, one full box length is
/// subtracted (or added for negative displacements). For a zero-length axis the
/// displacement is returned unchanged.
#[inline]
pub fn minimum_image(delta: f64, length: f64) -> f64 {
    let half = length * 0.5;
    if delta > half {
        delta - length
    } else if delta < -half {
        delta + length
    } else {
        delta
    }
}

/// Returns the minimum-image displacement vector from `q` to `p`.
#[inline]
pub fn displacement(p: &Point3<f64>, q: &Point3<f64>, sim_box: &SimBox) -> Vector3<f64> {
    let raw = p - q;
    let lengths = sim_box.lengths();
    Vector3::new(
        minimum_image(raw.x, lengths.x),
        minimum_image(raw.y, lengths.y),
        minimum_image(raw.z, lengths.z),
    )
}

/// Returns the squared minimum-image distance between two points.
#[inline]
pub fn distance_squared(p: &Point3<f64>, q: &Point3<f64>, sim_box: &SimBox) -> f64 {
    displacement(p, q, sim_box).norm_squared()
}

/// Returns the minimum-image Euclidean distance between two points in a rectangular box.
///
/// The correction is applied independently along each axis of `sim_box`; only
/// the diagonal of the box is considered.
#[inline]
pub fn distance(p: &Point3<f64>, q: &Point3<f64>, sim_box: &SimBox) -> f64 {
    distance_squared(p, q, sim_box).sqrt()
}
