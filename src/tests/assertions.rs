use crate::{KinematicData, Vector3};

const ALMOST_EQ_TOLERANCE: f64 = 1e-6;

pub(super) fn assert_almost_eq(a: f64, b: f64, what: &str) {
    assert_within(a, b, ALMOST_EQ_TOLERANCE, what);
}

pub(super) fn assert_within(a: f64, b: f64, tolerance: f64, what: &str) {
    if a.is_nan() && b.is_nan() {
        return;
    }

    let dist = (a - b).abs();
    let msg = format!(
        "Almost-eq assertion failed for '{what}'!\n\
        {a} and {b} has distance {dist}, which is more than max of {tolerance}"
    );

    assert!(dist < tolerance, "{msg}");
}

/// Compares two angles modulo 2π.
pub(super) fn assert_angle_within(a: f64, b: f64, tolerance: f64, what: &str) {
    let diff = (a - b).rem_euclid(core::f64::consts::TAU);
    let dist = diff.min(core::f64::consts::TAU - diff);
    assert!(
        dist < tolerance,
        "Angle assertion failed for '{what}'!\n\
        {a} and {b} are {dist} rad apart, which is more than max of {tolerance}"
    );
}

pub(super) fn assert_relative(a: f64, b: f64, tolerance: f64, what: &str) {
    let scale = a.abs().max(b.abs()).max(f64::MIN_POSITIVE);
    let rel = (a - b).abs() / scale;
    assert!(
        rel < tolerance,
        "Relative-eq assertion failed for '{what}'!\n\
        {a} and {b} differ by {rel} (relative), which is more than max of {tolerance}"
    );
}

pub(super) fn assert_almost_eq_vec3(a: Vector3, b: Vector3, what: &str) {
    assert_vec3_within(a, b, ALMOST_EQ_TOLERANCE, what);
}

pub(super) fn assert_vec3_within(a: Vector3, b: Vector3, tolerance: f64, what: &str) {
    let desc = format!("{a:?} vs {b:?}; {what}");
    assert_within(a.x, b.x, tolerance, &format!("X coord of {desc}"));
    assert_within(a.y, b.y, tolerance, &format!("Y coord of {desc}"));
    assert_within(a.z, b.z, tolerance, &format!("Z coord of {desc}"));
}

pub(super) fn assert_almost_eq_vec3_rescale(a: Vector3, b: Vector3, what: &str) {
    let desc = format!("{a:?} vs {b:?}; {what}");
    let a_norm = a.normalize();
    let b_norm = b.normalize();
    let a_scale = a.length().log2();
    let b_scale = b.length().log2();

    assert_almost_eq(a_scale, b_scale, &format!("logarithmic scale of {desc}"));
    if a_scale.is_finite() {
        assert_almost_eq(a_norm.x, b_norm.x, &format!("rescaled X coord of {desc}"));
        assert_almost_eq(a_norm.y, b_norm.y, &format!("rescaled Y coord of {desc}"));
        assert_almost_eq(a_norm.z, b_norm.z, &format!("rescaled Z coord of {desc}"));
    }
}

pub(super) fn assert_almost_eq_state(a: &KinematicData, b: &KinematicData, what: &str) {
    assert_almost_eq_vec3_rescale(a.position, b.position, &format!("position of {what}"));
    assert_almost_eq_vec3_rescale(a.velocity, b.velocity, &format!("velocity of {what}"));
}

pub(super) fn assert_eq_vec3(a: Vector3, b: Vector3, what: &str) {
    let desc = format!("{a:?} vs {b:?}; {what}");
    assert_eq!(
        super::dvec3_to_bits(a),
        super::dvec3_to_bits(b),
        "bitwise mismatch: {desc}"
    );
}
