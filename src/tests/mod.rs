#![cfg(test)]

use std::sync::Arc;

use crate::{
    body_presets::SOLAR_MASS, Body, FlightPath, Orbit, System, Vector3, GRAVITATIONAL_CONSTANT,
};

mod assertions;
mod maneuver;
mod polling;

/// Gravitational parameter of the Sun, as used throughout the reference cases.
const SUN_MU: f64 = GRAVITATIONAL_CONSTANT * SOLAR_MASS;

/// Orbital period of the reference orbit.
const REFERENCE_PERIOD: f64 = 374942509.78053558;

fn reference_position() -> Vector3 {
    Vector3::new(617244712358.0, -431694791368.0, -12036457087.0)
}

fn reference_velocity() -> Vector3 {
    Vector3::new(7320.0, 11329.0, -211.0)
}

fn reference_orbit() -> Orbit {
    Orbit::from_state_vectors(SUN_MU, reference_position(), reference_velocity())
        .expect("reference state is a valid ellipse")
}

fn sun_system() -> Arc<System> {
    Arc::new(System::new(Body::new(SUN_MU, 10.0)))
}

fn reference_path() -> FlightPath {
    FlightPath::new(sun_system(), reference_position(), reference_velocity(), 0.0)
        .expect("reference state is a valid flight path")
}

fn dvec3_to_bits(v: Vector3) -> (u64, u64, u64) {
    (v.x.to_bits(), v.y.to_bits(), v.z.to_bits())
}

#[test]
fn unit_orbit_is_default() {
    let orbit = Orbit::default();

    assert_eq!(orbit.position(), Vector3::X);
    assert_eq!(orbit.velocity(), Vector3::Y);
    assert_eq!(orbit.period(), Ok(core::f64::consts::TAU));
}

#[test]
fn reference_constants_agree() {
    let period = reference_orbit().period().unwrap();
    assertions::assert_relative(period, REFERENCE_PERIOD, 1e-9, "reference period");
}
