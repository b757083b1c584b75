use std::str::FromStr;

use approx::assert_relative_eq;
use strum::IntoEnumIterator;

use super::assertions::*;
use crate::{
    BurnIntegrator, KinematicData, Maneuver, ManeuverError, ManeuverType, PerformanceData, Vector3,
};

fn engine() -> PerformanceData {
    PerformanceData::new(3000.0, 20000.0).unwrap()
}

fn big_burn(start: f64) -> Maneuver {
    Maneuver::new(ManeuverType::Prograde, 2000.0, engine(), 150.0, start).unwrap()
}

#[test]
fn flow_rate() {
    let engine = PerformanceData::new(1000.0, 100000.0).unwrap();
    assert_eq!(engine.flow_rate(), 100.0);
    assert_eq!(engine.exhaust_velocity(), 1000.0);
    assert_eq!(engine.thrust(), 100000.0);
}

#[test]
fn invalid_performance_is_rejected() {
    assert_eq!(
        PerformanceData::new(0.0, 100.0),
        Err(ManeuverError::InvalidExhaustVelocity(0.0))
    );
    assert_eq!(
        PerformanceData::new(-3.0, 100.0),
        Err(ManeuverError::InvalidExhaustVelocity(-3.0))
    );
    assert_eq!(
        PerformanceData::new(3000.0, 0.0),
        Err(ManeuverError::InvalidThrust(0.0))
    );
    assert!(matches!(
        PerformanceData::new(f64::NAN, 100.0),
        Err(ManeuverError::InvalidExhaustVelocity(_))
    ));
    assert!(matches!(
        PerformanceData::new(3000.0, f64::INFINITY),
        Err(ManeuverError::InvalidThrust(_))
    ));
}

#[test]
fn invalid_maneuvers_are_rejected() {
    let kind = ManeuverType::Prograde;

    assert_eq!(
        Maneuver::new(kind, 0.0, engine(), 150.0, 0.0),
        Err(ManeuverError::InvalidDeltaV(0.0))
    );
    assert_eq!(
        Maneuver::new(kind, -5.0, engine(), 150.0, 0.0),
        Err(ManeuverError::InvalidDeltaV(-5.0))
    );
    assert_eq!(
        Maneuver::new(kind, 5.0, engine(), 0.0, 0.0),
        Err(ManeuverError::InvalidMass(0.0))
    );
    assert!(matches!(
        Maneuver::new(kind, 5.0, engine(), 150.0, f64::NAN),
        Err(ManeuverError::InvalidStartTime(_))
    ));
}

#[test]
fn burning_the_whole_mass_is_rejected() {
    let kind = ManeuverType::Prograde;

    assert_eq!(
        Maneuver::new(kind, 3.0e6, engine(), 150.0, 0.0),
        Err(ManeuverError::PropellantExhausted {
            delta_v: 3.0e6,
            exhaust_velocity: 3000.0,
        })
    );

    // Extreme but still representable
    let heavy = Maneuver::new(kind, 3.0e5, engine(), 150.0, 0.0).unwrap();
    assert!(heavy.final_mass() > 0.0);
    assert!(heavy.duration() > 0.0);
}

#[test]
fn rocket_equation_sizes_the_burn() {
    let burn = big_burn(100.0);

    assert_relative_eq!(burn.final_mass(), 150.0 * (-2.0f64 / 3.0).exp());
    assert_relative_eq!(burn.final_mass(), 77.0125678548888, max_relative = 1e-12);
    assert_relative_eq!(burn.duration(), 10.94811482176668, max_relative = 1e-12);
    assert_relative_eq!(
        burn.expended_mass(),
        burn.duration() * engine().flow_rate(),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        burn.mass_fraction(),
        1.0 - (-2.0f64 / 3.0).exp(),
        max_relative = 1e-12
    );

    assert_eq!(burn.start_time(), 100.0);
    assert_eq!(burn.end_time(), 100.0 + burn.duration());
    assert_eq!(burn.kind(), ManeuverType::Prograde);
    assert_eq!(burn.delta_v(), 2000.0);
    assert_eq!(burn.initial_mass(), 150.0);
    assert_eq!(burn.performance(), engine());
}

#[test]
fn mass_drops_linearly() {
    let burn = big_burn(0.0);

    assert_eq!(burn.mass_at(0.0), Ok(150.0));
    assert_relative(
        burn.mass_at(burn.duration() / 2.0).unwrap(),
        (150.0 + burn.final_mass()) / 2.0,
        1e-12,
        "mass at midpoint",
    );
    assert_relative(burn.mass_at(burn.end_time()).unwrap(), burn.final_mass(), 1e-12, "mass at end");

    let outside = burn.mass_at(-1.0);
    assert_eq!(
        outside,
        Err(ManeuverError::OutsideBurn {
            time: -1.0,
            start: 0.0,
            end: burn.end_time(),
        })
    );
    assert!(burn.mass_at(burn.end_time() + 1.0).is_err());
}

#[test]
fn thrust_acceleration_follows_mass() {
    let burn = big_burn(0.0);
    let r = Vector3::new(7.0e6, 0.0, 0.0);
    let v = Vector3::new(0.0, 7500.0, 0.0);

    let start = burn.thrust_acceleration(0.0, r, v).unwrap();
    assert_vec3_within(start, Vector3::new(0.0, 20000.0 / 150.0, 0.0), 1e-12, "initial");

    let end = burn.thrust_acceleration(burn.end_time(), r, v).unwrap();
    assert_relative(end.length(), 20000.0 / burn.final_mass(), 1e-12, "final");

    assert!(burn.thrust_acceleration(burn.end_time() + 1.0, r, v).is_err());
}

#[test]
fn windows() {
    let burn = big_burn(10.0);

    assert!(burn.contains(10.0));
    assert!(burn.contains(15.0));
    assert!(!burn.contains(burn.end_time()));
    assert!(!burn.contains(9.999));

    let touching = big_burn(burn.end_time());
    let crossing = big_burn(burn.end_time() - 1.0);
    let before = big_burn(0.0);

    assert!(!burn.overlaps(&touching));
    assert!(!touching.overlaps(&burn));
    assert!(burn.overlaps(&crossing));
    assert!(crossing.overlaps(&burn));
    assert!(burn.overlaps(&before));
    assert!(burn.overlaps(&burn));
}

#[test]
fn directions() {
    let r = Vector3::new(7.0e6, 0.0, 0.0);
    let v = Vector3::new(0.0, 7500.0, 0.0);

    let expected = [
        (ManeuverType::Prograde, Vector3::Y),
        (ManeuverType::Retrograde, Vector3::NEG_Y),
        (ManeuverType::Normal, Vector3::Z),
        (ManeuverType::AntiNormal, Vector3::NEG_Z),
        (ManeuverType::RadialOut, Vector3::X),
        (ManeuverType::RadialIn, Vector3::NEG_X),
    ];
    for (kind, direction) in expected {
        assert_almost_eq_vec3(kind.direction(r, v), direction, &kind.to_string());
    }

    for kind in ManeuverType::iter() {
        let direction = kind.direction(r * 3.0 + v, v - r);
        assert_almost_eq(direction.length(), 1.0, &kind.to_string());
    }
    assert_eq!(ManeuverType::iter().count(), 6);
}

#[test]
fn undefined_directions_are_zero() {
    let r = Vector3::new(7.0e6, 0.0, 0.0);

    assert_eq!(ManeuverType::Prograde.direction(r, Vector3::ZERO), Vector3::ZERO);
    assert_eq!(ManeuverType::Normal.direction(r, r * 2.0), Vector3::ZERO);
    assert_eq!(ManeuverType::RadialIn.direction(Vector3::ZERO, r), Vector3::ZERO);
}

#[test]
fn kinds_parse_and_print() {
    assert_eq!(ManeuverType::Prograde.to_string(), "Prograde");
    assert_eq!(ManeuverType::from_str("RadialOut"), Ok(ManeuverType::RadialOut));
    assert_eq!("AntiNormal".parse::<ManeuverType>(), Ok(ManeuverType::AntiNormal));
    assert!("Sideways".parse::<ManeuverType>().is_err());

    for kind in ManeuverType::iter() {
        assert_eq!(kind.to_string().parse::<ManeuverType>(), Ok(kind));
    }
}

#[test]
fn step_policy() {
    let integrator = BurnIntegrator::default();
    let burn = big_burn(0.0);

    assert_relative(integrator.step_size(&burn), 0.01155188517823332, 1e-12, "step size");
    assert_eq!(integrator.step_count(&burn, burn.duration()), 948);
    assert_eq!(integrator.step_count(&burn, 0.0), 0);
    assert_eq!(integrator.step_count(&burn, 1e-9), 1);

    let gentle = Maneuver::new(
        ManeuverType::Prograde,
        2.0,
        PerformanceData::new(3000.0, 200.0).unwrap(),
        150.0,
        0.0,
    )
    .unwrap();
    assert_eq!(integrator.step_size(&gentle), 1.0);
    assert_eq!(integrator.step_count(&gentle, gentle.duration()), 2);

    let capped = BurnIntegrator {
        max_steps: 10,
        ..integrator
    };
    assert_eq!(capped.step_count(&burn, burn.duration()), 10);
}

#[test]
fn integration_starts_at_ignition() {
    let integrator = BurnIntegrator::default();
    let burn = big_burn(50.0);
    let start = KinematicData {
        position: Vector3::new(7.0e6, 0.0, 0.0),
        velocity: Vector3::new(0.0, 7500.0, 0.0),
    };

    let state = integrator.propagate(3.986e14, &burn, start, 50.0).unwrap();
    assert_eq!(state.kinematics(), start);
    assert_eq!(state.mass, 150.0);
    assert_eq!(state.time, 50.0);

    assert!(matches!(
        integrator.propagate(3.986e14, &burn, start, 49.0),
        Err(ManeuverError::OutsideBurn { .. })
    ));
    assert!(integrator
        .propagate(3.986e14, &burn, start, burn.end_time() + 1.0)
        .is_err());
}

#[test]
fn free_space_burn_delivers_delta_v() {
    let integrator = BurnIntegrator::default();
    let burn = big_burn(0.0);
    let start = KinematicData {
        position: Vector3::new(1.0e9, 0.0, 0.0),
        velocity: Vector3::new(100.0, 0.0, 0.0),
    };

    // Gravity is negligible this far from such a small primary
    let end = integrator
        .propagate(1.0e-6, &burn, start, burn.end_time())
        .unwrap();

    assert_within(end.velocity.x - 100.0, 2000.0, 1e-3, "delivered delta-v");
    assert_within(end.velocity.y, 0.0, 1e-9, "cross-track velocity");
    assert_relative(end.mass, burn.final_mass(), 1e-12, "burnout mass");
    assert!(end.position.x > start.position.x + 100.0 * burn.duration());
}

#[test]
fn radial_burn_from_rest() {
    let integrator = BurnIntegrator::default();
    let burn = Maneuver::new(ManeuverType::RadialOut, 500.0, engine(), 150.0, 0.0).unwrap();
    let start = KinematicData {
        position: Vector3::new(0.0, -1.0e9, 0.0),
        velocity: Vector3::ZERO,
    };

    let end = integrator
        .propagate(1.0e-6, &burn, start, burn.end_time())
        .unwrap();

    assert_vec3_within(end.velocity, Vector3::new(0.0, -500.0, 0.0), 1e-3, "velocity");
}

#[test]
fn integration_is_deterministic() {
    let integrator = BurnIntegrator::default();
    let burn = big_burn(0.0);
    let start = KinematicData {
        position: Vector3::new(7.0e6, 0.0, 0.0),
        velocity: Vector3::new(0.0, 7500.0, 0.0),
    };

    let a = integrator.propagate(3.986e14, &burn, start, 5.0).unwrap();
    let b = integrator.propagate(3.986e14, &burn, start, 5.0).unwrap();

    assert_eq_vec3(a.position, b.position, "position");
    assert_eq_vec3(a.velocity, b.velocity, "velocity");
}
