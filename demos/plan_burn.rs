//! Plans a burn on a heliocentric transfer orbit and prints the trajectory.
//!
//! Usage: `cargo run --example plan_burn -- [KIND] [DELTA_V]`, e.g.
//! `cargo run --example plan_burn -- Retrograde 500 --thrust 5000`.
//! Set `RUST_LOG=trajectory_sim=trace` to see every burn integration.

use std::{error::Error, io::Write, sync::Arc};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trajectory_sim::{
    body_presets, FlightPath, Maneuver, ManeuverType, PerformanceData, System, Vector3,
};

const SAMPLES: usize = 24;

#[derive(Parser)]
#[command(about = "Plans a single burn on a heliocentric orbit")]
struct Cli {
    /// Burn direction: Prograde, Retrograde, Normal, AntiNormal, RadialOut or RadialIn
    #[arg(default_value_t = ManeuverType::Prograde)]
    kind: ManeuverType,

    /// Delta-v in m/s
    #[arg(default_value_t = 2000.0)]
    delta_v: f64,

    /// Engine exhaust velocity in m/s
    #[arg(long, default_value_t = 3000.0)]
    exhaust_velocity: f64,

    /// Engine thrust in N
    #[arg(long, default_value_t = 20000.0)]
    thrust: f64,

    /// Spacecraft mass at ignition in kg
    #[arg(long, default_value_t = 150.0)]
    mass: f64,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "trajectory_sim=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let Cli {
        kind,
        delta_v,
        exhaust_velocity,
        thrust,
        mass,
    } = Cli::parse();

    let sun = body_presets::the_sun();
    let sun_mu = sun.gravitational_parameter();
    let mut system = System::new(sun);
    let root = system.root_id();
    let earth = system.add_body(body_presets::earth(sun_mu)?, root)?;
    let system = Arc::new(system);

    let position = Vector3::new(617244712358.0, -431694791368.0, -12036457087.0);
    let velocity = Vector3::new(7320.0, 11329.0, -211.0);
    let mut path = FlightPath::new(system.clone(), position, velocity, 0.0)?;

    let period = path.predict_orbit(0.0)?.orbit.period()?;
    let engine = PerformanceData::new(exhaust_velocity, thrust)?;
    let burn = Maneuver::new(kind, delta_v, engine, mass, period / 2.0)?;
    path.add(burn)?;

    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "{kind} burn of {delta_v} m/s from t={:.0} s to t={:.1} s, {:.2} kg of propellant",
        burn.start_time(),
        burn.end_time(),
        burn.expended_mass(),
    )?;

    let before = path.predict_orbit(burn.start_time())?.orbit;
    let after = path.final_orbit();
    for (label, orbit) in [("before", before), ("after", after)] {
        writeln!(
            out,
            "{label:>6}: a={:.4e} m e={:.6} i={:.6} rad periapsis={:.4e} m",
            orbit.semi_major_axis(),
            orbit.eccentricity(),
            orbit.inclination(),
            orbit.periapsis(),
        )?;
    }

    writeln!(out, "{:>14} {:>14} {:>12} {:>8}", "t [s]", "r [m]", "v [m/s]", "primary")?;
    for i in 0..SAMPLES {
        let t = period * 1.5 * i as f64 / (SAMPLES - 1) as f64;
        let state = path.predict(t)?;
        let primary = system.find_primary(state.position, t);
        let primary = if primary.id() == earth { "Earth" } else { "Sun" };
        writeln!(
            out,
            "{t:>14.0} {:>14.4e} {:>12.2} {primary:>8}",
            state.position.length(),
            state.velocity.length(),
        )?;
    }

    Ok(())
}
