//! Numerical propagation through a burn.
//!
//! During a burn the spacecraft feels the primary's gravity and the engine's
//! thrust at once, which has no closed form. The state is advanced with the
//! classic fourth-order Runge-Kutta scheme on equal steps. Mass is linear in
//! time and evaluated exactly at every stage.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{KinematicData, Maneuver, ManeuverError, Vector3};

/// Step-size policy for burn integration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BurnIntegrator {
    /// Largest fraction of the current mass that may be expended in one step.
    pub max_mass_ratio_change_per_step: f64,
    /// Largest step in seconds.
    pub max_step: f64,
    /// Upper bound on steps for a single propagation. Longer burns use
    /// coarser steps rather than exceeding it.
    pub max_steps: u32,
}

impl Default for BurnIntegrator {
    fn default() -> Self {
        Self {
            max_mass_ratio_change_per_step: 0.001,
            max_step: 1.0,
            max_steps: 1_000_000,
        }
    }
}

/// Spacecraft state at some instant of a burn.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BurnState {
    /// Position relative to the primary, in meters.
    pub position: Vector3,
    /// Velocity in m/s.
    pub velocity: Vector3,
    /// Spacecraft mass in kilograms.
    pub mass: f64,
    /// Absolute time in seconds.
    pub time: f64,
}

impl BurnState {
    /// The position and velocity of this state.
    pub fn kinematics(&self) -> KinematicData {
        KinematicData {
            position: self.position,
            velocity: self.velocity,
        }
    }
}

impl BurnIntegrator {
    /// Step length in seconds for a maneuver.
    ///
    /// Sized so that no step spends more than
    /// [`max_mass_ratio_change_per_step`][Self::max_mass_ratio_change_per_step]
    /// of the lightest mass reached during the burn.
    pub fn step_size(&self, maneuver: &Maneuver) -> f64 {
        let mass_limited = self.max_mass_ratio_change_per_step * maneuver.final_mass()
            / maneuver.performance().flow_rate();
        mass_limited.min(self.max_step)
    }

    /// Number of equal steps used to cover `elapsed` seconds of a burn.
    pub fn step_count(&self, maneuver: &Maneuver, elapsed: f64) -> u32 {
        if elapsed <= 0.0 {
            return 0;
        }
        let steps = (elapsed / self.step_size(maneuver)).ceil();
        if steps.is_finite() && steps >= 1.0 {
            (steps.min(self.max_steps as f64) as u32).max(1)
        } else {
            self.max_steps.max(1)
        }
    }

    /// Advances the state at ignition to time `t` within the burn.
    ///
    /// `mu` is the primary's gravitational parameter and `start` the
    /// position and velocity at the maneuver's start time. The result
    /// depends only on its inputs, so repeated calls are bit-identical.
    ///
    /// # Errors
    /// [`ManeuverError::OutsideBurn`] when `t` is outside `[t0, t1]`.
    pub fn propagate(
        &self,
        mu: f64,
        maneuver: &Maneuver,
        start: KinematicData,
        t: f64,
    ) -> Result<BurnState, ManeuverError> {
        let mass = maneuver.mass_at(t)?;
        let elapsed = t - maneuver.start_time();
        let steps = self.step_count(maneuver, elapsed);

        let mut state = Derivative {
            position: start.position,
            velocity: start.velocity,
        };

        if steps > 0 {
            let dt = elapsed / f64::from(steps);
            for step in 0..steps {
                let since_ignition = f64::from(step) * dt;
                state = rk4_step(mu, maneuver, &state, since_ignition, dt);
            }
        }

        tracing::trace!(steps, elapsed, kind = %maneuver.kind(), "integrated burn");

        Ok(BurnState {
            position: state.position,
            velocity: state.velocity,
            mass,
            time: t,
        })
    }
}

/// A 6-element state, or its time derivative.
#[derive(Clone, Copy, Debug)]
struct Derivative {
    position: Vector3,
    velocity: Vector3,
}

impl Derivative {
    fn add_scaled(&self, k: &Derivative, factor: f64) -> Derivative {
        Derivative {
            position: self.position + k.position * factor,
            velocity: self.velocity + k.velocity * factor,
        }
    }
}

fn deriv(mu: f64, maneuver: &Maneuver, state: &Derivative, since_ignition: f64) -> Derivative {
    let r = state.position.length();
    let gravity = state.position * (-mu / (r * r * r));
    let thrust = maneuver.acceleration_with_mass(
        maneuver.mass_after(since_ignition),
        state.position,
        state.velocity,
    );

    Derivative {
        position: state.velocity,
        velocity: gravity + thrust,
    }
}

/// Perform a single RK4 step.
///
/// Returns the new state after advancing by `dt` seconds.
fn rk4_step(
    mu: f64,
    maneuver: &Maneuver,
    state: &Derivative,
    since_ignition: f64,
    dt: f64,
) -> Derivative {
    let half = dt * 0.5;
    let k1 = deriv(mu, maneuver, state, since_ignition);
    let k2 = deriv(mu, maneuver, &state.add_scaled(&k1, half), since_ignition + half);
    let k3 = deriv(mu, maneuver, &state.add_scaled(&k2, half), since_ignition + half);
    let k4 = deriv(mu, maneuver, &state.add_scaled(&k3, dt), since_ignition + dt);

    // y_{n+1} = y_n + (dt/6)(k1 + 2*k2 + 2*k3 + k4)
    let h6 = dt / 6.0;
    Derivative {
        position: state.position
            + (k1.position + 2.0 * k2.position + 2.0 * k3.position + k4.position) * h6,
        velocity: state.velocity
            + (k1.velocity + 2.0 * k2.velocity + 2.0 * k3.velocity + k4.velocity) * h6,
    }
}
