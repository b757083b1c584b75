//! Propulsion and scheduled burns.
//!
//! A [`Maneuver`] is described by the velocity change it should deliver.
//! The rocket equation turns that into a burn duration for the given
//! [`PerformanceData`] and initial mass:
//!
//! ```text
//! m1 = m0 * exp(-Δv / ve)
//! duration = (m0 - m1) / flow_rate
//! ```

use strum_macros::{Display, EnumIter, EnumString};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{unit_or_zero, ManeuverError, Vector3};

/// Engine performance: exhaust velocity and thrust.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PerformanceData {
    exhaust_velocity: f64,
    thrust: f64,
}

impl PerformanceData {
    /// Creates engine performance data.
    ///
    /// `exhaust_velocity` is in m/s and `thrust` in newtons.
    ///
    /// # Errors
    /// Both values must be finite and strictly positive.
    ///
    /// # Example
    /// ```
    /// use trajectory_sim::PerformanceData;
    ///
    /// let engine = PerformanceData::new(1000.0, 100000.0).unwrap();
    /// assert_eq!(engine.flow_rate(), 100.0);
    /// ```
    pub fn new(exhaust_velocity: f64, thrust: f64) -> Result<Self, ManeuverError> {
        if !(exhaust_velocity.is_finite() && exhaust_velocity > 0.0) {
            return Err(ManeuverError::InvalidExhaustVelocity(exhaust_velocity));
        }
        if !(thrust.is_finite() && thrust > 0.0) {
            return Err(ManeuverError::InvalidThrust(thrust));
        }

        Ok(Self {
            exhaust_velocity,
            thrust,
        })
    }

    /// Exhaust velocity in m/s.
    #[inline]
    pub fn exhaust_velocity(&self) -> f64 {
        self.exhaust_velocity
    }

    /// Thrust in newtons.
    #[inline]
    pub fn thrust(&self) -> f64 {
        self.thrust
    }

    /// Propellant mass consumed per second, `thrust / ve`.
    #[inline]
    pub fn flow_rate(&self) -> f64 {
        self.thrust / self.exhaust_velocity
    }
}

/// Thrust direction of a burn, relative to the instantaneous orbital frame.
///
/// The direction is re-resolved from the current position and velocity at
/// every integration stage, so a prograde burn follows the velocity vector
/// as it turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ManeuverType {
    /// Along the velocity.
    Prograde,
    /// Against the velocity.
    Retrograde,
    /// Along the orbit normal `r × v`.
    Normal,
    /// Against the orbit normal.
    AntiNormal,
    /// Away from the primary.
    RadialOut,
    /// Towards the primary.
    RadialIn,
}

impl ManeuverType {
    /// Unit thrust direction for the given state.
    ///
    /// Returns the zero vector when the reference direction is undefined,
    /// e.g. a prograde burn at zero velocity.
    pub fn direction(&self, position: Vector3, velocity: Vector3) -> Vector3 {
        match self {
            Self::Prograde => unit_or_zero(velocity),
            Self::Retrograde => -unit_or_zero(velocity),
            Self::Normal => unit_or_zero(position.cross(velocity)),
            Self::AntiNormal => -unit_or_zero(position.cross(velocity)),
            Self::RadialOut => unit_or_zero(position),
            Self::RadialIn => -unit_or_zero(position),
        }
    }
}

/// A scheduled burn.
///
/// Mass decreases linearly from `initial_mass` at the start time to
/// [`final_mass`][Self::final_mass] at the [`end_time`][Self::end_time].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Maneuver {
    kind: ManeuverType,
    delta_v: f64,
    performance: PerformanceData,
    initial_mass: f64,
    start_time: f64,
    final_mass: f64,
    end_time: f64,
}

impl Maneuver {
    /// Schedules a burn.
    ///
    /// # Errors
    /// `delta_v` and `initial_mass` must be finite and strictly positive,
    /// and `start_time` finite. Fails with
    /// [`ManeuverError::PropellantExhausted`] when the final mass underflows.
    ///
    /// # Example
    /// ```
    /// use trajectory_sim::{Maneuver, ManeuverType, PerformanceData};
    ///
    /// let engine = PerformanceData::new(3000.0, 20000.0).unwrap();
    /// let burn = Maneuver::new(ManeuverType::Prograde, 2000.0, engine, 150.0, 10.0).unwrap();
    ///
    /// assert!(burn.final_mass() < 150.0);
    /// assert!(burn.end_time() > burn.start_time());
    /// ```
    pub fn new(
        kind: ManeuverType,
        delta_v: f64,
        performance: PerformanceData,
        initial_mass: f64,
        start_time: f64,
    ) -> Result<Self, ManeuverError> {
        if !(delta_v.is_finite() && delta_v > 0.0) {
            return Err(ManeuverError::InvalidDeltaV(delta_v));
        }
        if !(initial_mass.is_finite() && initial_mass > 0.0) {
            return Err(ManeuverError::InvalidMass(initial_mass));
        }
        if !start_time.is_finite() {
            return Err(ManeuverError::InvalidStartTime(start_time));
        }

        let final_mass = initial_mass * (-delta_v / performance.exhaust_velocity()).exp();
        if !final_mass.is_normal() {
            return Err(ManeuverError::PropellantExhausted {
                delta_v,
                exhaust_velocity: performance.exhaust_velocity(),
            });
        }
        let duration = (initial_mass - final_mass) / performance.flow_rate();

        Ok(Self {
            kind,
            delta_v,
            performance,
            initial_mass,
            start_time,
            final_mass,
            end_time: start_time + duration,
        })
    }

    /// Thrust direction policy.
    #[inline]
    pub fn kind(&self) -> ManeuverType {
        self.kind
    }

    /// Target velocity change in m/s.
    #[inline]
    pub fn delta_v(&self) -> f64 {
        self.delta_v
    }

    /// Engine performance.
    #[inline]
    pub fn performance(&self) -> PerformanceData {
        self.performance
    }

    /// Mass at burn start, in kilograms.
    #[inline]
    pub fn initial_mass(&self) -> f64 {
        self.initial_mass
    }

    /// Mass at burn end, `m0 * exp(-Δv / ve)`.
    #[inline]
    pub fn final_mass(&self) -> f64 {
        self.final_mass
    }

    /// Fraction of the initial mass expended, `1 - exp(-Δv / ve)`.
    pub fn mass_fraction(&self) -> f64 {
        1.0 - self.final_mass / self.initial_mass
    }

    /// Propellant mass expended over the burn.
    pub fn expended_mass(&self) -> f64 {
        self.initial_mass - self.final_mass
    }

    /// `t0`.
    #[inline]
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// `t1`.
    #[inline]
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Burn length in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Whether `t` falls inside the burn, `t0 <= t < t1`.
    pub fn contains(&self, t: f64) -> bool {
        self.start_time <= t && t < self.end_time
    }

    /// Whether the burn windows of two maneuvers intersect.
    ///
    /// Windows that only touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &Maneuver) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    /// Mass at time `t` inside `[t0, t1]`.
    ///
    /// # Errors
    /// [`ManeuverError::OutsideBurn`] when `t` is outside the burn window.
    pub fn mass_at(&self, t: f64) -> Result<f64, ManeuverError> {
        if !(self.start_time..=self.end_time).contains(&t) {
            return Err(ManeuverError::OutsideBurn {
                time: t,
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(self.mass_after(t - self.start_time))
    }

    /// Mass `elapsed` seconds after ignition, clamped to the final mass.
    pub(crate) fn mass_after(&self, elapsed: f64) -> f64 {
        (self.initial_mass - self.performance.flow_rate() * elapsed).max(self.final_mass)
    }

    /// Thrust acceleration at time `t` for the given state.
    ///
    /// # Errors
    /// [`ManeuverError::OutsideBurn`] when `t` is outside the burn window.
    pub fn thrust_acceleration(
        &self,
        t: f64,
        position: Vector3,
        velocity: Vector3,
    ) -> Result<Vector3, ManeuverError> {
        let mass = self.mass_at(t)?;
        Ok(self.acceleration_with_mass(mass, position, velocity))
    }

    pub(crate) fn acceleration_with_mass(
        &self,
        mass: f64,
        position: Vector3,
        velocity: Vector3,
    ) -> Vector3 {
        self.kind.direction(position, velocity) * (self.performance.thrust() / mass)
    }
}
