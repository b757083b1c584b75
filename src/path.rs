//! A spacecraft trajectory made of coasting arcs and powered burns.
//!
//! The first segment coasts on the orbit through the initial state. Every
//! scheduled maneuver adds a burn segment starting at its `t0` and a coast
//! segment starting at its `t1`. The state each segment starts from is
//! computed when the maneuver is scheduled, so a query only needs to
//! propagate within one segment.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Body, BodyId, BurnIntegrator, KeplerSolver, KinematicData, Maneuver, Orbit, OverlapError,
    PathError, System, Vector3,
};

/// Numerical settings of a [`FlightPath`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathConfig {
    /// Kepler solver used on coasting arcs.
    pub solver: KeplerSolver,
    /// Integrator used during burns.
    pub burn: BurnIntegrator,
}

/// The osculating orbit at a query time, with the body it is around.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitData<'a> {
    /// The orbit, with its epoch set to the query time.
    pub orbit: Orbit,
    /// The primary the orbit is around.
    pub body: &'a Body,
}

impl OrbitData<'_> {
    /// The id of the primary.
    pub fn body_id(&self) -> BodyId {
        self.body.id()
    }
}

/// What happens during and after one maneuver.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Leg {
    /// State at the maneuver's start time.
    ignition: KinematicData,
    /// Orbit from the maneuver's end time, with the epoch set to it.
    coast: Orbit,
}

enum Phase<'a> {
    Coast(&'a Orbit),
    Burn(&'a Maneuver, KinematicData),
}

/// A trajectory around the root body of a [`System`], with scheduled burns.
///
/// Queries take `&self` and never mutate the path, so a `FlightPath` can be
/// read from many threads at once. Scheduling takes `&mut self`; share the
/// path as `Arc<RwLock<FlightPath>>` when it must be modified while other
/// threads read it.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use trajectory_sim::{
///     body_presets, FlightPath, Maneuver, ManeuverType, PerformanceData, System, Vector3,
/// };
///
/// let system = Arc::new(System::new(body_presets::the_sun()));
/// let r = Vector3::new(617244712358.0, -431694791368.0, -12036457087.0);
/// let v = Vector3::new(7320.0, 11329.0, -211.0);
///
/// let mut path = FlightPath::new(system, r, v, 0.0).unwrap();
/// let engine = PerformanceData::new(3000.0, 20000.0).unwrap();
/// path.add(Maneuver::new(ManeuverType::Prograde, 100.0, engine, 150.0, 3600.0).unwrap())
///     .unwrap();
///
/// let state = path.predict(7200.0).unwrap();
/// assert!(state.velocity.length() > v.length());
/// ```
#[derive(Clone, Debug)]
pub struct FlightPath {
    system: Arc<System>,
    initial: KinematicData,
    start_time: f64,
    initial_orbit: Orbit,
    maneuvers: Vec<Maneuver>,
    legs: Vec<Leg>,
    config: PathConfig,
}

impl FlightPath {
    /// Creates a path through `position` and `velocity` at `start_time`,
    /// with default numerical settings.
    ///
    /// # Errors
    /// [`PathError::InvalidTime`] for a non-finite start time and
    /// [`PathError::InvalidOrbit`] when the state does not describe a conic
    /// around the system's root.
    pub fn new(
        system: Arc<System>,
        position: Vector3,
        velocity: Vector3,
        start_time: f64,
    ) -> Result<Self, PathError> {
        Self::with_config(system, position, velocity, start_time, PathConfig::default())
    }

    /// Like [`new`][Self::new], with explicit numerical settings.
    pub fn with_config(
        system: Arc<System>,
        position: Vector3,
        velocity: Vector3,
        start_time: f64,
        config: PathConfig,
    ) -> Result<Self, PathError> {
        if !start_time.is_finite() {
            return Err(PathError::InvalidTime(start_time));
        }

        let mu = system.root().gravitational_parameter();
        let initial_orbit =
            Orbit::from_state_vectors(mu, position, velocity)?.with_epoch(start_time);

        Ok(Self {
            system,
            initial: KinematicData { position, velocity },
            start_time,
            initial_orbit,
            maneuvers: Vec::new(),
            legs: Vec::new(),
            config,
        })
    }

    /// The system the path moves in.
    pub fn system(&self) -> &Arc<System> {
        &self.system
    }

    /// The state the path was created with.
    pub fn initial_state(&self) -> KinematicData {
        self.initial
    }

    /// The time of the initial state.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Scheduled maneuvers, sorted by start time.
    pub fn maneuvers(&self) -> &[Maneuver] {
        &self.maneuvers
    }

    /// Numerical settings.
    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    /// Number of coast and burn segments, `1 + 2 * maneuvers`.
    pub fn segment_count(&self) -> usize {
        1 + 2 * self.legs.len()
    }

    /// The orbit after the last burn, anchored at that burn's end time.
    ///
    /// Without maneuvers this is the initial orbit.
    pub fn final_orbit(&self) -> Orbit {
        self.legs
            .last()
            .map_or(self.initial_orbit, |leg| leg.coast)
    }

    /// Schedules a maneuver.
    ///
    /// On success the maneuver list stays sorted by start time and the
    /// segments from the insertion point onwards are rebuilt. On failure
    /// the path is left exactly as it was.
    ///
    /// # Errors
    /// - [`PathError::BeforeStart`] if the burn starts before the path.
    /// - [`PathError::Overlap`] if the burn window intersects a scheduled one.
    /// - [`PathError::InvalidOrbit`] if the burn ends in a degenerate state.
    pub fn add(&mut self, maneuver: Maneuver) -> Result<(), PathError> {
        if maneuver.start_time() < self.start_time {
            tracing::warn!(
                maneuver_start = maneuver.start_time(),
                path_start = self.start_time,
                "rejected maneuver scheduled before path start"
            );
            return Err(PathError::BeforeStart {
                maneuver_start: maneuver.start_time(),
                path_start: self.start_time,
            });
        }

        if let Some(existing) = self.maneuvers.iter().find(|m| m.overlaps(&maneuver)) {
            let err = OverlapError {
                existing: (existing.start_time(), existing.end_time()),
                rejected: (maneuver.start_time(), maneuver.end_time()),
            };
            tracing::warn!(%err, "rejected overlapping maneuver");
            return Err(err.into());
        }

        let index = self
            .maneuvers
            .partition_point(|m| m.start_time() <= maneuver.start_time());

        let mut maneuvers = self.maneuvers.clone();
        maneuvers.insert(index, maneuver);

        // Legs before the insertion point are unaffected
        let mut legs = self.legs[..index].to_vec();
        self.build_legs(&mut legs, &maneuvers[index..])?;

        tracing::debug!(
            kind = %maneuver.kind(),
            start = maneuver.start_time(),
            end = maneuver.end_time(),
            delta_v = maneuver.delta_v(),
            rebuilt = maneuvers.len() - index,
            "scheduled maneuver"
        );

        self.maneuvers = maneuvers;
        self.legs = legs;
        Ok(())
    }

    /// Appends one leg per maneuver, each starting from the coast the
    /// previous leg ends on.
    fn build_legs(&self, legs: &mut Vec<Leg>, maneuvers: &[Maneuver]) -> Result<(), PathError> {
        let mu = self.mu();
        let mut coast = legs.last().map_or(self.initial_orbit, |leg| leg.coast);

        for maneuver in maneuvers {
            let ignition = coast
                .predict_with(maneuver.start_time() - coast.epoch(), &self.config.solver)
                .state_vectors();
            let burnout = self
                .config
                .burn
                .propagate(mu, maneuver, ignition, maneuver.end_time())?;

            coast = Orbit::from_state_vectors(mu, burnout.position, burnout.velocity)?
                .with_epoch(maneuver.end_time());
            legs.push(Leg { ignition, coast });
        }

        Ok(())
    }

    fn mu(&self) -> f64 {
        self.system.root().gravitational_parameter()
    }

    /// Resolves which segment governs time `t`.
    ///
    /// A burn owns `[t0, t1)`; `t1` itself belongs to the following coast.
    /// Times before the path start run the initial coast backwards.
    fn phase_at(&self, t: f64) -> Result<Phase<'_>, PathError> {
        if !t.is_finite() {
            return Err(PathError::InvalidTime(t));
        }

        let started = self.maneuvers.partition_point(|m| m.start_time() <= t);
        let latest = started
            .checked_sub(1)
            .and_then(|i| self.maneuvers.iter().zip(&self.legs).nth(i));

        Ok(match latest {
            None => Phase::Coast(&self.initial_orbit),
            Some((maneuver, leg)) if t < maneuver.end_time() => Phase::Burn(maneuver, leg.ignition),
            Some((_, leg)) => Phase::Coast(&leg.coast),
        })
    }

    /// Position and velocity at absolute time `t`.
    ///
    /// If the Kepler solve on a coast does not converge, the best estimate is
    /// returned and the only report is a `tracing` warning. Use
    /// [`predict_orbit`][Self::predict_orbit] and
    /// [`Orbit::convergence_warning`] to observe it programmatically.
    ///
    /// # Errors
    /// [`PathError::InvalidTime`] for a non-finite `t`.
    pub fn predict(&self, t: f64) -> Result<KinematicData, PathError> {
        match self.phase_at(t)? {
            Phase::Coast(orbit) => Ok(orbit
                .predict_with(t - orbit.epoch(), &self.config.solver)
                .state_vectors()),
            Phase::Burn(maneuver, ignition) => Ok(self
                .config
                .burn
                .propagate(self.mu(), maneuver, ignition, t)?
                .kinematics()),
        }
    }

    /// Spacecraft mass at absolute time `t`, if `t` falls inside a burn.
    ///
    /// Outside burns the path does not track mass, since each maneuver
    /// carries its own initial mass.
    pub fn mass_at(&self, t: f64) -> Result<Option<f64>, PathError> {
        match self.phase_at(t)? {
            Phase::Coast(_) => Ok(None),
            Phase::Burn(maneuver, _) => Ok(Some(maneuver.mass_at(t)?)),
        }
    }

    /// The osculating orbit at absolute time `t`, with the root body.
    ///
    /// During a burn this is the conic the spacecraft would follow if the
    /// engine cut off at `t`.
    ///
    /// # Errors
    /// [`PathError::InvalidTime`] for a non-finite `t`, and
    /// [`PathError::InvalidOrbit`] if the instantaneous state during a burn
    /// is degenerate.
    pub fn predict_orbit(&self, t: f64) -> Result<OrbitData<'_>, PathError> {
        let orbit = match self.phase_at(t)? {
            Phase::Coast(orbit) => orbit.predict_with(t - orbit.epoch(), &self.config.solver),
            Phase::Burn(maneuver, ignition) => {
                let state = self
                    .config
                    .burn
                    .propagate(self.mu(), maneuver, ignition, t)?;
                Orbit::from_state_vectors(self.mu(), state.position, state.velocity)?
                    .with_epoch(t)
            }
        };

        Ok(OrbitData {
            orbit,
            body: self.system.root(),
        })
    }
}
