use core::f64::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    kepler::{
        eccentric_anomaly_at_true_anomaly, mean_anomaly_at_eccentric_anomaly, solve_elliptic,
        solve_hyperbolic, true_anomaly_at_eccentric_anomaly, wrap_angle,
    },
    ConvergenceWarning, DomainError, InvalidOrbitError, KeplerSolver, KinematicData, Matrix3x2,
    Vector2, Vector3,
};

/// Orbits with `|1 - e|` below this are rejected as parabolic.
pub const PARABOLIC_TOLERANCE: f64 = 1e-9;

/// Below this relative size, angular momentum is treated as zero.
const ANGULAR_MOMENTUM_TOLERANCE: f64 = 1e-12;

/// Below this relative size, the node vector is treated as zero and the
/// orbit as equatorial.
const EQUATORIAL_TOLERANCE: f64 = 1e-12;

/// Below this eccentricity, the orbit is treated as circular and the
/// argument of periapsis as zero.
const CIRCULAR_TOLERANCE: f64 = 1e-11;

/// Whether a conic is closed or open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrbitKind {
    /// `e < 1`, including circular orbits.
    Elliptic,
    /// `e > 1`.
    Hyperbolic,
}

/// The six classical Keplerian elements.
///
/// Angles are in radians, the semi-major axis in meters.
/// The semi-major axis is negative for hyperbolic trajectories.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitalElements {
    /// Semi-major axis `a`. Negative when `eccentricity > 1`.
    pub semi_major_axis: f64,
    /// Eccentricity `e`.
    pub eccentricity: f64,
    /// Inclination `i`, in `[0, π]`.
    pub inclination: f64,
    /// Longitude of the ascending node `Ω`.
    pub long_asc_node: f64,
    /// Argument of periapsis `ω`.
    pub arg_pe: f64,
    /// True anomaly `ν` at the orbit's epoch.
    pub true_anomaly: f64,
}

/// An osculating two-body orbit around a primary with gravitational
/// parameter `mu`.
///
/// An `Orbit` is a snapshot: it describes the conic through one state
/// vector at one epoch. [`predict`][Self::predict] returns a new orbit with
/// the same shape and orientation, moved along the conic.
///
/// # Example
/// ```
/// use trajectory_sim::{Orbit, Vector3};
///
/// let mu = 3.986e14;
/// let r = Vector3::new(7.0e6, 0.0, 0.0);
/// let v = Vector3::new(0.0, (mu / 7.0e6_f64).sqrt(), 0.0);
///
/// let orbit = Orbit::from_state_vectors(mu, r, v).unwrap();
/// assert!(orbit.eccentricity() < 1e-9);
///
/// let period = orbit.period().unwrap();
/// let later = orbit.predict(period / 4.0);
/// assert!((later.position() - Vector3::new(0.0, 7.0e6, 0.0)).length() < 1e-3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Orbit {
    mu: f64,
    semi_major_axis: f64,
    eccentricity: f64,
    eccentricity_vector: Vector3,
    angular_momentum: Vector3,
    semi_latus_rectum: f64,
    inclination: f64,
    long_asc_node: f64,
    arg_pe: f64,
    true_anomaly: f64,
    epoch: f64,
    transformation_matrix: Matrix3x2,
    convergence_warning: Option<ConvergenceWarning>,
}

impl Orbit {
    /// Derives the orbit through a position and velocity.
    ///
    /// `mu` is the gravitational parameter of the primary (`G * M`), `position`
    /// is in meters relative to the primary and `velocity` in meters per second.
    /// The resulting orbit has an epoch of zero.
    ///
    /// # Errors
    /// Fails with [`InvalidOrbitError`] when `mu` is not positive, a
    /// component is not finite, the position is zero, the trajectory is
    /// radial (zero angular momentum), or the eccentricity sits on the
    /// parabolic boundary.
    pub fn from_state_vectors(
        mu: f64,
        position: Vector3,
        velocity: Vector3,
    ) -> Result<Self, InvalidOrbitError> {
        validate_mu(mu)?;
        if !position.is_finite() || !velocity.is_finite() {
            return Err(InvalidOrbitError::NonFiniteState);
        }

        let radius = position.length();
        if radius == 0.0 {
            return Err(InvalidOrbitError::ZeroPosition);
        }

        let angular_momentum = position.cross(velocity);
        let h = angular_momentum.length();
        if h <= ANGULAR_MOMENTUM_TOLERANCE * radius * velocity.length() {
            return Err(InvalidOrbitError::ZeroAngularMomentum);
        }

        let eccentricity_vector = velocity.cross(angular_momentum) / mu - position / radius;
        let eccentricity = eccentricity_vector.length();
        if (eccentricity - 1.0).abs() < PARABOLIC_TOLERANCE {
            return Err(InvalidOrbitError::Parabolic { eccentricity });
        }

        let specific_energy = 0.5 * velocity.length_squared() - mu / radius;
        let semi_major_axis = -mu / (2.0 * specific_energy);

        let inclination = (angular_momentum.z / h).clamp(-1.0, 1.0).acos();

        // n = z x h
        let node = Vector3::new(-angular_momentum.y, angular_momentum.x, 0.0);
        let node_len = node.length();
        let equatorial = node_len <= EQUATORIAL_TOLERANCE * h;
        let circular = eccentricity < CIRCULAR_TOLERANCE;
        let retrograde = angular_momentum.z < 0.0;

        let long_asc_node = if equatorial {
            0.0
        } else {
            let lan = (node.x / node_len).clamp(-1.0, 1.0).acos();
            if node.y < 0.0 {
                TAU - lan
            } else {
                lan
            }
        };

        let arg_pe = if circular {
            0.0
        } else if equatorial {
            // Longitude of periapsis, measured against the direction of motion
            let angle = eccentricity_vector.y.atan2(eccentricity_vector.x);
            wrap_angle(if retrograde { -angle } else { angle })
        } else {
            let w = (node.dot(eccentricity_vector) / (node_len * eccentricity))
                .clamp(-1.0, 1.0)
                .acos();
            if eccentricity_vector.z < 0.0 {
                TAU - w
            } else {
                w
            }
        };

        let true_anomaly = if !circular {
            let nu = (eccentricity_vector.dot(position) / (eccentricity * radius))
                .clamp(-1.0, 1.0)
                .acos();
            if position.dot(velocity) < 0.0 {
                TAU - nu
            } else {
                nu
            }
        } else if !equatorial {
            // Argument of latitude
            let u = (node.dot(position) / (node_len * radius))
                .clamp(-1.0, 1.0)
                .acos();
            if position.z < 0.0 {
                TAU - u
            } else {
                u
            }
        } else {
            // True longitude
            let angle = position.y.atan2(position.x);
            wrap_angle(if retrograde { -angle } else { angle })
        };

        Ok(Self {
            mu,
            semi_major_axis,
            eccentricity,
            eccentricity_vector,
            angular_momentum,
            semi_latus_rectum: h * h / mu,
            inclination,
            long_asc_node,
            arg_pe,
            true_anomaly: normalize_true_anomaly(true_anomaly, eccentricity),
            epoch: 0.0,
            transformation_matrix: get_transformation_matrix(inclination, arg_pe, long_asc_node),
            convergence_warning: None,
        })
    }

    /// Builds an orbit from classical elements. The epoch is zero.
    ///
    /// # Errors
    /// Fails with [`InvalidOrbitError`] when `mu` is not positive, the
    /// eccentricity is negative or parabolic, the sign of the semi-major axis
    /// does not match the regime, the inclination is outside `[0, π]`, or a
    /// hyperbolic true anomaly lies beyond the asymptotes.
    pub fn from_elements(mu: f64, elements: OrbitalElements) -> Result<Self, InvalidOrbitError> {
        validate_mu(mu)?;

        let OrbitalElements {
            semi_major_axis,
            eccentricity,
            inclination,
            long_asc_node,
            arg_pe,
            true_anomaly,
        } = elements;

        for (element, value) in [
            ("semi_major_axis", semi_major_axis),
            ("eccentricity", eccentricity),
            ("inclination", inclination),
            ("long_asc_node", long_asc_node),
            ("arg_pe", arg_pe),
            ("true_anomaly", true_anomaly),
        ] {
            if !value.is_finite() {
                return Err(InvalidOrbitError::InvalidElement { element, value });
            }
        }

        if eccentricity < 0.0 {
            return Err(InvalidOrbitError::InvalidElement {
                element: "eccentricity",
                value: eccentricity,
            });
        }
        if (eccentricity - 1.0).abs() < PARABOLIC_TOLERANCE {
            return Err(InvalidOrbitError::Parabolic { eccentricity });
        }
        let sign_matches = if eccentricity < 1.0 {
            semi_major_axis > 0.0
        } else {
            semi_major_axis < 0.0
        };
        if !sign_matches {
            return Err(InvalidOrbitError::InvalidElement {
                element: "semi_major_axis",
                value: semi_major_axis,
            });
        }
        if !(0.0..=PI).contains(&inclination) {
            return Err(InvalidOrbitError::InvalidElement {
                element: "inclination",
                value: inclination,
            });
        }
        if eccentricity > 1.0 && 1.0 + eccentricity * true_anomaly.cos() <= 0.0 {
            return Err(InvalidOrbitError::InvalidElement {
                element: "true_anomaly",
                value: true_anomaly,
            });
        }

        let long_asc_node = wrap_angle(long_asc_node);
        let arg_pe = wrap_angle(arg_pe);
        let matrix = get_transformation_matrix(inclination, arg_pe, long_asc_node);

        let semi_latus_rectum = semi_major_axis * (1.0 - eccentricity) * (1.0 + eccentricity);
        let p_hat = matrix.dot_vec(Vector2::X);
        let q_hat = matrix.dot_vec(Vector2::Y);

        Ok(Self {
            mu,
            semi_major_axis,
            eccentricity,
            eccentricity_vector: p_hat * eccentricity,
            angular_momentum: p_hat.cross(q_hat) * (mu * semi_latus_rectum).sqrt(),
            semi_latus_rectum,
            inclination,
            long_asc_node,
            arg_pe,
            true_anomaly: normalize_true_anomaly(true_anomaly, eccentricity),
            epoch: 0.0,
            transformation_matrix: matrix,
            convergence_warning: None,
        })
    }

    /// The classical elements of this orbit at its epoch.
    pub fn elements(&self) -> OrbitalElements {
        OrbitalElements {
            semi_major_axis: self.semi_major_axis,
            eccentricity: self.eccentricity,
            inclination: self.inclination,
            long_asc_node: self.long_asc_node,
            arg_pe: self.arg_pe,
            true_anomaly: self.true_anomaly,
        }
    }

    /// Gravitational parameter of the primary, in m^3 s^-2.
    #[inline]
    pub fn gravitational_parameter(&self) -> f64 {
        self.mu
    }

    /// Eccentricity `e`. Zero for circles, between 0 and 1 for ellipses and
    /// above 1 for hyperbolae.
    #[inline]
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// The eccentricity vector, pointing from the primary towards periapsis.
    #[inline]
    pub fn eccentricity_vector(&self) -> Vector3 {
        self.eccentricity_vector
    }

    /// Semi-major axis in meters. Negative for hyperbolic orbits.
    #[inline]
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Specific angular momentum `h = r × v`.
    #[inline]
    pub fn specific_angular_momentum(&self) -> Vector3 {
        self.angular_momentum
    }

    /// Specific orbital energy `-μ / 2a`.
    #[inline]
    pub fn specific_energy(&self) -> f64 {
        -self.mu / (2.0 * self.semi_major_axis)
    }

    /// Semi-latus rectum `p = |h|² / μ`, which equals `a(1 - e²)`.
    /// Stays accurate near the parabolic boundary, where `a(1 - e²)` does not.
    #[inline]
    pub fn semi_latus_rectum(&self) -> f64 {
        self.semi_latus_rectum
    }

    /// Inclination in radians, in `[0, π]`.
    #[inline]
    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    /// Longitude of the ascending node in radians.
    ///
    /// Zero for equatorial orbits, where the node line is undefined.
    #[inline]
    pub fn longitude_of_ascending_node(&self) -> f64 {
        self.long_asc_node
    }

    /// Argument of periapsis in radians.
    ///
    /// Zero for circular orbits. For equatorial orbits this is the
    /// longitude of periapsis.
    #[inline]
    pub fn argument_of_periapsis(&self) -> f64 {
        self.arg_pe
    }

    /// True anomaly at the orbit's epoch.
    ///
    /// In `[0, 2π)` for elliptic orbits and in `(-π, π]` for hyperbolic ones.
    #[inline]
    pub fn true_anomaly(&self) -> f64 {
        self.true_anomaly
    }

    /// Eccentric anomaly at the epoch, or the hyperbolic anomaly for open orbits.
    pub fn eccentric_anomaly(&self) -> f64 {
        eccentric_anomaly_at_true_anomaly(self.true_anomaly, self.eccentricity)
    }

    /// Mean anomaly at the epoch.
    pub fn mean_anomaly(&self) -> f64 {
        mean_anomaly_at_eccentric_anomaly(self.eccentric_anomaly(), self.eccentricity)
    }

    /// Mean motion `n = sqrt(μ / |a|³)`, in radians per second.
    #[inline]
    pub fn mean_motion(&self) -> f64 {
        (self.mu / self.semi_major_axis.abs().powi(3)).sqrt()
    }

    /// The time this orbit's state refers to, relative to the orbit it
    /// was first derived from.
    #[inline]
    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    /// Relabels the epoch without moving the orbiting body.
    ///
    /// Useful for anchoring an orbit derived from a state vector at an
    /// absolute time, so that `predict(t - orbit.epoch())` lands on `t`.
    pub fn with_epoch(self, epoch: f64) -> Self {
        Self { epoch, ..self }
    }

    /// Set when the Kepler solve that produced this orbit did not converge.
    #[inline]
    pub fn convergence_warning(&self) -> Option<ConvergenceWarning> {
        self.convergence_warning
    }

    /// The regime of the conic.
    #[inline]
    pub fn kind(&self) -> OrbitKind {
        if self.eccentricity < 1.0 {
            OrbitKind::Elliptic
        } else {
            OrbitKind::Hyperbolic
        }
    }

    /// Whether the orbit is closed.
    #[inline]
    pub fn is_elliptic(&self) -> bool {
        self.kind() == OrbitKind::Elliptic
    }

    /// Whether the orbit is open.
    #[inline]
    pub fn is_hyperbolic(&self) -> bool {
        self.kind() == OrbitKind::Hyperbolic
    }

    /// Distance of closest approach, `p / (1 + e)`, which equals `a(1 - e)`.
    #[inline]
    pub fn periapsis(&self) -> f64 {
        self.semi_latus_rectum / (1.0 + self.eccentricity)
    }

    /// Distance of furthest approach, `a(1 + e)`.
    ///
    /// # Errors
    /// [`DomainError::NotElliptic`] for hyperbolic orbits, which never
    /// reach an apoapsis.
    pub fn apoapsis(&self) -> Result<f64, DomainError> {
        self.require_elliptic()?;
        Ok(self.semi_major_axis * (1.0 + self.eccentricity))
    }

    /// Orbital period `2π sqrt(a³ / μ)`, in seconds.
    ///
    /// # Errors
    /// [`DomainError::NotElliptic`] for hyperbolic orbits.
    pub fn period(&self) -> Result<f64, DomainError> {
        self.require_elliptic()?;
        Ok(TAU * (self.semi_major_axis.powi(3) / self.mu).sqrt())
    }

    fn require_elliptic(&self) -> Result<(), DomainError> {
        if self.is_elliptic() {
            Ok(())
        } else {
            Err(DomainError::NotElliptic {
                eccentricity: self.eccentricity,
            })
        }
    }

    /// The rotation from the perifocal (PQW) frame into the inertial frame.
    #[inline]
    pub fn transformation_matrix(&self) -> Matrix3x2 {
        self.transformation_matrix
    }

    /// Position at the epoch, reconstructed from the elements.
    pub fn position(&self) -> Vector3 {
        self.state_vectors().position
    }

    /// Velocity at the epoch, reconstructed from the elements.
    pub fn velocity(&self) -> Vector3 {
        self.state_vectors().velocity
    }

    /// Position and velocity at the epoch, reconstructed from the elements.
    pub fn state_vectors(&self) -> KinematicData {
        self.state_vectors_at_true_anomaly(self.true_anomaly)
    }

    /// Position and velocity after `dt` seconds.
    pub fn state_vectors_at(&self, dt: f64) -> KinematicData {
        self.predict(dt).state_vectors()
    }

    fn state_vectors_at_true_anomaly(&self, true_anomaly: f64) -> KinematicData {
        let p = self.semi_latus_rectum();
        let (sin_nu, cos_nu) = true_anomaly.sin_cos();
        let radius = p / (1.0 + self.eccentricity * cos_nu);
        let speed_scale = (self.mu / p).sqrt();

        let position = Vector2::new(radius * cos_nu, radius * sin_nu);
        let velocity = Vector2::new(-speed_scale * sin_nu, speed_scale * (self.eccentricity + cos_nu));

        KinematicData {
            position: self.transformation_matrix.dot_vec(position),
            velocity: self.transformation_matrix.dot_vec(velocity),
        }
    }

    /// Advances the orbit by `dt` seconds, which may be negative.
    ///
    /// Uses the default [`KeplerSolver`]. See [`predict_with`][Self::predict_with].
    pub fn predict(&self, dt: f64) -> Self {
        self.predict_with(dt, &KeplerSolver::default())
    }

    /// Advances the orbit by `dt` seconds using the given solver settings.
    ///
    /// Shape and orientation are kept; only the true anomaly and epoch change.
    /// If the Kepler solve does not converge, the best estimate is used and
    /// the returned orbit carries a [`ConvergenceWarning`].
    pub fn predict_with(&self, dt: f64, solver: &KeplerSolver) -> Self {
        let mean_anomaly = self.mean_anomaly() + self.mean_motion() * dt;

        let solution = match self.kind() {
            OrbitKind::Elliptic => solve_elliptic(mean_anomaly, self.eccentricity, solver),
            OrbitKind::Hyperbolic => solve_hyperbolic(mean_anomaly, self.eccentricity, solver),
        };

        let warning = solution.warning();
        if let Some(warning) = warning {
            tracing::warn!(
                eccentricity = self.eccentricity,
                mean_anomaly,
                %warning,
                "using unconverged anomaly"
            );
        }

        let true_anomaly = true_anomaly_at_eccentric_anomaly(solution.anomaly, self.eccentricity);

        Self {
            true_anomaly: normalize_true_anomaly(true_anomaly, self.eccentricity),
            epoch: self.epoch + dt,
            convergence_warning: warning,
            ..*self
        }
    }
}

impl Default for Orbit {
    /// Creates a unit orbit.
    ///
    /// The unit orbit is a perfect circle of radius 1 around a primary with
    /// a gravitational parameter of 1, with no inclination.
    fn default() -> Self {
        Self {
            mu: 1.0,
            semi_major_axis: 1.0,
            eccentricity: 0.0,
            eccentricity_vector: Vector3::ZERO,
            angular_momentum: Vector3::Z,
            semi_latus_rectum: 1.0,
            inclination: 0.0,
            long_asc_node: 0.0,
            arg_pe: 0.0,
            true_anomaly: 0.0,
            epoch: 0.0,
            transformation_matrix: get_transformation_matrix(0.0, 0.0, 0.0),
            convergence_warning: None,
        }
    }
}

fn validate_mu(mu: f64) -> Result<(), InvalidOrbitError> {
    if mu.is_finite() && mu > 0.0 {
        Ok(())
    } else {
        Err(InvalidOrbitError::InvalidGravitationalParameter(mu))
    }
}

fn normalize_true_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    let wrapped = wrap_angle(true_anomaly);
    if eccentricity > 1.0 && wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

fn get_transformation_matrix(inclination: f64, arg_pe: f64, long_asc_node: f64) -> Matrix3x2 {
    let (sin_inc, cos_inc) = inclination.sin_cos();
    let (sin_arg_pe, cos_arg_pe) = arg_pe.sin_cos();
    let (sin_lan, cos_lan) = long_asc_node.sin_cos();

    // https://downloads.rene-schwarz.com/download/M001-Keplerian_Orbit_Elements_to_Cartesian_State_Vectors.pdf
    Matrix3x2 {
        e11: cos_arg_pe * cos_lan - sin_arg_pe * cos_inc * sin_lan,
        e12: -(sin_arg_pe * cos_lan + cos_arg_pe * cos_inc * sin_lan),

        e21: cos_arg_pe * sin_lan + sin_arg_pe * cos_inc * cos_lan,
        e22: cos_arg_pe * cos_inc * cos_lan - sin_arg_pe * sin_lan,

        e31: sin_arg_pe * sin_inc,
        e32: cos_arg_pe * sin_inc,
    }
}
