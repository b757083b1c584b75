use core::fmt;

use uuid::Uuid;

use crate::{Orbit, GRAVITATIONAL_CONSTANT};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unique, randomly generated body identifier.
///
/// Identifiers carry no ordering or creation-time meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BodyId(Uuid);

impl BodyId {
    /// Generates a fresh random id.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for BodyId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A struct representing a gravitating celestial body.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Body {
    id: BodyId,

    /// The name of the celestial body, if it has one.
    pub name: Option<String>,

    /// The gravitational parameter `G * M`, in m^3 s^-2.
    gravitational_parameter: f64,

    /// The radius of the celestial body, in meters.
    pub radius: f64,

    /// The orbit of the celestial body around its parent, if it has one.
    pub orbit: Option<Orbit>,
}

impl Body {
    /// Creates a body from its gravitational parameter and radius.
    ///
    /// The body gets a fresh random id, no name and no orbit.
    pub fn new(gravitational_parameter: f64, radius: f64) -> Self {
        Self {
            id: BodyId::new_random(),
            name: None,
            gravitational_parameter,
            radius,
            orbit: None,
        }
    }

    /// Creates a body from its mass in kilograms, using
    /// [`GRAVITATIONAL_CONSTANT`].
    pub fn from_mass(mass: f64, radius: f64) -> Self {
        Self::new(mass * GRAVITATIONAL_CONSTANT, radius)
    }

    /// Sets the name of the body.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Places the body on an orbit around its parent.
    pub fn with_orbit(mut self, orbit: Orbit) -> Self {
        self.orbit = Some(orbit);
        self
    }

    /// Overrides the randomly generated id.
    pub fn with_id(mut self, id: BodyId) -> Self {
        self.id = id;
        self
    }

    /// The unique id of this body.
    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// The gravitational parameter `G * M`, in m^3 s^-2.
    #[inline]
    pub fn gravitational_parameter(&self) -> f64 {
        self.gravitational_parameter
    }

    /// The mass in kilograms.
    #[inline]
    pub fn mass(&self) -> f64 {
        self.gravitational_parameter / GRAVITATIONAL_CONSTANT
    }

    /// Releases the body from its orbit.
    pub fn release_from_orbit(&mut self) {
        self.orbit = None;
    }

    /// Radius of the region in which this body dominates over its parent,
    /// `a * (μ / μ_parent)^0.4`.
    ///
    /// Returns `None` for bodies without an orbit, which have no parent to
    /// compete with.
    pub fn sphere_of_influence(&self, parent_mu: f64) -> Option<f64> {
        let orbit = self.orbit.as_ref()?;
        Some(orbit.semi_major_axis().abs() * (self.gravitational_parameter / parent_mu).powf(0.4))
    }
}
