//! Preset celestial bodies for setting up a [`System`][crate::System].
//!
//! ```
//! use trajectory_sim::{body_presets, System};
//!
//! let sun = body_presets::the_sun();
//! let sun_mu = sun.gravitational_parameter();
//! let mut system = System::new(sun);
//! let root = system.root_id();
//! system.add_body(body_presets::earth(sun_mu).unwrap(), root).unwrap();
//! assert_eq!(system.len(), 2);
//! ```

mod planets;
mod stars;

pub use planets::earth;
pub use stars::{the_sun, SOLAR_MASS};
