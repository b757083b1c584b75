//! This module contains presets for stars.
//!
//! "A star is a luminous spheroid of plasma held together by self-gravity."  
//!
//! \- [Wikipedia](https://en.wikipedia.org/wiki/Star)

use crate::Body;

/// Mass of the Sun in kilograms.
pub const SOLAR_MASS: f64 = 1.98891691172467e30;

/// Returns the Sun, with no orbit.
pub fn the_sun() -> Body {
    Body::from_mass(SOLAR_MASS, 6.9634e8).with_name("The Sun")
}
