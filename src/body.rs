use core::fmt;

use crate::OrbitalElements;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A key into a [`BodyRegistry`][crate::BodyRegistry].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a body orbits another one.
///
/// The root of a system (e.g. the star) orbits nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrbitReference {
    /// The body sits at the origin of its system.
    #[default]
    None,
    /// The body follows these elements around
    /// [their central body][OrbitalElements::central_body].
    Orbiting(OrbitalElements),
}

impl OrbitReference {
    /// The orbital elements, if the body is orbiting something.
    pub fn elements(&self) -> Option<&OrbitalElements> {
        match self {
            OrbitReference::None => None,
            OrbitReference::Orbiting(elements) => Some(elements),
        }
    }

    /// The body being orbited, if any.
    pub fn parent(&self) -> Option<BodyId> {
        self.elements().map(OrbitalElements::central_body)
    }
}

impl From<OrbitalElements> for OrbitReference {
    fn from(value: OrbitalElements) -> Self {
        OrbitReference::Orbiting(value)
    }
}

impl From<Option<OrbitalElements>> for OrbitReference {
    fn from(value: Option<OrbitalElements>) -> Self {
        value.map_or(OrbitReference::None, OrbitReference::Orbiting)
    }
}

/// A struct representing a celestial body.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Body {
    /// The name of the celestial body.
    pub name: String,

    /// The mass of the celestial body, in kilograms.
    pub mass: f64,

    /// The radius of the celestial body, in meters.
    pub radius: f64,

    /// The orbit of the celestial body, if it is orbiting one.
    pub orbit: OrbitReference,
}

impl Body {
    /// Creates a new `Body` instance.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the celestial body.
    /// * `mass` - The mass of the celestial body, in kilograms.
    /// * `radius` - The radius of the celestial body, in meters.
    /// * `orbit` - What the body orbits, if anything.
    pub fn new(name: String, mass: f64, radius: f64, orbit: impl Into<OrbitReference>) -> Self {
        Self {
            name,
            mass,
            radius,
            orbit: orbit.into(),
        }
    }

    /// Releases the body from its orbit.
    pub fn release_from_orbit(&mut self) {
        self.orbit = OrbitReference::None;
    }
}
