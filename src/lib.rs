//! # Conic Orbit Simulation
//! This library crate contains the numerical core of a two-body, "on-rails"
//! orbit simulation in two dimensions, similar to what you'd find in a game
//! like Kerbal Space Program.
//!
//! It answers three questions cheaply and repeatedly:
//! - **Propagation**: given orbital elements and a time, where is the body
//!   and how fast is it going?
//!   See [`OrbitalElements::state_vectors_at_time`].
//! - **Fitting**: given a position and velocity, what are the orbital
//!   elements? See [`StateVectors2D::to_elements`].
//! - **Conjunction analysis**: given two nearby trajectories, when and how
//!   close do they pass each other? See [`QuadraticArc::closest_approach`].
//!
//! It can also tell you the next time an orbit reaches a certain distance from
//! its parent body, see [`OrbitalElements::next_time_at_radius`].
//!
//! Elliptic and hyperbolic orbits are supported. Parabolic orbits
//! (eccentricity of exactly 1) are not; element sets built through
//! [`OrbitalElements::new`] are nudged off that value.
//!
//! ## Getting started
//! - [`OrbitalElements`]: the element set of an orbit around some body.
//! - [`StateVectors2D`]: a position and velocity at one instant.
//! - [`QuadraticArc`]: a short constant-acceleration approximation of a
//!   trajectory, used for closest-approach estimates.
//! - [`BodyRegistry`]: owns [`Body`]s and resolves the [`BodyId`] an orbit
//!   refers to into the parent's mass.
//!
//! ## Example
//!
//! ```rust
//! use conic_sim::{gravitational_parameter, BodyId, OrbitalElements};
//!
//! # fn main() {
//! let mu = gravitational_parameter(1.988e30);
//! let earth = OrbitalElements::new(1.49598e11, 0.0167, 1.745, 0.0, 0, BodyId(0));
//!
//! let period = earth.orbital_period(mu).unwrap();
//! let sv = earth.state_vectors_at_time(mu, (period / 2.0) as i64);
//!
//! let apoapsis = earth.apoapsis().unwrap();
//! assert!((sv.position.length() - apoapsis).abs() / apoapsis < 1e-3);
//! # }
//! ```

#![warn(missing_docs)]

pub mod anomaly;
mod body;
pub mod body_presets;
mod crossing;
mod elements;
mod quad_arc;
mod registry;
pub mod solvers;

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use body::{Body, BodyId, OrbitReference};
pub use elements::OrbitalElements;
pub use quad_arc::{CandidateTimes, ClosestApproach, PolynomialDegree, QuadraticArc, SeparationRate};
pub use registry::{BodyRegistry, RegistryError};
pub use solvers::{NonConvergence, Solved};

/// A point in simulation time, in whole seconds.
///
/// The range is bounded. Operations that could run past it saturate or
/// report "no such time" instead of wrapping or panicking.
pub type Time = i64;

/// The gravitational constant, in m^3 kg^-1 s^-2.
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67408e-11;

/// Gets the gravitational parameter (mu = GM) of a body of the given mass,
/// in kilograms.
#[inline]
pub fn gravitational_parameter(mass: f64) -> f64 {
    GRAVITATIONAL_CONSTANT * mass
}

/// A struct representing a position and velocity at a point in the orbit.
///
/// The position and velocity vectors are two-dimensional and expressed in
/// the parent body's inertial frame.
///
/// The position vector is in meters, while the velocity vector is in
/// meters per second.
///
/// State vectors can be used to form an orbit using
/// [`to_elements`][Self::to_elements].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateVectors2D {
    /// The 2D position at a point in the orbit, in meters.
    pub position: DVec2,
    /// The 2D velocity at a point in the orbit, in meters per second.
    pub velocity: DVec2,
}
