use core::fmt;
use std::collections::HashMap;

use glam::DVec2;
use thiserror::Error;

use crate::{
    Body, BodyId, ClosestApproach, OrbitReference, OrbitalElements, StateVectors2D, Time,
    GRAVITATIONAL_CONSTANT,
};

/// Errors from looking up or modifying bodies in a [`BodyRegistry`].
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The body's orbit refers to a parent that isn't registered.
    #[error("there is no parent body with id {0}")]
    ParentNotFound(BodyId),
    /// No body has this id.
    #[error("there is no body with id {0}")]
    BodyNotFound(BodyId),
    /// The body doesn't orbit anything.
    #[error("body {0} is not orbiting anything")]
    NotOrbiting(BodyId),
    /// A pairwise query needs both bodies to orbit the same parent.
    #[error("bodies {0} and {1} do not orbit the same parent")]
    DifferentParents(BodyId, BodyId),
}

/// Owns the celestial bodies of a simulation and resolves the [`BodyId`]s
/// that orbits refer to.
///
/// Orbits only store the id of the body they go around. Anything that needs
/// the parent's gravitational parameter goes through the registry.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyRegistry {
    bodies: HashMap<BodyId, Body>,

    /// The next ID to assign to a body.
    next_id: u64,

    /// The gravitational constant, in m^3 kg^-1 s^-2.
    pub g: f64,
}

impl BodyRegistry {
    /// Creates an empty registry.
    ///
    /// `g` defaults to [`GRAVITATIONAL_CONSTANT`].
    pub fn new(g: Option<f64>) -> BodyRegistry {
        BodyRegistry {
            bodies: HashMap::new(),
            next_id: 0,
            g: g.unwrap_or(GRAVITATIONAL_CONSTANT),
        }
    }

    /// The id the next call to [`add_body`][Self::add_body] will hand out.
    ///
    /// Useful for building element sets that refer to a body before it's
    /// added.
    pub fn next_id(&self) -> BodyId {
        BodyId(self.next_id)
    }

    /// Adds a body to the registry.
    ///
    /// If the body orbits something, its central body must already be
    /// registered.
    ///
    /// Returns: The id of the newly-added body.
    pub fn add_body(&mut self, body: Body) -> Result<BodyId, RegistryError> {
        if let Some(parent) = body.orbit.parent() {
            if !self.bodies.contains_key(&parent) {
                return Err(RegistryError::ParentNotFound(parent));
            }
        }

        let id = BodyId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        log::debug!("registered {} as {id}", body.name);
        self.bodies.insert(id, body);

        Ok(id)
    }

    /// Removes a body from the registry, along with everything orbiting it.
    ///
    /// Returns: A Vec of all bodies that were removed, including the one
    /// specified. An empty Vec is returned if the body was not found.
    pub fn remove_body(&mut self, id: BodyId) -> Vec<Body> {
        let body = match self.bodies.remove(&id) {
            Some(body) => body,
            None => return Vec::new(),
        };

        log::debug!("removed {} ({id})", body.name);

        let mut removed = vec![body];

        for satellite in self.satellites_of(id) {
            removed.append(&mut self.remove_body(satellite));
        }

        removed
    }

    /// Gets the body with the given id.
    pub fn lookup(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// Iterates over all bodies, in no particular order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter().map(|(&id, body)| (id, body))
    }

    /// The number of registered bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether there are no registered bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Gets the id of a body with a given name.
    pub fn find_by_name(&self, name: &str) -> Option<BodyId> {
        self.bodies
            .iter()
            .find(|(_, body)| body.name == name)
            .map(|(&id, _)| id)
    }

    /// The ids of the bodies directly orbiting `id`, in ascending order.
    pub fn satellites_of(&self, id: BodyId) -> Vec<BodyId> {
        let mut satellites: Vec<BodyId> = self
            .bodies
            .iter()
            .filter(|(_, body)| body.orbit.parent() == Some(id))
            .map(|(&satellite, _)| satellite)
            .collect();
        satellites.sort_unstable();
        satellites
    }

    /// The gravitational parameter (mu = GM) of a body.
    pub fn gravitational_parameter_of(&self, id: BodyId) -> Result<f64, RegistryError> {
        self.lookup(id)
            .map(|body| self.g * body.mass)
            .ok_or(RegistryError::BodyNotFound(id))
    }

    /// The orbital elements of a body and the gravitational parameter of
    /// the body it orbits.
    pub fn orbit_of(&self, id: BodyId) -> Result<(&OrbitalElements, f64), RegistryError> {
        let body = self.lookup(id).ok_or(RegistryError::BodyNotFound(id))?;
        let elements = body
            .orbit
            .elements()
            .ok_or(RegistryError::NotOrbiting(id))?;
        let parent = elements.central_body();
        let mu = self
            .gravitational_parameter_of(parent)
            .map_err(|_| RegistryError::ParentNotFound(parent))?;

        Ok((elements, mu))
    }

    /// The position and velocity of a body relative to its parent.
    pub fn state_vectors_of(&self, id: BodyId, time: Time) -> Result<StateVectors2D, RegistryError> {
        let (elements, mu) = self.orbit_of(id)?;
        Ok(elements.state_vectors_at_time(mu, time))
    }

    /// The position of a body relative to the root of its system, in meters.
    ///
    /// Bodies that orbit nothing are at the origin.
    pub fn absolute_position_of(&self, id: BodyId, time: Time) -> Result<DVec2, RegistryError> {
        let mut position = DVec2::ZERO;
        let mut current = id;

        loop {
            let body = self
                .lookup(current)
                .ok_or(RegistryError::BodyNotFound(current))?;

            match body.orbit {
                OrbitReference::None => return Ok(position),
                OrbitReference::Orbiting(_) => {
                    let (elements, mu) = self.orbit_of(current)?;
                    position += elements.position_at_time(mu, time);
                    current = elements.central_body();
                }
            }
        }
    }

    /// Replaces a body's orbit with one fitted to new state vectors, e.g.
    /// after a burn. The parent body stays the same.
    pub fn refit_orbit(
        &mut self,
        id: BodyId,
        state_vectors: StateVectors2D,
        time: Time,
    ) -> Result<OrbitalElements, RegistryError> {
        let (elements, mu) = self.orbit_of(id)?;
        let refitted = state_vectors.to_elements(mu, time, elements.central_body());

        if let Some(body) = self.bodies.get_mut(&id) {
            body.orbit = OrbitReference::Orbiting(refitted);
        }

        Ok(refitted)
    }

    /// The next time after `time` at which a body is `distance` meters away
    /// from its parent. See [`OrbitalElements::next_time_at_radius`].
    pub fn next_time_at_radius(
        &self,
        id: BodyId,
        time: Time,
        distance: f64,
    ) -> Result<Option<Time>, RegistryError> {
        let (elements, mu) = self.orbit_of(id)?;
        Ok(elements.next_time_at_radius(mu, time, distance))
    }

    /// Estimates the closest approach between two bodies orbiting the same
    /// parent, within `window` seconds after `start`.
    ///
    /// Each trajectory is approximated by one
    /// [`QuadraticArc`][crate::QuadraticArc] over the whole window, so the
    /// window should be short compared to both orbital periods.
    pub fn closest_approach(
        &self,
        a: BodyId,
        b: BodyId,
        start: Time,
        window: Time,
    ) -> Result<ClosestApproach, RegistryError> {
        let (elements_a, mu) = self.orbit_of(a)?;
        let (elements_b, _) = self.orbit_of(b)?;

        if elements_a.central_body() != elements_b.central_body() {
            return Err(RegistryError::DifferentParents(a, b));
        }

        let arc_a = elements_a.quadratic_arc(mu, start, window);
        let arc_b = elements_b.quadratic_arc(mu, start, window);

        Ok(arc_a.closest_approach(&arc_b, window as f64))
    }
}

impl Default for BodyRegistry {
    fn default() -> Self {
        BodyRegistry::new(None)
    }
}

impl fmt::Display for BodyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Registry with {} bodies", self.bodies.len())
    }
}
