//! This module contains presets for planets.

use crate::{Body, BodyId, OrbitalElements};

/// Returns the Earth.
///
/// `parent`: the id of the Sun.
pub fn terra(parent: BodyId) -> Body {
    let orbit = OrbitalElements::new(1.49598e11, 0.0167, 100_f64.to_radians(), 0.0, 0, parent);

    Body::new("Terra".to_string(), 5.97237e24, 6.371e6, orbit)
}
