//! This module contains presets for natural satellites.

use core::f64::consts::{PI, TAU};

use crate::{Body, BodyId, OrbitalElements};

/// Returns the Moon.
///
/// `parent`: the id of the Earth.
pub fn luna(parent: BodyId) -> Body {
    let orbit = OrbitalElements::new(3.84399e8, 0.0549, PI / 3.0, TAU / 3.0, 0, parent);

    Body::new("Luna".to_string(), 7.342e22, 1.737e6, orbit)
}
