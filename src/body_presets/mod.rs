//! This module contains preset celestial bodies, taken from the Sun-Earth-Moon
//! system.
//!
//! Each preset that can orbit something takes the [`BodyId`][crate::BodyId]
//! of its parent.
//! The element sets use epoch 0.
//!
//! # Example
//! ```
//! use conic_sim::{body_presets, BodyRegistry};
//!
//! let mut registry = BodyRegistry::default();
//!
//! let sol = registry.add_body(body_presets::stars::sol()).unwrap();
//! let terra = registry.add_body(body_presets::planets::terra(sol)).unwrap();
//! let luna = registry.add_body(body_presets::moons::luna(terra)).unwrap();
//!
//! assert!(registry.absolute_position_of(luna, 0).is_ok());
//! ```

pub mod moons;
pub mod planets;
pub mod stars;
