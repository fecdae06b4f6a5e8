//! This module contains presets for stars.
//!
//! "A star is a luminous spheroid of plasma held together by self-gravity."  
//!
//! \- [Wikipedia](https://en.wikipedia.org/wiki/Star)

use crate::{Body, OrbitReference};

/// Returns the Sun, at the root of its system.
pub fn sol() -> Body {
    Body::new("Sol".to_string(), 1.988e30, 6.9634e8, OrbitReference::None)
}
