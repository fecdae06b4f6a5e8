//! Closed-form conversions between the mean, eccentric and true anomalies.
//!
//! None of these functions iterate; the only numerical inversion in the
//! crate (mean anomaly to eccentric anomaly) lives in [`crate::solvers`].
//!
//! Every function here takes the eccentricity and picks the regime itself:
//! `e < 1` is treated as elliptic, anything else as hyperbolic. For
//! hyperbolic orbits, "eccentric anomaly" means the hyperbolic anomaly `H`.
//!
//! # Parabolic Support
//! None. An eccentricity of exactly 1 produces non-finite values; see
//! [`OrbitalElements::new`][crate::OrbitalElements::new] for how the crate
//! keeps that value out of its element sets.

/// Gets the eccentric anomaly at a given true anomaly.
///
/// Uses the half-angle relation
/// `tan(E / 2) = tan(f / 2) / sqrt((1 + e) / |1 - e|)`, then `atan`
/// (elliptic) or `atanh` (hyperbolic) of the ratio, doubled.
///
/// For elliptic orbits the result is in `(-π, π]`.
/// For hyperbolic orbits the true anomaly must lie strictly between the
/// asymptote angles, or the result is NaN.
///
/// # Example
/// ```
/// use conic_sim::anomaly::eccentric_anomaly_at_true_anomaly;
///
/// // Circular orbits have all anomalies equal
/// let e = eccentric_anomaly_at_true_anomaly(1.2, 0.0);
/// assert!((e - 1.2).abs() < 1e-12);
/// ```
pub fn eccentric_anomaly_at_true_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    let ratio = (true_anomaly * 0.5).tan()
        / ((1.0 + eccentricity) / (1.0 - eccentricity).abs()).sqrt();

    if eccentricity < 1.0 {
        2.0 * ratio.atan()
    } else {
        2.0 * ratio.atanh()
    }
}

/// Gets the true anomaly at a given eccentric (or hyperbolic) anomaly.
///
/// Computed with `atan2` of the scaled half-angle terms instead of a
/// single-argument inverse, so the quadrant is kept over the whole range:
///
/// - elliptic: `f = 2 atan2(sqrt(1 + e) sin(E / 2), sqrt(1 - e) cos(E / 2))`
/// - hyperbolic: `f = 2 atan2(sqrt(e + 1) sinh(H / 2), sqrt(e - 1) cosh(H / 2))`
///
/// The result is in `(-π, π]` and does not keep the whole turns of `E`.
pub fn true_anomaly_at_eccentric_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = eccentric_anomaly * 0.5;
    let y_mult = (1.0 + eccentricity).sqrt();
    let x_mult = (1.0 - eccentricity).abs().sqrt();

    let (y, x) = if eccentricity < 1.0 {
        let (sin, cos) = half.sin_cos();
        (y_mult * sin, x_mult * cos)
    } else {
        (y_mult * half.sinh(), x_mult * half.cosh())
    };

    2.0 * y.atan2(x)
}

/// Gets the mean anomaly at a given eccentric (or hyperbolic) anomaly.
///
/// This is the forward map of Kepler's equation and needs no iteration.
#[inline]
pub fn mean_anomaly_at_eccentric_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    if eccentricity < 1.0 {
        mean_anomaly_at_elliptic_eccentric_anomaly(eccentric_anomaly, eccentricity)
    } else {
        mean_anomaly_at_hyperbolic_eccentric_anomaly(eccentric_anomaly, eccentricity)
    }
}

/// `M = E - e sin(E)`
#[inline]
pub fn mean_anomaly_at_elliptic_eccentric_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - eccentricity * eccentric_anomaly.sin()
}

/// `M = e sinh(H) - H`
#[inline]
pub fn mean_anomaly_at_hyperbolic_eccentric_anomaly(
    hyperbolic_anomaly: f64,
    eccentricity: f64,
) -> f64 {
    eccentricity * hyperbolic_anomaly.sinh() - hyperbolic_anomaly
}

/// Gets the mean anomaly at a given true anomaly.
///
/// Shorthand for going through the eccentric anomaly.
pub fn mean_anomaly_at_true_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    mean_anomaly_at_eccentric_anomaly(
        eccentric_anomaly_at_true_anomaly(true_anomaly, eccentricity),
        eccentricity,
    )
}
