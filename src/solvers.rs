//! Newton-Raphson solvers for Kepler's equation.
//!
//! Both solvers are best-effort: they never fail. When the iteration cap is
//! hit, the current estimate is returned in a [`Solved`] with `converged`
//! set to `false`, so a simulation step can carry on with a slightly-off
//! anomaly and audit the outcome later.

use core::f64::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::anomaly::{
    mean_anomaly_at_elliptic_eccentric_anomaly, mean_anomaly_at_hyperbolic_eccentric_anomaly,
};

/// The maximum number of Newton steps taken by either solver.
pub const MAX_ITERATIONS: u32 = 15;

/// Multiplier on [`f64::EPSILON`] giving the residual tolerance.
const TOLERANCE_MULT: f64 = 1e4;

/// Below this eccentricity, the elliptic solver seeds with the mean anomaly.
/// At or above it, the seed is π.
const HIGH_ECCENTRICITY: f64 = 0.8;

/// The result of a bounded iterative solve.
///
/// `value` is always the solver's best estimate, converged or not.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solved {
    /// The best estimate.
    pub value: f64,
    /// Whether the residual tolerance was met within [`MAX_ITERATIONS`].
    pub converged: bool,
}

impl Solved {
    /// Discards the convergence information.
    #[inline]
    pub fn into_value(self) -> f64 {
        self.value
    }
}

/// An audit record of which solver variants failed to converge.
///
/// Nothing in this crate holds one of these globally. Callers running a batch
/// of solves can [`record`][Self::record] each outcome and inspect the
/// accumulated bits afterwards. Bits stay set until [`clear`][Self::clear].
///
/// # Example
/// ```
/// use conic_sim::solvers::{eccentric_anomaly_at_mean_anomaly, NonConvergence};
///
/// let mut audit = NonConvergence::default();
///
/// for i in 0..16 {
///     let mean_anomaly = i as f64 * 0.4;
///     audit.record(0.3, eccentric_anomaly_at_mean_anomaly(0.3, mean_anomaly));
/// }
///
/// assert!(audit.is_clear());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NonConvergence(u8);

impl NonConvergence {
    /// Set when the elliptic solver ran out of iterations.
    pub const ELLIPTIC: u8 = 0b01;
    /// Set when the hyperbolic solver ran out of iterations.
    pub const HYPERBOLIC: u8 = 0b10;

    /// Records the outcome of a solve made at the given eccentricity.
    pub fn record(&mut self, eccentricity: f64, solved: Solved) {
        if !solved.converged {
            self.0 |= if eccentricity < 1.0 {
                Self::ELLIPTIC
            } else {
                Self::HYPERBOLIC
            };
        }
    }

    /// The raw flag bits.
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether no failure was recorded since the last clear.
    #[inline]
    pub fn is_clear(self) -> bool {
        self.0 == 0
    }

    /// Whether the given flag bit(s) are set.
    #[inline]
    pub fn contains(self, bits: u8) -> bool {
        self.0 & bits == bits
    }

    /// Resets all bits.
    #[inline]
    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

/// Gets the eccentric anomaly (elliptic) or hyperbolic anomaly (hyperbolic)
/// at a given mean anomaly.
///
/// Dispatches on `eccentricity < 1`.
///
/// # Performance
/// This uses Newton's method and therefore is not very performant.
/// Cache the value if you can.
///
/// # Parabolic Support
/// None. Eccentricities of exactly 1 take the hyperbolic path and produce
/// non-finite values.
#[inline]
pub fn eccentric_anomaly_at_mean_anomaly(eccentricity: f64, mean_anomaly: f64) -> Solved {
    if eccentricity < 1.0 {
        elliptic_eccentric_anomaly(eccentricity, mean_anomaly)
    } else {
        hyperbolic_eccentric_anomaly(eccentricity, mean_anomaly)
    }
}

/// Solves `M = E - e sin(E)` for `E`.
///
/// The mean anomaly is first reduced into `[0, 2π)`; the whole turns taken
/// out are added back onto the result, so the returned `E` satisfies the
/// equation for the `M` that was passed in.
///
/// # Unchecked Operation
/// This function does not check that the orbit is elliptic.
///
/// # Source
/// Newton's method, seeded with `E_0 = M` below `e = 0.8` and `E_0 = π`
/// otherwise, as in Montenbruck & Pfleger,
/// "Astronomy on the Personal Computer", 4th ed.
///
/// Near-parabolic orbits close to periapsis (e.g. `e >= 0.9999` with
/// `|M| <= 1e-6`) do not settle within [`MAX_ITERATIONS`] from that seed,
/// and come back with `converged` set to `false`.
pub fn elliptic_eccentric_anomaly(eccentricity: f64, mean_anomaly: f64) -> Solved {
    let reduced = mean_anomaly.rem_euclid(TAU);
    let turns = mean_anomaly - reduced;

    let mut ecc_anom = if eccentricity < HIGH_ECCENTRICITY {
        reduced
    } else {
        PI
    };

    let tolerance = f64::EPSILON * TOLERANCE_MULT;
    let mut converged = false;

    for _ in 0..MAX_ITERATIONS {
        let f = keplers_equation(reduced, ecc_anom, eccentricity);
        ecc_anom -= f / keplers_equation_derivative(ecc_anom, eccentricity);

        if f.abs() <= tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        log::debug!(
            "elliptic Kepler solver gave up after {MAX_ITERATIONS} iterations \
            (e={eccentricity}, M={mean_anomaly}, E={ecc_anom})"
        );
    }

    Solved {
        value: ecc_anom + turns,
        converged,
    }
}

/// Solves `M = e sinh(H) - H` for `H`.
///
/// The tolerance grows with `1 + |H + M|` so it stays meaningful far out on
/// the asymptotes, where both terms are huge.
///
/// Barely-hyperbolic orbits near periapsis (e.g. `e = 1.0000001` with
/// `M` close to 0) do not settle within [`MAX_ITERATIONS`] and come back
/// with `converged` set to `false`.
///
/// # Unchecked Operation
/// This function does not check that the orbit is hyperbolic.
pub fn hyperbolic_eccentric_anomaly(eccentricity: f64, mean_anomaly: f64) -> Solved {
    let mut hyp_anom = approx_hyperbolic_eccentric_anomaly(eccentricity, mean_anomaly);
    let mut converged = false;

    for _ in 0..MAX_ITERATIONS {
        let f = hyperbolic_keplers_equation(mean_anomaly, hyp_anom, eccentricity);
        hyp_anom -= f / hyperbolic_keplers_equation_derivative(hyp_anom, eccentricity);

        let tolerance = f64::EPSILON * TOLERANCE_MULT * (1.0 + (hyp_anom + mean_anomaly).abs());

        if f.abs() <= tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        log::debug!(
            "hyperbolic Kepler solver gave up after {MAX_ITERATIONS} iterations \
            (e={eccentricity}, M={mean_anomaly}, H={hyp_anom})"
        );
    }

    Solved {
        value: hyp_anom,
        converged,
    }
}

/// Asymptotic initial guess for the hyperbolic anomaly:
/// `H_0 = sign(M) ln(2 + |M| / e + 1.8)`.
#[inline]
pub(crate) fn approx_hyperbolic_eccentric_anomaly(eccentricity: f64, mean_anomaly: f64) -> f64 {
    mean_anomaly.signum() * (2.0 + mean_anomaly.abs() / eccentricity + 1.8).ln()
}

#[inline]
pub(crate) fn keplers_equation(mean_anomaly: f64, eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    mean_anomaly_at_elliptic_eccentric_anomaly(eccentric_anomaly, eccentricity) - mean_anomaly
}

#[inline]
fn keplers_equation_derivative(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    1.0 - eccentricity * eccentric_anomaly.cos()
}

#[inline]
pub(crate) fn hyperbolic_keplers_equation(
    mean_anomaly: f64,
    hyperbolic_anomaly: f64,
    eccentricity: f64,
) -> f64 {
    mean_anomaly_at_hyperbolic_eccentric_anomaly(hyperbolic_anomaly, eccentricity) - mean_anomaly
}

#[inline]
fn hyperbolic_keplers_equation_derivative(hyperbolic_anomaly: f64, eccentricity: f64) -> f64 {
    eccentricity * hyperbolic_anomaly.cosh() - 1.0
}
