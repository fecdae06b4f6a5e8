use glam::DVec2;
use roots::{find_roots_cubic_normalized, find_roots_quadratic};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::StateVectors2D;

/// Leading coefficients smaller than this (in absolute value) are treated as
/// zero, dropping the separation-rate polynomial to a lower degree.
pub const DEGENERACY_THRESHOLD: f64 = 1e-8;

/// A short stretch of trajectory approximated as constant-acceleration
/// motion:
///
/// `p(t) = p0 + v0 t + a t^2 / 2`
///
/// `t` is measured in seconds from the arc's anchor instant.
///
/// Doing many Kepler solves per conjunction check is expensive, so a
/// trajectory is cut into windows and each window gets one of these.
/// The approximation is only good near the anchor; picking a window short
/// enough is up to the caller. For the best accuracy, use the true two-body
/// acceleration at the middle of the window (see
/// [`OrbitalElements::quadratic_arc`][crate::OrbitalElements::quadratic_arc]).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuadraticArc {
    /// The position and velocity at the anchor instant.
    pub initial: StateVectors2D,
    /// The acceleration, held constant over the arc.
    pub acceleration: DVec2,
}

/// The outcome of a [closest-approach search][QuadraticArc::closest_approach].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClosestApproach {
    /// Seconds after the anchor instant at which the separation is smallest.
    pub time: f64,
    /// The squared separation at that time, in square meters.
    pub distance_squared: f64,
}

impl ClosestApproach {
    /// The separation at the time of closest approach, in meters.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance_squared.sqrt()
    }
}

/// How many terms of the separation-rate polynomial survive the
/// [`DEGENERACY_THRESHOLD`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolynomialDegree {
    /// Relative acceleration is significant.
    Cubic,
    /// Relative acceleration is negligible.
    Quadratic,
    /// Relative motion is close to uniform. If the relative velocity is
    /// negligible too, there is no stationary point and only the window ends
    /// are candidates.
    Linear,
}

/// The derivative of the squared separation between two arcs,
/// `a t^3 + b t^2 + c t + d`.
///
/// With `dp`, `dv`, `da` the differences in position, velocity and
/// acceleration at the anchor instant:
/// - `a = |da|^2`
/// - `b = 3 da.dv`
/// - `c = 2 (|dv|^2 + da.dp)`
/// - `d = 2 dp.dv`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeparationRate {
    /// Cubic coefficient.
    pub a: f64,
    /// Quadratic coefficient.
    pub b: f64,
    /// Linear coefficient.
    pub c: f64,
    /// Constant coefficient.
    pub d: f64,
}

impl SeparationRate {
    /// Builds the polynomial for two arcs sharing an anchor instant.
    pub fn between(this: &QuadraticArc, other: &QuadraticArc) -> Self {
        let dp = this.initial.position - other.initial.position;
        let dv = this.initial.velocity - other.initial.velocity;
        let da = this.acceleration - other.acceleration;

        Self {
            a: da.length_squared(),
            b: 3.0 * da.dot(dv),
            c: 2.0 * (dv.length_squared() + da.dot(dp)),
            d: 2.0 * dp.dot(dv),
        }
    }

    /// The highest-order term that is not negligible.
    pub fn degree(&self) -> PolynomialDegree {
        if self.a.abs() >= DEGENERACY_THRESHOLD {
            PolynomialDegree::Cubic
        } else if self.b.abs() >= DEGENERACY_THRESHOLD {
            PolynomialDegree::Quadratic
        } else {
            PolynomialDegree::Linear
        }
    }

    /// The real roots, i.e. the times at which the separation is stationary.
    ///
    /// Coefficients are normalized by the leading surviving term before
    /// being handed to the root finder.
    pub fn stationary_times(&self) -> CandidateTimes {
        let mut times = CandidateTimes::default();

        match self.degree() {
            PolynomialDegree::Cubic => {
                let roots = find_roots_cubic_normalized(
                    self.b / self.a,
                    self.c / self.a,
                    self.d / self.a,
                );
                times.extend(roots.as_ref());
            }
            PolynomialDegree::Quadratic => {
                let roots = find_roots_quadratic(1.0, self.c / self.b, self.d / self.b);
                times.extend(roots.as_ref());
            }
            PolynomialDegree::Linear => {
                if self.c.abs() >= DEGENERACY_THRESHOLD {
                    times.push(-self.d / self.c);
                }
            }
        }

        times
    }
}

/// A fixed-capacity list of candidate times.
///
/// A cubic has at most three real roots, and the window adds its two ends,
/// so five slots always suffice.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CandidateTimes {
    times: [f64; CandidateTimes::CAPACITY],
    len: usize,
}

impl CandidateTimes {
    /// The maximum number of candidates.
    pub const CAPACITY: usize = 5;

    /// Adds a candidate. Extra candidates beyond the capacity are dropped.
    pub fn push(&mut self, time: f64) {
        if let Some(slot) = self.times.get_mut(self.len) {
            *slot = time;
            self.len += 1;
        }
    }

    fn extend(&mut self, times: &[f64]) {
        for &time in times {
            self.push(time);
        }
    }

    /// The candidates pushed so far.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.times[..self.len]
    }

    /// The number of candidates.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no candidates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl QuadraticArc {
    /// Creates an arc from its anchor state and constant acceleration.
    pub fn new(initial: StateVectors2D, acceleration: DVec2) -> Self {
        Self {
            initial,
            acceleration,
        }
    }

    /// Creates an arc anchored at `start`, estimating the acceleration by
    /// finite difference of the velocities at the two ends of a `dt`-second
    /// window.
    ///
    /// This is the cheap estimate. It is noticeably less accurate than
    /// sampling the true acceleration at the middle of the window.
    pub fn from_state_pair(start: StateVectors2D, end: StateVectors2D, dt: f64) -> Self {
        Self {
            initial: start,
            acceleration: (end.velocity - start.velocity) / dt,
        }
    }

    /// Re-anchors the arc `dt` seconds later, keeping the acceleration.
    #[must_use]
    pub fn shifted(&self, dt: f64) -> Self {
        Self {
            initial: self.state_vectors_at(dt),
            acceleration: self.acceleration,
        }
    }

    /// The position `dt` seconds after the anchor instant.
    #[inline]
    pub fn position_at(&self, dt: f64) -> DVec2 {
        self.initial.position + dt * (self.initial.velocity + 0.5 * dt * self.acceleration)
    }

    /// The velocity `dt` seconds after the anchor instant.
    #[inline]
    pub fn velocity_at(&self, dt: f64) -> DVec2 {
        self.initial.velocity + dt * self.acceleration
    }

    /// The position and velocity `dt` seconds after the anchor instant.
    pub fn state_vectors_at(&self, dt: f64) -> StateVectors2D {
        StateVectors2D {
            position: self.position_at(dt),
            velocity: self.velocity_at(dt),
        }
    }

    /// Finds the time in `[0, tmax]` at which this arc and `other` are
    /// closest, and the squared separation at that time.
    ///
    /// Both arcs must share an anchor instant. The squared separation is a
    /// quartic in `t`; its stationary points and the two window ends are the
    /// candidates, and the one with the smallest separation wins. Ties go to
    /// the earliest candidate considered, stationary points first.
    ///
    /// This is a local estimate, only as good as the constant-acceleration
    /// approximation of both arcs over the window. A negative or non-finite
    /// `tmax` leaves `t = 0` as the only candidate.
    ///
    /// # Example
    /// ```
    /// use conic_sim::{QuadraticArc, StateVectors2D};
    /// use glam::DVec2;
    ///
    /// // Two bodies flying past each other at 1 m/s, 10 m apart sideways
    /// let a = QuadraticArc::new(
    ///     StateVectors2D {
    ///         position: DVec2::new(-5.0, 0.0),
    ///         velocity: DVec2::new(1.0, 0.0),
    ///     },
    ///     DVec2::ZERO,
    /// );
    /// let b = QuadraticArc::new(
    ///     StateVectors2D {
    ///         position: DVec2::new(0.0, 10.0),
    ///         velocity: DVec2::ZERO,
    ///     },
    ///     DVec2::ZERO,
    /// );
    ///
    /// let approach = a.closest_approach(&b, 20.0);
    ///
    /// assert!((approach.time - 5.0).abs() < 1e-9);
    /// assert!((approach.distance() - 10.0).abs() < 1e-9);
    /// ```
    pub fn closest_approach(&self, other: &QuadraticArc, tmax: f64) -> ClosestApproach {
        let tmax = if tmax.is_finite() { tmax.max(0.0) } else { 0.0 };
        let mut candidates = SeparationRate::between(self, other).stationary_times();

        candidates.push(0.0);
        if tmax > 0.0 {
            candidates.push(tmax);
        }

        let mut best = ClosestApproach {
            time: 0.0,
            distance_squared: f64::INFINITY,
        };

        for &time in candidates.as_slice() {
            // Also skips NaN roots
            if !(0.0..=tmax).contains(&time) {
                continue;
            }

            let distance_squared = self.position_at(time).distance_squared(other.position_at(time));

            if distance_squared < best.distance_squared {
                best = ClosestApproach {
                    time,
                    distance_squared,
                };
            }
        }

        best
    }
}
