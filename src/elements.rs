use core::f64::consts::{PI, TAU};
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    anomaly::{
        eccentric_anomaly_at_true_anomaly, mean_anomaly_at_eccentric_anomaly,
        true_anomaly_at_eccentric_anomaly,
    },
    solvers::{eccentric_anomaly_at_mean_anomaly, Solved},
    BodyId, QuadraticArc, StateVectors2D, Time,
};

/// The largest `f64` below 1. Used in place of a parabolic eccentricity.
const JUST_BELOW_ONE: f64 = 1.0 - f64::EPSILON * 0.5;

/// The element set of a 2D Keplerian orbit.
///
/// The fields mirror KSP savefile orbit records: semi-major axis,
/// eccentricity, argument of periapsis, mean anomaly at epoch, and the epoch
/// itself. The parent body is referred to by [`BodyId`]; its mass is looked up
/// elsewhere (see [`BodyRegistry`][crate::BodyRegistry]), so every method that
/// needs the gravitational parameter takes it as `mu`.
///
/// An element set is never edited in place. To change an orbit, build a new
/// one, usually by [fitting][StateVectors2D::to_elements] new state vectors.
///
/// # Example
/// ```
/// use conic_sim::{BodyId, OrbitalElements};
///
/// let orbit = OrbitalElements::new(
///     // Semi-major axis
///     2.0,
///
///     // Eccentricity
///     0.5,
///
///     // Argument of periapsis
///     0.0,
///
///     // Mean anomaly at epoch
///     0.0,
///
///     // Epoch
///     0,
///
///     // Parent body
///     BodyId(0),
/// );
///
/// assert_eq!(orbit.periapsis(), 1.0);
/// assert_eq!(orbit.apoapsis(), Some(3.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitalElements {
    semi_major_axis: f64,
    eccentricity: f64,
    arg_pe: f64,
    mean_anomaly: f64,
    epoch: Time,
    central_body: BodyId,
}

impl OrbitalElements {
    /// Creates a new element set.
    ///
    /// # Parameters
    /// - `semi_major_axis`: in meters. Positive for elliptic orbits, negative
    ///   for hyperbolic ones.
    /// - `eccentricity`: must not be negative. A value of exactly 1 is
    ///   replaced with the largest `f64` below 1.
    /// - `arg_pe`: the argument of periapsis, in radians.
    /// - `mean_anomaly`: the mean anomaly at `epoch`, in radians.
    /// - `epoch`: the instant `mean_anomaly` applies to, in seconds.
    /// - `central_body`: the body being orbited.
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        arg_pe: f64,
        mean_anomaly: f64,
        epoch: Time,
        central_body: BodyId,
    ) -> Self {
        Self {
            semi_major_axis,
            eccentricity: non_parabolic(eccentricity),
            arg_pe,
            mean_anomaly,
            epoch,
            central_body,
        }
    }

    /// Fits an element set to the given state vectors.
    ///
    /// See [`StateVectors2D::to_elements`].
    pub fn from_state_vectors(
        state_vectors: StateVectors2D,
        mu: f64,
        time: Time,
        central_body: BodyId,
    ) -> Self {
        let position = state_vectors.position;
        let velocity = state_vectors.velocity;
        let altitude = position.length();

        // Specific angular momentum (z component)
        let angular_momentum = position.perp_dot(velocity);

        if angular_momentum < 0.0 {
            log::debug!(
                "fitting clockwise state vectors {state_vectors:?}; \
                the direction of motion will not be kept"
            );
        }

        // v x h, with h along +z
        let v_cross_h = DVec2::new(velocity.y, -velocity.x) * angular_momentum;
        let eccentricity_vector = v_cross_h / mu - position / altitude;
        let eccentricity = eccentricity_vector.length();

        // Measured from the +x axis. For circular orbits the eccentricity
        // vector vanishes and this falls back to zero.
        let arg_pe = eccentricity_vector.y.atan2(eccentricity_vector.x);

        // Geometric angle from periapsis to the body, in (-π, π].
        // For counterclockwise motion this agrees with picking the
        // `acos` branch by the sign of the radial velocity.
        let true_anomaly = wrap_signed(position.y.atan2(position.x) - arg_pe);

        let semi_major_axis = (2.0 / altitude - velocity.length_squared() / mu).recip();

        // Use the nudged value for the anomaly conversions too
        let eccentricity = non_parabolic(eccentricity);

        let eccentric_anomaly = eccentric_anomaly_at_true_anomaly(true_anomaly, eccentricity);
        let mean_anomaly = mean_anomaly_at_eccentric_anomaly(eccentric_anomaly, eccentricity);

        let mean_anomaly = if eccentricity < 1.0 {
            mean_anomaly.rem_euclid(TAU)
        } else {
            mean_anomaly
        };

        Self::new(
            semi_major_axis,
            eccentricity,
            arg_pe.rem_euclid(TAU),
            mean_anomaly,
            time,
            central_body,
        )
    }

    /// The semi-major axis, in meters. Negative for hyperbolic orbits.
    #[inline]
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// The eccentricity. Never exactly 1.
    #[inline]
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// The argument of periapsis, in radians.
    #[inline]
    pub fn arg_pe(&self) -> f64 {
        self.arg_pe
    }

    /// The mean anomaly at [epoch][Self::epoch], in radians.
    #[inline]
    pub fn mean_anomaly_at_epoch(&self) -> f64 {
        self.mean_anomaly
    }

    /// The epoch, in seconds.
    #[inline]
    pub fn epoch(&self) -> Time {
        self.epoch
    }

    /// The body this orbit goes around.
    #[inline]
    pub fn central_body(&self) -> BodyId {
        self.central_body
    }

    /// Whether the orbit is closed (elliptic).
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.eccentricity < 1.0
    }

    /// The mean angular motion `n = sqrt(mu / |a^3|)`, in radians per second.
    #[inline]
    pub fn mean_angular_motion(&self, mu: f64) -> f64 {
        (mu / self.semi_major_axis.powi(3).abs()).sqrt()
    }

    /// The time it takes to complete one revolution, in seconds.
    ///
    /// Hyperbolic trajectories never repeat and give `None`.
    pub fn orbital_period(&self, mu: f64) -> Option<f64> {
        self.is_bound().then(|| TAU / self.mean_angular_motion(mu))
    }

    /// The distance at the closest point to the parent body, in meters.
    #[inline]
    pub fn periapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// The distance at the farthest point from the parent body, in meters.
    ///
    /// Hyperbolic trajectories have no such point and give `None`.
    pub fn apoapsis(&self) -> Option<f64> {
        self.is_bound().then(|| self.semi_major_axis * (1.0 + self.eccentricity))
    }

    /// The semi-latus rectum `a (1 - e^2)`, in meters.
    #[inline]
    pub fn semi_latus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)
    }

    /// Gets the mean anomaly at a given time.
    ///
    /// For elliptic orbits, the elapsed time is first reduced modulo the
    /// period and the result is wrapped into `[0, 2π)`.
    /// For hyperbolic orbits, the elapsed time is used as is.
    ///
    /// Elapsed time saturates at the ends of the [`Time`] range.
    pub fn mean_anomaly_at_time(&self, mu: f64, time: Time) -> f64 {
        let n = self.mean_angular_motion(mu);
        let elapsed = time.saturating_sub(self.epoch) as f64;

        if self.is_bound() {
            let elapsed = elapsed.rem_euclid(TAU / n);
            (self.mean_anomaly + n * elapsed).rem_euclid(TAU)
        } else {
            self.mean_anomaly + n * elapsed
        }
    }

    /// Gets the eccentric anomaly (or hyperbolic anomaly) at a given time.
    ///
    /// # Performance
    /// This uses numerical methods. Cache the value if you can.
    pub fn eccentric_anomaly_at_time(&self, mu: f64, time: Time) -> Solved {
        eccentric_anomaly_at_mean_anomaly(self.eccentricity, self.mean_anomaly_at_time(mu, time))
    }

    /// Gets the true anomaly at a given time, in `(-π, π]`.
    pub fn true_anomaly_at_time(&self, mu: f64, time: Time) -> f64 {
        true_anomaly_at_eccentric_anomaly(
            self.eccentric_anomaly_at_time(mu, time).value,
            self.eccentricity,
        )
    }

    /// Gets the distance from the parent body at a given time, in meters.
    pub fn altitude_at_time(&self, mu: f64, time: Time) -> f64 {
        let eccentric_anomaly = self.eccentric_anomaly_at_time(mu, time).value;
        let true_anomaly = true_anomaly_at_eccentric_anomaly(eccentric_anomaly, self.eccentricity);
        self.altitude_at_anomalies(eccentric_anomaly, true_anomaly)
    }

    fn altitude_at_anomalies(&self, eccentric_anomaly: f64, true_anomaly: f64) -> f64 {
        if self.is_bound() {
            self.semi_major_axis * (1.0 - self.eccentricity * eccentric_anomaly.cos())
        } else {
            self.semi_latus_rectum() / (1.0 + self.eccentricity * true_anomaly.cos())
        }
    }

    /// Gets the position and velocity at a given time.
    ///
    /// # Performance
    /// This solves Kepler's equation numerically. If you already know the
    /// eccentric anomaly, use
    /// [`state_vectors_at_eccentric_anomaly`][Self::state_vectors_at_eccentric_anomaly].
    ///
    /// # Example
    /// ```
    /// use conic_sim::{BodyId, OrbitalElements};
    /// use glam::DVec2;
    ///
    /// let orbit = OrbitalElements::new(1.0, 0.0, 0.0, 0.0, 0, BodyId(0));
    /// let sv = orbit.state_vectors_at_time(1.0, 0);
    ///
    /// assert!((sv.position - DVec2::new(1.0, 0.0)).length() < 1e-12);
    /// assert!((sv.velocity - DVec2::new(0.0, 1.0)).length() < 1e-12);
    /// ```
    pub fn state_vectors_at_time(&self, mu: f64, time: Time) -> StateVectors2D {
        self.state_vectors_at_eccentric_anomaly(
            mu,
            self.eccentric_anomaly_at_time(mu, time).value,
        )
    }

    /// Gets the position and velocity at a given eccentric anomaly (or
    /// hyperbolic anomaly, for hyperbolic orbits).
    pub fn state_vectors_at_eccentric_anomaly(
        &self,
        mu: f64,
        eccentric_anomaly: f64,
    ) -> StateVectors2D {
        let e = self.eccentricity;
        let true_anomaly = true_anomaly_at_eccentric_anomaly(eccentric_anomaly, e);
        let altitude = self.altitude_at_anomalies(eccentric_anomaly, true_anomaly);

        // sqrt(|mu a|) / r
        let outer_mult = (mu * self.semi_major_axis).abs().sqrt() / altitude;
        let q_mult = (1.0 - e * e).abs().sqrt();

        let (sin_like, cos_like) = if self.is_bound() {
            eccentric_anomaly.sin_cos()
        } else {
            (eccentric_anomaly.sinh(), eccentric_anomaly.cosh())
        };

        let pqw_velocity = outer_mult * DVec2::new(-sin_like, q_mult * cos_like);

        StateVectors2D {
            position: altitude * DVec2::from_angle(true_anomaly + self.arg_pe),
            velocity: DVec2::from_angle(self.arg_pe).rotate(pqw_velocity),
        }
    }

    /// Gets the position at a given time, in meters.
    pub fn position_at_time(&self, mu: f64, time: Time) -> DVec2 {
        self.state_vectors_at_time(mu, time).position
    }

    /// Gets the velocity at a given time, in meters per second.
    pub fn velocity_at_time(&self, mu: f64, time: Time) -> DVec2 {
        self.state_vectors_at_time(mu, time).velocity
    }

    /// Gets the two-body gravitational acceleration `-mu r / |r|^3` at a
    /// given time, in meters per second squared.
    pub fn acceleration_at_time(&self, mu: f64, time: Time) -> DVec2 {
        let position = self.position_at_time(mu, time);
        let altitude = position.length();
        -mu * position / (altitude * altitude * altitude)
    }

    /// Builds a [`QuadraticArc`] anchored at `start` for a window of
    /// `window` seconds.
    ///
    /// The acceleration is the exact two-body acceleration at the middle of
    /// the window rather than a finite difference, which keeps the arc
    /// accurate over a wider window.
    pub fn quadratic_arc(&self, mu: f64, start: Time, window: Time) -> QuadraticArc {
        let midpoint = start.saturating_add(window / 2);
        QuadraticArc::new(
            self.state_vectors_at_time(mu, start),
            self.acceleration_at_time(mu, midpoint),
        )
    }
}

impl Default for OrbitalElements {
    /// A circular orbit with a radius of 1 meter around body 0.
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 0, BodyId(0))
    }
}

impl StateVectors2D {
    /// Fits an [`OrbitalElements`] set to these state vectors.
    ///
    /// The resulting orbit has its epoch at `time`, so propagating it to
    /// `time` gives these state vectors back (within numerical tolerance).
    ///
    /// # Mu
    /// Mu is the gravitational parameter of the parent body, equal to `GM`.
    ///
    /// # Parabolic Support
    /// If the fitted eccentricity comes out as exactly 1, it is nudged to the
    /// largest `f64` below 1.
    ///
    /// # Constraints
    /// The position must not be at the origin, and position and velocity must
    /// not be colinear. Breaching this gives NaNs or infinities.
    ///
    /// Only counterclockwise motion can be represented. Clockwise state
    /// vectors give an orbit with the same shape that passes through the
    /// same position at `time`, but moving the other way.
    ///
    /// # Example
    /// ```
    /// use conic_sim::{BodyId, OrbitalElements};
    ///
    /// let orbit = OrbitalElements::new(3.0, 0.4, 1.0, 0.5, 0, BodyId(0));
    /// let sv = orbit.state_vectors_at_time(1.0, 0);
    ///
    /// let fitted = sv.to_elements(1.0, 0, BodyId(0));
    ///
    /// assert!((fitted.semi_major_axis() - 3.0).abs() < 1e-9);
    /// assert!((fitted.eccentricity() - 0.4).abs() < 1e-9);
    /// assert!((fitted.arg_pe() - 1.0).abs() < 1e-9);
    /// assert!((fitted.mean_anomaly_at_epoch() - 0.5).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn to_elements(self, mu: f64, time: Time, central_body: BodyId) -> OrbitalElements {
        OrbitalElements::from_state_vectors(self, mu, time, central_body)
    }
}

#[inline]
fn non_parabolic(eccentricity: f64) -> f64 {
    if eccentricity == 1.0 {
        JUST_BELOW_ONE
    } else {
        eccentricity
    }
}

/// Wraps an angle into `(-π, π]`.
#[inline]
fn wrap_signed(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}
