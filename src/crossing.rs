use core::f64::consts::TAU;

use crate::{
    anomaly::{
        eccentric_anomaly_at_true_anomaly, mean_anomaly_at_elliptic_eccentric_anomaly,
        mean_anomaly_at_hyperbolic_eccentric_anomaly,
    },
    OrbitalElements, Time,
};

/// Relative distance below which the mean anomaly counts as having reached
/// a root.
const ROOT_TOLERANCE: f64 = 1e-9;

impl OrbitalElements {
    /// Gets the next time, strictly after `time`, at which the orbiting body
    /// is `distance` meters away from the parent body.
    ///
    /// Returns `None` when there is no such time:
    /// - the distance is outside `[periapsis, apoapsis]` of an elliptic orbit,
    /// - the distance is below the periapsis of a hyperbolic trajectory,
    /// - a hyperbolic trajectory has already passed both its inbound and
    ///   outbound crossings,
    /// - or the crossing lies beyond the end of the [`Time`] range.
    ///
    /// The result is rounded up to the next whole second, so at the returned
    /// time the body is at or just past the crossing. Querying again from
    /// the returned time gives the following crossing, not the same one.
    ///
    /// # Example
    /// ```
    /// use conic_sim::{BodyId, OrbitalElements};
    ///
    /// let orbit = OrbitalElements::new(1.0e9, 0.5, 0.0, 0.0, 0, BodyId(0));
    /// let mu = 3.986e14;
    ///
    /// // Starting at periapsis, the next apoapsis pass is half a period away
    /// let period = orbit.orbital_period(mu).unwrap();
    /// let time = orbit.next_time_at_radius(mu, 0, 1.5e9).unwrap();
    /// assert!((time as f64 - period / 2.0).abs() <= 1.0);
    ///
    /// assert_eq!(orbit.next_time_at_radius(mu, 0, 2.0e9), None);
    /// ```
    pub fn next_time_at_radius(&self, mu: f64, time: Time, distance: f64) -> Option<Time> {
        let (first, second) = self.mean_anomalies_at_radius(distance)?;

        let n = self.mean_angular_motion(mu);
        let mean_anomaly = self.mean_anomaly_at_time(mu, time);

        let target = if is_ahead(mean_anomaly, first) {
            first
        } else if is_ahead(mean_anomaly, second) {
            second
        } else if self.is_bound() {
            first + TAU
        } else {
            log::trace!(
                "no crossing of r={distance} after t={time}: \
                both branches (M={first}, M={second}) are behind M={mean_anomaly}"
            );
            return None;
        };

        let offset = ((target - mean_anomaly) / n).ceil().max(1.0);

        log::trace!("crossing of r={distance} at M={target}, {offset}s after t={time}");

        // `as` saturates, so compare in f64 first
        if !offset.is_finite() || offset >= Time::MAX as f64 {
            return None;
        }

        time.checked_add(offset as Time)
    }

    /// The pair of mean anomalies at which the orbit is `distance` away from
    /// the parent body, in ascending order.
    ///
    /// Elliptic orbits give `(M, 2π - M)` with `M` in `[0, π]`.
    /// Hyperbolic orbits give the inbound and outbound branches `(-M, M)`.
    fn mean_anomalies_at_radius(&self, distance: f64) -> Option<(f64, f64)> {
        let a = self.semi_major_axis();
        let e = self.eccentricity();

        if self.is_bound() {
            // r = a (1 - e cos E)
            let cos_ecc_anom = (a - distance) / (a * e);

            if !(-1.0..=1.0).contains(&cos_ecc_anom) {
                return None;
            }

            let mean_anomaly =
                mean_anomaly_at_elliptic_eccentric_anomaly(cos_ecc_anom.acos(), e);

            Some((mean_anomaly, TAU - mean_anomaly))
        } else {
            if distance < self.periapsis() {
                return None;
            }

            // r = a (1 - e^2) / (1 + e cos f)
            let cos_true_anom = ((self.semi_latus_rectum() / distance - 1.0) / e).clamp(-1.0, 1.0);
            let hyperbolic_anomaly = eccentric_anomaly_at_true_anomaly(cos_true_anom.acos(), e);
            let mean_anomaly = mean_anomaly_at_hyperbolic_eccentric_anomaly(hyperbolic_anomaly, e);

            Some((-mean_anomaly, mean_anomaly))
        }
    }
}

#[inline]
fn is_ahead(mean_anomaly: f64, root: f64) -> bool {
    mean_anomaly < root - ROOT_TOLERANCE * root.abs().max(1.0)
}
