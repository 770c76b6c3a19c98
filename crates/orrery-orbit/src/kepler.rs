//! Per-frame body position evaluation.
//!
//! Bodies advance at a uniform rate in the parametric ellipse angle, not with an
//! equal-area sweep.

use std::f64::consts::TAU;

use glam::{DQuat, DVec3};

use crate::body::OrbitalBody;

/// Default per-tick self rotation in radians.
pub const SPIN_PER_TICK: f64 = 0.01;

/// Default inclination exaggeration. Not physical; it only spreads orbits
/// vertically so they read better on screen.
pub const DEFAULT_TILT_SCALE: f64 = 3.5;

/// Where the system sits in world space for a given frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Inclination multiplier.
    pub tilt_scale: f64,
    /// Auto-fit scale multiplied by the global scale.
    pub scale: f64,
    /// World-space origin of the system.
    pub center: DVec3,
    /// Self rotation reported per evaluation.
    pub spin_per_tick: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            tilt_scale: DEFAULT_TILT_SCALE,
            scale: 1.0,
            center: DVec3::ZERO,
            spin_per_tick: SPIN_PER_TICK,
        }
    }
}

/// Result of evaluating one body at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySample {
    /// World-space position.
    pub position: DVec3,
    /// Increment to add to the body's own spin.
    pub spin_delta: f64,
}

/// Point on the untransformed ellipse at parametric angle `theta`.
///
/// The orbital plane is XZ: `(a cos θ, 0, b sin θ)`.
pub fn planar_point(semi_major_axis: f64, eccentricity: f64, theta: f64) -> DVec3 {
    let b = semi_major_axis * (1.0 - eccentricity * eccentricity).sqrt();
    DVec3::new(semi_major_axis * theta.cos(), 0.0, b * theta.sin())
}

/// Rotation from the orbital plane into world space.
///
/// Applied to a vector, the order is: argument of periapsis about Y,
/// exaggerated inclination about X, longitude of node about Y, then the screen
/// roll about Z.
pub fn orbital_transform(body: &OrbitalBody, tilt_scale: f64) -> DQuat {
    DQuat::from_rotation_z(body.orientation().roll())
        * DQuat::from_rotation_y(body.longitude_of_node())
        * DQuat::from_rotation_x(body.inclination() * tilt_scale)
        * DQuat::from_rotation_y(body.argument_of_periapsis())
}

/// Fraction of the orbit completed, in `[0, 1)`.
///
/// `period` must be positive, which [`OrbitalBody`] guarantees.
pub fn orbit_progress(elapsed: f64, speed: f64, period: f64) -> f64 {
    let progress = (elapsed * speed / period).rem_euclid(1.0);
    // rem_euclid rounds tiny negative inputs up to exactly 1.0
    if progress >= 1.0 { 0.0 } else { progress }
}

/// Position of `body` after `elapsed` seconds at orbital speed `speed`.
///
/// Pure: the same inputs always give the same output. Self rotation is only
/// reported as a delta; accumulating it is the caller's job.
pub fn evaluate(body: &OrbitalBody, elapsed: f64, speed: f64, placement: &Placement) -> BodySample {
    let progress = orbit_progress(elapsed, speed, body.period());
    let theta = body.direction().sign() * progress * TAU + body.phase();

    let local = planar_point(body.semi_major_axis(), body.eccentricity(), theta);
    let world = orbital_transform(body, placement.tilt_scale) * local;

    BodySample {
        position: world * placement.scale + placement.center,
        spin_delta: placement.spin_per_tick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Direction, ScreenOrientation};

    const EPS: f64 = 1e-9;

    fn assert_close(actual: DVec3, expected: DVec3) {
        assert!(
            (actual - expected).length() < EPS,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn unit_placement() -> Placement {
        Placement {
            tilt_scale: 1.0,
            ..Placement::default()
        }
    }

    #[test]
    fn test_circular_orbit_planar_points() {
        let body = OrbitalBody::new("unit", 1.0, 0.0, 4.0).unwrap();
        let placement = unit_placement();
        assert_close(evaluate(&body, 0.0, 1.0, &placement).position, DVec3::X);
        assert_close(evaluate(&body, 1.0, 1.0, &placement).position, DVec3::Z);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let body = OrbitalBody::new("scenario", 2.0, 0.0, 10.0).unwrap();
        let placement = unit_placement();
        assert_close(
            evaluate(&body, 0.0, 1.0, &placement).position,
            DVec3::new(2.0, 0.0, 0.0),
        );
        assert_close(
            evaluate(&body, 2.5, 1.0, &placement).position,
            DVec3::new(0.0, 0.0, 2.0),
        );
        assert_close(
            evaluate(&body, 5.0, 1.0, &placement).position,
            DVec3::new(-2.0, 0.0, 0.0),
        );
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let body = OrbitalBody::new("det", 3.3, 0.4, 7.0)
            .unwrap()
            .with_inclination(0.2)
            .with_longitude_of_node(1.1)
            .with_argument_of_periapsis(0.7)
            .with_phase(2.0)
            .with_orientation(ScreenOrientation::Eighth);
        let placement = Placement {
            scale: 12.5,
            center: DVec3::new(1.0, -2.0, 0.5),
            ..Placement::default()
        };
        let a = evaluate(&body, 123.456, 1.25, &placement);
        let b = evaluate(&body, 123.456, 1.25, &placement);
        assert_eq!(a.position.to_array(), b.position.to_array());
        assert_eq!(a.spin_delta.to_bits(), b.spin_delta.to_bits());
    }

    #[test]
    fn test_evaluate_is_periodic() {
        let body = OrbitalBody::new("periodic", 4.0, 0.3, 9.0)
            .unwrap()
            .with_inclination(0.1)
            .with_longitude_of_node(0.4);
        let placement = Placement::default();
        for i in 0..16 {
            let t = i as f64 * 0.77;
            let now = evaluate(&body, t, 1.0, &placement).position;
            let later = evaluate(&body, t + body.period(), 1.0, &placement).position;
            assert!((now - later).length() < 1e-9, "t={t}: {now:?} vs {later:?}");
        }
    }

    #[test]
    fn test_retrograde_mirrors_prograde() {
        let pro = OrbitalBody::new("pro", 1.0, 0.0, 4.0).unwrap();
        let retro = pro.clone().with_direction(Direction::Retrograde);
        let placement = unit_placement();
        let p = evaluate(&pro, 1.0, 1.0, &placement).position;
        let r = evaluate(&retro, 1.0, 1.0, &placement).position;
        assert_close(p, DVec3::Z);
        assert_close(r, -DVec3::Z);
    }

    #[test]
    fn test_speed_factor_scales_angular_rate() {
        let body = OrbitalBody::new("fast", 1.0, 0.0, 8.0).unwrap();
        let placement = unit_placement();
        let slow = evaluate(&body, 2.0, 2.0, &placement).position;
        let fast = evaluate(&body, 4.0, 1.0, &placement).position;
        assert_close(slow, fast);
    }

    #[test]
    fn test_scale_and_center_applied() {
        let body = OrbitalBody::new("scaled", 2.0, 0.0, 10.0).unwrap();
        let placement = Placement {
            tilt_scale: 1.0,
            scale: 3.0,
            center: DVec3::new(0.0, 1.0, 0.0),
            spin_per_tick: SPIN_PER_TICK,
        };
        assert_close(
            evaluate(&body, 0.0, 1.0, &placement).position,
            DVec3::new(6.0, 1.0, 0.0),
        );
    }

    #[test]
    fn test_inclination_lifts_out_of_plane() {
        let body = OrbitalBody::new("tilted", 1.0, 0.0, 4.0)
            .unwrap()
            .with_inclination(0.1);
        let flat = evaluate(&body, 1.0, 1.0, &Placement { tilt_scale: 0.0, ..Placement::default() });
        let tilted = evaluate(&body, 1.0, 1.0, &Placement::default());
        assert!(flat.position.y.abs() < EPS);
        // Quarter orbit sits on +Z, so a rotation about X moves it vertically.
        assert!((tilted.position.y.abs() - (0.35_f64).sin()).abs() < EPS);
    }

    #[test]
    fn test_orbit_radius_bounded_by_axes() {
        let body = OrbitalBody::new("ellipse", 5.0, 0.6, 3.0)
            .unwrap()
            .with_inclination(0.3)
            .with_longitude_of_node(2.0)
            .with_argument_of_periapsis(1.0)
            .with_orientation(ScreenOrientation::Quarter);
        let placement = Placement::default();
        for i in 0..50 {
            let r = evaluate(&body, i as f64 * 0.061, 1.0, &placement)
                .position
                .length();
            assert!(r <= 5.0 + EPS && r >= 4.0 - EPS, "r = {r}");
        }
    }

    #[test]
    fn test_progress_range() {
        assert_eq!(orbit_progress(0.0, 1.0, 10.0), 0.0);
        assert!((orbit_progress(25.0, 1.0, 10.0) - 0.5).abs() < 1e-12);
        let negative = orbit_progress(-2.5, 1.0, 10.0);
        assert!((negative - 0.75).abs() < 1e-12);
        let tiny = orbit_progress(-1e-20, 1.0, 10.0);
        assert!((0.0..1.0).contains(&tiny));
    }

    #[test]
    fn test_spin_delta_reported() {
        let body = OrbitalBody::new("spin", 1.0, 0.0, 1.0).unwrap();
        let sample = evaluate(&body, 0.3, 1.0, &Placement::default());
        assert_eq!(sample.spin_delta, SPIN_PER_TICK);
    }
}
