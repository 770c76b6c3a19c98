//! Stock body set for the decorative scene.
//!
//! Six bodies with staggered periods, small inclinations (exaggerated by the
//! tilt scale at render time) and mixed screen orientations so their paths do
//! not stack on top of each other. The fifth body carries the ring.

use crate::body::{Direction, OrbitalBody, RingAnnotation, ScreenOrientation};
use crate::error::OrbitError;

/// Identifier of the ringed body in [`default_bodies`].
pub const RINGED_BODY: &str = "halo";

/// The default six-body system. Largest semi-major axis is 6.4.
///
/// # Errors
///
/// Never fails for the built-in values; the `Result` keeps the construction
/// path identical to user-supplied bodies.
pub fn default_bodies() -> Result<Vec<OrbitalBody>, OrbitError> {
    Ok(vec![
        OrbitalBody::new("ember", 1.2, 0.08, 6.0)?
            .with_inclination(0.05)
            .with_longitude_of_node(0.3)
            .with_visual_radius(0.18)
            .with_color([0.95, 0.55, 0.35]),
        OrbitalBody::new("azure", 2.1, 0.12, 10.0)?
            .with_inclination(0.09)
            .with_longitude_of_node(1.4)
            .with_argument_of_periapsis(0.6)
            .with_phase(1.1)
            .with_orientation(ScreenOrientation::Eighth)
            .with_visual_radius(0.26)
            .with_color([0.35, 0.6, 1.0]),
        OrbitalBody::new("verdant", 3.0, 0.05, 15.0)?
            .with_inclination(0.04)
            .with_longitude_of_node(2.6)
            .with_phase(2.3)
            .with_direction(Direction::Retrograde)
            .with_visual_radius(0.3)
            .with_color([0.4, 0.85, 0.5]),
        OrbitalBody::new("crimson", 3.9, 0.18, 21.0)?
            .with_inclination(0.12)
            .with_longitude_of_node(4.0)
            .with_argument_of_periapsis(1.2)
            .with_phase(3.9)
            .with_orientation(ScreenOrientation::Quarter)
            .with_visual_radius(0.22)
            .with_color([0.9, 0.3, 0.3]),
        OrbitalBody::new(RINGED_BODY, 5.2, 0.06, 30.0)?
            .with_inclination(0.07)
            .with_longitude_of_node(5.1)
            .with_phase(0.8)
            .with_visual_radius(0.42)
            .with_color([0.92, 0.82, 0.6])
            .with_ring(RingAnnotation {
                inner_radius: 1.4,
                outer_radius: 2.3,
                color: [0.85, 0.78, 0.62],
                opacity: 0.55,
            }),
        OrbitalBody::new("frost", 6.4, 0.1, 42.0)?
            .with_inclination(0.1)
            .with_longitude_of_node(0.9)
            .with_argument_of_periapsis(2.0)
            .with_phase(4.6)
            .with_orientation(ScreenOrientation::Eighth)
            .with_visual_radius(0.28)
            .with_color([0.7, 0.9, 1.0]),
    ])
}
