//! Orbital element set: the immutable configuration of one body.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use serde::{Deserialize, Serialize};

use crate::error::OrbitError;

/// Sense of revolution around the system center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Counter-clockwise when viewed from above (+1).
    #[default]
    Prograde,
    /// Clockwise when viewed from above (-1).
    Retrograde,
}

impl Direction {
    /// `+1.0` for prograde, `-1.0` for retrograde.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Prograde => 1.0,
            Direction::Retrograde => -1.0,
        }
    }
}

/// Extra roll about the depth axis, used only to spread orbits apart on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenOrientation {
    /// No extra roll.
    #[default]
    Flat,
    /// Rolled by 90 degrees.
    Quarter,
    /// Rolled by 45 degrees.
    Eighth,
}

impl ScreenOrientation {
    /// Roll angle in radians.
    pub fn roll(self) -> f64 {
        match self {
            ScreenOrientation::Flat => 0.0,
            ScreenOrientation::Quarter => FRAC_PI_2,
            ScreenOrientation::Eighth => FRAC_PI_4,
        }
    }
}

/// Cosmetic ring drawn around a body. Not part of the orbit math.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RingAnnotation {
    /// Inner radius, relative to the body's visual radius.
    pub inner_radius: f64,
    /// Outer radius, relative to the body's visual radius.
    pub outer_radius: f64,
    /// Linear RGB.
    pub color: [f32; 3],
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

/// A single orbiting body.
///
/// Only constructible through [`OrbitalBody::new`] (or deserialization, which
/// goes through the same checks), so every instance satisfies
/// `a > 0`, `0 <= e < 1` and `period > 0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BodyDef", into = "BodyDef")]
pub struct OrbitalBody {
    id: String,
    visual_radius: f64,
    semi_major_axis: f64,
    eccentricity: f64,
    period: f64,
    inclination: f64,
    longitude_of_node: f64,
    argument_of_periapsis: f64,
    phase: f64,
    direction: Direction,
    orientation: ScreenOrientation,
    color: [f32; 3],
    ring: Option<RingAnnotation>,
}

const DEFAULT_VISUAL_RADIUS: f64 = 0.25;
const DEFAULT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

impl OrbitalBody {
    /// Create a body from its required elements. Angles default to zero,
    /// direction to prograde and orientation to [`ScreenOrientation::Flat`].
    ///
    /// # Errors
    ///
    /// Returns an [`OrbitError`] if the identifier is empty, `semi_major_axis`
    /// or `period` is not positive, or `eccentricity` is outside `[0, 1)`.
    pub fn new(
        id: impl Into<String>,
        semi_major_axis: f64,
        eccentricity: f64,
        period: f64,
    ) -> Result<Self, OrbitError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(OrbitError::EmptyIdentifier);
        }
        validate_elements(semi_major_axis, eccentricity, period)?;

        Ok(Self {
            id,
            visual_radius: DEFAULT_VISUAL_RADIUS,
            semi_major_axis,
            eccentricity,
            period,
            inclination: 0.0,
            longitude_of_node: 0.0,
            argument_of_periapsis: 0.0,
            phase: 0.0,
            direction: Direction::Prograde,
            orientation: ScreenOrientation::Flat,
            color: DEFAULT_COLOR,
            ring: None,
        })
    }

    /// Inclination in radians (before tilt exaggeration).
    ///
    /// # Panics
    ///
    /// Panics if `radians` is not finite.
    pub fn with_inclination(mut self, radians: f64) -> Self {
        self.inclination = finite_angle("inclination", radians);
        self
    }

    /// Longitude of the ascending node in radians.
    ///
    /// # Panics
    ///
    /// Panics if `radians` is not finite.
    pub fn with_longitude_of_node(mut self, radians: f64) -> Self {
        self.longitude_of_node = finite_angle("longitude_of_node", radians);
        self
    }

    /// Argument of periapsis in radians.
    ///
    /// # Panics
    ///
    /// Panics if `radians` is not finite.
    pub fn with_argument_of_periapsis(mut self, radians: f64) -> Self {
        self.argument_of_periapsis = finite_angle("argument_of_periapsis", radians);
        self
    }

    /// Angular position at time zero, in radians.
    ///
    /// # Panics
    ///
    /// Panics if `radians` is not finite.
    pub fn with_phase(mut self, radians: f64) -> Self {
        self.phase = finite_angle("phase", radians);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_orientation(mut self, orientation: ScreenOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Rendered sphere radius. Independent of the orbit geometry.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is not a positive finite number.
    pub fn with_visual_radius(mut self, radius: f64) -> Self {
        assert!(
            radius.is_finite() && radius > 0.0,
            "visual radius must be positive, got {radius}"
        );
        self.visual_radius = radius;
        self
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_ring(mut self, ring: RingAnnotation) -> Self {
        self.ring = Some(ring);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn visual_radius(&self) -> f64 {
        self.visual_radius
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// `b = a * sqrt(1 - e^2)`.
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity).sqrt()
    }

    /// Seconds per revolution at speed factor 1.
    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    pub fn longitude_of_node(&self) -> f64 {
        self.longitude_of_node
    }

    pub fn argument_of_periapsis(&self) -> f64 {
        self.argument_of_periapsis
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn orientation(&self) -> ScreenOrientation {
        self.orientation
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn ring(&self) -> Option<&RingAnnotation> {
        self.ring.as_ref()
    }

    /// Largest distance from the system center reached by the unscaled orbit.
    ///
    /// The ellipse is centered on the origin and rotations preserve length, so
    /// this is the semi-major axis.
    pub fn max_extent(&self) -> f64 {
        self.semi_major_axis
    }

    /// Rendered radius after the global planet size multiplier.
    pub fn display_radius(&self, size_multiplier: f64) -> f64 {
        self.visual_radius * size_multiplier
    }

    /// Body color attenuated by the scene dim factor, clamped to `[0, 1]`.
    pub fn display_color(&self, dim_factor: f32) -> [f32; 3] {
        self.color.map(|c| (c * dim_factor).clamp(0.0, 1.0))
    }
}

fn finite_angle(name: &str, radians: f64) -> f64 {
    assert!(radians.is_finite(), "{name} must be finite, got {radians}");
    radians
}

fn validate_angles(def: &BodyDef) -> Result<(), OrbitError> {
    let angles = [
        ("inclination", def.inclination),
        ("longitude_of_node", def.longitude_of_node),
        ("argument_of_periapsis", def.argument_of_periapsis),
        ("phase", def.phase),
    ];
    for (name, value) in angles {
        if !value.is_finite() {
            return Err(OrbitError::Angle { name, value });
        }
    }
    Ok(())
}

fn validate_elements(semi_major_axis: f64, eccentricity: f64, period: f64) -> Result<(), OrbitError> {
    if !(semi_major_axis.is_finite() && semi_major_axis > 0.0) {
        return Err(OrbitError::SemiMajorAxis(semi_major_axis));
    }
    if !(eccentricity.is_finite() && (0.0..1.0).contains(&eccentricity)) {
        return Err(OrbitError::Eccentricity(eccentricity));
    }
    if !(period.is_finite() && period > 0.0) {
        return Err(OrbitError::Period(period));
    }
    Ok(())
}

/// Plain serialized form of an [`OrbitalBody`].
///
/// Everything except `id`, `semi_major_axis` and `period` may be omitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyDef {
    pub id: String,
    #[serde(default = "default_visual_radius")]
    pub visual_radius: f64,
    pub semi_major_axis: f64,
    #[serde(default)]
    pub eccentricity: f64,
    pub period: f64,
    #[serde(default)]
    pub inclination: f64,
    #[serde(default)]
    pub longitude_of_node: f64,
    #[serde(default)]
    pub argument_of_periapsis: f64,
    #[serde(default)]
    pub phase: f64,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub orientation: ScreenOrientation,
    #[serde(default = "default_color")]
    pub color: [f32; 3],
    #[serde(default)]
    pub ring: Option<RingAnnotation>,
}

fn default_visual_radius() -> f64 {
    DEFAULT_VISUAL_RADIUS
}

fn default_color() -> [f32; 3] {
    DEFAULT_COLOR
}

impl TryFrom<BodyDef> for OrbitalBody {
    type Error = OrbitError;

    fn try_from(def: BodyDef) -> Result<Self, Self::Error> {
        if !(def.visual_radius.is_finite() && def.visual_radius > 0.0) {
            return Err(OrbitError::VisualRadius(def.visual_radius));
        }
        validate_angles(&def)?;
        let mut body = OrbitalBody::new(def.id, def.semi_major_axis, def.eccentricity, def.period)?
            .with_visual_radius(def.visual_radius)
            .with_inclination(def.inclination)
            .with_longitude_of_node(def.longitude_of_node)
            .with_argument_of_periapsis(def.argument_of_periapsis)
            .with_phase(def.phase)
            .with_direction(def.direction)
            .with_orientation(def.orientation)
            .with_color(def.color);
        body.ring = def.ring;
        Ok(body)
    }
}

impl From<OrbitalBody> for BodyDef {
    fn from(body: OrbitalBody) -> Self {
        Self {
            id: body.id,
            visual_radius: body.visual_radius,
            semi_major_axis: body.semi_major_axis,
            eccentricity: body.eccentricity,
            period: body.period,
            inclination: body.inclination,
            longitude_of_node: body.longitude_of_node,
            argument_of_periapsis: body.argument_of_periapsis,
            phase: body.phase,
            direction: body.direction,
            orientation: body.orientation,
            color: body.color,
            ring: body.ring,
        }
    }
}
