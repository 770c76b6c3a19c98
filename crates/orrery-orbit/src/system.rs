//! The configured body set and the scene-wide orbit settings.

use std::collections::HashMap;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::autofit::DEFAULT_FILL_FRACTION;
use crate::body::OrbitalBody;
use crate::error::OrbitError;
use crate::kepler::{DEFAULT_TILT_SCALE, Placement, SPIN_PER_TICK};
use crate::path::{DEFAULT_PATH_SEGMENTS, PathCache};

/// Scene-wide orbit settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SystemSettings {
    /// World-space origin of the whole system.
    pub center: [f64; 3],
    /// Multiplier applied on top of the auto-fit scale.
    pub global_scale: f64,
    /// Color attenuation for bodies and paths. Cosmetic only.
    pub dim_factor: f32,
    /// Inclination exaggeration.
    pub tilt_scale: f64,
    /// Fraction of the short viewport side the system spans, `[0.2, 0.95]`.
    pub fill_fraction: f64,
    /// Multiplier on each body's visual radius. Cosmetic only.
    pub planet_size: f64,
    /// Global orbital speed multiplier.
    pub speed: f64,
    /// Segments per sampled orbit path.
    pub path_segments: usize,
    /// Self rotation added to each body per frame, in radians.
    pub spin_per_tick: f64,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0, 0.0],
            global_scale: 1.0,
            dim_factor: 1.0,
            tilt_scale: DEFAULT_TILT_SCALE,
            fill_fraction: DEFAULT_FILL_FRACTION,
            planet_size: 0.75,
            speed: 1.25,
            path_segments: DEFAULT_PATH_SEGMENTS,
            spin_per_tick: SPIN_PER_TICK,
        }
    }
}

/// Ordered set of bodies with unique identifiers, plus their cached paths.
///
/// Must not be mutated while a frame tick is reading it; the borrow checker
/// enforces this for the scheduler, which only takes `&OrbitSystem`.
#[derive(Debug)]
pub struct OrbitSystem {
    bodies: Vec<OrbitalBody>,
    index: HashMap<String, usize>,
    settings: SystemSettings,
    paths: PathCache,
}

impl OrbitSystem {
    /// Create an empty system.
    pub fn new(settings: SystemSettings) -> Self {
        Self {
            bodies: Vec::new(),
            index: HashMap::new(),
            settings,
            paths: PathCache::new(),
        }
    }

    /// Create a system from `bodies` and sample every path.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::DuplicateBody`] if two bodies share an identifier.
    pub fn with_bodies(
        settings: SystemSettings,
        bodies: impl IntoIterator<Item = OrbitalBody>,
    ) -> Result<Self, OrbitError> {
        let mut system = Self::new(settings);
        for body in bodies {
            system.push(body)?;
        }
        system.refresh_paths();
        info!(
            bodies = system.len(),
            max_semi_major_axis = system.max_semi_major_axis(),
            "Orbit system ready"
        );
        Ok(system)
    }

    /// Add a body and sample its path. Returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::DuplicateBody`] if the identifier is taken.
    pub fn insert(&mut self, body: OrbitalBody) -> Result<usize, OrbitError> {
        let idx = self.push(body)?;
        self.refresh_paths();
        Ok(idx)
    }

    fn push(&mut self, body: OrbitalBody) -> Result<usize, OrbitError> {
        if self.index.contains_key(body.id()) {
            return Err(OrbitError::DuplicateBody(body.id().to_string()));
        }
        let idx = self.bodies.len();
        self.index.insert(body.id().to_string(), idx);
        self.bodies.push(body);
        Ok(idx)
    }

    /// Remove a body by identifier, keeping the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<OrbitalBody> {
        let idx = self.index.remove(id)?;
        let body = self.bodies.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        self.paths.invalidate(id);
        Some(body)
    }

    /// Replace the elements of an existing body and resample its path if the
    /// geometry changed. Returns the old body, or `None` (and leaves the
    /// system unchanged) if no body has that identifier.
    pub fn replace(&mut self, body: OrbitalBody) -> Option<OrbitalBody> {
        let idx = *self.index.get(body.id())?;
        let old = std::mem::replace(&mut self.bodies[idx], body);
        self.refresh_paths();
        Some(old)
    }

    pub fn get(&self, id: &str) -> Option<&OrbitalBody> {
        self.index.get(id).map(|&idx| &self.bodies[idx])
    }

    pub fn bodies(&self) -> &[OrbitalBody] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn settings(&self) -> &SystemSettings {
        &self.settings
    }

    /// Swap in new settings and resample any paths whose inputs changed.
    pub fn set_settings(&mut self, settings: SystemSettings) {
        self.settings = settings;
        self.refresh_paths();
    }

    /// Largest semi-major axis in the set, or 0 when empty.
    pub fn max_semi_major_axis(&self) -> f64 {
        self.bodies
            .iter()
            .map(OrbitalBody::max_extent)
            .fold(0.0, f64::max)
    }

    /// Uniform scale for the group holding all path geometry.
    pub fn group_scale(&self, fit_scale: f64) -> f64 {
        fit_scale * self.settings.global_scale
    }

    /// Evaluation placement for the current auto-fit scale.
    pub fn placement(&self, fit_scale: f64) -> Placement {
        Placement {
            tilt_scale: self.settings.tilt_scale,
            scale: self.group_scale(fit_scale),
            center: DVec3::from_array(self.settings.center),
            spin_per_tick: self.settings.spin_per_tick,
        }
    }

    /// Resample paths whose geometric inputs changed. Returns the number
    /// resampled.
    pub fn refresh_paths(&mut self) -> usize {
        self.paths.refresh(
            &self.bodies,
            self.settings.tilt_scale,
            self.settings.path_segments,
        )
    }

    pub fn paths(&self) -> &PathCache {
        &self.paths
    }
}
