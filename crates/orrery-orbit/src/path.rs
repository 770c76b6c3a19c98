//! Orbit path sampling and the path geometry cache.
//!
//! Paths are sampled in unscaled system space. The presentation layer draws all
//! of them inside one uniformly scaled group, so a viewport resize never
//! requires resampling.

use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::DVec3;
use tracing::debug;

use crate::body::{OrbitalBody, ScreenOrientation};
use crate::kepler::{orbital_transform, planar_point};

/// Segments per orbit.
pub const DEFAULT_PATH_SEGMENTS: usize = 256;

/// Sample `segments + 1` points around the orbit of `body`, from θ = 0 to
/// θ = 2π inclusive, so the first and last points coincide.
///
/// A segment count of zero is treated as one.
pub fn sample_path(body: &OrbitalBody, tilt_scale: f64, segments: usize) -> Vec<DVec3> {
    let segments = segments.max(1);
    let rotation = orbital_transform(body, tilt_scale);
    let (a, e) = (body.semi_major_axis(), body.eccentricity());

    (0..=segments)
        .map(|i| {
            let theta = i as f64 / segments as f64 * TAU;
            rotation * planar_point(a, e, theta)
        })
        .collect()
}

/// GPU vertex for one orbit path point.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PathVertex {
    /// Unscaled system-space position.
    pub position: [f32; 3],
}

/// Sampled closed polyline for one body.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitPath {
    body_id: String,
    points: Vec<DVec3>,
}

impl OrbitPath {
    pub fn body_id(&self) -> &str {
        &self.body_id
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Number of segments (one less than the point count).
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// f32 vertices ready for a line-strip vertex buffer.
    pub fn to_vertices(&self) -> Vec<PathVertex> {
        self.points
            .iter()
            .map(|p| PathVertex {
                position: p.as_vec3().to_array(),
            })
            .collect()
    }
}

/// Inputs that determine a path's shape. Time and auto-fit scale are not
/// part of it.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PathKey {
    semi_major_axis: f64,
    eccentricity: f64,
    inclination: f64,
    longitude_of_node: f64,
    argument_of_periapsis: f64,
    orientation: ScreenOrientation,
    tilt_scale: f64,
    segments: usize,
}

impl PathKey {
    fn new(body: &OrbitalBody, tilt_scale: f64, segments: usize) -> Self {
        Self {
            semi_major_axis: body.semi_major_axis(),
            eccentricity: body.eccentricity(),
            inclination: body.inclination(),
            longitude_of_node: body.longitude_of_node(),
            argument_of_periapsis: body.argument_of_periapsis(),
            orientation: body.orientation(),
            tilt_scale,
            segments: segments.max(1),
        }
    }
}

struct CachedPath {
    key: PathKey,
    path: OrbitPath,
}

/// Memoized orbit paths keyed by body identifier.
///
/// [`refresh`](Self::refresh) only resamples bodies whose geometric inputs
/// changed, so calling it repeatedly with the same inputs does nothing.
#[derive(Default)]
pub struct PathCache {
    entries: HashMap<String, CachedPath>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the cache in line with `bodies`. Returns how many paths were
    /// (re)sampled. Entries for bodies not in `bodies` are dropped.
    pub fn refresh<'a>(
        &mut self,
        bodies: impl IntoIterator<Item = &'a OrbitalBody>,
        tilt_scale: f64,
        segments: usize,
    ) -> usize {
        let mut seen = HashSet::new();
        let mut rebuilt = 0;

        for body in bodies {
            seen.insert(body.id());
            let key = PathKey::new(body, tilt_scale, segments);
            if self
                .entries
                .get(body.id())
                .is_some_and(|cached| cached.key == key)
            {
                continue;
            }

            let path = OrbitPath {
                body_id: body.id().to_string(),
                points: sample_path(body, tilt_scale, segments),
            };
            self.entries
                .insert(body.id().to_string(), CachedPath { key, path });
            rebuilt += 1;
        }

        let before = self.entries.len();
        self.entries.retain(|id, _| seen.contains(id.as_str()));
        let dropped = before - self.entries.len();

        if rebuilt > 0 || dropped > 0 {
            debug!(rebuilt, dropped, tilt_scale, segments, "Orbit paths refreshed");
        }
        rebuilt
    }

    /// Force the path for `id` to be resampled on the next refresh.
    pub fn invalidate(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&OrbitPath> {
        self.entries.get(id).map(|cached| &cached.path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrbitPath> {
        self.entries.values().map(|cached| &cached.path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl std::fmt::Debug for PathCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathCache")
            .field("paths", &self.entries.len())
            .finish()
    }
}
