//! Per-frame transform scheduling into host-owned presentation handles.

use std::collections::{BTreeMap, HashMap};
use std::f64::consts::TAU;

use glam::{DQuat, DVec3};
use serde::Serialize;
use tracing::trace;

use crate::kepler::evaluate;
use crate::system::OrbitSystem;

/// Sink for one body's per-frame transform, owned by the presentation layer.
pub trait PresentationHandle {
    fn set_transform(&mut self, position: DVec3, rotation: DQuat);
}

/// Outcome of one [`FrameScheduler::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Bodies whose handle received a transform.
    pub updated: usize,
    /// Bodies skipped because no handle was attached.
    pub skipped: usize,
}

struct Slot<H> {
    handle: Option<H>,
    spin: f64,
}

/// Registry of presentation handles keyed by body identifier.
///
/// Handles are attached and detached explicitly. A body without a handle is
/// skipped for the tick and picked up again once one is attached; its spin
/// resumes where it left off.
pub struct FrameScheduler<H> {
    slots: HashMap<String, Slot<H>>,
}

impl<H: PresentationHandle> FrameScheduler<H> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Attach a handle for `id`, returning the handle it replaces.
    pub fn attach(&mut self, id: impl Into<String>, handle: H) -> Option<H> {
        let slot = self.slots.entry(id.into()).or_insert(Slot {
            handle: None,
            spin: 0.0,
        });
        slot.handle.replace(handle)
    }

    /// Detach and return the handle for `id`. The body's spin is kept.
    pub fn detach(&mut self, id: &str) -> Option<H> {
        self.slots.get_mut(id).and_then(|slot| slot.handle.take())
    }

    /// Drop all state for `id`, including its spin.
    pub fn forget(&mut self, id: &str) -> Option<H> {
        self.slots.remove(id).and_then(|slot| slot.handle)
    }

    pub fn is_attached(&self, id: &str) -> bool {
        self.slots.get(id).is_some_and(|slot| slot.handle.is_some())
    }

    pub fn handle(&self, id: &str) -> Option<&H> {
        self.slots.get(id).and_then(|slot| slot.handle.as_ref())
    }

    /// Accumulated self rotation of `id` in `[0, 2π)`.
    pub fn spin(&self, id: &str) -> Option<f64> {
        self.slots.get(id).map(|slot| slot.spin)
    }

    /// Evaluate every body at `elapsed` seconds and write the transforms into
    /// the attached handles.
    pub fn tick(&mut self, system: &OrbitSystem, elapsed: f64, fit_scale: f64) -> TickReport {
        let placement = system.placement(fit_scale);
        let speed = system.settings().speed;
        let mut report = TickReport::default();

        for body in system.bodies() {
            let Some(slot) = self.slots.get_mut(body.id()) else {
                report.skipped += 1;
                continue;
            };
            let Some(handle) = slot.handle.as_mut() else {
                report.skipped += 1;
                continue;
            };

            let sample = evaluate(body, elapsed, speed, &placement);
            slot.spin = (slot.spin + sample.spin_delta).rem_euclid(TAU);
            handle.set_transform(sample.position, DQuat::from_rotation_y(slot.spin));
            report.updated += 1;
        }

        trace!(elapsed, updated = report.updated, skipped = report.skipped, "Frame tick");
        report
    }
}

impl<H: PresentationHandle> Default for FrameScheduler<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Position and spin increment of one body in a [`FrameState`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BodyFrame {
    pub position: [f64; 3],
    pub spin_delta: f64,
}

/// Owned snapshot of every body's transform at one instant.
///
/// Built on demand for diagnostics; the scheduler's hot path never allocates
/// one.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FrameState {
    pub elapsed: f64,
    pub scale: f64,
    pub bodies: BTreeMap<String, BodyFrame>,
}

impl FrameState {
    pub fn capture(system: &OrbitSystem, elapsed: f64, fit_scale: f64) -> Self {
        let placement = system.placement(fit_scale);
        let speed = system.settings().speed;
        let bodies = system
            .bodies()
            .iter()
            .map(|body| {
                let sample = evaluate(body, elapsed, speed, &placement);
                (
                    body.id().to_string(),
                    BodyFrame {
                        position: sample.position.to_array(),
                        spin_delta: sample.spin_delta,
                    },
                )
            })
            .collect();

        Self {
            elapsed,
            scale: placement.scale,
            bodies,
        }
    }
}
