//! The assembled scene: bodies, auto-fit, per-frame scheduling and the eyes.

use glam::DVec3;
use orrery_config::Config;
use orrery_orbit::presets::default_bodies;
use orrery_orbit::{
    FrameScheduler, FrameState, OrbitError, OrbitSystem, OrbitalBody, PathCache,
    PresentationHandle, SubscriptionId, SystemSettings, TickReport, ViewportFit,
};
use tracing::{debug, info};

use crate::blink::EyePair;
use crate::frame_clock::{FrameClock, FrameTime};

/// What one [`Scene::frame`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneFrame {
    pub time: FrameTime,
    pub report: TickReport,
    /// Auto-fit scale used for this frame.
    pub scale: f64,
}

/// Orbit system wired to a viewport and a set of presentation handles.
///
/// Path geometry lives in the system's path cache and is drawn under a single
/// group transform (see [`group_scale`](Self::group_scale) and
/// [`group_center`](Self::group_center)); bodies get absolute positions every
/// frame through their handles.
pub struct Scene<H> {
    system: OrbitSystem,
    fit: ViewportFit,
    scheduler: FrameScheduler<H>,
    eyes: Option<EyePair>,
    clock: FrameClock,
}

impl<H: PresentationHandle> Scene<H> {
    /// Build a scene from config. An empty body list selects the built-in set.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::DuplicateBody`] if two configured bodies share an
    /// identifier.
    pub fn new(config: &Config) -> Result<Self, OrbitError> {
        let bodies = if config.bodies.is_empty() {
            default_bodies()?
        } else {
            config.bodies.clone()
        };
        let system = OrbitSystem::with_bodies(config.orbit.clone(), bodies)?;

        let mut fit = ViewportFit::new(system.max_semi_major_axis(), config.orbit.fill_fraction);
        fit.resize(
            f64::from(config.viewport.width),
            f64::from(config.viewport.height),
        );

        let eyes = config.eyes.blink.then(|| EyePair::from_config(&config.eyes));

        info!(
            bodies = system.len(),
            width = config.viewport.width,
            height = config.viewport.height,
            scale = fit.scale(),
            blink = eyes.is_some(),
            "Scene created"
        );

        Ok(Self {
            system,
            fit,
            scheduler: FrameScheduler::new(),
            eyes,
            clock: FrameClock::new(),
        })
    }

    /// Viewport size changed. Returns the new auto-fit scale.
    pub fn resize(&mut self, width: f64, height: f64) -> f64 {
        self.fit.resize(width, height)
    }

    /// Attach a presentation handle for a body in the system. Returns the
    /// handle it replaces.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::UnknownBody`] if no body has that identifier; the
    /// handle is dropped.
    pub fn attach(&mut self, id: impl Into<String>, handle: H) -> Result<Option<H>, OrbitError> {
        let id = id.into();
        if self.system.get(&id).is_none() {
            debug!(id = %id, "Handle for unknown body rejected");
            return Err(OrbitError::UnknownBody(id));
        }
        Ok(self.scheduler.attach(id, handle))
    }

    pub fn detach(&mut self, id: &str) -> Option<H> {
        self.scheduler.detach(id)
    }

    pub fn handle(&self, id: &str) -> Option<&H> {
        self.scheduler.handle(id)
    }

    /// Add a body and refit. Its path is sampled immediately.
    pub fn add_body(&mut self, body: OrbitalBody) -> Result<(), OrbitError> {
        self.system.insert(body)?;
        self.fit.set_max_extent(self.system.max_semi_major_axis());
        Ok(())
    }

    /// Swap in new elements for an existing body, resample its path and
    /// refit. Its handle and spin are kept. Returns the old body.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::UnknownBody`] if no body has that identifier.
    pub fn replace_body(&mut self, body: OrbitalBody) -> Result<OrbitalBody, OrbitError> {
        let id = body.id().to_string();
        let old = self
            .system
            .replace(body)
            .ok_or(OrbitError::UnknownBody(id))?;
        self.fit.set_max_extent(self.system.max_semi_major_axis());
        Ok(old)
    }

    /// Remove a body, its handle and its spin, then refit.
    pub fn remove_body(&mut self, id: &str) -> Option<(OrbitalBody, Option<H>)> {
        let body = self.system.remove(id)?;
        let handle = self.scheduler.forget(id);
        self.fit.set_max_extent(self.system.max_semi_major_axis());
        Some((body, handle))
    }

    /// Swap in new orbit settings. Paths and the fill fraction follow.
    pub fn set_settings(&mut self, settings: SystemSettings) {
        let fill_fraction = settings.fill_fraction;
        self.system.set_settings(settings);
        self.fit.set_fill_fraction(fill_fraction);
    }

    /// Call `listener` with the new scale whenever the auto-fit scale changes.
    pub fn on_scale_change(&mut self, listener: impl FnMut(f64) + 'static) -> SubscriptionId {
        self.fit.subscribe(listener)
    }

    pub fn remove_scale_listener(&mut self, id: SubscriptionId) -> bool {
        self.fit.unsubscribe(id)
    }

    /// Advance by `delta` seconds and push transforms to attached handles.
    pub fn frame(&mut self, delta: f64) -> SceneFrame {
        let time = self.clock.advance(delta);
        self.step(time)
    }

    /// Advance by wall-clock time since the previous frame.
    pub fn frame_now(&mut self) -> SceneFrame {
        let time = self.clock.tick();
        self.step(time)
    }

    fn step(&mut self, time: FrameTime) -> SceneFrame {
        let scale = self.fit.scale();
        let report = self.scheduler.tick(&self.system, time.elapsed, scale);
        if let Some(eyes) = self.eyes.as_mut() {
            eyes.tick(time.delta);
        }
        if report.skipped > 0 {
            debug!(skipped = report.skipped, "Bodies without handles this frame");
        }
        SceneFrame {
            time,
            report,
            scale,
        }
    }

    /// Snapshot of every body at the current elapsed time.
    pub fn frame_state(&self) -> FrameState {
        FrameState::capture(&self.system, self.clock.elapsed(), self.fit.scale())
    }

    pub fn paths(&self) -> &PathCache {
        self.system.paths()
    }

    /// Uniform scale of the group holding the path geometry.
    pub fn group_scale(&self) -> f64 {
        self.system.group_scale(self.fit.scale())
    }

    /// Translation of the group holding the path geometry.
    pub fn group_center(&self) -> DVec3 {
        DVec3::from_array(self.system.settings().center)
    }

    pub fn system(&self) -> &OrbitSystem {
        &self.system
    }

    pub fn fit(&self) -> &ViewportFit {
        &self.fit
    }

    pub fn eyes(&self) -> Option<&EyePair> {
        self.eyes.as_ref()
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }
}
