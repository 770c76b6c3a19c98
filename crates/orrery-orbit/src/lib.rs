//! Orbital motion and auto-framing for the decorative orrery scene.
//!
//! Bodies follow closed-form elliptical orbits with independent elements. This
//! crate samples each orbit into a closed polyline, evaluates per-frame body
//! positions, fits the whole system to the viewport, and pushes transforms into
//! whatever presentation handles the host attaches.

mod autofit;
mod body;
mod error;
mod kepler;
mod path;
pub mod presets;
mod scheduler;
mod system;

pub use autofit::{
    DEFAULT_FILL_FRACTION, MAX_FILL_FRACTION, MIN_FILL_FRACTION, SAFETY_MARGIN, SubscriptionId,
    ViewportFit, compute_scale, is_valid_viewport,
};
pub use body::{BodyDef, Direction, OrbitalBody, RingAnnotation, ScreenOrientation};
pub use error::OrbitError;
pub use kepler::{
    BodySample, DEFAULT_TILT_SCALE, Placement, SPIN_PER_TICK, evaluate, orbit_progress,
    orbital_transform, planar_point,
};
pub use path::{DEFAULT_PATH_SEGMENTS, OrbitPath, PathCache, PathVertex, sample_path};
pub use scheduler::{BodyFrame, FrameScheduler, FrameState, PresentationHandle, TickReport};
pub use system::{OrbitSystem, SystemSettings};
