//! Host wiring for the orrery: frame clock, blinking eyes, platform
//! directories, and the [`Scene`](scene::Scene) that ties the orbit engine to a
//! viewport and presentation handles.

pub mod blink;
pub mod frame_clock;
pub mod platform;
pub mod scene;
