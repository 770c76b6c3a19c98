//! Viewport auto-fit: one uniform scale so the largest orbit stays on screen.

use tracing::debug;

/// Fixed margin so tilted orbits do not clip at the viewport diagonal.
pub const SAFETY_MARGIN: f64 = 0.9;

/// Default fraction of the short viewport side the system should span.
pub const DEFAULT_FILL_FRACTION: f64 = 0.7;

pub const MIN_FILL_FRACTION: f64 = 0.2;
pub const MAX_FILL_FRACTION: f64 = 0.95;

/// Whether a viewport size can be fitted against.
pub fn is_valid_viewport(width: f64, height: f64) -> bool {
    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}

fn clamp_fill(fill_fraction: f64) -> f64 {
    if fill_fraction.is_nan() {
        DEFAULT_FILL_FRACTION
    } else {
        fill_fraction.clamp(MIN_FILL_FRACTION, MAX_FILL_FRACTION)
    }
}

/// Scale that makes an orbit of radius `max_semi_major_axis` span
/// `fill_fraction` of the shorter viewport side (less the safety margin).
///
/// Returns `1.0` when there is nothing to fit or the viewport is degenerate.
pub fn compute_scale(
    viewport_width: f64,
    viewport_height: f64,
    max_semi_major_axis: f64,
    fill_fraction: f64,
) -> f64 {
    if !is_valid_viewport(viewport_width, viewport_height) {
        return 1.0;
    }
    if !(max_semi_major_axis.is_finite() && max_semi_major_axis > 0.0) {
        return 1.0;
    }
    let target_radius =
        viewport_width.min(viewport_height) * clamp_fill(fill_fraction) * 0.5 * SAFETY_MARGIN;
    target_radius / max_semi_major_axis
}

/// Handle returned by [`ViewportFit::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ScaleListener = Box<dyn FnMut(f64)>;

/// Current auto-fit scale, kept up to date as the viewport or the body set
/// changes.
///
/// A degenerate viewport (zero or negative size, as seen mid-layout) keeps the
/// last valid scale; before any valid size arrives the scale is `1.0`.
/// Listeners run only when the scale actually changes.
pub struct ViewportFit {
    width: f64,
    height: f64,
    max_extent: f64,
    fill_fraction: f64,
    scale: f64,
    listeners: Vec<(SubscriptionId, ScaleListener)>,
    next_id: u64,
}

impl ViewportFit {
    pub fn new(max_extent: f64, fill_fraction: f64) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            max_extent,
            fill_fraction,
            scale: 1.0,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Current uniform scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Last valid viewport size, `(0, 0)` if none was seen yet.
    pub fn viewport(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn max_extent(&self) -> f64 {
        self.max_extent
    }

    pub fn fill_fraction(&self) -> f64 {
        self.fill_fraction
    }

    /// Apply a new viewport size and return the resulting scale.
    pub fn resize(&mut self, width: f64, height: f64) -> f64 {
        if !is_valid_viewport(width, height) {
            debug!(width, height, scale = self.scale, "Degenerate viewport, keeping scale");
            return self.scale;
        }
        self.width = width;
        self.height = height;
        self.recompute()
    }

    /// Update the largest orbital extent, e.g. after bodies were added.
    pub fn set_max_extent(&mut self, max_extent: f64) -> f64 {
        self.max_extent = max_extent;
        self.recompute()
    }

    pub fn set_fill_fraction(&mut self, fill_fraction: f64) -> f64 {
        self.fill_fraction = fill_fraction;
        self.recompute()
    }

    /// Register a listener called with the new scale whenever it changes.
    pub fn subscribe(&mut self, listener: impl FnMut(f64) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn recompute(&mut self) -> f64 {
        if !is_valid_viewport(self.width, self.height) {
            return self.scale;
        }
        let next = compute_scale(self.width, self.height, self.max_extent, self.fill_fraction);
        if next != self.scale {
            debug!(
                width = self.width,
                height = self.height,
                from = self.scale,
                to = next,
                "Auto-fit scale changed"
            );
            self.scale = next;
            for (_, listener) in &mut self.listeners {
                listener(next);
            }
        }
        self.scale
    }
}

impl std::fmt::Debug for ViewportFit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportFit")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("max_extent", &self.max_extent)
            .field("fill_fraction", &self.fill_fraction)
            .field("scale", &self.scale)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
