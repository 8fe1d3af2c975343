//! Pan/zoom view state over a source image.
//!
//! `ViewState` is the owned state the shell binds to its reactive
//! primitive; every mutation goes through a pure transition function.
//! The clamping invariant (scale within bounds, zoom anchored on the
//! viewport-center focal point) holds after every transition.

use crate::avatar::geometry::{ImageMetrics, Vec2, Viewport};

// ===== Interaction constants =====

/// Lower scale bound.
pub const MIN_SCALE: f64 = 0.1;

/// Upper scale bound.
pub const MAX_SCALE: f64 = 4.0;

/// Scale step per wheel event.
pub const WHEEL_STEP: f64 = 0.08;

/// Scale step per zoom-button click.
pub const BUTTON_STEP: f64 = 0.1;

/// Scale delta per pixel of pinch-distance change.
///
/// Empirically tuned UX constant; tests pin the literal value, so it is
/// preserved rather than re-derived.
pub const PINCH_SENSITIVITY: f64 = 0.004;

// ===== ScaleRange =====

/// Inclusive scale bounds applied by every zoom transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRange {
    /// Smallest allowed scale.
    pub min: f64,
    /// Largest allowed scale.
    pub max: f64,
}

impl ScaleRange {
    /// Clamp a requested scale to the range.
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self {
            min: MIN_SCALE,
            max: MAX_SCALE,
        }
    }
}

// ===== ViewState =====

/// Affine view over the source image: uniform scale plus translation in
/// viewport pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    scale: f64,
    translation: Vec2,
}

impl Default for ViewState {
    /// Identity view used before an image load settles.
    fn default() -> Self {
        Self {
            scale: 1.0,
            translation: Vec2::ZERO,
        }
    }
}

impl ViewState {
    /// View for a freshly loaded image: scale 1.0, image centered in
    /// the viewport.
    pub fn centered(viewport: Viewport, image: ImageMetrics) -> Self {
        Self {
            scale: 1.0,
            translation: viewport.center() - image.size() * 0.5,
        }
    }

    /// Current scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current translation in viewport pixel space.
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Zoom to a target scale, keeping the image point under the
    /// viewport center fixed.
    ///
    /// The target is clamped to `range` first. Holds for any zoom
    /// origin — buttons, wheel, or pinch all funnel through here.
    pub fn zoom_to(&mut self, target: f64, viewport: Viewport, range: ScaleRange) {
        let new_scale = range.clamp(target);
        let center = viewport.center();
        // Image-space point currently under the viewport center.
        let focal = (center - self.translation) * (1.0 / self.scale);
        self.translation = center - focal * new_scale;
        self.scale = new_scale;
    }

    /// Move the image to an absolute translation (drag/pan).
    ///
    /// Intentionally moves the focal point; no clamping is applied to
    /// translation.
    pub fn pan_to(&mut self, translation: Vec2) {
        self.translation = translation;
    }
}

// ===== Tests =====
