//! Avatar editor engine.
//!
//! Owns the view state, the load lifecycle, and the pointer session,
//! and applies every interaction as a pure transition. There is exactly
//! one logical writer (the current interaction session) at any time:
//! drag and pinch are mutually exclusive by the touch-count rule, so no
//! locking is needed or used.
//!
//! Until an image load settles the editor is "not ready": interactions
//! and export are silent no-ops, guarding the race between user action
//! and image/layout readiness.

use crate::avatar::export::{
    encode_png_data_uri, render_crop, CropRegion, ExportError, ExportSettings,
};
use crate::avatar::geometry::{ImageMetrics, Vec2, Viewport};
use crate::avatar::pointer::{pinch_distance, PointerSession};
use crate::avatar::view_state::{ScaleRange, ViewState, BUTTON_STEP, PINCH_SENSITIVITY, WHEEL_STEP};
use image::DynamicImage;
use tracing::debug;

// ===== InteractionSettings =====

/// Tunable interaction constants.
///
/// Defaults are the pinned UX literals; the config layer may override
/// them, but expected behavior in tests is tied to the defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSettings {
    /// Scale step per wheel event.
    pub wheel_step: f64,
    /// Scale step per zoom-button click.
    pub button_step: f64,
    /// Scale delta per pixel of pinch-distance change.
    pub pinch_sensitivity: f64,
    /// Inclusive scale bounds.
    pub scale_range: ScaleRange,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            wheel_step: WHEEL_STEP,
            button_step: BUTTON_STEP,
            pinch_sensitivity: PINCH_SENSITIVITY,
            scale_range: ScaleRange::default(),
        }
    }
}

// ===== ImageLoad =====

/// Load lifecycle of the source image.
///
/// `Failed` is still "settled" so the shell can dismiss its loading
/// spinner; only `Ready` unlocks interactions and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLoad {
    /// No load has settled yet.
    Pending,
    /// The image decoded; natural size captured.
    Ready(ImageMetrics),
    /// The load errored. Reported upward as loaded-but-errored.
    Failed,
}

impl ImageLoad {
    /// Whether a load settled successfully.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Whether a load settled at all (success or failure).
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

// ===== AvatarEditor =====

/// Pan/zoom/crop editor over one source image.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarEditor {
    viewport: Viewport,
    load: ImageLoad,
    view: ViewState,
    session: PointerSession,
    interaction: InteractionSettings,
    export: ExportSettings,
}

impl AvatarEditor {
    /// Create a not-ready editor for the given viewport, with default
    /// settings.
    pub fn new(viewport: Viewport) -> Self {
        Self::with_settings(viewport, InteractionSettings::default(), ExportSettings::default())
    }

    /// Create a not-ready editor with explicit settings (normally the
    /// resolved config).
    pub fn with_settings(
        viewport: Viewport,
        interaction: InteractionSettings,
        export: ExportSettings,
    ) -> Self {
        Self {
            viewport,
            load: ImageLoad::Pending,
            view: ViewState::default(),
            session: PointerSession::Idle,
            interaction,
            export,
        }
    }

    /// Current load state.
    pub fn load(&self) -> ImageLoad {
        self.load
    }

    /// Whether interactions and export are unlocked.
    pub fn is_ready(&self) -> bool {
        self.load.is_ready()
    }

    /// Current view transform.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Current pointer session.
    pub fn session(&self) -> PointerSession {
        self.session
    }

    /// Viewport the editor was created for.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    // ===== Load lifecycle =====

    /// An image load completed with the given natural size.
    ///
    /// Resets the view to centered at scale 1.0. A completion arriving
    /// after a newer load was requested simply overwrites shared state:
    /// last write wins, no generation counter.
    pub fn image_loaded(&mut self, metrics: ImageMetrics) {
        debug!(
            width = metrics.natural_width,
            height = metrics.natural_height,
            "avatar image loaded"
        );
        self.load = ImageLoad::Ready(metrics);
        self.view = ViewState::centered(self.viewport, metrics);
        self.session = PointerSession::Idle;
    }

    /// An image load errored.
    pub fn image_failed(&mut self) {
        debug!("avatar image failed to load");
        self.load = ImageLoad::Failed;
        self.session = PointerSession::Idle;
    }

    // ===== Zoom =====

    /// Zoom to a target scale around the viewport center.
    pub fn zoom_to(&mut self, target: f64) {
        if !self.is_ready() {
            return;
        }
        self.view
            .zoom_to(target, self.viewport, self.interaction.scale_range);
    }

    /// Zoom-in button: one fixed step.
    pub fn zoom_in(&mut self) {
        self.zoom_to(self.view.scale() + self.interaction.button_step);
    }

    /// Zoom-out button: one fixed step.
    pub fn zoom_out(&mut self) {
        self.zoom_to(self.view.scale() - self.interaction.button_step);
    }

    /// Wheel event: one fixed step per event, direction from the delta
    /// sign. No momentum.
    pub fn wheel(&mut self, delta_y: f64) {
        let step = if delta_y > 0.0 {
            -self.interaction.wheel_step
        } else {
            self.interaction.wheel_step
        };
        self.zoom_to(self.view.scale() + step);
    }

    // ===== Mouse drag =====

    /// Mouse button pressed at a viewport position.
    pub fn pointer_down(&mut self, position: Vec2) {
        if !self.is_ready() {
            return;
        }
        self.session = PointerSession::Drag {
            offset: position - self.view.translation(),
        };
    }

    /// Mouse moved while the button is held. 1:1 tracking; each event
    /// recomputes translation from the current pointer position, so
    /// rapid repeated firing cannot accumulate drift.
    pub fn pointer_move(&mut self, position: Vec2) {
        if let PointerSession::Drag { offset } = self.session {
            self.view.pan_to(position - offset);
        }
    }

    /// Mouse button released.
    pub fn pointer_up(&mut self) {
        self.session = PointerSession::Idle;
    }

    // ===== Touch =====

    /// Touch points went down. Two or more points enter pinch mode,
    /// cancelling any active drag; a single point starts a drag.
    pub fn touch_start(&mut self, points: &[Vec2]) {
        if !self.is_ready() {
            return;
        }
        match pinch_distance(points) {
            Some(distance) => {
                self.session = PointerSession::Pinch {
                    last_distance: distance,
                };
            }
            None => {
                if let Some(&point) = points.first() {
                    self.session = PointerSession::Drag {
                        offset: point - self.view.translation(),
                    };
                }
            }
        }
    }

    /// Touch points moved.
    ///
    /// Pinch applies the incremental delta against the running previous
    /// distance and then advances it, avoiding zero-sum drift against a
    /// stale baseline.
    pub fn touch_move(&mut self, points: &[Vec2]) {
        match self.session {
            PointerSession::Pinch { last_distance } => {
                if let Some(distance) = pinch_distance(points) {
                    let delta = (distance - last_distance) * self.interaction.pinch_sensitivity;
                    self.view.zoom_to(
                        self.view.scale() + delta,
                        self.viewport,
                        self.interaction.scale_range,
                    );
                    self.session = PointerSession::Pinch {
                        last_distance: distance,
                    };
                }
            }
            PointerSession::Drag { offset } => {
                if let Some(&point) = points.first() {
                    self.view.pan_to(point - offset);
                }
            }
            PointerSession::Idle => {}
        }
    }

    /// Touch points lifted; `remaining` are the points still down.
    /// Dropping below two points ends a pinch without resuming any
    /// drag — a new press is required.
    pub fn touch_end(&mut self, remaining: &[Vec2]) {
        match self.session {
            PointerSession::Pinch { .. } if remaining.len() < 2 => {
                self.session = PointerSession::Idle;
            }
            PointerSession::Drag { .. } if remaining.is_empty() => {
                self.session = PointerSession::Idle;
            }
            _ => {}
        }
    }

    // ===== Reset / export =====

    /// Restore scale 1.0 and the centered translation, exactly as at
    /// initial load.
    pub fn reset(&mut self) {
        if let ImageLoad::Ready(metrics) = self.load {
            self.view = ViewState::centered(self.viewport, metrics);
        }
    }

    /// Image-space crop region under the circular guide, when ready.
    pub fn crop_region(&self) -> Option<CropRegion> {
        match self.load {
            ImageLoad::Ready(_) => Some(CropRegion::compute(
                self.viewport,
                &self.view,
                self.export.guide_ratio,
            )),
            _ => None,
        }
    }

    /// Export the crop as a PNG data URI.
    ///
    /// `Ok(None)` when no image is ready — a silent no-op, not an
    /// error. The caller forwards the URI to persistence.
    pub fn export_crop(&self, source: &DynamicImage) -> Result<Option<String>, ExportError> {
        let Some(region) = self.crop_region() else {
            debug!("avatar export requested before image ready; ignoring");
            return Ok(None);
        };
        let raster = render_crop(source, &region, self.export.output_size);
        let uri = encode_png_data_uri(&raster)?;
        debug!(size = self.export.output_size, "avatar crop exported");
        Ok(Some(uri))
    }
}

// ===== Tests =====
