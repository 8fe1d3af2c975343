//! Deterministic crop-to-raster export.
//!
//! The geometry half ([`CropRegion`]) is pure: it maps the current view
//! back to an image-space square under the circular crop guide. The
//! imperative half samples that square into a fixed-resolution RGBA
//! raster with a circular alpha mask and encodes it as a PNG data URI
//! for the caller to forward to persistence.

use crate::avatar::geometry::{Vec2, Viewport};
use crate::avatar::view_state::ViewState;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{DynamicImage, Rgba, RgbaImage};
use std::io::Cursor;
use thiserror::Error;

/// Output raster side length in pixels.
pub const EXPORT_SIZE: u32 = 512;

/// Crop-guide circle radius as a fraction of the viewport's short side,
/// matching the visual guide overlay.
pub const CROP_GUIDE_RATIO: f64 = 0.45;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Export tunables.
///
/// Defaults match the UI's fixed 512×512 output and the 45% guide
/// circle drawn over the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSettings {
    /// Output raster side length in pixels.
    pub output_size: u32,
    /// Guide circle radius as a fraction of the viewport short side.
    pub guide_ratio: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_size: EXPORT_SIZE,
            guide_ratio: CROP_GUIDE_RATIO,
        }
    }
}

/// Error raised by the raster encode step.
#[derive(Debug, Error)]
pub enum ExportError {
    /// PNG encoding failed.
    #[error("failed to encode avatar raster: {0}")]
    Encode(#[from] image::ImageError),
}

// ===== CropRegion =====

/// Image-space circle under the viewport's crop guide.
///
/// The covered source square (side `2 * radius`, centered on `center`)
/// may extend outside the image bounds; no clamping is performed and
/// out-of-range samples come out transparent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    /// Circle center in source-image pixel coordinates.
    pub center: Vec2,
    /// Circle radius in source-image pixels.
    pub radius: f64,
}

impl CropRegion {
    /// Map the current view back to image space.
    ///
    /// Uses the viewport's short side so a non-square layout still
    /// yields the on-screen guide circle.
    pub fn compute(viewport: Viewport, view: &ViewState, guide_ratio: f64) -> Self {
        let viewport_size = viewport.min_side();
        let circle_radius = viewport_size * guide_ratio;
        let half = viewport_size / 2.0;
        let center = (Vec2::new(half, half) - view.translation()) * (1.0 / view.scale());
        Self {
            center,
            radius: circle_radius / view.scale(),
        }
    }
}

// ===== Raster export =====

/// Sample the crop region into a square RGBA raster.
///
/// Nearest-neighbour sampling; destination pixels outside the inscribed
/// circle, and samples outside the source bounds, are transparent.
pub fn render_crop(source: &DynamicImage, region: &CropRegion, output_size: u32) -> RgbaImage {
    let source = source.to_rgba8();
    let (source_width, source_height) = source.dimensions();
    let size = f64::from(output_size);
    let out_radius = size / 2.0;
    let side = 2.0 * region.radius;

    RgbaImage::from_fn(output_size, output_size, |x, y| {
        let px = f64::from(x) + 0.5;
        let py = f64::from(y) + 0.5;

        let dx = px - out_radius;
        let dy = py - out_radius;
        if dx * dx + dy * dy > out_radius * out_radius {
            return TRANSPARENT;
        }

        let sx = (region.center.x - region.radius + px / size * side).floor();
        let sy = (region.center.y - region.radius + py / size * side).floor();
        if sx < 0.0 || sy < 0.0 || sx >= f64::from(source_width) || sy >= f64::from(source_height)
        {
            return TRANSPARENT;
        }
        *source.get_pixel(sx as u32, sy as u32)
    })
}

/// Encode a raster as a `data:image/png;base64,...` URI.
pub fn encode_png_data_uri(raster: &RgbaImage) -> Result<String, ExportError> {
    let mut bytes = Vec::new();
    raster.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(&bytes)))
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::geometry::ImageMetrics;
    use crate::avatar::view_state::ScaleRange;
    use base64::Engine as _;

    fn viewport() -> Viewport {
        Viewport::new(280.0, 280.0)
    }

    fn centered_view() -> ViewState {
        ViewState::centered(viewport(), ImageMetrics::new(1000, 1000))
    }

    #[test]
    fn crop_region_at_scale_one_covers_the_image_center() {
        let region = CropRegion::compute(viewport(), &centered_view(), CROP_GUIDE_RATIO);
        assert_eq!(region.center, Vec2::new(500.0, 500.0));
        // 280 * 0.45 = 126 viewport pixels, at scale 1.
        assert_eq!(region.radius, 126.0);
    }

    #[test]
    fn crop_region_radius_shrinks_with_zoom() {
        let mut view = centered_view();
        view.zoom_to(2.0, viewport(), ScaleRange::default());
        let region = CropRegion::compute(viewport(), &view, CROP_GUIDE_RATIO);
        // Focal point unchanged, radius halved in image space.
        assert_eq!(region.center, Vec2::new(500.0, 500.0));
        assert_eq!(region.radius, 63.0);
    }

    #[test]
    fn crop_region_uses_the_short_viewport_side() {
        let wide = Viewport::new(400.0, 280.0);
        let view = ViewState::centered(wide, ImageMetrics::new(1000, 1000));
        let region = CropRegion::compute(wide, &view, CROP_GUIDE_RATIO);
        assert_eq!(region.radius, 126.0);
    }

    fn checker_source() -> DynamicImage {
        let raster = RgbaImage::from_fn(4, 4, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        DynamicImage::ImageRgba8(raster)
    }

    #[test]
    fn output_has_the_requested_size() {
        let region = CropRegion {
            center: Vec2::new(2.0, 2.0),
            radius: 2.0,
        };
        let raster = render_crop(&checker_source(), &region, 8);
        assert_eq!(raster.dimensions(), (8, 8));
    }

    #[test]
    fn corners_outside_the_circle_are_transparent() {
        let region = CropRegion {
            center: Vec2::new(2.0, 2.0),
            radius: 2.0,
        };
        let raster = render_crop(&checker_source(), &region, 8);
        assert_eq!(raster.get_pixel(0, 0)[3], 0);
        assert_eq!(raster.get_pixel(7, 0)[3], 0);
        assert_eq!(raster.get_pixel(0, 7)[3], 0);
        assert_eq!(raster.get_pixel(7, 7)[3], 0);
    }

    #[test]
    fn center_pixel_samples_the_region_center() {
        let region = CropRegion {
            center: Vec2::new(2.0, 2.0),
            radius: 1.0,
        };
        let raster = render_crop(&checker_source(), &region, 8);
        // Destination (4, 4) maps to source (2, 2): red on the checker.
        assert_eq!(*raster.get_pixel(4, 4), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn out_of_bounds_samples_are_transparent() {
        // Region centered on the image origin: three quadrants of the
        // source square fall outside the image.
        let region = CropRegion {
            center: Vec2::new(0.0, 0.0),
            radius: 2.0,
        };
        let raster = render_crop(&checker_source(), &region, 8);
        // Inside the circle but left of the image.
        assert_eq!(raster.get_pixel(1, 4)[3], 0);
        // Inside the circle and inside the image.
        assert_ne!(raster.get_pixel(6, 6)[3], 0);
    }

    #[test]
    fn data_uri_round_trips_through_the_decoder() {
        let raster = RgbaImage::from_pixel(16, 16, Rgba([10, 20, 30, 255]));
        let uri = encode_png_data_uri(&raster).expect("encode succeeds");
        let payload = uri
            .strip_prefix("data:image/png;base64,")
            .expect("data URI prefix");
        let bytes = BASE64.decode(payload).expect("valid base64");
        let decoded = image::load_from_memory(&bytes).expect("valid png");
        assert_eq!(decoded.width(), 16);
        assert_eq!(decoded.height(), 16);
    }
}
