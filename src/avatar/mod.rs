//! Avatar viewport transform and crop export.
//!
//! Maintains a 2D affine view (uniform scale plus translation) over a
//! source image inside a fixed viewport, driven by drag, pinch, wheel,
//! and button interactions, and exports a deterministic circular crop.
//! Pure geometry plus one imperative raster step; image loading and
//! persistence stay in the shell.

pub mod editor;
pub mod export;
pub mod geometry;
pub mod pointer;
pub mod source;
pub mod view_state;

// Re-export for convenience
pub use editor::{AvatarEditor, ImageLoad, InteractionSettings};
pub use export::{CropRegion, ExportError, ExportSettings};
pub use geometry::{ImageMetrics, Vec2, Viewport};
pub use pointer::PointerSession;
pub use source::{ImageSource, SourceError};
pub use view_state::{ScaleRange, ViewState};
