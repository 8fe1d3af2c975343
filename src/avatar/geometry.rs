//! 2D pixel-space primitives for the avatar view transform.

use std::ops::{Add, Mul, Sub};

// ===== Vec2 =====

/// 2D vector/point in pixels.
///
/// Used for both viewport-space and image-space coordinates; the view
/// transform maps between the two. f64 everywhere so repeated
/// recomputation stays within display tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vec2 {
    /// Origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a vector from components.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Vec2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between two points.
    pub fn midpoint(&self, other: Vec2) -> Vec2 {
        Vec2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

// ===== Viewport =====

/// Fixed on-screen region the image is panned and scaled within.
///
/// Square in practice; `min_side` guards non-square layouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Rendered width in pixels.
    pub width: f64,
    /// Rendered height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport from rendered dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Geometric center in viewport space.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Smaller of the rendered width and height.
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

// ===== ImageMetrics =====

/// Natural pixel size of a loaded source image.
///
/// Captured once when the load settles and immutable afterward; loading
/// a new image replaces it and resets the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMetrics {
    /// Natural width in pixels.
    pub natural_width: u32,
    /// Natural height in pixels.
    pub natural_height: u32,
}

impl ImageMetrics {
    /// Create metrics from natural dimensions.
    pub fn new(natural_width: u32, natural_height: u32) -> Self {
        Self {
            natural_width,
            natural_height,
        }
    }

    /// Natural size as a vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(f64::from(self.natural_width), f64::from(self.natural_height))
    }
}

// ===== Tests =====
