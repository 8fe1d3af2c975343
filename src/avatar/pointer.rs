//! Ephemeral pointer interaction state.
//!
//! A session exists only between a press/touch-start and its release.
//! Drag and pinch are mutually exclusive: a second touch point cancels
//! an active drag, and dropping below two touches ends the pinch
//! without resuming the drag.

use crate::avatar::geometry::Vec2;

// ===== PointerSession =====

/// Interaction state between press and release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerSession {
    /// No button or touch held.
    Idle,
    /// Single-pointer drag; `offset` is pointer position minus
    /// translation at drag start, giving 1:1 tracking on every move.
    Drag {
        /// Pointer offset captured at drag start.
        offset: Vec2,
    },
    /// Two-finger pinch; `last_distance` is the running previous
    /// finger distance, updated after every move so incremental deltas
    /// do not accumulate drift against a stale baseline.
    Pinch {
        /// Finger distance observed by the previous move event.
        last_distance: f64,
    },
}

impl PointerSession {
    /// Whether a drag is active.
    pub fn is_drag(&self) -> bool {
        matches!(self, Self::Drag { .. })
    }

    /// Whether a pinch is active.
    pub fn is_pinch(&self) -> bool {
        matches!(self, Self::Pinch { .. })
    }
}

/// Distance between the first two touch points, if two are present.
pub fn pinch_distance(points: &[Vec2]) -> Option<f64> {
    match points {
        [first, second, ..] => Some(first.distance(*second)),
        _ => None,
    }
}

// ===== Tests =====
