//! Property-based tests for the avatar view transform invariants.
//!
//! Scale clamping, focal-point-anchored zoom, 1:1 drag tracking, and
//! reset-to-centered must hold for any interaction history, not just
//! the handful of sequences the unit tests walk through.

use crate::avatar::editor::AvatarEditor;
use crate::avatar::geometry::{ImageMetrics, Vec2, Viewport};
use crate::avatar::view_state::{MAX_SCALE, MIN_SCALE};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-6;

fn ready_editor() -> AvatarEditor {
    let mut editor = AvatarEditor::new(Viewport::new(280.0, 280.0));
    editor.image_loaded(ImageMetrics::new(1000, 1000));
    editor
}

proptest! {
    #[test]
    fn requested_scale_is_always_clamped(target in -100.0f64..100.0) {
        let mut editor = ready_editor();
        editor.zoom_to(target);
        let scale = editor.view().scale();
        prop_assert!((MIN_SCALE..=MAX_SCALE).contains(&scale));
    }

    #[test]
    fn zoom_round_trip_restores_translation(
        target in 0.1f64..4.0,
        dx in -500.0f64..500.0,
        dy in -500.0f64..500.0,
    ) {
        let mut editor = ready_editor();
        editor.pointer_down(Vec2::ZERO);
        editor.pointer_move(Vec2::new(dx, dy));
        editor.pointer_up();
        let before = editor.view().translation();

        editor.zoom_to(target);
        editor.zoom_to(1.0);

        let after = editor.view().translation();
        prop_assert!((after.x - before.x).abs() < TOLERANCE);
        prop_assert!((after.y - before.y).abs() < TOLERANCE);
    }

    #[test]
    fn zoom_keeps_the_focal_point_under_the_viewport_center(
        target in 0.1f64..4.0,
        dx in -200.0f64..200.0,
        dy in -200.0f64..200.0,
    ) {
        let mut editor = ready_editor();
        editor.pointer_down(Vec2::ZERO);
        editor.pointer_move(Vec2::new(dx, dy));
        editor.pointer_up();

        // Image-space point under the viewport center before the zoom.
        let view = editor.view();
        let center = Vec2::new(140.0, 140.0);
        let focal = (center - view.translation()) * (1.0 / view.scale());

        editor.zoom_to(target);

        // The same image point must map back to the viewport center.
        let view = editor.view();
        let screen = focal * view.scale() + view.translation();
        prop_assert!((screen.x - center.x).abs() < TOLERANCE);
        prop_assert!((screen.y - center.y).abs() < TOLERANCE);
    }

    #[test]
    fn drag_moves_translation_by_the_pointer_delta(
        dx in -400.0f64..400.0,
        dy in -400.0f64..400.0,
    ) {
        let mut editor = ready_editor();
        let initial = editor.view().translation();

        editor.pointer_down(Vec2::new(7.0, 9.0));
        editor.pointer_move(Vec2::new(7.0 + dx, 9.0 + dy));

        let moved = editor.view().translation();
        prop_assert!((moved.x - (initial.x + dx)).abs() < TOLERANCE);
        prop_assert!((moved.y - (initial.y + dy)).abs() < TOLERANCE);
    }

    #[test]
    fn reset_restores_the_centered_view_after_any_history(
        target in 0.1f64..4.0,
        dx in -400.0f64..400.0,
        dy in -400.0f64..400.0,
    ) {
        let mut editor = ready_editor();
        editor.pointer_down(Vec2::ZERO);
        editor.pointer_move(Vec2::new(dx, dy));
        editor.pointer_up();
        editor.zoom_to(target);

        editor.reset();

        prop_assert_eq!(editor.view().scale(), 1.0);
        prop_assert_eq!(editor.view().translation(), Vec2::new(-360.0, -360.0));
    }
}
