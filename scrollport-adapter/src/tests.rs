use crate::*;

use proptest::prelude::*;
use scrollport::{
    Axis, ChangeViewOptions, ContentPresenter, ElementId, Error, LogicalOffsetProvider,
    ManipulationConfiguration, ManipulationKind, ScrollProvider, ScrollStep, ScrollViewerOptions,
    Size, SnapPointsSource, ZoomMode,
};

fn controller(options: ScrollViewerOptions, content: Size) -> Controller {
    let mut c = Controller::new(options).unwrap();
    c.viewer_mut()
        .set_scroll_provider(Some(Box::new(ContentPresenter::new(
            content,
            Size::new(500.0, 500.0),
        ))))
        .unwrap();
    c.viewer_mut().set_content(Some(ElementId(1)));
    c
}

fn big() -> Controller {
    controller(ScrollViewerOptions::new(), Size::new(2000.0, 2000.0))
}

fn session_kind(c: &Controller) -> Option<ManipulationKind> {
    c.viewer().manipulation().session().map(|s| s.kind)
}

#[test]
fn animated_change_view_tweens_to_target() {
    let mut c = big();
    assert!(
        c.change_view(None, Some(600.0), None, ChangeViewOptions::default(), 0)
            .unwrap()
    );
    assert!(c.is_animating());
    assert_eq!(session_kind(&c), Some(ManipulationKind::BringIntoViewport));

    let mut last = 0.0;
    for now_ms in (0..=300).step_by(25) {
        if let Some(view) = c.tick(now_ms).unwrap() {
            assert!(view.vertical_offset >= last);
            last = view.vertical_offset;
        }
    }
    assert!(!c.is_animating());
    assert_eq!(c.viewer().vertical_offset(), 600.0);
    assert!(!c.viewer().manipulation().is_manipulating());
    assert!(c.viewer().pending_change_view().is_none());
}

#[test]
fn immediate_change_view_lands_in_one_pump() {
    let mut c = big();
    assert!(
        c.change_view(
            Some(100.0),
            Some(200.0),
            None,
            ChangeViewOptions::immediate(),
            0
        )
        .unwrap()
    );
    assert!(!c.is_animating());
    assert_eq!(c.viewer().horizontal_offset(), 100.0);
    assert_eq!(c.viewer().vertical_offset(), 200.0);
    assert!(!c.compositor().has_commands());
    assert_eq!(c.tick(16).unwrap(), None);
}

#[test]
fn retargeting_a_running_animation_keeps_one_session() {
    let mut c = big().with_animation(200, Easing::Linear);
    c.change_view(None, Some(400.0), None, ChangeViewOptions::default(), 0)
        .unwrap();
    c.tick(100).unwrap();
    assert_eq!(c.viewer().vertical_offset(), 200.0);

    c.change_view(None, Some(1000.0), None, ChangeViewOptions::default(), 100)
        .unwrap();
    assert!(c.is_animating());
    c.tick(200).unwrap();
    assert_eq!(c.viewer().vertical_offset(), 600.0);
    c.tick(300).unwrap();
    assert_eq!(c.viewer().vertical_offset(), 1000.0);
    assert!(!c.viewer().manipulation().is_manipulating());
}

#[test]
fn skip_animation_while_running_jumps() {
    let mut c = big().with_animation(200, Easing::Linear);
    c.change_view(None, Some(400.0), None, ChangeViewOptions::default(), 0)
        .unwrap();
    c.tick(100).unwrap();
    let options = ChangeViewOptions::default().with_skip_animation_while_running(true);
    c.change_view(None, Some(800.0), None, options, 100).unwrap();
    assert!(!c.is_animating());
    assert_eq!(c.viewer().vertical_offset(), 800.0);
}

#[test]
fn declined_bring_into_viewport_applies_directly() {
    let mut c = big();
    c.compositor().set_accepts_bring_into_viewport(false);
    assert!(
        c.change_view(None, Some(300.0), None, ChangeViewOptions::default(), 0)
            .unwrap()
    );
    assert!(!c.is_animating());
    assert!(!c.viewer().manipulation().is_manipulating());
    assert_eq!(c.viewer().vertical_offset(), 300.0);
}

#[test]
fn fast_release_continues_as_inertia() {
    let mut c = big();
    let configuration = c.begin_touch(0).unwrap();
    assert!(configuration.contains(ManipulationConfiguration::INERTIA_PAN));
    assert!(c.is_touching());
    assert_eq!(session_kind(&c), Some(ManipulationKind::Gesture));

    c.touch_move(0.0, -100.0, 100).unwrap();
    assert_eq!(c.viewer().vertical_offset(), 100.0);

    c.release_touch(100).unwrap();
    assert!(c.is_animating());
    let session = c.viewer().manipulation().session().unwrap();
    assert!(session.is_inertial);
    assert_eq!(session.inertia_end.map(|v| v.vertical_offset), Some(350.0));

    let view = c.tick(600).unwrap().unwrap();
    assert_eq!(view.vertical_offset, 350.0);
    assert!(!c.is_animating());
    assert!(!c.viewer().manipulation().is_manipulating());
}

#[test]
fn release_after_a_pause_completes_without_inertia() {
    let mut c = big();
    c.begin_touch(0).unwrap();
    c.touch_move(0.0, -100.0, 100).unwrap();
    c.release_touch(400).unwrap();
    assert!(!c.is_animating());
    assert!(!c.viewer().manipulation().is_manipulating());
    assert_eq!(c.viewer().vertical_offset(), 100.0);
}

#[test]
fn first_move_locks_a_rail() {
    let mut c = big();
    c.begin_touch(0).unwrap();
    c.touch_move(-100.0, 10.0, 16).unwrap();
    assert_eq!(c.viewer().horizontal_offset(), 100.0);
    assert_eq!(c.viewer().vertical_offset(), 0.0);
    c.touch_move(0.0, -50.0, 32).unwrap();
    assert_eq!(c.viewer().vertical_offset(), 0.0);
    c.touch_move(40.0, 0.0, 48).unwrap();
    assert_eq!(c.viewer().horizontal_offset(), 60.0);
    c.release_touch(500).unwrap();
}

#[test]
fn touch_without_offered_configuration_fails() {
    let mut c = Controller::new(ScrollViewerOptions::new()).unwrap();
    assert!(matches!(
        c.begin_touch(0),
        Err(Error::InvalidOperation { .. })
    ));
    assert!(matches!(
        c.touch_move(0.0, 10.0, 0),
        Err(Error::InvalidOperation { .. })
    ));
}

#[test]
fn pinch_zooms_when_offered() {
    let options = ScrollViewerOptions::new().with_zoom_mode(ZoomMode::Enabled);
    let mut c = controller(options, Size::new(2000.0, 2000.0));
    let configuration = c.begin_touch(0).unwrap();
    assert!(configuration.contains(ManipulationConfiguration::ZOOM));
    c.touch_zoom(2.0, 16).unwrap();
    assert_eq!(c.viewer().zoom_factor(), 2.0);
    c.release_touch(500).unwrap();
    assert_eq!(c.viewer().zoom_factor(), 2.0);

    let mut plain = big();
    plain.begin_touch(0).unwrap();
    plain.touch_zoom(2.0, 16).unwrap();
    assert_eq!(plain.viewer().zoom_factor(), 1.0);
}

#[test]
fn constant_velocity_pans_until_stopped() {
    let mut c = big();
    c.set_constant_velocities(0.0, 100.0, 0).unwrap();
    assert!(c.is_animating());
    assert_eq!(session_kind(&c), Some(ManipulationKind::ConstantVelocity));

    c.tick(500).unwrap();
    assert_eq!(c.viewer().vertical_offset(), 50.0);

    c.set_constant_velocities(0.0, 200.0, 500).unwrap();
    c.tick(1000).unwrap();
    assert_eq!(c.viewer().vertical_offset(), 150.0);

    c.set_constant_velocities(0.0, 0.0, 1000).unwrap();
    assert!(!c.is_animating());
    assert!(!c.viewer().manipulation().is_manipulating());
    assert_eq!(c.viewer().vertical_offset(), 150.0);
}

#[test]
fn stop_inertia_ends_the_session() {
    let mut c = big();
    c.begin_touch(0).unwrap();
    c.touch_move(0.0, -100.0, 100).unwrap();
    c.release_touch(100).unwrap();
    assert!(c.is_animating());

    c.stop_inertia(150).unwrap();
    assert!(!c.is_animating());
    assert!(!c.viewer().manipulation().is_manipulating());
    assert_eq!(c.viewer().vertical_offset(), 100.0);
}

#[test]
fn compositor_records_notifications() {
    let c = big();
    let compositor = c.compositor();
    assert!(compositor.capabilities().by_touch);
    assert!(!compositor.configurations().touch.is_empty());
    assert_eq!(compositor.manipulatable_element(), Some(ElementId(1)));
    assert_eq!(
        compositor.primary_content().map(|p| p.content_size),
        Some(Size::new(2000.0, 2000.0))
    );

    let viewer = c.into_viewer();
    assert!(!viewer.has_compositor());
}

#[test]
fn items_provider_scrolls_in_items() {
    let mut c = Controller::new(ScrollViewerOptions::new()).unwrap();
    let items =
        UniformItemsProvider::new(Axis::Vertical, 100, 50.0, 500.0, Size::new(500.0, 500.0))
            .unwrap();
    c.viewer_mut()
        .set_scroll_provider(Some(Box::new(items)))
        .unwrap();
    c.viewer_mut().set_content(Some(ElementId(1)));

    assert_eq!(c.viewer().extent(Axis::Vertical), 100.0);
    assert_eq!(c.viewer().viewport(Axis::Vertical), 10.0);

    c.change_view(None, Some(12.0), None, ChangeViewOptions::immediate(), 0)
        .unwrap();
    assert_eq!(c.viewer().vertical_offset(), 12.0);
    assert_eq!(
        c.viewer().viewport_model().pixel_offset(Axis::Vertical),
        600.0
    );

    c.begin_touch(0).unwrap();
    c.touch_move(0.0, -100.0, 100).unwrap();
    c.release_touch(400).unwrap();
    assert_eq!(c.viewer().vertical_offset(), 14.0);
}

#[test]
fn items_provider_steps_and_snap_points() {
    let mut items =
        UniformItemsProvider::new(Axis::Vertical, 100, 50.0, 800.0, Size::new(500.0, 500.0))
            .unwrap();
    items.step(ScrollStep::LineDown).unwrap();
    assert_eq!(items.offset(Axis::Vertical), 1.0);
    items.step(ScrollStep::PageDown).unwrap();
    assert_eq!(items.offset(Axis::Vertical), 11.0);
    items.step(ScrollStep::LineRight).unwrap();
    assert_eq!(items.offset(Axis::Horizontal), scrollport::LINE_DELTA);
    items.step(ScrollStep::End).unwrap();
    assert_eq!(items.offset(Axis::Vertical), 90.0);
    assert_eq!(items.first_visible_item(), 90);

    items.set_item_count(50);
    assert_eq!(items.offset(Axis::Vertical), 40.0);

    let source = items.snap_points_source().unwrap();
    assert_eq!(
        source.snap_points(Axis::Vertical, scrollport::SnapPointsAlignment::Center),
        Some(scrollport::SnapPoints::Regular {
            offset: 25.0,
            interval: 50.0
        })
    );
    assert_eq!(
        source.snap_points(Axis::Horizontal, scrollport::SnapPointsAlignment::Near),
        None
    );
    assert!(
        UniformItemsProvider::new(Axis::Vertical, 1, 0.0, 0.0, Size::new(1.0, 1.0)).is_err()
    );
}

#[test]
fn horizontal_items_home_and_end_follow_the_orientation() {
    let mut items =
        UniformItemsProvider::new(Axis::Horizontal, 100, 50.0, 800.0, Size::new(500.0, 500.0))
            .unwrap();
    items.step(ScrollStep::LineDown).unwrap();
    assert_eq!(items.offset(Axis::Vertical), scrollport::LINE_DELTA);
    items.step(ScrollStep::End).unwrap();
    assert_eq!(items.offset(Axis::Horizontal), 90.0);
    assert_eq!(items.offset(Axis::Vertical), scrollport::LINE_DELTA);
    assert_eq!(items.first_visible_item(), 90);
    items.step(ScrollStep::Home).unwrap();
    assert_eq!(items.offset(Axis::Horizontal), 0.0);
    assert_eq!(items.offset(Axis::Vertical), scrollport::LINE_DELTA);
}

#[test]
fn easing_endpoints_and_tween_retarget() {
    for easing in [
        Easing::Linear,
        Easing::SmoothStep,
        Easing::EaseInOutCubic,
        Easing::EaseOutQuad,
    ] {
        assert_eq!(easing.sample(0.0), 0.0);
        assert_eq!(easing.sample(1.0), 1.0);
    }
    assert_eq!(Easing::EaseOutQuad.sample(0.5), 0.75);

    let from = scrollport::View::new(0.0, 0.0, 1.0);
    let mut tween = Tween::new(
        from,
        scrollport::View::new(0.0, 100.0, 1.0),
        0,
        100,
        Easing::Linear,
    );
    assert_eq!(tween.sample(50).vertical_offset, 50.0);
    tween.retarget(50, scrollport::View::new(0.0, 250.0, 1.0), 100);
    assert_eq!(tween.sample(50).vertical_offset, 50.0);
    assert_eq!(tween.sample(100).vertical_offset, 150.0);
    assert!(tween.is_done(150));
    assert_eq!(tween.sample(400).vertical_offset, 250.0);
}

proptest! {
    #[test]
    fn items_provider_offsets_stay_in_range(
        count in 0usize..500,
        offset in -1000.0f64..1000.0,
        zoom in 0.5f32..4.0,
    ) {
        let mut items =
            UniformItemsProvider::new(Axis::Vertical, count, 40.0, 300.0, Size::new(300.0, 400.0))
                .unwrap();
        items.set_zoom_factor(zoom).unwrap();
        items.set_offset(Axis::Vertical, offset).unwrap();
        let max = (items.extent(Axis::Vertical) - items.viewport(Axis::Vertical)).max(0.0);
        let got = items.offset(Axis::Vertical);
        prop_assert!(got >= 0.0);
        prop_assert!(got <= max);
    }

    #[test]
    fn items_provider_logical_offsets_round_trip(
        offset in 0.0f64..1000.0,
        item_extent in 1.0f64..200.0,
        zoom in 0.5f32..4.0,
    ) {
        let mut items = UniformItemsProvider::new(
            Axis::Vertical,
            1000,
            item_extent,
            300.0,
            Size::new(300.0, 400.0),
        )
        .unwrap();
        items.set_zoom_factor(zoom).unwrap();
        let back = items.compute_logical_offset(items.compute_pixel_offset(offset));
        prop_assert!((back - offset).abs() <= 1e-9 * offset.max(1.0));
        let pixel = offset * item_extent;
        let again = items.compute_pixel_offset(items.compute_logical_offset(pixel));
        prop_assert!((again - pixel).abs() <= 1e-9 * pixel.max(1.0));
    }

    #[test]
    fn touch_pans_never_leave_the_scrollable_range(
        moves in proptest::collection::vec((-400.0f64..400.0, -400.0f64..400.0), 1..12),
    ) {
        let mut c = big();
        c.begin_touch(0).unwrap();
        for (i, (dx, dy)) in moves.into_iter().enumerate() {
            c.touch_move(dx, dy, (i as u64 + 1) * 16).unwrap();
        }
        c.release_touch(10_000).unwrap();
        for axis in Axis::BOTH {
            let offset = c.viewer().offset(axis);
            prop_assert!((0.0..=1500.0).contains(&offset));
        }
    }
}

#[cfg(feature = "tracing")]
mod logging {
    use super::*;

    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Metadata, Subscriber};

    #[derive(Clone, Default)]
    struct Messages(Arc<Mutex<Vec<String>>>);

    struct MessageVisitor<'a>(&'a mut Option<String>);

    impl Visit for MessageVisitor<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn core::fmt::Debug) {
            if field.name() == "message" {
                *self.0 = Some(format!("{value:?}"));
            }
        }
    }

    impl Subscriber for Messages {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _span: &Attributes<'_>) -> Id {
            Id::from_u64(1)
        }

        fn record(&self, _span: &Id, _values: &Record<'_>) {}

        fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

        fn event(&self, event: &Event<'_>) {
            if event.metadata().target() != "scrollport_adapter" {
                return;
            }
            let mut message = None;
            event.record(&mut MessageVisitor(&mut message));
            if let Some(message) = message {
                self.0.lock().unwrap().push(message);
            }
        }

        fn enter(&self, _span: &Id) {}

        fn exit(&self, _span: &Id) {}
    }

    #[test]
    fn controller_logs_motion_transitions() {
        let messages = Messages::default();
        let sink = Arc::clone(&messages.0);
        tracing::subscriber::with_default(messages, || {
            let mut c = big();
            c.begin_touch(0).unwrap();
            c.touch_move(0.0, -100.0, 100).unwrap();
            c.release_touch(100).unwrap();
            c.tick(600).unwrap();
            c.set_constant_velocities(0.0, 50.0, 700).unwrap();
            c.cancel_motion().unwrap();
        });
        let messages = sink.lock().unwrap();
        for expected in [
            "touch started",
            "inertia started",
            "motion finished",
            "constant velocity started",
            "motion cancelled",
        ] {
            assert!(
                messages.iter().any(|m| m == expected),
                "missing {expected:?} in {messages:?}"
            );
        }
    }
}
