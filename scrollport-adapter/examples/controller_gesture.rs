use scrollport::{
    Axis, ChangeViewOptions, ElementId, ScrollViewerOptions, Size, SnapPointsAlignment,
    SnapPointsType,
};
use scrollport_adapter::{Controller, Easing, UniformItemsProvider};

fn main() -> scrollport::Result<()> {
    // A list of 1000 rows, 40px each, in a 320x480 window. Rows are mandatory snap points.
    //
    // An adapter would:
    // - feed pointer events into begin_touch / touch_move / release_touch
    // - call tick(now_ms) every frame while is_animating()
    // - render rows starting at the viewer's (logical) vertical offset
    let options = ScrollViewerOptions::new()
        .with_snap_points(
            Axis::Vertical,
            SnapPointsType::Mandatory,
            SnapPointsAlignment::Near,
        )
        .with_on_view_changed(Some(|e: &scrollport::ViewChangedEvent| {
            if !e.is_intermediate {
                println!("settled at {:?}", e.view);
            }
        }));
    let mut c = Controller::new(options)?.with_animation(240, Easing::SmoothStep);
    let items =
        UniformItemsProvider::new(Axis::Vertical, 1000, 40.0, 320.0, Size::new(320.0, 480.0))?;
    c.viewer_mut().set_scroll_provider(Some(Box::new(items)))?;
    c.viewer_mut().set_content(Some(ElementId(1)));

    // Flick upwards: 60px in 16ms, then let go.
    let mut now_ms = 0u64;
    c.begin_touch(now_ms)?;
    for _ in 0..4 {
        now_ms += 16;
        c.touch_move(0.0, -60.0, now_ms)?;
    }
    c.release_touch(now_ms)?;
    println!("released at row {:.2}", c.viewer().vertical_offset());

    while c.is_animating() {
        now_ms += 16;
        if let Some(view) = c.tick(now_ms)? {
            if now_ms % 80 == 0 {
                println!("t={now_ms} row={:.2}", view.vertical_offset);
            }
        }
    }

    // Jump to row 500 with an animated change.
    c.change_view(None, Some(500.0), None, ChangeViewOptions::default(), now_ms)?;
    while c.is_animating() {
        now_ms += 16;
        c.tick(now_ms)?;
    }
    println!(
        "done: row={} pixel={}",
        c.viewer().vertical_offset(),
        c.viewer().viewport_model().pixel_offset(Axis::Vertical)
    );
    Ok(())
}
