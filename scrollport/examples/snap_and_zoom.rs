use scrollport::{
    Axis, ChangeViewOptions, ContentPresenter, ElementId, Rect, ScrollViewer,
    ScrollViewerOptions, Size, SnapPoints, SnapPointsAlignment, SnapPointsType, ZoomMode,
};

fn main() -> scrollport::Result<()> {
    // A 600x3000 page of 150px cards in a 600x450 window, without a compositor: every change
    // is applied synchronously.
    let options = ScrollViewerOptions::new()
        .with_zoom_mode(ZoomMode::Enabled)
        .with_snap_points(
            Axis::Vertical,
            SnapPointsType::Mandatory,
            SnapPointsAlignment::Near,
        )
        .with_on_view_changed(Some(|e: &scrollport::ViewChangedEvent| {
            println!("view changed: {:?}", e.view);
        }));
    let mut sv = ScrollViewer::new(options)?;
    let presenter = ContentPresenter::new(Size::new(600.0, 3000.0), Size::new(600.0, 450.0))
        .with_snap_points(
            Axis::Vertical,
            SnapPoints::Regular {
                offset: 0.0,
                interval: 150.0,
            },
        );
    sv.set_scroll_provider(Some(Box::new(presenter)))?;
    sv.set_content(Some(ElementId(1)));

    let snapped = ChangeViewOptions::immediate().with_mandatory_snap_points(true);
    sv.change_view(None, Some(520.0), None, snapped)?;
    println!("requested 520, landed on {}", sv.vertical_offset());

    sv.page_down()?;
    sv.line_up()?;
    println!("after page down and line up: {}", sv.vertical_offset());

    sv.zoom_to_rect(Rect::new(0.0, 900.0, 300.0, 150.0), false)?;
    println!(
        "zoomed to {} at ({}, {})",
        sv.zoom_factor(),
        sv.horizontal_offset(),
        sv.vertical_offset()
    );

    println!("{:#?}", sv.state());
    Ok(())
}
