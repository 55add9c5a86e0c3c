use crate::{Axis, ViewportModel};

/// A lightweight, serializable snapshot of one axis.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisSnapshot {
    pub offset: f64,
    pub extent: f64,
    pub viewport: f64,
    pub scrollable: f64,
}

/// A combined snapshot of both axes and the zoom state.
///
/// Useful for restoring a view across frames or sessions (feed it back through
/// `ScrollViewer::change_view`) without coupling the viewer to a UI framework.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewState {
    pub horizontal: AxisSnapshot,
    pub vertical: AxisSnapshot,
    pub zoom_factor: f32,
    pub min_zoom_factor: f32,
    pub max_zoom_factor: f32,
    pub is_manipulating: bool,
}

impl ViewState {
    pub(crate) fn capture(model: &ViewportModel, is_manipulating: bool) -> Self {
        let axis = |axis: Axis| AxisSnapshot {
            offset: model.offset(axis),
            extent: model.extent(axis),
            viewport: model.viewport(axis),
            scrollable: model.scrollable(axis),
        };
        Self {
            horizontal: axis(Axis::Horizontal),
            vertical: axis(Axis::Vertical),
            zoom_factor: model.zoom_factor(),
            min_zoom_factor: model.min_zoom_factor(),
            max_zoom_factor: model.max_zoom_factor(),
            is_manipulating,
        }
    }

    pub fn axis(&self, axis: Axis) -> &AxisSnapshot {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }
}
