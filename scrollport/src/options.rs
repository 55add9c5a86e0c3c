use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::anchor::AnchorRequest;
use crate::notify::{ViewChangedEvent, ViewChangingEvent};
use crate::{
    Axis, ContentAlignment, ScrollBarVisibility, ScrollMode, SnapPointsAlignment, SnapPointsType,
    ZoomMode,
};

/// A callback fired when the view is about to change (offsets and/or zoom).
pub type ViewChangingCallback = Arc<dyn Fn(&ViewChangingEvent) + Send + Sync>;

/// A callback fired once the view changed.
pub type ViewChangedCallback = Arc<dyn Fn(&ViewChangedEvent) + Send + Sync>;

/// A hook that may pick the anchor element (or replace the candidates) before ranking.
pub type AnchorRequestedCallback = Arc<dyn Fn(&mut AnchorRequest) + Send + Sync>;

pub const DEFAULT_MIN_ZOOM_FACTOR: f32 = 0.1;
pub const DEFAULT_MAX_ZOOM_FACTOR: f32 = 10.0;

/// Rounding tolerances used to compare views.
///
/// The defaults match a compositor that only accepts integral pixel sizes and
/// reports transforms in single precision. Hosts driving a different compositor
/// should re-derive these values instead of reusing them.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    /// Offsets closer than this are the same view.
    pub scroll_rounding: f64,
    /// Offset drift tolerated between the scroll provider and the compositor transform.
    pub scroll_rounding_for_provider: f64,
    /// Offset tolerance when deciding whether a bring-into-viewport request is a no-op.
    pub scroll_rounding_for_bring_into_viewport: f64,
    /// Relative extent difference caused by a zoom change that still counts as unchanged.
    pub zoom_extent_rounding: f64,
    /// Zoom factors closer than this are the same view.
    pub zoom_rounding: f32,
    /// Zoom tolerance when deciding whether a bring-into-viewport request is a no-op.
    pub zoom_rounding_for_bring_into_viewport: f32,
    /// Distance outside the scrollable range (per unit of zoom) within which an
    /// irregular snap point is clamped to the boundary.
    pub snap_point_location: f64,
    /// Distance from the far edge within which far-edge anchoring engages.
    pub edge_detection: f64,
    /// Smallest zoom factor the control accepts.
    pub minimum_zoom_factor: f32,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            scroll_rounding: 0.05,
            scroll_rounding_for_provider: 1.0,
            scroll_rounding_for_bring_into_viewport: 0.001,
            zoom_extent_rounding: 0.001,
            zoom_rounding: 0.000_001,
            zoom_rounding_for_bring_into_viewport: 0.000_01,
            snap_point_location: 0.01,
            edge_detection: 0.1,
            minimum_zoom_factor: DEFAULT_MIN_ZOOM_FACTOR,
        }
    }
}

/// Configuration for [`crate::ScrollViewer`].
///
/// Cheap to clone: callbacks are stored in `Arc`s so hosts can tweak a few fields and call
/// `ScrollViewer::set_options` without reallocating closures.
pub struct ScrollViewerOptions {
    pub horizontal_scroll_mode: ScrollMode,
    pub vertical_scroll_mode: ScrollMode,
    pub zoom_mode: ZoomMode,

    pub horizontal_scroll_bar_visibility: ScrollBarVisibility,
    pub vertical_scroll_bar_visibility: ScrollBarVisibility,

    pub is_horizontal_rail_enabled: bool,
    pub is_vertical_rail_enabled: bool,
    pub is_scroll_inertia_enabled: bool,
    pub is_zoom_inertia_enabled: bool,

    /// Alignment of the content when it is narrower than the viewport.
    pub horizontal_content_alignment: ContentAlignment,
    /// Alignment of the content when it is shorter than the viewport.
    pub vertical_content_alignment: ContentAlignment,

    pub min_zoom_factor: f32,
    pub max_zoom_factor: f32,
    /// Zoom factor applied when the control is created.
    pub zoom_factor: f32,

    pub horizontal_snap_points_type: SnapPointsType,
    pub vertical_snap_points_type: SnapPointsType,
    pub horizontal_snap_points_alignment: SnapPointsAlignment,
    pub vertical_snap_points_alignment: SnapPointsAlignment,
    pub zoom_snap_points_type: SnapPointsType,
    pub zoom_snap_points: Vec<f32>,

    /// Position of the anchor point inside the viewport, as a ratio of its width.
    ///
    /// `NaN` disables anchoring on this axis; `1.0` anchors to the far edge when the view
    /// sits there.
    pub horizontal_anchor_ratio: f64,
    /// Position of the anchor point inside the viewport, as a ratio of its height.
    pub vertical_anchor_ratio: f64,

    pub tolerances: Tolerances,

    pub on_view_changing: Option<ViewChangingCallback>,
    pub on_view_changed: Option<ViewChangedCallback>,
    pub on_anchor_requested: Option<AnchorRequestedCallback>,
}

impl Clone for ScrollViewerOptions {
    fn clone(&self) -> Self {
        Self {
            horizontal_scroll_mode: self.horizontal_scroll_mode,
            vertical_scroll_mode: self.vertical_scroll_mode,
            zoom_mode: self.zoom_mode,
            horizontal_scroll_bar_visibility: self.horizontal_scroll_bar_visibility,
            vertical_scroll_bar_visibility: self.vertical_scroll_bar_visibility,
            is_horizontal_rail_enabled: self.is_horizontal_rail_enabled,
            is_vertical_rail_enabled: self.is_vertical_rail_enabled,
            is_scroll_inertia_enabled: self.is_scroll_inertia_enabled,
            is_zoom_inertia_enabled: self.is_zoom_inertia_enabled,
            horizontal_content_alignment: self.horizontal_content_alignment,
            vertical_content_alignment: self.vertical_content_alignment,
            min_zoom_factor: self.min_zoom_factor,
            max_zoom_factor: self.max_zoom_factor,
            zoom_factor: self.zoom_factor,
            horizontal_snap_points_type: self.horizontal_snap_points_type,
            vertical_snap_points_type: self.vertical_snap_points_type,
            horizontal_snap_points_alignment: self.horizontal_snap_points_alignment,
            vertical_snap_points_alignment: self.vertical_snap_points_alignment,
            zoom_snap_points_type: self.zoom_snap_points_type,
            zoom_snap_points: self.zoom_snap_points.clone(),
            horizontal_anchor_ratio: self.horizontal_anchor_ratio,
            vertical_anchor_ratio: self.vertical_anchor_ratio,
            tolerances: self.tolerances,
            on_view_changing: self.on_view_changing.clone(),
            on_view_changed: self.on_view_changed.clone(),
            on_anchor_requested: self.on_anchor_requested.clone(),
        }
    }
}

impl Default for ScrollViewerOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollViewerOptions {
    pub fn new() -> Self {
        Self {
            horizontal_scroll_mode: ScrollMode::Auto,
            vertical_scroll_mode: ScrollMode::Auto,
            zoom_mode: ZoomMode::Disabled,
            horizontal_scroll_bar_visibility: ScrollBarVisibility::Auto,
            vertical_scroll_bar_visibility: ScrollBarVisibility::Auto,
            is_horizontal_rail_enabled: true,
            is_vertical_rail_enabled: true,
            is_scroll_inertia_enabled: true,
            is_zoom_inertia_enabled: true,
            horizontal_content_alignment: ContentAlignment::Near,
            vertical_content_alignment: ContentAlignment::Near,
            min_zoom_factor: DEFAULT_MIN_ZOOM_FACTOR,
            max_zoom_factor: DEFAULT_MAX_ZOOM_FACTOR,
            zoom_factor: 1.0,
            horizontal_snap_points_type: SnapPointsType::None,
            vertical_snap_points_type: SnapPointsType::None,
            horizontal_snap_points_alignment: SnapPointsAlignment::Near,
            vertical_snap_points_alignment: SnapPointsAlignment::Near,
            zoom_snap_points_type: SnapPointsType::None,
            zoom_snap_points: Vec::new(),
            horizontal_anchor_ratio: 0.0,
            vertical_anchor_ratio: 0.0,
            tolerances: Tolerances::default(),
            on_view_changing: None,
            on_view_changed: None,
            on_anchor_requested: None,
        }
    }

    pub fn scroll_mode(&self, axis: Axis) -> ScrollMode {
        match axis {
            Axis::Horizontal => self.horizontal_scroll_mode,
            Axis::Vertical => self.vertical_scroll_mode,
        }
    }

    pub fn scroll_bar_visibility(&self, axis: Axis) -> ScrollBarVisibility {
        match axis {
            Axis::Horizontal => self.horizontal_scroll_bar_visibility,
            Axis::Vertical => self.vertical_scroll_bar_visibility,
        }
    }

    pub fn is_rail_enabled(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.is_horizontal_rail_enabled,
            Axis::Vertical => self.is_vertical_rail_enabled,
        }
    }

    pub fn content_alignment(&self, axis: Axis) -> ContentAlignment {
        match axis {
            Axis::Horizontal => self.horizontal_content_alignment,
            Axis::Vertical => self.vertical_content_alignment,
        }
    }

    pub fn snap_points_type(&self, axis: Axis) -> SnapPointsType {
        match axis {
            Axis::Horizontal => self.horizontal_snap_points_type,
            Axis::Vertical => self.vertical_snap_points_type,
        }
    }

    pub fn snap_points_alignment(&self, axis: Axis) -> SnapPointsAlignment {
        match axis {
            Axis::Horizontal => self.horizontal_snap_points_alignment,
            Axis::Vertical => self.vertical_snap_points_alignment,
        }
    }

    pub fn anchor_ratio(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.horizontal_anchor_ratio,
            Axis::Vertical => self.vertical_anchor_ratio,
        }
    }

    pub fn with_scroll_modes(mut self, horizontal: ScrollMode, vertical: ScrollMode) -> Self {
        self.horizontal_scroll_mode = horizontal;
        self.vertical_scroll_mode = vertical;
        self
    }

    pub fn with_zoom_mode(mut self, zoom_mode: ZoomMode) -> Self {
        self.zoom_mode = zoom_mode;
        self
    }

    pub fn with_scroll_bar_visibilities(
        mut self,
        horizontal: ScrollBarVisibility,
        vertical: ScrollBarVisibility,
    ) -> Self {
        self.horizontal_scroll_bar_visibility = horizontal;
        self.vertical_scroll_bar_visibility = vertical;
        self
    }

    pub fn with_rails(mut self, horizontal: bool, vertical: bool) -> Self {
        self.is_horizontal_rail_enabled = horizontal;
        self.is_vertical_rail_enabled = vertical;
        self
    }

    pub fn with_inertia(mut self, scroll: bool, zoom: bool) -> Self {
        self.is_scroll_inertia_enabled = scroll;
        self.is_zoom_inertia_enabled = zoom;
        self
    }

    pub fn with_content_alignment(
        mut self,
        horizontal: ContentAlignment,
        vertical: ContentAlignment,
    ) -> Self {
        self.horizontal_content_alignment = horizontal;
        self.vertical_content_alignment = vertical;
        self
    }

    pub fn with_zoom_bounds(mut self, min_zoom_factor: f32, max_zoom_factor: f32) -> Self {
        self.min_zoom_factor = min_zoom_factor;
        self.max_zoom_factor = max_zoom_factor;
        self
    }

    pub fn with_zoom_factor(mut self, zoom_factor: f32) -> Self {
        self.zoom_factor = zoom_factor;
        self
    }

    pub fn with_snap_points(
        mut self,
        axis: Axis,
        kind: SnapPointsType,
        alignment: SnapPointsAlignment,
    ) -> Self {
        match axis {
            Axis::Horizontal => {
                self.horizontal_snap_points_type = kind;
                self.horizontal_snap_points_alignment = alignment;
            }
            Axis::Vertical => {
                self.vertical_snap_points_type = kind;
                self.vertical_snap_points_alignment = alignment;
            }
        }
        self
    }

    pub fn with_zoom_snap_points(
        mut self,
        kind: SnapPointsType,
        points: impl IntoIterator<Item = f32>,
    ) -> Self {
        self.zoom_snap_points_type = kind;
        self.zoom_snap_points = points.into_iter().collect();
        self
    }

    pub fn with_anchor_ratios(mut self, horizontal: f64, vertical: f64) -> Self {
        self.horizontal_anchor_ratio = horizontal;
        self.vertical_anchor_ratio = vertical;
        self
    }

    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    pub fn with_on_view_changing(
        mut self,
        f: Option<impl Fn(&ViewChangingEvent) + Send + Sync + 'static>,
    ) -> Self {
        self.on_view_changing = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_view_changed(
        mut self,
        f: Option<impl Fn(&ViewChangedEvent) + Send + Sync + 'static>,
    ) -> Self {
        self.on_view_changed = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_anchor_requested(
        mut self,
        f: Option<impl Fn(&mut AnchorRequest) + Send + Sync + 'static>,
    ) -> Self {
        self.on_anchor_requested = f.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for ScrollViewerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollViewerOptions")
            .field("horizontal_scroll_mode", &self.horizontal_scroll_mode)
            .field("vertical_scroll_mode", &self.vertical_scroll_mode)
            .field("zoom_mode", &self.zoom_mode)
            .field(
                "horizontal_scroll_bar_visibility",
                &self.horizontal_scroll_bar_visibility,
            )
            .field(
                "vertical_scroll_bar_visibility",
                &self.vertical_scroll_bar_visibility,
            )
            .field("is_horizontal_rail_enabled", &self.is_horizontal_rail_enabled)
            .field("is_vertical_rail_enabled", &self.is_vertical_rail_enabled)
            .field("is_scroll_inertia_enabled", &self.is_scroll_inertia_enabled)
            .field("is_zoom_inertia_enabled", &self.is_zoom_inertia_enabled)
            .field(
                "horizontal_content_alignment",
                &self.horizontal_content_alignment,
            )
            .field("vertical_content_alignment", &self.vertical_content_alignment)
            .field("min_zoom_factor", &self.min_zoom_factor)
            .field("max_zoom_factor", &self.max_zoom_factor)
            .field("zoom_factor", &self.zoom_factor)
            .field(
                "horizontal_snap_points_type",
                &self.horizontal_snap_points_type,
            )
            .field("vertical_snap_points_type", &self.vertical_snap_points_type)
            .field("zoom_snap_points_type", &self.zoom_snap_points_type)
            .field("zoom_snap_points", &self.zoom_snap_points)
            .field("horizontal_anchor_ratio", &self.horizontal_anchor_ratio)
            .field("vertical_anchor_ratio", &self.vertical_anchor_ratio)
            .field("tolerances", &self.tolerances)
            .finish_non_exhaustive()
    }
}
