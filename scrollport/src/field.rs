use bitflags::bitflags;

use crate::ScrollViewerOptions;

/// An option of [`crate::ScrollViewer`] whose change has side effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    HorizontalScrollMode,
    VerticalScrollMode,
    ZoomMode,
    HorizontalScrollBarVisibility,
    VerticalScrollBarVisibility,
    HorizontalRail,
    VerticalRail,
    ScrollInertia,
    ZoomInertia,
    HorizontalContentAlignment,
    VerticalContentAlignment,
    MinZoomFactor,
    MaxZoomFactor,
    HorizontalSnapPointsType,
    VerticalSnapPointsType,
    HorizontalSnapPointsAlignment,
    VerticalSnapPointsAlignment,
    ZoomSnapPointsType,
    ZoomSnapPoints,
    HorizontalAnchorRatio,
    VerticalAnchorRatio,
    PinnedHeaders,
}

bitflags! {
    /// Work triggered by a [`Field`] change.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FieldEffects: u8 {
        /// Recompute (or defer) the manipulation configurations.
        const MANIPULABILITY = 1 << 0;
        /// Push the primary content with its alignment to the compositor.
        const CONTENT_ALIGNMENT = 1 << 1;
        const HORIZONTAL_SNAP_POINTS = 1 << 2;
        const VERTICAL_SNAP_POINTS = 1 << 3;
        const ZOOM_SNAP_POINTS = 1 << 4;
        /// Coerce the zoom bounds and the current zoom factor.
        const ZOOM_BOUNDS = 1 << 5;
        /// Drop the current anchor so the next arrange selects a new one.
        const ANCHORING = 1 << 6;
    }
}

impl Field {
    pub const ALL: [Field; 22] = [
        Field::HorizontalScrollMode,
        Field::VerticalScrollMode,
        Field::ZoomMode,
        Field::HorizontalScrollBarVisibility,
        Field::VerticalScrollBarVisibility,
        Field::HorizontalRail,
        Field::VerticalRail,
        Field::ScrollInertia,
        Field::ZoomInertia,
        Field::HorizontalContentAlignment,
        Field::VerticalContentAlignment,
        Field::MinZoomFactor,
        Field::MaxZoomFactor,
        Field::HorizontalSnapPointsType,
        Field::VerticalSnapPointsType,
        Field::HorizontalSnapPointsAlignment,
        Field::VerticalSnapPointsAlignment,
        Field::ZoomSnapPointsType,
        Field::ZoomSnapPoints,
        Field::HorizontalAnchorRatio,
        Field::VerticalAnchorRatio,
        Field::PinnedHeaders,
    ];

    pub fn effects(self) -> FieldEffects {
        match self {
            Field::HorizontalScrollMode
            | Field::VerticalScrollMode
            | Field::ZoomMode
            | Field::HorizontalScrollBarVisibility
            | Field::VerticalScrollBarVisibility
            | Field::HorizontalRail
            | Field::VerticalRail
            | Field::ScrollInertia
            | Field::ZoomInertia => FieldEffects::MANIPULABILITY,
            Field::HorizontalContentAlignment | Field::VerticalContentAlignment => {
                FieldEffects::CONTENT_ALIGNMENT
            }
            Field::MinZoomFactor | Field::MaxZoomFactor => {
                FieldEffects::ZOOM_BOUNDS | FieldEffects::ZOOM_SNAP_POINTS
            }
            Field::HorizontalSnapPointsType | Field::HorizontalSnapPointsAlignment => {
                FieldEffects::HORIZONTAL_SNAP_POINTS
            }
            Field::VerticalSnapPointsType | Field::VerticalSnapPointsAlignment => {
                FieldEffects::VERTICAL_SNAP_POINTS
            }
            Field::ZoomSnapPointsType | Field::ZoomSnapPoints => FieldEffects::ZOOM_SNAP_POINTS,
            Field::HorizontalAnchorRatio | Field::VerticalAnchorRatio => FieldEffects::ANCHORING,
            Field::PinnedHeaders => {
                FieldEffects::CONTENT_ALIGNMENT
                    | FieldEffects::MANIPULABILITY
                    | FieldEffects::ANCHORING
            }
        }
    }

    /// Returns `true` when `field` differs between `a` and `b`.
    ///
    /// [`Field::PinnedHeaders`] is not an option and never differs here.
    pub(crate) fn differs(self, a: &ScrollViewerOptions, b: &ScrollViewerOptions) -> bool {
        match self {
            Field::HorizontalScrollMode => a.horizontal_scroll_mode != b.horizontal_scroll_mode,
            Field::VerticalScrollMode => a.vertical_scroll_mode != b.vertical_scroll_mode,
            Field::ZoomMode => a.zoom_mode != b.zoom_mode,
            Field::HorizontalScrollBarVisibility => {
                a.horizontal_scroll_bar_visibility != b.horizontal_scroll_bar_visibility
            }
            Field::VerticalScrollBarVisibility => {
                a.vertical_scroll_bar_visibility != b.vertical_scroll_bar_visibility
            }
            Field::HorizontalRail => a.is_horizontal_rail_enabled != b.is_horizontal_rail_enabled,
            Field::VerticalRail => a.is_vertical_rail_enabled != b.is_vertical_rail_enabled,
            Field::ScrollInertia => a.is_scroll_inertia_enabled != b.is_scroll_inertia_enabled,
            Field::ZoomInertia => a.is_zoom_inertia_enabled != b.is_zoom_inertia_enabled,
            Field::HorizontalContentAlignment => {
                a.horizontal_content_alignment != b.horizontal_content_alignment
            }
            Field::VerticalContentAlignment => {
                a.vertical_content_alignment != b.vertical_content_alignment
            }
            Field::MinZoomFactor => a.min_zoom_factor.to_bits() != b.min_zoom_factor.to_bits(),
            Field::MaxZoomFactor => a.max_zoom_factor.to_bits() != b.max_zoom_factor.to_bits(),
            Field::HorizontalSnapPointsType => {
                a.horizontal_snap_points_type != b.horizontal_snap_points_type
            }
            Field::VerticalSnapPointsType => {
                a.vertical_snap_points_type != b.vertical_snap_points_type
            }
            Field::HorizontalSnapPointsAlignment => {
                a.horizontal_snap_points_alignment != b.horizontal_snap_points_alignment
            }
            Field::VerticalSnapPointsAlignment => {
                a.vertical_snap_points_alignment != b.vertical_snap_points_alignment
            }
            Field::ZoomSnapPointsType => a.zoom_snap_points_type != b.zoom_snap_points_type,
            Field::ZoomSnapPoints => a.zoom_snap_points != b.zoom_snap_points,
            Field::HorizontalAnchorRatio => {
                a.horizontal_anchor_ratio.to_bits() != b.horizontal_anchor_ratio.to_bits()
            }
            Field::VerticalAnchorRatio => {
                a.vertical_anchor_ratio.to_bits() != b.vertical_anchor_ratio.to_bits()
            }
            Field::PinnedHeaders => false,
        }
    }
}
