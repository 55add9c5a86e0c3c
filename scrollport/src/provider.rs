//! Collaborators the core talks to. None of them call back into the core.

use alloc::vec::Vec;

use crate::manipulation::{
    ConfigurationSet, ContentTransform, ManipulationCapabilities, PrimaryContent,
};
use crate::{Axis, ElementId, MotionType, Rect, Result, ScrollStep, SnapPointsAlignment, View};

/// Snap points exposed by the content, in unzoomed content coordinates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SnapPoints {
    /// Equidistant points: `offset + k * interval` for every `k >= 0`.
    Regular { offset: f32, interval: f32 },
    /// Arbitrary points, sorted ascending.
    Irregular(Vec<f32>),
}

/// The logical scroll provider (the content's scroll-info implementation).
///
/// Offsets, viewport and extent are reported in the provider's own units. Extents include the
/// current zoom factor. An axis is logical (e.g. counted in items) when
/// [`Self::logical_offset_provider`] returns a provider oriented along it.
pub trait ScrollProvider {
    fn offset(&self, axis: Axis) -> f64;

    fn min_offset(&self, _axis: Axis) -> f64 {
        0.0
    }

    fn viewport(&self, axis: Axis) -> f64;

    fn extent(&self, axis: Axis) -> f64;

    /// Viewport size in pixels. Only differs from [`Self::viewport`] on logical axes.
    fn pixel_viewport(&self, axis: Axis) -> f64 {
        self.viewport(axis)
    }

    fn set_offset(&mut self, axis: Axis, offset: f64) -> Result<()>;

    /// Applies a new zoom factor to the content; extents change accordingly.
    fn set_zoom_factor(&mut self, zoom_factor: f32) -> Result<()>;

    fn step(&mut self, step: ScrollStep) -> Result<()>;

    /// Runs a synchronous layout pass so extents reflect pending changes.
    fn update_layout(&mut self) -> Result<()> {
        Ok(())
    }

    fn snap_points_source(&self) -> Option<&dyn SnapPointsSource> {
        None
    }

    fn logical_offset_provider(&self) -> Option<&dyn LogicalOffsetProvider> {
        None
    }

    fn logical_offset_provider_mut(&mut self) -> Option<&mut dyn LogicalOffsetProvider> {
        None
    }
}

/// Content exposing snap points.
pub trait SnapPointsSource {
    /// Snap points for `axis` computed for `alignment`, if the content has any.
    fn snap_points(&self, axis: Axis, alignment: SnapPointsAlignment) -> Option<SnapPoints>;
}

/// Converts between logical offsets (item counts) and unzoomed pixel offsets for
/// item-virtualizing content.
pub trait LogicalOffsetProvider {
    /// The axis along which offsets are logical.
    fn physical_orientation(&self) -> Axis;

    /// Unzoomed pixel extent along [`Self::physical_orientation`].
    fn compute_pixel_extent(&self) -> f64;

    fn compute_logical_offset(&self, pixel_offset: f64) -> f64;

    fn compute_pixel_offset(&self, logical_offset: f64) -> f64;

    /// Told when a manipulation starts (`offset_hint` is the pre-gesture pixel offset) and ends.
    fn update_in_manipulation(&mut self, in_manipulation: bool, offset_hint: Option<f64>);
}

/// A request to move the compositor's view onto `bounds`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BringIntoViewportRequest {
    /// Target rectangle in unzoomed content coordinates.
    pub bounds: Rect,
    /// Target view in pixel offsets.
    pub target: View,
    /// Content translation from center/far alignment at the target zoom.
    pub translation: crate::Point,
    pub animate: bool,
    /// Apply without animation when an animation is already running.
    pub skip_animation_while_running: bool,
}

/// The touch-manipulation compositor.
///
/// The compositor drives the view asynchronously and reports progress through the lifecycle
/// entry points on [`crate::ScrollViewer`] (`on_manipulation_starting`, ...).
pub trait Compositor {
    /// Returns `false` when the compositor declined the request.
    fn bring_into_viewport(&mut self, request: &BringIntoViewportRequest) -> Result<bool>;

    /// Starts (or stops, with zero velocities) a contactless constant-velocity pan.
    fn set_constant_velocities(&mut self, dx: f64, dy: f64) -> Result<()>;

    fn stop_inertia(&mut self) -> Result<()>;

    fn notify_can_manipulate_elements(
        &mut self,
        capabilities: ManipulationCapabilities,
    ) -> Result<()>;

    fn notify_viewport_changed(&mut self, configurations: &ConfigurationSet) -> Result<()>;

    fn notify_primary_content_changed(&mut self, content: &PrimaryContent) -> Result<()>;

    fn notify_primary_content_transform_changed(&mut self, transform: ContentTransform)
    -> Result<()>;

    fn notify_snap_points_changed(&mut self, motion: MotionType) -> Result<()>;

    fn notify_manipulatable_element_changed(&mut self, element: Option<ElementId>) -> Result<()>;
}

/// Read access to element geometry during anchor selection.
pub trait ElementLayout {
    /// Bounds of `element` relative to the content origin, unzoomed.
    ///
    /// Returns `None` when the element is collapsed or is neither the scrollable content nor
    /// one of its descendants.
    fn element_bounds(&self, element: ElementId) -> Option<Rect>;
}

impl<F> ElementLayout for F
where
    F: Fn(ElementId) -> Option<Rect>,
{
    fn element_bounds(&self, element: ElementId) -> Option<Rect> {
        self(element)
    }
}
