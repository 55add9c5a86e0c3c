use alloc::boxed::Box;

use crate::anchor::AnchorState;
use crate::error::check_offset;
use crate::field::{Field, FieldEffects};
use crate::guard::{OperationState, SyncOperation};
use crate::manipulation::{ConfigurationSet, ManipulationCoordinator};
use crate::notify::Notifier;
use crate::provider::{Compositor, ScrollProvider};
use crate::view_change::PendingChangeView;
use crate::{
    Axis, ContentAlignment, ElementId, Error, MotionType, PinnedHeaders, Result,
    ScrollViewerOptions, View, ViewChangedEvent, ViewChangingEvent, ViewState, ViewportModel,
};

/// A scroll viewer's viewport coordination engine.
///
/// The viewer is headless: it holds no UI objects. The host wires in
/// - a [`ScrollProvider`] (the content's scroll state),
/// - optionally a [`Compositor`] that performs touch manipulations and animations,
/// - the content element and, during layout, an [`crate::ElementLayout`] for anchoring.
///
/// All entry points run on the host's UI thread. Compositor lifecycle callbacks are delivered
/// through `on_manipulation_*`.
pub struct ScrollViewer {
    pub(crate) options: ScrollViewerOptions,
    pub(crate) model: ViewportModel,
    pub(crate) coordinator: ManipulationCoordinator,
    pub(crate) provider: Option<Box<dyn ScrollProvider>>,
    pub(crate) compositor: Option<Box<dyn Compositor>>,
    pub(crate) content: Option<ElementId>,
    pub(crate) pinned_headers: PinnedHeaders,
    pub(crate) anchoring: AnchorState,
    pub(crate) pending: Option<PendingChangeView>,
    pub(crate) notifier: Notifier,
    pub(crate) operation: OperationState,
    last_view: View,
}

impl ScrollViewer {
    /// Creates a viewer from options. Fails when a zoom option is NaN, infinite or not positive.
    pub fn new(options: ScrollViewerOptions) -> Result<Self> {
        let mut model = ViewportModel::new(1.0, 1.0);
        model.set_zoom_bounds(
            options.min_zoom_factor,
            options.max_zoom_factor,
            options.tolerances.minimum_zoom_factor,
        )?;
        model.set_zoom_factor(options.zoom_factor)?;
        sdebug!(
            zoom_factor = model.zoom_factor(),
            min_zoom_factor = model.min_zoom_factor(),
            max_zoom_factor = model.max_zoom_factor(),
            "ScrollViewer::new"
        );
        let notifier = Notifier::default();
        notifier.set_callbacks(
            options.on_view_changing.clone(),
            options.on_view_changed.clone(),
        );
        let last_view = model.view();
        Ok(Self {
            options,
            model,
            coordinator: ManipulationCoordinator::default(),
            provider: None,
            compositor: None,
            content: None,
            pinned_headers: PinnedHeaders::default(),
            anchoring: AnchorState::default(),
            pending: None,
            notifier,
            operation: OperationState::default(),
            last_view,
        })
    }

    pub fn options(&self) -> &ScrollViewerOptions {
        &self.options
    }

    /// Replaces the options and runs the handler of every field that changed, inside one
    /// notification batch.
    pub fn set_options(&mut self, options: ScrollViewerOptions) -> Result<()> {
        self.check_alignment_with_headers(&options, self.pinned_headers)?;
        for (name, zoom) in [
            ("min zoom factor", options.min_zoom_factor),
            ("max zoom factor", options.max_zoom_factor),
        ] {
            crate::error::check_zoom(name, zoom)?;
        }
        let _batch = self.notifier.batch();
        let previous = core::mem::replace(&mut self.options, options);
        self.notifier.set_callbacks(
            self.options.on_view_changing.clone(),
            self.options.on_view_changed.clone(),
        );
        strace!(options = ?self.options, "ScrollViewer::set_options");
        for field in Field::ALL {
            if field.differs(&previous, &self.options) {
                self.on_field_changed(field)?;
            }
        }
        Ok(())
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut ScrollViewerOptions)) -> Result<()> {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next)
    }

    /// Runs the side effects of a changed field.
    pub fn on_field_changed(&mut self, field: Field) -> Result<()> {
        let effects = field.effects();
        strace!(?field, ?effects, "field changed");
        let _batch = self.notifier.batch();
        if effects.contains(FieldEffects::ZOOM_BOUNDS) {
            self.coerce_zoom_bounds()?;
        }
        if effects.contains(FieldEffects::MANIPULABILITY) {
            self.invalidate_manipulability();
        }
        if effects.contains(FieldEffects::CONTENT_ALIGNMENT) {
            self.invalidate_content_alignment();
        }
        for (flag, motion) in [
            (FieldEffects::HORIZONTAL_SNAP_POINTS, MotionType::PanX),
            (FieldEffects::VERTICAL_SNAP_POINTS, MotionType::PanY),
            (FieldEffects::ZOOM_SNAP_POINTS, MotionType::Zoom),
        ] {
            if effects.contains(flag) {
                self.notify_compositor(|c| c.notify_snap_points_changed(motion));
            }
        }
        if effects.contains(FieldEffects::ANCHORING) {
            self.anchoring.clear_anchor();
        }
        Ok(())
    }

    fn coerce_zoom_bounds(&mut self) -> Result<()> {
        let changed = self.model.set_zoom_bounds(
            self.options.min_zoom_factor,
            self.options.max_zoom_factor,
            self.options.tolerances.minimum_zoom_factor,
        )?;
        if !changed {
            self.invalidate_content_alignment();
            return Ok(());
        }
        let zoom_factor = self.model.zoom_factor();
        sdebug!(zoom_factor, "zoom factor coerced into bounds");
        if let Some(provider) = self.provider.as_deref_mut() {
            let _op = self.operation.enter(SyncOperation::ZoomSync);
            provider.set_zoom_factor(zoom_factor)?;
            provider.update_layout()?;
        }
        self.refresh()?;
        self.invalidate_content_alignment();
        Ok(())
    }

    fn check_alignment_with_headers(
        &self,
        options: &ScrollViewerOptions,
        headers: PinnedHeaders,
    ) -> Result<()> {
        for axis in Axis::BOTH {
            if headers.is_pinned(axis)
                && matches!(
                    options.content_alignment(axis),
                    ContentAlignment::Center | ContentAlignment::Far
                )
            {
                return Err(Error::not_supported(
                    "center and far content alignments cannot be combined with a pinned header",
                ));
            }
        }
        Ok(())
    }

    pub fn pinned_headers(&self) -> PinnedHeaders {
        self.pinned_headers
    }

    /// Pins headers over the content. An axis with a pinned header must be near or stretch
    /// aligned.
    pub fn set_pinned_headers(&mut self, headers: PinnedHeaders) -> Result<()> {
        for size in [headers.top, headers.left].into_iter().flatten() {
            check_offset("header size", size)?;
        }
        for axis in Axis::BOTH {
            if headers.is_pinned(axis)
                && matches!(
                    self.options.content_alignment(axis),
                    ContentAlignment::Center | ContentAlignment::Far
                )
            {
                return Err(Error::invalid_operation(
                    "cannot pin a header while the content is center or far aligned",
                ));
            }
        }
        if headers == self.pinned_headers {
            return Ok(());
        }
        self.pinned_headers = headers;
        self.on_field_changed(Field::PinnedHeaders)
    }

    pub fn content(&self) -> Option<ElementId> {
        self.content
    }

    /// Sets the scrollable content element.
    pub fn set_content(&mut self, content: Option<ElementId>) {
        if self.content == content {
            return;
        }
        sdebug!(?content, "content changed");
        let _batch = self.notifier.batch();
        self.content = content;
        self.pending = None;
        self.coordinator.reset_stretch();
        self.anchoring.clear_anchor();
        self.notify_compositor(|c| c.notify_manipulatable_element_changed(content));
        self.invalidate_manipulability();
        self.invalidate_content_alignment();
    }

    pub fn scroll_provider(&self) -> Option<&dyn ScrollProvider> {
        self.provider.as_deref()
    }

    pub fn scroll_provider_mut(&mut self) -> Option<&mut (dyn ScrollProvider + 'static)> {
        self.provider.as_deref_mut()
    }

    /// Attaches the scroll provider and pulls its state.
    pub fn set_scroll_provider(&mut self, provider: Option<Box<dyn ScrollProvider>>) -> Result<()> {
        let _batch = self.notifier.batch();
        self.provider = provider;
        self.pending = None;
        if let Some(provider) = self.provider.as_deref_mut() {
            let zoom_factor = self.model.zoom_factor();
            provider.set_zoom_factor(zoom_factor)?;
        }
        self.refresh()?;
        self.invalidate_manipulability();
        self.invalidate_content_alignment();
        Ok(())
    }

    pub fn has_compositor(&self) -> bool {
        self.compositor.is_some()
    }

    /// Attaches the compositor and pushes the current element, configurations and content.
    pub fn set_compositor(&mut self, compositor: Option<Box<dyn Compositor>>) {
        self.compositor = compositor;
        self.coordinator.reset_pushed();
        let content = self.content;
        self.notify_compositor(|c| c.notify_manipulatable_element_changed(content));
        self.push_configurations();
        self.push_primary_content();
    }

    /// Pulls the provider's scroll state, e.g. after it scrolled or its extent changed.
    pub fn invalidate_scroll_info(&mut self) -> Result<()> {
        let _batch = self.notifier.batch();
        self.refresh()
    }

    pub(crate) fn refresh(&mut self) -> Result<()> {
        let Some(provider) = self.provider.as_deref() else {
            return Ok(());
        };
        let before_scrollable = Axis::BOTH.map(|axis| self.model.axis(axis).is_scrollable());
        let before_sizes = (self.model.pixel_extent_size(), self.model.pixel_viewport_size());
        self.model.sync_from(provider)?;

        let mut alignment_dirty =
            before_sizes != (self.model.pixel_extent_size(), self.model.pixel_viewport_size());
        let mut scrollability_changed = false;
        for (axis, before) in Axis::BOTH.into_iter().zip(before_scrollable) {
            let scrollable = self.model.axis(axis).is_scrollable();
            scrollability_changed |= scrollable != before;
            if self.coordinator.observe_overflow(axis, scrollable)
                && self.options.content_alignment(axis) == ContentAlignment::Stretch
            {
                alignment_dirty = true;
            }
        }
        if scrollability_changed {
            self.invalidate_manipulability();
        }
        if alignment_dirty {
            self.invalidate_content_alignment();
        }
        self.raise_view_events();
        Ok(())
    }

    fn raise_view_events(&mut self) {
        let view = self.model.view();
        if view == self.last_view {
            return;
        }
        self.last_view = view;
        let final_view = self.final_view(view);
        let is_inertial = self.coordinator.session().is_some_and(|s| s.is_inertial);
        self.notifier.view_changing(ViewChangingEvent {
            next_view: view,
            final_view,
            is_inertial,
        });
        let is_intermediate = self.coordinator.is_intermediate();
        self.coordinator.mark_intermediate_raised();
        self.notifier.view_changed(ViewChangedEvent {
            view,
            is_intermediate,
        });
        if !self.operation.is(SyncOperation::ManipulationSync) {
            let transform = self.primary_content_transform();
            self.notify_compositor(|c| c.notify_primary_content_transform_changed(transform));
        }
    }

    fn final_view(&self, next: View) -> View {
        if let Some(session) = self.coordinator.session() {
            if let (true, Some(end)) = (session.is_inertial, session.inertia_end) {
                let zoom = self.model.clamp_zoom(end.zoom_factor);
                return View::new(
                    self.to_provider_offset(Axis::Horizontal, end.horizontal_offset, zoom),
                    self.to_provider_offset(Axis::Vertical, end.vertical_offset, zoom),
                    zoom,
                );
            }
        }
        match &self.pending {
            Some(pending) => pending.target,
            None => next,
        }
    }

    /// Calls `f` on the compositor. Failures are logged and swallowed.
    pub(crate) fn notify_compositor(&mut self, f: impl FnOnce(&mut dyn Compositor) -> Result<()>) {
        let Some(compositor) = self.compositor.as_deref_mut() else {
            return;
        };
        if let Err(_err) = f(compositor) {
            swarn!(error = %_err, "compositor notification failed");
        }
    }

    /// The axis a logical-offset provider drives, if any.
    pub(crate) fn logical_axis(&self) -> Option<Axis> {
        self.provider
            .as_deref()
            .and_then(|p| p.logical_offset_provider())
            .map(|l| l.physical_orientation())
    }

    /// Converts a zoomed pixel offset into provider units at `zoom_factor`.
    pub(crate) fn to_provider_offset(&self, axis: Axis, pixel: f64, zoom_factor: f32) -> f64 {
        let logical = self
            .provider
            .as_deref()
            .and_then(|p| p.logical_offset_provider())
            .filter(|l| l.physical_orientation() == axis);
        match logical {
            Some(l) => l.compute_logical_offset(pixel / f64::from(zoom_factor)),
            None => pixel,
        }
    }

    /// Converts an offset in provider units into zoomed pixels at `zoom_factor`.
    pub(crate) fn to_pixel_offset(&self, axis: Axis, offset: f64, zoom_factor: f32) -> f64 {
        let logical = self
            .provider
            .as_deref()
            .and_then(|p| p.logical_offset_provider())
            .filter(|l| l.physical_orientation() == axis);
        match logical {
            Some(l) => l.compute_pixel_offset(offset) * f64::from(zoom_factor),
            None => offset,
        }
    }

    /// Largest pixel offset on `axis` once the content is zoomed to `zoom_factor`.
    pub(crate) fn pixel_scrollable_at(&self, axis: Axis, zoom_factor: f32) -> f64 {
        let scale = f64::from(zoom_factor) / f64::from(self.model.zoom_factor());
        let max = self.model.pixel_extent(axis) * scale - self.model.pixel_viewport(axis);
        if max.is_finite() { max.max(0.0) } else { 0.0 }
    }

    /// Pushes `target` (provider units) to the scroll provider.
    pub(crate) fn apply_view(&mut self, target: View) -> Result<()> {
        let Err(error) = self.push_view(target) else {
            return Ok(());
        };
        // The provider may have taken part of the view; pull whatever it holds now.
        if let Err(_err) = self.refresh() {
            swarn!(error = %_err, "resync after a failed provider call failed");
        }
        Err(error)
    }

    fn push_view(&mut self, target: View) -> Result<()> {
        let zoom_changed = (target.zoom_factor - self.model.zoom_factor()).abs()
            > self.options.tolerances.zoom_rounding;
        let Some(provider) = self.provider.as_deref_mut() else {
            return Ok(());
        };
        if zoom_changed {
            let zoom_factor = self.model.clamp_zoom(target.zoom_factor);
            provider.set_zoom_factor(zoom_factor)?;
            self.model.set_zoom_factor(zoom_factor)?;
            provider.update_layout()?;
        }
        for axis in Axis::BOTH {
            let offset = target.offset(axis);
            if provider.offset(axis) != offset {
                provider.set_offset(axis, offset)?;
            }
        }
        Ok(())
    }

    /// Sets the offset of `axis` through the scroll provider. Returns the offset in effect.
    pub fn set_offset(&mut self, axis: Axis, offset: f64) -> Result<f64> {
        let offset = check_offset("offset", offset)?;
        let _batch = self.notifier.batch();
        let _op = self.operation.enter(SyncOperation::ZoomSync);
        let logical = self
            .provider
            .as_deref()
            .and_then(|p| p.logical_offset_provider());
        let stored = self.model.set_offset(axis, offset, logical)?;
        if let Some(provider) = self.provider.as_deref_mut() {
            provider.set_offset(axis, stored)?;
        }
        self.refresh()?;
        Ok(self.model.offset(axis))
    }

    pub fn viewport_model(&self) -> &ViewportModel {
        &self.model
    }

    pub fn horizontal_offset(&self) -> f64 {
        self.model.offset(Axis::Horizontal)
    }

    pub fn vertical_offset(&self) -> f64 {
        self.model.offset(Axis::Vertical)
    }

    pub fn offset(&self, axis: Axis) -> f64 {
        self.model.offset(axis)
    }

    pub fn extent(&self, axis: Axis) -> f64 {
        self.model.extent(axis)
    }

    pub fn viewport(&self, axis: Axis) -> f64 {
        self.model.viewport(axis)
    }

    /// ScrollableWidth / ScrollableHeight.
    pub fn scrollable(&self, axis: Axis) -> f64 {
        self.model.scrollable(axis)
    }

    pub fn zoom_factor(&self) -> f32 {
        self.model.zoom_factor()
    }

    pub fn view(&self) -> View {
        self.model.view()
    }

    pub fn configurations(&self) -> &ConfigurationSet {
        self.coordinator.configurations()
    }

    /// The operation currently running, `Idle` between calls.
    pub fn current_operation(&self) -> SyncOperation {
        self.operation.current()
    }

    /// A serializable snapshot of the scroll state.
    pub fn state(&self) -> ViewState {
        ViewState::capture(&self.model, self.coordinator.is_manipulating())
    }
}

impl core::fmt::Debug for ScrollViewer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollViewer")
            .field("options", &self.options)
            .field("model", &self.model)
            .field("coordinator", &self.coordinator)
            .field("has_provider", &self.provider.is_some())
            .field("has_compositor", &self.compositor.is_some())
            .field("content", &self.content)
            .field("pinned_headers", &self.pinned_headers)
            .field("pending", &self.pending)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}
