//! Programmatic view changes.

use crate::error::{check_offset, check_zoom};
use crate::guard::SyncOperation;
use crate::manipulation::ManipulationConfiguration;
use crate::provider::BringIntoViewportRequest;
use crate::snap::{SnapAdjustment, SnapGeometry, nearest_zoom_snap_point, resolve_snap_points};
use crate::{Axis, Rect, Result, ScrollStep, ScrollViewer, SnapPointsAlignment, View};

/// Options of [`ScrollViewer::change_view`]. The default is an animated change that ignores
/// snap points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangeViewOptions {
    /// Pull the target onto mandatory snap points.
    pub adjust_with_mandatory_snap_points: bool,
    /// Ignore the request while a finger is down.
    pub skip_during_touch_contact: bool,
    /// Jump instead of animating when an animation or inertia is already running.
    pub skip_animation_while_running: bool,
    pub disable_animation: bool,
    /// Apply even when the target matches the current or pending view.
    pub force_sync_to_current_view: bool,
}

impl ChangeViewOptions {
    /// A non-animated change.
    pub fn immediate() -> Self {
        Self {
            disable_animation: true,
            ..Self::default()
        }
    }

    pub fn with_mandatory_snap_points(mut self, adjust: bool) -> Self {
        self.adjust_with_mandatory_snap_points = adjust;
        self
    }

    pub fn with_skip_during_touch_contact(mut self, skip: bool) -> Self {
        self.skip_during_touch_contact = skip;
        self
    }

    pub fn with_skip_animation_while_running(mut self, skip: bool) -> Self {
        self.skip_animation_while_running = skip;
        self
    }

    pub fn with_disable_animation(mut self, disable: bool) -> Self {
        self.disable_animation = disable;
        self
    }

    pub fn with_force_sync_to_current_view(mut self, force: bool) -> Self {
        self.force_sync_to_current_view = force;
        self
    }
}

/// A `change_view` target handed to the compositor and not reached yet.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingChangeView {
    /// Target in provider units.
    pub target: View,
    pub animated: bool,
}

impl ScrollViewer {
    /// Moves the view to the given offsets and zoom factor. Omitted values keep the pending or
    /// current ones.
    ///
    /// Returns `Ok(false)` when there is no content or scroll provider, when the request is
    /// skipped during touch contact, and when the target already is the current view.
    pub fn change_view(
        &mut self,
        horizontal_offset: Option<f64>,
        vertical_offset: Option<f64>,
        zoom_factor: Option<f32>,
        options: ChangeViewOptions,
    ) -> Result<bool> {
        let horizontal_offset = horizontal_offset
            .map(|v| check_offset("horizontal offset", v))
            .transpose()?;
        let vertical_offset = vertical_offset
            .map(|v| check_offset("vertical offset", v))
            .transpose()?;
        let zoom_factor = zoom_factor
            .map(|v| check_zoom("zoom factor", v))
            .transpose()?;

        if self.content.is_none() || self.provider.is_none() {
            strace!("change_view without content or scroll provider");
            return Ok(false);
        }
        if options.skip_during_touch_contact
            && self
                .coordinator
                .session()
                .is_some_and(|s| s.is_touch_contact())
        {
            strace!("change_view skipped during touch contact");
            return Ok(false);
        }

        let _batch = self.notifier.batch();
        let _op = self.operation.enter(SyncOperation::ChangeView);

        let current = self.current_target();
        let target = self.resolve_target(
            current,
            [horizontal_offset, vertical_offset],
            zoom_factor,
            options,
        );
        strace!(?current, ?target, ?options, "change_view resolved");

        if !options.force_sync_to_current_view {
            match self.pending {
                Some(pending) if self.views_match(pending.target, target) => return Ok(true),
                None if !self.coordinator.is_manipulating()
                    && self.views_match(self.model.view(), target) =>
                {
                    return Ok(false);
                }
                _ => {}
            }
        }

        let running =
            self.coordinator.is_manipulating() || self.pending.is_some_and(|p| p.animated);
        let animate =
            !options.disable_animation && !(options.skip_animation_while_running && running);

        if self.can_bring_into_viewport(target)
            && self.bring_target_into_viewport(
                target,
                animate,
                options.skip_animation_while_running,
            )?
        {
            self.pending = Some(PendingChangeView {
                target,
                animated: animate,
            });
            return Ok(true);
        }

        let _sync = self.operation.enter(SyncOperation::ZoomSync);
        self.pending = None;
        self.apply_view(target)?;
        if self.coordinator.is_manipulating() {
            if let Some(provider) = self.provider.as_deref_mut() {
                provider.update_layout()?;
            }
        }
        self.refresh()?;
        Ok(true)
    }

    /// The target in flight, else the inertia end projection, else the current view.
    pub(crate) fn current_target(&self) -> View {
        if let Some(pending) = &self.pending {
            return pending.target;
        }
        if let Some(end) = self
            .coordinator
            .session()
            .filter(|s| s.is_inertial)
            .and_then(|s| s.inertia_end)
        {
            let zoom = self.model.clamp_zoom(end.zoom_factor);
            return View::new(
                self.to_provider_offset(Axis::Horizontal, end.horizontal_offset, zoom),
                self.to_provider_offset(Axis::Vertical, end.vertical_offset, zoom),
                zoom,
            );
        }
        self.model.view()
    }

    pub fn pending_change_view(&self) -> Option<&PendingChangeView> {
        self.pending.as_ref()
    }

    fn views_match(&self, a: View, b: View) -> bool {
        let tolerances = &self.options.tolerances;
        (a.horizontal_offset - b.horizontal_offset).abs() <= tolerances.scroll_rounding
            && (a.vertical_offset - b.vertical_offset).abs() <= tolerances.scroll_rounding
            && (a.zoom_factor - b.zoom_factor).abs() <= tolerances.zoom_rounding
    }

    fn resolve_target(
        &self,
        current: View,
        offsets: [Option<f64>; 2],
        zoom_factor: Option<f32>,
        options: ChangeViewOptions,
    ) -> View {
        let mut zoom = self
            .model
            .clamp_zoom(zoom_factor.unwrap_or(current.zoom_factor));
        if options.adjust_with_mandatory_snap_points
            && self.options.zoom_snap_points_type.is_mandatory()
        {
            zoom = self.model.clamp_zoom(nearest_zoom_snap_point(
                &self.options.zoom_snap_points,
                zoom,
                self.model.min_zoom_factor(),
                self.model.max_zoom_factor(),
            ));
        }

        let mut target = View::new(0.0, 0.0, zoom);
        for (axis, requested) in Axis::BOTH.into_iter().zip(offsets) {
            let requested = requested.unwrap_or(current.offset(axis));
            let min = self.model.min_offset(axis);
            let max = self.max_offset_at(axis, zoom);
            let mut offset = requested.clamp(min, max);
            if options.adjust_with_mandatory_snap_points
                && self.options.snap_points_type(axis).is_mandatory()
            {
                offset = self.adjust_to_snap_points(axis, offset, zoom).clamp(min, max);
            }
            target.set_offset(axis, offset);
        }
        target
    }

    /// Largest offset of `axis` in provider units at `zoom_factor`.
    fn max_offset_at(&self, axis: Axis, zoom_factor: f32) -> f64 {
        let state = self.model.axis(axis);
        let max = if state.is_logical {
            state.extent - state.viewport
        } else {
            self.pixel_scrollable_at(axis, zoom_factor)
        };
        if max.is_finite() {
            max.max(state.min_offset)
        } else {
            state.min_offset
        }
    }

    fn adjust_to_snap_points(&self, axis: Axis, offset: f64, zoom_factor: f32) -> f64 {
        let kind = self.options.snap_points_type(axis);
        let alignment = self.options.snap_points_alignment(axis);
        if self.model.axis(axis).is_logical && alignment == SnapPointsAlignment::Near {
            return offset.round();
        }
        let Some(provider) = self.provider.as_deref() else {
            return offset;
        };
        let points = provider
            .snap_points_source()
            .and_then(|s| s.snap_points(axis, alignment));
        let scale = f64::from(zoom_factor) / f64::from(self.model.zoom_factor());
        let geometry = SnapGeometry {
            zoom_factor,
            viewport: self.model.pixel_viewport(axis),
            extent: self.model.pixel_extent(axis) * scale,
            location_tolerance: self.options.tolerances.snap_point_location,
        };
        let Some(set) = resolve_snap_points(points.as_ref(), kind, alignment, &geometry) else {
            return offset;
        };
        let mode = if kind.is_single() {
            SnapAdjustment::MandatorySingle
        } else {
            SnapAdjustment::Mandatory
        };
        let requested = self.to_pixel_offset(axis, offset, zoom_factor);
        let current = self.model.pixel_offset(axis) * scale;
        let adjusted = set.adjust_offset(requested, current, 0.0, geometry.max_offset(), mode);
        strace!(?axis, requested, adjusted, "snapped change_view target");
        self.to_provider_offset(axis, adjusted, zoom_factor)
    }

    fn can_bring_into_viewport(&self, target: View) -> bool {
        if self.compositor.is_none() {
            return false;
        }
        let configurations = self.coordinator.configurations();
        if !configurations.capabilities().with_bring_into_viewport {
            return false;
        }
        Axis::BOTH.into_iter().all(|axis| {
            (target.offset(axis) - self.model.offset(axis)).abs()
                <= self.options.tolerances.scroll_rounding_for_bring_into_viewport
                || configurations
                    .bring_into_viewport
                    .contains(ManipulationConfiguration::pan(axis))
        })
    }

    /// Hands `target` to the compositor. Returns `false` when it declined.
    fn bring_target_into_viewport(
        &mut self,
        target: View,
        animate: bool,
        skip_animation_while_running: bool,
    ) -> Result<bool> {
        let zoom = target.zoom_factor;
        let scale = f64::from(zoom);
        let pixel = View::new(
            self.to_pixel_offset(Axis::Horizontal, target.horizontal_offset, zoom),
            self.to_pixel_offset(Axis::Vertical, target.vertical_offset, zoom),
            zoom,
        );
        let request = BringIntoViewportRequest {
            bounds: Rect::new(
                pixel.horizontal_offset / scale,
                pixel.vertical_offset / scale,
                self.model.pixel_viewport(Axis::Horizontal) / scale,
                self.model.pixel_viewport(Axis::Vertical) / scale,
            ),
            target: pixel,
            translation: self.alignment_translation_at(zoom),
            animate,
            skip_animation_while_running,
        };
        let Some(compositor) = self.compositor.as_deref_mut() else {
            return Ok(false);
        };
        let _op = self.operation.enter(SyncOperation::BringIntoViewport);
        let accepted = compositor.bring_into_viewport(&request)?;
        sdebug!(?request, accepted, "bring into viewport");
        Ok(accepted)
    }

    /// Zooms and scrolls so that `bounds` (unzoomed content coordinates) fills the viewport.
    pub fn zoom_to_rect(&mut self, bounds: Rect, animate: bool) -> Result<bool> {
        for value in [bounds.x, bounds.y, bounds.width, bounds.height] {
            check_offset("bounds", value)?;
        }
        let mut zoom = self.model.zoom_factor();
        let fits = Axis::BOTH
            .into_iter()
            .filter(|&axis| bounds.length(axis) > 0.0)
            .map(|axis| self.model.pixel_viewport(axis) / bounds.length(axis))
            .filter(|ratio| ratio.is_finite())
            .reduce(f64::min);
        if let Some(fit) = fits {
            zoom = self.model.clamp_zoom(fit as f32);
        }
        let scale = f64::from(zoom);
        let horizontal = self.to_provider_offset(Axis::Horizontal, bounds.x * scale, zoom);
        let vertical = self.to_provider_offset(Axis::Vertical, bounds.y * scale, zoom);
        self.change_view(
            Some(horizontal),
            Some(vertical),
            Some(zoom),
            ChangeViewOptions::default().with_disable_animation(!animate),
        )
    }

    pub fn scroll_to_horizontal_offset(&mut self, offset: f64) -> Result<bool> {
        self.change_view(Some(offset), None, None, ChangeViewOptions::immediate())
    }

    pub fn scroll_to_vertical_offset(&mut self, offset: f64) -> Result<bool> {
        self.change_view(None, Some(offset), None, ChangeViewOptions::immediate())
    }

    pub fn zoom_to_factor(&mut self, zoom_factor: f32) -> Result<bool> {
        self.change_view(None, None, Some(zoom_factor), ChangeViewOptions::immediate())
    }

    /// Runs a directional step on the scroll provider and pulls the resulting state.
    pub fn step(&mut self, step: ScrollStep) -> Result<()> {
        let Some(provider) = self.provider.as_deref_mut() else {
            return Ok(());
        };
        let _batch = self.notifier.batch();
        let _op = self.operation.enter(SyncOperation::ZoomSync);
        self.pending = None;
        provider.step(step)?;
        self.refresh()
    }

    pub fn line_up(&mut self) -> Result<()> {
        self.step(ScrollStep::LineUp)
    }

    pub fn line_down(&mut self) -> Result<()> {
        self.step(ScrollStep::LineDown)
    }

    pub fn line_left(&mut self) -> Result<()> {
        self.step(ScrollStep::LineLeft)
    }

    pub fn line_right(&mut self) -> Result<()> {
        self.step(ScrollStep::LineRight)
    }

    pub fn page_up(&mut self) -> Result<()> {
        self.step(ScrollStep::PageUp)
    }

    pub fn page_down(&mut self) -> Result<()> {
        self.step(ScrollStep::PageDown)
    }

    pub fn page_left(&mut self) -> Result<()> {
        self.step(ScrollStep::PageLeft)
    }

    pub fn page_right(&mut self) -> Result<()> {
        self.step(ScrollStep::PageRight)
    }

    pub fn page_home(&mut self) -> Result<()> {
        self.step(ScrollStep::Home)
    }

    pub fn page_end(&mut self) -> Result<()> {
        self.step(ScrollStep::End)
    }
}
