//! Manipulation configurations, content alignment and the gesture lifecycle.

use alloc::vec::Vec;

use bitflags::bitflags;

use crate::field::FieldEffects;
use crate::guard::SyncOperation;
use crate::{
    Axis, CompositorAlignment, ContentAlignment, ElementId, Error, Point, Result,
    ScrollBarVisibility, ScrollMode, ScrollViewer, ScrollViewerOptions, Size, View, ViewportModel,
    ZoomMode,
};

bitflags! {
    /// Capabilities a compositor may use while manipulating the content.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ManipulationConfiguration: u8 {
        const PAN_X = 1 << 0;
        const PAN_Y = 1 << 1;
        const ZOOM = 1 << 2;
        const RAIL_X = 1 << 3;
        const RAIL_Y = 1 << 4;
        const INERTIA_PAN = 1 << 5;
        const INERTIA_ZOOM = 1 << 6;
    }
}

impl ManipulationConfiguration {
    pub fn pan(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::PAN_X,
            Axis::Vertical => Self::PAN_Y,
        }
    }

    pub fn rail(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::RAIL_X,
            Axis::Vertical => Self::RAIL_Y,
        }
    }

    /// Whether the configuration can move the view at all.
    pub fn can_manipulate(self) -> bool {
        self.intersects(Self::PAN_X | Self::PAN_Y | Self::ZOOM)
    }
}

/// How an axis takes part in touch manipulations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AxisManipulability {
    None,
    /// Offered both with and without this axis; the compositor picks by contact point.
    Optional,
    Required,
}

/// The configurations exposed to the compositor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfigurationSet {
    /// Alternatives for touch gestures. Exactly one becomes active per gesture.
    pub touch: Vec<ManipulationConfiguration>,
    /// Used for non-touch input (mouse wheel, touchpad).
    pub non_touch: ManipulationConfiguration,
    /// Used to animate bring-into-viewport requests.
    pub bring_into_viewport: ManipulationConfiguration,
}

impl ConfigurationSet {
    pub fn contains_touch(&self, configuration: ManipulationConfiguration) -> bool {
        self.touch.contains(&configuration)
    }

    pub fn capabilities(&self) -> ManipulationCapabilities {
        ManipulationCapabilities {
            by_touch: self.touch.iter().any(|c| c.can_manipulate()),
            non_touch: self.non_touch.can_manipulate(),
            with_bring_into_viewport: self.bring_into_viewport.can_manipulate(),
        }
    }
}

/// Which kinds of manipulation the compositor may perform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManipulationCapabilities {
    pub by_touch: bool,
    pub non_touch: bool,
    pub with_bring_into_viewport: bool,
}

impl ManipulationCapabilities {
    pub fn none() -> Self {
        Self::default()
    }
}

fn axis_manipulability(
    options: &ScrollViewerOptions,
    model: &ViewportModel,
    axis: Axis,
) -> AxisManipulability {
    if options.scroll_bar_visibility(axis) == ScrollBarVisibility::Disabled {
        return AxisManipulability::None;
    }
    match options.scroll_mode(axis) {
        ScrollMode::Disabled => AxisManipulability::None,
        ScrollMode::Enabled => AxisManipulability::Required,
        ScrollMode::Auto if model.axis(axis).is_scrollable() => AxisManipulability::Required,
        ScrollMode::Auto => AxisManipulability::Optional,
    }
}

fn decorate(
    options: &ScrollViewerOptions,
    mut config: ManipulationConfiguration,
) -> ManipulationConfiguration {
    if config.contains(ManipulationConfiguration::PAN_X | ManipulationConfiguration::PAN_Y) {
        for axis in Axis::BOTH {
            if options.is_rail_enabled(axis) {
                config |= ManipulationConfiguration::rail(axis);
            }
        }
    }
    if options.is_scroll_inertia_enabled
        && config.intersects(ManipulationConfiguration::PAN_X | ManipulationConfiguration::PAN_Y)
    {
        config |= ManipulationConfiguration::INERTIA_PAN;
    }
    if options.is_zoom_inertia_enabled && config.contains(ManipulationConfiguration::ZOOM) {
        config |= ManipulationConfiguration::INERTIA_ZOOM;
    }
    config
}

/// Computes the configurations for the current options and scroll state.
///
/// Required axes appear in every touch configuration. Each subset of the optional axes adds one
/// alternative.
pub fn compute_configurations(
    options: &ScrollViewerOptions,
    model: &ViewportModel,
) -> ConfigurationSet {
    let mut base = ManipulationConfiguration::empty();
    let mut optional = Vec::new();
    for axis in Axis::BOTH {
        match axis_manipulability(options, model, axis) {
            AxisManipulability::None => {}
            AxisManipulability::Optional => optional.push(ManipulationConfiguration::pan(axis)),
            AxisManipulability::Required => base |= ManipulationConfiguration::pan(axis),
        }
    }
    if options.zoom_mode == ZoomMode::Enabled {
        base |= ManipulationConfiguration::ZOOM;
    }

    let mut touch: Vec<ManipulationConfiguration> = Vec::new();
    for mask in 0..(1u8 << optional.len()) {
        let mut config = base;
        for (bit, pan) in optional.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                config |= *pan;
            }
        }
        let config = decorate(options, config);
        if !touch.contains(&config) {
            touch.push(config);
        }
    }

    let mut bring_into_viewport = ManipulationConfiguration::ZOOM;
    for axis in Axis::BOTH {
        if options.scroll_bar_visibility(axis) != ScrollBarVisibility::Disabled {
            bring_into_viewport |= ManipulationConfiguration::pan(axis);
        }
    }

    ConfigurationSet {
        touch,
        non_touch: base,
        bring_into_viewport,
    }
}

/// Resolves the alignment pushed to the compositor for `axis`.
///
/// `stretch_as_near` is the sticky observation that the content overflowed the viewport.
/// A pinned header forces `Near`.
pub fn compositor_alignment(
    alignment: ContentAlignment,
    stretch_as_near: bool,
    pinned: bool,
) -> CompositorAlignment {
    if pinned {
        return CompositorAlignment::Near;
    }
    match alignment {
        ContentAlignment::Near => CompositorAlignment::Near,
        ContentAlignment::Center => CompositorAlignment::Center,
        ContentAlignment::Far => CompositorAlignment::Far,
        ContentAlignment::Stretch if stretch_as_near => CompositorAlignment::Near,
        ContentAlignment::Stretch => CompositorAlignment::Center,
    }
}

/// Viewport dimension as the compositor sees it: whole pixels, rounded down.
pub fn adjust_pixel_viewport_dim(viewport: f64) -> f64 {
    viewport.floor()
}

/// Content dimension as the compositor sees it: whole pixels, rounded up.
pub fn adjust_pixel_content_dim(content: f64) -> f64 {
    content.ceil()
}

/// Translation applied to content smaller than the viewport.
pub fn alignment_translation(alignment: CompositorAlignment, content: f64, viewport: f64) -> f64 {
    let viewport = adjust_pixel_viewport_dim(viewport);
    let content = adjust_pixel_content_dim(content);
    if !viewport.is_finite() || content >= viewport {
        return 0.0;
    }
    match alignment {
        CompositorAlignment::Near => 0.0,
        CompositorAlignment::Center => (viewport - content) / 2.0,
        CompositorAlignment::Far => viewport - content,
    }
}

/// The primary content as reported to the compositor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimaryContent {
    pub element: ElementId,
    pub horizontal_alignment: CompositorAlignment,
    pub vertical_alignment: CompositorAlignment,
    /// Zoomed content size, rounded up.
    pub content_size: Size,
    /// Viewport size, rounded down.
    pub viewport_size: Size,
    pub headers: Size,
    pub min_zoom_factor: f32,
    pub max_zoom_factor: f32,
}

/// Transform of the primary content: translation then uniform zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub zoom_factor: f32,
}

/// Lifecycle state of a manipulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ManipulationState {
    #[default]
    Idle,
    Starting,
    Started,
    Delta,
    Completed,
}

/// What drives a manipulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ManipulationKind {
    /// A touch gesture, announced by `on_manipulation_starting`.
    Gesture,
    /// The compositor animating a bring-into-viewport request.
    BringIntoViewport,
    /// A contactless constant-velocity pan.
    ConstantVelocity,
}

/// One compositor delta. Translation and zoom are cumulative since the manipulation started.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManipulationDelta {
    /// Cumulative content translation in pixels. Positive values move the content right/down.
    pub translation: Point,
    /// Cumulative zoom multiplier.
    pub zoom: f32,
    pub is_inertial: bool,
    /// Projected resting view (pixel offsets) while inertial.
    pub inertia_end: Option<View>,
    /// The terminal delta of the manipulation.
    pub is_last: bool,
}

impl ManipulationDelta {
    pub fn new(translation: Point, zoom: f32) -> Self {
        Self {
            translation,
            zoom,
            is_inertial: false,
            inertia_end: None,
            is_last: false,
        }
    }

    pub fn inertial(mut self, inertia_end: Option<View>) -> Self {
        self.is_inertial = true;
        self.inertia_end = inertia_end;
        self
    }

    pub fn last(mut self) -> Self {
        self.is_last = true;
        self
    }
}

/// The live manipulation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManipulationSession {
    pub state: ManipulationState,
    pub kind: ManipulationKind,
    pub configuration: ManipulationConfiguration,
    pub cumulative_translation: Point,
    pub cumulative_zoom: f32,
    pub is_inertial: bool,
    pub inertia_end: Option<View>,
    pub pre_pixel_offset: Point,
    pub pre_zoom_factor: f32,
    /// Scroll bar visibilities when the manipulation started.
    pub scroll_bar_visibilities: [ScrollBarVisibility; 2],
    /// `stop_inertia` was requested.
    pub stopped: bool,
}

impl ManipulationSession {
    fn new(
        kind: ManipulationKind,
        configuration: ManipulationConfiguration,
        model: &ViewportModel,
        options: &ScrollViewerOptions,
    ) -> Self {
        Self {
            state: ManipulationState::Starting,
            kind,
            configuration,
            cumulative_translation: Point::default(),
            cumulative_zoom: 1.0,
            is_inertial: false,
            inertia_end: None,
            pre_pixel_offset: Point::new(
                model.pixel_offset(Axis::Horizontal),
                model.pixel_offset(Axis::Vertical),
            ),
            pre_zoom_factor: model.zoom_factor(),
            scroll_bar_visibilities: [
                options.horizontal_scroll_bar_visibility,
                options.vertical_scroll_bar_visibility,
            ],
            stopped: false,
        }
    }

    pub fn scroll_bar_visibility(&self, axis: Axis) -> ScrollBarVisibility {
        match axis {
            Axis::Horizontal => self.scroll_bar_visibilities[0],
            Axis::Vertical => self.scroll_bar_visibilities[1],
        }
    }

    /// Touch contact is down (the gesture is neither inertial nor programmatic).
    pub fn is_touch_contact(&self) -> bool {
        self.kind == ManipulationKind::Gesture && !self.is_inertial
    }
}

/// Manipulation bookkeeping of a [`ScrollViewer`].
#[derive(Clone, Debug, Default)]
pub struct ManipulationCoordinator {
    session: Option<ManipulationSession>,
    configurations: ConfigurationSet,
    capabilities: ManipulationCapabilities,
    deferred: FieldEffects,
    intermediate: bool,
    intermediate_raised: bool,
    stretch_as_near: [bool; 2],
    primary_content: Option<PrimaryContent>,
    constant_velocity: Option<Point>,
}

impl ManipulationCoordinator {
    pub fn session(&self) -> Option<&ManipulationSession> {
        self.session.as_ref()
    }

    pub fn is_manipulating(&self) -> bool {
        self.session.is_some()
    }

    pub fn configurations(&self) -> &ConfigurationSet {
        &self.configurations
    }

    pub fn capabilities(&self) -> ManipulationCapabilities {
        self.capabilities
    }

    /// Invalidations waiting for the live manipulation to complete.
    pub fn deferred(&self) -> FieldEffects {
        self.deferred
    }

    /// View-changed notifications are intermediate until the manipulation completes.
    pub fn is_intermediate(&self) -> bool {
        self.intermediate
    }

    pub fn primary_content(&self) -> Option<&PrimaryContent> {
        self.primary_content.as_ref()
    }

    pub(crate) fn stretch_as_near(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.stretch_as_near[0],
            Axis::Vertical => self.stretch_as_near[1],
        }
    }

    /// Records overflow on `axis`. Returns `true` when the sticky flag flipped.
    pub(crate) fn observe_overflow(&mut self, axis: Axis, overflows: bool) -> bool {
        let slot = match axis {
            Axis::Horizontal => &mut self.stretch_as_near[0],
            Axis::Vertical => &mut self.stretch_as_near[1],
        };
        if overflows && !*slot {
            *slot = true;
            return true;
        }
        false
    }

    /// Forgets what was pushed so the next push reaches a newly attached compositor.
    pub(crate) fn reset_pushed(&mut self) {
        self.configurations = ConfigurationSet::default();
        self.capabilities = ManipulationCapabilities::none();
        self.primary_content = None;
    }

    pub(crate) fn reset_stretch(&mut self) {
        self.stretch_as_near = [false; 2];
    }

    fn enter_intermediate(&mut self) {
        if !self.intermediate {
            self.intermediate = true;
            self.intermediate_raised = false;
        }
    }

    /// Leaves intermediate mode. Returns `true` when intermediate notifications were raised and a
    /// final one is owed.
    fn leave_intermediate(&mut self) -> bool {
        let owed = self.intermediate && self.intermediate_raised;
        self.intermediate = false;
        self.intermediate_raised = false;
        owed
    }

    pub(crate) fn mark_intermediate_raised(&mut self) {
        if self.intermediate {
            self.intermediate_raised = true;
        }
    }
}

impl ScrollViewer {
    /// Recomputes the configurations, or defers it while a manipulation is live.
    pub(crate) fn invalidate_manipulability(&mut self) {
        if self.coordinator.is_manipulating() {
            self.coordinator.deferred |= FieldEffects::MANIPULABILITY;
            strace!("deferring configuration update");
            return;
        }
        self.push_configurations();
    }

    pub(crate) fn push_configurations(&mut self) {
        let configurations = if self.content.is_some() && self.provider.is_some() {
            compute_configurations(&self.options, &self.model)
        } else {
            ConfigurationSet::default()
        };
        let capabilities = configurations.capabilities();
        let changed = configurations != self.coordinator.configurations;
        let capabilities_changed = capabilities != self.coordinator.capabilities;
        self.coordinator.configurations = configurations;
        self.coordinator.capabilities = capabilities;

        if changed {
            sdebug!(
                touch = self.coordinator.configurations.touch.len(),
                "pushing manipulation configurations"
            );
            let configurations = self.coordinator.configurations.clone();
            self.notify_compositor(|c| c.notify_viewport_changed(&configurations));
        }
        if capabilities_changed {
            self.notify_compositor(|c| c.notify_can_manipulate_elements(capabilities));
        }
    }

    /// Pushes the primary content (alignment and sizes) when it changed, or defers it while a
    /// manipulation is live.
    pub(crate) fn invalidate_content_alignment(&mut self) {
        if self.coordinator.is_manipulating() {
            self.coordinator.deferred |= FieldEffects::CONTENT_ALIGNMENT;
            return;
        }
        self.push_primary_content();
    }

    pub(crate) fn push_primary_content(&mut self) {
        let Some(element) = self.content else {
            self.coordinator.primary_content = None;
            return;
        };
        let alignment = |axis: Axis| {
            compositor_alignment(
                self.options.content_alignment(axis),
                self.coordinator.stretch_as_near(axis),
                self.pinned_headers.is_pinned(axis),
            )
        };
        let content = PrimaryContent {
            element,
            horizontal_alignment: alignment(Axis::Horizontal),
            vertical_alignment: alignment(Axis::Vertical),
            content_size: Size::new(
                adjust_pixel_content_dim(self.model.pixel_extent(Axis::Horizontal)),
                adjust_pixel_content_dim(self.model.pixel_extent(Axis::Vertical)),
            ),
            viewport_size: Size::new(
                adjust_pixel_viewport_dim(self.model.pixel_viewport(Axis::Horizontal)),
                adjust_pixel_viewport_dim(self.model.pixel_viewport(Axis::Vertical)),
            ),
            headers: self.pinned_headers.size(),
            min_zoom_factor: self.model.min_zoom_factor(),
            max_zoom_factor: self.model.max_zoom_factor(),
        };
        if self.coordinator.primary_content == Some(content) {
            return;
        }
        self.coordinator.primary_content = Some(content);
        strace!(?content, "primary content changed");
        self.notify_compositor(|c| c.notify_primary_content_changed(&content));
    }

    /// Alignment translation of the content at `zoom_factor`.
    pub(crate) fn alignment_translation_at(&self, zoom_factor: f32) -> Point {
        let scale = f64::from(zoom_factor) / f64::from(self.model.zoom_factor());
        let mut translation = Point::default();
        for axis in Axis::BOTH {
            let alignment = compositor_alignment(
                self.options.content_alignment(axis),
                self.coordinator.stretch_as_near(axis),
                self.pinned_headers.is_pinned(axis),
            );
            translation.set(
                axis,
                alignment_translation(
                    alignment,
                    self.model.pixel_extent(axis) * scale,
                    self.model.pixel_viewport(axis),
                ),
            );
        }
        translation
    }

    /// The transform the compositor should apply to the primary content.
    pub fn primary_content_transform(&self) -> ContentTransform {
        let translation = self.alignment_translation_at(self.model.zoom_factor());
        ContentTransform {
            translate_x: translation.x - self.model.pixel_offset(Axis::Horizontal),
            translate_y: translation.y - self.model.pixel_offset(Axis::Vertical),
            zoom_factor: self.model.zoom_factor(),
        }
    }

    pub fn manipulation(&self) -> &ManipulationCoordinator {
        &self.coordinator
    }

    /// A touch gesture is about to start with `configuration`, picked from the offered set.
    pub fn on_manipulation_starting(
        &mut self,
        configuration: ManipulationConfiguration,
    ) -> Result<()> {
        if self.coordinator.session.is_some() {
            return Err(Error::invalid_operation(
                "a manipulation is already in progress",
            ));
        }
        if !self.coordinator.configurations.contains_touch(configuration) {
            return Err(Error::invalid_argument(
                "configuration is not part of the offered set",
            ));
        }
        sdebug!(?configuration, "manipulation starting");
        let session = ManipulationSession::new(
            ManipulationKind::Gesture,
            configuration,
            &self.model,
            &self.options,
        );
        self.begin_session(session);
        Ok(())
    }

    fn begin_session(&mut self, session: ManipulationSession) {
        let pre = session.pre_pixel_offset;
        let pre_zoom = f64::from(session.pre_zoom_factor);
        self.coordinator.session = Some(session);
        self.model.set_in_manipulation(true);
        if let Some(logical) = self
            .provider
            .as_deref_mut()
            .and_then(|p| p.logical_offset_provider_mut())
        {
            let axis = logical.physical_orientation();
            logical.update_in_manipulation(true, Some(pre.get(axis) / pre_zoom));
        }
    }

    /// The compositor started moving the view.
    ///
    /// Without a preceding `on_manipulation_starting` this opens a programmatic session: a
    /// constant-velocity pan when one was requested, a bring-into-viewport otherwise.
    pub fn on_manipulation_started(&mut self) -> Result<()> {
        match self.coordinator.session.as_mut() {
            Some(session) if session.state == ManipulationState::Starting => {
                session.state = ManipulationState::Started;
            }
            Some(_) => {
                return Err(Error::invalid_operation("manipulation already started"));
            }
            None => {
                let (kind, configuration) = if self.coordinator.constant_velocity.is_some() {
                    (
                        ManipulationKind::ConstantVelocity,
                        self.coordinator.configurations.non_touch,
                    )
                } else {
                    (
                        ManipulationKind::BringIntoViewport,
                        self.coordinator.configurations.bring_into_viewport,
                    )
                };
                let mut session =
                    ManipulationSession::new(kind, configuration, &self.model, &self.options);
                session.state = ManipulationState::Started;
                self.begin_session(session);
            }
        }
        sdebug!("manipulation started");
        self.coordinator.enter_intermediate();
        Ok(())
    }

    /// Applies a compositor delta.
    pub fn on_manipulation_delta(&mut self, delta: ManipulationDelta) -> Result<()> {
        if !delta.translation.x.is_finite()
            || !delta.translation.y.is_finite()
            || !(delta.zoom.is_finite() && delta.zoom > 0.0)
        {
            return Err(Error::invalid_argument("manipulation delta must be finite"));
        }
        let Some(session) = self.coordinator.session.as_mut() else {
            return Err(Error::invalid_operation("no manipulation in progress"));
        };
        if session.state == ManipulationState::Starting {
            return Err(Error::invalid_operation("manipulation has not started"));
        }
        session.state = ManipulationState::Delta;
        session.cumulative_translation = delta.translation;
        session.cumulative_zoom = delta.zoom;
        session.is_inertial = delta.is_inertial;
        session.inertia_end = if delta.is_inertial {
            delta.inertia_end
        } else {
            None
        };
        let pre = session.pre_pixel_offset;
        let pre_zoom = session.pre_zoom_factor;
        let visibilities = session.scroll_bar_visibilities;

        let _batch = self.notifier.batch();
        let _op = self.operation.enter(SyncOperation::ManipulationSync);

        let zoom = self.model.clamp_zoom(pre_zoom * delta.zoom);
        let scale = f64::from(zoom) / f64::from(pre_zoom);
        let mut target = View::new(0.0, 0.0, zoom);
        for axis in Axis::BOTH {
            let unbound = pre.get(axis) * scale - delta.translation.get(axis);
            self.model.set_unbound_offset(axis, unbound);
            let max = self.pixel_scrollable_at(axis, zoom);
            let pixel = unbound.clamp(0.0, max);
            target.set_offset(axis, self.to_provider_offset(axis, pixel, zoom));
        }
        strace!(?target, is_inertial = delta.is_inertial, "manipulation delta");
        self.apply_view(target)?;
        self.refresh()?;

        if delta.is_last {
            self.correct_disabled_axes(visibilities)?;
        }
        Ok(())
    }

    /// Snaps back axes whose scroll bars are disabled but which moved anyway.
    fn correct_disabled_axes(&mut self, visibilities: [ScrollBarVisibility; 2]) -> Result<()> {
        let mut target = self.model.pixel_view();
        let mut needed = false;
        for (axis, visibility) in Axis::BOTH.into_iter().zip(visibilities) {
            if visibility == ScrollBarVisibility::Disabled && self.model.pixel_offset(axis) != 0.0 {
                target.set_offset(axis, 0.0);
                needed = true;
            }
        }
        if !needed {
            return Ok(());
        }
        let Some(compositor) = self.compositor.as_deref_mut() else {
            return Ok(());
        };
        let zoom = f64::from(target.zoom_factor);
        let request = crate::provider::BringIntoViewportRequest {
            bounds: crate::Rect::new(
                target.horizontal_offset / zoom,
                target.vertical_offset / zoom,
                self.model.pixel_viewport(Axis::Horizontal) / zoom,
                self.model.pixel_viewport(Axis::Vertical) / zoom,
            ),
            target,
            translation: Point::default(),
            animate: false,
            skip_animation_while_running: false,
        };
        sdebug!(?target, "correcting offset on a disabled axis");
        let _op = self.operation.enter(SyncOperation::BringIntoViewport);
        compositor.bring_into_viewport(&request)?;
        Ok(())
    }

    /// The manipulation ended. A completion without a live manipulation is ignored.
    pub fn on_manipulation_completed(&mut self) -> Result<()> {
        let Some(session) = self.coordinator.session.take() else {
            strace!("ignoring completion without a manipulation");
            return Ok(());
        };
        sdebug!(kind = ?session.kind, stopped = session.stopped, "manipulation completed");

        let _batch = self.notifier.batch();
        self.pending = None;
        if session.kind == ManipulationKind::ConstantVelocity {
            self.coordinator.constant_velocity = None;
        }
        self.model.set_in_manipulation(false);
        if let Some(logical) = self
            .provider
            .as_deref_mut()
            .and_then(|p| p.logical_offset_provider_mut())
        {
            logical.update_in_manipulation(false, None);
        }
        self.refresh()?;
        if self.coordinator.leave_intermediate() {
            let view = self.model.view();
            self.notifier.view_changed(crate::ViewChangedEvent {
                view,
                is_intermediate: false,
            });
        }
        self.flush_deferred();
        Ok(())
    }

    fn flush_deferred(&mut self) {
        let deferred = core::mem::take(&mut self.coordinator.deferred);
        if deferred.is_empty() {
            return;
        }
        sdebug!(?deferred, "flushing deferred invalidations");
        if deferred.contains(FieldEffects::MANIPULABILITY) {
            self.push_configurations();
        }
        if deferred.contains(FieldEffects::CONTENT_ALIGNMENT) {
            self.push_primary_content();
        }
    }

    /// Asks the compositor to stop the running inertia.
    ///
    /// The compositor still reports completion; a completion arriving after the session ended is
    /// ignored.
    pub fn stop_inertia(&mut self) -> Result<()> {
        let Some(session) = self.coordinator.session.as_mut() else {
            return Ok(());
        };
        session.stopped = true;
        if let Some(compositor) = self.compositor.as_deref_mut() {
            compositor.stop_inertia()?;
        }
        Ok(())
    }

    /// Starts a contactless pan at `dx`/`dy` pixels per second. Zero velocities stop it.
    pub fn set_constant_velocities(&mut self, dx: f64, dy: f64) -> Result<()> {
        if !dx.is_finite() || !dy.is_finite() {
            return Err(Error::invalid_argument("velocities must be finite"));
        }
        let Some(compositor) = self.compositor.as_deref_mut() else {
            return Err(Error::invalid_operation("no compositor attached"));
        };
        compositor.set_constant_velocities(dx, dy)?;
        self.coordinator.constant_velocity = if dx == 0.0 && dy == 0.0 {
            None
        } else {
            Some(Point::new(dx, dy))
        };
        Ok(())
    }
}
