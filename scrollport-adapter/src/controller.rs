use alloc::boxed::Box;

use scrollport::{
    Axis, ChangeViewOptions, Error, ManipulationConfiguration, ManipulationDelta, Point, Result,
    ScrollViewer, ScrollViewerOptions, View,
};

use crate::{CompositorCommand, Easing, SimulatedCompositor, Tween};

/// Default length of an animated bring-into-viewport.
pub const DEFAULT_ANIMATION_MS: u64 = 250;

/// Default inertia deceleration in pixels per square millisecond.
pub const DEFAULT_DECELERATION: f64 = 0.002;

// Moves older than this at release time do not start inertia.
const VELOCITY_WINDOW_MS: u64 = 100;
// Pixels per millisecond.
const MIN_INERTIA_SPEED: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Motion {
    Animation {
        tween: Tween,
        pre: View,
    },
    Touch {
        configuration: ManipulationConfiguration,
        pre: View,
        translation: Point,
        zoom: f32,
        rail: Option<Axis>,
        velocity: Point,
        last_ms: u64,
    },
    Inertia {
        tween: Tween,
        pre: View,
    },
    ConstantVelocity {
        pre: View,
        base: Point,
        velocity: Point,
        start_ms: u64,
    },
}

/// A framework-neutral controller that wraps a [`ScrollViewer`] and a [`SimulatedCompositor`],
/// turning compositor commands and touch input into the viewer's manipulation callbacks.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `begin_touch` / `touch_move` / `touch_zoom` / `release_touch` for finger input
/// - `change_view`, `set_constant_velocities`, `stop_inertia` for programmatic motion
/// - `tick(now_ms)` each frame, which advances animations, inertia and constant-velocity pans
///
/// All offsets handed to the viewer follow its pixel conventions: a delta's translation is the
/// cumulative content movement since the manipulation started.
#[derive(Debug)]
pub struct Controller {
    viewer: ScrollViewer,
    compositor: SimulatedCompositor,
    motion: Option<Motion>,
    animation_ms: u64,
    easing: Easing,
    deceleration: f64,
}

/// The delta moving a manipulation that started at `pre` to `target` (both pixel views).
fn delta_towards(pre: View, target: View) -> ManipulationDelta {
    let zoom = target.zoom_factor / pre.zoom_factor;
    let scale = f64::from(zoom);
    let translation = Point::new(
        pre.horizontal_offset * scale - target.horizontal_offset,
        pre.vertical_offset * scale - target.vertical_offset,
    );
    ManipulationDelta::new(translation, zoom)
}

impl Controller {
    pub fn new(options: ScrollViewerOptions) -> Result<Self> {
        Ok(Self::from_viewer(ScrollViewer::new(options)?))
    }

    /// Attaches a fresh [`SimulatedCompositor`] to `viewer`.
    pub fn from_viewer(mut viewer: ScrollViewer) -> Self {
        let compositor = SimulatedCompositor::new();
        viewer.set_compositor(Some(Box::new(compositor.clone())));
        Self {
            viewer,
            compositor,
            motion: None,
            animation_ms: DEFAULT_ANIMATION_MS,
            easing: Easing::EaseInOutCubic,
            deceleration: DEFAULT_DECELERATION,
        }
    }

    pub fn with_animation(mut self, duration_ms: u64, easing: Easing) -> Self {
        self.animation_ms = duration_ms;
        self.easing = easing;
        self
    }

    /// Inertia deceleration in pixels per square millisecond.
    pub fn with_deceleration(mut self, deceleration: f64) -> Self {
        if deceleration.is_finite() && deceleration > 0.0 {
            self.deceleration = deceleration;
        }
        self
    }

    pub fn viewer(&self) -> &ScrollViewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut ScrollViewer {
        &mut self.viewer
    }

    pub fn compositor(&self) -> &SimulatedCompositor {
        &self.compositor
    }

    /// Detaches the simulated compositor and returns the viewer.
    pub fn into_viewer(mut self) -> ScrollViewer {
        self.viewer.set_compositor(None);
        self.viewer
    }

    /// An animation, inertia or constant-velocity pan is running.
    pub fn is_animating(&self) -> bool {
        matches!(
            self.motion,
            Some(Motion::Animation { .. } | Motion::Inertia { .. } | Motion::ConstantVelocity { .. })
        )
    }

    pub fn is_touching(&self) -> bool {
        matches!(self.motion, Some(Motion::Touch { .. }))
    }

    /// Ends whatever is running and completes the live manipulation.
    pub fn cancel_motion(&mut self) -> Result<()> {
        if let Some(_motion) = self.motion.take() {
            adebug!(motion = ?_motion, "motion cancelled");
        }
        if self.viewer.manipulation().is_manipulating() {
            self.viewer.on_manipulation_completed()?;
        }
        Ok(())
    }

    /// Forwards to [`ScrollViewer::change_view`] and processes the resulting compositor work.
    pub fn change_view(
        &mut self,
        horizontal_offset: Option<f64>,
        vertical_offset: Option<f64>,
        zoom_factor: Option<f32>,
        options: ChangeViewOptions,
        now_ms: u64,
    ) -> Result<bool> {
        let handled =
            self.viewer
                .change_view(horizontal_offset, vertical_offset, zoom_factor, options)?;
        self.pump(now_ms)?;
        Ok(handled)
    }

    /// Starts, retargets (non-zero) or stops (zero) a contactless pan, in pixels per second.
    pub fn set_constant_velocities(&mut self, dx: f64, dy: f64, now_ms: u64) -> Result<()> {
        self.viewer.set_constant_velocities(dx, dy)?;
        self.pump(now_ms)
    }

    pub fn stop_inertia(&mut self, now_ms: u64) -> Result<()> {
        self.viewer.stop_inertia()?;
        self.pump(now_ms)
    }

    /// Puts a finger down, using the offered touch configuration that pans the most axes.
    pub fn begin_touch(&mut self, now_ms: u64) -> Result<ManipulationConfiguration> {
        let pans = ManipulationConfiguration::PAN_X | ManipulationConfiguration::PAN_Y;
        let configuration = self
            .viewer
            .configurations()
            .touch
            .iter()
            .copied()
            .filter(|c| c.can_manipulate())
            .max_by_key(|c| (*c & pans).bits().count_ones())
            .ok_or_else(|| Error::invalid_operation("no touch manipulation is offered"))?;
        self.begin_touch_with(configuration, now_ms)?;
        Ok(configuration)
    }

    /// Puts a finger down with a specific offered configuration.
    pub fn begin_touch_with(
        &mut self,
        configuration: ManipulationConfiguration,
        now_ms: u64,
    ) -> Result<()> {
        self.cancel_motion()?;
        let pre = self.viewer.viewport_model().pixel_view();
        self.viewer.on_manipulation_starting(configuration)?;
        self.viewer.on_manipulation_started()?;
        adebug!(?configuration, "touch started");
        self.motion = Some(Motion::Touch {
            configuration,
            pre,
            translation: Point::default(),
            zoom: 1.0,
            rail: None,
            velocity: Point::default(),
            last_ms: now_ms,
        });
        Ok(())
    }

    /// The finger moved by `dx`/`dy` pixels. The content follows the finger.
    pub fn touch_move(&mut self, dx: f64, dy: f64, now_ms: u64) -> Result<()> {
        let Some(Motion::Touch {
            configuration,
            pre,
            mut translation,
            zoom,
            mut rail,
            last_ms,
            ..
        }) = self.motion
        else {
            return Err(Error::invalid_operation("no touch in progress"));
        };
        let both = ManipulationConfiguration::PAN_X | ManipulationConfiguration::PAN_Y;
        // The rail is picked by the first move only.
        if translation == Point::default() && configuration.contains(both) {
            rail = if dx.abs() > 2.0 * dy.abs()
                && configuration.contains(ManipulationConfiguration::RAIL_X)
            {
                Some(Axis::Horizontal)
            } else if dy.abs() > 2.0 * dx.abs()
                && configuration.contains(ManipulationConfiguration::RAIL_Y)
            {
                Some(Axis::Vertical)
            } else {
                None
            };
            atrace!(?rail, "rail picked");
        }
        let mut moved = Point::default();
        for (axis, d) in [(Axis::Horizontal, dx), (Axis::Vertical, dy)] {
            let allowed = configuration.contains(ManipulationConfiguration::pan(axis))
                && rail.is_none_or(|r| r == axis);
            if allowed {
                moved.set(axis, d);
            }
        }
        translation = Point::new(translation.x + moved.x, translation.y + moved.y);
        let dt = now_ms.saturating_sub(last_ms).max(1) as f64;
        let velocity = Point::new(moved.x / dt, moved.y / dt);
        self.motion = Some(Motion::Touch {
            configuration,
            pre,
            translation,
            zoom,
            rail,
            velocity,
            last_ms: now_ms,
        });
        self.viewer
            .on_manipulation_delta(ManipulationDelta::new(translation, zoom))?;
        self.pump(now_ms)
    }

    /// Pinch by `scale` relative to the previous pinch step.
    pub fn touch_zoom(&mut self, scale: f32, now_ms: u64) -> Result<()> {
        let Some(Motion::Touch {
            configuration,
            translation,
            zoom,
            ..
        }) = self.motion
        else {
            return Err(Error::invalid_operation("no touch in progress"));
        };
        if !configuration.contains(ManipulationConfiguration::ZOOM) {
            return Ok(());
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::invalid_argument("pinch scale must be positive"));
        }
        let zoom = zoom * scale;
        if let Some(Motion::Touch { zoom: slot, .. }) = self.motion.as_mut() {
            *slot = zoom;
        }
        self.viewer
            .on_manipulation_delta(ManipulationDelta::new(translation, zoom))?;
        self.pump(now_ms)
    }

    /// Lifts the finger. A recent fast move continues as inertia; otherwise the manipulation
    /// completes at once.
    pub fn release_touch(&mut self, now_ms: u64) -> Result<()> {
        let Some(Motion::Touch {
            configuration,
            pre,
            translation,
            zoom,
            velocity,
            last_ms,
            ..
        }) = self.motion
        else {
            return Ok(());
        };
        let fresh = now_ms.saturating_sub(last_ms) <= VELOCITY_WINDOW_MS;
        let speed = velocity.x.hypot(velocity.y);
        if configuration.contains(ManipulationConfiguration::INERTIA_PAN)
            && fresh
            && speed > MIN_INERTIA_SPEED
        {
            let duration = speed / self.deceleration;
            let model = self.viewer.viewport_model();
            let current = model.pixel_view();
            let mut end = current;
            for axis in Axis::BOTH {
                // Constant deceleration covers half of what the release speed would.
                let travel = -velocity.get(axis) * duration / 2.0;
                let max = model.axis(axis).pixel_scrollable();
                end.set_offset(axis, (current.offset(axis) + travel).clamp(0.0, max));
            }
            let tween = Tween::new(
                current,
                end,
                now_ms,
                duration.ceil() as u64,
                Easing::EaseOutQuad,
            );
            adebug!(?velocity, ?end, duration_ms = duration, "inertia started");
            self.motion = Some(Motion::Inertia { tween, pre });
            self.viewer
                .on_manipulation_delta(delta_towards(pre, current).inertial(Some(end)))?;
        } else {
            adebug!(?translation, zoom, "touch released");
            self.motion = None;
            self.viewer
                .on_manipulation_delta(ManipulationDelta::new(translation, zoom).last())?;
            self.viewer.on_manipulation_completed()?;
        }
        self.pump(now_ms)
    }

    /// Advances the running motion.
    ///
    /// Returns the viewer's view after the step, or `None` when nothing is animating.
    pub fn tick(&mut self, now_ms: u64) -> Result<Option<View>> {
        let Some(motion) = self.motion else {
            self.pump(now_ms)?;
            return Ok(None);
        };
        match motion {
            Motion::Touch { .. } => return Ok(None),
            Motion::Animation { tween, pre } | Motion::Inertia { tween, pre } => {
                let mut delta = delta_towards(pre, tween.sample(now_ms));
                if matches!(motion, Motion::Inertia { .. }) {
                    delta = delta.inertial(Some(tween.to));
                }
                if tween.is_done(now_ms) {
                    adebug!(view = ?tween.to, "motion finished");
                    self.motion = None;
                    self.viewer.on_manipulation_delta(delta.last())?;
                    self.viewer.on_manipulation_completed()?;
                } else {
                    self.viewer.on_manipulation_delta(delta)?;
                }
            }
            Motion::ConstantVelocity {
                base,
                velocity,
                start_ms,
                ..
            } => {
                let translation = constant_velocity_translation(base, velocity, start_ms, now_ms);
                self.viewer
                    .on_manipulation_delta(ManipulationDelta::new(translation, 1.0))?;
            }
        }
        self.pump(now_ms)?;
        Ok(Some(self.viewer.view()))
    }

    fn pump(&mut self, now_ms: u64) -> Result<()> {
        while let Some(command) = self.compositor.pop_command() {
            match command {
                CompositorCommand::BringIntoViewport(request) => {
                    let animate = request.animate
                        && !(request.skip_animation_while_running && self.is_animating());
                    self.bring_into_viewport(request.target, animate, now_ms)?;
                }
                CompositorCommand::SetConstantVelocities { dx, dy } => {
                    self.constant_velocities(dx, dy, now_ms)?;
                }
                CompositorCommand::StopInertia => {
                    if matches!(self.motion, Some(Motion::Inertia { .. })) {
                        self.cancel_motion()?;
                    }
                }
            }
        }
        Ok(())
    }

    fn bring_into_viewport(&mut self, target: View, animate: bool, now_ms: u64) -> Result<()> {
        if let (true, Some(Motion::Animation { mut tween, pre })) = (animate, self.motion) {
            tween.retarget(now_ms, target, self.animation_ms);
            adebug!(?target, "animation retargeted");
            self.motion = Some(Motion::Animation { tween, pre });
            return Ok(());
        }
        self.cancel_motion()?;
        let pre = self.viewer.viewport_model().pixel_view();
        self.viewer.on_manipulation_started()?;
        adebug!(?target, animate, "bring into viewport");
        if animate {
            let tween = Tween::new(pre, target, now_ms, self.animation_ms, self.easing);
            self.motion = Some(Motion::Animation { tween, pre });
            return Ok(());
        }
        self.viewer
            .on_manipulation_delta(delta_towards(pre, target).last())?;
        self.viewer.on_manipulation_completed()
    }

    fn constant_velocities(&mut self, dx: f64, dy: f64, now_ms: u64) -> Result<()> {
        if dx == 0.0 && dy == 0.0 {
            if matches!(self.motion, Some(Motion::ConstantVelocity { .. })) {
                self.cancel_motion()?;
            }
            return Ok(());
        }
        let velocity = Point::new(dx, dy);
        if let Some(Motion::ConstantVelocity {
            pre,
            base,
            velocity: old,
            start_ms,
        }) = self.motion
        {
            let base = constant_velocity_translation(base, old, start_ms, now_ms);
            atrace!(?velocity, "constant velocity retargeted");
            self.motion = Some(Motion::ConstantVelocity {
                pre,
                base,
                velocity,
                start_ms: now_ms,
            });
            return Ok(());
        }
        self.cancel_motion()?;
        let pre = self.viewer.viewport_model().pixel_view();
        self.viewer.on_manipulation_started()?;
        adebug!(?velocity, "constant velocity started");
        self.motion = Some(Motion::ConstantVelocity {
            pre,
            base: Point::default(),
            velocity,
            start_ms: now_ms,
        });
        Ok(())
    }
}

/// Content translation of a pan at `velocity` pixels per second; the view moves along
/// `velocity`, so the content moves against it.
fn constant_velocity_translation(
    base: Point,
    velocity: Point,
    start_ms: u64,
    now_ms: u64,
) -> Point {
    let elapsed = now_ms.saturating_sub(start_ms) as f64 / 1000.0;
    Point::new(base.x - velocity.x * elapsed, base.y - velocity.y * elapsed)
}
