use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use scrollport::{
    BringIntoViewportRequest, Compositor, ConfigurationSet, ContentTransform, ElementId,
    ManipulationCapabilities, MotionType, PrimaryContent, Result,
};

/// Work the compositor was asked to perform. Notifications are recorded as state instead.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompositorCommand {
    BringIntoViewport(BringIntoViewportRequest),
    SetConstantVelocities { dx: f64, dy: f64 },
    StopInertia,
}

#[derive(Debug)]
struct Shared {
    commands: VecDeque<CompositorCommand>,
    capabilities: ManipulationCapabilities,
    configurations: ConfigurationSet,
    primary_content: Option<PrimaryContent>,
    transform: Option<ContentTransform>,
    element: Option<ElementId>,
    snap_points_changed: Vec<MotionType>,
    accepts_bring_into_viewport: bool,
}

/// An in-process stand-in for a touch-manipulation compositor.
///
/// Cloning yields another handle to the same queue: hand one clone to the
/// [`scrollport::ScrollViewer`] and keep another to drain commands (see [`crate::Controller`]).
#[derive(Clone, Debug)]
pub struct SimulatedCompositor {
    shared: Rc<RefCell<Shared>>,
}

impl Default for SimulatedCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedCompositor {
    pub fn new() -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                commands: VecDeque::new(),
                capabilities: ManipulationCapabilities::none(),
                configurations: ConfigurationSet::default(),
                primary_content: None,
                transform: None,
                element: None,
                snap_points_changed: Vec::new(),
                accepts_bring_into_viewport: true,
            })),
        }
    }

    /// When `false`, bring-into-viewport requests are declined and the viewer applies them
    /// directly.
    pub fn set_accepts_bring_into_viewport(&self, accepts: bool) {
        self.shared.borrow_mut().accepts_bring_into_viewport = accepts;
    }

    pub fn pop_command(&self) -> Option<CompositorCommand> {
        self.shared.borrow_mut().commands.pop_front()
    }

    pub fn take_commands(&self) -> Vec<CompositorCommand> {
        self.shared.borrow_mut().commands.drain(..).collect()
    }

    pub fn has_commands(&self) -> bool {
        !self.shared.borrow().commands.is_empty()
    }

    pub fn capabilities(&self) -> ManipulationCapabilities {
        self.shared.borrow().capabilities
    }

    pub fn configurations(&self) -> ConfigurationSet {
        self.shared.borrow().configurations.clone()
    }

    pub fn primary_content(&self) -> Option<PrimaryContent> {
        self.shared.borrow().primary_content
    }

    pub fn transform(&self) -> Option<ContentTransform> {
        self.shared.borrow().transform
    }

    pub fn manipulatable_element(&self) -> Option<ElementId> {
        self.shared.borrow().element
    }

    /// Motions whose snap points changed since the last call.
    pub fn take_snap_points_changed(&self) -> Vec<MotionType> {
        core::mem::take(&mut self.shared.borrow_mut().snap_points_changed)
    }
}

impl Compositor for SimulatedCompositor {
    fn bring_into_viewport(&mut self, request: &BringIntoViewportRequest) -> Result<bool> {
        let mut shared = self.shared.borrow_mut();
        if !shared.accepts_bring_into_viewport {
            return Ok(false);
        }
        shared
            .commands
            .push_back(CompositorCommand::BringIntoViewport(*request));
        Ok(true)
    }

    fn set_constant_velocities(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.shared
            .borrow_mut()
            .commands
            .push_back(CompositorCommand::SetConstantVelocities { dx, dy });
        Ok(())
    }

    fn stop_inertia(&mut self) -> Result<()> {
        self.shared
            .borrow_mut()
            .commands
            .push_back(CompositorCommand::StopInertia);
        Ok(())
    }

    fn notify_can_manipulate_elements(
        &mut self,
        capabilities: ManipulationCapabilities,
    ) -> Result<()> {
        self.shared.borrow_mut().capabilities = capabilities;
        Ok(())
    }

    fn notify_viewport_changed(&mut self, configurations: &ConfigurationSet) -> Result<()> {
        self.shared.borrow_mut().configurations = configurations.clone();
        Ok(())
    }

    fn notify_primary_content_changed(&mut self, content: &PrimaryContent) -> Result<()> {
        self.shared.borrow_mut().primary_content = Some(*content);
        Ok(())
    }

    fn notify_primary_content_transform_changed(
        &mut self,
        transform: ContentTransform,
    ) -> Result<()> {
        self.shared.borrow_mut().transform = Some(transform);
        Ok(())
    }

    fn notify_snap_points_changed(&mut self, motion: MotionType) -> Result<()> {
        self.shared.borrow_mut().snap_points_changed.push(motion);
        Ok(())
    }

    fn notify_manipulatable_element_changed(&mut self, element: Option<ElementId>) -> Result<()> {
        self.shared.borrow_mut().element = element;
        Ok(())
    }
}
