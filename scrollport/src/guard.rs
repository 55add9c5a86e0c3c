use alloc::rc::Rc;
use core::cell::Cell;

/// The synchronous operation currently running on a [`crate::ScrollViewer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SyncOperation {
    #[default]
    Idle,
    /// A `change_view` request is being resolved.
    ChangeView,
    /// Offsets and zoom are being pushed to the scroll provider.
    ZoomSync,
    /// A bring-into-viewport request is being handed to the compositor.
    BringIntoViewport,
    /// A compositor delta is being applied.
    ManipulationSync,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct OperationState {
    current: Rc<Cell<SyncOperation>>,
}

impl OperationState {
    pub(crate) fn current(&self) -> SyncOperation {
        self.current.get()
    }

    pub(crate) fn is(&self, op: SyncOperation) -> bool {
        self.current.get() == op
    }

    /// Switches to `op` until the returned guard drops, then restores the previous operation.
    pub(crate) fn enter(&self, op: SyncOperation) -> OperationGuard {
        let previous = self.current.replace(op);
        OperationGuard {
            current: Rc::clone(&self.current),
            previous,
        }
    }
}

#[must_use = "the operation ends when the guard is dropped"]
pub(crate) struct OperationGuard {
    current: Rc<Cell<SyncOperation>>,
    previous: SyncOperation,
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        self.current.set(self.previous);
    }
}
