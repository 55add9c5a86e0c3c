use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use crate::View;
use crate::options::{ViewChangedCallback, ViewChangingCallback};

/// Arguments of a view-changing notification.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewChangingEvent {
    /// The view about to be shown.
    pub next_view: View,
    /// Where the view is expected to settle: the inertia end projection, the pending
    /// `change_view` target, or `next_view` when nothing is in flight.
    pub final_view: View,
    pub is_inertial: bool,
}

/// Arguments of a view-changed notification.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewChangedEvent {
    pub view: View,
    /// `true` while a manipulation is still moving the view.
    pub is_intermediate: bool,
}

#[derive(Default)]
struct NotifierInner {
    depth: Cell<usize>,
    pending_changing: Cell<Option<ViewChangingEvent>>,
    pending_changed: Cell<Option<ViewChangedEvent>>,
    on_view_changing: RefCell<Option<ViewChangingCallback>>,
    on_view_changed: RefCell<Option<ViewChangedCallback>>,
}

impl NotifierInner {
    fn emit_changing(&self, event: &ViewChangingEvent) {
        let cb = self.on_view_changing.borrow().clone();
        if let Some(cb) = cb {
            cb(event);
        }
    }

    fn emit_changed(&self, event: &ViewChangedEvent) {
        let cb = self.on_view_changed.borrow().clone();
        if let Some(cb) = cb {
            cb(event);
        }
    }

    fn flush(&self) {
        if let Some(event) = self.pending_changing.take() {
            self.emit_changing(&event);
        }
        if let Some(event) = self.pending_changed.take() {
            self.emit_changed(&event);
        }
    }
}

/// Dispatches view notifications, coalescing them while a [`NotifyBatch`] is alive.
#[derive(Clone, Default)]
pub(crate) struct Notifier {
    inner: Rc<NotifierInner>,
}

impl Notifier {
    pub(crate) fn set_callbacks(
        &self,
        on_view_changing: Option<ViewChangingCallback>,
        on_view_changed: Option<ViewChangedCallback>,
    ) {
        *self.inner.on_view_changing.borrow_mut() = on_view_changing;
        *self.inner.on_view_changed.borrow_mut() = on_view_changed;
    }

    /// Opens a batch. Notifications raised until the outermost batch drops are delivered
    /// once, with the latest arguments.
    pub(crate) fn batch(&self) -> NotifyBatch {
        let depth = self.inner.depth.get();
        self.inner.depth.set(depth.saturating_add(1));
        NotifyBatch {
            inner: Rc::clone(&self.inner),
        }
    }

    pub(crate) fn is_batching(&self) -> bool {
        self.inner.depth.get() > 0
    }

    pub(crate) fn view_changing(&self, event: ViewChangingEvent) {
        if self.is_batching() {
            self.inner.pending_changing.set(Some(event));
            return;
        }
        self.inner.emit_changing(&event);
    }

    pub(crate) fn view_changed(&self, event: ViewChangedEvent) {
        if self.is_batching() {
            self.inner.pending_changed.set(Some(event));
            return;
        }
        self.inner.emit_changed(&event);
    }
}

impl core::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Notifier")
            .field("depth", &self.inner.depth.get())
            .field("pending_changing", &self.inner.pending_changing.get())
            .field("pending_changed", &self.inner.pending_changed.get())
            .finish_non_exhaustive()
    }
}

/// Scoped notification batch; flushes when the outermost batch drops.
#[must_use = "notifications are flushed when the batch is dropped"]
pub(crate) struct NotifyBatch {
    inner: Rc<NotifierInner>,
}

impl Drop for NotifyBatch {
    fn drop(&mut self) {
        let depth = self.inner.depth.get();
        debug_assert!(depth > 0, "notify depth underflow");
        let next = depth.saturating_sub(1);
        self.inner.depth.set(next);
        if next == 0 {
            self.inner.flush();
        }
    }
}
