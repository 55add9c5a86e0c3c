//! A headless viewport coordination engine for scroll viewers.
//!
//! For a simulated compositor and a frame-driven controller, see the `scrollport-adapter` crate.
//!
//! This crate owns the parts of a scroll viewer that are hard to get right: offset, extent,
//! viewport and zoom bookkeeping; snap point resolution; the touch-manipulation lifecycle shared
//! with an external compositor; programmatic view changes; and scroll anchoring across layout
//! passes.
//!
//! It is UI-agnostic. A GUI layer is expected to provide:
//! - a [`ScrollProvider`] reporting the content's offsets, viewport and extent
//! - optionally a [`Compositor`] that performs gestures and animations
//! - element geometry through [`ElementLayout`] during arrange, for anchoring
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod anchor;
mod error;
mod field;
mod guard;
mod manipulation;
mod notify;
mod options;
mod presenter;
mod provider;
mod scroll_viewer;
mod snap;
mod state;
mod types;
mod view_change;
mod viewport;


pub use anchor::{
    Anchor, AnchorMode, AnchorRequest, anchor_mode, anchor_point, compute_correction,
    select_anchor,
};
pub use error::{Error, Result};
pub use field::{Field, FieldEffects};
pub use guard::SyncOperation;
pub use manipulation::{
    ConfigurationSet, ContentTransform, ManipulationCapabilities, ManipulationConfiguration,
    ManipulationCoordinator, ManipulationDelta, ManipulationKind, ManipulationSession,
    ManipulationState, PrimaryContent, adjust_pixel_content_dim, adjust_pixel_viewport_dim,
    alignment_translation, compositor_alignment, compute_configurations,
};
pub use notify::{ViewChangedEvent, ViewChangingEvent};
pub use options::{
    AnchorRequestedCallback, DEFAULT_MAX_ZOOM_FACTOR, DEFAULT_MIN_ZOOM_FACTOR, ScrollViewerOptions,
    Tolerances, ViewChangedCallback, ViewChangingCallback,
};
pub use presenter::{ContentPresenter, LINE_DELTA};
pub use provider::{
    BringIntoViewportRequest, Compositor, ElementLayout, LogicalOffsetProvider, ScrollProvider,
    SnapPoints, SnapPointsSource,
};
pub use scroll_viewer::ScrollViewer;
pub use snap::{
    RegularSnapPoints, SnapAdjustment, SnapGeometry, SnapPointSet, nearest_zoom_snap_point,
    resolve_snap_points,
};
pub use state::{AxisSnapshot, ViewState};
pub use types::{
    Axis, CompositorAlignment, ContentAlignment, ElementId, MotionType, PinnedHeaders, Point, Rect,
    ScrollBarVisibility, ScrollMode, ScrollStep, Size, SnapPointsAlignment, SnapPointsType, View,
    ZoomMode,
};
pub use view_change::{ChangeViewOptions, PendingChangeView};
pub use viewport::{AxisState, ViewportModel};
