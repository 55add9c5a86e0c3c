//! Adapter utilities for the `scrollport` crate.
//!
//! The `scrollport` crate coordinates a scroll viewer with an external compositor but never
//! moves the view on its own. This crate provides small, framework-neutral pieces an adapter
//! needs to get something on screen:
//!
//! - An in-process compositor that queues bring-into-viewport, velocity and inertia requests
//! - A frame-driven controller that turns those requests and touch input into manipulation
//!   callbacks (tweened animations, touch pans with inertia, constant-velocity pans)
//! - A uniform-items scroll provider with a logical (item-counted) axis
//!
//! No UI toolkit bindings are included.
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod compositor;
mod controller;
mod items;
mod tween;

#[cfg(test)]
mod tests;

pub use compositor::{CompositorCommand, SimulatedCompositor};
pub use controller::{Controller, DEFAULT_ANIMATION_MS, DEFAULT_DECELERATION};
pub use items::UniformItemsProvider;
pub use tween::{Easing, Tween};
