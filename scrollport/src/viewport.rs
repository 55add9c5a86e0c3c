use crate::error::{check_offset, check_zoom};
use crate::provider::{LogicalOffsetProvider, ScrollProvider};
use crate::{Axis, Error, Point, Result, Size, View};

/// Scroll state of one axis.
///
/// `offset`, `viewport` and `extent` are in the provider's units (items on a logical axis,
/// pixels otherwise). The `pixel_*` values are always zoomed pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisState {
    pub offset: f64,
    pub min_offset: f64,
    pub viewport: f64,
    pub extent: f64,
    pub pixel_offset: f64,
    pub pixel_viewport: f64,
    pub pixel_extent: f64,
    /// Whether a logical-offset provider drives this axis.
    pub is_logical: bool,
}

impl AxisState {
    /// `max(min_offset, extent - viewport)`.
    pub fn scrollable(&self) -> f64 {
        (self.extent - self.viewport).max(self.min_offset)
    }

    /// Largest pixel offset reachable on this axis.
    pub fn pixel_scrollable(&self) -> f64 {
        (self.pixel_extent - self.pixel_viewport).max(0.0)
    }

    /// Whether the content overflows the viewport.
    pub fn is_scrollable(&self) -> bool {
        self.pixel_extent > self.pixel_viewport
    }
}

/// Offset, extent, viewport and zoom of a scroll viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportModel {
    horizontal: AxisState,
    vertical: AxisState,
    zoom_factor: f32,
    min_zoom_factor: f32,
    max_zoom_factor: f32,
    in_manipulation: bool,
    // Offsets a gesture asked for before clamping; resynchronizes overpan.
    unbound_offset: Point,
}

impl Default for ViewportModel {
    fn default() -> Self {
        Self::new(crate::DEFAULT_MIN_ZOOM_FACTOR, crate::DEFAULT_MAX_ZOOM_FACTOR)
    }
}

impl ViewportModel {
    pub fn new(min_zoom_factor: f32, max_zoom_factor: f32) -> Self {
        let min = min_zoom_factor.max(crate::DEFAULT_MIN_ZOOM_FACTOR);
        let max = max_zoom_factor.max(min);
        Self {
            horizontal: AxisState::default(),
            vertical: AxisState::default(),
            zoom_factor: 1.0_f32.clamp(min, max),
            min_zoom_factor: min,
            max_zoom_factor: max,
            in_manipulation: false,
            unbound_offset: Point::default(),
        }
    }

    pub fn axis(&self, axis: Axis) -> &AxisState {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisState {
        match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }

    pub fn offset(&self, axis: Axis) -> f64 {
        self.axis(axis).offset
    }

    pub fn min_offset(&self, axis: Axis) -> f64 {
        self.axis(axis).min_offset
    }

    pub fn viewport(&self, axis: Axis) -> f64 {
        self.axis(axis).viewport
    }

    pub fn extent(&self, axis: Axis) -> f64 {
        self.axis(axis).extent
    }

    pub fn pixel_offset(&self, axis: Axis) -> f64 {
        self.axis(axis).pixel_offset
    }

    pub fn pixel_viewport(&self, axis: Axis) -> f64 {
        self.axis(axis).pixel_viewport
    }

    pub fn pixel_extent(&self, axis: Axis) -> f64 {
        self.axis(axis).pixel_extent
    }

    /// ScrollableWidth / ScrollableHeight.
    pub fn scrollable(&self, axis: Axis) -> f64 {
        self.axis(axis).scrollable()
    }

    pub fn pixel_viewport_size(&self) -> Size {
        Size::new(self.horizontal.pixel_viewport, self.vertical.pixel_viewport)
    }

    pub fn pixel_extent_size(&self) -> Size {
        Size::new(self.horizontal.pixel_extent, self.vertical.pixel_extent)
    }

    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    pub fn min_zoom_factor(&self) -> f32 {
        self.min_zoom_factor
    }

    pub fn max_zoom_factor(&self) -> f32 {
        self.max_zoom_factor
    }

    pub fn view(&self) -> View {
        View::new(self.horizontal.offset, self.vertical.offset, self.zoom_factor)
    }

    pub fn pixel_view(&self) -> View {
        View::new(
            self.horizontal.pixel_offset,
            self.vertical.pixel_offset,
            self.zoom_factor,
        )
    }

    pub fn is_in_manipulation(&self) -> bool {
        self.in_manipulation
    }

    pub(crate) fn set_in_manipulation(&mut self, in_manipulation: bool) {
        self.in_manipulation = in_manipulation;
        if !in_manipulation {
            self.reset_unbound_offsets();
        }
    }

    /// Offset requested by the live gesture before clamping.
    pub fn unbound_offset(&self, axis: Axis) -> f64 {
        self.unbound_offset.get(axis)
    }

    pub(crate) fn set_unbound_offset(&mut self, axis: Axis, offset: f64) {
        self.unbound_offset.set(axis, offset);
    }

    fn reset_unbound_offsets(&mut self) {
        self.unbound_offset = Point::new(self.horizontal.offset, self.vertical.offset);
    }

    /// Sets the offset of `axis`, clamped to `min_offset`. Returns the stored value.
    ///
    /// `logical` converts logical offsets to pixels when it drives `axis`.
    pub fn set_offset(
        &mut self,
        axis: Axis,
        offset: f64,
        logical: Option<&dyn LogicalOffsetProvider>,
    ) -> Result<f64> {
        let offset = check_offset("offset", offset)?;
        let zoom = f64::from(self.zoom_factor);
        let in_manipulation = self.in_manipulation;
        let state = self.axis_mut(axis);
        state.offset = offset.max(state.min_offset);
        state.pixel_offset = match logical.filter(|p| p.physical_orientation() == axis) {
            Some(p) => p.compute_pixel_offset(state.offset) * zoom,
            None if state.is_logical => state.pixel_offset,
            None => state.offset,
        };
        let stored = state.offset;
        if !in_manipulation {
            self.unbound_offset.set(axis, stored);
        }
        Ok(stored)
    }

    /// Sets the pixel offset of `axis` directly. Does not touch the logical offset.
    pub fn set_pixel_offset(&mut self, axis: Axis, pixel_offset: f64) -> Result<f64> {
        let pixel_offset = check_offset("pixel offset", pixel_offset)?;
        let state = self.axis_mut(axis);
        state.pixel_offset = pixel_offset.max(0.0);
        if !state.is_logical {
            state.offset = state.pixel_offset.max(state.min_offset);
        }
        Ok(state.pixel_offset)
    }

    pub fn set_min_offset(&mut self, axis: Axis, min_offset: f64) -> Result<()> {
        let min_offset = check_offset("min offset", min_offset)?;
        let state = self.axis_mut(axis);
        state.min_offset = min_offset;
        state.offset = state.offset.max(min_offset);
        Ok(())
    }

    pub fn set_extent(&mut self, axis: Axis, extent: f64) -> Result<()> {
        let extent = check_offset("extent", extent)?;
        let state = self.axis_mut(axis);
        state.extent = extent.max(0.0);
        if !state.is_logical {
            state.pixel_extent = state.extent;
        }
        Ok(())
    }

    /// Sets the viewport of `axis`. An infinite viewport is allowed (unconstrained layout).
    pub fn set_viewport(&mut self, axis: Axis, viewport: f64) -> Result<()> {
        if viewport.is_nan() {
            return Err(Error::invalid_argument("viewport must not be NaN"));
        }
        let state = self.axis_mut(axis);
        state.viewport = viewport.max(0.0);
        if !state.is_logical {
            state.pixel_viewport = state.viewport;
        }
        Ok(())
    }

    /// Sets the zoom factor, clamped to the zoom bounds. Returns the stored value.
    pub fn set_zoom_factor(&mut self, zoom_factor: f32) -> Result<f32> {
        let zoom_factor = check_zoom("zoom factor", zoom_factor)?;
        self.zoom_factor = self.clamp_zoom(zoom_factor);
        Ok(self.zoom_factor)
    }

    pub fn clamp_zoom(&self, zoom_factor: f32) -> f32 {
        zoom_factor.clamp(self.min_zoom_factor, self.max_zoom_factor)
    }

    /// Updates the zoom bounds. `min` is raised to `floor`, `max` to `min`, and the zoom
    /// factor is coerced into the new range. Returns `true` when the zoom factor changed.
    pub fn set_zoom_bounds(&mut self, min: f32, max: f32, floor: f32) -> Result<bool> {
        let min = check_zoom("min zoom factor", min)?.max(floor);
        let max = check_zoom("max zoom factor", max)?.max(min);
        self.min_zoom_factor = min;
        self.max_zoom_factor = max;
        let coerced = self.zoom_factor.clamp(min, max);
        let changed = coerced != self.zoom_factor;
        self.zoom_factor = coerced;
        Ok(changed)
    }

    /// Pulls offsets, viewports and extents from the scroll provider. Returns `true` when the
    /// offsets or the zoom factor moved.
    pub fn sync_from(&mut self, provider: &dyn ScrollProvider) -> Result<bool> {
        let before = self.view();
        let zoom = f64::from(self.zoom_factor);
        let logical = provider.logical_offset_provider();
        for axis in Axis::BOTH {
            let offset = check_offset("provider offset", provider.offset(axis))?;
            let min_offset = check_offset("provider min offset", provider.min_offset(axis))?;
            let extent = check_offset("provider extent", provider.extent(axis))?;
            let viewport = provider.viewport(axis);
            if viewport.is_nan() {
                return Err(Error::invalid_argument("provider viewport must not be NaN"));
            }
            let pixel_viewport = provider.pixel_viewport(axis);

            let logical = logical.filter(|p| p.physical_orientation() == axis);
            let state = self.axis_mut(axis);
            state.min_offset = min_offset;
            state.offset = offset.max(min_offset);
            state.extent = extent.max(0.0);
            state.viewport = viewport.max(0.0);
            state.is_logical = logical.is_some();
            match logical {
                Some(p) => {
                    state.pixel_offset = p.compute_pixel_offset(state.offset) * zoom;
                    state.pixel_extent = p.compute_pixel_extent() * zoom;
                    state.pixel_viewport = pixel_viewport.max(0.0);
                }
                None => {
                    state.pixel_offset = state.offset;
                    state.pixel_extent = state.extent;
                    state.pixel_viewport = state.viewport;
                }
            }
        }
        if !self.in_manipulation {
            self.reset_unbound_offsets();
        }
        Ok(self.view() != before)
    }
}
