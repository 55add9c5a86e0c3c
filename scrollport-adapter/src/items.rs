use scrollport::{
    Axis, Error, LINE_DELTA, LogicalOffsetProvider, Result, ScrollProvider, ScrollStep, Size,
    SnapPoints, SnapPointsAlignment, SnapPointsSource,
};

/// A virtualizing list of equally sized items, scrolled in item units along `orientation`.
///
/// The orientation axis is logical: its offset, viewport and extent count items, and pixel
/// conversions go through [`LogicalOffsetProvider`]. The cross axis is a plain pixel axis.
/// Every item start is a regular snap point.
#[derive(Clone, Debug, PartialEq)]
pub struct UniformItemsProvider {
    orientation: Axis,
    item_count: usize,
    item_extent: f64,
    cross_extent: f64,
    viewport: Size,
    offset: [f64; 2],
    zoom_factor: f32,
    in_manipulation: bool,
    manipulation_hint: Option<f64>,
}

impl UniformItemsProvider {
    pub fn new(
        orientation: Axis,
        item_count: usize,
        item_extent: f64,
        cross_extent: f64,
        viewport: Size,
    ) -> Result<Self> {
        if !(item_extent.is_finite() && item_extent > 0.0) {
            return Err(Error::invalid_argument("item extent must be positive"));
        }
        if !(cross_extent.is_finite() && cross_extent >= 0.0) {
            return Err(Error::invalid_argument("cross extent must be finite"));
        }
        Ok(Self {
            orientation,
            item_count,
            item_extent,
            cross_extent,
            viewport,
            offset: [0.0; 2],
            zoom_factor: 1.0,
            in_manipulation: false,
            manipulation_hint: None,
        })
    }

    pub fn orientation(&self) -> Axis {
        self.orientation
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn item_extent(&self) -> f64 {
        self.item_extent
    }

    /// Changes the number of items. The offset is clamped to the new range.
    pub fn set_item_count(&mut self, item_count: usize) {
        self.item_count = item_count;
        self.clamp_offsets();
    }

    pub fn set_viewport_size(&mut self, viewport: Size) -> Result<()> {
        if viewport.width.is_nan() || viewport.height.is_nan() {
            return Err(Error::invalid_argument("viewport must not be NaN"));
        }
        self.viewport = viewport;
        self.clamp_offsets();
        Ok(())
    }

    /// Whether a manipulation is live, as last reported by the viewer.
    pub fn in_manipulation(&self) -> bool {
        self.in_manipulation
    }

    /// The unzoomed pixel offset the live manipulation started from.
    pub fn manipulation_hint(&self) -> Option<f64> {
        self.manipulation_hint
    }

    /// Index of the first item at least partly in view.
    pub fn first_visible_item(&self) -> usize {
        let first = self.offset(self.orientation).floor() as usize;
        first.min(self.item_count.saturating_sub(1))
    }

    fn index(&self, axis: Axis) -> usize {
        usize::from(axis != self.orientation)
    }

    fn zoomed_item(&self) -> f64 {
        self.item_extent * f64::from(self.zoom_factor)
    }

    fn max_offset(&self, axis: Axis) -> f64 {
        let max = self.extent(axis) - self.viewport(axis);
        if max.is_finite() { max.max(0.0) } else { 0.0 }
    }

    fn clamp_offsets(&mut self) {
        for axis in Axis::BOTH {
            let max = self.max_offset(axis);
            let index = self.index(axis);
            self.offset[index] = self.offset[index].clamp(0.0, max);
        }
    }

    fn scroll_by(&mut self, axis: Axis, delta: f64) -> Result<()> {
        let offset = self.offset(axis) + delta;
        self.set_offset(axis, offset)
    }

    /// One line: an item along the orientation, a fixed pixel amount across it.
    fn line(&self, axis: Axis) -> f64 {
        if axis == self.orientation { 1.0 } else { LINE_DELTA }
    }
}

impl ScrollProvider for UniformItemsProvider {
    fn offset(&self, axis: Axis) -> f64 {
        self.offset[self.index(axis)]
    }

    fn viewport(&self, axis: Axis) -> f64 {
        if axis == self.orientation {
            self.viewport.get(axis) / self.zoomed_item()
        } else {
            self.viewport.get(axis)
        }
    }

    fn extent(&self, axis: Axis) -> f64 {
        if axis == self.orientation {
            self.item_count as f64
        } else {
            self.cross_extent * f64::from(self.zoom_factor)
        }
    }

    fn pixel_viewport(&self, axis: Axis) -> f64 {
        self.viewport.get(axis)
    }

    fn set_offset(&mut self, axis: Axis, offset: f64) -> Result<()> {
        if !offset.is_finite() {
            return Err(Error::invalid_argument("offset must be finite"));
        }
        let max = self.max_offset(axis);
        let index = self.index(axis);
        self.offset[index] = offset.clamp(0.0, max);
        Ok(())
    }

    fn set_zoom_factor(&mut self, zoom_factor: f32) -> Result<()> {
        if !(zoom_factor.is_finite() && zoom_factor > 0.0) {
            return Err(Error::invalid_argument("zoom factor must be positive"));
        }
        self.zoom_factor = zoom_factor;
        self.clamp_offsets();
        Ok(())
    }

    fn step(&mut self, step: ScrollStep) -> Result<()> {
        match step {
            ScrollStep::LineUp => self.scroll_by(Axis::Vertical, -self.line(Axis::Vertical)),
            ScrollStep::LineDown => self.scroll_by(Axis::Vertical, self.line(Axis::Vertical)),
            ScrollStep::LineLeft => {
                self.scroll_by(Axis::Horizontal, -self.line(Axis::Horizontal))
            }
            ScrollStep::LineRight => self.scroll_by(Axis::Horizontal, self.line(Axis::Horizontal)),
            ScrollStep::PageUp => {
                let delta = self.viewport(Axis::Vertical);
                self.scroll_by(Axis::Vertical, -delta)
            }
            ScrollStep::PageDown => {
                let delta = self.viewport(Axis::Vertical);
                self.scroll_by(Axis::Vertical, delta)
            }
            ScrollStep::PageLeft => {
                let delta = self.viewport(Axis::Horizontal);
                self.scroll_by(Axis::Horizontal, -delta)
            }
            ScrollStep::PageRight => {
                let delta = self.viewport(Axis::Horizontal);
                self.scroll_by(Axis::Horizontal, delta)
            }
            // Home and End jump to the first and last item.
            ScrollStep::Home => self.set_offset(self.orientation, 0.0),
            ScrollStep::End => self.set_offset(self.orientation, self.max_offset(self.orientation)),
        }
    }

    fn snap_points_source(&self) -> Option<&dyn SnapPointsSource> {
        Some(self)
    }

    fn logical_offset_provider(&self) -> Option<&dyn LogicalOffsetProvider> {
        Some(self)
    }

    fn logical_offset_provider_mut(&mut self) -> Option<&mut dyn LogicalOffsetProvider> {
        Some(self)
    }
}

impl LogicalOffsetProvider for UniformItemsProvider {
    fn physical_orientation(&self) -> Axis {
        self.orientation
    }

    fn compute_pixel_extent(&self) -> f64 {
        self.item_count as f64 * self.item_extent
    }

    fn compute_logical_offset(&self, pixel_offset: f64) -> f64 {
        pixel_offset / self.item_extent
    }

    fn compute_pixel_offset(&self, logical_offset: f64) -> f64 {
        logical_offset * self.item_extent
    }

    fn update_in_manipulation(&mut self, in_manipulation: bool, offset_hint: Option<f64>) {
        self.in_manipulation = in_manipulation;
        self.manipulation_hint = offset_hint;
    }
}

impl SnapPointsSource for UniformItemsProvider {
    fn snap_points(&self, axis: Axis, alignment: SnapPointsAlignment) -> Option<SnapPoints> {
        if axis != self.orientation {
            return None;
        }
        let interval = self.item_extent as f32;
        let offset = match alignment {
            SnapPointsAlignment::Near => 0.0,
            SnapPointsAlignment::Center => interval / 2.0,
            SnapPointsAlignment::Far => interval,
        };
        Some(SnapPoints::Regular { offset, interval })
    }
}
