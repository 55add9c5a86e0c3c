use crate::error::{check_offset, check_zoom};
use crate::provider::{ScrollProvider, SnapPoints, SnapPointsSource};
use crate::{Axis, Error, Result, ScrollStep, Size, SnapPointsAlignment};

/// Pixels scrolled by one line step.
pub const LINE_DELTA: f64 = 16.0;

/// A non-virtualizing [`ScrollProvider`]: the content is one box of a known size.
///
/// Extents are the content size times the zoom factor; offsets are pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentPresenter {
    content: Size,
    viewport: Size,
    offset: [f64; 2],
    zoom_factor: f32,
    snap_points: [Option<SnapPoints>; 2],
}

impl ContentPresenter {
    pub fn new(content: Size, viewport: Size) -> Self {
        Self {
            content,
            viewport,
            offset: [0.0; 2],
            zoom_factor: 1.0,
            snap_points: [None, None],
        }
    }

    /// Snap points along `axis`, in unzoomed content coordinates for near alignment.
    pub fn with_snap_points(mut self, axis: Axis, points: SnapPoints) -> Self {
        self.snap_points[index(axis)] = Some(points);
        self
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    /// Resizes the content, e.g. after items were inserted. Offsets are kept when still valid.
    pub fn set_content_size(&mut self, content: Size) -> Result<()> {
        check_offset("content width", content.width)?;
        check_offset("content height", content.height)?;
        self.content = content;
        self.clamp_offsets();
        Ok(())
    }

    pub fn set_viewport_size(&mut self, viewport: Size) -> Result<()> {
        if viewport.width.is_nan() || viewport.height.is_nan() {
            return Err(Error::invalid_argument("viewport must not be NaN"));
        }
        self.viewport = viewport;
        self.clamp_offsets();
        Ok(())
    }

    fn max_offset(&self, axis: Axis) -> f64 {
        let max = self.extent(axis) - self.viewport.get(axis);
        if max.is_finite() { max.max(0.0) } else { 0.0 }
    }

    fn clamp_offsets(&mut self) {
        for axis in Axis::BOTH {
            let max = self.max_offset(axis);
            let slot = &mut self.offset[index(axis)];
            *slot = slot.clamp(0.0, max);
        }
    }

    fn scroll_by(&mut self, axis: Axis, delta: f64) -> Result<()> {
        let offset = self.offset(axis) + delta;
        self.set_offset(axis, offset)
    }
}

fn index(axis: Axis) -> usize {
    match axis {
        Axis::Horizontal => 0,
        Axis::Vertical => 1,
    }
}

impl ScrollProvider for ContentPresenter {
    fn offset(&self, axis: Axis) -> f64 {
        self.offset[index(axis)]
    }

    fn viewport(&self, axis: Axis) -> f64 {
        self.viewport.get(axis)
    }

    fn extent(&self, axis: Axis) -> f64 {
        self.content.get(axis) * f64::from(self.zoom_factor)
    }

    fn set_offset(&mut self, axis: Axis, offset: f64) -> Result<()> {
        let offset = check_offset("offset", offset)?;
        self.offset[index(axis)] = offset.clamp(0.0, self.max_offset(axis));
        Ok(())
    }

    fn set_zoom_factor(&mut self, zoom_factor: f32) -> Result<()> {
        self.zoom_factor = check_zoom("zoom factor", zoom_factor)?;
        self.clamp_offsets();
        Ok(())
    }

    fn step(&mut self, step: ScrollStep) -> Result<()> {
        match step {
            ScrollStep::LineUp => self.scroll_by(Axis::Vertical, -LINE_DELTA),
            ScrollStep::LineDown => self.scroll_by(Axis::Vertical, LINE_DELTA),
            ScrollStep::LineLeft => self.scroll_by(Axis::Horizontal, -LINE_DELTA),
            ScrollStep::LineRight => self.scroll_by(Axis::Horizontal, LINE_DELTA),
            ScrollStep::PageUp => self.scroll_by(Axis::Vertical, -self.viewport.height),
            ScrollStep::PageDown => self.scroll_by(Axis::Vertical, self.viewport.height),
            ScrollStep::PageLeft => self.scroll_by(Axis::Horizontal, -self.viewport.width),
            ScrollStep::PageRight => self.scroll_by(Axis::Horizontal, self.viewport.width),
            ScrollStep::Home => self.set_offset(Axis::Vertical, 0.0),
            ScrollStep::End => self.set_offset(Axis::Vertical, self.max_offset(Axis::Vertical)),
        }
    }

    fn snap_points_source(&self) -> Option<&dyn SnapPointsSource> {
        Some(self)
    }
}

impl SnapPointsSource for ContentPresenter {
    fn snap_points(&self, axis: Axis, alignment: SnapPointsAlignment) -> Option<SnapPoints> {
        let points = self.snap_points[index(axis)].as_ref()?;
        match (points, alignment) {
            (SnapPoints::Regular { .. }, _) => Some(points.clone()),
            (SnapPoints::Irregular(values), SnapPointsAlignment::Near) => {
                Some(SnapPoints::Irregular(values.clone()))
            }
            // Irregular points mark item starts; center and far use the midpoints and ends of
            // the spans between them, closed by the content's far edge.
            (SnapPoints::Irregular(values), alignment) => {
                let end = self.content.get(axis) as f32;
                let spans = values
                    .iter()
                    .zip(values.iter().skip(1).chain(core::iter::once(&end)));
                let resolved = match alignment {
                    SnapPointsAlignment::Center => spans.map(|(a, b)| (a + b) / 2.0).collect(),
                    _ => spans.map(|(_, b)| *b).collect(),
                };
                Some(SnapPoints::Irregular(resolved))
            }
        }
    }
}
