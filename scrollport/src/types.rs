#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    pub fn other(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Horizontal => self.x = value,
            Axis::Vertical => self.y = value,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Horizontal => self.width = value,
            Axis::Vertical => self.height = value,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Start coordinate along `axis`.
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Length along `axis`.
    pub fn length(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub fn end(&self, axis: Axis) -> f64 {
        self.start(axis) + self.length(axis)
    }

    /// Whether the two rectangles share some area. Rectangles that only touch along an edge do
    /// not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Scroll mode of one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollMode {
    Disabled,
    Enabled,
    /// Panning is required when the content overflows the viewport, optional otherwise.
    #[default]
    Auto,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoomMode {
    #[default]
    Disabled,
    Enabled,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollBarVisibility {
    /// Scrolling on this axis is turned off; the content is measured against the viewport.
    Disabled,
    #[default]
    Auto,
    Hidden,
    Visible,
}

/// Alignment of the content inside the viewport when it is smaller than the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentAlignment {
    #[default]
    Near,
    Center,
    Far,
    Stretch,
}

/// Alignment handed to the compositor once `Stretch` has been resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompositorAlignment {
    #[default]
    Near,
    Center,
    Far,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SnapPointsAlignment {
    #[default]
    Near,
    Center,
    Far,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SnapPointsType {
    #[default]
    None,
    Optional,
    Mandatory,
    OptionalSingle,
    MandatorySingle,
}

impl SnapPointsType {
    pub fn is_none(self) -> bool {
        self == Self::None
    }

    pub fn is_optional(self) -> bool {
        matches!(self, Self::Optional | Self::OptionalSingle)
    }

    pub fn is_mandatory(self) -> bool {
        matches!(self, Self::Mandatory | Self::MandatorySingle)
    }

    /// Single snap points break inertia at the first point in the direction of travel.
    pub fn is_single(self) -> bool {
        matches!(self, Self::OptionalSingle | Self::MandatorySingle)
    }
}

/// A compositor motion channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionType {
    PanX,
    PanY,
    Zoom,
}

impl MotionType {
    pub fn for_axis(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::PanX,
            Axis::Vertical => Self::PanY,
        }
    }
}

/// A (horizontal offset, vertical offset, zoom factor) triple.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct View {
    pub horizontal_offset: f64,
    pub vertical_offset: f64,
    pub zoom_factor: f32,
}

impl View {
    pub const fn new(horizontal_offset: f64, vertical_offset: f64, zoom_factor: f32) -> Self {
        Self {
            horizontal_offset,
            vertical_offset,
            zoom_factor,
        }
    }

    pub fn offset(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.horizontal_offset,
            Axis::Vertical => self.vertical_offset,
        }
    }

    pub fn set_offset(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Horizontal => self.horizontal_offset = value,
            Axis::Vertical => self.vertical_offset = value,
        }
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// Arena handle of an element owned by the host's visual tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(pub u32);

/// Sizes of pinned headers (e.g. list column headers), in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinnedHeaders {
    /// Height of a header pinned above the content. Pins the vertical axis.
    pub top: Option<f64>,
    /// Width of a header pinned left of the content. Pins the horizontal axis.
    pub left: Option<f64>,
}

impl PinnedHeaders {
    pub fn is_pinned(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.left.is_some(),
            Axis::Vertical => self.top.is_some(),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.left.unwrap_or(0.0), self.top.unwrap_or(0.0))
    }
}

/// Directional step supported by a [`crate::ScrollProvider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollStep {
    LineUp,
    LineDown,
    LineLeft,
    LineRight,
    PageUp,
    PageDown,
    PageLeft,
    PageRight,
    /// Jump to the first position on the vertical axis.
    Home,
    /// Jump to the last position on the vertical axis.
    End,
}
