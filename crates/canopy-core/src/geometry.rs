#![forbid(unsafe_code)]

//! Geometric primitives and layout inputs/outputs.
//!
//! All values are in points (`f32`). Pixel snapping happens in the layout
//! solver, driven by [`LayoutContext::point_scale_factor`].

use serde::{Deserialize, Serialize};

/// A two-dimensional size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero width and height.
    pub const ZERO: Size = Size::new(0.0, 0.0);

    /// Unbounded in both directions.
    pub const INFINITE: Size = Size::new(f32::INFINITY, f32::INFINITY);

    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp each axis into `[min, max]`.
    ///
    /// `max` wins when the bounds cross, so a degenerate constraint never
    /// produces a size larger than the caller allowed.
    #[inline]
    pub fn clamp(self, min: Size, max: Size) -> Size {
        Size::new(
            self.width.max(min.width).min(max.width),
            self.height.max(min.height).min(max.height),
        )
    }
}

/// A point in the parent's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Point = Point::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle: origin relative to the parent plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self {
            origin: Point::ZERO,
            size,
        }
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.width <= 0.0 || self.size.height <= 0.0
    }
}

/// Insets for padding, borders and content.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeInsets {
    /// No insets.
    pub const ZERO: EdgeInsets = EdgeInsets::new(0.0, 0.0, 0.0, 0.0);

    /// Create new insets with specific values.
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create new insets with equal values.
    pub const fn all(val: f32) -> Self {
        Self::new(val, val, val, val)
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal_sum(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical_sum(&self) -> f32 {
        self.top + self.bottom
    }

    /// Component-wise sum.
    #[inline]
    pub fn plus(&self, other: &EdgeInsets) -> EdgeInsets {
        EdgeInsets::new(
            self.top + other.top,
            self.right + other.right,
            self.bottom + other.bottom,
            self.left + other.left,
        )
    }

    /// Swap left and right.
    #[inline]
    pub fn mirrored(&self) -> EdgeInsets {
        EdgeInsets::new(self.top, self.left, self.bottom, self.right)
    }
}

impl From<f32> for EdgeInsets {
    fn from(val: f32) -> Self {
        Self::all(val)
    }
}

/// Writing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    /// Inherit from the parent (resolves to left-to-right at the root).
    #[default]
    Undefined,
    LeftToRight,
    RightToLeft,
}

impl LayoutDirection {
    /// Resolve `Undefined` against the inherited direction.
    #[inline]
    pub fn resolve(self, inherited: LayoutDirection) -> LayoutDirection {
        match self {
            Self::Undefined => match inherited {
                Self::Undefined => Self::LeftToRight,
                other => other,
            },
            other => other,
        }
    }
}

/// Whether a node takes part in layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayType {
    None,
    #[default]
    Flex,
}

/// Size bounds and direction handed to the root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConstraints {
    pub minimum_size: Size,
    pub maximum_size: Size,
    pub layout_direction: LayoutDirection,
}

impl Default for LayoutConstraints {
    fn default() -> Self {
        Self {
            minimum_size: Size::ZERO,
            maximum_size: Size::INFINITE,
            layout_direction: LayoutDirection::Undefined,
        }
    }
}

impl LayoutConstraints {
    /// Constraints pinning the root to exactly `size`.
    pub const fn exact(size: Size) -> Self {
        Self {
            minimum_size: size,
            maximum_size: size,
            layout_direction: LayoutDirection::Undefined,
        }
    }

    /// Clamp a size into these constraints.
    #[inline]
    pub fn clamp(&self, size: Size) -> Size {
        size.clamp(self.minimum_size, self.maximum_size)
    }
}

/// Environment shared by every node during one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutContext {
    /// Device pixels per point; frames are snapped to `1 / point_scale_factor`.
    pub point_scale_factor: f32,
    /// Mirror left/right insets for right-to-left layouts.
    pub swap_left_and_right_in_rtl: bool,
    /// Multiplier applied to font sizes by text measurement.
    pub font_size_multiplier: f32,
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self {
            point_scale_factor: 1.0,
            swap_left_and_right_in_rtl: false,
            font_size_multiplier: 1.0,
        }
    }
}

/// Result of layout for a single node.
///
/// Compared with `==` by the layout event notifier: any differing component
/// counts as a geometry change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub frame: Rect,
    pub content_insets: EdgeInsets,
    pub border_width: EdgeInsets,
    pub display_type: DisplayType,
    pub layout_direction: LayoutDirection,
    pub point_scale_factor: f32,
}

impl LayoutMetrics {
    /// Metrics of a node that has never been laid out.
    pub const EMPTY: LayoutMetrics = LayoutMetrics {
        frame: Rect::new(0.0, 0.0, 0.0, 0.0),
        content_insets: EdgeInsets::ZERO,
        border_width: EdgeInsets::ZERO,
        display_type: DisplayType::Flex,
        layout_direction: LayoutDirection::Undefined,
        point_scale_factor: 1.0,
    };
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::EMPTY
    }
}
