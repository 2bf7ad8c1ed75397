#![forbid(unsafe_code)]

//! Node properties.
//!
//! Props are immutable once shared. Changing a prop means building a new
//! [`Props`] value and cloning the node with it.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geometry::{DisplayType, EdgeInsets, LayoutConstraints, LayoutContext, LayoutDirection};

/// Shared, immutable props.
pub type SharedProps = Arc<Props>;

/// A length along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Size from content (main axis) or stretch (cross axis).
    #[default]
    Auto,
    /// An exact size in points.
    Points(f32),
    /// A percentage of the parent's inner size (0.0 to 100.0).
    Percent(f32),
}

impl Dimension {
    /// Resolve against the parent's inner size. `None` means "auto".
    #[inline]
    pub fn resolve(self, parent: f32) -> Option<f32> {
        match self {
            Self::Auto => None,
            Self::Points(points) => Some(points.max(0.0)),
            Self::Percent(pct) if parent.is_finite() => Some((parent * pct / 100.0).max(0.0)),
            Self::Percent(_) => None,
        }
    }
}

/// The axis children are stacked along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexDirection {
    /// Top to bottom.
    #[default]
    Column,
    /// Start to end (mirrored in right-to-left layouts).
    Row,
}

/// Layout style consumed by [`crate::layout`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub width: Dimension,
    pub height: Dimension,
    pub flex_direction: FlexDirection,
    /// Share of the parent's leftover main-axis space.
    pub flex_grow: f32,
    pub padding: EdgeInsets,
    pub border: EdgeInsets,
    pub display: DisplayType,
    pub direction: LayoutDirection,
}

impl Style {
    /// Fixed-size style.
    pub fn fixed(width: f32, height: f32) -> Self {
        Self {
            width: Dimension::Points(width),
            height: Dimension::Points(height),
            ..Self::default()
        }
    }
}

/// Opaque attribute value carried alongside the layout style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

/// Props shared by every view-like node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewProps {
    pub style: Style,
    /// Explicit opt-in for layout notifications.
    pub on_layout: bool,
    /// Everything the commit engine does not interpret.
    pub attributes: BTreeMap<String, PropValue>,
}

impl ViewProps {
    /// View props with the given style.
    pub fn with_style(style: Style) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Builder: request layout notifications.
    #[must_use]
    pub fn on_layout(mut self, enabled: bool) -> Self {
        self.on_layout = enabled;
        self
    }

    /// Builder: set an opaque attribute.
    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Props of the root node: view props plus the layout inputs of the surface.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RootProps {
    pub view: ViewProps,
    pub layout_constraints: LayoutConstraints,
    pub layout_context: LayoutContext,
}

impl RootProps {
    /// Copy of `self` with new layout inputs.
    pub fn with_layout(&self, constraints: LayoutConstraints, context: LayoutContext) -> Self {
        Self {
            view: self.view.clone(),
            layout_constraints: constraints,
            layout_context: context,
        }
    }
}

/// Props of any node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Props {
    Root(RootProps),
    View(ViewProps),
}

impl Props {
    /// The view-level props (the root embeds them).
    #[inline]
    pub fn view(&self) -> &ViewProps {
        match self {
            Self::Root(root) => &root.view,
            Self::View(view) => view,
        }
    }

    /// Layout style.
    #[inline]
    pub fn style(&self) -> &Style {
        &self.view().style
    }

    /// Root props, if this is a root.
    #[inline]
    pub fn as_root(&self) -> Option<&RootProps> {
        match self {
            Self::Root(root) => Some(root),
            Self::View(_) => None,
        }
    }

    /// Whether the node explicitly asked for layout notifications.
    #[inline]
    pub fn wants_layout_events(&self) -> bool {
        self.view().on_layout
    }
}

impl From<ViewProps> for Props {
    fn from(props: ViewProps) -> Self {
        Self::View(props)
    }
}

impl From<RootProps> for Props {
    fn from(props: RootProps) -> Self {
        Self::Root(props)
    }
}
