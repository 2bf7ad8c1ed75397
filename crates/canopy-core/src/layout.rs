#![forbid(unsafe_code)]

//! Reference stack layout.
//!
//! Each container stacks its visible children along one axis
//! ([`FlexDirection`]). Children take their styled size on the main axis or
//! their content size when `Auto`; leftover main-axis space is shared by
//! `flex_grow`. On the cross axis an `Auto` child stretches to the container.
//! Rows are mirrored in right-to-left layouts.
//!
//! Layout runs in two phases:
//!
//! 1. [`compute_root`] reads the (possibly shared, possibly sealed) tree and
//!    produces a [`ComputedLayout`] that marks every subtree whose metrics
//!    differ from what the nodes already hold.
//! 2. [`apply_layout`] writes the results back, cloning only the nodes on a
//!    changed path. Subtrees whose geometry is unchanged keep their original
//!    shared references.

use crate::geometry::{
    DisplayType, EdgeInsets, LayoutContext, LayoutDirection, LayoutMetrics, Rect, Size,
};
use crate::node::ShadowNode;
use crate::props::{FlexDirection, RootProps, Style};

/// Layout computed for one node before it is written back.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedLayout {
    pub metrics: LayoutMetrics,
    /// The node's metrics or a descendant's differ from the tree.
    pub changed: bool,
    pub children: Vec<ComputedLayout>,
}

/// Lay out the root and write the results into it.
pub fn layout_root(root: &mut ShadowNode, props: &RootProps) {
    let computed = compute_root(root, props);
    apply_layout(root, &computed);
}

/// Compute the layout of a whole tree without touching it.
///
/// The root's size is the constraints' maximum on each bounded axis and the
/// content size on unbounded ones, clamped to the constraints.
pub fn compute_root(root: &ShadowNode, props: &RootProps) -> ComputedLayout {
    let constraints = props.layout_constraints;
    let context = props.layout_context;
    let bounds = constraints.maximum_size;
    let content = content_size(root, bounds);

    let size = constraints.clamp(Size::new(
        if bounds.width.is_finite() {
            bounds.width
        } else {
            content.width
        },
        if bounds.height.is_finite() {
            bounds.height
        } else {
            content.height
        },
    ));

    layout_node(
        root,
        Rect::from_size(size),
        constraints.layout_direction,
        &context,
    )
}

/// Write a computed layout into `node`, copying on write below it.
pub fn apply_layout(node: &mut ShadowNode, computed: &ComputedLayout) {
    if !computed.changed {
        return;
    }
    if *node.layout_metrics() != computed.metrics {
        node.set_layout_metrics(computed.metrics);
    }
    if !computed.children.iter().any(|child| child.changed) {
        return;
    }
    let children = node.children_mut();
    for (child, computed) in children.iter_mut().zip(&computed.children) {
        if computed.changed {
            apply_layout(ShadowNode::unsealed_mut(child), computed);
        }
    }
}

fn layout_node(
    node: &ShadowNode,
    frame: Rect,
    inherited: LayoutDirection,
    context: &LayoutContext,
) -> ComputedLayout {
    let style = node.props().style();
    let direction = style.direction.resolve(inherited);
    if style.display == DisplayType::None {
        return hidden(node, direction, context);
    }

    let (border, insets) = resolved_insets(style, direction, context);
    let inner = Size::new(
        (frame.size.width - insets.horizontal_sum()).max(0.0),
        (frame.size.height - insets.vertical_sum()).max(0.0),
    );

    let placements = place_children(node, style, inner, insets, direction);
    let children: Vec<ComputedLayout> = node
        .children()
        .iter()
        .zip(placements)
        .map(|(child, placement)| match placement {
            Some(rect) => layout_node(child, rect, direction, context),
            None => hidden(child, direction, context),
        })
        .collect();

    let metrics = LayoutMetrics {
        frame: snap_rect(frame, context.point_scale_factor),
        content_insets: insets,
        border_width: border,
        display_type: DisplayType::Flex,
        layout_direction: direction,
        point_scale_factor: context.point_scale_factor,
    };
    finish(node, metrics, children)
}

fn hidden(node: &ShadowNode, direction: LayoutDirection, context: &LayoutContext) -> ComputedLayout {
    let metrics = LayoutMetrics {
        frame: Rect::default(),
        content_insets: EdgeInsets::ZERO,
        border_width: EdgeInsets::ZERO,
        display_type: DisplayType::None,
        layout_direction: direction,
        point_scale_factor: context.point_scale_factor,
    };
    let children = node
        .children()
        .iter()
        .map(|child| hidden(child, direction, context))
        .collect();
    finish(node, metrics, children)
}

fn finish(node: &ShadowNode, metrics: LayoutMetrics, children: Vec<ComputedLayout>) -> ComputedLayout {
    let changed = *node.layout_metrics() != metrics || children.iter().any(|c| c.changed);
    ComputedLayout {
        metrics,
        changed,
        children,
    }
}

/// Border and full content insets (border + padding), mirrored for RTL when
/// the context asks for it.
fn resolved_insets(
    style: &Style,
    direction: LayoutDirection,
    context: &LayoutContext,
) -> (EdgeInsets, EdgeInsets) {
    let mirror = direction == LayoutDirection::RightToLeft && context.swap_left_and_right_in_rtl;
    let (border, padding) = if mirror {
        (style.border.mirrored(), style.padding.mirrored())
    } else {
        (style.border, style.padding)
    };
    (border, border.plus(&padding))
}

struct Item {
    main: f32,
    cross: f32,
    grow: f32,
}

/// Frames of the children relative to the parent; `None` for hidden ones.
fn place_children(
    node: &ShadowNode,
    style: &Style,
    inner: Size,
    insets: EdgeInsets,
    direction: LayoutDirection,
) -> Vec<Option<Rect>> {
    let row = style.flex_direction == FlexDirection::Row;
    let (main_avail, cross_avail) = if row {
        (inner.width, inner.height)
    } else {
        (inner.height, inner.width)
    };

    let mut items: Vec<Option<Item>> = node
        .children()
        .iter()
        .map(|child| {
            let child_style = child.props().style();
            if child_style.display == DisplayType::None {
                return None;
            }
            let (main_dim, cross_dim) = if row {
                (child_style.width, child_style.height)
            } else {
                (child_style.height, child_style.width)
            };
            let main_styled = main_dim.resolve(main_avail);
            let cross_styled = cross_dim.resolve(cross_avail);
            let intrinsic = if main_styled.is_none() || cross_styled.is_none() {
                content_size(child, inner)
            } else {
                Size::ZERO
            };
            let (intrinsic_main, intrinsic_cross) = if row {
                (intrinsic.width, intrinsic.height)
            } else {
                (intrinsic.height, intrinsic.width)
            };
            Some(Item {
                main: main_styled.unwrap_or(intrinsic_main),
                cross: cross_styled.unwrap_or(if cross_avail.is_finite() {
                    cross_avail
                } else {
                    intrinsic_cross
                }),
                grow: child_style.flex_grow.max(0.0),
            })
        })
        .collect();

    let used: f32 = items.iter().flatten().map(|item| item.main).sum();
    let total_grow: f32 = items.iter().flatten().map(|item| item.grow).sum();
    let leftover = main_avail - used;
    if leftover.is_finite() && leftover > 0.0 && total_grow > 0.0 {
        for item in items.iter_mut().flatten() {
            item.main += leftover * item.grow / total_grow;
        }
    }

    let rtl = direction == LayoutDirection::RightToLeft && inner.width.is_finite();
    let mut offset = 0.0_f32;
    items
        .into_iter()
        .map(|item| {
            let item = item?;
            let start = offset;
            offset += item.main;
            let rect = if row {
                let x = if rtl {
                    inner.width - start - item.main
                } else {
                    start
                };
                Rect::new(insets.left + x, insets.top, item.main, item.cross)
            } else {
                let x = if rtl {
                    (inner.width - item.cross).max(0.0)
                } else {
                    0.0
                };
                Rect::new(insets.left + x, insets.top + start, item.cross, item.main)
            };
            Some(rect)
        })
        .collect()
}

/// Border-box size a node needs for its content inside `available`.
fn content_size(node: &ShadowNode, available: Size) -> Size {
    let style = node.props().style();
    if style.display == DisplayType::None {
        return Size::ZERO;
    }
    let insets = style.border.plus(&style.padding);
    let inner = Size::new(
        (available.width - insets.horizontal_sum()).max(0.0),
        (available.height - insets.vertical_sum()).max(0.0),
    );
    let row = style.flex_direction == FlexDirection::Row;

    let mut main = 0.0_f32;
    let mut cross = 0.0_f32;
    for child in node.children() {
        let child_style = child.props().style();
        if child_style.display == DisplayType::None {
            continue;
        }
        let width = child_style.width.resolve(inner.width);
        let height = child_style.height.resolve(inner.height);
        let intrinsic = if width.is_none() || height.is_none() {
            content_size(child, inner)
        } else {
            Size::ZERO
        };
        let size = Size::new(
            width.unwrap_or(intrinsic.width),
            height.unwrap_or(intrinsic.height),
        );
        if row {
            main += size.width;
            cross = cross.max(size.height);
        } else {
            main += size.height;
            cross = cross.max(size.width);
        }
    }

    let content = if row {
        Size::new(main, cross)
    } else {
        Size::new(cross, main)
    };
    Size::new(
        content.width + insets.horizontal_sum(),
        content.height + insets.vertical_sum(),
    )
}

#[inline]
fn snap(value: f32, scale: f32) -> f32 {
    if scale > 0.0 && value.is_finite() {
        (value * scale).round() / scale
    } else {
        value
    }
}

fn snap_rect(rect: Rect, scale: f32) -> Rect {
    Rect::new(
        snap(rect.origin.x, scale),
        snap(rect.origin.y, scale),
        snap(rect.size.width, scale),
        snap(rect.size.height, scale),
    )
}
