#![forbid(unsafe_code)]

//! The root node: the unit of commit.

use std::ops::Deref;
use std::sync::Arc;

use crate::event_emitter::ViewEventEmitter;
use crate::geometry::{LayoutConstraints, LayoutContext, LayoutMetrics};
use crate::layout;
use crate::node::{ShadowNode, ShadowNodeFragment, SharedShadowNodeList, SurfaceId};
use crate::props::{Props, RootProps};

/// Shared, committed snapshot.
pub type SharedRootShadowNode = Arc<RootShadowNode>;

/// A tree root carrying the surface's layout constraints and context.
///
/// Two roots are the same snapshot only if they are the same allocation;
/// structurally equal roots are still distinct snapshots.
#[derive(Debug, Clone)]
pub struct RootShadowNode {
    node: ShadowNode,
    props: RootProps,
}

impl RootShadowNode {
    pub const COMPONENT_NAME: &'static str = "RootView";

    /// Empty root for a surface. The root's tag is the surface id.
    pub fn new(
        surface_id: SurfaceId,
        layout_constraints: LayoutConstraints,
        layout_context: LayoutContext,
    ) -> Self {
        let props = RootProps {
            layout_constraints,
            layout_context,
            ..RootProps::default()
        };
        let node = ShadowNode::new(
            surface_id,
            surface_id,
            Self::COMPONENT_NAME,
            Arc::new(Props::Root(props.clone())),
            Arc::new(ViewEventEmitter::noop(surface_id)),
        );
        Self { node, props }
    }

    /// Unsealed clone with new layout inputs; children are shared.
    pub fn clone_with_layout(
        &self,
        layout_constraints: LayoutConstraints,
        layout_context: LayoutContext,
    ) -> Self {
        let props = self.props.with_layout(layout_constraints, layout_context);
        let node = self
            .node
            .clone_with(ShadowNodeFragment::props(Arc::new(Props::Root(props.clone()))));
        Self { node, props }
    }

    /// Unsealed clone with the children replaced wholesale.
    pub fn clone_with_children(&self, children: SharedShadowNodeList) -> Self {
        Self {
            node: self.node.clone_with(ShadowNodeFragment::children(children)),
            props: self.props.clone(),
        }
    }

    /// Root props (layout constraints and context).
    pub fn root_props(&self) -> &RootProps {
        &self.props
    }

    pub fn layout_constraints(&self) -> &LayoutConstraints {
        &self.props.layout_constraints
    }

    pub fn layout_context(&self) -> &LayoutContext {
        &self.props.layout_context
    }

    /// Run layout over this (unsealed) root and its subtree.
    pub fn layout(&mut self) {
        layout::layout_root(&mut self.node, &self.props);
    }

    /// Metrics of the root itself.
    pub fn layout_metrics(&self) -> &LayoutMetrics {
        self.node.layout_metrics()
    }

    /// The root as a plain node.
    pub fn as_node(&self) -> &ShadowNode {
        &self.node
    }
}

impl Deref for RootShadowNode {
    type Target = ShadowNode;

    fn deref(&self) -> &ShadowNode {
        &self.node
    }
}
