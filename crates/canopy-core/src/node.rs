#![forbid(unsafe_code)]

//! Immutable shadow nodes with structural sharing.
//!
//! A [`ShadowNode`] is mutable only while it is private to the code building
//! it. Once [`ShadowNode::seal_recursive`] has run, or once the node is shared
//! behind an [`Arc`] that somebody else also holds, every change goes through
//! a clone: [`ShadowNode::clone_with`] for explicit edits and
//! [`ShadowNode::unsealed_mut`] for copy-on-write access.
//!
//! Cloning never deep-copies. The clone shares the props, the emitter and the
//! child list of the original unless the [`ShadowNodeFragment`] replaces them.

use std::fmt;
use std::ptr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::event_emitter::SharedEventEmitter;
use crate::geometry::LayoutMetrics;
use crate::props::SharedProps;

/// Identity of a node family, stable across clones.
pub type Tag = i32;

/// Identity of a rendering surface.
pub type SurfaceId = i32;

/// Static component name (`"View"`, `"RootView"`, ...).
pub type ComponentName = &'static str;

/// Shared node handle.
pub type SharedShadowNode = Arc<ShadowNode>;

/// Ordered children of one node.
pub type ShadowNodeList = Vec<SharedShadowNode>;

/// Shared, copy-on-write child list.
pub type SharedShadowNodeList = Arc<ShadowNodeList>;

/// Fields to replace when cloning a node. `None` keeps the original's value.
#[derive(Default, Clone)]
pub struct ShadowNodeFragment {
    pub props: Option<SharedProps>,
    pub children: Option<SharedShadowNodeList>,
    pub event_emitter: Option<SharedEventEmitter>,
}

impl ShadowNodeFragment {
    /// Fragment replacing only the props.
    pub fn props(props: SharedProps) -> Self {
        Self {
            props: Some(props),
            ..Self::default()
        }
    }

    /// Fragment replacing only the children.
    pub fn children(children: SharedShadowNodeList) -> Self {
        Self {
            children: Some(children),
            ..Self::default()
        }
    }
}

/// A node of the scene graph.
pub struct ShadowNode {
    tag: Tag,
    surface_id: SurfaceId,
    component_name: ComponentName,
    props: SharedProps,
    children: SharedShadowNodeList,
    layout_metrics: LayoutMetrics,
    event_emitter: SharedEventEmitter,
    sealed: AtomicBool,
}

impl ShadowNode {
    /// Create a childless, unsealed node that has not been laid out.
    pub fn new(
        tag: Tag,
        surface_id: SurfaceId,
        component_name: ComponentName,
        props: SharedProps,
        event_emitter: SharedEventEmitter,
    ) -> Self {
        Self {
            tag,
            surface_id,
            component_name,
            props,
            children: Arc::default(),
            layout_metrics: LayoutMetrics::EMPTY,
            event_emitter,
            sealed: AtomicBool::new(false),
        }
    }

    /// Unsealed copy with the fragment's fields replaced.
    ///
    /// Layout metrics carry over; the layout pass rewrites them if needed.
    pub fn clone_with(&self, fragment: ShadowNodeFragment) -> Self {
        Self {
            tag: self.tag,
            surface_id: self.surface_id,
            component_name: self.component_name,
            props: fragment.props.unwrap_or_else(|| Arc::clone(&self.props)),
            children: fragment
                .children
                .unwrap_or_else(|| Arc::clone(&self.children)),
            layout_metrics: self.layout_metrics,
            event_emitter: fragment
                .event_emitter
                .unwrap_or_else(|| Arc::clone(&self.event_emitter)),
            sealed: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    #[inline]
    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    #[inline]
    pub fn component_name(&self) -> ComponentName {
        self.component_name
    }

    #[inline]
    pub fn props(&self) -> &SharedProps {
        &self.props
    }

    #[inline]
    pub fn event_emitter(&self) -> &SharedEventEmitter {
        &self.event_emitter
    }

    /// Children in order.
    #[inline]
    pub fn children(&self) -> &[SharedShadowNode] {
        &self.children
    }

    /// The shared child list itself (for identity checks and reuse).
    #[inline]
    pub fn shared_children(&self) -> &SharedShadowNodeList {
        &self.children
    }

    /// Metrics from the last layout pass; [`LayoutMetrics::EMPTY`] before.
    #[inline]
    pub fn layout_metrics(&self) -> &LayoutMetrics {
        &self.layout_metrics
    }

    /// Same tag on the same surface.
    #[inline]
    pub fn same_family(&self, other: &ShadowNode) -> bool {
        self.tag == other.tag && self.surface_id == other.surface_id
    }

    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Seal this node and every node below it. Idempotent.
    ///
    /// A sealed node's subtree is always fully sealed, so already-sealed
    /// subtrees (shared from an older snapshot) are not walked again.
    pub fn seal_recursive(&self) {
        if self.sealed.swap(true, Ordering::AcqRel) {
            return;
        }
        let mut stack: Vec<&ShadowNode> = self.children.iter().map(AsRef::as_ref).collect();
        while let Some(node) = stack.pop() {
            if node.sealed.swap(true, Ordering::AcqRel) {
                continue;
            }
            stack.extend(node.children.iter().map(AsRef::as_ref));
        }
    }

    /// Write layout results. Only valid before sealing.
    pub fn set_layout_metrics(&mut self, metrics: LayoutMetrics) {
        debug_assert!(
            !self.is_sealed(),
            "layout metrics written to sealed node {}",
            self.tag
        );
        self.layout_metrics = metrics;
    }

    /// Mutable child list; clones the list first if it is shared.
    pub fn children_mut(&mut self) -> &mut ShadowNodeList {
        debug_assert!(!self.is_sealed(), "children of sealed node {} edited", self.tag);
        Arc::make_mut(&mut self.children)
    }

    /// Copy-on-write access to a shared node.
    ///
    /// Reuses the allocation when `node` is the only handle and not sealed;
    /// otherwise replaces `node` with an unsealed clone first.
    pub fn unsealed_mut(node: &mut SharedShadowNode) -> &mut ShadowNode {
        if node.is_sealed() {
            *node = Arc::new(node.clone_with(ShadowNodeFragment::default()));
        }
        Arc::make_mut(node)
    }

    /// First descendant (depth-first, pre-order) with the given tag.
    pub fn find_descendant(&self, tag: Tag) -> Option<&SharedShadowNode> {
        for child in self.children.iter() {
            if child.tag == tag {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Path from this node's parent up to `root`, or `None` when this exact
    /// node (by identity) is not reachable from `root`.
    ///
    /// `root` itself is never its own descendant, so asking for the root's
    /// path yields `None`.
    pub fn ancestor_path<'a>(&self, root: &'a ShadowNode) -> Option<AncestorPath<'a>> {
        let mut steps = Vec::new();
        if collect_ancestors(self, root, &mut steps) {
            Some(AncestorPath { steps })
        } else {
            None
        }
    }
}

fn collect_ancestors<'a>(
    target: &ShadowNode,
    node: &'a ShadowNode,
    steps: &mut Vec<AncestorStep<'a>>,
) -> bool {
    for (index, child) in node.children.iter().enumerate() {
        if ptr::eq(child.as_ref(), target) || collect_ancestors(target, child, steps) {
            steps.push(AncestorStep {
                ancestor: node,
                index,
            });
            return true;
        }
    }
    false
}

impl Clone for ShadowNode {
    /// Unsealed copy sharing every field.
    fn clone(&self) -> Self {
        self.clone_with(ShadowNodeFragment::default())
    }
}

impl fmt::Debug for ShadowNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShadowNode")
            .field("tag", &self.tag)
            .field("component_name", &self.component_name)
            .field("sealed", &self.is_sealed())
            .field("frame", &self.layout_metrics.frame)
            .field("children", &self.children.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Ancestor path
// ---------------------------------------------------------------------------

/// One hop of an [`AncestorPath`]: the ancestor and the index of the
/// previous hop (or the target) among its children.
#[derive(Debug, Clone, Copy)]
pub struct AncestorStep<'a> {
    pub ancestor: &'a ShadowNode,
    pub index: usize,
}

/// Ancestors of a node, nearest first, ending with the root.
#[derive(Debug, Clone)]
pub struct AncestorPath<'a> {
    steps: Vec<AncestorStep<'a>>,
}

impl<'a> AncestorPath<'a> {
    /// Number of ancestors (at least one: the root).
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the path has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps from the direct parent outward to the root.
    pub fn iter(&self) -> impl Iterator<Item = &AncestorStep<'a>> {
        self.steps.iter()
    }

    /// The direct parent of the target.
    pub fn parent(&self) -> Option<&AncestorStep<'a>> {
        self.steps.first()
    }

    /// The root step.
    pub fn root(&self) -> Option<&AncestorStep<'a>> {
        self.steps.last()
    }
}
