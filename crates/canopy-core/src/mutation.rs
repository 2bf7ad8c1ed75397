#![forbid(unsafe_code)]

//! Mutation records handed to the mounting layer.
//!
//! A mutation list is ordered; the mounting layer applies it front to back.

use std::fmt;
use std::sync::Arc;

use crate::event_emitter::SharedEventEmitter;
use crate::geometry::LayoutMetrics;
use crate::node::{ComponentName, ShadowNode, Tag};
use crate::props::SharedProps;

/// Flat view of one node as the mounting layer sees it.
#[derive(Clone)]
pub struct ShadowView {
    pub tag: Tag,
    pub component_name: ComponentName,
    pub props: SharedProps,
    pub event_emitter: SharedEventEmitter,
    pub layout_metrics: LayoutMetrics,
}

impl ShadowView {
    /// Capture a node.
    pub fn new(node: &ShadowNode) -> Self {
        Self {
            tag: node.tag(),
            component_name: node.component_name(),
            props: Arc::clone(node.props()),
            event_emitter: Arc::clone(node.event_emitter()),
            layout_metrics: *node.layout_metrics(),
        }
    }
}

impl From<&ShadowNode> for ShadowView {
    fn from(node: &ShadowNode) -> Self {
        Self::new(node)
    }
}

impl PartialEq for ShadowView {
    /// Props and emitter compare by identity.
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.component_name == other.component_name
            && Arc::ptr_eq(&self.props, &other.props)
            && Arc::ptr_eq(&self.event_emitter, &other.event_emitter)
            && self.layout_metrics == other.layout_metrics
    }
}

impl fmt::Debug for ShadowView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShadowView")
            .field("tag", &self.tag)
            .field("component_name", &self.component_name)
            .field("frame", &self.layout_metrics.frame)
            .finish()
    }
}

/// Kind of a mutation, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Delete,
    Insert,
    Remove,
    Update,
}

/// One structural change between two snapshots.
#[derive(Debug, Clone, PartialEq)]
pub enum ShadowViewMutation {
    /// A view comes into existence (not yet attached).
    Create { new: ShadowView },
    /// A view goes away for good (already detached).
    Delete { old: ShadowView },
    /// Attach `new` under `parent` at `index`.
    Insert {
        parent: ShadowView,
        new: ShadowView,
        index: usize,
    },
    /// Detach `old` from `parent` at `index`.
    Remove {
        parent: ShadowView,
        old: ShadowView,
        index: usize,
    },
    /// Replace the view's props, emitter or metrics in place.
    Update {
        parent: ShadowView,
        old: ShadowView,
        new: ShadowView,
        index: usize,
    },
}

/// Ordered mutations.
pub type ShadowViewMutationList = Vec<ShadowViewMutation>;

impl ShadowViewMutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Create { .. } => MutationKind::Create,
            Self::Delete { .. } => MutationKind::Delete,
            Self::Insert { .. } => MutationKind::Insert,
            Self::Remove { .. } => MutationKind::Remove,
            Self::Update { .. } => MutationKind::Update,
        }
    }

    /// The view before the change, if the mutation has one.
    pub fn old_view(&self) -> Option<&ShadowView> {
        match self {
            Self::Delete { old } | Self::Remove { old, .. } | Self::Update { old, .. } => Some(old),
            Self::Create { .. } | Self::Insert { .. } => None,
        }
    }

    /// The view after the change, if the mutation has one.
    pub fn new_view(&self) -> Option<&ShadowView> {
        match self {
            Self::Create { new } | Self::Insert { new, .. } | Self::Update { new, .. } => Some(new),
            Self::Delete { .. } | Self::Remove { .. } => None,
        }
    }

    /// Parent view for attach/detach/update mutations.
    pub fn parent_view(&self) -> Option<&ShadowView> {
        match self {
            Self::Insert { parent, .. } | Self::Remove { parent, .. } | Self::Update { parent, .. } => {
                Some(parent)
            }
            Self::Create { .. } | Self::Delete { .. } => None,
        }
    }

    /// Tag of the node the mutation is about.
    pub fn tag(&self) -> Tag {
        match self {
            Self::Create { new } | Self::Insert { new, .. } | Self::Update { new, .. } => new.tag,
            Self::Delete { old } | Self::Remove { old, .. } => old.tag,
        }
    }
}
