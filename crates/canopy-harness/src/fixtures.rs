#![forbid(unsafe_code)]

//! Node tree builders.

use std::sync::Arc;

use canopy_core::{
    MutationKind, Props, ShadowNode, ShadowNodeFragment, ShadowViewMutation, SharedShadowNode,
    Style, SurfaceId, Tag, ViewProps,
};

use crate::journal::{Journal, RecordingEmitter};

/// Builds `"View"` nodes for one surface, each with its own
/// [`RecordingEmitter`] writing into a shared [`Journal`].
#[derive(Debug, Clone)]
pub struct NodeFactory {
    surface_id: SurfaceId,
    journal: Arc<Journal>,
}

impl NodeFactory {
    pub const COMPONENT_NAME: &'static str = "View";

    pub fn new(surface_id: SurfaceId) -> Self {
        Self::with_journal(surface_id, Journal::new())
    }

    pub fn with_journal(surface_id: SurfaceId, journal: Arc<Journal>) -> Self {
        Self {
            surface_id,
            journal,
        }
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    pub fn journal(&self) -> &Arc<Journal> {
        &self.journal
    }

    /// A node with a layout-capable emitter.
    pub fn view(
        &self,
        tag: Tag,
        props: ViewProps,
        children: Vec<SharedShadowNode>,
    ) -> SharedShadowNode {
        self.build(tag, props, children, true)
    }

    /// A node whose emitter cannot receive layout notifications.
    pub fn inert_view(
        &self,
        tag: Tag,
        props: ViewProps,
        children: Vec<SharedShadowNode>,
    ) -> SharedShadowNode {
        self.build(tag, props, children, false)
    }

    /// Fixed-size leaf that asks for layout notifications.
    pub fn leaf(&self, tag: Tag, width: f32, height: f32) -> SharedShadowNode {
        self.view(
            tag,
            ViewProps::with_style(Style::fixed(width, height)).on_layout(true),
            Vec::new(),
        )
    }

    /// Auto-sized column that asks for layout notifications.
    pub fn column(&self, tag: Tag, children: Vec<SharedShadowNode>) -> SharedShadowNode {
        self.view(tag, ViewProps::default().on_layout(true), children)
    }

    fn build(
        &self,
        tag: Tag,
        props: ViewProps,
        children: Vec<SharedShadowNode>,
        layout_capable: bool,
    ) -> SharedShadowNode {
        let emitter = RecordingEmitter::new(tag, Arc::clone(&self.journal), layout_capable);
        let node = ShadowNode::new(
            tag,
            self.surface_id,
            Self::COMPONENT_NAME,
            Arc::new(Props::View(props)),
            Arc::new(emitter),
        );
        if children.is_empty() {
            Arc::new(node)
        } else {
            Arc::new(node.clone_with(ShadowNodeFragment::children(Arc::new(children))))
        }
    }
}

/// Clone of `node` with new view props. Emitter and children are shared.
pub fn replace_props(node: &ShadowNode, props: ViewProps) -> SharedShadowNode {
    Arc::new(node.clone_with(ShadowNodeFragment::props(Arc::new(Props::View(props)))))
}

/// Clone of `node` with a new child list. Props and emitter are shared.
pub fn replace_children(node: &ShadowNode, children: Vec<SharedShadowNode>) -> SharedShadowNode {
    Arc::new(node.clone_with(ShadowNodeFragment::children(Arc::new(children))))
}

/// `(kind, tag)` per mutation, for compact assertions.
pub fn mutation_summary(mutations: &[ShadowViewMutation]) -> Vec<(MutationKind, Tag)> {
    mutations.iter().map(|m| (m.kind(), m.tag())).collect()
}
