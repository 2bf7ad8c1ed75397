#![forbid(unsafe_code)]

//! The per-surface commit engine.
//!
//! A [`ShadowTree`] owns the current root of one surface. Every change goes
//! through the same pipeline:
//!
//! 1. Build an unsealed candidate root from the current one (new layout
//!    inputs, new children, or one node replaced deep in the tree).
//! 2. Lay the candidate out and seal it.
//! 3. Diff the current root against the candidate.
//! 4. Install the candidate if the current root is still the one it was built
//!    from, then toggle event emitters for the mutation list.
//! 5. After the gate is released, send layout events and notify the delegate.
//!
//! Steps 1 to 3 run without any lock, so concurrent producers only contend on
//! the pointer swap. A producer that loses the race gets `false` back and
//! decides for itself whether to rebuild from the new root.
//!
//! # Lock order
//!
//! The root-slot gate is taken before the emitter dispatch lock, never after.
//! Event dispatchers run under the dispatch lock and must not commit.

use std::sync::Arc;

use canopy_core::{
    LayoutConstraints, LayoutContext, RootShadowNode, ShadowNode, ShadowNodeFragment,
    ShadowViewMutation, SharedRootShadowNode, SharedShadowNode, SharedShadowNodeList, Size,
    SurfaceId, layout,
};
use canopy_diff::calculate_shadow_view_mutations;
use parking_lot::RwLock;
use tracing::field::Empty;

use crate::config::{ConfigError, ShadowTreeConfig};
use crate::delegate::ShadowTreeDelegate;
use crate::emitter_toggle::toggle_event_emitters;
use crate::layout_events::emit_layout_events;
use crate::root_slot::RootSlot;
use crate::stats::{CommitCounters, CommitStats};

/// Shared delegate handle.
pub type SharedShadowTreeDelegate = Arc<dyn ShadowTreeDelegate>;

/// Owner of one surface's committed scene graph.
pub struct ShadowTree {
    surface_id: SurfaceId,
    root: RootSlot,
    delegate: RwLock<Option<SharedShadowTreeDelegate>>,
    counters: CommitCounters,
}

impl ShadowTree {
    /// Create a tree holding an empty, sealed root for `surface_id`.
    pub fn new(
        surface_id: SurfaceId,
        layout_constraints: LayoutConstraints,
        layout_context: LayoutContext,
    ) -> Self {
        let root = RootShadowNode::new(surface_id, layout_constraints, layout_context);
        root.seal_recursive();
        tracing::debug!(target: "canopy.commit", surface_id, "shadow tree created");
        Self {
            surface_id,
            root: RootSlot::new(Arc::new(root)),
            delegate: RwLock::new(None),
            counters: CommitCounters::default(),
        }
    }

    /// Create a tree from a validated configuration.
    pub fn from_config(config: &ShadowTreeConfig) -> Result<Self, ConfigError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        Ok(Self::new(
            config.surface_id,
            config.layout_constraints,
            config.layout_context,
        ))
    }

    #[inline]
    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    /// The current root. Never blocks.
    #[inline]
    pub fn root_shadow_node(&self) -> SharedRootShadowNode {
        self.root.load()
    }

    /// Run `f` while no commit on this tree can install a root.
    ///
    /// The gate is reentrant: `f` may read the tree or commit to it.
    pub fn synchronize<R>(&self, f: impl FnOnce() -> R) -> R {
        self.root.synchronize(f)
    }

    // -----------------------------------------------------------------------
    // Delegate
    // -----------------------------------------------------------------------

    /// Install the commit observer, replacing any previous one.
    pub fn set_delegate(&self, delegate: SharedShadowTreeDelegate) {
        *self.delegate.write() = Some(delegate);
    }

    pub fn clear_delegate(&self) {
        *self.delegate.write() = None;
    }

    pub fn delegate(&self) -> Option<SharedShadowTreeDelegate> {
        self.delegate.read().clone()
    }

    /// Counters since construction.
    pub fn stats(&self) -> CommitStats {
        self.counters.snapshot()
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// Size the current tree would have under other layout inputs.
    ///
    /// Nothing is committed and the current root is left untouched.
    pub fn measure(&self, layout_constraints: LayoutConstraints, layout_context: LayoutContext) -> Size {
        let root = self.root_shadow_node();
        let candidate = root.clone_with_layout(layout_constraints, layout_context);
        layout::compute_root(candidate.as_node(), candidate.root_props())
            .metrics
            .frame
            .size
    }

    /// Commit the current tree under new layout inputs.
    pub fn constraint_layout(
        &self,
        layout_constraints: LayoutConstraints,
        layout_context: LayoutContext,
    ) -> bool {
        let old_root = self.root_shadow_node();
        let new_root = old_root.clone_with_layout(layout_constraints, layout_context);
        self.complete(&old_root, new_root)
    }

    // -----------------------------------------------------------------------
    // Commit paths
    // -----------------------------------------------------------------------

    /// Commit the current root with its children replaced.
    pub fn complete_with_children(&self, children: SharedShadowNodeList) -> bool {
        let old_root = self.root_shadow_node();
        let new_root = old_root.clone_with_children(children);
        self.complete(&old_root, new_root)
    }

    /// Replace `old_node` (by identity) with `new_node` and commit.
    ///
    /// Every ancestor of `old_node` is cloned with one child swapped; all other
    /// nodes are shared with the current root. Returns `false` without
    /// touching anything when `old_node` is not part of the current root, or
    /// when another commit lands first.
    pub fn complete_by_replacing_shadow_node(
        &self,
        old_node: &ShadowNode,
        new_node: SharedShadowNode,
    ) -> bool {
        let old_root = self.root_shadow_node();
        let Some(path) = old_node.ancestor_path(old_root.as_node()) else {
            tracing::debug!(
                target: "canopy.commit",
                surface_id = self.surface_id,
                tag = old_node.tag(),
                "replacement target not in current tree"
            );
            return false;
        };

        let mut replacement = new_node;
        let mut steps = path.iter().peekable();
        while let Some(step) = steps.next() {
            let mut children = step.ancestor.children().to_vec();
            children[step.index] = replacement;
            let children: SharedShadowNodeList = Arc::new(children);
            if steps.peek().is_none() {
                let new_root = old_root.clone_with_children(children);
                return self.complete(&old_root, new_root);
            }
            replacement = Arc::new(
                step.ancestor
                    .clone_with(ShadowNodeFragment::children(children)),
            );
        }
        false
    }

    /// Finish `new_root` and commit it on top of `old_root`.
    ///
    /// An unsealed candidate is laid out and sealed first; a sealed one is
    /// taken as is. On success layout events are sent and the delegate is
    /// notified, in that order. On failure neither happens.
    pub fn complete(&self, old_root: &SharedRootShadowNode, mut new_root: RootShadowNode) -> bool {
        let span = tracing::debug_span!(
            "shadow_tree.complete",
            surface_id = self.surface_id,
            mutations = Empty,
            outcome = Empty
        );
        let _guard = span.enter();

        if !new_root.is_sealed() {
            new_root.layout();
            new_root.seal_recursive();
        }
        let new_root = Arc::new(new_root);

        let mutations = calculate_shadow_view_mutations(old_root.as_node(), new_root.as_node());
        span.record("mutations", mutations.len());

        if !self.commit(old_root, new_root, &mutations) {
            span.record("outcome", "rejected");
            return false;
        }
        span.record("outcome", "committed");

        let notified = emit_layout_events(&mutations);
        self.counters.record_layout_events(notified);

        if let Some(delegate) = self.delegate() {
            delegate.shadow_tree_did_commit(self, &mutations);
        }
        true
    }

    /// Install `new_root` if the slot still holds `old_root`, then toggle
    /// emitters under the same gate.
    pub(crate) fn commit(
        &self,
        old_root: &SharedRootShadowNode,
        new_root: SharedRootShadowNode,
        mutations: &[ShadowViewMutation],
    ) -> bool {
        let _span = tracing::debug_span!("shadow_tree.commit", surface_id = self.surface_id).entered();
        self.counters.record_attempt();

        let installed = self
            .root
            .compare_and_install(old_root, new_root, || toggle_event_emitters(mutations));

        if installed {
            self.counters.record_commit(mutations.len());
            tracing::debug!(
                target: "canopy.commit",
                surface_id = self.surface_id,
                mutations = mutations.len(),
                outcome = "committed",
                "root installed"
            );
        } else {
            self.counters.record_rejection();
            tracing::debug!(
                target: "canopy.commit",
                surface_id = self.surface_id,
                outcome = "rejected",
                "stale base root"
            );
        }
        installed
    }

    /// Commit an empty tree so every live node is deleted and its emitter
    /// disabled. Safe to call more than once.
    pub fn teardown(&self) -> bool {
        tracing::debug!(target: "canopy.commit", surface_id = self.surface_id, "tearing down");
        self.complete_with_children(SharedShadowNodeList::default())
    }
}

impl Drop for ShadowTree {
    fn drop(&mut self) {
        if !self.teardown() {
            tracing::warn!(
                target: "canopy.commit",
                surface_id = self.surface_id,
                "teardown commit rejected on drop"
            );
        }
    }
}

impl std::fmt::Debug for ShadowTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadowTree")
            .field("surface_id", &self.surface_id)
            .field("root", &self.root)
            .field("has_delegate", &self.delegate.read().is_some())
            .finish()
    }
}
