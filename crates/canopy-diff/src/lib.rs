#![forbid(unsafe_code)]

//! Tree differ: two sealed roots in, an ordered mutation list out.
//!
//! Children are matched by [`Tag`] within the same parent. The differ is a pure
//! function of its inputs and never looks at anything but the two trees.
//!
//! # Ordering
//!
//! For every parent:
//!
//! 1. The common prefix of same-tag children is compared in place. A child
//!    whose [`ShadowView`] changed gets an `Update`; its children are diffed
//!    recursively either way.
//! 2. Past the prefix, the remaining old children are detached in reverse
//!    index order (`Remove`), so every index is valid when applied. Children
//!    that do not come back have their subtree detached and deleted
//!    bottom-up, ending with `Delete` of the child itself.
//! 3. The remaining new children are attached in order (`Insert`). New tags
//!    are created first (`Create`, then their own subtree is created and
//!    attached). Tags that moved are re-attached and diffed recursively.
//!
//! Identical node or child-list references (structural sharing) are skipped
//! without descending into them.
//!
//! # Invariants
//!
//! - Tags are unique among the children of one parent.
//! - Moving a node family to a different parent is a delete plus a create
//!   of views sharing one emitter.

use std::ptr;
use std::sync::Arc;

use canopy_core::{
    ShadowNode, ShadowView, ShadowViewMutation, ShadowViewMutationList, SharedShadowNode,
    SharedShadowNodeList, Tag,
};
use rustc_hash::{FxHashMap, FxHashSet};

/// Compute the mutations that turn `old_root` into `new_root`.
///
/// The roots themselves are never reported; the list describes their
/// subtrees with the new root as the parent of its children.
pub fn calculate_shadow_view_mutations(
    old_root: &ShadowNode,
    new_root: &ShadowNode,
) -> ShadowViewMutationList {
    let mut mutations = ShadowViewMutationList::new();
    if ptr::eq(old_root, new_root) {
        return mutations;
    }

    let _span = tracing::trace_span!("diff.calculate", root_tag = new_root.tag()).entered();
    let parent = ShadowView::new(new_root);
    diff_children(
        &parent,
        old_root.shared_children(),
        new_root.shared_children(),
        &mut mutations,
    );
    tracing::trace!(
        target: "canopy.diff",
        root_tag = new_root.tag(),
        mutations = mutations.len(),
        "diff computed"
    );
    mutations
}

fn diff_children(
    parent: &ShadowView,
    old: &SharedShadowNodeList,
    new: &SharedShadowNodeList,
    out: &mut ShadowViewMutationList,
) {
    if Arc::ptr_eq(old, new) {
        return;
    }

    let mut prefix = 0;
    while prefix < old.len() && prefix < new.len() && old[prefix].tag() == new[prefix].tag() {
        diff_retained(parent, &old[prefix], &new[prefix], prefix, out);
        prefix += 1;
    }
    if prefix == old.len() && prefix == new.len() {
        return;
    }

    let old_rest = &old[prefix..];
    let new_rest = &new[prefix..];
    let surviving: FxHashSet<Tag> = new_rest.iter().map(|node| node.tag()).collect();
    let previous: FxHashMap<Tag, &SharedShadowNode> =
        old_rest.iter().map(|node| (node.tag(), node)).collect();

    for (offset, node) in old_rest.iter().enumerate().rev() {
        let view = ShadowView::new(node);
        out.push(ShadowViewMutation::Remove {
            parent: parent.clone(),
            old: view.clone(),
            index: prefix + offset,
        });
        if !surviving.contains(&node.tag()) {
            delete_subtree(node, view, out);
        }
    }

    for (offset, node) in new_rest.iter().enumerate() {
        let index = prefix + offset;
        match previous.get(&node.tag()) {
            None => {
                let view = create_subtree(node, out);
                out.push(ShadowViewMutation::Insert {
                    parent: parent.clone(),
                    new: view,
                    index,
                });
            }
            Some(old_node) => {
                let view = ShadowView::new(node);
                out.push(ShadowViewMutation::Insert {
                    parent: parent.clone(),
                    new: view.clone(),
                    index,
                });
                if !Arc::ptr_eq(old_node, node) {
                    diff_children(&view, old_node.shared_children(), node.shared_children(), out);
                }
            }
        }
    }
}

fn diff_retained(
    parent: &ShadowView,
    old: &SharedShadowNode,
    new: &SharedShadowNode,
    index: usize,
    out: &mut ShadowViewMutationList,
) {
    if Arc::ptr_eq(old, new) {
        return;
    }
    let old_view = ShadowView::new(old);
    let new_view = ShadowView::new(new);
    if old_view != new_view {
        out.push(ShadowViewMutation::Update {
            parent: parent.clone(),
            old: old_view,
            new: new_view.clone(),
            index,
        });
    }
    diff_children(&new_view, old.shared_children(), new.shared_children(), out);
}

fn create_subtree(node: &ShadowNode, out: &mut ShadowViewMutationList) -> ShadowView {
    let view = ShadowView::new(node);
    out.push(ShadowViewMutation::Create { new: view.clone() });
    for (index, child) in node.children().iter().enumerate() {
        let child_view = create_subtree(child, out);
        out.push(ShadowViewMutation::Insert {
            parent: view.clone(),
            new: child_view,
            index,
        });
    }
    view
}

fn delete_subtree(node: &ShadowNode, view: ShadowView, out: &mut ShadowViewMutationList) {
    for (index, child) in node.children().iter().enumerate().rev() {
        let child_view = ShadowView::new(child);
        out.push(ShadowViewMutation::Remove {
            parent: view.clone(),
            old: child_view.clone(),
            index,
        });
        delete_subtree(child, child_view, out);
    }
    out.push(ShadowViewMutation::Delete { old: view });
}
