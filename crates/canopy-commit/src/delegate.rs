#![forbid(unsafe_code)]

//! Commit observer.

use canopy_core::ShadowViewMutation;

use crate::shadow_tree::ShadowTree;

/// Receives every successful commit of a [`ShadowTree`], typically the
/// mounting layer.
///
/// Called synchronously on the committing thread after the new root is
/// installed and the root-slot gate is released; the delegate may read the
/// tree or start another commit.
pub trait ShadowTreeDelegate: Send + Sync {
    fn shadow_tree_did_commit(&self, shadow_tree: &ShadowTree, mutations: &[ShadowViewMutation]);
}
