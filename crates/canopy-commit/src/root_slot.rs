#![forbid(unsafe_code)]

//! The slot holding a surface's current root.
//!
//! | Operation | Cost |
//! |-----------|------|
//! | [`RootSlot::load`] | wait-free (`arc-swap`) |
//! | [`RootSlot::compare_and_install`] | gate + pointer compare + atomic swap |
//!
//! Reads never take the gate, so a reader always sees either the previous
//! snapshot or the next one, never a half-installed tree. Writers serialize on
//! a reentrant gate so a commit can run from inside [`RootSlot::synchronize`]
//! on the same thread.

use std::sync::Arc;

use arc_swap::ArcSwap;
use canopy_core::{RootShadowNode, SharedRootShadowNode};
use parking_lot::ReentrantMutex;

/// Current root plus the write gate.
pub struct RootSlot {
    current: ArcSwap<RootShadowNode>,
    gate: ReentrantMutex<()>,
}

impl RootSlot {
    pub fn new(root: SharedRootShadowNode) -> Self {
        Self {
            current: ArcSwap::new(root),
            gate: ReentrantMutex::new(()),
        }
    }

    /// Current root. Wait-free.
    #[inline]
    pub fn load(&self) -> SharedRootShadowNode {
        self.current.load_full()
    }

    /// Run `f` while holding the write gate.
    pub fn synchronize<R>(&self, f: impl FnOnce() -> R) -> R {
        let _gate = self.gate.lock();
        f()
    }

    /// Install `candidate` if the slot still holds `base` (by identity).
    ///
    /// `on_install` runs after the swap with the gate still held. Returns
    /// whether the candidate was installed; on `false` nothing was touched.
    pub fn compare_and_install(
        &self,
        base: &SharedRootShadowNode,
        candidate: SharedRootShadowNode,
        on_install: impl FnOnce(),
    ) -> bool {
        let _gate = self.gate.lock();
        let current = self.current.load();
        if !Arc::ptr_eq(&*current, base) {
            return false;
        }
        drop(current);
        self.current.store(candidate);
        on_install();
        true
    }
}

impl std::fmt::Debug for RootSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootSlot")
            .field("current", &self.current.load().tag())
            .finish()
    }
}
