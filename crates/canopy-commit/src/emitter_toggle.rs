#![forbid(unsafe_code)]

//! Emitter enablement driven by a committed mutation list.

use canopy_core::ShadowViewMutation;
use canopy_core::event_emitter::dispatch_lock;

/// Enable every created emitter, then disable every deleted one.
///
/// Both passes run under the process-wide dispatch lock, so no event is
/// delivered while the batch is half applied. Enablement is counted: a
/// mounted node that moves to another parent is deleted and created in the
/// same batch and stays enabled, while a fresh node created and deleted in
/// one batch ends up disabled.
pub(crate) fn toggle_event_emitters(mutations: &[ShadowViewMutation]) {
    let _span = tracing::debug_span!(
        "shadow_tree.toggle_event_emitters",
        mutations = mutations.len()
    )
    .entered();
    let _domain = dispatch_lock();

    let mut enabled = 0_usize;
    for mutation in mutations {
        if let ShadowViewMutation::Create { new } = mutation {
            new.event_emitter.enable();
            enabled += 1;
        }
    }

    let mut disabled = 0_usize;
    for mutation in mutations {
        if let ShadowViewMutation::Delete { old } = mutation {
            old.event_emitter.disable();
            disabled += 1;
        }
    }

    tracing::trace!(target: "canopy.emitter", enabled, disabled, "event emitters toggled");
}
