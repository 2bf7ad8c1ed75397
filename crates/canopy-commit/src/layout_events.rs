#![forbid(unsafe_code)]

//! Post-commit `on_layout` notifications.
//!
//! Insert has no old view, so a moved node (Remove + Insert) is compared
//! against [`LayoutMetrics::EMPTY`] and fires even when its frame is unchanged.

use canopy_core::{LayoutMetrics, ShadowViewMutation, Tag};
use rustc_hash::FxHashSet;

/// Notify layout-capable emitters whose geometry changed in this batch.
///
/// A mutation qualifies when it is a Create, Insert or Update, its new view's
/// emitter can receive layout events, its props ask for them, and its new
/// metrics differ from the old ones ([`LayoutMetrics::EMPTY`] when there is no
/// old view). A tag is notified at most once per batch. Returns the number of
/// notifications sent.
pub(crate) fn emit_layout_events(mutations: &[ShadowViewMutation]) -> usize {
    let _span = tracing::debug_span!(
        "shadow_tree.emit_layout_events",
        mutations = mutations.len()
    )
    .entered();

    let mut notified: FxHashSet<Tag> = FxHashSet::default();
    for mutation in mutations {
        let (old_metrics, new) = match mutation {
            ShadowViewMutation::Create { new } | ShadowViewMutation::Insert { new, .. } => {
                (LayoutMetrics::EMPTY, new)
            }
            ShadowViewMutation::Update { old, new, .. } => (old.layout_metrics, new),
            ShadowViewMutation::Delete { .. } | ShadowViewMutation::Remove { .. } => continue,
        };

        let Some(listener) = new.event_emitter.layout_events() else {
            continue;
        };
        if !new.props.wants_layout_events() {
            continue;
        }
        if old_metrics == new.layout_metrics {
            continue;
        }
        if !notified.insert(new.tag) {
            continue;
        }
        listener.on_layout(&new.layout_metrics);
    }

    if !notified.is_empty() {
        tracing::trace!(target: "canopy.emitter", notified = notified.len(), "layout events emitted");
    }
    notified.len()
}
