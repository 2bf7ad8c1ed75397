#![forbid(unsafe_code)]

//! End-to-end tests for the commit paths of a single surface.

use std::sync::Arc;

use canopy_commit::{ShadowTree, ShadowTreeDelegate};
use canopy_core::{
    Dimension, LayoutConstraints, LayoutContext, MutationKind, PropValue, ShadowViewMutation, Size,
    Style, Tag, ViewProps,
};
use canopy_harness::{NodeFactory, mutation_summary, replace_children, replace_props};
use parking_lot::Mutex;

use MutationKind::{Create, Delete, Insert, Remove, Update};

const SURFACE: i32 = 1;

fn surface() -> (ShadowTree, NodeFactory) {
    let tree = ShadowTree::new(
        SURFACE,
        LayoutConstraints::exact(Size::new(100.0, 100.0)),
        LayoutContext::default(),
    );
    (tree, NodeFactory::new(SURFACE))
}

fn child_tags(tree: &ShadowTree) -> Vec<Tag> {
    tree.root_shadow_node()
        .children()
        .iter()
        .map(|child| child.tag())
        .collect()
}

#[derive(Default)]
struct RecordingDelegate {
    commits: Mutex<Vec<Vec<(MutationKind, Tag)>>>,
}

impl RecordingDelegate {
    fn commits(&self) -> Vec<Vec<(MutationKind, Tag)>> {
        self.commits.lock().clone()
    }
}

impl ShadowTreeDelegate for RecordingDelegate {
    fn shadow_tree_did_commit(&self, _tree: &ShadowTree, mutations: &[ShadowViewMutation]) {
        self.commits.lock().push(mutation_summary(mutations));
    }
}

// ---------------------------------------------------------------------------
// Sequencing
// ---------------------------------------------------------------------------

#[test]
fn sequential_commits_expose_the_latest_candidate() {
    let (tree, factory) = surface();
    let mut previous = tree.root_shadow_node();

    for round in 0..5 {
        let tag = 10 + round;
        assert!(tree.complete_with_children(Arc::new(vec![factory.leaf(tag, 10.0, 10.0)])));

        let current = tree.root_shadow_node();
        assert!(!Arc::ptr_eq(&current, &previous), "round {round} installed nothing");
        assert_eq!(child_tags(&tree), vec![tag]);
        previous = current;
    }
    assert_eq!(tree.stats().committed, 5);
}

#[test]
fn stale_base_is_rejected_without_side_effects() {
    let (tree, factory) = surface();
    let delegate = Arc::new(RecordingDelegate::default());
    tree.set_delegate(delegate.clone());

    let base = tree.root_shadow_node();
    assert!(tree.complete_with_children(Arc::new(vec![factory.leaf(2, 10.0, 10.0)])));
    let winner = tree.root_shadow_node();
    factory.journal().clear();

    let late = base.clone_with_children(Arc::new(vec![factory.leaf(3, 10.0, 10.0)]));
    assert!(!tree.complete(&base, late));

    assert!(Arc::ptr_eq(&tree.root_shadow_node(), &winner));
    assert!(factory.journal().entries().is_empty(), "loser must not toggle or notify");
    assert_eq!(delegate.commits().len(), 1, "delegate sees successes only");
}

#[test]
fn delegate_receives_each_commit_once() {
    let (tree, factory) = surface();
    let delegate = Arc::new(RecordingDelegate::default());
    tree.set_delegate(delegate.clone());
    assert!(tree.delegate().is_some());

    assert!(tree.complete_with_children(Arc::new(vec![factory.leaf(2, 10.0, 10.0)])));
    assert!(tree.complete_with_children(Arc::new(vec![])));

    assert_eq!(
        delegate.commits(),
        vec![
            vec![(Create, 2), (Insert, 2)],
            vec![(Remove, 2), (Delete, 2)],
        ]
    );

    tree.clear_delegate();
    assert!(tree.complete_with_children(Arc::new(vec![factory.leaf(3, 10.0, 10.0)])));
    assert_eq!(delegate.commits().len(), 2);
}

// ---------------------------------------------------------------------------
// Partial replacement
// ---------------------------------------------------------------------------

#[test]
fn replacing_middle_child_shares_siblings() {
    let (tree, factory) = surface();
    assert!(tree.complete_with_children(Arc::new(vec![
        factory.leaf(2, 100.0, 10.0),
        factory.leaf(3, 100.0, 10.0),
        factory.leaf(4, 100.0, 10.0),
    ])));
    let root = tree.root_shadow_node();
    let (a, b, c) = (
        Arc::clone(&root.children()[0]),
        Arc::clone(&root.children()[1]),
        Arc::clone(&root.children()[2]),
    );

    let delegate = Arc::new(RecordingDelegate::default());
    tree.set_delegate(delegate.clone());

    let b_prime = replace_props(
        &b,
        ViewProps::with_style(Style::fixed(100.0, 10.0))
            .on_layout(true)
            .attribute("label", "b'"),
    );
    assert!(tree.complete_by_replacing_shadow_node(&b, Arc::clone(&b_prime)));

    let next = tree.root_shadow_node();
    assert_eq!(child_tags(&tree), vec![2, 3, 4]);
    assert!(Arc::ptr_eq(&next.children()[0], &a));
    assert!(Arc::ptr_eq(&next.children()[1], &b_prime));
    assert!(Arc::ptr_eq(&next.children()[2], &c));
    assert!(b_prime.is_sealed());
    assert_eq!(delegate.commits(), vec![vec![(Update, 3)]]);
}

#[test]
fn deep_replacement_clones_only_the_ancestor_chain() {
    let (tree, factory) = surface();
    assert!(tree.complete_with_children(Arc::new(vec![
        factory.column(
            2,
            vec![factory.column(
                3,
                vec![factory.leaf(4, 10.0, 10.0), factory.leaf(5, 10.0, 10.0)],
            )],
        ),
        factory.leaf(6, 10.0, 10.0),
    ])));

    let before = tree.root_shadow_node();
    let outer = Arc::clone(&before.children()[0]);
    let sibling = Arc::clone(&before.children()[1]);
    let inner = Arc::clone(&outer.children()[0]);
    let kept_leaf = Arc::clone(&inner.children()[0]);
    let target = Arc::clone(&inner.children()[1]);

    let edited = replace_props(
        &target,
        ViewProps::with_style(Style::fixed(10.0, 10.0))
            .on_layout(true)
            .attribute("pressed", true),
    );
    assert!(tree.complete_by_replacing_shadow_node(&target, edited));

    let after = tree.root_shadow_node();
    let new_outer = &after.children()[0];
    let new_inner = &new_outer.children()[0];

    assert!(!Arc::ptr_eq(new_outer, &outer));
    assert!(!Arc::ptr_eq(new_inner, &inner));
    assert!(Arc::ptr_eq(&after.children()[1], &sibling));
    assert!(Arc::ptr_eq(&new_inner.children()[0], &kept_leaf));
    assert!(Arc::ptr_eq(new_outer.props(), outer.props()));
    assert!(Arc::ptr_eq(new_outer.event_emitter(), outer.event_emitter()));
    assert_eq!(
        new_inner.children()[1].props().view().attributes.get("pressed"),
        Some(&PropValue::Bool(true))
    );

    // The old snapshot is untouched.
    assert!(Arc::ptr_eq(&inner.children()[1], &target));
}

#[test]
fn replacing_an_absent_node_is_refused() {
    let (tree, factory) = surface();
    assert!(tree.complete_with_children(Arc::new(vec![factory.leaf(2, 10.0, 10.0)])));
    let before = tree.root_shadow_node();

    let stranger = factory.leaf(9, 10.0, 10.0);
    assert!(!tree.complete_by_replacing_shadow_node(&stranger, factory.leaf(9, 20.0, 20.0)));
    assert!(Arc::ptr_eq(&tree.root_shadow_node(), &before));

    // A lookalike with the same tag is not the committed node either.
    let committed = Arc::clone(&before.children()[0]);
    let lookalike = replace_children(&committed, Vec::new());
    assert!(!tree.complete_by_replacing_shadow_node(&lookalike, factory.leaf(2, 5.0, 5.0)));
    assert!(Arc::ptr_eq(&tree.root_shadow_node(), &before));
}

#[test]
fn superseded_node_cannot_be_replaced_again() {
    let (tree, factory) = surface();
    assert!(tree.complete_with_children(Arc::new(vec![factory.leaf(2, 10.0, 10.0)])));
    let original = Arc::clone(&tree.root_shadow_node().children()[0]);

    let first = replace_props(&original, ViewProps::with_style(Style::fixed(20.0, 10.0)));
    assert!(tree.complete_by_replacing_shadow_node(&original, first));

    let second = replace_props(&original, ViewProps::with_style(Style::fixed(30.0, 10.0)));
    assert!(!tree.complete_by_replacing_shadow_node(&original, second));
    assert_eq!(
        tree.root_shadow_node().children()[0].layout_metrics().frame.size,
        Size::new(20.0, 10.0)
    );
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn measure_does_not_commit() {
    let (tree, factory) = surface();
    assert!(tree.complete_with_children(Arc::new(vec![factory.leaf(2, 10.0, 10.0)])));
    let before = tree.root_shadow_node();
    let stats = tree.stats();

    let size = tree.measure(
        LayoutConstraints::exact(Size::new(320.0, 480.0)),
        LayoutContext::default(),
    );

    assert_eq!(size, Size::new(320.0, 480.0));
    assert!(Arc::ptr_eq(&tree.root_shadow_node(), &before));
    assert_eq!(tree.stats(), stats);
}

#[test]
fn constraint_layout_restretches_auto_children() {
    let (tree, factory) = surface();
    let banner = factory.view(
        2,
        ViewProps::with_style(Style {
            height: Dimension::Points(20.0),
            ..Style::default()
        })
        .on_layout(true),
        Vec::new(),
    );
    assert!(tree.complete_with_children(Arc::new(vec![banner])));
    assert_eq!(
        tree.root_shadow_node().children()[0].layout_metrics().frame.size,
        Size::new(100.0, 20.0)
    );

    let delegate = Arc::new(RecordingDelegate::default());
    tree.set_delegate(delegate.clone());
    assert!(tree.constraint_layout(
        LayoutConstraints::exact(Size::new(250.0, 100.0)),
        LayoutContext::default(),
    ));

    assert_eq!(
        tree.root_shadow_node().children()[0].layout_metrics().frame.size,
        Size::new(250.0, 20.0)
    );
    assert_eq!(delegate.commits(), vec![vec![(Update, 2)]]);
}

// ---------------------------------------------------------------------------
// Teardown and reentrancy
// ---------------------------------------------------------------------------

#[test]
fn teardown_twice_disables_each_emitter_once() {
    let (tree, factory) = surface();
    assert!(tree.complete_with_children(Arc::new(vec![
        factory.column(2, vec![factory.leaf(3, 10.0, 10.0)]),
        factory.leaf(4, 10.0, 10.0),
    ])));

    assert!(tree.teardown());
    assert!(tree.teardown());

    let mut disabled = factory.journal().disabled();
    disabled.sort_unstable();
    assert_eq!(disabled, vec![2, 3, 4]);
    assert!(tree.root_shadow_node().children().is_empty());
}

#[test]
fn drop_tears_the_tree_down() {
    let factory = NodeFactory::new(SURFACE);
    {
        let tree = ShadowTree::new(SURFACE, LayoutConstraints::default(), LayoutContext::default());
        assert!(tree.complete_with_children(Arc::new(vec![
            factory.leaf(2, 10.0, 10.0),
            factory.leaf(3, 10.0, 10.0),
        ])));
    }
    let mut disabled = factory.journal().disabled();
    disabled.sort_unstable();
    assert_eq!(disabled, vec![2, 3]);
}

#[test]
fn synchronize_allows_commits_on_the_same_thread() {
    let (tree, factory) = surface();
    let committed = tree.synchronize(|| {
        let base = tree.root_shadow_node();
        tree.complete(&base, base.clone_with_children(Arc::new(vec![factory.leaf(2, 1.0, 1.0)])))
    });
    assert!(committed);
    assert_eq!(child_tags(&tree), vec![2]);
}

struct ClearOnFirstCommit {
    seen: Mutex<usize>,
}

impl ShadowTreeDelegate for ClearOnFirstCommit {
    fn shadow_tree_did_commit(&self, tree: &ShadowTree, _mutations: &[ShadowViewMutation]) {
        let first = {
            let mut seen = self.seen.lock();
            *seen += 1;
            *seen == 1
        };
        if first {
            assert!(tree.complete_with_children(Arc::new(Vec::new())));
        }
    }
}

#[test]
fn delegate_may_commit_from_its_callback() {
    let (tree, factory) = surface();
    let delegate = Arc::new(ClearOnFirstCommit {
        seen: Mutex::new(0),
    });
    tree.set_delegate(delegate.clone());

    assert!(tree.complete_with_children(Arc::new(vec![factory.leaf(2, 1.0, 1.0)])));
    assert!(tree.root_shadow_node().children().is_empty());
    assert_eq!(*delegate.seen.lock(), 2);
    assert_eq!(factory.journal().disabled(), vec![2]);
}
