#![forbid(unsafe_code)]

//! Mutation ordering for the common tree edits.

use std::sync::Arc;

use canopy_core::{MutationKind, ShadowViewMutation, ViewProps};
use canopy_diff::calculate_shadow_view_mutations;
use canopy_harness::{NodeFactory, mutation_summary, replace_children, replace_props};

use MutationKind::{Create, Delete, Insert, Remove, Update};

#[test]
fn identical_roots_produce_nothing() {
    let factory = NodeFactory::new(1);
    let root = factory.column(1, vec![factory.leaf(2, 10.0, 10.0)]);
    assert!(calculate_shadow_view_mutations(&root, &root).is_empty());

    let clone = replace_children(&root, root.children().to_vec());
    assert!(calculate_shadow_view_mutations(&root, &clone).is_empty());
}

#[test]
fn new_subtree_is_created_before_it_is_inserted() {
    let factory = NodeFactory::new(1);
    let old = factory.column(1, vec![factory.leaf(2, 10.0, 10.0)]);
    let added = factory.column(3, vec![factory.leaf(4, 5.0, 5.0)]);
    let new = replace_children(&old, vec![Arc::clone(&old.children()[0]), added]);

    let mutations = calculate_shadow_view_mutations(&old, &new);
    assert_eq!(
        mutation_summary(&mutations),
        vec![(Create, 3), (Create, 4), (Insert, 4), (Insert, 3)]
    );
    match &mutations[3] {
        ShadowViewMutation::Insert { parent, index, .. } => {
            assert_eq!(parent.tag, 1);
            assert_eq!(*index, 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn removed_subtree_is_detached_then_deleted_bottom_up() {
    let factory = NodeFactory::new(1);
    let old = factory.column(
        1,
        vec![
            factory.leaf(2, 10.0, 10.0),
            factory.column(3, vec![factory.leaf(4, 5.0, 5.0)]),
        ],
    );
    let new = replace_children(&old, vec![Arc::clone(&old.children()[0])]);

    let mutations = calculate_shadow_view_mutations(&old, &new);
    assert_eq!(
        mutation_summary(&mutations),
        vec![(Remove, 3), (Remove, 4), (Delete, 4), (Delete, 3)]
    );
    match &mutations[0] {
        ShadowViewMutation::Remove { parent, index, .. } => {
            assert_eq!(parent.tag, 1);
            assert_eq!(*index, 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn changed_props_in_place_yield_update() {
    let factory = NodeFactory::new(1);
    let old = factory.column(1, vec![factory.leaf(2, 10.0, 10.0)]);
    let edited = replace_props(
        &old.children()[0],
        ViewProps::default().attribute("label", "hello"),
    );
    let new = replace_children(&old, vec![edited]);

    let mutations = calculate_shadow_view_mutations(&old, &new);
    assert_eq!(mutation_summary(&mutations), vec![(Update, 2)]);
    match &mutations[0] {
        ShadowViewMutation::Update {
            parent,
            old: before,
            new: after,
            index,
        } => {
            assert_eq!(parent.tag, 1);
            assert_eq!(*index, 0);
            assert!(before.props.view().attributes.is_empty());
            assert_eq!(after.props.view().attributes.len(), 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn reorder_detaches_in_reverse_and_reattaches_in_order() {
    let factory = NodeFactory::new(1);
    let a = factory.leaf(2, 10.0, 10.0);
    let b = factory.leaf(3, 10.0, 10.0);
    let old = factory.column(1, vec![Arc::clone(&a), Arc::clone(&b)]);
    let new = replace_children(&old, vec![b, a]);

    let mutations = calculate_shadow_view_mutations(&old, &new);
    assert_eq!(
        mutation_summary(&mutations),
        vec![(Remove, 3), (Remove, 2), (Insert, 3), (Insert, 2)]
    );
    let indices: Vec<usize> = mutations
        .iter()
        .map(|m| match m {
            ShadowViewMutation::Remove { index, .. } | ShadowViewMutation::Insert { index, .. } => {
                *index
            }
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(indices, vec![1, 0, 0, 1]);
}

#[test]
fn moved_node_has_its_children_diffed() {
    let factory = NodeFactory::new(1);
    let leaf = factory.leaf(2, 10.0, 10.0);
    let inner = factory.column(3, vec![factory.leaf(4, 5.0, 5.0)]);
    let old = factory.column(1, vec![Arc::clone(&leaf), Arc::clone(&inner)]);

    let grown = replace_children(
        &inner,
        vec![Arc::clone(&inner.children()[0]), factory.leaf(5, 5.0, 5.0)],
    );
    let new = replace_children(&old, vec![grown, leaf]);

    let mutations = calculate_shadow_view_mutations(&old, &new);
    assert_eq!(
        mutation_summary(&mutations),
        vec![
            (Remove, 3),
            (Remove, 2),
            (Insert, 3),
            (Create, 5),
            (Insert, 5),
            (Insert, 2),
        ]
    );
    assert_eq!(mutations[4].parent_view().map(|p| p.tag), Some(3));
}

#[test]
fn shared_subtrees_are_not_visited() {
    let factory = NodeFactory::new(1);
    let big = factory.column(
        2,
        (10..20).map(|tag| factory.leaf(tag, 1.0, 1.0)).collect(),
    );
    let small = factory.leaf(3, 10.0, 10.0);
    let old = factory.column(1, vec![Arc::clone(&big), Arc::clone(&small)]);
    let new = replace_children(
        &old,
        vec![big, replace_props(&small, ViewProps::default())],
    );

    let mutations = calculate_shadow_view_mutations(&old, &new);
    assert_eq!(mutation_summary(&mutations), vec![(Update, 3)]);
}

#[test]
fn nested_edit_reports_only_the_changed_leaf() {
    let factory = NodeFactory::new(1);
    let inner = factory.column(2, vec![factory.leaf(3, 1.0, 1.0), factory.leaf(4, 1.0, 1.0)]);
    let old = factory.column(1, vec![Arc::clone(&inner)]);

    let edited_leaf = replace_props(&inner.children()[1], ViewProps::default());
    let edited_inner = replace_children(
        &inner,
        vec![Arc::clone(&inner.children()[0]), edited_leaf],
    );
    let new = replace_children(&old, vec![edited_inner]);

    let mutations = calculate_shadow_view_mutations(&old, &new);
    // Tag 2 keeps its props, emitter and metrics, so only the leaf changes.
    assert_eq!(mutation_summary(&mutations), vec![(Update, 4)]);
    assert_eq!(mutations[0].parent_view().map(|p| p.tag), Some(2));
}
