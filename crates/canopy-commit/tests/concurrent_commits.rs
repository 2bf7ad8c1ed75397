#![forbid(unsafe_code)]

//! Commits racing from several threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use canopy_commit::ShadowTree;
use canopy_core::{LayoutConstraints, LayoutContext, ShadowNode, Size, Tag};
use canopy_harness::NodeFactory;

const SURFACE: i32 = 1;

fn tree() -> Arc<ShadowTree> {
    Arc::new(ShadowTree::new(
        SURFACE,
        LayoutConstraints::exact(Size::new(200.0, 2000.0)),
        LayoutContext::default(),
    ))
}

fn fully_sealed(node: &ShadowNode) -> bool {
    node.is_sealed() && node.children().iter().all(|child| fully_sealed(child))
}

#[test]
fn same_base_has_exactly_one_winner() {
    const THREADS: usize = 8;
    let tree = tree();
    let factory = NodeFactory::new(SURFACE);
    let base = tree.root_shadow_node();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let tree = Arc::clone(&tree);
            let base = Arc::clone(&base);
            let barrier = Arc::clone(&barrier);
            let tag = 100 + i as Tag;
            let candidate = base.clone_with_children(Arc::new(vec![factory.leaf(tag, 10.0, 10.0)]));
            thread::spawn(move || {
                barrier.wait();
                tree.complete(&base, candidate).then_some(tag)
            })
        })
        .collect();

    let winners: Vec<Tag> = handles
        .into_iter()
        .filter_map(|h| h.join().expect("committer panicked"))
        .collect();

    assert_eq!(winners.len(), 1, "winners: {winners:?}");
    let root = tree.root_shadow_node();
    assert_eq!(root.children().len(), 1);
    assert_eq!(root.children()[0].tag(), winners[0]);
    assert_eq!(factory.journal().enabled(), winners, "losers must not enable emitters");

    let stats = tree.stats();
    assert_eq!(stats.attempted, THREADS as u64);
    assert_eq!(stats.committed, 1);
    assert_eq!(stats.rejected, THREADS as u64 - 1);
}

#[test]
fn retrying_producers_all_land_and_readers_see_whole_snapshots() {
    const WRITERS: usize = 6;
    const PER_WRITER: usize = 10;
    let tree = tree();
    let factory = NodeFactory::new(SURFACE);
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let tree = Arc::clone(&tree);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut observed = 0_usize;
            while !done.load(Ordering::Acquire) {
                let root = tree.root_shadow_node();
                assert!(fully_sealed(root.as_node()), "reader saw an unsealed snapshot");
                observed = observed.max(root.children().len());
            }
            observed
        })
    };

    let writers: Vec<_> = (0..WRITERS)
        .map(|w| {
            let tree = Arc::clone(&tree);
            let factory = factory.clone();
            thread::spawn(move || {
                for n in 0..PER_WRITER {
                    let tag = 1000 + (w * PER_WRITER + n) as Tag;
                    let leaf = factory.leaf(tag, 10.0, 10.0);
                    loop {
                        let base = tree.root_shadow_node();
                        let mut children = base.children().to_vec();
                        children.push(Arc::clone(&leaf));
                        if tree.complete(&base, base.clone_with_children(Arc::new(children))) {
                            break;
                        }
                    }
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().expect("writer panicked");
    }
    done.store(true, Ordering::Release);
    let observed = reader.join().expect("reader panicked");
    assert!(observed <= WRITERS * PER_WRITER);

    let root = tree.root_shadow_node();
    let mut tags: Vec<Tag> = root.children().iter().map(|c| c.tag()).collect();
    tags.sort_unstable();
    let expected: Vec<Tag> = (0..WRITERS * PER_WRITER).map(|i| 1000 + i as Tag).collect();
    assert_eq!(tags, expected);

    let mut enabled = factory.journal().enabled();
    enabled.sort_unstable();
    assert_eq!(enabled, expected, "each emitter enabled exactly once");
    assert!(factory.journal().disabled().is_empty());

    let stats = tree.stats();
    assert_eq!(stats.committed, (WRITERS * PER_WRITER) as u64);
    assert_eq!(stats.attempted, stats.committed + stats.rejected);
}

#[test]
fn racing_replacements_of_one_node_have_one_winner() {
    const THREADS: usize = 4;
    let tree = tree();
    let factory = NodeFactory::new(SURFACE);
    assert!(tree.complete_with_children(Arc::new(vec![factory.leaf(2, 10.0, 10.0)])));
    let target = Arc::clone(&tree.root_shadow_node().children()[0]);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let tree = Arc::clone(&tree);
            let target = Arc::clone(&target);
            let barrier = Arc::clone(&barrier);
            let replacement = canopy_harness::replace_props(
                &target,
                canopy_core::ViewProps::with_style(canopy_core::Style::fixed(
                    20.0 + i as f32,
                    10.0,
                )),
            );
            thread::spawn(move || {
                barrier.wait();
                tree.complete_by_replacing_shadow_node(&target, replacement)
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().expect("replacer panicked"))
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);
}
