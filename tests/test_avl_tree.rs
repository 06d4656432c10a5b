extern crate avl_collections;
extern crate rand;

use avl_collections::avl_tree::{AvlTree, Config, Error, Natural, NodeRef};
use rand::Rng;
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 2_000;

// Checks order, balance, cached heights, sizes and parent links of every node.
fn check_subtree(node: NodeRef<u32, Natural>, balanced: bool) -> (usize, usize) {
    let mut height = 0;
    let mut size = 1;
    let mut child_heights = [-1i32; 2];

    for (slot, child) in [node.left(), node.right()].iter().enumerate() {
        if let Some(child) = child {
            assert_eq!(child.parent(), Some(node));
            if slot == 0 {
                assert!(child.is_left_child());
                assert!(child.find_max().key() < node.key());
            } else {
                assert!(child.is_right_child());
                assert!(child.find_min().key() > node.key());
            }
            let (child_height, child_size) = check_subtree(*child, balanced);
            height = height.max(child_height + 1);
            size += child_size;
            child_heights[slot] = child_height as i32;
        }
    }

    assert_eq!(node.height(), height);
    assert_eq!(node.balance_factor(), child_heights[0] - child_heights[1]);
    if balanced {
        assert!(node.balance_factor().abs() <= 1);
    }
    assert_eq!(node.size(), size);
    (height, size)
}

fn check_tree(tree: &AvlTree<u32>, balanced: bool) {
    match tree.root() {
        None => {
            assert!(tree.is_empty());
            assert_eq!(tree.len(), 0);
        },
        Some(root) => {
            assert!(root.is_root());
            let (height, size) = check_subtree(root, balanced);
            assert_eq!(size, tree.len());
            if balanced {
                let bound = (1.44 * ((size + 2) as f64).log2()).ceil() as usize;
                assert!(height <= bound, "height {} exceeds {}", height, bound);
            }
        },
    }
}

fn keys<C>(tree: &AvlTree<u32, C>) -> Vec<u32> {
    tree.iter().cloned().collect()
}

fn children<C>(node: NodeRef<u32, C>) -> (Option<u32>, Option<u32>) {
    (
        node.left().map(|child| *child.key()),
        node.right().map(|child| *child.key()),
    )
}

#[test]
fn scenario_single_left_rotation() {
    let mut tree = AvlTree::new();
    tree.extend(vec![10, 20, 30]);
    let root = tree.root().unwrap();
    assert_eq!(root.key(), &20);
    assert_eq!(children(root), (Some(10), Some(30)));
    check_tree(&tree, true);
}

#[test]
fn scenario_single_right_rotation() {
    let mut tree = AvlTree::new();
    tree.extend(vec![30, 20, 10]);
    let root = tree.root().unwrap();
    assert_eq!(root.key(), &20);
    assert_eq!(children(root), (Some(10), Some(30)));
    check_tree(&tree, true);
}

#[test]
fn scenario_left_right_rotation() {
    let mut tree = AvlTree::new();
    tree.extend(vec![30, 10, 20]);
    let root = tree.root().unwrap();
    assert_eq!(root.key(), &20);
    assert_eq!(children(root), (Some(10), Some(30)));
    check_tree(&tree, true);
}

#[test]
fn scenario_right_left_rotation() {
    let mut tree = AvlTree::new();
    tree.extend(vec![10, 30, 20]);
    let root = tree.root().unwrap();
    assert_eq!(root.key(), &20);
    assert_eq!(children(root), (Some(10), Some(30)));
}

#[test]
fn scenario_delete_two_children() {
    let mut tree = AvlTree::new();
    tree.extend(vec![10, 20, 30, 40, 50, 25]);
    assert_eq!(tree.root().unwrap().key(), &30);

    let forty = tree.find(&40).unwrap();
    let root = tree.delete(&30).unwrap();
    assert_eq!(root, Some(forty));
    assert_eq!(keys(&tree), vec![10, 20, 25, 40, 50]);
    assert_eq!(tree.postorder(), "1025205040");
    check_tree(&tree, true);
}

#[test]
fn scenario_search_missing() {
    let mut tree = AvlTree::new();
    assert!(tree.search(&99).is_none());
    assert_eq!(tree.find(&99), Err(Error::NotFound));

    tree.extend(vec![1, 2, 3]);
    assert!(tree.search(&99).is_none());
    assert_eq!(tree.find(&99), Err(Error::NotFound));
    assert_eq!(tree.root().unwrap().find(&99).unwrap_err(), Error::NotFound);
}

#[test]
fn delete_missing_leaves_tree_unchanged() {
    let mut tree = AvlTree::new();
    tree.extend(vec![5, 3, 8, 1]);
    let before = tree.postorder();
    assert_eq!(tree.delete(&4), Err(Error::NotFound));
    assert_eq!(tree.postorder(), before);
    assert_eq!(tree.len(), 4);
}

#[test]
fn successor_handle_survives_relocation() {
    let mut tree = AvlTree::new();
    tree.extend(vec![4, 2, 8, 1, 3, 6, 10, 7, 11]);
    let six = tree.find(&6).unwrap();
    let four = tree.find(&4).unwrap();

    tree.delete(&4).unwrap();
    assert!(tree.node(four).is_none());

    let moved = tree.node(six).unwrap();
    assert!(moved.is_root());
    assert_eq!(children(moved), (Some(2), Some(8)));
    assert_eq!(tree.search(&7).unwrap().parent().unwrap().key(), &8);
    check_tree(&tree, true);
}

#[test]
fn sequential_inserts_stay_balanced() {
    let mut tree = AvlTree::new();
    for key in 0..1024 {
        tree.insert(key).unwrap();
    }
    check_tree(&tree, true);
    assert_eq!(tree.height(), 10);
    assert_eq!(keys(&tree), (0..1024).collect::<Vec<u32>>());
}

#[test]
fn rotations_preserve_in_order_sequence() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([3, 1, 4, 1]);
    let mut tree = AvlTree::new();
    for _ in 0..200 {
        let _ = tree.insert(rng.gen_range(0, 1000));
    }
    let expected = keys(&tree);

    for _ in 0..200 {
        let key = expected[rng.gen_range(0, expected.len())];
        let id = tree.find(&key).unwrap();
        let _ = if rng.gen() {
            tree.rotate_left(id)
        } else {
            tree.rotate_right(id)
        };
        assert_eq!(keys(&tree), expected);
        check_tree(&tree, false);
    }
}

#[test]
fn int_test_avl_tree() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut tree = AvlTree::new();
    let mut expected = BTreeSet::new();

    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.gen_range(0, 500);
        let inserted = expected.insert(key);
        assert_eq!(tree.insert(key).is_ok(), inserted);
        check_tree(&tree, true);
    }

    assert_eq!(tree.len(), expected.len());
    assert_eq!(keys(&tree), expected.iter().cloned().collect::<Vec<u32>>());

    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.gen_range(0, 500);
        let len = tree.len();
        if expected.remove(&key) {
            tree.delete(&key).unwrap();
            assert_eq!(tree.len(), len - 1);
            assert!(!tree.contains(&key));
        } else {
            assert_eq!(tree.delete(&key), Err(Error::NotFound));
            assert_eq!(tree.len(), len);
        }
        check_tree(&tree, true);
    }

    assert_eq!(keys(&tree), expected.into_iter().collect::<Vec<u32>>());
}

#[test]
fn int_test_without_delete_rebalancing() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([2, 7, 1, 8]);
    let config = Config {
        chunk_size: 16,
        rebalance_on_delete: false,
    };
    let mut tree = AvlTree::with_config(config);
    let mut expected = BTreeSet::new();

    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.gen_range(0, 300);
        if rng.gen_weighted_bool(3) {
            assert_eq!(tree.delete(&key).is_ok(), expected.remove(&key));
        } else {
            assert_eq!(tree.insert(key).is_ok(), expected.insert(key));
        }
        check_tree(&tree, false);
        assert_eq!(keys(&tree), expected.iter().cloned().collect::<Vec<u32>>());
    }
}

#[test]
fn level_order_reports_depths() {
    let mut tree = AvlTree::new();
    tree.extend(0..7);
    let levels = tree.level_order().collect::<Vec<(usize, &u32)>>();
    assert_eq!(
        levels,
        vec![(0, &3), (1, &1), (1, &5), (2, &0), (2, &2), (2, &4), (2, &6)],
    );
    for (depth, key) in levels {
        assert_eq!(tree.search(key).unwrap().depth(), depth);
    }
}

#[test]
fn custom_comparator() {
    let mut tree = AvlTree::with_comparator(|a: &u32, b: &u32| b.cmp(a));
    tree.extend(vec![1, 5, 3, 2, 4]);
    assert_eq!(keys(&tree), vec![5, 4, 3, 2, 1]);
    assert_eq!(tree.floor(&0), Some(&1));
    assert_eq!(tree.ceil(&6), Some(&5));
    assert_eq!(tree.insert(3), Err(Error::DuplicateKey));
    assert_eq!(tree.len(), 5);
}
