use glam::Vec3;
use crate::error::Error;
use crate::math::AABB;
use super::*;

fn make_aabb(min: [f32; 3], max: [f32; 3]) -> AABB {
    AABB::new(Vec3::from(min), Vec3::from(max))
}

fn cube(corner: f32, size: f32) -> AABB {
    AABB::new(Vec3::splat(corner), Vec3::splat(corner + size))
}

/// Unit cubes on an n×n×n lattice with spacing 2.
fn lattice(n: u32) -> Vec<(u32, AABB)> {
    let mut out = Vec::new();
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                let min = Vec3::new(x as f32, y as f32, z as f32) * 2.0;
                out.push((out.len() as u32, AABB::new(min, min + Vec3::ONE)));
            }
        }
    }
    out
}

/// Union of every item AABB at or beneath `node`.
fn subtree_bounds<T>(node: &Node<T>) -> AABB {
    let mut bounds = AABB::EMPTY;
    for item in node.items() {
        bounds.expand(item.aabb());
    }
    for child in node.children() {
        bounds.expand(&subtree_bounds(child));
    }
    bounds
}

/// payload → AABB of the node holding it
fn placement(tree: &Tree<u32>) -> Vec<(u32, [f32; 6])> {
    let mut out: Vec<(u32, [f32; 6])> = tree
        .nodes()
        .unwrap()
        .flat_map(|node| node.items().iter().map(move |item| (*item.payload(), node.aabb().to_array())))
        .collect();
    out.sort_by_key(|(payload, _)| *payload);
    out
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_tree_is_empty() {
    let tree: Tree<u32> = Tree::default();
    assert!(tree.root().unwrap().is_none());
    assert!(tree.is_empty());
    assert_eq!(tree.config().max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(tree.stats(), TreeStats::default());
}

#[test]
fn test_tree_ids_are_unique() {
    let a: Tree<u32> = Tree::default();
    let b: Tree<u32> = Tree::default();
    assert_ne!(a.id(), b.id());

    // A rebuild keeps the identity
    let mut c = Tree::default();
    let id = c.id();
    c.build(lattice(2)).unwrap();
    assert_eq!(c.id(), id);
}

#[test]
fn test_build_root_is_union_of_items() {
    let mut tree = Tree::default();
    tree.build(vec![
        (1u32, make_aabb([0.0, 0.0, 0.0], [1.0, 1.0, 1.0])),
        (2u32, make_aabb([5.0, -2.0, 3.0], [6.0, 0.0, 4.0])),
    ]).unwrap();

    let root = tree.root().unwrap().unwrap();
    assert_eq!(*root.aabb(), make_aabb([0.0, -2.0, 0.0], [6.0, 1.0, 4.0]));
    assert_eq!(root.index(), NodeIndex(0));
    assert_eq!(root.depth(), 0);
    assert_eq!(tree.item_count(), 2);
}

#[test]
fn test_build_empty_input_has_no_root() {
    let mut tree: Tree<u32> = Tree::default();
    tree.build(Vec::new()).unwrap();
    assert!(tree.root().unwrap().is_none());
}

#[test]
fn test_item_indices_are_sequential() {
    let mut tree = Tree::default();
    tree.build(lattice(2)).unwrap();
    let mut indices: Vec<u32> = tree
        .nodes()
        .unwrap()
        .flat_map(|n| n.items().iter().map(|i| i.index().0))
        .collect();
    indices.sort();
    assert_eq!(indices, (0..8).collect::<Vec<_>>());
}

#[test]
fn test_rebuild_resets_indices_and_bumps_generation() {
    let mut tree = Tree::default();
    tree.build(lattice(2)).unwrap();
    let first = tree.generation();
    let nodes = tree.node_count();

    tree.build(lattice(2)).unwrap();
    assert!(tree.generation() > first);
    assert_eq!(tree.item_count(), 8);
    assert_eq!(tree.node_count(), nodes);
}

// ============================================================================
// Splitting rule
// ============================================================================

#[test]
fn test_split_on_longest_axis_midpoint() {
    let mut tree = Tree::default();
    // Root is 10 long on y, 2 on x and z
    tree.build_with_bounds(
        make_aabb([0.0, 0.0, 0.0], [2.0, 10.0, 2.0]),
        vec![
            (1u32, make_aabb([0.5, 1.0, 0.5], [1.0, 2.0, 1.0])),
            (2u32, make_aabb([0.5, 8.0, 0.5], [1.0, 9.0, 1.0])),
        ],
    ).unwrap();

    let root = tree.root().unwrap().unwrap();
    let left = root.left().unwrap();
    let right = root.right().unwrap();
    assert_eq!(*left.aabb(), make_aabb([0.0, 0.0, 0.0], [2.0, 5.0, 2.0]));
    assert_eq!(*right.aabb(), make_aabb([0.0, 5.0, 0.0], [2.0, 10.0, 2.0]));
    assert!(root.items().is_empty());
}

#[test]
fn test_only_the_needed_child_is_created() {
    let config = TreeConfig { max_depth: 1, ..TreeConfig::default() };
    let mut tree = Tree::new(config);
    tree.build_with_bounds(cube(0.0, 10.0), vec![(1u32, cube(1.0, 1.0))]).unwrap();

    let root = tree.root().unwrap().unwrap();
    assert_eq!(*root.left().unwrap().aabb(), make_aabb([0.0, 0.0, 0.0], [5.0, 10.0, 10.0]));
    assert!(root.right().is_none());
    assert_eq!(tree.node_count(), 2);
    assert_eq!(tree.stats().node_count, 2);
}

#[test]
fn test_straddling_item_stays_at_node() {
    let mut tree = Tree::default();
    tree.build_with_bounds(
        cube(0.0, 10.0),
        vec![(7u32, make_aabb([4.9, 4.9, 4.9], [5.1, 5.1, 5.1]))],
    ).unwrap();

    let root = tree.root().unwrap().unwrap();
    assert_eq!(root.items().len(), 1);
    assert_eq!(*root.items()[0].payload(), 7);
    // No child would have held it, so none was created
    assert!(root.is_leaf());
    assert_eq!(tree.node_count(), 1);
}

#[test]
fn test_no_empty_nodes_after_build() {
    let mut tree = Tree::default();
    tree.build(lattice(4)).unwrap();
    tree.insert(100, make_aabb([0.0, 0.0, 0.0], [7.0, 7.0, 7.0])).unwrap();

    // Every leaf holds at least one item
    for node in tree.nodes().unwrap() {
        if node.is_leaf() {
            assert!(!node.items().is_empty(), "empty leaf {:?}", node.index());
        }
    }
}

#[test]
fn test_max_depth_stops_descent() {
    let config = TreeConfig { max_depth: 2, ..TreeConfig::default() };
    let mut tree = Tree::new(config);
    tree.build_with_bounds(cube(0.0, 16.0), vec![(1u32, cube(0.0, 0.5))]).unwrap();

    let stats = tree.stats();
    assert_eq!(stats.depth, 2);
    assert_eq!(tree.depth(), 2);
    let holder = tree.nodes().unwrap().find(|n| !n.items().is_empty()).unwrap();
    assert_eq!(holder.depth(), 2);
}

#[test]
fn test_max_depth_zero_keeps_everything_at_root() {
    let config = TreeConfig { max_depth: 0, ..TreeConfig::default() };
    let mut tree = Tree::new(config);
    tree.build(lattice(3)).unwrap();

    let root = tree.root().unwrap().unwrap();
    assert!(root.is_leaf());
    assert_eq!(root.items().len(), 27);
}

#[test]
fn test_item_outside_bounds_stays_at_root_and_expands_it() {
    let mut tree = Tree::default();
    tree.build_with_bounds(
        cube(0.0, 10.0),
        vec![(1u32, make_aabb([-4.0, -6.0, -4.0], [-3.0, -5.0, -3.0]))],
    ).unwrap();

    let root = tree.root().unwrap().unwrap();
    assert_eq!(root.items().len(), 1);
    assert_eq!(*root.aabb(), make_aabb([-4.0, -6.0, -4.0], [10.0, 10.0, 10.0]));
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn test_containment_invariant() {
    let mut tree = Tree::default();
    tree.build(lattice(5)).unwrap();
    tree.insert(1000, cube(-3.0, 1.0)).unwrap();
    tree.insert(1001, make_aabb([0.0, 0.0, 0.0], [9.0, 0.5, 0.5])).unwrap();

    for node in tree.nodes().unwrap() {
        let bounds = subtree_bounds(node);
        if !bounds.is_empty() {
            assert!(node.aabb().contains(&bounds), "node {:?} does not enclose its items", node.index());
        }
    }
}

#[test]
fn test_children_are_created_after_their_parent() {
    let mut tree = Tree::default();
    tree.build(lattice(4)).unwrap();
    for node in tree.nodes().unwrap() {
        for child in node.children() {
            assert!(child.index() > node.index());
            assert_eq!(child.depth(), node.depth() + 1);
        }
    }
}

#[test]
fn test_order_independence_of_placement() {
    let items = lattice(4);
    let mut reversed = items.clone();
    reversed.reverse();

    let mut a = Tree::default();
    a.build(items).unwrap();
    let mut b = Tree::default();
    b.build(reversed).unwrap();

    assert_eq!(placement(&a), placement(&b));
}

#[test]
fn test_nodes_iterator_is_pre_order() {
    let mut tree = Tree::default();
    tree.build(lattice(3)).unwrap();

    let iterative: Vec<NodeIndex> = tree.nodes().unwrap().map(|n| n.index()).collect();

    fn walk(node: &Node<u32>, out: &mut Vec<NodeIndex>) {
        out.push(node.index());
        for child in node.children() {
            walk(child, out);
        }
    }
    let mut recursive = Vec::new();
    walk(tree.root().unwrap().unwrap(), &mut recursive);

    assert_eq!(iterative, recursive);
    assert_eq!(iterative.len(), tree.node_count());
}

// ============================================================================
// Incremental insertion
// ============================================================================

#[test]
fn test_insert_into_empty_tree_creates_root() {
    let mut tree = Tree::default();
    let index = tree.insert(5u32, cube(1.0, 1.0)).unwrap();
    assert_eq!(index, ItemIndex(0));
    assert_eq!(*tree.root().unwrap().unwrap().aabb(), cube(1.0, 1.0));
}

#[test]
fn test_insert_keeps_generation() {
    let mut tree = Tree::default();
    tree.build(lattice(2)).unwrap();
    let generation = tree.generation();

    let index = tree.insert(99, cube(0.2, 0.3)).unwrap();
    assert_eq!(index, ItemIndex(8));
    assert_eq!(tree.generation(), generation);
    assert_eq!(tree.stats().item_count, 9);
}

// ============================================================================
// Dirty tracking and lazy rebuild
// ============================================================================

#[test]
fn test_root_or_rebuild_only_when_dirty() {
    let mut source = lattice(2);
    let mut tree = Tree::default();
    tree.rebuild_from(source.as_slice()).unwrap();
    let generation = tree.generation();

    // Not dirty: no rebuild
    tree.root_or_rebuild(source.as_slice()).unwrap();
    assert_eq!(tree.generation(), generation);

    source.truncate(3);
    tree.mark_dirty();
    assert!(tree.is_dirty());
    tree.root_or_rebuild(source.as_slice()).unwrap();
    assert!(!tree.is_dirty());
    assert!(tree.generation() > generation);
    assert_eq!(tree.item_count(), 3);
}

// ============================================================================
// Destroy
// ============================================================================

#[test]
fn test_use_after_destroy() {
    let mut tree = Tree::default();
    tree.build(lattice(2)).unwrap();
    tree.destroy();

    assert!(tree.is_destroyed());
    assert!(matches!(tree.root(), Err(Error::UseAfterDestroy(_))));
    assert!(matches!(tree.insert(1, cube(0.0, 1.0)), Err(Error::UseAfterDestroy(_))));
    assert!(matches!(tree.build(lattice(1)), Err(Error::UseAfterDestroy(_))));
    assert!(matches!(tree.clear(), Err(Error::UseAfterDestroy(_))));
    assert!(tree.nodes().is_err());
}

#[test]
fn test_clear() {
    let mut tree = Tree::default();
    tree.build(lattice(2)).unwrap();
    tree.clear().unwrap();
    assert!(tree.root().unwrap().is_none());
    assert!(tree.is_empty());
}
