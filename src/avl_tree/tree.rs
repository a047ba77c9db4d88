use crate::arena::NodeId;
use crate::avl_tree::node::Node;
use crate::binary_tree::{self, Search, Side};
use crate::error::InvariantViolation;
use log::trace;
use std::cmp;

pub type Tree<T> = binary_tree::Tree<Node<T>>;

pub fn height<T>(tree: &Tree<T>, id: Option<NodeId>) -> usize
where
    T: Ord,
{
    match id {
        None => 0,
        Some(id) => tree.nodes[id].height,
    }
}

fn update<T>(tree: &mut Tree<T>, id: NodeId)
where
    T: Ord,
{
    let left = height(tree, tree.left(id));
    let right = height(tree, tree.right(id));
    tree.nodes[id].height = cmp::max(left, right) + 1;
}

/// Right subtree height minus left subtree height.
pub fn balance<T>(tree: &Tree<T>, id: NodeId) -> isize
where
    T: Ord,
{
    height(tree, tree.right(id)) as isize - height(tree, tree.left(id)) as isize
}

// The demoted parent is refreshed first since it now sits below `node`.
fn rotate<T>(tree: &mut Tree<T>, node: NodeId)
where
    T: Ord,
{
    let parent = tree
        .parent(node)
        .expect("Expected the rotated node to have a parent.");
    tree.rotate(node);
    update(tree, parent);
    update(tree, node);
}

// Restores the balance of `node` and returns the root of the rebalanced subtree.
fn rebalance<T>(tree: &mut Tree<T>, node: NodeId) -> NodeId
where
    T: Ord,
{
    let heavy_side = if balance(tree, node) > 0 {
        Side::Right
    } else {
        Side::Left
    };
    let mut heavy = tree
        .child(node, heavy_side)
        .expect("Expected an unbalanced node to have a heavy child.");

    let inner = tree.child(heavy, heavy_side.opposite());
    if height(tree, inner) > height(tree, tree.child(heavy, heavy_side)) {
        let inner = inner.expect("Expected a taller inner subtree to be non-empty.");
        trace!("double rotation at {:?} through {:?}", node, inner);
        rotate(tree, inner);
        heavy = inner;
    }

    rotate(tree, heavy);
    heavy
}

// Walks from `start` to the root refreshing heights and rotating wherever a balance factor
// leaves -1..=1.
fn rebalance_upward<T>(tree: &mut Tree<T>, start: Option<NodeId>)
where
    T: Ord,
{
    let mut cursor = start;
    while let Some(node) = cursor {
        update(tree, node);
        let top = if balance(tree, node).abs() > 1 {
            rebalance(tree, node)
        } else {
            node
        };
        cursor = tree.parent(top);
    }
}

pub fn insert<T>(tree: &mut Tree<T>, value: T) -> bool
where
    T: Ord,
{
    let position = match tree.search(&value) {
        Search::Found(_) => return false,
        Search::Vacant(parent, side) => Some((parent, side)),
        Search::Empty => None,
    };

    let id = tree.attach(Node::new(value), position);
    let parent = tree.parent(id);
    rebalance_upward(tree, parent);
    true
}

pub fn remove<T>(tree: &mut Tree<T>, value: &T) -> Option<T>
where
    T: Ord,
{
    let target = tree.find(value)?;

    // A node with two children hands its slot over to its in-order predecessor.
    let removed = match (tree.left(target), tree.right(target)) {
        (Some(left), Some(_)) => tree.rightmost(left),
        _ => target,
    };

    let parent = tree.splice_out(removed);
    let ret = tree.release(removed, target);
    rebalance_upward(tree, parent);
    Some(ret)
}

pub fn check<T>(tree: &Tree<T>) -> Result<(), InvariantViolation>
where
    T: Ord,
{
    tree.check_links()?;
    check_subtree(tree, tree.root).map(|_| ())
}

// Returns the actual height of the subtree rooted at `id`.
fn check_subtree<T>(tree: &Tree<T>, id: Option<NodeId>) -> Result<usize, InvariantViolation>
where
    T: Ord,
{
    let id = match id {
        Some(id) => id,
        None => return Ok(0),
    };

    let left = check_subtree(tree, tree.left(id))?;
    let right = check_subtree(tree, tree.right(id))?;
    let actual = cmp::max(left, right) + 1;
    let cached = tree.nodes[id].height;
    if cached != actual {
        return Err(InvariantViolation::HeightMismatch { cached, actual });
    }

    let balance = right as isize - left as isize;
    if balance.abs() > 1 {
        return Err(InvariantViolation::Unbalanced { balance });
    }
    Ok(actual)
}

#[cfg(test)]
mod tests {
    use super::{balance, check, height, insert, remove, Tree};
    use crate::error::InvariantViolation;

    fn heights(tree: &Tree<u32>) -> Vec<(u32, usize)> {
        let mut ret = tree
            .iter()
            .map(|value| {
                let id = tree.find(value).unwrap();
                (*value, tree.nodes[id].height)
            })
            .collect::<Vec<_>>();
        ret.sort();
        ret
    }

    #[test]
    fn test_single_left_rotation() {
        let mut tree = Tree::new(8);
        for value in 1..4 {
            assert!(insert(&mut tree, value));
        }

        let root = tree.root.unwrap();
        assert_eq!(tree.nodes[root].value, 2);
        assert_eq!(tree.nodes[tree.left(root).unwrap()].value, 1);
        assert_eq!(tree.nodes[tree.right(root).unwrap()].value, 3);
        assert_eq!(heights(&tree), vec![(1, 1), (2, 2), (3, 1)]);
        assert_eq!(check(&tree), Ok(()));
    }

    #[test]
    fn test_single_right_rotation() {
        let mut tree = Tree::new(8);
        for value in (1..4).rev() {
            insert(&mut tree, value);
        }

        let root = tree.root.unwrap();
        assert_eq!(tree.nodes[root].value, 2);
        assert_eq!(check(&tree), Ok(()));
    }

    #[test]
    fn test_double_rotation() {
        let mut tree = Tree::new(8);
        for value in &[3, 1, 2] {
            insert(&mut tree, *value);
        }

        let root = tree.root.unwrap();
        assert_eq!(tree.nodes[root].value, 2);
        assert_eq!(heights(&tree), vec![(1, 1), (2, 2), (3, 1)]);
        assert_eq!(check(&tree), Ok(()));

        let mut tree = Tree::new(8);
        for value in &[1, 3, 2] {
            insert(&mut tree, *value);
        }
        assert_eq!(tree.nodes[tree.root.unwrap()].value, 2);
        assert_eq!(check(&tree), Ok(()));
    }

    #[test]
    fn test_insert_duplicate() {
        let mut tree = Tree::new(8);
        assert!(insert(&mut tree, 1));
        assert!(!insert(&mut tree, 1));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_remove_rebalances() {
        let mut tree = Tree::new(8);
        for value in &[2, 1, 3, 4] {
            insert(&mut tree, *value);
        }
        assert_eq!(remove(&mut tree, &1), Some(1));

        let root = tree.root.unwrap();
        assert_eq!(tree.nodes[root].value, 3);
        assert_eq!(height(&tree, tree.root), 2);
        assert_eq!(balance(&tree, root), 0);
        assert_eq!(check(&tree), Ok(()));
    }

    #[test]
    fn test_remove_two_children_uses_predecessor() {
        let mut tree = Tree::new(8);
        for value in &[4, 2, 6, 1, 3, 5, 7] {
            insert(&mut tree, *value);
        }
        let root = tree.root.unwrap();
        assert_eq!(remove(&mut tree, &4), Some(4));

        assert_eq!(tree.root, Some(root));
        assert_eq!(tree.nodes[root].value, 3);
        assert_eq!(tree.find(&4), None);
        assert_eq!(check(&tree), Ok(()));
    }

    #[test]
    fn test_remove_missing() {
        let mut tree: Tree<u32> = Tree::new(8);
        assert_eq!(remove(&mut tree, &1), None);
        insert(&mut tree, 2);
        assert_eq!(remove(&mut tree, &1), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_remove_last() {
        let mut tree = Tree::new(8);
        insert(&mut tree, 1);
        assert_eq!(remove(&mut tree, &1), Some(1));
        assert!(tree.is_empty());
        assert_eq!(check(&tree), Ok(()));
    }

    #[test]
    fn test_check_detects_stale_height() {
        let mut tree = Tree::new(8);
        for value in 1..4 {
            insert(&mut tree, value);
        }
        let root = tree.root.unwrap();
        tree.nodes[root].height = 5;

        assert_eq!(
            check(&tree),
            Err(InvariantViolation::HeightMismatch {
                cached: 5,
                actual: 2,
            }),
        );
    }
}
