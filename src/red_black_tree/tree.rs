use crate::arena::NodeId;
use crate::binary_tree::{self, Search};
use crate::error::InvariantViolation;
use crate::red_black_tree::node::{Color, Node};
use log::trace;
use std::mem;

pub type Tree<T> = binary_tree::Tree<Node<T>>;

pub fn is_red<T>(tree: &Tree<T>, id: Option<NodeId>) -> bool
where
    T: Ord,
{
    match id {
        None => false,
        Some(id) => tree.nodes[id].color == Color::Red,
    }
}

fn set_color<T>(tree: &mut Tree<T>, id: NodeId, color: Color)
where
    T: Ord,
{
    tree.nodes[id].color = color;
}

fn blacken_root<T>(tree: &mut Tree<T>)
where
    T: Ord,
{
    if let Some(root) = tree.root {
        set_color(tree, root, Color::Black);
    }
}

pub fn insert<T>(tree: &mut Tree<T>, value: T) -> bool
where
    T: Ord,
{
    let id = match tree.search(&value) {
        Search::Found(_) => return false,
        Search::Vacant(parent, side) => {
            tree.attach(Node::new(value, Color::Red), Some((parent, side)))
        },
        Search::Empty => tree.attach(Node::new(value, Color::Black), None),
    };

    fix_red_parent(tree, id);
    true
}

// Resolves a red node with a red parent by recoloring upward until an uncle is black, then
// restructuring once.
fn fix_red_parent<T>(tree: &mut Tree<T>, mut node: NodeId)
where
    T: Ord,
{
    while let Some(mut parent) = tree.parent(node) {
        if !is_red(tree, Some(parent)) {
            break;
        }
        let grandparent = tree
            .parent(parent)
            .expect("Expected a red node to have a parent.");
        let uncle = tree.sibling(parent);

        if let Some(uncle) = uncle.filter(|uncle| is_red(tree, Some(*uncle))) {
            trace!("pushing black down from {:?}", grandparent);
            set_color(tree, parent, Color::Black);
            set_color(tree, uncle, Color::Black);
            set_color(tree, grandparent, Color::Red);
            node = grandparent;
            continue;
        }

        // An inside grandchild is rotated up first so that node, parent and grandparent line up.
        if tree.side_of(node) != tree.side_of(parent) {
            trace!("straightening {:?} below {:?}", node, parent);
            tree.rotate(node);
            mem::swap(&mut node, &mut parent);
        }

        trace!("restructuring {:?} above {:?}", parent, grandparent);
        set_color(tree, parent, Color::Black);
        set_color(tree, node, Color::Red);
        set_color(tree, grandparent, Color::Red);
        tree.rotate(parent);
        break;
    }

    blacken_root(tree);
}

/// How the node physically leaving the tree is taken out.
enum Removal {
    /// A red leaf or the last node: unlink it.
    Unlink,
    /// A black node with a single red child: the child takes its slot and turns black.
    Promote(NodeId),
    /// A black leaf: its path is one black node short until the fix-up resolves it.
    DoubleBlack,
}

fn classify<T>(tree: &Tree<T>, id: NodeId) -> Removal
where
    T: Ord,
{
    match tree.left(id).or(tree.right(id)) {
        Some(child) => Removal::Promote(child),
        None if tree.root == Some(id) || is_red(tree, Some(id)) => Removal::Unlink,
        None => Removal::DoubleBlack,
    }
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

    match classify(tree, removed) {
        Removal::Unlink => {
            tree.splice_out(removed);
        },
        Removal::Promote(child) => {
            tree.splice_out(removed);
            set_color(tree, child, Color::Black);
        },
        Removal::DoubleBlack => {
            fix_double_black(tree, removed);
            tree.splice_out(removed);
        },
    }

    Some(tree.release(removed, target))
}

// Moves the missing black unit carried by `node` upward or absorbs it with rotations. `node`
// stays a leaf throughout and is unlinked by the caller afterwards.
fn fix_double_black<T>(tree: &mut Tree<T>, node: NodeId)
where
    T: Ord,
{
    let mut cursor = node;
    while let (Some(parent), Some(side)) = (tree.parent(cursor), tree.side_of(cursor)) {
        let sibling = tree
            .child(parent, side.opposite())
            .expect("Expected a double black node to have a sibling.");

        if is_red(tree, Some(sibling)) {
            trace!("rotating red sibling {:?} above {:?}", sibling, parent);
            set_color(tree, parent, Color::Red);
            set_color(tree, sibling, Color::Black);
            tree.rotate(sibling);
            continue;
        }

        let near = tree.child(sibling, side);
        let far = tree.child(sibling, side.opposite());
        if !is_red(tree, near) && !is_red(tree, far) {
            set_color(tree, sibling, Color::Red);
            if is_red(tree, Some(parent)) {
                set_color(tree, parent, Color::Black);
                break;
            }
            trace!("double black moves up to {:?}", parent);
            cursor = parent;
            continue;
        }

        let sibling = if is_red(tree, far) {
            sibling
        } else {
            let near = near.expect("Expected a red near nephew.");
            trace!("rotating near nephew {:?} above {:?}", near, sibling);
            set_color(tree, sibling, Color::Red);
            set_color(tree, near, Color::Black);
            tree.rotate(near);
            near
        };

        let far = tree
            .child(sibling, side.opposite())
            .expect("Expected a red far nephew.");
        let parent_color = tree.nodes[parent].color;
        set_color(tree, parent, Color::Black);
        set_color(tree, sibling, parent_color);
        set_color(tree, far, Color::Black);
        tree.rotate(sibling);
        break;
    }

    blacken_root(tree);
}

pub fn check<T>(tree: &Tree<T>) -> Result<(), InvariantViolation>
where
    T: Ord,
{
    tree.check_links()?;
    if is_red(tree, tree.root) {
        return Err(InvariantViolation::RedRoot);
    }
    black_height(tree, tree.root).map(|_| ())
}

// Returns the number of black nodes on every path from `id` down to an absent child.
fn black_height<T>(tree: &Tree<T>, id: Option<NodeId>) -> Result<usize, InvariantViolation>
where
    T: Ord,
{
    let id = match id {
        Some(id) => id,
        None => return Ok(0),
    };

    let left = black_height(tree, tree.left(id))?;
    let right = black_height(tree, tree.right(id))?;
    if left != right {
        return Err(InvariantViolation::BlackHeightMismatch { left, right });
    }

    match tree.nodes[id].color {
        Color::Red => {
            if is_red(tree, tree.left(id)) || is_red(tree, tree.right(id)) {
                return Err(InvariantViolation::RedChildOfRed);
            }
            Ok(left)
        },
        Color::Black => Ok(left + 1),
    }
}
