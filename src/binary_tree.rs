//! Arena-backed binary search tree skeleton shared by the balanced sets.
//!
//! Nodes live in an `Arena` and refer to each other through `NodeId` handles. Every node keeps
//! a parent handle next to its two child handles, and all structural edits go through
//! `link_child` and `replace_in_parent` so the parent handles never drift from the child slots.

use crate::arena::{Arena, NodeId};
use crate::error::InvariantViolation;
use log::trace;
use std::cmp::Ordering;
use std::io::{self, Write};
use std::mem;

/// The child slot a node occupies in its parent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Parent and child handles of a node.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Links {
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl Links {
    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// A node that can be stored in a `Tree<N>`.
pub trait TreeNode {
    type Value: Ord;

    fn value(&self) -> &Self::Value;

    fn value_mut(&mut self) -> &mut Self::Value;

    fn links(&self) -> &Links;

    fn links_mut(&mut self) -> &mut Links;

    fn into_value(self) -> Self::Value;
}

/// Outcome of a binary search for a value.
pub enum Search {
    /// The value is stored in this node.
    Found(NodeId),
    /// The value is absent and would be attached as the given child of the given node.
    Vacant(NodeId, Side),
    /// The tree is empty.
    Empty,
}

pub struct Tree<N> {
    pub nodes: Arena<N>,
    pub root: Option<NodeId>,
}

impl<N> Tree<N>
where
    N: TreeNode,
{
    pub fn new(chunk_size: usize) -> Self {
        Tree {
            nodes: Arena::new(chunk_size),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].links().parent
    }

    pub fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self.nodes[id].links().child(side)
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].links().left
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].links().right
    }

    /// Returns which child of its parent `id` is, or `None` for the root.
    pub fn side_of(&self, id: NodeId) -> Option<Side> {
        self.parent(id).map(|parent| {
            if self.left(parent) == Some(id) {
                Side::Left
            } else {
                Side::Right
            }
        })
    }

    pub fn sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let side = self.side_of(id)?;
        self.child(parent, side.opposite())
    }

    /// Stores `child` in the `side` slot of `parent` and points the child back at `parent`.
    pub fn link_child(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
        *self.nodes[parent].links_mut().child_mut(side) = child;
        if let Some(child) = child {
            self.nodes[child].links_mut().parent = Some(parent);
        }
    }

    /// Redirects whichever slot points at `old` (the root or a child slot of its parent) to `new`.
    pub fn replace_in_parent(&mut self, old: NodeId, new: Option<NodeId>) {
        let parent = self.parent(old);
        match (parent, self.side_of(old)) {
            (Some(parent), Some(side)) => {
                *self.nodes[parent].links_mut().child_mut(side) = new;
            },
            _ => self.root = new,
        }
        if let Some(new) = new {
            self.nodes[new].links_mut().parent = parent;
        }
    }

    /// Promotes `node` into its parent's position.
    ///
    /// A left child rotates right around its parent and a right child rotates left. The subtree of
    /// `node` that faces the parent is handed over to the parent on the side `node` vacated.
    ///
    /// # Panics
    ///
    /// Panics if `node` is the root.
    pub fn rotate(&mut self, node: NodeId) {
        let parent = self
            .parent(node)
            .expect("Expected the rotated node to have a parent.");
        let side = self
            .side_of(node)
            .expect("Expected the rotated node to have a parent.");
        trace!("rotating {:?} above {:?} from the {:?}", node, parent, side);

        let moved = self.child(node, side.opposite());
        self.link_child(parent, side, moved);
        self.replace_in_parent(parent, Some(node));
        self.link_child(node, side.opposite(), Some(parent));
    }

    pub fn search(&self, value: &N::Value) -> Search {
        let mut curr = match self.root {
            Some(root) => root,
            None => return Search::Empty,
        };
        loop {
            let side = match value.cmp(self.nodes[curr].value()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Search::Found(curr),
            };
            match self.child(curr, side) {
                Some(child) => curr = child,
                None => return Search::Vacant(curr, side),
            }
        }
    }

    pub fn find(&self, value: &N::Value) -> Option<NodeId> {
        match self.search(value) {
            Search::Found(id) => Some(id),
            _ => None,
        }
    }

    pub fn contains(&self, value: &N::Value) -> bool {
        self.find(value).is_some()
    }

    /// Allocates `node` as a leaf at a vacant position returned by `search`. An empty tree gets
    /// the node as its root.
    pub fn attach(&mut self, node: N, position: Option<(NodeId, Side)>) -> NodeId {
        let id = self.nodes.allocate(node);
        match position {
            Some((parent, side)) => self.link_child(parent, side, Some(id)),
            None => self.root = Some(id),
        }
        id
    }

    pub fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.right(id) {
            id = right;
        }
        id
    }

    pub fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.left(id) {
            id = left;
        }
        id
    }

    /// Unlinks a node with at most one child, promoting that child into its slot. Returns the
    /// former parent of the node.
    pub fn splice_out(&mut self, id: NodeId) -> Option<NodeId> {
        let links = *self.nodes[id].links();
        debug_assert!(links.left.is_none() || links.right.is_none());
        self.replace_in_parent(id, links.left.or(links.right));
        links.parent
    }

    /// Releases a spliced-out node and returns the value removed from the set. If the node was
    /// standing in for `target` (predecessor substitution), its value moves into `target` and the
    /// value `target` held is returned instead.
    pub fn release(&mut self, id: NodeId, target: NodeId) -> N::Value {
        let value = self.nodes.free(id).into_value();
        if id == target {
            value
        } else {
            mem::replace(self.nodes[target].value_mut(), value)
        }
    }

    pub fn min(&self) -> Option<&N::Value> {
        self.root.map(|root| self.nodes[self.leftmost(root)].value())
    }

    pub fn max(&self) -> Option<&N::Value> {
        self.root.map(|root| self.nodes[self.rightmost(root)].value())
    }

    /// Number of levels below and including `id`.
    pub fn subtree_height(&self, id: Option<NodeId>) -> usize {
        match id {
            None => 0,
            Some(id) => {
                1 + self
                    .subtree_height(self.left(id))
                    .max(self.subtree_height(self.right(id)))
            },
        }
    }

    pub fn iter(&self) -> Iter<'_, N> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::new(),
            remaining: self.len(),
        };
        iter.push_left_spine(self.root);
        iter
    }

    /// Writes the tree level by level. Each line holds the two child slots of every node on the
    /// previous line; absent slots are written as `N`.
    pub fn dump<W, F>(&self, mut writer: W, label: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(NodeId) -> String,
    {
        let mut level = vec![self.root];
        while level.iter().any(Option::is_some) {
            let tokens: Vec<String> = level
                .iter()
                .map(|slot| match slot {
                    Some(id) => label(*id),
                    None => String::from("N"),
                })
                .collect();
            writeln!(writer, "{}", tokens.join(" "))?;

            let mut next = Vec::with_capacity(level.len() * 2);
            for id in level.into_iter().flatten() {
                next.push(self.left(id));
                next.push(self.right(id));
            }
            level = next;
        }
        Ok(())
    }

    /// Verifies parent handles, strict in-order ordering and that every stored node is reachable.
    pub fn check_links(&self) -> Result<(), InvariantViolation> {
        let root = match self.root {
            Some(root) => root,
            None if self.nodes.is_empty() => return Ok(()),
            None => {
                return Err(InvariantViolation::LengthMismatch {
                    stored: self.nodes.len(),
                    reachable: 0,
                })
            },
        };
        if self.parent(root).is_some() {
            return Err(InvariantViolation::RootHasParent);
        }

        let mut reachable = 0;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            reachable += 1;
            if reachable > self.nodes.len() {
                return Err(InvariantViolation::LengthMismatch {
                    stored: self.nodes.len(),
                    reachable,
                });
            }
            for child in self.left(id).into_iter().chain(self.right(id)) {
                if self.parent(child) != Some(id) {
                    return Err(InvariantViolation::ParentMismatch);
                }
                stack.push(child);
            }
        }
        if reachable != self.nodes.len() {
            return Err(InvariantViolation::LengthMismatch {
                stored: self.nodes.len(),
                reachable,
            });
        }

        let mut values = self.iter();
        if let Some(mut prev) = values.next() {
            for value in values {
                if prev >= value {
                    return Err(InvariantViolation::OrderViolation);
                }
                prev = value;
            }
        }
        Ok(())
    }
}

/// An in-order iterator over the values of a `Tree<N>`.
pub struct Iter<'a, N> {
    tree: &'a Tree<N>,
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<'a, N> Iter<'a, N>
where
    N: TreeNode,
{
    fn push_left_spine(&mut self, mut curr: Option<NodeId>) {
        while let Some(id) = curr {
            self.stack.push(id);
            curr = self.tree.left(id);
        }
    }
}

impl<'a, N> Iterator for Iter<'a, N>
where
    N: 'a + TreeNode,
{
    type Item = &'a N::Value;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.push_left_spine(self.tree.right(id));
        self.remaining -= 1;
        let tree = self.tree;
        Some(tree.nodes[id].value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::{Links, Search, Side, Tree, TreeNode};
    use crate::error::InvariantViolation;

    struct Plain {
        value: u32,
        links: Links,
    }

    impl TreeNode for Plain {
        type Value = u32;

        fn value(&self) -> &u32 {
            &self.value
        }

        fn value_mut(&mut self) -> &mut u32 {
            &mut self.value
        }

        fn links(&self) -> &Links {
            &self.links
        }

        fn links_mut(&mut self) -> &mut Links {
            &mut self.links
        }

        fn into_value(self) -> u32 {
            self.value
        }
    }

    fn insert(tree: &mut Tree<Plain>, value: u32) {
        let position = match tree.search(&value) {
            Search::Found(_) => return,
            Search::Vacant(parent, side) => Some((parent, side)),
            Search::Empty => None,
        };
        tree.attach(
            Plain {
                value,
                links: Links::default(),
            },
            position,
        );
    }

    fn dump(tree: &Tree<Plain>) -> String {
        let mut buf = Vec::new();
        tree.dump(&mut buf, |id| tree.nodes[id].value.to_string())
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_rotate_right_child() {
        let mut tree = Tree::new(8);
        for value in &[1, 2, 3] {
            insert(&mut tree, *value);
        }
        let two = tree.find(&2).unwrap();
        tree.rotate(two);

        assert_eq!(tree.root, Some(two));
        assert_eq!(dump(&tree), "2\n1 3\n");
        assert_eq!(tree.check_links(), Ok(()));
    }

    #[test]
    fn test_rotate_moves_inner_subtree() {
        let mut tree = Tree::new(8);
        for value in &[5, 3, 7, 2, 4] {
            insert(&mut tree, *value);
        }
        let three = tree.find(&3).unwrap();
        tree.rotate(three);

        assert_eq!(dump(&tree), "3\n2 5\nN N 4 7\n");
        assert_eq!(tree.parent(tree.find(&4).unwrap()), tree.find(&5));
        assert_eq!(tree.side_of(tree.find(&4).unwrap()), Some(Side::Left));
        assert_eq!(tree.check_links(), Ok(()));
    }

    #[test]
    fn test_rotate_below_root() {
        let mut tree = Tree::new(8);
        for value in &[10, 5, 20, 25, 30] {
            insert(&mut tree, *value);
        }
        let twenty_five = tree.find(&25).unwrap();
        tree.rotate(twenty_five);

        assert_eq!(dump(&tree), "10\n5 25\nN N 20 30\n");
        assert_eq!(tree.check_links(), Ok(()));
    }

    #[test]
    fn test_splice_and_release() {
        let mut tree = Tree::new(8);
        for value in &[5, 3, 8, 4] {
            insert(&mut tree, *value);
        }
        let three = tree.find(&3).unwrap();
        assert_eq!(tree.splice_out(three), tree.find(&5));
        assert_eq!(tree.release(three, three), 3);

        assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&4, &5, &8]);
        assert_eq!(tree.check_links(), Ok(()));
    }

    #[test]
    fn test_release_substitutes_value() {
        let mut tree = Tree::new(8);
        for value in &[5, 3, 8] {
            insert(&mut tree, *value);
        }
        let five = tree.find(&5).unwrap();
        let three = tree.find(&3).unwrap();
        tree.splice_out(three);

        assert_eq!(tree.release(three, five), 5);
        assert_eq!(dump(&tree), "3\nN 8\n");
    }

    #[test]
    fn test_min_max_iter() {
        let mut tree = Tree::new(2);
        assert_eq!(tree.min(), None);
        assert_eq!(tree.iter().next(), None);

        for value in &[4, 2, 6, 1, 3, 5, 7] {
            insert(&mut tree, *value);
        }
        assert_eq!(tree.min(), Some(&1));
        assert_eq!(tree.max(), Some(&7));
        assert_eq!(tree.iter().size_hint(), (7, Some(7)));
        assert_eq!(
            tree.iter().cloned().collect::<Vec<u32>>(),
            vec![1, 2, 3, 4, 5, 6, 7],
        );
        assert_eq!(tree.subtree_height(tree.root), 3);
    }

    #[test]
    fn test_check_links_detects_broken_parent() {
        let mut tree = Tree::new(8);
        for value in &[2, 1, 3] {
            insert(&mut tree, *value);
        }
        let one = tree.find(&1).unwrap();
        tree.nodes[one].links.parent = None;

        assert_eq!(tree.check_links(), Err(InvariantViolation::ParentMismatch));
    }

    #[test]
    fn test_check_links_detects_disorder() {
        let mut tree = Tree::new(8);
        for value in &[2, 1, 3] {
            insert(&mut tree, *value);
        }
        let one = tree.find(&1).unwrap();
        tree.nodes[one].value = 9;

        assert_eq!(tree.check_links(), Err(InvariantViolation::OrderViolation));
    }
}
