use crate::binary_tree::{Links, TreeNode};

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// A struct representing an internal node of a red black tree.
pub struct Node<T> {
    pub value: T,
    pub color: Color,
    pub links: Links,
}

impl<T> Node<T> {
    pub fn new(value: T, color: Color) -> Self {
        Node {
            value,
            color,
            links: Links::default(),
        }
    }
}

impl<T> TreeNode for Node<T>
where
    T: Ord,
{
    type Value = T;

    fn value(&self) -> &T {
        &self.value
    }

    fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    fn links(&self) -> &Links {
        &self.links
    }

    fn links_mut(&mut self) -> &mut Links {
        &mut self.links
    }

    fn into_value(self) -> T {
        self.value
    }
}
