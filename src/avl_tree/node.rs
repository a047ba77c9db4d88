use crate::binary_tree::{Links, TreeNode};

/// A struct representing an internal node of an avl tree.
pub struct Node<T> {
    pub value: T,
    pub height: usize,
    pub links: Links,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Node {
            value,
            height: 1,
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
