use crate::arena::DEFAULT_CHUNK_SIZE;
use crate::binary_tree;
use crate::container::Container;
use crate::error::InvariantViolation;
use crate::red_black_tree::node::{Color, Node};
use crate::red_black_tree::tree::{self, Tree};
use std::fmt::Display;
use std::io::{self, Write};
use std::iter::FromIterator;

/// An ordered set implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree that colors every node red or black.
/// The root is black, no red node has a red child, and every path from the root to an absent child
/// crosses the same number of black nodes, so the longest path is at most twice the shortest.
/// Deletion tracks the transient "double black" deficit with a cursor local to the removal, so
/// nodes only ever hold one of the two colors.
///
/// # Examples
/// ```
/// use balanced_trees::red_black_tree::RedBlackSet;
///
/// let mut set = RedBlackSet::new();
/// set.add(0);
/// set.add(3);
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.max(), Some(&3));
///
/// assert!(set.remove(&0));
/// assert!(!set.remove(&1));
/// ```
pub struct RedBlackSet<T> {
    tree: Tree<T>,
}

impl<T> RedBlackSet<T>
where
    T: Ord,
{
    /// Constructs a new, empty `RedBlackSet<T>`.
    ///
    /// # Examples
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = RedBlackSet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `RedBlackSet<T>` whose node storage grows `chunk_size` nodes at a
    /// time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        RedBlackSet {
            tree: Tree::new(chunk_size),
        }
    }

    /// Inserts a value into the set. Returns `false` and leaves the set untouched if the value
    /// already exists.
    ///
    /// # Examples
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// assert!(set.add(1));
    /// assert!(!set.add(1));
    /// assert!(set.contains(&1));
    /// ```
    pub fn add(&mut self, value: T) -> bool {
        tree::insert(&mut self.tree, value)
    }

    /// Removes a value from the set. Returns `false` if the value does not exist.
    ///
    /// # Examples
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.add(1);
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        tree::remove(&mut self.tree, value).is_some()
    }

    /// Checks if a value exists in the set.
    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the set, removing all values.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the minimum value of the set. Returns `None` if the set is empty.
    pub fn min(&self) -> Option<&T> {
        self.tree.min()
    }

    /// Returns the maximum value of the set. Returns `None` if the set is empty.
    pub fn max(&self) -> Option<&T> {
        self.tree.max()
    }

    /// Returns the number of levels in the tree, or zero if the set is empty.
    pub fn height(&self) -> usize {
        self.tree.subtree_height(self.tree.root)
    }

    /// Returns an iterator over the set. The iterator will yield values using in-order traversal.
    ///
    /// # Examples
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.add(3);
    /// set.add(1);
    ///
    /// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3]);
    /// ```
    pub fn iter(&self) -> RedBlackSetIter<'_, T> {
        RedBlackSetIter {
            tree_iter: self.tree.iter(),
        }
    }

    /// Walks the whole tree and verifies ordering, parent links and the coloring rules.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        tree::check(&self.tree)
    }

    /// Writes a level-order dump of the tree. Red nodes are suffixed with `*` and absent children
    /// are written as `N`.
    ///
    /// # Examples
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.add(2);
    /// set.add(1);
    ///
    /// let mut buf = Vec::new();
    /// set.dump(&mut buf).unwrap();
    /// assert_eq!(String::from_utf8(buf).unwrap(), "2\n1* N\n");
    /// ```
    pub fn dump<W>(&self, writer: W) -> io::Result<()>
    where
        W: Write,
        T: Display,
    {
        let red_black = &self.tree;
        red_black.dump(writer, |id| {
            let node = &red_black.nodes[id];
            match node.color {
                Color::Red => format!("{}*", node.value),
                Color::Black => node.value.to_string(),
            }
        })
    }
}

impl<T> Container<T> for RedBlackSet<T>
where
    T: Ord + Display,
{
    fn add(&mut self, value: T) -> bool {
        RedBlackSet::add(self, value)
    }

    fn remove(&mut self, value: &T) -> bool {
        RedBlackSet::remove(self, value)
    }

    fn contains(&self, value: &T) -> bool {
        RedBlackSet::contains(self, value)
    }

    fn dump<W>(&self, writer: W) -> io::Result<()>
    where
        W: Write,
    {
        RedBlackSet::dump(self, writer)
    }
}

impl<'a, T> IntoIterator for &'a RedBlackSet<T>
where
    T: 'a + Ord,
{
    type Item = &'a T;
    type IntoIter = RedBlackSetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator for `RedBlackSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct RedBlackSetIter<'a, T>
where
    T: 'a,
{
    tree_iter: binary_tree::Iter<'a, Node<T>>,
}

impl<'a, T> Iterator for RedBlackSetIter<'a, T>
where
    T: 'a + Ord,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tree_iter.size_hint()
    }
}

impl<T> Extend<T> for RedBlackSet<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T> FromIterator<T> for RedBlackSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = RedBlackSet::new();
        set.extend(iter);
        set
    }
}

impl<T> Default for RedBlackSet<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::RedBlackSet;

    fn dump(set: &RedBlackSet<u32>) -> String {
        let mut buf = Vec::new();
        set.dump(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_len_empty() {
        let set: RedBlackSet<u32> = RedBlackSet::new();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
        assert_eq!(set.height(), 0);
        assert_eq!(set.check_invariants(), Ok(()));
    }

    #[test]
    fn test_add() {
        let mut set = RedBlackSet::new();
        assert!(set.add(1));
        assert!(!set.add(1));
        assert!(set.contains(&1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ascending_inserts() {
        let mut set = RedBlackSet::new();
        for value in &[10, 20, 30, 40, 50] {
            set.add(*value);
        }

        assert_eq!(dump(&set), "20\n10 40\nN N 30* 50*\n");
        assert!(set.height() - 1 <= (2.0 * 6f64.log2()) as usize);
        assert_eq!(set.check_invariants(), Ok(()));
    }

    #[test]
    fn test_remove_root_of_pair() {
        let mut set = RedBlackSet::new();
        set.add(1);
        set.add(2);
        assert_eq!(dump(&set), "1\nN 2*\n");

        assert!(set.remove(&1));
        assert_eq!(dump(&set), "2\n");
        assert_eq!(set.check_invariants(), Ok(()));
    }

    #[test]
    fn test_remove_missing_keeps_shape() {
        let mut set: RedBlackSet<u32> = (0..20).collect();
        let before = dump(&set);

        assert!(!set.remove(&100));
        assert_eq!(dump(&set), before);
    }

    #[test]
    fn test_min_max() {
        let set: RedBlackSet<u32> = vec![5, 1, 3].into_iter().collect();
        assert_eq!(set.min(), Some(&1));
        assert_eq!(set.max(), Some(&5));
    }

    #[test]
    fn test_clear() {
        let mut set: RedBlackSet<u32> = (0..10).collect();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.min(), None);
        assert!(set.add(4));
        assert_eq!(dump(&set), "4\n");
    }

    #[test]
    fn test_iter() {
        let set: RedBlackSet<u32> = vec![1, 5, 3].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3, &5]);
        assert_eq!((&set).into_iter().size_hint(), (3, Some(3)));
    }
}
