use crate::arena::DEFAULT_CHUNK_SIZE;
use crate::avl_tree::node::Node;
use crate::avl_tree::tree::{self, Tree};
use crate::binary_tree;
use crate::container::Container;
use crate::error::InvariantViolation;
use std::fmt::Display;
use std::io::{self, Write};
use std::iter::FromIterator;

/// An ordered set implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of two child subtrees of any node differ by at most one. Nodes are stored in an arena
/// and linked through handles, with each node keeping a handle to its parent so rebalancing can
/// walk upward from the point of change.
///
/// # Examples
/// ```
/// use balanced_trees::avl_tree::AvlSet;
///
/// let mut set = AvlSet::new();
/// set.add(0);
/// set.add(3);
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.min(), Some(&0));
///
/// assert!(set.remove(&0));
/// assert!(!set.remove(&1));
/// ```
pub struct AvlSet<T> {
    tree: Tree<T>,
}

impl<T> AvlSet<T>
where
    T: Ord,
{
    /// Constructs a new, empty `AvlSet<T>`.
    ///
    /// # Examples
    /// ```
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `AvlSet<T>` whose node storage grows `chunk_size` nodes at a
    /// time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    /// ```
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::with_chunk_size(16);
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        AvlSet {
            tree: Tree::new(chunk_size),
        }
    }

    /// Inserts a value into the set. Returns `false` and leaves the set untouched if the value
    /// already exists.
    ///
    /// # Examples
    /// ```
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
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
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(1);
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        tree::remove(&mut self.tree, value).is_some()
    }

    /// Checks if a value exists in the set.
    ///
    /// # Examples
    /// ```
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
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
    ///
    /// # Examples
    /// ```
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(1);
    /// set.add(2);
    /// set.clear();
    /// assert!(set.is_empty());
    /// ```
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
    ///
    /// # Examples
    /// ```
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// for value in 0..7 {
    ///     set.add(value);
    /// }
    /// assert_eq!(set.height(), 3);
    /// ```
    pub fn height(&self) -> usize {
        tree::height(&self.tree, self.tree.root)
    }

    /// Returns an iterator over the set. The iterator will yield values using in-order traversal.
    ///
    /// # Examples
    /// ```
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(3);
    /// set.add(1);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlSetIter<'_, T> {
        AvlSetIter {
            tree_iter: self.tree.iter(),
        }
    }

    /// Walks the whole tree and verifies ordering, parent links, cached heights and balance
    /// factors.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        tree::check(&self.tree)
    }

    /// Writes a level-order dump of the tree. Right-heavy nodes are suffixed with `+`, left-heavy
    /// nodes with `-`, and absent children are written as `N`.
    ///
    /// # Examples
    /// ```
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(2);
    /// set.add(3);
    ///
    /// let mut buf = Vec::new();
    /// set.dump(&mut buf).unwrap();
    /// assert_eq!(String::from_utf8(buf).unwrap(), "2+\nN 3\n");
    /// ```
    pub fn dump<W>(&self, writer: W) -> io::Result<()>
    where
        W: Write,
        T: Display,
    {
        let avl = &self.tree;
        avl.dump(writer, |id| {
            let marker = match tree::balance(avl, id) {
                b if b > 0 => "+",
                b if b < 0 => "-",
                _ => "",
            };
            format!("{}{}", avl.nodes[id].value, marker)
        })
    }
}

impl<T> Container<T> for AvlSet<T>
where
    T: Ord + Display,
{
    fn add(&mut self, value: T) -> bool {
        AvlSet::add(self, value)
    }

    fn remove(&mut self, value: &T) -> bool {
        AvlSet::remove(self, value)
    }

    fn contains(&self, value: &T) -> bool {
        AvlSet::contains(self, value)
    }

    fn dump<W>(&self, writer: W) -> io::Result<()>
    where
        W: Write,
    {
        AvlSet::dump(self, writer)
    }
}

impl<'a, T> IntoIterator for &'a AvlSet<T>
where
    T: 'a + Ord,
{
    type Item = &'a T;
    type IntoIter = AvlSetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct AvlSetIter<'a, T>
where
    T: 'a,
{
    tree_iter: binary_tree::Iter<'a, Node<T>>,
}

impl<'a, T> Iterator for AvlSetIter<'a, T>
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

impl<T> Extend<T> for AvlSet<T>
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

impl<T> FromIterator<T> for AvlSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = AvlSet::new();
        set.extend(iter);
        set
    }
}

impl<T> Default for AvlSet<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}
