//! The operations every set container in this crate supports.

use crate::error::Result;
use crate::load;
use log::debug;
use std::io::{self, Read, Write};
use std::str::FromStr;

/// A uniform interface over the ordered sets, used by drivers that treat them interchangeably.
///
/// # Examples
/// ```
/// use balanced_trees::avl_tree::AvlSet;
/// use balanced_trees::red_black_tree::RedBlackSet;
/// use balanced_trees::Container;
///
/// fn fill<C: Container<i32>>(container: &mut C) {
///     container.load("3 10 20 30".as_bytes()).unwrap();
/// }
///
/// let mut avl = AvlSet::new();
/// let mut red_black = RedBlackSet::new();
/// fill(&mut avl);
/// fill(&mut red_black);
///
/// assert!(Container::contains(&avl, &20));
/// assert!(Container::contains(&red_black, &20));
/// ```
pub trait Container<T> {
    /// Inserts `value`, returning `false` if it was already present.
    fn add(&mut self, value: T) -> bool;

    /// Removes `value`, returning `false` if it was absent.
    fn remove(&mut self, value: &T) -> bool;

    fn contains(&self, value: &T) -> bool;

    /// Writes a level-order diagnostic dump of the container.
    fn dump<W: Write>(&self, writer: W) -> io::Result<()>;

    /// Writes the dump to standard output.
    fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let handle = stdout.lock();
        self.dump(handle)
    }

    /// Reads a count followed by that many values and adds them in order. Returns the number of
    /// values that were not already present.
    fn load<R>(&mut self, reader: R) -> Result<usize>
    where
        R: Read,
        T: FromStr,
    {
        let values = load::read_values(reader)?;
        let total = values.len();
        let mut inserted = 0;
        for value in values {
            if self.add(value) {
                inserted += 1;
            }
        }
        debug!("loaded {} values, {} new", total, inserted);
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::Container;
    use crate::avl_tree::AvlSet;
    use crate::red_black_tree::RedBlackSet;

    #[test]
    fn test_print() {
        let mut avl: AvlSet<u32> = AvlSet::new();
        let mut red_black: RedBlackSet<u32> = RedBlackSet::new();
        assert!(Container::print(&avl).is_ok());
        assert!(Container::print(&red_black).is_ok());

        for value in 0..8 {
            avl.add(value);
            red_black.add(value);
        }
        assert!(Container::print(&avl).is_ok());
        assert!(Container::print(&red_black).is_ok());
    }

    #[test]
    fn test_load_counts_new_values() {
        let mut avl: AvlSet<u32> = AvlSet::new();
        avl.add(2);
        assert_eq!(Container::load(&mut avl, "4 1 2 3 3".as_bytes()).unwrap(), 2);
        assert_eq!(avl.iter().cloned().collect::<Vec<u32>>(), vec![1, 2, 3]);
    }
}
