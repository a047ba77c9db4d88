//! Self-balancing ordered sets backed by an index-addressed node arena.
//!
//! Two containers are provided: `AvlSet`, which keeps subtree heights within one of each other,
//! and `RedBlackSet`, which keeps a coloring that bounds the longest path to twice the shortest.
//! Both implement the `Container` trait and expose `check_invariants` for verifying their shape.

mod arena;
mod binary_tree;
mod container;
pub mod avl_tree;
pub mod error;
pub mod load;
pub mod red_black_tree;

pub use crate::arena::DEFAULT_CHUNK_SIZE;
pub use crate::container::Container;
pub use crate::error::{Error, InvariantViolation, Result};
