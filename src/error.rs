//! Error types shared by the set containers.

use std::error;
use std::fmt;
use std::io;
use std::result;

/// Errors produced while bulk loading values into a container.
#[derive(Debug)]
pub enum Error {
    IOError(io::Error),
    /// The leading count was absent or not a non-negative integer.
    InvalidCount(String),
    /// The value at `index` (zero-based, after the count) could not be parsed.
    InvalidValue { index: usize, token: String },
    /// The input ended after `found` of the `expected` values.
    Truncated { expected: usize, found: usize },
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IOError(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::IOError(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IOError(error) => write!(f, "{}", error),
            Error::InvalidCount(token) => write!(f, "invalid value count `{}`", token),
            Error::InvalidValue { index, token } => {
                write!(f, "invalid value `{}` at position {}", token, index)
            },
            Error::Truncated { expected, found } => {
                write!(f, "expected {} values, found {}", expected, found)
            },
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// A broken structural rule found by `check_invariants`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InvariantViolation {
    /// The root node has a parent link.
    RootHasParent,
    /// A child does not point back at the node holding it.
    ParentMismatch,
    /// An in-order traversal is not strictly increasing.
    OrderViolation,
    /// The number of reachable nodes differs from the number of stored nodes.
    LengthMismatch { stored: usize, reachable: usize },
    /// A cached AVL height differs from the height of the subtree.
    HeightMismatch { cached: usize, actual: usize },
    /// An AVL node has a balance factor outside of `-1..=1`.
    Unbalanced { balance: isize },
    /// The red-black root is red.
    RedRoot,
    /// A red node has a red child.
    RedChildOfRed,
    /// Two root-to-leaf paths cross a different number of black nodes.
    BlackHeightMismatch { left: usize, right: usize },
}

impl error::Error for InvariantViolation {}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvariantViolation::RootHasParent => write!(f, "root has a parent"),
            InvariantViolation::ParentMismatch => write!(f, "child does not link back to parent"),
            InvariantViolation::OrderViolation => write!(f, "values are not in strict order"),
            InvariantViolation::LengthMismatch { stored, reachable } => write!(
                f,
                "{} nodes stored but {} reachable from the root",
                stored, reachable,
            ),
            InvariantViolation::HeightMismatch { cached, actual } => {
                write!(f, "cached height {} but subtree height {}", cached, actual)
            },
            InvariantViolation::Unbalanced { balance } => {
                write!(f, "balance factor {} out of range", balance)
            },
            InvariantViolation::RedRoot => write!(f, "root is red"),
            InvariantViolation::RedChildOfRed => write!(f, "red node has a red child"),
            InvariantViolation::BlackHeightMismatch { left, right } => write!(
                f,
                "black height {} on the left but {} on the right",
                left, right,
            ),
        }
    }
}
