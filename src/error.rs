use std::{error, fmt};

/// Error enumerates over all possible errors that this package
/// shall return.
#[derive(Debug, PartialEq)]
pub enum Error<T> {
    /// Returned by root() when the tree has no entries.
    EmptyTree,
    /// Returned by load_from() API when an item is already present.
    DuplicateKey,
    /// Rotation was requested on a node lacking the child that should
    /// take its place. The String component names the rotation and node.
    InvalidRotation(String),
    /// Fatal case, root of a red-black tree must be black.
    RedRoot,
    /// Fatal case, a red node has a red parent.
    ConsecutiveReds,
    /// Fatal case, paths under a node carry different number of black
    /// nodes. The String component can be used for debugging.
    UnbalancedBlacks(String),
    /// Fatal case, tree entries are not in sort-order.
    SortError(T, T),
    /// Fatal case, (count, live-nodes) differ.
    CountMismatch(usize, usize),
}

impl<T> Error<T> {
    /// Name of the error variant, without its payload.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::EmptyTree => "EmptyTree",
            Error::DuplicateKey => "DuplicateKey",
            Error::InvalidRotation(_) => "InvalidRotation",
            Error::RedRoot => "RedRoot",
            Error::ConsecutiveReds => "ConsecutiveReds",
            Error::UnbalancedBlacks(_) => "UnbalancedBlacks",
            Error::SortError(_, _) => "SortError",
            Error::CountMismatch(_, _) => "CountMismatch",
        }
    }
}

impl<T> fmt::Display for Error<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyTree => write!(f, "empty tree"),
            Error::DuplicateKey => write!(f, "duplicate key"),
            Error::InvalidRotation(msg) => write!(f, "invalid rotation: {}", msg),
            Error::RedRoot => write!(f, "root is red"),
            Error::ConsecutiveReds => write!(f, "consecutive reds"),
            Error::UnbalancedBlacks(msg) => write!(f, "unbalanced blacks: {}", msg),
            Error::SortError(a, b) => write!(f, "sort error: {:?} vs {:?}", a, b),
            Error::CountMismatch(count, live) => {
                write!(f, "count mismatch: count {} live {}", count, live)
            }
        }
    }
}

impl<T> error::Error for Error<T> where T: fmt::Debug {}
