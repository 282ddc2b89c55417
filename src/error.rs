//! Error types for cursors and handles.
//!
//! Looking up a missing key is not an error: [`AvlTree::find`] returns
//! [`None`] and [`AvlTree::erase`] returns `false`. The variants here are
//! precondition violations (walking a cursor off either end, resolving a
//! handle to an erased node or one issued by another tree) and allocation
//! failure on
//! [`AvlTree::try_insert`].
//!
//! [`AvlTree::find`]: crate::AvlTree::find
//! [`AvlTree::erase`]: crate::AvlTree::erase
//! [`AvlTree::try_insert`]: crate::AvlTree::try_insert

use std::collections::TryReserveError;

use thiserror::Error;

use crate::avl::NodeId;

/// Errors returned by cursor movement, handle resolution and fallible insertion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The cursor is past the end, so there is no key to read and no next position.
    #[error("cursor is past the end of the tree")]
    PastTheEnd,

    /// The cursor is at the first element, and nothing precedes it.
    #[error("cursor is already at the first element")]
    BeforeBegin,

    /// The handle's node has been erased from this tree.
    #[error("node handle {0:?} does not refer to a live node")]
    StaleHandle(NodeId),

    /// The handle was issued by a different tree, possibly one this tree was cloned from.
    #[error("node handle {0:?} belongs to another tree")]
    ForeignHandle(NodeId),

    /// Reserving space for a new node failed. The tree is unchanged.
    #[error("failed to reserve space for a new node: {0}")]
    AllocationFailed(#[from] TryReserveError),
}

pub type Result<T> = std::result::Result<T, Error>;
