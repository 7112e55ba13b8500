//! Common traits and errors for heap data structures
//!
//! This module provides a two-tier trait hierarchy:
//!
//! - [`Heap`]: Base trait with the `BinaryHeap`-like push/peek/pop API
//! - [`MergeableHeap`]: Extended trait adding destructive union of two heaps
//!
//! Unlike `std::collections::BinaryHeap`, implementors are min-heaps and store
//! the ordered elements directly. A soft heap is allowed to return an element
//! out of order when its key has been corrupted, so "minimum" in the method
//! docs below means "minimum up to corruption" for [`SoftHeap`](crate::SoftHeap).

use thiserror::Error;

/// Error type for soft heap construction and extraction
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum HeapError {
    /// The error parameter was outside the open interval (0, 1)
    #[error("epsilon must be in (0, 1), got {0}")]
    InvalidEpsilon(f64),
    /// The integer form `1/ε` was too small to describe an epsilon below 1
    #[error("inverse epsilon must be at least 2, got {0}")]
    InvalidInverseEpsilon(u32),
    /// A heap was requested from a sequence with no elements
    #[error("cannot build a soft heap from an empty sequence")]
    EmptyInput,
    /// An extraction was attempted on a heap holding no elements
    #[error("cannot extract from an empty heap")]
    EmptyHeap,
}

impl HeapError {
    /// Returns true for errors caused by invalid construction parameters
    pub fn is_invalid_configuration(&self) -> bool {
        !matches!(self, HeapError::EmptyHeap)
    }
}

/// Base trait for heap/priority queue data structures
///
/// # Example
///
/// ```rust
/// use rust_soft_heaps::{Heap, SoftHeap};
///
/// let mut heap: SoftHeap<i32> = Heap::new();
/// heap.push(3);
/// heap.push(1);
/// heap.push(2);
///
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.pop(), Some(1));
/// ```
pub trait Heap<T: Ord> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element
    fn push(&mut self, item: T);

    /// Returns the element the next `pop` will return, without removing it
    fn peek(&self) -> Option<&T>;

    /// Removes and returns the minimum element, or `None` if the heap is empty
    fn pop(&mut self) -> Option<T>;
}

/// Heaps that support destructive union
pub trait MergeableHeap<T: Ord>: Heap<T> {
    /// Merges another heap into this one, consuming the other heap
    fn merge(&mut self, other: Self);
}
