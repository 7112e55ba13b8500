//! Soft Heap implementation
//!
//! A soft heap is an approximate meldable priority queue. It may raise the key
//! of some elements ("corrupt" them) so that elements can travel in groups,
//! and in exchange every operation runs in amortized constant time except
//! insert, which is `O(log(1/ε))`:
//! - O(1) amortized extract_min and meld
//! - At most `ε·n` of the `n` inserted elements are ever corrupted
//!
//! # Algorithm Overview
//!
//! The heap is a forest of binary trees kept in strictly increasing rank
//! order, much like a binomial heap:
//! - Inserting adds a rank-0 tree and carries equal-rank trees upward
//! - Melding merges two forests by rank and carries the same way
//! - Each tree remembers which later tree has the smallest root key, so the
//!   minimum is found in O(1)
//!
//! **Nodes and bags**: every node holds a bag of elements that share one key,
//! the *ckey*, which bounds every element in the bag from above. Nodes of rank
//! at most `r = ceil(log₂(1/ε)) + 5` hold a single element, so small heaps are
//! exact. Above `r` a node's capacity grows by one per rank.
//!
//! **Sift**: when a bag runs low, the node pulls the whole bag of the child
//! with the smaller ckey and adopts that ckey. Elements whose own key is below
//! the adopted ckey are now corrupted.
//!
//! **Corruption reporting**: [`SoftHeap::extract_min_c`] returns, along with
//! the extracted element, the ckeys whose defining element was still inside a
//! bag when the bag was moved under a larger key. Consumers that mirror the
//! heap's contents elsewhere use this list to re-validate their view.
//!
//! # Example
//!
//! ```rust
//! use rust_soft_heaps::SoftHeap;
//!
//! let mut heap = SoftHeap::from_elements([5, 3, 8, 1, 9, 2], 0.5).unwrap();
//! assert_eq!(heap.len(), 6);
//!
//! let mut extracted = Vec::new();
//! while let Ok(item) = heap.extract_min() {
//!     extracted.push(item);
//! }
//! // Six elements never reach a rank above the threshold, so no key is
//! // corrupted.
//! assert_eq!(extracted, vec![1, 2, 3, 5, 8, 9]);
//! ```

mod forest;
mod group;
mod node;
mod tree;

use crate::config::SoftHeapConfig;
use crate::rank::Rank;
use crate::traits::{Heap, HeapError, MergeableHeap};
use forest::Forest;
use node::Untracked;
use std::mem;
use tracing::debug;

/// An approximate meldable min-heap with a bounded fraction of corrupted keys
#[derive(Debug, Clone)]
pub struct SoftHeap<T> {
    forest: Forest<T>,
    config: SoftHeapConfig,
    len: usize,
    /// Corrupted ckeys found by inserts and melds since the last extraction,
    /// when tracking is enabled.
    pending: Vec<T>,
}

impl<T: Ord + Clone> Default for SoftHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> SoftHeap<T> {
    /// Creates an empty heap with the default configuration (`ε = 0.1`)
    pub fn new() -> Self {
        Self::with_config(SoftHeapConfig::default())
    }

    /// Creates an empty heap with the given configuration
    pub fn with_config(config: SoftHeapConfig) -> Self {
        Self {
            forest: Forest::default(),
            config,
            len: 0,
            pending: Vec::new(),
        }
    }

    /// Creates a heap holding one element
    pub fn singleton(item: T, config: SoftHeapConfig) -> Self {
        Self {
            forest: Forest::singleton(item),
            config,
            len: 1,
            pending: Vec::new(),
        }
    }

    /// Creates a heap holding one element with error parameter `epsilon`
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::InvalidEpsilon`] unless `0 < epsilon < 1`.
    pub fn with_element(item: T, epsilon: f64) -> Result<Self, HeapError> {
        Ok(Self::singleton(item, SoftHeapConfig::new(epsilon)?))
    }

    /// Builds a heap from the first element and inserts the rest in order
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::InvalidEpsilon`] unless `0 < epsilon < 1`, and
    /// [`HeapError::EmptyInput`] if `elements` yields nothing.
    pub fn from_elements<I>(elements: I, epsilon: f64) -> Result<Self, HeapError>
    where
        I: IntoIterator<Item = T>,
    {
        let config = SoftHeapConfig::new(epsilon)?;
        let mut elements = elements.into_iter();
        let first = elements.next().ok_or(HeapError::EmptyInput)?;
        let mut heap = Self::singleton(first, config);
        heap.extend(elements);
        Ok(heap)
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the heap holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the heap's configuration
    pub fn config(&self) -> &SoftHeapConfig {
        &self.config
    }

    /// Returns the error parameter `ε`
    pub fn epsilon(&self) -> f64 {
        self.config.epsilon()
    }

    /// Returns the structural threshold `r`
    pub fn threshold(&self) -> Rank {
        self.config.threshold()
    }

    /// Rank of the highest-rank tree, or `None` for an empty heap
    pub fn rank(&self) -> Option<Rank> {
        self.forest.rank()
    }

    /// Ranks of the trees from lowest to highest
    pub fn ranks(&self) -> Vec<Rank> {
        self.forest.trees().iter().map(|tree| tree.rank()).collect()
    }

    /// Returns the element the next extraction will return
    pub fn peek(&self) -> Option<&T> {
        self.forest.peek()
    }

    /// Inserts an element
    ///
    /// Produces exactly the forest that melding a one-element heap would.
    pub fn insert(&mut self, item: T) {
        let threshold = self.config.threshold();
        if self.config.tracks_corruption() {
            self.forest.insert(item, threshold, &mut self.pending);
        } else {
            self.forest.insert(item, threshold, &mut Untracked);
        }
        self.len += 1;
    }

    /// Destructive union: moves every element of `other` into this heap
    ///
    /// The receiver keeps its configuration, unless it is empty, in which case
    /// it becomes `other` wholesale. Pending corruption reports of both heaps
    /// are kept.
    ///
    /// Trees built under a different threshold do not satisfy this heap's
    /// capacity rules, so when the thresholds differ the elements of `other`
    /// are inserted one at a time instead of melding the forests. That costs
    /// `O(m log(1/ε))` for `m` elements; equal thresholds meld in `O(log n)`.
    pub fn meld(&mut self, mut other: SoftHeap<T>) {
        if self.is_empty() {
            let mut pending = mem::take(&mut self.pending);
            mem::swap(self, &mut other);
            pending.append(&mut self.pending);
            self.pending = pending;
            return;
        }
        self.pending.append(&mut other.pending);
        if other.is_empty() {
            return;
        }

        let threshold = self.config.threshold();
        if other.config.threshold() != threshold {
            debug!(
                threshold,
                other_threshold = other.config.threshold(),
                elements = other.len,
                "re-inserting elements melded across thresholds"
            );
            for item in other.forest.into_elements() {
                self.insert(item);
            }
            return;
        }
        if self.config.tracks_corruption() {
            self.forest.meld(other.forest, threshold, &mut self.pending);
        } else {
            self.forest.meld(other.forest, threshold, &mut Untracked);
        }
        self.len += other.len;
    }

    /// Removes and returns the element with the smallest ckey
    ///
    /// The returned element is at most every uncorrupted element still in the
    /// heap. Corruption reports queued by earlier inserts and melds are
    /// discarded; use [`extract_min_c`](Self::extract_min_c) to receive them.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::EmptyHeap`] if the heap holds no elements.
    pub fn extract_min(&mut self) -> Result<T, HeapError> {
        let item = self
            .forest
            .extract(&mut Untracked)
            .ok_or(HeapError::EmptyHeap)?;
        self.pending.clear();
        self.len -= 1;
        Ok(item)
    }

    /// Like [`extract_min`](Self::extract_min), also returning the ckeys that
    /// became corrupted
    ///
    /// The list holds every ckey whose defining element was moved into a bag
    /// under a larger key during this extraction, plus the extracted element
    /// itself when it was the ckey of its bag. With corruption tracking enabled
    /// it also holds everything queued by inserts and melds since the previous
    /// extraction.
    ///
    /// An element can be reported more than once, for example when its bag is
    /// moved again before it leaves the heap. Consumers that act on reports
    /// should remember what they have already handled.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::EmptyHeap`] if the heap holds no elements.
    pub fn extract_min_c(&mut self) -> Result<(T, Vec<T>), HeapError> {
        if self.is_empty() {
            return Err(HeapError::EmptyHeap);
        }
        let mut corrupted = mem::take(&mut self.pending);
        let item = self
            .forest
            .extract(&mut corrupted)
            .ok_or(HeapError::EmptyHeap)?;
        self.len -= 1;
        Ok((item, corrupted))
    }

    /// Counts resident elements whose key is strictly below their bag's ckey
    ///
    /// Walks the whole forest.
    pub fn num_corrupted_keys(&self) -> usize {
        self.forest.num_corrupted()
    }

    /// Verify internal structure invariants (for testing)
    ///
    /// Checks that:
    /// - Tree ranks strictly increase along the forest
    /// - Every suffix-minimum link names the smallest root ckey after it
    /// - Every element is at most its bag's ckey, and children's ckeys are at
    ///   least their parent's
    /// - Nodes up to the threshold rank hold at most one element, and larger
    ///   bags stay within the refill bound for their capacity
    /// - The element count matches the running length
    pub fn verify_internal_structure(&self) -> bool {
        self.forest.verify(self.config.threshold()) && self.forest.num_elements() == self.len
    }
}

impl<T: Ord + Clone> FromIterator<T> for SoftHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}

impl<T: Ord + Clone> Extend<T> for SoftHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: Ord + Clone> Heap<T> for SoftHeap<T> {
    fn new() -> Self {
        Self::with_config(SoftHeapConfig::default())
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, item: T) {
        self.insert(item);
    }

    fn peek(&self) -> Option<&T> {
        self.forest.peek()
    }

    fn pop(&mut self) -> Option<T> {
        self.extract_min().ok()
    }
}

impl<T: Ord + Clone> MergeableHeap<T> for SoftHeap<T> {
    fn merge(&mut self, other: Self) {
        self.meld(other);
    }
}
