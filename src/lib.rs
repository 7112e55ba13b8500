//! Soft Heaps for Rust
//!
//! This crate provides a soft heap: an approximate, meldable priority queue
//! that may report a bounded fraction of its elements with an inflated key in
//! exchange for constant amortized time on every operation but insert.
//!
//! # Features
//!
//! - **Soft Heap**: O(1) amortized extract-min and meld; O(log(1/ε)) amortized insert
//! - **Bounded corruption**: at most `ε·n` of `n` inserted elements are ever reported out
//!   of order
//! - **Corruption reports**: `extract_min_c` returns the keys that became unreliable, for
//!   consumers such as selection algorithms that must re-validate them
//! - **Exact small heaps**: below `2^(r+1)` elements the heap behaves like an exact priority queue
//!
//! # Example
//!
//! ```rust
//! use rust_soft_heaps::{SoftHeap, SoftHeapConfig};
//!
//! let mut heap = SoftHeap::with_config(SoftHeapConfig::new(0.25).unwrap());
//! heap.extend([5, 3, 8]);
//!
//! let mut other = SoftHeap::with_element(1, 0.25).unwrap();
//! other.insert(4);
//! heap.meld(other);
//!
//! assert_eq!(heap.extract_min(), Ok(1));
//! let (next, _corrupted) = heap.extract_min_c().unwrap();
//! assert_eq!(next, 3);
//! assert_eq!(heap.len(), 3);
//! assert_eq!(heap.num_corrupted_keys(), 0);
//! ```

pub mod config;
pub mod rank;
pub mod soft_heap;
pub mod traits;

// Re-export the main types for convenience
pub use config::SoftHeapConfig;
pub use soft_heap::SoftHeap;
pub use traits::{Heap, HeapError, MergeableHeap};
