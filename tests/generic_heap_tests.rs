//! Generic tests for Heap implementations
//!
//! These tests only use the trait interface. They run against the soft heap
//! and against a `BinaryHeap`-backed reference heap, so a failure in one but
//! not the other points at the soft heap. All sizes stay below `2^(r+1)` for
//! the default threshold, where a soft heap is exact.

use rust_soft_heaps::{Heap, MergeableHeap, SoftHeap};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Exact min-heap used as the reference implementation
struct ReferenceHeap(BinaryHeap<Reverse<i32>>);

impl Heap<i32> for ReferenceHeap {
    fn new() -> Self {
        ReferenceHeap(BinaryHeap::new())
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn push(&mut self, item: i32) {
        self.0.push(Reverse(item));
    }

    fn peek(&self) -> Option<&i32> {
        self.0.peek().map(|Reverse(item)| item)
    }

    fn pop(&mut self) -> Option<i32> {
        self.0.pop().map(|Reverse(item)| item)
    }
}

impl MergeableHeap<i32> for ReferenceHeap {
    fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

// Test helpers that work with any MergeableHeap implementation

/// Test that empty heap behaves correctly
fn test_empty_heap<H: MergeableHeap<i32>>() {
    let mut heap = H::new();
    assert!(heap.is_empty());
    assert_eq!(heap.len(), 0);
    assert_eq!(heap.peek(), None);
    assert_eq!(heap.pop(), None);
}

/// Test basic push and pop operations
fn test_basic_operations<H: MergeableHeap<i32>>() {
    let mut heap = H::new();

    heap.push(5);
    heap.push(1);
    heap.push(10);
    heap.push(3);

    assert!(!heap.is_empty());
    assert_eq!(heap.len(), 4);
    assert_eq!(heap.peek(), Some(&1));

    assert_eq!(heap.pop(), Some(1));
    assert_eq!(heap.pop(), Some(3));
    assert_eq!(heap.pop(), Some(5));
    assert_eq!(heap.pop(), Some(10));
    assert_eq!(heap.pop(), None);
    assert!(heap.is_empty());
}

/// Test duplicate values
fn test_duplicates<H: MergeableHeap<i32>>() {
    let mut heap = H::new();
    for value in [4, 2, 4, 2, 4, 1, 1] {
        heap.push(value);
    }

    let mut popped = Vec::new();
    while let Some(value) = heap.pop() {
        popped.push(value);
    }
    assert_eq!(popped, vec![1, 1, 2, 2, 4, 4, 4]);
}

/// Test merge with empty and non-empty sides
fn test_merge_operations<H: MergeableHeap<i32>>() {
    let mut heap1 = H::new();
    let mut heap2 = H::new();

    heap1.push(5);
    heap1.push(15);
    heap2.push(3);
    heap2.push(10);
    heap2.push(20);

    heap1.merge(heap2);
    assert_eq!(heap1.len(), 5);
    assert_eq!(heap1.peek(), Some(&3));

    heap1.merge(H::new());
    assert_eq!(heap1.len(), 5);

    let mut empty = H::new();
    empty.merge(heap1);
    assert_eq!(empty.len(), 5);

    let mut popped = Vec::new();
    while let Some(value) = empty.pop() {
        popped.push(value);
    }
    assert_eq!(popped, vec![3, 5, 10, 15, 20]);
}

/// Test interleaved push, pop and merge against a sorted model
fn test_interleaved_operations<H: MergeableHeap<i32>>() {
    let mut heap = H::new();
    let mut model: Vec<i32> = Vec::new();

    for round in 0..40 {
        for offset in 0..5 {
            let value = (round * 37 + offset * 11) % 101;
            heap.push(value);
            model.push(value);
        }

        let mut other = H::new();
        for offset in 0..3 {
            let value = (round * 13 + offset * 29) % 89;
            other.push(value);
            model.push(value);
        }
        heap.merge(other);

        model.sort_unstable_by(|a, b| b.cmp(a));
        for _ in 0..4 {
            assert_eq!(heap.pop(), model.pop());
        }
        assert_eq!(heap.len(), model.len());
    }
}

/// Test a descending insertion order
fn test_reverse_order<H: MergeableHeap<i32>>() {
    let mut heap = H::new();
    for value in (0..500).rev() {
        heap.push(value);
    }
    for expected in 0..500 {
        assert_eq!(heap.pop(), Some(expected));
    }
    assert!(heap.is_empty());
}

#[test]
fn test_soft_heap_empty() {
    test_empty_heap::<SoftHeap<i32>>();
}

#[test]
fn test_soft_heap_basic_operations() {
    test_basic_operations::<SoftHeap<i32>>();
}

#[test]
fn test_soft_heap_duplicates() {
    test_duplicates::<SoftHeap<i32>>();
}

#[test]
fn test_soft_heap_merge_operations() {
    test_merge_operations::<SoftHeap<i32>>();
}

#[test]
fn test_soft_heap_interleaved_operations() {
    test_interleaved_operations::<SoftHeap<i32>>();
}

#[test]
fn test_soft_heap_reverse_order() {
    test_reverse_order::<SoftHeap<i32>>();
}

#[test]
fn test_reference_heap_empty() {
    test_empty_heap::<ReferenceHeap>();
}

#[test]
fn test_reference_heap_basic_operations() {
    test_basic_operations::<ReferenceHeap>();
}

#[test]
fn test_reference_heap_duplicates() {
    test_duplicates::<ReferenceHeap>();
}

#[test]
fn test_reference_heap_merge_operations() {
    test_merge_operations::<ReferenceHeap>();
}

#[test]
fn test_reference_heap_interleaved_operations() {
    test_interleaved_operations::<ReferenceHeap>();
}

#[test]
fn test_reference_heap_reverse_order() {
    test_reverse_order::<ReferenceHeap>();
}
