//! Binary tree nodes and the sift rebalancing step.
//!
//! A node owns its two children exclusively. Sift refills an under-full bag
//! from the child with the smaller ckey, moving that child's whole bag up and
//! adopting its ckey. This is the only place where elements start sharing a
//! larger key than their own, so it is also where corruption is recorded.

use super::group::ElementGroup;
use crate::rank::{combined_rank, Rank};

/// Owned child slot; `None` once the child has been drained and released.
type Child<T> = Option<Box<Node<T>>>;

/// Sink for ckeys that become corrupted while elements move between nodes.
///
/// Sifts are generic over the log so the non-reporting variant compiles down
/// to the bare algorithm. Both variants move elements and presence flags
/// identically.
pub(crate) trait CorruptionLog<T> {
    fn record(&mut self, ckey: &T);
}

/// Log used by sifts whose caller does not want the corrupted list.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Untracked;

impl<T> CorruptionLog<T> for Untracked {
    #[inline]
    fn record(&mut self, _ckey: &T) {}
}

impl<T: Clone> CorruptionLog<T> for Vec<T> {
    #[inline]
    fn record(&mut self, ckey: &T) {
        self.push(ckey.clone());
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    group: ElementGroup<T>,
    rank: Rank,
    capacity: usize,
    left: Child<T>,
    right: Child<T>,
}

impl<T: Ord + Clone> Node<T> {
    /// Rank 0, capacity 1, holding one element that is its own ckey.
    pub(crate) fn leaf(item: T) -> Box<Self> {
        Box::new(Node {
            group: ElementGroup::singleton(item),
            rank: 0,
            capacity: 1,
            left: None,
            right: None,
        })
    }

    /// Replaces the node in `slot` with a new internal node whose children are
    /// the old node (left) and `sibling` (right), then sifts the new node.
    ///
    /// Capacity stays 1 up to the threshold rank and grows by one per rank
    /// above it.
    pub(crate) fn combine<L: CorruptionLog<T>>(
        slot: &mut Box<Self>,
        sibling: Box<Self>,
        threshold: Rank,
        log: &mut L,
    ) {
        let rank = combined_rank(slot.rank, sibling.rank);
        let capacity = if rank > threshold {
            slot.capacity.max(sibling.capacity) + 1
        } else {
            1
        };
        // Overwritten by the first pull of the sift below.
        let placeholder = slot.ckey().min(sibling.ckey()).clone();
        let parent = Box::new(Node {
            group: ElementGroup::empty(placeholder),
            rank,
            capacity,
            left: None,
            right: Some(sibling),
        });
        let left = std::mem::replace(slot, parent);
        slot.left = Some(left);
        slot.sift(log);
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub(crate) fn rank(&self) -> Rank {
        self.rank
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn ckey(&self) -> &T {
        self.group.ckey()
    }

    pub(crate) fn group(&self) -> &ElementGroup<T> {
        &self.group
    }

    pub(crate) fn left(&self) -> Option<&Node<T>> {
        self.left.as_deref()
    }

    pub(crate) fn right(&self) -> Option<&Node<T>> {
        self.right.as_deref()
    }

    /// Removes one element from this node's bag.
    pub(crate) fn pop<L: CorruptionLog<T>>(&mut self, log: &mut L) -> Option<T> {
        self.group.pop(log)
    }

    /// Whether an extraction has drained the bag far enough to need a refill.
    pub(crate) fn is_underfull(&self) -> bool {
        2 * self.group.len() < self.capacity
    }

    /// Refills the bag from the children until it reaches capacity or the node
    /// becomes a leaf.
    ///
    /// Each round pulls the entire bag of the child with the smaller ckey, so a
    /// bag can end up above capacity. Drained leaf children are released;
    /// drained internal children are sifted in turn.
    pub(crate) fn sift<L: CorruptionLog<T>>(&mut self, log: &mut L) {
        while self.group.len() < self.capacity && !self.is_leaf() {
            let take_left = match (&self.left, &self.right) {
                (Some(left), Some(right)) => left.ckey() <= right.ckey(),
                (Some(_), None) => true,
                (None, _) => false,
            };
            let slot = if take_left {
                &mut self.left
            } else {
                &mut self.right
            };
            let Some(child) = slot.as_mut() else {
                break;
            };

            self.group.absorb(&mut child.group, log);

            if child.is_leaf() {
                *slot = None;
            } else {
                child.sift(log);
            }
        }
    }

    /// Moves every element of the subtree into `out`.
    pub(crate) fn drain_into(self: Box<Self>, out: &mut Vec<T>) {
        let Node {
            group, left, right, ..
        } = *self;
        out.extend(group.into_elements());
        for child in [left, right].into_iter().flatten() {
            child.drain_into(out);
        }
    }

    /// Number of resident elements strictly below their node's ckey, over the
    /// whole subtree.
    pub(crate) fn num_corrupted(&self) -> usize {
        self.group.num_corrupted()
            + self.left().map_or(0, Node::num_corrupted)
            + self.right().map_or(0, Node::num_corrupted)
    }

    /// Number of elements stored in the subtree.
    pub(crate) fn num_elements(&self) -> usize {
        self.group.len()
            + self.left().map_or(0, Node::num_elements)
            + self.right().map_or(0, Node::num_elements)
    }

    /// Checks the subtree's ordering, capacity and bookkeeping invariants.
    pub(crate) fn verify(&self, threshold: Rank) -> bool {
        let ckey = self.ckey();
        if self.group.is_empty() {
            return false;
        }
        if self.group.elements().iter().any(|item| item > ckey) {
            return false;
        }
        if !self.group.presence_consistent() {
            return false;
        }
        if self.rank <= threshold && (self.capacity != 1 || self.group.len() > 1) {
            return false;
        }
        if self.group.len() > max_bag_len(self.capacity) {
            return false;
        }
        if self.is_leaf() && self.rank == 0 && self.group.len() != 1 {
            return false;
        }
        [self.left(), self.right()].into_iter().flatten().all(|child| {
            child.rank < self.rank
                && child.capacity <= self.capacity
                && child.ckey() >= ckey
                && child.verify(threshold)
        })
    }

    #[cfg(test)]
    pub(crate) fn with_parts(
        rank: Rank,
        capacity: usize,
        elements: Vec<T>,
        left: Child<T>,
        right: Child<T>,
    ) -> Box<Self> {
        Box::new(Node {
            group: ElementGroup::from_elements(elements),
            rank,
            capacity,
            left,
            right,
        })
    }

    #[cfg(test)]
    pub(crate) fn set_rank(&mut self, rank: Rank) {
        self.rank = rank;
    }
}

/// Largest bag a node of the given capacity can hold.
///
/// A refill starts only below capacity and then pulls a whole child bag, whose
/// capacity is at least one smaller. Unrolling `B(c) = (c - 1) + B(c - 1)` with
/// `B(1) = 1` gives `1 + c(c - 1)/2`.
pub(crate) fn max_bag_len(capacity: usize) -> usize {
    1 + capacity * capacity.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(node: &Node<i32>) -> Vec<i32> {
        let mut elements = node.group().elements().to_vec();
        elements.sort_unstable();
        elements
    }

    #[test]
    fn test_leaf() {
        let node = Node::leaf(4);
        assert!(node.is_leaf());
        assert_eq!(node.rank(), 0);
        assert_eq!(node.capacity(), 1);
        assert_eq!(*node.ckey(), 4);
        assert!(node.verify(9));
    }

    #[test]
    fn test_sift_fills_from_smaller_child() {
        let left = Node::with_parts(9, 1, vec![2], None, None);
        let right = Node::with_parts(9, 1, vec![4], None, None);
        let mut node = Node::with_parts(10, 2, vec![1], Some(left), Some(right));

        node.sift(&mut Untracked);

        assert_eq!(sorted(&node), vec![1, 2]);
        assert_eq!(*node.ckey(), 2);
        assert!(node.left().is_none());
        let right = node.right().expect("right child survives");
        assert!(right.is_leaf());
        assert_eq!(*right.ckey(), 4);
    }

    #[test]
    fn test_combine_above_threshold() {
        let mut slot = Node::leaf(2);
        slot.set_rank(9);
        let mut sibling = Node::leaf(4);
        sibling.set_rank(9);

        Node::combine(&mut slot, sibling, 9, &mut Untracked);

        assert_eq!(slot.rank(), 10);
        assert_eq!(slot.capacity(), 2);
        assert_eq!(sorted(&slot), vec![2, 4]);
        assert_eq!(*slot.ckey(), 4);
        assert!(slot.is_leaf());
        assert_eq!(slot.num_corrupted(), 1);
    }

    #[test]
    fn test_recursive_combine() {
        let left = Node::with_parts(9, 1, vec![2], None, None);
        let right = Node::with_parts(9, 1, vec![4], None, None);
        let mut slot = Node::with_parts(10, 2, vec![1, 3], Some(left), Some(right));
        let mut sibling = Node::leaf(5);
        sibling.set_rank(9);

        Node::combine(&mut slot, sibling, 9, &mut Untracked);

        assert_eq!(slot.rank(), 11);
        assert_eq!(slot.capacity(), 3);
        assert_eq!(sorted(&slot), vec![1, 2, 3, 4]);
        assert_eq!(*slot.ckey(), 4);
        assert!(slot.left().is_none());
        assert_eq!(slot.right().map(|n| *n.ckey()), Some(5));
        // Four elements at capacity three is the documented overshoot.
        assert_eq!(max_bag_len(3), 4);
    }

    #[test]
    fn test_combine_below_threshold_is_exact() {
        let mut slot = Node::leaf(7);
        Node::combine(&mut slot, Node::leaf(3), 9, &mut Untracked);

        assert_eq!(slot.rank(), 1);
        assert_eq!(slot.capacity(), 1);
        assert_eq!(slot.group().elements(), &[3]);
        assert!(slot.group().ckey_present());
        assert_eq!(slot.left().map(|n| *n.ckey()), Some(7));
        assert!(slot.right().is_none());
        assert_eq!(slot.num_corrupted(), 0);
        assert!(slot.verify(9));
    }

    #[test]
    fn test_tracked_sift_records_pulled_ckeys() {
        let mut slot = Node::leaf(2);
        slot.set_rank(9);
        let mut sibling = Node::leaf(4);
        sibling.set_rank(9);
        let mut log = Vec::new();

        Node::combine(&mut slot, sibling, 8, &mut log);

        assert_eq!(slot.capacity(), 2);
        assert_eq!(log, vec![2, 4]);
        // 4 moved up with its bag and is still unreported at the root.
        assert!(slot.group().ckey_present());
        assert!(slot.is_leaf());

        let mut log = Vec::new();
        assert_eq!(slot.pop(&mut log), Some(4));
        assert_eq!(log, vec![4]);
        assert!(!slot.group().ckey_present());
    }

    #[test]
    fn test_sift_propagates_flag_with_or_without_log() {
        let mut slot = Node::leaf(1);
        Node::combine(&mut slot, Node::leaf(2), 9, &mut Untracked);
        assert!(slot.group().ckey_present());

        let mut slot = Node::leaf(1);
        let mut log = Vec::new();
        Node::combine(&mut slot, Node::leaf(2), 9, &mut log);
        assert!(slot.group().ckey_present());
        assert_eq!(log, vec![1]);
        assert!(slot.verify(9));
    }

    #[test]
    fn test_verify_rejects_stale_presence_flag() {
        let mut node = Node::with_parts(10, 2, vec![1, 3], None, None);
        assert!(node.verify(9));
        node.group.set_ckey_present(false);
        assert!(!node.verify(9));

        let mut node = Node::with_parts(10, 2, vec![1, 3], None, None);
        node.pop(&mut Untracked);
        node.group.set_ckey_present(true);
        assert!(!node.verify(9));
    }

    #[test]
    fn test_drain_into_collects_subtree() {
        let left = Node::with_parts(9, 1, vec![2], None, None);
        let right = Node::with_parts(9, 1, vec![4], None, None);
        let node = Node::with_parts(10, 2, vec![1, 3], Some(left), Some(right));
        let mut out = Vec::new();

        node.drain_into(&mut out);

        out.sort_unstable();
        assert_eq!(out, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_max_bag_len() {
        assert_eq!(max_bag_len(1), 1);
        assert_eq!(max_bag_len(2), 2);
        assert_eq!(max_bag_len(3), 4);
        assert_eq!(max_bag_len(4), 7);
    }
}
