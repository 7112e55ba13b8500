//! Trees of the soft heap forest.

use super::node::{CorruptionLog, Node};
use crate::rank::Rank;

/// A root node plus its position-relative suffix-minimum link.
///
/// `suffix_min` is the distance from this tree to the tree with the smallest
/// root ckey among itself and every tree after it in the forest. Storing a
/// distance rather than an index keeps the link valid when trees in front of
/// it are combined away or removed.
#[derive(Debug, Clone)]
pub(crate) struct Tree<T> {
    root: Box<Node<T>>,
    suffix_min: usize,
}

impl<T: Ord + Clone> Tree<T> {
    /// A rank-0 tree holding one element.
    pub(crate) fn new(item: T) -> Self {
        Self {
            root: Node::leaf(item),
            suffix_min: 0,
        }
    }

    pub(crate) fn rank(&self) -> Rank {
        self.root.rank()
    }

    pub(crate) fn ckey(&self) -> &T {
        self.root.ckey()
    }

    pub(crate) fn root(&self) -> &Node<T> {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Node<T> {
        &mut self.root
    }

    pub(crate) fn suffix_min(&self) -> usize {
        self.suffix_min
    }

    pub(crate) fn set_suffix_min(&mut self, distance: usize) {
        self.suffix_min = distance;
    }

    /// Combines `other` into this tree; this tree's root becomes the left
    /// child of the new root.
    pub(crate) fn absorb<L: CorruptionLog<T>>(
        &mut self,
        other: Tree<T>,
        threshold: Rank,
        log: &mut L,
    ) {
        debug_assert_eq!(self.rank(), other.rank());
        Node::combine(&mut self.root, other.root, threshold, log);
    }

    /// Moves every element of the tree into `out`.
    pub(crate) fn drain_into(self, out: &mut Vec<T>) {
        self.root.drain_into(out);
    }

    /// Whether the root has neither elements nor children left.
    pub(crate) fn is_drained(&self) -> bool {
        self.root.is_leaf() && self.root.group().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soft_heap::node::Untracked;

    #[test]
    fn test_new_tree() {
        let tree = Tree::new(3);
        assert_eq!(tree.rank(), 0);
        assert_eq!(*tree.ckey(), 3);
        assert_eq!(tree.suffix_min(), 0);
        assert!(!tree.is_drained());
    }

    #[test]
    fn test_absorb_grows_rank() {
        let mut tree = Tree::new(5);
        tree.absorb(Tree::new(2), 9, &mut Untracked);
        assert_eq!(tree.rank(), 1);
        assert_eq!(*tree.ckey(), 2);

        let mut other = Tree::new(8);
        other.absorb(Tree::new(1), 9, &mut Untracked);
        tree.absorb(other, 9, &mut Untracked);
        assert_eq!(tree.rank(), 2);
        assert_eq!(*tree.ckey(), 1);
        assert_eq!(tree.root().num_elements(), 4);
        assert!(tree.root().verify(9));
    }

    #[test]
    fn test_drained_after_popping_leaf() {
        let mut tree = Tree::new(1);
        assert_eq!(tree.root_mut().pop(&mut Untracked), Some(1));
        assert!(tree.is_drained());
    }
}
