//! The rank-ordered forest behind a soft heap.
//!
//! Trees are kept in a `Vec` sorted by strictly increasing rank, so the
//! forest reads like the binary representation of the number of insertions:
//! melding is binary addition, with equal-rank trees combined into a carry.
//!
//! Every tree carries a suffix-minimum link (see [`Tree`]). The head's link
//! names the tree whose root has the globally smallest ckey, which is where
//! every extraction happens. Links are recomputed eagerly, right to left, from
//! the last position a mutation touched back to the head.

use super::node::CorruptionLog;
use super::tree::Tree;
use crate::rank::Rank;
use std::mem;
use tracing::trace;

#[derive(Debug, Clone)]
pub(crate) struct Forest<T> {
    trees: Vec<Tree<T>>,
}

impl<T> Default for Forest<T> {
    fn default() -> Self {
        Self { trees: Vec::new() }
    }
}

impl<T: Ord + Clone> Forest<T> {
    pub(crate) fn singleton(item: T) -> Self {
        Self {
            trees: vec![Tree::new(item)],
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub(crate) fn trees(&self) -> &[Tree<T>] {
        &self.trees
    }

    /// Rank of the last (highest-rank) tree.
    pub(crate) fn rank(&self) -> Option<Rank> {
        self.trees.last().map(Tree::rank)
    }

    /// Index of the tree holding the smallest root ckey.
    pub(crate) fn min_index(&self) -> Option<usize> {
        self.trees.first().map(Tree::suffix_min)
    }

    /// The element the next extraction returns.
    pub(crate) fn peek(&self) -> Option<&T> {
        let index = self.min_index()?;
        self.trees[index].root().group().last()
    }

    /// Adds a single element.
    ///
    /// Equivalent to melding a one-tree forest, without the merge pass: the
    /// leading run of trees with ranks `0, 1, 2, ...` is folded into the new
    /// leaf exactly the way carry propagation would fold it.
    pub(crate) fn insert<L: CorruptionLog<T>>(&mut self, item: T, threshold: Rank, log: &mut L) {
        let leaf = Tree::new(item);
        let run = self
            .trees
            .iter()
            .zip(0..=Rank::MAX)
            .take_while(|(tree, rank)| tree.rank() == *rank)
            .count();

        let carry = if run == 0 {
            leaf
        } else {
            let mut drained = self.trees.drain(..run);
            let mut carry = match drained.next() {
                Some(mut first) => {
                    first.absorb(leaf, threshold, log);
                    first
                }
                None => leaf,
            };
            for tree in drained {
                carry.absorb(tree, threshold, log);
            }
            carry
        };

        if run > 0 {
            trace!(carries = run, rank = carry.rank(), "insert carried into higher rank");
        }
        self.trees.insert(0, carry);
        self.update_suffix_min(0);
    }

    /// Destructive union with `other`.
    ///
    /// The forests are merged by rank with this forest's trees first among
    /// equal ranks, then equal-rank neighbours are combined left to right.
    /// Carrying stops once it passes the highest rank of the smaller forest,
    /// beyond which only one forest contributes trees.
    pub(crate) fn meld<L: CorruptionLog<T>>(
        &mut self,
        mut other: Forest<T>,
        threshold: Rank,
        log: &mut L,
    ) {
        let (Some(own_rank), Some(other_rank)) = (self.rank(), other.rank()) else {
            if self.is_empty() {
                mem::swap(self, &mut other);
            }
            return;
        };
        if other_rank > own_rank {
            mem::swap(&mut self.trees, &mut other.trees);
        }
        let stop_rank = own_rank.min(other_rank);

        self.trees = merge_by_rank(mem::take(&mut self.trees), other.trees);
        let stop = self.carry(stop_rank, threshold, log);
        trace!(stop, stop_rank, trees = self.trees.len(), "melded forests");
        self.update_suffix_min(stop);
    }

    /// Combines adjacent equal-rank trees until no collision can remain.
    ///
    /// Returns the position where carrying stopped. Three equal ranks in a row
    /// (two inputs plus a carry) leave the first in place and combine the other
    /// two, which keeps the sequence sorted.
    fn carry<L: CorruptionLog<T>>(
        &mut self,
        stop_rank: Rank,
        threshold: Rank,
        log: &mut L,
    ) -> usize {
        let mut i = 0;
        while i + 1 < self.trees.len() {
            let rank = self.trees[i].rank();
            if rank == self.trees[i + 1].rank() {
                if self.trees.get(i + 2).is_some_and(|tree| tree.rank() == rank) {
                    i += 1;
                    continue;
                }
                let absorbed = self.trees.remove(i + 1);
                self.trees[i].absorb(absorbed, threshold, log);
            } else if rank > stop_rank {
                break;
            } else {
                i += 1;
            }
        }
        i
    }

    /// Removes and returns one element from the tree with the smallest ckey.
    ///
    /// A root drained below half its capacity is refilled by a sift; a leaf
    /// root left empty takes its tree out of the forest.
    pub(crate) fn extract<L: CorruptionLog<T>>(&mut self, log: &mut L) -> Option<T> {
        let index = self.min_index()?;
        let root = self.trees[index].root_mut();
        // Roots never hold an empty bag between operations.
        let item = root.pop(log)?;

        if root.is_underfull() {
            if !root.is_leaf() {
                root.sift(log);
                self.update_suffix_min(index);
            } else if self.trees[index].is_drained() {
                let removed = self.trees.remove(index);
                trace!(rank = removed.rank(), index, "removed drained tree");
                if let Some(previous) = index.checked_sub(1) {
                    self.update_suffix_min(previous);
                }
            }
        }
        Some(item)
    }

    /// Recomputes suffix-minimum links from `from` back to the head.
    ///
    /// Ties keep the earlier tree.
    pub(crate) fn update_suffix_min(&mut self, from: usize) {
        let Some(last) = self.trees.len().checked_sub(1) else {
            return;
        };
        for i in (0..=from.min(last)).rev() {
            let distance = if i == last {
                0
            } else {
                let next_min = i + 1 + self.trees[i + 1].suffix_min();
                if self.trees[i].ckey() <= self.trees[next_min].ckey() {
                    0
                } else {
                    next_min - i
                }
            };
            self.trees[i].set_suffix_min(distance);
        }
    }

    /// Every element in the forest, in no particular order.
    pub(crate) fn into_elements(self) -> Vec<T> {
        let mut out = Vec::new();
        for tree in self.trees {
            tree.drain_into(&mut out);
        }
        out
    }

    pub(crate) fn num_corrupted(&self) -> usize {
        self.trees.iter().map(|tree| tree.root().num_corrupted()).sum()
    }

    pub(crate) fn num_elements(&self) -> usize {
        self.trees.iter().map(|tree| tree.root().num_elements()).sum()
    }

    /// Checks rank order, suffix-minimum links and every tree's nodes.
    pub(crate) fn verify(&self, threshold: Rank) -> bool {
        let ranks_increase = self
            .trees
            .windows(2)
            .all(|pair| pair[0].rank() < pair[1].rank());
        if !ranks_increase {
            return false;
        }
        let mut expected_min: Option<usize> = None;
        for (i, tree) in self.trees.iter().enumerate().rev() {
            let min = match expected_min {
                Some(next) if self.trees[next].ckey() < tree.ckey() => next,
                _ => i,
            };
            if i + tree.suffix_min() != min {
                return false;
            }
            expected_min = Some(min);
        }
        self.trees.iter().all(|tree| tree.root().verify(threshold))
    }
}

/// Stable merge of two rank-sorted tree sequences; `first` wins ties.
fn merge_by_rank<T: Ord + Clone>(first: Vec<Tree<T>>, second: Vec<Tree<T>>) -> Vec<Tree<T>> {
    let mut merged = Vec::with_capacity(first.len() + second.len());
    let mut first = first.into_iter().peekable();
    let mut second = second.into_iter().peekable();
    loop {
        let take_first = match (first.peek(), second.peek()) {
            (Some(a), Some(b)) => a.rank() <= b.rank(),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_first { first.next() } else { second.next() };
        merged.extend(next);
    }
    merged
}
