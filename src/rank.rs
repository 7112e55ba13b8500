//! Node and tree ranks.
//!
//! Leaves have rank 0, and combining two nodes yields one more than the larger
//! of their ranks. Since only equal-rank trees are ever combined, a tree of
//! rank `k` was built from exactly `2ᵏ` insertions and every rank in a heap is
//! at most `log₂(n)`.
//!
//! A byte therefore covers any heap that could exist, and the structural
//! threshold `r` shares the type so the two compare directly.

/// Rank of a node, a tree, or the structural threshold.
pub type Rank = u8;

/// Largest representable rank.
pub const MAX_RANK: Rank = u8::MAX;

/// Returns `rank + 1`.
///
/// # Panics
///
/// If `rank` is already [`MAX_RANK`]. That needs more than 2²⁵⁵ insertions,
/// so it can only happen when the forest has been corrupted by a bug.
///
/// ```rust
/// use rust_soft_heaps::rank::checked_increment;
///
/// assert_eq!(checked_increment(9), 10);
/// ```
#[inline]
pub fn checked_increment(rank: Rank) -> Rank {
    rank.checked_add(1)
        .unwrap_or_else(|| panic!("rank overflow: cannot combine trees of rank {rank}"))
}

/// Rank of the node produced by combining two nodes of the given ranks.
///
/// ```rust
/// use rust_soft_heaps::rank::combined_rank;
///
/// assert_eq!(combined_rank(3, 3), 4);
/// assert_eq!(combined_rank(2, 5), 6);
/// ```
#[inline]
pub fn combined_rank(left: Rank, right: Rank) -> Rank {
    checked_increment(left.max(right))
}
