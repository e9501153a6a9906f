//! Rank type and helpers for binomial tree order.
//!
//! The rank of a binomial tree is the number of children of its root, and a
//! tree of rank `r` holds exactly `2^r` nodes. A heap of `n` items therefore
//! never contains a tree of rank above `log₂(n)`, so `u8` is far more than
//! enough: even a heap filling a 64-bit address space stays below rank 64.

/// Type alias for node rank/degree.
pub type Rank = u8;

/// Increment a rank, panicking on overflow.
///
/// # Panics
///
/// Panics if `rank == u8::MAX`. Reaching that would require a tree with
/// 2²⁵⁶ nodes, so a panic here means the forest is corrupt.
///
/// # Example
///
/// ```rust
/// use rust_binomial_heap::rank::{checked_increment, Rank};
///
/// let rank: Rank = 5;
/// assert_eq!(checked_increment(rank), 6);
/// ```
#[inline]
pub fn checked_increment(rank: Rank) -> Rank {
    rank.checked_add(1)
        .expect("rank overflow: a binomial tree of rank 255 cannot exist in memory")
}

/// Number of nodes in a binomial tree of the given rank (`2^rank`).
///
/// # Example
///
/// ```rust
/// use rust_binomial_heap::rank::tree_size;
///
/// assert_eq!(tree_size(0), 1);
/// assert_eq!(tree_size(4), 16);
/// ```
#[inline]
pub fn tree_size(rank: Rank) -> usize {
    1usize << rank
}
