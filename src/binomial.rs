//! Binomial Heap implementation
//!
//! A binomial heap is a forest of binomial trees with:
//! - O(log n) insert and delete_min
//! - O(log n) decrease_key and delete
//! - O(log n) meld
//! - O(1) find_min
//!
//! # Algorithm Overview
//!
//! **Binomial Tree Bₖ**: Recursively defined:
//! - B₀ is a single node
//! - Bₖ is formed by linking two B_{k-1} trees
//! - Bₖ has exactly 2ᵏ nodes and its root has children of ranks k-1, ..., 1, 0
//!
//! The roots form a circular list kept in strictly increasing rank order, so
//! the ranks present mirror the binary representation of the heap size.
//!
//! **Key Operations**:
//! - **Meld**: merge both root lists by rank, then link equal-rank neighbours
//!   like carries in binary addition. Every mutating operation reduces to it.
//! - **Insert**: meld a one-node heap.
//! - **Delete-min**: unhook the minimum root, turn its children into a heap,
//!   meld that heap back in.
//! - **Decrease-key**: swap (key, item) pairs upward along parent links.
//!   Tree links never change.
//! - **Delete**: drive the target to its root as if its key were below every
//!   other key, then delete-min.
//!
//! # Handles Track Positions
//!
//! Decrease-key moves values, not nodes. A [`BinomialHandle`] names a node,
//! so after a decrease-key that swapped at least once, the handle names the
//! position the decreased value started from, which now holds the value that
//! was displaced downward by the first swap. Use [`BinomialHeap::get`] to see
//! what a handle currently refers to.

use crate::error::HeapError;
use crate::node::{
    key_of, points_to, rank_of, ring, root_of, tear_down, Node, NodeRef, WeakNodeRef,
};
use crate::rank::{checked_increment, tree_size, Rank};
use crate::Key;
use smallvec::SmallVec;
use std::fmt;
use std::mem;
use std::rc::{Rc, Weak};

/// Inline capacity for root sequences built during meld. A heap needs more
/// than this many roots only beyond 2³² items.
const INLINE_ROOTS: usize = 32;

type RootSeq<T> = SmallVec<[NodeRef<T>; INLINE_ROOTS]>;

/// Handle to a position in a Binomial heap
///
/// The handle holds a weak reference to a node, so it can detect that the
/// node has been removed. It follows the node, not the value: see the module
/// documentation.
///
/// Query a handle with [`BinomialHeap::contains`] or [`BinomialHeap::get`].
pub struct BinomialHandle<T> {
    node: WeakNodeRef<T>,
}

impl<T> Clone for BinomialHandle<T> {
    fn clone(&self) -> Self {
        BinomialHandle {
            node: self.node.clone(),
        }
    }
}

impl<T> PartialEq for BinomialHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node.ptr_eq(&other.node)
    }
}

impl<T> Eq for BinomialHandle<T> {}

impl<T> fmt::Debug for BinomialHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinomialHandle")
            .field("valid", &(self.node.strong_count() > 0))
            .finish()
    }
}

/// Binomial Heap
///
/// # Example
///
/// ```rust
/// use rust_binomial_heap::BinomialHeap;
///
/// let mut heap = BinomialHeap::new();
/// let handle = heap.insert(50, "item");
/// heap.insert(20, "other");
/// heap.decrease_key(&handle, 45).unwrap();
/// assert_eq!(heap.find_min(), Ok((&5, &"item")));
/// ```
pub struct BinomialHeap<T> {
    /// Last root of the root ring; `last.next` is the lowest-rank root
    last: Option<NodeRef<T>>,
    /// Root with the smallest key
    min: Option<WeakNodeRef<T>>,
    /// Number of items
    len: usize,
    /// Number of roots
    num_trees: usize,
}

impl<T> Drop for BinomialHeap<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for BinomialHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for BinomialHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinomialHeap")
            .field("len", &self.len)
            .field("num_trees", &self.num_trees)
            .field("root_ranks", &self.root_ranks())
            .finish()
    }
}

impl<T> BinomialHeap<T> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        Self {
            last: None,
            min: None,
            len: 0,
            num_trees: 0,
        }
    }

    /// Returns true if the heap holds no items
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of items in the heap
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of binomial trees in the root list
    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    /// Ranks of the roots, from the first root to the last
    ///
    /// Always strictly increasing.
    pub fn root_ranks(&self) -> Vec<Rank> {
        self.roots().map(|root| rank_of(&root)).collect()
    }

    /// Removes every item, leaving an empty heap
    pub fn clear(&mut self) {
        self.min = None;
        self.len = 0;
        self.num_trees = 0;
        if let Some(last) = self.last.take() {
            tear_down(last);
        }
    }

    /// Inserts a new item with the given key
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// **Algorithm**: wrap the item in a one-node, one-root heap whose root
    /// ring is a 1-cycle, then meld it in. Meld does the carry propagation.
    pub fn insert(&mut self, key: Key, item: T) -> BinomialHandle<T> {
        let node = Node::new_ref(key, item);
        let handle = BinomialHandle {
            node: Rc::downgrade(&node),
        };
        self.meld(Self::singleton(node));
        handle
    }

    /// Alias for [`insert`](Self::insert)
    pub fn push(&mut self, key: Key, item: T) -> BinomialHandle<T> {
        self.insert(key, item)
    }

    /// Returns the minimum key and its item
    ///
    /// **Time Complexity**: O(1)
    ///
    /// # Errors
    /// Returns `HeapError::EmptyHeap` if the heap is empty.
    pub fn find_min(&self) -> Result<(&Key, &T), HeapError> {
        let min = self.min_root().ok_or(HeapError::EmptyHeap)?;
        Ok(self.entry(&min))
    }

    /// Returns the minimum key and its item, or `None` if empty
    pub fn peek(&self) -> Option<(&Key, &T)> {
        self.find_min().ok()
    }

    /// Removes and returns the minimum key and its item
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// **Algorithm**:
    /// 1. Detach the children of the minimum root, clearing their parent links
    /// 2. Splice the minimum root out of the root ring, moving `last` back one
    ///    root if the minimum was `last`
    /// 3. Scan the remaining roots once for the new minimum
    /// 4. The detached child ring is already a valid root list: ranks
    ///    0..k-1 in order, entered through its highest-rank child. Wrap it as
    ///    a heap of 2ᵏ - 1 items and meld it back in
    ///
    /// # Errors
    /// Returns `HeapError::EmptyHeap` if the heap is empty.
    pub fn delete_min(&mut self) -> Result<(Key, T), HeapError> {
        let min = self.min_root().ok_or(HeapError::EmptyHeap)?;
        let rank = rank_of(&min);

        let children = min.borrow_mut().child.take();
        if let Some(last_child) = &children {
            for child in ring(last_child) {
                child.borrow_mut().parent = None;
            }
        }

        self.unlink_root(&min);
        self.len -= tree_size(rank);
        self.num_trees -= 1;
        self.min = self
            .last
            .as_ref()
            .and_then(|last| ring(last).min_by_key(key_of))
            .map(|root| Rc::downgrade(&root));

        let node = Rc::try_unwrap(min)
            .ok()
            .expect("removed root should have no other strong references")
            .into_inner();

        if let Some(last_child) = children {
            let child_min = ring(&last_child)
                .min_by_key(key_of)
                .map(|c| Rc::downgrade(&c));
            let child_heap = BinomialHeap {
                last: Some(last_child),
                min: child_min,
                len: tree_size(rank) - 1,
                num_trees: usize::from(rank),
            };
            self.meld(child_heap);
        }

        self.check_invariants();
        Ok((node.key, node.item))
    }

    /// Removes and returns the minimum, or `None` if empty
    pub fn pop(&mut self) -> Option<(Key, T)> {
        self.delete_min().ok()
    }

    /// Decreases the key at the handle's position by `diff`
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// **Algorithm**:
    /// 1. Store `key - diff` at the handle's node
    /// 2. While the parent's key is larger, swap the (key, item) pairs of the
    ///    node and its parent and continue from the parent
    /// 3. If the new key is below the current minimum, the cursor stopped at a
    ///    root: make it the minimum
    ///
    /// The tree shape never changes; only (key, item) pairs move. The handle
    /// keeps naming its original node, see the module documentation.
    ///
    /// # Errors
    /// - `HeapError::PriorityNotDecreased` if `diff == 0`
    /// - `HeapError::KeyUnderflow` if `diff` exceeds the current key
    /// - `HeapError::InvalidHandle` / `HeapError::ForeignHandle` if the handle
    ///   does not name a node of this heap
    pub fn decrease_key(&mut self, handle: &BinomialHandle<T>, diff: Key) -> Result<(), HeapError> {
        let node = self.resolve(handle)?;
        let key = key_of(&node);
        if diff == 0 {
            return Err(HeapError::PriorityNotDecreased);
        }
        if diff > key {
            return Err(HeapError::KeyUnderflow { key, diff });
        }
        let new_key = key - diff;
        node.borrow_mut().key = new_key;

        let top = Self::percolate_up(node, false);

        let below_min = self.min_root().map_or(true, |min| new_key < key_of(&min));
        if below_min {
            self.min = Some(Rc::downgrade(&top));
        }

        self.check_invariants();
        Ok(())
    }

    /// Removes the item at the handle's position and returns it
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// Equivalent to decreasing the key below every key in the heap and then
    /// calling `delete_min`: the target's (key, item) pair is swapped all the
    /// way to its root, that root becomes the minimum, and delete-min removes
    /// it. The returned key is the one stored before the call.
    ///
    /// # Errors
    /// `HeapError::InvalidHandle` / `HeapError::ForeignHandle` if the handle
    /// does not name a node of this heap.
    pub fn delete(&mut self, handle: &BinomialHandle<T>) -> Result<(Key, T), HeapError> {
        let node = self.resolve(handle)?;
        self.min = Some(Rc::downgrade(&Self::percolate_up(node, true)));
        self.delete_min()
    }

    /// Returns the key and item currently stored at the handle's position
    ///
    /// # Errors
    /// `HeapError::InvalidHandle` / `HeapError::ForeignHandle` if the handle
    /// does not name a node of this heap.
    pub fn get(&self, handle: &BinomialHandle<T>) -> Result<(&Key, &T), HeapError> {
        let node = self.resolve(handle)?;
        Ok(self.entry(&node))
    }

    /// Returns the key currently stored at the handle's position
    pub fn key(&self, handle: &BinomialHandle<T>) -> Result<Key, HeapError> {
        self.resolve(handle).map(|node| key_of(&node))
    }

    /// Returns true if the handle names a live node of this heap
    pub fn contains(&self, handle: &BinomialHandle<T>) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Melds another heap into this one, consuming the other heap
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// **Algorithm**:
    /// 1. If either heap is empty, take the other one as is
    /// 2. Keep the smaller of the two minimums (ours on ties), add sizes and
    ///    tree counts
    /// 3. Merge both root lists into one sequence ordered by rank. Stable,
    ///    with the other heap's root first when ranks are equal
    /// 4. Walk the sequence linking adjacent equal-rank trees. When three
    ///    trees of one rank are adjacent, skip the first and link the later
    ///    pair, so the sequence stays sorted. Each link removes one tree
    /// 5. Close the result into a ring and make its final root `last`
    ///
    /// **Why at most three?** Each input has at most one tree per rank, and
    /// a link produces at most one carry into the next rank, exactly like
    /// ripple-carry binary addition.
    pub fn meld(&mut self, mut other: Self) {
        let Some(other_last) = other.last.take() else {
            return;
        };
        let other_min = other.min.take();
        let other_len = mem::take(&mut other.len);
        let other_trees = mem::take(&mut other.num_trees);

        let Some(our_last) = self.last.take() else {
            self.last = Some(other_last);
            self.min = other_min;
            self.len = other_len;
            self.num_trees = other_trees;
            self.check_invariants();
            return;
        };

        let other_is_smaller = match (other_min.as_ref().and_then(Weak::upgrade), self.min_root()) {
            (Some(theirs), Some(ours)) => key_of(&theirs) < key_of(&ours),
            (Some(_), None) => true,
            (None, _) => false,
        };
        if other_is_smaller {
            self.min = other_min;
        }
        self.len += other_len;
        self.num_trees += other_trees;

        let merged = merge_by_rank(ring(&our_last).collect(), ring(&other_last).collect());

        let mut trees = merged.into_iter().peekable();
        let mut roots: RootSeq<T> = SmallVec::new();
        if let Some(mut current) = trees.next() {
            while let Some(next) = trees.next() {
                let carry_ahead = trees
                    .peek()
                    .is_some_and(|after| rank_of(after) == rank_of(&current));
                if carry_ahead || rank_of(&current) != rank_of(&next) {
                    roots.push(mem::replace(&mut current, next));
                } else {
                    current = self.link(current, next);
                    self.num_trees -= 1;
                }
            }
            roots.push(current);
        }

        for (i, root) in roots.iter().enumerate() {
            let successor = Rc::clone(&roots[(i + 1) % roots.len()]);
            root.borrow_mut().next = Some(successor);
        }
        self.last = roots.pop();

        self.check_invariants();
    }

    /// Alias for [`meld`](Self::meld)
    pub fn merge(&mut self, other: Self) {
        self.meld(other)
    }

    /// Consumes the heap, returning every item in delete-min order
    pub fn into_sorted_vec(mut self) -> Vec<(Key, T)> {
        let mut sorted = Vec::with_capacity(self.len);
        while let Some(entry) = self.pop() {
            sorted.push(entry);
        }
        sorted
    }

    /// Verifies every structural invariant by walking the forest
    ///
    /// Counts are recomputed from the trees themselves rather than trusted
    /// from the cached `len`/`num_trees`. Checks:
    /// - each tree of rank r has 2^r nodes, children of ranks 0..r-1 in ring
    ///   order, and parent links pointing back at their parent
    /// - heap order: no child key is below its parent's key
    /// - root ranks strictly increase from the first root to `last`
    /// - `len` and `num_trees` match the forest
    /// - `min` is a root holding the smallest root key
    pub fn verify_internal_structure(&self) -> bool {
        let Some(last) = &self.last else {
            return self.len == 0 && self.num_trees == 0 && self.min.is_none();
        };

        let mut count = 0usize;
        let mut trees = 0usize;
        let mut prev_rank: Option<Rank> = None;
        let mut smallest: Option<Key> = None;
        for root in ring(last) {
            let node = root.borrow();
            if node.parent.is_some() || prev_rank.is_some_and(|r| r >= node.rank) {
                return false;
            }
            prev_rank = Some(node.rank);
            smallest = Some(smallest.map_or(node.key, |k| k.min(node.key)));
            drop(node);
            match tree_node_count(&root) {
                Some(nodes) => count += nodes,
                None => return false,
            }
            trees += 1;
        }

        let min_ok = match self.min_root() {
            Some(min) => {
                self.roots().any(|root| Rc::ptr_eq(&root, &min)) && Some(key_of(&min)) == smallest
            }
            None => false,
        };
        min_ok && count == self.len && trees == self.num_trees
    }

    /// Wraps a fresh node as a one-item heap.
    fn singleton(node: NodeRef<T>) -> Self {
        node.borrow_mut().next = Some(Rc::clone(&node));
        Self {
            min: Some(Rc::downgrade(&node)),
            last: Some(node),
            len: 1,
            num_trees: 1,
        }
    }

    fn min_root(&self) -> Option<NodeRef<T>> {
        self.min.as_ref().and_then(Weak::upgrade)
    }

    fn roots(&self) -> impl Iterator<Item = NodeRef<T>> {
        self.last.as_ref().map(ring).into_iter().flatten()
    }

    /// Borrows the key and item of a node owned by this heap.
    fn entry(&self, node: &NodeRef<T>) -> (&Key, &T) {
        let ptr = node.as_ptr();
        // SAFETY: the node is reachable from `self.last` through strong links,
        // so it lives at least as long as `&self`. Every mutation of node
        // contents goes through `&mut self` after `resolve` has proven the
        // node belongs to that heap, and a node belongs to exactly one heap,
        // so no `RefCell` borrow can mutate it while this reference exists.
        unsafe { (&(*ptr).key, &(*ptr).item) }
    }

    /// Upgrades a handle and checks the node is in this heap's forest.
    fn resolve(&self, handle: &BinomialHandle<T>) -> Result<NodeRef<T>, HeapError> {
        let node = handle.node.upgrade().ok_or(HeapError::InvalidHandle)?;
        let root = root_of(Rc::clone(&node));
        if self.roots().any(|r| Rc::ptr_eq(&r, &root)) {
            Ok(node)
        } else {
            Err(HeapError::ForeignHandle)
        }
    }

    /// Links two trees of equal rank into one tree of rank + 1
    ///
    /// **Time Complexity**: O(1)
    ///
    /// The root with the larger key becomes the newest child of the other;
    /// `first` wins ties. The new child becomes the highest-rank entry of
    /// the winner's child ring. If the loser was the minimum (an equal-key
    /// tie), the minimum moves to the winner so it stays a root.
    fn link(&mut self, first: NodeRef<T>, second: NodeRef<T>) -> NodeRef<T> {
        let (root, child) = if key_of(&first) > key_of(&second) {
            (second, first)
        } else {
            (first, second)
        };

        {
            let mut root_ref = root.borrow_mut();
            let mut child_ref = child.borrow_mut();
            child_ref.parent = Some(Rc::downgrade(&root));
            child_ref.next = match root_ref.child.take() {
                Some(prev_last) => prev_last.borrow_mut().next.replace(Rc::clone(&child)),
                None => Some(Rc::clone(&child)),
            };
            root_ref.child = Some(Rc::clone(&child));
            root_ref.rank = checked_increment(root_ref.rank);
        }

        if self.min.as_ref().is_some_and(|min| points_to(min, &child)) {
            self.min = Some(Rc::downgrade(&root));
        }
        root
    }

    /// Splices a root out of the root ring.
    fn unlink_root(&mut self, target: &NodeRef<T>) {
        let Some(last) = self.last.clone() else {
            return;
        };
        let prev = ring(&last)
            .find(|root| {
                root.borrow()
                    .next
                    .as_ref()
                    .is_some_and(|next| Rc::ptr_eq(next, target))
            })
            .expect("target root should be in the root ring");

        let successor = target.borrow_mut().next.take();
        if Rc::ptr_eq(&prev, target) {
            // sole root: the ring was a self-loop
            self.last = None;
            return;
        }
        prev.borrow_mut().next = successor;
        if Rc::ptr_eq(&last, target) {
            self.last = Some(prev);
        }
    }

    /// Swaps the node's (key, item) pair upward while the parent's key is
    /// larger, or all the way to the root when `to_root` is set. Returns
    /// the node where the pair ended up.
    fn percolate_up(node: NodeRef<T>, to_root: bool) -> NodeRef<T> {
        let mut current = node;
        loop {
            let parent = current.borrow().parent.as_ref().and_then(Weak::upgrade);
            let Some(parent) = parent else {
                break;
            };
            if !to_root && key_of(&current) >= key_of(&parent) {
                break;
            }
            {
                let mut current_ref = current.borrow_mut();
                let mut parent_ref = parent.borrow_mut();
                mem::swap(&mut current_ref.key, &mut parent_ref.key);
                mem::swap(&mut current_ref.item, &mut parent_ref.item);
            }
            current = parent;
        }
        current
    }

    #[inline]
    fn check_invariants(&self) {
        #[cfg(feature = "invariant-checks")]
        assert!(
            self.verify_internal_structure(),
            "binomial heap invariants violated: {self:?}"
        );
    }
}

impl<T> Extend<(Key, T)> for BinomialHeap<T> {
    fn extend<I: IntoIterator<Item = (Key, T)>>(&mut self, iter: I) {
        for (key, item) in iter {
            self.insert(key, item);
        }
    }
}

impl<T> FromIterator<(Key, T)> for BinomialHeap<T> {
    fn from_iter<I: IntoIterator<Item = (Key, T)>>(iter: I) -> Self {
        let mut heap = BinomialHeap::new();
        heap.extend(iter);
        heap
    }
}

/// Stable merge of two rank-sorted root sequences; `theirs` goes first on
/// equal ranks.
fn merge_by_rank<T>(ours: RootSeq<T>, theirs: RootSeq<T>) -> RootSeq<T> {
    let mut merged = RootSeq::with_capacity(ours.len() + theirs.len());
    let mut ours = ours.into_iter().peekable();
    let mut theirs = theirs.into_iter().peekable();
    loop {
        let take_ours = match (ours.peek(), theirs.peek()) {
            (Some(a), Some(b)) => rank_of(a) < rank_of(b),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        if take_ours {
            merged.extend(ours.next());
        } else {
            merged.extend(theirs.next());
        }
    }
    merged
}

/// Node count of a well-formed binomial tree, or `None` if the subtree
/// breaks shape, parent links or heap order.
fn tree_node_count<T>(node: &NodeRef<T>) -> Option<usize> {
    let (key, rank, child) = {
        let n = node.borrow();
        (n.key, n.rank, n.child.clone())
    };
    let mut total = 1usize;
    let mut expected_rank: Rank = 0;
    if let Some(last_child) = child {
        for c in ring(&last_child) {
            {
                let c_ref = c.borrow();
                let parent_ok = c_ref.parent.as_ref().is_some_and(|p| points_to(p, node));
                if !parent_ok || c_ref.rank != expected_rank || c_ref.key < key {
                    return None;
                }
            }
            total += tree_node_count(&c)?;
            expected_rank = expected_rank.checked_add(1)?;
        }
    }
    (expected_rank == rank && total == tree_size(rank)).then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_keys<T>(heap: &mut BinomialHeap<T>) -> Vec<Key> {
        std::iter::from_fn(|| heap.pop().map(|(k, _)| k)).collect()
    }

    #[test]
    fn test_basic_operations() {
        let mut heap = BinomialHeap::new();
        assert!(heap.is_empty());

        heap.insert(5, "a");
        heap.insert(3, "b");
        heap.insert(7, "c");

        assert_eq!(heap.find_min(), Ok((&3, &"b")));
        assert_eq!(heap.delete_min(), Ok((3, "b")));
        assert_eq!(heap.find_min(), Ok((&5, &"a")));
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_root_ranks_follow_binary_representation() {
        let mut heap = BinomialHeap::new();
        for (i, key) in (0..11u64).rev().enumerate() {
            heap.insert(key, ());
            let size = i + 1;
            let expected: Vec<Rank> = (0..usize::BITS as u8)
                .filter(|&bit| size & (1 << bit) != 0)
                .collect();
            assert_eq!(heap.root_ranks(), expected);
            assert_eq!(heap.num_trees(), size.count_ones() as usize);
            assert!(heap.verify_internal_structure());
        }
    }

    #[test]
    fn test_link_prefers_first_on_equal_keys() {
        let mut heap = BinomialHeap::new();
        let a = Node::new_ref(4, "first");
        let b = Node::new_ref(4, "second");
        let root = heap.link(Rc::clone(&a), Rc::clone(&b));
        assert!(Rc::ptr_eq(&root, &a));
        assert_eq!(rank_of(&root), 1);
        tear_down(root);
    }

    #[test]
    fn test_min_stays_a_root_after_equal_key_meld() {
        let mut ours = BinomialHeap::new();
        ours.insert(5, "ours");
        let mut theirs = BinomialHeap::new();
        theirs.insert(5, "theirs");

        // Both are rank 0; their root is linked first and wins the tie.
        ours.meld(theirs);
        assert_eq!(ours.num_trees(), 1);
        assert!(ours.verify_internal_structure());
        assert_eq!(ours.delete_min(), Ok((5, "theirs")));
        assert_eq!(ours.delete_min(), Ok((5, "ours")));
        assert!(ours.is_empty());
    }

    #[test]
    fn test_triple_carry_keeps_order() {
        // 3 = B1 + B0, 1 = B0: B0s link into a carry B1 next to the
        // existing B1, which then links into B2.
        let mut heap: BinomialHeap<u64> = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
        assert_eq!(heap.root_ranks(), vec![0, 1]);
        heap.insert(0, 0);
        assert_eq!(heap.root_ranks(), vec![2]);
        assert!(heap.verify_internal_structure());

        // 7 + 7 meets three rank-1 trees at once during the carry.
        let mut left: BinomialHeap<u64> = (0..7).map(|k| (k * 2, k)).collect();
        let right: BinomialHeap<u64> = (0..7).map(|k| (k * 2 + 1, k)).collect();
        left.meld(right);
        assert_eq!(left.root_ranks(), vec![1, 2, 3]);
        assert!(left.verify_internal_structure());
        assert_eq!(drain_keys(&mut left), (0..14u64).collect::<Vec<_>>());
    }

    #[test]
    fn test_delete_min_rehomes_children() {
        let mut heap: BinomialHeap<()> = (0..8u64).map(|k| (k, ())).collect();
        assert_eq!(heap.root_ranks(), vec![3]);
        assert_eq!(heap.delete_min(), Ok((0, ())));
        assert_eq!(heap.root_ranks(), vec![0, 1, 2]);
        assert_eq!(heap.len(), 7);
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_delete_min_when_min_is_last_root() {
        let mut heap = BinomialHeap::new();
        for key in [0, 9, 8, 7, 6, 5] {
            heap.insert(key, ());
        }
        // 6 items: B1 {5, 6} then B2 {0, 7, 8, 9}; the min root is `last`.
        assert_eq!(heap.root_ranks(), vec![1, 2]);
        assert_eq!(heap.delete_min(), Ok((0, ())));
        assert!(heap.verify_internal_structure());
        assert_eq!(drain_keys(&mut heap), vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_decrease_key_swaps_values_not_nodes() {
        let mut heap = BinomialHeap::new();
        let h10 = heap.insert(10, "ten");
        let h20 = heap.insert(20, "twenty");
        // 20 lost the link and sits under 10.
        assert_eq!(heap.root_ranks(), vec![1]);

        heap.decrease_key(&h20, 15).unwrap();
        assert_eq!(heap.find_min(), Ok((&5, &"twenty")));
        // h20 still names the child position, which now holds the value
        // displaced downward.
        assert_eq!(heap.get(&h20), Ok((&10, &"ten")));
        assert_eq!(heap.get(&h10), Ok((&5, &"twenty")));
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_decrease_key_without_swap_keeps_handle_on_value() {
        let mut heap = BinomialHeap::new();
        let _h1 = heap.insert(1, "one");
        let h9 = heap.insert(9, "nine");
        heap.decrease_key(&h9, 4).unwrap();
        assert_eq!(heap.get(&h9), Ok((&5, &"nine")));
        assert_eq!(heap.find_min(), Ok((&1, &"one")));
    }

    #[test]
    fn test_decrease_key_rejects_bad_diffs() {
        let mut heap = BinomialHeap::new();
        let h = heap.insert(7, ());
        assert_eq!(
            heap.decrease_key(&h, 0),
            Err(HeapError::PriorityNotDecreased)
        );
        assert_eq!(
            heap.decrease_key(&h, 8),
            Err(HeapError::KeyUnderflow { key: 7, diff: 8 })
        );
        assert_eq!(heap.decrease_key(&h, 7), Ok(()));
        assert_eq!(heap.find_min(), Ok((&0, &())));
    }

    #[test]
    fn test_delete_from_deep_position() {
        let mut heap: BinomialHeap<u64> = BinomialHeap::new();
        let handles: Vec<_> = (0..16u64).map(|k| heap.insert(k * 10, k)).collect();
        assert_eq!(heap.num_trees(), 1);

        assert_eq!(heap.delete(&handles[15]), Ok((150, 15)));
        assert_eq!(heap.len(), 15);
        assert!(heap.verify_internal_structure());
        assert_eq!(
            drain_keys(&mut heap),
            (0..15u64).map(|k| k * 10).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_handles_from_other_heaps_are_rejected() {
        let mut a = BinomialHeap::new();
        let mut b = BinomialHeap::new();
        let ha = a.insert(3, ());
        b.insert(4, ());
        assert_eq!(b.decrease_key(&ha, 1), Err(HeapError::ForeignHandle));
        assert_eq!(b.delete(&ha), Err(HeapError::ForeignHandle));
        assert!(!b.contains(&ha));

        // After a meld the node belongs to the receiving heap.
        b.meld(a);
        assert!(b.contains(&ha));
        assert_eq!(b.decrease_key(&ha, 1), Ok(()));
        assert_eq!(b.find_min(), Ok((&2, &())));
    }

    #[test]
    fn test_removed_position_invalidates_handle() {
        let mut heap = BinomialHeap::new();
        let h = heap.insert(1, ());
        heap.insert(2, ());
        assert_eq!(heap.delete_min(), Ok((1, ())));
        assert_eq!(heap.key(&h), Err(HeapError::InvalidHandle));
        assert_eq!(heap.delete(&h), Err(HeapError::InvalidHandle));
    }

    #[test]
    fn test_handle_reports_removal() {
        let mut heap = BinomialHeap::new();
        let h = heap.insert(1, "one");
        let other = heap.insert(2, "two");
        assert!(heap.contains(&h));
        assert_eq!(format!("{h:?}"), "BinomialHandle { valid: true }");

        assert_eq!(heap.delete(&h), Ok((1, "one")));
        assert!(!heap.contains(&h));
        assert_eq!(heap.get(&h), Err(HeapError::InvalidHandle));
        assert_eq!(format!("{h:?}"), "BinomialHandle { valid: false }");
        assert_eq!(heap.get(&other), Ok((&2, &"two")));
        assert_ne!(h, other);
    }

    #[cfg(feature = "invariant-checks")]
    #[test]
    #[should_panic(expected = "binomial heap invariants violated")]
    fn test_invariant_checks_catch_corruption() {
        let mut heap: BinomialHeap<()> = (0..4u64).map(|k| (k, ())).collect();
        heap.len += 1;
        heap.insert(9, ());
    }

    #[test]
    fn test_dropping_heap_frees_nodes() {
        let handles: Vec<BinomialHandle<u64>> = {
            let mut heap = BinomialHeap::new();
            let handles = (0..100u64).map(|k| heap.insert(k, k)).collect();
            handles
        };
        assert!(handles.iter().all(|h| h.node.upgrade().is_none()));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut heap: BinomialHeap<()> = (0..33u64).map(|k| (k, ())).collect();
        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.num_trees(), 0);
        assert_eq!(heap.find_min(), Err(HeapError::EmptyHeap));
        assert!(heap.verify_internal_structure());
        heap.insert(1, ());
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_debug_shows_shape() {
        let heap: BinomialHeap<()> = (0..5u64).map(|k| (k, ())).collect();
        assert_eq!(
            format!("{heap:?}"),
            "BinomialHeap { len: 5, num_trees: 2, root_ranks: [0, 2] }"
        );
    }
}
