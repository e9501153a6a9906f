//! Meldable Binomial Heap for Rust
//!
//! This crate provides a binomial heap: a mergeable priority queue over
//! non-negative integer keys with an arbitrary item attached to each key.
//!
//! # Features
//!
//! - **Insert**: O(log n) worst-case, returns a handle to the new position
//! - **Find-min**: O(1)
//! - **Delete-min**: O(log n) worst-case
//! - **Decrease-key**: O(log n) worst-case, by handle, without searching
//! - **Delete**: O(log n) worst-case, by handle
//! - **Meld**: O(log n) worst-case, consumes the other heap
//!
//! Handles name tree positions rather than values; see [`binomial`] for what
//! that means after a decrease-key.
//!
//! # Example
//!
//! ```rust
//! use rust_binomial_heap::BinomialHeap;
//!
//! let mut heap = BinomialHeap::new();
//! heap.insert(10, "ten");
//! let handle = heap.insert(20, "twenty");
//!
//! let mut other = BinomialHeap::new();
//! other.insert(15, "fifteen");
//! heap.meld(other);
//!
//! heap.delete(&handle).unwrap();
//! assert_eq!(heap.delete_min(), Ok((10, "ten")));
//! assert_eq!(heap.delete_min(), Ok((15, "fifteen")));
//! assert!(heap.is_empty());
//! ```
//!
//! # Threading
//!
//! Heaps and handles use `Rc` internally and are neither `Send` nor `Sync`,
//! so a heap stays on the thread that built it. Every mutating operation
//! takes `&mut self`; there is no internal locking.

pub mod binomial;
pub mod error;
mod node;
pub mod rank;

/// Priority of an item. Keys are non-negative by construction.
pub type Key = u64;

pub use binomial::{BinomialHandle, BinomialHeap};
pub use error::HeapError;
