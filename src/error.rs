//! Error type for binomial heap operations
//!
//! Every fallible operation on [`BinomialHeap`](crate::binomial::BinomialHeap)
//! reports misuse through [`HeapError`] instead of corrupting the forest.

use crate::Key;
use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `find_min` or `delete_min` was called on an empty heap
    EmptyHeap,
    /// `decrease_key` was called with a difference of zero
    PriorityNotDecreased,
    /// `decrease_key` would take the key below zero
    KeyUnderflow {
        /// Key currently stored at the handle's position
        key: Key,
        /// Requested decrease
        diff: Key,
    },
    /// The handle's node no longer exists (its position was removed)
    InvalidHandle,
    /// The handle refers to a node owned by a different heap
    ForeignHandle,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyHeap => write!(f, "heap is empty"),
            HeapError::PriorityNotDecreased => {
                write!(f, "decrease must be strictly positive")
            }
            HeapError::KeyUnderflow { key, diff } => {
                write!(
                    f,
                    "cannot decrease key {key} by {diff}: keys are non-negative"
                )
            }
            HeapError::InvalidHandle => {
                write!(f, "handle is no longer valid (its node was removed)")
            }
            HeapError::ForeignHandle => {
                write!(f, "handle belongs to a different heap")
            }
        }
    }
}

impl std::error::Error for HeapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_offending_values() {
        let err = HeapError::KeyUnderflow { key: 3, diff: 7 };
        assert_eq!(
            err.to_string(),
            "cannot decrease key 3 by 7: keys are non-negative"
        );
    }

    #[test]
    fn test_is_std_error() {
        let boxed: Box<dyn std::error::Error> = Box::new(HeapError::EmptyHeap);
        assert_eq!(boxed.to_string(), "heap is empty");
    }
}
