//! Node model shared by every binomial heap operation
//!
//! A node is a single record holding the key, the caller's item, and the tree
//! links. There is no separate item object pointing back at its node, so the
//! two can never disagree.
//!
//! **Memory Model**: `child` and `next` are strong references, `parent` is a
//! weak one. Sibling lists are circular through `next`: a node's `child` is
//! the highest-rank child, and `child.next` is the rank-0 child, so walking
//! from `child.next` back to `child` visits children in increasing rank. The
//! root list of a heap is the same kind of ring, entered through the heap's
//! `last` root.
//!
//! Strong rings are reference cycles; the owning heap breaks them when it is
//! cleared or dropped.

use crate::rank::Rank;
use crate::Key;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Type alias for node reference (strong reference)
pub(crate) type NodeRef<T> = Rc<RefCell<Node<T>>>;

/// Type alias for weak node reference (parent links, handles, min pointer)
pub(crate) type WeakNodeRef<T> = Weak<RefCell<Node<T>>>;

pub(crate) struct Node<T> {
    pub(crate) key: Key,
    pub(crate) item: T,
    /// Enclosing node; `None` for roots
    pub(crate) parent: Option<WeakNodeRef<T>>,
    /// Highest-rank child, entry point of the child ring
    pub(crate) child: Option<NodeRef<T>>,
    /// Next sibling (or next root) in a circular list
    pub(crate) next: Option<NodeRef<T>>,
    /// Number of direct children
    pub(crate) rank: Rank,
}

impl<T> Node<T> {
    /// Allocates an unlinked rank-0 node.
    pub(crate) fn new_ref(key: Key, item: T) -> NodeRef<T> {
        Rc::new(RefCell::new(Node {
            key,
            item,
            parent: None,
            child: None,
            next: None,
            rank: 0,
        }))
    }
}

#[inline]
pub(crate) fn key_of<T>(node: &NodeRef<T>) -> Key {
    node.borrow().key
}

#[inline]
pub(crate) fn rank_of<T>(node: &NodeRef<T>) -> Rank {
    node.borrow().rank
}

/// True when the weak reference points at `node`.
#[inline]
pub(crate) fn points_to<T>(weak: &WeakNodeRef<T>, node: &NodeRef<T>) -> bool {
    std::ptr::eq(weak.as_ptr(), Rc::as_ptr(node))
}

/// Follows parent links up to the root of the tree containing `node`.
pub(crate) fn root_of<T>(node: NodeRef<T>) -> NodeRef<T> {
    let mut current = node;
    loop {
        let parent = current.borrow().parent.as_ref().and_then(Weak::upgrade);
        match parent {
            Some(p) => current = p,
            None => return current,
        }
    }
}

/// Iterates a circular list starting at `last.next` and ending at `last`.
pub(crate) fn ring<T>(last: &NodeRef<T>) -> Ring<T> {
    Ring {
        cursor: last.borrow().next.clone(),
        last: Rc::clone(last),
    }
}

pub(crate) struct Ring<T> {
    cursor: Option<NodeRef<T>>,
    last: NodeRef<T>,
}

impl<T> Iterator for Ring<T> {
    type Item = NodeRef<T>;

    fn next(&mut self) -> Option<NodeRef<T>> {
        let current = self.cursor.take()?;
        if !Rc::ptr_eq(&current, &self.last) {
            self.cursor = current.borrow().next.clone();
        }
        Some(current)
    }
}

/// Breaks every strong link reachable from `last`, freeing the whole forest.
///
/// Iterative, so dropping a large heap does not recurse once per node.
pub(crate) fn tear_down<T>(last: NodeRef<T>) {
    let mut stack = vec![last];
    while let Some(node) = stack.pop() {
        let (child, next) = {
            let mut n = node.borrow_mut();
            (n.child.take(), n.next.take())
        };
        stack.extend(child);
        stack.extend(next);
    }
}
