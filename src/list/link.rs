//! Link surgery on the ring.
//!
//! Everything here rewires `next`/`prev` pointers only. No element is moved,
//! cloned or dropped, and no node is allocated or released.

use std::ptr::NonNull;

use crate::alloc::NodeAllocator;
use crate::list::{List, Node};

/// A chain of nodes `front..=back` that belongs to no ring.
///
/// The outer links of `front` and `back` are stale and must not be followed.
pub(crate) struct DetachedNodes<T> {
    pub(crate) front: NonNull<Node<T>>,
    pub(crate) back: NonNull<Node<T>>,
    pub(crate) len: usize,
}

/// Check that the neighbors of `node` link back to it.
#[inline]
unsafe fn debug_assert_linked<T>(node: NonNull<Node<T>>) {
    debug_assert_eq!(Node::next(Node::prev(node)), node, "`prev.next` does not point back");
    debug_assert_eq!(Node::prev(Node::next(node)), node, "`next.prev` does not point back");
}

/// Connect `prev` and `next`, making `next` the successor of `prev`.
#[inline]
pub(crate) unsafe fn connect<T>(prev: NonNull<Node<T>>, next: NonNull<Node<T>>) {
    (*prev.as_ptr()).next = next;
    (*next.as_ptr()).prev = prev;
}

/// Link the chain `front..=back` before `at`.
///
/// It is unsafe because `front..=back` must be a chain that is not part of
/// the ring of `at`.
#[inline]
pub(crate) unsafe fn link_range<T>(
    at: NonNull<Node<T>>,
    front: NonNull<Node<T>>,
    back: NonNull<Node<T>>,
) {
    debug_assert_linked(at);
    debug_assert!(at != front && at != back, "a chain cannot be linked before itself");
    connect(Node::prev(at), front);
    connect(back, at);
}

/// Unlink `front..=back` from its ring and close the gap. The links of `front`
/// and `back` are left stale.
///
/// It is unsafe because `front..=back` must be a valid range of element nodes
/// in one ring.
#[inline]
pub(crate) unsafe fn unlink_range<T>(front: NonNull<Node<T>>, back: NonNull<Node<T>>) {
    debug_assert_eq!(Node::next(Node::prev(front)), front, "`prev.next` does not point back");
    debug_assert_eq!(Node::prev(Node::next(back)), back, "`next.prev` does not point back");
    connect(Node::prev(front), Node::next(back));
}

/// Move the nodes `front..=back` before `to`, which can be in the same ring
/// or in another one. Nothing happens if the range already sits before `to`,
/// or if `to` is `front`.
///
/// It is unsafe because `front..=back` must be a valid range of element nodes,
/// and `to` must not lie strictly after `front` within it.
pub(crate) unsafe fn move_nodes<T>(
    front: NonNull<Node<T>>,
    back: NonNull<Node<T>>,
    to: NonNull<Node<T>>,
) {
    if to == front || Node::next(back) == to {
        return;
    }
    unlink_range(front, back);
    link_range(to, front, back);
}

impl<T, A: NodeAllocator> List<T, A> {
    /// Attach a detached `node` before `at`.
    ///
    /// It is unsafe because `at` must be a node of this list, and `node` must
    /// be a detached element node that can be released by `A`.
    pub(crate) unsafe fn attach_node(&mut self, at: NonNull<Node<T>>, node: NonNull<Node<T>>) {
        link_range(at, node, node);
        self.len += 1;
    }

    /// Detach an element `node` from this list and return it. Its links are
    /// reset to point to itself.
    ///
    /// It is unsafe because `node` must be an element node of this list.
    pub(crate) unsafe fn detach_node(&mut self, node: NonNull<Node<T>>) -> NonNull<Node<T>> {
        debug_assert_ne!(node, self.ghost_node(), "the ghost node cannot be detached");
        unlink_range(node, node);
        Node::unlink(node);
        self.len -= 1;
        node
    }

    /// Attach the detached chain before `at`.
    ///
    /// It is unsafe because `at` must be a node of this list.
    pub(crate) unsafe fn attach_nodes(&mut self, at: NonNull<Node<T>>, detached: DetachedNodes<T>) {
        let DetachedNodes { front, back, len } = detached;
        debug_assert!(len > 0, "an empty chain cannot be attached");
        link_range(at, front, back);
        self.len += len;
    }

    /// Detach `front..=back`, which holds `len` nodes, from this list.
    ///
    /// It is unsafe because `front..=back` must be a valid range of element
    /// nodes of this list with exactly `len` nodes.
    ///
    /// Test builds walk the range to check `len`, which makes this *O*(`len`)
    /// there; otherwise it is *O*(1).
    pub(crate) unsafe fn detach_nodes(
        &mut self,
        front: NonNull<Node<T>>,
        back: NonNull<Node<T>>,
        len: usize,
    ) -> DetachedNodes<T> {
        #[cfg(test)]
        self.assert_range(front, back, len);
        unlink_range(front, back);
        self.len -= len;
        DetachedNodes { front, back, len }
    }

    /// Detach all the element nodes, leaving the list empty.
    pub(crate) fn detach_all_nodes(&mut self) -> Option<DetachedNodes<T>> {
        if self.is_empty() {
            return None;
        }
        let (front, back, len) = (self.front_node(), self.back_node(), self.len);
        // SAFETY: `front..=back` is the whole list of `len` element nodes.
        Some(unsafe { self.detach_nodes(front, back, len) })
    }

    /// Link the detached chain at the front of the list.
    pub(crate) fn link_front(&mut self, detached: DetachedNodes<T>) {
        let front = self.front_node();
        // SAFETY: the front node is a node of this list.
        unsafe { self.attach_nodes(front, detached) };
    }

    /// Link the detached chain at the back of the list.
    pub(crate) fn link_back(&mut self, detached: DetachedNodes<T>) {
        let ghost = self.ghost_node();
        // SAFETY: the ghost node is a node of this list.
        unsafe { self.attach_nodes(ghost, detached) };
    }

    /// Check that `front..=back` are `len` adjacent element nodes of this list.
    #[cfg(test)]
    unsafe fn assert_range(&self, front: NonNull<Node<T>>, back: NonNull<Node<T>>, len: usize) {
        let ghost = self.ghost_node();
        let mut node = front;
        for _ in 1..len {
            debug_assert_ne!(node, ghost, "a range cannot contain the ghost node");
            node = Node::next(node);
        }
        debug_assert_eq!(node, back, "the range does not hold `len` nodes");
        debug_assert_ne!(back, ghost, "a range cannot contain the ghost node");
    }
}
