use crate::alloc::{Global, NodeAllocator};
use crate::list::{List, Node};
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::marker::PhantomData;
use std::ptr::NonNull;

/// The element nodes `start..end` that are still to be yielded, together with
/// their count.
struct Nodes<T> {
    start: NonNull<Node<T>>,
    end: NonNull<Node<T>>,
    len: usize,
}

impl<T> Clone for Nodes<T> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<T> Copy for Nodes<T> {}

impl<T> Nodes<T> {
    fn of<A: NodeAllocator>(list: &List<T, A>) -> Self {
        Self {
            start: list.front_node(),
            end: list.ghost_node(),
            len: list.len(),
        }
    }

    /// Take the first node of the range.
    fn pop_start(&mut self) -> Option<NonNull<Node<T>>> {
        if self.len == 0 {
            return None;
        }
        let node = self.start;
        // SAFETY: the range is not empty, so `start` is an element node.
        self.start = unsafe { Node::next(node) };
        self.len -= 1;
        Some(node)
    }

    /// Take the last node of the range.
    fn pop_end(&mut self) -> Option<NonNull<Node<T>>> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: the range is not empty, so `end.prev` is an element node.
        self.end = unsafe { Node::prev(self.end) };
        self.len -= 1;
        Some(self.end)
    }
}

/// A front-to-back iterator over shared references to the elements of a
/// [`List`], created by [`List::iter`].
///
/// Both ends can be consumed; the iterator stops when they meet and never
/// yields the ghost node.
///
/// ```compile_fail
/// use ring_list::List;
///
/// let mut list = List::from([1, 2, 3]);
/// let mut iter = list.iter();
/// // The list is still borrowed by `iter`.
/// list.pop_back();
/// iter.next();
/// ```
pub struct Iter<'a, T: 'a> {
    nodes: Nodes<T>,
    _marker: PhantomData<&'a Node<T>>,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new<A: NodeAllocator>(list: &'a List<T, A>) -> Self {
        Self {
            nodes: Nodes::of(list),
            _marker: PhantomData,
        }
    }
}

impl<'a, T: 'a> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        // SAFETY: yielded nodes are element nodes borrowed for `'a`.
        self.nodes.pop_start().map(|node| unsafe { Node::element(node) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.nodes.len, Some(self.nodes.len))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        // SAFETY: yielded nodes are element nodes borrowed for `'a`.
        self.nodes.pop_end().map(|node| unsafe { Node::element(node) })
    }
}

impl<'a, T: 'a> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: 'a> FusedIterator for Iter<'a, T> {}

/// A front-to-back iterator over mutable references to the elements of a
/// [`List`], created by [`List::iter_mut`].
///
/// Only the elements can be changed through it; the links are not reachable.
///
/// ```compile_fail
/// use ring_list::List;
///
/// let mut list = List::from([1, 2, 3]);
/// let mut iter = list.iter_mut();
/// // Reading the list while `iter` is alive is refused.
/// assert_eq!(list.len(), 3);
/// iter.next();
/// ```
pub struct IterMut<'a, T: 'a> {
    nodes: Nodes<T>,
    _marker: PhantomData<&'a mut Node<T>>,
}

impl<'a, T: 'a> IterMut<'a, T> {
    pub(crate) fn new<A: NodeAllocator>(list: &'a mut List<T, A>) -> Self {
        Self {
            nodes: Nodes::of(list),
            _marker: PhantomData,
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for IterMut<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut nodes = self.nodes;
        let mut remaining = Vec::with_capacity(nodes.len);
        while let Some(node) = nodes.pop_start() {
            // SAFETY: the node is an element node, and no mutable reference
            // to it is handed out while `self` is borrowed.
            remaining.push(unsafe { Node::<T>::element(node) });
        }
        f.debug_tuple("IterMut").field(&remaining).finish()
    }
}

impl<'a, T: 'a> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        // SAFETY: each element node leaves the range once, so no two
        // mutable references alias.
        self.nodes.pop_start().map(|node| unsafe { Node::element_mut(node) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.nodes.len, Some(self.nodes.len))
    }

    fn last(mut self) -> Option<&'a mut T> {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        // SAFETY: each element node leaves the range once, so no two
        // mutable references alias.
        self.nodes.pop_end().map(|node| unsafe { Node::element_mut(node) })
    }
}

impl<'a, T: 'a> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T: 'a> FusedIterator for IterMut<'a, T> {}

/// An iterator that moves the elements out of a [`List`], releasing each
/// node as its element is taken.
///
/// Elements that are not taken are dropped with the iterator.
pub struct IntoIter<T, A: NodeAllocator = Global> {
    list: List<T, A>,
}

impl<T: fmt::Debug, A: NodeAllocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}

impl<T, A: NodeAllocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }

    fn last(mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T, A: NodeAllocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T, A: NodeAllocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: NodeAllocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: NodeAllocator> IntoIterator for List<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter { list: self }
    }
}

impl<'a, T, A: NodeAllocator> IntoIterator for &'a List<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: NodeAllocator> IntoIterator for &'a mut List<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        list.cursor_end_mut().insert_iter(iter);
        list
    }
}

/// Appends every element of the iterator at the back.
impl<T, A: NodeAllocator> Extend<T> for List<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.cursor_end_mut().insert_iter(iter);
    }
}

impl<'a, T: 'a + Copy, A: NodeAllocator> Extend<&'a T> for List<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.cursor_end_mut().insert_iter(iter.into_iter().copied());
    }
}

/// Builds a list holding the array elements in order.
///
/// ```
/// use ring_list::List;
///
/// let list: List<_> = ["x", "y"].into();
/// assert_eq!(list.back(), Some(&"y"));
/// ```
impl<T, const N: usize> From<[T; N]> for List<T> {
    fn from(array: [T; N]) -> Self {
        array.into_iter().collect()
    }
}

unsafe impl<T: Sync> Send for Iter<'_, T> {}

unsafe impl<T: Sync> Sync for Iter<'_, T> {}

unsafe impl<T: Send> Send for IterMut<'_, T> {}

unsafe impl<T: Sync> Sync for IterMut<'_, T> {}
