use std::alloc::Layout;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ops::Range;
use std::ptr::NonNull;

use crate::alloc::{Global, NodeAllocator};
use crate::error::AllocError;
use crate::list::cursor::{Cursor, CursorMut};
use crate::{IntoIter, Iter, IterMut};

pub mod cursor;
pub mod iterator;

mod algorithms;
mod link;

/// A doubly linked list closed into a ring by a sentinel node.
///
/// Each element lives in its own node, allocated from `A` and never moved
/// until it is erased. The sentinel, called the ghost, sits between the last
/// and the first element and stands for the end position, so a list with
/// `len` elements has `len + 1` positions.
///
/// Edits at a known position (a cursor) are *O*(1), including moving any
/// number of nodes between lists. Reaching a position by index walks from the
/// nearer end of the ring.
///
/// Inside this crate, `front..=back` denotes an inclusive chain of element
/// nodes and `start..end` a half-open one whose `end` may be the ghost.
pub struct List<T, A: NodeAllocator = Global> {
    ghost: NonNull<Node<T>>,
    pub(crate) len: usize,
    alloc: A,
    _marker: PhantomData<Box<Node<T>>>,
}

/// A position in the ring.
///
/// The ghost node is the only node whose `element` is `None`.
pub(crate) struct Node<T> {
    pub(crate) next: NonNull<Node<T>>,
    pub(crate) prev: NonNull<Node<T>>,
    pub(crate) element: Option<T>,
}

// node access
impl<T, A: NodeAllocator> List<T, A> {
    pub(crate) fn ghost_node(&self) -> NonNull<Node<T>> {
        self.ghost
    }
    pub(crate) fn front_node(&self) -> NonNull<Node<T>> {
        // SAFETY: the ghost is always linked; its successor is the first
        // element or the ghost itself.
        unsafe { Node::next(self.ghost) }
    }
    pub(crate) fn back_node(&self) -> NonNull<Node<T>> {
        // SAFETY: as above, the predecessor of the ghost is the last element
        // or the ghost itself.
        unsafe { Node::prev(self.ghost) }
    }

    /// Allocates a detached node holding `element` with the allocator of the list.
    pub(crate) fn new_node(&self, element: T) -> Result<NonNull<Node<T>>, AllocError<T>> {
        Node::allocate(&self.alloc, element)
    }

    /// Release a detached node and return its element.
    ///
    /// It is unsafe because `node` must be a detached element node allocated
    /// by an allocator of type `A`, and must not be used afterwards.
    pub(crate) unsafe fn free_node(&self, node: NonNull<Node<T>>) -> T {
        Node::release(&self.alloc, node)
    }
}

impl<T> List<T> {
    /// An empty list backed by the [`Global`] node allocator.
    #[inline]
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Create a list holding `n` clones of `value`.
    ///
    /// Every element gets its own node.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let list = List::from_elem(3, 'x');
    /// assert_eq!(list.into_vec(), vec!['x', 'x', 'x']);
    /// ```
    pub fn from_elem(n: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut list = Self::new();
        list.resize(n, value);
        list
    }

    /// Create a list holding `n` default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let list: List<u8> = List::with_len(2);
    /// assert_eq!(list.into_vec(), vec![0, 0]);
    /// ```
    pub fn with_len(n: usize) -> Self
    where
        T: Default,
    {
        let mut list = Self::new();
        list.resize_with(n, T::default);
        list
    }
}

impl<T, A: NodeAllocator> List<T, A> {
    /// Create an empty `List` whose element nodes are provided by `alloc`.
    ///
    /// The ghost node is boxed, so creating a list never asks `alloc` for
    /// memory.
    pub fn new_in(alloc: A) -> Self {
        Self {
            ghost: Node::new_ghost(),
            len: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Returns a reference to the allocator of the list.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Whether the ghost is the only node of the ring. *O*(1).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_node() == self.ghost_node()
    }

    /// The number of element nodes, which is also the index of the ghost.
    ///
    /// The count is maintained by every edit, so this is *O*(1).
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from(['a', 'b']);
    /// assert_eq!(list.len(), 2);
    /// assert_eq!(list.cursor_end().index(), list.len());
    ///
    /// list.erase_range(0..2);
    /// assert_eq!(list.len(), 0);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Drops every element and gives its node back to the allocator, front
    /// to back. The list stays usable and keeps its ghost.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from_elem(4, String::from("n"));
    /// list.clear();
    /// assert!(list.is_empty());
    ///
    /// list.push_back(String::from("again"));
    /// assert_eq!(list.front().map(String::as_str), Some("again"));
    /// ```
    pub fn clear(&mut self) {
        if !self.is_empty() {
            tracing::trace!(len = self.len, "clearing list");
        }
        while self.pop_front().is_some() {}
    }

    /// The element right after the ghost, if any.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let list = List::from([7, 8]);
    /// assert_eq!(list.front(), Some(&7));
    /// assert_eq!(List::<u8>::new().front(), None);
    /// ```
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.cursor_start().current()
    }

    /// Mutable access to the element right after the ghost.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        // SAFETY: the front node is either the ghost node or an element node of
        // this list, and `self` is borrowed mutably.
        unsafe { (*self.front_node().as_ptr()).element.as_mut() }
    }

    /// The element right before the ghost, if any.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let list = List::from([7, 8]);
    /// assert_eq!(list.back(), Some(&8));
    /// ```
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.cursor_end().previous()
    }

    /// Mutable access to the element right before the ghost.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 2]);
    /// *list.front_mut().unwrap() -= 1;
    /// *list.back_mut().unwrap() += 1;
    /// assert_eq!(list.into_vec(), vec![0, 3]);
    /// ```
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        // SAFETY: the back node is either the ghost node or an element node of
        // this list, and `self` is borrowed mutably.
        unsafe { (*self.back_node().as_ptr()).element.as_mut() }
    }

    /// Links a new node holding `elt` right after the ghost.
    ///
    /// Aborts through [`std::alloc::handle_alloc_error`] if the node cannot be
    /// allocated; see [`List::try_push_front`].
    pub fn push_front(&mut self, elt: T) {
        self.cursor_start_mut().insert_before(elt);
    }

    /// Like [`List::push_front`], but returns the element back instead of
    /// aborting when its node cannot be allocated. The list is unchanged on
    /// failure.
    pub fn try_push_front(&mut self, elt: T) -> Result<(), AllocError<T>> {
        self.cursor_start_mut().try_insert_before(elt)
    }

    /// Unlinks the first node, frees it and returns its element.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::new();
    /// list.push_front('b');
    /// list.push_front('a');
    /// assert_eq!(list.pop_front(), Some('a'));
    /// assert_eq!(list.pop_front(), Some('b'));
    /// assert_eq!(list.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        self.cursor_start_mut().remove()
    }

    /// Links a new node holding `elt` right before the ghost.
    ///
    /// Aborts through [`std::alloc::handle_alloc_error`] if the node cannot be
    /// allocated; see [`List::try_push_back`].
    pub fn push_back(&mut self, elt: T) {
        self.cursor_end_mut().insert_before(elt);
    }

    /// Like [`List::push_back`], but returns the element back instead of
    /// aborting when its node cannot be allocated. The list is unchanged on
    /// failure.
    pub fn try_push_back(&mut self, elt: T) -> Result<(), AllocError<T>> {
        self.cursor_end_mut().try_insert_before(elt)
    }

    /// Unlinks the last node, frees it and returns its element.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from(["x", "y"]);
    /// assert_eq!(list.pop_back(), Some("y"));
    /// assert_eq!(list.pop_back(), Some("x"));
    /// assert_eq!(list.pop_back(), None);
    /// ```
    pub fn pop_back(&mut self) -> Option<T> {
        self.cursor_end_mut().backspace()
    }

    /// A read-only cursor at index `at`, walking from whichever end of the
    /// ring is closer. Index `len` is the ghost.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let list = List::from(['p', 'q', 'r']);
    /// let cursor = list.cursor(2);
    /// assert_eq!((cursor.previous(), cursor.current()), (Some(&'q'), Some(&'r')));
    /// assert_eq!(list.cursor(3), list.cursor_end());
    /// ```
    pub fn cursor(&self, at: usize) -> Cursor<'_, T, A> {
        assert!(
            at <= self.len,
            "Cannot create cursor at a nonexistent index"
        );
        let mut cursor = self.cursor_start();
        cursor
            .seek_to(at)
            .expect("Cannot create cursor at a nonexistent index");
        cursor
    }

    /// A read-only cursor at index 0. On an empty list this is the ghost.
    pub fn cursor_start(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, self.front_node(), 0)
    }

    /// A read-only cursor on the ghost, at index `len`.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let list = List::from([5, 6]);
    /// let cursor = list.cursor_end();
    /// assert_eq!((cursor.index(), cursor.current()), (2, None));
    /// assert_eq!(cursor.previous(), Some(&6));
    /// ```
    pub fn cursor_end(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, self.ghost_node(), self.len)
    }

    /// An editing cursor at index `at`. Index `len` is the ghost, where an
    /// insertion appends.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 2, 3]);
    /// let mut cursor = list.cursor_mut(1);
    /// *cursor.current_mut().unwrap() = 20;
    /// assert_eq!(cursor.remove(), Some(20));
    /// assert_eq!(cursor.index(), 1);
    /// assert_eq!(list.into_vec(), vec![1, 3]);
    /// ```
    pub fn cursor_mut(&mut self, at: usize) -> CursorMut<'_, T, A> {
        assert!(
            at <= self.len,
            "Cannot create cursor at a nonexistent index"
        );
        let mut cursor = self.cursor_start_mut();
        cursor
            .seek_to(at)
            .expect("Cannot create cursor at a nonexistent index");
        cursor
    }

    /// An editing cursor at index 0. On an empty list this is the ghost.
    pub fn cursor_start_mut(&mut self) -> CursorMut<'_, T, A> {
        let front = self.front_node();
        CursorMut::new(self, front, 0)
    }

    /// An editing cursor on the ghost. Inserting through it appends.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1]);
    /// let mut cursor = list.cursor_end_mut();
    /// cursor.insert_before(2);
    /// assert_eq!(cursor.index(), 2);
    /// assert_eq!(cursor.previous(), Some(&2));
    /// ```
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T, A> {
        let (ghost, len) = (self.ghost_node(), self.len);
        CursorMut::new(self, ghost, len)
    }

    /// Borrowing iterator over the elements, front to back. It can also be
    /// driven from the back.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let list = List::from_iter(1..=4);
    /// assert_eq!(list.iter().rev().step_by(2).sum::<i32>(), 6);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Like [`List::iter`], with mutable references.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }

    /// Adds an element at the given index and returns a cursor pointing at it.
    ///
    /// Inserting at `len` appends the element.
    ///
    /// # Complexity
    ///
    /// Locating the index takes *O*(min(*at*, *len* - *at*)) time, the
    /// insertion itself *O*(1).
    ///
    /// # Panics
    ///
    /// Panics if `at > len`
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 2, 3]);
    ///
    /// let mut cursor = list.insert(2, 4);
    /// assert_eq!(cursor.current(), Some(&4));
    /// cursor.insert(5);
    /// assert_eq!(cursor.current(), Some(&5));
    ///
    /// assert_eq!(list.into_vec(), vec![1, 2, 5, 4, 3]);
    /// ```
    pub fn insert(&mut self, at: usize, elm: T) -> CursorMut<'_, T, A> {
        assert!(
            at <= self.len,
            "Cannot insert at an index outside of the list bounds"
        );
        let mut cursor = self.cursor_mut(at);
        cursor.insert(elm);
        cursor
    }

    /// Like [`List::insert`], but hands the element back when its node cannot
    /// be allocated. The list is unchanged on failure.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`
    pub fn try_insert(&mut self, at: usize, elm: T) -> Result<CursorMut<'_, T, A>, AllocError<T>> {
        assert!(
            at <= self.len,
            "Cannot insert at an index outside of the list bounds"
        );
        let mut cursor = self.cursor_mut(at);
        cursor.try_insert(elm)?;
        Ok(cursor)
    }

    /// Erases the element at the given index and returns a cursor at the
    /// element that followed it.
    ///
    /// # Panics
    ///
    /// Panics if `at >= len`
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 2, 3]);
    /// let cursor = list.erase(1);
    /// assert_eq!(cursor.current(), Some(&3));
    /// assert_eq!(list.into_vec(), vec![1, 3]);
    /// ```
    pub fn erase(&mut self, at: usize) -> CursorMut<'_, T, A> {
        assert!(
            at < self.len,
            "Cannot erase at an index outside of the list bounds"
        );
        let mut cursor = self.cursor_mut(at);
        cursor.remove();
        cursor
    }

    /// Erases the elements in `range` front to back and returns a cursor at the
    /// element that followed the range.
    ///
    /// # Complexity
    ///
    /// *O*(*n*): the range is walked once to free its nodes.
    ///
    /// # Panics
    ///
    /// Panics if the range is decreasing or ends after `len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from_iter(0..6);
    /// let cursor = list.erase_range(1..4);
    /// assert_eq!(cursor.current(), Some(&4));
    /// assert_eq!(list.into_vec(), vec![0, 4, 5]);
    /// ```
    pub fn erase_range(&mut self, range: Range<usize>) -> CursorMut<'_, T, A> {
        assert!(
            range.start <= range.end && range.end <= self.len,
            "Cannot erase a range outside of the list bounds"
        );
        let mut cursor = self.cursor_mut(range.start);
        cursor.remove_n(range.end - range.start);
        cursor
    }

    /// Takes the element at `at` out of the list. [`List::erase`] drops it
    /// and returns a cursor instead.
    ///
    /// # Panics
    ///
    /// Panics if `at >= len`
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from(['a', 'b', 'c']);
    /// assert_eq!(list.remove_at(1), 'b');
    /// assert_eq!(list.remove_at(1), 'c');
    /// assert_eq!(list.into_vec(), vec!['a']);
    /// ```
    pub fn remove_at(&mut self, at: usize) -> T {
        assert!(
            at < self.len,
            "Cannot remove at an index outside of the list bounds"
        );

        self.cursor_mut(at)
            .remove()
            .expect("Cannot remove at an index outside of the list bounds")
    }

    /// Shortens the list, keeping the first `len` elements and dropping the
    /// rest. Has no effect if `len` is not less than the current length.
    pub fn truncate(&mut self, len: usize) {
        while self.len > len {
            self.pop_back();
        }
    }

    /// Resizes the list to `new_len` elements, appending clones of `value`
    /// or dropping elements from the back.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 2]);
    /// list.resize(4, 0);
    /// assert_eq!(list.to_vec(), vec![1, 2, 0, 0]);
    /// list.resize(1, 0);
    /// assert_eq!(list.to_vec(), vec![1]);
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        if new_len <= self.len {
            self.truncate(new_len);
        } else {
            let extra = new_len - self.len;
            self.cursor_end_mut().insert_n(extra, value);
        }
    }

    /// Resizes the list to `new_len` elements, appending values produced by
    /// `f` or dropping elements from the back.
    pub fn resize_with<F>(&mut self, new_len: usize, f: F)
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
        } else {
            let extra = new_len - self.len;
            self.cursor_end_mut()
                .insert_iter(std::iter::repeat_with(f).take(extra));
        }
    }

    /// Swaps the contents of two lists, including their allocators.
    ///
    /// No element or node is moved; cursors cannot outlive this call anyway.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Relinks the whole chain of `other` before the ghost of `self`, leaving
    /// `other` empty. *O*(1), no node is allocated or freed.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut head = List::from(['a']);
    /// let mut tail = List::from(['b', 'c']);
    /// head.append(&mut tail);
    /// assert_eq!((head.len(), tail.len()), (3, 0));
    /// assert_eq!(head.back(), Some(&'c'));
    /// ```
    pub fn append(&mut self, other: &mut Self) {
        if let Some(detached) = other.detach_all_nodes() {
            self.link_back(detached);
        }
    }

    /// Relinks the whole chain of `other` after the ghost of `self`, leaving
    /// `other` empty. *O*(1).
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut tail = List::from([3, 4]);
    /// tail.prepend(&mut List::from([1, 2]));
    /// assert_eq!(tail.into_vec(), vec![1, 2, 3, 4]);
    /// ```
    pub fn prepend(&mut self, other: &mut Self) {
        if let Some(detached) = other.detach_all_nodes() {
            self.link_front(detached);
        }
    }

    /// Moves the elements at `at..len` into a new list that shares a clone of
    /// the allocator. Walking to `at` is *O*(*n*); the split itself is *O*(1).
    ///
    /// # Panics
    ///
    /// Panics if `at > len`
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from_iter(0..5);
    /// let tail = list.split_off(3);
    /// assert_eq!(tail.into_vec(), vec![3, 4]);
    /// assert!(list.split_off(3).is_empty());
    /// assert_eq!(list.len(), 3);
    /// ```
    pub fn split_off(&mut self, at: usize) -> List<T, A>
    where
        A: Clone,
    {
        assert!(at <= self.len, "Cannot split off at a nonexistent index");
        if at == self.len {
            return List::new_in(self.alloc.clone());
        }
        self.cursor_mut(at)
            .split()
            .expect("Cannot split off at a nonexistent index")
    }

    /// Splices all elements of `other` before the given index. After this
    /// operation, `other` becomes empty.
    ///
    /// # Complexity
    ///
    /// Locating the index takes *O*(*n*) time, the splice itself *O*(1).
    ///
    /// # Panics
    ///
    /// Panics if `at > len`
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 2, 3]);
    /// let mut other = List::from([4, 5, 6]);
    ///
    /// list.splice_at(2, &mut other);
    ///
    /// assert_eq!(list.into_vec(), vec![1, 2, 4, 5, 6, 3]);
    /// assert!(other.is_empty());
    /// ```
    pub fn splice_at(&mut self, at: usize, other: &mut Self) {
        assert!(at <= self.len, "Cannot splice at a nonexistent index");
        self.cursor_mut(at).splice(other);
    }

    /// Moves the elements in `range` of `other` before the given index,
    /// keeping their order. Moving a single element is `i..i + 1`.
    ///
    /// # Complexity
    ///
    /// Finding the two positions walks both lists; the nodes themselves are
    /// relinked in *O*(1).
    ///
    /// # Panics
    ///
    /// Panics if `at > len`, or if `range` is decreasing or ends after
    /// `other.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 2, 3]);
    /// let mut other = List::from([4, 5, 6, 7]);
    ///
    /// list.splice_from(1, &mut other, 1..3);
    ///
    /// assert_eq!(list.into_vec(), vec![1, 5, 6, 2, 3]);
    /// assert_eq!(other.into_vec(), vec![4, 7]);
    /// ```
    pub fn splice_from(&mut self, at: usize, other: &mut Self, range: Range<usize>) {
        assert!(at <= self.len, "Cannot splice at a nonexistent index");
        assert!(
            range.start <= range.end && range.end <= other.len,
            "Cannot splice a range outside of the other list"
        );
        let mut source = other.cursor_mut(range.start);
        let spliced = self
            .cursor_mut(at)
            .splice_range(&mut source, range.end - range.start);
        debug_assert!(spliced.is_ok());
    }

    /// Moves the elements in `range` of this list before the given index,
    /// keeping their order.
    ///
    /// Moving a range right before itself (`at == range.start`) or right
    /// after itself (`at == range.end`) does nothing.
    ///
    /// # Complexity
    ///
    /// Finding the three positions walks the list; the nodes themselves are
    /// relinked in *O*(1).
    ///
    /// # Panics
    ///
    /// Panics if `at > len`, if `range` is decreasing or ends after `len`,
    /// or if `at` lies strictly inside `range`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from_iter(0..6);
    ///
    /// list.splice_within(0, 4..6);
    /// assert_eq!(list.to_vec(), vec![4, 5, 0, 1, 2, 3]);
    ///
    /// list.splice_within(6, 0..1);
    /// assert_eq!(list.to_vec(), vec![5, 0, 1, 2, 3, 4]);
    /// ```
    pub fn splice_within(&mut self, at: usize, range: Range<usize>) {
        assert!(at <= self.len, "Cannot splice at a nonexistent index");
        assert!(
            range.start <= range.end && range.end <= self.len,
            "Cannot splice a range outside of the list bounds"
        );
        assert!(
            !(range.start < at && at < range.end),
            "Cannot splice a range into itself"
        );
        if range.start == range.end || at == range.start || at == range.end {
            return;
        }
        let front = self.cursor(range.start).current;
        let back = self.cursor(range.end - 1).current;
        let to = self.cursor(at).current;
        // SAFETY: `front..=back` is a valid range of this list and `to` is a
        // node of this list outside of it.
        unsafe { link::move_nodes(front, back, to) };
    }
}

impl<T: Debug, A: NodeAllocator> Debug for List<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, A: NodeAllocator + Default> Default for List<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T> Node<T> {
    /// Create a ghost node, of which the links point to itself.
    fn new_ghost() -> NonNull<Node<T>> {
        let ghost = NonNull::from(Box::leak(Box::new(Node {
            next: NonNull::dangling(),
            prev: NonNull::dangling(),
            element: None,
        })));
        // SAFETY: `ghost` was just leaked from a box.
        unsafe { Node::unlink(ghost) };
        ghost
    }

    /// Allocate a node holding `element`. The node is detached: its links
    /// point to itself.
    pub(crate) fn allocate<A: NodeAllocator>(
        alloc: &A,
        element: T,
    ) -> Result<NonNull<Node<T>>, AllocError<T>> {
        let layout = Layout::new::<Node<T>>();
        let Some(ptr) = alloc.allocate(layout) else {
            tracing::debug!(
                size = layout.size(),
                align = layout.align(),
                "list node allocation failed"
            );
            return Err(AllocError::new(element, layout));
        };
        let node = ptr.cast::<Node<T>>();
        // SAFETY: the block is fresh, and it is sized and aligned for `Node<T>`.
        unsafe {
            node.as_ptr().write(Node {
                next: node,
                prev: node,
                element: Some(element),
            });
        }
        Ok(node)
    }

    /// Release a detached element node and return its element.
    ///
    /// It is unsafe because `node` must be allocated by [`Node::allocate`] with
    /// an allocator of type `A`, and must not be used afterwards.
    pub(crate) unsafe fn release<A: NodeAllocator>(alloc: &A, node: NonNull<Node<T>>) -> T {
        let Node { element, .. } = node.as_ptr().read();
        alloc.deallocate(node.cast(), Layout::new::<Node<T>>());
        match element {
            Some(element) => element,
            None => ghost_element(),
        }
    }

    /// Reset the links of `node` to point to itself.
    pub(crate) unsafe fn unlink(node: NonNull<Node<T>>) {
        (*node.as_ptr()).next = node;
        (*node.as_ptr()).prev = node;
    }

    #[inline]
    pub(crate) unsafe fn next(node: NonNull<Node<T>>) -> NonNull<Node<T>> {
        (*node.as_ptr()).next
    }

    #[inline]
    pub(crate) unsafe fn prev(node: NonNull<Node<T>>) -> NonNull<Node<T>> {
        (*node.as_ptr()).prev
    }

    /// The element of an element node.
    ///
    /// It is unsafe because `node` must be valid for `'a`. Panics at the ghost
    /// node.
    #[inline]
    pub(crate) unsafe fn element<'a>(node: NonNull<Node<T>>) -> &'a T {
        match &(*node.as_ptr()).element {
            Some(element) => element,
            None => ghost_element(),
        }
    }

    /// The element of an element node, mutably.
    ///
    /// It is unsafe because `node` must be valid and unaliased for `'a`. Panics
    /// at the ghost node.
    #[inline]
    pub(crate) unsafe fn element_mut<'a>(node: NonNull<Node<T>>) -> &'a mut T {
        match &mut (*node.as_ptr()).element {
            Some(element) => element,
            None => ghost_element(),
        }
    }
}

#[cold]
#[track_caller]
fn ghost_element() -> ! {
    panic!("the ghost node of a list holds no element")
}

impl<T, A: NodeAllocator> Drop for List<T, A> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the ghost node is leaked from a box in `Node::new_ghost`
        // and is never freed elsewhere.
        unsafe { drop(Box::from_raw(self.ghost.as_ptr())) };
    }
}

unsafe impl<T: Send, A: NodeAllocator + Send> Send for List<T, A> {}

unsafe impl<T: Sync, A: NodeAllocator + Sync> Sync for List<T, A> {}

// Ensure that `List` and its read-only iterators are covariant in their type parameters.
#[allow(dead_code)]
fn assert_covariance() {
    fn a<'a>(x: List<&'static str>) -> List<&'a str> {
        x
    }
    fn b<'i, 'a>(x: Iter<'i, &'static str>) -> Iter<'i, &'a str> {
        x
    }
    fn c<'a>(x: IntoIter<&'static str>) -> IntoIter<&'a str> {
        x
    }
}

#[cfg(test)]
impl<T, A: NodeAllocator> List<T, A> {
    /// Walk the ring and check that every link is mirrored, that only the
    /// ghost node lacks an element, and that `len` matches the ring.
    pub(crate) fn assert_ring(&self) {
        let ghost = self.ghost_node();
        let mut node = ghost;
        let mut count = 0;
        unsafe {
            assert!((*ghost.as_ptr()).element.is_none(), "ghost holds an element");
            loop {
                let next = Node::next(node);
                assert_eq!(Node::prev(next), node, "`next.prev` does not point back");
                node = next;
                if node == ghost {
                    break;
                }
                assert!((*node.as_ptr()).element.is_some(), "element node is empty");
                count += 1;
                assert!(count <= self.len, "ring is longer than `len`");
            }
        }
        assert_eq!(count, self.len, "ring is shorter than `len`");
    }
}


#[cfg(test)]
mod tests {
    use crate::alloc::NodeAllocator;
    use crate::list::List;
    use crate::testing::{CountingAlloc, DropChecker};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::fmt::Debug;

    fn list_eq<T, A, I>(list: &List<T, A>, expected: I)
    where
        T: Debug + Clone + Eq,
        A: NodeAllocator,
        I: IntoIterator<Item = T>,
    {
        list.assert_ring();
        assert_eq!(
            list.iter().cloned().collect::<Vec<_>>(),
            expected.into_iter().collect::<Vec<_>>()
        );
    }

    /// Element addresses only change when a node is reallocated.
    fn element_addrs<T, A: NodeAllocator>(list: &List<T, A>) -> Vec<*const T> {
        list.iter().map(|element| element as *const T).collect()
    }

    #[test]
    fn list_empty_has_only_the_ghost() {
        let alloc = CountingAlloc::new();
        let mut list = List::<char, _>::new_in(alloc.clone());
        list.assert_ring();
        assert_eq!(alloc.live(), 0);
        assert_eq!(list.cursor_start(), list.cursor_end());
        assert_eq!(list.cursor_end().index(), 0);
        assert_eq!((list.front(), list.back()), (None, None));
        assert_eq!(list.pop_front(), None);
        assert_eq!(list.pop_back(), None);

        list.push_back('a');
        assert_eq!(alloc.live(), 1);
        assert_ne!(list.cursor_start(), list.cursor_end());
        assert_eq!(list.cursor_end().index(), 1);
        assert_eq!((list.front(), list.back()), (Some(&'a'), Some(&'a')));

        assert_eq!(list.pop_front(), Some('a'));
        assert_eq!(alloc.live(), 0);
        assert!(list.is_empty());
        list.assert_ring();
    }

    #[test]
    fn list_drop_frees_front_to_back() {
        let dropped = RefCell::new(Vec::new());
        let alloc = CountingAlloc::new();
        let mut list = List::new_in(alloc.clone());
        for value in [3, 1, 2] {
            list.push_back(DropChecker::new(value, &dropped));
        }
        list.push_front(DropChecker::new(0, &dropped));
        assert_eq!(alloc.live(), 4);
        assert!(dropped.borrow().is_empty());

        drop(list);
        assert_eq!(*dropped.borrow(), vec![0, 3, 1, 2]);
        assert_eq!(alloc.live(), 0);
    }

    #[test]
    fn list_front_back_mut() {
        let mut list = List::from([1, 2, 3]);
        *list.front_mut().unwrap() = 10;
        *list.back_mut().unwrap() = 30;
        assert_eq!(list.to_vec(), vec![10, 2, 30]);
        list.clear();
        assert_eq!(list.front_mut(), None);
        assert_eq!(list.back_mut(), None);
    }

    #[test]
    fn list_insert_and_erase() {
        let mut list = List::from_iter(0..10);
        assert_eq!(list.insert(5, 10).current(), Some(&10));
        list_eq(&list, (0..5).chain(Some(10)).chain(5..10));

        assert_eq!(list.remove_at(10), 9);
        assert_eq!(list.back(), Some(&8));
        list_eq(&list, (0..5).chain(Some(10)).chain(5..9));

        list.insert(0, 11);
        assert_eq!(list.front(), Some(&11));
        list_eq(&list, (11..=11).chain((0..5).chain(Some(10)).chain(5..9)));

        assert_eq!(list.erase(0).current(), Some(&0));
        assert_eq!(list.front(), Some(&0));
        list_eq(&list, (0..5).chain(Some(10)).chain(5..9));

        list.insert(10, 12);
        assert_eq!(list.back(), Some(&12));
        list_eq(&list, (0..5).chain(Some(10)).chain(5..9).chain(Some(12)));

        let cursor = list.erase(10);
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.index(), 10);
        list_eq(&list, (0..5).chain(Some(10)).chain(5..9));
    }

    #[test]
    fn list_insert_cursor_stays_valid() {
        let mut list = List::from([1, 3]);
        let mut cursor = list.insert(1, 2);
        cursor.insert_before(0);
        cursor.push_front(-1);
        cursor.push_back(4);
        // The cursor still points at the node it inserted.
        assert_eq!(cursor.current(), Some(&2));
        assert_eq!(cursor.index(), 3);
        list_eq(&list, [-1, 1, 0, 2, 3, 4]);
    }

    #[test]
    fn list_erase_range_frees_nodes() {
        let alloc = CountingAlloc::new();
        let mut list: List<i32, _> = List::new_in(alloc.clone());
        list.extend(0..8);

        let cursor = list.erase_range(2..5);
        assert_eq!((cursor.index(), cursor.current()), (2, Some(&5)));
        assert_eq!(alloc.live(), 5);
        list_eq(&list, [0, 1, 5, 6, 7]);

        let cursor = list.erase_range(3..5);
        assert_eq!((cursor.index(), cursor.current()), (3, None));
        list_eq(&list, [0, 1, 5]);

        let cursor = list.erase_range(1..1);
        assert_eq!((cursor.index(), cursor.current()), (1, Some(&1)));
        assert_eq!(alloc.live(), 3);

        list.erase_range(0..3);
        assert!(list.is_empty());
        assert_eq!(alloc.live(), 0);
        list.assert_ring();
    }

    #[test]
    #[should_panic(expected = "Cannot erase at an index outside of the list bounds")]
    fn list_erase_ghost() {
        let mut list = List::from([1, 2]);
        list.erase(2);
    }

    #[test]
    fn list_append_prepend_and_split_relink_nodes() {
        let alloc = CountingAlloc::new();
        let mut front: List<u32, _> = List::new_in(alloc.clone());
        front.extend(0..3);
        let mut middle: List<u32, _> = List::new_in(alloc.clone());
        middle.extend(3..6);
        let mut back: List<u32, _> = List::new_in(alloc.clone());
        back.extend(6..9);

        let mut addrs = element_addrs(&front);
        addrs.extend(element_addrs(&middle));
        addrs.extend(element_addrs(&back));

        middle.prepend(&mut front);
        middle.append(&mut back);
        front.assert_ring();
        back.assert_ring();
        assert!(front.is_empty() && back.is_empty());
        list_eq(&middle, 0..9);
        assert_eq!(element_addrs(&middle), addrs);
        assert_eq!(alloc.live(), 9);

        // Moving an empty list in is a no-op.
        middle.append(&mut front);
        middle.prepend(&mut back);
        assert_eq!(middle.len(), 9);

        let mut tail = middle.split_off(6);
        let mut rest = middle.split_off(0);
        middle.assert_ring();
        assert!(middle.is_empty());
        assert!(middle.split_off(0).is_empty());
        assert!(tail.split_off(3).is_empty());
        list_eq(&rest, 0..6);
        list_eq(&tail, 6..9);
        assert_eq!(alloc.live(), 9);

        // The split lists allocate from clones of the same allocator.
        tail.push_back(9);
        rest.push_front(100);
        assert_eq!(alloc.live(), 11);
        assert_eq!(rest.pop_front(), Some(100));
        rest.append(&mut tail);
        list_eq(&rest, 0..10);
        assert_eq!(&element_addrs(&rest)[..9], &addrs[..]);
        drop(rest);
        assert_eq!(alloc.live(), 0);
    }

    #[test]
    fn list_splice_at_moves_cursor_past_the_spliced_nodes() {
        let alloc = CountingAlloc::new();
        for at in 0..=3 {
            let mut list: List<i32, _> = List::new_in(alloc.clone());
            list.extend(0..3);
            let mut other: List<i32, _> = List::new_in(alloc.clone());
            other.extend(10..12);
            let moved = element_addrs(&other);

            let mut cursor = list.cursor_mut(at);
            cursor.splice(&mut other);
            assert_eq!(cursor.index(), at + 2);
            assert_eq!(cursor.current().copied(), (at < 3).then_some(at as i32));

            assert!(other.is_empty());
            other.assert_ring();
            assert_eq!(alloc.live(), 5);
            assert_eq!(&element_addrs(&list)[at..at + 2], &moved[..]);

            let mut expected: Vec<i32> = (0..3).collect();
            expected.splice(at..at, 10..12);
            list_eq(&list, expected);

            list.splice_at(at, &mut other);
            assert_eq!(list.len(), 5);
        }
        assert_eq!(alloc.live(), 0);
    }

    #[test]
    fn list_splice_from() {
        let mut list = List::from([1, 2, 3]);
        let mut other = List::from_iter(10..15);

        list.splice_from(0, &mut other, 4..5);
        list_eq(&list, [14, 1, 2, 3]);
        list_eq(&other, 10..14);

        list.splice_from(4, &mut other, 0..2);
        list_eq(&list, [14, 1, 2, 3, 10, 11]);
        list_eq(&other, [12, 13]);

        list.splice_from(2, &mut other, 1..1);
        list_eq(&list, [14, 1, 2, 3, 10, 11]);
        list_eq(&other, [12, 13]);

        list.splice_from(2, &mut other, 0..2);
        list_eq(&list, [14, 1, 12, 13, 2, 3, 10, 11]);
        assert!(other.is_empty());
        other.assert_ring();
    }

    #[test]
    fn list_splice_within() {
        let mut list = List::from_iter(0..6);
        let addrs = element_addrs(&list);
        list.splice_within(2, 2..3);
        list_eq(&list, 0..6);
        list.splice_within(3, 2..3);
        list_eq(&list, 0..6);
        list.splice_within(1, 4..5);
        list_eq(&list, [0, 4, 1, 2, 3, 5]);
        list.splice_within(6, 0..2);
        list_eq(&list, [1, 2, 3, 5, 0, 4]);
        list.splice_within(0, 3..6);
        list_eq(&list, [5, 0, 4, 1, 2, 3]);

        let mut relinked = element_addrs(&list);
        relinked.sort();
        let mut original = addrs;
        original.sort();
        assert_eq!(relinked, original);
    }

    #[test]
    #[should_panic(expected = "Cannot splice a range into itself")]
    fn list_splice_within_overlap() {
        let mut list = List::from_iter(0..6);
        list.splice_within(3, 1..5);
    }

    #[test]
    fn list_resize_and_fill() {
        let mut list = List::from_elem(3, String::from("a"));
        list_eq(&list, ["a", "a", "a"].map(String::from));
        let first = list.cursor(0).current.as_ptr();
        let second = list.cursor(1).current.as_ptr();
        assert_ne!(first, second);

        list.resize(5, String::from("b"));
        list_eq(&list, ["a", "a", "a", "b", "b"].map(String::from));
        list.resize(2, String::from("c"));
        list_eq(&list, ["a", "a"].map(String::from));

        let mut counter = 0;
        let mut list = List::<i32>::with_len(2);
        list.resize_with(4, || {
            counter += 1;
            counter
        });
        list_eq(&list, [0, 0, 1, 2]);
        list.truncate(1);
        list_eq(&list, [0]);
        list.truncate(3);
        list_eq(&list, [0]);
    }

    #[test]
    fn list_swap() {
        let left_alloc = CountingAlloc::new();
        let right_alloc = CountingAlloc::new();
        let mut a: List<i32, _> = List::new_in(left_alloc.clone());
        a.extend([1, 2]);
        let mut b: List<i32, _> = List::new_in(right_alloc.clone());
        b.extend([3]);

        a.swap(&mut b);
        list_eq(&a, [3]);
        list_eq(&b, [1, 2]);

        // The allocators travel with the nodes.
        a.push_back(4);
        assert_eq!((left_alloc.live(), right_alloc.live()), (2, 2));
        drop(b);
        assert_eq!((left_alloc.live(), right_alloc.live()), (0, 2));
    }

    #[test]
    fn list_allocator_accounting() {
        let alloc = CountingAlloc::new();
        let mut list: List<i32, _> = List::new_in(alloc.clone());
        list.extend(0..10);
        assert_eq!(alloc.live(), 10);

        let mut other: List<i32, _> = List::new_in(alloc.clone());
        other.extend(10..15);
        list.splice_at(4, &mut other);
        assert_eq!(alloc.live(), 15);

        list.erase_range(0..3);
        assert_eq!(alloc.live(), 12);
        drop(other);
        assert_eq!(alloc.live(), 12);
        drop(list);
        assert_eq!(alloc.live(), 0);
    }

    #[test]
    fn list_allocation_failure_leaves_list_unchanged() {
        let alloc = CountingAlloc::with_budget(2);
        let mut list = List::new_in(alloc.clone());
        assert!(list.try_push_back(1).is_ok());
        assert!(list.try_push_front(0).is_ok());

        let err = list.try_push_back(2).unwrap_err();
        assert_eq!(err.into_inner(), 2);
        let err = list.try_push_front(-1).unwrap_err();
        assert_eq!(err.into_inner(), -1);
        assert!(list.try_insert(1, 5).is_err());

        assert_eq!(list.len(), 2);
        list.assert_ring();
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(alloc.live(), 2);

        alloc.set_budget(None);
        assert_eq!(list.try_insert(1, 5).map(|c| c.index()).ok(), Some(1));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![0, 5, 1]);
    }

    #[test]
    fn list_matches_vec_deque_model() {
        let mut rng = SmallRng::seed_from_u64(0xc0ffee);
        let mut list = List::new();
        let mut model = VecDeque::new();
        for step in 0..5000u32 {
            let len = model.len();
            match rng.random_range(0..11) {
                0 => {
                    list.push_front(step);
                    model.push_front(step);
                }
                1 => {
                    list.push_back(step);
                    model.push_back(step);
                }
                2 => assert_eq!(list.pop_front(), model.pop_front()),
                3 => assert_eq!(list.pop_back(), model.pop_back()),
                4 => {
                    let at = rng.random_range(0..=len);
                    assert_eq!(list.insert(at, step).index(), at);
                    model.insert(at, step);
                }
                5 if len > 0 => {
                    let at = rng.random_range(0..len);
                    assert_eq!(list.remove_at(at), model.remove(at).unwrap());
                }
                6 if len > 0 => {
                    let at = rng.random_range(0..len);
                    assert_eq!(list.erase(at).index(), at);
                    model.remove(at);
                }
                7 => {
                    let at = rng.random_range(0..=len);
                    let extra: Vec<u32> = (0..rng.random_range(0..4)).map(|i| step + i).collect();
                    let mut other = List::from_iter(extra.iter().copied());
                    list.splice_at(at, &mut other);
                    assert!(other.is_empty());
                    for (offset, value) in extra.into_iter().enumerate() {
                        model.insert(at + offset, value);
                    }
                }
                8 => {
                    let start = rng.random_range(0..=len);
                    let end = rng.random_range(start..=len);
                    let at = if rng.random_bool(0.5) {
                        rng.random_range(0..=start)
                    } else {
                        rng.random_range(end..=len)
                    };
                    list.splice_within(at, start..end);
                    let mut values = Vec::from(std::mem::take(&mut model));
                    let moved: Vec<u32> = values.drain(start..end).collect();
                    let pos = if at <= start { at } else { at - moved.len() };
                    values.splice(pos..pos, moved);
                    model = VecDeque::from(values);
                }
                9 => {
                    list.reverse();
                    model.make_contiguous().reverse();
                }
                _ => {
                    let keep = rng.random_range(len / 2..=len);
                    list.truncate(keep);
                    model.truncate(keep);
                }
            }
            assert_eq!(list.len(), model.len(), "step {step}");
            if step % 64 == 0 {
                list.assert_ring();
                assert!(list.iter().eq(model.iter()), "step {step}");
            }
        }
        list.assert_ring();
        assert_eq!(list.into_vec(), Vec::from(model));
    }
}
