use crate::alloc::{Global, NodeAllocator};
use crate::error::{AllocError, CursorError};
use crate::list::{List, Node};
use std::cmp::Ordering;
use std::fmt;
use std::ptr::NonNull;

/// A read-only position in a [`List`], together with its index.
///
/// A list of length *n* has *n* + 1 positions: one per element and the ghost
/// at index *n*. A `Cursor` never leaves that range. [`Cursor::move_next`]
/// and [`Cursor::move_prev`] refuse to step over the ghost, while the
/// `_cyclic` variants go around the ring through it.
///
/// References handed out by a `Cursor` live as long as the list borrow, so
/// several cursors and their elements can be held at once.
///
/// ```
/// use ring_list::{CursorError, List};
///
/// let list = List::from(['w', 'x', 'y']);
/// let mut cursor = list.cursor(1);
/// let x = cursor.current();
///
/// cursor.move_next().unwrap();
/// cursor.move_next().unwrap();
/// assert_eq!((cursor.index(), cursor.current()), (3, None));
/// assert_eq!(cursor.move_next(), Err(CursorError::PastEnd));
///
/// cursor.move_next_cyclic();
/// assert_eq!((cursor.index(), cursor.current()), (0, Some(&'w')));
/// assert_eq!(x, Some(&'x'));
/// ```
pub struct Cursor<'a, T: 'a, A: NodeAllocator = Global> {
    index: usize,
    pub(crate) current: NonNull<Node<T>>,
    pub(crate) list: &'a List<T, A>,
}

impl<'a, T: 'a, A: NodeAllocator> Clone for Cursor<'a, T, A> {
    fn clone(&self) -> Self {
        Cursor::new(self.list, self.current, self.index)
    }
}

/// Two cursors are equal when they sit on the same node. Cursors of
/// different lists are never equal, and a `Cursor` compares with a
/// `CursorMut` the same way.
///
/// ```
/// use ring_list::List;
///
/// let list = List::from([0, 0]);
/// let copy = list.clone();
///
/// let mut cursor = list.cursor_start();
/// cursor.move_next_cyclic();
/// assert_eq!(cursor, list.cursor(1));
/// assert_ne!(cursor, list.cursor(0));
/// assert_ne!(list.cursor(0), copy.cursor(0));
/// ```
impl<'a, 'b, T, A: NodeAllocator> PartialEq<Cursor<'b, T, A>> for Cursor<'a, T, A> {
    fn eq(&self, other: &Cursor<'b, T, A>) -> bool {
        self.current == other.current
    }
}

impl<'a, T: 'a, A: NodeAllocator> Eq for Cursor<'a, T, A> {}

impl<'a, 'b, T, A: NodeAllocator> PartialEq<CursorMut<'b, T, A>> for Cursor<'a, T, A> {
    fn eq(&self, other: &CursorMut<'b, T, A>) -> bool {
        self.current == other.current
    }
}

impl<'a, 'b, T, A: NodeAllocator> PartialEq<Cursor<'b, T, A>> for CursorMut<'a, T, A> {
    fn eq(&self, other: &Cursor<'b, T, A>) -> bool {
        self.current == other.current
    }
}

impl<'a, 'b, T, A: NodeAllocator> PartialEq<CursorMut<'b, T, A>> for CursorMut<'a, T, A> {
    fn eq(&self, other: &CursorMut<'b, T, A>) -> bool {
        self.current == other.current
    }
}

/// Cursors of one list are ordered by index, with the ghost last. Cursors
/// of different lists are unordered.
///
/// ```
/// use ring_list::List;
///
/// let list = List::from([1, 2, 3]);
/// assert!(list.cursor(1) < list.cursor_end());
/// assert_eq!(list.cursor(0).partial_cmp(&List::from([1]).cursor(0)), None);
/// ```
impl<'a, 'b, T, A: NodeAllocator> PartialOrd<Cursor<'b, T, A>> for Cursor<'a, T, A> {
    fn partial_cmp(&self, other: &Cursor<'b, T, A>) -> Option<Ordering> {
        if self.list.ghost_node() != other.list.ghost_node() {
            return None;
        }
        Some(self.index.cmp(&other.index))
    }
}

/// A position in a [`List`] through which the list can be edited.
///
/// It moves like a [`Cursor`] and also inserts, removes, splices and splits
/// at its position. The cursor holds the only borrow of the list, so the
/// references it hands out borrow the cursor itself. Use
/// [`CursorMut::view`] or [`CursorMut::as_cursor`] to read the rest of the
/// list meanwhile.
///
/// ```compile_fail
/// use ring_list::List;
///
/// let mut list = List::from([1, 2, 3]);
/// let mut cursor = list.cursor_mut(1);
/// list.push_back(4);
/// cursor.insert(0);
/// ```
pub struct CursorMut<'a, T: 'a, A: NodeAllocator = Global> {
    index: usize,
    pub(crate) current: NonNull<Node<T>>,
    pub(crate) list: &'a mut List<T, A>,
}

macro_rules! impl_cursor {
    ($CURSOR:ident) => {
        // node-level helpers
        impl<'a, T: 'a, A: NodeAllocator> $CURSOR<'a, T, A> {
            pub(crate) fn is_ghost_node(&self) -> bool {
                self.current == self.list.ghost_node()
            }
            pub(crate) fn is_front_node(&self) -> bool {
                self.prev_node() == self.list.ghost_node()
            }
            pub(crate) fn next_node(&self) -> NonNull<Node<T>> {
                // SAFETY: every node of the ring has a valid successor.
                unsafe { Node::next(self.current) }
            }
            pub(crate) fn prev_node(&self) -> NonNull<Node<T>> {
                // SAFETY: every node of the ring has a valid predecessor.
                unsafe { Node::prev(self.current) }
            }

            /// Step `steps` nodes towards the ghost.
            ///
            /// It is unsafe because `index + steps` must not exceed `len`,
            /// otherwise the walk wraps around and `index` is wrong.
            unsafe fn walk_forward(&mut self, steps: usize) {
                for _ in 0..steps {
                    self.current = self.next_node();
                }
                self.index += steps;
            }

            /// Step `steps` nodes towards the front.
            ///
            /// It is unsafe because `steps` must not exceed `index`.
            unsafe fn walk_backward(&mut self, steps: usize) {
                for _ in 0..steps {
                    self.current = self.prev_node();
                }
                self.index -= steps;
            }
        }

        impl<'a, T: 'a, A: NodeAllocator> $CURSOR<'a, T, A> {
            /// The position of the cursor, in `0..=len`. The ghost is at `len`.
            #[inline]
            pub fn index(&self) -> usize {
                self.index
            }

            /// Same as [`List::len`].
            #[inline]
            pub fn len(&self) -> usize {
                self.list.len()
            }

            /// Same as [`List::is_empty`].
            #[inline]
            pub fn is_empty(&self) -> bool {
                self.list.is_empty()
            }

            /// Step to the next node, going from the ghost to index 0. Does
            /// nothing on an empty list, where the ghost is the only node.
            ///
            /// ```
            /// use ring_list::List;
            ///
            /// let list = List::from([1, 2]);
            /// let mut cursor = list.cursor(1);
            /// cursor.move_next_cyclic();
            /// assert_eq!(cursor.index(), 2);
            /// cursor.move_next_cyclic();
            /// assert_eq!((cursor.index(), cursor.current()), (0, Some(&1)));
            /// ```
            pub fn move_next_cyclic(&mut self) {
                if self.is_empty() {
                    return;
                }
                self.index = if self.is_ghost_node() { 0 } else { self.index + 1 };
                self.current = self.next_node();
            }

            /// Step to the previous node, going from index 0 to the ghost.
            /// Does nothing on an empty list.
            pub fn move_prev_cyclic(&mut self) {
                if self.is_empty() {
                    return;
                }
                self.index = if self.is_front_node() {
                    self.list.len()
                } else {
                    self.index - 1
                };
                self.current = self.prev_node();
            }

            /// Step to the next node, or fail with [`CursorError::PastEnd`]
            /// when the cursor is on the ghost. The cursor does not move on
            /// failure.
            pub fn move_next(&mut self) -> Result<(), CursorError> {
                if self.is_ghost_node() {
                    return Err(CursorError::PastEnd);
                }
                self.move_next_cyclic();
                Ok(())
            }

            /// Step to the previous node, or fail with
            /// [`CursorError::BeforeStart`] when the cursor is at index 0.
            ///
            /// ```
            /// use ring_list::{CursorError, List};
            ///
            /// let list = List::from(['a']);
            /// let mut cursor = list.cursor_end();
            /// assert_eq!(cursor.move_prev(), Ok(()));
            /// assert_eq!(cursor.move_prev(), Err(CursorError::BeforeStart));
            /// assert_eq!(cursor.current(), Some(&'a'));
            /// ```
            pub fn move_prev(&mut self) -> Result<(), CursorError> {
                if self.is_front_node() {
                    return Err(CursorError::BeforeStart);
                }
                self.move_prev_cyclic();
                Ok(())
            }

            /// Advance `steps` positions without wrapping. If the ghost is
            /// closer than that, the cursor stops on it and the number of
            /// steps actually taken is returned as the error.
            ///
            /// ```
            /// use ring_list::List;
            ///
            /// let list = List::from_iter(0..4);
            /// let mut cursor = list.cursor(1);
            /// assert_eq!(cursor.seek_forward(2), Ok(()));
            /// assert_eq!(cursor.seek_forward(2), Err(1));
            /// assert_eq!(cursor.index(), 4);
            /// ```
            pub fn seek_forward(&mut self, steps: usize) -> Result<(), usize> {
                let room = self.list.len() - self.index;
                // SAFETY: neither walk goes past index `len`.
                unsafe {
                    if steps > room {
                        self.walk_forward(room);
                        return Err(room);
                    }
                    self.walk_forward(steps);
                }
                Ok(())
            }

            /// Go back `steps` positions without wrapping. If index 0 is
            /// closer than that, the cursor stops there and the number of
            /// steps actually taken is returned as the error.
            pub fn seek_backward(&mut self, steps: usize) -> Result<(), usize> {
                let room = self.index;
                // SAFETY: neither walk goes below index 0.
                unsafe {
                    if steps > room {
                        self.walk_backward(room);
                        return Err(room);
                    }
                    self.walk_backward(steps);
                }
                Ok(())
            }

            /// Jump to index `target`. Fails with `target - len` if `target`
            /// is past the ghost, leaving the cursor in place.
            ///
            /// The walk starts from the cursor, the front or the ghost,
            /// whichever is closest to `target`.
            ///
            /// ```
            /// use ring_list::List;
            ///
            /// let list = List::from_iter(0..100);
            /// let mut cursor = list.cursor(50);
            /// assert_eq!(cursor.seek_to(98), Ok(()));
            /// assert_eq!(cursor.current(), Some(&98));
            /// assert_eq!(cursor.seek_to(103), Err(3));
            /// assert_eq!(cursor.index(), 98);
            /// ```
            pub fn seek_to(&mut self, target: usize) -> Result<(), usize> {
                let len = self.list.len();
                if target > len {
                    return Err(target - len);
                }
                let (from_front, from_ghost) = (target, len - target);
                if from_front.min(from_ghost) < self.index.abs_diff(target) {
                    if from_front <= from_ghost {
                        self.move_to_start();
                    } else {
                        self.move_to_end();
                    }
                }
                // SAFETY: both `index` and `target` are in `0..=len`, so the
                // walk between them does not pass over the ghost.
                unsafe {
                    if target >= self.index {
                        self.walk_forward(target - self.index);
                    } else {
                        self.walk_backward(self.index - target);
                    }
                }
                Ok(())
            }

            /// Jump to index 0, which is the ghost when the list is empty.
            #[inline]
            pub fn move_to_start(&mut self) {
                self.index = 0;
                self.current = self.list.front_node();
            }

            /// Jump to the ghost, at index `len`.
            #[inline]
            pub fn move_to_end(&mut self) {
                self.index = self.list.len();
                self.current = self.list.ghost_node();
            }
        }

        impl<'a, T: fmt::Debug + 'a, A: NodeAllocator> fmt::Debug for $CURSOR<'a, T, A> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($CURSOR))
                    .field("index", &self.index)
                    .field("current", &self.current())
                    .field("list", &self.list)
                    .finish()
            }
        }
    };
}

impl_cursor!(CursorMut);
impl_cursor!(Cursor);

impl<'a, T: 'a, A: NodeAllocator> Cursor<'a, T, A> {
    pub(crate) fn new(list: &'a List<T, A>, current: NonNull<Node<T>>, index: usize) -> Self {
        Self {
            index,
            current,
            list,
        }
    }

    /// The element under the cursor, `None` on the ghost.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let list = List::from(["one", "two"]);
    /// let found: Vec<_> = (0..=2).map(|i| list.cursor(i).current()).collect();
    /// assert_eq!(found, vec![Some(&"one"), Some(&"two"), None]);
    /// ```
    pub fn current(&self) -> Option<&'a T> {
        // SAFETY: the node lives as long as the list is borrowed, and only
        // the ghost node lacks an element.
        unsafe { (*self.current.as_ptr()).element.as_ref() }
    }

    /// The element right before the cursor, `None` at index 0.
    pub fn previous(&self) -> Option<&'a T> {
        // SAFETY: the node before index 0 is the ghost, which holds no
        // element.
        unsafe { (*self.prev_node().as_ptr()).element.as_ref() }
    }

    /// The list the cursor walks, for as long as the cursor's borrow.
    pub fn view(&self) -> &'a List<T, A> {
        self.list
    }

    /// Count the forward steps from this cursor to `other`, without
    /// crossing the ghost node.
    ///
    /// Returns `None` if `other` is located before this cursor, or belongs
    /// to another list.
    ///
    /// This operation walks the nodes one by one, and should compute in
    /// *O*(*n*) time regardless of the tracked indices.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let list = List::from([1, 2, 3, 4]);
    /// let start = list.cursor(1);
    /// assert_eq!(start.distance_to(&list.cursor(3)), Some(2));
    /// assert_eq!(start.distance_to(&list.cursor_end()), Some(3));
    /// assert_eq!(start.distance_to(&list.cursor_start()), None);
    /// ```
    pub fn distance_to(&self, other: &Cursor<'_, T, A>) -> Option<usize> {
        let ghost = self.list.ghost_node();
        let mut node = self.current;
        let mut steps = 0;
        loop {
            if node == other.current {
                return Some(steps);
            }
            if node == ghost {
                return None;
            }
            // SAFETY: `node` is a node of the list other than the ghost.
            node = unsafe { Node::next(node) };
            steps += 1;
        }
    }
}

impl<'a, T: 'a, A: NodeAllocator> CursorMut<'a, T, A> {
    pub(crate) fn new(list: &'a mut List<T, A>, current: NonNull<Node<T>>, index: usize) -> Self {
        Self {
            index,
            current,
            list,
        }
    }

    /// Attach a detached node before the cursor. The cursor stays put.
    fn link_before(&mut self, node: NonNull<Node<T>>) {
        // SAFETY: `self.current` is a node in the list, and `node` was just
        // allocated by the allocator of the list.
        unsafe { self.list.attach_node(self.current, node) };
        self.index += 1;
    }
}

// access without relinking
impl<'a, T: 'a, A: NodeAllocator> CursorMut<'a, T, A> {
    /// See [`Cursor::current`]. The reference borrows the cursor.
    pub fn current(&self) -> Option<&T> {
        // SAFETY: only the ghost node lacks an element.
        unsafe { (*self.current.as_ptr()).element.as_ref() }
    }

    /// See [`Cursor::previous`]. The reference borrows the cursor.
    pub fn previous(&self) -> Option<&T> {
        // SAFETY: the node before index 0 is the ghost.
        unsafe { (*self.prev_node().as_ptr()).element.as_ref() }
    }

    /// Mutable access to the element under the cursor, `None` on the ghost.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([String::from("a"), String::from("b")]);
    /// let mut cursor = list.cursor_mut(1);
    /// cursor.current_mut().unwrap().push('!');
    /// cursor.move_next().unwrap();
    /// assert!(cursor.current_mut().is_none());
    /// assert_eq!(list.into_vec(), vec!["a", "b!"]);
    /// ```
    pub fn current_mut(&mut self) -> Option<&mut T> {
        // SAFETY: the list is borrowed mutably through the cursor.
        unsafe { (*self.current.as_ptr()).element.as_mut() }
    }

    /// Mutable access to the element before the cursor, `None` at index 0.
    pub fn previous_mut(&mut self) -> Option<&mut T> {
        // SAFETY: the list is borrowed mutably through the cursor.
        unsafe { (*self.prev_node().as_ptr()).element.as_mut() }
    }

    /// Re-borrow the mutable cursor as a short-lived immutable one.
    pub fn as_cursor(&self) -> Cursor<'_, T, A> {
        Cursor::new(self.list, self.current, self.index)
    }

    /// Give up editing and keep a read-only cursor at the same position for
    /// the rest of the borrow.
    pub fn into_cursor(self) -> Cursor<'a, T, A> {
        Cursor::new(self.list, self.current, self.index)
    }

    /// The whole list, read-only, for as long as the returned reference is
    /// held. The cursor cannot edit in the meantime.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([4, 8]);
    /// let mut cursor = list.cursor_end_mut();
    /// let total: i32 = cursor.view().iter().sum();
    /// cursor.insert(total);
    /// assert_eq!(list.into_vec(), vec![4, 8, 12]);
    /// ```
    pub fn view(&self) -> &List<T, A> {
        self.list
    }
}

// edits
impl<'a, T: 'a, A: NodeAllocator> CursorMut<'a, T, A> {
    /// [`List::push_front`] through the cursor. Everything after the new
    /// front shifts by one, so the cursor's index grows by one too.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 2]);
    /// let mut cursor = list.cursor_mut(1);
    /// cursor.push_front(0);
    /// assert_eq!((cursor.index(), cursor.current()), (2, Some(&2)));
    /// ```
    pub fn push_front(&mut self, item: T) {
        self.list.push_front(item);
        self.index += 1;
    }

    /// [`List::pop_front`] through the cursor. A cursor on the removed
    /// element moves to the new front.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        if self.is_front_node() {
            self.current = self.next_node();
        } else {
            self.index -= 1;
        }
        self.list.pop_front()
    }

    /// [`List::push_back`] through the cursor. A cursor on the ghost stays
    /// on it, one index further.
    pub fn push_back(&mut self, item: T) {
        if self.is_ghost_node() {
            self.index += 1;
        }
        self.list.push_back(item)
    }

    /// [`List::pop_back`] through the cursor. A cursor on the removed
    /// element moves to the ghost.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from(['a', 'b']);
    /// let mut cursor = list.cursor_mut(1);
    /// assert_eq!(cursor.pop_back(), Some('b'));
    /// assert_eq!((cursor.index(), cursor.current()), (1, None));
    /// ```
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        if self.current == self.list.back_node() {
            self.current = self.list.ghost_node();
        } else if self.is_ghost_node() {
            self.index -= 1;
        }
        self.list.pop_back()
    }

    /// Insert `item` at the cursor's index: the new node goes before the
    /// current one and the cursor moves onto it, so `index` is unchanged.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from(['a', 'c']);
    /// let mut cursor = list.cursor_mut(1);
    /// cursor.insert('b');
    /// assert_eq!((cursor.index(), cursor.current()), (1, Some(&'b')));
    ///
    /// cursor.move_to_end();
    /// cursor.insert('d');
    /// assert_eq!((cursor.index(), cursor.current()), (3, Some(&'d')));
    /// assert_eq!(list.into_vec(), vec!['a', 'b', 'c', 'd']);
    /// ```
    pub fn insert(&mut self, item: T) {
        self.try_insert(item).unwrap_or_else(|err| err.handle())
    }

    /// Like [`CursorMut::insert`], but hands the element back when its node
    /// cannot be allocated. The list and the cursor are unchanged on failure.
    pub fn try_insert(&mut self, item: T) -> Result<(), AllocError<T>> {
        self.try_insert_before(item)?;
        self.current = self.prev_node();
        self.index -= 1;
        Ok(())
    }

    /// Insert `item` before the current node and stay on that node, whose
    /// index grows by one.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from(['a', 'c']);
    /// let mut cursor = list.cursor_mut(1);
    /// cursor.insert_before('b');
    /// assert_eq!((cursor.index(), cursor.current()), (2, Some(&'c')));
    /// assert_eq!(cursor.previous(), Some(&'b'));
    /// ```
    pub fn insert_before(&mut self, item: T) {
        self.try_insert_before(item)
            .unwrap_or_else(|err| err.handle())
    }

    /// Like [`CursorMut::insert_before`], but hands the element back when its
    /// node cannot be allocated. The list and the cursor are unchanged on
    /// failure.
    pub fn try_insert_before(&mut self, item: T) -> Result<(), AllocError<T>> {
        let node = self.list.new_node(item)?;
        self.link_before(node);
        Ok(())
    }

    /// Add the elements of `iter` before the cursor position, in order, and
    /// return how many were added.
    ///
    /// The cursor moves onto the first added element, if any, keeping its
    /// `index`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 5]);
    /// let mut cursor = list.cursor_mut(1);
    ///
    /// assert_eq!(cursor.insert_iter(2..5), 3);
    /// assert_eq!(cursor.current(), Some(&2));
    /// assert_eq!(cursor.index(), 1);
    ///
    /// assert_eq!(list.into_vec(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn insert_iter<I>(&mut self, iter: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let start = self.index;
        let mut first = None;
        for item in iter {
            self.insert_before(item);
            first.get_or_insert(self.prev_node());
        }
        match first {
            Some(first) => {
                let inserted = self.index - start;
                self.current = first;
                self.index = start;
                inserted
            }
            None => 0,
        }
    }

    /// Add `n` clones of `value` before the cursor position. Each clone gets
    /// its own node.
    ///
    /// The cursor moves onto the first added element, if any, keeping its
    /// `index`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 2]);
    /// let mut cursor = list.cursor_mut(1);
    ///
    /// cursor.insert_n(2, 0);
    /// assert_eq!(cursor.index(), 1);
    ///
    /// assert_eq!(list.into_vec(), vec![1, 0, 0, 2]);
    /// ```
    pub fn insert_n(&mut self, n: usize, value: T) -> usize
    where
        T: Clone,
    {
        self.insert_iter(std::iter::repeat(value).take(n))
    }

    /// Unlink the current node, free it and return its element. The cursor
    /// lands on the following node at the same index. On the ghost this
    /// does nothing and returns `None`.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from_iter(0..4);
    /// let mut cursor = list.cursor_mut(2);
    /// assert_eq!(cursor.remove(), Some(2));
    /// assert_eq!((cursor.index(), cursor.current()), (2, Some(&3)));
    /// assert_eq!(cursor.remove(), Some(3));
    /// assert_eq!(cursor.remove(), None);
    /// assert_eq!(list.into_vec(), vec![0, 1]);
    /// ```
    pub fn remove(&mut self) -> Option<T> {
        if self.is_ghost_node() {
            return None;
        }
        let node = self.current;
        self.current = self.next_node();
        // SAFETY: `node` is an element node of the list and the cursor has
        // moved off it.
        let node = unsafe { self.list.detach_node(node) };
        // SAFETY: `node` was just detached and is not referenced elsewhere.
        Some(unsafe { self.list.free_node(node) })
    }

    /// Remove up to `n` elements starting at the cursor and return how many
    /// were removed. Removal stops at the ghost node. The cursor ends at the
    /// node after the last removed one.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from_iter(0..6);
    /// let mut cursor = list.cursor_mut(2);
    ///
    /// assert_eq!(cursor.remove_n(2), 2);
    /// assert_eq!(cursor.current(), Some(&4));
    /// assert_eq!(cursor.remove_n(5), 2);
    /// assert_eq!(cursor.current(), None);
    ///
    /// assert_eq!(list.into_vec(), vec![0, 1]);
    /// ```
    pub fn remove_n(&mut self, n: usize) -> usize {
        let mut removed = 0;
        while removed < n && self.remove().is_some() {
            removed += 1;
        }
        removed
    }

    /// Remove the element before the cursor, which stays on its node one
    /// index lower. At index 0 this returns `None`.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from(['x', 'y']);
    /// let mut cursor = list.cursor_end_mut();
    /// assert_eq!(cursor.backspace(), Some('y'));
    /// assert_eq!(cursor.backspace(), Some('x'));
    /// assert_eq!(cursor.backspace(), None);
    /// assert_eq!(cursor.index(), 0);
    /// ```
    pub fn backspace(&mut self) -> Option<T> {
        self.move_prev().ok()?;
        self.remove()
    }

    /// Relink every node of `other` before the cursor, in *O*(1). The cursor
    /// stays on its node, so its index grows by `other.len()`, and `other`
    /// is left empty.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([0, 3]);
    /// let mut cursor = list.cursor_mut(1);
    /// cursor.splice(&mut List::from([1, 2]));
    /// assert_eq!((cursor.index(), cursor.current()), (3, Some(&3)));
    /// assert_eq!(list.into_vec(), vec![0, 1, 2, 3]);
    /// ```
    pub fn splice(&mut self, other: &mut List<T, A>) {
        if let Some(detached) = other.detach_all_nodes() {
            tracing::trace!(len = self.len(), other_len = detached.len, "splicing list");
            self.index += detached.len;
            // SAFETY: `self.current` is a valid node in the list.
            unsafe { self.list.attach_nodes(self.current, detached) };
        }
    }

    /// Move the element at `source` before the cursor. `source` moves to the
    /// next node of its list, keeping its `index`.
    ///
    /// Returns [`CursorError::Ghost`] if `source` is at the ghost node.
    ///
    /// This operation should compute in *O*(*1*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::{CursorError, List};
    ///
    /// let mut list = List::from([1, 3]);
    /// let mut other = List::from([2, 4]);
    ///
    /// let mut source = other.cursor_start_mut();
    /// let mut cursor = list.cursor_mut(1);
    ///
    /// assert_eq!(cursor.splice_element(&mut source), Ok(()));
    /// assert_eq!(source.current(), Some(&4));
    /// source.move_to_end();
    /// assert_eq!(cursor.splice_element(&mut source), Err(CursorError::Ghost));
    ///
    /// assert_eq!(list.into_vec(), vec![1, 2, 3]);
    /// assert_eq!(other.into_vec(), vec![4]);
    /// ```
    pub fn splice_element(&mut self, source: &mut CursorMut<'_, T, A>) -> Result<(), CursorError> {
        if source.is_ghost_node() {
            return Err(CursorError::Ghost);
        }
        let next = source.next_node();
        let node = std::mem::replace(&mut source.current, next);
        // SAFETY: `node` is an element node of the source list, and both
        // lists free nodes with the same allocator type.
        let node = unsafe { source.list.detach_node(node) };
        self.link_before(node);
        Ok(())
    }

    /// Move `count` elements, starting at `source`, before the cursor, keeping
    /// their order. `source` moves to the node after the moved range, keeping
    /// its `index`.
    ///
    /// If fewer than `count` elements follow `source`, nothing is moved and
    /// the number of available elements is returned.
    ///
    /// This operation should compute in *O*(`count`) time to locate the end of
    /// the range; the nodes themselves are relinked in *O*(1).
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 5]);
    /// let mut other = List::from_iter(0..6);
    ///
    /// let mut source = other.cursor_mut(2);
    /// let mut cursor = list.cursor_mut(1);
    ///
    /// assert_eq!(cursor.splice_range(&mut source, 5), Err(4));
    /// assert_eq!(cursor.splice_range(&mut source, 3), Ok(()));
    /// assert_eq!(cursor.index(), 4);
    /// assert_eq!(source.current(), Some(&5));
    ///
    /// assert_eq!(list.into_vec(), vec![1, 2, 3, 4, 5]);
    /// assert_eq!(other.into_vec(), vec![0, 1, 5]);
    /// ```
    pub fn splice_range(&mut self, source: &mut CursorMut<'_, T, A>, count: usize) -> Result<(), usize> {
        let available = source.list.len() - source.index;
        if count > available {
            return Err(available);
        }
        if count == 0 {
            return Ok(());
        }
        let front = source.current;
        let mut back = front;
        for _ in 1..count {
            // SAFETY: `count <= available`, so the walk stays within the elements.
            back = unsafe { Node::next(back) };
        }
        // SAFETY: `back` is an element node, so `back.next` is valid.
        source.current = unsafe { Node::next(back) };
        // SAFETY: `front..=back` holds `count` element nodes of the source
        // list, and `self.current` is a node of another list.
        unsafe {
            let detached = source.list.detach_nodes(front, back, count);
            self.list.attach_nodes(self.current, detached);
        }
        self.index += count;
        Ok(())
    }
}

impl<'a, T: 'a, A: NodeAllocator + Clone> CursorMut<'a, T, A> {
    /// Cut the list at the cursor: the current node and everything after it
    /// move to a new list sharing a clone of the allocator. The cursor ends
    /// on the ghost, at the same index. Returns `None` on the ghost.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from_iter(0..5);
    /// let mut cursor = list.cursor_mut(3);
    /// let tail = cursor.split().unwrap();
    /// assert_eq!((cursor.index(), cursor.current()), (3, None));
    /// assert!(cursor.split().is_none());
    ///
    /// assert_eq!(tail.into_vec(), vec![3, 4]);
    /// assert_eq!(list.into_vec(), vec![0, 1, 2]);
    /// ```
    pub fn split(&mut self) -> Option<List<T, A>> {
        if self.is_ghost_node() {
            return None;
        }
        let (front, back) = (self.current, self.list.back_node());
        let len = self.list.len - self.index;
        self.current = self.list.ghost_node();
        let mut tail = List::new_in(self.list.allocator().clone());
        // SAFETY: `front` is an element node, so `front..=back` is the `len`
        // last nodes of the list.
        tail.link_back(unsafe { self.list.detach_nodes(front, back, len) });
        Some(tail)
    }

    /// Cut the list before the cursor: everything ahead of the current node
    /// moves to a new list. The cursor stays on its node, now at index 0.
    /// Returns `None` at index 0.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from_iter(0..5);
    /// let mut cursor = list.cursor_mut(3);
    /// let head = cursor.split_before().unwrap();
    /// assert_eq!((cursor.index(), cursor.current()), (0, Some(&3)));
    ///
    /// assert_eq!(head.into_vec(), vec![0, 1, 2]);
    /// assert_eq!(list.into_vec(), vec![3, 4]);
    /// ```
    pub fn split_before(&mut self) -> Option<List<T, A>> {
        if self.is_front_node() {
            return None;
        }
        let (front, back) = (self.list.front_node(), self.prev_node());
        let len = std::mem::replace(&mut self.index, 0);
        let mut head = List::new_in(self.list.allocator().clone());
        // SAFETY: the cursor is past index 0, so `front..=back` is the `len`
        // first nodes of the list.
        head.link_back(unsafe { self.list.detach_nodes(front, back, len) });
        Some(head)
    }
}

impl<'a, T: 'a, A: NodeAllocator> From<CursorMut<'a, T, A>> for Cursor<'a, T, A> {
    fn from(cursor: CursorMut<'a, T, A>) -> Self {
        cursor.into_cursor()
    }
}

unsafe impl<T: Sync, A: NodeAllocator + Sync> Send for Cursor<'_, T, A> {}

unsafe impl<T: Sync, A: NodeAllocator + Sync> Sync for Cursor<'_, T, A> {}

unsafe impl<T: Send, A: NodeAllocator + Send> Send for CursorMut<'_, T, A> {}

unsafe impl<T: Sync, A: NodeAllocator + Sync> Sync for CursorMut<'_, T, A> {}
