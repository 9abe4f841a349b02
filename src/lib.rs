//! A ring-shaped doubly linked list whose nodes are never moved once they
//! are allocated.
//!
//! Every [`List`] owns one sentinel, the *ghost* node, and closes its nodes
//! into a ring through it. The ghost is what `end` means everywhere in this
//! crate: a cursor parked on it has index `len`, inserting before it appends,
//! and it never carries a value.
//!
//! ```
//! use ring_list::List;
//!
//! let mut list = List::from([10, 20, 30]);
//!
//! // Positional edits hand back a cursor at the touched position.
//! let cursor = list.insert(1, 15);
//! assert_eq!((cursor.index(), cursor.current()), (1, Some(&15)));
//!
//! let cursor = list.erase(2);
//! assert_eq!((cursor.index(), cursor.current()), (2, Some(&30)));
//!
//! assert_eq!(list.to_vec(), vec![10, 15, 30]);
//! ```
//!
//! # Nodes and allocation
//!
//! ```text
//!   List { ghost, len, alloc }
//!            │
//!            ↓
//!   ┌──→ [ghost: None] ──→ [Some(a)] ──→ [Some(b)] ──→ [Some(c)] ───┐
//!   └────────────────────────────────────────────────────────────────┘
//!                  (every `next` is mirrored by a `prev`)
//! ```
//!
//! Value nodes come from a [`NodeAllocator`]; [`Global`] is used unless
//! another allocator is passed to [`List::new_in`]. The ghost is boxed by the
//! list itself, so an empty list costs one small allocation and can never
//! fail on the allocator side.
//!
//! The infallible insertions abort through [`std::alloc::handle_alloc_error`]
//! when a node cannot be allocated. Their `try_` counterparts return an
//! [`AllocError`] holding the rejected value and leave the list untouched.
//!
//! ```
//! use ring_list::List;
//!
//! let mut list = List::new();
//! list.try_push_back('b').unwrap();
//! list.try_push_front('a').unwrap();
//! assert_eq!(list.try_insert(2, 'c').map(|c| c.index()).ok(), Some(2));
//! assert_eq!(list.into_vec(), vec!['a', 'b', 'c']);
//! ```
//!
//! # Cursors
//!
//! A [`Cursor`] reads, a [`CursorMut`] edits. Both track their index, so a
//! cursor always knows whether it is on an element (`index < len`) or on the
//! ghost (`index == len`). Stepping over the ghost is refused by
//! [`move_next`] and [`move_prev`] with a [`CursorError`], while
//! [`move_next_cyclic`] walks around the ring.
//!
//! # Splicing
//!
//! Nodes travel between lists by relinking only: no element is moved,
//! cloned or reallocated, and references obtained after the splice point at
//! the same nodes as before. A whole list, one element, or a counted range
//! can be spliced through a [`CursorMut`]; [`List::splice_at`],
//! [`List::splice_from`] and [`List::splice_within`] do the same by index.
//!
//! ```
//! use ring_list::List;
//!
//! let mut evens = List::from([0, 2, 4]);
//! let mut odds = List::from([1, 3, 5, 7]);
//!
//! evens.splice_from(1, &mut odds, 0..1);
//! evens.splice_within(3, 0..1);
//! assert_eq!(evens.to_vec(), vec![1, 2, 0, 4]);
//!
//! let mut cursor = evens.cursor_end_mut();
//! cursor.splice(&mut odds);
//! assert_eq!(cursor.index(), 7);
//! assert_eq!(evens.into_vec(), vec![1, 2, 0, 4, 3, 5, 7]);
//! assert!(odds.is_empty());
//! ```
//!
//! # Algorithms
//!
//! [`List::sort`] (stable merge sort), [`List::merge`] (stable),
//! [`List::unique`], [`List::remove_if`] and [`List::reverse`] all work on
//! links as well. A comparator or predicate that panics leaves a well-formed
//! list behind.
//!
//! ```
//! use ring_list::List;
//!
//! let mut list = List::from([4, 1, 3, 1]);
//! let mut other = List::from([0, 2, 2]);
//!
//! list.sort();
//! list.merge(&mut other);
//! assert_eq!(list.unique(), 2);
//! list.reverse();
//!
//! assert_eq!(list.into_vec(), vec![4, 3, 2, 1, 0]);
//! ```
//!
//! [`move_next`]: crate::Cursor::move_next
//! [`move_prev`]: crate::Cursor::move_prev
//! [`move_next_cyclic`]: crate::Cursor::move_next_cyclic

#[doc(inline)]
pub use crate::alloc::{Global, NodeAllocator};
#[doc(inline)]
pub use error::{AllocError, CursorError};
#[doc(inline)]
pub use list::cursor::{Cursor, CursorMut};
#[doc(inline)]
pub use list::iterator::{IntoIter, Iter, IterMut};
#[doc(inline)]
pub use list::List;

pub mod alloc;
pub mod list;

mod error;

#[cfg(test)]
mod testing;
