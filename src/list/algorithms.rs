use crate::alloc::NodeAllocator;
use crate::list::{List, Node};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

mod sort;

impl<T: PartialEq, A: NodeAllocator> PartialEq for List<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<T: Eq, A: NodeAllocator> Eq for List<T, A> {}

impl<T: PartialOrd, A: NodeAllocator> PartialOrd for List<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<T: Ord, A: NodeAllocator> Ord for List<T, A> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

/// Cloning a list allocates a fresh node for every element; no node is shared
/// with the source.
impl<T: Clone, A: NodeAllocator + Clone> Clone for List<T, A> {
    fn clone(&self) -> Self {
        let mut list = List::new_in(self.allocator().clone());
        list.extend(self.iter().cloned());
        list
    }

    /// Reuses the nodes of `self`: existing elements are overwritten in place,
    /// surplus nodes are erased and missing ones are appended.
    fn clone_from(&mut self, source: &Self) {
        let mut iter = source.iter();
        let mut cursor = self.cursor_start_mut();
        while !cursor.is_ghost_node() {
            match iter.next() {
                Some(elem_source) => {
                    if let Some(elem) = cursor.current_mut() {
                        elem.clone_from(elem_source);
                    }
                    cursor.move_next_cyclic();
                }
                None => {
                    cursor.remove_n(usize::MAX);
                    return;
                }
            }
        }
        cursor.insert_iter(iter.cloned());
    }
}

impl<T: Hash, A: NodeAllocator> Hash for List<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T, A: NodeAllocator> List<T, A> {
    /// Linear search for an element equal to `x`.
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let list = List::from(["ab", "cd"]);
    /// assert!(list.contains(&"cd"));
    /// assert!(!list.contains(&"ef"));
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|element| element == x)
    }

    /// Collect the elements into a `Vec`, front to back.
    pub fn into_vec(self) -> Vec<T> {
        self.into_iter().collect()
    }

    /// Clone the elements into a `Vec`, front to back.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Erases every element equal to `value` and returns how many were erased.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 2, 1, 3, 1]);
    /// assert_eq!(list.remove(&1), 3);
    /// assert_eq!(list.into_vec(), vec![2, 3]);
    /// ```
    pub fn remove(&mut self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.remove_if(|e| e == value)
    }

    /// Erases every element for which `pred` returns `true`, front to back,
    /// and returns how many were erased. `pred` is called exactly once per
    /// element.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from_iter(0..10);
    /// assert_eq!(list.remove_if(|x| x % 3 != 0), 6);
    /// assert_eq!(list.into_vec(), vec![0, 3, 6, 9]);
    /// ```
    pub fn remove_if<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = 0;
        let mut cursor = self.cursor_start_mut();
        while let Some(elem) = cursor.current() {
            if pred(elem) {
                cursor.remove();
                removed += 1;
            } else {
                cursor.move_next_cyclic();
            }
        }
        removed
    }

    /// Collapses every run of consecutive equal elements to its first element,
    /// and returns how many were erased.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 1, 2, 2, 1, 3]);
    /// assert_eq!(list.unique(), 2);
    /// assert_eq!(list.into_vec(), vec![1, 2, 1, 3]);
    /// ```
    pub fn unique(&mut self) -> usize
    where
        T: PartialEq,
    {
        self.unique_by(|a, b| a == b)
    }

    /// Collapses every run of consecutive elements considered the same by
    /// `same_bucket` to its first element, and returns how many were erased.
    ///
    /// `same_bucket(kept, candidate)` is called with the first element of
    /// the current run and the element that follows the run so far.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([10, 11, 13, 20, 25, 31]);
    /// assert_eq!(list.unique_by(|kept, x| kept / 10 == x / 10), 3);
    /// assert_eq!(list.into_vec(), vec![10, 20, 31]);
    /// ```
    pub fn unique_by<F>(&mut self, mut same_bucket: F) -> usize
    where
        F: FnMut(&T, &T) -> bool,
    {
        let mut removed = 0;
        let mut cursor = self.cursor_start_mut();
        if cursor.is_ghost_node() {
            return 0;
        }
        let mut kept = cursor.current;
        cursor.move_next_cyclic();
        while !cursor.is_ghost_node() {
            // SAFETY: `kept` and the cursor are at distinct element nodes.
            let same = unsafe { same_bucket(Node::element(kept), Node::element(cursor.current)) };
            if same {
                cursor.remove();
                removed += 1;
            } else {
                kept = cursor.current;
                cursor.move_next_cyclic();
            }
        }
        removed
    }

    /// Merges the sorted list `other` into this sorted list. After this
    /// operation, `other` becomes empty.
    ///
    /// The merge is stable: for equal elements, those of `self` precede those
    /// of `other`, and both keep their relative order. Nodes are relinked, never
    /// copied. If either list is unsorted, the order of the result is
    /// unspecified but the list stays well-formed.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* + *m*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 3, 5]);
    /// let mut other = List::from([2, 3, 6]);
    ///
    /// list.merge(&mut other);
    /// assert_eq!(list.into_vec(), vec![1, 2, 3, 3, 5, 6]);
    /// assert!(other.is_empty());
    /// ```
    pub fn merge(&mut self, other: &mut Self)
    where
        T: Ord,
    {
        self.merge_by(other, T::cmp)
    }

    /// Merges the list `other`, sorted by `compare`, into this list, sorted by
    /// `compare` too. See [`List::merge`].
    ///
    /// An element of `other` is placed before an element of `self` only if
    /// `compare(other_elem, self_elem)` is [`Ordering::Less`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([(1, "a"), (2, "b")]);
    /// let mut other = List::from([(1, "c")]);
    ///
    /// list.merge_by(&mut other, |x, y| x.0.cmp(&y.0));
    /// assert_eq!(list.into_vec(), vec![(1, "a"), (1, "c"), (2, "b")]);
    /// ```
    pub fn merge_by<F>(&mut self, other: &mut Self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if other.is_empty() {
            return;
        }
        tracing::trace!(len = self.len(), other_len = other.len(), "merging lists");
        let mut source = other.cursor_start_mut();
        let mut cursor = self.cursor_start_mut();
        while !source.is_ghost_node() {
            if cursor.is_ghost_node() {
                let remaining = source.len() - source.index();
                let spliced = cursor.splice_range(&mut source, remaining);
                debug_assert!(spliced.is_ok());
                break;
            }
            // SAFETY: neither cursor is at its ghost node.
            let ordering =
                unsafe { compare(Node::element(source.current), Node::element(cursor.current)) };
            if ordering == Ordering::Less {
                let spliced = cursor.splice_element(&mut source);
                debug_assert!(spliced.is_ok());
            } else {
                cursor.move_next_cyclic();
            }
        }
    }

    /// Reverses the order of the elements by swapping the links of every
    /// node, including the ghost node.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([1, 2, 3]);
    /// list.reverse();
    /// assert_eq!(list.into_vec(), vec![3, 2, 1]);
    /// ```
    pub fn reverse(&mut self) {
        tracing::trace!(len = self.len(), "reversing list");
        let ghost = self.ghost_node();
        let mut node = ghost;
        loop {
            // SAFETY: `node` walks the ring once; each node is visited after
            // its predecessor has been flipped, through its old `next`.
            unsafe {
                let ptr = node.as_ptr();
                std::mem::swap(&mut (*ptr).next, &mut (*ptr).prev);
                node = (*ptr).prev;
            }
            if node == ghost {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::list::List;
    use crate::testing::{CountingAlloc, DropChecker};
    use std::cell::RefCell;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn compare_and_hash() {
        let a = List::from([1, 2, 3]);
        let b = List::from([1, 2, 3]);
        let c = List::from([1, 2]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(c < a);
        assert!(List::from([1, 3]) > a);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(hash_of(&a), hash_of(&c));
    }

    #[test]
    fn clone_shares_no_nodes() {
        let mut list = List::from([1, 2, 3]);
        let cloned = list.clone();
        *list.front_mut().unwrap() = 10;
        assert_eq!(cloned.to_vec(), vec![1, 2, 3]);
        assert_eq!(list.to_vec(), vec![10, 2, 3]);
        for (a, b) in list.iter().zip(cloned.iter()) {
            assert!(!std::ptr::eq(a, b));
        }
        cloned.assert_ring();
    }

    #[test]
    fn clone_from_reuses_nodes() {
        fn check(target: &[i32], source: &[i32]) {
            let alloc = CountingAlloc::new();
            let mut list: List<i32, _> = List::new_in(alloc.clone());
            list.extend(target);
            let mut other: List<i32, _> = List::new_in(alloc.clone());
            other.extend(source);
            let first = list.cursor(0).current;

            list.clone_from(&other);
            list.assert_ring();
            assert_eq!(list, other);
            assert_eq!(alloc.live(), 2 * source.len());
            if !target.is_empty() && !source.is_empty() {
                assert_eq!(list.cursor(0).current, first);
            }
        }
        check(&[1, 2, 3], &[4, 5, 6]);
        check(&[1, 2, 3, 4, 5], &[6, 7]);
        check(&[1], &[2, 3, 4]);
        check(&[], &[2, 3]);
        check(&[1, 2], &[]);
        check(&[], &[]);
    }

    #[test]
    fn remove_values() {
        let mut list = List::from([1, 2, 1, 3, 1]);
        assert_eq!(list.remove(&1), 3);
        list.assert_ring();
        assert_eq!(list.to_vec(), vec![2, 3]);
        assert_eq!(list.remove(&4), 0);
        assert_eq!(list.remove_if(|_| true), 2);
        assert!(list.is_empty());
        list.assert_ring();
    }

    #[test]
    fn remove_if_drops_each_erased_element_once() {
        let dropped = RefCell::new(Vec::new());
        let mut list = List::new();
        for value in 0..6 {
            list.push_back(DropChecker::new(value, &dropped));
        }
        let mut calls = 0;
        assert_eq!(
            list.remove_if(|e| {
                calls += 1;
                e.value % 2 == 1
            }),
            3
        );
        assert_eq!(calls, 6);
        assert_eq!(dropped.borrow().as_slice(), &[1, 3, 5]);
        drop(list);
        assert_eq!(dropped.borrow().as_slice(), &[1, 3, 5, 0, 2, 4]);
    }

    #[test]
    fn unique_runs() {
        let mut list = List::from([1, 1, 2, 2, 1, 3]);
        assert_eq!(list.unique(), 2);
        list.assert_ring();
        assert_eq!(list.to_vec(), vec![1, 2, 1, 3]);

        let mut list = List::from([7, 7, 7]);
        assert_eq!(list.unique(), 2);
        assert_eq!(list.to_vec(), vec![7]);

        let mut list = List::<i32>::new();
        assert_eq!(list.unique(), 0);

        // Each candidate is compared with the first element of its run.
        let mut list = List::from([1, 2, 3, 4, 5]);
        assert_eq!(list.unique_by(|kept, x| x - kept <= 1), 2);
        assert_eq!(list.to_vec(), vec![1, 3, 5]);
    }

    #[test]
    fn merge_is_stable() {
        let mut list = List::from([(1, "a"), (2, "b")]);
        let mut other = List::from([(1, "c")]);
        list.merge_by(&mut other, |x, y| x.0.cmp(&y.0));
        list.assert_ring();
        other.assert_ring();
        assert_eq!(list.to_vec(), vec![(1, "a"), (1, "c"), (2, "b")]);
        assert!(other.is_empty());
    }

    #[test]
    fn merge_edge_cases() {
        let mut list = List::new();
        let mut other = List::from([1, 2]);
        list.merge(&mut other);
        assert_eq!(list.to_vec(), vec![1, 2]);
        assert!(other.is_empty());

        list.merge(&mut other);
        assert_eq!(list.to_vec(), vec![1, 2]);

        let mut other = List::from([0, 0, 3, 4]);
        list.merge(&mut other);
        list.assert_ring();
        assert_eq!(list.to_vec(), vec![0, 0, 1, 2, 3, 4]);
        assert_eq!(list.len(), 6);

        let mut unsorted = List::from([9, 1, 8]);
        list.merge(&mut unsorted);
        list.assert_ring();
        assert_eq!(list.len(), 9);
        let mut all = list.to_vec();
        all.sort();
        assert_eq!(all, vec![0, 0, 1, 1, 2, 3, 4, 8, 9]);
    }

    #[test]
    fn merge_survives_panicking_comparator() {
        let mut list = List::from_iter((0..10).map(|x| x * 2));
        let mut other = List::from_iter((0..10).map(|x| x * 2 + 1));
        let mut calls = 0;
        let result = catch_unwind(AssertUnwindSafe(|| {
            list.merge_by(&mut other, |a, b| {
                calls += 1;
                if calls == 7 {
                    panic!("comparator gave up");
                }
                a.cmp(b)
            })
        }));
        assert!(result.is_err());
        list.assert_ring();
        other.assert_ring();
        assert_eq!(list.len() + other.len(), 20);
        let mut all = list.to_vec();
        all.extend(other.iter());
        all.sort();
        assert_eq!(all, Vec::from_iter(0..20));
    }

    #[test]
    fn reverse_twice_is_identity() {
        let mut list = List::from_iter(0..7);
        list.reverse();
        list.assert_ring();
        assert_eq!(list.to_vec(), Vec::from_iter((0..7).rev()));
        list.reverse();
        list.assert_ring();
        assert_eq!(list.to_vec(), Vec::from_iter(0..7));

        let mut empty = List::<u8>::new();
        empty.reverse();
        empty.assert_ring();
        let mut single = List::from([1]);
        single.reverse();
        single.assert_ring();
        assert_eq!(single.to_vec(), vec![1]);
    }
}
