use crate::alloc::NodeAllocator;
use crate::list::link::move_nodes;
use crate::list::{List, Node};
use std::cmp::Ordering;
use std::ptr::NonNull;

/// Lists up to this length are sorted by insertion.
const INSERTION_SORT_THRESHOLD: usize = 8;

impl<T, A: NodeAllocator> List<T, A> {
    /// Sort the list.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time and *O*(log(*n*))
    /// stack memory.
    ///
    /// # Current Implementation
    ///
    /// The current algorithm is a top-down merge sort that relinks nodes. There is
    /// no extra temporary storage during merging, and no element is moved or
    /// cloned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::from([5, 2, 4, 3, 1]);
    ///
    /// list.sort();
    ///
    /// assert_eq!(list.into_vec(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        merge_sort(self, |a, b| a.lt(b));
    }

    /// Sort the list with a comparator function.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// The comparator function must define a total ordering for the
    /// elements in the list. If the ordering is not total, the order
    /// of the elements is unspecified, but every element stays in the
    /// list. If the comparator panics, the list keeps all its elements
    /// in some order.
    ///
    /// For example, while [`f64`] doesn’t implement [`Ord`] because
    /// `NaN != NaN`, we can use `partial_cmp` as our sort function
    /// when we know the list doesn’t contain a `NaN`.
    /// ```
    /// use ring_list::List;
    /// let mut floats = List::from([5f64, 4.0, 1.0, 3.0, 2.0]);
    /// floats.sort_by(|a, b| a.partial_cmp(b).unwrap());
    /// assert_eq!(floats.into_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    /// let mut v = List::from([5, 4, 1, 3, 2]);
    /// v.sort_by(|a, b| a.cmp(b));
    /// assert_eq!(v.to_vec(), vec![1, 2, 3, 4, 5]);
    ///
    /// // reverse sorting
    /// v.sort_by(|a, b| b.cmp(a));
    /// assert_eq!(v.to_vec(), vec![5, 4, 3, 2, 1]);
    /// ```
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        merge_sort(self, |a, b| compare(a, b) == Ordering::Less)
    }

    /// Sorts the list with a key extraction function.
    ///
    /// This sort is stable (i.e., does not reorder equal elements)
    /// and *O*(*m* \* *n* \* log(*n*)) worst-case, where the
    /// key function is *O*(*m*).
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    /// let mut v = List::from([-5i32, 4, 1, -3, 2]);
    ///
    /// v.sort_by_key(|k| k.abs());
    /// assert_eq!(v.into_vec(), vec![1, 2, -3, 4, -5]);
    /// ```
    pub fn sort_by_key<K, F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> K,
        K: Ord,
    {
        merge_sort(self, |a, b| f(a).lt(&f(b)));
    }
}

fn merge_sort<T, A, F>(list: &mut List<T, A>, mut less: F)
where
    A: NodeAllocator,
    F: FnMut(&T, &T) -> bool,
{
    let (start, end) = (list.front_node(), list.ghost_node());
    let len = list.len();
    tracing::trace!(len, "sorting list");
    if len < 2 {
    } else if len <= INSERTION_SORT_THRESHOLD {
        // SAFETY: `start..end` is the whole list, holding at least 2 nodes.
        unsafe { insertion_sort_range(start, end, &mut less) };
    } else {
        // SAFETY: `start..end` is the whole list, holding at least 2 nodes.
        unsafe { merge_sort_range(start, end, &mut less) };
    }
}

/// Compare the elements of two element nodes.
#[inline]
unsafe fn less_node<T, F>(less: &mut F, a: NonNull<Node<T>>, b: NonNull<Node<T>>) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    less(Node::element(a), Node::element(b))
}

/// Find the middle node of `start..end` and the length of the range.
unsafe fn mid_of_range<T>(
    mut start: NonNull<Node<T>>,
    end: NonNull<Node<T>>,
) -> (NonNull<Node<T>>, usize) {
    let mut mid = start;
    let mut len = 0;
    while start != end {
        len += 1;
        start = Node::next(start);
        if start != end {
            len += 1;
            start = Node::next(start);
            mid = Node::next(mid);
        }
    }
    (mid, len)
}

/// Sort `start..end` and return its new first node.
unsafe fn merge_sort_range<T, F>(
    mut start: NonNull<Node<T>>,
    end: NonNull<Node<T>>,
    less: &mut F,
) -> NonNull<Node<T>>
where
    F: FnMut(&T, &T) -> bool,
{
    let (mut mid, len) = mid_of_range(start, end);
    if len <= INSERTION_SORT_THRESHOLD {
        return insertion_sort_range(start, end, less);
    }

    if start != mid && Node::next(start) != mid {
        start = merge_sort_range(start, mid, less);
    }
    if mid != end && Node::next(mid) != end {
        mid = merge_sort_range(mid, end, less);
    }

    if start != mid && mid != end {
        start = merge_range(start, mid, end, less);
    }
    start
}

/// Merge the sorted runs `start..mid` and `mid..end` and return the new
/// first node.
unsafe fn merge_range<T, F>(
    mut start: NonNull<Node<T>>,
    mid: NonNull<Node<T>>,
    end: NonNull<Node<T>>,
    less: &mut F,
) -> NonNull<Node<T>>
where
    F: FnMut(&T, &T) -> bool,
{
    // `start..to_merge` is the merged output so far and `to_merge..end` the
    // rest of the right run. Whole runs of right nodes are moved at once.
    let (mut merged, merged_back, mut to_merge) = (start, Node::prev(mid), mid);
    // Done once the right run no longer sorts before the left run's last node.
    while to_merge != end && less_node(less, to_merge, merged_back) {
        // First left node that `to_merge` sorts strictly before.
        while merged != to_merge && !less_node(less, to_merge, merged) {
            merged = Node::next(merged);
        }
        if merged == to_merge {
            break;
        }

        // Extend the run while it still sorts before `merged`.
        let mut next_to_merge = Node::next(to_merge);
        while next_to_merge != end && less_node(less, next_to_merge, merged) {
            next_to_merge = Node::next(next_to_merge);
        }
        if merged == start {
            start = to_merge;
        }
        move_nodes(to_merge, Node::prev(next_to_merge), merged);
        to_merge = next_to_merge;
    }
    start
}

/// Sort `start..end` by insertion and return the new first node.
unsafe fn insertion_sort_range<T, F>(
    mut start: NonNull<Node<T>>,
    end: NonNull<Node<T>>,
    less: &mut F,
) -> NonNull<Node<T>>
where
    F: FnMut(&T, &T) -> bool,
{
    let (mut sorted_back, mut to_sort) = (start, Node::next(start));
    loop {
        // Skip nodes already in order.
        while to_sort != end && !less_node(less, to_sort, sorted_back) {
            sorted_back = to_sort;
            to_sort = Node::next(to_sort);
        }
        if to_sort == end {
            break;
        }
        // Insertion point: the first sorted node `to_sort` is less than.
        let mut sorted = start;
        while sorted != to_sort && !less_node(less, to_sort, sorted) {
            sorted = Node::next(sorted);
        }
        // An inconsistent comparator may leave the node where it is.
        if sorted == to_sort {
            sorted_back = to_sort;
            to_sort = Node::next(to_sort);
            continue;
        }
        if sorted == start {
            start = to_sort;
        }
        let next = Node::next(to_sort);
        let node = std::mem::replace(&mut to_sort, next);
        move_nodes(node, node, sorted);
    }
    start
}

#[cfg(test)]
mod tests {
    use super::INSERTION_SORT_THRESHOLD;
    use crate::list::List;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn sort_small_and_large() {
        for len in [0, 1, 2, 3, INSERTION_SORT_THRESHOLD, INSERTION_SORT_THRESHOLD + 1, 100] {
            let mut list = List::from_iter((0..len).rev());
            list.sort();
            list.assert_ring();
            assert_eq!(list.into_vec(), Vec::from_iter(0..len));
        }
    }

    #[test]
    fn sort_matches_stable_slice_sort() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for round in 0..50 {
            let len = rng.random_range(0..200);
            let keys: Vec<(u8, usize)> = (0..len)
                .map(|i| (rng.random_range(0..16), i))
                .collect();
            let mut list = List::from_iter(keys.iter().copied());
            let mut expected = keys.clone();

            list.sort_by_key(|&(k, _)| k);
            expected.sort_by_key(|&(k, _)| k);

            list.assert_ring();
            assert_eq!(list.to_vec(), expected, "round {round}");
        }
    }

    #[test]
    fn sort_keeps_nodes() {
        let mut list = List::from([3, 1, 2]);
        let nodes: Vec<*const i32> = list.iter().map(|e| e as *const i32).collect();
        list.sort();
        let sorted: Vec<*const i32> = list.iter().map(|e| e as *const i32).collect();
        assert_eq!(sorted, vec![nodes[1], nodes[2], nodes[0]]);
    }

    #[test]
    fn sort_survives_panicking_comparator() {
        let mut rng = SmallRng::seed_from_u64(7);
        let values: Vec<u32> = (0..64).map(|_| rng.random_range(0..1000)).collect();
        let mut list = List::from_iter(values.iter().copied());
        let mut calls = 0;
        let result = catch_unwind(AssertUnwindSafe(|| {
            list.sort_by(|a, b| {
                calls += 1;
                if calls == 100 {
                    panic!("comparator gave up");
                }
                a.cmp(b)
            })
        }));
        assert!(result.is_err());
        list.assert_ring();
        let mut remaining = list.to_vec();
        let mut expected = values;
        remaining.sort();
        expected.sort();
        assert_eq!(remaining, expected);
    }

    #[test]
    fn sort_with_flipping_comparator() {
        // The second comparison of the same pair contradicts the first one.
        for len in 2..=INSERTION_SORT_THRESHOLD + 3 {
            let mut list = List::from_iter(0..len);
            let mut calls = 0;
            list.sort_by(|_, _| {
                calls += 1;
                if calls == 1 {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            });
            list.assert_ring();
            let mut all = list.into_vec();
            all.sort();
            assert_eq!(all, Vec::from_iter(0..len));
        }
    }

    #[test]
    fn sort_twice_is_sort_once() {
        let mut rng = SmallRng::seed_from_u64(0x1de);
        for len in [0, 1, 5, INSERTION_SORT_THRESHOLD, 40, 150] {
            let pairs: Vec<(u8, usize)> = (0..len).map(|i| (rng.random_range(0..4), i)).collect();
            let mut list = List::from_iter(pairs.iter().copied());
            list.sort_by_key(|&(k, _)| k);
            let once = list.to_vec();
            list.sort_by_key(|&(k, _)| k);
            list.assert_ring();
            assert_eq!(list.to_vec(), once);

            let mut plain = List::from_iter(pairs.iter().map(|&(k, _)| k));
            plain.sort();
            let once = plain.to_vec();
            plain.sort();
            assert_eq!(plain.into_vec(), once);
        }
    }

    #[test]
    fn sort_with_inconsistent_comparator() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut list = List::from_iter(0..50);
        list.sort_by(|_, _| match rng.random_range(0..3) {
            0 => std::cmp::Ordering::Less,
            1 => std::cmp::Ordering::Equal,
            _ => std::cmp::Ordering::Greater,
        });
        list.assert_ring();
        let mut all = list.into_vec();
        all.sort();
        assert_eq!(all, Vec::from_iter(0..50));
    }
}
