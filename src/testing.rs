//! Test helpers shared by the unit tests.

use crate::alloc::{Global, NodeAllocator};
use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::ptr::NonNull;
use std::rc::Rc;

#[derive(Default)]
struct Counters {
    live: Cell<usize>,
    budget: Cell<Option<usize>>,
}

/// An allocator that counts live nodes and can refuse allocations once a
/// budget is exhausted. Clones share their counters.
#[derive(Clone, Default)]
pub(crate) struct CountingAlloc {
    counters: Rc<Counters>,
}

impl CountingAlloc {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_budget(budget: usize) -> Self {
        let alloc = Self::new();
        alloc.set_budget(Some(budget));
        alloc
    }

    pub(crate) fn set_budget(&self, budget: Option<usize>) {
        self.counters.budget.set(budget);
    }

    pub(crate) fn live(&self) -> usize {
        self.counters.live.get()
    }
}

unsafe impl NodeAllocator for CountingAlloc {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        match self.counters.budget.get() {
            Some(0) => return None,
            Some(n) => self.counters.budget.set(Some(n - 1)),
            None => {}
        }
        let ptr = Global.allocate(layout)?;
        self.counters.live.set(self.counters.live.get() + 1);
        Some(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.counters.live.set(self.counters.live.get() - 1);
        Global.deallocate(ptr, layout)
    }
}

/// Records the values it is dropped with.
#[derive(Debug)]
pub(crate) struct DropChecker<'a, T: Copy> {
    pub(crate) value: T,
    dropped: &'a RefCell<Vec<T>>,
}

impl<'a, T: Copy> DropChecker<'a, T> {
    pub(crate) fn new(value: T, dropped: &'a RefCell<Vec<T>>) -> Self {
        Self { value, dropped }
    }
}

impl<'a, T: Copy> Drop for DropChecker<'a, T> {
    fn drop(&mut self) {
        self.dropped.borrow_mut().push(self.value);
    }
}
