//! Node storage for [`List`](crate::List).
//!
//! The list never allocates value nodes by itself. It asks a
//! [`NodeAllocator`] for one fixed-size block per element and hands the
//! block back once the element is erased. The default allocator,
//! [`Global`], forwards to the global Rust allocator.

use std::alloc::Layout;
use std::ptr::NonNull;

/// A source of node-sized memory blocks.
///
/// # Safety
///
/// Implementations must guarantee that:
/// - a block returned by [`allocate`](NodeAllocator::allocate) is valid for
///   reads and writes of `layout.size()` bytes, is aligned to
///   `layout.align()`, and stays at the same address until it is passed to
///   [`deallocate`](NodeAllocator::deallocate);
/// - any two instances of the same allocator type can release each other's
///   blocks. Splicing moves nodes between lists, so a node may be released
///   by a different list (and thus a different allocator value) than the
///   one that allocated it.
pub unsafe trait NodeAllocator {
    /// Allocates a block for `layout`, or returns `None` when the request
    /// cannot be satisfied.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Releases a block previously returned by `allocate`.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` of this allocator type with the same
    /// `layout`, and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The global allocator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Global;

unsafe impl NodeAllocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        debug_assert!(layout.size() > 0, "list nodes are never zero-sized");
        // SAFETY: node layouts always have a non-zero size.
        NonNull::new(unsafe { std::alloc::alloc(layout) })
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        std::alloc::dealloc(ptr.as_ptr(), layout)
    }
}

unsafe impl<A: NodeAllocator + ?Sized> NodeAllocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }
}

#[cfg(test)]
mod tests {
    use super::{Global, NodeAllocator};
    use std::alloc::Layout;

    #[test]
    fn global_round_trip() {
        let layout = Layout::new::<[u64; 3]>();
        let ptr = Global.allocate(layout).expect("allocation failed");
        assert_eq!(ptr.as_ptr() as usize % layout.align(), 0);
        unsafe {
            ptr.cast::<[u64; 3]>().as_ptr().write([1, 2, 3]);
            assert_eq!(*ptr.cast::<[u64; 3]>().as_ptr(), [1, 2, 3]);
            Global.deallocate(ptr, layout);
        }
    }

    #[test]
    fn allocator_by_reference() {
        let layout = Layout::new::<u32>();
        let global = Global;
        let by_ref = &global;
        let ptr = by_ref.allocate(layout).expect("allocation failed");
        unsafe { by_ref.deallocate(ptr, layout) };
    }
}
