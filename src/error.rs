use std::alloc::Layout;
use std::fmt;

/// A list node could not be allocated.
///
/// The value that was about to be inserted is handed back, and the list is
/// left exactly as it was before the call.
///
/// # Examples
///
/// ```
/// use ring_list::{AllocError, List};
///
/// let mut list = List::new();
/// match list.try_push_back(7) {
///     Ok(()) => assert_eq!(list.back(), Some(&7)),
///     Err(err) => assert_eq!(err.into_inner(), 7),
/// }
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AllocError<T> {
    value: T,
    layout: Layout,
}

impl<T> AllocError<T> {
    pub(crate) fn new(value: T, layout: Layout) -> Self {
        Self { value, layout }
    }

    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// The layout of the node that was requested.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Abort through the global allocation error handler.
    pub(crate) fn handle(self) -> ! {
        std::alloc::handle_alloc_error(self.layout)
    }
}

impl<T> fmt::Debug for AllocError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllocError")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for AllocError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to allocate a list node (size = {}, align = {})",
            self.layout.size(),
            self.layout.align()
        )
    }
}

impl<T> std::error::Error for AllocError<T> {}

/// A cursor operation crossed the ghost boundary or needed an element at
/// the ghost node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorError {
    /// Tried to move forward from the ghost node.
    PastEnd,
    /// Tried to move backward from the first node.
    BeforeStart,
    /// The operation needs an element, but the cursor is at the ghost node.
    Ghost,
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorError::PastEnd => write!(f, "cannot move the cursor past the end of the list"),
            CursorError::BeforeStart => {
                write!(f, "cannot move the cursor before the start of the list")
            }
            CursorError::Ghost => write!(f, "the cursor is at the ghost node"),
        }
    }
}

impl std::error::Error for CursorError {}
