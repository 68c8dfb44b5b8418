/// Sentinel link meaning "no node" (head's prev, tail's next, empty list).
pub(crate) const NIL: u32 = u32::MAX;

/// A linked element: one value plus the arena slots of its neighbours.
#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) prev: u32,
    pub(crate) next: u32,
}

impl<T> Node<T> {
    /// Creates a new unlinked node.
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            prev: NIL,
            next: NIL,
        }
    }
}

/// Handle to a node of a particular list.
///
/// A handle stays valid until its node is deleted. After that it is
/// stale: every operation rejects it, even once the slot is reused
/// by a new node. Handles from a different list are rejected as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) tag: u32,
    pub(crate) index: u32,
    pub(crate) generation: u32,
}
