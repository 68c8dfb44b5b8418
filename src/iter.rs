// Traversal over a list
use crate::{
    ds::arena::Arena,
    node::NodeId,
    prelude::*,
};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

/// Which end a traversal starts from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// From head to tail
    Forward,
    /// From tail to head
    Backward,
}

/// A detached traversal position over a list.
///
/// A cursor does not borrow the list it walks, so the list can be
/// mutated between steps. Deleting the node a cursor has just yielded
/// is fine: the cursor already points past it. Deleting the node it is
/// *about* to yield is detected, and the next step fails with
/// [`Error::UnknownNode`] instead of following a dead link.
///
/// # Example
///
/// ```
/// use adlist::prelude::*;
///
/// let mut list = DoublyLinkedList::from_values(vec![1u64, 2, 3, 4])?;
/// let mut cursor = list.cursor(Direction::Forward);
///
/// // drop every even value while walking
/// while let Some(node) = cursor.next(&list)? {
///     if list.value(node).map_or(false, |v| v % 2 == 0) {
///         list.delete_node(node);
///     }
/// }
///
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
/// # Ok::<(), adlist::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    next: Option<NodeId>,
    direction: Direction,
}

impl Cursor {
    pub(crate) fn new(next: Option<NodeId>, direction: Direction) -> Self {
        Self { next, direction }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The node the next step will yield, without advancing.
    pub fn peek(&self) -> Option<NodeId> {
        self.next
    }

    /// Returns `true` once the cursor has walked off the end.
    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }

    /// Yields the current node and advances to its successor in the
    /// cursor's direction.
    ///
    /// Returns `Ok(None)` when exhausted. If the pending node was deleted
    /// (or the cursor belongs to another list), returns
    /// [`Error::UnknownNode`] and the cursor becomes exhausted.
    pub fn next<T>(&mut self, list: &DoublyLinkedList<T>) -> IResult<Option<NodeId>> {
        let current = match self.next.take() {
            Some(current) => current,
            None => return Ok(None),
        };

        let index = list.resolve(current).ok_or(Error::UnknownNode(current))?;
        let node = &list.arena[index];
        let link = match self.direction {
            Direction::Forward => node.next,
            Direction::Backward => node.prev,
        };
        self.next = list.link_id(link);

        Ok(Some(current))
    }
}

/// Iterator over references to list values.
pub struct Iter<'a, T> {
    arena: &'a Arena<T>,
    front: u32,
    back: u32,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(arena: &'a Arena<T>, front: u32, back: u32, len: usize) -> Self {
        Self {
            arena,
            front,
            back,
            remaining: len,
        }
    }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let arena = self.arena;
        let node = &arena[self.front];
        self.front = node.next;
        self.remaining -= 1;

        Some(&node.value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let arena = self.arena;
        let node = &arena[self.back];
        self.back = node.prev;
        self.remaining -= 1;

        Some(&node.value)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}

/// Iterator over node handles, head to tail.
///
/// Collect the handles first when the list will be mutated while
/// acting on them.
pub struct NodeIds<'a, T> {
    list: &'a DoublyLinkedList<T>,
    front: u32,
    back: u32,
    remaining: usize,
}

impl<'a, T> NodeIds<'a, T> {
    pub(crate) fn new(list: &'a DoublyLinkedList<T>) -> Self {
        Self {
            list,
            front: list.head,
            back: list.tail,
            remaining: list.len,
        }
    }
}

impl<'a, T> Iterator for NodeIds<'a, T> {
    type Item = NodeId;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let index = self.front;
        self.front = self.list.arena[index].next;
        self.remaining -= 1;

        Some(self.list.id_of(index))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for NodeIds<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let index = self.back;
        self.back = self.list.arena[index].prev;
        self.remaining -= 1;

        Some(self.list.id_of(index))
    }
}

impl<'a, T> ExactSizeIterator for NodeIds<'a, T> {}

/// Owning iterator that moves values out of a list, head to tail.
///
/// Values not consumed are released through the list's hooks when the
/// iterator is dropped.
pub struct IntoIter<T> {
    list: DoublyLinkedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.list.pop_head()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_tail()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for DoublyLinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a DoublyLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
