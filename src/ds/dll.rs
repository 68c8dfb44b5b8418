//! Doubly linked list over an index-stable arena.
//!
//! Nodes live in slots owned by the list and link to each other by slot
//! index. Callers hold [`NodeId`] handles, which carry the slot's
//! generation and the list's tag, so a handle to a deleted node (or to a
//! node of another list) is rejected instead of dangling.
//!
//! # Value lifecycle
//!
//! Each node owns one value handle. [`Hooks`] decide what duplication,
//! destruction and matching do with it:
//!
//! ```
//! use adlist::prelude::*;
//! use std::sync::{
//!     atomic::{AtomicUsize, Ordering},
//!     Arc,
//! };
//!
//! let freed = Arc::new(AtomicUsize::new(0));
//! let counter = freed.clone();
//!
//! let mut list = DoublyLinkedList::new();
//! list.set_dup_hook(|v: &u64| Some(v * 10));
//! list.set_release_hook(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! list.add_tail(1)?.add_tail(2)?;
//!
//! let copy = list.duplicate()?;
//! assert_eq!(copy.iter().copied().collect::<Vec<_>>(), vec![10, 20]);
//!
//! drop(copy);
//! assert_eq!(freed.load(Ordering::SeqCst), 2);
//! # Ok::<(), adlist::Error>(())
//! ```
//!
//! # Indexing
//!
//! [`DoublyLinkedList::index`] counts from the head for non-negative
//! positions and from the tail for negative ones, `-1` being the tail.

use crate::{
    atomic::*,
    ds::arena::Arena,
    iter::{Iter, NodeIds},
    node::{Node, NIL},
    prelude::*,
};
use either::Either;
use serde::{
    de::{self, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::{fmt, iter::Rev, marker::PhantomData};

static NEXT_TAG: AtomicU32 = AtomicU32::new(0);

/// Where [`DoublyLinkedList::insert`] puts the new node relative to the
/// reference node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

/// A doubly linked list of opaque value handles.
///
/// Not internally synchronized: share it across threads only behind
/// external locking.
pub struct DoublyLinkedList<T> {
    pub(crate) head: u32,
    pub(crate) tail: u32,
    pub(crate) len: usize,
    pub(crate) arena: Arena<T>,
    hooks: Hooks<T>,
    config: Config,
    /// Distinguishes handles of this list from those of any other
    tag: u32,
}

impl<T> Default for DoublyLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DoublyLinkedList<T> {
    /// Creates an empty list with no hooks. Reserves nothing.
    pub fn new() -> Self {
        Self::from_arena(Arena::new(None), Config::default())
    }

    /// Creates an empty list, reserving `config.initial_capacity` node slots.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationError`] if the slots cannot be reserved.
    pub fn with_config(config: Config) -> IResult<Self> {
        let (capacity, max_nodes) = (config.initial_capacity, config.max_nodes);
        let arena = Arena::with_capacity(capacity, max_nodes)?;
        let list = Self::from_arena(arena, config);
        log::trace!(
            "list #{} created with room for {} nodes",
            list.tag,
            list.arena.capacity()
        );
        Ok(list)
    }

    fn from_arena(arena: Arena<T>, config: Config) -> Self {
        Self {
            head: NIL,
            tail: NIL,
            len: 0,
            arena,
            hooks: Hooks::default(),
            config,
            tag: NEXT_TAG.fetch_add(1, Relaxed),
        }
    }

    /// Builds a list holding `values` in order, with no hooks.
    pub fn from_values<I>(values: I) -> IResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = Self::new();
        for value in values {
            list.add_tail(value)?;
        }
        Ok(list)
    }

    /// Destroys the list, running the release hook on every value.
    ///
    /// Equivalent to dropping it.
    pub fn release(self) {
        drop(self)
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    pub fn with_hooks(mut self, hooks: Hooks<T>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn hooks(&self) -> &Hooks<T> {
        &self.hooks
    }

    pub fn set_hooks(&mut self, hooks: Hooks<T>) {
        self.hooks = hooks;
    }

    pub fn set_dup_hook<F>(&mut self, f: F)
    where
        F: Fn(&T) -> Option<T> + Send + Sync + 'static,
    {
        self.hooks.set_dup(f);
    }

    pub fn set_release_hook<F>(&mut self, f: F)
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.hooks.set_release(f);
    }

    pub fn set_match_hook<F>(&mut self, f: F)
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.hooks.set_match(f);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ========================================================================
    // Access
    // ========================================================================

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the head node, `None` if empty.
    #[inline]
    pub fn head(&self) -> Option<NodeId> {
        self.link_id(self.head)
    }

    /// Handle of the tail node, `None` if empty.
    #[inline]
    pub fn tail(&self) -> Option<NodeId> {
        self.link_id(self.tail)
    }

    pub fn front(&self) -> Option<&T> {
        if self.head == NIL {
            None
        } else {
            Some(&self.arena[self.head].value)
        }
    }

    pub fn back(&self) -> Option<&T> {
        if self.tail == NIL {
            None
        } else {
            Some(&self.arena[self.tail].value)
        }
    }

    /// Returns `true` if `node` is a live node of this list.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.resolve(node).is_some()
    }

    pub fn value(&self, node: NodeId) -> Option<&T> {
        if node.tag != self.tag {
            return None;
        }
        self.arena
            .get(node.index, node.generation)
            .map(|n| &n.value)
    }

    pub fn value_mut(&mut self, node: NodeId) -> Option<&mut T> {
        if node.tag != self.tag {
            return None;
        }
        self.arena
            .get_mut(node.index, node.generation)
            .map(|n| &mut n.value)
    }

    /// The node after `node`, `None` if it is the tail or not in this list.
    pub fn next_node(&self, node: NodeId) -> Option<NodeId> {
        let index = self.resolve(node)?;
        self.link_id(self.arena[index].next)
    }

    /// The node before `node`, `None` if it is the head or not in this list.
    pub fn prev_node(&self, node: NodeId) -> Option<NodeId> {
        let index = self.resolve(node)?;
        self.link_id(self.arena[index].prev)
    }

    /// Slot of `node` if it is live in this list.
    pub(crate) fn resolve(&self, node: NodeId) -> Option<u32> {
        if node.tag != self.tag {
            return None;
        }
        self.arena
            .get(node.index, node.generation)
            .map(|_| node.index)
    }

    pub(crate) fn id_of(&self, index: u32) -> NodeId {
        NodeId {
            tag: self.tag,
            index,
            generation: self.arena.generation(index),
        }
    }

    pub(crate) fn link_id(&self, link: u32) -> Option<NodeId> {
        if link == NIL {
            None
        } else {
            Some(self.id_of(link))
        }
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Adds `value` as the new head.
    ///
    /// Returns the list for chaining.
    ///
    /// # Errors
    ///
    /// If no node can be allocated the list is left untouched and `value`
    /// comes back inside [`Rejected`].
    pub fn add_head(&mut self, value: T) -> Result<&mut Self, Rejected<T>> {
        let index = self.alloc(value)?;
        self.link_head(index);
        Ok(self)
    }

    /// Adds `value` as the new tail.
    ///
    /// Returns the list for chaining.
    ///
    /// # Errors
    ///
    /// Same as [`add_head`](Self::add_head).
    pub fn add_tail(&mut self, value: T) -> Result<&mut Self, Rejected<T>> {
        let index = self.alloc(value)?;
        self.link_tail(index);
        Ok(self)
    }

    /// Adds `value` right before or after the node `at`.
    ///
    /// Inserting before the head makes the new node the head, inserting
    /// after the tail makes it the tail.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownNode`] if `at` is not a live node of this list,
    /// [`Error::AllocationError`] if no node can be allocated. Either way
    /// the list is untouched and `value` is handed back.
    pub fn insert(
        &mut self,
        at: NodeId,
        value: T,
        placement: Placement,
    ) -> Result<&mut Self, Rejected<T>> {
        let at = match self.resolve(at) {
            Some(index) => index,
            None => return Err(Rejected::new(value, Error::UnknownNode(at))),
        };

        let index = self.alloc(value)?;
        match placement {
            Placement::Before => self.link_before(at, index),
            Placement::After => self.link_after(at, index),
        }
        Ok(self)
    }

    fn alloc(&mut self, value: T) -> Result<u32, Rejected<T>> {
        match self.arena.try_insert(Node::new(value)) {
            Ok((index, _)) => Ok(index),
            Err((node, e)) => Err(Rejected::new(node.value, e.into())),
        }
    }

    fn link_head(&mut self, index: u32) {
        let head = self.head;
        let node = &mut self.arena[index];
        node.prev = NIL;
        node.next = head;

        if head != NIL {
            self.arena[head].prev = index;
        } else {
            self.tail = index;
        }

        self.head = index;
        self.len += 1;
    }

    fn link_tail(&mut self, index: u32) {
        let tail = self.tail;
        let node = &mut self.arena[index];
        node.prev = tail;
        node.next = NIL;

        if tail != NIL {
            self.arena[tail].next = index;
        } else {
            self.head = index;
        }

        self.tail = index;
        self.len += 1;
    }

    fn link_after(&mut self, at: u32, index: u32) {
        let next = self.arena[at].next;
        let node = &mut self.arena[index];
        node.prev = at;
        node.next = next;

        self.arena[at].next = index;
        if next != NIL {
            self.arena[next].prev = index;
        } else {
            self.tail = index;
        }

        self.len += 1;
    }

    fn link_before(&mut self, at: u32, index: u32) {
        let prev = self.arena[at].prev;
        let node = &mut self.arena[index];
        node.prev = prev;
        node.next = at;

        self.arena[at].prev = index;
        if prev != NIL {
            self.arena[prev].next = index;
        } else {
            self.head = index;
        }

        self.len += 1;
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Unlinks `node`, runs the release hook on its value and frees it.
    ///
    /// Returns `false` (and does nothing) if `node` is not a live node of
    /// this list.
    pub fn delete_node(&mut self, node: NodeId) -> bool {
        let value = match self.resolve(node) {
            Some(index) => self.unlink(index),
            None => return false,
        };

        if let Some(value) = value {
            self.hooks.release(value);
        }
        true
    }

    /// Unlinks `node` and hands its value to the caller. The release hook
    /// is not run.
    pub fn remove(&mut self, node: NodeId) -> Option<T> {
        let index = self.resolve(node)?;
        self.unlink(index)
    }

    /// Removes the head, handing its value to the caller.
    pub fn pop_head(&mut self) -> Option<T> {
        if self.head == NIL {
            return None;
        }
        self.unlink(self.head)
    }

    /// Removes the tail, handing its value to the caller.
    pub fn pop_tail(&mut self) -> Option<T> {
        if self.tail == NIL {
            return None;
        }
        self.unlink(self.tail)
    }

    /// Deletes every node, running the release hook on each value.
    pub fn clear(&mut self) {
        while let Some(value) = self.pop_head() {
            self.hooks.release(value);
        }
    }

    fn unlink(&mut self, index: u32) -> Option<T> {
        let node = &self.arena[index];
        let (prev, next) = (node.prev, node.next);

        if prev != NIL {
            self.arena[prev].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.arena[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.len -= 1;
        self.arena.remove(index).map(|node| node.value)
    }

    /// Moves every node of `other` to the tail of this list, leaving
    /// `other` empty.
    ///
    /// The moved values are governed by this list's hooks from then on.
    ///
    /// # Errors
    ///
    /// Room for all of `other` is reserved first; if that fails neither
    /// list is modified.
    pub fn join(&mut self, other: &mut Self) -> IResult<()> {
        if other.is_empty() {
            return Ok(());
        }

        self.arena.reserve(other.len)?;
        while let Some(value) = other.pop_head() {
            self.add_tail(value)?;
        }
        Ok(())
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Returns a detached cursor at the head (forward) or tail (backward).
    pub fn cursor(&self, direction: Direction) -> Cursor {
        let start = match direction {
            Direction::Forward => self.head,
            Direction::Backward => self.tail,
        };
        Cursor::new(self.link_id(start), direction)
    }

    /// Points `cursor` back at the head, walking forward.
    pub fn rewind(&self, cursor: &mut Cursor) {
        *cursor = self.cursor(Direction::Forward);
    }

    /// Points `cursor` back at the tail, walking backward.
    pub fn rewind_tail(&self, cursor: &mut Cursor) {
        *cursor = self.cursor(Direction::Backward);
    }

    /// Iterates over values, head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.arena, self.head, self.tail, self.len)
    }

    /// Iterates over values in the given direction.
    pub fn values(&self, direction: Direction) -> Either<Iter<'_, T>, Rev<Iter<'_, T>>> {
        match direction {
            Direction::Forward => Either::Left(self.iter()),
            Direction::Backward => Either::Right(self.iter().rev()),
        }
    }

    /// Iterates over node handles, head to tail.
    pub fn node_ids(&self) -> NodeIds<'_, T> {
        NodeIds::new(self)
    }

    // ========================================================================
    // Search and indexed access
    // ========================================================================

    /// First node, from the head, whose value satisfies `predicate`.
    pub fn find<P>(&self, mut predicate: P) -> Option<NodeId>
    where
        P: FnMut(&T) -> bool,
    {
        let mut index = self.head;
        while index != NIL {
            let node = &self.arena[index];
            if predicate(&node.value) {
                return Some(self.id_of(index));
            }
            index = node.next;
        }
        None
    }

    /// Node at zero-based `position`.
    ///
    /// Non-negative positions count from the head (`0` is the head),
    /// negative ones from the tail (`-1` is the tail). Returns `None` when
    /// the position is past either end.
    pub fn index(&self, position: isize) -> Option<NodeId> {
        let (steps, backward) = if position < 0 {
            (position.unsigned_abs() - 1, true)
        } else {
            (position as usize, false)
        };

        if steps >= self.len {
            return None;
        }

        let mut index = if backward { self.tail } else { self.head };
        for _ in 0..steps {
            let node = &self.arena[index];
            index = if backward { node.prev } else { node.next };
        }

        Some(self.id_of(index))
    }

    // ========================================================================
    // Rotation
    // ========================================================================

    /// Moves the tail node to the head. Does nothing for fewer than two nodes.
    pub fn rotate(&mut self) {
        if self.len <= 1 {
            return;
        }

        let (head, tail) = (self.head, self.tail);
        let new_tail = self.arena[tail].prev;

        // detach current tail
        self.arena[new_tail].next = NIL;
        self.tail = new_tail;

        // move it as head
        self.arena[head].prev = tail;
        let node = &mut self.arena[tail];
        node.prev = NIL;
        node.next = head;
        self.head = tail;
    }
}

impl<T: ValueRef> DoublyLinkedList<T> {
    /// First node, from the head, whose value matches `key`.
    ///
    /// Uses the match hook if set, reference identity otherwise.
    pub fn search(&self, key: &T) -> Option<NodeId> {
        let hooks = &self.hooks;
        self.find(|value| hooks.matches(value, key))
    }

    /// Copies the list: same hooks, same configuration, every value passed
    /// through the dup hook (or shared, without one), same order.
    ///
    /// # Errors
    ///
    /// If storage, a node, or a value copy cannot be had, the values copied
    /// so far are released and the error is returned. `self` is never
    /// modified.
    pub fn duplicate(&self) -> IResult<Self> {
        self.duplicate_with_config(self.config.clone())
    }

    /// Like [`duplicate`](Self::duplicate), but the copy gets its own
    /// storage configuration, e.g. a different node limit.
    pub fn duplicate_with_config(&self, config: Config) -> IResult<Self> {
        let mut copy = Self::with_config(config)?;
        copy.hooks = self.hooks.clone();

        match self.copy_into(&mut copy) {
            Ok(()) => Ok(copy),
            Err(e) => {
                log::trace!(
                    "list #{}: discarding partial copy #{} of {}/{} nodes",
                    self.tag,
                    copy.tag,
                    copy.len,
                    self.len
                );
                Err(e)
            }
        }
    }

    fn copy_into(&self, copy: &mut Self) -> IResult<()> {
        for value in self.iter() {
            let value = self.hooks.duplicate(value).ok_or(AllocError::Duplicate)?;

            if let Err(rejected) = copy.add_tail(value) {
                let (value, error) = rejected.into_parts();
                copy.hooks.release(value);
                return Err(error);
            }
        }
        Ok(())
    }
}

impl<T> Drop for DoublyLinkedList<T> {
    fn drop(&mut self) {
        if !self.is_empty() {
            log::trace!("list #{} releasing {} nodes", self.tag, self.len);
        }
        self.clear();
    }
}

impl<T: fmt::Debug> fmt::Debug for DoublyLinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// a list serializes as the sequence of its values; hooks are not carried
impl<T: Serialize> Serialize for DoublyLinkedList<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for DoublyLinkedList<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ListVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for ListVisitor<T> {
            type Value = DoublyLinkedList<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a sequence of list values")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut list = DoublyLinkedList::new();
                while let Some(value) = seq.next_element()? {
                    list.add_tail(value)
                        .map_err(<A::Error as de::Error>::custom)?;
                }
                Ok(list)
            }
        }

        deserializer.deserialize_seq(ListVisitor(PhantomData))
    }
}
