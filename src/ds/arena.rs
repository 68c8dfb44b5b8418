//! Index-stable node storage.
//!
//! Slots are never moved or handed out twice while occupied. A vacant slot
//! keeps its generation and joins an intrusive free list, so releasing a
//! node never allocates. Each time a slot is vacated its generation is
//! bumped, which is what makes old handles detectably stale.

use crate::{
    node::{Node, NIL},
    AllocError,
};
use std::{
    mem,
    ops::{Index, IndexMut},
};

#[derive(Debug)]
enum Entry<T> {
    Occupied(Node<T>),
    /// Next slot on the free list
    Vacant(u32),
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    entry: Entry<T>,
}

#[derive(Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: u32,
    len: usize,
    max_nodes: Option<usize>,
}

impl<T> Arena<T> {
    pub(crate) const fn new(max_nodes: Option<usize>) -> Self {
        Self {
            slots: Vec::new(),
            free_head: NIL,
            len: 0,
            max_nodes,
        }
    }

    pub(crate) fn with_capacity(
        capacity: usize,
        max_nodes: Option<usize>,
    ) -> Result<Self, AllocError> {
        let mut arena = Self::new(max_nodes);
        let capacity = max_nodes.map_or(capacity, |max| capacity.min(max));
        arena.slots.try_reserve_exact(capacity)?;
        Ok(arena)
    }

    /// Number of occupied slots.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Makes room for `additional` more nodes, so that the next
    /// `additional` inserts cannot fail.
    pub(crate) fn reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        if let Some(max) = self.max_nodes {
            if self.len.saturating_add(additional) > max {
                return Err(AllocError::Exhausted(max));
            }
        }

        let vacant = self.slots.len() - self.len;
        let fresh = additional.saturating_sub(vacant);
        if fresh == 0 {
            return Ok(());
        }

        // NIL is never a valid slot index
        if self.slots.len().saturating_add(fresh) > NIL as usize {
            return Err(AllocError::Exhausted(NIL as usize));
        }

        let before = self.slots.capacity();
        self.slots.try_reserve(fresh)?;
        if self.slots.capacity() != before {
            log::trace!(
                "arena grew from {} to {} slots",
                before,
                self.slots.capacity()
            );
        }

        Ok(())
    }

    /// Stores `node`, returning its slot and the slot's generation.
    ///
    /// On failure the node is handed back untouched.
    pub(crate) fn try_insert(
        &mut self,
        node: Node<T>,
    ) -> Result<(u32, u32), (Node<T>, AllocError)> {
        if let Err(e) = self.reserve(1) {
            return Err((node, e));
        }
        self.len += 1;

        if self.free_head != NIL {
            let index = self.free_head;
            let slot = &mut self.slots[index as usize];
            if let Entry::Vacant(next_free) = slot.entry {
                self.free_head = next_free;
            }
            slot.entry = Entry::Occupied(node);
            return Ok((index, slot.generation));
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Entry::Occupied(node),
        });
        Ok((index, 0))
    }

    /// Vacates slot `index`, returning its node.
    pub(crate) fn remove(&mut self, index: u32) -> Option<Node<T>> {
        let slot = self.slots.get_mut(index as usize)?;
        if let Entry::Vacant(_) = slot.entry {
            return None;
        }

        let entry = mem::replace(&mut slot.entry, Entry::Vacant(self.free_head));
        slot.generation = slot.generation.wrapping_add(1);
        self.free_head = index;
        self.len -= 1;

        match entry {
            Entry::Occupied(node) => Some(node),
            Entry::Vacant(_) => None,
        }
    }

    /// Returns the node at `index` if it is occupied by `generation`.
    #[inline]
    pub(crate) fn get(&self, index: u32, generation: u32) -> Option<&Node<T>> {
        match self.slots.get(index as usize)? {
            Slot {
                generation: g,
                entry: Entry::Occupied(node),
            } if *g == generation => Some(node),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: u32, generation: u32) -> Option<&mut Node<T>> {
        match self.slots.get_mut(index as usize)? {
            Slot {
                generation: g,
                entry: Entry::Occupied(node),
            } if *g == generation => Some(node),
            _ => None,
        }
    }

    /// Current generation of slot `index`.
    #[inline]
    pub(crate) fn generation(&self, index: u32) -> u32 {
        self.slots[index as usize].generation
    }
}

/// Access to a slot the list knows to be occupied.
///
/// # Panics
///
/// Panics if the slot is vacant or out of bounds, which means the link
/// structure is corrupt.
impl<T> Index<u32> for Arena<T> {
    type Output = Node<T>;

    #[inline]
    fn index(&self, index: u32) -> &Node<T> {
        match &self.slots[index as usize].entry {
            Entry::Occupied(node) => node,
            Entry::Vacant(_) => panic!("slot {} is linked but vacant", index),
        }
    }
}

impl<T> IndexMut<u32> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, index: u32) -> &mut Node<T> {
        match &mut self.slots[index as usize].entry {
            Entry::Occupied(node) => node,
            Entry::Vacant(_) => panic!("slot {} is linked but vacant", index),
        }
    }
}
