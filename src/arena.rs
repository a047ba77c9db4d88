//! Chunked slot storage for tree nodes.

use std::mem;
use std::ops::{Index, IndexMut};

/// Number of node slots reserved per chunk when no chunk size is given.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// A handle to a node stored in an `Arena<N>`.
///
/// Handles stay valid until the node is freed. A freed slot is recycled by the next allocation,
/// so a stale handle may alias a newer node.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId {
    chunk_index: usize,
    slot_index: usize,
}

enum Slot<N> {
    Occupied(N),
    Vacant(Option<NodeId>),
}

/// Node storage that hands out `NodeId` handles instead of pointers.
///
/// Slots are grouped into fixed-size chunks so existing nodes never move when the arena grows.
/// Freed slots form an intrusive free list threaded through the vacant slots.
pub struct Arena<N> {
    free_head: Option<NodeId>,
    chunks: Vec<Vec<Slot<N>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<N> Arena<N> {
    /// Constructs an empty arena that reserves `chunk_size` slots at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Expected a non-zero chunk size.");
        Arena {
            free_head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
            capacity: 0,
        }
    }

    fn slot(&self, id: NodeId) -> Option<&Slot<N>> {
        self.chunks
            .get(id.chunk_index)
            .and_then(|chunk| chunk.get(id.slot_index))
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot<N>> {
        self.chunks
            .get_mut(id.chunk_index)
            .and_then(|chunk| chunk.get_mut(id.slot_index))
    }

    /// Stores `node` and returns its handle, reusing the most recently freed slot if there is one.
    pub fn allocate(&mut self, node: N) -> NodeId {
        self.len += 1;

        if let Some(id) = self.free_head.take() {
            let slot = self
                .slot_mut(id)
                .expect("Expected the free list to point at an existing slot.");
            match mem::replace(slot, Slot::Occupied(node)) {
                Slot::Vacant(next) => self.free_head = next,
                Slot::Occupied(_) => unreachable!(),
            }
            return id;
        }

        if self.len > self.capacity {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
        }

        let chunk_index = self.chunks.len() - 1;
        let chunk = &mut self.chunks[chunk_index];
        chunk.push(Slot::Occupied(node));
        NodeId {
            chunk_index,
            slot_index: chunk.len() - 1,
        }
    }

    /// Removes the node behind `id` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to an occupied slot.
    pub fn free(&mut self, id: NodeId) -> N {
        if self.get(id).is_none() {
            panic!("Expected a handle to an occupied slot.");
        }

        let next = self.free_head.replace(id);
        let slot = self
            .slot_mut(id)
            .expect("Expected a handle to an existing slot.");
        match mem::replace(slot, Slot::Vacant(next)) {
            Slot::Occupied(node) => {
                self.len -= 1;
                node
            },
            Slot::Vacant(_) => unreachable!(),
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&N> {
        match self.slot(id) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut N> {
        match self.slot_mut(id) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every node and releases all chunks.
    pub fn clear(&mut self) {
        self.free_head = None;
        self.chunks.clear();
        self.len = 0;
        self.capacity = 0;
    }
}

impl<N> Index<NodeId> for Arena<N> {
    type Output = N;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("Expected a handle to an occupied slot.")
    }
}

impl<N> IndexMut<NodeId> for Arena<N> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("Expected a handle to an occupied slot.")
    }
}

#[cfg(test)]
mod tests {
    use super::{Arena, NodeId};

    #[test]
    #[should_panic]
    fn test_zero_chunk_size() {
        let _: Arena<u32> = Arena::new(0);
    }

    #[test]
    #[should_panic]
    fn test_free_missing_slot() {
        let mut arena: Arena<u32> = Arena::new(16);
        arena.free(NodeId {
            chunk_index: 0,
            slot_index: 0,
        });
    }

    #[test]
    #[should_panic]
    fn test_free_twice() {
        let mut arena = Arena::new(16);
        let id = arena.allocate(7);
        arena.free(id);
        arena.free(id);
    }

    #[test]
    fn test_allocate_spills_into_new_chunk() {
        let mut arena = Arena::new(2);
        let ids: Vec<NodeId> = (0..3).map(|i| arena.allocate(i)).collect();

        assert_eq!(ids[0], NodeId { chunk_index: 0, slot_index: 0 });
        assert_eq!(ids[1], NodeId { chunk_index: 0, slot_index: 1 });
        assert_eq!(ids[2], NodeId { chunk_index: 1, slot_index: 0 });
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_free_recycles_slot() {
        let mut arena = Arena::new(4);
        let a = arena.allocate(1);
        let b = arena.allocate(2);

        assert_eq!(arena.free(a), 1);
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.allocate(3), a);
        assert_eq!(arena[a], 3);
        assert_eq!(arena[b], 2);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_recycled_slots_do_not_grow_chunks() {
        let mut arena = Arena::new(2);
        let a = arena.allocate(1);
        let b = arena.allocate(2);
        arena.free(a);
        arena.free(b);

        arena.allocate(3);
        arena.allocate(4);
        assert_eq!(arena.chunks.len(), 1);

        let c = arena.allocate(5);
        assert_eq!(c, NodeId { chunk_index: 1, slot_index: 0 });
    }

    #[test]
    fn test_get_mut() {
        let mut arena = Arena::new(4);
        let id = arena.allocate(0);
        arena[id] += 5;
        *arena.get_mut(id).unwrap() += 1;
        assert_eq!(arena.get(id), Some(&6));
    }

    #[test]
    fn test_clear() {
        let mut arena = Arena::new(4);
        let id = arena.allocate(0);
        arena.clear();

        assert!(arena.is_empty());
        assert_eq!(arena.get(id), None);
        assert_eq!(arena.allocate(1), id);
    }
}
