//! Heap partition of the memory region
//!
//! Objects live in a generational slot map and are addressed through
//! [`ObjectKey`] handles. Each object also occupies a virtual byte range at the
//! top of the region: the heap grows downward from the region end while the
//! scope partition grows upward, and [`Heap::allocate`] refuses to place an
//! object below the current scope boundary.
//!
//! # Layout
//!
//! Live objects are threaded through `prev`/`next` links in descending address
//! order, starting at the highest object. Allocation walks that list and takes
//! the first gap wide enough for the payload plus its header, falling back to
//! the space under the lowest object.
//!
//! # Object kinds
//!
//! - Indirection: payload is the key of the real string or list object. Values
//!   only ever hold indirection keys, so the real object may move on resize.
//! - String: byte payload.
//! - List: value payload.

use super::value::Value;
use super::MemoryError;

/// Bytes of bookkeeping in front of every heap object (two links, size, kind
/// and the reachability flag).
pub const HEADER_SIZE: usize = 8;

/// Generational handle to a heap object.
///
/// A key outlives the object it names only as a stale handle: once the slot is
/// reused the generation differs and lookups return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    index: u32,
    generation: u32,
}

impl ObjectKey {
    /// A key no slot ever matches. Indirection cells point here until their
    /// payload object exists.
    pub const DANGLING: ObjectKey = ObjectKey {
        index: u32::MAX,
        generation: u32::MAX,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Indirection,
    String,
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Indirection(ObjectKey),
    String(Vec<u8>),
    List(Vec<Value>),
}

impl Payload {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Payload::Indirection(_) => ObjectKind::Indirection,
            Payload::String(_) => ObjectKind::String,
            Payload::List(_) => ObjectKind::List,
        }
    }
}

/// A live heap object
#[derive(Debug, Clone)]
pub struct HeapObject {
    /// Neighbour at the next higher address
    prev: Option<u32>,
    /// Neighbour at the next lower address
    next: Option<u32>,
    /// Region offset of the first payload byte; the header sits just below
    pub address: usize,
    /// Payload capacity in bytes
    pub size: usize,
    pub reachable: bool,
    pub payload: Payload,
}

impl HeapObject {
    pub fn kind(&self) -> ObjectKind {
        self.payload.kind()
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    object: Option<HeapObject>,
}

/// Objects and bytes released by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub objects: usize,
    pub bytes: usize,
}

#[derive(Debug, Clone)]
pub struct Heap {
    slots: Vec<Slot>,
    vacant: Vec<u32>,
    /// Highest live object
    first: Option<u32>,
    /// Lowest live object
    last: Option<u32>,
    /// Region size; the heap grows down from here
    end: usize,
    allocations_since_collection: usize,
    total_allocations: usize,
}

impl Heap {
    pub fn new(end: usize) -> Self {
        Heap {
            slots: Vec::new(),
            vacant: Vec::new(),
            first: None,
            last: None,
            end,
            allocations_since_collection: 0,
            total_allocations: 0,
        }
    }

    /// Drop every object. Outstanding keys become stale.
    pub fn reset(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.object.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.vacant.push(index as u32);
            }
        }
        self.first = None;
        self.last = None;
        self.allocations_since_collection = 0;
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Lowest byte used by the heap (the start of the lowest object's header).
    pub fn boundary(&self) -> usize {
        self.last
            .and_then(|index| self.node(index))
            .map_or(self.end, |object| object.address - HEADER_SIZE)
    }

    pub fn get(&self, key: ObjectKey) -> Option<&HeapObject> {
        let slot = self.slots.get(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.object.as_ref()
    }

    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut HeapObject> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.object.as_mut()
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Bytes held by live objects, headers included.
    pub fn used_bytes(&self) -> usize {
        self.iter().map(|(_, object)| object.size + HEADER_SIZE).sum()
    }

    pub fn allocations_since_collection(&self) -> usize {
        self.allocations_since_collection
    }

    /// Allocation calls that succeeded since the heap was created.
    pub fn total_allocations(&self) -> usize {
        self.total_allocations
    }

    /// Live objects from the highest address to the lowest.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectKey, &HeapObject)> + '_ {
        let mut cursor = self.first;
        std::iter::from_fn(move || {
            let index = cursor?;
            let object = self.node(index)?;
            cursor = object.next;
            Some((self.key_of(index), object))
        })
    }

    /// Place a new object of `size` payload bytes.
    ///
    /// Fails with [`MemoryError::Collision`] when the only room left would
    /// reach below `scope_boundary`; the heap is unchanged in that case.
    pub fn allocate(
        &mut self,
        size: usize,
        payload: Payload,
        scope_boundary: usize,
    ) -> Result<ObjectKey, MemoryError> {
        let mut prev: Option<u32> = None;
        let mut next = self.first;
        let address = loop {
            let top = match prev {
                Some(index) => {
                    self.node(index).ok_or(MemoryError::Dangling)?.address - HEADER_SIZE
                }
                None => self.end,
            };
            match next {
                None => {
                    if top < size {
                        return Err(MemoryError::Collision);
                    }
                    break top - size;
                }
                Some(index) => {
                    let neighbour = self.node(index).ok_or(MemoryError::Dangling)?;
                    let gap = top.saturating_sub(neighbour.address + neighbour.size);
                    if gap >= size + HEADER_SIZE {
                        break top - size;
                    }
                    prev = Some(index);
                    next = neighbour.next;
                }
            }
        };
        if address < HEADER_SIZE || scope_boundary > address - HEADER_SIZE {
            return Err(MemoryError::Collision);
        }

        let object = HeapObject {
            prev,
            next,
            address,
            size,
            reachable: false,
            payload,
        };
        let index = match self.vacant.pop() {
            Some(index) => {
                self.slots[index as usize].object = Some(object);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    object: Some(object),
                });
                (self.slots.len() - 1) as u32
            }
        };
        match prev.and_then(|p| self.node_mut(p)) {
            Some(neighbour) => neighbour.next = Some(index),
            None => self.first = Some(index),
        }
        match next.and_then(|n| self.node_mut(n)) {
            Some(neighbour) => neighbour.prev = Some(index),
            None => self.last = Some(index),
        }
        self.allocations_since_collection += 1;
        self.total_allocations += 1;
        log::trace!("allocate {} bytes at {}", size, address);
        Ok(self.key_of(index))
    }

    /// Unlink and free an object, returning its payload. Stale keys are ignored.
    pub fn deallocate(&mut self, key: ObjectKey) -> Option<Payload> {
        self.get(key)?;
        let index = key.index;
        let slot = &mut self.slots[index as usize];
        let object = slot.object.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(index);
        match object.prev.and_then(|p| self.node_mut(p)) {
            Some(neighbour) => neighbour.next = object.next,
            None => self.first = object.next,
        }
        match object.next.and_then(|n| self.node_mut(n)) {
            Some(neighbour) => neighbour.prev = object.prev,
            None => self.last = object.prev,
        }
        Some(object.payload)
    }

    /// Change an object's capacity.
    ///
    /// Shrinking keeps the object in place. Growing allocates a new object,
    /// moves the payload over and frees the old one, so the returned key may
    /// differ from `key`. On collision the existing object is untouched.
    pub fn resize(
        &mut self,
        key: ObjectKey,
        size: usize,
        scope_boundary: usize,
    ) -> Result<ObjectKey, MemoryError> {
        let (current, kind) = match self.get(key) {
            Some(object) => (object.size, object.kind()),
            None => return Err(MemoryError::Dangling),
        };
        if size <= current {
            if let Some(object) = self.get_mut(key) {
                object.size = size;
            }
            return Ok(key);
        }
        let placeholder = match kind {
            ObjectKind::Indirection => Payload::Indirection(key),
            ObjectKind::String => Payload::String(Vec::new()),
            ObjectKind::List => Payload::List(Vec::new()),
        };
        let moved = self.allocate(size, placeholder, scope_boundary)?;
        if let Some(payload) = self.deallocate(key) {
            if let Some(object) = self.get_mut(moved) {
                object.payload = payload;
            }
        }
        Ok(moved)
    }

    /// Object an indirection cell currently points at.
    pub fn target(&self, cell: ObjectKey) -> Option<ObjectKey> {
        match self.get(cell)?.payload {
            Payload::Indirection(target) => Some(target),
            _ => None,
        }
    }

    pub fn set_target(&mut self, cell: ObjectKey, target: ObjectKey) {
        if let Some(object) = self.get_mut(cell) {
            object.payload = Payload::Indirection(target);
        }
    }

    pub fn clear_marks(&mut self) {
        let mut cursor = self.first;
        while let Some(object) = cursor.and_then(|index| self.node_mut(index)) {
            object.reachable = false;
            cursor = object.next;
        }
    }

    /// Flag an object as reachable. Returns false if it was already flagged or
    /// the key is stale.
    pub fn mark(&mut self, key: ObjectKey) -> bool {
        match self.get_mut(key) {
            Some(object) if !object.reachable => {
                object.reachable = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_marked(&self, key: ObjectKey) -> bool {
        self.get(key).is_some_and(|object| object.reachable)
    }

    /// Free every object left unmarked and restart the allocation counter.
    pub fn sweep(&mut self) -> SweepStats {
        let garbage: Vec<(ObjectKey, usize)> = self
            .iter()
            .filter(|(_, object)| !object.reachable)
            .map(|(key, object)| (key, object.size + HEADER_SIZE))
            .collect();
        let mut stats = SweepStats::default();
        for (key, bytes) in garbage {
            if self.deallocate(key).is_some() {
                stats.objects += 1;
                stats.bytes += bytes;
            }
        }
        self.allocations_since_collection = 0;
        stats
    }

    fn key_of(&self, index: u32) -> ObjectKey {
        ObjectKey {
            index,
            generation: self.slots[index as usize].generation,
        }
    }

    /// Object in a linked slot; `None` only if the list links a vacant slot.
    fn node(&self, index: u32) -> Option<&HeapObject> {
        self.slots.get(index as usize)?.object.as_ref()
    }

    fn node_mut(&mut self, index: u32) -> Option<&mut HeapObject> {
        self.slots.get_mut(index as usize)?.object.as_mut()
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(super::DEFAULT_REGION_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(n: usize) -> Payload {
        Payload::String(vec![0; n])
    }

    #[test]
    fn test_allocations_grow_downward() {
        let mut heap = Heap::new(100);
        let a = heap.allocate(10, bytes(10), 0).unwrap();
        let b = heap.allocate(10, bytes(10), 0).unwrap();

        assert_eq!(heap.get(a).unwrap().address, 90);
        assert_eq!(heap.get(b).unwrap().address, 72);
        assert_eq!(heap.boundary(), 64);
    }

    #[test]
    fn test_first_fit_reuses_gap() {
        let mut heap = Heap::new(100);
        let a = heap.allocate(10, bytes(10), 0).unwrap();
        let b = heap.allocate(10, bytes(10), 0).unwrap();
        let _c = heap.allocate(10, bytes(10), 0).unwrap();
        heap.deallocate(b);

        let d = heap.allocate(4, bytes(4), 0).unwrap();
        let top_of_gap = heap.get(a).unwrap().address - HEADER_SIZE;
        assert_eq!(heap.get(d).unwrap().address, top_of_gap - 4);
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn test_collision_leaves_heap_unchanged() {
        let mut heap = Heap::new(100);
        heap.allocate(20, bytes(20), 0).unwrap();
        let before = heap.boundary();

        assert_eq!(
            heap.allocate(40, bytes(40), 60),
            Err(MemoryError::Collision)
        );
        assert_eq!(heap.boundary(), before);
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_unlinking_ends_keeps_list_walkable() {
        let mut heap = Heap::new(100);
        let a = heap.allocate(10, bytes(10), 0).unwrap();
        let b = heap.allocate(10, bytes(10), 0).unwrap();
        let c = heap.allocate(10, bytes(10), 0).unwrap();

        heap.deallocate(c);
        assert_eq!(heap.boundary(), 64);
        heap.deallocate(a);
        let keys: Vec<ObjectKey> = heap.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![b]);
        heap.clear_marks();
        assert!(heap.mark(b));

        heap.deallocate(b);
        assert!(heap.is_empty());
        assert_eq!(heap.boundary(), 100);
        assert!(heap.allocate(10, bytes(10), 0).is_ok());
    }

    #[test]
    fn test_stale_key_after_reuse() {
        let mut heap = Heap::new(100);
        let a = heap.allocate(4, bytes(4), 0).unwrap();
        heap.deallocate(a);
        let b = heap.allocate(4, bytes(4), 0).unwrap();

        assert!(heap.get(a).is_none());
        assert!(heap.get(b).is_some());
    }

    #[test]
    fn test_resize_grow_moves_and_shrink_stays() {
        let mut heap = Heap::new(200);
        let a = heap.allocate(10, Payload::String(b"abc".to_vec()), 0).unwrap();
        let _guard = heap.allocate(10, bytes(10), 0).unwrap();

        let grown = heap.resize(a, 30, 0).unwrap();
        assert_ne!(grown, a);
        assert_eq!(heap.get(grown).unwrap().payload, Payload::String(b"abc".to_vec()));
        assert!(heap.get(a).is_none());

        let address = heap.get(grown).unwrap().address;
        let shrunk = heap.resize(grown, 5, 0).unwrap();
        assert_eq!(shrunk, grown);
        assert_eq!(heap.get(shrunk).unwrap().address, address);
        assert_eq!(heap.get(shrunk).unwrap().size, 5);
    }

    #[test]
    fn test_sweep_frees_unmarked() {
        let mut heap = Heap::new(100);
        let keep = heap.allocate(4, bytes(4), 0).unwrap();
        let drop = heap.allocate(4, bytes(4), 0).unwrap();
        heap.clear_marks();
        heap.mark(keep);

        let stats = heap.sweep();
        assert_eq!(stats.objects, 1);
        assert_eq!(stats.bytes, 4 + HEADER_SIZE);
        assert!(heap.contains(keep));
        assert!(!heap.contains(drop));
        assert_eq!(heap.allocations_since_collection(), 0);
    }
}
