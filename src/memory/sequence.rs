//! String and list objects
//!
//! A string or list is two heap objects: an indirection cell that values hold,
//! and the payload object it points at. Operations that change a sequence's
//! length go through [`Memory::resize_string`] / [`Memory::resize_list`],
//! which reallocate the payload only when the new length leaves the band
//! between a quarter of the capacity and the full capacity. Reallocation moves
//! the payload and re-points the cell, so values holding the cell stay valid.

use super::heap::{ObjectKey, Payload};
use super::value::{Value, VALUE_SIZE};
use super::{Memory, MemoryError, LIST_DATA_OFFSET, POINTER_SIZE, STRING_DATA_OFFSET};

/// Capacity a string of `len` bytes needs (length prefix and terminator).
fn string_capacity(len: usize) -> usize {
    STRING_DATA_OFFSET + len + 1
}

fn list_capacity(len: usize) -> usize {
    LIST_DATA_OFFSET + len * VALUE_SIZE
}

/// Checks a `start..end` range the way `sub:` and `remSub:` do.
fn check_range(start: i32, end: i32, len: usize) -> Result<(usize, usize), MemoryError> {
    let len = len as i32;
    if start < 0 || start >= len || end < 0 || end > len || start > end {
        return Err(MemoryError::BadIndex);
    }
    Ok((start as usize, end as usize))
}

fn check_insert_index(index: i32, len: usize) -> Result<usize, MemoryError> {
    if index < 0 || index as usize > len {
        return Err(MemoryError::BadIndex);
    }
    Ok(index as usize)
}

impl Memory {
    /// Allocate a new string holding a copy of `bytes`.
    pub fn create_string(&mut self, bytes: &[u8]) -> Result<ObjectKey, MemoryError> {
        let cell = self.allocate(POINTER_SIZE, Payload::Indirection(ObjectKey::DANGLING))?;
        let target = self.allocate(string_capacity(bytes.len()), Payload::String(bytes.to_vec()))?;
        self.heap.set_target(cell, target);
        Ok(cell)
    }

    /// Allocate a new list holding `values`.
    pub fn create_list(&mut self, values: Vec<Value>) -> Result<ObjectKey, MemoryError> {
        let cell = self.allocate(POINTER_SIZE, Payload::Indirection(ObjectKey::DANGLING))?;
        let target = self.allocate(list_capacity(values.len()), Payload::List(values))?;
        self.heap.set_target(cell, target);
        Ok(cell)
    }

    pub fn string(&self, cell: ObjectKey) -> Result<&[u8], MemoryError> {
        let target = self.heap.target(cell).ok_or(MemoryError::Dangling)?;
        match self.heap.get(target).map(|object| &object.payload) {
            Some(Payload::String(bytes)) => Ok(bytes),
            Some(_) => Err(MemoryError::BadType),
            None => Err(MemoryError::Dangling),
        }
    }

    pub fn list(&self, cell: ObjectKey) -> Result<&[Value], MemoryError> {
        let target = self.heap.target(cell).ok_or(MemoryError::Dangling)?;
        match self.heap.get(target).map(|object| &object.payload) {
            Some(Payload::List(values)) => Ok(values),
            Some(_) => Err(MemoryError::BadType),
            None => Err(MemoryError::Dangling),
        }
    }

    fn string_mut(&mut self, cell: ObjectKey) -> Result<&mut Vec<u8>, MemoryError> {
        let target = self.heap.target(cell).ok_or(MemoryError::Dangling)?;
        match self.heap.get_mut(target).map(|object| &mut object.payload) {
            Some(Payload::String(bytes)) => Ok(bytes),
            Some(_) => Err(MemoryError::BadType),
            None => Err(MemoryError::Dangling),
        }
    }

    fn list_mut(&mut self, cell: ObjectKey) -> Result<&mut Vec<Value>, MemoryError> {
        let target = self.heap.target(cell).ok_or(MemoryError::Dangling)?;
        match self.heap.get_mut(target).map(|object| &mut object.payload) {
            Some(Payload::List(values)) => Ok(values),
            Some(_) => Err(MemoryError::BadType),
            None => Err(MemoryError::Dangling),
        }
    }

    /// Payload capacity currently reserved for a string or list.
    pub fn capacity(&self, cell: ObjectKey) -> Result<usize, MemoryError> {
        let target = self.heap.target(cell).ok_or(MemoryError::Dangling)?;
        self.heap
            .get(target)
            .map(|object| object.size)
            .ok_or(MemoryError::Dangling)
    }

    fn resize_payload(&mut self, cell: ObjectKey, needed: usize, grown: usize) -> Result<(), MemoryError> {
        let target = self.heap.target(cell).ok_or(MemoryError::Dangling)?;
        let capacity = self.capacity(cell)?;
        if needed > capacity || needed < capacity / 4 {
            let moved = self.resize(target, grown)?;
            self.heap.set_target(cell, moved);
        }
        Ok(())
    }

    /// Make room for a string of `len` bytes.
    pub fn resize_string(&mut self, cell: ObjectKey, len: usize) -> Result<(), MemoryError> {
        self.resize_payload(
            cell,
            string_capacity(len),
            STRING_DATA_OFFSET + (len + 1) * 2,
        )
    }

    /// Make room for a list of `len` elements.
    pub fn resize_list(&mut self, cell: ObjectKey, len: usize) -> Result<(), MemoryError> {
        self.resize_payload(cell, list_capacity(len), LIST_DATA_OFFSET + len * VALUE_SIZE * 2)
    }

    /// Length of a string or list value.
    pub fn sequence_len(&self, value: Value) -> Result<usize, MemoryError> {
        match value {
            Value::String(cell) => Ok(self.string(cell)?.len()),
            Value::List(cell) => Ok(self.list(cell)?.len()),
            _ => Err(MemoryError::BadType),
        }
    }

    pub fn byte(&self, cell: ObjectKey, index: usize) -> Result<u8, MemoryError> {
        self.string(cell)?
            .get(index)
            .copied()
            .ok_or(MemoryError::BadIndex)
    }

    pub fn set_byte(&mut self, cell: ObjectKey, index: usize, byte: u8) -> Result<(), MemoryError> {
        let slot = self
            .string_mut(cell)?
            .get_mut(index)
            .ok_or(MemoryError::BadIndex)?;
        *slot = byte;
        Ok(())
    }

    pub fn element(&self, cell: ObjectKey, index: usize) -> Result<Value, MemoryError> {
        self.list(cell)?
            .get(index)
            .copied()
            .ok_or(MemoryError::BadIndex)
    }

    pub fn set_element(&mut self, cell: ObjectKey, index: usize, value: Value) -> Result<(), MemoryError> {
        let slot = self
            .list_mut(cell)?
            .get_mut(index)
            .ok_or(MemoryError::BadIndex)?;
        *slot = value;
        Ok(())
    }

    /// Insert one element (`ins:`). Strings take a number, stored as a byte.
    pub fn insert_element(&mut self, sequence: Value, index: i32, element: Value) -> Result<(), MemoryError> {
        match sequence {
            Value::String(cell) => {
                let byte = match element {
                    Value::Number(n) => n as i32 as u8,
                    _ => return Err(MemoryError::BadType),
                };
                let len = self.string(cell)?.len();
                let index = check_insert_index(index, len)?;
                self.resize_string(cell, len + 1)?;
                self.string_mut(cell)?.insert(index, byte);
                Ok(())
            }
            Value::List(cell) => {
                let len = self.list(cell)?.len();
                let index = check_insert_index(index, len)?;
                self.resize_list(cell, len + 1)?;
                self.list_mut(cell)?.insert(index, element);
                Ok(())
            }
            _ => Err(MemoryError::BadType),
        }
    }

    /// Remove `start..end` in place (`rem:` and `remSub:`).
    pub fn remove_range(&mut self, sequence: Value, start: i32, end: i32) -> Result<(), MemoryError> {
        match sequence {
            Value::String(cell) => {
                let len = self.string(cell)?.len();
                let (start, end) = check_range(start, end, len)?;
                self.string_mut(cell)?.drain(start..end);
                self.resize_string(cell, len - (end - start))
            }
            Value::List(cell) => {
                let len = self.list(cell)?.len();
                let (start, end) = check_range(start, end, len)?;
                self.list_mut(cell)?.drain(start..end);
                self.resize_list(cell, len - (end - start))
            }
            _ => Err(MemoryError::BadType),
        }
    }

    /// Copy `start..end` into a new sequence of the same type (`sub:`).
    pub fn subsequence(&mut self, sequence: Value, start: i32, end: i32) -> Result<Value, MemoryError> {
        match sequence {
            Value::String(cell) => {
                let bytes = self.string(cell)?;
                let (start, end) = check_range(start, end, bytes.len())?;
                let part = bytes[start..end].to_vec();
                Ok(Value::String(self.create_string(&part)?))
            }
            Value::List(cell) => {
                let values = self.list(cell)?;
                let (start, end) = check_range(start, end, values.len())?;
                let part = values[start..end].to_vec();
                Ok(Value::List(self.create_list(part)?))
            }
            _ => Err(MemoryError::BadType),
        }
    }

    /// Splice the contents of `other` into `sequence` at `index` (`insSub:`
    /// and string `+=`). Both must be the same kind of sequence.
    pub fn insert_subsequence(&mut self, sequence: Value, index: i32, other: Value) -> Result<(), MemoryError> {
        match (sequence, other) {
            (Value::String(cell), Value::String(source)) => {
                let part = self.string(source)?.to_vec();
                let len = self.string(cell)?.len();
                let index = check_insert_index(index, len)?;
                self.resize_string(cell, len + part.len())?;
                self.string_mut(cell)?.splice(index..index, part);
                Ok(())
            }
            (Value::List(cell), Value::List(source)) => {
                let part = self.list(source)?.to_vec();
                let len = self.list(cell)?.len();
                let index = check_insert_index(index, len)?;
                self.resize_list(cell, len + part.len())?;
                self.list_mut(cell)?.splice(index..index, part);
                Ok(())
            }
            _ => Err(MemoryError::BadType),
        }
    }

    /// Shallow copy (`copy:`). List elements that are strings or lists are shared.
    pub fn copy_sequence(&mut self, sequence: Value) -> Result<Value, MemoryError> {
        match sequence {
            Value::String(cell) => {
                let bytes = self.string(cell)?.to_vec();
                Ok(Value::String(self.create_string(&bytes)?))
            }
            Value::List(cell) => {
                let values = self.list(cell)?.to_vec();
                Ok(Value::List(self.create_list(values)?))
            }
            _ => Err(MemoryError::BadType),
        }
    }

    /// New string holding `left` followed by `right`.
    pub fn concatenate(&mut self, left: ObjectKey, right: ObjectKey) -> Result<Value, MemoryError> {
        let mut bytes = self.string(left)?.to_vec();
        bytes.extend_from_slice(self.string(right)?);
        Ok(Value::String(self.create_string(&bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::stack::BranchAction;

    fn memory() -> Memory {
        let mut memory = Memory::new(1200);
        memory.push_scope().unwrap();
        memory.push_branch(BranchAction::Run, 0).unwrap();
        memory
    }

    #[test]
    fn test_string_growth_schedule() {
        let mut memory = memory();
        let cell = memory.create_string(b"abcd").unwrap();
        let text = Value::String(cell);
        // 2 + 4 + 1
        assert_eq!(memory.capacity(cell).unwrap(), 7);

        let allocations = memory.heap().total_allocations();
        memory.insert_element(text, 4, Value::Number(b'e' as f32)).unwrap();
        // 5 characters need 8 bytes: grow to 2 + 6 * 2
        assert_eq!(memory.capacity(cell).unwrap(), 14);
        assert_eq!(memory.heap().total_allocations(), allocations + 1);

        for byte in b"fghijk" {
            let len = memory.sequence_len(text).unwrap() as i32;
            memory.insert_element(text, len, Value::Number(*byte as f32)).unwrap();
        }
        // 11 characters fit in 14 bytes without another allocation
        assert_eq!(memory.string(cell).unwrap(), b"abcdefghijk");
        assert_eq!(memory.capacity(cell).unwrap(), 14);
        assert_eq!(memory.heap().total_allocations(), allocations + 1);
    }

    #[test]
    fn test_list_shrinks_below_quarter() {
        let mut memory = memory();
        let cell = memory.create_list(vec![Value::Number(0.0); 10]).unwrap();
        let list = Value::List(cell);
        assert_eq!(memory.capacity(cell).unwrap(), 52);

        memory.remove_range(list, 0, 9).unwrap();
        // 1 element needs 7 bytes, under 52 / 4
        assert_eq!(memory.capacity(cell).unwrap(), 12);
    }

    #[test]
    fn test_range_checks() {
        let mut memory = memory();
        let text = Value::String(memory.create_string(b"abc").unwrap());

        assert_eq!(memory.subsequence(text, 3, 3), Err(MemoryError::BadIndex));
        assert_eq!(memory.subsequence(text, 2, 1), Err(MemoryError::BadIndex));
        assert_eq!(memory.remove_range(text, 0, 4), Err(MemoryError::BadIndex));
        assert_eq!(
            memory.insert_element(text, 4, Value::Number(1.0)),
            Err(MemoryError::BadIndex)
        );
    }

    #[test]
    fn test_insert_subsequence_into_itself() {
        let mut memory = memory();
        let text = Value::String(memory.create_string(b"ab").unwrap());
        memory.insert_subsequence(text, 1, text).unwrap();
        assert_eq!(memory.string(text.cell().unwrap()).unwrap(), b"aabb");
    }
}
