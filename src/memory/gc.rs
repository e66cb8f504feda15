//! Mark-and-sweep collection over explicit roots
//!
//! The collector never guesses roots. The evaluator registers every value that
//! may be the only reference to a heap object (a freshly built list, the left
//! operand waiting for its right side, arguments already evaluated) in the
//! [`RootStack`], and releases the registrations in LIFO order when it leaves
//! the expression. Scope registrations cover every variable of that scope.
//!
//! Marking a list flags its indirection cell before descending into the
//! elements; a cell that is already flagged is not descended into again, which
//! is what terminates self-referential lists.

use super::heap::{Payload, SweepStats};
use super::value::Value;
use super::Memory;

/// One root registration
#[derive(Debug, Clone, PartialEq)]
pub enum Treasure {
    Value(Value),
    /// Growing array of values, e.g. call arguments evaluated so far
    Values(Vec<Value>),
    /// Every variable of the scope with this index
    Scope(usize),
}

/// Position in the root stack to release back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootMark(usize);

#[derive(Debug, Clone, Default)]
pub struct RootStack {
    roots: Vec<Treasure>,
}

impl RootStack {
    pub fn new() -> Self {
        RootStack { roots: Vec::new() }
    }

    pub fn mark(&self) -> RootMark {
        RootMark(self.roots.len())
    }

    /// Drop every registration made after `mark`.
    pub fn release(&mut self, mark: RootMark) {
        self.roots.truncate(mark.0);
    }

    pub fn clear(&mut self) {
        self.roots.clear();
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Treasure> {
        self.roots.iter()
    }

    /// Register a value. Scalars own no heap objects and are skipped.
    pub fn track(&mut self, value: Value) {
        if value.cell().is_some() {
            self.roots.push(Treasure::Value(value));
        }
    }

    /// Start an argument array; returns the handle for [`RootStack::track_in`].
    pub fn track_values(&mut self) -> usize {
        self.roots.push(Treasure::Values(Vec::new()));
        self.roots.len() - 1
    }

    pub fn track_in(&mut self, array: usize, value: Value) {
        if let Some(Treasure::Values(values)) = self.roots.get_mut(array) {
            values.push(value);
        }
    }

    pub fn track_scope(&mut self, scope: usize) {
        self.roots.push(Treasure::Scope(scope));
    }
}

impl Memory {
    /// Run a full collection and return what the sweep released.
    pub fn collect_garbage(&mut self) -> SweepStats {
        self.heap.clear_marks();

        let mut pending: Vec<Value> = Vec::new();
        for root in self.roots.iter() {
            match root {
                Treasure::Value(value) => pending.push(*value),
                Treasure::Values(values) => pending.extend(values.iter().copied()),
                Treasure::Scope(index) => {
                    if let Some(scope) = self.stack.scope(*index) {
                        pending.extend(scope.variables().iter().map(|variable| variable.value));
                    }
                }
            }
        }

        while let Some(value) = pending.pop() {
            match value {
                Value::String(cell) => {
                    self.heap.mark(cell);
                    if let Some(target) = self.heap.target(cell) {
                        self.heap.mark(target);
                    }
                }
                Value::List(cell) => {
                    if !self.heap.mark(cell) {
                        continue;
                    }
                    let Some(target) = self.heap.target(cell) else {
                        continue;
                    };
                    self.heap.mark(target);
                    if let Some(object) = self.heap.get(target) {
                        if let Payload::List(values) = &object.payload {
                            pending.extend(values.iter().copied());
                        }
                    }
                }
                _ => {}
            }
        }

        let stats = self.heap.sweep();
        log::debug!(
            "collected {} objects ({} bytes), {} live",
            stats.objects,
            stats.bytes,
            self.heap.len()
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::stack::BranchAction;

    fn memory() -> Memory {
        let mut memory = Memory::new(1200);
        let scope = memory.push_scope().unwrap();
        memory.push_branch(BranchAction::Run, 0).unwrap();
        memory.roots_mut().track_scope(scope);
        memory
    }

    #[test]
    fn test_unrooted_objects_are_swept() {
        let mut memory = memory();
        let free = memory.free_bytes();
        memory.create_string(b"temporary").unwrap();
        assert!(memory.free_bytes() < free);

        let stats = memory.collect_garbage();
        assert_eq!(stats.objects, 2);
        assert_eq!(memory.free_bytes(), free);
    }

    #[test]
    fn test_self_referential_list_survives() {
        let mut memory = memory();
        let cell = memory.create_list(vec![Value::Number(1.0)]).unwrap();
        let list = Value::List(cell);
        memory.insert_element(list, 1, list).unwrap();
        memory.create_variable("A", list).unwrap();

        for _ in 0..3 {
            memory.collect_garbage();
        }
        assert_eq!(memory.list(cell).unwrap().len(), 2);
        assert_eq!(memory.list(cell).unwrap()[1], list);
    }

    #[test]
    fn test_released_roots_stop_protecting() {
        let mut memory = memory();
        let mark = memory.roots().mark();
        let value = Value::String(memory.create_string(b"x").unwrap());
        memory.roots_mut().track(value);

        memory.collect_garbage();
        assert!(memory.string(value.cell().unwrap()).is_ok());

        memory.roots_mut().release(mark);
        memory.collect_garbage();
        assert!(memory.string(value.cell().unwrap()).is_err());
    }
}
