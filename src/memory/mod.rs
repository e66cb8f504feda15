//! Memory model for the runtime
//!
//! One fixed-size region is shared by two partitions:
//! - [`stack`]: scopes, variables and branch records, growing up from offset 0
//! - [`heap`]: strings, lists and their indirection cells, growing down from
//!   the region end
//!
//! [`Memory`] owns both halves and passes each the other's boundary, so every
//! growth step on either side is checked for a collision. [`gc`] holds the
//! explicit root registry and the mark-and-sweep collector, [`sequence`] the
//! string and list operations built on top of the heap.
//!
//! # Region sizes
//!
//! Sizes follow the device layout rather than Rust's: a value takes
//! 5 bytes, a heap header 8, an indirection payload 2. Payload data itself
//! lives in ordinary `Vec`s; the region is a byte budget, not a byte array.

pub mod gc;
pub mod heap;
pub mod sequence;
pub mod stack;
pub mod value;

use heap::{Heap, ObjectKey, Payload};
use stack::{BranchAction, ScopeStack, VariableRef};
use std::fmt;
use value::{Address, Value};

pub use gc::{RootMark, RootStack, Treasure};

/// Region size of the reference device
pub const DEFAULT_REGION_SIZE: usize = 1200;
/// Payload bytes of an indirection cell
pub const POINTER_SIZE: usize = 2;
/// Length prefix in front of string bytes
pub const STRING_DATA_OFFSET: usize = 2;
/// Length prefix in front of list elements
pub const LIST_DATA_OFFSET: usize = 2;

/// Failures of region and sequence operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// Growing one partition would overlap the other
    Collision,
    /// Index or range outside the sequence
    BadIndex,
    /// Operand is not the kind of sequence or element the operation needs
    BadType,
    /// Handle to an object that has already been collected
    Dangling,
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryError::Collision => write!(f, "stack-heap collision"),
            MemoryError::BadIndex => write!(f, "index out of range"),
            MemoryError::BadType => write!(f, "wrong sequence type"),
            MemoryError::Dangling => write!(f, "reference to a collected object"),
        }
    }
}

impl std::error::Error for MemoryError {}

/// The shared region: scope partition, heap partition and the root registry
#[derive(Debug, Clone)]
pub struct Memory {
    size: usize,
    heap: Heap,
    stack: ScopeStack,
    roots: RootStack,
}

impl Memory {
    pub fn new(size: usize) -> Self {
        Memory {
            size,
            heap: Heap::new(size),
            stack: ScopeStack::new(),
            roots: RootStack::new(),
        }
    }

    /// Empty both partitions and forget every root.
    pub fn reset(&mut self) {
        self.heap.reset();
        self.stack.reset();
        self.roots.clear();
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn stack(&self) -> &ScopeStack {
        &self.stack
    }

    pub fn roots(&self) -> &RootStack {
        &self.roots
    }

    pub fn roots_mut(&mut self) -> &mut RootStack {
        &mut self.roots
    }

    /// Bytes between the top of the scope partition and the bottom of the heap.
    pub fn free_bytes(&self) -> usize {
        self.heap.boundary().saturating_sub(self.stack.boundary())
    }

    pub fn allocate(&mut self, size: usize, payload: Payload) -> Result<ObjectKey, MemoryError> {
        self.heap.allocate(size, payload, self.stack.boundary())
    }

    pub fn resize(&mut self, key: ObjectKey, size: usize) -> Result<ObjectKey, MemoryError> {
        self.heap.resize(key, size, self.stack.boundary())
    }

    pub fn deallocate(&mut self, key: ObjectKey) {
        self.heap.deallocate(key);
    }

    pub fn push_scope(&mut self) -> Result<usize, MemoryError> {
        self.stack.push_scope(self.heap.boundary())
    }

    pub fn pop_scope(&mut self) {
        self.stack.pop_scope();
    }

    pub fn push_branch(&mut self, action: BranchAction, address: Address) -> Result<(), MemoryError> {
        self.stack.push_branch(action, address, self.heap.boundary())
    }

    pub fn pop_branch(&mut self) -> bool {
        self.stack.pop_branch()
    }

    pub fn branch_action(&self) -> BranchAction {
        self.stack.branch_action()
    }

    pub fn set_branch_action(&mut self, action: BranchAction) {
        self.stack.set_branch_action(action);
    }

    pub fn break_loop(&mut self) -> bool {
        self.stack.break_loop()
    }

    pub fn continue_loop(&mut self) -> Option<Address> {
        self.stack.continue_loop()
    }

    pub fn find_variable(&self, name: &str) -> Option<VariableRef> {
        self.stack.find(name)
    }

    pub fn create_variable(&mut self, name: &str, value: Value) -> Result<VariableRef, MemoryError> {
        self.stack.create_variable(name, value, self.heap.boundary())
    }

    pub fn variable_value(&self, reference: VariableRef) -> Option<Value> {
        self.stack.variable(reference).map(|variable| variable.value)
    }

    pub fn set_variable(&mut self, reference: VariableRef, value: Value) -> Result<(), MemoryError> {
        let variable = self
            .stack
            .variable_mut(reference)
            .ok_or(MemoryError::Dangling)?;
        variable.value = value;
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(DEFAULT_REGION_SIZE)
    }
}
