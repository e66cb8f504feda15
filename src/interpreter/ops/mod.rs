//! Operators and the places they write to
//!
//! An expression yields a value and, when it names storage, a [`Destination`]
//! that assignment operators write back through. Destinations into strings
//! and lists hold the sequence's indirection cell plus an index, so they stay
//! valid when the payload is reallocated.

pub(crate) mod assign;
pub(crate) mod binary;
pub(crate) mod unary;

use crate::interpreter::engine::{Eval, Interpreter};
use crate::interpreter::errors::ErrorKind;
use crate::memory::heap::ObjectKey;
use crate::memory::stack::VariableRef;
use crate::memory::value::{to_int, Address, Value};
use crate::storage::Storage;
use crate::terminal::Console;

/// Storage an expression refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Destination {
    Variable(VariableRef),
    /// Element of a list
    Element { list: ObjectKey, index: usize },
    /// Byte of a string, read and written as a number
    Character { string: ObjectKey, index: usize },
}

/// Result of evaluating one expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Expression {
    /// First byte of the expression, used for error addresses
    pub start: Address,
    /// First byte after the expression
    pub code: Address,
    pub value: Value,
    pub destination: Option<Destination>,
}

impl Expression {
    pub fn new(start: Address) -> Self {
        Expression {
            start,
            code: start,
            value: Value::Missing,
            destination: None,
        }
    }
}

impl<S: Storage, C: Console> Interpreter<S, C> {
    /// Current contents of a destination.
    pub(crate) fn read_destination(&mut self, destination: Destination, address: Address) -> Eval<Value> {
        let result = match destination {
            Destination::Variable(reference) => self
                .memory
                .variable_value(reference)
                .ok_or(crate::memory::MemoryError::Dangling),
            Destination::Element { list, index } => self.memory.element(list, index),
            Destination::Character { string, index } => self
                .memory
                .byte(string, index)
                .map(|byte| Value::Number(byte as f32)),
        };
        self.check(result, address)
    }

    /// Store `value` through a destination. Characters take numbers only.
    pub(crate) fn write_destination(
        &mut self,
        destination: Destination,
        value: Value,
        address: Address,
    ) -> Eval<()> {
        let result = match destination {
            Destination::Variable(reference) => self.memory.set_variable(reference, value),
            Destination::Element { list, index } => self.memory.set_element(list, index, value),
            Destination::Character { string, index } => match value {
                Value::Number(number) => self.memory.set_byte(string, index, to_int(number) as u8),
                _ => return Err(self.raise(ErrorKind::BadOperandType, address)),
            },
        };
        self.check(result, address)
    }
}
