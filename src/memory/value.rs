//! Runtime value representation
//!
//! [`Value`] is the fixed-size tagged union every expression produces. It is
//! `Copy`: strings and lists are never stored inline, only as an [`ObjectKey`]
//! naming their indirection cell on the heap, so copying a value shares the
//! underlying object.
//!
//! # Value Types
//!
//! - [`Value::Missing`]: the result of a statement with no value, or of an
//!   unassigned variable
//! - [`Value::Number`]: single-precision float
//! - [`Value::String`]: indirection cell of a string object
//! - [`Value::List`]: indirection cell of a list object
//! - [`Value::Function`]: source address of a `func:` header

use super::heap::ObjectKey;

/// Address of a byte in program storage.
pub type Address = u32;

/// Bytes a value occupies in the region accounting (tag plus a 32-bit payload).
pub const VALUE_SIZE: usize = 5;

/// Runtime values in the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    #[default]
    Missing,
    Number(f32),
    String(ObjectKey),
    List(ObjectKey),
    Function(Address),
}

impl Value {
    /// Numeric tag reported by `type:`.
    pub fn type_tag(&self) -> u8 {
        match self {
            Value::Missing => 0,
            Value::Number(_) => 1,
            Value::String(_) => 2,
            Value::List(_) => 3,
            Value::Function(_) => 4,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Missing => "missing",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Function(_) => "function",
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Get the number, returns None if not a Number
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Indirection cell of a string or list, None for scalar values
    pub fn cell(&self) -> Option<ObjectKey> {
        match self {
            Value::String(cell) | Value::List(cell) => Some(*cell),
            _ => None,
        }
    }
}

/// Truthiness used by the boolean operators.
pub fn truthy(number: f32) -> bool {
    number != 0.0
}

/// Converts a number to the integer domain used by bitwise operators and
/// indices. Fractions truncate toward zero and out-of-range values saturate.
pub fn to_int(number: f32) -> i32 {
    number as i32
}

pub fn from_bool(flag: bool) -> Value {
    Value::Number(if flag { 1.0 } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(Value::Missing.type_tag(), 0);
        assert_eq!(Value::Number(2.5).type_tag(), 1);
        assert_eq!(Value::Function(19).type_tag(), 4);
    }

    #[test]
    fn test_to_int_truncates() {
        assert_eq!(to_int(3.9), 3);
        assert_eq!(to_int(-3.9), -3);
        assert_eq!(to_int(1e20), i32::MAX);
    }
}
