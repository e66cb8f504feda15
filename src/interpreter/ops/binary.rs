//! Binary operator evaluation
//!
//! The right operand is evaluated with the operator's own precedence as the
//! ceiling, which makes every binary operator left-associative. Assignment
//! operators are handed to [`assign`](super::assign); everything else produces
//! a fresh value with no destination.

use crate::interpreter::engine::{Eval, Interpreter};
use crate::interpreter::errors::ErrorKind;
use crate::interpreter::ops::Expression;
use crate::memory::value::{from_bool, to_int, truthy, Value};
use crate::storage::Storage;
use crate::symbols::{
    is_compound_assignment, BOOLEAN_AND, BOOLEAN_OR, BOOLEAN_XOR, EQUAL, GREATER_OR_EQUAL,
    LESS_OR_EQUAL, NOT_EQUAL, SHIFT_LEFT, SHIFT_RIGHT,
};
use crate::terminal::Console;

/// Apply a number-only operator. `None` when the operator divides by zero.
pub(crate) fn apply_numeric(operator: u8, left: f32, right: f32) -> Option<f32> {
    let (a, b) = (to_int(left), to_int(right));
    let result = match operator {
        b'+' => left + right,
        b'-' => left - right,
        b'*' => left * right,
        b'/' => {
            if right == 0.0 {
                return None;
            }
            left / right
        }
        b'%' => {
            if b == 0 {
                return None;
            }
            a.wrapping_rem(b) as f32
        }
        BOOLEAN_AND => (truthy(left) && truthy(right)) as u8 as f32,
        BOOLEAN_OR => (truthy(left) || truthy(right)) as u8 as f32,
        BOOLEAN_XOR => (truthy(left) ^ truthy(right)) as u8 as f32,
        b'&' => (a & b) as f32,
        b'|' => (a | b) as f32,
        b'^' => (a ^ b) as f32,
        SHIFT_LEFT => a.wrapping_shl(b as u32) as f32,
        SHIFT_RIGHT => a.wrapping_shr(b as u32) as f32,
        b'>' => (left > right) as u8 as f32,
        b'<' => (left < right) as u8 as f32,
        GREATER_OR_EQUAL => (left >= right) as u8 as f32,
        LESS_OR_EQUAL => (left <= right) as u8 as f32,
        EQUAL => (left == right) as u8 as f32,
        NOT_EQUAL => (left != right) as u8 as f32,
        _ => return None,
    };
    Some(result)
}

impl<S: Storage, C: Console> Interpreter<S, C> {
    /// Consume a binary operator at `expression.code` and its right operand.
    pub(crate) fn evaluate_binary_op(
        &mut self,
        expression: &mut Expression,
        operator: u8,
        precedence: u8,
    ) -> Eval<()> {
        let start = expression.start;
        self.memory.roots_mut().track(expression.value);
        let right = self.evaluate_expression(expression.code + 1, precedence, false)?;
        self.memory.roots_mut().track(right.value);
        if right.value.is_missing() {
            return Err(self.raise(ErrorKind::MissingValue, start));
        }
        expression.code = right.code;

        if is_compound_assignment(operator) {
            return self.evaluate_compound_assignment(expression, operator, right.value);
        }
        if operator == b'=' {
            return self.evaluate_assignment(expression, right.value);
        }

        let left = expression.value;
        let value = match (operator, left, right.value) {
            (_, Value::Missing, _) => return Err(self.raise(ErrorKind::MissingValue, start)),
            (b'+', Value::String(a), Value::String(b)) => {
                let result = self.memory.concatenate(a, b);
                self.check(result, start)?
            }
            (EQUAL | NOT_EQUAL, Value::String(a), Value::String(b)) => {
                let result = self
                    .memory
                    .string(a)
                    .and_then(|a| Ok(a == self.memory.string(b)?));
                let same = self.check(result, start)?;
                from_bool(same == (operator == EQUAL))
            }
            (_, Value::Number(a), Value::Number(b)) => match apply_numeric(operator, a, b) {
                Some(number) => Value::Number(number),
                None => return Err(self.raise(ErrorKind::DivideByZero, start)),
            },
            _ => return Err(self.raise(ErrorKind::BadOperandType, start)),
        };
        expression.value = value;
        expression.destination = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_operators_truncate() {
        assert_eq!(apply_numeric(b'%', 7.9, 2.5), Some(1.0));
        assert_eq!(apply_numeric(b'&', 6.7, 3.2), Some(2.0));
        assert_eq!(apply_numeric(SHIFT_LEFT, 1.0, 4.0), Some(16.0));
        assert_eq!(apply_numeric(SHIFT_RIGHT, -8.0, 1.0), Some(-4.0));
    }

    #[test]
    fn test_division_by_zero_is_refused() {
        assert_eq!(apply_numeric(b'/', 1.0, 0.0), None);
        assert_eq!(apply_numeric(b'%', 1.0, 0.5), None);
        assert_eq!(apply_numeric(b'/', 1.0, 0.5), Some(2.0));
    }

    #[test]
    fn test_boolean_operators_use_truthiness() {
        assert_eq!(apply_numeric(BOOLEAN_AND, 2.0, -1.0), Some(1.0));
        assert_eq!(apply_numeric(BOOLEAN_XOR, 2.0, -1.0), Some(0.0));
        assert_eq!(apply_numeric(BOOLEAN_OR, 0.0, 0.0), Some(0.0));
    }
}
