//! Assignment operators
//!
//! `=` stores the right value through the left expression's destination,
//! creating a variable in the current scope when the left side is an unbound
//! name. Compound operators read the destination, combine and write back.
//! Both leave the expression's own value untouched.

use crate::interpreter::engine::{Eval, Interpreter};
use crate::interpreter::errors::ErrorKind;
use crate::interpreter::ops::binary::apply_numeric;
use crate::interpreter::ops::{Destination, Expression};
use crate::memory::value::Value;
use crate::storage::Storage;
use crate::symbols::{
    ADD_ASSIGN, BITWISE_AND_ASSIGN, BITWISE_OR_ASSIGN, BITWISE_XOR_ASSIGN, BOOLEAN_AND,
    BOOLEAN_AND_ASSIGN, BOOLEAN_OR, BOOLEAN_OR_ASSIGN, BOOLEAN_XOR, BOOLEAN_XOR_ASSIGN,
    DIVIDE_ASSIGN, MODULUS_ASSIGN, MULTIPLY_ASSIGN, SHIFT_LEFT, SHIFT_LEFT_ASSIGN, SHIFT_RIGHT,
    SHIFT_RIGHT_ASSIGN, SUBTRACT_ASSIGN,
};
use crate::terminal::Console;

/// The plain operator a compound assignment applies.
fn base_operator(operator: u8) -> Option<u8> {
    let base = match operator {
        ADD_ASSIGN => b'+',
        SUBTRACT_ASSIGN => b'-',
        MULTIPLY_ASSIGN => b'*',
        DIVIDE_ASSIGN => b'/',
        MODULUS_ASSIGN => b'%',
        BOOLEAN_AND_ASSIGN => BOOLEAN_AND,
        BOOLEAN_OR_ASSIGN => BOOLEAN_OR,
        BOOLEAN_XOR_ASSIGN => BOOLEAN_XOR,
        BITWISE_AND_ASSIGN => b'&',
        BITWISE_OR_ASSIGN => b'|',
        BITWISE_XOR_ASSIGN => b'^',
        SHIFT_LEFT_ASSIGN => SHIFT_LEFT,
        SHIFT_RIGHT_ASSIGN => SHIFT_RIGHT,
        _ => return None,
    };
    Some(base)
}

impl<S: Storage, C: Console> Interpreter<S, C> {
    pub(crate) fn evaluate_assignment(&mut self, expression: &mut Expression, value: Value) -> Eval<()> {
        let start = expression.start;
        let destination = match expression.destination {
            Some(destination) => destination,
            None => {
                let (name, _) = self.read_variable_name(start)?;
                let created = self.memory.create_variable(&name, Value::Missing);
                let reference = self.check(created, start)?;
                let destination = Destination::Variable(reference);
                expression.destination = Some(destination);
                destination
            }
        };
        self.write_destination(destination, value, start)
    }

    pub(crate) fn evaluate_compound_assignment(
        &mut self,
        expression: &mut Expression,
        operator: u8,
        right: Value,
    ) -> Eval<()> {
        let start = expression.start;
        let Some(destination) = expression.destination else {
            return Err(self.raise(ErrorKind::BadDestination, start));
        };
        let current = self.read_destination(destination, start)?;

        let updated = match (operator, current, right) {
            (ADD_ASSIGN, Value::String(_), Value::String(_)) => {
                let len = self.memory.sequence_len(current);
                let end = self.check(len, start)?;
                let result = self.memory.insert_subsequence(current, end as i32, right);
                return self.check(result, start);
            }
            (MODULUS_ASSIGN | DIVIDE_ASSIGN, Value::Number(_), Value::Number(divisor))
                if divisor == 0.0 =>
            {
                return Err(self.raise(ErrorKind::DivideByZero, start));
            }
            (_, Value::Number(left), Value::Number(right)) => {
                match base_operator(operator).map(|base| apply_numeric(base, left, right)) {
                    Some(Some(number)) => number,
                    Some(None) => return Err(self.raise(ErrorKind::DivideByZero, start)),
                    None => return Err(self.raise(ErrorKind::BadOperandType, start)),
                }
            }
            _ => return Err(self.raise(ErrorKind::BadOperandType, start)),
        };
        self.write_destination(destination, Value::Number(updated), start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_compound_operator_has_a_base() {
        for operator in ADD_ASSIGN..=SHIFT_RIGHT_ASSIGN {
            assert!(base_operator(operator).is_some(), "operator {}", operator);
        }
        assert_eq!(base_operator(b'='), None);
    }
}
