//! Unary operator evaluation
//!
//! The operand binds tighter than any binary operator but still takes its
//! postfix operators, so `-A[0]` negates the element.

use crate::interpreter::constants::UNARY_PRECEDENCE;
use crate::interpreter::engine::{Eval, Interpreter};
use crate::interpreter::errors::ErrorKind;
use crate::interpreter::ops::Expression;
use crate::memory::value::{from_bool, to_int, Value};
use crate::storage::Storage;
use crate::symbols::{DECREMENT, INCREMENT};
use crate::terminal::Console;

impl<S: Storage, C: Console> Interpreter<S, C> {
    /// Evaluate `- ! ~ ++ --` followed by their operand.
    pub(crate) fn evaluate_unary_op(&mut self, expression: &mut Expression, operator: u8) -> Eval<()> {
        let start = expression.start;
        let operand = self.evaluate_expression(expression.code + 1, UNARY_PRECEDENCE, false)?;
        expression.code = operand.code;
        let number = match operand.value {
            Value::Missing => return Err(self.raise(ErrorKind::MissingValue, start)),
            Value::Number(number) => number,
            _ => return Err(self.raise(ErrorKind::BadOperandType, start)),
        };

        match operator {
            b'-' => {
                expression.value = Value::Number(-number);
                expression.destination = None;
            }
            b'!' => {
                expression.value = from_bool(number == 0.0);
                expression.destination = None;
            }
            b'~' => {
                expression.value = Value::Number(!to_int(number) as f32);
                expression.destination = None;
            }
            INCREMENT | DECREMENT => {
                let Some(destination) = operand.destination else {
                    return Err(self.raise(ErrorKind::BadDestination, start));
                };
                let step = if operator == INCREMENT { 1.0 } else { -1.0 };
                self.write_destination(destination, Value::Number(number + step), start)?;
                // Characters wrap, so the stored value is the result
                expression.value = self.read_destination(destination, start)?;
                expression.destination = Some(destination);
            }
            _ => return Err(self.raise(ErrorKind::BadStartOfExpression, start)),
        }
        Ok(())
    }

    /// Postfix `++` / `--`: update the destination, keep the old value.
    pub(crate) fn evaluate_postfix_step(&mut self, expression: &mut Expression, operator: u8) -> Eval<()> {
        let start = expression.start;
        expression.code += 1;
        let number = match expression.value {
            Value::Number(number) => number,
            _ => return Err(self.raise(ErrorKind::BadOperandType, start)),
        };
        let Some(destination) = expression.destination else {
            return Err(self.raise(ErrorKind::BadDestination, start));
        };
        let step = if operator == INCREMENT { 1.0 } else { -1.0 };
        self.write_destination(destination, Value::Number(number + step), start)
    }
}
