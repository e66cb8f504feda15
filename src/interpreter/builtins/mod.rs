//! Built-in functions
//!
//! Every built-in is a single symbol byte followed by a fixed number of
//! comma-separated arguments (`print:A`, `sub:S,0,2`, `rand;`). Arguments are
//! evaluated left to right and registered as roots before the function runs.
//!
//! The non-control families live in their own modules:
//! - [`math`]: `rand;`, `randInt:`, rounding, trigonometry, `pow:`, `log:`
//! - [`values`]: conversions and sequence editing
//! - [`io`]: the console and the file store

mod io;
mod math;
mod values;

use crate::interpreter::constants::STATEMENT_PRECEDENCE;
use crate::interpreter::engine::{Eval, Interpreter};
use crate::interpreter::errors::ErrorKind;
use crate::interpreter::ops::Expression;
use crate::memory::value::{to_int, Address, Value};
use crate::storage::Storage;
use crate::symbols::{argument_count, family, Family, FUNCTION};
use crate::terminal::Console;

impl<S: Storage, C: Console> Interpreter<S, C> {
    /// Evaluate the arguments of the function symbol at `expression.start`
    /// and run it.
    pub(crate) fn evaluate_function(
        &mut self,
        expression: &mut Expression,
        symbol: u8,
        top_level: bool,
    ) -> Eval<()> {
        let start = expression.start;
        let count = match argument_count(symbol) {
            Some(count) => count as usize,
            // `func:` takes its name plus one argument per parameter
            None => self.count_parameters(start) + 1,
        };

        let array = self.memory.roots_mut().track_values();
        let mut arguments = Vec::with_capacity(count);
        let mut code = start + 1;
        for index in 0..count {
            let argument = self.evaluate_expression(code, STATEMENT_PRECEDENCE, false)?;
            if argument.value.is_missing() && symbol != FUNCTION {
                return Err(self.raise(ErrorKind::MissingValue, start));
            }
            self.memory.roots_mut().track_in(array, argument.value);
            code = argument.code;
            if index + 1 < count {
                if self.read_symbol(code) != b',' {
                    return Err(self.raise(ErrorKind::MissingComma, start));
                }
                code += 1;
            }
            arguments.push(argument);
        }
        expression.code = code;

        let values: Vec<Value> = arguments.iter().map(|argument| argument.value).collect();
        match family(symbol) {
            Some(Family::Control) => {
                if !top_level {
                    return Err(self.raise(ErrorKind::NotTopLevel, start));
                }
                self.evaluate_control(expression, symbol, &arguments)
            }
            Some(Family::Math) => {
                expression.value = self.evaluate_math(symbol, &values, start)?;
                Ok(())
            }
            Some(Family::Value) => {
                expression.value = self.evaluate_value_function(symbol, &values, start)?;
                Ok(())
            }
            Some(Family::InputOutput) => {
                expression.value = self.evaluate_io(symbol, &values, start)?;
                Ok(())
            }
            None => Err(self.raise(ErrorKind::BadStartOfExpression, start)),
        }
    }

    /// Number argument, or "bad argument type".
    pub(crate) fn number_argument(&mut self, value: Value, start: Address) -> Eval<f32> {
        match value {
            Value::Number(number) => Ok(number),
            _ => Err(self.raise(ErrorKind::BadArgumentType, start)),
        }
    }

    /// Number argument truncated to an index.
    pub(crate) fn index_argument(&mut self, value: Value, start: Address) -> Eval<i32> {
        self.number_argument(value, start).map(to_int)
    }

    /// Bytes of a string argument, or "bad argument type".
    pub(crate) fn string_argument(&mut self, value: Value, start: Address) -> Eval<Vec<u8>> {
        let Value::String(cell) = value else {
            return Err(self.raise(ErrorKind::BadArgumentType, start));
        };
        let bytes = self.memory.string(cell).map(<[u8]>::to_vec);
        self.check(bytes, start)
    }
}
