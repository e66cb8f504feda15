use crate::interpreter::engine::{Eval, Interpreter};
use crate::interpreter::errors::ErrorKind;
use crate::interpreter::numbers::{format_number, parse_number};
use crate::memory::value::{from_bool, Address, Value};
use crate::storage::Storage;
use crate::symbols::{
    COPY, EQUAL_REFERENCE, INSERT, INSERT_SUBSEQUENCE, LENGTH, NUMBER, REMOVE, REMOVE_SUBSEQUENCE,
    STRING, SUBSEQUENCE, TYPE,
};
use crate::terminal::Console;

impl<S: Storage, C: Console> Interpreter<S, C> {
    pub(crate) fn evaluate_value_function(
        &mut self,
        symbol: u8,
        arguments: &[Value],
        start: Address,
    ) -> Eval<Value> {
        let sequence = arguments[0];
        let result = match symbol {
            NUMBER => match sequence {
                Value::Number(_) => Ok(sequence),
                Value::String(_) => {
                    let text = self.string_argument(sequence, start)?;
                    Ok(Value::Number(parse_number(&text)))
                }
                _ => return Err(self.raise(ErrorKind::BadArgumentType, start)),
            },
            STRING => match sequence {
                Value::Number(number) => self
                    .memory
                    .create_string(format_number(number).as_bytes())
                    .map(Value::String),
                Value::String(_) => Ok(sequence),
                _ => return Err(self.raise(ErrorKind::BadArgumentType, start)),
            },
            TYPE => Ok(Value::Number(sequence.type_tag() as f32)),
            LENGTH => self
                .memory
                .sequence_len(sequence)
                .map(|len| Value::Number(len as f32)),
            COPY => self.memory.copy_sequence(sequence),
            INSERT => {
                let index = self.index_argument(arguments[1], start)?;
                self.memory
                    .insert_element(sequence, index, arguments[2])
                    .map(|()| Value::Missing)
            }
            REMOVE => {
                let index = self.index_argument(arguments[1], start)?;
                self.memory
                    .remove_range(sequence, index, index.saturating_add(1))
                    .map(|()| Value::Missing)
            }
            SUBSEQUENCE => {
                let first = self.index_argument(arguments[1], start)?;
                let end = self.index_argument(arguments[2], start)?;
                self.memory.subsequence(sequence, first, end)
            }
            INSERT_SUBSEQUENCE => {
                let index = self.index_argument(arguments[1], start)?;
                self.memory
                    .insert_subsequence(sequence, index, arguments[2])
                    .map(|()| Value::Missing)
            }
            REMOVE_SUBSEQUENCE => {
                let first = self.index_argument(arguments[1], start)?;
                let end = self.index_argument(arguments[2], start)?;
                self.memory
                    .remove_range(sequence, first, end)
                    .map(|()| Value::Missing)
            }
            EQUAL_REFERENCE => match (sequence, arguments[1]) {
                (Value::String(a), Value::String(b)) | (Value::List(a), Value::List(b)) => {
                    Ok(from_bool(a == b))
                }
                _ => return Err(self.raise(ErrorKind::BadArgumentType, start)),
            },
            _ => return Err(self.raise(ErrorKind::BadStartOfExpression, start)),
        };
        self.check(result, start)
    }
}
