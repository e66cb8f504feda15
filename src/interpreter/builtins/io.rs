use crate::interpreter::constants::{REQUEST_NUMBER_MAXIMUM_LENGTH, REQUEST_STRING_MAXIMUM_LENGTH};
use crate::interpreter::engine::{Eval, Interpreter, Interrupt};
use crate::interpreter::errors::ErrorKind;
use crate::interpreter::numbers::format_number;
use crate::memory::value::{from_bool, Address, Value};
use crate::storage::{FileError, FileSlots, Storage};
use crate::symbols::{
    FILE_CREATE, FILE_DELETE, FILE_EXISTS, FILE_IMPORT, FILE_READ, FILE_SET_NAME, FILE_SIZE,
    FILE_WRITE, MENU, PRINT, REQUEST_NUMBER, REQUEST_STRING,
};
use crate::terminal::{Console, MenuChoice};

impl<S: Storage, C: Console> Interpreter<S, C> {
    pub(crate) fn evaluate_io(&mut self, symbol: u8, arguments: &[Value], start: Address) -> Eval<Value> {
        match symbol {
            PRINT => {
                let text = self.display_text(arguments[0], start)?;
                if !self.console.print_text(&text) {
                    return Err(Interrupt::Quit);
                }
                self.console.show_running();
                Ok(Value::Missing)
            }
            REQUEST_STRING => {
                let Some(text) = self.console.prompt_string(REQUEST_STRING_MAXIMUM_LENGTH) else {
                    return Err(Interrupt::Quit);
                };
                self.console.show_running();
                let created = self.memory.create_string(text.as_bytes());
                self.check(created, start).map(Value::String)
            }
            REQUEST_NUMBER => {
                let Some(number) = self.console.prompt_number(REQUEST_NUMBER_MAXIMUM_LENGTH) else {
                    return Err(Interrupt::Quit);
                };
                self.console.show_running();
                Ok(Value::Number(number))
            }
            MENU => self.evaluate_menu(arguments[0], arguments[1], start),
            _ => self.evaluate_file_function(symbol, arguments, start),
        }
    }

    /// Text shown for a printed or menu value: numbers and strings only.
    fn display_text(&mut self, value: Value, start: Address) -> Eval<String> {
        match value {
            Value::Number(number) => Ok(format_number(number)),
            Value::String(_) => {
                let bytes = self.string_argument(value, start)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            _ => Err(self.raise(ErrorKind::BadArgumentType, start)),
        }
    }

    fn evaluate_menu(&mut self, title: Value, options: Value, start: Address) -> Eval<Value> {
        let title = match title {
            Value::String(_) => self.display_text(title, start)?,
            _ => return Err(self.raise(ErrorKind::BadArgumentType, start)),
        };
        let Value::List(cell) = options else {
            return Err(self.raise(ErrorKind::BadArgumentType, start));
        };
        let listed = self.memory.list(cell).map(<[Value]>::to_vec);
        let values = self.check(listed, start)?;
        if values.is_empty() {
            return Err(self.raise(ErrorKind::BadArgumentType, start));
        }
        let mut labels = Vec::with_capacity(values.len());
        for value in values {
            labels.push(self.display_text(value, start)?);
        }

        match self.console.present_menu(&title, &labels) {
            MenuChoice::Selected(index) => {
                self.console.show_running();
                Ok(Value::Number(index as f32))
            }
            MenuChoice::Cancelled | MenuChoice::Failed => Err(Interrupt::Quit),
        }
    }

    fn evaluate_file_function(&mut self, symbol: u8, arguments: &[Value], start: Address) -> Eval<Value> {
        let name = self.string_argument(arguments[0], start)?;
        if symbol == FILE_EXISTS {
            return Ok(from_bool(self.storage.find_file(&name).is_some()));
        }
        if symbol == FILE_CREATE {
            let created = self.storage.create_file(&name).map(|_| Value::Missing);
            return self.check_file(created, start);
        }

        let Some(slot) = self.storage.find_file(&name) else {
            return Err(self.raise(ErrorKind::MissingFile, start));
        };
        let result = match symbol {
            FILE_SIZE => Ok(Value::Number(self.storage.file_size(slot) as f32)),
            FILE_DELETE => self.storage.delete_file(&name).map(|()| Value::Missing),
            FILE_SET_NAME => {
                let new_name = self.string_argument(arguments[1], start)?;
                self.storage
                    .rename_file(&name, &new_name)
                    .map(|()| Value::Missing)
            }
            FILE_READ => {
                let index = self.index_argument(arguments[1], start)?;
                let amount = self.index_argument(arguments[2], start)?;
                let data = self.storage.read_file(slot, index, amount);
                let data = self.check_file(data, start)?;
                let created = self.memory.create_string(&data);
                return self.check(created, start).map(Value::String);
            }
            FILE_WRITE => {
                let data = self.string_argument(arguments[1], start)?;
                self.storage.write_file(slot, &data).map(|()| Value::Missing)
            }
            FILE_IMPORT => {
                log::debug!("import file at slot {}", slot);
                let code = self.storage.file_data_address(slot);
                self.run_code(code)?;
                Ok(Value::Missing)
            }
            _ => return Err(self.raise(ErrorKind::BadStartOfExpression, start)),
        };
        self.check_file(result, start)
    }

    fn check_file<T>(&mut self, result: Result<T, FileError>, start: Address) -> Eval<T> {
        result.map_err(|err| self.raise(err.into(), start))
    }
}
