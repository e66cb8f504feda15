//! User-defined function calls
//!
//! A function value is the address of its `func:` header. Calling it counts
//! the header's parameters, evaluates that many arguments, opens a fresh scope
//! with the parameters bound and runs the body until `ret`, `ret:` or the
//! closing `end;`.

use crate::interpreter::constants::{STATEMENT_PRECEDENCE, VARIABLE_NAME_MAXIMUM_LENGTH};
use crate::interpreter::engine::{Eval, Interpreter};
use crate::interpreter::errors::ErrorKind;
use crate::interpreter::ops::Expression;
use crate::memory::stack::BranchAction;
use crate::memory::value::{Address, Value};
use crate::storage::Storage;
use crate::terminal::Console;

impl<S: Storage, C: Console> Interpreter<S, C> {
    /// Number of parameters declared by the header at `header`: the commas on
    /// the header line.
    pub(crate) fn count_parameters(&self, header: Address) -> usize {
        let mut count = 0;
        let mut code = header + 1;
        loop {
            match self.read_symbol(code) {
                b'\n' | 0 => return count,
                b',' => count += 1,
                _ => {}
            }
            code += 1;
        }
    }

    /// Postfix `:` or `;` after a function value.
    pub(crate) fn evaluate_user_call(&mut self, expression: &mut Expression) -> Eval<()> {
        let start = expression.start;
        expression.code += 1;
        let header = match expression.value {
            Value::Missing => return Err(self.raise(ErrorKind::MissingValue, start)),
            Value::Function(header) => header,
            _ => return Err(self.raise(ErrorKind::BadOperandType, start)),
        };

        let count = self.count_parameters(header);
        let mark = self.memory.roots().mark();
        let array = self.memory.roots_mut().track_values();
        let mut arguments = Vec::with_capacity(count);
        for _ in 0..count {
            let argument = self.evaluate_expression(expression.code, STATEMENT_PRECEDENCE, false)?;
            if argument.value.is_missing() {
                return Err(self.raise(ErrorKind::MissingValue, start));
            }
            self.memory.roots_mut().track_in(array, argument.value);
            arguments.push(argument.value);
            expression.code = argument.code;
            if self.read_symbol(expression.code) == b',' {
                expression.code += 1;
            }
        }

        self.enter(start)?;
        let result = self.call_function(header, &arguments, start);
        self.leave();
        // Arguments and the callee scope are dead once the call returns
        self.memory.roots_mut().release(mark);
        expression.value = result?;
        self.memory.roots_mut().track(expression.value);
        Ok(())
    }

    fn call_function(&mut self, header: Address, arguments: &[Value], start: Address) -> Eval<Value> {
        let pushed = self.memory.push_scope();
        let scope = self.check(pushed, start)?;
        log::trace!("call function at {} in scope {}", header, scope);
        let result = self.run_function_body(scope, header, arguments, start);
        self.memory.pop_scope();
        result
    }

    fn run_function_body(
        &mut self,
        scope: usize,
        header: Address,
        arguments: &[Value],
        start: Address,
    ) -> Eval<Value> {
        let pushed = self.memory.push_branch(BranchAction::Run, 0);
        self.check(pushed, start)?;
        self.memory.roots_mut().track_scope(scope);

        // The first header name is the function's own; the rest are parameters
        let mut code = header + 1;
        for index in 0..=arguments.len() {
            let mut name = String::new();
            loop {
                match self.read_symbol(code) {
                    b',' => {
                        code += 1;
                        break;
                    }
                    b'\n' | 0 => break,
                    symbol => name.push(symbol as char),
                }
                code += 1;
            }
            if index == 0 {
                continue;
            }
            if name.len() >= VARIABLE_NAME_MAXIMUM_LENGTH {
                return Err(self.raise(ErrorKind::VariableNameTooLong, start));
            }
            let created = self.memory.create_variable(&name, arguments[index - 1]);
            self.check(created, start)?;
        }
        self.run_code(code)
    }
}
