//! Block structure and returns
//!
//! Blocks are not parsed ahead of time. `if:` and `while:` push a branch
//! record whose action tells the evaluator whether the following lines run,
//! and `end;` pops it again. Loops jump by setting the expression's next
//! address back to the `while:` line, which is then evaluated afresh.

use crate::interpreter::engine::{Eval, Interpreter, Interrupt};
use crate::interpreter::errors::ErrorKind;
use crate::interpreter::ops::{Destination, Expression};
use crate::memory::stack::BranchAction;
use crate::memory::value::Value;
use crate::storage::Storage;
use crate::symbols::{
    BREAK, CONTINUE, ELSE, ELSE_IF, END, FUNCTION, IF, QUIT, RETURN, RETURN_WITH_VALUE, WHILE,
};
use crate::terminal::Console;

impl<S: Storage, C: Console> Interpreter<S, C> {
    pub(crate) fn evaluate_control(
        &mut self,
        expression: &mut Expression,
        symbol: u8,
        arguments: &[Expression],
    ) -> Eval<()> {
        let start = expression.start;
        let argument = arguments.first().map_or(Value::Missing, |argument| argument.value);
        match symbol {
            RETURN => return Err(Interrupt::Return(Value::Missing)),
            RETURN_WITH_VALUE => return Err(Interrupt::Return(argument)),
            QUIT => return Err(Interrupt::Quit),
            IF | WHILE => {
                let Value::Number(condition) = argument else {
                    return Err(self.raise(ErrorKind::BadArgumentType, start));
                };
                let (action, address) = match (symbol, condition != 0.0) {
                    (IF, true) => (BranchAction::Run, 0),
                    (IF, false) => (BranchAction::IgnoreSoft, 0),
                    (_, true) => (BranchAction::Loop, start),
                    (_, false) => (BranchAction::IgnoreHard, 0),
                };
                let pushed = self.memory.push_branch(action, address);
                self.check(pushed, start)?;
            }
            // Reached only from a block that ran, so every later arm is skipped
            ELSE_IF | ELSE => self.memory.set_branch_action(BranchAction::IgnoreHard),
            BREAK => {
                if !self.memory.break_loop() {
                    return Err(self.raise(ErrorKind::BadBreakStatement, start));
                }
            }
            CONTINUE => match self.memory.continue_loop() {
                Some(address) => expression.code = address,
                None => return Err(self.raise(ErrorKind::BadContinueStatement, start)),
            },
            END => self.evaluate_end(expression)?,
            FUNCTION => self.define_function(expression, arguments)?,
            _ => return Err(self.raise(ErrorKind::BadStartOfExpression, start)),
        }
        Ok(())
    }

    fn evaluate_end(&mut self, expression: &mut Expression) -> Eval<()> {
        let top = self.memory.stack().top_branch().copied();
        if !self.memory.pop_branch() {
            // The bottom branch of a function body: leave the function
            if !self.memory.stack().is_global() {
                return Err(Interrupt::Return(Value::Missing));
            }
            return Err(self.raise(ErrorKind::BadEndStatement, expression.start));
        }
        if let Some(branch) = top {
            if branch.action == BranchAction::Loop {
                expression.code = branch.address;
            }
        }
        Ok(())
    }

    /// `func:NAME,PARAM,...` binds NAME to this header and skips the body.
    fn define_function(&mut self, expression: &mut Expression, arguments: &[Expression]) -> Eval<()> {
        let start = expression.start;
        let name_address = arguments.first().map_or(start + 1, |argument| argument.start);
        let (name, _) = self.read_variable_name(name_address)?;
        let reference = match self.memory.find_variable(&name) {
            Some(reference) => reference,
            None => {
                let created = self.memory.create_variable(&name, Value::Missing);
                self.check(created, start)?
            }
        };
        self.write_destination(
            Destination::Variable(reference),
            Value::Function(start),
            start,
        )?;
        let pushed = self.memory.push_branch(BranchAction::IgnoreHard, 0);
        self.check(pushed, start)
    }
}
