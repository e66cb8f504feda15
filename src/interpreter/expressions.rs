//! Single-pass expression evaluation
//!
//! Expressions are evaluated straight off the program bytes with precedence
//! climbing: [`Interpreter::evaluate_expression`] reads one primary (literal,
//! parenthesis, function or unary operator), then keeps consuming postfix
//! operators and any binary operator that binds tighter than its ceiling.
//!
//! When the innermost block is being skipped, the expression is not evaluated
//! at all; only the block structure of the line is tracked.

use crate::interpreter::constants::{
    NUMBER_LITERAL_MAXIMUM_LENGTH, STATEMENT_PRECEDENCE, VARIABLE_NAME_MAXIMUM_LENGTH,
};
use crate::interpreter::engine::{Eval, Interpreter};
use crate::interpreter::errors::ErrorKind;
use crate::interpreter::numbers::parse_number;
use crate::interpreter::ops::{Destination, Expression};
use crate::memory::stack::BranchAction;
use crate::memory::value::{to_int, Address, Value};
use crate::storage::Storage;
use crate::symbols::{
    self, binary_precedence, is_identifier_part, is_identifier_start, DECREMENT, ELSE, ELSE_IF,
    END, FUNCTION, IF, INCREMENT, WHILE,
};
use crate::terminal::Console;

impl<S: Storage, C: Console> Interpreter<S, C> {
    /// Evaluate the expression starting at `start`, consuming only binary
    /// operators whose precedence is below `ceiling`.
    ///
    /// `top_level` is set for whole statements; control functions are only
    /// legal there. Roots registered while evaluating are released on return.
    pub(crate) fn evaluate_expression(
        &mut self,
        start: Address,
        ceiling: u8,
        top_level: bool,
    ) -> Eval<Expression> {
        self.enter(start)?;
        let mark = self.memory.roots().mark();
        let result = self.evaluate_in_frame(start, ceiling, top_level);
        self.memory.roots_mut().release(mark);
        self.leave();
        result
    }

    fn evaluate_in_frame(&mut self, start: Address, ceiling: u8, top_level: bool) -> Eval<Expression> {
        let mut expression = Expression::new(start);
        if self.memory.branch_action().is_ignored() {
            self.skip_ignored(&mut expression)?;
            return Ok(expression);
        }

        let symbol = self.read_symbol(start);
        if !self.evaluate_literal(&mut expression, symbol)? {
            match symbol {
                b'(' => self.evaluate_parenthesis(&mut expression)?,
                _ if symbols::is_function(symbol) => {
                    self.evaluate_function(&mut expression, symbol, top_level)?
                }
                _ if symbols::is_unary(symbol) => self.evaluate_unary_op(&mut expression, symbol)?,
                _ => return Err(self.raise(ErrorKind::BadStartOfExpression, start)),
            }
        }

        loop {
            self.memory.roots_mut().track(expression.value);
            let symbol = self.read_symbol(expression.code);
            if self.evaluate_postfix(&mut expression, symbol)? {
                continue;
            }
            match binary_precedence(symbol) {
                Some(precedence) if precedence < ceiling => {
                    self.evaluate_binary_op(&mut expression, symbol, precedence)?;
                }
                _ => break,
            }
        }
        Ok(expression)
    }

    /// Track block structure on a skipped line, then move to its end.
    fn skip_ignored(&mut self, expression: &mut Expression) -> Eval<()> {
        let start = expression.start;
        let action = self.memory.branch_action();
        match self.read_symbol(start) {
            IF | WHILE | FUNCTION => {
                let pushed = self.memory.push_branch(BranchAction::IgnoreHard, 0);
                self.check(pushed, start)?;
            }
            ELSE_IF if action == BranchAction::IgnoreSoft => {
                self.memory.set_branch_action(BranchAction::Run);
                let condition = self.evaluate_expression(start + 1, STATEMENT_PRECEDENCE, false);
                self.memory.set_branch_action(BranchAction::IgnoreSoft);
                let condition = condition?;
                expression.code = condition.code;
                match condition.value {
                    Value::Missing => return Err(self.raise(ErrorKind::MissingValue, start)),
                    Value::Number(number) => {
                        if number != 0.0 {
                            self.memory.set_branch_action(BranchAction::Run);
                        }
                    }
                    _ => return Err(self.raise(ErrorKind::BadArgumentType, start)),
                }
            }
            ELSE if action == BranchAction::IgnoreSoft => {
                self.memory.set_branch_action(BranchAction::Run);
            }
            END => {
                if !self.memory.pop_branch() {
                    return Err(self.raise(ErrorKind::BadEndStatement, start));
                }
            }
            _ => {}
        }
        expression.code = self.skip_line(expression.code);
        Ok(())
    }

    /// Address of the `\n` or terminator ending the line at `address`.
    pub(crate) fn skip_line(&self, mut address: Address) -> Address {
        while !matches!(self.read_symbol(address), b'\n' | 0) {
            address += 1;
        }
        address
    }

    /// Read a variable name at `address`, returning it and the address after it.
    pub(crate) fn read_variable_name(&mut self, address: Address) -> Eval<(String, Address)> {
        let mut name = String::new();
        let mut code = address;
        loop {
            if name.len() >= VARIABLE_NAME_MAXIMUM_LENGTH {
                return Err(self.raise(ErrorKind::VariableNameTooLong, address));
            }
            let symbol = self.read_symbol(code);
            let accepted = if name.is_empty() {
                is_identifier_start(symbol)
            } else {
                is_identifier_part(symbol)
            };
            if !accepted {
                break;
            }
            name.push(symbol as char);
            code += 1;
        }
        if name.is_empty() {
            return Err(self.raise(ErrorKind::BadDestination, address));
        }
        Ok((name, code))
    }

    /// Numbers, names, characters, strings and lists. Returns false when
    /// `symbol` starts none of them.
    fn evaluate_literal(&mut self, expression: &mut Expression, symbol: u8) -> Eval<bool> {
        match symbol {
            b'0'..=b'9' | b'.' => self.evaluate_number_literal(expression)?,
            _ if is_identifier_start(symbol) => {
                let (name, code) = self.read_variable_name(expression.start)?;
                expression.code = code;
                if let Some(reference) = self.memory.find_variable(&name) {
                    expression.destination = Some(Destination::Variable(reference));
                    expression.value = self.memory.variable_value(reference).unwrap_or_default();
                }
            }
            b'\'' => self.evaluate_character_literal(expression)?,
            b'"' => self.evaluate_string_literal(expression)?,
            b'[' => self.evaluate_list_literal(expression)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn evaluate_number_literal(&mut self, expression: &mut Expression) -> Eval<()> {
        let start = expression.start;
        let mut text = vec![self.read_symbol(start)];
        let mut code = start + 1;
        let mut last = 0u8;
        loop {
            if text.len() >= NUMBER_LITERAL_MAXIMUM_LENGTH {
                return Err(self.raise(ErrorKind::NumberLiteralTooLong, start));
            }
            let symbol = self.read_symbol(code);
            let continues = symbol.is_ascii_digit()
                || symbol == b'.'
                || symbol == b'e'
                || (symbol == b'-' && last == b'e');
            if !continues {
                break;
            }
            text.push(symbol);
            last = symbol;
            code += 1;
        }
        expression.code = code;
        expression.value = Value::Number(parse_number(&text));
        Ok(())
    }

    fn evaluate_character_literal(&mut self, expression: &mut Expression) -> Eval<()> {
        let start = expression.start;
        let mut code = start + 1;
        let mut character = self.read_symbol(code);
        code += 1;
        if character == b'\\' {
            character = unescape(self.read_symbol(code));
            code += 1;
        }
        if self.read_symbol(code) != b'\'' {
            return Err(self.raise(ErrorKind::MissingApostrophe, start));
        }
        expression.code = code + 1;
        expression.value = Value::Number(character as f32);
        Ok(())
    }

    fn evaluate_string_literal(&mut self, expression: &mut Expression) -> Eval<()> {
        let start = expression.start;
        let mut code = start + 1;
        let mut bytes = Vec::new();
        let mut escaped = false;
        loop {
            let symbol = self.read_symbol(code);
            code += 1;
            match symbol {
                0 => return Err(self.raise(ErrorKind::MissingQuotationMark, start)),
                _ if escaped => {
                    bytes.push(unescape(symbol));
                    escaped = false;
                }
                b'\\' => escaped = true,
                b'"' => break,
                _ => bytes.push(symbol),
            }
        }
        let created = self.memory.create_string(&bytes);
        let cell = self.check(created, start)?;
        expression.code = code;
        expression.value = Value::String(cell);
        Ok(())
    }

    fn evaluate_list_literal(&mut self, expression: &mut Expression) -> Eval<()> {
        let start = expression.start;
        let created = self.memory.create_list(Vec::new());
        let list = Value::List(self.check(created, start)?);
        self.memory.roots_mut().track(list);
        expression.value = list;

        let mut code = start + 1;
        let mut index = 0;
        loop {
            match self.read_symbol(code) {
                b'\n' | 0 => return Err(self.raise(ErrorKind::MissingBracket, start)),
                b']' => {
                    code += 1;
                    break;
                }
                b',' => code += 1,
                _ => {}
            }
            let element = self.evaluate_expression(code, STATEMENT_PRECEDENCE, false)?;
            if element.value.is_missing() {
                return Err(self.raise(ErrorKind::MissingValue, start));
            }
            code = element.code;
            let inserted = self.memory.insert_element(list, index, element.value);
            self.check(inserted, start)?;
            index += 1;
        }
        expression.code = code;
        Ok(())
    }

    fn evaluate_parenthesis(&mut self, expression: &mut Expression) -> Eval<()> {
        let start = expression.start;
        let inner = self.evaluate_expression(start + 1, STATEMENT_PRECEDENCE, false)?;
        expression.value = inner.value;
        expression.destination = inner.destination;
        if self.read_symbol(inner.code) != b')' {
            return Err(self.raise(ErrorKind::MissingParenthesis, start));
        }
        expression.code = inner.code + 1;
        Ok(())
    }

    /// `++ -- [ : ;` after a value. Returns false when `symbol` is none of them.
    fn evaluate_postfix(&mut self, expression: &mut Expression, symbol: u8) -> Eval<bool> {
        match symbol {
            INCREMENT | DECREMENT => self.evaluate_postfix_step(expression, symbol)?,
            b'[' => self.evaluate_index(expression)?,
            b':' | b';' => self.evaluate_user_call(expression)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn evaluate_index(&mut self, expression: &mut Expression) -> Eval<()> {
        let start = expression.start;
        let base = expression.value;
        if base.is_missing() {
            return Err(self.raise(ErrorKind::MissingValue, start));
        }
        let index = self.evaluate_expression(expression.code + 1, STATEMENT_PRECEDENCE, false)?;
        if index.value.is_missing() {
            return Err(self.raise(ErrorKind::MissingValue, start));
        }
        if self.read_symbol(index.code) != b']' {
            return Err(self.raise(ErrorKind::MissingBracket, start));
        }
        expression.code = index.code + 1;
        let Value::Number(number) = index.value else {
            return Err(self.raise(ErrorKind::BadOperandType, start));
        };
        let index = to_int(number);

        let len = match base {
            Value::String(_) | Value::List(_) => {
                let len = self.memory.sequence_len(base);
                self.check(len, start)?
            }
            _ => return Err(self.raise(ErrorKind::BadOperandType, start)),
        };
        if index < 0 || index as usize >= len {
            return Err(self.raise(ErrorKind::BadIndex, start));
        }
        let index = index as usize;
        let destination = match base {
            Value::List(list) => Destination::Element { list, index },
            Value::String(string) => Destination::Character { string, index },
            _ => return Err(self.raise(ErrorKind::BadOperandType, start)),
        };
        // The element may be the only path to its container
        self.memory.roots_mut().track(base);
        expression.value = self.read_destination(destination, start)?;
        expression.destination = Some(destination);
        Ok(())
    }
}

/// Character after a backslash in a literal; `\N` is a newline.
fn unescape(symbol: u8) -> u8 {
    if symbol == b'N' {
        b'\n'
    } else {
        symbol
    }
}
