use crate::interpreter::constants::RANDOM_MAXIMUM;
use crate::interpreter::engine::{Eval, Interpreter};
use crate::interpreter::errors::ErrorKind;
use crate::memory::value::{to_int, Address, Value};
use crate::storage::Storage;
use crate::symbols::{
    ABSOLUTE_VALUE, CEILING, COSINE, FLOOR, LOG, POWER, RANDOM, RANDOM_INTEGER, ROUND, SINE,
    SQUARE_ROOT, TANGENT,
};
use crate::terminal::Console;
use rand::Rng;

impl<S: Storage, C: Console> Interpreter<S, C> {
    /// Raw random draw in `0..=RANDOM_MAXIMUM`, the range of the device's `rand()`.
    fn draw(&mut self) -> i32 {
        self.rng.gen_range(0..=RANDOM_MAXIMUM) as i32
    }

    pub(crate) fn evaluate_math(&mut self, symbol: u8, arguments: &[Value], start: Address) -> Eval<Value> {
        if symbol == RANDOM {
            let draw = self.draw();
            return Ok(Value::Number((draw % 10000) as f32 / 10000.0));
        }

        let x = self.number_argument(arguments[0], start)?;
        let number = match symbol {
            RANDOM_INTEGER => {
                let maximum = self.number_argument(arguments[1], start)?;
                let (minimum, maximum) = (to_int(x), to_int(maximum));
                let span = maximum.wrapping_sub(minimum).wrapping_add(1);
                if span <= 0 {
                    return Err(self.raise(ErrorKind::BadValue, start));
                }
                let draw = self.draw();
                (minimum + draw % span) as f32
            }
            ABSOLUTE_VALUE => x.abs(),
            ROUND => (x + 0.5).floor(),
            FLOOR => x.floor(),
            CEILING => x.ceil(),
            SINE => x.sin(),
            COSINE => x.cos(),
            TANGENT => x.tan(),
            SQUARE_ROOT => {
                if x < 0.0 {
                    return Err(self.raise(ErrorKind::BadValue, start));
                }
                x.sqrt()
            }
            POWER => {
                let exponent = self.number_argument(arguments[1], start)?;
                if x < 0.0 && exponent.floor() != exponent {
                    return Err(self.raise(ErrorKind::BadValue, start));
                }
                x.powf(exponent)
            }
            LOG => {
                let base = self.number_argument(arguments[1], start)?;
                if x <= 0.0 || base <= 0.0 {
                    return Err(self.raise(ErrorKind::BadValue, start));
                }
                x.ln() / base.ln()
            }
            _ => return Err(self.raise(ErrorKind::BadStartOfExpression, start)),
        };
        Ok(Value::Number(number))
    }
}
