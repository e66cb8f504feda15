// Language limits

/// Longest number literal, in characters, before it is rejected
pub const NUMBER_LITERAL_MAXIMUM_LENGTH: usize = 20;

/// Longest variable name, in characters
pub const VARIABLE_NAME_MAXIMUM_LENGTH: usize = 15;

pub const REQUEST_STRING_MAXIMUM_LENGTH: usize = 100;
pub const REQUEST_NUMBER_MAXIMUM_LENGTH: usize = 20;

/// Precedence ceiling of a whole statement or argument; every operator binds
pub const STATEMENT_PRECEDENCE: u8 = 99;

/// Precedence ceiling of a unary operand; only postfix operators bind
pub const UNARY_PRECEDENCE: u8 = 0;

/// Largest value the random source yields (a 15-bit generator)
pub const RANDOM_MAXIMUM: u32 = 0x7FFF;
