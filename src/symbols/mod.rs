//! Program symbols
//!
//! A program is a byte string. Bytes below 128 are plain ASCII; each byte from
//! 128 up stands for one reserved operator or built-in function, so the
//! evaluator never has to match keywords while running. [`encode`] turns
//! human-readable text into that form and [`decode`] turns it back.
//!
//! Function symbols are grouped into four families by code range; see
//! [`family`].

mod encode;

pub use encode::{decode, encode, EncodeError};

pub const BOOLEAN_AND: u8 = 128;
pub const BOOLEAN_OR: u8 = 129;
pub const BOOLEAN_XOR: u8 = 130;
pub const SHIFT_LEFT: u8 = 131;
pub const SHIFT_RIGHT: u8 = 132;
pub const INCREMENT: u8 = 133;
pub const DECREMENT: u8 = 134;
pub const EQUAL: u8 = 135;
pub const NOT_EQUAL: u8 = 136;
pub const GREATER_OR_EQUAL: u8 = 137;
pub const LESS_OR_EQUAL: u8 = 138;

pub const ADD_ASSIGN: u8 = 139;
pub const SUBTRACT_ASSIGN: u8 = 140;
pub const MULTIPLY_ASSIGN: u8 = 141;
pub const DIVIDE_ASSIGN: u8 = 142;
pub const MODULUS_ASSIGN: u8 = 143;
pub const BOOLEAN_AND_ASSIGN: u8 = 144;
pub const BOOLEAN_OR_ASSIGN: u8 = 145;
pub const BOOLEAN_XOR_ASSIGN: u8 = 146;
pub const BITWISE_AND_ASSIGN: u8 = 147;
pub const BITWISE_OR_ASSIGN: u8 = 148;
pub const BITWISE_XOR_ASSIGN: u8 = 149;
pub const SHIFT_LEFT_ASSIGN: u8 = 150;
pub const SHIFT_RIGHT_ASSIGN: u8 = 151;

// Control
pub const IF: u8 = 152;
pub const ELSE_IF: u8 = 153;
pub const ELSE: u8 = 154;
pub const END: u8 = 155;
pub const WHILE: u8 = 156;
pub const BREAK: u8 = 157;
pub const CONTINUE: u8 = 158;
pub const FUNCTION: u8 = 159;
pub const RETURN_WITH_VALUE: u8 = 160;
pub const RETURN: u8 = 161;
pub const QUIT: u8 = 162;

// Math
pub const RANDOM: u8 = 163;
pub const RANDOM_INTEGER: u8 = 164;
pub const ABSOLUTE_VALUE: u8 = 165;
pub const ROUND: u8 = 166;
pub const FLOOR: u8 = 167;
pub const CEILING: u8 = 168;
pub const SINE: u8 = 169;
pub const COSINE: u8 = 170;
pub const TANGENT: u8 = 171;
pub const SQUARE_ROOT: u8 = 172;
pub const POWER: u8 = 173;
pub const LOG: u8 = 174;

// Values and sequences
pub const NUMBER: u8 = 175;
pub const STRING: u8 = 176;
pub const TYPE: u8 = 177;
pub const LENGTH: u8 = 178;
pub const COPY: u8 = 179;
pub const INSERT: u8 = 180;
pub const REMOVE: u8 = 181;
pub const SUBSEQUENCE: u8 = 182;
pub const INSERT_SUBSEQUENCE: u8 = 183;
pub const REMOVE_SUBSEQUENCE: u8 = 184;
pub const EQUAL_REFERENCE: u8 = 185;

// Input and output
pub const PRINT: u8 = 186;
pub const REQUEST_STRING: u8 = 187;
pub const REQUEST_NUMBER: u8 = 188;
pub const MENU: u8 = 189;
pub const FILE_EXISTS: u8 = 190;
pub const FILE_SIZE: u8 = 191;
pub const FILE_CREATE: u8 = 192;
pub const FILE_DELETE: u8 = 193;
pub const FILE_SET_NAME: u8 = 194;
pub const FILE_READ: u8 = 195;
pub const FILE_WRITE: u8 = 196;
pub const FILE_IMPORT: u8 = 197;

pub const FIRST_SYMBOL: u8 = BOOLEAN_AND;
pub const LAST_SYMBOL: u8 = FILE_IMPORT;

/// Source spelling of every symbol, indexed by `code - 128`
#[rustfmt::skip]
pub const SYMBOL_TEXTS: [&str; 70] = [
    "&&", "||", "^^", "<<", ">>", "++", "--", "==", "!=", ">=", "<=",
    "+=", "-=", "*=", "/=", "%=", "&&=", "||=", "^^=", "&=", "|=", "^=", "<<=", ">>=",
    "if:", "elif:", "else;", "end;", "while:", "break;", "cont;", "func:", "ret:", "ret;", "quit;",
    "rand;", "randInt:", "abs:", "round:", "floor:", "ceil:", "sin:", "cos:", "tan:", "sqrt:", "pow:", "log:",
    "num:", "str:", "type:", "len:", "copy:", "ins:", "rem:", "sub:", "insSub:", "remSub:", "equRef:",
    "print:", "reqStr;", "reqNum;", "menu:", "fExists:", "fSize:", "fCreate:", "fDelete:", "fSetName:",
    "fRead:", "fWrite:", "fImport:",
];

/// Fixed argument counts of the function symbols, indexed by `code - IF`.
/// `None` marks `func:`, whose count comes from its header line.
#[rustfmt::skip]
const ARGUMENT_COUNTS: [Option<u8>; 46] = [
    // if elif else end while break cont func ret: ret; quit
    Some(1), Some(1), Some(0), Some(0), Some(1), Some(0), Some(0), None, Some(1), Some(0), Some(0),
    // rand randInt abs round floor ceil sin cos tan sqrt pow log
    Some(0), Some(2), Some(1), Some(1), Some(1), Some(1), Some(1), Some(1), Some(1), Some(1), Some(2), Some(2),
    // num str type len copy ins rem sub insSub remSub equRef
    Some(1), Some(1), Some(1), Some(1), Some(1), Some(3), Some(2), Some(3), Some(3), Some(3), Some(2),
    // print reqStr reqNum menu fExists fSize fCreate fDelete fSetName fRead fWrite fImport
    Some(1), Some(0), Some(0), Some(2), Some(1), Some(1), Some(1), Some(1), Some(2), Some(3), Some(2), Some(1),
];

/// Built-in function families, by code range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Block structure and returns; only legal as a whole statement
    Control,
    Math,
    Value,
    InputOutput,
}

pub fn text(symbol: u8) -> Option<&'static str> {
    SYMBOL_TEXTS.get(symbol.checked_sub(FIRST_SYMBOL)? as usize).copied()
}

pub fn is_function(symbol: u8) -> bool {
    (IF..=FILE_IMPORT).contains(&symbol)
}

pub fn family(symbol: u8) -> Option<Family> {
    match symbol {
        IF..=QUIT => Some(Family::Control),
        RANDOM..=LOG => Some(Family::Math),
        NUMBER..=EQUAL_REFERENCE => Some(Family::Value),
        PRINT..=FILE_IMPORT => Some(Family::InputOutput),
        _ => None,
    }
}

/// Fixed argument count of a function symbol. `None` for `func:` and for
/// symbols that are not functions.
pub fn argument_count(symbol: u8) -> Option<u8> {
    if !is_function(symbol) {
        return None;
    }
    ARGUMENT_COUNTS[(symbol - IF) as usize]
}

pub fn is_unary(symbol: u8) -> bool {
    matches!(symbol, b'-' | b'!' | b'~' | INCREMENT | DECREMENT)
}

pub fn is_compound_assignment(symbol: u8) -> bool {
    (ADD_ASSIGN..=SHIFT_RIGHT_ASSIGN).contains(&symbol)
}

/// Binding strength of a binary operator; lower binds tighter.
pub fn binary_precedence(symbol: u8) -> Option<u8> {
    let precedence = match symbol {
        b'*' | b'/' | b'%' => 1,
        b'+' | b'-' => 2,
        SHIFT_LEFT | SHIFT_RIGHT => 3,
        b'>' | b'<' | GREATER_OR_EQUAL | LESS_OR_EQUAL => 4,
        EQUAL | NOT_EQUAL => 5,
        b'&' => 6,
        b'^' => 7,
        b'|' => 8,
        BOOLEAN_AND => 9,
        BOOLEAN_XOR => 10,
        BOOLEAN_OR => 11,
        b'=' => 12,
        _ if is_compound_assignment(symbol) => 12,
        _ => return None,
    };
    Some(precedence)
}

pub fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte == b'_'
}

pub fn is_identifier_part(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte.is_ascii_digit() || byte == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_texts_line_up_with_codes() {
        assert_eq!(text(BOOLEAN_AND), Some("&&"));
        assert_eq!(text(SHIFT_RIGHT_ASSIGN), Some(">>="));
        assert_eq!(text(IF), Some("if:"));
        assert_eq!(text(QUIT), Some("quit;"));
        assert_eq!(text(LOG), Some("log:"));
        assert_eq!(text(EQUAL_REFERENCE), Some("equRef:"));
        assert_eq!(text(FILE_IMPORT), Some("fImport:"));
        assert_eq!(text(b'a'), None);
    }

    #[test]
    fn test_families_and_counts() {
        assert_eq!(family(ELSE), Some(Family::Control));
        assert_eq!(family(RANDOM), Some(Family::Math));
        assert_eq!(family(COPY), Some(Family::Value));
        assert_eq!(family(MENU), Some(Family::InputOutput));
        assert_eq!(argument_count(FUNCTION), None);
        assert_eq!(argument_count(INSERT), Some(3));
        assert_eq!(argument_count(FILE_READ), Some(3));
        assert_eq!(argument_count(REQUEST_NUMBER), Some(0));
    }

    #[test]
    fn test_precedence_order() {
        let mul = binary_precedence(b'*').unwrap();
        let add = binary_precedence(b'+').unwrap();
        let and = binary_precedence(BOOLEAN_AND).unwrap();
        let assign = binary_precedence(ADD_ASSIGN).unwrap();
        assert!(mul < add && add < and && and < assign);
        assert_eq!(binary_precedence(b'('), None);
    }
}
