//! Runtime error types
//!
//! Every failure a program can hit is an [`ErrorKind`]. Raising one records a
//! [`RuntimeError`] (the kind plus the program address that caused it) in the
//! interpreter's pending-error slot and stops the program; the language has no
//! way to catch errors.
//!
//! Messages are laid out for the 16-column display, so they contain line breaks.

use crate::memory::value::Address;
use crate::memory::MemoryError;
use crate::storage::FileError;
use std::fmt;

/// Broad grouping of error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Semantic,
    Resource,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No literal, operator or function can start here
    BadStartOfExpression,
    /// `end;` with no open block in the global scope
    BadEndStatement,
    /// `cont;` outside any loop
    BadContinueStatement,
    /// `break;` outside any loop
    BadBreakStatement,
    BadArgumentType,
    MissingApostrophe,
    MissingQuotationMark,
    MissingBracket,
    MissingParenthesis,
    MissingComma,
    /// The scope and heap partitions would overlap
    StackHeapCollision,
    BadIndex,
    MissingFile,
    NameTooLong,
    StorageFull,
    BadAmount,
    FileExists,
    /// Assignment target is not a variable, list element or string character
    BadDestination,
    BadOperandType,
    DivideByZero,
    /// Argument outside the function's domain, e.g. `sqrt:` of a negative
    BadValue,
    /// Control function used inside an expression
    NotTopLevel,
    MissingValue,
    NumberLiteralTooLong,
    VariableNameTooLong,
    /// Evaluation depth limit reached
    ExpressionTooComplex,
}

impl ErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::BadStartOfExpression => "ERROR: Bad\nstart of\nexpression.",
            ErrorKind::BadEndStatement => "ERROR: Bad\nend statement.",
            ErrorKind::BadContinueStatement => "ERROR: Bad\ncontinue\nstatement.",
            ErrorKind::BadBreakStatement => "ERROR: Bad\nbreak statement.",
            ErrorKind::BadArgumentType => "ERROR: Bad\nargument type.",
            ErrorKind::MissingApostrophe => "ERROR: Missing\napostrophe.",
            ErrorKind::MissingQuotationMark => "ERROR: Missing\nquotation mark.",
            ErrorKind::MissingBracket => "ERROR: Missing\nbracket.",
            ErrorKind::MissingParenthesis => "ERROR: Missing\nparenthesis.",
            ErrorKind::MissingComma => "ERROR: Missing\ncomma.",
            ErrorKind::StackHeapCollision => "ERROR: Stack-\nheap collision.",
            ErrorKind::BadIndex => "ERROR: Bad\nindex.",
            ErrorKind::MissingFile => "ERROR: Missing\nfile.",
            ErrorKind::NameTooLong => "ERROR: Name is\ntoo long.",
            ErrorKind::StorageFull => "ERROR: Storage\nis full.",
            ErrorKind::BadAmount => "ERROR: Bad\namount.",
            ErrorKind::FileExists => "ERROR: File\nexists.",
            ErrorKind::BadDestination => "ERROR: Bad\ndestination.",
            ErrorKind::BadOperandType => "ERROR: Bad\noperand type.",
            ErrorKind::DivideByZero => "ERROR: Divide\nby zero.",
            ErrorKind::BadValue => "ERROR: Bad\nvalue.",
            ErrorKind::NotTopLevel => "ERROR: Not\ntop level.",
            ErrorKind::MissingValue => "ERROR: Missing\nvalue.",
            ErrorKind::NumberLiteralTooLong => "ERROR: Number\nliteral too\nlong.",
            ErrorKind::VariableNameTooLong => "ERROR: Variable\nname too long.",
            ErrorKind::ExpressionTooComplex => "ERROR:\nExpression too\ncomplex.",
        }
    }

    pub fn category(self) -> ErrorCategory {
        match self {
            ErrorKind::BadStartOfExpression
            | ErrorKind::BadEndStatement
            | ErrorKind::BadContinueStatement
            | ErrorKind::BadBreakStatement
            | ErrorKind::MissingApostrophe
            | ErrorKind::MissingQuotationMark
            | ErrorKind::MissingBracket
            | ErrorKind::MissingParenthesis
            | ErrorKind::MissingComma
            | ErrorKind::NotTopLevel
            | ErrorKind::NumberLiteralTooLong
            | ErrorKind::VariableNameTooLong => ErrorCategory::Syntax,
            ErrorKind::BadArgumentType
            | ErrorKind::BadIndex
            | ErrorKind::BadAmount
            | ErrorKind::BadDestination
            | ErrorKind::BadOperandType
            | ErrorKind::DivideByZero
            | ErrorKind::BadValue
            | ErrorKind::MissingValue => ErrorCategory::Semantic,
            ErrorKind::StackHeapCollision
            | ErrorKind::StorageFull
            | ErrorKind::NameTooLong
            | ErrorKind::ExpressionTooComplex => ErrorCategory::Resource,
            ErrorKind::MissingFile | ErrorKind::FileExists => ErrorCategory::File,
        }
    }
}

impl From<MemoryError> for ErrorKind {
    fn from(err: MemoryError) -> Self {
        match err {
            MemoryError::Collision => ErrorKind::StackHeapCollision,
            MemoryError::BadIndex => ErrorKind::BadIndex,
            MemoryError::BadType => ErrorKind::BadArgumentType,
            MemoryError::Dangling => ErrorKind::BadValue,
        }
    }
}

impl From<FileError> for ErrorKind {
    fn from(err: FileError) -> Self {
        match err {
            FileError::MissingFile => ErrorKind::MissingFile,
            FileError::NameTooLong => ErrorKind::NameTooLong,
            FileError::FileExists => ErrorKind::FileExists,
            FileError::StorageFull => ErrorKind::StorageFull,
            FileError::BadIndex => ErrorKind::BadIndex,
            FileError::BadAmount => ErrorKind::BadAmount,
        }
    }
}

/// An error raised while running a program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    /// Program byte where the failing expression starts
    pub address: Address,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, address: Address) -> Self {
        RuntimeError { kind, address }
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (address {})",
            self.kind.message().replace('\n', " "),
            self.address
        )
    }
}

impl std::error::Error for RuntimeError {}
