//! # Introduction
//!
//! ChipOS runs small scripts inside a fixed memory region of a few kilobytes.
//! Programs are stored as symbol bytes in a slot-based file store and are
//! interpreted straight from there, one line at a time, with all user
//! interaction going through a 16×2 character display.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Encoder → Symbol bytes → File store → Interpreter → Console
//! ```
//!
//! 1. [`symbols`]: the one-byte symbol table and the text encoder/decoder.
//! 2. [`storage`]: the byte store and its file slots, which also hold
//!    programs.
//! 3. [`memory`]: the tagged [`memory::value::Value`] model, the shared
//!    scope/heap region and the mark-and-sweep collector.
//! 4. [`interpreter`]: single-pass evaluation of symbol bytes, block
//!    structure, user functions and built-ins.
//! 5. [`terminal`]: the [`terminal::Console`] trait with a scripted mock and
//!    a line-oriented console.
//! 6. [`ui`]: ratatui-based display emulator; not part of the stable library API.
//! 7. [`config`]: region size, nesting limit, collection thresholds and seed.
//!
//! ## Language
//!
//! Values: numbers, strings, lists, functions.
//! Control flow: `if/elif/else`, `while`, `break`, `cont`, `ret`, `quit`.
//! Built-ins: display and prompts, string/list editing, math, random numbers
//! and file access.

pub mod config;
pub mod interpreter;
pub mod memory;
pub mod storage;
pub mod symbols;
pub mod terminal;
pub mod ui;
