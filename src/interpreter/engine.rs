// Execution engine for ChipOS programs

use crate::config::RuntimeConfig;
use crate::interpreter::constants::STATEMENT_PRECEDENCE;
use crate::interpreter::errors::{ErrorKind, RuntimeError};
use crate::memory::stack::BranchAction;
use crate::memory::value::{Address, Value};
use crate::memory::{Memory, MemoryError};
use crate::storage::{FileError, FileSlots, Storage};
use crate::terminal::Console;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Why evaluation stopped early
///
/// A raised error is not carried here; it sits in the interpreter's
/// pending-error slot and the evaluation unwinds with [`Interrupt::Quit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Interrupt {
    /// Stop the whole program (`quit;`, escape, cancelled prompt or an error)
    Quit,
    /// Leave the innermost running function with a value
    Return(Value),
}

pub(crate) type Eval<T> = Result<T, Interrupt>;

/// How a program run ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Ran off the end of the program or returned from the top level
    Finished,
    /// Stopped by `quit;`, escape or a cancelled prompt
    Quit,
    /// Stopped by a runtime error, already reported on the console
    Failed(RuntimeError),
}

/// The interpreter: one memory region, one store and one console
pub struct Interpreter<S: Storage, C: Console> {
    /// Program and file store
    pub(crate) storage: S,

    /// Display and keyboard
    pub(crate) console: C,

    /// Scope and heap partitions
    pub(crate) memory: Memory,

    pub(crate) config: RuntimeConfig,

    /// Source for `rand;` and `randInt:`
    pub(crate) rng: StdRng,

    /// Statements run since the last collection
    statements_since_collection: usize,

    /// Nesting of expressions and calls currently being evaluated
    depth: usize,

    /// Error raised by the running program, if any
    pending_error: Option<RuntimeError>,
}

impl<S: Storage, C: Console> Interpreter<S, C> {
    pub fn new(storage: S, console: C) -> Self {
        Self::with_config(storage, console, RuntimeConfig::default())
    }

    pub fn with_config(storage: S, console: C, config: RuntimeConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Interpreter {
            storage,
            console,
            memory: Memory::new(config.region_size),
            config,
            rng,
            statements_since_collection: 0,
            depth: 0,
            pending_error: None,
        }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Error raised by the last run, if it failed
    pub fn pending_error(&self) -> Option<RuntimeError> {
        self.pending_error
    }

    pub fn into_parts(self) -> (S, C) {
        (self.storage, self.console)
    }

    /// Run the stored program called `name`.
    pub fn run_program(&mut self, name: &str) -> Result<Outcome, FileError> {
        let slot = self
            .storage
            .find_file(name.as_bytes())
            .ok_or(FileError::MissingFile)?;
        Ok(self.run_file(slot))
    }

    /// Run the program stored in the slot at `slot`.
    ///
    /// Memory starts empty and is emptied again afterwards. A runtime error is
    /// printed together with the source line that raised it.
    pub fn run_file(&mut self, slot: Address) -> Outcome {
        log::debug!("run file at slot {}", slot);
        self.pending_error = None;
        self.memory.reset();
        self.statements_since_collection = 0;
        self.depth = 0;
        self.console.show_running();

        let result = self.run_global(slot);
        self.memory.reset();

        if let Some(error) = self.pending_error {
            log::warn!("program failed: {}", error);
            self.report_error(error);
            return Outcome::Failed(error);
        }
        match result {
            Ok(()) => Outcome::Finished,
            Err(()) => Outcome::Quit,
        }
    }

    fn run_global(&mut self, slot: Address) -> Result<(), ()> {
        let start = self.storage.file_data_address(slot);
        let opened = self
            .memory
            .push_scope()
            .and_then(|scope| {
                self.memory.push_branch(BranchAction::Run, 0)?;
                Ok(scope)
            });
        match opened {
            Ok(scope) => self.memory.roots_mut().track_scope(scope),
            Err(err) => {
                self.raise(err.into(), start);
                return Err(());
            }
        }
        match self.run_code(start) {
            Ok(_) => Ok(()),
            Err(_) => Err(()),
        }
    }

    /// Run statements from `address` until the code ends or a `ret`.
    ///
    /// Collection happens between statements only, so any value held by a
    /// half-evaluated outer expression must be registered as a root.
    pub(crate) fn run_code(&mut self, mut address: Address) -> Eval<Value> {
        loop {
            match self.read_symbol(address) {
                b'\n' => {
                    address += 1;
                    continue;
                }
                0 => return Ok(Value::Missing),
                _ => {}
            }
            match self.evaluate_expression(address, STATEMENT_PRECEDENCE, true) {
                Ok(expression) => address = expression.code,
                Err(Interrupt::Return(value)) => return Ok(value),
                Err(Interrupt::Quit) => return Err(Interrupt::Quit),
            }
            self.statements_since_collection += 1;
            if self.memory.heap().allocations_since_collection()
                > self.config.collect_after_allocations
                || self.statements_since_collection > self.config.collect_after_statements
            {
                self.collect_garbage();
            }
            if self.console.escape_pressed() {
                log::debug!("escape pressed at {}", address);
                return Err(Interrupt::Quit);
            }
        }
    }

    pub(crate) fn collect_garbage(&mut self) {
        let stats = self.memory.collect_garbage();
        self.statements_since_collection = 0;
        log::debug!(
            "collection freed {} objects ({} bytes)",
            stats.objects,
            stats.bytes
        );
    }

    /// Program byte at `address`; 0 past the end of the store.
    pub(crate) fn read_symbol(&self, address: Address) -> u8 {
        self.storage.read_byte(address)
    }

    /// Record `kind` as the program's error and return the interrupt that
    /// unwinds to the driver.
    pub(crate) fn raise(&mut self, kind: ErrorKind, address: Address) -> Interrupt {
        log::debug!("raise {:?} at {}", kind, address);
        self.pending_error = Some(RuntimeError::new(kind, address));
        Interrupt::Quit
    }

    /// Turn a memory failure into a raised error at `address`.
    pub(crate) fn check<T>(&mut self, result: Result<T, MemoryError>, address: Address) -> Eval<T> {
        result.map_err(|err| self.raise(err.into(), address))
    }

    /// Count one level of nesting, failing past the configured limit.
    pub(crate) fn enter(&mut self, address: Address) -> Eval<()> {
        if self.depth >= self.config.max_depth {
            return Err(self.raise(ErrorKind::ExpressionTooComplex, address));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn report_error(&mut self, error: RuntimeError) {
        self.console.print_text(error.message());
        let line = self.source_line(error.address);
        self.console.print_text(&line);
    }

    /// Decoded text of the program line containing `address`.
    pub fn source_line(&self, address: Address) -> String {
        let file_start = self.storage.file_data_address(
            address - address % crate::storage::FILE_ENTRY_SIZE as Address,
        );
        let mut start = address;
        while start > file_start && self.read_symbol(start - 1) != b'\n' {
            start -= 1;
        }
        let mut bytes = Vec::new();
        let mut end = start;
        loop {
            match self.read_symbol(end) {
                b'\n' | 0 => break,
                byte => bytes.push(byte),
            }
            end += 1;
        }
        crate::symbols::decode(&bytes)
    }
}
