//! Scope partition of the memory region
//!
//! - [`ScopeStack`]: one [`Scope`] per active call frame, the global scope first
//! - [`Scope`]: variable bindings plus the branch stack of its nested blocks
//! - [`Branch`]: the state of one open `if:`/`while:`/`func:` block
//!
//! Scopes are bump-allocated upward from the bottom of the region. Variables
//! and branch records only ever grow a scope's used size, which is given back
//! in one piece when the scope is popped. Every growth step is checked against
//! the heap boundary so the two partitions never overlap.
//!
//! # Lookup
//!
//! Only two levels exist: the innermost scope, then the global scope.

use super::value::{Address, Value, VALUE_SIZE};
use super::MemoryError;
use rustc_hash::FxHashMap;

/// Size, variable-list and branch-list fields of a scope record
pub const SCOPE_HEADER_SIZE: usize = 6;
/// Link, action and resume address of a branch record
pub const BRANCH_RECORD_SIZE: usize = 9;

/// Region bytes a variable record with this name occupies.
pub fn variable_record_size(name: &str) -> usize {
    2 + VALUE_SIZE + name.len() + 1
}

/// What the evaluator does with statements inside a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchAction {
    /// Statements execute normally
    Run,
    /// Condition was false; a later `elif:`/`else;` may still take over
    IgnoreSoft,
    /// Skipped until the matching `end;`
    IgnoreHard,
    /// Body executes and `end;` jumps back to the loop header
    Loop,
}

impl BranchAction {
    pub fn is_ignored(self) -> bool {
        matches!(self, BranchAction::IgnoreSoft | BranchAction::IgnoreHard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    pub action: BranchAction,
    /// Loop header to resume at; only meaningful for [`BranchAction::Loop`]
    pub address: Address,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub value: Value,
}

/// Stable reference to a variable slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableRef {
    pub scope: usize,
    pub index: usize,
}

/// One call frame
#[derive(Debug, Clone)]
pub struct Scope {
    /// Region offset of the scope record
    pub base: usize,
    /// Bytes used by variable and branch records after the header
    pub used: usize,
    variables: Vec<Variable>,
    lookup: FxHashMap<String, usize>,
    /// Branch records ever allocated; reused when the nesting depth returns
    branches: Vec<Branch>,
    /// Open branches, `branches[..depth]`
    depth: usize,
}

impl Scope {
    fn new(base: usize) -> Self {
        Scope {
            base,
            used: 0,
            variables: Vec::new(),
            lookup: FxHashMap::default(),
            branches: Vec::new(),
            depth: 0,
        }
    }

    pub fn end(&self) -> usize {
        self.base + SCOPE_HEADER_SIZE + self.used
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    /// Open branches, outermost first
    pub fn branches(&self) -> &[Branch] {
        &self.branches[..self.depth]
    }

    /// Allocated branch records, including reusable ones above the open depth
    pub fn branch_records(&self) -> usize {
        self.branches.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack { scopes: Vec::new() }
    }

    pub fn reset(&mut self) {
        self.scopes.clear();
    }

    /// First byte past the innermost scope
    pub fn boundary(&self) -> usize {
        self.scopes.last().map_or(0, Scope::end)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn scope(&self, index: usize) -> Option<&Scope> {
        self.scopes.get(index)
    }

    /// Index of the innermost scope
    pub fn current(&self) -> Option<usize> {
        self.scopes.len().checked_sub(1)
    }

    pub fn is_global(&self) -> bool {
        self.scopes.len() <= 1
    }

    /// Open a scope directly above the current one.
    pub fn push_scope(&mut self, heap_boundary: usize) -> Result<usize, MemoryError> {
        let base = self.boundary();
        if base + SCOPE_HEADER_SIZE > heap_boundary {
            return Err(MemoryError::Collision);
        }
        self.scopes.push(Scope::new(base));
        log::debug!("push scope {} at {}", self.scopes.len() - 1, base);
        Ok(self.scopes.len() - 1)
    }

    /// Drop the innermost scope and all of its records.
    pub fn pop_scope(&mut self) -> Option<Scope> {
        self.scopes.pop()
    }

    /// Find a variable in the innermost scope, then in the global scope.
    pub fn find(&self, name: &str) -> Option<VariableRef> {
        let local = self.current()?;
        if let Some(index) = self.scopes[local].find(name) {
            return Some(VariableRef {
                scope: local,
                index,
            });
        }
        if local != 0 {
            if let Some(index) = self.scopes[0].find(name) {
                return Some(VariableRef { scope: 0, index });
            }
        }
        None
    }

    /// Bind a new variable in the innermost scope. A later binding of the same
    /// name shadows the earlier one.
    pub fn create_variable(
        &mut self,
        name: &str,
        value: Value,
        heap_boundary: usize,
    ) -> Result<VariableRef, MemoryError> {
        let size = variable_record_size(name);
        let scope_index = self.current().ok_or(MemoryError::Collision)?;
        let scope = &mut self.scopes[scope_index];
        if scope.end() + size > heap_boundary {
            return Err(MemoryError::Collision);
        }
        scope.used += size;
        scope.variables.push(Variable {
            name: name.to_string(),
            value,
        });
        let index = scope.variables.len() - 1;
        scope.lookup.insert(name.to_string(), index);
        Ok(VariableRef {
            scope: scope_index,
            index,
        })
    }

    pub fn variable(&self, reference: VariableRef) -> Option<&Variable> {
        self.scopes
            .get(reference.scope)?
            .variables
            .get(reference.index)
    }

    pub fn variable_mut(&mut self, reference: VariableRef) -> Option<&mut Variable> {
        self.scopes
            .get_mut(reference.scope)?
            .variables
            .get_mut(reference.index)
    }

    /// Open a block in the innermost scope, reusing a branch record left at
    /// this depth by an earlier block.
    pub fn push_branch(
        &mut self,
        action: BranchAction,
        address: Address,
        heap_boundary: usize,
    ) -> Result<(), MemoryError> {
        let scope = self.scopes.last_mut().ok_or(MemoryError::Collision)?;
        let branch = Branch { action, address };
        if scope.depth < scope.branches.len() {
            scope.branches[scope.depth] = branch;
        } else {
            if scope.end() + BRANCH_RECORD_SIZE > heap_boundary {
                return Err(MemoryError::Collision);
            }
            scope.used += BRANCH_RECORD_SIZE;
            scope.branches.push(branch);
        }
        scope.depth += 1;
        Ok(())
    }

    /// Close the innermost block. Fails at the scope's bottom branch.
    pub fn pop_branch(&mut self) -> bool {
        match self.scopes.last_mut() {
            Some(scope) if scope.depth > 1 => {
                scope.depth -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn top_branch(&self) -> Option<&Branch> {
        let scope = self.scopes.last()?;
        scope.depth.checked_sub(1).map(|top| &scope.branches[top])
    }

    pub fn top_branch_mut(&mut self) -> Option<&mut Branch> {
        let scope = self.scopes.last_mut()?;
        let top = scope.depth.checked_sub(1)?;
        scope.branches.get_mut(top)
    }

    /// Action of the innermost open block; code outside any block runs.
    pub fn branch_action(&self) -> BranchAction {
        self.top_branch().map_or(BranchAction::Run, |branch| branch.action)
    }

    pub fn set_branch_action(&mut self, action: BranchAction) {
        if let Some(branch) = self.top_branch_mut() {
            branch.action = action;
        }
    }

    /// Skip everything up to and including the innermost loop.
    ///
    /// Returns false when no loop is open in this scope.
    pub fn break_loop(&mut self) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        for branch in scope.branches[..scope.depth].iter_mut().rev() {
            let was_loop = branch.action == BranchAction::Loop;
            branch.action = BranchAction::IgnoreHard;
            if was_loop {
                return true;
            }
        }
        false
    }

    /// Close blocks down to and including the innermost loop, returning the
    /// loop header address.
    pub fn continue_loop(&mut self) -> Option<Address> {
        loop {
            let branch = *self.top_branch()?;
            if branch.action == BranchAction::Loop {
                self.pop_branch();
                return Some(branch.address);
            }
            if !self.pop_branch() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_falls_back_to_global() {
        let mut stack = ScopeStack::new();
        stack.push_scope(1000).unwrap();
        stack.create_variable("G", Value::Number(1.0), 1000).unwrap();
        stack.push_scope(1000).unwrap();
        stack.create_variable("L", Value::Number(2.0), 1000).unwrap();

        let global = stack.find("G").unwrap();
        assert_eq!(global.scope, 0);
        assert_eq!(stack.find("L").unwrap().scope, 1);

        stack.pop_scope();
        assert!(stack.find("L").is_none());
    }

    #[test]
    fn test_variable_collision_keeps_state() {
        let mut stack = ScopeStack::new();
        stack.push_scope(20).unwrap();
        let before = stack.boundary();

        let result = stack.create_variable("LONGNAME", Value::Missing, 20);
        assert_eq!(result, Err(MemoryError::Collision));
        assert_eq!(stack.boundary(), before);
        assert!(stack.find("LONGNAME").is_none());
    }

    #[test]
    fn test_branch_records_are_reused() {
        let mut stack = ScopeStack::new();
        stack.push_scope(1000).unwrap();
        stack.push_branch(BranchAction::Run, 0, 1000).unwrap();
        stack.push_branch(BranchAction::Loop, 7, 1000).unwrap();
        let used = stack.boundary();

        assert!(stack.pop_branch());
        stack.push_branch(BranchAction::IgnoreSoft, 0, 1000).unwrap();
        assert_eq!(stack.boundary(), used);
        assert_eq!(stack.scope(0).unwrap().branch_records(), 2);

        assert!(stack.pop_branch());
        assert!(!stack.pop_branch());
    }

    #[test]
    fn test_break_stops_at_innermost_loop() {
        let mut stack = ScopeStack::new();
        stack.push_scope(1000).unwrap();
        stack.push_branch(BranchAction::Run, 0, 1000).unwrap();
        stack.push_branch(BranchAction::Loop, 10, 1000).unwrap();
        stack.push_branch(BranchAction::Loop, 20, 1000).unwrap();
        stack.push_branch(BranchAction::Run, 0, 1000).unwrap();

        assert!(stack.break_loop());
        let actions: Vec<_> = stack.scope(0).unwrap().branches().iter().map(|b| b.action).collect();
        assert_eq!(
            actions,
            vec![
                BranchAction::Run,
                BranchAction::Loop,
                BranchAction::IgnoreHard,
                BranchAction::IgnoreHard
            ]
        );
    }

    #[test]
    fn test_continue_returns_loop_header() {
        let mut stack = ScopeStack::new();
        stack.push_scope(1000).unwrap();
        stack.push_branch(BranchAction::Run, 0, 1000).unwrap();
        stack.push_branch(BranchAction::Loop, 42, 1000).unwrap();
        stack.push_branch(BranchAction::Run, 0, 1000).unwrap();

        assert_eq!(stack.continue_loop(), Some(42));
        assert_eq!(stack.branch_action(), BranchAction::Run);
        assert!(!stack.pop_branch());
        assert_eq!(stack.continue_loop(), None);
    }
}
