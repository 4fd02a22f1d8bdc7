//! Rule store
//!
//! Each tier is a bounded ordered sequence. Storage is reserved once at
//! construction and never grows past the configured capacity, so a full
//! tier rejects registration instead of allocating.

use std::fmt;

use cadence_core::{CadenceError, CadenceResult, Tier};

use crate::{Action, Host, Pattern};

/// Classifier plus the action it triggers
pub struct Rule<H: Host> {
    pub pattern: Pattern<H::Event>,
    /// `None` means the match only counts, nothing runs
    pub action: Option<Action<H>>,
    pub arg: H::Arg,
}

impl<H: Host> Rule<H> {
    pub fn new(pattern: Pattern<H::Event>, action: Option<Action<H>>, arg: H::Arg) -> Self {
        Rule {
            pattern,
            action,
            arg,
        }
    }

    /// Run the action, if any
    pub fn fire(&self, event: &H::Event, cx: &mut H::Context) -> bool {
        match self.action {
            Some(action) => action(event, cx, &self.arg),
            None => true,
        }
    }
}

impl<H: Host> Clone for Rule<H> {
    fn clone(&self) -> Self {
        Rule {
            pattern: self.pattern,
            action: self.action,
            arg: self.arg.clone(),
        }
    }
}

impl<H: Host> fmt::Debug for Rule<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.pattern)
            .field("action", &self.action.is_some())
            .field("arg", &self.arg)
            .finish()
    }
}

/// One tier of the rule store
pub struct RuleTier<H: Host> {
    tier: Tier,
    rules: Vec<Rule<H>>,
    capacity: usize,
    /// Iteration cursor, independent of storage positions
    cursor: usize,
}

impl<H: Host> RuleTier<H> {
    pub fn new(tier: Tier, capacity: usize) -> Self {
        RuleTier {
            tier,
            rules: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.rules.len() >= self.capacity
    }

    /// Remove every rule
    pub fn clear(&mut self) {
        self.rules.clear();
        self.cursor = 0;
    }

    /// Append a rule, returning its slot index
    pub fn add(&mut self, rule: Rule<H>) -> CadenceResult<usize> {
        if self.is_full() {
            return Err(CadenceError::CapacityExceeded {
                tier: self.tier,
                capacity: self.capacity,
            });
        }
        self.rules.push(rule);
        Ok(self.rules.len() - 1)
    }

    /// Rewind the iteration cursor to the first rule
    pub fn begin_iteration(&mut self) {
        self.cursor = 0;
    }

    pub fn at_end(&self) -> bool {
        self.cursor >= self.rules.len()
    }

    /// Next rule in insertion order, advancing the cursor
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&Rule<H>> {
        let rule = self.rules.get(self.cursor)?;
        self.cursor += 1;
        Some(rule)
    }

    /// Rules in insertion order, without touching the cursor
    pub fn iter(&self) -> impl Iterator<Item = &Rule<H>> {
        self.rules.iter()
    }
}

impl<H: Host> fmt::Debug for RuleTier<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleTier")
            .field("tier", &self.tier)
            .field("len", &self.rules.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
