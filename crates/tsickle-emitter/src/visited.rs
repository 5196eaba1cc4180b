//! Cycle and depth guard for one top-level type translation.
//!
//! Anonymous object types are entered by identity: re-entering a type that is
//! still on the stack is a cycle and the translator prints `?` for it. Named
//! references and unions only count toward the depth bound, since their names
//! stop the recursion on their own.

use rustc_hash::FxHashSet;
use tsickle_common::limits::MAX_TYPE_TRANSLATION_DEPTH;
use tsickle_program::TypeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitResult {
    Entered,
    /// The type is already being translated further up the stack.
    Cycle,
    DepthExceeded,
}

impl VisitResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }
}

#[derive(Debug)]
pub struct VisitedTypeSet {
    visiting: FxHashSet<TypeId>,
    depth: u32,
    max_depth: u32,
}

impl VisitedTypeSet {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_TYPE_TRANSLATION_DEPTH)
    }

    pub fn with_max_depth(max_depth: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            max_depth,
        }
    }

    /// Enter `ty` by identity. Must be paired with [`leave`](Self::leave) when
    /// the result is [`VisitResult::Entered`].
    pub fn enter(&mut self, ty: TypeId) -> VisitResult {
        if self.depth >= self.max_depth {
            return VisitResult::DepthExceeded;
        }
        if !self.visiting.insert(ty) {
            return VisitResult::Cycle;
        }
        self.depth += 1;
        VisitResult::Entered
    }

    pub fn leave(&mut self, ty: TypeId) {
        let was_present = self.visiting.remove(&ty);
        debug_assert!(was_present, "leave() without a matching enter() for {ty}");
        self.depth = self.depth.saturating_sub(1);
    }

    /// Enter one nesting level without identity tracking.
    pub fn enter_nested(&mut self) -> bool {
        if self.depth >= self.max_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    pub fn leave_nested(&mut self) {
        debug_assert!(self.depth > 0, "leave_nested() without enter_nested()");
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn is_empty(&self) -> bool {
        self.visiting.is_empty() && self.depth == 0
    }
}

impl Default for VisitedTypeSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/visited.rs"]
mod tests;
