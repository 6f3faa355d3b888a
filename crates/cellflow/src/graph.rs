//! Dependency graph maintenance
//!
//! The graph lives in the cells themselves (`references` / `dependents`,
//! keyed by position). Every traversal here is iterative with an explicit
//! stack and a visited set, so deep or wide sheets cannot exhaust the call
//! stack and shared sub-graphs are expanded once.

use ahash::AHashSet;
use cellflow_core::Position;

use crate::sheet::Sheet;

impl Sheet {
    /// Whether giving `target` the references `candidate` would close a cycle
    ///
    /// Runs against the live graph without mutating it: a depth-first search
    /// from each candidate reference along existing `references` edges,
    /// looking for `target`.
    pub(crate) fn would_create_cycle(&self, target: Position, candidate: &[Position]) -> bool {
        if candidate.contains(&target) {
            return true;
        }

        let mut visited = AHashSet::new();
        let mut stack: Vec<Position> = candidate.to_vec();

        while let Some(pos) = stack.pop() {
            if pos == target {
                return true;
            }
            if !visited.insert(pos) {
                continue;
            }
            if let Some(cell) = self.cells.get(pos) {
                stack.extend(
                    cell.references
                        .iter()
                        .copied()
                        .filter(|next| !visited.contains(next)),
                );
            }
        }

        false
    }

    /// Drop the cached result of every transitive dependent of `origin`
    ///
    /// Each cell is handled at most once per pass. Propagation stops at a
    /// cell that had nothing cached: nothing downstream of an unevaluated
    /// formula can hold a value computed from it. Returns the number of
    /// caches dropped.
    pub(crate) fn invalidate_dependents(&mut self, origin: Position) -> usize {
        let mut stack: Vec<Position> = match self.cells.get(origin) {
            Some(cell) => cell.dependents.iter().copied().collect(),
            None => return 0,
        };
        let mut visited = AHashSet::new();
        let mut cleared = 0;

        while let Some(pos) = stack.pop() {
            if !visited.insert(pos) {
                continue;
            }
            let Some(cell) = self.cells.get_mut(pos) else {
                continue;
            };
            if cell.clear_cache() {
                cleared += 1;
                stack.extend(cell.dependents.iter().copied());
            }
        }

        tracing::trace!(%origin, cleared, "invalidated dependents");
        cleared
    }

    /// Remove `pos` from the `dependents` of everything it references
    pub(crate) fn detach_references(&mut self, pos: Position) {
        let references = match self.cells.get_mut(pos) {
            Some(cell) => std::mem::take(&mut cell.references),
            None => return,
        };
        for referenced in references {
            if let Some(cell) = self.cells.get_mut(referenced) {
                cell.dependents.remove(&pos);
            }
        }
    }

    /// Record `references` as the outgoing edges of `pos` and add the
    /// matching incoming edges, materializing empty placeholder cells for
    /// referenced positions that hold nothing yet.
    pub(crate) fn attach_references(&mut self, pos: Position, references: &[Position]) {
        for &referenced in references {
            self.cells.get_or_insert(referenced).dependents.insert(pos);
        }
        self.cells
            .get_or_insert(pos)
            .references
            .extend(references.iter().copied());
    }

    /// Evaluate the unevaluated formulas `pos` depends on, deepest first
    ///
    /// Afterwards evaluating `pos` only reads cached results, so the
    /// evaluator's own recursion stays one level deep however long the
    /// reference chain is.
    pub(crate) fn evaluate_precedents(&self, pos: Position) {
        let needs_evaluation = |p: Position| {
            self.cells
                .get(p)
                .map_or(false, |cell| cell.is_formula() && !cell.has_cache())
        };
        if !needs_evaluation(pos) {
            return;
        }

        let mut visited = AHashSet::new();
        // (position, children already pushed)
        let mut stack = vec![(pos, false)];

        while let Some((current, expanded)) = stack.pop() {
            let Some(cell) = self.cells.get(current) else {
                continue;
            };
            if expanded {
                cell.value(self);
                continue;
            }
            if !visited.insert(current) {
                continue;
            }
            stack.push((current, true));
            stack.extend(
                cell.references
                    .iter()
                    .copied()
                    .filter(|&next| needs_evaluation(next) && !visited.contains(&next))
                    .map(|next| (next, false)),
            );
        }
    }
}
