//! Strategy contract and the shared branch-and-bound shell.
//!
//! All strategies share the same scoring, bound, and undo bookkeeping; they
//! differ in how the next branching point is chosen. The shell owns the
//! occupied mask, score accumulators, the placement stack, and the best
//! solution found so far.
//!
//! The dominance memo keys visited states by (occupied mask, unique-used)
//! only. Two paths can reach the same mask having consumed different piece
//! inventory, so the cut may discard a continuation reachable only through
//! the discarded path. It is a heuristic, not an optimality guarantee.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::board::BitMask;
use crate::pool::SearchContext;
use crate::score::{modifier_bonus, summarize_bonuses, BONUS_CELL_CAP};
use crate::solution::{PlacedPiece, Solution};

/// Wall-clock cutoff for one strategy run.
///
/// Checked cooperatively at the top of every recursive step; once passed,
/// the search unwinds without further branching and keeps the best
/// solution found so far.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    end: Instant,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            end: Instant::now() + budget,
        }
    }

    pub fn passed(&self) -> bool {
        Instant::now() >= self.end
    }
}

/// A search strategy over one exclusively borrowed context.
///
/// Implementations must leave every pool-entry counter exactly as found
/// and must be deterministic modulo tie-breaking.
pub trait Strategy {
    fn name(&self) -> &'static str;
    fn search(&self, ctx: &mut SearchContext, deadline: Deadline) -> Solution;
}

/// Next branching point chosen by a cell selector.
pub(crate) enum Target {
    /// Branch on this cell. `domain` carries the valid (entry, placement)
    /// pairs when the selector already enumerated them.
    Cell {
        index: usize,
        domain: Option<Vec<(usize, usize)>>,
    },
    /// No free cell remains.
    Exhausted,
}

pub(crate) type CellSelector = fn(&Shell<'_>) -> Target;

/// Shared mutable search state.
pub(crate) struct Shell<'a> {
    pub ctx: &'a mut SearchContext,
    pub deadline: Deadline,
    /// Blocked cells, placed cells, and cells left permanently unfilled.
    pub occupied: BitMask,
    pub base_score: i64,
    /// Cells placed so far per modifier, non-unique entries only.
    pub modifier_totals: BTreeMap<String, u32>,
    pub unique_used: bool,
    pub stack: Vec<PlacedPiece>,
    pub best: Solution,
    visited: FxHashMap<(BitMask, bool), i64>,
}

impl<'a> Shell<'a> {
    pub fn new(ctx: &'a mut SearchContext, deadline: Deadline) -> Self {
        let occupied = ctx.board.blocked.clone();
        Self {
            ctx,
            deadline,
            occupied,
            base_score: 0,
            modifier_totals: BTreeMap::new(),
            unique_used: false,
            stack: Vec::new(),
            best: Solution::empty(),
            visited: FxHashMap::default(),
        }
    }

    pub fn into_best(self) -> Solution {
        self.best
    }

    /// Optimistic total for this subtree: current base score, every
    /// unplaced base score, and for each modifier with remaining potential
    /// the extra bonus reachable if that potential landed in full (capped
    /// at [`BONUS_CELL_CAP`] cells).
    pub fn bound(&self) -> i64 {
        let mut optimistic = self.base_score + self.ctx.unused_base;
        for (modifier, &potential) in &self.ctx.modifier_potential {
            if potential == 0 {
                continue;
            }
            let placed = self.modifier_totals.get(modifier).copied().unwrap_or(0);
            let reachable = (placed + potential).min(BONUS_CELL_CAP);
            optimistic += modifier_bonus(reachable) - modifier_bonus(placed);
        }
        optimistic
    }

    /// Bound pruning plus the dominance memo. Returns true when this
    /// subtree cannot beat the best solution or was already visited with
    /// an equal-or-better bound.
    pub fn prune(&mut self) -> bool {
        let bound = self.bound();
        if bound <= self.best.total_score {
            return true;
        }
        let key = (self.occupied.clone(), self.unique_used);
        match self.visited.get(&key) {
            Some(&seen) if bound <= seen => true,
            _ => {
                self.visited.insert(key, bound);
                false
            }
        }
    }

    /// Scores the current stack and records it when it beats the best.
    /// Called on every node, not only leaves.
    pub fn evaluate(&mut self) {
        let (bonus, breakdown) = summarize_bonuses(&self.modifier_totals);
        let total = self.base_score + bonus;
        if total > self.best.total_score {
            self.best = Solution {
                total_score: total,
                base_score: self.base_score,
                bonus_score: bonus,
                placements: self.stack.clone(),
                bonus_breakdown: breakdown,
            };
        }
    }

    /// Valid (entry, placement) pairs covering `cell` in the current state.
    pub fn domain_for(&self, cell: usize) -> Vec<(usize, usize)> {
        let mut domain = Vec::new();
        for (entry_index, entry) in self.ctx.pool.iter().enumerate() {
            if entry.remaining == 0 {
                continue;
            }
            if entry.is_unique() && self.unique_used {
                continue;
            }
            for &placement_index in &entry.placements.by_cell[cell] {
                let placement = &entry.placements.placements[placement_index as usize];
                if !self.occupied.intersects(&placement.mask) {
                    domain.push((entry_index, placement_index as usize));
                }
            }
        }
        domain
    }

    /// Commits one placement and updates every counter it touches.
    pub fn place(&mut self, entry_index: usize, placement_index: usize) {
        let entry = &mut self.ctx.pool[entry_index];
        let placements = Arc::clone(&entry.placements);
        let placement = &placements.placements[placement_index];

        let id = format!("{}-{}", entry.uid, entry.used);
        entry.remaining -= 1;
        entry.used += 1;

        let label = match entry.modifier.as_deref() {
            Some(modifier) => {
                format!("{modifier} · {} · {} cells", entry.grade.label(), entry.area)
            }
            None => format!("{} · {} cells", entry.grade.label(), entry.area),
        };
        let piece = PlacedPiece {
            id,
            label,
            grade: entry.grade,
            modifier: entry.modifier.clone(),
            base_score: entry.base_score,
            shape_key: entry.shape_key.clone(),
            cells: placement.cells.clone(),
        };
        let area = entry.area;
        let base = entry.base_score;
        let unique = entry.grade.is_unique();
        let modifier = entry.modifier.clone();

        self.stack.push(piece);
        self.base_score += base;
        self.ctx.unused_base -= base;
        self.occupied.union_with(&placement.mask);
        if unique {
            self.unique_used = true;
        } else if let Some(modifier) = modifier {
            *self.modifier_totals.entry(modifier.clone()).or_default() += area;
            if let Some(potential) = self.ctx.modifier_potential.get_mut(&modifier) {
                *potential = potential.saturating_sub(area);
            }
        }
    }

    /// Reverts the matching [`Shell::place`] call.
    pub fn unplace(&mut self, entry_index: usize, placement_index: usize) {
        let entry = &mut self.ctx.pool[entry_index];
        let placements = Arc::clone(&entry.placements);
        let placement = &placements.placements[placement_index];

        entry.remaining += 1;
        entry.used -= 1;
        let area = entry.area;
        let base = entry.base_score;
        let unique = entry.grade.is_unique();
        let modifier = entry.modifier.clone();

        self.stack.pop();
        self.base_score -= base;
        self.ctx.unused_base += base;
        self.occupied.toggle(&placement.mask);
        if unique {
            self.unique_used = false;
        } else if let Some(modifier) = modifier {
            if let Some(total) = self.modifier_totals.get_mut(&modifier) {
                *total = total.saturating_sub(area);
                if *total == 0 {
                    self.modifier_totals.remove(&modifier);
                }
            }
            if let Some(potential) = self.ctx.modifier_potential.get_mut(&modifier) {
                *potential += area;
            }
        }
    }
}

/// Depth-first branch and bound parameterized by the cell selector.
pub(crate) fn run_shell(shell: &mut Shell<'_>, select: CellSelector) {
    dfs(shell, select);
}

fn dfs(shell: &mut Shell<'_>, select: CellSelector) {
    if shell.deadline.passed() {
        return;
    }
    if shell.prune() {
        return;
    }
    shell.evaluate();

    let (cell, domain) = match select(shell) {
        Target::Exhausted => return,
        Target::Cell { index, domain } => (index, domain),
    };
    let domain = domain.unwrap_or_else(|| shell.domain_for(cell));

    for (entry_index, placement_index) in domain {
        if shell.deadline.passed() {
            return;
        }
        shell.place(entry_index, placement_index);
        dfs(shell, select);
        shell.unplace(entry_index, placement_index);
    }

    // Leave the cell permanently unfilled on this branch.
    shell.occupied.set(cell);
    dfs(shell, select);
    shell.occupied.clear(cell);
}
