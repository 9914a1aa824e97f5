//! Strategy A: backtracking with branch and bound, guided by the
//! precomputed per-cell coverage counts.

use crate::pool::SearchContext;
use crate::search::{run_shell, Deadline, Shell, Strategy, Target};
use crate::solution::Solution;

/// Picks the free cell with the lowest static coverage count.
///
/// A cell no placement can ever reach (coverage 0) is claimed immediately:
/// that branch cannot be filled there, so marking it unfillable costs
/// nothing and narrows the search.
fn min_coverage_cell(shell: &Shell<'_>) -> Target {
    let total = shell.ctx.board.total_cells();
    let mut best: Option<usize> = None;
    let mut best_coverage = u64::MAX;

    for index in 0..total {
        if shell.occupied.contains(index) {
            continue;
        }
        let coverage = shell.ctx.coverage[index];
        if coverage == 0 {
            return Target::Cell {
                index,
                domain: None,
            };
        }
        if coverage < best_coverage {
            best_coverage = coverage;
            best = Some(index);
            if coverage == 1 {
                break;
            }
        }
    }

    match best {
        Some(index) => Target::Cell {
            index,
            domain: None,
        },
        None => Target::Exhausted,
    }
}

/// The reference strategy: most-constrained-cell backtracking with bound
/// pruning and the dominance memo.
pub struct Backtrack;

impl Strategy for Backtrack {
    fn name(&self) -> &'static str {
        "backtrack"
    }

    fn search(&self, ctx: &mut SearchContext, deadline: Deadline) -> Solution {
        let mut shell = Shell::new(ctx, deadline);
        run_shell(&mut shell, min_coverage_cell);
        shell.into_best()
    }
}
