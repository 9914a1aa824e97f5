//! Strategy C: constraint-style backtracking over live placement domains.
//!
//! Where [`crate::backtrack`] ranks cells by a coverage count frozen at
//! build time, this strategy recounts each free cell's domain, the
//! (entry, placement) pairs still compatible with the current occupied
//! mask and counters, and branches on the smallest one, iterating that
//! domain directly.

use crate::pool::SearchContext;
use crate::search::{run_shell, Deadline, Shell, Strategy, Target};
use crate::solution::Solution;

fn min_domain_cell(shell: &Shell<'_>) -> Target {
    let total = shell.ctx.board.total_cells();
    let mut best: Option<(usize, Vec<(usize, usize)>)> = None;

    for index in 0..total {
        if shell.occupied.contains(index) {
            continue;
        }
        let domain = shell.domain_for(index);
        if domain.is_empty() {
            // Nothing can cover this cell any more; claim it now.
            return Target::Cell {
                index,
                domain: Some(domain),
            };
        }
        let better = match &best {
            Some((_, current)) => domain.len() < current.len(),
            None => true,
        };
        if better {
            let singleton = domain.len() == 1;
            best = Some((index, domain));
            if singleton {
                break;
            }
        }
    }

    match best {
        Some((index, domain)) => Target::Cell {
            index,
            domain: Some(domain),
        },
        None => Target::Exhausted,
    }
}

/// Minimum-remaining-values backtracking over explicit cell domains.
pub struct DomainBacktrack;

impl Strategy for DomainBacktrack {
    fn name(&self) -> &'static str {
        "csp"
    }

    fn search(&self, ctx: &mut SearchContext, deadline: Deadline) -> Solution {
        let mut shell = Shell::new(ctx, deadline);
        run_shell(&mut shell, min_domain_cell);
        shell.into_best()
    }
}
