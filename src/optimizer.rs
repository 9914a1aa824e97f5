//! Runs every strategy against its own context clone under a shared time
//! budget and keeps the best solution.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::backtrack::Backtrack;
use crate::board::CellRef;
use crate::csp::DomainBacktrack;
use crate::exact_cover::ExactCover;
use crate::pool::{build_context, PieceSpec};
use crate::search::{Deadline, Strategy};
use crate::solution::Solution;

/// Minimum share of the time budget each strategy receives, however small
/// the requested limit.
const MIN_STRATEGY_BUDGET: Duration = Duration::from_millis(2_000);

/// A complete solve request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    pub rows: u32,
    pub cols: u32,
    #[serde(default)]
    pub blocked: Vec<CellRef>,
    #[serde(default)]
    pub pieces: Vec<PieceSpec>,
    pub role: String,
    /// Budget for the whole solve, split across the strategies.
    #[serde(default = "default_time_limit_ms")]
    pub time_limit_ms: u64,
}

fn default_time_limit_ms() -> u64 {
    6_000
}

/// Score and wall-clock outcome of one strategy run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyReport {
    pub strategy: &'static str,
    pub total_score: i64,
    pub duration_ms: u64,
}

/// The winning solution plus per-strategy diagnostics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveOutcome {
    pub solution: Solution,
    pub reports: Vec<StrategyReport>,
}

/// Solves a request with all three strategies and returns the best result.
///
/// Degenerate inputs (a zero-area board, an empty eligible pool, or no
/// free cell) return the empty solution without running any strategy.
/// Never fails: ineligible pieces are dropped and an exhausted budget just
/// truncates the search.
pub fn solve(request: &SolveRequest) -> SolveOutcome {
    if request.rows == 0 || request.cols == 0 {
        return SolveOutcome {
            solution: Solution::empty(),
            reports: Vec::new(),
        };
    }

    let context = build_context(
        request.rows,
        request.cols,
        &request.blocked,
        &request.pieces,
        &request.role,
    );
    if context.pool.is_empty() || context.board.free_cells() == 0 {
        return SolveOutcome {
            solution: Solution::empty(),
            reports: Vec::new(),
        };
    }

    let strategies: [&dyn Strategy; 3] = [&Backtrack, &ExactCover, &DomainBacktrack];
    let per_strategy =
        Duration::from_millis(request.time_limit_ms / strategies.len() as u64)
            .max(MIN_STRATEGY_BUDGET);

    let mut best = Solution::empty();
    let mut reports = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        let mut ctx = context.clone();
        let started = Instant::now();
        let solution = strategy.search(&mut ctx, Deadline::after(per_strategy));
        let duration = started.elapsed();
        log::info!(
            "{}: score {} in {}ms",
            strategy.name(),
            solution.total_score,
            duration.as_millis()
        );
        reports.push(StrategyReport {
            strategy: strategy.name(),
            total_score: solution.total_score,
            duration_ms: duration.as_millis() as u64,
        });
        if solution.total_score > best.total_score {
            best = solution;
        }
    }

    SolveOutcome {
        solution: best,
        reports,
    }
}

/// Convenience wrapper returning only the winning solution.
pub fn solve_board(request: &SolveRequest) -> Solution {
    solve(request).solution
}
