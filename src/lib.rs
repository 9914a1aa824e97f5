//! Sugar Board Placement Optimizer
//!
//! Given a partially blocked grid and an inventory of graded, modifier-tagged
//! polyomino pieces, finds a non-overlapping placement subset maximizing base
//! score plus stepped modifier bonuses. Three search strategies (coverage
//! guided backtracking, dancing-links exact cover, and domain-size
//! backtracking) run under a shared time budget and the best result wins.

pub mod backtrack;
pub mod board;
pub mod csp;
pub mod exact_cover;
pub mod optimizer;
pub mod pool;
pub mod score;
pub mod search;
pub mod shapes;
pub mod solution;

pub use optimizer::{solve, solve_board, SolveOutcome, SolveRequest, StrategyReport};
pub use solution::Solution;
