//! Solver output records and rendering.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::score::{BonusEntry, Grade};

/// One accepted placement, in placement order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedPiece {
    /// Stable per-instance id: `{piece uid}-{instance number}`.
    pub id: String,
    pub label: String,
    pub grade: Grade,
    /// `None` for unique-grade placements.
    pub modifier: Option<String>,
    pub base_score: i64,
    pub shape_key: String,
    pub cells: Vec<(u32, u32)>,
}

/// The solver result.
///
/// `total_score == base_score + bonus_score`, and `bonus_score` equals the
/// sum of the breakdown bonuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub total_score: i64,
    pub base_score: i64,
    pub bonus_score: i64,
    pub placements: Vec<PlacedPiece>,
    pub bonus_breakdown: Vec<BonusEntry>,
}

impl Solution {
    /// The well-formed zero-score result returned for degenerate inputs.
    pub fn empty() -> Self {
        Self {
            total_score: 0,
            base_score: 0,
            bonus_score: 0,
            placements: Vec::new(),
            bonus_breakdown: Vec::new(),
        }
    }
}

/// Formats a solution as a board grid.
///
/// Free cells show as '.', blocked cells as '#', and each placement as a
/// digit or letter in placement order.
pub fn format_solution(board: &Board, solution: &Solution) -> String {
    let mut grid = vec!['.'; board.total_cells()];
    for index in 0..board.total_cells() {
        if board.blocked.contains(index) {
            grid[index] = '#';
        }
    }
    for (order, placement) in solution.placements.iter().enumerate() {
        let mark = match order {
            0..=8 => char::from(b'1' + order as u8),
            9..=34 => char::from(b'A' + (order as u8 - 9)),
            _ => '*',
        };
        for &(row, col) in &placement.cells {
            grid[board.index(row, col)] = mark;
        }
    }

    let mut output = String::new();
    for row in 0..board.rows {
        for col in 0..board.cols {
            output.push(grid[board.index(row, col)]);
        }
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CellRef;

    fn placed(id: &str, cells: Vec<(u32, u32)>) -> PlacedPiece {
        PlacedPiece {
            id: id.to_string(),
            label: format!("test · {} cells", cells.len()),
            grade: Grade::Epic,
            modifier: Some("radiance".to_string()),
            base_score: 60 * cells.len() as i64,
            shape_key: "test".to_string(),
            cells,
        }
    }

    #[test]
    fn test_format_solution_marks_placements_in_order() {
        let board = Board::new(3, 4, &[CellRef { row: 0, col: 3 }]);
        let solution = Solution {
            total_score: 0,
            base_score: 0,
            bonus_score: 0,
            placements: vec![
                placed("a-0", vec![(0, 0), (0, 1), (1, 0)]),
                placed("b-0", vec![(2, 2), (2, 3)]),
            ],
            bonus_breakdown: Vec::new(),
        };

        insta::assert_snapshot!(format_solution(&board, &solution), @r"
        11.#
        1...
        ..22
        ");
    }

    #[test]
    fn test_format_empty_solution_shows_blocked_cells() {
        let board = Board::new(2, 2, &[CellRef { row: 1, col: 1 }]);
        assert_eq!(format_solution(&board, &Solution::empty()), "..\n.#\n");
    }

    #[test]
    fn test_solution_json_field_names() {
        let solution = Solution {
            total_score: 7,
            base_score: 7,
            bonus_score: 0,
            placements: Vec::new(),
            bonus_breakdown: Vec::new(),
        };
        let json = serde_json::to_value(&solution).unwrap();
        assert!(json.get("totalScore").is_some());
        assert!(json.get("bonusBreakdown").is_some());
    }
}
