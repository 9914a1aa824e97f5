//! Grade data and pure scoring functions.
//!
//! A piece's base score is linear in its covered cells. The modifier bonus
//! is a stepped function of the combined cell count across all non-unique
//! placements sharing one modifier: nothing below 9 cells, one step at 9,
//! another step every 3 cells, capped at 21 cells (5 steps).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bonus awarded per step once a modifier group reaches a threshold.
pub const BONUS_PER_STEP: i64 = 265;

/// Combined cell count at which a modifier group earns its first step.
pub const BONUS_FIRST_STEP_CELLS: u32 = 9;

/// Additional cells required for each further step.
pub const BONUS_CELLS_PER_STEP: u32 = 3;

/// Cell count beyond which a modifier group earns nothing more.
pub const BONUS_CELL_CAP: u32 = 21;

/// Piece quality tier.
///
/// The grade fixes the per-cell point value and caps how large a shape the
/// grade may be attached to. Unique pieces carry no modifier and never
/// participate in bonus groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Rare,
    Epic,
    SuperEpic,
    Unique,
}

impl Grade {
    /// Points contributed per covered cell.
    pub fn points(self) -> i64 {
        match self {
            Grade::Rare => 30,
            Grade::Epic => 60,
            Grade::SuperEpic => 120,
            Grade::Unique => 250,
        }
    }

    /// Largest shape area this grade may be attached to. `None` is uncapped.
    pub fn max_cells(self) -> Option<u32> {
        match self {
            Grade::Rare => Some(3),
            Grade::Epic => Some(4),
            Grade::SuperEpic => Some(5),
            Grade::Unique => None,
        }
    }

    /// Display label used in placement labels.
    pub fn label(self) -> &'static str {
        match self {
            Grade::Rare => "Rare",
            Grade::Epic => "Epic",
            Grade::SuperEpic => "Super Epic",
            Grade::Unique => "Unique",
        }
    }

    pub fn is_unique(self) -> bool {
        matches!(self, Grade::Unique)
    }
}

/// Base score of a single placed piece.
pub fn base_score(grade: Grade, cells: u32) -> i64 {
    grade.points() * i64::from(cells)
}

/// Stepped bonus for the combined cell count of one modifier group.
pub fn modifier_bonus(cells: u32) -> i64 {
    if cells < BONUS_FIRST_STEP_CELLS {
        return 0;
    }
    let effective = cells.min(BONUS_CELL_CAP);
    let steps = 1 + (effective - BONUS_FIRST_STEP_CELLS) / BONUS_CELLS_PER_STEP;
    i64::from(steps) * BONUS_PER_STEP
}

/// One line of a solution's bonus breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusEntry {
    pub modifier: String,
    /// Cell count that earned the bonus, capped at [`BONUS_CELL_CAP`].
    pub cells: u32,
    pub bonus: i64,
}

/// Folds per-modifier cell totals into a bonus total and its breakdown.
///
/// Modifiers below the first threshold are omitted from the breakdown.
pub fn summarize_bonuses(totals: &BTreeMap<String, u32>) -> (i64, Vec<BonusEntry>) {
    let mut breakdown = Vec::new();
    let mut total = 0;
    for (modifier, &cells) in totals {
        let bonus = modifier_bonus(cells);
        if bonus > 0 {
            breakdown.push(BonusEntry {
                modifier: modifier.clone(),
                cells: cells.min(BONUS_CELL_CAP),
                bonus,
            });
            total += bonus;
        }
    }
    (total, breakdown)
}
