//! Piece pool and search context construction.
//!
//! Converts board geometry, blocked cells, and raw piece specs into the
//! bitmask placement tables and heuristic indices the strategies search
//! over. Ineligible pieces are dropped silently; the solver never rejects
//! a request.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::{BitMask, Board, CellRef};
use crate::score::{base_score, Grade};
use crate::shapes::{self, Shape};

/// One piece line of a solve request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceSpec {
    #[serde(default)]
    pub id: Option<String>,
    pub role: String,
    /// Absent only for unique-grade pieces.
    #[serde(default)]
    pub modifier: Option<String>,
    pub grade: Grade,
    pub shape_key: String,
    pub quantity: u32,
}

/// A shape anchored at one board offset.
#[derive(Debug, Clone)]
pub struct Placement {
    pub mask: BitMask,
    pub cells: Vec<(u32, u32)>,
}

/// Every valid placement of one shape on this board, with a reverse index
/// from each cell to the placements touching it.
///
/// Shared between all pool entries using the same shape; quantities never
/// duplicate placement tables.
#[derive(Debug)]
pub struct ShapePlacements {
    pub placements: Vec<Placement>,
    /// `by_cell[cell]` lists indices into `placements`.
    pub by_cell: Vec<Vec<u32>>,
}

/// An eligible piece line with its per-solve search counters.
#[derive(Debug, Clone)]
pub struct PoolEntry {
    pub uid: String,
    /// `None` for unique-grade entries.
    pub modifier: Option<String>,
    pub grade: Grade,
    pub shape_key: String,
    pub area: u32,
    pub base_score: i64,
    pub placements: Arc<ShapePlacements>,
    /// Instances still available. Mutated during search; every strategy
    /// restores it before returning.
    pub remaining: u32,
    /// Instances currently placed; numbers the placement ids.
    pub used: u32,
}

impl PoolEntry {
    pub fn is_unique(&self) -> bool {
        self.grade.is_unique()
    }
}

/// Everything one strategy run searches over.
///
/// Cloned per strategy: counters deep, placement tables shared.
#[derive(Debug, Clone)]
pub struct SearchContext {
    pub board: Board,
    pub pool: Vec<PoolEntry>,
    /// Per cell: sum over entries of remaining × placements touching it.
    pub coverage: Vec<u64>,
    /// Per modifier: cells still placeable from non-unique entries.
    pub modifier_potential: BTreeMap<String, u32>,
    /// Sum of base scores over all unplaced instances.
    pub unused_base: i64,
}

/// Enumerates every in-bounds, unblocked placement of `shape`.
fn enumerate_placements(board: &Board, shape: &Shape) -> ShapePlacements {
    let total = board.total_cells();
    let mut placements = Vec::new();
    let mut by_cell = vec![Vec::new(); total];

    if shape.height > board.rows || shape.width > board.cols {
        return ShapePlacements { placements, by_cell };
    }

    for start_row in 0..=(board.rows - shape.height) {
        for start_col in 0..=(board.cols - shape.width) {
            let mut mask = BitMask::new(total);
            let mut cells = Vec::with_capacity(shape.cells.len());
            let mut fits = true;
            for &(row_offset, col_offset) in &shape.cells {
                let row = start_row + row_offset;
                let col = start_col + col_offset;
                let index = board.index(row, col);
                if board.blocked.contains(index) {
                    fits = false;
                    break;
                }
                mask.set(index);
                cells.push((row, col));
            }
            if fits {
                let id = placements.len() as u32;
                for &(row, col) in &cells {
                    by_cell[board.index(row, col)].push(id);
                }
                placements.push(Placement { mask, cells });
            }
        }
    }

    ShapePlacements { placements, by_cell }
}

/// Builds the search context for one solve call.
///
/// Drops specs whose role mismatches, whose quantity is zero, whose shape
/// key is unknown, whose area exceeds the grade cap, whose modifier is
/// missing on a non-unique grade, or which have no valid placement on this
/// board. Unique entries are clamped to a single instance.
pub fn build_context(
    rows: u32,
    cols: u32,
    blocked: &[CellRef],
    pieces: &[PieceSpec],
    role: &str,
) -> SearchContext {
    let board = Board::new(rows, cols, blocked);
    let total = board.total_cells();

    let mut placement_cache: FxHashMap<&'static str, Arc<ShapePlacements>> = FxHashMap::default();
    let mut pool: Vec<PoolEntry> = Vec::new();

    for (index, piece) in pieces.iter().enumerate() {
        if piece.role != role || piece.quantity == 0 {
            continue;
        }
        let Some(shape) = shapes::shape(&piece.shape_key) else {
            continue;
        };
        if let Some(cap) = piece.grade.max_cells() {
            if shape.area > cap {
                continue;
            }
        }
        let modifier = if piece.grade.is_unique() {
            None
        } else {
            match &piece.modifier {
                Some(modifier) => Some(modifier.clone()),
                None => continue,
            }
        };

        let placements = placement_cache
            .entry(shape.key)
            .or_insert_with(|| Arc::new(enumerate_placements(&board, shape)))
            .clone();
        if placements.placements.is_empty() {
            continue;
        }

        let remaining = if piece.grade.is_unique() {
            piece.quantity.min(1)
        } else {
            piece.quantity
        };

        pool.push(PoolEntry {
            uid: piece
                .id
                .clone()
                .unwrap_or_else(|| format!("{}-{}", piece.shape_key, index)),
            modifier,
            grade: piece.grade,
            shape_key: piece.shape_key.clone(),
            area: shape.area,
            base_score: base_score(piece.grade, shape.area),
            placements,
            remaining,
            used: 0,
        });
    }

    // Larger, higher-scoring pieces first; modifier breaks remaining ties.
    pool.sort_by(|a, b| {
        b.area
            .cmp(&a.area)
            .then(b.base_score.cmp(&a.base_score))
            .then(a.modifier.cmp(&b.modifier))
            .then(a.uid.cmp(&b.uid))
    });

    let mut coverage = vec![0u64; total];
    let mut modifier_potential: BTreeMap<String, u32> = BTreeMap::new();
    let mut unused_base = 0i64;
    for entry in &pool {
        unused_base += entry.base_score * i64::from(entry.remaining);
        if let Some(modifier) = entry.modifier.as_ref().filter(|_| !entry.is_unique()) {
            *modifier_potential.entry(modifier.clone()).or_default() +=
                entry.area * entry.remaining;
        }
        for (cell, touching) in entry.placements.by_cell.iter().enumerate() {
            coverage[cell] += u64::from(entry.remaining) * touching.len() as u64;
        }
    }

    log::debug!(
        "context: {}x{} board, {} blocked, {} pool entries, {} modifiers",
        rows,
        cols,
        board.blocked.count(),
        pool.len(),
        modifier_potential.len()
    );

    SearchContext {
        board,
        pool,
        coverage,
        modifier_potential,
        unused_base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(role: &str, modifier: Option<&str>, grade: Grade, shape_key: &str, quantity: u32) -> PieceSpec {
        PieceSpec {
            id: None,
            role: role.to_string(),
            modifier: modifier.map(str::to_string),
            grade,
            shape_key: shape_key.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_ineligible_specs_are_dropped() {
        let pieces = [
            spec("dealer", Some("radiance"), Grade::Rare, "3_bar_h", 1),
            // wrong role
            spec("supporter", Some("blessing"), Grade::Rare, "3_bar_h", 1),
            // zero quantity
            spec("dealer", Some("radiance"), Grade::Rare, "2_bar_h", 0),
            // unknown shape
            spec("dealer", Some("radiance"), Grade::Rare, "7_spiral", 1),
            // rare caps at 3 cells
            spec("dealer", Some("radiance"), Grade::Rare, "4_square", 1),
            // non-unique without a modifier
            spec("dealer", None, Grade::Epic, "4_square", 1),
        ];
        let ctx = build_context(5, 5, &[], &pieces, "dealer");
        assert_eq!(ctx.pool.len(), 1);
        assert_eq!(ctx.pool[0].shape_key, "3_bar_h");
    }

    #[test]
    fn test_unique_quantity_clamps_to_one() {
        let pieces = [spec("dealer", None, Grade::Unique, "8_rect_h", 5)];
        let ctx = build_context(6, 6, &[], &pieces, "dealer");
        assert_eq!(ctx.pool.len(), 1);
        assert_eq!(ctx.pool[0].remaining, 1);
        assert!(ctx.pool[0].modifier.is_none());
        // Unique pieces add no modifier potential.
        assert!(ctx.modifier_potential.is_empty());
    }

    #[test]
    fn test_pieces_with_no_fit_are_dropped() {
        // A 4-long bar cannot fit on a 3x3 board in either orientation.
        let pieces = [spec("dealer", Some("radiance"), Grade::Epic, "4_bar_h", 1)];
        let ctx = build_context(3, 3, &[], &pieces, "dealer");
        assert!(ctx.pool.is_empty());
    }

    #[test]
    fn test_placements_avoid_blocked_cells() {
        let blocked = [CellRef { row: 1, col: 1 }];
        let pieces = [spec("dealer", Some("radiance"), Grade::Rare, "2_bar_h", 1)];
        let ctx = build_context(3, 3, &blocked, &pieces, "dealer");
        let entry = &ctx.pool[0];
        // 2x1 bar on 3x3 has 6 offsets; 2 of them touch the center.
        assert_eq!(entry.placements.placements.len(), 4);
        let center = ctx.board.index(1, 1);
        for placement in &entry.placements.placements {
            assert!(!placement.mask.contains(center));
            assert!(!placement.mask.intersects(&ctx.board.blocked));
        }
        assert_eq!(ctx.coverage[center], 0);
    }

    #[test]
    fn test_shared_shape_tables_and_indices() {
        let pieces = [
            spec("dealer", Some("radiance"), Grade::Rare, "1_dot", 2),
            spec("dealer", Some("piercing"), Grade::Rare, "1_dot", 3),
        ];
        let ctx = build_context(2, 2, &[], &pieces, "dealer");
        assert_eq!(ctx.pool.len(), 2);
        assert!(Arc::ptr_eq(&ctx.pool[0].placements, &ctx.pool[1].placements));
        // Each cell: one placement per entry, weighted by remaining.
        for cell in 0..4 {
            assert_eq!(ctx.coverage[cell], 5);
        }
        assert_eq!(ctx.modifier_potential["radiance"], 2);
        assert_eq!(ctx.modifier_potential["piercing"], 3);
        assert_eq!(ctx.unused_base, 5 * 30);
    }

    #[test]
    fn test_pool_sorted_by_area_then_score() {
        let pieces = [
            spec("dealer", Some("radiance"), Grade::Rare, "1_dot", 1),
            spec("dealer", Some("radiance"), Grade::SuperEpic, "5_plus", 1),
            spec("dealer", Some("radiance"), Grade::Rare, "3_bar_h", 1),
            spec("dealer", Some("radiance"), Grade::Epic, "3_bar_h", 1),
        ];
        let ctx = build_context(6, 6, &[], &pieces, "dealer");
        let areas: Vec<u32> = ctx.pool.iter().map(|entry| entry.area).collect();
        assert_eq!(areas, vec![5, 3, 3, 1]);
        // Equal area: higher base score first.
        assert_eq!(ctx.pool[1].grade, Grade::Epic);
    }
}
