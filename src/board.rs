//! Board geometry and the occupancy bitset.
//!
//! Cells are indexed row-major: `index = row * cols + col`. Occupancy is a
//! multi-word bitset rather than a single native integer, so board
//! dimensions are not capped by an integer width.

use serde::{Deserialize, Serialize};

const WORD_BITS: usize = 64;

/// A cell reference as it appears in requests (`blocked` entries).
///
/// Signed so out-of-range coordinates deserialize instead of failing;
/// they are ignored when the board is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: i64,
    pub col: i64,
}

/// One bit per board cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitMask {
    words: Vec<u64>,
}

impl BitMask {
    pub fn new(bits: usize) -> Self {
        Self {
            words: vec![0; bits.div_ceil(WORD_BITS)],
        }
    }

    pub fn set(&mut self, bit: usize) {
        self.words[bit / WORD_BITS] |= 1 << (bit % WORD_BITS);
    }

    pub fn clear(&mut self, bit: usize) {
        self.words[bit / WORD_BITS] &= !(1 << (bit % WORD_BITS));
    }

    pub fn contains(&self, bit: usize) -> bool {
        self.words[bit / WORD_BITS] & (1 << (bit % WORD_BITS)) != 0
    }

    /// True when any bit is set in both masks.
    pub fn intersects(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .any(|(mine, theirs)| mine & theirs != 0)
    }

    pub fn union_with(&mut self, other: &Self) {
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            *mine |= theirs;
        }
    }

    /// Removes a previously unioned mask. The masks must have been disjoint
    /// when the union was applied.
    pub fn toggle(&mut self, other: &Self) {
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            *mine ^= theirs;
        }
    }

    pub fn count(&self) -> u32 {
        self.words.iter().map(|word| word.count_ones()).sum()
    }

    /// True when every bit of `other` is also set here.
    pub fn is_superset_of(&self, other: &Self) -> bool {
        other
            .words
            .iter()
            .zip(&self.words)
            .all(|(theirs, mine)| theirs & !mine == 0)
    }
}

/// Immutable board geometry for one solve call.
#[derive(Debug, Clone)]
pub struct Board {
    pub rows: u32,
    pub cols: u32,
    /// Every in-range cell.
    pub full: BitMask,
    /// In-range blocked cells.
    pub blocked: BitMask,
}

impl Board {
    pub fn new(rows: u32, cols: u32, blocked: &[CellRef]) -> Self {
        let total = rows as usize * cols as usize;
        let mut full = BitMask::new(total);
        for bit in 0..total {
            full.set(bit);
        }

        let mut blocked_mask = BitMask::new(total);
        for cell in blocked {
            if cell.row >= 0 && cell.row < i64::from(rows) && cell.col >= 0 && cell.col < i64::from(cols) {
                blocked_mask.set(cell.row as usize * cols as usize + cell.col as usize);
            }
        }

        Self {
            rows,
            cols,
            full,
            blocked: blocked_mask,
        }
    }

    pub fn total_cells(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.cols as usize + col as usize
    }

    pub fn coord(&self, index: usize) -> (u32, u32) {
        (
            (index / self.cols as usize) as u32,
            (index % self.cols as usize) as u32,
        )
    }

    /// Cells that are in range and not blocked.
    pub fn free_cells(&self) -> u32 {
        self.total_cells() as u32 - self.blocked.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_coord_roundtrip() {
        let board = Board::new(5, 7, &[]);
        for index in 0..board.total_cells() {
            let (row, col) = board.coord(index);
            assert_eq!(board.index(row, col), index);
        }
    }

    #[test]
    fn test_out_of_range_blocked_cells_are_ignored() {
        let blocked = [
            CellRef { row: 0, col: 0 },
            CellRef { row: -1, col: 2 },
            CellRef { row: 3, col: 0 },
            CellRef { row: 2, col: 99 },
        ];
        let board = Board::new(3, 3, &blocked);
        assert_eq!(board.blocked.count(), 1);
        assert_eq!(board.free_cells(), 8);
    }

    #[test]
    fn test_bitmask_set_clear_contains() {
        let mut mask = BitMask::new(130);
        mask.set(0);
        mask.set(64);
        mask.set(129);
        assert!(mask.contains(0) && mask.contains(64) && mask.contains(129));
        assert!(!mask.contains(1) && !mask.contains(128));
        assert_eq!(mask.count(), 3);
        mask.clear(64);
        assert!(!mask.contains(64));
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_bitmask_union_toggle_restores() {
        let mut occupied = BitMask::new(100);
        occupied.set(3);
        let before = occupied.clone();

        let mut placement = BitMask::new(100);
        placement.set(70);
        placement.set(71);

        assert!(!occupied.intersects(&placement));
        occupied.union_with(&placement);
        assert!(occupied.intersects(&placement));
        assert_eq!(occupied.count(), 3);

        occupied.toggle(&placement);
        assert_eq!(occupied, before);
    }

    #[test]
    fn test_bitmask_superset() {
        let mut big = BitMask::new(80);
        big.set(1);
        big.set(70);
        let mut small = BitMask::new(80);
        small.set(70);
        assert!(big.is_superset_of(&small));
        assert!(!small.is_superset_of(&big));
    }

    #[test]
    fn test_zero_area_board() {
        let board = Board::new(0, 4, &[]);
        assert_eq!(board.total_cells(), 0);
        assert_eq!(board.free_cells(), 0);
    }
}
