//! Strategy B: exact cover over a dancing-links matrix.
//!
//! Each free board cell is a primary column that must be covered exactly
//! once, either by a placement row or by that cell's explicit leave-empty
//! row. Each available piece instance is a secondary column used at most
//! once, and a single shared secondary column holds the unique-grade slot.
//! Columns are chosen by fewest remaining rows (MRV); rows and columns are
//! covered and uncovered with the usual sparse link splicing, and the
//! shared optimistic bound from [`crate::search`] prunes before descending.

use crate::pool::SearchContext;
use crate::search::{Deadline, Shell, Strategy};
use crate::solution::Solution;

const NO_ROW: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
enum RowKind {
    /// Place `placement` of pool entry `entry`.
    Place { entry: usize, placement: usize },
    /// Leave this cell permanently unfilled.
    Skip { cell: usize },
}

/// Sparse 0/1 matrix with doubly linked rows and columns.
///
/// Node 0 is the root of the primary-column header ring; nodes `1..=cols`
/// are column headers (secondary headers are self-linked and never enter
/// the ring); row nodes follow.
struct Matrix {
    left: Vec<usize>,
    right: Vec<usize>,
    up: Vec<usize>,
    down: Vec<usize>,
    column_of: Vec<usize>,
    row_of: Vec<usize>,
    /// Uncovered rows per column.
    size: Vec<usize>,
    rows: Vec<RowKind>,
}

impl Matrix {
    fn with_columns(primary: usize, total: usize) -> Self {
        let mut matrix = Matrix {
            left: Vec::new(),
            right: Vec::new(),
            up: Vec::new(),
            down: Vec::new(),
            column_of: Vec::new(),
            row_of: Vec::new(),
            size: vec![0; total],
            rows: Vec::new(),
        };
        // Root plus one self-linked header per column.
        for node in 0..=total {
            matrix.left.push(node);
            matrix.right.push(node);
            matrix.up.push(node);
            matrix.down.push(node);
            matrix.column_of.push(node.wrapping_sub(1));
            matrix.row_of.push(NO_ROW);
        }
        // Primary headers join the root ring; secondary headers stay
        // self-linked so covering them never touches the ring.
        let mut previous = 0;
        for column in 0..primary {
            let header = column + 1;
            matrix.left[header] = previous;
            matrix.right[previous] = header;
            previous = header;
        }
        matrix.left[0] = previous;
        matrix.right[previous] = 0;
        matrix
    }

    /// Appends one row covering `columns`, linked circularly.
    fn add_row(&mut self, columns: &[usize], kind: RowKind) {
        let row_id = self.rows.len();
        self.rows.push(kind);

        let mut first: Option<usize> = None;
        for &column in columns {
            let header = column + 1;
            let node = self.left.len();
            let above = self.up[header];

            self.left.push(node);
            self.right.push(node);
            self.up.push(above);
            self.down.push(header);
            self.column_of.push(column);
            self.row_of.push(row_id);

            self.down[above] = node;
            self.up[header] = node;
            self.size[column] += 1;

            match first {
                None => first = Some(node),
                Some(first) => {
                    let last = self.left[first];
                    self.left[node] = last;
                    self.right[node] = first;
                    self.right[last] = node;
                    self.left[first] = node;
                }
            }
        }
    }

    fn cover(&mut self, column: usize) {
        let header = column + 1;
        let (hl, hr) = (self.left[header], self.right[header]);
        self.right[hl] = hr;
        self.left[hr] = hl;

        let mut row = self.down[header];
        while row != header {
            let mut node = self.right[row];
            while node != row {
                let (above, below) = (self.up[node], self.down[node]);
                self.down[above] = below;
                self.up[below] = above;
                self.size[self.column_of[node]] -= 1;
                node = self.right[node];
            }
            row = self.down[row];
        }
    }

    fn uncover(&mut self, column: usize) {
        let header = column + 1;
        let mut row = self.up[header];
        while row != header {
            let mut node = self.left[row];
            while node != row {
                self.size[self.column_of[node]] += 1;
                self.down[self.up[node]] = node;
                self.up[self.down[node]] = node;
                node = self.left[node];
            }
            row = self.up[row];
        }
        let (hl, hr) = (self.left[header], self.right[header]);
        self.right[hl] = header;
        self.left[hr] = header;
    }

    /// Builds the cover matrix for the current pool state.
    fn build(ctx: &SearchContext) -> Matrix {
        let total = ctx.board.total_cells();

        let mut column_for_cell = vec![usize::MAX; total];
        let mut primary = 0;
        for cell in 0..total {
            if !ctx.board.blocked.contains(cell) {
                column_for_cell[cell] = primary;
                primary += 1;
            }
        }

        let instances: usize = ctx.pool.iter().map(|entry| entry.remaining as usize).sum();
        let has_unique = ctx.pool.iter().any(|entry| entry.is_unique());
        let total_columns = primary + instances + usize::from(has_unique);
        let unique_column = primary + instances;

        let mut matrix = Matrix::with_columns(primary, total_columns);

        let mut next_instance = primary;
        for (entry_index, entry) in ctx.pool.iter().enumerate() {
            for _ in 0..entry.remaining {
                let instance_column = next_instance;
                next_instance += 1;
                for (placement_index, placement) in
                    entry.placements.placements.iter().enumerate()
                {
                    let mut columns: Vec<usize> = placement
                        .cells
                        .iter()
                        .map(|&(row, col)| column_for_cell[ctx.board.index(row, col)])
                        .collect();
                    columns.push(instance_column);
                    if entry.is_unique() {
                        columns.push(unique_column);
                    }
                    matrix.add_row(
                        &columns,
                        RowKind::Place {
                            entry: entry_index,
                            placement: placement_index,
                        },
                    );
                }
            }
        }

        for cell in 0..total {
            let column = column_for_cell[cell];
            if column != usize::MAX {
                matrix.add_row(&[column], RowKind::Skip { cell });
            }
        }

        matrix
    }

    fn search(&mut self, shell: &mut Shell<'_>) {
        if shell.deadline.passed() {
            return;
        }
        if shell.bound() <= shell.best.total_score {
            return;
        }
        shell.evaluate();

        // MRV: the uncovered primary column with the fewest rows. Every
        // uncovered cell column keeps at least its leave-empty row.
        let mut chosen: Option<usize> = None;
        let mut min_size = usize::MAX;
        let mut header = self.right[0];
        while header != 0 {
            let column = self.column_of[header];
            if self.size[column] < min_size {
                min_size = self.size[column];
                chosen = Some(column);
                if min_size <= 1 {
                    break;
                }
            }
            header = self.right[header];
        }
        let Some(column) = chosen else {
            // Every cell is decided.
            return;
        };

        self.cover(column);
        let header = column + 1;
        let mut row_node = self.down[header];
        while row_node != header {
            if shell.deadline.passed() {
                break;
            }
            let kind = self.rows[self.row_of[row_node]];
            match kind {
                RowKind::Place { entry, placement } => shell.place(entry, placement),
                RowKind::Skip { cell } => shell.occupied.set(cell),
            }
            let mut node = self.right[row_node];
            while node != row_node {
                self.cover(self.column_of[node]);
                node = self.right[node];
            }

            self.search(shell);

            let mut node = self.left[row_node];
            while node != row_node {
                self.uncover(self.column_of[node]);
                node = self.left[node];
            }
            match kind {
                RowKind::Place { entry, placement } => shell.unplace(entry, placement),
                RowKind::Skip { cell } => shell.occupied.clear(cell),
            }
            row_node = self.down[row_node];
        }
        self.uncover(column);
    }
}

/// Dancing-links exact cover with optimistic-bound pruning.
pub struct ExactCover;

impl Strategy for ExactCover {
    fn name(&self) -> &'static str {
        "exact-cover"
    }

    fn search(&self, ctx: &mut SearchContext, deadline: Deadline) -> Solution {
        let mut matrix = Matrix::build(ctx);
        let mut shell = Shell::new(ctx, deadline);
        matrix.search(&mut shell);
        shell.into_best()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::build_context;
    use crate::pool::PieceSpec;
    use crate::score::Grade;
    use std::time::Duration;

    fn spec(modifier: &str, grade: Grade, shape_key: &str, quantity: u32) -> PieceSpec {
        PieceSpec {
            id: None,
            role: "dealer".to_string(),
            modifier: Some(modifier.to_string()),
            grade,
            shape_key: shape_key.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_matrix_shape_counts() {
        let pieces = [spec("radiance", Grade::Rare, "1_dot", 2)];
        let ctx = build_context(2, 2, &[], &pieces, "dealer");
        let matrix = Matrix::build(&ctx);
        // 4 placement rows per instance plus 4 leave-empty rows.
        assert_eq!(matrix.rows.len(), 2 * 4 + 4);
        // 4 cell columns + 2 instance columns, no unique slot.
        assert_eq!(matrix.size.len(), 6);
    }

    #[test]
    fn test_cover_uncover_restores_links() {
        let pieces = [
            spec("radiance", Grade::Rare, "2_bar_h", 1),
            spec("piercing", Grade::Rare, "1_dot", 1),
        ];
        let ctx = build_context(2, 3, &[], &pieces, "dealer");
        let mut matrix = Matrix::build(&ctx);
        let snapshot = (
            matrix.left.clone(),
            matrix.right.clone(),
            matrix.up.clone(),
            matrix.down.clone(),
            matrix.size.clone(),
        );
        for column in 0..matrix.size.len() {
            matrix.cover(column);
            matrix.uncover(column);
        }
        assert_eq!(matrix.left, snapshot.0);
        assert_eq!(matrix.right, snapshot.1);
        assert_eq!(matrix.up, snapshot.2);
        assert_eq!(matrix.down, snapshot.3);
        assert_eq!(matrix.size, snapshot.4);
    }

    #[test]
    fn test_exact_cover_restores_pool_counters() {
        let pieces = [
            spec("radiance", Grade::SuperEpic, "5_plus", 1),
            spec("radiance", Grade::Epic, "4_square", 2),
        ];
        let mut ctx = build_context(4, 4, &[], &pieces, "dealer");
        let before: Vec<(u32, u32)> = ctx.pool.iter().map(|e| (e.remaining, e.used)).collect();
        let unused_before = ctx.unused_base;
        let potential_before = ctx.modifier_potential.clone();

        let solution = ExactCover.search(&mut ctx, Deadline::after(Duration::from_secs(10)));
        assert!(solution.total_score > 0);

        let after: Vec<(u32, u32)> = ctx.pool.iter().map(|e| (e.remaining, e.used)).collect();
        assert_eq!(before, after);
        assert_eq!(unused_before, ctx.unused_base);
        assert_eq!(potential_before, ctx.modifier_potential);
    }
}
