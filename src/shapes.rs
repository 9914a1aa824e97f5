//! The static polyomino catalog.
//!
//! Every placeable piece references one of these shapes by key. Shapes are
//! declared as 0/1 matrices and normalized to a minimal bounding box, so at
//! least one filled cell sits in row 0 and at least one in column 0.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// A polyomino: the filled cells of a piece, anchored at its top-left
/// bounding-box corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub key: &'static str,
    pub width: u32,
    pub height: u32,
    /// Filled (row, col) offsets within the bounding box, row-major.
    pub cells: Vec<(u32, u32)>,
    /// Number of filled cells.
    pub area: u32,
}

impl Shape {
    /// Builds a shape from a 0/1 matrix, trimming empty border rows and
    /// columns so the bounding box is minimal.
    fn from_matrix(key: &'static str, matrix: &[&[u8]]) -> Shape {
        let mut cells: Vec<(u32, u32)> = Vec::new();
        for (row, line) in matrix.iter().enumerate() {
            for (col, &filled) in line.iter().enumerate() {
                if filled != 0 {
                    cells.push((row as u32, col as u32));
                }
            }
        }
        assert!(!cells.is_empty(), "shape {key} has no filled cells");

        let min_row = cells.iter().map(|&(row, _)| row).min().unwrap();
        let min_col = cells.iter().map(|&(_, col)| col).min().unwrap();
        for (row, col) in &mut cells {
            *row -= min_row;
            *col -= min_col;
        }
        let height = cells.iter().map(|&(row, _)| row).max().unwrap() + 1;
        let width = cells.iter().map(|&(_, col)| col).max().unwrap() + 1;

        Shape {
            key,
            width,
            height,
            area: cells.len() as u32,
            cells,
        }
    }
}

/// Shape definitions, keyed by `{area}_{name}`.
///
/// The 8-cell shapes exist for unique-grade pieces; every other grade is
/// capped below 8 cells.
const DEFINITIONS: &[(&str, &[&[u8]])] = &[
    ("1_dot", &[&[1]]),
    // bars
    ("2_bar_h", &[&[1, 1]]),
    ("2_bar_v", &[&[1], &[1]]),
    ("3_bar_h", &[&[1, 1, 1]]),
    ("3_bar_v", &[&[1], &[1], &[1]]),
    ("4_bar_h", &[&[1, 1, 1, 1]]),
    ("4_bar_v", &[&[1], &[1], &[1], &[1]]),
    // small corners
    ("3_L_nw", &[&[1, 0], &[1, 1]]),
    ("3_L_ne", &[&[0, 1], &[1, 1]]),
    ("3_L_sw", &[&[1, 1], &[1, 0]]),
    ("3_L_se", &[&[1, 1], &[0, 1]]),
    ("4_square", &[&[1, 1], &[1, 1]]),
    // T tetrominoes
    ("4_T_up", &[&[0, 1, 0], &[1, 1, 1]]),
    ("4_T_down", &[&[1, 1, 1], &[0, 1, 0]]),
    ("4_T_left", &[&[0, 1], &[1, 1], &[0, 1]]),
    ("4_T_right", &[&[1, 0], &[1, 1], &[1, 0]]),
    // L tetrominoes
    ("4_L_tall_sw", &[&[1, 0], &[1, 0], &[1, 1]]),
    ("4_L_tall_se", &[&[0, 1], &[0, 1], &[1, 1]]),
    ("4_L_tall_nw", &[&[1, 1], &[0, 1], &[0, 1]]),
    ("4_L_tall_ne", &[&[1, 1], &[1, 0], &[1, 0]]),
    ("4_L_wide_sw", &[&[1, 1, 1], &[1, 0, 0]]),
    ("4_L_wide_se", &[&[1, 1, 1], &[0, 0, 1]]),
    ("4_L_wide_nw", &[&[1, 0, 0], &[1, 1, 1]]),
    ("4_L_wide_ne", &[&[0, 0, 1], &[1, 1, 1]]),
    // pentominoes
    ("5_plus", &[&[0, 1, 0], &[1, 1, 1], &[0, 1, 0]]),
    ("5_N_nw", &[&[0, 1, 1], &[0, 1, 0], &[1, 1, 0]]),
    ("5_N_ne", &[&[1, 1, 0], &[0, 1, 0], &[0, 1, 1]]),
    ("5_N_sw", &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 1]]),
    ("5_N_se", &[&[0, 0, 1], &[1, 1, 1], &[1, 0, 0]]),
    ("5_L_up", &[&[1, 1, 1], &[1, 0, 0], &[1, 0, 0]]),
    ("5_L_right", &[&[1, 1, 1], &[0, 0, 1], &[0, 0, 1]]),
    ("5_L_down", &[&[1, 0, 0], &[1, 0, 0], &[1, 1, 1]]),
    ("5_L_left", &[&[0, 0, 1], &[0, 0, 1], &[1, 1, 1]]),
    ("5_T_up", &[&[1, 1, 1], &[0, 1, 0], &[0, 1, 0]]),
    ("5_T_right", &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 1]]),
    ("5_T_down", &[&[0, 1, 0], &[0, 1, 0], &[1, 1, 1]]),
    ("5_T_left", &[&[1, 0, 0], &[1, 1, 1], &[1, 0, 0]]),
    ("5_U_down", &[&[1, 0, 1], &[1, 1, 1]]),
    ("5_U_up", &[&[1, 1, 1], &[1, 0, 1]]),
    ("5_U_left", &[&[1, 1], &[0, 1], &[1, 1]]),
    ("5_U_right", &[&[1, 1], &[1, 0], &[1, 1]]),
    // 8-cell shapes
    ("8_snake_v", &[&[1, 0], &[1, 1], &[1, 1], &[1, 1], &[0, 1]]),
    ("8_snake_h", &[&[0, 1, 1, 1, 1], &[1, 1, 1, 1, 0]]),
    ("8_rect_v", &[&[1, 1], &[1, 1], &[1, 1], &[1, 1]]),
    ("8_rect_h", &[&[1, 1, 1, 1], &[1, 1, 1, 1]]),
    ("8_plus_big", &[&[0, 1, 0], &[1, 1, 1], &[1, 1, 1], &[0, 1, 0]]),
    ("8_ring_h", &[&[0, 1, 1, 0], &[1, 1, 1, 1], &[0, 1, 1, 0]]),
    ("8_T_up", &[&[1, 1, 1, 1], &[0, 1, 1, 0], &[0, 1, 1, 0]]),
    ("8_T_down", &[&[0, 1, 1, 0], &[0, 1, 1, 0], &[1, 1, 1, 1]]),
];

static CATALOG: Lazy<HashMap<&'static str, Shape>> = Lazy::new(|| {
    DEFINITIONS
        .iter()
        .map(|&(key, matrix)| (key, Shape::from_matrix(key, matrix)))
        .collect()
});

/// Looks up a shape by key. `None` means the key is unregistered and the
/// referencing piece is dropped from the pool.
pub fn shape(key: &str) -> Option<&'static Shape> {
    CATALOG.get(key)
}

/// Every registered shape, ordered by key.
pub fn all_shapes() -> Vec<&'static Shape> {
    let mut shapes: Vec<&'static Shape> = CATALOG.values().collect();
    shapes.sort_by_key(|shape| shape.key);
    shapes
}
