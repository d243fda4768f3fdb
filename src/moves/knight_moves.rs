//! Knight jump offsets.

/// `(d_row, d_col)` jumps, in the order the generator emits them.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (1, -2),
    (-1, 2),
    (1, 2),
    (2, -1),
    (2, 1),
];
