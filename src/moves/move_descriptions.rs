//! Move value and its short textual rendering.
//!
//! A `Move` is built against the board it will be played on, so it carries
//! the moved and captured pieces along with the special-move flags. Its
//! identity (`Move::id`) is derived from the start and end squares only.

use std::fmt;

use crate::game_state::chess_rules::promotion_row;
use crate::game_state::chess_types::{Board, Piece, PieceKind, Square};
use crate::utils::algebraic::square_to_algebraic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub start: Square,
    pub end: Square,
    pub piece_moved: Piece,
    pub piece_captured: Option<Piece>,
    pub is_en_passant: bool,
    pub is_castle: bool,
    pub is_promotion: bool,
    /// Piece a promoting pawn becomes. Defaults to Queen; the caller may
    /// overwrite it before the move is committed.
    pub promotion_choice: PieceKind,
}

impl Move {
    /// Ordinary move or capture; the promotion flag is derived from the
    /// destination row.
    ///
    /// Panics if `start` is empty, which means the generator and the board
    /// are out of sync.
    pub fn new(start: Square, end: Square, board: &Board) -> Self {
        let piece_moved = board[start.row as usize][start.col as usize]
            .expect("move origin must hold a piece");
        let piece_captured = board[end.row as usize][end.col as usize];
        let is_promotion =
            piece_moved.kind == PieceKind::Pawn && end.row == promotion_row(piece_moved.color);

        Self {
            start,
            end,
            piece_moved,
            piece_captured,
            is_en_passant: false,
            is_castle: false,
            is_promotion,
            promotion_choice: PieceKind::Queen,
        }
    }

    /// En-passant capture. The captured pawn sits beside the mover, not on
    /// `end`.
    pub fn en_passant(start: Square, end: Square, board: &Board) -> Self {
        let mut mv = Self::new(start, end, board);
        mv.is_en_passant = true;
        mv.piece_captured = Some(Piece::new(mv.piece_moved.color.opposite(), PieceKind::Pawn));
        mv
    }

    /// King move of two columns; the rook relocation is implied.
    pub fn castle(start: Square, end: Square, board: &Board) -> Self {
        let mut mv = Self::new(start, end, board);
        mv.is_castle = true;
        mv
    }

    /// Identity used for equality lookups: `start.row*1000 + start.col*100 +
    /// end.row*10 + end.col`. Does not distinguish promotion choices.
    #[inline]
    pub fn id(&self) -> u16 {
        u16::from(self.start.row) * 1000
            + u16::from(self.start.col) * 100
            + u16::from(self.end.row) * 10
            + u16::from(self.end.col)
    }

    #[inline]
    pub fn same_identity(&self, other: &Move) -> bool {
        self.id() == other.id()
    }

    #[inline]
    pub fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion_choice = kind;
        self
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.piece_captured.is_some()
    }

    #[inline]
    pub fn is_king_side_castle(&self) -> bool {
        self.is_castle && self.end.col > self.start.col
    }

    #[inline]
    pub fn is_two_square_pawn_advance(&self) -> bool {
        self.piece_moved.kind == PieceKind::Pawn && self.start.row.abs_diff(self.end.row) == 2
    }

    /// Square skipped by a two-square pawn advance, i.e. the en-passant
    /// target it creates.
    #[inline]
    pub fn skipped_square(&self) -> Option<Square> {
        self.is_two_square_pawn_advance()
            .then(|| Square::new((self.start.row + self.end.row) / 2, self.start.col))
    }

    /// Piece standing on `end` once the move is made.
    #[inline]
    pub fn piece_placed(&self) -> Piece {
        if self.is_promotion {
            Piece::new(self.piece_moved.color, self.promotion_choice)
        } else {
            self.piece_moved
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_castle {
            return f.write_str(if self.is_king_side_castle() { "O-O" } else { "O-O-O" });
        }

        let start = square_to_algebraic(self.start);
        let end = square_to_algebraic(self.end);
        let start_file = &start[..1];

        if self.is_promotion {
            let letter = self.promotion_choice.letter();
            return if self.is_capture() {
                write!(f, "{start_file}x{end}={letter}")
            } else {
                write!(f, "{end}={letter}")
            };
        }

        match (self.piece_moved.kind, self.is_capture()) {
            (PieceKind::Pawn, true) => write!(f, "{start_file}x{end}"),
            (PieceKind::Pawn, false) => write!(f, "{end}"),
            (kind, true) => write!(f, "{}x{end}", kind.letter()),
            (kind, false) => write!(f, "{}{end}", kind.letter()),
        }
    }
}
